//! Tracing/logging setup shared by every process hosting the bridge.
//!
//! The bridge itself only emits `tracing` events. A host that has no
//! subscriber of its own calls [`init`] once at startup, before building the
//! bridge (see `catalogsync_infra::build_http_bridge`).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Install a test-friendly subscriber (captured by the test harness).
pub fn init_for_tests() {
    tracing::init_for_tests();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
