//! Outbound HTTP transport.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use super::ExportError;

/// HTTP status returned by the remote API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TransportStatus(pub u16);

impl TransportStatus {
    pub const OK: TransportStatus = TransportStatus(200);

    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }

    /// `Ok(self)` for 2xx, `ExportError::Status` otherwise.
    pub fn ensure_success(self, url: &str) -> Result<Self, ExportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ExportError::Status {
                status: self.0,
                url: url.to_string(),
            })
        }
    }
}

/// Raw transport to the remote API. Payloads are already serialized to JSON
/// with snake_case field names and null fields omitted.
pub trait ExportSink: Send + Sync {
    fn post(&self, payload: &JsonValue, url: &str) -> Result<TransportStatus, ExportError>;

    /// Delete the given ids, passed as a comma-separated `ids` query parameter.
    fn delete(&self, ids: &[String], url: &str) -> Result<TransportStatus, ExportError>;
}

impl<S> ExportSink for Arc<S>
where
    S: ExportSink + ?Sized,
{
    fn post(&self, payload: &JsonValue, url: &str) -> Result<TransportStatus, ExportError> {
        (**self).post(payload, url)
    }

    fn delete(&self, ids: &[String], url: &str) -> Result<TransportStatus, ExportError> {
        (**self).delete(ids, url)
    }
}

/// Append `ids=<a,b,c>` to an endpoint that may already carry a query.
///
/// The list separator stays a literal comma; only characters the query
/// component cannot carry are percent-encoded.
pub fn delete_url(url: &str, ids: &[String]) -> Result<Url, ExportError> {
    let mut parsed = Url::parse(url).map_err(|e| ExportError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let ids = ids.join(",");
    let query = match parsed.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&ids={ids}"),
        _ => format!("ids={ids}"),
    };
    parsed.set_query(Some(&query));
    Ok(parsed)
}

/// Blocking `reqwest` sink.
#[derive(Debug, Clone)]
pub struct HttpExportSink {
    client: Client,
}

impl HttpExportSink {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ExportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ExportError::Transport {
            url: String::new(),
            reason: e.to_string(),
        })?;
        Ok(Self { client })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> ExportError {
    ExportError::Transport {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

fn log_status(method: &str, url: &str, status: TransportStatus) -> TransportStatus {
    if !status.is_success() {
        warn!(method, url, status = status.0, "export request was not successful");
    }
    status
}

impl ExportSink for HttpExportSink {
    fn post(&self, payload: &JsonValue, url: &str) -> Result<TransportStatus, ExportError> {
        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .map_err(|e| transport_error(url, e))?;

        Ok(log_status("POST", url, TransportStatus(resp.status().as_u16())))
    }

    fn delete(&self, ids: &[String], url: &str) -> Result<TransportStatus, ExportError> {
        let delete_url = delete_url(url, ids)?;
        info!(url = %delete_url, "delete url");

        let resp = self
            .client
            .delete(delete_url.clone())
            .send()
            .map_err(|e| transport_error(delete_url.as_str(), e))?;

        Ok(log_status("DELETE", url, TransportStatus(resp.status().as_u16())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        assert!(TransportStatus(200).is_success());
        assert!(TransportStatus(204).is_success());
        assert!(!TransportStatus(302).is_success());
        assert!(!TransportStatus(500).is_success());
    }

    #[test]
    fn ensure_success_reports_status_and_url() {
        let err = TransportStatus(503).ensure_success("https://api.example.com/x").unwrap_err();
        match err {
            ExportError::Status { status, url } => {
                assert_eq!(status, 503);
                assert_eq!(url, "https://api.example.com/x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delete_url_keeps_existing_query() {
        let url = delete_url(
            "https://api.example.com/v1/products?account=shop&token=abc",
            &["P-1".to_string(), "V-1".to_string()],
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/products?account=shop&token=abc&ids=P-1,V-1"
        );
    }

    #[test]
    fn delete_url_keeps_commas_literal() {
        let ids = ["P-1".to_string(), "V 1".to_string()];

        assert_eq!(
            delete_url("https://a.example.com/p?x=1", &ids).unwrap().as_str(),
            "https://a.example.com/p?x=1&ids=P-1,V%201"
        );
        assert_eq!(
            delete_url("https://a.example.com/p", &ids).unwrap().as_str(),
            "https://a.example.com/p?ids=P-1,V%201"
        );
    }

    #[test]
    fn delete_url_rejects_relative_endpoints() {
        assert!(matches!(
            delete_url("/products", &[]),
            Err(ExportError::InvalidUrl { .. })
        ));
    }
}
