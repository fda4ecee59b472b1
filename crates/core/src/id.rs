//! Strongly-typed identifiers used across the content model.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;

/// Identity component of a [`ContentReference`] (the version is dropped).
///
/// This is the deduplication key used throughout: two references with the
/// same identity address the same entity, whichever version they point at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentIdentity(u64);

impl ContentIdentity {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ContentIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Opaque reference to a unit of content in the host graph.
///
/// A version of `0` means "the published version". Derived equality compares
/// both components; use [`ContentReference::same_entity`] or
/// [`ContentReference::identity`] when the version must be ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawReference")]
pub struct ContentReference {
    id: u64,
    version: u32,
}

#[derive(Deserialize)]
struct RawReference {
    id: u64,
    #[serde(default)]
    version: u32,
}

impl TryFrom<RawReference> for ContentReference {
    type Error = CatalogError;

    fn try_from(raw: RawReference) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.version)
    }
}

impl ContentReference {
    /// Build a reference. The id must be non-zero; zero is the host's empty
    /// reference and is represented as `None` at every boundary instead.
    pub fn new(id: u64, version: u32) -> Result<Self, CatalogError> {
        if id == 0 {
            return Err(CatalogError::invalid_reference("content id must be non-zero"));
        }
        Ok(Self { id, version })
    }

    /// Reference to the published version of `id`.
    pub fn published(id: u64) -> Result<Self, CatalogError> {
        Self::new(id, 0)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn identity(&self) -> ContentIdentity {
        ContentIdentity(self.id)
    }

    pub fn without_version(&self) -> Self {
        Self {
            id: self.id,
            version: 0,
        }
    }

    /// Same entity, regardless of version.
    pub fn same_entity(&self, other: &ContentReference) -> bool {
        self.id == other.id
    }
}

impl core::fmt::Display for ContentReference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.version == 0 {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}_{}", self.id, self.version)
        }
    }
}

impl FromStr for ContentReference {
    type Err = CatalogError;

    /// Parses the `id` or `id_version` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, version) = match s.split_once('_') {
            Some((id, version)) => (id, Some(version)),
            None => (s, None),
        };

        let id = id
            .trim()
            .parse::<u64>()
            .map_err(|e| CatalogError::invalid_reference(format!("{s}: {e}")))?;
        let version = match version {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .map_err(|e| CatalogError::invalid_reference(format!("{s}: {e}")))?,
            None => 0,
        };

        Self::new(id, version)
    }
}

/// Kind of catalog object a host business key refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogContentType {
    CatalogEntry,
    CatalogNode,
}

/// Identifier of an event subscription held against a host event source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier (UUIDv7, time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| CatalogError::invalid_reference(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(SubscriptionId, "SubscriptionId");
