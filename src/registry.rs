//! Version registry and the adapter traits every wire version implements.
//!
//! The registry is built once at startup from the compiled-in versions and
//! is immutable afterward, so it can be shared freely across request tasks.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::cluster::HcpOpenShiftCluster;
use crate::error::CloudError;
use crate::external_auth::HcpOpenShiftClusterExternalAuth;
use crate::node_pool::HcpOpenShiftClusterNodePool;
use crate::{v20240610, v20251222};

/// Per-kind projection between the canonical model and one wire version.
pub trait ResourceContract<C>: Send + Sync {
    /// Project a canonical resource onto this version's wire shape.
    ///
    /// Total: `None` yields the fully-defaulted skeleton a client would see
    /// before ever writing the resource. Internal-only fields never appear.
    fn to_wire(&self, canonical: Option<&C>) -> Value;

    /// Run the full write pipeline on a request body: decode, visibility
    /// enforcement against the current state, normalization, syntactic and
    /// cross-field validation. Returns the normalized canonical resource or
    /// an aggregated error envelope.
    fn validate_write(
        &self,
        candidate: &Value,
        current: Option<&C>,
        updating: bool,
    ) -> Result<C, CloudError>;
}

/// One wire version: a version string plus the per-kind contracts it serves.
///
/// Kinds a version predates return `None`.
pub trait ApiVersion: Send + Sync {
    fn version(&self) -> &'static str;

    fn cluster(&self) -> &dyn ResourceContract<HcpOpenShiftCluster>;

    fn node_pool(&self) -> Option<&dyn ResourceContract<HcpOpenShiftClusterNodePool>> {
        None
    }

    fn external_auth(&self) -> Option<&dyn ResourceContract<HcpOpenShiftClusterExternalAuth>> {
        None
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("api version '{0}' registered more than once")]
    DuplicateVersion(String),
}

/// Lookup table from version string to adapter, in registration order.
pub struct ApiRegistry {
    versions: Vec<Arc<dyn ApiVersion>>,
}

impl ApiRegistry {
    pub fn new(versions: Vec<Arc<dyn ApiVersion>>) -> Result<Self, RegistryError> {
        for (i, version) in versions.iter().enumerate() {
            if versions[..i]
                .iter()
                .any(|other| other.version() == version.version())
            {
                return Err(RegistryError::DuplicateVersion(
                    version.version().to_string(),
                ));
            }
        }
        Ok(ApiRegistry { versions })
    }

    /// Every compiled-in version, oldest first.
    pub fn with_all_versions() -> Self {
        // The static list is duplicate-free by construction.
        ApiRegistry {
            versions: vec![Arc::new(v20240610::Version), Arc::new(v20251222::Version)],
        }
    }

    /// Resolve a version string from a request. Unknown strings are a caller
    /// error surfaced as an unsupported-API-version response.
    pub fn lookup(&self, api_version: &str) -> Result<&Arc<dyn ApiVersion>, CloudError> {
        self.versions
            .iter()
            .find(|v| v.version() == api_version)
            .ok_or_else(|| CloudError::unsupported_api_version(api_version, &self.versions()))
    }

    pub fn versions(&self) -> Vec<&'static str> {
        self.versions.iter().map(|v| v.version()).collect()
    }
}
