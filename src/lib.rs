//! Contract layer for the Azure Red Hat OpenShift hosted-control-plane
//! resource provider.
//!
//! The crate keeps one canonical model per resource kind — clusters, node
//! pools, and external auth configurations — and mediates every externally
//! visible representation through a versioned wire contract. Each API
//! version declares a per-field visibility table (read / create / update),
//! and writes are admitted by structural comparison against the current
//! canonical state rather than by trusting the client to omit what it must
//! not change.
//!
//! A write request flows through [`registry::ResourceContract::validate_write`]:
//! the candidate body is decoded into the version's wire shape, checked
//! field by field against the visibility table, folded onto the current
//! canonical resource (or onto version defaults on create), and then run
//! through syntactic and cross-field validation. All failures are collected
//! into a single ARM-style [`error::CloudError`].
//!
//! ```
//! use hcp_contract::registry::ApiRegistry;
//! use serde_json::json;
//!
//! let registry = ApiRegistry::with_all_versions();
//! let version = registry.lookup("2025-12-22-preview")?;
//!
//! let body = json!({
//!     "location": "eastus",
//!     "properties": {
//!         "platform": {
//!             "subnetId": "/subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/node-subnet",
//!             "networkSecurityGroupId": "/subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/networkSecurityGroups/nsg"
//!         }
//!     }
//! });
//! let cluster = version.cluster().validate_write(&body, None, false)?;
//! assert_eq!(cluster.properties.version.channel_group, "stable");
//! # Ok::<(), hcp_contract::error::CloudError>(())
//! ```

pub mod cluster;
pub mod error;
pub mod external_auth;
pub mod node_pool;
pub mod registry;
pub mod resource;
pub mod validate;
pub mod visibility;

mod v20240610;
mod v20251222;

pub use cluster::HcpOpenShiftCluster;
pub use error::{CloudError, CloudErrorBody};
pub use external_auth::HcpOpenShiftClusterExternalAuth;
pub use node_pool::HcpOpenShiftClusterNodePool;
pub use registry::{ApiRegistry, ApiVersion, ResourceContract};
