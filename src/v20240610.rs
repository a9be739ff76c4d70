//! The `2024-06-10-preview` wire contract.
//!
//! Legacy version: serves only the cluster kind. Its wire shape predates
//! cluster autoscaling and node drain timeouts, and the version channel
//! group could not yet be changed after creation. Both restrictions stay
//! pinned for clients on this version regardless of what newer versions
//! allow.

use std::sync::OnceLock;

use serde_json::Value;

use crate::cluster::{new_default_hcp_cluster, HcpOpenShiftCluster};
use crate::error::CloudError;
use crate::registry::{ApiVersion, ResourceContract};
use crate::v20251222::{cluster_fields, cluster_to_wire, normalize_cluster, ClusterWire};
use crate::visibility::{enforce, VisibilityFlags, VisibilityTable};

pub const API_VERSION: &str = "2024-06-10-preview";

pub struct Version;

impl ApiVersion for Version {
    fn version(&self) -> &'static str {
        API_VERSION
    }

    fn cluster(&self) -> &dyn ResourceContract<HcpOpenShiftCluster> {
        &ClusterContract
    }
}

fn cluster_table() -> &'static VisibilityTable {
    static TABLE: OnceLock<VisibilityTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        VisibilityTable::build(&cluster_fields()).override_path(
            "properties.version.channelGroup",
            VisibilityFlags::READ.union(VisibilityFlags::CREATE),
        )
    })
}

/// Drop the fields this version predates, so they neither serialize into
/// responses nor take part in visibility comparison.
fn strip_unversioned(wire: &mut ClusterWire) {
    if let Some(properties) = wire.properties.as_mut() {
        properties.autoscaling = None;
        properties.node_drain_timeout_minutes = None;
    }
}

struct ClusterContract;

impl ResourceContract<HcpOpenShiftCluster> for ClusterContract {
    fn to_wire(&self, canonical: Option<&HcpOpenShiftCluster>) -> Value {
        let defaulted;
        let cluster = match canonical {
            Some(cluster) => cluster,
            None => {
                defaulted = new_default_hcp_cluster();
                &defaulted
            }
        };
        let mut wire = cluster_to_wire(cluster);
        strip_unversioned(&mut wire);
        serde_json::to_value(wire).unwrap_or_default()
    }

    fn validate_write(
        &self,
        candidate: &Value,
        current: Option<&HcpOpenShiftCluster>,
        updating: bool,
    ) -> Result<HcpOpenShiftCluster, CloudError> {
        let mut wire: ClusterWire = serde_json::from_value(candidate.clone())
            .map_err(|err| CloudError::malformed_request_body(err.to_string()))?;
        strip_unversioned(&mut wire);
        let typed = serde_json::to_value(&wire).unwrap_or_default();
        let mut errs = enforce(cluster_table(), &typed, &self.to_wire(current), updating);

        let mut cluster = match current {
            Some(cluster) => cluster.clone(),
            None => new_default_hcp_cluster(),
        };
        normalize_cluster(wire, &mut cluster);

        errs.extend(cluster.validate_syntax());
        if errs.is_empty() {
            errs.extend(cluster.validate_complex());
        }
        match CloudError::from_validation_errors(errs) {
            Some(err) => Err(err),
            None => Ok(cluster),
        }
    }
}
