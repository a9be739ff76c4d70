//! Canonical node pool model.
//!
//! Node pools are child resources of a cluster; their cross-field checks
//! take the parent cluster so the channel group and VNet constraints can be
//! enforced against the control plane's settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::HcpOpenShiftCluster;
use crate::error::CloudErrorBody;
use crate::resource::TrackedResource;
use crate::validate::{
    check_enum, check_k8s_label_value, check_k8s_qualified_name, check_min, check_range,
    check_release_version, check_required, check_resource_id, ResourceId,
};

pub const DISK_STORAGE_ACCOUNT_TYPES: &[&str] =
    &["Premium_LRS", "StandardSSD_LRS", "Standard_LRS"];
pub const TAINT_EFFECTS: &[&str] = &["NoSchedule", "PreferNoSchedule", "NoExecute"];

const SUBNET_TYPE: &str = "Microsoft.Network/virtualNetworks/subnets";
const DISK_ENCRYPTION_SET_TYPE: &str = "Microsoft.Compute/diskEncryptionSets";

// Replica and autoscaling bounds when no availability zone pins the pool.
const MAX_NODES_WITHOUT_ZONE: i32 = 200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HcpOpenShiftClusterNodePool {
    #[serde(flatten)]
    pub tracked: TrackedResource,
    pub properties: NodePoolProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePoolProperties {
    pub provisioning_state: String,
    pub version: NodePoolVersionProfile,
    pub platform: NodePoolPlatformProfile,
    pub replicas: i32,
    pub auto_repair: bool,
    pub auto_scaling: Option<NodePoolAutoScaling>,
    pub labels: BTreeMap<String, String>,
    pub taints: Vec<Taint>,
    pub node_drain_timeout_minutes: i32,
    /// Backend correlation handle. Never crosses the wire.
    pub internal_id: String,
    /// In-flight operation handle. Never crosses the wire.
    pub active_operation_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePoolVersionProfile {
    pub id: String,
    pub channel_group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePoolPlatformProfile {
    pub subnet_id: String,
    pub vm_size: String,
    pub enable_encryption_at_host: bool,
    pub os_disk: OsDiskProfile,
    pub availability_zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OsDiskProfile {
    #[serde(rename = "sizeGiB")]
    pub size_gib: i32,
    pub disk_storage_account_type: String,
    pub encryption_set_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePoolAutoScaling {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Taint {
    pub effect: String,
    pub key: String,
    pub value: String,
}

/// A node pool carrying every documented non-zero default.
pub fn new_default_node_pool() -> HcpOpenShiftClusterNodePool {
    HcpOpenShiftClusterNodePool {
        properties: NodePoolProperties {
            version: NodePoolVersionProfile {
                channel_group: "stable".to_string(),
                ..Default::default()
            },
            platform: NodePoolPlatformProfile {
                os_disk: OsDiskProfile {
                    size_gib: 64,
                    disk_storage_account_type: "Premium_LRS".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            auto_repair: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

impl HcpOpenShiftClusterNodePool {
    pub fn validate_syntax(&self) -> Vec<CloudErrorBody> {
        let p = &self.properties;
        let mut errs = Vec::new();

        errs.extend(check_release_version(&p.version.id, "properties.version.id"));

        errs.extend(check_resource_id(
            &p.platform.subnet_id,
            SUBNET_TYPE,
            "properties.platform.subnetId",
        ));
        errs.extend(check_required(
            &p.platform.vm_size,
            "properties.platform.vmSize",
        ));
        errs.extend(check_min(
            p.platform.os_disk.size_gib,
            1,
            "properties.platform.osDisk.sizeGiB",
        ));
        errs.extend(check_enum(
            &p.platform.os_disk.disk_storage_account_type,
            DISK_STORAGE_ACCOUNT_TYPES,
            "properties.platform.osDisk.diskStorageAccountType",
        ));
        errs.extend(check_resource_id(
            &p.platform.os_disk.encryption_set_id,
            DISK_ENCRYPTION_SET_TYPE,
            "properties.platform.osDisk.encryptionSetId",
        ));

        let node_cap = if p.platform.availability_zone.is_empty() {
            MAX_NODES_WITHOUT_ZONE
        } else {
            i32::MAX
        };

        if let Some(scaling) = &p.auto_scaling {
            if p.replicas != 0 {
                errs.push(CloudErrorBody::invalid_request_content(
                    "Field 'replicas' cannot be set when autoscaling is enabled",
                    "properties.replicas",
                ));
            }
            errs.extend(check_range(
                scaling.min,
                0,
                node_cap,
                "properties.autoScaling.min",
            ));
            errs.extend(check_range(
                scaling.max,
                scaling.min.max(0),
                node_cap,
                "properties.autoScaling.max",
            ));
        } else {
            errs.extend(check_range(p.replicas, 0, node_cap, "properties.replicas"));
        }

        for (key, value) in &p.labels {
            let target = format!("properties.labels[{key}]");
            errs.extend(check_k8s_qualified_name(key, &target));
            errs.extend(check_k8s_label_value(value, &target));
        }

        for (i, taint) in p.taints.iter().enumerate() {
            errs.extend(check_required(&taint.effect, &format!("properties.taints[{i}].effect")));
            errs.extend(check_enum(
                &taint.effect,
                TAINT_EFFECTS,
                &format!("properties.taints[{i}].effect"),
            ));
            errs.extend(check_required(&taint.key, &format!("properties.taints[{i}].key")));
            if !taint.key.is_empty() {
                errs.extend(check_k8s_qualified_name(
                    &taint.key,
                    &format!("properties.taints[{i}].key"),
                ));
            }
            errs.extend(check_k8s_label_value(
                &taint.value,
                &format!("properties.taints[{i}].value"),
            ));
        }

        errs
    }

    /// Cross-field rules against the parent cluster. Skipped when the parent
    /// is unknown to the caller.
    pub fn validate_complex(&self, cluster: Option<&HcpOpenShiftCluster>) -> Vec<CloudErrorBody> {
        let Some(cluster) = cluster else {
            return Vec::new();
        };
        let mut errs = Vec::new();
        errs.extend(self.validate_channel_group(cluster));
        errs.extend(self.validate_subnet_id(cluster));
        errs
    }

    fn validate_channel_group(&self, cluster: &HcpOpenShiftCluster) -> Vec<CloudErrorBody> {
        let pool_channel = &self.properties.version.channel_group;
        let cluster_channel = &cluster.properties.version.channel_group;
        if pool_channel != cluster_channel {
            vec![CloudErrorBody::invalid_request_content(
                format!(
                    "Node pool channel group '{pool_channel}' must be the same as control plane channel group '{cluster_channel}'"
                ),
                "properties.version.channelGroup",
            )]
        } else {
            Vec::new()
        }
    }

    fn validate_subnet_id(&self, cluster: &HcpOpenShiftCluster) -> Vec<CloudErrorBody> {
        if self.properties.platform.subnet_id.is_empty() {
            return Vec::new();
        }

        // Both subnet IDs already passed syntax validation; skip on the off
        // chance either still fails to parse.
        let Ok(cluster_subnet) = ResourceId::parse(&cluster.properties.platform.subnet_id) else {
            return Vec::new();
        };
        let Ok(pool_subnet) = ResourceId::parse(&self.properties.platform.subnet_id) else {
            return Vec::new();
        };

        match (pool_subnet.parent(), cluster_subnet.parent()) {
            (Some(pool_vnet), Some(cluster_vnet))
                if !pool_vnet
                    .as_str()
                    .eq_ignore_ascii_case(cluster_vnet.as_str()) =>
            {
                vec![CloudErrorBody::invalid_request_content(
                    format!(
                        "Subnet '{}' must belong to the same VNet as the parent cluster VNet '{}'",
                        pool_subnet.as_str(),
                        cluster_vnet.as_str()
                    ),
                    "properties.platform.subnetId",
                )]
            }
            _ => Vec::new(),
        }
    }
}
