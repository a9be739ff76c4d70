//! Canonical hosted control plane cluster model.
//!
//! The canonical struct is version-independent: version adapters project it
//! onto their wire shapes and normalize request bodies back into it. Syntax
//! checks here are single-field; [`HcpOpenShiftCluster::validate_complex`]
//! holds the cross-field rules and runs only on an otherwise clean resource.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CloudErrorBody;
use crate::resource::{ManagedServiceIdentity, TrackedResource};
use crate::validate::{
    check_cidr, check_dns_label, check_enum, check_https_url, check_range, check_release_version,
    check_required, check_resource_id, Cidr, ResourceId,
};

pub const NETWORK_TYPES: &[&str] = &["OVNKubernetes", "Other"];
pub const VISIBILITIES: &[&str] = &["Public", "Private"];
pub const OUTBOUND_TYPES: &[&str] = &["LoadBalancer"];

const MANAGED_IDENTITY_TYPE: &str = "Microsoft.ManagedIdentity/userAssignedIdentities";
const SUBNET_TYPE: &str = "Microsoft.Network/virtualNetworks/subnets";
const NSG_TYPE: &str = "Microsoft.Network/networkSecurityGroups";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HcpOpenShiftCluster {
    #[serde(flatten)]
    pub tracked: TrackedResource,
    pub identity: ManagedServiceIdentity,
    pub properties: ClusterProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterProperties {
    pub provisioning_state: String,
    pub version: ClusterVersionProfile,
    pub dns: DnsProfile,
    pub network: NetworkProfile,
    pub console: ConsoleProfile,
    pub api: ApiProfile,
    pub platform: PlatformProfile,
    pub autoscaling: ClusterAutoscalingProfile,
    pub node_drain_timeout_minutes: i32,
    /// Backend correlation handle. Never crosses the wire.
    pub internal_id: String,
    /// In-flight operation handle. Never crosses the wire.
    pub active_operation_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterVersionProfile {
    pub id: String,
    pub channel_group: String,
    pub available_upgrades: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DnsProfile {
    pub base_domain: String,
    pub base_domain_prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkProfile {
    pub network_type: String,
    pub pod_cidr: String,
    pub service_cidr: String,
    pub machine_cidr: String,
    pub host_prefix: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleProfile {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiProfile {
    pub url: String,
    pub visibility: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformProfile {
    pub managed_resource_group: String,
    pub subnet_id: String,
    pub outbound_type: String,
    pub network_security_group_id: String,
    pub operators_authentication: OperatorsAuthenticationProfile,
    pub issuer_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorsAuthenticationProfile {
    pub user_assigned_identities: OperatorIdentitiesProfile,
}

/// Operator-to-managed-identity bindings. Control plane operator slots and
/// the service managed identity are the reference sites the assigned
/// identity set must account for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorIdentitiesProfile {
    pub control_plane_operators: BTreeMap<String, String>,
    pub data_plane_operators: BTreeMap<String, String>,
    pub service_managed_identity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterAutoscalingProfile {
    pub max_nodes_total: i32,
    pub max_pod_grace_period_seconds: i32,
    pub max_node_provision_time_seconds: i32,
    pub pod_priority_threshold: i32,
}

/// A cluster carrying every documented non-zero default.
pub fn new_default_hcp_cluster() -> HcpOpenShiftCluster {
    HcpOpenShiftCluster {
        properties: ClusterProperties {
            version: ClusterVersionProfile {
                channel_group: "stable".to_string(),
                ..Default::default()
            },
            network: NetworkProfile {
                network_type: "OVNKubernetes".to_string(),
                pod_cidr: "10.128.0.0/14".to_string(),
                service_cidr: "172.30.0.0/16".to_string(),
                machine_cidr: "10.0.0.0/16".to_string(),
                host_prefix: 23,
            },
            api: ApiProfile {
                visibility: "Public".to_string(),
                ..Default::default()
            },
            platform: PlatformProfile {
                outbound_type: "LoadBalancer".to_string(),
                ..Default::default()
            },
            autoscaling: ClusterAutoscalingProfile {
                max_pod_grace_period_seconds: 600,
                max_node_provision_time_seconds: 900,
                pod_priority_threshold: -10,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

impl HcpOpenShiftCluster {
    /// Single-field syntax checks. Every problem is reported; nothing
    /// short-circuits.
    pub fn validate_syntax(&self) -> Vec<CloudErrorBody> {
        let p = &self.properties;
        let mut errs = Vec::new();

        errs.extend(check_release_version(&p.version.id, "properties.version.id"));
        errs.extend(check_dns_label(
            &p.dns.base_domain_prefix,
            15,
            "properties.dns.baseDomainPrefix",
        ));

        errs.extend(check_enum(
            &p.network.network_type,
            NETWORK_TYPES,
            "properties.network.networkType",
        ));
        errs.extend(check_cidr(&p.network.pod_cidr, "properties.network.podCidr"));
        errs.extend(check_cidr(
            &p.network.service_cidr,
            "properties.network.serviceCidr",
        ));
        errs.extend(check_cidr(
            &p.network.machine_cidr,
            "properties.network.machineCidr",
        ));
        if p.network.host_prefix != 0 {
            errs.extend(check_range(
                p.network.host_prefix,
                23,
                26,
                "properties.network.hostPrefix",
            ));
        }

        errs.extend(check_enum(
            &p.api.visibility,
            VISIBILITIES,
            "properties.api.visibility",
        ));
        errs.extend(check_enum(
            &p.platform.outbound_type,
            OUTBOUND_TYPES,
            "properties.platform.outboundType",
        ));
        errs.extend(check_https_url(
            &p.platform.issuer_url,
            "properties.platform.issuerUrl",
        ));

        errs.extend(check_required(
            &p.platform.subnet_id,
            "properties.platform.subnetId",
        ));
        errs.extend(check_resource_id(
            &p.platform.subnet_id,
            SUBNET_TYPE,
            "properties.platform.subnetId",
        ));
        errs.extend(check_required(
            &p.platform.network_security_group_id,
            "properties.platform.networkSecurityGroupId",
        ));
        errs.extend(check_resource_id(
            &p.platform.network_security_group_id,
            NSG_TYPE,
            "properties.platform.networkSecurityGroupId",
        ));

        let operators = &p.platform.operators_authentication.user_assigned_identities;
        for (name, identity) in &operators.control_plane_operators {
            errs.extend(check_resource_id(
                identity,
                MANAGED_IDENTITY_TYPE,
                &operator_target("controlPlaneOperators", name),
            ));
        }
        for (name, identity) in &operators.data_plane_operators {
            errs.extend(check_resource_id(
                identity,
                MANAGED_IDENTITY_TYPE,
                &operator_target("dataPlaneOperators", name),
            ));
        }
        errs.extend(check_resource_id(
            &operators.service_managed_identity,
            MANAGED_IDENTITY_TYPE,
            &format!("{IDENTITIES_TARGET}.serviceManagedIdentity"),
        ));

        for identity in self.identity.user_assigned_identities.keys() {
            errs.extend(check_resource_id(
                identity,
                MANAGED_IDENTITY_TYPE,
                "identity.userAssignedIdentities",
            ));
        }

        errs
    }

    /// Cross-field rules. Only meaningful on a resource that already passed
    /// visibility and syntax checks; callers gate on that.
    pub fn validate_complex(&self) -> Vec<CloudErrorBody> {
        let mut errs = Vec::new();
        let cluster_rid = ResourceId::parse(&self.tracked.id).ok();

        errs.extend(self.validate_version());
        errs.extend(self.validate_network_cidrs());
        if let Some(rid) = &cluster_rid {
            errs.extend(self.validate_managed_resource_group(rid));
            errs.extend(self.validate_subnet_id(rid));
        }
        errs.extend(self.validate_user_assigned_identities(cluster_rid.as_ref()));

        errs
    }

    fn validate_version(&self) -> Vec<CloudErrorBody> {
        let mut errs = Vec::new();
        let version = &self.properties.version;

        // Syntax validation already admitted only dotted numeric versions;
        // here we pin the segment count.
        if !version.id.is_empty() && version.id.split('.').count() > 2 {
            errs.push(CloudErrorBody::invalid_request_content(
                format!(
                    "Invalid value '{}' for field 'id' (must be specified as MAJOR.MINOR; the PATCH value is managed)",
                    version.id
                ),
                "properties.version.id",
            ));
        }

        if version.channel_group != "stable" {
            errs.push(CloudErrorBody::invalid_request_content(
                "Channel group must be 'stable'",
                "properties.version.channelGroup",
            ));
        }

        errs
    }

    fn validate_network_cidrs(&self) -> Vec<CloudErrorBody> {
        let network = &self.properties.network;
        let mut errs = Vec::new();

        // Populated CIDR fields already passed syntax validation; a field
        // that still fails to parse is skipped here.
        let pod = Cidr::parse(&network.pod_cidr);
        let service = Cidr::parse(&network.service_cidr);
        let machine = Cidr::parse(&network.machine_cidr);

        let mut check = |label_a: &str, a: Option<Cidr>, value_a: &str,
                         label_b: &str, b: Option<Cidr>, value_b: &str| {
            if let (Some(a), Some(b)) = (a, b) {
                if a.overlaps(&b) {
                    errs.push(CloudErrorBody::invalid_request_content(
                        format!("{label_a} '{value_a}' and {label_b} '{value_b}' overlap"),
                        "properties.network",
                    ));
                }
            }
        };

        check(
            "Machine CIDR", machine, &network.machine_cidr,
            "service CIDR", service, &network.service_cidr,
        );
        check(
            "Machine CIDR", machine, &network.machine_cidr,
            "pod CIDR", pod, &network.pod_cidr,
        );
        check(
            "Service CIDR", service, &network.service_cidr,
            "pod CIDR", pod, &network.pod_cidr,
        );

        errs
    }

    fn validate_managed_resource_group(&self, cluster_rid: &ResourceId) -> Vec<CloudErrorBody> {
        let managed = &self.properties.platform.managed_resource_group;
        if !managed.is_empty() && managed.eq_ignore_ascii_case(&cluster_rid.resource_group) {
            vec![CloudErrorBody::invalid_request_content(
                "Managed resource group name must not be the cluster's resource group name",
                "properties.platform.managedResourceGroup",
            )]
        } else {
            Vec::new()
        }
    }

    fn validate_subnet_id(&self, cluster_rid: &ResourceId) -> Vec<CloudErrorBody> {
        let mut errs = Vec::new();
        let platform = &self.properties.platform;

        let Ok(subnet_rid) = ResourceId::parse(&platform.subnet_id) else {
            return errs;
        };

        if !subnet_rid
            .subscription_id
            .eq_ignore_ascii_case(&cluster_rid.subscription_id)
        {
            errs.push(CloudErrorBody::invalid_request_content(
                format!(
                    "Subnet '{}' must be in the same subscription as the cluster",
                    platform.subnet_id
                ),
                "properties.platform.subnetId",
            ));
        }

        if !platform.managed_resource_group.is_empty()
            && subnet_rid
                .resource_group
                .eq_ignore_ascii_case(&platform.managed_resource_group)
        {
            errs.push(CloudErrorBody::invalid_request_content(
                format!(
                    "Subnet '{}' cannot be in the managed resource group '{}'",
                    platform.subnet_id, platform.managed_resource_group
                ),
                "properties.platform.subnetId",
            ));
        }

        errs
    }

    fn validate_identity_placement(
        &self,
        cluster_rid: &ResourceId,
        identity: &str,
        target: &str,
    ) -> Vec<CloudErrorBody> {
        let mut errs = Vec::new();
        let platform = &self.properties.platform;

        let Ok(identity_rid) = ResourceId::parse(identity) else {
            return errs;
        };

        if !identity_rid
            .subscription_id
            .eq_ignore_ascii_case(&cluster_rid.subscription_id)
        {
            errs.push(CloudErrorBody::invalid_request_content(
                format!("Identity '{identity}' must be in the same subscription as the cluster"),
                target,
            ));
        }

        if !platform.managed_resource_group.is_empty()
            && identity_rid
                .resource_group
                .eq_ignore_ascii_case(&platform.managed_resource_group)
        {
            errs.push(CloudErrorBody::invalid_request_content(
                format!(
                    "Identity '{identity}' cannot be in the managed resource group '{}'",
                    platform.managed_resource_group
                ),
                target,
            ));
        }

        errs
    }

    /// Consistency between the operator reference sites and the assigned
    /// identity set. Every assigned identity must be referenced exactly once
    /// by a control plane operator slot or the service managed identity;
    /// data plane operator identities must stay out of the assigned set.
    fn validate_user_assigned_identities(
        &self,
        cluster_rid: Option<&ResourceId>,
    ) -> Vec<CloudErrorBody> {
        let mut errs = Vec::new();
        let operators = &self
            .properties
            .platform
            .operators_authentication
            .user_assigned_identities;
        let service_identity = &operators.service_managed_identity;

        if let Some(rid) = cluster_rid {
            for (name, identity) in &operators.control_plane_operators {
                errs.extend(self.validate_identity_placement(
                    rid,
                    identity,
                    &operator_target("controlPlaneOperators", name),
                ));
            }
            for (name, identity) in &operators.data_plane_operators {
                errs.extend(self.validate_identity_placement(
                    rid,
                    identity,
                    &operator_target("dataPlaneOperators", name),
                ));
            }
            if !service_identity.is_empty() {
                errs.extend(self.validate_identity_placement(
                    rid,
                    service_identity,
                    &format!("{IDENTITIES_TARGET}.serviceManagedIdentity"),
                ));
            }
        }

        // Resource IDs are case-insensitive, and casing is not guaranteed to
        // be consistent even within one resource.
        let assigned: BTreeMap<String, &String> = self
            .identity
            .user_assigned_identities
            .keys()
            .map(|key| (key.to_ascii_lowercase(), key))
            .collect();

        let mut sites: Vec<(&String, String)> = operators
            .control_plane_operators
            .iter()
            .map(|(name, identity)| (identity, operator_target("controlPlaneOperators", name)))
            .collect();
        if !service_identity.is_empty() {
            sites.push((
                service_identity,
                format!("{IDENTITIES_TARGET}.serviceManagedIdentity"),
            ));
        }

        let mut tally: BTreeMap<String, u32> = BTreeMap::new();
        for (identity, _) in &sites {
            *tally.entry(identity.to_ascii_lowercase()).or_insert(0) += 1;
        }

        for (identity, target) in &sites {
            let key = identity.to_ascii_lowercase();
            if !assigned.contains_key(&key) {
                errs.push(CloudErrorBody::invalid_request_content(
                    format!("Identity '{identity}' is not assigned to this resource"),
                    target,
                ));
            } else if tally.get(&key).copied().unwrap_or(0) > 1 {
                errs.push(CloudErrorBody::invalid_request_content(
                    format!("Identity '{identity}' is used multiple times"),
                    target,
                ));
            }
        }

        for (key, identity) in &assigned {
            if !tally.contains_key(key) {
                errs.push(CloudErrorBody::invalid_request_content(
                    format!("Identity '{identity}' is assigned to this resource but not used"),
                    "identity.userAssignedIdentities",
                ));
            }
        }

        for (name, identity) in &operators.data_plane_operators {
            if assigned.contains_key(&identity.to_ascii_lowercase()) {
                errs.push(CloudErrorBody::invalid_request_content(
                    format!("Data plane operator '{name}' cannot use identity assigned to this resource"),
                    &operator_target("dataPlaneOperators", name),
                ));
            }
        }

        errs
    }
}

const IDENTITIES_TARGET: &str =
    "properties.platform.operatorsAuthentication.userAssignedIdentities";

fn operator_target(map_name: &str, operator_name: &str) -> String {
    format!("{IDENTITIES_TARGET}.{map_name}[{operator_name}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::UserAssignedIdentity;

    const CLUSTER_ID: &str = "/subscriptions/sub-1/resourceGroups/cluster-rg/providers/Microsoft.RedHatOpenShift/hcpOpenShiftClusters/my-cluster";

    fn identity_id(name: &str) -> String {
        format!(
            "/subscriptions/sub-1/resourceGroups/id-rg/providers/Microsoft.ManagedIdentity/userAssignedIdentities/{name}"
        )
    }

    fn valid_cluster() -> HcpOpenShiftCluster {
        let mut cluster = new_default_hcp_cluster();
        cluster.tracked.id = CLUSTER_ID.to_string();
        cluster.tracked.name = "my-cluster".to_string();
        cluster.tracked.resource_type =
            "Microsoft.RedHatOpenShift/hcpOpenShiftClusters".to_string();
        cluster.tracked.location = "eastus".to_string();
        cluster.properties.platform.subnet_id = "/subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/node-subnet".to_string();
        cluster.properties.platform.network_security_group_id = "/subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/networkSecurityGroups/nsg".to_string();
        cluster
    }

    fn assign(cluster: &mut HcpOpenShiftCluster, identity: &str) {
        cluster
            .identity
            .user_assigned_identities
            .insert(identity.to_string(), UserAssignedIdentity::default());
    }

    #[test]
    fn defaults_carry_documented_values() {
        let cluster = new_default_hcp_cluster();
        assert_eq!(cluster.properties.version.channel_group, "stable");
        assert_eq!(cluster.properties.network.network_type, "OVNKubernetes");
        assert_eq!(cluster.properties.network.pod_cidr, "10.128.0.0/14");
        assert_eq!(cluster.properties.network.service_cidr, "172.30.0.0/16");
        assert_eq!(cluster.properties.network.machine_cidr, "10.0.0.0/16");
        assert_eq!(cluster.properties.network.host_prefix, 23);
        assert_eq!(cluster.properties.api.visibility, "Public");
        assert_eq!(cluster.properties.platform.outbound_type, "LoadBalancer");
        assert_eq!(cluster.properties.autoscaling.max_pod_grace_period_seconds, 600);
        assert_eq!(
            cluster.properties.autoscaling.max_node_provision_time_seconds,
            900
        );
        assert_eq!(cluster.properties.autoscaling.pod_priority_threshold, -10);
    }

    #[test]
    fn valid_cluster_is_clean() {
        let cluster = valid_cluster();
        assert_eq!(cluster.validate_syntax(), Vec::new());
        assert_eq!(cluster.validate_complex(), Vec::new());
    }

    #[test]
    fn syntax_errors_are_field_scoped_and_aggregated() {
        let mut cluster = valid_cluster();
        cluster.properties.network.pod_cidr = "not-a-cidr".to_string();
        cluster.properties.api.visibility = "Both".to_string();
        cluster.properties.dns.base_domain_prefix = "Bad_Prefix".to_string();

        let mut targets: Vec<String> = cluster
            .validate_syntax()
            .into_iter()
            .map(|e| e.target)
            .collect();
        targets.sort();
        assert_eq!(
            targets,
            vec![
                "properties.api.visibility",
                "properties.dns.baseDomainPrefix",
                "properties.network.podCidr",
            ]
        );
    }

    #[test]
    fn subnet_id_is_required() {
        let mut cluster = valid_cluster();
        cluster.properties.platform.subnet_id.clear();
        let errs = cluster.validate_syntax();
        assert!(errs
            .iter()
            .any(|e| e.target == "properties.platform.subnetId"
                && e.message.contains("Missing required field")));
    }

    #[test]
    fn version_must_be_major_minor_on_stable() {
        let mut cluster = valid_cluster();
        cluster.properties.version.id = "4.18.3".to_string();
        cluster.properties.version.channel_group = "candidate".to_string();

        let errs = cluster.validate_complex();
        assert_eq!(errs.len(), 2);
        assert!(errs[0].message.contains("MAJOR.MINOR"));
        assert_eq!(errs[1].message, "Channel group must be 'stable'");
        assert_eq!(errs[1].target, "properties.version.channelGroup");
    }

    #[test]
    fn overlapping_cidrs_are_reported_pairwise() {
        let mut cluster = valid_cluster();
        cluster.properties.network.machine_cidr = "10.128.0.0/16".to_string();

        let errs = cluster.validate_complex();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].target, "properties.network");
        assert!(errs[0]
            .message
            .contains("Machine CIDR '10.128.0.0/16' and pod CIDR '10.128.0.0/14' overlap"));
    }

    #[test]
    fn managed_resource_group_must_differ() {
        let mut cluster = valid_cluster();
        cluster.properties.platform.managed_resource_group = "Cluster-RG".to_string();

        let errs = cluster.validate_complex();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].target, "properties.platform.managedResourceGroup");
    }

    #[test]
    fn subnet_must_share_subscription_and_avoid_managed_rg() {
        let mut cluster = valid_cluster();
        cluster.properties.platform.subnet_id = "/subscriptions/other-sub/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/s".to_string();
        let errs = cluster.validate_complex();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("same subscription"));

        let mut cluster = valid_cluster();
        cluster.properties.platform.managed_resource_group = "net-rg".to_string();
        let errs = cluster.validate_complex();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("managed resource group"));
    }

    #[test]
    fn identity_set_matching_sites_is_clean() {
        let mut cluster = valid_cluster();
        let (a, b) = (identity_id("a"), identity_id("b"));
        cluster
            .properties
            .platform
            .operators_authentication
            .user_assigned_identities
            .control_plane_operators
            .insert("op-x".to_string(), a.clone());
        cluster
            .properties
            .platform
            .operators_authentication
            .user_assigned_identities
            .service_managed_identity = b.clone();
        assign(&mut cluster, &a);
        assign(&mut cluster, &b);

        assert_eq!(cluster.validate_complex(), Vec::new());
    }

    #[test]
    fn unreferenced_and_unassigned_identities_are_reported() {
        let mut cluster = valid_cluster();
        let (a, b) = (identity_id("a"), identity_id("b"));
        cluster
            .properties
            .platform
            .operators_authentication
            .user_assigned_identities
            .service_managed_identity = b.clone();
        assign(&mut cluster, &a);

        let mut errs = cluster.validate_complex();
        errs.sort_by(|x, y| x.target.cmp(&y.target));
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].target, "identity.userAssignedIdentities");
        assert!(errs[0]
            .message
            .contains("is assigned to this resource but not used"));
        assert!(errs[1].message.contains("is not assigned to this resource"));
        assert!(errs[1].target.ends_with("serviceManagedIdentity"));
    }

    #[test]
    fn multiply_used_identity_errors_once_per_site() {
        let mut cluster = valid_cluster();
        let a = identity_id("a");
        let operators = &mut cluster
            .properties
            .platform
            .operators_authentication
            .user_assigned_identities;
        operators
            .control_plane_operators
            .insert("op-x".to_string(), a.clone());
        operators
            .control_plane_operators
            .insert("op-y".to_string(), a.clone());
        operators.service_managed_identity = a.clone();
        assign(&mut cluster, &a);

        let errs = cluster.validate_complex();
        assert_eq!(errs.len(), 3);
        assert!(errs
            .iter()
            .all(|e| e.message.contains("is used multiple times")));
        let targets: Vec<&str> = errs.iter().map(|e| e.target.as_str()).collect();
        assert!(targets.iter().any(|t| t.contains("controlPlaneOperators[op-x]")));
        assert!(targets.iter().any(|t| t.contains("controlPlaneOperators[op-y]")));
        assert!(targets.iter().any(|t| t.ends_with("serviceManagedIdentity")));
    }

    #[test]
    fn identity_comparison_is_case_insensitive() {
        let mut cluster = valid_cluster();
        let a = identity_id("a");
        cluster
            .properties
            .platform
            .operators_authentication
            .user_assigned_identities
            .service_managed_identity = a.to_ascii_uppercase();
        assign(&mut cluster, &a);

        assert_eq!(cluster.validate_complex(), Vec::new());
    }

    #[test]
    fn data_plane_identity_must_not_be_assigned() {
        let mut cluster = valid_cluster();
        let a = identity_id("a");
        cluster
            .properties
            .platform
            .operators_authentication
            .user_assigned_identities
            .data_plane_operators
            .insert("dp-op".to_string(), a.clone());
        assign(&mut cluster, &a);

        let mut errs = cluster.validate_complex();
        errs.sort_by(|x, y| x.target.cmp(&y.target));
        assert_eq!(errs.len(), 2);
        assert!(errs[0]
            .message
            .contains("is assigned to this resource but not used"));
        assert!(errs[1]
            .message
            .contains("Data plane operator 'dp-op' cannot use identity assigned to this resource"));
    }

    #[test]
    fn canonical_serde_round_trip() {
        let cluster = valid_cluster();
        let json = serde_json::to_value(&cluster).unwrap();
        let back: HcpOpenShiftCluster = serde_json::from_value(json).unwrap();
        assert_eq!(back, cluster);
    }
}
