//! The `2025-12-22-preview` wire contract.
//!
//! Current version: serves all three resource kinds. Each kind has a typed
//! wire shape (every scalar optional, so presence is distinguishable from a
//! zero value), a visibility table, and a [`ResourceContract`] running the
//! write pipeline: decode, visibility enforcement, normalization, syntactic
//! and cross-field validation.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cluster::{new_default_hcp_cluster, HcpOpenShiftCluster};
use crate::error::CloudError;
use crate::external_auth::{
    new_default_external_auth, ExternalAuthClientComponentProfile, ExternalAuthClientProfile,
    GroupClaimProfile, HcpOpenShiftClusterExternalAuth, TokenClaimValidationRule,
    TokenRequiredClaim,
};
use crate::node_pool::{new_default_node_pool, HcpOpenShiftClusterNodePool, Taint};
use crate::registry::{ApiVersion, ResourceContract};
use crate::visibility::{enforce, FieldTree, VisibilityFlags, VisibilityTable};

pub const API_VERSION: &str = "2025-12-22-preview";

const R: VisibilityFlags = VisibilityFlags::READ;
const RC: VisibilityFlags = VisibilityFlags::READ.union(VisibilityFlags::CREATE);

pub struct Version;

impl ApiVersion for Version {
    fn version(&self) -> &'static str {
        API_VERSION
    }

    fn cluster(&self) -> &dyn ResourceContract<HcpOpenShiftCluster> {
        &ClusterContract
    }

    fn node_pool(&self) -> Option<&dyn ResourceContract<HcpOpenShiftClusterNodePool>> {
        Some(&NodePoolContract)
    }

    fn external_auth(&self) -> Option<&dyn ResourceContract<HcpOpenShiftClusterExternalAuth>> {
        Some(&ExternalAuthContract)
    }
}

// ---------------------------------------------------------------------------
// Visibility tables

fn system_data_fields() -> FieldTree {
    FieldTree::annotated("systemData", R).with_children(vec![
        FieldTree::inherited("createdBy"),
        FieldTree::inherited("createdByType"),
        FieldTree::inherited("createdAt"),
        FieldTree::inherited("lastModifiedBy"),
        FieldTree::inherited("lastModifiedByType"),
        FieldTree::inherited("lastModifiedAt"),
    ])
}

fn tracked_resource_fields() -> Vec<FieldTree> {
    vec![
        FieldTree::annotated("id", R),
        FieldTree::annotated("name", R),
        FieldTree::annotated("type", R),
        system_data_fields(),
        FieldTree::annotated("location", RC),
        FieldTree::inherited("tags"),
    ]
}

/// Field declarations for the cluster kind. The legacy version builds its
/// table from the same declarations and narrows individual paths.
pub(crate) fn cluster_fields() -> Vec<FieldTree> {
    let mut fields = tracked_resource_fields();
    fields.push(FieldTree::inherited("identity").with_children(vec![
        FieldTree::inherited("type"),
        FieldTree::annotated("principalId", R),
        FieldTree::annotated("tenantId", R),
        FieldTree::inherited("userAssignedIdentities").with_children(vec![
            FieldTree::annotated("clientId", R),
            FieldTree::annotated("principalId", R),
        ]),
    ]));
    fields.push(FieldTree::inherited("properties").with_children(vec![
        FieldTree::annotated("provisioningState", R),
        FieldTree::inherited("version").with_children(vec![
            FieldTree::annotated("id", RC),
            FieldTree::inherited("channelGroup"),
            FieldTree::annotated("availableUpgrades", R),
        ]),
        FieldTree::inherited("dns").with_children(vec![
            FieldTree::annotated("baseDomain", R),
            FieldTree::annotated("baseDomainPrefix", RC),
        ]),
        FieldTree::annotated("network", RC).with_children(vec![
            FieldTree::inherited("networkType"),
            FieldTree::inherited("podCidr"),
            FieldTree::inherited("serviceCidr"),
            FieldTree::inherited("machineCidr"),
            FieldTree::inherited("hostPrefix"),
        ]),
        FieldTree::annotated("console", R).with_children(vec![FieldTree::inherited("url")]),
        FieldTree::inherited("api").with_children(vec![
            FieldTree::annotated("url", R),
            FieldTree::annotated("visibility", RC),
        ]),
        FieldTree::annotated("platform", RC).with_children(vec![
            FieldTree::inherited("managedResourceGroup"),
            FieldTree::inherited("subnetId"),
            FieldTree::inherited("outboundType"),
            FieldTree::inherited("networkSecurityGroupId"),
            FieldTree::inherited("operatorsAuthentication").with_children(vec![
                FieldTree::inherited("userAssignedIdentities").with_children(vec![
                    FieldTree::inherited("controlPlaneOperators"),
                    FieldTree::inherited("dataPlaneOperators"),
                    FieldTree::inherited("serviceManagedIdentity"),
                ]),
            ]),
            FieldTree::annotated("issuerUrl", R),
        ]),
        FieldTree::inherited("autoscaling").with_children(vec![
            FieldTree::inherited("maxNodesTotal"),
            FieldTree::inherited("maxPodGracePeriodSeconds"),
            FieldTree::inherited("maxNodeProvisionTimeSeconds"),
            FieldTree::inherited("podPriorityThreshold"),
        ]),
        FieldTree::inherited("nodeDrainTimeoutMinutes"),
    ]));
    fields
}

fn cluster_table() -> &'static VisibilityTable {
    static TABLE: OnceLock<VisibilityTable> = OnceLock::new();
    TABLE.get_or_init(|| VisibilityTable::build(&cluster_fields()))
}

fn node_pool_table() -> &'static VisibilityTable {
    static TABLE: OnceLock<VisibilityTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut fields = tracked_resource_fields();
        fields.push(FieldTree::inherited("properties").with_children(vec![
            FieldTree::annotated("provisioningState", R),
            FieldTree::inherited("version").with_children(vec![
                FieldTree::inherited("id"),
                FieldTree::inherited("channelGroup"),
            ]),
            FieldTree::annotated("platform", RC).with_children(vec![
                FieldTree::inherited("subnetId"),
                FieldTree::inherited("vmSize"),
                FieldTree::inherited("enableEncryptionAtHost"),
                FieldTree::inherited("osDisk").with_children(vec![
                    FieldTree::inherited("sizeGiB"),
                    FieldTree::inherited("diskStorageAccountType"),
                    FieldTree::inherited("encryptionSetId"),
                ]),
                FieldTree::inherited("availabilityZone"),
            ]),
            FieldTree::inherited("replicas"),
            FieldTree::annotated("autoRepair", RC),
            FieldTree::inherited("autoScaling").with_children(vec![
                FieldTree::inherited("min"),
                FieldTree::inherited("max"),
            ]),
            FieldTree::inherited("labels"),
            FieldTree::inherited("taints").with_children(vec![
                FieldTree::inherited("effect"),
                FieldTree::inherited("key"),
                FieldTree::inherited("value"),
            ]),
            FieldTree::inherited("nodeDrainTimeoutMinutes"),
        ]));
        VisibilityTable::build(&fields)
    })
}

fn external_auth_table() -> &'static VisibilityTable {
    static TABLE: OnceLock<VisibilityTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        VisibilityTable::build(&[
            FieldTree::annotated("id", R),
            FieldTree::annotated("name", R),
            FieldTree::annotated("type", R),
            system_data_fields(),
            FieldTree::inherited("properties").with_children(vec![
                FieldTree::annotated("provisioningState", R),
                FieldTree::annotated("condition", R).with_children(vec![
                    FieldTree::inherited("type"),
                    FieldTree::inherited("status"),
                    FieldTree::inherited("lastTransitionTime"),
                    FieldTree::inherited("reason"),
                    FieldTree::inherited("message"),
                ]),
                FieldTree::inherited("issuer").with_children(vec![
                    FieldTree::inherited("url"),
                    FieldTree::inherited("audiences"),
                    FieldTree::inherited("ca"),
                ]),
                FieldTree::inherited("clients").with_children(vec![
                    FieldTree::inherited("component").with_children(vec![
                        FieldTree::inherited("name"),
                        FieldTree::inherited("authClientNamespace"),
                    ]),
                    FieldTree::inherited("clientId"),
                    FieldTree::inherited("extraScopes"),
                    FieldTree::inherited("type"),
                ]),
                FieldTree::inherited("claim").with_children(vec![
                    FieldTree::inherited("mappings").with_children(vec![
                        FieldTree::inherited("username").with_children(vec![
                            FieldTree::inherited("claim"),
                            FieldTree::inherited("prefix"),
                            FieldTree::inherited("prefixPolicy"),
                        ]),
                        FieldTree::inherited("groups").with_children(vec![
                            FieldTree::inherited("claim"),
                            FieldTree::inherited("prefix"),
                        ]),
                    ]),
                    FieldTree::inherited("validationRules").with_children(vec![
                        FieldTree::inherited("type"),
                        FieldTree::inherited("requiredClaim").with_children(vec![
                            FieldTree::inherited("claim"),
                            FieldTree::inherited("requiredValue"),
                        ]),
                    ]),
                ]),
            ]),
        ])
    })
}

// ---------------------------------------------------------------------------
// Wire shapes

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SystemDataWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified_by_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified_at: Option<String>,
}

fn system_data_to_wire(sd: &crate::resource::SystemData) -> SystemDataWire {
    SystemDataWire {
        created_by: Some(sd.created_by.clone()),
        created_by_type: Some(sd.created_by_type.clone()),
        created_at: Some(sd.created_at.clone()),
        last_modified_by: Some(sd.last_modified_by.clone()),
        last_modified_by_type: Some(sd.last_modified_by_type.clone()),
        last_modified_at: Some(sd.last_modified_at.clone()),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IdentityWire {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    identity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    principal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_assigned_identities: Option<BTreeMap<String, UserAssignedIdentityWire>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserAssignedIdentityWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    principal_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ClusterWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_data: Option<SystemDataWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<IdentityWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) properties: Option<ClusterPropertiesWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ClusterPropertiesWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    provisioning_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<ClusterVersionWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dns: Option<DnsWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<NetworkWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    console: Option<ConsoleWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api: Option<ApiWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<PlatformWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) autoscaling: Option<AutoscalingWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) node_drain_timeout_minutes: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClusterVersionWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_upgrades: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DnsWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_domain_prefix: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NetworkWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    network_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pod_cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    machine_cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host_prefix: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConsoleWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ApiWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlatformWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    managed_resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outbound_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network_security_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operators_authentication: Option<OperatorsAuthenticationWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issuer_url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OperatorsAuthenticationWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_assigned_identities: Option<OperatorIdentitiesWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OperatorIdentitiesWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    control_plane_operators: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_plane_operators: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_managed_identity: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AutoscalingWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_nodes_total: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_pod_grace_period_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_node_provision_time_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pod_priority_threshold: Option<i32>,
}

pub(crate) fn cluster_to_wire(cluster: &HcpOpenShiftCluster) -> ClusterWire {
    let p = &cluster.properties;
    let operators = &p.platform.operators_authentication.user_assigned_identities;
    ClusterWire {
        id: Some(cluster.tracked.id.clone()),
        name: Some(cluster.tracked.name.clone()),
        resource_type: Some(cluster.tracked.resource_type.clone()),
        system_data: cluster.tracked.system_data.as_ref().map(system_data_to_wire),
        location: Some(cluster.tracked.location.clone()),
        tags: Some(cluster.tracked.tags.clone()),
        identity: Some(IdentityWire {
            identity_type: Some(cluster.identity.identity_type.clone()),
            principal_id: Some(cluster.identity.principal_id.clone()),
            tenant_id: Some(cluster.identity.tenant_id.clone()),
            user_assigned_identities: Some(
                cluster
                    .identity
                    .user_assigned_identities
                    .iter()
                    .map(|(key, value)| {
                        (
                            key.clone(),
                            UserAssignedIdentityWire {
                                client_id: Some(value.client_id.clone()),
                                principal_id: Some(value.principal_id.clone()),
                            },
                        )
                    })
                    .collect(),
            ),
        }),
        properties: Some(ClusterPropertiesWire {
            provisioning_state: Some(p.provisioning_state.clone()),
            version: Some(ClusterVersionWire {
                id: Some(p.version.id.clone()),
                channel_group: Some(p.version.channel_group.clone()),
                available_upgrades: Some(p.version.available_upgrades.clone()),
            }),
            dns: Some(DnsWire {
                base_domain: Some(p.dns.base_domain.clone()),
                base_domain_prefix: Some(p.dns.base_domain_prefix.clone()),
            }),
            network: Some(NetworkWire {
                network_type: Some(p.network.network_type.clone()),
                pod_cidr: Some(p.network.pod_cidr.clone()),
                service_cidr: Some(p.network.service_cidr.clone()),
                machine_cidr: Some(p.network.machine_cidr.clone()),
                host_prefix: Some(p.network.host_prefix),
            }),
            console: Some(ConsoleWire {
                url: Some(p.console.url.clone()),
            }),
            api: Some(ApiWire {
                url: Some(p.api.url.clone()),
                visibility: Some(p.api.visibility.clone()),
            }),
            platform: Some(PlatformWire {
                managed_resource_group: Some(p.platform.managed_resource_group.clone()),
                subnet_id: Some(p.platform.subnet_id.clone()),
                outbound_type: Some(p.platform.outbound_type.clone()),
                network_security_group_id: Some(p.platform.network_security_group_id.clone()),
                operators_authentication: Some(OperatorsAuthenticationWire {
                    user_assigned_identities: Some(OperatorIdentitiesWire {
                        control_plane_operators: Some(operators.control_plane_operators.clone()),
                        data_plane_operators: Some(operators.data_plane_operators.clone()),
                        service_managed_identity: Some(operators.service_managed_identity.clone()),
                    }),
                }),
                issuer_url: Some(p.platform.issuer_url.clone()),
            }),
            autoscaling: Some(AutoscalingWire {
                max_nodes_total: Some(p.autoscaling.max_nodes_total),
                max_pod_grace_period_seconds: Some(p.autoscaling.max_pod_grace_period_seconds),
                max_node_provision_time_seconds: Some(
                    p.autoscaling.max_node_provision_time_seconds,
                ),
                pod_priority_threshold: Some(p.autoscaling.pod_priority_threshold),
            }),
            node_drain_timeout_minutes: Some(p.node_drain_timeout_minutes),
        }),
    }
}

/// Copy everything the request supplied into the canonical resource.
///
/// Collection policies: `tags` wholesale-replaces even when absent (the
/// patch contract defines tags as whole-collection replacement); the
/// operator maps and `identity.userAssignedIdentities` merge by key;
/// every other list or map replaces only when present.
pub(crate) fn normalize_cluster(wire: ClusterWire, out: &mut HcpOpenShiftCluster) {
    if let Some(v) = wire.id {
        out.tracked.id = v;
    }
    if let Some(v) = wire.name {
        out.tracked.name = v;
    }
    if let Some(v) = wire.resource_type {
        out.tracked.resource_type = v;
    }
    if let Some(v) = wire.location {
        out.tracked.location = v;
    }
    out.tracked.tags = wire.tags.unwrap_or_default();

    if let Some(identity) = wire.identity {
        if let Some(v) = identity.identity_type {
            out.identity.identity_type = v;
        }
        if let Some(v) = identity.principal_id {
            out.identity.principal_id = v;
        }
        if let Some(v) = identity.tenant_id {
            out.identity.tenant_id = v;
        }
        if let Some(map) = identity.user_assigned_identities {
            for (key, value) in map {
                let entry = out.identity.user_assigned_identities.entry(key).or_default();
                if let Some(v) = value.client_id {
                    entry.client_id = v;
                }
                if let Some(v) = value.principal_id {
                    entry.principal_id = v;
                }
            }
        }
    }

    let Some(properties) = wire.properties else {
        return;
    };
    if let Some(v) = properties.provisioning_state {
        out.properties.provisioning_state = v;
    }
    if let Some(version) = properties.version {
        if let Some(v) = version.id {
            out.properties.version.id = v;
        }
        if let Some(v) = version.channel_group {
            out.properties.version.channel_group = v;
        }
        if let Some(v) = version.available_upgrades {
            out.properties.version.available_upgrades = v;
        }
    }
    if let Some(dns) = properties.dns {
        if let Some(v) = dns.base_domain {
            out.properties.dns.base_domain = v;
        }
        if let Some(v) = dns.base_domain_prefix {
            out.properties.dns.base_domain_prefix = v;
        }
    }
    if let Some(network) = properties.network {
        if let Some(v) = network.network_type {
            out.properties.network.network_type = v;
        }
        if let Some(v) = network.pod_cidr {
            out.properties.network.pod_cidr = v;
        }
        if let Some(v) = network.service_cidr {
            out.properties.network.service_cidr = v;
        }
        if let Some(v) = network.machine_cidr {
            out.properties.network.machine_cidr = v;
        }
        if let Some(v) = network.host_prefix {
            out.properties.network.host_prefix = v;
        }
    }
    if let Some(console) = properties.console {
        if let Some(v) = console.url {
            out.properties.console.url = v;
        }
    }
    if let Some(api) = properties.api {
        if let Some(v) = api.url {
            out.properties.api.url = v;
        }
        if let Some(v) = api.visibility {
            out.properties.api.visibility = v;
        }
    }
    if let Some(platform) = properties.platform {
        if let Some(v) = platform.managed_resource_group {
            out.properties.platform.managed_resource_group = v;
        }
        if let Some(v) = platform.subnet_id {
            out.properties.platform.subnet_id = v;
        }
        if let Some(v) = platform.outbound_type {
            out.properties.platform.outbound_type = v;
        }
        if let Some(v) = platform.network_security_group_id {
            out.properties.platform.network_security_group_id = v;
        }
        if let Some(auth) = platform.operators_authentication {
            if let Some(identities) = auth.user_assigned_identities {
                let target = &mut out
                    .properties
                    .platform
                    .operators_authentication
                    .user_assigned_identities;
                if let Some(map) = identities.control_plane_operators {
                    target.control_plane_operators.extend(map);
                }
                if let Some(map) = identities.data_plane_operators {
                    target.data_plane_operators.extend(map);
                }
                if let Some(v) = identities.service_managed_identity {
                    target.service_managed_identity = v;
                }
            }
        }
        if let Some(v) = platform.issuer_url {
            out.properties.platform.issuer_url = v;
        }
    }
    if let Some(autoscaling) = properties.autoscaling {
        if let Some(v) = autoscaling.max_nodes_total {
            out.properties.autoscaling.max_nodes_total = v;
        }
        if let Some(v) = autoscaling.max_pod_grace_period_seconds {
            out.properties.autoscaling.max_pod_grace_period_seconds = v;
        }
        if let Some(v) = autoscaling.max_node_provision_time_seconds {
            out.properties.autoscaling.max_node_provision_time_seconds = v;
        }
        if let Some(v) = autoscaling.pod_priority_threshold {
            out.properties.autoscaling.pod_priority_threshold = v;
        }
    }
    if let Some(v) = properties.node_drain_timeout_minutes {
        out.properties.node_drain_timeout_minutes = v;
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NodePoolWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_data: Option<SystemDataWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<NodePoolPropertiesWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NodePoolPropertiesWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    provisioning_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<NodePoolVersionWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<NodePoolPlatformWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_repair: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_scaling: Option<AutoScalingWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taints: Option<Vec<TaintWire>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    node_drain_timeout_minutes: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NodePoolVersionWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_group: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NodePoolPlatformWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vm_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_encryption_at_host: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    os_disk: Option<OsDiskWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    availability_zone: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OsDiskWire {
    #[serde(rename = "sizeGiB", skip_serializing_if = "Option::is_none")]
    size_gib: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_storage_account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encryption_set_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AutoScalingWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TaintWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

fn node_pool_to_wire(pool: &HcpOpenShiftClusterNodePool) -> NodePoolWire {
    let p = &pool.properties;
    NodePoolWire {
        id: Some(pool.tracked.id.clone()),
        name: Some(pool.tracked.name.clone()),
        resource_type: Some(pool.tracked.resource_type.clone()),
        system_data: pool.tracked.system_data.as_ref().map(system_data_to_wire),
        location: Some(pool.tracked.location.clone()),
        tags: Some(pool.tracked.tags.clone()),
        properties: Some(NodePoolPropertiesWire {
            provisioning_state: Some(p.provisioning_state.clone()),
            version: Some(NodePoolVersionWire {
                id: Some(p.version.id.clone()),
                channel_group: Some(p.version.channel_group.clone()),
            }),
            platform: Some(NodePoolPlatformWire {
                subnet_id: Some(p.platform.subnet_id.clone()),
                vm_size: Some(p.platform.vm_size.clone()),
                enable_encryption_at_host: Some(p.platform.enable_encryption_at_host),
                os_disk: Some(OsDiskWire {
                    size_gib: Some(p.platform.os_disk.size_gib),
                    disk_storage_account_type: Some(
                        p.platform.os_disk.disk_storage_account_type.clone(),
                    ),
                    encryption_set_id: Some(p.platform.os_disk.encryption_set_id.clone()),
                }),
                availability_zone: Some(p.platform.availability_zone.clone()),
            }),
            replicas: Some(p.replicas),
            auto_repair: Some(p.auto_repair),
            auto_scaling: p.auto_scaling.as_ref().map(|scaling| AutoScalingWire {
                min: Some(scaling.min),
                max: Some(scaling.max),
            }),
            labels: Some(p.labels.clone()),
            taints: Some(
                p.taints
                    .iter()
                    .map(|taint| TaintWire {
                        effect: Some(taint.effect.clone()),
                        key: Some(taint.key.clone()),
                        value: Some(taint.value.clone()),
                    })
                    .collect(),
            ),
            node_drain_timeout_minutes: Some(p.node_drain_timeout_minutes),
        }),
    }
}

fn normalize_node_pool(wire: NodePoolWire, out: &mut HcpOpenShiftClusterNodePool) {
    if let Some(v) = wire.id {
        out.tracked.id = v;
    }
    if let Some(v) = wire.name {
        out.tracked.name = v;
    }
    if let Some(v) = wire.resource_type {
        out.tracked.resource_type = v;
    }
    if let Some(v) = wire.location {
        out.tracked.location = v;
    }
    out.tracked.tags = wire.tags.unwrap_or_default();

    let Some(properties) = wire.properties else {
        return;
    };
    if let Some(v) = properties.provisioning_state {
        out.properties.provisioning_state = v;
    }
    if let Some(version) = properties.version {
        if let Some(v) = version.id {
            out.properties.version.id = v;
        }
        if let Some(v) = version.channel_group {
            out.properties.version.channel_group = v;
        }
    }
    if let Some(platform) = properties.platform {
        if let Some(v) = platform.subnet_id {
            out.properties.platform.subnet_id = v;
        }
        if let Some(v) = platform.vm_size {
            out.properties.platform.vm_size = v;
        }
        if let Some(v) = platform.enable_encryption_at_host {
            out.properties.platform.enable_encryption_at_host = v;
        }
        if let Some(os_disk) = platform.os_disk {
            if let Some(v) = os_disk.size_gib {
                out.properties.platform.os_disk.size_gib = v;
            }
            if let Some(v) = os_disk.disk_storage_account_type {
                out.properties.platform.os_disk.disk_storage_account_type = v;
            }
            if let Some(v) = os_disk.encryption_set_id {
                out.properties.platform.os_disk.encryption_set_id = v;
            }
        }
        if let Some(v) = platform.availability_zone {
            out.properties.platform.availability_zone = v;
        }
    }
    if let Some(v) = properties.replicas {
        out.properties.replicas = v;
    }
    if let Some(v) = properties.auto_repair {
        out.properties.auto_repair = v;
    }
    if let Some(scaling) = properties.auto_scaling {
        let mut target = out.properties.auto_scaling.take().unwrap_or_default();
        if let Some(v) = scaling.min {
            target.min = v;
        }
        if let Some(v) = scaling.max {
            target.max = v;
        }
        out.properties.auto_scaling = Some(target);
    }
    if let Some(labels) = properties.labels {
        out.properties.labels = labels;
    }
    if let Some(taints) = properties.taints {
        out.properties.taints = taints
            .into_iter()
            .map(|taint| Taint {
                effect: taint.effect.unwrap_or_default(),
                key: taint.key.unwrap_or_default(),
                value: taint.value.unwrap_or_default(),
            })
            .collect();
    }
    if let Some(v) = properties.node_drain_timeout_minutes {
        out.properties.node_drain_timeout_minutes = v;
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExternalAuthWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_data: Option<SystemDataWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<ExternalAuthPropertiesWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExternalAuthPropertiesWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    provisioning_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<ConditionWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issuer: Option<IssuerWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clients: Option<Vec<ClientWire>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<ClaimWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConditionWire {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    condition_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_transition_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IssuerWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audiences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ca: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClientWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<ComponentWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_scopes: Option<Vec<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    client_type: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ComponentWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_client_namespace: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClaimWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    mappings: Option<MappingsWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_rules: Option<Vec<ValidationRuleWire>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MappingsWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<UsernameClaimWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<GroupClaimWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UsernameClaimWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix_policy: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GroupClaimWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ValidationRuleWire {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    rule_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_claim: Option<RequiredClaimWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RequiredClaimWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    claim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_value: Option<String>,
}

fn external_auth_to_wire(auth: &HcpOpenShiftClusterExternalAuth) -> ExternalAuthWire {
    let p = &auth.properties;
    ExternalAuthWire {
        id: Some(auth.proxy.id.clone()),
        name: Some(auth.proxy.name.clone()),
        resource_type: Some(auth.proxy.resource_type.clone()),
        system_data: auth.proxy.system_data.as_ref().map(system_data_to_wire),
        properties: Some(ExternalAuthPropertiesWire {
            provisioning_state: Some(p.provisioning_state.clone()),
            condition: Some(ConditionWire {
                condition_type: Some(p.condition.condition_type.clone()),
                status: Some(p.condition.status.clone()),
                last_transition_time: Some(p.condition.last_transition_time.clone()),
                reason: Some(p.condition.reason.clone()),
                message: Some(p.condition.message.clone()),
            }),
            issuer: Some(IssuerWire {
                url: Some(p.issuer.url.clone()),
                audiences: Some(p.issuer.audiences.clone()),
                ca: Some(p.issuer.ca.clone()),
            }),
            clients: Some(
                p.clients
                    .iter()
                    .map(|client| ClientWire {
                        component: Some(ComponentWire {
                            name: Some(client.component.name.clone()),
                            auth_client_namespace: Some(
                                client.component.auth_client_namespace.clone(),
                            ),
                        }),
                        client_id: Some(client.client_id.clone()),
                        extra_scopes: Some(client.extra_scopes.clone()),
                        client_type: Some(client.client_type.clone()),
                    })
                    .collect(),
            ),
            claim: Some(ClaimWire {
                mappings: Some(MappingsWire {
                    username: Some(UsernameClaimWire {
                        claim: Some(p.claim.mappings.username.claim.clone()),
                        prefix: Some(p.claim.mappings.username.prefix.clone()),
                        prefix_policy: Some(p.claim.mappings.username.prefix_policy.clone()),
                    }),
                    groups: p.claim.mappings.groups.as_ref().map(|groups| GroupClaimWire {
                        claim: Some(groups.claim.clone()),
                        prefix: Some(groups.prefix.clone()),
                    }),
                }),
                validation_rules: Some(
                    p.claim
                        .validation_rules
                        .iter()
                        .map(|rule| ValidationRuleWire {
                            rule_type: Some(rule.rule_type.clone()),
                            required_claim: Some(RequiredClaimWire {
                                claim: Some(rule.required_claim.claim.clone()),
                                required_value: Some(rule.required_claim.required_value.clone()),
                            }),
                        })
                        .collect(),
                ),
            }),
        }),
    }
}

fn normalize_external_auth(wire: ExternalAuthWire, out: &mut HcpOpenShiftClusterExternalAuth) {
    if let Some(v) = wire.id {
        out.proxy.id = v;
    }
    if let Some(v) = wire.name {
        out.proxy.name = v;
    }
    if let Some(v) = wire.resource_type {
        out.proxy.resource_type = v;
    }

    let Some(properties) = wire.properties else {
        return;
    };
    if let Some(v) = properties.provisioning_state {
        out.properties.provisioning_state = v;
    }
    if let Some(condition) = properties.condition {
        if let Some(v) = condition.condition_type {
            out.properties.condition.condition_type = v;
        }
        if let Some(v) = condition.status {
            out.properties.condition.status = v;
        }
        if let Some(v) = condition.last_transition_time {
            out.properties.condition.last_transition_time = v;
        }
        if let Some(v) = condition.reason {
            out.properties.condition.reason = v;
        }
        if let Some(v) = condition.message {
            out.properties.condition.message = v;
        }
    }
    if let Some(issuer) = properties.issuer {
        if let Some(v) = issuer.url {
            out.properties.issuer.url = v;
        }
        if let Some(v) = issuer.audiences {
            out.properties.issuer.audiences = v;
        }
        if let Some(v) = issuer.ca {
            out.properties.issuer.ca = v;
        }
    }
    if let Some(clients) = properties.clients {
        out.properties.clients = clients
            .into_iter()
            .map(|client| ExternalAuthClientProfile {
                component: client
                    .component
                    .map(|component| ExternalAuthClientComponentProfile {
                        name: component.name.unwrap_or_default(),
                        auth_client_namespace: component.auth_client_namespace.unwrap_or_default(),
                    })
                    .unwrap_or_default(),
                client_id: client.client_id.unwrap_or_default(),
                extra_scopes: client.extra_scopes.unwrap_or_default(),
                client_type: client.client_type.unwrap_or_default(),
            })
            .collect();
    }
    if let Some(claim) = properties.claim {
        if let Some(mappings) = claim.mappings {
            if let Some(username) = mappings.username {
                if let Some(v) = username.claim {
                    out.properties.claim.mappings.username.claim = v;
                }
                if let Some(v) = username.prefix {
                    out.properties.claim.mappings.username.prefix = v;
                }
                if let Some(v) = username.prefix_policy {
                    out.properties.claim.mappings.username.prefix_policy = v;
                }
            }
            if let Some(groups) = mappings.groups {
                let target = out
                    .properties
                    .claim
                    .mappings
                    .groups
                    .get_or_insert_with(GroupClaimProfile::default);
                if let Some(v) = groups.claim {
                    target.claim = v;
                }
                if let Some(v) = groups.prefix {
                    target.prefix = v;
                }
            }
        }
        if let Some(rules) = claim.validation_rules {
            out.properties.claim.validation_rules = rules
                .into_iter()
                .map(|rule| TokenClaimValidationRule {
                    rule_type: rule.rule_type.unwrap_or_default(),
                    required_claim: rule
                        .required_claim
                        .map(|claim| TokenRequiredClaim {
                            claim: claim.claim.unwrap_or_default(),
                            required_value: claim.required_value.unwrap_or_default(),
                        })
                        .unwrap_or_default(),
                })
                .collect();
        }
    }
}

// ---------------------------------------------------------------------------
// Contracts

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
        serde_json::to_value(cluster_to_wire(cluster)).unwrap_or_default()
    }

    fn validate_write(
        &self,
        candidate: &Value,
        current: Option<&HcpOpenShiftCluster>,
        updating: bool,
    ) -> Result<HcpOpenShiftCluster, CloudError> {
        let wire: ClusterWire = serde_json::from_value(candidate.clone())
            .map_err(|err| CloudError::malformed_request_body(err.to_string()))?;
        // Re-serialize the typed candidate so unknown fields are dropped
        // before visibility enforcement, as decoding drops them.
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

struct NodePoolContract;

impl ResourceContract<HcpOpenShiftClusterNodePool> for NodePoolContract {
    fn to_wire(&self, canonical: Option<&HcpOpenShiftClusterNodePool>) -> Value {
        let defaulted;
        let pool = match canonical {
            Some(pool) => pool,
            None => {
                defaulted = new_default_node_pool();
                &defaulted
            }
        };
        serde_json::to_value(node_pool_to_wire(pool)).unwrap_or_default()
    }

    fn validate_write(
        &self,
        candidate: &Value,
        current: Option<&HcpOpenShiftClusterNodePool>,
        updating: bool,
    ) -> Result<HcpOpenShiftClusterNodePool, CloudError> {
        let wire: NodePoolWire = serde_json::from_value(candidate.clone())
            .map_err(|err| CloudError::malformed_request_body(err.to_string()))?;
        let typed = serde_json::to_value(&wire).unwrap_or_default();
        let mut errs = enforce(node_pool_table(), &typed, &self.to_wire(current), updating);

        let mut pool = match current {
            Some(pool) => pool.clone(),
            None => new_default_node_pool(),
        };
        normalize_node_pool(wire, &mut pool);

        errs.extend(pool.validate_syntax());
        // Parent-dependent checks run through
        // HcpOpenShiftClusterNodePool::validate_complex, which needs the
        // cluster the caller fetched.
        match CloudError::from_validation_errors(errs) {
            Some(err) => Err(err),
            None => Ok(pool),
        }
    }
}

struct ExternalAuthContract;

impl ResourceContract<HcpOpenShiftClusterExternalAuth> for ExternalAuthContract {
    fn to_wire(&self, canonical: Option<&HcpOpenShiftClusterExternalAuth>) -> Value {
        let defaulted;
        let auth = match canonical {
            Some(auth) => auth,
            None => {
                defaulted = new_default_external_auth();
                &defaulted
            }
        };
        serde_json::to_value(external_auth_to_wire(auth)).unwrap_or_default()
    }

    fn validate_write(
        &self,
        candidate: &Value,
        current: Option<&HcpOpenShiftClusterExternalAuth>,
        updating: bool,
    ) -> Result<HcpOpenShiftClusterExternalAuth, CloudError> {
        let wire: ExternalAuthWire = serde_json::from_value(candidate.clone())
            .map_err(|err| CloudError::malformed_request_body(err.to_string()))?;
        let typed = serde_json::to_value(&wire).unwrap_or_default();
        let mut errs = enforce(
            external_auth_table(),
            &typed,
            &self.to_wire(current),
            updating,
        );

        let mut auth = match current {
            Some(auth) => auth.clone(),
            None => new_default_external_auth(),
        };
        normalize_external_auth(wire, &mut auth);

        errs.extend(auth.validate_syntax());
        if errs.is_empty() {
            errs.extend(auth.validate_complex());
        }
        match CloudError::from_validation_errors(errs) {
            Some(err) => Err(err),
            None => Ok(auth),
        }
    }
}
