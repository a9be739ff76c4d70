//! Randomized round-trip properties: projecting a canonical resource onto a
//! wire version and folding the result back yields the original resource,
//! modulo the internal-only fields the wire never carries.

use std::collections::BTreeMap;

use hcp_contract::cluster::{new_default_hcp_cluster, HcpOpenShiftCluster};
use hcp_contract::external_auth::{
    new_default_external_auth, ExternalAuthClientComponentProfile, ExternalAuthClientProfile,
    GroupClaimProfile, HcpOpenShiftClusterExternalAuth, TokenClaimValidationRule,
    TokenRequiredClaim,
};
use hcp_contract::node_pool::{
    new_default_node_pool, HcpOpenShiftClusterNodePool, NodePoolAutoScaling, Taint,
};
use hcp_contract::registry::{ApiRegistry, ResourceContract};
use proptest::prelude::*;

const CURRENT: &str = "2025-12-22-preview";
const LEGACY: &str = "2024-06-10-preview";

fn arb_tags() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,6}", "[a-z0-9]{0,6}", 0..4)
}

fn arb_cluster() -> impl Strategy<Value = HcpOpenShiftCluster> {
    let scalars = (
        "[a-z]{4,10}",                                       // location
        arb_tags(),                                          // tags
        prop_oneof![Just(String::new()), Just("4.19".to_string()), Just("4.20".to_string())],
        "[a-z][a-z0-9]{0,13}",                               // baseDomainPrefix
        prop_oneof![Just("172.30.0.0/16".to_string()), Just("172.31.0.0/16".to_string())],
        prop_oneof![Just("10.0.0.0/16".to_string()), Just("192.168.0.0/16".to_string())],
        23..=26i32,                                          // hostPrefix
        prop_oneof![Just("Public".to_string()), Just("Private".to_string())],
    );
    let platform = (
        "[a-z0-9]{0,8}",                                     // managedResourceGroup
        prop_oneof![Just(String::new()), Just("https://issuer.example.com".to_string())],
        0..1000i32,                                          // maxNodesTotal
        0..1200i32,                                          // maxPodGracePeriodSeconds
        0..100i32,                                           // nodeDrainTimeoutMinutes
        "[a-z0-9]{0,12}",                                    // internalId (zeroed below)
    );
    (scalars, platform).prop_map(
        |(
            (location, tags, version_id, prefix, service_cidr, machine_cidr, host_prefix, visibility),
            (managed_rg, issuer_url, max_nodes, grace, drain, internal_id),
        )| {
            let mut cluster = new_default_hcp_cluster();
            cluster.tracked.location = location;
            cluster.tracked.tags = tags;
            cluster.properties.version.id = version_id;
            cluster.properties.dns.base_domain_prefix = prefix;
            cluster.properties.network.service_cidr = service_cidr;
            cluster.properties.network.machine_cidr = machine_cidr;
            cluster.properties.network.host_prefix = host_prefix;
            cluster.properties.api.visibility = visibility;
            cluster.properties.platform.managed_resource_group = managed_rg;
            cluster.properties.platform.subnet_id =
                "/subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/virtualNetworks/vnet/subnets/node-subnet"
                    .to_string();
            cluster.properties.platform.network_security_group_id =
                "/subscriptions/sub-1/resourceGroups/net-rg/providers/Microsoft.Network/networkSecurityGroups/nsg"
                    .to_string();
            cluster.properties.platform.issuer_url = issuer_url;
            cluster.properties.autoscaling.max_nodes_total = max_nodes;
            cluster.properties.autoscaling.max_pod_grace_period_seconds = grace;
            cluster.properties.node_drain_timeout_minutes = drain;
            cluster.properties.internal_id = internal_id;
            cluster
        },
    )
}

fn arb_taint() -> impl Strategy<Value = Taint> {
    (
        prop_oneof![
            Just("NoSchedule".to_string()),
            Just("PreferNoSchedule".to_string()),
            Just("NoExecute".to_string())
        ],
        "[a-z]{1,10}",
        "[a-z0-9]{0,5}",
    )
        .prop_map(|(effect, key, value)| Taint { effect, key, value })
}

fn arb_node_pool() -> impl Strategy<Value = HcpOpenShiftClusterNodePool> {
    let scaling = prop_oneof![
        (1..50i32).prop_map(|replicas| (replicas, None)),
        ((0..5i32, 5..50i32))
            .prop_map(|(min, max)| (0, Some(NodePoolAutoScaling { min, max }))),
    ];
    let scalars = (
        "[a-z]{4,10}",
        arb_tags(),
        prop_oneof![Just(String::new()), Just("4.19".to_string())],
        1..512i32,
        prop_oneof![
            Just("Premium_LRS".to_string()),
            Just("StandardSSD_LRS".to_string()),
            Just("Standard_LRS".to_string())
        ],
        scaling,
    );
    let extras = (
        prop::collection::btree_map("[a-z]{1,10}", "[a-z0-9]{0,10}", 0..3),
        prop::collection::vec(arb_taint(), 0..3),
        any::<bool>(),
        0..10080i32,
        "[a-z0-9]{0,12}",
    );
    (scalars, extras)
        .prop_map(
            |(
                (location, tags, version_id, disk_size, disk_type, (replicas, auto_scaling)),
                (labels, taints, auto_repair, drain, internal_id),
            )| {
                let mut pool = new_default_node_pool();
                pool.tracked.location = location;
                pool.tracked.tags = tags;
                pool.properties.version.id = version_id;
                pool.properties.platform.vm_size = "Standard_D8s_v3".to_string();
                pool.properties.platform.os_disk.size_gib = disk_size;
                pool.properties.platform.os_disk.disk_storage_account_type = disk_type;
                pool.properties.replicas = replicas;
                pool.properties.auto_scaling = auto_scaling;
                pool.properties.labels = labels;
                pool.properties.taints = taints;
                pool.properties.auto_repair = auto_repair;
                pool.properties.node_drain_timeout_minutes = drain;
                pool.properties.internal_id = internal_id;
                pool
            },
        )
}

fn arb_external_auth() -> impl Strategy<Value = HcpOpenShiftClusterExternalAuth> {
    let username = prop_oneof![
        Just(("NoPrefix".to_string(), String::new())),
        Just(("None".to_string(), String::new())),
        Just(("Prefix".to_string(), "ext:".to_string())),
    ];
    (
        "[a-z]{3,10}",
        prop::collection::btree_set("[a-z]{1,10}", 1..=3),
        prop::collection::btree_set("[a-z]{1,8}", 0..3),
        "[a-z]{1,10}",
        username,
        prop::option::of(("[a-z]{1,8}", "[a-z0-9:]{0,5}")),
        prop::collection::vec(("[a-z]{1,6}", "[a-z0-9]{1,6}"), 0..2),
        "[a-z0-9]{0,12}",
    )
        .prop_map(
            |(host, audiences, client_names, claim, (prefix_policy, prefix), groups, rules, internal_id)| {
                let mut auth = new_default_external_auth();
                auth.properties.issuer.url = format!("https://{host}.example.com");
                auth.properties.issuer.audiences = audiences.into_iter().collect();
                auth.properties.clients = client_names
                    .into_iter()
                    .map(|name| ExternalAuthClientProfile {
                        component: ExternalAuthClientComponentProfile {
                            auth_client_namespace: format!("ns-{name}"),
                            name: name.clone(),
                        },
                        client_id: format!("id-{name}"),
                        extra_scopes: Vec::new(),
                        client_type: "Confidential".to_string(),
                    })
                    .collect();
                auth.properties.claim.mappings.username.claim = claim;
                auth.properties.claim.mappings.username.prefix = prefix;
                auth.properties.claim.mappings.username.prefix_policy = prefix_policy;
                auth.properties.claim.mappings.groups =
                    groups.map(|(claim, prefix)| GroupClaimProfile { claim, prefix });
                auth.properties.claim.validation_rules = rules
                    .into_iter()
                    .map(|(claim, required_value)| TokenClaimValidationRule {
                        rule_type: "RequiredClaim".to_string(),
                        required_claim: TokenRequiredClaim {
                            claim,
                            required_value,
                        },
                    })
                    .collect();
                auth.properties.internal_id = internal_id;
                auth
            },
        )
}

/// Project onto the wire and fold the result back over the same resource.
fn round_trip<C: Clone + PartialEq>(contract: &dyn ResourceContract<C>, canonical: &C) -> C {
    let body = contract.to_wire(Some(canonical));
    contract
        .validate_write(&body, Some(canonical), true)
        .expect("unmodified projection must pass the write pipeline")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn cluster_round_trips_on_current_version(mut cluster in arb_cluster()) {
        cluster.properties.internal_id.clear();
        cluster.properties.active_operation_id.clear();

        let registry = ApiRegistry::with_all_versions();
        let version = registry.lookup(CURRENT).unwrap();
        prop_assert_eq!(round_trip(version.cluster(), &cluster), cluster);
    }

    #[test]
    fn cluster_round_trips_on_legacy_version(mut cluster in arb_cluster()) {
        cluster.properties.internal_id.clear();
        cluster.properties.active_operation_id.clear();
        // Fields the legacy wire does not carry stay at their defaults.
        let defaults = new_default_hcp_cluster();
        cluster.properties.autoscaling = defaults.properties.autoscaling.clone();
        cluster.properties.node_drain_timeout_minutes =
            defaults.properties.node_drain_timeout_minutes;

        let registry = ApiRegistry::with_all_versions();
        let version = registry.lookup(LEGACY).unwrap();
        prop_assert_eq!(round_trip(version.cluster(), &cluster), cluster);
    }

    #[test]
    fn node_pool_round_trips_on_current_version(mut pool in arb_node_pool()) {
        pool.properties.internal_id.clear();
        pool.properties.active_operation_id.clear();

        let registry = ApiRegistry::with_all_versions();
        let version = registry.lookup(CURRENT).unwrap();
        prop_assert_eq!(round_trip(version.node_pool().unwrap(), &pool), pool);
    }

    #[test]
    fn external_auth_round_trips_on_current_version(mut auth in arb_external_auth()) {
        auth.properties.internal_id.clear();
        auth.properties.active_operation_id.clear();

        let registry = ApiRegistry::with_all_versions();
        let version = registry.lookup(CURRENT).unwrap();
        prop_assert_eq!(round_trip(version.external_auth().unwrap(), &auth), auth);
    }

    #[test]
    fn internal_fields_never_reach_the_wire(cluster in arb_cluster()) {
        let registry = ApiRegistry::with_all_versions();
        let version = registry.lookup(CURRENT).unwrap();
        let wire = version.cluster().to_wire(Some(&cluster));
        prop_assert!(wire["properties"].get("internalId").is_none());
        prop_assert!(wire["properties"].get("activeOperationId").is_none());
    }
}
