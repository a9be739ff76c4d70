//! Canonical external authentication model.
//!
//! External auth configs are child resources of a cluster that describe how
//! API server tokens from an outside identity provider are validated and
//! mapped onto cluster identities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CloudErrorBody;
use crate::resource::ProxyResource;
use crate::validate::{check_enum, check_https_url, check_max_items, check_max_len, check_required};

pub const CLIENT_TYPES: &[&str] = &["Confidential", "Public"];
pub const PREFIX_POLICIES: &[&str] = &["Prefix", "NoPrefix", "None"];
pub const VALIDATION_RULE_TYPES: &[&str] = &["RequiredClaim"];

const MAX_AUDIENCES: usize = 10;
const MAX_CLIENTS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HcpOpenShiftClusterExternalAuth {
    #[serde(flatten)]
    pub proxy: ProxyResource,
    pub properties: ExternalAuthProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalAuthProperties {
    pub provisioning_state: String,
    /// Last observed state of the external auth rollout. Platform-owned.
    pub condition: ExternalAuthCondition,
    pub issuer: TokenIssuerProfile,
    pub clients: Vec<ExternalAuthClientProfile>,
    pub claim: ExternalAuthClaimProfile,
    /// Backend correlation handle. Never crosses the wire.
    pub internal_id: String,
    /// In-flight operation handle. Never crosses the wire.
    pub active_operation_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalAuthCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub last_transition_time: String,
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenIssuerProfile {
    pub url: String,
    pub audiences: Vec<String>,
    pub ca: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalAuthClientProfile {
    pub component: ExternalAuthClientComponentProfile,
    pub client_id: String,
    pub extra_scopes: Vec<String>,
    #[serde(rename = "type")]
    pub client_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalAuthClientComponentProfile {
    pub name: String,
    pub auth_client_namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalAuthClaimProfile {
    pub mappings: TokenClaimMappingsProfile,
    pub validation_rules: Vec<TokenClaimValidationRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenClaimMappingsProfile {
    pub username: UsernameClaimProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupClaimProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsernameClaimProfile {
    pub claim: String,
    pub prefix: String,
    pub prefix_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupClaimProfile {
    pub claim: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenClaimValidationRule {
    #[serde(rename = "type")]
    pub rule_type: String,
    pub required_claim: TokenRequiredClaim,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenRequiredClaim {
    pub claim: String,
    pub required_value: String,
}

/// An external auth config carrying every documented non-zero default.
pub fn new_default_external_auth() -> HcpOpenShiftClusterExternalAuth {
    HcpOpenShiftClusterExternalAuth {
        properties: ExternalAuthProperties {
            claim: ExternalAuthClaimProfile {
                mappings: TokenClaimMappingsProfile {
                    username: UsernameClaimProfile {
                        prefix_policy: "None".to_string(),
                        ..Default::default()
                    },
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

impl HcpOpenShiftClusterExternalAuth {
    pub fn validate_syntax(&self) -> Vec<CloudErrorBody> {
        let p = &self.properties;
        let mut errs = Vec::new();

        errs.extend(check_required(&p.issuer.url, "properties.issuer.url"));
        errs.extend(check_https_url(&p.issuer.url, "properties.issuer.url"));
        if p.issuer.audiences.is_empty() {
            errs.push(CloudErrorBody::invalid_request_content(
                "Missing required field 'audiences'",
                "properties.issuer.audiences",
            ));
        }
        errs.extend(check_max_items(
            p.issuer.audiences.len(),
            MAX_AUDIENCES,
            "properties.issuer.audiences",
        ));
        for (i, audience) in p.issuer.audiences.iter().enumerate() {
            errs.extend(check_required(
                audience,
                &format!("properties.issuer.audiences[{i}]"),
            ));
        }
        if !p.issuer.ca.is_empty() && !p.issuer.ca.contains("-----BEGIN CERTIFICATE-----") {
            errs.push(CloudErrorBody::invalid_request_content(
                "Field 'ca' must hold PEM encoded certificates",
                "properties.issuer.ca",
            ));
        }

        errs.extend(check_max_items(
            p.clients.len(),
            MAX_CLIENTS,
            "properties.clients",
        ));
        for (i, client) in p.clients.iter().enumerate() {
            let base = format!("properties.clients[{i}]");
            errs.extend(check_required(
                &client.component.name,
                &format!("{base}.component.name"),
            ));
            errs.extend(check_max_len(
                &client.component.name,
                256,
                &format!("{base}.component.name"),
            ));
            errs.extend(check_required(
                &client.component.auth_client_namespace,
                &format!("{base}.component.authClientNamespace"),
            ));
            errs.extend(check_max_len(
                &client.component.auth_client_namespace,
                63,
                &format!("{base}.component.authClientNamespace"),
            ));
            errs.extend(check_required(&client.client_id, &format!("{base}.clientId")));
            errs.extend(check_required(&client.client_type, &format!("{base}.type")));
            errs.extend(check_enum(
                &client.client_type,
                CLIENT_TYPES,
                &format!("{base}.type"),
            ));
        }

        let username = &p.claim.mappings.username;
        errs.extend(check_required(
            &username.claim,
            "properties.claim.mappings.username.claim",
        ));
        errs.extend(check_max_len(
            &username.claim,
            256,
            "properties.claim.mappings.username.claim",
        ));
        errs.extend(check_enum(
            &username.prefix_policy,
            PREFIX_POLICIES,
            "properties.claim.mappings.username.prefixPolicy",
        ));
        // The prefix accompanies the "Prefix" policy and only that policy.
        if username.prefix_policy == "Prefix" && username.prefix.is_empty() {
            errs.push(CloudErrorBody::invalid_request_content(
                "Field 'prefix' is required when the prefix policy is 'Prefix'",
                "properties.claim.mappings.username.prefix",
            ));
        } else if username.prefix_policy != "Prefix" && !username.prefix.is_empty() {
            errs.push(CloudErrorBody::invalid_request_content(
                "Field 'prefix' must be empty unless the prefix policy is 'Prefix'",
                "properties.claim.mappings.username.prefix",
            ));
        }
        if let Some(groups) = &p.claim.mappings.groups {
            errs.extend(check_required(
                &groups.claim,
                "properties.claim.mappings.groups.claim",
            ));
            errs.extend(check_max_len(
                &groups.claim,
                256,
                "properties.claim.mappings.groups.claim",
            ));
        }

        for (i, rule) in p.claim.validation_rules.iter().enumerate() {
            let base = format!("properties.claim.validationRules[{i}]");
            errs.extend(check_required(&rule.rule_type, &format!("{base}.type")));
            errs.extend(check_enum(
                &rule.rule_type,
                VALIDATION_RULE_TYPES,
                &format!("{base}.type"),
            ));
            errs.extend(check_required(
                &rule.required_claim.claim,
                &format!("{base}.requiredClaim.claim"),
            ));
            errs.extend(check_required(
                &rule.required_claim.required_value,
                &format!("{base}.requiredClaim.requiredValue"),
            ));
        }

        errs
    }

    /// Cross-field rules: client component pairs and client IDs are unique.
    /// One error per offending client entry.
    pub fn validate_complex(&self) -> Vec<CloudErrorBody> {
        let mut errs = Vec::new();
        let clients = &self.properties.clients;

        let mut component_counts: BTreeMap<&ExternalAuthClientComponentProfile, u32> =
            BTreeMap::new();
        let mut client_id_counts: BTreeMap<&str, u32> = BTreeMap::new();
        for client in clients {
            *component_counts.entry(&client.component).or_insert(0) += 1;
            *client_id_counts.entry(client.client_id.as_str()).or_insert(0) += 1;
        }

        for (i, client) in clients.iter().enumerate() {
            if component_counts.get(&client.component).copied().unwrap_or(0) > 1 {
                errs.push(CloudErrorBody::invalid_request_content(
                    format!(
                        "Client component '{}/{}' is used by multiple clients",
                        client.component.auth_client_namespace, client.component.name
                    ),
                    &format!("properties.clients[{i}].component"),
                ));
            }
            if client_id_counts
                .get(client.client_id.as_str())
                .copied()
                .unwrap_or(0)
                > 1
            {
                errs.push(CloudErrorBody::invalid_request_content(
                    format!("Client ID '{}' is used by multiple clients", client.client_id),
                    &format!("properties.clients[{i}].clientId"),
                ));
            }
        }

        errs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(namespace: &str, name: &str, client_id: &str) -> ExternalAuthClientProfile {
        ExternalAuthClientProfile {
            component: ExternalAuthClientComponentProfile {
                name: name.to_string(),
                auth_client_namespace: namespace.to_string(),
            },
            client_id: client_id.to_string(),
            extra_scopes: Vec::new(),
            client_type: "Confidential".to_string(),
        }
    }

    fn valid_external_auth() -> HcpOpenShiftClusterExternalAuth {
        let mut auth = new_default_external_auth();
        auth.proxy.id = "/subscriptions/sub-1/resourceGroups/cluster-rg/providers/Microsoft.RedHatOpenShift/hcpOpenShiftClusters/my-cluster/externalAuths/entra".to_string();
        auth.proxy.name = "entra".to_string();
        auth.properties.issuer.url = "https://login.example.com/tenant".to_string();
        auth.properties.issuer.audiences = vec!["openshift-console".to_string()];
        auth.properties.claim.mappings.username.claim = "sub".to_string();
        auth.properties.clients = vec![
            client("openshift-console", "console", "client-1"),
            client("openshift-monitoring", "prometheus", "client-2"),
        ];
        auth
    }

    #[test]
    fn defaults_set_prefix_policy_none() {
        let auth = new_default_external_auth();
        assert_eq!(
            auth.properties.claim.mappings.username.prefix_policy,
            "None"
        );
    }

    #[test]
    fn valid_external_auth_is_clean() {
        let auth = valid_external_auth();
        assert_eq!(auth.validate_syntax(), Vec::new());
        assert_eq!(auth.validate_complex(), Vec::new());
    }

    #[test]
    fn issuer_url_must_be_https() {
        let mut auth = valid_external_auth();
        auth.properties.issuer.url = "http://login.example.com".to_string();
        let errs = auth.validate_syntax();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].target, "properties.issuer.url");
    }

    #[test]
    fn audiences_required_and_capped() {
        let mut auth = valid_external_auth();
        auth.properties.issuer.audiences.clear();
        let errs = auth.validate_syntax();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("audiences"));

        auth.properties.issuer.audiences =
            (0..11).map(|i| format!("audience-{i}")).collect();
        let errs = auth.validate_syntax();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("at most 10"));
    }

    #[test]
    fn prefix_follows_prefix_policy() {
        let mut auth = valid_external_auth();
        auth.properties.claim.mappings.username.prefix_policy = "Prefix".to_string();
        let errs = auth.validate_syntax();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("required"));

        auth.properties.claim.mappings.username.prefix = "ext:".to_string();
        assert_eq!(auth.validate_syntax(), Vec::new());

        auth.properties.claim.mappings.username.prefix_policy = "None".to_string();
        let errs = auth.validate_syntax();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("must be empty"));
    }

    #[test]
    fn validation_rules_require_claim_and_value() {
        let mut auth = valid_external_auth();
        auth.properties.claim.validation_rules.push(TokenClaimValidationRule {
            rule_type: "RequiredClaim".to_string(),
            required_claim: TokenRequiredClaim::default(),
        });

        let mut targets: Vec<String> = auth
            .validate_syntax()
            .into_iter()
            .map(|e| e.target)
            .collect();
        targets.sort();
        assert_eq!(
            targets,
            vec![
                "properties.claim.validationRules[0].requiredClaim.claim",
                "properties.claim.validationRules[0].requiredClaim.requiredValue",
            ]
        );
    }

    #[test]
    fn duplicate_component_pairs_error_per_client() {
        let mut auth = valid_external_auth();
        auth.properties.clients = vec![
            client("ns", "comp", "client-1"),
            client("ns", "comp", "client-2"),
        ];

        let errs = auth.validate_complex();
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].target, "properties.clients[0].component");
        assert_eq!(errs[1].target, "properties.clients[1].component");
        assert!(errs[0].message.contains("'ns/comp'"));
    }

    #[test]
    fn duplicate_client_ids_error_per_client() {
        let mut auth = valid_external_auth();
        auth.properties.clients = vec![
            client("ns-a", "comp-a", "shared"),
            client("ns-b", "comp-b", "shared"),
        ];

        let errs = auth.validate_complex();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.message.contains("Client ID 'shared'")));
        assert_eq!(errs[1].target, "properties.clients[1].clientId");
    }
}
