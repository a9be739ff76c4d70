//! Single-field syntactic validators.
//!
//! Every check is field-scoped: a malformed value produces a
//! [`CloudErrorBody`] targeting the offending path instead of failing the
//! request outright, so all syntax problems in a request are reported
//! together. Empty values pass unless a check is explicitly `required`;
//! presence requirements are their own checks.

use std::net::Ipv4Addr;

use thiserror::Error;

use crate::error::CloudErrorBody;

/// A malformed provider resource ID.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid resource ID '{0}'")]
pub struct InvalidResourceId(pub String);

/// A parsed provider resource ID:
/// `/subscriptions/{id}/resourceGroups/{name}/providers/{namespace}/{type}/{name}`,
/// optionally with nested child type/name pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: String,
    /// Fully qualified type, e.g. `Microsoft.Network/virtualNetworks/subnets`.
    pub resource_type: String,
    pub name: String,
    raw: String,
}

impl ResourceId {
    pub fn parse(s: &str) -> Result<ResourceId, InvalidResourceId> {
        let err = || InvalidResourceId(s.to_string());

        let trimmed = s.strip_prefix('/').ok_or_else(err)?;
        let segments: Vec<&str> = trimmed.split('/').collect();

        // Minimum: subscriptions/{id}/resourceGroups/{rg}/providers/{ns}/{type}/{name},
        // then child (type, name) pairs in twos.
        if segments.len() < 8 || segments.len() % 2 != 0 {
            return Err(err());
        }
        if !segments[0].eq_ignore_ascii_case("subscriptions")
            || !segments[2].eq_ignore_ascii_case("resourceGroups")
            || !segments[4].eq_ignore_ascii_case("providers")
        {
            return Err(err());
        }
        if segments.iter().any(|part| part.is_empty()) {
            return Err(err());
        }

        let mut resource_type = segments[5].to_string();
        for type_segment in segments[6..].iter().step_by(2) {
            resource_type.push('/');
            resource_type.push_str(type_segment);
        }

        Ok(ResourceId {
            subscription_id: segments[1].to_string(),
            resource_group: segments[3].to_string(),
            resource_type,
            name: segments[segments.len() - 1].to_string(),
            raw: s.to_string(),
        })
    }

    /// The ID of the containing resource, for child resources.
    /// `None` for a top-level resource.
    pub fn parent(&self) -> Option<ResourceId> {
        let trimmed = self.raw.strip_prefix('/')?;
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() <= 8 {
            return None;
        }
        let parent = format!("/{}", segments[..segments.len() - 2].join("/"));
        ResourceId::parse(&parent).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// An IPv4 CIDR range, stored masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    network: u32,
    prefix: u8,
}

impl Cidr {
    pub fn parse(s: &str) -> Option<Cidr> {
        let (addr, prefix) = s.split_once('/')?;
        let addr: Ipv4Addr = addr.parse().ok()?;
        let prefix: u8 = prefix.parse().ok()?;
        if prefix > 32 {
            return None;
        }
        Some(Cidr {
            network: u32::from(addr) & Cidr::mask(prefix),
            prefix,
        })
    }

    fn mask(prefix: u8) -> u32 {
        if prefix == 0 {
            0
        } else {
            u32::MAX << (32 - prefix)
        }
    }

    fn contains(&self, addr: u32) -> bool {
        addr & Cidr::mask(self.prefix) == self.network
    }

    /// Whether two ranges share any addresses.
    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.contains(other.network) || other.contains(self.network)
    }
}

/// Non-empty check for fields the wire contract requires.
pub fn check_required(value: &str, target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() {
        Some(CloudErrorBody::invalid_request_content(
            format!("Missing required field '{}'", last_segment(target)),
            target,
        ))
    } else {
        None
    }
}

/// IPv4 CIDR syntax, e.g. `10.128.0.0/14`. Empty passes.
pub fn check_cidr(value: &str, target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() || Cidr::parse(value).is_some() {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!("Invalid CIDR '{value}'"),
            target,
        ))
    }
}

/// Resource-ID syntax with an expected fully-qualified type. Empty passes.
pub fn check_resource_id(value: &str, expected_type: &str, target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() {
        return None;
    }
    match ResourceId::parse(value) {
        Ok(id) if id.resource_type.eq_ignore_ascii_case(expected_type) => None,
        Ok(_) => Some(CloudErrorBody::invalid_request_content(
            format!("Resource ID '{value}' must be of type {expected_type}"),
            target,
        )),
        Err(_) => Some(CloudErrorBody::invalid_request_content(
            format!("Invalid resource ID '{value}'"),
            target,
        )),
    }
}

/// Membership in a closed value set. Empty passes (defaults fill it later).
pub fn check_enum(value: &str, allowed: &[&str], target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() || allowed.contains(&value) {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!(
                "Invalid value '{}' for field '{}' (must be one of: {})",
                value,
                last_segment(target),
                allowed.join(", ")
            ),
            target,
        ))
    }
}

/// Inclusive i32 range check.
pub fn check_range(value: i32, min: i32, max: i32, target: &str) -> Option<CloudErrorBody> {
    if (min..=max).contains(&value) {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!(
                "Invalid value '{}' for field '{}' (must be between {} and {})",
                value,
                last_segment(target),
                min,
                max
            ),
            target,
        ))
    }
}

/// An `https://` URL with a non-empty host. Empty passes.
pub fn check_https_url(value: &str, target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() {
        return None;
    }
    let valid = value
        .strip_prefix("https://")
        .map(|rest| {
            let host = rest.split('/').next().unwrap_or("");
            !host.is_empty()
        })
        .unwrap_or(false);
    if valid {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!("Invalid URL '{value}' (must be https)"),
            target,
        ))
    }
}

/// RFC 1035 DNS label with a length cap. Empty passes.
pub fn check_dns_label(value: &str, max_len: usize, target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() {
        return None;
    }
    let valid = value.len() <= max_len
        && value.starts_with(|c: char| c.is_ascii_lowercase())
        && !value.ends_with('-')
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!(
                "Invalid value '{value}' for field '{}' (must be a lowercase DNS label of at most {max_len} characters)",
                last_segment(target)
            ),
            target,
        ))
    }
}

/// Kubernetes qualified name: `name` or `prefix/name` where the name part
/// is alphanumeric with `-`, `_` or `.` separators.
pub fn check_k8s_qualified_name(value: &str, target: &str) -> Option<CloudErrorBody> {
    let valid = match value.split_once('/') {
        Some((prefix, name)) => is_k8s_name_part(name) && !prefix.is_empty() && prefix.len() <= 253,
        None => is_k8s_name_part(value),
    };
    if valid {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!("Invalid Kubernetes qualified name '{value}'"),
            target,
        ))
    }
}

/// Kubernetes label value: empty, or up to 63 chars of the name alphabet.
pub fn check_k8s_label_value(value: &str, target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() || is_k8s_name_part(value) {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!("Invalid Kubernetes label value '{value}'"),
            target,
        ))
    }
}

fn is_k8s_name_part(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 63
        && value.starts_with(|c: char| c.is_ascii_alphanumeric())
        && value.ends_with(|c: char| c.is_ascii_alphanumeric())
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Release version syntax: dot-separated decimal components, e.g. `4.18`
/// or `4.18.3`. Empty passes.
pub fn check_release_version(value: &str, target: &str) -> Option<CloudErrorBody> {
    if value.is_empty() {
        return None;
    }
    let valid = value
        .split('.')
        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if valid {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!(
                "Invalid value '{}' for field '{}' (must be a dotted release version)",
                value,
                last_segment(target)
            ),
            target,
        ))
    }
}

/// Inclusive lower bound for counts that have no meaningful upper cap.
pub fn check_min(value: i32, min: i32, target: &str) -> Option<CloudErrorBody> {
    if value >= min {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!(
                "Invalid value '{}' for field '{}' (must be at least {})",
                value,
                last_segment(target),
                min
            ),
            target,
        ))
    }
}

/// Collection size cap.
pub fn check_max_items(len: usize, max: usize, target: &str) -> Option<CloudErrorBody> {
    if len <= max {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!(
                "Field '{}' must contain at most {} items",
                last_segment(target),
                max
            ),
            target,
        ))
    }
}

/// String length cap in bytes. Empty passes.
pub fn check_max_len(value: &str, max: usize, target: &str) -> Option<CloudErrorBody> {
    if value.len() <= max {
        None
    } else {
        Some(CloudErrorBody::invalid_request_content(
            format!(
                "Field '{}' must be at most {} characters",
                last_segment(target),
                max
            ),
            target,
        ))
    }
}

fn last_segment(target: &str) -> &str {
    target.rsplit('.').next().unwrap_or(target)
}
