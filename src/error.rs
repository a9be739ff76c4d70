//! Error envelope for resource provider responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes. Codes are invariant and are intended to be
/// consumed programmatically.
pub const CODE_INTERNAL_SERVER_ERROR: &str = "InternalServerError";
pub const CODE_INVALID_PARAMETER: &str = "InvalidParameter";
pub const CODE_INVALID_REQUEST_CONTENT: &str = "InvalidRequestContent";
pub const CODE_MULTIPLE_ERRORS_OCCURRED: &str = "MultipleErrorsOccurred";
pub const CODE_UNSUPPORTED_API_VERSION: &str = "UnsupportedApiVersion";

/// A single validation error with a dotted field path as its target.
///
/// Also serves as the response body of a provider error; when a request
/// collects several errors the parent body carries them in `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudErrorBody {
    /// An identifier for the error.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,

    /// A message suitable for display in a user interface.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// The target of the particular error, e.g. `properties.network.podCidr`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,

    /// Additional details about the error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<CloudErrorBody>,
}

impl CloudErrorBody {
    /// Shorthand for an `InvalidRequestContent` error at a field path.
    pub fn invalid_request_content(message: impl Into<String>, target: impl Into<String>) -> Self {
        CloudErrorBody {
            code: CODE_INVALID_REQUEST_CONTENT.to_string(),
            message: message.into(),
            target: target.into(),
            details: Vec::new(),
        }
    }

    /// Collapse a list of errors into a single body.
    ///
    /// A single error is promoted as-is; multiple errors are wrapped in a
    /// `MultipleErrorsOccurred` parent with the list in `details`. An empty
    /// list yields `None`.
    pub fn from_slice(errors: Vec<CloudErrorBody>, multiple_errors_message: &str) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.into_iter().next(),
            _ => Some(CloudErrorBody {
                code: CODE_MULTIPLE_ERRORS_OCCURRED.to_string(),
                message: multiple_errors_message.to_string(),
                target: String::new(),
                details: errors,
            }),
        }
    }
}

impl std::fmt::Display for CloudErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.code)?;
        if !self.target.is_empty() {
            write!(f, "{}: ", self.target)?;
        }
        write!(f, "{}", self.message)?;

        if !self.details.is_empty() {
            write!(f, " Details: ")?;
            for (i, inner) in self.details.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{inner}")?;
            }
        }

        Ok(())
    }
}

/// Standard message for a multi-error content validation failure.
pub const CONTENT_VALIDATION_FAILED: &str = "Content validation failed on multiple fields";

/// A complete resource provider error: HTTP status plus response body.
///
/// Serializes as `{"error": {...}}` per the resource provider contract.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{status_code}: {body}")]
pub struct CloudError {
    #[serde(skip, default = "default_status")]
    pub status_code: u16,

    #[serde(rename = "error")]
    pub body: CloudErrorBody,
}

fn default_status() -> u16 {
    400
}

impl CloudError {
    /// Build an HTTP 400 from collected validation errors, promoting a
    /// single error out of `details`. Returns `None` when the list is empty.
    pub fn from_validation_errors(errors: Vec<CloudErrorBody>) -> Option<Self> {
        CloudErrorBody::from_slice(errors, CONTENT_VALIDATION_FAILED).map(|body| CloudError {
            status_code: 400,
            body,
        })
    }

    /// The caller asked for an API version this process does not serve.
    pub fn unsupported_api_version(requested: &str, supported: &[&str]) -> Self {
        CloudError {
            status_code: 400,
            body: CloudErrorBody {
                code: CODE_UNSUPPORTED_API_VERSION.to_string(),
                message: format!(
                    "The api-version '{}' is not supported. The supported api-versions are: {}",
                    requested,
                    supported.join(", ")
                ),
                target: String::new(),
                details: Vec::new(),
            },
        }
    }

    /// The request body could not be decoded into the versioned wire shape.
    pub fn malformed_request_body(message: impl Into<String>) -> Self {
        CloudError {
            status_code: 400,
            body: CloudErrorBody {
                code: CODE_INVALID_REQUEST_CONTENT.to_string(),
                message: message.into(),
                target: String::new(),
                details: Vec::new(),
            },
        }
    }

    /// Exit code for CLI reporting: 1 for validation failures, 2 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.body.code.as_str() {
            CODE_INVALID_REQUEST_CONTENT | CODE_MULTIPLE_ERRORS_OCCURRED => 1,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_slice_empty() {
        assert_eq!(CloudErrorBody::from_slice(Vec::new(), "nope"), None);
    }

    #[test]
    fn from_slice_single_is_promoted() {
        let err = CloudErrorBody::invalid_request_content("bad", "properties.x");
        let body = CloudErrorBody::from_slice(vec![err.clone()], "multi").unwrap();
        assert_eq!(body, err);
    }

    #[test]
    fn from_slice_multiple_are_wrapped() {
        let errs = vec![
            CloudErrorBody::invalid_request_content("bad", "properties.x"),
            CloudErrorBody::invalid_request_content("worse", "properties.y"),
        ];
        let body = CloudErrorBody::from_slice(errs, "multi").unwrap();
        assert_eq!(body.code, CODE_MULTIPLE_ERRORS_OCCURRED);
        assert_eq!(body.message, "multi");
        assert_eq!(body.details.len(), 2);
    }

    #[test]
    fn cloud_error_serializes_under_error_key() {
        let err = CloudError::from_validation_errors(vec![CloudErrorBody::invalid_request_content(
            "Field 'url' is read-only",
            "properties.console.url",
        )])
        .unwrap();

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({
                "error": {
                    "code": "InvalidRequestContent",
                    "message": "Field 'url' is read-only",
                    "target": "properties.console.url"
                }
            })
        );
    }

    #[test]
    fn unsupported_api_version_message() {
        let err = CloudError::unsupported_api_version("2020-01-01", &["2024-06-10", "2025-12-22"]);
        assert_eq!(err.status_code, 400);
        assert_eq!(err.body.code, CODE_UNSUPPORTED_API_VERSION);
        assert!(err.body.message.contains("2024-06-10, 2025-12-22"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn display_includes_target_and_details() {
        let body = CloudErrorBody {
            code: CODE_MULTIPLE_ERRORS_OCCURRED.to_string(),
            message: "multi".to_string(),
            target: String::new(),
            details: vec![CloudErrorBody::invalid_request_content("bad", "a.b")],
        };
        assert_eq!(
            body.to_string(),
            "MultipleErrorsOccurred: multi Details: InvalidRequestContent: a.b: bad"
        );
    }
}
