//! Proxy error types.
//!
//! Every variant maps to one entry of the access-control error taxonomy.
//! The enum implements [`axum::response::IntoResponse`] so handlers can
//! simply return `Err(ProxyError::ObjectNotFound { .. })`.
//!
//! Denials and missing objects deliberately share the 404 status: an
//! unauthenticated prober must not be able to tell "no such object" apart
//! from "path outside your tenant".  The distinction survives in logs and
//! metrics only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::access::{DenyReason, InvalidTenantId};

/// Generate a 16-character uppercase hex request ID.
pub fn generate_request_id() -> String {
    let bytes: [u8; 8] = rand::random();
    let mut id = String::with_capacity(16);
    for b in bytes {
        id.push_str(&format!("{b:02X}"));
    }
    id
}

/// Access-control and proxy errors.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Malformed tenant identifier supplied to path generation.
    #[error("租户标识格式无效 (invalid tenant identifier): {tenant}")]
    InvalidTenantIdentifier { tenant: String },

    /// Tenant-scoped path owned by someone else.  The 越权 wording keeps
    /// cross-tenant denials distinguishable from plain 404s in logs.
    #[error("越权访问被拒绝 (cross-tenant access forbidden)")]
    CrossTenantAccessDenied { path: String },

    /// Path matches neither the tenant-segment shape nor a recognized
    /// public prefix.
    #[error("资源不存在 (resource not found)")]
    UnknownPathNamespace { path: String },

    /// URL hostname matched no known bucket.
    #[error("无法识别的存储地址 (storage host not recognized)")]
    BucketUnresolved { url: String },

    /// Path is access-permitted but the object does not exist.  No signed
    /// URL is ever generated for this path.
    #[error("资源不存在 (resource not found)")]
    ObjectNotFound { path: String },

    /// Batch endpoint called with zero paths.
    #[error("文件列表不能为空 (files list must not be empty)")]
    EmptyBatchRequest,

    /// Catch-all for unexpected internal errors.
    #[error("服务器内部错误 (internal server error)")]
    InternalError(#[from] anyhow::Error),
}

impl From<InvalidTenantId> for ProxyError {
    fn from(err: InvalidTenantId) -> Self {
        ProxyError::InvalidTenantIdentifier { tenant: err.0 }
    }
}

impl ProxyError {
    /// Map an access-layer denial to the proxy error for `subject` (a
    /// logical path, or a URL for `BucketUnresolved`).
    pub fn from_deny(reason: DenyReason, subject: &str) -> Self {
        match reason {
            DenyReason::CrossTenantAccess => ProxyError::CrossTenantAccessDenied {
                path: subject.to_string(),
            },
            DenyReason::UnknownNamespace => ProxyError::UnknownPathNamespace {
                path: subject.to_string(),
            },
            DenyReason::BucketUnresolved => ProxyError::BucketUnresolved {
                url: subject.to_string(),
            },
        }
    }

    /// Return the stable error code string.
    pub fn code(&self) -> &'static str {
        match self {
            ProxyError::InvalidTenantIdentifier { .. } => "InvalidTenantIdentifier",
            ProxyError::CrossTenantAccessDenied { .. } => "CrossTenantAccessDenied",
            ProxyError::UnknownPathNamespace { .. } => "UnknownPathNamespace",
            ProxyError::BucketUnresolved { .. } => "BucketUnresolved",
            ProxyError::ObjectNotFound { .. } => "ObjectNotFound",
            ProxyError::EmptyBatchRequest => "EmptyBatchRequest",
            ProxyError::InternalError(_) => "InternalError",
        }
    }

    /// Return the appropriate HTTP status code for this error.
    ///
    /// Cross-tenant denials, unknown namespaces, and absent objects all map
    /// to 404 on purpose; see the module docs.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTenantIdentifier { .. } => StatusCode::BAD_REQUEST,
            ProxyError::CrossTenantAccessDenied { .. } => StatusCode::NOT_FOUND,
            ProxyError::UnknownPathNamespace { .. } => StatusCode::NOT_FOUND,
            ProxyError::BucketUnresolved { .. } => StatusCode::BAD_REQUEST,
            ProxyError::ObjectNotFound { .. } => StatusCode::NOT_FOUND,
            ProxyError::EmptyBatchRequest => StatusCode::BAD_REQUEST,
            ProxyError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let request_id = generate_request_id();
        let status = self.status_code();
        let date = httpdate::fmt_http_date(std::time::SystemTime::now());

        let body = serde_json::json!({
            "success": false,
            "error": self.code(),
            "message": self.to_string(),
        });

        (
            status,
            [
                ("content-type", "application/json".to_string()),
                ("x-request-id", request_id),
                ("date", date),
                ("server", "Kindergate".to_string()),
            ],
            body.to_string(),
        )
            .into_response()
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_shape() {
        let id = generate_request_id();
        assert_eq!(id.len(), 16);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_denials_conflate_to_404() {
        let cross = ProxyError::CrossTenantAccessDenied {
            path: "kindergarten/rent/13800138000/a".into(),
        };
        let unknown = ProxyError::UnknownPathNamespace {
            path: "kindergarten/secrets/a".into(),
        };
        let missing = ProxyError::ObjectNotFound {
            path: "kindergarten/games/a".into(),
        };
        assert_eq!(cross.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        // Distinguishable in logs via the message wording.
        assert!(cross.to_string().contains("越权"));
    }

    #[test]
    fn test_from_deny_mapping() {
        let e = ProxyError::from_deny(DenyReason::BucketUnresolved, "https://x.example.com/a");
        assert_eq!(e.code(), "BucketUnresolved");
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);

        let e = ProxyError::from_deny(DenyReason::CrossTenantAccess, "kindergarten/rent/x");
        assert_eq!(e.code(), "CrossTenantAccessDenied");

        let e: ProxyError = InvalidTenantId("123".to_string()).into();
        assert_eq!(e.code(), "InvalidTenantIdentifier");
    }

    #[test]
    fn test_bad_request_statuses() {
        assert_eq!(
            ProxyError::EmptyBatchRequest.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::InvalidTenantIdentifier {
                tenant: "123".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
