//! Signed-URL proxy handlers.
//!
//! Per-request flow: Received -> Validated -> {Found, NotFound} -> Responded.
//! The proxy never streams object bytes; it validates access, checks
//! existence, and redirects the client to a short-lived signed URL so the
//! bucket credentials never reach the caller.
//!
//! Tenant identity arrives as the `x-tenant-id` header, injected by the
//! platform's upstream authentication layer.  Denials and missing objects
//! are externally identical (404); see `errors.rs`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::access::{AccessType, BucketId, DenyReason, PathClass};
use crate::errors::ProxyError;
use crate::metrics::{ACCESS_DENIALS_TOTAL, BATCH_FILES_TOTAL, SIGNED_URLS_TOTAL};
use crate::AppState;

/// Header carrying the authenticated tenant's identifier.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Categories that live on the Shanghai photo/face bucket.
const SHANGHAI_CATEGORIES: &[&str] = &["photos", "students", "test-faces"];

/// Derive which bucket a logical path belongs to.
///
/// Logical paths carry no hostname, so routing goes by the effective
/// category: photo/face material lives in Shanghai, everything else in
/// Guangzhou.  Fully-qualified URLs are resolved by hostname instead
/// (see `access::unified`).
pub fn route_bucket(path: &str) -> BucketId {
    let category = match crate::access::classify(path) {
        PathClass::TenantScoped { category, .. } => category,
        PathClass::Namespace { prefix } => Some(prefix),
        PathClass::Unrecognized => None,
    };
    match category {
        Some(c) if SHANGHAI_CATEGORIES.contains(&c) => BucketId::Shanghai,
        _ => BucketId::Guangzhou,
    }
}

/// Validate access to `path` for an optional tenant context, returning the
/// owning bucket on success.
fn authorize(
    state: &AppState,
    tenant: Option<&str>,
    path: &str,
) -> Result<(BucketId, AccessType), ProxyError> {
    let bucket = route_bucket(path);
    let validator = state.unified.validator_for(bucket);

    let decision = match tenant {
        Some(tenant) => validator.validate(tenant, path),
        None => validator.validate_anonymous(path),
    };

    match decision {
        crate::access::AccessDecision::Allow(access_type) => Ok((bucket, access_type)),
        crate::access::AccessDecision::Deny(reason) => {
            counter!(ACCESS_DENIALS_TOTAL, "reason" => reason.as_str()).increment(1);
            if reason == DenyReason::CrossTenantAccess {
                warn!(
                    path,
                    requester = tenant.unwrap_or("-"),
                    "越权访问被拒绝 (cross-tenant access denied)"
                );
            } else {
                debug!(path, "path outside recognized namespaces");
            }
            Err(ProxyError::from_deny(reason, path))
        }
    }
}

/// Read the tenant header, if present.
fn tenant_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get(TENANT_HEADER).and_then(|v| v.to_str().ok())
}

// -- Single-object endpoint ---------------------------------------------------

/// `GET /oss-proxy/*path` -- validate, check existence, redirect.
///
/// 302 with the signed URL in `Location` when the object exists; 404 when
/// it does not or the path is not access-permitted.  The signing API is
/// never contacted for an absent object.
pub async fn sign_and_redirect(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ProxyError> {
    let tenant = tenant_from_headers(&headers);
    let (bucket, access_type) = authorize(&state, tenant, &path)?;

    let client = state.client_for(bucket);
    let exists = client.exists(&path).await?;
    if !exists {
        debug!(path = %path, bucket = bucket.as_str(), "object not found");
        return Err(ProxyError::ObjectNotFound { path });
    }

    let url = client.sign_url(&path, state.config.signing.url_ttl_seconds)?;
    counter!(SIGNED_URLS_TOTAL, "bucket" => bucket.as_str()).increment(1);
    info!(
        path = %path,
        bucket = bucket.as_str(),
        access = match access_type {
            AccessType::Public => "public",
            AccessType::Tenant => "tenant",
        },
        "issuing signed redirect"
    );

    Ok((StatusCode::FOUND, [("location", url)]).into_response())
}

// -- Batch endpoint -----------------------------------------------------------

/// One requested file in a batch.
#[derive(Debug, Deserialize)]
pub struct BatchFileRequest {
    /// Logical object path.
    pub path: String,
}

/// Batch request body.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    /// Files to sign.  Missing or empty is a 400.
    #[serde(default)]
    pub files: Vec<BatchFileRequest>,
}

/// Per-file outcome in a batch response.
#[derive(Debug, Serialize)]
pub struct BatchFileResult {
    /// The path as requested.
    pub path: String,
    /// Signed URL; `null` when the object is absent or access was not
    /// permitted.
    #[serde(rename = "signedUrl")]
    pub signed_url: Option<String>,
    /// Whether the object exists (false also covers denied paths, keeping
    /// the external surface uniform with the single-object endpoint).
    pub exists: bool,
}

/// `POST /oss-proxy/batch` -- sign many paths in one call.
///
/// Each path is looked up independently; partial failure is normal and the
/// batch still responds 200 with per-file outcomes and summary counts.
pub async fn sign_batch(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<BatchRequest>,
) -> Result<Response, ProxyError> {
    if request.files.is_empty() {
        return Err(ProxyError::EmptyBatchRequest);
    }

    let tenant = tenant_from_headers(&headers);
    let mut files = Vec::with_capacity(request.files.len());
    let mut successful = 0u32;
    let mut failed = 0u32;

    for file in request.files {
        let outcome = sign_one(&state, tenant, &file.path).await;
        match outcome {
            Some(signed_url) => {
                successful += 1;
                files.push(BatchFileResult {
                    path: file.path,
                    signed_url: Some(signed_url),
                    exists: true,
                });
            }
            None => {
                failed += 1;
                files.push(BatchFileResult {
                    path: file.path,
                    signed_url: None,
                    exists: false,
                });
            }
        }
    }

    counter!(BATCH_FILES_TOTAL, "outcome" => "successful").increment(successful as u64);
    counter!(BATCH_FILES_TOTAL, "outcome" => "failed").increment(failed as u64);

    let body = serde_json::json!({
        "success": true,
        "data": {
            "files": files,
            "successful": successful,
            "failed": failed,
        }
    });

    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Sign a single batch entry, mapping every failure mode to `None`.
async fn sign_one(state: &AppState, tenant: Option<&str>, path: &str) -> Option<String> {
    let (bucket, _) = authorize(state, tenant, path).ok()?;
    let client = state.client_for(bucket);
    match client.exists(path).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(path, "batch entry not found");
            return None;
        }
        Err(e) => {
            warn!(path, error = %e, "batch existence check failed");
            return None;
        }
    }
    match client.sign_url(path, state.config.signing.url_ttl_seconds) {
        Ok(url) => {
            counter!(SIGNED_URLS_TOTAL, "bucket" => bucket.as_str()).increment(1);
            Some(url)
        }
        Err(e) => {
            warn!(path, error = %e, "batch signing failed");
            None
        }
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_bucket_photo_paths_to_shanghai() {
        assert_eq!(
            route_bucket("kindergarten/rent/13800138000/photos/a.jpg"),
            BucketId::Shanghai
        );
        assert_eq!(
            route_bucket("kindergarten/rent/13800138000/students/f.jpg"),
            BucketId::Shanghai
        );
        assert_eq!(route_bucket("kindergarten/photos/old.jpg"), BucketId::Shanghai);
        assert_eq!(route_bucket("test-faces/sample.jpg"), BucketId::Shanghai);
    }

    #[test]
    fn test_route_bucket_general_paths_to_guangzhou() {
        assert_eq!(route_bucket("kindergarten/games/audio/bgm.mp3"), BucketId::Guangzhou);
        assert_eq!(route_bucket("system/logo.png"), BucketId::Guangzhou);
        assert_eq!(
            route_bucket("kindergarten/rent/13800138000/uploads/doc.pdf"),
            BucketId::Guangzhou
        );
        // Unrecognized paths route to the general bucket; validation denies
        // them before any lookup happens.
        assert_eq!(route_bucket(""), BucketId::Guangzhou);
    }
}
