//! Canonical write-time path construction.
//!
//! Callers about to write a new object ask for the tenant-scoped path to
//! write it at.  The tenant identifier is validated before any path is
//! built: a malformed id fails fast instead of producing a path that the
//! classifier would later refuse to recognize.

use thiserror::Error;

use crate::access::classify::{is_valid_tenant_id, ROOT_NAMESPACE, TENANT_SEGMENT};

/// A malformed tenant identifier was supplied; no path was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tenant identifier: {0:?}")]
pub struct InvalidTenantId(pub String);

/// Categories available on the Shanghai photo/face bucket.  Fixed set; the
/// Guangzhou bucket accepts free-form categories instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoCategory {
    /// Activity and album photos.
    Photos,
    /// Student face-recognition images.
    Students,
}

impl PhotoCategory {
    /// The path segment for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::Photos => "photos",
            PhotoCategory::Students => "students",
        }
    }
}

/// Build `kindergarten/rent/<tenant>/<category>[/<suffix>]` for a
/// general-purpose asset (Guangzhou bucket convention).
///
/// `category` is free-form; `suffix` is appended verbatim when present.
pub fn tenant_asset_path(
    tenant: &str,
    category: &str,
    suffix: Option<&str>,
) -> Result<String, InvalidTenantId> {
    if !is_valid_tenant_id(tenant) {
        return Err(InvalidTenantId(tenant.to_string()));
    }
    let mut path = format!("{ROOT_NAMESPACE}/{TENANT_SEGMENT}/{tenant}/{category}");
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        path.push('/');
        path.push_str(suffix.trim_start_matches('/'));
    }
    Ok(path)
}

/// Build a tenant-scoped path on the Shanghai photo/face bucket.  Same
/// shape and validation as [`tenant_asset_path`], restricted to the fixed
/// photo categories.
pub fn photo_asset_path(
    tenant: &str,
    category: PhotoCategory,
    suffix: Option<&str>,
) -> Result<String, InvalidTenantId> {
    tenant_asset_path(tenant, category.as_str(), suffix)
}

// -- Tests --------------------------------------------------------------------
