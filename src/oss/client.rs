//! Abstract OSS client trait.
//!
//! The trait works in terms of logical object keys so callers never see
//! bucket credentials.  Signing is pure computation; only the existence
//! check performs I/O.

use std::future::Future;
use std::pin::Pin;

/// Minimal contract against the storage provider.
pub trait OssClient: Send + Sync + 'static {
    /// Check whether an object exists at `object_key`.
    fn exists(
        &self,
        object_key: &str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + '_>>;

    /// Produce a time-limited signed GET URL for `object_key`.
    ///
    /// The returned URL carries `OSSAccessKeyId`, `Expires` (unix seconds),
    /// and `Signature` query parameters and grants read access to exactly
    /// one object until expiry.  There is no revocation path; expiry is the
    /// only lifecycle event.
    fn sign_url(&self, object_key: &str, ttl_seconds: u64) -> anyhow::Result<String>;
}
