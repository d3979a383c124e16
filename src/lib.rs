//! Kindergate library -- tenant-isolation access control and signed-URL
//! proxy for OSS-backed kindergarten assets.
//!
//! This crate provides the decision layer that keeps one tenant's objects
//! invisible to every other tenant across two OSS buckets with different
//! legacy path conventions, plus the HTTP proxy that turns validated
//! logical paths into short-lived signed URLs.

use std::sync::Arc;

pub mod access;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod oss;
pub mod server;

use crate::access::{BucketId, UnifiedValidator};
use crate::config::Config;
use crate::oss::OssClient;

/// Shared application state passed to all handlers via `axum::extract::State`.
pub struct AppState {
    /// Server configuration, immutable after load.
    pub config: Config,
    /// Resolver plus both per-bucket validators.
    pub unified: UnifiedValidator,
    /// Client for the Guangzhou general-assets bucket.
    pub guangzhou: Arc<dyn OssClient>,
    /// Client for the Shanghai photo/face bucket.
    pub shanghai: Arc<dyn OssClient>,
}

impl AppState {
    /// The OSS client for `bucket`.
    pub fn client_for(&self, bucket: BucketId) -> &Arc<dyn OssClient> {
        match bucket {
            BucketId::Guangzhou => &self.guangzhou,
            BucketId::Shanghai => &self.shanghai,
        }
    }
}
