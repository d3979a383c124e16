//! In-memory OSS client for tests.
//!
//! Holds a set of existing object keys and signs deterministically-shaped
//! URLs carrying the same query parameters as the real provider.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;

use crate::oss::client::OssClient;

/// Test double for [`OssClient`].
pub struct MemoryOssClient {
    host: String,
    objects: RwLock<HashSet<String>>,
}

impl MemoryOssClient {
    /// Empty client with a fake hostname.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            objects: RwLock::new(HashSet::new()),
        }
    }

    /// Mark `object_key` as existing.
    pub fn put(&self, object_key: impl Into<String>) {
        self.objects
            .write()
            .expect("object set lock poisoned")
            .insert(object_key.into());
    }
}

impl OssClient for MemoryOssClient {
    fn exists(
        &self,
        object_key: &str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + '_>> {
        let present = self
            .objects
            .read()
            .expect("object set lock poisoned")
            .contains(object_key);
        Box::pin(async move { Ok(present) })
    }

    fn sign_url(&self, object_key: &str, ttl_seconds: u64) -> anyhow::Result<String> {
        let expires = chrono::Utc::now().timestamp() + ttl_seconds as i64;
        Ok(format!(
            "https://{}/{}?OSSAccessKeyId=memory&Expires={}&Signature=bWVtb3J5c2ln",
            self.host,
            object_key.trim_start_matches('/'),
            expires,
        ))
    }
}

// -- Tests --------------------------------------------------------------------
