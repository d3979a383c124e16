//! Aliyun OSS client: V1 GET-URL signing plus a HEAD existence probe.
//!
//! The V1 signature for a GET URL is:
//!
//! 1. string-to-sign = `GET\n\n\n{expires}\n/{bucket}/{object}`
//! 2. signature = base64(HMAC-SHA1(access_key_secret, string-to-sign))
//! 3. URL = `https://{host}/{object}?OSSAccessKeyId=..&Expires=..&Signature=..`
//!
//! Existence is probed with a HEAD request against a freshly signed URL;
//! transport retries are the HTTP client's concern, not this layer's.

use std::future::Future;
use std::pin::Pin;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;

use crate::config::BucketConfig;
use crate::oss::client::OssClient;

type HmacSha1 = Hmac<Sha1>;

/// Query-parameter percent-encoding: unreserved characters pass through.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Object-key encoding: like query encoding but `/` separates segments.
const KEY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Compute HMAC-SHA1 of `data` with `key`.
fn hmac_sha1(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Client for one OSS bucket.
pub struct AliyunOssClient {
    bucket: String,
    host: String,
    access_key_id: String,
    access_key_secret: String,
    http: reqwest::Client,
}

impl AliyunOssClient {
    /// Build a client from one bucket's configuration.
    pub fn new(config: &BucketConfig) -> Self {
        Self {
            bucket: config.name.clone(),
            host: config.host(),
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config.access_key_secret.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Build the V1 string-to-sign for a GET of `object_key` expiring at
    /// `expires` (unix seconds).
    fn string_to_sign(&self, object_key: &str, expires: i64) -> String {
        format!("GET\n\n\n{expires}\n/{}/{object_key}", self.bucket)
    }

    /// Sign `object_key` with an absolute expiry timestamp.
    fn sign_with_expiry(&self, object_key: &str, expires: i64) -> String {
        let object_key = object_key.trim_start_matches('/');
        let signature = BASE64.encode(hmac_sha1(
            self.access_key_secret.as_bytes(),
            self.string_to_sign(object_key, expires).as_bytes(),
        ));
        format!(
            "https://{}/{}?OSSAccessKeyId={}&Expires={}&Signature={}",
            self.host,
            utf8_percent_encode(object_key, KEY_ENCODE),
            utf8_percent_encode(&self.access_key_id, QUERY_ENCODE),
            expires,
            utf8_percent_encode(&signature, QUERY_ENCODE),
        )
    }
}

impl OssClient for AliyunOssClient {
    fn exists(
        &self,
        object_key: &str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<bool>> + Send + '_>> {
        // Probe with a short-lived signed URL so the bucket can stay private.
        let url = match self.sign_url(object_key, 60) {
            Ok(url) => url,
            Err(e) => return Box::pin(async move { Err(e) }),
        };
        Box::pin(async move {
            let response = self
                .http
                .head(&url)
                .send()
                .await
                .context("HEAD request to OSS failed")?;
            Ok(response.status().is_success())
        })
    }

    fn sign_url(&self, object_key: &str, ttl_seconds: u64) -> anyhow::Result<String> {
        let expires = chrono::Utc::now().timestamp() + ttl_seconds as i64;
        Ok(self.sign_with_expiry(object_key, expires))
    }
}

// -- Tests --------------------------------------------------------------------
