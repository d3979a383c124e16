//! Unified validation for fully-qualified asset URLs.
//!
//! Callers holding an arbitrary stored URL do not know which bucket issued
//! it.  [`UnifiedValidator`] resolves the bucket from the hostname first
//! and then delegates to that bucket's rules, so the legacy quirks stay
//! local to the per-bucket validators.

use crate::access::resolve::{url_hostname, BucketId, BucketResolver};
use crate::access::validator::{AccessDecision, BucketValidator, DenyReason};

/// A per-bucket decision tagged with the bucket that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifiedDecision {
    /// The resolved bucket, when the hostname was recognized.
    pub bucket: Option<BucketId>,
    /// The access decision.  `Deny(BucketUnresolved)` when `bucket` is
    /// `None`; otherwise whatever the matching validator decided.
    pub decision: AccessDecision,
}

/// Extract the logical path portion of a URL (everything after the host,
/// without the leading slash, query, or fragment).
fn url_path(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url.strip_prefix("//").unwrap_or(url),
    };
    let path = match rest.find('/') {
        Some(idx) => &rest[idx + 1..],
        None => "",
    };
    path.split(['?', '#']).next().unwrap_or("")
}

/// Composes the [`BucketResolver`] with both per-bucket validators.  This
/// is the entry point for validating any URL whose origin is not already
/// known to the caller.
#[derive(Debug, Clone)]
pub struct UnifiedValidator {
    resolver: BucketResolver,
    guangzhou: BucketValidator,
    shanghai: BucketValidator,
}

impl UnifiedValidator {
    /// Build from a resolver; the per-bucket rules are fixed.
    pub fn new(resolver: BucketResolver) -> Self {
        Self {
            resolver,
            guangzhou: BucketValidator::guangzhou(),
            shanghai: BucketValidator::shanghai(),
        }
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &BucketResolver {
        &self.resolver
    }

    /// The rules for `bucket`.
    pub fn validator_for(&self, bucket: BucketId) -> &BucketValidator {
        match bucket {
            BucketId::Guangzhou => &self.guangzhou,
            BucketId::Shanghai => &self.shanghai,
        }
    }

    /// Validate `requester`'s access to the object behind `url`.
    ///
    /// Short-circuits with `BucketUnresolved` when the hostname matches no
    /// known bucket; neither per-bucket validator is consulted in that case.
    pub fn validate_url(&self, requester: &str, url: &str) -> UnifiedDecision {
        let Some(bucket) = self.resolver.resolve(url) else {
            tracing::debug!(host = url_hostname(url), "url hostname matched no bucket");
            return UnifiedDecision {
                bucket: None,
                decision: AccessDecision::Deny(DenyReason::BucketUnresolved),
            };
        };
        let decision = self.validator_for(bucket).validate(requester, url_path(url));
        UnifiedDecision {
            bucket: Some(bucket),
            decision,
        }
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::validator::AccessType;

    const GZ_HOST: &str = "kg-assets.oss-cn-guangzhou.aliyuncs.com";
    const SH_HOST: &str = "kg-faces.oss-cn-shanghai.aliyuncs.com";

    fn unified() -> UnifiedValidator {
        UnifiedValidator::new(BucketResolver::new(GZ_HOST, SH_HOST))
    }

    #[test]
    fn test_url_path() {
        assert_eq!(
            url_path("https://h/kindergarten/games/a.mp3"),
            "kindergarten/games/a.mp3"
        );
        assert_eq!(url_path("https://h/a/b?x=1#f"), "a/b");
        assert_eq!(url_path("https://h"), "");
    }

    #[test]
    fn test_unified_public_asset() {
        let u = unified();
        let out = u.validate_url(
            "13800138000",
            &format!("https://{GZ_HOST}/kindergarten/games/audio/bgm.mp3"),
        );
        assert_eq!(out.bucket, Some(BucketId::Guangzhou));
        assert_eq!(out.decision, AccessDecision::Allow(AccessType::Public));
    }

    #[test]
    fn test_unified_tenant_match_and_mismatch() {
        let u = unified();
        let url = format!("https://{SH_HOST}/kindergarten/rent/13800138000/photos/a.jpg");
        assert_eq!(
            u.validate_url("13800138000", &url).decision,
            AccessDecision::Allow(AccessType::Tenant)
        );
        assert_eq!(
            u.validate_url("13900139000", &url).decision,
            AccessDecision::Deny(DenyReason::CrossTenantAccess)
        );
    }

    #[test]
    fn test_unified_unresolved_bucket() {
        let u = unified();
        let out = u.validate_url("13800138000", "https://elsewhere.example.com/kindergarten/games/a");
        assert_eq!(out.bucket, None);
        assert_eq!(out.decision, AccessDecision::Deny(DenyReason::BucketUnresolved));
    }

    #[test]
    fn test_unified_bucket_matches_resolver() {
        // The composed result's bucket always equals what the resolver
        // alone reports for the same URL.
        let u = unified();
        for url in [
            format!("https://{GZ_HOST}/kindergarten/system/x"),
            format!("https://{SH_HOST}/kindergarten/photos/x"),
            "https://unknown.example.com/x".to_string(),
        ] {
            let out = u.validate_url("13800138000", &url);
            assert_eq!(out.bucket, u.resolver().resolve(&url));
        }
    }

    #[test]
    fn test_unified_respects_per_bucket_allow_lists() {
        let u = unified();
        // `photos` is a legacy public root only on the Shanghai bucket.
        assert!(
            u.validate_url("13800138000", &format!("https://{SH_HOST}/kindergarten/photos/x.jpg"))
                .decision
                .is_allowed()
        );
        assert!(!u
            .validate_url("13800138000", &format!("https://{GZ_HOST}/kindergarten/photos/x.jpg"))
            .decision
            .is_allowed());
    }
}
