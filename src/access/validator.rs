//! Per-bucket access validation.
//!
//! Each physical bucket carries its own legacy path conventions, so the
//! allow/deny rules live in one [`BucketValidator`] instance per bucket
//! instead of conditionals scattered through calling code.  Decisions are
//! tagged values, never errors: the HTTP boundary performs the only mapping
//! to status codes.

use crate::access::classify::{classify, PathClass};
use crate::access::resolve::BucketId;

/// How an allowed path may be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    /// Shared namespace, readable by every tenant.
    Public,
    /// Tenant-private subtree, readable only by its owner.
    Tenant,
}

/// Why a path was denied.  Closed set; see the error taxonomy in
/// `errors.rs` for the HTTP mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Tenant-scoped path owned by a different tenant (越权).
    CrossTenantAccess,
    /// Path matches neither `rent/<id>` nor a recognized public prefix.
    /// Unlisted namespaces are never implicitly public.
    UnknownNamespace,
    /// URL hostname matched no known bucket (unified validation only).
    BucketUnresolved,
}

impl DenyReason {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::CrossTenantAccess => "cross_tenant",
            DenyReason::UnknownNamespace => "unknown_namespace",
            DenyReason::BucketUnresolved => "bucket_unresolved",
        }
    }
}

/// Outcome of a validation call.  Constructed fresh per call, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access permitted, tagged with how.
    Allow(AccessType),
    /// Access refused, tagged with why.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Whether access was granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }

    /// The access type, when allowed.
    pub fn access_type(&self) -> Option<AccessType> {
        match self {
            AccessDecision::Allow(t) => Some(*t),
            AccessDecision::Deny(_) => None,
        }
    }

    /// The denial reason, when denied.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            AccessDecision::Allow(_) => None,
            AccessDecision::Deny(r) => Some(*r),
        }
    }
}

/// Public-prefix allow-list for the Guangzhou (general assets) bucket.
const GUANGZHOU_PUBLIC_PREFIXES: &[&str] = &["system", "games", "education", "development"];

/// Public-prefix allow-list for the Shanghai (photo / face data) bucket.
/// `photos` and `students` are unprefixed legacy roots that predate the
/// tenant-isolation scheme; they stay public for backward compatibility.
const SHANGHAI_PUBLIC_PREFIXES: &[&str] = &["test-faces", "photos", "students"];

/// Allow/deny rules for one bucket.  Immutable after construction.
#[derive(Debug, Clone)]
pub struct BucketValidator {
    bucket: BucketId,
    public_prefixes: &'static [&'static str],
}

impl BucketValidator {
    /// Rules for the Guangzhou general-assets bucket.
    pub fn guangzhou() -> Self {
        Self {
            bucket: BucketId::Guangzhou,
            public_prefixes: GUANGZHOU_PUBLIC_PREFIXES,
        }
    }

    /// Rules for the Shanghai photo/face bucket.
    pub fn shanghai() -> Self {
        Self {
            bucket: BucketId::Shanghai,
            public_prefixes: SHANGHAI_PUBLIC_PREFIXES,
        }
    }

    /// The bucket these rules belong to.
    pub fn bucket(&self) -> BucketId {
        self.bucket
    }

    /// Whether `prefix` is on this bucket's public allow-list.
    pub fn is_public_prefix(&self, prefix: &str) -> bool {
        self.public_prefixes.contains(&prefix)
    }

    /// Decide whether `requester` may access `path`.
    ///
    /// Tenant-scoped paths require an exact owner match.  Public prefixes
    /// are allowed for any tenant.  Everything else denies.
    pub fn validate(&self, requester: &str, path: &str) -> AccessDecision {
        match classify(path) {
            PathClass::TenantScoped { owner, .. } => {
                if owner == requester {
                    AccessDecision::Allow(AccessType::Tenant)
                } else {
                    AccessDecision::Deny(DenyReason::CrossTenantAccess)
                }
            }
            PathClass::Namespace { prefix } => {
                if self.is_public_prefix(prefix) {
                    AccessDecision::Allow(AccessType::Public)
                } else {
                    AccessDecision::Deny(DenyReason::UnknownNamespace)
                }
            }
            PathClass::Unrecognized => AccessDecision::Deny(DenyReason::UnknownNamespace),
        }
    }

    /// Decide access for a request that carries no tenant context.
    ///
    /// Public paths stay allowed; tenant-scoped paths deny as cross-tenant
    /// since there is no identity to match the owner against.
    pub fn validate_anonymous(&self, path: &str) -> AccessDecision {
        match classify(path) {
            PathClass::TenantScoped { .. } => {
                AccessDecision::Deny(DenyReason::CrossTenantAccess)
            }
            PathClass::Namespace { prefix } => {
                if self.is_public_prefix(prefix) {
                    AccessDecision::Allow(AccessType::Public)
                } else {
                    AccessDecision::Deny(DenyReason::UnknownNamespace)
                }
            }
            PathClass::Unrecognized => AccessDecision::Deny(DenyReason::UnknownNamespace),
        }
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "13800138000";
    const OTHER: &str = "13900139000";

    #[test]
    fn test_owner_allowed_on_tenant_path() {
        for v in [BucketValidator::guangzhou(), BucketValidator::shanghai()] {
            let decision = v.validate(OWNER, "kindergarten/rent/13800138000/photos/a.jpg");
            assert_eq!(decision, AccessDecision::Allow(AccessType::Tenant));
        }
    }

    #[test]
    fn test_cross_tenant_denied() {
        for v in [BucketValidator::guangzhou(), BucketValidator::shanghai()] {
            let decision = v.validate(OTHER, "kindergarten/rent/13800138000/photos/a.jpg");
            assert_eq!(decision, AccessDecision::Deny(DenyReason::CrossTenantAccess));
            assert!(!decision.is_allowed());
            assert_eq!(decision.deny_reason(), Some(DenyReason::CrossTenantAccess));
        }
    }

    #[test]
    fn test_shanghai_tenant_photo_scenario() {
        // Photo bucket: owner allowed, anyone else denied.
        let v = BucketValidator::shanghai();
        let path = "kindergarten/rent/13800138000/photos/2025-11/test.jpg";
        assert_eq!(
            v.validate("13800138000", path),
            AccessDecision::Allow(AccessType::Tenant)
        );
        assert_eq!(
            v.validate("13900139000", path),
            AccessDecision::Deny(DenyReason::CrossTenantAccess)
        );
    }

    #[test]
    fn test_guangzhou_public_prefixes() {
        let v = BucketValidator::guangzhou();
        for prefix in ["system", "games", "education", "development"] {
            let path = format!("kindergarten/{prefix}/some/file.bin");
            // Public regardless of who asks, including tenants owning nothing.
            for tenant in [OWNER, OTHER, "10000000000"] {
                assert_eq!(
                    v.validate(tenant, &path),
                    AccessDecision::Allow(AccessType::Public),
                    "prefix {prefix} should be public"
                );
            }
        }
    }

    #[test]
    fn test_shanghai_legacy_roots_public() {
        // Pre-isolation objects under unprefixed roots stay public.
        let v = BucketValidator::shanghai();
        assert_eq!(
            v.validate(OTHER, "kindergarten/photos/2025-11/old-photo.jpg"),
            AccessDecision::Allow(AccessType::Public)
        );
        assert_eq!(
            v.validate(OTHER, "kindergarten/students/face-001.jpg"),
            AccessDecision::Allow(AccessType::Public)
        );
        assert_eq!(
            v.validate(OTHER, "kindergarten/test-faces/sample.jpg"),
            AccessDecision::Allow(AccessType::Public)
        );
    }

    #[test]
    fn test_allow_lists_differ_per_bucket() {
        // Guangzhou knows nothing of the photo bucket's roots, and vice versa.
        let gz = BucketValidator::guangzhou();
        let sh = BucketValidator::shanghai();
        assert_eq!(
            gz.validate(OWNER, "kindergarten/photos/a.jpg"),
            AccessDecision::Deny(DenyReason::UnknownNamespace)
        );
        assert_eq!(
            sh.validate(OWNER, "kindergarten/games/a.mp3"),
            AccessDecision::Deny(DenyReason::UnknownNamespace)
        );
    }

    #[test]
    fn test_unknown_prefix_denied() {
        for v in [BucketValidator::guangzhou(), BucketValidator::shanghai()] {
            assert_eq!(
                v.validate(OWNER, "kindergarten/secrets/dump.sql"),
                AccessDecision::Deny(DenyReason::UnknownNamespace)
            );
            assert_eq!(
                v.validate(OWNER, ""),
                AccessDecision::Deny(DenyReason::UnknownNamespace)
            );
        }
    }

    #[test]
    fn test_malformed_tenant_segment_denied() {
        for v in [BucketValidator::guangzhou(), BucketValidator::shanghai()] {
            assert_eq!(
                v.validate(OWNER, "kindergarten/rent/123/photos/a.jpg"),
                AccessDecision::Deny(DenyReason::UnknownNamespace)
            );
        }
    }

    #[test]
    fn test_anonymous_access() {
        let v = BucketValidator::guangzhou();
        assert_eq!(
            v.validate_anonymous("kindergarten/games/bgm.mp3"),
            AccessDecision::Allow(AccessType::Public)
        );
        assert_eq!(
            v.validate_anonymous("kindergarten/rent/13800138000/doc.pdf"),
            AccessDecision::Deny(DenyReason::CrossTenantAccess)
        );
    }
}
