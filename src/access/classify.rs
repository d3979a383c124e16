//! Logical path classification.
//!
//! Every object path in the platform lives under the `kindergarten` root
//! namespace and is either tenant-scoped (`rent/<tenant>/...`) or belongs
//! to a shared namespace (`system/`, `games/`, ...).  The classifier only
//! recognizes shape; whether a given namespace is actually public for a
//! particular bucket is the validator's call, since the allow-lists differ
//! per bucket.

/// Root namespace all logical paths live under.  The classifier strips it
/// when present so callers can pass paths with or without the root.
pub const ROOT_NAMESPACE: &str = "kindergarten";

/// Path segment that introduces a tenant-scoped subtree.
pub const TENANT_SEGMENT: &str = "rent";

/// Expected length of a tenant identifier (Chinese mobile number).
const TENANT_ID_LEN: usize = 11;

/// Check whether `id` is a well-formed tenant identifier: 11 ASCII digits
/// starting with `1`.  Malformed identifiers are rejected, never normalized.
pub fn is_valid_tenant_id(id: &str) -> bool {
    id.len() == TENANT_ID_LEN
        && id.starts_with('1')
        && id.bytes().all(|b| b.is_ascii_digit())
}

/// Shape of a logical path, borrowed from the input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass<'a> {
    /// `rent/<tenant>/...` with a well-formed tenant id.
    TenantScoped {
        /// The owning tenant's identifier, taken literally from the path.
        owner: &'a str,
        /// The segment after the tenant id, if any (e.g. `photos`).
        category: Option<&'a str>,
    },
    /// Any other path with at least one segment.  The validator decides
    /// whether `prefix` is on the bucket's public allow-list.
    Namespace {
        /// First segment after the root namespace.
        prefix: &'a str,
    },
    /// Empty or root-only path.  Neither allowed nor denied here.
    Unrecognized,
}

impl PathClass<'_> {
    /// The owning tenant, when the path is tenant-scoped.
    pub fn owner_tenant(&self) -> Option<&str> {
        match self {
            PathClass::TenantScoped { owner, .. } => Some(owner),
            _ => None,
        }
    }

    /// Whether the path carries a `rent/<tenant>` segment.
    pub fn is_tenant_scoped(&self) -> bool {
        matches!(self, PathClass::TenantScoped { .. })
    }
}

/// Strip leading slashes and, when present, the root namespace.
///
/// `kindergarten/games/x` and `games/x` normalize to the same remainder.
fn strip_root(path: &str) -> &str {
    let path = path.trim_start_matches('/');
    match path.strip_prefix(ROOT_NAMESPACE) {
        Some(rest) if rest.is_empty() => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        // `kindergartenX/...` is a different namespace, not the root.
        _ => path,
    }
}

/// Classify a logical path.
///
/// Never fails: unrecognized shapes come back as [`PathClass::Unrecognized`]
/// and malformed tenant segments (e.g. `rent/123/...`) fall through to
/// [`PathClass::Namespace`] with prefix `rent`, which no bucket allow-list
/// contains, so validators deny them.
pub fn classify(path: &str) -> PathClass<'_> {
    let rest = strip_root(path);
    if rest.is_empty() {
        return PathClass::Unrecognized;
    }

    let mut segments = rest.splitn(3, '/');
    let first = segments.next().unwrap_or("");
    if first.is_empty() {
        return PathClass::Unrecognized;
    }

    if first == TENANT_SEGMENT {
        if let Some(owner) = segments.next() {
            if is_valid_tenant_id(owner) {
                let category = segments
                    .next()
                    .map(|tail| tail.split('/').next().unwrap_or(tail))
                    .filter(|c| !c.is_empty());
                return PathClass::TenantScoped { owner, category };
            }
        }
        // `rent` alone or with a malformed id: treat as an (unknown) namespace.
        return PathClass::Namespace { prefix: first };
    }

    PathClass::Namespace { prefix: first }
}

// -- Tests --------------------------------------------------------------------
