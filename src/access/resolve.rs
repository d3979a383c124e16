//! Bucket resolution from fully-qualified URLs.
//!
//! Stored asset URLs point at one of two OSS buckets, distinguished by the
//! bucket name and region token embedded in the hostname
//! (`<bucket>.<region>.aliyuncs.com`).  Resolution is exact hostname
//! matching; unrecognized hostnames resolve to `None` rather than guessing.

/// The two physical buckets this platform spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketId {
    /// General-purpose assets (games, education media, documents, uploads).
    Guangzhou,
    /// Photo and face-recognition assets.
    Shanghai,
}

impl BucketId {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketId::Guangzhou => "guangzhou",
            BucketId::Shanghai => "shanghai",
        }
    }
}

/// Extract the hostname from a URL string, without a URL parser.
///
/// Accepts `scheme://host/path`, `//host/path`, or a bare `host/path`.
/// The port, path, query, and fragment are dropped.  Returns `None` for
/// strings with no host portion.
pub fn url_hostname(url: &str) -> Option<&str> {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url.strip_prefix("//").unwrap_or(url),
    };
    let host_port = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("");
    let host = host_port.split(':').next().unwrap_or("");
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Maps URL hostnames to bucket identities.  Built once from configuration
/// and immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct BucketResolver {
    guangzhou_host: String,
    shanghai_host: String,
}

impl BucketResolver {
    /// Build a resolver from the two buckets' public hostnames.
    pub fn new(guangzhou_host: impl Into<String>, shanghai_host: impl Into<String>) -> Self {
        Self {
            guangzhou_host: guangzhou_host.into().to_ascii_lowercase(),
            shanghai_host: shanghai_host.into().to_ascii_lowercase(),
        }
    }

    /// Resolve which bucket issued `url`, by exact hostname match.
    /// First match wins; unknown hostnames return `None`.
    pub fn resolve(&self, url: &str) -> Option<BucketId> {
        let host = url_hostname(url)?.to_ascii_lowercase();
        if host == self.guangzhou_host {
            Some(BucketId::Guangzhou)
        } else if host == self.shanghai_host {
            Some(BucketId::Shanghai)
        } else {
            None
        }
    }

    /// The configured hostname for `bucket`.
    pub fn host(&self, bucket: BucketId) -> &str {
        match bucket {
            BucketId::Guangzhou => &self.guangzhou_host,
            BucketId::Shanghai => &self.shanghai_host,
        }
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> BucketResolver {
        BucketResolver::new(
            "kg-assets.oss-cn-guangzhou.aliyuncs.com",
            "kg-faces.oss-cn-shanghai.aliyuncs.com",
        )
    }

    #[test]
    fn test_url_hostname() {
        assert_eq!(
            url_hostname("https://kg-assets.oss-cn-guangzhou.aliyuncs.com/a/b.jpg"),
            Some("kg-assets.oss-cn-guangzhou.aliyuncs.com")
        );
        assert_eq!(url_hostname("http://host:8080/x?y=1"), Some("host"));
        assert_eq!(url_hostname("//host/x"), Some("host"));
        assert_eq!(url_hostname("host/x"), Some("host"));
        assert_eq!(url_hostname(""), None);
        assert_eq!(url_hostname("https:///no-host"), None);
    }

    #[test]
    fn test_resolve_guangzhou() {
        let r = resolver();
        assert_eq!(
            r.resolve("https://kg-assets.oss-cn-guangzhou.aliyuncs.com/kindergarten/games/a.mp3"),
            Some(BucketId::Guangzhou)
        );
    }

    #[test]
    fn test_resolve_shanghai() {
        let r = resolver();
        assert_eq!(
            r.resolve("https://kg-faces.oss-cn-shanghai.aliyuncs.com/kindergarten/photos/a.jpg"),
            Some(BucketId::Shanghai)
        );
    }

    #[test]
    fn test_resolve_is_a_function_of_hostname_only() {
        // Two URLs differing only in path resolve identically.
        let r = resolver();
        let a = r.resolve("https://kg-faces.oss-cn-shanghai.aliyuncs.com/x");
        let b = r.resolve("https://kg-faces.oss-cn-shanghai.aliyuncs.com/completely/other?q=1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_unknown_host() {
        let r = resolver();
        assert_eq!(r.resolve("https://evil.example.com/kindergarten/games/a.mp3"), None);
        // No partial matching: a hostname merely containing the real one
        // does not resolve.
        assert_eq!(
            r.resolve("https://kg-assets.oss-cn-guangzhou.aliyuncs.com.evil.com/a"),
            None
        );
        assert_eq!(r.resolve("not a url"), None);
    }

    #[test]
    fn test_resolve_case_insensitive_host() {
        let r = resolver();
        assert_eq!(
            r.resolve("https://KG-Assets.OSS-CN-Guangzhou.aliyuncs.com/a"),
            Some(BucketId::Guangzhou)
        );
    }
}
