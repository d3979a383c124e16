//! Configuration loading and types for Kindergate.
//!
//! Configuration is read from a YAML file and deserialized into the
//! [`Config`] struct.  The value is immutable after load and is passed
//! explicitly into the resolver, validators, and OSS clients -- nothing
//! reads ambient global state, which keeps the decision logic
//! deterministic under test.

use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Signed-URL settings.
    #[serde(default)]
    pub signing: SigningConfig,

    /// The two OSS buckets.
    #[serde(default)]
    pub buckets: BucketsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Observability settings (metrics + health probes).
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            signing: SigningConfig::default(),
            buckets: BucketsConfig::default(),
            logging: LoggingConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

/// Signed-URL settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SigningConfig {
    /// Lifetime of issued signed URLs in seconds.
    #[serde(default = "default_url_ttl")]
    pub url_ttl_seconds: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            url_ttl_seconds: default_url_ttl(),
        }
    }
}

/// The two physical buckets.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketsConfig {
    /// General-purpose assets bucket (Guangzhou region).
    #[serde(default = "default_guangzhou_bucket")]
    pub guangzhou: BucketConfig,

    /// Photo / face-recognition bucket (Shanghai region).
    #[serde(default = "default_shanghai_bucket")]
    pub shanghai: BucketConfig,
}

impl Default for BucketsConfig {
    fn default() -> Self {
        Self {
            guangzhou: default_guangzhou_bucket(),
            shanghai: default_shanghai_bucket(),
        }
    }
}

/// One bucket's connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketConfig {
    /// Bucket name.
    pub name: String,

    /// Region endpoint token (e.g. `oss-cn-guangzhou`).
    pub region: String,

    /// Access key ID for signing.
    #[serde(default)]
    pub access_key_id: String,

    /// Access key secret for signing.
    #[serde(default)]
    pub access_key_secret: String,

    /// Override for the public hostname.  When empty the hostname is
    /// derived as `<name>.<region>.aliyuncs.com`.
    #[serde(default)]
    pub endpoint: String,
}

impl BucketConfig {
    /// The public hostname URLs for this bucket carry.
    pub fn host(&self) -> String {
        if self.endpoint.is_empty() {
            format!("{}.{}.aliyuncs.com", self.name, self.region)
        } else {
            self.endpoint.clone()
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: text or json.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Enable Prometheus metrics collection and the `/metrics` endpoint.
    #[serde(default = "default_true")]
    pub metrics: bool,

    /// Enable the `/health` probe.
    #[serde(default = "default_true")]
    pub health_check: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics: true,
            health_check: true,
        }
    }
}

// -- Defaults ----------------------------------------------------------------

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9040
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_url_ttl() -> u64 {
    1800 // 30 minutes, the OSS client default
}

fn default_guangzhou_bucket() -> BucketConfig {
    BucketConfig {
        name: "kg-assets".to_string(),
        region: "oss-cn-guangzhou".to_string(),
        access_key_id: String::new(),
        access_key_secret: String::new(),
        endpoint: String::new(),
    }
}

fn default_shanghai_bucket() -> BucketConfig {
    BucketConfig {
        name: "kg-faces".to_string(),
        region: "oss-cn-shanghai".to_string(),
        access_key_id: String::new(),
        access_key_secret: String::new(),
        endpoint: String::new(),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// -- Loader ------------------------------------------------------------------

/// Load and parse configuration from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: Config = serde_yaml::from_str(&contents)?;
    Ok(config)
}

// -- Tests --------------------------------------------------------------------
