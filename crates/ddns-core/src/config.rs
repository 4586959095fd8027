//! Configuration types for the DDNS reconciler
//!
//! The configuration is a TOML file loaded once per run:
//!
//! ```toml
//! subdomain = "www"
//! domain = "example.com"
//! zone_identifier = "023e105f4ecef8ad9ca31a8372d0c353"
//! api_token = "..."
//! ipv4_enabled = true
//! ipv6_enabled = false
//!
//! # optional
//! timeout_secs = 30
//!
//! [endpoints]
//! api_base = "https://api.cloudflare.com/client/v4"
//! ipv4_resolver = "https://api.ipify.org/"
//! ipv6_resolver = "https://api6.ipify.org/"
//! ```

use crate::error::{Error, Result};
use crate::traits::AddressFamily;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Cloudflare API v4 base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Public IPv4 resolver
pub const DEFAULT_IPV4_RESOLVER: &str = "https://api.ipify.org/";

/// Public IPv6 resolver
pub const DEFAULT_IPV6_RESOLVER: &str = "https://api6.ipify.org/";

/// Main DDNS configuration
///
/// The zone identifier and API token are opaque: they are passed to the
/// provider untouched and never checked locally.
#[derive(Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Record name relative to the zone (e.g. "www")
    pub subdomain: String,

    /// Zone apex (e.g. "example.com")
    pub domain: String,

    /// Provider-assigned zone identifier
    pub zone_identifier: String,

    /// Provider API token
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// Whether the A record is kept in sync
    pub ipv4_enabled: bool,

    /// Whether the AAAA record is kept in sync
    pub ipv6_enabled: bool,

    /// Per-request HTTP timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Remote endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("subdomain", &self.subdomain)
            .field("domain", &self.domain)
            .field("zone_identifier", &self.zone_identifier)
            .field("api_token", &"<REDACTED>")
            .field("ipv4_enabled", &self.ipv4_enabled)
            .field("ipv6_enabled", &self.ipv6_enabled)
            .field("timeout_secs", &self.timeout_secs)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl DdnsConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.subdomain.trim().is_empty() {
            return Err(Error::config("subdomain cannot be empty"));
        }
        if self.domain.trim().is_empty() {
            return Err(Error::config("domain cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be > 0"));
        }

        self.endpoints.validate()?;

        Ok(())
    }

    /// Fully qualified name of the managed records
    pub fn hostname(&self) -> String {
        format!("{}.{}", self.subdomain, self.domain)
    }

    /// Per-request HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether `family` is kept in sync
    pub fn is_enabled(&self, family: AddressFamily) -> bool {
        match family {
            AddressFamily::Ipv4 => self.ipv4_enabled,
            AddressFamily::Ipv6 => self.ipv6_enabled,
        }
    }

    /// Enabled families, IPv4 first
    pub fn enabled_families(&self) -> Vec<AddressFamily> {
        AddressFamily::ALL
            .into_iter()
            .filter(|family| self.is_enabled(*family))
            .collect()
    }
}

/// Remote endpoints used during a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Provider API base URL, without trailing slash
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// URL answering with the caller's IPv4 address
    #[serde(default = "default_ipv4_resolver")]
    pub ipv4_resolver: String,

    /// URL answering with the caller's IPv6 address
    #[serde(default = "default_ipv6_resolver")]
    pub ipv6_resolver: String,
}

impl EndpointConfig {
    /// Resolver URL for `family`
    pub fn resolver(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::Ipv4 => &self.ipv4_resolver,
            AddressFamily::Ipv6 => &self.ipv6_resolver,
        }
    }

    fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("endpoints.api_base", &self.api_base),
            ("endpoints.ipv4_resolver", &self.ipv4_resolver),
            ("endpoints.ipv6_resolver", &self.ipv6_resolver),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(Error::config(format!(
                    "{} must be an http(s) URL. Got: '{}'",
                    key, url
                )));
            }
        }
        Ok(())
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            ipv4_resolver: default_ipv4_resolver(),
            ipv6_resolver: default_ipv6_resolver(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_ipv4_resolver() -> String {
    DEFAULT_IPV4_RESOLVER.to_string()
}

fn default_ipv6_resolver() -> String {
    DEFAULT_IPV6_RESOLVER.to_string()
}
