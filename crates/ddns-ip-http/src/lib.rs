// # HTTP Address Resolver
//
// This crate provides the HTTP-based address resolver for the DDNS
// reconciler.
//
// ## Architecture
//
// One GET per call to a family-specific "what is my IP" endpoint. The
// default endpoints are ipify's:
//
// - IPv4: https://api.ipify.org/ (only reachable over IPv4)
// - IPv6: https://api6.ipify.org/ (only reachable over IPv6)
//
// The plain-text body is the answer. No caching, no retry, no polling.

use ddns_core::config::DdnsConfig;
use ddns_core::traits::{AddressFamily, AddressResolver};
use ddns_core::{Error, Result, Stage};

use std::time::Duration;

/// HTTP-based address resolver
pub struct HttpAddressResolver {
    /// URL answering with the caller's IPv4 address
    ipv4_url: String,

    /// URL answering with the caller's IPv6 address
    ipv6_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAddressResolver {
    /// Create a new HTTP address resolver
    ///
    /// # Parameters
    ///
    /// - `ipv4_url`: URL to fetch the IPv4 address from (e.g. "https://api.ipify.org/")
    /// - `ipv6_url`: URL to fetch the IPv6 address from (e.g. "https://api6.ipify.org/")
    /// - `timeout`: Per-request timeout
    pub fn new(
        ipv4_url: impl Into<String>,
        ipv6_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            ipv4_url: ipv4_url.into(),
            ipv6_url: ipv6_url.into(),
            client,
        })
    }

    /// Create a resolver from the configured endpoints and timeout
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(
            config.endpoints.ipv4_resolver.clone(),
            config.endpoints.ipv6_resolver.clone(),
            config.timeout(),
        )
    }

    fn url(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::Ipv4 => &self.ipv4_url,
            AddressFamily::Ipv6 => &self.ipv6_url,
        }
    }
}

#[async_trait::async_trait]
impl AddressResolver for HttpAddressResolver {
    async fn resolve(&self, family: AddressFamily) -> Result<String> {
        let stage = Stage::ResolveAddress(family);
        let url = self.url(family);

        tracing::debug!("Fetching {} address from {}", family, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(stage, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned HTTP {}", url, status);
            return Err(Error::Status {
                stage,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::from_reqwest(stage, e))?;

        let address = body.trim();
        if address.is_empty() {
            return Err(Error::invalid_response(stage, "empty response body"));
        }

        Ok(address.to_string())
    }

    fn resolver_name(&self) -> &'static str {
        "http"
    }
}
