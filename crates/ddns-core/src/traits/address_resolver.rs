// # Address Resolver Trait
//
// Defines the interface for discovering the host's public address as seen
// from the outside.
//
// ## Implementations
//
// - ipify over HTTPS: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{AddressFamily, AddressResolver};
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let resolver = /* AddressResolver implementation */;
//
//     let address = resolver.resolve(AddressFamily::Ipv4).await?;
//     println!("public IPv4 address: {}", address);
//
//     Ok(())
// }
// ```

use crate::traits::RecordType;
use async_trait::async_trait;
use std::fmt;

/// IP address family (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Both families, in the order a pass visits them
    pub const ALL: [AddressFamily; 2] = [AddressFamily::Ipv4, AddressFamily::Ipv6];

    /// The DNS record type that carries addresses of this family
    pub fn record_type(self) -> RecordType {
        match self {
            AddressFamily::Ipv4 => RecordType::A,
            AddressFamily::Ipv6 => RecordType::Aaaa,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => f.write_str("IPv4"),
            AddressFamily::Ipv6 => f.write_str("IPv6"),
        }
    }
}

/// Trait for address resolver implementations
///
/// A resolver performs exactly one lookup per call. It never caches a
/// previous answer and never retries; a failed lookup is returned to the
/// caller as is.
///
/// The returned string is the resolver's answer with surrounding whitespace
/// removed. It is not parsed as an IP literal: the provider is the judge of
/// whether the content is acceptable.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Get the current public address for `family`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The address as reported by the resolver
    /// - `Err(Error)`: Timeout, connection failure, non-success status or
    ///   empty body
    async fn resolve(&self, family: AddressFamily) -> Result<String, crate::Error>;

    /// Get the resolver name (for logging/debugging)
    fn resolver_name(&self) -> &'static str;
}
