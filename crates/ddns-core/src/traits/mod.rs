//! Core traits for the DDNS reconciler
//!
//! - [`AddressResolver`]: Discover the host's public address
//! - [`DnsProvider`]: Read and write address records via a provider API

pub mod address_resolver;
pub mod dns_provider;

pub use address_resolver::{AddressFamily, AddressResolver};
pub use dns_provider::{DEFAULT_TTL, DnsProvider, DnsRecord, RecordType, RecordUpdate, UpdateResult};
