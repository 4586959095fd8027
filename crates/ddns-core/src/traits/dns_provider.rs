// # DNS Provider Trait
//
// Defines the interface for reading and writing address records through a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, RecordType, RecordUpdate};
//
// #[tokio::main]
// async fn main() -> ddns_core::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_records(RecordType::A, "www.example.com").await?;
//     if let Some(record) = records.first() {
//         let update = RecordUpdate::new(RecordType::A, "www", "203.0.113.9");
//         provider.update_record(&record.id, &update).await?;
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// TTL written with every update (seconds)
pub const DEFAULT_TTL: u32 = 300;

/// DNS record type managed by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// The type tag as the provider spells it
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as published by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// The record ID (provider-specific, stable until the record is recreated)
    pub id: String,
    /// The record type tag as returned by the provider
    pub record_type: String,
    /// The fully qualified record name
    pub name: String,
    /// The stored content (an IP address literal for A/AAAA)
    pub content: String,
}

/// Payload written to an existing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record name relative to the zone
    pub name: String,
    /// New content
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Whether the provider should proxy traffic for this record
    pub proxied: bool,
}

impl RecordUpdate {
    /// Create an unproxied update with the default TTL
    pub fn new(
        record_type: RecordType,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            name: name.into(),
            content: content.into(),
            ttl: DEFAULT_TTL,
            proxied: false,
        }
    }
}

/// Result of a write call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// The provider accepted the new content
    Applied,
    /// The write was skipped because the provider runs in dry-run mode
    DryRun,
}

/// Trait for DNS provider implementations
///
/// Providers are stateless and single-shot: each method issues exactly one
/// API call and reports the result. Deciding whether a write is needed is
/// the reconciler's job, not the provider's.
///
/// The provider is constructed with its credentials and zone; neither is
/// validated locally. A wrong token or zone surfaces as an
/// [`Error::Status`](crate::Error::Status) from the first call.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the records of `record_type` whose name is exactly `hostname`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: Matching records, possibly empty
    /// - `Err(Error)`: Transport failure, non-success status or malformed body
    async fn list_records(
        &self,
        record_type: RecordType,
        hostname: &str,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Overwrite the record identified by `record_id`
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateResult)`: Whether the write was applied or skipped (dry-run)
    /// - `Err(Error)`: Transport failure or non-success status
    async fn update_record(
        &self,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<UpdateResult, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
