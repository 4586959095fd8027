//! Record reconciliation
//!
//! Compare-then-update for one record: list the provider's record for the
//! family's record type, and write the observed address only if the stored
//! content differs.

use crate::config::DdnsConfig;
use crate::error::{Error, Result};
use crate::traits::{AddressFamily, DnsProvider, RecordUpdate, UpdateResult};
use std::fmt;
use tracing::{debug, info};

/// Terminal state of a successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Stored content already matched, nothing written
    Unchanged {
        family: AddressFamily,
        address: String,
    },

    /// Stored content differed and the provider accepted the new address
    Updated {
        family: AddressFamily,
        previous: String,
        address: String,
    },

    /// Stored content differed but the write was skipped (dry-run)
    DryRun {
        family: AddressFamily,
        previous: String,
        address: String,
    },
}

impl ReconcileOutcome {
    /// Family this outcome belongs to
    pub fn family(&self) -> AddressFamily {
        match self {
            ReconcileOutcome::Unchanged { family, .. }
            | ReconcileOutcome::Updated { family, .. }
            | ReconcileOutcome::DryRun { family, .. } => *family,
        }
    }

    /// The address the record holds (or would hold) after this pass
    pub fn address(&self) -> &str {
        match self {
            ReconcileOutcome::Unchanged { address, .. }
            | ReconcileOutcome::Updated { address, .. }
            | ReconcileOutcome::DryRun { address, .. } => address,
        }
    }

    /// Whether the remote record was written
    pub fn is_updated(&self) -> bool {
        matches!(self, ReconcileOutcome::Updated { .. })
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record_type = self.family().record_type();
        match self {
            ReconcileOutcome::Unchanged { address, .. } => {
                write!(f, "{} record already up to date ({})", record_type, address)
            }
            ReconcileOutcome::Updated { address, .. } => {
                write!(f, "{} record updated to {}", record_type, address)
            }
            ReconcileOutcome::DryRun { address, .. } => {
                write!(f, "[dry-run] {} record would be updated to {}", record_type, address)
            }
        }
    }
}

/// Reconciles the provider's records for one hostname
///
/// The reconciler copies what it needs out of the configuration at
/// construction time; it holds no other state and can be reused for both
/// families.
pub struct Reconciler {
    /// DNS provider for reading and writing records
    provider: Box<dyn DnsProvider>,

    /// Name written in update payloads (relative to the zone)
    subdomain: String,

    /// Fully qualified name used for lookups
    hostname: String,
}

impl Reconciler {
    /// Create a reconciler for the record named by `config`
    pub fn new(provider: Box<dyn DnsProvider>, config: &DdnsConfig) -> Self {
        Self {
            provider,
            subdomain: config.subdomain.clone(),
            hostname: config.hostname(),
        }
    }

    /// Fully qualified name of the managed records
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Bring the record for `family` in line with `observed`
    ///
    /// Issues one lookup, then at most one write.
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileOutcome)`: Unchanged, Updated or DryRun
    /// - `Err(Error::RecordNotFound)`: The lookup returned no record
    /// - `Err(Error)`: Any lookup or write failure
    pub async fn reconcile(
        &self,
        family: AddressFamily,
        observed: &str,
    ) -> Result<ReconcileOutcome> {
        let record_type = family.record_type();

        let records = self
            .provider
            .list_records(record_type, &self.hostname)
            .await?;

        let record = records.into_iter().next().ok_or_else(|| Error::RecordNotFound {
            record_type,
            hostname: self.hostname.clone(),
        })?;

        debug!(
            "Provider {} holds {} {} -> {} (id {})",
            self.provider.provider_name(),
            record_type,
            record.name,
            record.content,
            record.id
        );

        if record.content == observed {
            info!(
                "{} record {} already points to {}",
                record_type, self.hostname, observed
            );
            return Ok(ReconcileOutcome::Unchanged {
                family,
                address: observed.to_string(),
            });
        }

        info!(
            "Updating {} record {}: {} -> {}",
            record_type, self.hostname, record.content, observed
        );

        let update = RecordUpdate::new(record_type, self.subdomain.clone(), observed);
        let result = self.provider.update_record(&record.id, &update).await?;

        let outcome = match result {
            UpdateResult::Applied => ReconcileOutcome::Updated {
                family,
                previous: record.content,
                address: observed.to_string(),
            },
            UpdateResult::DryRun => ReconcileOutcome::DryRun {
                family,
                previous: record.content,
                address: observed.to_string(),
            },
        };

        Ok(outcome)
    }
}
