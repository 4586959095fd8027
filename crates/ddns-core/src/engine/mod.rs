//! Core DDNS engine
//!
//! The DdnsEngine runs one reconciliation pass:
//! - Resolving the public address via AddressResolver
//! - Reconciling the provider's record via Reconciler
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ AddressResolver │─── address ───┐
//! └─────────────────┘               │
//!                                   ▼
//!                          ┌──────────────┐
//!                          │  Reconciler  │
//!                          └──────────────┘
//!                                   │
//!                     ┌─────────────┴─────────────┐
//!                     ▼                           ▼
//!             ┌──────────────┐            ┌──────────────┐
//!             │ list_records │            │ update_record│
//!             │   (always)   │            │ (on mismatch)│
//!             └──────────────┘            └──────────────┘
//! ```
//!
//! ## Pass Flow
//!
//! For each enabled family, IPv4 first:
//!
//! 1. Resolve the public address
//! 2. Look up the provider's record
//! 3. If the content differs, write the new address
//!
//! The first error ends the pass. There is no retry: the next scheduled run
//! is the retry.

pub mod reconciler;

pub use reconciler::{ReconcileOutcome, Reconciler};

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::traits::{AddressFamily, AddressResolver};
use tracing::{debug, info, warn};

/// Core DDNS engine
///
/// Owns the resolver, the reconciler and the list of enabled families. All
/// work happens sequentially on the caller's task.
pub struct DdnsEngine {
    /// Address resolver for discovering the public address
    resolver: Box<dyn AddressResolver>,

    /// Reconciler for the configured hostname
    reconciler: Reconciler,

    /// Families to sync, in order
    families: Vec<AddressFamily>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `resolver`: Address resolver implementation
    /// - `reconciler`: Reconciler wrapping the DNS provider
    /// - `config`: Configuration the enabled families are read from
    pub fn new(
        resolver: Box<dyn AddressResolver>,
        reconciler: Reconciler,
        config: &DdnsConfig,
    ) -> Self {
        Self {
            resolver,
            reconciler,
            families: config.enabled_families(),
        }
    }

    /// Families this engine syncs, in order
    pub fn families(&self) -> &[AddressFamily] {
        &self.families
    }

    /// Resolve and reconcile a single family
    pub async fn sync_family(&self, family: AddressFamily) -> Result<ReconcileOutcome> {
        debug!(
            "Resolving {} address via {}",
            family,
            self.resolver.resolver_name()
        );
        let address = self.resolver.resolve(family).await?;
        debug!("Resolved {} address: {}", family, address);

        self.reconciler.reconcile(family, &address).await
    }

    /// Run one pass over every enabled family
    ///
    /// `on_outcome` is called right after each family succeeds, so callers
    /// can report progress before a later family fails.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ReconcileOutcome>)`: One outcome per enabled family
    /// - `Err(Error)`: The first failure; later families are not attempted
    pub async fn run<F>(&self, mut on_outcome: F) -> Result<Vec<ReconcileOutcome>>
    where
        F: FnMut(&ReconcileOutcome),
    {
        if self.families.is_empty() {
            warn!("Both ipv4_enabled and ipv6_enabled are false, nothing to do");
            return Ok(Vec::new());
        }

        info!(
            "Starting pass for {} ({} famil{})",
            self.reconciler.hostname(),
            self.families.len(),
            if self.families.len() == 1 { "y" } else { "ies" }
        );

        let mut outcomes = Vec::with_capacity(self.families.len());
        for family in &self.families {
            let outcome = self.sync_family(*family).await?;
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        info!("Pass finished for {}", self.reconciler.hostname());
        Ok(outcomes)
    }
}
