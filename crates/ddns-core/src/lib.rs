// # ddns-core
//
// Core library for the single-pass DDNS reconciler.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping address records
// in line with the host's public address:
// - **AddressResolver**: Trait for discovering the public IPv4/IPv6 address
// - **DnsProvider**: Trait for listing and updating records via provider APIs
// - **Reconciler**: Compare-then-update for one record
// - **DdnsEngine**: Runs resolve → reconcile for every enabled family
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Single Pass**: One run, no loop, no retry; scheduling is external
// 3. **Explicit Configuration**: `DdnsConfig` is passed in, never global
// 4. **Errors as Values**: Nothing in the library exits the process

pub mod config;
pub mod engine;
pub mod error;
pub mod traits;

// Re-export core types for convenience
pub use config::{DdnsConfig, EndpointConfig};
pub use engine::{DdnsEngine, ReconcileOutcome, Reconciler};
pub use error::{Error, Result, Stage};
pub use traits::{
    AddressFamily, AddressResolver, DnsProvider, DnsRecord, RecordType, RecordUpdate,
    UpdateResult,
};
