//! Test doubles and common utilities for reconciliation contract tests
//!
//! The doubles count calls so tests can assert which HTTP calls a real
//! implementation would have made.

#![allow(dead_code)]

use ddns_core::error::{Error, Result, Stage};
use ddns_core::traits::{
    AddressFamily, AddressResolver, DnsProvider, DnsRecord, RecordType, RecordUpdate,
    UpdateResult,
};
use ddns_core::DdnsConfig;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a resolver double answers for one family
#[derive(Debug, Clone)]
pub enum ResolverAnswer {
    Address(String),
    Timeout,
    ConnectionRefused,
}

/// A resolver with canned answers per family
pub struct MockResolver {
    answers: HashMap<AddressFamily, ResolverAnswer>,
    calls: Arc<Mutex<Vec<AddressFamily>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_answer(mut self, family: AddressFamily, answer: ResolverAnswer) -> Self {
        self.answers.insert(family, answer);
        self
    }

    pub fn with_address(self, family: AddressFamily, address: &str) -> Self {
        self.with_answer(family, ResolverAnswer::Address(address.to_string()))
    }

    /// Families resolve() was called with, in order
    pub fn calls(&self) -> Vec<AddressFamily> {
        self.calls.lock().unwrap().clone()
    }

    /// Create a resolver that shares answers and the call log with `other`
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            answers: other.answers.clone(),
            calls: Arc::clone(&other.calls),
        }
    }
}

#[async_trait::async_trait]
impl AddressResolver for MockResolver {
    async fn resolve(&self, family: AddressFamily) -> Result<String> {
        self.calls.lock().unwrap().push(family);

        let stage = Stage::ResolveAddress(family);
        match self.answers.get(&family) {
            Some(ResolverAnswer::Address(address)) => Ok(address.clone()),
            Some(ResolverAnswer::Timeout) => Err(Error::Timeout { stage }),
            Some(ResolverAnswer::ConnectionRefused) | None => {
                Err(Error::connect(stage, "connection refused"))
            }
        }
    }

    fn resolver_name(&self) -> &'static str {
        "mock"
    }
}

/// How a provider double answers update_record()
#[derive(Debug, Clone, Copy)]
pub enum UpdateBehavior {
    Accept,
    DryRun,
    RejectWith(u16),
}

/// A provider double holding records in memory and logging every call
pub struct MockDnsProvider {
    records: HashMap<RecordType, Vec<DnsRecord>>,
    update_behavior: UpdateBehavior,
    list_call_count: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<(String, RecordUpdate)>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            update_behavior: UpdateBehavior::Accept,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Publish a record of `record_type` with the given id and content
    pub fn with_record(mut self, record_type: RecordType, id: &str, content: &str) -> Self {
        self.records.entry(record_type).or_default().push(DnsRecord {
            id: id.to_string(),
            record_type: record_type.to_string(),
            name: "www.example.com".to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn with_update_behavior(mut self, behavior: UpdateBehavior) -> Self {
        self.update_behavior = behavior;
        self
    }

    /// Number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Every update_record() call as (record id, payload)
    pub fn updates(&self) -> Vec<(String, RecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    /// Create a provider that shares records and counters with `other`
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            records: other.records.clone(),
            update_behavior: other.update_behavior,
            list_call_count: Arc::clone(&other.list_call_count),
            updates: Arc::clone(&other.updates),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(
        &self,
        record_type: RecordType,
        _hostname: &str,
    ) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.get(&record_type).cloned().unwrap_or_default())
    }

    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<UpdateResult> {
        self.updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), update.clone()));

        match self.update_behavior {
            UpdateBehavior::Accept => Ok(UpdateResult::Applied),
            UpdateBehavior::DryRun => Ok(UpdateResult::DryRun),
            UpdateBehavior::RejectWith(status) => Err(Error::Status {
                stage: Stage::UpdateRecord(update.record_type),
                status,
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(ipv4_enabled: bool, ipv6_enabled: bool) -> DdnsConfig {
    DdnsConfig {
        subdomain: "www".to_string(),
        domain: "example.com".to_string(),
        zone_identifier: "test-zone".to_string(),
        api_token: "test-token".to_string(),
        ipv4_enabled,
        ipv6_enabled,
        timeout_secs: 30,
        endpoints: Default::default(),
    }
}
