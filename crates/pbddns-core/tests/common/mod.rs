//! Test doubles and common utilities for the contract tests
//!
//! `FakeRegistrar` keeps an in-memory zone and counts every call, so tests can
//! assert exactly which remote operations an upsert or a run performed.

#![allow(dead_code)]

use pbddns_core::error::{Error, Result};
use pbddns_core::traits::{DnsRecord, RegistrarApi};
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A remote call observed by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ping,
    List(String),
    Create(String, Ipv4Addr),
    Update(String, Ipv4Addr),
}

/// Which call should fail, and how
#[derive(Debug, Clone, Default)]
pub struct Failures {
    /// Fail `resolve_public_ip`
    pub ping: bool,
    /// Fail `list_records` for this subdomain
    pub list: Option<String>,
    /// Fail `create_record` / `update_record` for this subdomain
    pub write: Option<String>,
}

/// In-memory registrar that tracks calls
pub struct FakeRegistrar {
    /// IP reported by the echo endpoint
    public_ip: Ipv4Addr,
    /// Records per subdomain label
    zone: Arc<std::sync::Mutex<HashMap<String, Vec<DnsRecord>>>>,
    /// Every call, in order
    calls: Arc<std::sync::Mutex<Vec<Call>>>,
    /// Call counter for create_record() and update_record()
    write_call_count: Arc<AtomicUsize>,
    /// Injected failures
    failures: Failures,
    next_id: Arc<AtomicUsize>,
}

impl FakeRegistrar {
    pub fn new(public_ip: Ipv4Addr) -> Self {
        Self {
            public_ip,
            zone: Arc::new(std::sync::Mutex::new(HashMap::new())),
            calls: Arc::new(std::sync::Mutex::new(Vec::new())),
            write_call_count: Arc::new(AtomicUsize::new(0)),
            failures: Failures::default(),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Seed an A record for `subdomain`
    pub fn with_record(self, subdomain: &str, content: &str) -> Self {
        let record = self.make_record(subdomain, content);
        self.zone
            .lock()
            .unwrap()
            .entry(subdomain.to_string())
            .or_default()
            .push(record);
        self
    }

    /// Inject failures
    pub fn with_failures(mut self, failures: Failures) -> Self {
        self.failures = failures;
        self
    }

    /// Create a new FakeRegistrar that shares zone and counters with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            public_ip: other.public_ip,
            zone: Arc::clone(&other.zone),
            calls: Arc::clone(&other.calls),
            write_call_count: Arc::clone(&other.write_call_count),
            failures: other.failures.clone(),
            next_id: Arc::clone(&other.next_id),
        }
    }

    /// Get the number of create/update calls
    pub fn write_call_count(&self) -> usize {
        self.write_call_count.load(Ordering::SeqCst)
    }

    /// Get every call made so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Current record contents for `subdomain`
    pub fn contents(&self, subdomain: &str) -> Vec<String> {
        self.zone
            .lock()
            .unwrap()
            .get(subdomain)
            .map(|records| records.iter().map(|r| r.content.clone()).collect())
            .unwrap_or_default()
    }

    fn make_record(&self, subdomain: &str, content: &str) -> DnsRecord {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        DnsRecord {
            id: id.to_string(),
            name: if subdomain.is_empty() {
                "example.com".to_string()
            } else {
                format!("{}.example.com", subdomain)
            },
            record_type: "A".to_string(),
            content: content.to_string(),
            ttl: "600".to_string(),
            prio: Some("0".to_string()),
            notes: None,
        }
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_write(&self, subdomain: &str, operation: &'static str) -> Result<()> {
        if self.failures.write.as_deref() == Some(subdomain) {
            return Err(Error::api(operation, None, r#"{"status":"ERROR","message":"write rejected"}"#));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RegistrarApi for FakeRegistrar {
    async fn resolve_public_ip(&self) -> Result<Ipv4Addr> {
        self.record_call(Call::Ping);
        if self.failures.ping {
            return Err(Error::transport("connection refused"));
        }
        Ok(self.public_ip)
    }

    async fn list_records(&self, subdomain: &str) -> Result<Vec<DnsRecord>> {
        self.record_call(Call::List(subdomain.to_string()));
        if self.failures.list.as_deref() == Some(subdomain) {
            return Err(Error::api("get records", Some(500), "internal error"));
        }
        Ok(self
            .zone
            .lock()
            .unwrap()
            .get(subdomain)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_record(&self, ip: Ipv4Addr, subdomain: &str) -> Result<()> {
        self.record_call(Call::Create(subdomain.to_string(), ip));
        self.write_call_count.fetch_add(1, Ordering::SeqCst);
        self.check_write(subdomain, "create record")?;

        let record = self.make_record(subdomain, &ip.to_string());
        self.zone
            .lock()
            .unwrap()
            .entry(subdomain.to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn update_record(&self, ip: Ipv4Addr, subdomain: &str) -> Result<()> {
        self.record_call(Call::Update(subdomain.to_string(), ip));
        self.write_call_count.fetch_add(1, Ordering::SeqCst);
        self.check_write(subdomain, "update record")?;

        if let Some(records) = self.zone.lock().unwrap().get_mut(subdomain) {
            for record in records.iter_mut() {
                record.content = ip.to_string();
            }
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn domain(&self) -> &str {
        "example.com"
    }
}

/// Helper to get a fixed test IP
pub fn test_ip() -> Ipv4Addr {
    Ipv4Addr::new(203, 0, 113, 10)
}
