// # Registrar API Trait
//
// The narrow capability set the updater needs from a registrar:
// public IP discovery, A-record lookup, create and edit.
//
// ## Implementations
//
// - Porkbun JSON API v3: `pbddns-provider-porkbun` crate
//
// ## Usage
//
// ```rust,ignore
// use pbddns_core::RegistrarApi;
//
// async fn refresh(api: &dyn RegistrarApi) -> pbddns_core::Result<()> {
//     let ip = api.resolve_public_ip().await?;
//     api.upsert_record(ip, "www").await?;
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;

/// An A record as reported by the registrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Registrar-assigned record ID
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    /// Fully qualified record name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Record type, always "A" for this updater
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub record_type: String,
    /// Record content (the IP address string)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Time-to-live, as the registrar reports it
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ttl: String,
    /// Priority (unused for A records)
    #[serde(default)]
    pub prio: Option<String>,
    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,
}

// The registrar sends `null` for some fields on older records
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DnsRecord {
    /// Whether the record already points at `ip`
    ///
    /// Content that does not parse as an IPv4 address never matches.
    pub fn points_to(&self, ip: Ipv4Addr) -> bool {
        self.content.trim().parse::<Ipv4Addr>() == Ok(ip)
    }
}

/// Result of a single upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// The existing record was edited
    Updated {
        /// The record content before the edit
        previous_content: String,
        /// The new IP address
        new_ip: Ipv4Addr,
    },
    /// The record already had the correct IP (no write issued)
    Unchanged {
        /// The current IP address
        current_ip: Ipv4Addr,
    },
    /// No record existed, one was created
    Created {
        /// The created IP address
        new_ip: Ipv4Addr,
    },
}

impl UpdateResult {
    /// Whether a write call was issued
    pub fn is_write(&self) -> bool {
        !matches!(self, UpdateResult::Unchanged { .. })
    }
}

/// Trait for registrar API clients
///
/// Each method performs exactly one remote call, except
/// [`RegistrarApi::upsert_record`], which composes a lookup with at most one
/// write. Implementations hold no state between calls and never retry.
#[async_trait]
pub trait RegistrarApi: Send + Sync {
    /// Resolve the caller's public IPv4 address via the registrar's echo
    /// endpoint
    async fn resolve_public_ip(&self) -> Result<Ipv4Addr, crate::Error>;

    /// List the existing A records for `subdomain` (empty = root domain)
    ///
    /// Returns an empty vector if the registrar reports none.
    async fn list_records(&self, subdomain: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create an A record for `subdomain` pointing at `ip`
    async fn create_record(&self, ip: Ipv4Addr, subdomain: &str) -> Result<(), crate::Error>;

    /// Replace content and TTL of every A record for `subdomain`
    async fn update_record(&self, ip: Ipv4Addr, subdomain: &str) -> Result<(), crate::Error>;

    /// Create, update or leave alone the A record for `subdomain`
    ///
    /// See [`crate::upsert`] for the decision rules.
    async fn upsert_record(&self, ip: Ipv4Addr, subdomain: &str) -> Result<UpdateResult, crate::Error> {
        crate::upsert::upsert_record(self, ip, subdomain).await
    }

    /// Registrar name (for logging)
    fn provider_name(&self) -> &'static str;

    /// Domain whose records this client manages
    fn domain(&self) -> &str;
}
