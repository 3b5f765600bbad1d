//! Upsert decision
//!
//! For one subdomain:
//!
//! ```text
//! Start ── list_records ──▶ Fetched ─┬─ 0 records ──────────────▶ Create
//!                                    ├─ 1 record, same IP ──────▶ NoOp
//!                                    ├─ 1 record, other content ▶ Update
//!                                    └─ 2+ records ─────────────▶ Conflict
//! ```
//!
//! A conflict never triggers a write. Any failure aborts the subdomain and is
//! returned unchanged; there is no retry.

use crate::error::{Error, Result};
use crate::traits::{DnsRecord, RegistrarApi, UpdateResult};
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// What to do with a subdomain given its current records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertAction {
    /// No record exists
    Create,
    /// One record exists with different content
    Update {
        /// Content of the existing record
        previous_content: String,
    },
    /// One record exists and already points at the IP
    Skip,
}

/// Decide the action for `subdomain` from the records the registrar returned
pub fn plan(subdomain: &str, records: &[DnsRecord], ip: Ipv4Addr) -> Result<UpsertAction> {
    match records {
        [] => Ok(UpsertAction::Create),
        [record] if record.points_to(ip) => Ok(UpsertAction::Skip),
        [record] => Ok(UpsertAction::Update {
            previous_content: record.content.clone(),
        }),
        _ => Err(Error::conflict(subdomain, records.len())),
    }
}

/// Fetch, compare, then create / update / skip
pub async fn upsert_record<A>(api: &A, ip: Ipv4Addr, subdomain: &str) -> Result<UpdateResult>
where
    A: RegistrarApi + ?Sized,
{
    let records = api.list_records(subdomain).await?;
    debug!("Found {} A record(s) for subdomain '{}'", records.len(), subdomain);

    match plan(subdomain, &records, ip)? {
        UpsertAction::Create => {
            api.create_record(ip, subdomain).await?;
            info!("Created dns record for subdomain '{}' with ip {}", subdomain, ip);
            Ok(UpdateResult::Created { new_ip: ip })
        }
        UpsertAction::Update { previous_content } => {
            api.update_record(ip, subdomain).await?;
            info!(
                "Updated dns record for subdomain '{}' with ip {} (was: {})",
                subdomain, ip, previous_content
            );
            Ok(UpdateResult::Updated {
                previous_content,
                new_ip: ip,
            })
        }
        UpsertAction::Skip => {
            info!(
                "Skipping update for subdomain '{}' as record already matches current ip {}",
                subdomain, ip
            );
            Ok(UpdateResult::Unchanged { current_ip: ip })
        }
    }
}
