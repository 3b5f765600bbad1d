//! One-shot update runner
//!
//! The runner is responsible for:
//! - Resolving the public IP once per run
//! - Walking the configured subdomains in order
//! - Upserting each subdomain's A record through a [`RegistrarApi`]
//! - Stopping at the first failure
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐  resolve_public_ip  ┌──────────────┐
//! │ UpdateRunner │────────────────────▶│ RegistrarApi │
//! └──────────────┘                     └──────────────┘
//!        │                                    ▲
//!        │ for each subdomain (in order)      │
//!        └────────── upsert_record ───────────┘
//! ```
//!
//! There are no retries and no partial-failure mode: the first error ends the
//! run, tagged with the fully qualified name it was working on.

use crate::config::fqdn;
use crate::error::{Error, Result};
use crate::traits::{RegistrarApi, UpdateResult};
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// Outcome for one processed subdomain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    /// Subdomain label (empty for the root domain)
    pub subdomain: String,
    /// Fully qualified name
    pub fqdn: String,
    /// What the upsert did
    pub result: UpdateResult,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The public IP every record was reconciled against
    pub ip: Ipv4Addr,
    /// One entry per subdomain, in processing order
    pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
    /// Number of create/edit calls issued
    pub fn writes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_write()).count()
    }
}

/// Drives one pass over all configured subdomains
pub struct UpdateRunner {
    /// Registrar client; also the source of the domain used in names
    api: Box<dyn RegistrarApi>,

    /// Subdomain labels in processing order
    subdomains: Vec<String>,
}

impl UpdateRunner {
    /// Create a runner
    ///
    /// An empty `subdomains` list is treated as the root domain only.
    pub fn new(api: Box<dyn RegistrarApi>, subdomains: Vec<String>) -> Self {
        let subdomains = if subdomains.is_empty() {
            vec![String::new()]
        } else {
            subdomains
        };

        Self { api, subdomains }
    }

    /// Subdomains this runner will process, in order
    pub fn subdomains(&self) -> &[String] {
        &self.subdomains
    }

    /// Run once
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: every subdomain was reconciled
    /// - `Err(Error)`: the first failure; IP resolution failures are returned
    ///   wrapped in `Error::PublicIp`, per-subdomain failures in `Error::Target`
    pub async fn run(&self) -> Result<RunReport> {
        debug!(
            "Starting run against {} for {} target(s)",
            self.api.provider_name(),
            self.subdomains.len()
        );

        let ip = self
            .api
            .resolve_public_ip()
            .await
            .map_err(Error::for_public_ip)?;
        info!("Public IP: {}", ip);

        let mut outcomes = Vec::with_capacity(self.subdomains.len());
        for subdomain in &self.subdomains {
            let target = fqdn(subdomain, self.api.domain());
            info!("Updating {} for {}", self.api.provider_name(), target);

            let result = self
                .api
                .upsert_record(ip, subdomain)
                .await
                .map_err(|e| e.for_target(target.clone()))?;

            outcomes.push(TargetOutcome {
                subdomain: subdomain.clone(),
                fqdn: target,
                result,
            });
        }

        info!("DNS update/check complete for all subdomains. ip={}", ip);
        Ok(RunReport { ip, outcomes })
    }
}
