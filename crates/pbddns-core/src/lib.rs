// # pbddns-core
//
// Core library for the one-shot Porkbun dynamic DNS updater.
//
// ## Overview
//
// - **RegistrarApi**: Trait for the registrar operations (IP echo, record
//   lookup, create, edit) plus the derived upsert
// - **upsert**: The create / update / skip / conflict decision
// - **UpdateRunner**: Resolves the IP once and upserts every subdomain in order
// - **RunConfig**: Environment-sourced configuration
//
// The registrar client itself lives in `pbddns-provider-porkbun`; the binary
// in `pbddns` only wires configuration, logging and the runtime together.

pub mod traits;
pub mod upsert;
pub mod runner;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsRecord, RegistrarApi, UpdateResult};
pub use runner::{RunReport, TargetOutcome, UpdateRunner};
pub use config::{ClientConfig, RunConfig};
pub use error::{Error, Result};
