//! Core traits for the updater
//!
//! - [`RegistrarApi`]: the registrar operations the updater relies on

pub mod registrar;

pub use registrar::{DnsRecord, RegistrarApi, UpdateResult};
