//! Configuration types for the updater
//!
//! All configuration comes from environment variables:
//!
//! - `API_KEY`, `SECRET_KEY`, `DOMAIN`: required
//! - `SUBDOMAINS`: comma-separated labels, empty = root domain only
//! - `TTL`: record TTL in seconds (default 600)
//! - `API_BASE_URL`: registrar API base (default Porkbun's IPv4-only host)
//! - `DRY_RUN`: `1`/`true`/`yes` to skip writes
//! - `LOG_LEVEL`: `trace`, `debug`, `info`, `warn` or `error`
//!
//! Parsing goes through a lookup function so the environment can be
//! substituted in tests.

use crate::error::{Error, Result};
use tracing::Level;

/// Default Porkbun API base URL (IPv4-only host, so `ping` echoes the v4 address)
pub const DEFAULT_API_BASE_URL: &str = "https://api-ipv4.porkbun.com/api/json/v3/";

/// Default record TTL in seconds
pub const DEFAULT_TTL: u32 = 600;

/// Registrar client configuration
///
/// Immutable for the lifetime of the process. The `Debug` implementation
/// does not expose the keys.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Registrar API key
    pub api_key: String,
    /// Registrar secret API key
    pub secret_key: String,
    /// Registrable domain whose records are managed (e.g. "example.com")
    pub domain: String,
    /// TTL applied to created and edited records
    pub ttl: u32,
    /// API base URL; operation paths are appended to it
    pub base_url: String,
    /// Perform reads only, log intended writes
    pub dry_run: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<REDACTED>")
            .field("secret_key", &"<REDACTED>")
            .field("domain", &self.domain)
            .field("ttl", &self.ttl)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with default TTL, base URL and live mode
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            domain: domain.into(),
            ttl: DEFAULT_TTL,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            dry_run: false,
        }
    }

    /// Set the record TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() || self.secret_key.is_empty() || self.domain.is_empty() {
            return Err(Error::config("API_KEY, SECRET_KEY, and DOMAIN are required"));
        }

        if self.ttl == 0 {
            return Err(Error::config("TTL must be a positive number of seconds"));
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(Error::config(format!(
                "API_BASE_URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }

        validate_domain_name(&self.domain)?;
        if !self.domain.contains('.') {
            return Err(Error::config(format!(
                "DOMAIN must be a registrable domain such as example.com. Got: {}",
                self.domain
            )));
        }

        Ok(())
    }

    /// Fully qualified name for `subdomain` under the configured domain
    pub fn fqdn(&self, subdomain: &str) -> String {
        fqdn(subdomain, &self.domain)
    }
}

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Registrar client configuration
    pub client: ClientConfig,
    /// Subdomain labels in processing order; `""` is the root domain
    pub subdomains: Vec<String>,
}

impl RunConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let api_key = var("API_KEY").unwrap_or_default();
        let secret_key = var("SECRET_KEY").unwrap_or_default();
        let domain = var("DOMAIN").unwrap_or_default().trim().to_string();

        let ttl = match var("TTL") {
            Some(raw) => parse_ttl(&raw)?,
            None => DEFAULT_TTL,
        };

        let client = ClientConfig::new(api_key, secret_key, domain)
            .with_ttl(ttl)
            .with_base_url(var("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()))
            .with_dry_run(parse_flag("DRY_RUN", var("DRY_RUN").as_deref())?);
        client.validate()?;

        let subdomains = parse_subdomains(var("SUBDOMAINS").as_deref());
        for subdomain in &subdomains {
            if !subdomain.is_empty() {
                validate_domain_name(subdomain)?;
                validate_domain_name(&client.fqdn(subdomain))?;
            }
        }

        Ok(Self { client, subdomains })
    }
}

/// Split the `SUBDOMAINS` value into trimmed labels
///
/// Unset or empty input yields the root domain only (`[""]`). Order is
/// preserved; an entry that trims to nothing also targets the root domain.
pub fn parse_subdomains(raw: Option<&str>) -> Vec<String> {
    match raw {
        None | Some("") => vec![String::new()],
        Some(raw) => raw.split(',').map(|s| s.trim().to_string()).collect(),
    }
}

/// `sub.domain`, or the bare domain when `subdomain` is empty
pub fn fqdn(subdomain: &str, domain: &str) -> String {
    if subdomain.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", subdomain, domain)
    }
}

/// Parse `LOG_LEVEL` (default `info`)
pub fn parse_log_level(raw: Option<&str>) -> Result<Level> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("info") => Ok(Level::INFO),
        Some("trace") => Ok(Level::TRACE),
        Some("debug") => Ok(Level::DEBUG),
        Some("warn") => Ok(Level::WARN),
        Some("error") => Ok(Level::ERROR),
        Some(other) => Err(Error::config(format!(
            "LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            other
        ))),
    }
}

fn parse_ttl(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(ttl) if ttl > 0 => Ok(ttl),
        _ => Err(Error::config(format!(
            "TTL must be a positive number of seconds. Got: {}",
            raw
        ))),
    }
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<bool> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("0") | Some("false") | Some("no") => Ok(false),
        Some("1") | Some("true") | Some("yes") => Ok(true),
        Some(other) => Err(Error::config(format!(
            "{} must be one of 1, true, yes, 0, false, no. Got: {}",
            name, other
        ))),
    }
}

/// Basic DNS name validation (RFC 1035 lengths, letters, digits, hyphen,
/// underscore, and a lone `*` wildcard label)
fn validate_domain_name(name: &str) -> Result<()> {
    if name.len() > 253 {
        return Err(Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            name.len(),
            name
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(Error::config(format!("Domain name has empty label: '{}'", name)));
        }

        if label == "*" {
            continue;
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}
