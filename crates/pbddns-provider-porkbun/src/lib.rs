// # Porkbun Registrar Client
//
// This crate implements `RegistrarApi` over the Porkbun JSON API v3.
//
// ## Behaviour
//
// - One HTTP POST per trait method; the upsert issues a lookup plus at most
//   one write
// - A call succeeds only with HTTP 200 *and* `"status": "SUCCESS"`
// - Failures keep the raw response body for diagnostics
// - Dry-run mode for safe testing (reads go out, writes are only logged)
// - NO retry, backoff or caching
//
// ## Security Requirements
//
// - API keys NEVER appear in logs or `Debug` output
// - API keys are provided via environment variables only
//
// ## API Reference
//
// - Ping:           POST `ping`
// - Retrieve:       POST `dns/retrieveByNameType/{domain}/A/{subdomain}`
// - Create:         POST `dns/create/{domain}`
// - Edit:           POST `dns/editByNameType/{domain}/A/{subdomain}`

pub mod transport;
pub mod wire;

use async_trait::async_trait;
use pbddns_core::traits::{DnsRecord, RegistrarApi};
use pbddns_core::{ClientConfig, Error, Result};
use serde::de::DeserializeOwned;
use std::net::Ipv4Addr;

pub use transport::{HttpResponse, ReqwestTransport, Transport};
use wire::{ApiRequest, Envelope, PingResponse, RecordsResponse, StatusResponse, STATUS_SUCCESS};

/// Record type managed by this client
const RECORD_TYPE: &str = "A";

/// Porkbun registrar client
///
/// Stateless between calls. All decisions beyond a single request (upsert,
/// ordering, stopping on error) belong to `pbddns-core`.
///
/// # Dry-Run Mode
///
/// When the config's `dry_run` is true, the client will:
/// - Perform `ping` and record lookups
/// - Log the intended create/edit path and payload (without keys)
/// - **NOT** send create/edit requests
pub struct PorkbunClient<T = ReqwestTransport> {
    /// Credentials, domain, TTL, base URL
    config: ClientConfig,

    /// HTTP transport
    transport: T,
}

// Custom Debug implementation that hides the keys
impl<T> std::fmt::Debug for PorkbunClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PorkbunClient")
            .field("config", &self.config)
            .finish()
    }
}

impl PorkbunClient<ReqwestTransport> {
    /// Create a client backed by reqwest
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is invalid, `Error::Transport` if
    /// the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, ReqwestTransport::new()?)
    }
}

impl<T: Transport> PorkbunClient<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;

        if config.dry_run {
            tracing::warn!("Porkbun client running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self { config, transport })
    }

    /// The client's configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for an operation path
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Path for the by-name-and-type endpoints; the subdomain may be empty
    fn by_name_type_path(&self, action: &str, subdomain: &str) -> String {
        format!(
            "dns/{}/{}/{}/{}",
            action, self.config.domain, RECORD_TYPE, subdomain
        )
    }

    fn credentials(&self) -> ApiRequest {
        ApiRequest::credentials(&self.config.api_key, &self.config.secret_key)
    }

    /// POST `request` to `path`, then check HTTP status, shape and `status`
    ///
    /// # Returns
    ///
    /// - `Ok(R)`: HTTP 200 and `"status": "SUCCESS"`
    /// - `Err(Error::Encode)`: the request could not be serialized
    /// - `Err(Error::Transport)`: no response
    /// - `Err(Error::Api)`: non-200, or a non-SUCCESS status (body kept)
    /// - `Err(Error::Decode)`: the body is not the expected JSON shape
    async fn post<R>(&self, operation: &'static str, path: &str, request: &ApiRequest) -> Result<R>
    where
        R: DeserializeOwned + Envelope,
    {
        let url = self.url(path);
        tracing::debug!("POST {} payload: {}", url, request.redacted());

        let body = serde_json::to_value(request)
            .map_err(|e| Error::encode(operation, e.to_string()))?;
        let response = self.transport.post_json(&url, &body).await?;

        if response.status != 200 {
            return Err(Error::api(operation, Some(response.status), response.body));
        }

        let parsed: R = serde_json::from_str(&response.body)
            .map_err(|e| Error::decode(operation, e.to_string()))?;

        if parsed.status() != STATUS_SUCCESS {
            return Err(Error::api(operation, None, response.body));
        }

        Ok(parsed)
    }

    /// Send a write, or log it in dry-run mode
    async fn write(&self, operation: &'static str, path: &str, request: &ApiRequest) -> Result<()> {
        if self.config.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                self.url(path),
                request.redacted()
            );
            return Ok(());
        }

        self.post::<StatusResponse>(operation, path, request).await?;
        Ok(())
    }
}

#[async_trait]
impl<T: Transport> RegistrarApi for PorkbunClient<T> {
    async fn resolve_public_ip(&self) -> Result<Ipv4Addr> {
        let response: PingResponse = self.post("ping", "ping", &self.credentials()).await?;

        let ip = response.your_ip.trim();
        ip.parse::<Ipv4Addr>().map_err(|_| {
            Error::decode("ping", format!("yourIp is not an IPv4 address: '{}'", ip))
        })
    }

    async fn list_records(&self, subdomain: &str) -> Result<Vec<DnsRecord>> {
        let path = self.by_name_type_path("retrieveByNameType", subdomain);
        let response: RecordsResponse = self.post("get records", &path, &self.credentials()).await?;
        Ok(response.records.unwrap_or_default())
    }

    async fn create_record(&self, ip: Ipv4Addr, subdomain: &str) -> Result<()> {
        tracing::info!(
            "Creating DNS record for subdomain '{}' with IP {}",
            subdomain,
            ip
        );

        let path = format!("dns/create/{}", self.config.domain);
        let request = ApiRequest {
            content: Some(ip.to_string()),
            ttl: Some(self.config.ttl.to_string()),
            record_type: Some(RECORD_TYPE.to_string()),
            name: (!subdomain.is_empty()).then(|| subdomain.to_string()),
            ..self.credentials()
        };

        self.write("create record", &path, &request).await
    }

    async fn update_record(&self, ip: Ipv4Addr, subdomain: &str) -> Result<()> {
        tracing::info!(
            "Updating DNS record for subdomain '{}' to IP {}",
            subdomain,
            ip
        );

        let path = self.by_name_type_path("editByNameType", subdomain);
        let request = ApiRequest {
            content: Some(ip.to_string()),
            ttl: Some(self.config.ttl.to_string()),
            ..self.credentials()
        };

        self.write("update record", &path, &request).await
    }

    fn provider_name(&self) -> &'static str {
        "porkbun"
    }

    fn domain(&self) -> &str {
        &self.config.domain
    }
}
