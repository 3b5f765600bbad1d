// # pbddns - one-shot Porkbun dynamic DNS updater
//
// This binary is a THIN integration layer: it reads the environment, sets up
// logging and the runtime, builds the Porkbun client and hands it to
// `pbddns_core::UpdateRunner`. All decision logic lives in `pbddns-core`.
//
// ## Configuration
//
// - `API_KEY`, `SECRET_KEY`: Porkbun API credentials (required)
// - `DOMAIN`: Domain whose records are managed (required)
// - `SUBDOMAINS`: Comma-separated labels; empty means the root domain only
// - `TTL`: Record TTL in seconds (default 600)
// - `API_BASE_URL`: Override the Porkbun API base URL
// - `DRY_RUN`: Set to 1/true/yes to log writes instead of sending them
// - `LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export API_KEY=pk1_...
// export SECRET_KEY=sk1_...
// export DOMAIN=example.com
// export SUBDOMAINS="home, vpn"
//
// pbddns
// ```

use anyhow::Result;
use pbddns_core::config::parse_log_level;
use pbddns_core::{RunConfig, RunReport, UpdateRunner};
use pbddns_provider_porkbun::PorkbunClient;
use std::env;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Every subdomain was processed
/// - 1: Configuration or startup error
/// - 2: Runtime error (IP lookup or record update failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PbddnsExitCode {
    /// All records are up to date
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<PbddnsExitCode> for ExitCode {
    fn from(code: PbddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Initialize tracing first so configuration errors are logged too
    let log_level = match parse_log_level(env::var("LOG_LEVEL").ok().as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            return PbddnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return PbddnsExitCode::ConfigError.into();
    }

    // Load configuration from environment
    let config = match RunConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return PbddnsExitCode::ConfigError.into();
        }
    };

    info!(
        "Configuration loaded: {} target(s) under {}{}",
        config.subdomains.len(),
        config.client.domain,
        if config.client.dry_run { " [DRY-RUN]" } else { "" }
    );

    // Sequential work: a current-thread runtime is all that is needed
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PbddnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(report) => {
                info!(
                    "{} record(s) checked, {} written",
                    report.outcomes.len(),
                    report.writes()
                );
                PbddnsExitCode::Success
            }
            Err(e) => {
                error!("{}", e);
                exit_code_for(&e)
            }
        }
    })
    .into()
}

/// Build the client and perform one update pass
async fn run(config: RunConfig) -> Result<RunReport> {
    let RunConfig { client, subdomains } = config;

    let api = PorkbunClient::new(client)?;
    let runner = UpdateRunner::new(Box::new(api), subdomains);

    Ok(runner.run().await?)
}

/// Config errors (including ones wrapped around a target) exit 1, the rest 2
fn exit_code_for(err: &anyhow::Error) -> PbddnsExitCode {
    match err.downcast_ref::<pbddns_core::Error>() {
        Some(e) if e.is_config() => PbddnsExitCode::ConfigError,
        _ => PbddnsExitCode::RuntimeError,
    }
}
