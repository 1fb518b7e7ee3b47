//! intersight-gateway - signed Intersight tool host over stdio.
//!
//! Reads JSON-RPC requests line by line on stdin and writes responses on
//! stdout. Logs go to stderr.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use intersight_gateway::client::IntersightClient;
use intersight_gateway::config::{
    GatewayConfig, ENV_API_KEY_ID, ENV_API_PREFIX, ENV_BASE_URL, ENV_PRIVATE_KEY_PATH,
};
use intersight_gateway::server::{serve_stdio, ToolHost};

/// intersight-gateway - signed Cisco Intersight tools over stdio
#[derive(Parser, Debug)]
#[command(name = "intersight-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Intersight origin
    #[arg(long, env = ENV_BASE_URL)]
    base_url: Option<String>,

    /// Prefix joined in front of relative routes
    #[arg(long, env = ENV_API_PREFIX)]
    api_prefix: Option<String>,

    /// API key id used in the signature keyId
    #[arg(long, env = ENV_API_KEY_ID)]
    api_key_id: Option<String>,

    /// Path to the RSA private key (PEM)
    #[arg(long, env = ENV_PRIVATE_KEY_PATH)]
    private_key_path: Option<String>,
}

impl Cli {
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            ENV_BASE_URL => self.base_url.clone(),
            ENV_API_PREFIX => self.api_prefix.clone(),
            ENV_API_KEY_ID => self.api_key_id.clone(),
            ENV_PRIVATE_KEY_PATH => self.private_key_path.clone(),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "intersight-gateway exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::from_lookup(|name| cli.lookup(name))?;
    let client = IntersightClient::from_config(&config)?;

    tracing::info!(
        base_url = %client.base_url(),
        api_prefix = %client.api_prefix(),
        key_id = %config.api_key_id,
        "Intersight gateway ready on stdio"
    );

    let host = ToolHost::from_client(client);
    serve_stdio(&host).await?;
    Ok(())
}
