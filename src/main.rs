//! analysis - operator CLI for daily analysis jobs

use clap::Parser;
use tracing::debug;

use analysis::Cli;
use analysis_common::telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(TelemetryConfig {
        json: cli.log_json,
        ..Default::default()
    })?;

    // kube's TLS stack needs a process-wide rustls provider
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    cli.run().await
}
