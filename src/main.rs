use anyhow::Context;
use dotenvy::dotenv;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod infrastructure;
mod modules;
mod state;
mod workers;

use crate::common::error::WorkflowError;
use crate::config::settings::AppConfig;
use crate::infrastructure::encoding::client::HttpEncodingClient;
use crate::state::AppState;

const EXIT_FAILURE: u8 = 1;
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("encoding_workflows=info")),
        )
        .init();

    let run_id = uuid::Uuid::new_v4();
    info!("Starting encoding workflow run {}", run_id);

    let state = match build_state() {
        Ok(state) => state,
        Err(e) => {
            error!("❌ {:#}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling workflow");
            on_signal.cancel();
        }
    });

    match app::run(&state, &cancel).await {
        Ok(outcome) => {
            info!(
                "✅ Run {} finished: encoding {}, {} manifests",
                run_id,
                outcome.job_id,
                outcome.manifests.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Run {} failed: {}", run_id, e);
            if e.is_aborted() {
                ExitCode::from(EXIT_CANCELLED)
            } else {
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

fn build_state() -> anyhow::Result<AppState> {
    let config = AppConfig::new()
        .map_err(WorkflowError::from)
        .context("failed to load configuration")?;
    let client = HttpEncodingClient::new(
        &config.api_url,
        &config.api_key,
        config.tenant_org_id.as_deref(),
    )
    .context("failed to create encoding API client")?;

    Ok(AppState::new(config, Arc::new(client)))
}
