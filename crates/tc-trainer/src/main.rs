//! Topology Chat trainer — trains the dialogue engine's model.
//!
//! Usage: `tc-train [trainer.toml]`. Without a config file, the project
//! directory and command come from `TC_TRAIN_DIR` / `TC_TRAIN_COMMAND`.
//! Exits 0 on success, 1 on any failure.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use tc_trainer::config::TrainerConfig;
use tc_trainer::train;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => TrainerConfig::from_file(&path)?,
        None => TrainerConfig::from_env(),
    };

    tracing::info!(
        dir = %config.project_dir.display(),
        command = %config.command,
        "validating dialogue project files"
    );

    match train::train(&config).await {
        Ok(_) => {
            tracing::info!("training complete, the chat API can now load the model");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "training aborted");
            Ok(ExitCode::FAILURE)
        }
    }
}
