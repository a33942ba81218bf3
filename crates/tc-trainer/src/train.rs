//! Training run: file checks, the training subprocess, and model lookup.
//!
//! The command is split with `shell-words` and spawned directly through
//! `tokio::process::Command` (no shell interpretation). Its stdout/stderr
//! are inherited so training progress streams to the terminal.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::config::TrainerConfig;

/// Presence of one required project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub path: String,
    pub present: bool,
}

/// Errors from a training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("missing required files: {}", .0.join(", "))]
    MissingFiles(Vec<String>),
    #[error("empty training command")]
    EmptyCommand,
    #[error("invalid training command: {0}")]
    InvalidCommand(String),
    #[error("training program not found in PATH: {0}")]
    NotInstalled(String),
    #[error("training failed with exit code {0:?}")]
    Failed(Option<i32>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check each required file under `project_dir`, logging the outcome.
pub fn validate_files(project_dir: &Path, required: &[String]) -> Vec<FileCheck> {
    required
        .iter()
        .map(|path| {
            let present = project_dir.join(path).is_file();
            if present {
                tracing::info!(file = %path, "found");
            } else {
                tracing::warn!(file = %path, "missing");
            }
            FileCheck {
                path: path.clone(),
                present,
            }
        })
        .collect()
}

/// Run the training command in `project_dir` and wait for it to exit.
pub async fn run_command(command: &str, project_dir: &Path) -> Result<(), TrainError> {
    let tokens =
        shell_words::split(command.trim()).map_err(|e| TrainError::InvalidCommand(e.to_string()))?;
    let (program, args) = tokens.split_first().ok_or(TrainError::EmptyCommand)?;

    tracing::info!(program = %program, ?args, dir = %project_dir.display(), "training started");

    let status = Command::new(program)
        .args(args)
        .current_dir(project_dir)
        .status()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => TrainError::NotInstalled(program.clone()),
            _ => TrainError::Io(e),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(TrainError::Failed(status.code()))
    }
}

/// Newest model artifact in `models_dir`: a directory or `*.tar.gz`,
/// newest meaning last in lexical order (timestamped names).
pub fn latest_model(models_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    if !models_dir.is_dir() {
        return Ok(None);
    }

    let mut models = Vec::new();
    for entry in std::fs::read_dir(models_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() || name.ends_with(".tar.gz") {
            models.push(name);
        }
    }
    models.sort();

    Ok(models.pop().map(|name| models_dir.join(name)))
}

/// Full run: validate, train, then report the newest model.
///
/// The command is not started when any required file is missing.
pub async fn train(config: &TrainerConfig) -> Result<Option<PathBuf>, TrainError> {
    let missing: Vec<String> = validate_files(&config.project_dir, &config.required_files)
        .into_iter()
        .filter(|check| !check.present)
        .map(|check| check.path)
        .collect();
    if !missing.is_empty() {
        return Err(TrainError::MissingFiles(missing));
    }

    run_command(&config.command, &config.project_dir).await?;

    let model = latest_model(&config.project_dir.join(&config.models_dir))?;
    match &model {
        Some(path) => tracing::info!(model = %path.display(), "training completed"),
        None => tracing::warn!("training completed but no model artifact was found"),
    }
    Ok(model)
}
