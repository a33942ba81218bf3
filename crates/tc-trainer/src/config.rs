//! Trainer configuration, loadable from TOML or environment.

use std::path::PathBuf;

use serde::Deserialize;

/// Settings for one training run.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainerConfig {
    /// Dialogue project root; the command runs here.
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
    /// Training command line, split with shell-word rules (no shell).
    #[serde(default = "default_command")]
    pub command: String,
    /// Files that must exist under `project_dir` before training.
    #[serde(default = "default_required_files")]
    pub required_files: Vec<String>,
    /// Where the training command writes models, relative to `project_dir`.
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
}

fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_command() -> String {
    "rasa train --domain domain.yml --data data/ --out models/".into()
}

fn default_required_files() -> Vec<String> {
    [
        "config.yml",
        "domain.yml",
        "data/nlu.yml",
        "data/rules.yml",
        "data/stories.yml",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_models_dir() -> String {
    "models".into()
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            project_dir: default_project_dir(),
            command: default_command(),
            required_files: default_required_files(),
            models_dir: default_models_dir(),
        }
    }
}

impl TrainerConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config from `TC_TRAIN_DIR` / `TC_TRAIN_COMMAND`, else defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("TC_TRAIN_DIR") {
            config.project_dir = PathBuf::from(dir);
        }
        if let Ok(command) = std::env::var("TC_TRAIN_COMMAND") {
            config.command = command;
        }
        config
    }
}
