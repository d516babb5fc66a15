use crate::editor::EditorConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use workbench_analyzer::AnalyzerConfig;
use workbench_predictor::PredictorConfig;
use workbench_tools::LocalWorkspace;

pub const DEFAULT_CONFIG_PATH: &str = "workbench.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub predictor: PredictorConfig,
    pub editor: EditorConfig,
    pub command_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults when `path` does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.predictor.validate()?;
        if self.editor.feed_window_chars == 0 {
            anyhow::bail!("editor.feed_window_chars must be greater than 0");
        }
        if self.command_timeout_secs == Some(0) {
            anyhow::bail!("command_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    pub fn workspace(&self) -> LocalWorkspace {
        match self.command_timeout_secs {
            Some(secs) => LocalWorkspace::new().with_command_timeout(Duration::from_secs(secs)),
            None => LocalWorkspace::new(),
        }
    }
}
