use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV_VAR: &str = "LPA_PROGRESS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Base URL the certificate provider starts from. Default: http://localhost:5050
    #[serde(default = "default_app_public_url")]
    pub app_public_url: String,
    /// Months after an online invitation before the certificate provider is
    /// reminded. Default: 3
    #[serde(default = "default_reminder_months")]
    pub certificate_provider_reminder_months: u32,
    /// Default: 5
    #[serde(default = "default_max_people_to_notify")]
    pub max_people_to_notify: usize,
    /// Directory for the structured event log. No file log when unset.
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,
}

fn default_app_public_url() -> String {
    "http://localhost:5050".to_string()
}

fn default_reminder_months() -> u32 {
    3
}

fn default_max_people_to_notify() -> usize {
    5
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_public_url: default_app_public_url(),
            certificate_provider_reminder_months: default_reminder_months(),
            max_people_to_notify: default_max_people_to_notify(),
            logs_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).context("Failed to parse config as YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `LPA_PROGRESS_CONFIG`, or the defaults when the
    /// variable is unset.
    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_public_url.trim().is_empty() {
            anyhow::bail!("app_public_url must not be empty");
        }
        if self.certificate_provider_reminder_months == 0 {
            anyhow::bail!("certificate_provider_reminder_months must be at least 1");
        }
        Ok(())
    }

    /// Where a certificate provider starts their part of the journey.
    pub fn certificate_provider_start_url(&self) -> String {
        format!(
            "{}/certificate-provider-start",
            self.app_public_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
