use anyhow::{Context, Result};
use daypulse_engine::ReportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pipeline configuration. Endpoints, addresses and the report taxonomy
/// live here; API keys do not - those come from the environment
/// (AMPLITUDE_API_KEY, AMPLITUDE_SECRET_KEY, ANTHROPIC_API_KEY,
/// SENDGRID_API_KEY) so the file can be committed.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub amplitude: AmplitudeConfig,
    pub llm: LlmConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmplitudeConfig {
    pub api_base: String,
}

impl Default for AmplitudeConfig {
    fn default() -> Self {
        AmplitudeConfig {
            api_base: "https://amplitude.com/api/2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            api_base: "https://api.anthropic.com/v1".to_string(),
            model: "claude-sonnet-4-5".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api_base: String,
    pub from_email: String,
    pub to_emails: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            api_base: "https://api.sendgrid.com".to_string(),
            from_email: String::new(),
            to_emails: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve and load configuration based on priority:
    /// 1. Explicit path (--config flag)
    /// 2. DAYPULSE_CONFIG environment variable
    /// 3. Platform config directory (daypulse/config.toml)
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load_from(path);
        }

        if let Ok(env_path) = std::env::var("DAYPULSE_CONFIG") {
            return Self::load_from(Path::new(&env_path));
        }

        if let Some(path) = Self::default_path()
            && path.exists()
        {
            return Self::load_from(&path);
        }

        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("daypulse").join("config.toml"))
    }
}
