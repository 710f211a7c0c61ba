use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub forms: FormsConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub directory: String,
    /// Each level writes to `<file_prefix>.<level>.log`, rotated daily.
    pub file_prefix: String,
    /// `EnvFilter` directive for stderr, e.g. `info` or `device_loaner=debug`.
    pub console_level: String,
}

impl LoggingConfig {
    pub fn file_name(&self, level: &str) -> String {
        format!("{}.{}.log", self.file_prefix, level)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// The single loaner endpoint; GET lists devices, POST borrows/returns.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FormsConfig {
    /// Limit the return list to devices held by the entered name/email.
    #[serde(default)]
    pub scope_returns_to_borrower: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub root: String,
    pub listen: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: "./dist".to_string(),
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Unable to read {}", path))?;
        Self::from_toml(&content).with_context(|| format!("Unable to parse {}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn example() -> Self {
        Config {
            logging: LoggingConfig {
                directory: "./logs".to_string(),
                file_prefix: "device-loaner".to_string(),
                console_level: "info".to_string(),
            },
            api: ApiConfig {
                base_url: "REPLACE_WITH_YOUR_LOANER_ENDPOINT".to_string(),
            },
            forms: FormsConfig::default(),
            site: SiteConfig::default(),
        }
    }

    pub fn save_example(path: &str) -> Result<()> {
        let toml_content = toml::to_string_pretty(&Self::example())?;
        fs::write(path, toml_content)?;
        Ok(())
    }
}
