use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_DIFF_URL: &str = "https://patch-diff.githubusercontent.com";
pub const DEFAULT_USER_AGENT: &str = "pull-request-context-mcp";

const DEFAULT_CONFIG_FILE: &str = ".pr-context.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-context.toml.
///
/// All fields are optional — the server works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub-specific settings
    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// REST API base URL (no trailing slash needed)
    pub api_url: Option<String>,
    /// Host serving raw `.diff` files
    pub diff_url: Option<String>,
    /// User-Agent sent with metadata requests
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from `path`, or from .pr-context.toml in the current
    /// directory when no path is given. A missing default file yields the
    /// default config; a missing explicit file is an error.
    ///
    /// GITHUB_TOKEN fills in the token when the file doesn't set one.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env_token(std::env::var("GITHUB_TOKEN").ok());
        Ok(config)
    }

    /// Use `env_token` when the file set no token. Empty values are ignored.
    fn apply_env_token(&mut self, env_token: Option<String>) {
        if self.github.token.is_none() {
            self.github.token = env_token.filter(|token| !token.is_empty());
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn github_token(&self) -> Option<&str> {
        self.github.token.as_deref()
    }

    pub fn api_url(&self) -> &str {
        trim_base(self.github.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
    }

    pub fn diff_url(&self) -> &str {
        trim_base(self.github.diff_url.as_deref().unwrap_or(DEFAULT_DIFF_URL))
    }

    pub fn user_agent(&self) -> &str {
        self.github
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Config pointing both hosts at one base URL, with an optional token.
    #[cfg(test)]
    pub fn for_base_url(base: &str, token: Option<&str>) -> Config {
        Config {
            github: GitHubConfig {
                token: token.map(str::to_string),
                api_url: Some(base.to_string()),
                diff_url: Some(base.to_string()),
                user_agent: None,
            },
        }
    }
}

fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
