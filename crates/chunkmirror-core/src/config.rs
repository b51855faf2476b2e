use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::HttpOptions;
use crate::retry::RetryPolicy;

/// User-Agent sent when neither config nor CLI supplies one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per URL (including the first).
    pub max_attempts: u32,
    /// Linear backoff step in seconds; the delay after attempt `n` is `n * step`.
    pub backoff_step_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step_secs: 0.8,
        }
    }
}

impl RetryConfig {
    /// Convert to a runtime policy, clamping nonsensical values.
    pub fn to_policy(&self) -> RetryPolicy {
        let step = if self.backoff_step_secs.is_finite() && self.backoff_step_secs > 0.0 {
            Duration::from_secs_f64(self.backoff_step_secs)
        } else {
            Duration::ZERO
        };
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            backoff_step: step,
        }
    }
}

/// Global configuration loaded from `~/.config/chunkmirror/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Upper bound on a single request attempt, in seconds.
    pub timeout_secs: u64,
    /// Upper bound on connection setup, in seconds.
    pub connect_timeout_secs: u64,
    /// Number of fetch workers used for chunk targets.
    pub max_concurrent_fetches: usize,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 15,
            max_concurrent_fetches: 4,
            retry: None,
        }
    }
}

impl MirrorConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    /// HTTP options for this config, with an optional User-Agent override (e.g. from the CLI).
    pub fn http_options(&self, user_agent: Option<&str>) -> HttpOptions {
        HttpOptions {
            user_agent: user_agent
                .map(str::to_string)
                .unwrap_or_else(|| self.user_agent.clone()),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("chunkmirror")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MirrorConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MirrorConfig::default();
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_concurrent_fetches, 4);
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_step, Duration::from_millis(800));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MirrorConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.user_agent, cfg.user_agent);
        assert_eq!(parsed.connect_timeout_secs, cfg.connect_timeout_secs);
        assert_eq!(parsed.max_concurrent_fetches, cfg.max_concurrent_fetches);
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            user_agent = "test-agent/1.0"
            timeout_secs = 10
            connect_timeout_secs = 5
            max_concurrent_fetches = 8

            [retry]
            max_attempts = 5
            backoff_step_secs = 0.25
        "#;
        let cfg: MirrorConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.backoff_step, Duration::from_millis(250));
        assert_eq!(cfg.http_options(None).user_agent, "test-agent/1.0");
        assert_eq!(cfg.http_options(Some("cli")).user_agent, "cli");
    }

    #[test]
    fn retry_config_clamps_bad_values() {
        let policy = RetryConfig {
            max_attempts: 0,
            backoff_step_secs: f64::NAN,
        }
        .to_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.backoff_step, Duration::ZERO);
    }
}
