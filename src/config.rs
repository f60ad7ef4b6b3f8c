use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where session state is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionBackend {
    /// Process memory; sessions are lost on restart
    #[default]
    Memory,
    /// One JSON file per session under `session.dir`
    File,
}

/// Session cookie and storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Sliding idle timeout in minutes (default: 20)
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: u32,
    /// Mark the cookie `Secure` (only sent over HTTPS)
    #[serde(default)]
    pub secure_cookie: bool,
    #[serde(default)]
    pub backend: SessionBackend,
    /// Directory for the file backend
    #[serde(default = "default_session_dir")]
    pub dir: String,
    /// Seconds between expired-session sweeps (default: 60)
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_cookie_name() -> String {
    "formflow.session".to_string()
}

fn default_idle_timeout() -> u32 {
    20 // 20 minutes
}

fn default_session_dir() -> String {
    ".formflow/sessions".to_string()
}

fn default_cleanup_interval() -> u64 {
    60 // 1 minute
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_minutes: default_idle_timeout(),
            secure_cookie: false,
            backend: SessionBackend::default(),
            dir: default_session_dir(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file under `dir` instead of stderr
    #[serde(default)]
    pub to_file: bool,

    #[serde(default = "default_logs_dir")]
    pub dir: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_logs_dir() -> String {
    ".formflow/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
            dir: default_logs_dir(),
        }
    }
}

impl Config {
    /// Project-local config file, picked up from the working directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("formflow.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so formflow runs without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/formflow/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("formflow").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables, e.g. FORMFLOW__SERVER__PORT=8080
        builder = builder.add_source(
            config::Environment::with_prefix("FORMFLOW")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn logs_path(&self) -> PathBuf {
        PathBuf::from(&self.logging.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.session.idle_timeout_minutes, 20);
        assert_eq!(config.session.backend, SessionBackend::Memory);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.to_file);
    }

    #[test]
    fn test_load_with_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8081

[session]
backend = "file"
dir = "/var/lib/formflow"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.session.backend, SessionBackend::File);
        assert_eq!(config.session.dir, "/var/lib/formflow");
        assert_eq!(config.session.cookie_name, "formflow.session");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.session.secure_cookie = true;

        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("[session]"));
        assert!(toml_str.contains("backend = \"memory\""));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.session.secure_cookie);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(parsed.logging.level, "debug");
        assert_eq!(parsed.server.port, 5000);
        assert_eq!(parsed.session.cleanup_interval_secs, 60);
    }
}
