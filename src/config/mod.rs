//! Configuration for textproc
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/textproc/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;
mod session;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use session::{
    ClipboardConfig, FileClipboard, FileProcessor, FileServer, FileSession, ProcessorConfig,
    ProcessorKind, ServerConfig, SessionConfig,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable names
pub const ENV_THEME: &str = "TEXTPROC_THEME";
pub const ENV_MAX_LENGTH: &str = "TEXTPROC_MAX_LENGTH";
pub const ENV_PROCESSOR: &str = "TEXTPROC_PROCESSOR";
pub const ENV_DELAY_MS: &str = "TEXTPROC_DELAY_MS";
pub const ENV_ENDPOINT: &str = "TEXTPROC_ENDPOINT";
pub const ENV_BIND: &str = "TEXTPROC_BIND";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name: "dark", "light", "nord"
    pub theme: String,

    /// Input limits
    pub session: SessionConfig,

    /// Processing backend
    pub processor: ProcessorConfig,

    /// Clipboard adapter selection
    pub clipboard: ClipboardConfig,

    /// HTTP processing endpoint (`textproc serve`)
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            session: SessionConfig::default(),
            processor: ProcessorConfig::default(),
            clipboard: ClipboardConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,

    /// Optional [session] section
    pub session: Option<FileSession>,

    /// Optional [processor] section
    pub processor: Option<FileProcessor>,

    /// Optional [clipboard] section
    pub clipboard: Option<FileClipboard>,

    /// Optional [server] section
    pub server: Option<FileServer>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/textproc/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("textproc").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of truth for the template
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists.
    ///
    /// A config file that exists but does not parse is an error, not a silent
    /// fallback to defaults.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_file_config(&contents)
                .with_context(|| format!("Invalid config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read config file {}", path.display())),
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig> {
        toml::from_str(contents).context("Failed to parse TOML")
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Result<Self> {
        let file = Self::load_file_config()?;
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file config with an environment lookup
    pub(crate) fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();

        // Theme: env > file > default
        let theme = env(ENV_THEME).or(file.theme).unwrap_or(defaults.theme);

        // Session: env > file > default
        let mut session = SessionConfig::from_file(file.session);
        if let Some(raw) = env(ENV_MAX_LENGTH) {
            session.max_length = raw
                .parse()
                .with_context(|| format!("{} must be a positive integer, got {:?}", ENV_MAX_LENGTH, raw))?;
        }
        if session.max_length == 0 {
            bail!("session.max_length must be greater than zero");
        }

        // Processor: each field env > file > default
        let file_processor = file.processor.unwrap_or_default();
        let kind_raw = env(ENV_PROCESSOR).or(file_processor.kind);
        let kind = match kind_raw {
            Some(raw) => ProcessorKind::parse(&raw).with_context(|| {
                format!(
                    "Unknown processor kind {:?} (expected mock, failing or remote)",
                    raw
                )
            })?,
            None => defaults.processor.kind,
        };
        let delay_ms = match env(ENV_DELAY_MS) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("{} must be milliseconds, got {:?}", ENV_DELAY_MS, raw))?,
            None => file_processor
                .delay_ms
                .unwrap_or(defaults.processor.delay_ms),
        };
        let processor = ProcessorConfig {
            kind,
            delay_ms,
            endpoint: env(ENV_ENDPOINT)
                .or(file_processor.endpoint)
                .unwrap_or(defaults.processor.endpoint),
            timeout_secs: file_processor
                .timeout_secs
                .unwrap_or(defaults.processor.timeout_secs),
        };

        let clipboard = ClipboardConfig::from_file(file.clipboard);

        // Server bind address: env > file > default
        let server = match env(ENV_BIND).or(file.server.and_then(|s| s.bind_addr)) {
            Some(raw) => ServerConfig {
                bind_addr: raw
                    .parse()
                    .with_context(|| format!("Invalid bind address {:?}", raw))?,
            },
            None => defaults.server,
        };

        let logging = LoggingConfig::from_file(file.logging);

        Ok(Self {
            theme,
            session,
            processor,
            clipboard,
            server,
            logging,
        })
    }
}
