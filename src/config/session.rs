//! Session, processor, clipboard and server settings

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::session::MAX_LENGTH;

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Per-session limits
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum input length in characters
    pub max_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_length: MAX_LENGTH,
        }
    }
}

/// Session settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileSession {
    pub max_length: Option<usize>,
}

impl SessionConfig {
    pub fn from_file(file: Option<FileSession>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            max_length: file.max_length.unwrap_or(defaults.max_length),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Processor
// ─────────────────────────────────────────────────────────────────────────────

/// Which processing backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessorKind {
    /// Deterministic mock with simulated delay
    #[default]
    Mock,
    /// Always fails (error path demo)
    Failing,
    /// HTTP endpoint
    Remote,
}

impl ProcessorKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mock" => Some(Self::Mock),
            "failing" => Some(Self::Failing),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Failing => "failing",
            Self::Remote => "remote",
        }
    }
}

/// Processor backend configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub kind: ProcessorKind,
    /// Simulated latency for mock/failing backends (milliseconds)
    pub delay_ms: u64,
    /// Endpoint URL for the remote backend
    pub endpoint: String,
    /// Request timeout for the remote backend (seconds)
    pub timeout_secs: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            kind: ProcessorKind::Mock,
            delay_ms: 1000,
            endpoint: "http://127.0.0.1:8787/api/process".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Processor settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileProcessor {
    pub kind: Option<String>,
    pub delay_ms: Option<u64>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ProcessorConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard
// ─────────────────────────────────────────────────────────────────────────────

/// Clipboard adapter configuration
#[derive(Debug, Clone)]
pub struct ClipboardConfig {
    /// Use an in-memory clipboard when the system clipboard is unreachable
    pub fallback: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { fallback: true }
    }
}

/// Clipboard settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileClipboard {
    pub fallback: Option<bool>,
}

impl ClipboardConfig {
    pub fn from_file(file: Option<FileClipboard>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            fallback: file.fallback.unwrap_or(true),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP processing endpoint configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
        }
    }
}

/// Server settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileServer {
    pub bind_addr: Option<String>,
}
