//! Clipboard adapter for reading and writing the system clipboard
//!
//! Uses `arboard` crate for cross-platform support (Windows, macOS, Linux).
//! The clipboard is created fresh each call to avoid holding resources, and
//! arboard's blocking calls run on tokio's blocking pool.
//!
//! [`MemoryClipboard`] is an in-process buffer used by tests and as a fallback
//! when no system clipboard is reachable (headless Linux, SSH sessions).

use crate::session::ClipboardError;
use arboard::Clipboard;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Read/write access to a clipboard
#[async_trait]
pub trait ClipboardAdapter: Send + Sync + 'static {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn read_text(&self) -> Result<String, ClipboardError>;

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Shared clipboard reference used by the trigger layer
pub type SharedClipboard = Arc<dyn ClipboardAdapter>;

/// The operating system clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// Check whether a clipboard can be opened at all
    pub fn probe() -> Result<(), ClipboardError> {
        Clipboard::new()
            .map(|_| ())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ClipboardAdapter for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    async fn read_text(&self) -> Result<String, ClipboardError> {
        tokio::task::spawn_blocking(|| {
            let mut clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .get_text()
                .map_err(|e| ClipboardError::Read(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::Read(e.to_string()))?
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::Write(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::Write(e.to_string()))?
    }
}

/// In-process clipboard buffer
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    buffer: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            buffer: Mutex::new(Some(text.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ClipboardAdapter for MemoryClipboard {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read_text(&self) -> Result<String, ClipboardError> {
        self.contents()
            .ok_or_else(|| ClipboardError::Read("clipboard is empty".to_string()))
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.buffer.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Pick the system clipboard, or the in-memory buffer when it is unreachable
/// and `fallback` is allowed
pub fn from_config(fallback: bool) -> SharedClipboard {
    match SystemClipboard::probe() {
        Ok(()) => Arc::new(SystemClipboard),
        Err(e) if fallback => {
            tracing::warn!("{}; using in-memory clipboard", e);
            Arc::new(MemoryClipboard::new())
        }
        Err(e) => {
            // Keep the system adapter so every paste reports the real reason
            tracing::warn!("{}", e);
            Arc::new(SystemClipboard)
        }
    }
}
