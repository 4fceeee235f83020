//! Processing operation - the pluggable backend behind every cycle
//!
//! The bridge only knows the [`Processor`] trait. Backends:
//! - [`MockProcessor`]: deterministic stand-in with a simulated delay
//! - [`FailingProcessor`]: always fails, exercises the error path
//! - [`RemoteProcessor`]: POSTs to an HTTP endpoint (see `textproc serve`)

mod mock;
mod remote;

pub use mock::{FailingProcessor, MockProcessor};
pub use remote::{ErrorResponse, ProcessRequest, ProcessResponse, RemoteProcessor};

use crate::config::{ProcessorConfig, ProcessorKind};
use crate::session::ProcessingError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// An asynchronous text processor.
///
/// Called exactly once per accepted cycle with non-empty text. Implementations
/// must not retry on their own; a failure is reported as a [`ProcessingError`]
/// and the session surfaces a generic message.
#[async_trait]
pub trait Processor: Send + Sync + 'static {
    /// Short backend name for logs and the health endpoint
    fn name(&self) -> &str;

    /// Process `text` into a result
    async fn process(&self, text: &str) -> Result<String, ProcessingError>;
}

/// Shared processor reference used by sessions and the server
pub type SharedProcessor = Arc<dyn Processor>;

/// Build the configured backend
pub fn from_config(config: &ProcessorConfig) -> Result<SharedProcessor> {
    let processor: SharedProcessor = match config.kind {
        ProcessorKind::Mock => Arc::new(MockProcessor::new(config.delay())),
        ProcessorKind::Failing => Arc::new(FailingProcessor::new(config.delay())),
        ProcessorKind::Remote => Arc::new(RemoteProcessor::new(
            config.endpoint.clone(),
            config.timeout(),
        )?),
    };

    tracing::debug!("Processor backend: {}", processor.name());
    Ok(processor)
}
