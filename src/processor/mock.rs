// Mock processors - deterministic stand-ins with a simulated delay
//
// The delay only exists so overlapping triggers are observable; it is not a
// real constraint. Tests run these under tokio's paused clock.

use super::Processor;
use crate::session::ProcessingError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Prefix the mock puts in front of every result
pub const MOCK_PREFIX: &str = "Mock processed text: ";

/// Default simulated latency
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Always succeeds with `"Mock processed text: " + text`
#[derive(Debug, Clone)]
pub struct MockProcessor {
    delay: Duration,
}

impl MockProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl Processor for MockProcessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn process(&self, text: &str) -> Result<String, ProcessingError> {
        sleep(self.delay).await;
        Ok(format!("{}{}", MOCK_PREFIX, text))
    }
}

/// Always fails after the simulated delay
#[derive(Debug, Clone)]
pub struct FailingProcessor {
    delay: Duration,
}

impl FailingProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Processor for FailingProcessor {
    fn name(&self) -> &str {
        "failing"
    }

    async fn process(&self, _text: &str) -> Result<String, ProcessingError> {
        sleep(self.delay).await;
        Err(ProcessingError::Backend(
            "failing processor rejects every request".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant as StdInstant;

    #[tokio::test(start_paused = true)]
    async fn test_mock_resolves_after_delay() {
        let processor = MockProcessor::default();
        let start = tokio::time::Instant::now();

        let result = processor.process("hello").await;

        assert_eq!(result.unwrap(), "Mock processed text: hello");
        assert!(start.elapsed() >= DEFAULT_DELAY);
    }

    #[tokio::test]
    async fn test_zero_delay_is_immediate() {
        let processor = MockProcessor::new(Duration::ZERO);
        let start = StdInstant::now();
        processor.process("x").await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_processor_fails() {
        let processor = FailingProcessor::new(Duration::from_millis(10));
        let err = processor.process("hello").await.unwrap_err();
        assert!(matches!(err, ProcessingError::Backend(_)));
    }
}
