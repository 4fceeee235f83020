//! Invocation bridge - single-flight processing cycles across the event boundary
//!
//! The terminal event layer never touches a [`Session`] directly. It holds
//! [`SessionHandle`] tokens, which are weak references handed out by the
//! owning [`Attachment`]. Dropping the attachment releases the session; every
//! handle call after that is a silent no-op, including cycles that were still
//! in flight when the surface went away.
//!
//! ```text
//!  trigger ──▶ SessionHandle::submit ──▶ begin_cycle (busy check + validate)
//!                                            │ accepted
//!                                            ▼
//!                                  Processor::process(text).await
//!                                            │
//!                                            ▼
//!                                  finish_cycle (result | generic error)
//! ```

use super::{CycleStart, ProcessingError, Session, SessionSnapshot, ValidationError};
use crate::processor::SharedProcessor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Where a submission came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A physical user action (key, paste, button)
    User,
    /// Code-driven submission (headless CLI)
    Programmatic,
}

/// What a call to [`SessionHandle::submit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Cycle ran and stored a result
    Processed,
    /// Cycle ran and the processor failed; generic error stored
    Failed,
    /// Input failed validation; error stored, never went busy
    Rejected(ValidationError),
    /// A cycle was already in flight; trigger dropped
    Dropped,
    /// The session was torn down; nothing happened
    Detached,
}

impl SubmitOutcome {
    /// Whether a processing cycle (including a validation failure) completed
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Processed | Self::Failed | Self::Rejected(_))
    }
}

struct Shared {
    session: Mutex<Session>,
    processor: SharedProcessor,
    released: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        // A panic while holding the lock cannot leave Session half-updated
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Apply a cycle outcome unless the session has been torn down
    fn complete(&self, outcome: &Result<String, ProcessingError>) -> bool {
        if self.is_released() {
            tracing::debug!("Processing resolved after session teardown, result discarded");
            return false;
        }
        self.lock().finish_cycle(outcome);
        true
    }
}

/// Clears the busy flag however the cycle ends.
///
/// If the processing future is dropped or the processor panics, the session
/// goes back to idle with the generic error instead of staying busy forever.
struct CycleGuard<'a> {
    shared: &'a Shared,
    armed: bool,
}

impl<'a> CycleGuard<'a> {
    fn new(shared: &'a Shared) -> Self {
        Self {
            shared,
            armed: true,
        }
    }

    fn finish(mut self, outcome: &Result<String, ProcessingError>) -> bool {
        self.armed = false;
        self.shared.complete(outcome)
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Processing cycle interrupted before the processor resolved");
            self.shared.complete(&Err(ProcessingError::Interrupted));
        }
    }
}

/// Owning guard for one session, held by the input surface.
///
/// Created when the surface attaches. Dropping it (or calling
/// [`Attachment::detach`]) releases the session, which also happens on early
/// returns and unwinding.
pub struct Attachment {
    shared: Arc<Shared>,
}

impl Attachment {
    /// Create a session bound to `processor`
    pub fn attach(processor: SharedProcessor, max_length: usize) -> Self {
        tracing::debug!(
            processor = processor.name(),
            max_length,
            "Session attached"
        );

        Self {
            shared: Arc::new(Shared {
                session: Mutex::new(Session::new(max_length)),
                processor,
                released: AtomicBool::new(false),
            }),
        }
    }

    /// A token for the event layer to call back into the session
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Arc::downgrade(&self.shared),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn processor_name(&self) -> &str {
        self.shared.processor.name()
    }

    /// Explicit teardown
    pub fn detach(self) {}
}

impl Drop for Attachment {
    fn drop(&mut self) {
        self.shared.released.store(true, Ordering::SeqCst);
        tracing::debug!("Session detached");
    }
}

/// Cloneable, disposable token into a session.
///
/// Every method is a no-op once the owning [`Attachment`] is gone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Weak<Shared>,
}

impl SessionHandle {
    fn upgrade(&self) -> Option<Arc<Shared>> {
        self.inner.upgrade().filter(|shared| !shared.is_released())
    }

    pub fn is_attached(&self) -> bool {
        self.upgrade().is_some()
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.upgrade().map(|shared| shared.lock().snapshot())
    }

    /// Assign the input text (truncated to the session's cap)
    pub fn set_input(&self, text: &str) -> bool {
        match self.upgrade() {
            Some(shared) => {
                shared.lock().set_input(text);
                true
            }
            None => false,
        }
    }

    /// Assign the input text only while idle. `None` once detached,
    /// `Some(false)` when a cycle is in flight.
    pub fn set_input_if_idle(&self, text: &str) -> Option<bool> {
        self.upgrade()
            .map(|shared| shared.lock().set_input_if_idle(text))
    }

    /// Reset input, result and error
    pub fn clear(&self) -> bool {
        match self.upgrade() {
            Some(shared) => {
                shared.lock().clear();
                true
            }
            None => false,
        }
    }

    /// Show a non-cycle error; ignored while busy or detached
    pub fn report_error(&self, message: impl Into<String>) -> bool {
        match self.upgrade() {
            Some(shared) => shared.lock().report_error(message),
            None => false,
        }
    }

    /// Run one processing cycle.
    ///
    /// Drops the call if a cycle is already in flight. Never queues, never
    /// cancels the in-flight processor call.
    pub async fn submit(&self, origin: Origin) -> SubmitOutcome {
        let Some(shared) = self.upgrade() else {
            tracing::debug!(?origin, "Submit after session teardown ignored");
            return SubmitOutcome::Detached;
        };

        let start = shared.lock().begin_cycle();
        let text = match start {
            CycleStart::Dropped => {
                tracing::debug!(?origin, "Submit while busy dropped");
                return SubmitOutcome::Dropped;
            }
            CycleStart::Rejected(e) => {
                tracing::debug!(?origin, "Submit rejected: {}", e);
                return SubmitOutcome::Rejected(e);
            }
            CycleStart::Accepted(text) => text,
        };

        let guard = CycleGuard::new(&shared);
        tracing::debug!(
            ?origin,
            processor = shared.processor.name(),
            chars = text.chars().count(),
            "Processing cycle started"
        );

        let result = shared.processor.process(&text).await;

        if let Err(e) = &result {
            tracing::error!(processor = shared.processor.name(), "Processing failed: {}", e);
        }

        if !guard.finish(&result) {
            return SubmitOutcome::Detached;
        }

        match result {
            Ok(_) => SubmitOutcome::Processed,
            Err(_) => SubmitOutcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{FailingProcessor, MockProcessor, Processor};
    use crate::session::error::GENERIC_PROCESSING_MESSAGE;
    use crate::session::MAX_LENGTH;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    /// Counts calls and blocks each one until the test releases it
    struct GatedProcessor {
        calls: AtomicUsize,
        gate: Semaphore,
    }

    impl GatedProcessor {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Semaphore::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn release(&self) {
            self.gate.add_permits(1);
        }

        async fn wait_for_calls(&self, n: usize) {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl Processor for GatedProcessor {
        fn name(&self) -> &str {
            "gated"
        }

        async fn process(&self, text: &str) -> Result<String, ProcessingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| ProcessingError::Interrupted)?;
            permit.forget();
            Ok(format!("done: {}", text))
        }
    }

    struct PanickingProcessor;

    #[async_trait]
    impl Processor for PanickingProcessor {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn process(&self, _text: &str) -> Result<String, ProcessingError> {
            panic!("processor blew up");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_trip_with_mock() {
        let attachment = Attachment::attach(Arc::new(MockProcessor::default()), MAX_LENGTH);
        let handle = attachment.handle();
        handle.set_input("hello");

        let outcome = handle.submit(Origin::User).await;

        assert_eq!(outcome, SubmitOutcome::Processed);
        let snap = attachment.snapshot();
        assert_eq!(snap.processed_result, "Mock processed text: hello");
        assert_eq!(snap.error_message, "");
        assert!(!snap.is_busy);
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_processor() {
        let processor = GatedProcessor::new();
        let attachment = Attachment::attach(processor.clone(), MAX_LENGTH);
        let handle = attachment.handle();
        handle.set_input(" \t ");

        let outcome = handle.submit(Origin::User).await;

        assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::EmptyInput));
        assert_eq!(processor.calls(), 0);
        let snap = attachment.snapshot();
        assert!(!snap.is_busy);
        assert!(!snap.error_message.is_empty());
    }

    #[tokio::test]
    async fn test_busy_for_whole_span_and_overlap_dropped() {
        let processor = GatedProcessor::new();
        let attachment = Attachment::attach(processor.clone(), MAX_LENGTH);
        let handle = attachment.handle();
        handle.set_input("first");

        let in_flight = tokio::spawn({
            let handle = handle.clone();
            async move { handle.submit(Origin::User).await }
        });
        processor.wait_for_calls(1).await;

        let during = attachment.snapshot();
        assert!(during.is_busy);

        // Overlapping trigger: no queueing, no state change
        assert_eq!(handle.submit(Origin::User).await, SubmitOutcome::Dropped);
        assert_eq!(attachment.snapshot(), during);
        assert_eq!(processor.calls(), 1);

        processor.release();
        assert_eq!(in_flight.await.unwrap(), SubmitOutcome::Processed);

        let after = attachment.snapshot();
        assert!(!after.is_busy);
        assert_eq!(after.processed_result, "done: first");
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test]
    async fn test_one_call_per_accepted_submit() {
        let processor = GatedProcessor::new();
        let attachment = Attachment::attach(processor.clone(), MAX_LENGTH);
        let handle = attachment.handle();
        handle.set_input("again");

        for expected in 1..=3 {
            processor.release();
            assert_eq!(handle.submit(Origin::User).await, SubmitOutcome::Processed);
            assert_eq!(processor.calls(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_sets_generic_error() {
        let processor = Arc::new(FailingProcessor::new(Duration::from_millis(5)));
        let attachment = Attachment::attach(processor, MAX_LENGTH);
        let handle = attachment.handle();
        handle.set_input("hello");

        assert_eq!(handle.submit(Origin::User).await, SubmitOutcome::Failed);

        let snap = attachment.snapshot();
        assert_eq!(snap.error_message, GENERIC_PROCESSING_MESSAGE);
        assert_eq!(snap.processed_result, "");
        assert!(!snap.is_busy);
    }

    #[tokio::test]
    async fn test_session_usable_after_failure() {
        let attachment = Attachment::attach(Arc::new(FailingProcessor::new(Duration::ZERO)), 10);
        let handle = attachment.handle();
        handle.set_input("x");
        assert_eq!(handle.submit(Origin::User).await, SubmitOutcome::Failed);

        handle.set_input("   ");
        assert!(matches!(
            handle.submit(Origin::User).await,
            SubmitOutcome::Rejected(_)
        ));
        assert!(!attachment.snapshot().is_busy);
    }

    #[tokio::test]
    async fn test_handle_after_teardown_is_noop() {
        let attachment = Attachment::attach(Arc::new(MockProcessor::new(Duration::ZERO)), 300);
        let handle = attachment.handle();
        handle.set_input("before");
        attachment.detach();

        assert!(!handle.is_attached());
        assert_eq!(handle.submit(Origin::User).await, SubmitOutcome::Detached);
        assert!(!handle.set_input("after"));
        assert!(!handle.clear());
        assert!(!handle.report_error("late"));
        assert!(handle.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_teardown_during_cycle_discards_result() {
        let processor = GatedProcessor::new();
        let attachment = Attachment::attach(processor.clone(), MAX_LENGTH);
        let handle = attachment.handle();
        handle.set_input("late");

        let in_flight = tokio::spawn({
            let handle = handle.clone();
            async move { handle.submit(Origin::User).await }
        });
        processor.wait_for_calls(1).await;

        drop(attachment);
        processor.release();

        assert_eq!(in_flight.await.unwrap(), SubmitOutcome::Detached);
        assert!(handle.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_panicking_processor_returns_to_idle() {
        let attachment = Attachment::attach(Arc::new(PanickingProcessor), MAX_LENGTH);
        let handle = attachment.handle();
        handle.set_input("boom");

        let joined = tokio::spawn({
            let handle = handle.clone();
            async move { handle.submit(Origin::User).await }
        })
        .await;

        assert!(joined.is_err());
        let snap = attachment.snapshot();
        assert!(!snap.is_busy);
        assert_eq!(snap.error_message, GENERIC_PROCESSING_MESSAGE);
        assert_eq!(snap.processed_result, "");
    }

    #[test]
    fn test_outcome_cycle_classification() {
        assert!(SubmitOutcome::Processed.is_cycle());
        assert!(SubmitOutcome::Failed.is_cycle());
        assert!(SubmitOutcome::Rejected(ValidationError::EmptyInput).is_cycle());
        assert!(!SubmitOutcome::Dropped.is_cycle());
        assert!(!SubmitOutcome::Detached.is_cycle());
    }
}
