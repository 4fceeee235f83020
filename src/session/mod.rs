// Session module - state machine for one text-processing interaction
//
// A session holds the input text, the last result or error, and a busy flag.
// It is only ever mutated through the bridge (submit cycles) and the trigger
// sources (clear, paste, edits), never through ambient lookups.
//
// State Diagram:
//
//   [Idle] ──submit(valid)──▶ [Busy] ──processor resolves──▶ [Idle]
//     │  ▲                      │                           (result or error)
//     │  │                      │ submit
//     └──┘                      └──▶ dropped (no-op)
//   submit(invalid): error set, stays Idle
//
// Teardown (dropping the Attachment) is reachable from any state.

mod bridge;
pub mod error;
pub mod triggers;
pub mod validation;

pub use bridge::{Attachment, Origin, SessionHandle, SubmitOutcome};
pub use error::{ClipboardError, ProcessingError, ValidationError};
pub use triggers::{fire, Trigger, TriggerOutcome, TriggerReport};
pub use validation::MAX_LENGTH;

use validation::{truncate, validate};

/// Observable phase of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// A processing cycle is in flight
    Busy,
}

/// Result of trying to start a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CycleStart {
    /// Session was busy; nothing changed
    Dropped,
    /// Validation failed; error message set, still idle
    Rejected(ValidationError),
    /// Busy flag set; process this text
    Accepted(String),
}

/// Immutable copy of the session fields, for rendering and assertions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub input_text: String,
    pub processed_result: String,
    pub error_message: String,
    pub is_busy: bool,
    pub max_length: usize,
}

impl SessionSnapshot {
    pub fn phase(&self) -> Phase {
        if self.is_busy {
            Phase::Busy
        } else {
            Phase::Idle
        }
    }
}

/// Mutable state behind one attached input surface
#[derive(Debug)]
pub struct Session {
    input_text: String,
    processed_result: String,
    error_message: String,
    is_busy: bool,
    max_length: usize,
}

impl Session {
    pub fn new(max_length: usize) -> Self {
        Self {
            input_text: String::new(),
            processed_result: String::new(),
            error_message: String::new(),
            is_busy: false,
            max_length,
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn processed_result(&self) -> &str {
        &self.processed_result
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn phase(&self) -> Phase {
        if self.is_busy {
            Phase::Busy
        } else {
            Phase::Idle
        }
    }

    /// Assign the input text, truncating anything past `max_length`
    pub fn set_input(&mut self, text: &str) {
        self.input_text = truncate(text, self.max_length);
    }

    /// Assign the input text unless a cycle is in flight
    pub fn set_input_if_idle(&mut self, text: &str) -> bool {
        if self.is_busy {
            return false;
        }
        self.set_input(text);
        true
    }

    /// Reset the three text fields. Never touches the busy flag.
    pub fn clear(&mut self) {
        self.input_text.clear();
        self.processed_result.clear();
        self.error_message.clear();
    }

    /// Show an error that did not come from a cycle (clipboard failures).
    ///
    /// Ignored while busy: the in-flight cycle owns result/error until it resolves.
    pub fn report_error(&mut self, message: impl Into<String>) -> bool {
        if self.is_busy {
            return false;
        }
        self.processed_result.clear();
        self.error_message = message.into();
        true
    }

    /// Busy check, clear, validate and mark busy in one step
    pub(crate) fn begin_cycle(&mut self) -> CycleStart {
        if self.is_busy {
            return CycleStart::Dropped;
        }

        self.processed_result.clear();
        self.error_message.clear();

        if let Err(e) = validate(&self.input_text) {
            self.error_message = e.to_string();
            return CycleStart::Rejected(e);
        }

        self.is_busy = true;
        CycleStart::Accepted(self.input_text.clone())
    }

    /// Store the outcome of the in-flight cycle and go back to idle
    pub(crate) fn finish_cycle(&mut self, outcome: &Result<String, ProcessingError>) {
        match outcome {
            Ok(result) => {
                self.processed_result = result.clone();
                self.error_message.clear();
            }
            Err(e) => {
                self.processed_result.clear();
                self.error_message = e.user_message().to_string();
            }
        }
        self.is_busy = false;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            input_text: self.input_text.clone(),
            processed_result: self.processed_result.clone(),
            error_message: self.error_message.clone(),
            is_busy: self.is_busy,
            max_length: self.max_length,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(MAX_LENGTH)
    }
}
