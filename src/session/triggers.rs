//! Trigger sources - user actions that feed the invocation bridge
//!
//! Each physical action maps to exactly one [`Trigger`], and each trigger
//! calls `submit()` at most once. The terminal layer decides which key or
//! click becomes which trigger; this module decides what the trigger does.

use super::bridge::{Origin, SessionHandle, SubmitOutcome};
use super::error::ClipboardError;
use super::validation::{char_len, truncate};
use crate::clipboard::ClipboardAdapter;

/// A discrete user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Enter without Shift in the input surface (newline already suppressed)
    EnterKey,
    /// A paste into the input surface has landed. The surface has already
    /// pushed its post-paste content into the session.
    Pasted,
    /// "Process Text" button
    ProcessButton,
    /// "Paste" button: read clipboard, truncate, assign, submit
    PasteButton,
    /// "Clear" button
    ClearButton,
    /// "Copy" button: put the last result on the clipboard
    CopyButton,
}

impl Trigger {
    pub fn label(&self) -> &'static str {
        match self {
            Trigger::EnterKey => "enter",
            Trigger::Pasted => "paste-event",
            Trigger::ProcessButton => "process-button",
            Trigger::PasteButton => "paste-button",
            Trigger::ClearButton => "clear-button",
            Trigger::CopyButton => "copy-button",
        }
    }
}

/// What a trigger ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// `submit()` was called
    Submitted(SubmitOutcome),
    /// Fields reset
    Cleared,
    /// Clipboard read or write failed
    ClipboardFailed(ClipboardError),
    /// Result written to the clipboard
    Copied { chars: usize },
    /// Copy requested with no result to copy
    NothingToCopy,
    /// Session already torn down
    Detached,
}

/// Outcome plus the follow-up the input surface should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerReport {
    pub label: &'static str,
    pub outcome: TriggerOutcome,
    /// Re-focus the input surface
    pub refocus: bool,
}

/// Run one trigger against a session
pub async fn fire(
    trigger: Trigger,
    handle: &SessionHandle,
    clipboard: &dyn ClipboardAdapter,
) -> TriggerReport {
    let label = trigger.label();

    let outcome = match trigger {
        Trigger::EnterKey | Trigger::Pasted | Trigger::ProcessButton => {
            TriggerOutcome::Submitted(handle.submit(Origin::User).await)
        }
        Trigger::PasteButton => paste_from_clipboard(handle, clipboard).await,
        Trigger::ClearButton => {
            if handle.clear() {
                TriggerOutcome::Cleared
            } else {
                TriggerOutcome::Detached
            }
        }
        Trigger::CopyButton => copy_result(handle, clipboard).await,
    };

    let refocus = match &outcome {
        TriggerOutcome::Submitted(submitted) => submitted.is_cycle(),
        TriggerOutcome::Cleared => true,
        _ => false,
    };

    TriggerReport {
        label,
        outcome,
        refocus,
    }
}

async fn paste_from_clipboard(
    handle: &SessionHandle,
    clipboard: &dyn ClipboardAdapter,
) -> TriggerOutcome {
    let text = match clipboard.read_text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(clipboard = clipboard.name(), "Paste failed: {}", e);
            handle.report_error(e.user_message());
            return TriggerOutcome::ClipboardFailed(e);
        }
    };

    let Some(max_length) = handle.snapshot().map(|s| s.max_length) else {
        return TriggerOutcome::Detached;
    };

    let truncated = truncate(&text, max_length);
    if truncated.len() != text.len() {
        tracing::debug!(
            "Clipboard text truncated from {} to {} chars",
            char_len(&text),
            max_length
        );
    }

    // The submit after a busy paste would be dropped, so keep the draft
    match handle.set_input_if_idle(&truncated) {
        None => return TriggerOutcome::Detached,
        Some(false) => {
            tracing::debug!("Paste button while busy dropped");
            return TriggerOutcome::Submitted(SubmitOutcome::Dropped);
        }
        Some(true) => {}
    }
    TriggerOutcome::Submitted(handle.submit(Origin::User).await)
}

async fn copy_result(handle: &SessionHandle, clipboard: &dyn ClipboardAdapter) -> TriggerOutcome {
    let Some(snapshot) = handle.snapshot() else {
        return TriggerOutcome::Detached;
    };
    if snapshot.processed_result.is_empty() {
        return TriggerOutcome::NothingToCopy;
    }

    // A failed copy must not wipe the result the user is trying to copy,
    // so the error goes back to the caller instead of into the session
    match clipboard.write_text(&snapshot.processed_result).await {
        Ok(()) => TriggerOutcome::Copied {
            chars: char_len(&snapshot.processed_result),
        },
        Err(e) => {
            tracing::warn!(clipboard = clipboard.name(), "Copy failed: {}", e);
            TriggerOutcome::ClipboardFailed(e)
        }
    }
}
