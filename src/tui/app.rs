// TUI application state
//
// The App owns the session attachment for as long as the terminal UI runs.
// Triggers run as tokio tasks holding only a SessionHandle; their reports
// come back over a channel and are applied on the UI loop. When the App is
// dropped the attachment goes with it, and any task still in flight finds a
// detached handle.

use super::components::{Button, InputBox, Toast};
use super::input::InputHandler;
use super::theme::Theme;
use super::traits::{Handled, Interactive};
use crate::clipboard::SharedClipboard;
use crate::logging::LogBuffer;
use crate::session::{
    fire, Attachment, SessionHandle, SessionSnapshot, SubmitOutcome, Trigger, TriggerOutcome,
    TriggerReport,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

/// Spinner frames for the busy indicator
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// What receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Button(Button),
}

impl Focus {
    /// Tab order: input, then the buttons left to right
    fn order() -> [Focus; 5] {
        [
            Focus::Input,
            Focus::Button(Button::Clear),
            Focus::Button(Button::Paste),
            Focus::Button(Button::Process),
            Focus::Button(Button::Copy),
        ]
    }

    pub fn next(self) -> Self {
        let order = Self::order();
        let current = order.iter().position(|&f| f == self).unwrap_or(0);
        order[(current + 1) % order.len()]
    }

    pub fn prev(self) -> Self {
        let order = Self::order();
        let current = order.iter().position(|&f| f == self).unwrap_or(0);
        order[(current + order.len() - 1) % order.len()]
    }

    pub fn button(self) -> Option<Button> {
        match self {
            Focus::Button(button) => Some(button),
            Focus::Input => None,
        }
    }
}

/// Main application state for the TUI
pub struct App {
    /// Keeps the session alive; dropped with the App
    attachment: Attachment,
    handle: SessionHandle,
    clipboard: SharedClipboard,
    reports_tx: mpsc::UnboundedSender<TriggerReport>,

    /// Input handler for action key debounce
    input_handler: InputHandler,

    pub input: InputBox,
    pub focus: Focus,

    /// Session state as of the last refresh
    pub snapshot: SessionSnapshot,

    pub theme: Theme,

    /// Log buffer for the diagnostics panel
    pub log_buffer: LogBuffer,
    pub show_diagnostics: bool,

    pub toast: Option<Toast>,

    /// Hit areas from the last frame, for mouse clicks
    pub button_rects: Vec<(Button, Rect)>,
    pub input_area: Rect,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Animation frame counter for spinners
    animation_frame: usize,
}

impl App {
    pub fn new(
        attachment: Attachment,
        clipboard: SharedClipboard,
        theme: Theme,
        log_buffer: LogBuffer,
    ) -> (Self, mpsc::UnboundedReceiver<TriggerReport>) {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        let snapshot = attachment.snapshot();
        let handle = attachment.handle();

        let app = Self {
            input: InputBox::new(snapshot.max_length),
            attachment,
            handle,
            clipboard,
            reports_tx,
            input_handler: InputHandler::new(),
            focus: Focus::Input,
            snapshot,
            theme,
            log_buffer,
            show_diagnostics: false,
            toast: None,
            button_rects: Vec::new(),
            input_area: Rect::default(),
            should_quit: false,
            animation_frame: 0,
        };

        (app, reports_rx)
    }

    pub fn processor_name(&self) -> &str {
        self.attachment.processor_name()
    }

    /// Pull the latest session state into the view
    pub fn refresh(&mut self) {
        self.snapshot = self.attachment.snapshot();
        self.input.sync(&self.snapshot.input_text);
    }

    /// Run a trigger in the background; its report arrives on the channel
    pub fn fire(&self, trigger: Trigger) {
        tracing::debug!(trigger = trigger.label(), "Trigger fired");

        let handle = self.handle.clone();
        let clipboard = self.clipboard.clone();
        let reports_tx = self.reports_tx.clone();

        tokio::spawn(async move {
            let report = fire(trigger, &handle, clipboard.as_ref()).await;
            // The UI loop may already be gone
            let _ = reports_tx.send(report);
        });
    }

    pub fn press(&self, button: Button) {
        self.fire(button.trigger());
    }

    /// Route a key to the focused component. Enter that the input box does
    /// not consume submits.
    pub fn dispatch_to_focused(&mut self, key: KeyEvent) -> Handled {
        match self.focus {
            Focus::Input => {
                let handled = self.input.handle_key(key);
                self.push_edits();
                handled
            }
            Focus::Button(_) => Handled::No,
        }
    }

    /// Push pending input box edits into the session
    fn push_edits(&mut self) {
        if self.input.take_changed() {
            self.handle.set_input(self.input.text());
        }
    }

    /// A bracketed paste landed in the input surface
    pub fn paste(&mut self, text: &str) {
        self.focus = Focus::Input;

        // Terminals deliver pasted line breaks as \r
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.input.insert_str(&normalized);
        self.push_edits();

        self.fire(Trigger::Pasted);
    }

    /// Apply the follow-up of a finished trigger
    pub fn apply_report(&mut self, report: TriggerReport) {
        tracing::debug!(trigger = report.label, outcome = ?report.outcome, "Trigger finished");

        if report.refocus {
            self.focus = Focus::Input;
        }

        match report.outcome {
            TriggerOutcome::ClipboardFailed(e) => self.toast = Some(Toast::error(e.user_message())),
            TriggerOutcome::Copied { chars } => {
                self.show_toast(format!("✓ Copied {} chars to clipboard", chars))
            }
            TriggerOutcome::NothingToCopy => self.show_toast("Nothing to copy yet"),
            TriggerOutcome::Submitted(SubmitOutcome::Dropped) => {
                self.show_toast("Still processing, try again when done")
            }
            _ => {}
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_diagnostics(&mut self) {
        self.show_diagnostics = !self.show_diagnostics;
    }

    /// Handle a key press - returns true if the action should be triggered
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    /// Handle a key release
    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    /// Advance the animation frame (called on each tick)
    pub fn tick_animation(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Get the current spinner character
    pub fn spinner_char(&self) -> char {
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    /// Show a toast notification
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Clear expired toast
    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }
}
