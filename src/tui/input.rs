// Input handling - global key map and action-key debouncing
//
// Global shortcuts are resolved here before the focused component sees the
// key. Action keys trigger once per press: a held Enter must not turn into a
// stream of submits on terminals that repeat Press events and never send
// Release events.

use super::components::Button;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum gap between two triggers of a held action key
const ACTION_DEBOUNCE: Duration = Duration::from_millis(150);

/// App-level action bound to a key chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleDiagnostics,
    FocusNext,
    FocusPrev,
    Press(Button),
}

/// Resolve a global shortcut. Keys without one go to the focused component.
pub fn global_action(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::F(2) => Some(Action::ToggleDiagnostics),
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        KeyCode::Char('l') if ctrl => Some(Action::Press(Button::Clear)),
        KeyCode::Char('v') if ctrl || alt => Some(Action::Press(Button::Paste)),
        KeyCode::Char('p') if ctrl => Some(Action::Press(Button::Process)),
        KeyCode::Char('y') if ctrl => Some(Action::Press(Button::Copy)),
        _ => None,
    }
}

/// Whether a key activates a focused button
pub fn is_activation(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}

/// Tracks the state of a single key
#[derive(Debug, Default)]
struct KeyState {
    /// Whether the key is currently pressed
    is_pressed: bool,
    /// When the action was last triggered
    last_triggered: Option<Instant>,
}

/// Press/release tracker for action keys
#[derive(Debug, Default)]
pub struct InputHandler {
    key_states: HashMap<KeyCode, KeyState>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press event
    /// Returns true if the action should be triggered
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.handle_key_press_at(key, Instant::now())
    }

    fn handle_key_press_at(&mut self, key: KeyCode, now: Instant) -> bool {
        let state = self.key_states.entry(key).or_default();

        if state.is_pressed {
            // Debounce: only trigger if enough time passed since last trigger
            // This handles terminals that don't send Release events
            if let Some(last) = state.last_triggered {
                if now.duration_since(last) >= ACTION_DEBOUNCE {
                    state.last_triggered = Some(now);
                    return true;
                }
            }
            false
        } else {
            // New key press - always trigger
            state.is_pressed = true;
            state.last_triggered = Some(now);
            true
        }
    }

    /// Handle a key release event
    pub fn handle_key_release(&mut self, key: KeyCode) {
        if let Some(state) = self.key_states.get_mut(&key) {
            state.is_pressed = false;
            state.last_triggered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_state_change_no_repeat() {
        let mut handler = InputHandler::new();
        let t0 = Instant::now();

        // First press triggers
        assert!(handler.handle_key_press_at(KeyCode::Enter, t0));

        // Repeats while held don't trigger
        assert!(!handler.handle_key_press_at(KeyCode::Enter, t0 + Duration::from_millis(30)));
        assert!(!handler.handle_key_press_at(KeyCode::Enter, t0 + Duration::from_millis(60)));

        // Release
        handler.handle_key_release(KeyCode::Enter);

        // Next press triggers again
        assert!(handler.handle_key_press_at(KeyCode::Enter, t0 + Duration::from_millis(70)));
    }

    #[test]
    fn test_no_release_events_fall_back_to_debounce() {
        let mut handler = InputHandler::new();
        let t0 = Instant::now();

        assert!(handler.handle_key_press_at(KeyCode::Enter, t0));
        assert!(!handler.handle_key_press_at(KeyCode::Enter, t0 + Duration::from_millis(100)));
        assert!(handler.handle_key_press_at(KeyCode::Enter, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_global_shortcuts() {
        assert_eq!(global_action(&ctrl('c')), Some(Action::Quit));
        assert_eq!(
            global_action(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(global_action(&ctrl('l')), Some(Action::Press(Button::Clear)));
        assert_eq!(global_action(&ctrl('v')), Some(Action::Press(Button::Paste)));
        assert_eq!(
            global_action(&KeyEvent::new(KeyCode::Char('v'), KeyModifiers::ALT)),
            Some(Action::Press(Button::Paste))
        );
        assert_eq!(global_action(&ctrl('p')), Some(Action::Press(Button::Process)));
        assert_eq!(global_action(&ctrl('y')), Some(Action::Press(Button::Copy)));
        assert_eq!(
            global_action(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::FocusPrev)
        );
    }

    #[test]
    fn test_plain_typing_is_not_a_shortcut() {
        for c in ['c', 'v', 'l', 'p', 'y', ' '] {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            assert_eq!(global_action(&key), None, "{:?}", c);
        }
        // Enter belongs to the focused component
        assert_eq!(
            global_action(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            None
        );
    }
}
