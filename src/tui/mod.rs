// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard, mouse, bracketed paste, timer ticks)
// - Mapping physical input onto session triggers
// - Applying trigger reports as they come back

pub mod app;
pub mod components;
pub mod input;
pub mod theme;
pub mod traits;
pub mod ui;

use crate::clipboard::SharedClipboard;
use crate::logging::LogBuffer;
use crate::session::{Attachment, Trigger, TriggerReport};
use anyhow::{Context, Result};
use app::{App, Focus};
use components::buttons;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, MouseButton, MouseEvent,
        MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use input::{global_action, is_activation, Action};
use ratatui::layout::Position;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use theme::Theme;
use tokio::sync::mpsc;
use traits::Handled;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and cleans up when done. The
/// session attachment is owned by the App and released when the loop exits,
/// before the terminal is restored.
pub async fn run_tui(
    attachment: Attachment,
    clipboard: SharedClipboard,
    theme: Theme,
    log_buffer: LogBuffer,
) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("Failed to setup terminal")?;

    // Release events and Shift+Enter need the keyboard protocol
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .context("Failed to enable keyboard enhancement")?;
    }
    tracing::debug!(enhanced, "Terminal initialized");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (mut app, mut reports_rx) = App::new(attachment, clipboard, theme, log_buffer);

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut reports_rx).await;

    // Detach the session; cycles still in flight become no-ops
    drop(app);

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("Failed to restore keyboard mode")?;
    }
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// This loop handles three types of events:
/// 1. Terminal input (keys, mouse, paste)
/// 2. Timer ticks (spinner animation, toast expiry)
/// 3. Trigger reports from background tasks
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    reports_rx: &mut mpsc::UnboundedReceiver<TriggerReport>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        app.refresh();
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard, mouse or paste input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(event) => handle_event(app, event),
                        Err(e) => tracing::warn!("Failed to read terminal event: {}", e),
                    }
                }
            } => {}

            // Periodic tick for redrawing
            _ = tick_interval.tick() => {
                app.tick_animation();
            }

            // Finished triggers
            Some(report) = reports_rx.recv() => {
                app.apply_report(report);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key_event) => handle_key_event(app, key_event),
        Event::Mouse(mouse_event) => handle_mouse_event(app, mouse_event),
        // Bracketed paste: the whole paste arrives at once, after it landed
        Event::Paste(text) => app.paste(&text),
        _ => {}
    }
}

/// Handle keyboard input
/// Layered dispatch: Global → Focused component → Fallback (Enter submits)
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    match key_event.kind {
        KeyEventKind::Release => {
            app.handle_key_release(key_event.code);
            return;
        }
        KeyEventKind::Repeat => {
            // Held keys keep editing but never fire actions
            if app.focus == Focus::Input
                && key_event.code != KeyCode::Enter
                && global_action(&key_event).is_none()
            {
                app.dispatch_to_focused(key_event);
            }
            return;
        }
        KeyEventKind::Press => {}
    }

    // Layer 1: Global shortcuts (work regardless of focus)
    if let Some(action) = global_action(&key_event) {
        if app.handle_key_press(key_event.code) {
            apply_action(app, action);
        }
        return;
    }

    // Layer 2: Focused component
    match app.focus {
        Focus::Input => {
            // Layer 3: Enter the input box did not consume submits
            if app.dispatch_to_focused(key_event) == Handled::No
                && key_event.code == KeyCode::Enter
                && app.handle_key_press(KeyCode::Enter)
            {
                app.fire(Trigger::EnterKey);
            }
        }
        Focus::Button(button) => {
            if is_activation(&key_event) && app.handle_key_press(key_event.code) {
                app.press(button);
            }
        }
    }
}

fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::ToggleDiagnostics => app.toggle_diagnostics(),
        Action::FocusNext => app.focus_next(),
        Action::FocusPrev => app.focus_prev(),
        Action::Press(button) => app.press(button),
    }
}

/// Handle mouse input
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if mouse_event.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }

    let (column, row) = (mouse_event.column, mouse_event.row);
    if let Some(button) = buttons::hit_test(&app.button_rects, column, row) {
        app.press(button);
    } else if app.input_area.contains(Position::new(column, row)) {
        app.focus = Focus::Input;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::processor::MockProcessor;
    use crate::session::{SubmitOutcome, TriggerOutcome, MAX_LENGTH};
    use components::Button;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    fn app() -> (App, mpsc::UnboundedReceiver<TriggerReport>) {
        let attachment = Attachment::attach(
            Arc::new(MockProcessor::new(Duration::from_millis(1000))),
            MAX_LENGTH,
        );
        App::new(
            attachment,
            Arc::new(MemoryClipboard::new()),
            Theme::default(),
            LogBuffer::new(),
        )
    }

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, kind)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            handle_key_event(
                app,
                key(KeyCode::Char(c), KeyModifiers::NONE, KeyEventKind::Press),
            );
        }
    }

    /// Wait past every cycle, then drain what arrived
    async fn drain(reports_rx: &mut mpsc::UnboundedReceiver<TriggerReport>) -> Vec<TriggerReport> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut reports = Vec::new();
        while let Ok(report) = reports_rx.try_recv() {
            reports.push(report);
        }
        reports
    }

    #[tokio::test(start_paused = true)]
    async fn test_held_enter_submits_once() {
        let (mut app, mut reports_rx) = app();
        type_str(&mut app, "hello");

        handle_key_event(
            &mut app,
            key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Press),
        );
        for _ in 0..2 {
            handle_key_event(
                &mut app,
                key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Repeat),
            );
        }

        let reports = drain(&mut reports_rx).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].label, "enter");
        assert_eq!(
            reports[0].outcome,
            TriggerOutcome::Submitted(SubmitOutcome::Processed)
        );
        assert_eq!(app.input.text(), "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_press_without_release_submits_once() {
        let (mut app, mut reports_rx) = app();
        type_str(&mut app, "hello");

        for _ in 0..3 {
            handle_key_event(
                &mut app,
                key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Press),
            );
        }

        assert_eq!(drain(&mut reports_rx).await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shift_enter_inserts_newline_without_submit() {
        let (mut app, mut reports_rx) = app();
        type_str(&mut app, "hello");

        handle_key_event(
            &mut app,
            key(KeyCode::Enter, KeyModifiers::SHIFT, KeyEventKind::Press),
        );
        handle_key_event(
            &mut app,
            key(KeyCode::Enter, KeyModifiers::ALT, KeyEventKind::Press),
        );

        assert!(drain(&mut reports_rx).await.is_empty());
        assert_eq!(app.input.text(), "hello\n\n");
        app.refresh();
        assert_eq!(app.snapshot.input_text, "hello\n\n");
        assert!(!app.snapshot.is_busy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_on_focused_button_presses_it() {
        let (mut app, mut reports_rx) = app();
        type_str(&mut app, "draft");
        app.focus = Focus::Button(Button::Clear);

        handle_key_event(
            &mut app,
            key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Press),
        );

        let reports = drain(&mut reports_rx).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].label, "clear-button");
        assert_eq!(reports[0].outcome, TriggerOutcome::Cleared);
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_rearms_enter() {
        let (mut app, mut reports_rx) = app();
        type_str(&mut app, "hello");

        let press = key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Press);
        handle_key_event(&mut app, press);
        assert_eq!(drain(&mut reports_rx).await.len(), 1);

        handle_key_event(
            &mut app,
            key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release),
        );
        handle_key_event(&mut app, press);
        assert_eq!(drain(&mut reports_rx).await.len(), 1);
    }
}
