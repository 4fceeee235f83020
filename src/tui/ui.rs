// UI rendering - called on every frame
//
// Layout top to bottom:
//
//   ┌ title ──────────────────┐
//   │ input box               │
//   [ Clear ] [ Paste ] ...
//   ┌ result / error ─────────┐
//   ┌ diagnostics (F2) ───────┐
//   ─ key hints ───────────────

use super::app::{App, Focus};
use super::components::{buttons, logs_panel, output_panel, status_bar, title_bar};
use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::widgets::Block;
use ratatui::Frame;

/// Height of the input box including borders
const INPUT_HEIGHT: u16 = 8;

/// Height of the diagnostics panel including borders
const DIAGNOSTICS_HEIGHT: u16 = 10;

pub fn draw(f: &mut Frame, app: &mut App) {
    f.render_widget(Block::default().style(app.theme.base_style()), f.area());

    let diagnostics = if app.show_diagnostics {
        DIAGNOSTICS_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(diagnostics),
            Constraint::Length(2),
        ])
        .split(f.area());

    title_bar::render(f, chunks[0], app);

    app.input_area = chunks[1];
    app.input
        .render(f, chunks[1], &app.theme, app.focus == Focus::Input);

    let button_row = chunks[2].inner(Margin {
        horizontal: 1,
        vertical: 0,
    });
    app.button_rects = buttons::render(
        f,
        button_row,
        &app.theme,
        app.focus.button(),
        app.snapshot.is_busy,
    );

    output_panel::render(f, chunks[3], &app.snapshot, &app.theme, app.spinner_char());

    if app.show_diagnostics {
        logs_panel::render(f, chunks[4], app);
    }

    status_bar::render(f, chunks[5], app);

    // Toast on top of everything
    if let Some(ref toast) = app.toast {
        toast.render(f, f.area(), &app.theme);
    }

    // Clear expired toast after render
    app.clear_expired_toast();
}
