// Title bar component
//
// Renders the app title with the session state indicator.

use crate::session::Phase;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title bar at the top of the screen
///
/// Shows:
/// - App name
/// - State indicator (spinner while a cycle is in flight)
/// - Processor backend name
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let state = match app.snapshot.phase() {
        Phase::Idle => "Idle".to_string(),
        Phase::Busy => format!("{} Processing", app.spinner_char()),
    };

    let state_color = match app.snapshot.phase() {
        Phase::Idle => app.theme.status_bar,
        Phase::Busy => app.theme.busy,
    };

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" textproc ", app.theme.title_style()),
        Span::styled(
            format!("── {}", state),
            Style::default().fg(state_color).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.title))
            .title_top(Line::from(format!(" {} ", app.processor_name())).right_aligned()),
    );

    f.render_widget(title, area);
}
