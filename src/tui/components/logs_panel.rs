//! Diagnostics panel component
//!
//! Displays the most recent system log entries (toggled with F2). Always
//! follows the tail of the buffer; processing failure causes show up here
//! while the session itself only shows the generic message.

use crate::logging::{LogEntry, LogLevel};
use crate::tui::app::App;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Format a log entry for display
pub fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

/// Get color style for log level
fn log_level_style(level: &LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default()
            .fg(theme.log_error)
            .add_modifier(Modifier::BOLD),
        LogLevel::Warn => Style::default().fg(theme.log_warn),
        LogLevel::Info => Style::default().fg(theme.log_info),
        LogLevel::Debug => Style::default().fg(theme.log_debug),
        LogLevel::Trace => Style::default().fg(theme.log_trace),
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let entries = app.log_buffer.recent(height);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            ListItem::new(format_log_entry(entry)).style(log_level_style(&entry.level, &app.theme))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(false))
            .title(format!(" Diagnostics ({}) ", app.log_buffer.len())),
    );

    f.render_widget(list, area);
}
