// Status bar component
//
// Renders key hints at the bottom, shortened on narrow terminals.

use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Below this width only the essential hints fit
const COMPACT_WIDTH: u16 = 80;

pub fn hint_text(width: u16) -> &'static str {
    if width < COMPACT_WIDTH {
        " Enter process │ Tab focus │ Esc quit"
    } else {
        " Enter process │ Shift+Enter newline │ ^V paste │ ^L clear │ ^Y copy │ Tab focus │ F2 logs │ Esc quit"
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let status = Paragraph::new(hint_text(area.width))
        .style(app.theme.status_style())
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
