// Output panel component
//
// Shows exactly one of: the loading indicator, the error message, the
// processed result, or a placeholder.

use crate::session::SessionSnapshot;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What the panel displays for a snapshot
#[derive(Debug, PartialEq, Eq)]
pub enum OutputView<'a> {
    Loading,
    Error(&'a str),
    Result(&'a str),
    Empty,
}

impl<'a> OutputView<'a> {
    /// Busy wins over everything; an error wins over a stale result
    pub fn of(snapshot: &'a SessionSnapshot) -> Self {
        if snapshot.is_busy {
            OutputView::Loading
        } else if !snapshot.error_message.is_empty() {
            OutputView::Error(&snapshot.error_message)
        } else if !snapshot.processed_result.is_empty() {
            OutputView::Result(&snapshot.processed_result)
        } else {
            OutputView::Empty
        }
    }
}

pub fn render(f: &mut Frame, area: Rect, snapshot: &SessionSnapshot, theme: &Theme, spinner: char) {
    let view = OutputView::of(snapshot);

    let (title, paragraph) = match view {
        OutputView::Loading => (
            " Result ",
            Paragraph::new(format!("{} Processing…", spinner))
                .style(Style::default().fg(theme.busy)),
        ),
        OutputView::Error(message) => (
            " Error ",
            Paragraph::new(message.to_string()).style(theme.error_style()),
        ),
        OutputView::Result(result) => (
            " Result ",
            Paragraph::new(result.to_string()).style(Style::default().fg(theme.result)),
        ),
        OutputView::Empty => (
            " Result ",
            Paragraph::new("Nothing processed yet")
                .style(Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC)),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(false))
        .title(title);

    f.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MAX_LENGTH;

    fn snapshot(result: &str, error: &str, busy: bool) -> SessionSnapshot {
        SessionSnapshot {
            input_text: String::new(),
            processed_result: result.to_string(),
            error_message: error.to_string(),
            is_busy: busy,
            max_length: MAX_LENGTH,
        }
    }

    #[test]
    fn test_loading_while_busy() {
        let s = snapshot("", "", true);
        assert_eq!(OutputView::of(&s), OutputView::Loading);
    }

    #[test]
    fn test_error_shown_over_result() {
        let s = snapshot("old", "boom", false);
        assert_eq!(OutputView::of(&s), OutputView::Error("boom"));
    }

    #[test]
    fn test_result_and_empty() {
        let s = snapshot("done", "", false);
        assert_eq!(OutputView::of(&s), OutputView::Result("done"));

        let s = snapshot("", "", false);
        assert_eq!(OutputView::of(&s), OutputView::Empty);
    }
}
