// Button row component
//
// Renders `[ Clear ] [ Paste ] [ Process Text ] [ Copy ]` and keeps the
// hit areas for mouse clicks. Buttons stay clickable while a cycle is in
// flight; the session drops the extra submits.

use crate::session::Trigger;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};

/// Gap between buttons, in columns
const GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Clear,
    Paste,
    Process,
    Copy,
}

impl Button {
    /// Left to right, also the focus order after the input box
    pub const ALL: [Button; 4] = [Button::Clear, Button::Paste, Button::Process, Button::Copy];

    pub fn label(&self) -> &'static str {
        match self {
            Button::Clear => "Clear",
            Button::Paste => "Paste",
            Button::Process => "Process Text",
            Button::Copy => "Copy",
        }
    }

    pub fn trigger(&self) -> Trigger {
        match self {
            Button::Clear => Trigger::ClearButton,
            Button::Paste => Trigger::PasteButton,
            Button::Process => Trigger::ProcessButton,
            Button::Copy => Trigger::CopyButton,
        }
    }

    /// Buttons that start a cycle look inactive while busy
    fn starts_cycle(&self) -> bool {
        matches!(self, Button::Paste | Button::Process)
    }

    fn caption(&self) -> String {
        format!("[ {} ]", self.label())
    }
}

/// Lay the buttons out left to right on the first row of `area`.
/// Buttons that do not fit are left out.
pub fn layout(area: Rect) -> Vec<(Button, Rect)> {
    let mut x = area.x;
    let mut placed = Vec::with_capacity(Button::ALL.len());

    for button in Button::ALL {
        let width = button.caption().len() as u16;
        if x + width > area.right() || area.height == 0 {
            break;
        }
        placed.push((button, Rect::new(x, area.y, width, 1)));
        x += width + GAP;
    }

    placed
}

/// Which button, if any, sits under a mouse position
pub fn hit_test(rects: &[(Button, Rect)], column: u16, row: u16) -> Option<Button> {
    rects
        .iter()
        .find(|(_, rect)| rect.contains(Position::new(column, row)))
        .map(|(button, _)| *button)
}

/// Render the row, returning the hit areas
pub fn render(
    f: &mut Frame,
    area: Rect,
    theme: &Theme,
    focused: Option<Button>,
    busy: bool,
) -> Vec<(Button, Rect)> {
    let rects = layout(area);

    for (button, rect) in &rects {
        let mut style = Style::default().fg(theme.button_fg);
        if busy && button.starts_cycle() {
            style = Style::default().fg(theme.muted);
        }
        if focused == Some(*button) {
            style = style
                .bg(theme.button_focused_bg)
                .add_modifier(Modifier::BOLD);
        }

        f.render_widget(Paragraph::new(button.caption()).style(style), *rect);
    }

    rects
}
