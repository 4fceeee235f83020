//! Input box component
//!
//! The single input surface of a session. It mirrors the session's input
//! text, enforces the length cap on keystrokes, and owns the cursor. Every
//! edit is flagged so the App can push the new text into the session.
//!
//! Enter without Shift is NOT consumed: it bubbles up so the App can submit.
//! Shift+Enter (or Alt+Enter on terminals that cannot report Shift) inserts
//! a newline instead.

use crate::session::validation::char_len;
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const PLACEHOLDER: &str = "Type or paste text, Enter to process";

pub struct InputBox {
    text: String,
    /// Cursor position in chars
    cursor: usize,
    max_length: usize,
    /// Set by edits, cleared by `take_changed`
    changed: bool,
}

impl InputBox {
    pub fn new(max_length: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            max_length,
            changed: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Adopt the session's text when something other than typing changed it
    /// (clear, paste button, truncation). The cursor moves to the end.
    pub fn sync(&mut self, session_text: &str) {
        if self.text != session_text {
            self.text = session_text.to_string();
            self.cursor = char_len(&self.text);
        }
    }

    /// Whether an edit happened since the last call
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Insert at the cursor, keeping only what fits under the cap
    pub fn insert_str(&mut self, s: &str) {
        let room = self.max_length.saturating_sub(char_len(&self.text));
        let fitted: String = s.chars().take(room).collect();
        if fitted.is_empty() {
            return;
        }

        let at = self.byte_index(self.cursor);
        self.text.insert_str(at, &fitted);
        self.cursor += char_len(&fitted);
        self.changed = true;
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn delete_before(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        self.changed = true;
    }

    fn delete_at(&mut self) {
        if self.cursor >= char_len(&self.text) {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        self.changed = true;
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, focused: bool) {
        let title = format!(" Input {}/{} ", char_len(&self.text), self.max_length);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(focused))
            .title(title);
        let inner = block.inner(area);

        let (lines, (col, row)) = wrap_with_cursor(&self.text, self.cursor, inner.width);
        // Keep the cursor row in view
        let scroll = row.saturating_sub(inner.height.saturating_sub(1));

        let paragraph = if self.text.is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(theme.muted))
        } else {
            Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>())
                .style(Style::default().fg(theme.fg))
                .scroll((scroll, 0))
        };

        f.render_widget(paragraph.block(block), area);

        if focused && inner.width > 0 && inner.height > 0 {
            f.set_cursor_position((inner.x + col.min(inner.width - 1), inner.y + row - scroll));
        }
    }
}

impl Interactive for InputBox {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        let ctrl_or_alt = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.insert_str("\n");
                Handled::Yes
            }
            // Submit; the newline is suppressed
            KeyCode::Enter => Handled::No,
            KeyCode::Char(c) if !ctrl_or_alt => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
                Handled::Yes
            }
            KeyCode::Backspace => {
                self.delete_before();
                Handled::Yes
            }
            KeyCode::Delete => {
                self.delete_at();
                Handled::Yes
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Handled::Yes
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(char_len(&self.text));
                Handled::Yes
            }
            KeyCode::Home => {
                self.cursor = 0;
                Handled::Yes
            }
            KeyCode::End => {
                self.cursor = char_len(&self.text);
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}

/// Hard-wrap `text` at `width` display columns.
///
/// Returns the wrapped lines and the cursor's (col, row) within them.
pub fn wrap_with_cursor(text: &str, cursor: usize, width: u16) -> (Vec<String>, (u16, u16)) {
    let width = usize::from(width.max(1));
    let mut lines = vec![String::new()];
    let mut col = 0usize;
    let mut at_cursor = None;

    for (i, ch) in text.chars().enumerate() {
        if ch == '\n' {
            if i == cursor {
                at_cursor = Some((col, lines.len() - 1));
            }
            lines.push(String::new());
            col = 0;
            continue;
        }

        let w = ch.width().unwrap_or(0);
        if col + w > width && col > 0 {
            lines.push(String::new());
            col = 0;
        }
        if i == cursor {
            at_cursor = Some((col, lines.len() - 1));
        }
        if let Some(line) = lines.last_mut() {
            line.push(ch);
        }
        col += w;
    }

    let (col, row) = at_cursor.unwrap_or_else(|| {
        // Cursor after the last char; a full line pushes it to the next row
        if col >= width {
            (0, lines.len())
        } else {
            (col, lines.len() - 1)
        }
    });

    (lines, (col as u16, row as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut InputBox, s: &str) {
        for c in s.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_stops_at_cap() {
        let mut input = InputBox::new(5);
        type_str(&mut input, "abcdefg");
        assert_eq!(input.text(), "abcde");
        assert!(input.take_changed());
        assert!(!input.take_changed());
    }

    #[test]
    fn test_enter_bubbles_up_without_newline() {
        let mut input = InputBox::new(300);
        type_str(&mut input, "hi");
        input.take_changed();

        assert_eq!(input.handle_key(key(KeyCode::Enter)), Handled::No);
        assert_eq!(input.text(), "hi");
        assert!(!input.take_changed());
    }

    #[test]
    fn test_shift_enter_inserts_newline() {
        let mut input = InputBox::new(300);
        type_str(&mut input, "a");
        let handled = input.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        assert_eq!(handled, Handled::Yes);
        type_str(&mut input, "b");
        assert_eq!(input.text(), "a\nb");
    }

    #[test]
    fn test_control_chords_are_not_text() {
        let mut input = InputBox::new(300);
        let handled = input.handle_key(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL));
        assert_eq!(handled, Handled::No);
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_cursor_editing_with_multibyte_chars() {
        let mut input = InputBox::new(300);
        type_str(&mut input, "héllo");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.text(), "hllo");

        input.handle_key(key(KeyCode::End));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.text(), "hll");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_paste_insert_keeps_what_fits() {
        let mut input = InputBox::new(6);
        type_str(&mut input, "ab");
        input.insert_str("cdefgh");
        assert_eq!(input.text(), "abcdef");
    }

    #[test]
    fn test_sync_adopts_session_text() {
        let mut input = InputBox::new(300);
        type_str(&mut input, "draft");
        input.take_changed();

        input.sync("");
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
        // Syncing is not an edit
        assert!(!input.take_changed());
    }

    #[test]
    fn test_wrap_places_cursor() {
        let (lines, cursor) = wrap_with_cursor("abcdef", 6, 4);
        assert_eq!(lines, vec!["abcd", "ef"]);
        assert_eq!(cursor, (2, 1));

        let (lines, cursor) = wrap_with_cursor("ab\ncd", 3, 10);
        assert_eq!(lines, vec!["ab", "cd"]);
        assert_eq!(cursor, (0, 1));
    }

    #[test]
    fn test_wrap_full_line_moves_cursor_down() {
        let (_, cursor) = wrap_with_cursor("abcd", 4, 4);
        assert_eq!(cursor, (0, 1));
    }

    #[test]
    fn test_wrap_wide_chars() {
        // Each CJK char is two columns wide
        let (lines, _) = wrap_with_cursor("日本語", 0, 4);
        assert_eq!(lines, vec!["日本", "語"]);
    }
}
