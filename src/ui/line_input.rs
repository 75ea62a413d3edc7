use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text field used for the name and email prompts.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    max_chars: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            max_chars: 64,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_at(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = 0;
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = self.len();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.len() < self.max_chars {
                    let byte_offset = self.char_to_byte(self.cursor);
                    self.text.insert(byte_offset, ch);
                    self.cursor += 1;
                }
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_at(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut LineInput, s: &str) {
        for ch in s.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = LineInput::new("");
        type_str(&mut input, "Ada");
        assert_eq!(input.value(), "Ada");
        input.handle(key(KeyCode::Home));
        type_str(&mut input, "x");
        assert_eq!(input.value(), "xAda");
    }

    #[test]
    fn backspace_and_delete_multibyte() {
        let mut input = LineInput::new("Zoë");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "Zo");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "o");
    }

    #[test]
    fn cursor_left_at_zero_stays() {
        let mut input = LineInput::new("a");
        input.handle(key(KeyCode::Home));
        assert_eq!(input.cursor, 0);
        input.handle(key(KeyCode::Left));
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn cursor_right_at_end_stays() {
        let mut input = LineInput::new("a");
        assert_eq!(input.cursor, 1);
        input.handle(key(KeyCode::Right));
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn ctrl_a_ctrl_e_ctrl_u() {
        let mut input = LineInput::new("test");
        input.handle(ctrl('a'));
        assert_eq!(input.cursor, 0);
        input.handle(ctrl('e'));
        assert_eq!(input.cursor, 4);
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn enter_and_esc_report_result() {
        let mut input = LineInput::new("x");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.handle(key(KeyCode::Char('y'))), InputResult::Continue);
    }

    #[test]
    fn max_chars_is_enforced() {
        let mut input = LineInput::new("").with_max_chars(3);
        type_str(&mut input, "abcdef");
        assert_eq!(input.value(), "abc");
    }

    #[test]
    fn render_parts_splits_at_cursor() {
        let mut input = LineInput::new("abc");
        assert_eq!(input.render_parts(), ("abc", None, ""));
        input.handle(key(KeyCode::Left));
        assert_eq!(input.render_parts(), ("ab", Some('c'), ""));
    }
}
