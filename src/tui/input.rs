//! Input field handling for the terminal user interface.

/// A single-line text input. The cursor counts characters, not bytes, so
/// multi-byte titles edit correctly.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    /// Text before the cursor, for placing the terminal cursor.
    pub fn before_cursor(&self) -> &str {
        &self.value[..self.byte_index(self.cursor)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text_by_character() {
        let mut input = InputField::with_value("운동");
        input.handle_char('!');
        assert_eq!(input.value, "운동!");

        input.move_cursor_left();
        input.move_cursor_left();
        input.handle_backspace();
        assert_eq!(input.value, "동!");
        assert_eq!(input.cursor, 0);

        input.handle_delete();
        assert_eq!(input.value, "!");
        input.move_end();
        input.handle_char('?');
        assert_eq!(input.value, "!?");
        assert_eq!(input.before_cursor(), "!?");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = InputField::new();
        input.move_cursor_left();
        input.handle_backspace();
        input.handle_delete();
        input.move_cursor_right();
        assert_eq!(input.cursor, 0);
        assert!(input.value.is_empty());
    }
}
