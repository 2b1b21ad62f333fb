use crate::models::{SongId, SongRecord};

/// Text buffer behind the content editor. The cursor is a byte offset that
/// always sits on a char boundary.
#[derive(Default, Clone)]
pub(crate) struct EditorState {
    pub(crate) song_id: SongId,
    pub(crate) text: String,
    pub(crate) cursor: usize,
}

impl EditorState {
    /// Open the editor on a record with the cursor at the end of the text.
    pub(crate) fn from_song(song: &SongRecord) -> Self {
        Self {
            song_id: song.id,
            text: song.content.clone(),
            cursor: song.content.len(),
        }
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub(crate) fn newline(&mut self) {
        self.insert_char('\n');
    }

    /// Remove the char before the cursor. Returns false at the start.
    pub(crate) fn backspace(&mut self) -> bool {
        let Some(ch) = self.text[..self.cursor].chars().next_back() else {
            return false;
        };
        self.cursor -= ch.len_utf8();
        self.text.remove(self.cursor);
        true
    }

    /// Remove the char under the cursor. Returns false at the end.
    pub(crate) fn delete(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    pub(crate) fn move_left(&mut self) {
        if let Some(ch) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    pub(crate) fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub(crate) fn line_start(&mut self) {
        self.cursor = self.current_line_start();
    }

    pub(crate) fn line_end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map(|offset| self.cursor + offset)
            .unwrap_or(self.text.len());
    }

    pub(crate) fn move_up(&mut self) {
        let (_, col) = self.cursor_position();
        let start = self.current_line_start();
        if start == 0 {
            self.cursor = 0;
            return;
        }
        let prev_start = self.text[..start - 1].rfind('\n').map_or(0, |idx| idx + 1);
        self.cursor = Self::offset_for_column(&self.text, prev_start, col);
    }

    pub(crate) fn move_down(&mut self) {
        let (_, col) = self.cursor_position();
        match self.text[self.cursor..].find('\n') {
            Some(offset) => {
                let next_start = self.cursor + offset + 1;
                self.cursor = Self::offset_for_column(&self.text, next_start, col);
            }
            None => self.cursor = self.text.len(),
        }
    }

    /// Zero-based (line, column) of the cursor, counting columns in chars.
    pub(crate) fn cursor_position(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let line = before.matches('\n').count();
        let col = before[self.current_line_start()..].chars().count();
        (line, col)
    }

    fn current_line_start(&self) -> usize {
        self.text[..self.cursor].rfind('\n').map_or(0, |idx| idx + 1)
    }

    /// Byte offset of `col` chars into the line starting at `line_start`,
    /// stopping at the line end when the line is shorter.
    fn offset_for_column(text: &str, line_start: usize, col: usize) -> usize {
        let line = &text[line_start..];
        let line_len = line.find('\n').unwrap_or(line.len());
        line[..line_len]
            .char_indices()
            .nth(col)
            .map_or(line_start + line_len, |(offset, _)| line_start + offset)
    }
}

/// Pending "delete this song?" question.
#[derive(Clone)]
pub(crate) struct ConfirmSongDelete {
    pub(crate) id: SongId,
    pub(crate) name: String,
}

impl ConfirmSongDelete {
    pub(crate) fn from(song: &SongRecord) -> Self {
        Self {
            id: song.id,
            name: song.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> EditorState {
        EditorState::from_song(&SongRecord::new(SongId(1), "X", "", text))
    }

    #[test]
    fn typing_appends_at_the_end() {
        let mut editor = editor("abc");
        editor.insert_char('d');
        assert_eq!(editor.text, "abcd");
        assert_eq!(editor.cursor_position(), (0, 4));
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut editor = editor("canción");
        editor.move_left();
        editor.move_left();
        assert!(editor.backspace());
        assert_eq!(editor.text, "cancón");
        editor.insert_char('ç');
        assert_eq!(editor.text, "cancçón");
        assert!(editor.delete());
        assert_eq!(editor.text, "cancçn");
    }

    #[test]
    fn backspace_and_delete_stop_at_the_edges() {
        let mut editor = editor("ab");
        assert!(!editor.delete());
        editor.line_start();
        assert!(!editor.backspace());
        assert!(editor.delete());
        assert_eq!(editor.text, "b");
    }

    #[test]
    fn vertical_movement_keeps_the_column() {
        let mut editor = editor("first line\nab\nthird line");
        editor.line_end();
        assert_eq!(editor.cursor_position(), (2, 10));

        editor.move_up();
        assert_eq!(editor.cursor_position(), (1, 2));
        editor.move_up();
        assert_eq!(editor.cursor_position(), (0, 2));
        editor.move_up();
        assert_eq!(editor.cursor_position(), (0, 0));

        editor.move_down();
        editor.move_down();
        editor.move_down();
        assert_eq!(editor.cursor, editor.text.len());
    }

    #[test]
    fn newline_splits_the_line() {
        let mut editor = editor("ab");
        editor.move_left();
        editor.newline();
        assert_eq!(editor.text, "a\nb");
        assert_eq!(editor.cursor_position(), (1, 0));
    }
}
