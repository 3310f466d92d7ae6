//! Forward-only position tracking over a document

/// Byte offset plus the zero-based row and column used in diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub pos: usize,
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift_forward(&mut self, ch: char) {
        self.pos += ch.len_utf8();
        self.col += 1;
        if ch == '\n' {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn shift_forward_many(&mut self, text: &str) {
        for ch in text.chars() {
            self.shift_forward(ch);
        }
    }

    /// Advance to the end of `document`, the text this cursor walks
    pub fn shift_to_end(&mut self, document: &str) {
        if let Some(rest) = document.get(self.pos..) {
            self.shift_forward_many(rest);
        }
    }
}
