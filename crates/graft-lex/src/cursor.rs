//! Character cursor for traversing Graft source text.
//!
//! Tracks byte position and 1-based line/column so tokens can carry a
//! [`graft_util::Span`] for diagnostics. Handles UTF-8 by stepping
//! whole `char`s rather than bytes.

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current character, or `'\0'` at end of input.
    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    /// Character `offset` positions ahead of the cursor, `'\0'` past the end.
    pub fn char_at(&self, offset: usize) -> char {
        self.source[self.position..].chars().nth(offset).unwrap_or('\0')
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Advance past the current character, updating line/column.
    pub fn advance(&mut self) -> char {
        let c = self.current_char();
        if c == '\0' {
            return c;
        }
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }
}
