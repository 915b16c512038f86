/// Position-based view over an ordered token sequence.
///
/// Managers consume tokens with [`ArgCursor::advance`] and may hand the most
/// recent ones back with [`ArgCursor::rewind`]. The parser relies on the
/// position to tell whether a manager consumed anything.
#[derive(Debug, Clone, Default)]
pub struct ArgCursor {
    tokens: Vec<String>,
    pos: usize,
}

impl ArgCursor {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    pub fn advance(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Steps back `n` tokens, stopping at the start.
    pub fn rewind(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    /// True when the token just returned by `advance` was the final one.
    pub fn at_end(&self) -> bool {
        !self.has_next()
    }

    pub fn remaining(&self) -> &[String] {
        &self.tokens[self.pos..]
    }
}
