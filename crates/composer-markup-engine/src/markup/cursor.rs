/// Reads a tag left to right: the `<`, an optional `/`, the name, then
/// whatever attributes follow. Slices borrow from the tag text.
#[derive(Clone)]
pub struct Cursor<'a> {
    tag: &'a str,
    at: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tag: &'a str) -> Self {
        Self { tag, at: 0 }
    }

    /// Consumes `byte` if it is next.
    pub fn eat(&mut self, byte: u8) -> bool {
        let hit = self.tag.as_bytes().get(self.at) == Some(&byte);
        if hit {
            self.at += 1;
        }
        hit
    }

    /// Consumes the tag name (ASCII alphanumerics).
    pub fn name(&mut self) -> &'a str {
        let start = self.at;
        let len = self.tag.as_bytes()[start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        self.at += len;
        &self.tag[start..self.at]
    }

    /// The unconsumed remainder: attributes and the closing `>`.
    pub fn rest(&self) -> &'a str {
        self.tag.get(self.at..).unwrap_or("")
    }
}
