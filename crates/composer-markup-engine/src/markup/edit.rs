/// One splice of the working text: `removed` bytes at `at` replaced by
/// `inserted`.
///
/// Every text rewrite goes through an `Edit` so the same step that changes the
/// text also remaps every marker and the caret. Nothing is patched up later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit<'a> {
    pub at: usize,
    pub removed: usize,
    pub inserted: &'a str,
}

impl<'a> Edit<'a> {
    pub fn remove(at: usize, len: usize) -> Self {
        Self {
            at,
            removed: len,
            inserted: "",
        }
    }

    pub fn insert(at: usize, text: &'a str) -> Self {
        Self {
            at,
            removed: 0,
            inserted: text,
        }
    }

    pub fn replace(at: usize, len: usize, text: &'a str) -> Self {
        Self {
            at,
            removed: len,
            inserted: text,
        }
    }

    fn end(&self) -> usize {
        self.at + self.removed
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.inserted.len());
        out.push_str(&text[..self.at]);
        out.push_str(self.inserted);
        out.push_str(&text[self.end()..]);
        out
    }

    /// Marker positions stick to the left: a marker at the edit point or
    /// inside the removed range ends up before any inserted text.
    pub fn map_marker(&self, position: usize) -> usize {
        if position <= self.at {
            position
        } else if position <= self.end() {
            self.at
        } else {
            position - self.removed + self.inserted.len()
        }
    }

    /// The caret sticks to the right: text inserted at or before it pushes it
    /// forward, text removed before it pulls it back by exactly that much.
    pub fn map_caret(&self, caret: usize) -> usize {
        if caret >= self.end() {
            caret - self.removed + self.inserted.len()
        } else if caret > self.at {
            self.at
        } else {
            caret
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_splices_text() {
        assert_eq!(Edit::remove(1, 2).apply("a**b"), "ab");
        assert_eq!(Edit::insert(1, "x").apply("ab"), "axb");
        assert_eq!(Edit::replace(1, 2, "-").apply("a**b"), "a-b");
    }

    #[test]
    fn removal_shifts_later_positions_by_removed_length() {
        let edit = Edit::remove(2, 2);
        assert_eq!(edit.map_marker(1), 1);
        assert_eq!(edit.map_marker(2), 2);
        assert_eq!(edit.map_marker(3), 2);
        assert_eq!(edit.map_marker(4), 2);
        assert_eq!(edit.map_marker(9), 7);

        assert_eq!(edit.map_caret(2), 2);
        assert_eq!(edit.map_caret(3), 2);
        assert_eq!(edit.map_caret(4), 2);
        assert_eq!(edit.map_caret(9), 7);
    }

    #[test]
    fn insertion_at_caret_pushes_caret_but_not_marker() {
        let edit = Edit::insert(3, "xy");
        assert_eq!(edit.map_caret(3), 5);
        assert_eq!(edit.map_caret(2), 2);
        assert_eq!(edit.map_marker(3), 3);
        assert_eq!(edit.map_marker(4), 6);
    }

    #[test]
    fn replacement_keeps_boundary_marker_before_inserted_text() {
        // "ab**" -> "ab|" where | is one byte
        let edit = Edit::replace(2, 2, "|");
        assert_eq!(edit.map_marker(4), 2);
        assert_eq!(edit.map_caret(4), 3);
        assert_eq!(edit.map_marker(6), 5);
    }
}
