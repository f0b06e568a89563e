//! Linear undo/redo over serialized markup snapshots.

/// One pass's output as the caller wrote it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub markup: String,
    pub caret: usize,
}

impl HistoryEntry {
    pub fn new(markup: impl Into<String>, caret: usize) -> Self {
        Self {
            markup: markup.into(),
            caret,
        }
    }
}

/// A bounded linear history. Recording after an undo discards the redo tail;
/// past `limit` entries the oldest is evicted.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    /// Index of the current entry; meaningless while `entries` is empty.
    current: usize,
    limit: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

impl EditHistory {
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            current: 0,
            limit: limit.max(1),
        }
    }

    /// Records a new snapshot. Returns `false` when the markup matches the
    /// current entry, in which case only its caret is updated.
    pub fn record(&mut self, entry: HistoryEntry) -> bool {
        if let Some(current) = self.entries.get_mut(self.current)
            && current.markup == entry.markup
        {
            current.caret = entry.caret;
            return false;
        }

        if !self.entries.is_empty() {
            self.entries.truncate(self.current + 1);
        }
        self.entries.push(entry);
        if self.entries.len() > self.limit {
            self.entries.remove(0);
        }
        self.current = self.entries.len() - 1;
        true
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.current)
    }

    /// Steps back one entry and returns it.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        self.current()
    }

    /// Steps forward one entry and returns it.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
