use std::collections::HashSet;

/// URLs already emitted (or already recorded) during this run
///
/// Once a URL is in the window it is never emitted again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupWindow {
    seen: HashSet<String>,
}

impl DedupWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the window from persisted rows
    ///
    /// Every cell that starts with `http` once trimmed counts as a recorded
    /// URL, wherever it sits in the row.
    pub fn seeded_from_rows(rows: &[Vec<String>]) -> Self {
        let seen = rows
            .iter()
            .flatten()
            .map(|cell| cell.trim())
            .filter(|cell| cell.starts_with("http"))
            .map(str::to_string)
            .collect();
        Self { seen }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Marks `url` as seen, returning `false` if it already was
    pub fn insert(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
