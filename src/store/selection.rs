//! Selection of record ids for bulk operations

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` if unselected, otherwise unselect it
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Add every id in `ids` (the currently visible rows)
    pub fn select_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in sorted order
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        selection.toggle("a");
        assert!(selection.is_selected("a"));
        selection.toggle("a");
        assert!(!selection.is_selected("a"));
    }

    #[test]
    fn test_select_all_is_idempotent() {
        let mut selection = SelectionSet::new();
        selection.select_all(["a", "b"]);
        selection.select_all(["a", "b"]);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_select_all_keeps_earlier_picks() {
        let mut selection = SelectionSet::new();
        selection.toggle("z");
        selection.select_all(vec!["a".to_string()]);
        assert_eq!(selection.ids(), vec!["a", "z"]);
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionSet::new();
        selection.select_all(["a", "b", "c"]);
        selection.toggle("b");
        assert_eq!(selection.ids(), vec!["a", "c"]);
        selection.clear();
        assert!(selection.is_empty());
    }
}
