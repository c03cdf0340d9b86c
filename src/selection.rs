use std::collections::HashMap;

/// Checkbox state for the rows of the events list.
///
/// A missing key reads as unselected. Entries are only created by toggling,
/// so a key can be present with `false` after a deselect or a successful
/// resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    rows: HashMap<String, bool>,
}

/// Tri-state shown by the list header checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl HeaderState {
    pub fn symbol(self) -> &'static str {
        match self {
            HeaderState::Unchecked => "[ ]",
            HeaderState::Indeterminate => "[-]",
            HeaderState::Checked => "[x]",
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.rows.get(id).copied().unwrap_or(false)
    }

    /// Header checkbox click.
    ///
    /// Every listed id is set to the opposite of "anything selected": with
    /// nothing selected all rows get selected, otherwise all rows get cleared.
    pub fn toggle_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let value = !self.is_any_selected();
        for id in ids {
            self.rows.insert(id.into(), value);
        }
    }

    /// Row checkbox click
    pub fn toggle_one(&mut self, id: &str) {
        let flag = self.rows.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
    }

    pub fn set(&mut self, id: &str, selected: bool) {
        self.rows.insert(id.to_string(), selected);
    }

    /// Unselect a single row (used once its resolve request succeeded)
    pub fn clear(&mut self, id: &str) {
        if let Some(flag) = self.rows.get_mut(id) {
            *flag = false;
        }
    }

    pub fn reset(&mut self) {
        self.rows.clear();
    }

    /// Drop entries for rows that are no longer listed
    pub fn retain<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: std::collections::HashSet<&str> = ids.into_iter().collect();
        self.rows.retain(|id, _| keep.contains(id.as_str()));
    }

    /// Selected ids in map iteration order (unspecified)
    pub fn selected(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Selected ids in the order of `ids` (usually the display order)
    pub fn selected_in<'a, I>(&self, ids: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().filter(|id| self.is_selected(id)).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.rows.values().filter(|selected| **selected).count()
    }

    pub fn is_any_selected(&self) -> bool {
        self.rows.values().any(|selected| *selected)
    }

    /// True when exactly `total` rows are selected and no entry is unselected.
    ///
    /// The second condition keeps stale `false` entries (rows toggled off or
    /// resolved) from counting as "all".
    pub fn is_all_selected(&self, total: usize) -> bool {
        self.selected_count() == total && self.rows.values().all(|selected| *selected)
    }

    pub fn header_state(&self, total: usize) -> HeaderState {
        if !self.is_any_selected() {
            HeaderState::Unchecked
        } else if self.is_all_selected(total) {
            HeaderState::Checked
        } else {
            HeaderState::Indeterminate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 5] = ["ev-1", "ev-2", "ev-3", "ev-4", "ev-5"];

    #[test]
    fn test_toggle_all_from_empty_selects_everything() {
        let mut state = SelectionState::new();
        state.toggle_all(["a", "b", "c"]);

        assert!(state.is_selected("a"));
        assert!(state.is_selected("b"));
        assert!(state.is_selected("c"));
        assert!(state.is_all_selected(3));
    }

    #[test]
    fn test_toggle_all_twice_deselects_everything() {
        let mut state = SelectionState::new();
        state.toggle_all(["a", "b", "c"]);
        state.toggle_all(["a", "b", "c"]);

        assert!(!state.is_any_selected());
        assert!(state.selected().is_empty());
    }

    #[test]
    fn test_toggle_all_with_partial_selection_clears() {
        let mut state = SelectionState::new();
        state.toggle_one("b");

        state.toggle_all(["a", "b", "c"]);

        assert_eq!(state.selected_count(), 0, "Any selected row means the header clears");
    }

    #[test]
    fn test_toggle_one_first_click_selects() {
        let mut state = SelectionState::new();
        state.toggle_one("a");
        assert!(state.is_selected("a"));
    }

    #[test]
    fn test_toggle_one_twice_restores() {
        let mut state = SelectionState::new();
        state.toggle_one("a");
        state.toggle_one("a");
        assert!(!state.is_selected("a"));

        state.set("b", true);
        state.toggle_one("b");
        state.toggle_one("b");
        assert!(state.is_selected("b"));
    }

    #[test]
    fn test_is_all_selected_ignores_false_entries() {
        let mut state = SelectionState::new();
        state.toggle_all(["a", "b"]);
        state.set("c", false);

        assert_eq!(state.selected_count(), 2);
        assert!(!state.is_all_selected(2), "A present but unselected entry blocks 'all'");
    }

    #[test]
    fn test_is_all_selected_count_mismatch() {
        let mut state = SelectionState::new();
        state.toggle_all(["a", "b"]);
        assert!(!state.is_all_selected(3));
    }

    #[test]
    fn test_five_events_two_selected() {
        let mut state = SelectionState::new();
        state.toggle_one(IDS[1]);
        state.toggle_one(IDS[3]);

        assert_eq!(state.selected().len(), 2);
        assert!(state.is_any_selected());
        assert!(!state.is_all_selected(IDS.len()));
        assert_eq!(state.header_state(IDS.len()), HeaderState::Indeterminate);
    }

    #[test]
    fn test_selected_in_follows_display_order() {
        let mut state = SelectionState::new();
        state.toggle_one("ev-5");
        state.toggle_one("ev-1");
        state.toggle_one("ev-3");

        assert_eq!(state.selected_in(IDS), vec!["ev-1", "ev-3", "ev-5"]);
    }

    #[test]
    fn test_clear_leaves_other_rows() {
        let mut state = SelectionState::new();
        state.toggle_all(["a", "b"]);
        state.clear("a");
        state.clear("missing");

        assert_eq!(state.selected(), vec!["b"]);
        assert!(!state.is_all_selected(1), "Cleared row is still a present entry");
    }

    #[test]
    fn test_retain_drops_unlisted_rows() {
        let mut state = SelectionState::new();
        state.toggle_all(["a", "b", "c"]);
        state.retain(["a", "c"]);

        assert_eq!(state.selected_in(["a", "b", "c"]), vec!["a", "c"]);
        assert!(state.is_all_selected(2));
    }

    #[test]
    fn test_header_state() {
        let mut state = SelectionState::new();
        assert_eq!(state.header_state(2), HeaderState::Unchecked);

        state.toggle_all(["a", "b"]);
        assert_eq!(state.header_state(2), HeaderState::Checked);

        state.toggle_one("a");
        assert_eq!(state.header_state(2), HeaderState::Indeterminate);
    }

    #[test]
    fn test_reset() {
        let mut state = SelectionState::new();
        state.toggle_all(["a", "b"]);
        state.reset();
        assert_eq!(state, SelectionState::default());
    }
}
