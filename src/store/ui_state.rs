use std::collections::HashSet;

/// Presentation flags for rows, keyed by row id.
///
/// Kept apart from row content so that toggling a flag never touches a row.
/// Ids are unique per process, so one set serves every category.
#[derive(Debug, Default, Clone)]
pub struct RowUiState {
    expanded: HashSet<String>,
    actions_open: HashSet<String>,
}

impl RowUiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        toggle(&mut self.expanded, id);
    }

    pub fn toggle_actions_open(&mut self, id: &str) {
        toggle(&mut self.actions_open, id);
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_actions_open(&self, id: &str) -> bool {
        self.actions_open.contains(id)
    }

    /// Forget every flag held for `id`.
    pub fn purge(&mut self, id: &str) {
        self.expanded.remove(id);
        self.actions_open.remove(id);
    }

    /// Close the actions menu of each given row.
    pub fn close_actions<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.actions_open.remove(id);
        }
    }

    #[cfg(test)]
    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    #[cfg(test)]
    pub fn actions_open_count(&self) -> usize {
        self.actions_open.len()
    }
}

fn toggle(set: &mut HashSet<String>, id: &str) {
    if !set.remove(id) {
        set.insert(id.to_string());
    }
}
