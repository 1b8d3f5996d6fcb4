//! Selection and scroll state for a row list.
//!
//! Selection is anchored to a row id rather than a position, because new rows
//! arrive at the head of the list many times per second. Without the anchor
//! the highlighted row would slide away under the cursor.

/// Result of resolving the viewport against the current rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedView {
    /// Index of the selected row
    pub selected_index: usize,
    /// First visible row index (for rendering)
    pub scroll_position: usize,
}

#[derive(Debug, Clone)]
pub struct RowViewport {
    /// Id of the selected row, if any row was ever selected
    anchor_id: Option<String>,
    /// Position of the anchor at the last resolve, used when the anchor vanishes
    last_index: usize,
    scroll_position: usize,
    edge_padding: usize,
}

impl Default for RowViewport {
    fn default() -> Self {
        Self {
            anchor_id: None,
            last_index: 0,
            scroll_position: 0,
            edge_padding: 2,
        }
    }
}

impl RowViewport {
    /// Index of the selected row among `ids`.
    ///
    /// Falls back to the last known position (clamped) when the anchored row
    /// was deleted or evicted, and re-anchors there.
    pub fn selected_index(&mut self, ids: &[&str]) -> usize {
        if ids.is_empty() {
            self.last_index = 0;
            return 0;
        }

        let found = self
            .anchor_id
            .as_deref()
            .and_then(|anchor| ids.iter().position(|id| *id == anchor));

        let idx = match found {
            Some(idx) => idx,
            None => {
                let idx = self.last_index.min(ids.len() - 1);
                self.anchor_id = Some(ids[idx].to_string());
                idx
            }
        };
        self.last_index = idx;
        idx
    }

    /// Id of the selected row, resolving against `ids` first.
    pub fn selected_id<'a>(&mut self, ids: &[&'a str]) -> Option<&'a str> {
        if ids.is_empty() {
            return None;
        }
        let idx = self.selected_index(ids);
        Some(ids[idx])
    }

    /// Resolve selection and keep it inside the comfort zone of `height` rows.
    pub fn resolve(&mut self, ids: &[&str], height: usize) -> ResolvedView {
        let selected_index = self.selected_index(ids);

        if height > 0 {
            let padding = self.edge_padding.min(height / 4);
            if selected_index < self.scroll_position + padding {
                self.scroll_position = selected_index.saturating_sub(padding);
            } else if selected_index + padding >= self.scroll_position + height {
                self.scroll_position = (selected_index + padding + 1).saturating_sub(height);
            }
            self.scroll_position = self.scroll_position.min(ids.len().saturating_sub(height));
        }

        ResolvedView {
            selected_index,
            scroll_position: self.scroll_position,
        }
    }

    /// Move selection by `delta` rows (positive = down).
    pub fn move_selection(&mut self, delta: i32, ids: &[&str]) {
        if ids.is_empty() {
            return;
        }
        let current = self.selected_index(ids);
        let new_idx = if delta >= 0 {
            (current + delta as usize).min(ids.len() - 1)
        } else {
            current.saturating_sub(delta.unsigned_abs() as usize)
        };
        self.select_index(new_idx, ids);
    }

    pub fn select_index(&mut self, idx: usize, ids: &[&str]) {
        if let Some(id) = ids.get(idx) {
            self.anchor_id = Some(id.to_string());
            self.last_index = idx;
        }
    }

    pub fn select_last(&mut self, ids: &[&str]) {
        if !ids.is_empty() {
            self.select_index(ids.len() - 1, ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_follows_anchor_when_rows_prepended() {
        let mut vp = RowViewport::default();
        vp.select_index(0, &["b", "a"]);
        assert_eq!(vp.selected_index(&["d", "c", "b", "a"]), 2);
    }

    #[test]
    fn test_missing_anchor_falls_back_to_position() {
        let mut vp = RowViewport::default();
        vp.select_index(2, &["a", "b", "c"]);
        // "c" deleted
        assert_eq!(vp.selected_index(&["a", "b"]), 1);
        assert_eq!(vp.selected_id(&["a", "b"]), Some("b"));
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut vp = RowViewport::default();
        let ids = ["a", "b", "c"];
        vp.move_selection(-1, &ids);
        assert_eq!(vp.selected_index(&ids), 0);
        vp.move_selection(10, &ids);
        assert_eq!(vp.selected_index(&ids), 2);
    }

    #[test]
    fn test_resolve_scrolls_to_keep_selection_visible() {
        let mut vp = RowViewport::default();
        let ids: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        vp.select_index(30, &refs);
        let view = vp.resolve(&refs, 10);
        assert_eq!(view.selected_index, 30);
        assert!(view.scroll_position <= 30 && view.scroll_position + 10 > 30);
    }

    #[test]
    fn test_empty_rows() {
        let mut vp = RowViewport::default();
        assert_eq!(vp.resolve(&[], 10), ResolvedView { selected_index: 0, scroll_position: 0 });
        assert_eq!(vp.selected_id(&[]), None);
    }
}
