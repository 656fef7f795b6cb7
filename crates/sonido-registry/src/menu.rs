//! Tree menu for UI categorization: groups registered node types under
//! slash-separated paths such as `Source/Sine` or `Filter/Lowpass`.

/// One leaf in the registry's category tree.
#[derive(Debug, Clone)]
pub struct MenuEntry {
    /// Slash-separated category path, e.g. `"Filter/Lowpass"`.
    pub path: &'static str,
    /// The type this entry instantiates.
    pub type_id: crate::TypeId,
    /// Display name shown next to the leaf.
    pub display_name: &'static str,
}

/// Read-only category tree built once at [`crate::Schema`] construction.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

impl Menu {
    pub(crate) fn new(entries: Vec<MenuEntry>) -> Self {
        Self { entries }
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Entries whose path starts with `category/` (or equals `category`).
    pub fn category(&self, category: &str) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter().filter(move |e| {
            e.path == category || e.path.strip_prefix(category).is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Look up the entry registered for `type_id`, if any.
    pub fn find(&self, type_id: crate::TypeId) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.type_id == type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeId;

    #[test]
    fn category_matches_prefix_segments_only() {
        let menu = Menu::new(vec![
            MenuEntry { path: "Filter/Lowpass", type_id: TypeId(1), display_name: "Lowpass" },
            MenuEntry { path: "FilterBank/Thing", type_id: TypeId(2), display_name: "Thing" },
        ]);
        let found: Vec<_> = menu.category("Filter").map(|e| e.path).collect();
        assert_eq!(found, vec!["Filter/Lowpass"]);
    }
}
