//! Declarative builder for TUI shortcuts

use super::Shortcut;

/// Builder for creating shortcut lists with common patterns
#[derive(Default)]
pub struct ShortcutsBuilder {
    shortcuts: Vec<Shortcut>,
}

impl ShortcutsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add j/k, g/G for row navigation
    pub fn with_navigation(mut self) -> Self {
        self.shortcuts.push(Shortcut::new("j/k", "Up/Down"));
        self.shortcuts.push(Shortcut::new("g/G", "Top/Bottom"));
        self
    }

    /// Add n/p for pages, z for page size
    pub fn with_paging(mut self) -> Self {
        self.shortcuts.push(Shortcut::new("n/p", "Next/Prev Page"));
        self.shortcuts.push(Shortcut::new("z", "Page Size"));
        self
    }

    /// Add / for search
    pub fn with_search(mut self) -> Self {
        self.shortcuts.push(Shortcut::new("/", "Search"));
        self
    }

    /// Add q for quit
    pub fn with_quit(mut self) -> Self {
        self.shortcuts.push(Shortcut::new("q", "Quit"));
        self
    }

    /// Add a single custom shortcut
    pub fn add(mut self, key: &str, description: &str) -> Self {
        self.shortcuts.push(Shortcut::new(key, description));
        self
    }

    /// Build the shortcuts vector
    pub fn build(self) -> Vec<Shortcut> {
        self.shortcuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_and_paging_shortcuts() {
        let shortcuts = ShortcutsBuilder::new()
            .with_navigation()
            .with_paging()
            .build();

        assert_eq!(shortcuts.len(), 4);
        assert!(shortcuts.iter().any(|s| s.key == "j/k"));
        assert!(shortcuts.iter().any(|s| s.key == "n/p"));
        assert!(shortcuts.iter().any(|s| s.key == "z"));
    }

    #[test]
    fn test_custom_shortcuts_keep_order() {
        let shortcuts = ShortcutsBuilder::new()
            .with_search()
            .add("s", "Sort")
            .with_quit()
            .build();

        let keys: Vec<&str> = shortcuts.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["/", "s", "q"]);
    }

    #[test]
    fn test_empty_shortcuts() {
        assert!(ShortcutsBuilder::new().build().is_empty());
    }
}
