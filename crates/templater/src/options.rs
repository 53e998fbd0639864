//! Templater configuration

use serde::Deserialize;

/// Options recognized at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplaterOptions {
    /// Insert produced nodes into the source's original container
    pub append_to_parent: bool,

    /// Detach the source fragment from its tree on construction
    pub remove_from_dom: bool,
}

impl Default for TemplaterOptions {
    fn default() -> Self {
        Self {
            append_to_parent: true,
            remove_from_dom: true,
        }
    }
}

impl TemplaterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_to_parent(mut self, append: bool) -> Self {
        self.append_to_parent = append;
        self
    }

    pub fn remove_from_dom(mut self, remove: bool) -> Self {
        self.remove_from_dom = remove;
        self
    }
}
