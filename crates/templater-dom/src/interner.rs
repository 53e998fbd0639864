//! Name interning
//!
//! Tag names and attribute names repeat across every clone of a template,
//! so they are stored once per tree and referenced by ID. Clones made within
//! the same tree share the same IDs.

use std::collections::HashMap;

/// Handle to an interned tag or attribute name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Always slot 0
    pub const EMPTY: Self = Self(0);
}

/// Names seeded into every table so the first clone does not grow it
const SEEDED: &[&str] = &[
    "", "html", "head", "body", "template", "slot", "div", "span", "p", "a", "img",
    "ul", "ol", "li", "dl", "dt", "dd", "table", "tbody", "tr", "td", "th",
    "form", "label", "input", "button", "select", "option", "textarea",
    "h1", "h2", "h3", "section", "article", "header", "footer",
    "id", "class", "style", "href", "src", "alt", "title", "name", "value",
    "type", "for", "checked", "disabled", "hidden", "selected", "role",
];

/// Per-tree name table
#[derive(Debug, Clone)]
pub struct StringInterner {
    names: Vec<Box<str>>,
    ids: HashMap<Box<str>, u32>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::with_capacity(SEEDED.len() * 2),
            ids: HashMap::with_capacity(SEEDED.len() * 2),
        };
        for name in SEEDED {
            table.intern(name);
        }
        table
    }

    /// Handle for `name`, adding it on first use
    pub fn intern(&mut self, name: &str) -> InternedString {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.into());
        self.ids.insert(name.into(), id);
        InternedString(id)
    }

    /// Handle for an already-interned name; never grows the table
    pub fn lookup(&self, name: &str) -> Option<InternedString> {
        self.ids.get(name).copied().map(InternedString)
    }

    /// Text behind a handle; unknown handles read as ""
    #[inline]
    pub fn get(&self, id: InternedString) -> &str {
        self.names.get(id.0 as usize).map_or("", |name| &**name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
