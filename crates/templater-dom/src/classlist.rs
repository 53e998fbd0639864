//! Class token set (classList)
//!
//! Snapshot of an element's `class` attribute as an ordered set. Mutations
//! happen on the snapshot; [`crate::DomTree::set_class_list`] writes it back.

/// Ordered, duplicate-free class tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a `class` attribute value; repeated tokens keep their first position
    pub fn from_string(s: &str) -> Self {
        s.split_whitespace().collect()
    }

    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.position(token).is_some()
    }

    fn position(&self, token: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == token)
    }

    /// Append tokens not already present. Empty tokens are ignored.
    pub fn add(&mut self, tokens: &[&str]) {
        for &token in tokens {
            if !token.is_empty() && !self.contains(token) {
                self.tokens.push(token.to_owned());
            }
        }
    }

    pub fn remove(&mut self, tokens: &[&str]) {
        self.tokens.retain(|t| !tokens.iter().any(|r| r == t));
    }

    /// Flip `token`, or force it on/off. Returns whether it is present afterwards.
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let present = force.unwrap_or(!self.contains(token));
        if present {
            self.add(&[token]);
        } else {
            self.remove(&[token]);
        }
        present
    }

    /// Swap `old_token` for `new_token` in place. Returns false if `old_token` is absent.
    pub fn replace(&mut self, old_token: &str, new_token: &str) -> bool {
        let Some(pos) = self.position(old_token) else {
            return false;
        };
        match self.position(new_token) {
            Some(_) => {
                self.tokens.remove(pos);
            }
            None => self.tokens[pos] = new_token.to_owned(),
        }
        true
    }

    /// Attribute form
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for DOMTokenList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::new();
        for token in iter {
            list.add(&[token.as_ref()]);
        }
        list
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collapses_duplicates() {
        let classes = DOMTokenList::from_string("  row  selected\trow even ");
        assert_eq!(classes.iter().collect::<Vec<_>>(), ["row", "selected", "even"]);
        assert_eq!(classes.to_string(), "row selected even");
    }

    #[test]
    fn test_add_is_append_only() {
        let mut classes = DOMTokenList::from_string("row");
        classes.add(&["row", "", "odd"]);
        assert_eq!(classes.value(), "row odd");

        classes.remove(&["row", "missing"]);
        assert_eq!(classes.value(), "odd");
    }

    #[test]
    fn test_toggle_forced_and_flipped() {
        let mut classes = DOMTokenList::new();
        assert!(classes.toggle("open", None));
        assert!(!classes.toggle("open", None));
        assert!(classes.is_empty());

        assert!(classes.toggle("open", Some(true)));
        assert!(classes.toggle("open", Some(true)));
        assert_eq!(classes.length(), 1);
        assert!(!classes.toggle("closed", Some(false)));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut classes = DOMTokenList::from_string("a b c");
        assert!(classes.replace("b", "x"));
        assert_eq!(classes.value(), "a x c");

        // Replacing with a token already present drops the old one
        assert!(classes.replace("a", "c"));
        assert_eq!(classes.value(), "x c");
        assert!(!classes.replace("zzz", "y"));
        assert_eq!(classes.item(1), Some("c"));
    }
}
