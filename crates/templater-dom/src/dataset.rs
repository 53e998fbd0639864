//! Dataset (DOMStringMap)
//!
//! `data-*` attributes viewed as camelCase keys: `data-user-id` is
//! `userId`. Entries keep attribute order so merges round-trip predictably.

/// camelCase view over an element's `data-*` attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMStringMap {
    entries: Vec<(String, String)>,
}

impl DOMStringMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the `data-*` pairs out of an element's attributes
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        attrs.into_iter()
            .filter_map(|(name, value)| Some((data_key(name.strip_prefix("data-")?), value)))
            .collect()
    }

    fn slot(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.slot(key).map(|i| self.entries[i].1.as_str())
    }

    /// Insert or overwrite in place
    pub fn set(&mut self, key: &str, value: &str) {
        match self.slot(key) {
            Some(i) => self.entries[i].1 = value.to_owned(),
            None => self.entries.push((key.to_owned(), value.to_owned())),
        }
    }

    /// Returns whether the key was present
    pub fn delete(&mut self, key: &str) -> bool {
        match self.slot(key) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.slot(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `userId` -> `data-user-id`
    pub fn to_attribute_name(key: &str) -> String {
        let mut name = String::from("data-");
        for c in key.chars() {
            if c.is_ascii_uppercase() {
                name.push('-');
            }
            name.push(c.to_ascii_lowercase());
        }
        name
    }

    /// Attribute pairs for writing back
    pub fn to_attributes(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(k, v)| (Self::to_attribute_name(k), v.to_owned()))
            .collect()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for DOMStringMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k.as_ref(), v.as_ref());
        }
        map
    }
}

/// `user-id` -> `userId`
fn data_key(suffix: &str) -> String {
    let mut parts = suffix.split('-');
    let mut key = parts.next().unwrap_or_default().to_owned();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            key.push(first.to_ascii_uppercase());
            key.extend(chars);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_data_attributes_collected() {
        let map = DOMStringMap::from_attributes([
            ("id", "row-1"),
            ("data-row-index", "4"),
            ("data-selected", ""),
        ]);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["rowIndex", "selected"]);
        assert_eq!(map.get("rowIndex"), Some("4"));
        assert!(!map.has("id"));
    }

    #[test]
    fn test_key_conversion() {
        assert_eq!(data_key("row-index"), "rowIndex");
        assert_eq!(data_key("plain"), "plain");
        assert_eq!(DOMStringMap::to_attribute_name("rowIndex"), "data-row-index");
        assert_eq!(DOMStringMap::to_attribute_name("x"), "data-x");
    }

    #[test]
    fn test_overwrite_keeps_order() {
        let mut map: DOMStringMap = [("a", "1"), ("b", "2")].into_iter().collect();
        map.set("a", "3");
        assert_eq!(
            map.to_attributes(),
            [("data-a".to_string(), "3".to_string()), ("data-b".to_string(), "2".to_string())]
        );

        assert!(map.delete("a"));
        assert!(!map.delete("a"));
        assert_eq!(map.len(), 1);
    }
}
