//! Inline style (CSSStyleDeclaration)
//!
//! Ordered `property: value` declarations backed by the `style` attribute.

/// Inline style declarations of one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    declarations: Vec<(String, String)>,
}

impl CssStyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value. Malformed declarations are skipped.
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for decl in declarations(css_text) {
            let Some((property, value)) = decl.split_once(':') else {
                continue;
            };
            style.set_property(property, value);
        }
        style
    }

    /// Get a declared value
    pub fn get_property_value(&self, property: &str) -> Option<&str> {
        let property = normalize_property(property);
        self.declarations.iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set a declaration; an empty value removes it
    pub fn set_property(&mut self, property: &str, value: &str) {
        let property = normalize_property(property);
        let value = value.trim();
        if property.is_empty() {
            return;
        }
        if value.is_empty() {
            self.remove_property(&property);
            return;
        }
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => self.declarations.push((property, value.to_string())),
        }
    }

    /// Remove a declaration, returning the old value
    pub fn remove_property(&mut self, property: &str) -> Option<String> {
        let property = normalize_property(property);
        let pos = self.declarations.iter().position(|(p, _)| *p == property)?;
        Some(self.declarations.remove(pos).1)
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate over (property, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Serialize back to attribute form
    pub fn css_text(&self) -> String {
        self.declarations.iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for CssStyleDeclaration {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Self::new();
        for (p, v) in iter {
            style.set_property(p.as_ref(), v.as_ref());
        }
        style
    }
}

/// Split on top-level `;`. Semicolons inside `(...)` or a quoted string
/// belong to the value (`url(data:image/png;base64,..)`, `content: "a;b"`).
fn declarations(css_text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in css_text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&css_text[start..i]);
                start = i + 1;
            }
            (None, _) => {}
        }
    }
    out.push(&css_text[start..]);
    out
}

/// Property names are ASCII case-insensitive, custom properties are not.
/// camelCase names (`backgroundColor`) map to their hyphenated form.
fn normalize_property(property: &str) -> String {
    let property = property.trim();
    if property.starts_with("--") {
        return property.to_string();
    }
    if property.contains('-') || !property.starts_with(|c: char| c.is_ascii_lowercase()) {
        return property.to_ascii_lowercase();
    }
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let style = CssStyleDeclaration::parse("color: red;  background : blue ; junk; ");
        assert_eq!(style.len(), 2);
        assert_eq!(style.get_property_value("color"), Some("red"));
        assert_eq!(style.css_text(), "color: red; background: blue;");
    }

    #[test]
    fn test_set_merges_and_empty_removes() {
        let mut style = CssStyleDeclaration::parse("color: red");
        style.set_property("backgroundColor", "blue");
        style.set_property("color", "green");
        assert_eq!(style.css_text(), "color: green; background-color: blue;");

        style.set_property("color", "");
        assert_eq!(style.get_property_value("color"), None);
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_semicolons_inside_values_kept() {
        let style = CssStyleDeclaration::parse(
            "background-image: url(data:image/png;base64,AAA=); content: \"a;b\"; font-family: 'X;Y', serif",
        );
        assert_eq!(style.len(), 3);
        assert_eq!(
            style.get_property_value("background-image"),
            Some("url(data:image/png;base64,AAA=)")
        );
        assert_eq!(style.get_property_value("content"), Some("\"a;b\""));
        assert_eq!(style.get_property_value("font-family"), Some("'X;Y', serif"));
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let style = CssStyleDeclaration::parse(r#"content: "a\";b"; color: red"#);
        assert_eq!(style.get_property_value("content"), Some(r#""a\";b""#));
        assert_eq!(style.get_property_value("color"), Some("red"));
    }

    #[test]
    fn test_custom_property_case_kept() {
        let mut style = CssStyleDeclaration::new();
        style.set_property("--Accent", "#f00");
        assert_eq!(style.get_property_value("--Accent"), Some("#f00"));
        assert_eq!(style.get_property_value("--accent"), None);
    }
}
