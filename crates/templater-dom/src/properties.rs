//! Element Properties
//!
//! Static table of the element properties that have typed, non-attribute
//! semantics. Names not listed here are plain attributes.

use std::fmt;

/// Typed value read from or written to an element
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Number(f64),
}

impl Value {
    /// Truthiness used when a boolean property receives a non-boolean
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// Borrow the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Attribute string coercion: `1.0` prints as `1`, booleans as words
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(n as f64)
            }
        })*
    };
}

value_from_int!(i32, i64, u32, u64, usize);

/// How a property maps onto the element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Concatenated descendant text; assignment replaces all children
    Text,
    /// Form value: text content for `<textarea>`, the `value` attribute otherwise
    FormValue,
    /// String property reflecting the named attribute
    Reflected(&'static str),
    /// Boolean property reflecting presence of the named attribute
    Boolean(&'static str),
}

/// Known element property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementProperty {
    pub name: &'static str,
    pub kind: PropertyKind,
}

const PROPERTIES: &[ElementProperty] = &[
    ElementProperty { name: "textContent", kind: PropertyKind::Text },
    ElementProperty { name: "innerText", kind: PropertyKind::Text },
    ElementProperty { name: "value", kind: PropertyKind::FormValue },
    ElementProperty { name: "id", kind: PropertyKind::Reflected("id") },
    ElementProperty { name: "className", kind: PropertyKind::Reflected("class") },
    ElementProperty { name: "title", kind: PropertyKind::Reflected("title") },
    ElementProperty { name: "href", kind: PropertyKind::Reflected("href") },
    ElementProperty { name: "src", kind: PropertyKind::Reflected("src") },
    ElementProperty { name: "alt", kind: PropertyKind::Reflected("alt") },
    ElementProperty { name: "name", kind: PropertyKind::Reflected("name") },
    ElementProperty { name: "type", kind: PropertyKind::Reflected("type") },
    ElementProperty { name: "placeholder", kind: PropertyKind::Reflected("placeholder") },
    ElementProperty { name: "htmlFor", kind: PropertyKind::Reflected("for") },
    ElementProperty { name: "lang", kind: PropertyKind::Reflected("lang") },
    ElementProperty { name: "dir", kind: PropertyKind::Reflected("dir") },
    ElementProperty { name: "tabIndex", kind: PropertyKind::Reflected("tabindex") },
    ElementProperty { name: "checked", kind: PropertyKind::Boolean("checked") },
    ElementProperty { name: "disabled", kind: PropertyKind::Boolean("disabled") },
    ElementProperty { name: "hidden", kind: PropertyKind::Boolean("hidden") },
    ElementProperty { name: "selected", kind: PropertyKind::Boolean("selected") },
    ElementProperty { name: "required", kind: PropertyKind::Boolean("required") },
    ElementProperty { name: "readOnly", kind: PropertyKind::Boolean("readonly") },
    ElementProperty { name: "multiple", kind: PropertyKind::Boolean("multiple") },
    ElementProperty { name: "autofocus", kind: PropertyKind::Boolean("autofocus") },
];

impl ElementProperty {
    /// Look up a property by its (case-sensitive) name
    pub fn lookup(name: &str) -> Option<&'static ElementProperty> {
        PROPERTIES.iter().find(|p| p.name == name)
    }

    /// Attribute backing this property, if any
    pub fn attribute(&self) -> Option<&'static str> {
        match self.kind {
            PropertyKind::Reflected(attr) | PropertyKind::Boolean(attr) => Some(attr),
            PropertyKind::FormValue => Some("value"),
            PropertyKind::Text => None,
        }
    }
}
