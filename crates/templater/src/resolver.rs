//! Attribute Resolution
//!
//! Turns one [`AttributeChange`] into a [`Directive`] against the element's
//! current value, then applies the directive. Known element properties
//! (see [`ElementProperty`]) are read and written with property semantics,
//! everything else is a string attribute.

use templater_dom::{DomResult, DomTree, ElementProperty, NodeId, Value};

use crate::AttributeChange;

/// Resolved outcome of one attribute change
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Assign the value to the property or attribute
    Set(Value),
    /// Remove the attribute
    Remove,
}

/// Resolves and applies attribute changes
pub struct AttributeResolver;

impl AttributeResolver {
    /// Current value of `name`: the live property if `name` is a known
    /// property, else the attribute string
    pub fn current_value(tree: &DomTree, element: NodeId, name: &str) -> Option<Value> {
        match ElementProperty::lookup(name) {
            Some(property) => tree.get_property(element, property).ok(),
            None => tree.get_attribute(element, name).map(Value::from),
        }
    }

    /// Resolve a change. Transforms run once against the current value.
    pub fn resolve(tree: &DomTree, element: NodeId, name: &str, change: &AttributeChange) -> Directive {
        let value = match change {
            AttributeChange::Set(value) => Some(value.clone()),
            AttributeChange::Transform(f) => f(Self::current_value(tree, element, name)),
            AttributeChange::Remove => None,
        };
        match value {
            Some(value) => Directive::Set(value),
            None => Directive::Remove,
        }
    }

    /// Apply a directive to the element
    pub fn apply(tree: &mut DomTree, element: NodeId, name: &str, directive: Directive) -> DomResult<()> {
        let property = ElementProperty::lookup(name);
        tracing::trace!("{} {}: {:?}", element, name, directive);

        match directive {
            // Removing a property removes the attribute backing it
            Directive::Remove => {
                let attr = property.and_then(|p| p.attribute()).unwrap_or(name);
                tree.remove_attribute(element, attr).map(|_| ())
            }
            Directive::Set(value) => match property {
                Some(property) => tree.set_property(element, property, &value),
                None => tree.set_attribute(element, name, &value.to_string()),
            },
        }
    }

    /// Resolve and apply in one step
    pub fn resolve_and_apply(
        tree: &mut DomTree,
        element: NodeId,
        name: &str,
        change: &AttributeChange,
    ) -> DomResult<()> {
        let directive = Self::resolve(tree, element, name, change);
        Self::apply(tree, element, name, directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let id = tree.create_element(tag);
        tree.append_child(tree.root(), id).unwrap();
        (tree, id)
    }

    fn transform(f: impl Fn(Option<Value>) -> Option<Value> + 'static) -> AttributeChange {
        AttributeChange::Transform(Box::new(f))
    }

    #[test]
    fn test_literal_sets_attribute() {
        let (mut tree, a) = element("a");
        let change = AttributeChange::Set(Value::from(3));
        AttributeResolver::resolve_and_apply(&mut tree, a, "data-count", &change).unwrap();
        assert_eq!(tree.get_attribute(a, "data-count"), Some("3"));
    }

    #[test]
    fn test_transform_reads_current_attribute() {
        let (mut tree, a) = element("a");
        tree.set_attribute(a, "aria-label", "open").unwrap();

        let change = transform(|v| v.map(|v| Value::from(format!("{} menu", v))));
        AttributeResolver::resolve_and_apply(&mut tree, a, "aria-label", &change).unwrap();
        assert_eq!(tree.get_attribute(a, "aria-label"), Some("open menu"));
    }

    #[test]
    fn test_transform_sees_absent_attribute_as_none() {
        let (tree, a) = element("a");
        let change = transform(|v| Some(Value::from(v.is_none())));
        assert_eq!(
            AttributeResolver::resolve(&tree, a, "title-x", &change),
            Directive::Set(Value::Bool(true))
        );
    }

    #[test]
    fn test_transform_reads_typed_property() {
        let (mut tree, input) = element("input");
        tree.set_attribute(input, "disabled", "").unwrap();

        let change = transform(|v| v.map(|v| Value::from(!v.as_bool())));
        AttributeResolver::resolve_and_apply(&mut tree, input, "disabled", &change).unwrap();
        assert!(!tree.has_attribute(input, "disabled"));
    }

    #[test]
    fn test_transform_returning_none_removes() {
        let (mut tree, a) = element("a");
        tree.set_attribute(a, "target", "_blank").unwrap();
        AttributeResolver::resolve_and_apply(&mut tree, a, "target", &transform(|_| None)).unwrap();
        assert!(!tree.has_attribute(a, "target"));
    }

    #[test]
    fn test_property_semantics() {
        let (mut tree, p) = element("p");
        let text = AttributeChange::Set(Value::from("hello"));
        AttributeResolver::resolve_and_apply(&mut tree, p, "textContent", &text).unwrap();
        assert_eq!(tree.text_content(p), "hello");
        assert!(!tree.has_attribute(p, "textContent"));

        let class = AttributeChange::Set(Value::from("a b"));
        AttributeResolver::resolve_and_apply(&mut tree, p, "className", &class).unwrap();
        assert_eq!(tree.get_attribute(p, "class"), Some("a b"));

        AttributeResolver::resolve_and_apply(&mut tree, p, "className", &AttributeChange::Remove).unwrap();
        assert!(!tree.has_attribute(p, "class"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut tree, p) = element("p");
        AttributeResolver::resolve_and_apply(&mut tree, p, "title", &AttributeChange::Remove).unwrap();
        assert!(tree.attributes(p).is_empty());
    }
}
