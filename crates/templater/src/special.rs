//! Special attribute handlers
//!
//! `style`, `dataset`, `classList` and `eventListeners` entries, plus the
//! whole-element mapper forms.

use templater_dom::{DomResult, DomTree, EventHandler, NodeId};

use crate::{AttributeMapper, ClassListChange, ClassListValue, RecordChange};

/// Merge style declarations onto the element's inline style
pub(crate) fn apply_style(
    tree: &mut DomTree,
    element: NodeId,
    change: &RecordChange<templater_dom::CssStyleDeclaration>,
) -> DomResult<()> {
    let mut style = tree.style(element)?;
    match change {
        RecordChange::Merge(entries) => {
            for (property, value) in entries {
                match value {
                    Some(value) => style.set_property(property, value),
                    None => {
                        style.remove_property(property);
                    }
                }
            }
        }
        RecordChange::Transform(f) => {
            let updated = f(style.clone());
            for (property, value) in updated.iter() {
                style.set_property(property, value);
            }
        }
    }
    tree.set_style(element, &style)
}

/// Merge entries onto the element's dataset
pub(crate) fn apply_dataset(
    tree: &mut DomTree,
    element: NodeId,
    change: &RecordChange<templater_dom::DOMStringMap>,
) -> DomResult<()> {
    match change {
        RecordChange::Merge(entries) => {
            for (key, value) in entries {
                tree.set_data(element, key, value.as_deref())?;
            }
        }
        RecordChange::Transform(f) => {
            let updated = f(tree.dataset(element)?);
            for (key, value) in updated.iter() {
                tree.set_data(element, key, Some(value))?;
            }
        }
    }
    Ok(())
}

/// Apply a class list change to the live class set
pub(crate) fn apply_class_list(tree: &mut DomTree, element: NodeId, change: &ClassListChange) -> DomResult<()> {
    let had_attribute = tree.has_attribute(element, "class");
    let mut classes = tree.class_list(element)?;

    let value = match change {
        ClassListChange::Value(value) => value.clone(),
        ClassListChange::Transform(f) => f(classes.clone()),
    };

    match value {
        ClassListValue::Add(names) => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            classes.add(&names);
        }
        ClassListValue::Toggle(entries) => {
            for (name, on) in &entries {
                classes.toggle(name, Some(*on));
            }
        }
        ClassListValue::Set(replacement) => classes = replacement,
    }

    // An untouched element without a class attribute does not gain one
    if !had_attribute && classes.is_empty() {
        return Ok(());
    }
    tree.set_class_list(element, &classes)
}

/// Attach handlers; earlier listeners for the same event are kept
pub(crate) fn apply_event_listeners(
    tree: &mut DomTree,
    element: NodeId,
    listeners: &[(String, EventHandler)],
) -> DomResult<()> {
    for (event_type, handler) in listeners {
        tree.add_event_listener(element, event_type, handler.clone())?;
    }
    Ok(())
}

/// Apply a whole-element mapper form. Returns `false` if `mapper` is a
/// per-attribute mapping, which the caller handles.
pub(crate) fn apply_whole(tree: &mut DomTree, element: NodeId, mapper: &AttributeMapper) -> DomResult<bool> {
    match mapper {
        AttributeMapper::Attributes(_) => return Ok(false),
        AttributeMapper::Text(text) => tree.set_text_content(element, text)?,
        // Freed when the mapping pass sweeps
        AttributeMapper::Remove => {
            tree.discard(element);
        }
        AttributeMapper::Callback(f) => f(tree, element),
    }
    Ok(true)
}
