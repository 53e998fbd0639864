//! Mapping Engine
//!
//! Applies an [`ElementMapper`] to one clone: each selector entry, in
//! insertion order, is queried against the clone and its mapper applied to
//! every match. Later entries see the effects of earlier ones, so
//! overlapping selectors resolve last-applied-wins and elements removed by
//! an earlier entry match nothing afterwards.

use templater_dom::{DomResult, DomTree, ElementQuery, NodeId};

use crate::resolver::AttributeResolver;
use crate::special;
use crate::{AttributeEntry, AttributeMapper, ElementMapper};

/// Applies element mappers to clones
pub struct MappingEngine;

impl MappingEngine {
    /// Apply `mapper` to the clone rooted at `clone`, returning `clone`
    pub fn apply(tree: &mut DomTree, clone: NodeId, mapper: &ElementMapper) -> NodeId {
        for (selector, attribute_mapper) in mapper.iter() {
            let matched = match tree.query_selector_all(clone, selector) {
                Ok(matched) => matched,
                Err(err) => {
                    tracing::warn!("Skipping invalid selector {:?}: {}", selector, err);
                    continue;
                }
            };
            tracing::trace!("{:?} matched {} elements in {}", selector, matched.len(), clone);

            for element in matched {
                // A removal or callback earlier in this pass may have taken it out
                if !tree.is_ancestor_of(clone, element) {
                    continue;
                }
                if let Err(err) = Self::apply_to_element(tree, element, attribute_mapper) {
                    tracing::warn!("Failed to map {} for {:?}: {}", element, selector, err);
                }
            }
        }
        // Removed elements and replaced text stay addressable until here
        tree.sweep();
        clone
    }

    /// Apply one attribute mapper to one matched element
    pub fn apply_to_element(tree: &mut DomTree, element: NodeId, mapper: &AttributeMapper) -> DomResult<()> {
        if special::apply_whole(tree, element, mapper)? {
            return Ok(());
        }
        if let AttributeMapper::Attributes(entries) = mapper {
            for entry in entries {
                Self::apply_entry(tree, element, entry)?;
            }
        }
        Ok(())
    }

    fn apply_entry(tree: &mut DomTree, element: NodeId, entry: &AttributeEntry) -> DomResult<()> {
        match entry {
            AttributeEntry::Attr(name, change) => {
                AttributeResolver::resolve_and_apply(tree, element, name, change)
            }
            AttributeEntry::Style(change) => special::apply_style(tree, element, change),
            AttributeEntry::Dataset(change) => special::apply_dataset(tree, element, change),
            AttributeEntry::ClassList(change) => special::apply_class_list(tree, element, change),
            AttributeEntry::EventListeners(listeners) => {
                special::apply_event_listeners(tree, element, listeners)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fragment holding `<div class="card"><h2></h2><p class="note"></p><p></p></div>`
    fn clone_fixture() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let fragment = tree.create_fragment();
        let card = tree.create_element("div");
        tree.set_attribute(card, "class", "card").unwrap();
        tree.append_child(fragment, card).unwrap();
        for (tag, class) in [("h2", None), ("p", Some("note")), ("p", None)] {
            let el = tree.create_element(tag);
            if let Some(class) = class {
                tree.set_attribute(el, "class", class).unwrap();
            }
            tree.append_child(card, el).unwrap();
        }
        (tree, fragment, card)
    }

    #[test]
    fn test_applies_to_every_match() {
        let (mut tree, fragment, card) = clone_fixture();
        let mapper = ElementMapper::new().map("p", AttributeMapper::attrs().set("title", "t"));
        assert_eq!(MappingEngine::apply(&mut tree, fragment, &mapper), fragment);

        let paragraphs = tree.query_selector_all(card, "p[title=t]").unwrap();
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_overlapping_selectors_last_applied_wins() {
        let (mut tree, fragment, _) = clone_fixture();
        let mapper = ElementMapper::new()
            .map(".note", AttributeMapper::attrs().set("title", "note"))
            .map("p", AttributeMapper::attrs().set("title", "paragraph"));
        MappingEngine::apply(&mut tree, fragment, &mapper);

        let note = tree.query_selector(fragment, ".note").unwrap().unwrap();
        assert_eq!(tree.get_attribute(note, "title"), Some("paragraph"));

        // Same entries in the other order
        let (mut tree, fragment, _) = clone_fixture();
        let mapper = ElementMapper::new()
            .map("p", AttributeMapper::attrs().set("title", "paragraph"))
            .map(".note", AttributeMapper::attrs().set("title", "note"));
        MappingEngine::apply(&mut tree, fragment, &mapper);

        let note = tree.query_selector(fragment, ".note").unwrap().unwrap();
        assert_eq!(tree.get_attribute(note, "title"), Some("note"));
    }

    #[test]
    fn test_entries_within_one_element_in_order() {
        let (mut tree, fragment, card) = clone_fixture();
        let mapper = ElementMapper::new().map(
            "div",
            AttributeMapper::attrs()
                .set("title", "first")
                .transform("title", |v| v.map(|v| format!("{}+second", v).into())),
        );
        MappingEngine::apply(&mut tree, fragment, &mapper);
        assert_eq!(tree.get_attribute(card, "title"), Some("first+second"));
    }

    #[test]
    fn test_removed_elements_skip_later_selectors() {
        let (mut tree, fragment, card) = clone_fixture();
        let mapper = ElementMapper::new()
            .remove(".note")
            .map(".note", AttributeMapper::attrs().set("title", "late"))
            .map("p", AttributeMapper::attrs().set("title", "kept"));
        MappingEngine::apply(&mut tree, fragment, &mapper);

        let remaining = tree.query_selector_all(card, "p").unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(tree.query_selector(fragment, ".note").unwrap().is_none());
        assert!(tree.query_selector(fragment, "[title=late]").unwrap().is_none());
    }

    #[test]
    fn test_removed_slots_freed_after_pass() {
        let (mut tree, fragment, card) = clone_fixture();
        let note = tree.query_selector(card, ".note").unwrap().unwrap();
        let capacity = tree.capacity();
        let mapper = ElementMapper::new()
            .remove(".note")
            .text("h2", "Title")
            .map("p", AttributeMapper::attrs().set("title", "kept"));
        MappingEngine::apply(&mut tree, fragment, &mapper);

        // The heading's text did not land in the removed paragraph's slot
        let h2 = tree.query_selector(card, "h2").unwrap().unwrap();
        assert_ne!(tree.child_ids(h2), vec![note]);
        assert_eq!(tree.capacity(), capacity + 1);

        assert!(tree.get(note).is_none());
        assert_eq!(tree.len(), capacity);
        assert_eq!(tree.query_selector_all(card, "[title=kept]").unwrap().len(), 1);
    }

    #[test]
    fn test_removing_ancestor_skips_its_descendants() {
        let (mut tree, fragment, card) = clone_fixture();
        let mapper = ElementMapper::new().map(
            "div, p",
            AttributeMapper::callback(|tree, id| {
                if tree.tag_name(id) == Some("div") {
                    tree.detach(id);
                } else {
                    tree.set_attribute(id, "data-hit", "").unwrap();
                }
            }),
        );
        MappingEngine::apply(&mut tree, fragment, &mapper);

        assert!(tree.child_ids(fragment).is_empty());
        assert!(tree.query_selector_all(card, "[data-hit]").unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_and_invalid_selectors_are_noops() {
        let (mut tree, fragment, card) = clone_fixture();
        let before = tree.attributes(card).len();
        let mapper = ElementMapper::new()
            .text("section", "missing")
            .text("p[", "invalid")
            .text("h2", "Title");
        MappingEngine::apply(&mut tree, fragment, &mapper);

        assert_eq!(tree.attributes(card).len(), before);
        let h2 = tree.query_selector(card, "h2").unwrap().unwrap();
        assert_eq!(tree.text_content(h2), "Title");
    }

    #[test]
    fn test_mixed_entries_route_by_tag() {
        let (mut tree, fragment, card) = clone_fixture();
        let mapper = ElementMapper::new().map(
            ".card",
            AttributeMapper::attrs()
                .style([("color", "red")])
                .dataset([("itemId", "9")])
                .add_classes(["active"])
                .on("click", |_| {})
                .set("hidden", true),
        );
        MappingEngine::apply(&mut tree, fragment, &mapper);

        assert_eq!(tree.get_attribute(card, "style"), Some("color: red;"));
        assert_eq!(tree.get_attribute(card, "data-item-id"), Some("9"));
        assert_eq!(tree.get_attribute(card, "class"), Some("card active"));
        assert_eq!(tree.get_attribute(card, "hidden"), Some(""));
        assert_eq!(tree.listener_count(card, "click"), 1);
    }
}
