//! Mapper Data Model
//!
//! Declarative descriptions of what to change on each clone. An
//! [`ElementMapper`] maps selectors to [`AttributeMapper`]s, which either
//! list per-attribute changes or replace/remove/hand off the whole element.

use std::fmt;
use std::rc::Rc;

use templater_dom::{CssStyleDeclaration, DOMStringMap, DOMTokenList, DomTree, Event, EventHandler, NodeId, Value};

/// Change to a single attribute or property
pub enum AttributeChange {
    /// Assign a literal value
    Set(Value),
    /// Compute the new value from the current one; `None` removes the attribute
    Transform(Box<dyn Fn(Option<Value>) -> Option<Value>>),
    /// Remove the attribute
    Remove,
}

/// Change merged onto a key-value record (`style`, `dataset`)
pub enum RecordChange<M> {
    /// Entries shallow-merged onto the live record; `None` deletes the key
    Merge(Vec<(String, Option<String>)>),
    /// Receives the current record, the returned record is merged back
    Transform(Box<dyn Fn(M) -> M>),
}

/// Resolved `classList` value
#[derive(Debug, Clone, PartialEq)]
pub enum ClassListValue {
    /// Append classes, never removing any
    Add(Vec<String>),
    /// `true` adds, `false` removes; unlisted classes are left alone
    Toggle(Vec<(String, bool)>),
    /// Replace the membership outright
    Set(DOMTokenList),
}

/// Change to `classList`
pub enum ClassListChange {
    Value(ClassListValue),
    /// Receives the live class set
    Transform(Box<dyn Fn(DOMTokenList) -> ClassListValue>),
}

/// One entry of a per-attribute mapping
pub enum AttributeEntry {
    /// Plain attribute or known element property
    Attr(String, AttributeChange),
    Style(RecordChange<CssStyleDeclaration>),
    Dataset(RecordChange<DOMStringMap>),
    ClassList(ClassListChange),
    /// Handlers attached per event type, in order
    EventListeners(Vec<(String, EventHandler)>),
}

/// What to do with each element a selector matches
pub enum AttributeMapper {
    /// Per-attribute changes, applied in order
    Attributes(Vec<AttributeEntry>),
    /// Replace the element's text content
    Text(String),
    /// Remove the element from the clone
    Remove,
    /// Hand the element to a callback
    Callback(Box<dyn Fn(&mut DomTree, NodeId)>),
}

impl AttributeMapper {
    /// Start an empty per-attribute mapping
    pub fn attrs() -> Self {
        AttributeMapper::Attributes(Vec::new())
    }

    /// Text content replacement
    pub fn text(text: impl Into<String>) -> Self {
        AttributeMapper::Text(text.into())
    }

    /// Side-effect callback
    pub fn callback(f: impl Fn(&mut DomTree, NodeId) + 'static) -> Self {
        AttributeMapper::Callback(Box::new(f))
    }

    /// Append an entry.
    ///
    /// Only [`AttributeMapper::Attributes`] holds entries. On a whole-element
    /// form (`Text`, `Remove`, `Callback`) the entry is dropped with a warning
    /// and the form is kept; start from [`AttributeMapper::attrs`] instead.
    pub fn entry(mut self, entry: AttributeEntry) -> Self {
        match &mut self {
            AttributeMapper::Attributes(entries) => entries.push(entry),
            whole => tracing::warn!("Ignoring attribute entry on whole-element mapper {:?}", whole),
        }
        self
    }

    /// Set an attribute or property
    pub fn set(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entry(AttributeEntry::Attr(name.into(), AttributeChange::Set(value.into())))
    }

    /// Derive an attribute or property from its current value
    pub fn transform(
        self,
        name: impl Into<String>,
        f: impl Fn(Option<Value>) -> Option<Value> + 'static,
    ) -> Self {
        self.entry(AttributeEntry::Attr(name.into(), AttributeChange::Transform(Box::new(f))))
    }

    /// Remove an attribute
    pub fn remove(self, name: impl Into<String>) -> Self {
        self.entry(AttributeEntry::Attr(name.into(), AttributeChange::Remove))
    }

    /// Merge inline style declarations
    pub fn style<K, V>(self, declarations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entry(AttributeEntry::Style(RecordChange::Merge(record_entries(declarations))))
    }

    /// Merge the style returned by `f`
    pub fn style_with(self, f: impl Fn(CssStyleDeclaration) -> CssStyleDeclaration + 'static) -> Self {
        self.entry(AttributeEntry::Style(RecordChange::Transform(Box::new(f))))
    }

    /// Merge dataset entries (camelCase keys)
    pub fn dataset<K, V>(self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entry(AttributeEntry::Dataset(RecordChange::Merge(record_entries(entries))))
    }

    /// Merge the dataset returned by `f`
    pub fn dataset_with(self, f: impl Fn(DOMStringMap) -> DOMStringMap + 'static) -> Self {
        self.entry(AttributeEntry::Dataset(RecordChange::Transform(Box::new(f))))
    }

    /// Append classes
    pub fn add_classes<S: Into<String>>(self, classes: impl IntoIterator<Item = S>) -> Self {
        let classes = classes.into_iter().map(Into::into).collect();
        self.entry(AttributeEntry::ClassList(ClassListChange::Value(ClassListValue::Add(classes))))
    }

    /// Add (`true`) or remove (`false`) classes
    pub fn toggle_classes<S: Into<String>>(self, classes: impl IntoIterator<Item = (S, bool)>) -> Self {
        let classes = classes.into_iter().map(|(c, on)| (c.into(), on)).collect();
        self.entry(AttributeEntry::ClassList(ClassListChange::Value(ClassListValue::Toggle(classes))))
    }

    /// Compute the class change from the live class set
    pub fn class_list_with(self, f: impl Fn(DOMTokenList) -> ClassListValue + 'static) -> Self {
        self.entry(AttributeEntry::ClassList(ClassListChange::Transform(Box::new(f))))
    }

    /// Attach an event listener
    pub fn on(self, event_type: impl Into<String>, handler: impl Fn(&Event) + 'static) -> Self {
        self.listener(event_type, Rc::new(handler))
    }

    /// Attach a shared event handler
    pub fn listener(mut self, event_type: impl Into<String>, handler: EventHandler) -> Self {
        let event_type = event_type.into();
        // Consecutive listeners share one entry
        if let AttributeMapper::Attributes(entries) = &mut self {
            if let Some(AttributeEntry::EventListeners(listeners)) = entries.last_mut() {
                listeners.push((event_type, handler));
                return self;
            }
        }
        self.entry(AttributeEntry::EventListeners(vec![(event_type, handler)]))
    }
}

fn record_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Vec<(String, Option<String>)>
where
    K: Into<String>,
    V: Into<String>,
{
    entries.into_iter().map(|(k, v)| (k.into(), Some(v.into()))).collect()
}

impl fmt::Debug for AttributeMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeMapper::Attributes(entries) => write!(f, "Attributes({} entries)", entries.len()),
            AttributeMapper::Text(text) => f.debug_tuple("Text").field(text).finish(),
            AttributeMapper::Remove => f.write_str("Remove"),
            AttributeMapper::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for AttributeMapper {
    fn from(text: &str) -> Self {
        AttributeMapper::Text(text.to_string())
    }
}

impl From<String> for AttributeMapper {
    fn from(text: String) -> Self {
        AttributeMapper::Text(text)
    }
}

/// Selector-keyed mutations for one clone, applied in insertion order
#[derive(Debug, Default)]
pub struct ElementMapper {
    entries: Vec<(String, AttributeMapper)>,
}

impl ElementMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selector entry. Repeated selectors are kept and applied again.
    pub fn map(mut self, selector: impl Into<String>, mapper: impl Into<AttributeMapper>) -> Self {
        self.entries.push((selector.into(), mapper.into()));
        self
    }

    /// Replace the text of every match
    pub fn text(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.map(selector, AttributeMapper::Text(text.into()))
    }

    /// Remove every match from the clone
    pub fn remove(self, selector: impl Into<String>) -> Self {
        self.map(selector, AttributeMapper::Remove)
    }

    /// Invoke `f` for every match
    pub fn callback(self, selector: impl Into<String>, f: impl Fn(&mut DomTree, NodeId) + 'static) -> Self {
        self.map(selector, AttributeMapper::callback(f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeMapper)> {
        self.entries.iter().map(|(s, m)| (s.as_str(), m))
    }
}

impl<S: Into<String>> FromIterator<(S, AttributeMapper)> for ElementMapper {
    fn from_iter<I: IntoIterator<Item = (S, AttributeMapper)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(s, m)| (s.into(), m)).collect(),
        }
    }
}

/// Anything that flattens into an ordered list of mappers
pub trait MapperSource<'a> {
    fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>);

    fn into_mappers(self) -> Vec<&'a ElementMapper>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        self.collect_mappers(&mut out);
        out
    }
}

impl<'a> MapperSource<'a> for () {
    fn collect_mappers(self, _out: &mut Vec<&'a ElementMapper>) {}
}

impl<'a> MapperSource<'a> for &'a ElementMapper {
    fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>) {
        out.push(self);
    }
}

impl<'a> MapperSource<'a> for &'a [ElementMapper] {
    fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>) {
        out.extend(self.iter());
    }
}

impl<'a> MapperSource<'a> for &'a Vec<ElementMapper> {
    fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>) {
        out.extend(self.iter());
    }
}

impl<'a, M: MapperSource<'a>> MapperSource<'a> for Vec<M> {
    fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>) {
        for m in self {
            m.collect_mappers(out);
        }
    }
}

impl<'a, M: MapperSource<'a>, const N: usize> MapperSource<'a> for [M; N] {
    fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>) {
        for m in self {
            m.collect_mappers(out);
        }
    }
}

impl<'a, M: MapperSource<'a>> MapperSource<'a> for Option<M> {
    fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>) {
        if let Some(m) = self {
            m.collect_mappers(out);
        }
    }
}

macro_rules! tuple_mapper_source {
    ($($name:ident),+) => {
        impl<'a, $($name: MapperSource<'a>),+> MapperSource<'a> for ($($name,)+) {
            #[allow(non_snake_case)]
            fn collect_mappers(self, out: &mut Vec<&'a ElementMapper>) {
                let ($($name,)+) = self;
                $($name.collect_mappers(out);)+
            }
        }
    };
}

tuple_mapper_source!(A, B);
tuple_mapper_source!(A, B, C);
tuple_mapper_source!(A, B, C, D);
