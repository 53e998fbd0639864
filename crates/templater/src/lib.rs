//! fOS Templater
//!
//! Clones a reusable markup fragment once per mapper and applies
//! declarative per-element mutations to each clone: attributes and
//! properties, text, inline style, dataset, classes and event listeners.
//! Produced instances are tracked so they can be appended elsewhere or
//! cleared in bulk.
//!
//! ```no_run
//! use templater::{AttributeMapper, ElementMapper, Templater, TemplaterOptions};
//!
//! # fn demo(tree: &mut templater::DomTree) -> templater::Result<()> {
//! let rows = [
//!     ElementMapper::new().text(".name", "Ada"),
//!     ElementMapper::new()
//!         .text(".name", "Grace")
//!         .map("li", AttributeMapper::attrs().add_classes(["admin"])),
//! ];
//! Templater::new(tree, "#row", TemplaterOptions::default())?
//!     .instantiate(tree, &rows[..]);
//! # Ok(())
//! # }
//! ```

mod engine;
mod error;
mod mapper;
mod options;
mod resolver;
mod special;
mod templater;

pub use engine::MappingEngine;
pub use error::{Result, TemplaterError};
pub use mapper::{
    AttributeChange, AttributeEntry, AttributeMapper, ClassListChange, ClassListValue,
    ElementMapper, MapperSource, RecordChange,
};
pub use options::TemplaterOptions;
pub use resolver::{AttributeResolver, Directive};
pub use templater::{Instance, Templater};

pub use templater_dom::{DomTree, Event, EventHandler, NodeId, Target, Value};
