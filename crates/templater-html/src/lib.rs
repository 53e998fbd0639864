//! fOS Templater HTML
//!
//! Loads template markup into a [`Document`] through html5ever and writes
//! trees back out as HTML. `<template>` contents land in their own inert
//! fragment, ready to be cloned.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{HtmlSerializer, inner_html, outer_html};
pub use templater_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed tree while converting parsed HTML: {0}")]
    Tree(#[from] templater_dom::DomError),
}
