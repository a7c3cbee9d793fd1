//! Inline rich-text codec.
//!
//! Converts between markup strings (`<strong>`, `<em>`, `<u>`, `<mark>`)
//! and [`Run`](crate::model::Run) sequences, and flattens whole documents
//! into the markup the matching service consumes. Nothing in this module
//! returns an error: malformed input degrades to plain text.

mod document;
mod escape;
mod parse;
mod serialize;

pub use document::{document_markup, document_markup_with};
pub use escape::escape_text;
pub use parse::{parse_html, parse_markup};
pub use serialize::{serialize_runs, serialize_text};
