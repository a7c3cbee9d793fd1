//! # vitae
//!
//! A typed résumé document tree with a checked content model.
//!
//! ## Features
//!
//! - Arena-backed document tree with rich-text runs
//! - One flat grammar table, validated generically
//! - Structure-preserving edits that refuse to break the grammar
//! - Record ↔ tree adapter that survives editing
//! - Inline markup codec (`<strong>`, `<em>`, `<u>`, `<mark>`)
//!
//! ## Quick Start
//!
//! ```
//! use vitae::{ResumeRecord, build_document, extract_record, validate};
//!
//! let record = ResumeRecord::from_json(r#"{
//!     "personal": {"name": "Ada Lovelace", "email": "ada@example.com"},
//!     "sections": [
//!         {"title": "Technical Skills", "entries": ["Rust", "SQL"]},
//!         {"title": "Work Experience", "entries": [
//!             {"company": "Analytical Engines", "positions": [
//!                 {"title": "Engineer", "dates": "1843", "bullets": ["Wrote Note G"]}
//!             ]}
//!         ]}
//!     ]
//! }"#)?;
//!
//! let doc = build_document(&record);
//! assert!(validate(&doc).is_empty());
//! assert_eq!(extract_record(&doc), record);
//! # Ok::<(), vitae::Error>(())
//! ```
//!
//! ## Editing
//!
//! Edits go through [`Document`] and are checked against the grammar before
//! they apply:
//!
//! ```
//! use vitae::{Document, Fragment, NodeType};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let err = doc.append_child(root, &Fragment::node(NodeType::SeparatorLine, vec![]));
//! assert!(err.is_err());
//! ```

pub mod adapter;
pub mod error;
pub mod icons;
pub mod markup;
pub mod model;
pub mod record;
pub mod schema;
pub mod service;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use adapter::{AdapterConfig, build_document, build_document_with, extract_record, extract_record_with};
pub use error::{Error, Result};
pub use markup::{document_markup, document_markup_with, parse_markup, serialize_runs};
pub use model::{Document, Fragment, Mark, MarkSet, NodeId, NodeType, Run};
pub use record::{ResumeRecord, RichText, SectionKind};
pub use schema::{Violation, validate};
