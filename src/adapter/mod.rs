//! Record ↔ tree adapter.
//!
//! [`build_document`] turns a [`ResumeRecord`](crate::record::ResumeRecord)
//! into a document tree that satisfies the content model;
//! [`extract_record`] reads a (possibly edited) tree back into a record.
//! Both are pure: no state is kept between calls.
//!
//! ```
//! use vitae::adapter::{build_document, extract_record};
//! use vitae::record::ResumeRecord;
//!
//! let record = ResumeRecord::from_json(
//!     r#"{"personal": {"name": "A B"}, "sections": [{"title": "Skills", "entries": ["Go", "SQL"]}]}"#,
//! )?;
//! let doc = build_document(&record);
//! assert!(vitae::schema::validate(&doc).is_empty());
//! assert_eq!(extract_record(&doc), record);
//! # Ok::<(), vitae::Error>(())
//! ```

mod build;
mod config;
mod extract;

pub use build::{build_document, build_document_with, build_fragment};
pub use config::{AdapterConfig, Placeholders};
pub use extract::{extract_record, extract_record_with};
