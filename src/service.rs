//! Request and response shapes for the external matching service.
//!
//! Transport is not handled here. The caller serializes an
//! [`AnalyzeRequest`], sends it however it likes, and hands the decoded
//! [`AnalyzeResponse`] back to this crate.

use serde::{Deserialize, Serialize};

use crate::adapter::AdapterConfig;
use crate::error::{Error, Result};
use crate::markup::{document_markup_with, parse_html};
use crate::model::{Document, Fragment, Run};
use crate::schema;

/// Résumé plus job description, both as markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_html: String,
    pub job_description: String,
}

impl AnalyzeRequest {
    /// Flatten `doc` and pair it with a job description.
    pub fn new(doc: &Document, job_description: impl Into<String>) -> Self {
        Self::with_config(doc, &AdapterConfig::default(), job_description)
    }

    /// Like [`AnalyzeRequest::new`], for a document built with `config`.
    pub fn with_config(
        doc: &Document,
        config: &AdapterConfig,
        job_description: impl Into<String>,
    ) -> Self {
        Self {
            resume_html: document_markup_with(doc, config),
            job_description: job_description.into(),
        }
    }
}

/// The service's answer: a replacement résumé and phrase mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(alias = "html")]
    pub document: Replacement,
    #[serde(default)]
    pub mappings: Vec<PhraseMapping>,
}

/// Replacement content, depending on the integration point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Replacement {
    Tree(Fragment),
    Markup(String),
}

impl Replacement {
    /// Load a returned tree, rejecting it unless it satisfies the content model.
    pub fn into_document(self) -> Result<Document> {
        match self {
            Replacement::Tree(fragment) => {
                let doc = Document::from_fragment(&fragment)?;
                schema::check(&doc)?;
                Ok(doc)
            }
            Replacement::Markup(_) => Err(Error::InvalidEdit(
                "service returned markup, not a document tree".to_string(),
            )),
        }
    }

    /// Decode returned markup into runs. A returned tree yields its text.
    pub fn runs(&self) -> Vec<Run> {
        match self {
            Replacement::Markup(html) => parse_html(html),
            Replacement::Tree(fragment) => match Document::from_fragment(fragment) {
                Ok(doc) => vec![Run::plain(doc.plain_text(doc.root()))],
                Err(_) => Vec::new(),
            },
        }
    }
}

/// A job-description phrase and the résumé phrase it was matched to.
///
/// Used for display only; nothing in this crate interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseMapping {
    pub jd_phrase: String,
    pub resume_phrase: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{Mark, MarkSet, NodeType};

    #[test]
    fn test_request_shape() {
        let request = AnalyzeRequest::new(&Document::new(), "Rust engineer");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"resumeHtml": "", "jobDescription": "Rust engineer"})
        );
    }

    #[test]
    fn test_request_skips_configured_placeholders() {
        let config: AdapterConfig =
            serde_json::from_value(json!({"placeholders": {"dates": "When?"}})).unwrap();
        let record = crate::record::ResumeRecord::from_value(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Education", "entries": [{"school": "MIT", "location": "Boston"}]}]
        }))
        .unwrap();
        let doc = crate::adapter::build_document_with(&record, &config);

        let request = AnalyzeRequest::with_config(&doc, &config, "jd");
        assert_eq!(
            request.resume_html,
            "<h1>A</h1><h2>Education</h2><p>MIT | Boston</p>"
        );
    }

    #[test]
    fn test_markup_response() {
        let response: AnalyzeResponse = serde_json::from_value(json!({
            "html": "<mark>Rust</mark> services",
            "mappings": [{"jd_phrase": "Rust", "resume_phrase": "Rust services"}]
        }))
        .unwrap();

        assert_eq!(response.mappings.len(), 1);
        assert_eq!(
            response.document.runs(),
            vec![
                Run::marked("Rust", MarkSet::of(&[Mark::Highlight])),
                Run::plain(" services"),
            ]
        );
        assert!(matches!(
            response.document.into_document(),
            Err(Error::InvalidEdit(_))
        ));
    }

    #[test]
    fn test_tree_response_is_validated() {
        let valid: AnalyzeResponse = serde_json::from_value(json!({
            "document": {"type": "doc", "content": [{
                "type": "personalSection",
                "content": [
                    {"type": "heading", "content": [{"type": "text", "text": "A B"}]},
                    {"type": "separatorLine"}
                ]
            }]}
        }))
        .unwrap();
        let doc = valid.document.into_document().unwrap();
        assert_eq!(doc.plain_text(doc.root()), "A B");

        let invalid: AnalyzeResponse = serde_json::from_value(json!({
            "document": {"type": "doc", "content": [{"type": "personalSection"}]}
        }))
        .unwrap();
        let err = invalid.document.into_document().unwrap_err();
        assert!(matches!(err, Error::Structure(ref v) if v[0].kind == NodeType::PersonalSection));
    }
}
