//! WASM bindings for the browser editor.
//!
//! Everything crosses the boundary as JSON strings. Functions that depend on
//! placeholders take an optional adapter configuration as JSON.

use wasm_bindgen::prelude::*;

use crate::adapter::{self, AdapterConfig};
use crate::markup;
use crate::model::Document;
use crate::record::ResumeRecord;
use crate::schema;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Adapter configuration from optional JSON; defaults when absent.
fn load_config(config_json: Option<String>) -> Result<AdapterConfig, JsValue> {
    match config_json {
        Some(json) => serde_json::from_str(&json).map_err(js_err),
        None => Ok(AdapterConfig::default()),
    }
}

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Résumé record JSON to document tree JSON.
#[wasm_bindgen]
pub fn build_tree(record_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = load_config(config_json)?;
    let record = ResumeRecord::from_json(record_json).map_err(js_err)?;
    adapter::build_document_with(&record, &config)
        .to_json()
        .map_err(js_err)
}

/// Document tree JSON to résumé record JSON.
#[wasm_bindgen]
pub fn extract_record(tree_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = load_config(config_json)?;
    let doc = Document::from_json(tree_json).map_err(js_err)?;
    adapter::extract_record_with(&doc, &config)
        .to_json()
        .map_err(js_err)
}

/// Violations as a JSON array of messages. Empty when the tree is valid.
#[wasm_bindgen]
pub fn validate_tree(tree_json: &str) -> Result<String, JsValue> {
    let doc = Document::from_json(tree_json).map_err(js_err)?;
    let messages: Vec<String> = schema::validate(&doc)
        .iter()
        .map(ToString::to_string)
        .collect();
    serde_json::to_string(&messages).map_err(js_err)
}

/// Document tree JSON to inline markup for the matching service.
#[wasm_bindgen]
pub fn document_markup(tree_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let config = load_config(config_json)?;
    let doc = Document::from_json(tree_json).map_err(js_err)?;
    Ok(markup::document_markup_with(&doc, &config))
}
