//! Whole document → flat markup.
//!
//! The external matching service reads a résumé as a single markup string.
//! This module flattens the tree into that form. No I/O is performed here.

use super::escape::escape_text;
use super::serialize::{serialize_runs, serialize_text};
use crate::adapter::{AdapterConfig, Placeholders};
use crate::model::{Document, NodeId, NodeType};

/// Separator between header fields on one line.
const FIELD_SEPARATOR: &str = " | ";

/// Flatten a document into markup.
///
/// The name becomes `h1`, section titles `h2`, header lines and inline
/// paragraphs `p`, bullet lists `ul`/`li`. Blank header fields and
/// default placeholder text are left out.
pub fn document_markup(doc: &Document) -> String {
    document_markup_with(doc, &AdapterConfig::default())
}

/// Flatten a document built with `config`, leaving out its placeholders.
pub fn document_markup_with(doc: &Document, config: &AdapterConfig) -> String {
    let mut ctx = MarkupContext {
        doc,
        placeholders: &config.placeholders,
        output: String::new(),
    };
    ctx.render_children(doc.root());
    ctx.output
}

/// Context for flattening (pure string accumulation).
struct MarkupContext<'a> {
    doc: &'a Document,
    placeholders: &'a Placeholders,
    output: String,
}

impl MarkupContext<'_> {
    fn render_children(&mut self, id: NodeId) {
        for child in self.doc.children(id) {
            self.render(child);
        }
    }

    fn render(&mut self, id: NodeId) {
        let Some(kind) = self.doc.kind(id) else {
            return;
        };
        match kind {
            NodeType::Heading => {
                let inner = serialize_text(&self.doc.runs(id));
                self.element("h1", &inner);
            }
            NodeType::SectionTitle => {
                let inner = serialize_text(&self.doc.runs(id));
                self.element("h2", &inner);
            }
            NodeType::Paragraph => {
                let inner = serialize_runs(&self.doc.inlines(id));
                self.element("p", &inner);
            }
            NodeType::ContactRow => {
                let values: Vec<String> = self
                    .doc
                    .children(id)
                    .filter_map(|c| self.doc.attr_str(c, "value"))
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| escape_text(v).into_owned())
                    .collect();
                self.element("p", &values.join(FIELD_SEPARATOR));
            }
            NodeType::EntryTitleHeader | NodeType::PositionEntryHeader | NodeType::DegreeHeader => {
                let fields: Vec<String> = self
                    .doc
                    .children(id)
                    .filter(|&c| {
                        let text = self.doc.plain_text(c);
                        !text.trim().is_empty() && !self.placeholders.is_placeholder(&text)
                    })
                    .map(|c| serialize_text(&self.doc.runs(c)))
                    .collect();
                self.element("p", &fields.join(FIELD_SEPARATOR));
            }
            NodeType::BulletList => {
                let items: Vec<String> = self
                    .doc
                    .children_of_type(id, NodeType::ListItem)
                    .filter_map(|item| self.doc.child_of_type(item, NodeType::Paragraph))
                    .map(|p| serialize_runs(&self.doc.inlines(p)))
                    .filter(|s| !s.trim().is_empty())
                    .collect();
                if !items.is_empty() {
                    self.output.push_str("<ul>");
                    for item in items {
                        self.element("li", &item);
                    }
                    self.output.push_str("</ul>");
                }
            }
            NodeType::SeparatorLine | NodeType::ContactDetail | NodeType::Text => {}
            _ => self.render_children(id),
        }
    }

    /// Emit `<tag>inner</tag>`, skipping empty content.
    fn element(&mut self, tag: &str, inner: &str) {
        if inner.trim().is_empty() {
            return;
        }
        self.output.push('<');
        self.output.push_str(tag);
        self.output.push('>');
        self.output.push_str(inner);
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
    }
}
