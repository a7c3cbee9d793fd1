//! Tree → record.

use super::config::AdapterConfig;
use crate::model::{Document, Inline, NodeId, NodeType, Run, normalize_runs};
use crate::record::{
    Degree, EducationEntry, ExperienceEntry, HighlightEntry, Personal, Position, ResumeRecord,
    RichText, Section, SectionEntries, SectionKind,
};

/// Extract a record from a document tree with default placeholders.
pub fn extract_record(doc: &Document) -> ResumeRecord {
    extract_record_with(doc, &AdapterConfig::default())
}

/// Extract a record from a document tree.
///
/// Tolerates any tree the content model allows, and trees it does not: a
/// missing child yields an empty or absent field, never an error.
pub fn extract_record_with(doc: &Document, config: &AdapterConfig) -> ResumeRecord {
    let ctx = Extractor { doc, config };
    let root = doc.root();

    let personal = doc
        .child_of_type(root, NodeType::PersonalSection)
        .map(|id| ctx.personal(id))
        .unwrap_or_default();
    let sections: Vec<Section> = doc
        .children_of_type(root, NodeType::ResumeSection)
        .map(|id| ctx.section(id))
        .collect();

    tracing::debug!(sections = sections.len(), "extracted record");
    ResumeRecord { personal, sections }
}

struct Extractor<'a> {
    doc: &'a Document,
    config: &'a AdapterConfig,
}

impl Extractor<'_> {
    fn child(&self, parent: Option<NodeId>, kind: NodeType) -> Option<NodeId> {
        self.doc.child_of_type(parent?, kind)
    }

    /// Rich text of an inline container.
    fn text(&self, id: NodeId) -> RichText {
        RichText::from_runs(self.doc.runs(id))
    }

    /// Header field value, absent when missing, blank, or a placeholder.
    fn field(&self, parent: Option<NodeId>, kind: NodeType) -> Option<RichText> {
        let id = self.child(parent, kind)?;
        let text = self.text(id);
        let plain = text.plain_text();
        let plain = plain.trim();
        let placeholder = self.config.placeholders.for_field(kind);
        if plain.is_empty() || placeholder.is_some_and(|p| p.trim() == plain) {
            None
        } else {
            Some(text)
        }
    }

    fn personal(&self, id: NodeId) -> Personal {
        let mut personal = Personal {
            name: self
                .doc
                .child_of_type(id, NodeType::Heading)
                .map(|h| self.text(h))
                .unwrap_or_default(),
            summary: self
                .doc
                .child_of_type(id, NodeType::Paragraph)
                .map(|p| self.text(p))
                .filter(|s| !s.is_blank()),
            ..Personal::default()
        };

        if let Some(row) = self.doc.child_of_type(id, NodeType::ContactRow) {
            for detail in self.doc.children_of_type(row, NodeType::ContactDetail) {
                let kind = self.doc.attr_str(detail, "type");
                let value = self.doc.attr_str(detail, "value");
                if let (Some(kind), Some(value)) = (kind, value)
                    && !value.trim().is_empty()
                {
                    personal.set_contact(kind, value.to_string());
                }
            }
        }
        personal
    }

    fn section(&self, id: NodeId) -> Section {
        let title = self
            .doc
            .child_of_type(id, NodeType::SectionTitle)
            .map(|t| self.text(t))
            .unwrap_or_default();
        let explicit = self
            .doc
            .attr_str(id, "sectionKind")
            .and_then(SectionKind::from_name);
        let kind = explicit.or_else(|| SectionKind::detect(&title.plain_text()));
        tracing::trace!(title = %title.plain_text(), ?kind, "extracting section");

        let entries = match kind {
            Some(SectionKind::Skills) => SectionEntries::Skills(self.skills(id)),
            Some(SectionKind::Education) => SectionEntries::Education(
                self.doc
                    .children_of_type(id, NodeType::EducationEntry)
                    .map(|e| self.education(e))
                    .collect(),
            ),
            Some(SectionKind::Work | SectionKind::Research) => SectionEntries::Experience(
                self.doc
                    .children(id)
                    .filter(|&c| {
                        matches!(
                            self.doc.kind(c),
                            Some(NodeType::WorkEntry | NodeType::ResearchEntry)
                        )
                    })
                    .map(|e| self.experience(e))
                    .collect(),
            ),
            Some(SectionKind::Project | SectionKind::Leadership) => SectionEntries::Highlights(
                self.doc
                    .children(id)
                    .filter(|&c| {
                        matches!(
                            self.doc.kind(c),
                            Some(NodeType::ProjectEntry | NodeType::LeadershipEntry)
                        )
                    })
                    .map(|e| self.highlight(e))
                    .collect(),
            ),
            None => SectionEntries::Unrecognized(Vec::new()),
        };

        Section {
            title,
            kind: explicit,
            entries,
        }
    }

    fn skills(&self, section: NodeId) -> Vec<String> {
        let delimiter = self.config.skills_delimiter();
        self.doc
            .children_of_type(section, NodeType::SkillsEntry)
            .flat_map(|entry| {
                let line = self.doc.plain_text(entry);
                line.split(delimiter)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn bullets(&self, list: Option<NodeId>) -> Vec<RichText> {
        let Some(list) = list else {
            return Vec::new();
        };
        self.doc
            .children_of_type(list, NodeType::ListItem)
            .map(|item| {
                self.doc
                    .child_of_type(item, NodeType::Paragraph)
                    .map(|p| self.text(p))
                    .unwrap_or_default()
            })
            .collect()
    }

    fn education(&self, id: NodeId) -> EducationEntry {
        let header = self.doc.child_of_type(id, NodeType::EntryTitleHeader);
        EducationEntry {
            school: self.field(header, NodeType::Institution).unwrap_or_default(),
            location: self.field(header, NodeType::Location),
            dates: self.field(header, NodeType::Date),
            degrees: self
                .doc
                .children_of_type(id, NodeType::Degree)
                .map(|d| self.degree(d))
                .collect(),
        }
    }

    fn degree(&self, id: NodeId) -> Degree {
        let header = self.doc.child_of_type(id, NodeType::DegreeHeader);
        Degree {
            degree_type: self.field(header, NodeType::DegreeType).unwrap_or_default(),
            major: self.field(header, NodeType::Major),
            gpa: self.field(header, NodeType::Gpa),
            bullets: self.bullets(self.doc.child_of_type(id, NodeType::BulletList)),
        }
    }

    fn experience(&self, id: NodeId) -> ExperienceEntry {
        let header = self.doc.child_of_type(id, NodeType::EntryTitleHeader);
        let company = self.field(header, NodeType::Institution).unwrap_or_default();
        let nested: Vec<NodeId> = self
            .doc
            .children_of_type(id, NodeType::PositionEntry)
            .collect();

        let positions = if nested.is_empty() {
            let position = Position {
                title: self.field(header, NodeType::PositionTitle),
                description: self.field(header, NodeType::PositionDescription),
                location: self.field(header, NodeType::Location),
                dates: self.field(header, NodeType::Date),
                bullets: self.bullets(self.doc.child_of_type(id, NodeType::BulletList)),
            };
            // A header with nothing but placeholders stands for no position at all
            if position == Position::default() {
                Vec::new()
            } else {
                vec![position]
            }
        } else {
            let shared_location = self.field(header, NodeType::Location);
            let header_date = self.field(header, NodeType::Date);
            nested
                .iter()
                .enumerate()
                .map(|(i, &entry)| {
                    let pos_header = self.doc.child_of_type(entry, NodeType::PositionEntryHeader);
                    Position {
                        title: self.field(pos_header, NodeType::PositionTitle),
                        description: self.field(pos_header, NodeType::PositionDescription),
                        location: self
                            .field(pos_header, NodeType::Location)
                            .or_else(|| shared_location.clone()),
                        dates: self
                            .field(pos_header, NodeType::Date)
                            .or_else(|| header_date.clone().filter(|_| i == 0)),
                        bullets: self.bullets(self.doc.child_of_type(entry, NodeType::BulletList)),
                    }
                })
                .collect()
        };

        ExperienceEntry { company, positions }
    }

    fn highlight(&self, id: NodeId) -> HighlightEntry {
        let items = self
            .doc
            .child_of_type(id, NodeType::Paragraph)
            .map(|p| self.doc.inlines(p))
            .unwrap_or_default();

        let mut title = Vec::new();
        let mut description = Vec::new();
        for item in items {
            match item {
                Inline::Title(runs) if title.is_empty() => title = runs,
                Inline::Title(runs) => description.extend(runs),
                Inline::Text(run) => description.push(run),
            }
        }
        let description = strip_separator(normalize_runs(description));

        HighlightEntry {
            title: RichText::from_runs(title),
            description: Some(RichText::from_runs(description)).filter(|d| !d.is_blank()),
            skills: self
                .doc
                .attr(id, "skills")
                .and_then(|v| v.as_list())
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        }
    }
}

/// Drop the `" - "` joining a title to its description.
///
/// The separator may have been merged into the description's first run.
fn strip_separator(mut runs: Vec<Run>) -> Vec<Run> {
    if let Some(first) = runs.first_mut() {
        let trimmed = first.text.trim_start();
        if let Some(rest) = trimmed.strip_prefix('-') {
            first.text = rest.strip_prefix(' ').unwrap_or(rest).to_string();
        }
    }
    normalize_runs(runs)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapter::build_document;
    use crate::model::{Fragment, Mark, MarkSet};

    fn round_trip(value: serde_json::Value) -> ResumeRecord {
        let record = ResumeRecord::from_value(value).unwrap();
        extract_record(&build_document(&record))
    }

    #[test]
    fn test_personal_round_trip() {
        let record = round_trip(json!({
            "personal": {"name": "A B", "summary": "Builds things", "email": "a@b.c", "github": "gh"},
            "sections": []
        }));
        assert_eq!(record.personal.name, RichText::from("A B"));
        assert_eq!(record.personal.summary, Some(RichText::from("Builds things")));
        assert_eq!(record.personal.email.as_deref(), Some("a@b.c"));
        assert_eq!(record.personal.github.as_deref(), Some("gh"));
        assert_eq!(record.personal.phone, None);
    }

    #[test]
    fn test_skills_split() {
        let record = round_trip(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Skills", "entries": ["Go", " SQL ", ""]}]
        }));
        assert_eq!(
            record.sections[0].entries,
            SectionEntries::Skills(vec!["Go".into(), "SQL".into()])
        );
    }

    #[test]
    fn test_placeholders_extract_as_absent() {
        let record = round_trip(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Education", "entries": [{"school": "MIT", "degrees": []}]}]
        }));
        let SectionEntries::Education(entries) = &record.sections[0].entries else {
            panic!("expected education entries");
        };
        assert_eq!(entries[0].school, RichText::from("MIT"));
        assert_eq!(entries[0].location, None);
        assert_eq!(entries[0].dates, None);
    }

    #[test]
    fn test_nested_positions_inherit_header_fields() {
        let record = round_trip(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Work", "entries": [{
                "company": "Acme",
                "positions": [
                    {"title": "Senior", "location": "NYC", "dates": "2022", "bullets": ["a"]},
                    {"title": "Junior", "location": "NYC", "bullets": ["b", "c"]}
                ]
            }]}]
        }));
        let SectionEntries::Experience(entries) = &record.sections[0].entries else {
            panic!("expected experience entries");
        };
        let positions = &entries[0].positions;
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].location, Some(RichText::from("NYC")));
        assert_eq!(positions[1].location, Some(RichText::from("NYC")));
        assert_eq!(positions[0].dates, Some(RichText::from("2022")));
        assert_eq!(positions[1].dates, None);
        assert_eq!(positions[1].bullets.len(), 2);
    }

    #[test]
    fn test_zero_positions_survive() {
        let record = round_trip(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Research", "entries": [{"company": "Lab", "positions": []}]}]
        }));
        let SectionEntries::Experience(entries) = &record.sections[0].entries else {
            panic!("expected experience entries");
        };
        assert_eq!(entries[0].company, RichText::from("Lab"));
        assert!(entries[0].positions.is_empty());
    }

    #[test]
    fn test_project_line_split() {
        let record = round_trip(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Projects", "entries": [
                {"title": "vitae", "description": "<b>fast</b> core", "skills": ["Rust"]},
                {"title": "bare"}
            ]}]
        }));
        let SectionEntries::Highlights(entries) = &record.sections[0].entries else {
            panic!("expected highlight entries");
        };
        assert_eq!(entries[0].title, RichText::from("vitae"));
        assert_eq!(
            entries[0].description,
            Some(RichText::Runs(vec![
                Run::marked("fast", MarkSet::of(&[Mark::Bold])),
                Run::plain(" core"),
            ]))
        );
        assert_eq!(entries[0].skills, vec!["Rust".to_string()]);
        assert_eq!(entries[1].description, None);
    }

    #[test]
    fn test_separator_merged_into_text() {
        // The editor merges " - " with an unformatted description
        let record = round_trip(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Leadership", "entries": [{"title": "Chair", "description": "ran club"}]}]
        }));
        let SectionEntries::Highlights(entries) = &record.sections[0].entries else {
            panic!("expected highlight entries");
        };
        assert_eq!(entries[0].description, Some(RichText::from("ran club")));
    }

    #[test]
    fn test_missing_children_do_not_abort() {
        // A work entry without a header and a section without a title
        let root = Fragment::node(
            NodeType::Doc,
            vec![
                Fragment::node(
                    NodeType::ResumeSection,
                    vec![
                        Fragment::field(NodeType::SectionTitle, vec![Run::plain("Work")]),
                        Fragment::node(NodeType::WorkEntry, vec![Fragment::leaf(NodeType::BulletList)]),
                    ],
                ),
                Fragment::leaf(NodeType::ResumeSection),
            ],
        );
        let doc = Document::from_fragment(&root).unwrap();
        let record = extract_record(&doc);

        assert_eq!(record.personal, Personal::default());
        assert_eq!(record.sections.len(), 2);
        assert_eq!(
            record.sections[0].entries,
            SectionEntries::Experience(vec![ExperienceEntry::default()])
        );
        assert_eq!(record.sections[1].entries, SectionEntries::Unrecognized(vec![]));
    }

    #[test]
    fn test_explicit_kind_survives() {
        let record = round_trip(json!({
            "personal": {"name": "A"},
            "sections": [{"title": "Experience", "kind": "work", "entries": [
                {"company": "Acme", "positions": [{"title": "Dev"}]}
            ]}]
        }));
        assert_eq!(record.sections[0].kind, Some(SectionKind::Work));
        assert_eq!(record.sections[0].entries.len(), 1);
    }
}
