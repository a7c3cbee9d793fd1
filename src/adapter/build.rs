//! Record → tree.

use std::collections::BTreeSet;

use super::config::{AdapterConfig, Placeholders};
use crate::model::{AttrValue, Document, Fragment, NodeType, Run};
use crate::record::{
    Degree, EducationEntry, ExperienceEntry, HighlightEntry, Personal, Position, ResumeRecord,
    RichText, Section, SectionEntries, SectionKind,
};

/// Build a document tree from a record with default placeholders.
pub fn build_document(record: &ResumeRecord) -> Document {
    build_document_with(record, &AdapterConfig::default())
}

/// Build a document tree from a record.
///
/// Never fails: absent optional fields are left out, absent required header
/// fields get placeholder text. The result always satisfies the content
/// model.
pub fn build_document_with(record: &ResumeRecord, config: &AdapterConfig) -> Document {
    tracing::debug!(sections = record.sections.len(), "building document");
    let doc = Document::from_children(&build_children(record, config));

    debug_assert!(
        crate::schema::validate(&doc).is_empty(),
        "built document violates the content model: {:?}",
        crate::schema::validate(&doc)
    );
    doc
}

/// Build the owned `doc` tree without loading it into an arena.
pub fn build_fragment(record: &ResumeRecord, config: &AdapterConfig) -> Fragment {
    Fragment::node(NodeType::Doc, build_children(record, config))
}

fn build_children(record: &ResumeRecord, config: &AdapterConfig) -> Vec<Fragment> {
    let builder = Builder { config };
    let mut children = vec![builder.personal(&record.personal)];
    children.extend(record.sections.iter().map(|s| builder.section(s)));
    children
}

struct Builder<'a> {
    config: &'a AdapterConfig,
}

impl Builder<'_> {
    fn placeholders(&self) -> &Placeholders {
        &self.config.placeholders
    }

    fn personal(&self, personal: &Personal) -> Fragment {
        let mut children =
            vec![field(NodeType::Heading, &personal.name).with_attr("level", AttrValue::Int(1))];

        if let Some(summary) = personal.summary.as_ref().filter(|s| !s.is_blank()) {
            children.push(Fragment::paragraph(text_children(summary)));
        }
        children.push(Fragment::leaf(NodeType::SeparatorLine));

        let contacts: Vec<Fragment> = personal
            .contacts()
            .map(|(kind, value)| {
                Fragment::leaf(NodeType::ContactDetail)
                    .with_attr("type", kind)
                    .with_attr("value", value)
            })
            .collect();
        if !contacts.is_empty() {
            children.push(Fragment::node(NodeType::ContactRow, contacts));
        }

        Fragment::node(NodeType::PersonalSection, children)
    }

    fn section(&self, section: &Section) -> Fragment {
        let kind = section.resolved_kind();
        tracing::trace!(title = %section.title.plain_text(), ?kind, "building section");

        let mut children = vec![field(NodeType::SectionTitle, &section.title)];
        match &section.entries {
            SectionEntries::Skills(skills) => children.push(self.skills(skills)),
            SectionEntries::Education(entries) => {
                children.extend(entries.iter().map(|e| self.education(e)));
            }
            SectionEntries::Experience(entries) => {
                let entry_type = match kind {
                    Some(SectionKind::Research) => NodeType::ResearchEntry,
                    _ => NodeType::WorkEntry,
                };
                children.extend(entries.iter().map(|e| self.experience(entry_type, e)));
            }
            SectionEntries::Highlights(entries) => {
                let entry_type = match kind {
                    Some(SectionKind::Leadership) => NodeType::LeadershipEntry,
                    _ => NodeType::ProjectEntry,
                };
                children.extend(entries.iter().map(|e| highlight(entry_type, e)));
            }
            SectionEntries::Unrecognized(entries) => {
                tracing::warn!(
                    title = %section.title.plain_text(),
                    dropped = entries.len(),
                    "unrecognized section kind, emitting title only"
                );
            }
        }

        let mut fragment = Fragment::node(NodeType::ResumeSection, children)
            .with_attr("sectionType", section.title.plain_text());
        if let Some(explicit) = section.kind {
            fragment = fragment.with_attr("sectionKind", explicit.name());
        }
        fragment
    }

    /// One line of skills. A skill holding the delimiter splits in two on extraction.
    fn skills(&self, skills: &[String]) -> Fragment {
        let delimiter = self.config.skills_delimiter();
        if let Some(skill) = skills.iter().find(|s| s.contains(delimiter)) {
            tracing::warn!(%skill, delimiter, "skill contains the skills delimiter");
        }
        let line = skills.join(self.config.skills_separator.as_str());
        let runs = RichText::Markup(line).runs();
        Fragment::node(
            NodeType::SkillsEntry,
            vec![Fragment::paragraph(runs.into_iter().map(Fragment::text).collect())],
        )
    }

    fn education(&self, entry: &EducationEntry) -> Fragment {
        let mut children = vec![self.entry_header(
            Some(&entry.school),
            None,
            entry.location.as_ref(),
            entry.dates.as_ref(),
        )];
        children.extend(entry.degrees.iter().map(degree));
        Fragment::node(NodeType::EducationEntry, children)
    }

    fn experience(&self, entry_type: NodeType, entry: &ExperienceEntry) -> Fragment {
        let company = Some(&entry.company);
        let children = match entry.positions.as_slice() {
            [] => vec![
                self.entry_header(company, None, None, None),
                Fragment::leaf(NodeType::BulletList),
            ],
            [position] => vec![
                self.entry_header(
                    company,
                    position.title.as_ref(),
                    position.location.as_ref(),
                    position.dates.as_ref(),
                ),
                bullet_list(&position.bullets),
            ],
            positions => self.nested_positions(&entry.company, positions),
        };
        Fragment::node(entry_type, children)
    }

    /// Header with shared fields, then one `positionEntry` per position.
    fn nested_positions(&self, company: &RichText, positions: &[Position]) -> Vec<Fragment> {
        let distinct: BTreeSet<String> = positions
            .iter()
            .filter_map(|p| p.location.as_ref())
            .map(|l| l.plain_text().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        let hoisted = distinct.len() == 1;

        let mut header = vec![self.required(NodeType::Institution, Some(company))];
        if !distinct.is_empty() {
            let shared = positions
                .iter()
                .filter_map(|p| p.location.as_ref())
                .find(|l| !l.is_blank())
                .filter(|_| hoisted);
            header.push(match shared {
                Some(location) => field(NodeType::Location, location),
                None => Fragment::leaf(NodeType::Location),
            });
        }
        header.push(match &positions[0].dates {
            Some(dates) => field(NodeType::Date, dates),
            None => Fragment::leaf(NodeType::Date),
        });

        let mut children = vec![Fragment::node(NodeType::EntryTitleHeader, header)];
        children.extend(positions.iter().map(|p| position_entry(p, hoisted)));
        children
    }

    /// `institution positionTitle? location date`, with placeholders.
    fn entry_header(
        &self,
        institution: Option<&RichText>,
        title: Option<&RichText>,
        location: Option<&RichText>,
        dates: Option<&RichText>,
    ) -> Fragment {
        let mut children = vec![self.required(NodeType::Institution, institution)];
        if let Some(title) = present(title) {
            children.push(field(NodeType::PositionTitle, title));
        }
        children.push(self.required(NodeType::Location, location));
        children.push(self.required(NodeType::Date, dates));
        Fragment::node(NodeType::EntryTitleHeader, children)
    }

    /// A header field that falls back to its placeholder when absent or blank.
    fn required(&self, kind: NodeType, value: Option<&RichText>) -> Fragment {
        match present(value) {
            Some(value) => field(kind, value),
            None => {
                let placeholder = self.placeholders().for_field(kind).unwrap_or_default();
                Fragment::field(kind, vec![Run::plain(placeholder)])
            }
        }
    }
}

fn present(value: Option<&RichText>) -> Option<&RichText> {
    value.filter(|v| !v.is_blank())
}

/// Inline-text container holding the decoded runs of `text`.
fn field(kind: NodeType, text: &RichText) -> Fragment {
    Fragment::node(kind, text_children(text))
}

fn text_children(text: &RichText) -> Vec<Fragment> {
    text.runs().into_iter().map(Fragment::text).collect()
}

fn degree(degree: &Degree) -> Fragment {
    let optional = |kind, value: &Option<RichText>| match value {
        Some(v) => field(kind, v),
        None => Fragment::leaf(kind),
    };
    let header = Fragment::node(
        NodeType::DegreeHeader,
        vec![
            field(NodeType::DegreeType, &degree.degree_type),
            optional(NodeType::Major, &degree.major),
            optional(NodeType::Gpa, &degree.gpa),
        ],
    );

    let mut children = vec![header];
    if !degree.bullets.is_empty() {
        children.push(bullet_list(&degree.bullets));
    }
    Fragment::node(NodeType::Degree, children)
}

fn position_entry(position: &Position, location_hoisted: bool) -> Fragment {
    let title = match &position.title {
        Some(title) => field(NodeType::PositionTitle, title),
        None => Fragment::leaf(NodeType::PositionTitle),
    };
    let mut header = vec![title];
    if let Some(description) = present(position.description.as_ref()) {
        header.push(field(NodeType::PositionDescription, description));
    }
    if !location_hoisted && let Some(location) = present(position.location.as_ref()) {
        header.push(field(NodeType::Location, location));
    }
    if let Some(dates) = present(position.dates.as_ref()) {
        header.push(field(NodeType::Date, dates));
    }

    Fragment::node(
        NodeType::PositionEntry,
        vec![
            Fragment::node(NodeType::PositionEntryHeader, header),
            bullet_list(&position.bullets),
        ],
    )
    .with_attr("variant", "condensed")
}

fn bullet_list(bullets: &[RichText]) -> Fragment {
    Fragment::node(
        NodeType::BulletList,
        bullets
            .iter()
            .map(|b| {
                Fragment::node(
                    NodeType::ListItem,
                    vec![Fragment::paragraph(text_children(b))],
                )
            })
            .collect(),
    )
}

/// `[title, " - ", description...]` as one editable line.
fn highlight(entry_type: NodeType, entry: &HighlightEntry) -> Fragment {
    let mut line = vec![
        field(NodeType::EntryTitleSimple, &entry.title),
        Fragment::plain(" - "),
    ];
    if let Some(description) = &entry.description {
        line.extend(text_children(description));
    }

    let mut fragment = Fragment::node(entry_type, vec![Fragment::paragraph(line)])
        .with_attr("title", entry.title.plain_text());
    if entry_type == NodeType::ProjectEntry {
        fragment = fragment.with_attr("skills", entry.skills.clone());
    }
    fragment
}
