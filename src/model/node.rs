//! Node types and arena node records.

use serde::{Deserialize, Serialize};

use super::inline::MarkSet;

/// Unique identifier for a node within a [`Document`](super::Document).
///
/// Ids are arena indices: they stay valid for the lifetime of the document
/// and are never reused, even after the node is unlinked by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root `doc` node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// Closed vocabulary of node types.
///
/// Names serialize in the editor's camelCase form (`resumeSection`,
/// `entryTitleHeader`, ...). The allowed children of each type are declared
/// in [`crate::schema`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    /// Document root: personal block followed by sections.
    Doc,
    /// Name, summary, divider and contacts.
    PersonalSection,
    /// The candidate's name.
    Heading,
    /// Block of inline content.
    Paragraph,
    /// Horizontal divider under the personal block.
    SeparatorLine,
    /// Container for contact details.
    ContactRow,
    /// One contact; `type`/`value` live in attributes.
    ContactDetail,
    /// A titled résumé section.
    ResumeSection,
    /// First child of a section.
    SectionTitle,
    /// All degrees earned at one school.
    EducationEntry,
    /// All positions held at one employer.
    WorkEntry,
    /// All positions held at one research institution.
    ResearchEntry,
    /// One project line (title + description).
    ProjectEntry,
    /// One leadership line (title + description).
    LeadershipEntry,
    /// The comma-separated skills line.
    SkillsEntry,
    /// One position within a multi-position work/research entry.
    PositionEntry,
    /// Header of a position: title, description, location, date.
    PositionEntryHeader,
    PositionTitle,
    PositionDescription,
    /// Inline title inside a project/leadership line.
    EntryTitleSimple,
    /// Header of an entry: institution, title, location, date.
    EntryTitleHeader,
    Institution,
    Location,
    Date,
    /// One degree within an education entry.
    Degree,
    /// Degree type, major and GPA in strict order.
    DegreeHeader,
    DegreeType,
    Major,
    Gpa,
    BulletList,
    ListItem,
    /// Leaf text run. Carries text and marks, never children.
    Text,
}

impl NodeType {
    /// All node types, in declaration order.
    pub const ALL: [NodeType; 32] = [
        NodeType::Doc,
        NodeType::PersonalSection,
        NodeType::Heading,
        NodeType::Paragraph,
        NodeType::SeparatorLine,
        NodeType::ContactRow,
        NodeType::ContactDetail,
        NodeType::ResumeSection,
        NodeType::SectionTitle,
        NodeType::EducationEntry,
        NodeType::WorkEntry,
        NodeType::ResearchEntry,
        NodeType::ProjectEntry,
        NodeType::LeadershipEntry,
        NodeType::SkillsEntry,
        NodeType::PositionEntry,
        NodeType::PositionEntryHeader,
        NodeType::PositionTitle,
        NodeType::PositionDescription,
        NodeType::EntryTitleSimple,
        NodeType::EntryTitleHeader,
        NodeType::Institution,
        NodeType::Location,
        NodeType::Date,
        NodeType::Degree,
        NodeType::DegreeHeader,
        NodeType::DegreeType,
        NodeType::Major,
        NodeType::Gpa,
        NodeType::BulletList,
        NodeType::ListItem,
        NodeType::Text,
    ];

    /// The editor's name for this type.
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Doc => "doc",
            NodeType::PersonalSection => "personalSection",
            NodeType::Heading => "heading",
            NodeType::Paragraph => "paragraph",
            NodeType::SeparatorLine => "separatorLine",
            NodeType::ContactRow => "contactRow",
            NodeType::ContactDetail => "contactDetail",
            NodeType::ResumeSection => "resumeSection",
            NodeType::SectionTitle => "sectionTitle",
            NodeType::EducationEntry => "educationEntry",
            NodeType::WorkEntry => "workEntry",
            NodeType::ResearchEntry => "researchEntry",
            NodeType::ProjectEntry => "projectEntry",
            NodeType::LeadershipEntry => "leadershipEntry",
            NodeType::SkillsEntry => "skillsEntry",
            NodeType::PositionEntry => "positionEntry",
            NodeType::PositionEntryHeader => "positionEntryHeader",
            NodeType::PositionTitle => "positionTitle",
            NodeType::PositionDescription => "positionDescription",
            NodeType::EntryTitleSimple => "entryTitleSimple",
            NodeType::EntryTitleHeader => "entryTitleHeader",
            NodeType::Institution => "institution",
            NodeType::Location => "location",
            NodeType::Date => "date",
            NodeType::Degree => "degree",
            NodeType::DegreeHeader => "degreeHeader",
            NodeType::DegreeType => "degreeType",
            NodeType::Major => "major",
            NodeType::Gpa => "gpa",
            NodeType::BulletList => "bulletList",
            NodeType::ListItem => "listItem",
            NodeType::Text => "text",
        }
    }

    /// Look up a type by its editor name.
    pub fn from_name(name: &str) -> Option<NodeType> {
        NodeType::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether this type holds editable inline text (`text*`).
    pub fn is_inline_field(self) -> bool {
        matches!(
            self,
            NodeType::Heading
                | NodeType::SectionTitle
                | NodeType::PositionTitle
                | NodeType::PositionDescription
                | NodeType::EntryTitleSimple
                | NodeType::Institution
                | NodeType::Location
                | NodeType::Date
                | NodeType::DegreeType
                | NodeType::Major
                | NodeType::Gpa
        )
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Range into the document's shared text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    /// Byte offset into the buffer.
    pub start: u32,
    /// Length in bytes.
    pub len: u32,
}

impl TextRange {
    /// Create a new text range.
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Check if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the end offset.
    pub fn end(&self) -> u32 {
        self.start + self.len
    }
}

/// A node in the arena.
///
/// Tree shape uses the parent / first-child / next-sibling representation.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeType,
    /// Parent node (None for root and for unlinked nodes).
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Formatting marks (text runs only).
    pub marks: MarkSet,
    /// Text content range (text runs only).
    pub text: TextRange,
}

impl Node {
    /// Create a new node with no links.
    pub fn new(kind: NodeType) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            next_sibling: None,
            marks: MarkSet::EMPTY,
            text: TextRange::default(),
        }
    }

    /// Create a text run node.
    pub fn text(range: TextRange, marks: MarkSet) -> Self {
        Self {
            marks,
            text: range,
            ..Self::new(NodeType::Text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup_covers_vocabulary() {
        for kind in NodeType::ALL {
            assert_eq!(NodeType::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NodeType::from_name("table"), None);
    }

    #[test]
    fn test_serde_name_matches_editor_name() {
        for kind in NodeType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }
}
