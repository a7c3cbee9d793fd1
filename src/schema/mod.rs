//! Content Model Registry.
//!
//! Every node type has one grammar over the types of its children, declared
//! in a single flat table. A generic validator checks documents against that
//! table; nothing about allowed children lives on the node types themselves.
//!
//! Validation is structural only: child type, cardinality and order. It
//! never looks at attribute values or text.
//!
//! ```
//! use vitae::model::NodeType;
//! use vitae::schema::{children_allowed, is_allowed};
//!
//! assert_eq!(
//!     children_allowed(NodeType::EntryTitleHeader).to_string(),
//!     "institution positionTitle? location? date"
//! );
//! assert!(is_allowed(
//!     NodeType::DegreeHeader,
//!     &[NodeType::DegreeType, NodeType::Major, NodeType::Gpa]
//! ));
//! ```

mod matcher;

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::model::{Document, Fragment, NodeId, NodeType};

pub use matcher::matches;

/// A grammar over child type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// No children.
    Empty,
    Node(NodeType),
    Seq(Vec<Expr>),
    Choice(Vec<Expr>),
    Repeat {
        expr: Box<Expr>,
        min: usize,
        max: Option<usize>,
    },
}

impl Expr {
    pub fn node(kind: NodeType) -> Self {
        Expr::Node(kind)
    }

    pub fn seq(items: Vec<Expr>) -> Self {
        Expr::Seq(items)
    }

    pub fn choice(alternatives: Vec<Expr>) -> Self {
        Expr::Choice(alternatives)
    }

    /// Zero or one.
    pub fn opt(expr: Expr) -> Self {
        Expr::Repeat {
            expr: Box::new(expr),
            min: 0,
            max: Some(1),
        }
    }

    /// Zero or more.
    pub fn star(expr: Expr) -> Self {
        Expr::Repeat {
            expr: Box::new(expr),
            min: 0,
            max: None,
        }
    }

    /// One or more.
    pub fn plus(expr: Expr) -> Self {
        Expr::Repeat {
            expr: Box::new(expr),
            min: 1,
            max: None,
        }
    }

    /// Whether the grammar accepts a node with no children.
    pub fn accepts_empty(&self) -> bool {
        matches(self, &[])
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Empty => Ok(()),
            Expr::Node(kind) => f.write_str(kind.name()),
            Expr::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match item {
                        Expr::Seq(_) => write!(f, "({item})")?,
                        _ => write!(f, "{item}")?,
                    }
                }
                Ok(())
            }
            Expr::Choice(alternatives) => {
                f.write_str("(")?;
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alt}")?;
                }
                f.write_str(")")
            }
            Expr::Repeat { expr, min, max } => {
                match expr.as_ref() {
                    Expr::Seq(_) => write!(f, "({expr})")?,
                    _ => write!(f, "{expr}")?,
                }
                match (min, max) {
                    (0, Some(1)) => f.write_str("?"),
                    (0, None) => f.write_str("*"),
                    (1, None) => f.write_str("+"),
                    (min, None) => write!(f, "{{{min},}}"),
                    (min, Some(max)) => write!(f, "{{{min},{max}}}"),
                }
            }
        }
    }
}

fn registry() -> &'static HashMap<NodeType, Expr> {
    static REGISTRY: OnceLock<HashMap<NodeType, Expr>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> HashMap<NodeType, Expr> {
    use NodeType::*;

    let node = Expr::node;
    let text_only = || Expr::star(node(Text));

    let mut rules = HashMap::new();

    rules.insert(
        Doc,
        Expr::seq(vec![node(PersonalSection), Expr::star(node(ResumeSection))]),
    );
    rules.insert(
        PersonalSection,
        Expr::seq(vec![
            node(Heading),
            Expr::opt(node(Paragraph)),
            node(SeparatorLine),
            Expr::opt(node(ContactRow)),
        ]),
    );
    rules.insert(ContactRow, Expr::plus(node(ContactDetail)));
    rules.insert(
        ResumeSection,
        Expr::seq(vec![
            node(SectionTitle),
            Expr::opt(Expr::choice(
                [
                    EducationEntry,
                    WorkEntry,
                    ResearchEntry,
                    ProjectEntry,
                    LeadershipEntry,
                    SkillsEntry,
                ]
                .into_iter()
                .map(|kind| Expr::plus(node(kind)))
                .collect(),
            )),
        ]),
    );
    rules.insert(
        Paragraph,
        Expr::star(Expr::choice(vec![node(Text), node(EntryTitleSimple)])),
    );
    rules.insert(
        EducationEntry,
        Expr::seq(vec![node(EntryTitleHeader), Expr::star(node(Degree))]),
    );
    rules.insert(
        Degree,
        Expr::seq(vec![node(DegreeHeader), Expr::opt(node(BulletList))]),
    );
    rules.insert(
        DegreeHeader,
        Expr::seq(vec![node(DegreeType), node(Major), node(Gpa)]),
    );

    let experience = || {
        Expr::seq(vec![
            node(EntryTitleHeader),
            Expr::choice(vec![node(BulletList), Expr::plus(node(PositionEntry))]),
        ])
    };
    rules.insert(WorkEntry, experience());
    rules.insert(ResearchEntry, experience());

    rules.insert(
        PositionEntry,
        Expr::seq(vec![node(PositionEntryHeader), node(BulletList)]),
    );
    rules.insert(
        PositionEntryHeader,
        Expr::seq(vec![
            node(PositionTitle),
            Expr::opt(node(PositionDescription)),
            Expr::opt(node(Location)),
            Expr::opt(node(Date)),
        ]),
    );
    rules.insert(
        EntryTitleHeader,
        Expr::seq(vec![
            node(Institution),
            Expr::opt(node(PositionTitle)),
            Expr::opt(node(Location)),
            node(Date),
        ]),
    );

    for line in [ProjectEntry, LeadershipEntry, SkillsEntry, ListItem] {
        rules.insert(line, node(Paragraph));
    }
    rules.insert(BulletList, Expr::star(node(ListItem)));

    for kind in NodeType::ALL.into_iter().filter(|k| k.is_inline_field()) {
        rules.insert(kind, text_only());
    }
    for leaf in [ContactDetail, SeparatorLine, Text] {
        rules.insert(leaf, Expr::Empty);
    }

    rules
}

/// The grammar a node type's children must satisfy.
pub fn children_allowed(kind: NodeType) -> &'static Expr {
    static EMPTY: Expr = Expr::Empty;
    registry().get(&kind).unwrap_or(&EMPTY)
}

/// Whether `children` is a valid child sequence for a `parent` node.
pub fn is_allowed(parent: NodeType, children: &[NodeType]) -> bool {
    matches(children_allowed(parent), children)
}

/// A node whose children do not match its type's grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offending node (for detached fragments, its pre-order index).
    pub node: NodeId,
    /// Type path from the root, e.g. `doc/resumeSection[1]/workEntry[0]`.
    pub path: String,
    pub kind: NodeType,
    /// Expected grammar, in content-expression notation.
    pub expected: String,
    /// Actual child type sequence.
    pub actual: Vec<NodeType>,
}

impl Violation {
    fn new(node: NodeId, path: String, kind: NodeType, actual: Vec<NodeType>) -> Self {
        Self {
            node,
            path,
            kind,
            expected: children_allowed(kind).to_string(),
            actual,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actual: Vec<&str> = self.actual.iter().map(|k| k.name()).collect();
        let expected = if self.expected.is_empty() {
            "(empty)"
        } else {
            &self.expected
        };
        let actual = if actual.is_empty() {
            "(empty)".to_string()
        } else {
            actual.join(" ")
        };
        write!(f, "{}: expected `{expected}`, found `{actual}`", self.path)
    }
}

/// Validate the whole document. Returns every violation, in document order.
pub fn validate(doc: &Document) -> Vec<Violation> {
    validate_node(doc, doc.root())
}

/// Validate the subtree rooted at `id`.
pub fn validate_node(doc: &Document, id: NodeId) -> Vec<Violation> {
    doc.iter_dfs_from(id)
        .filter_map(|node_id| {
            let kind = doc.kind(node_id)?;
            let actual = doc.child_types(node_id);
            (!is_allowed(kind, &actual))
                .then(|| Violation::new(node_id, doc.path(node_id), kind, actual))
        })
        .collect()
}

/// Validate a detached fragment.
pub fn validate_fragment(fragment: &Fragment) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut counter = 0;
    walk_fragment(fragment, fragment.kind.name().to_string(), &mut counter, &mut violations);
    violations
}

fn walk_fragment(
    fragment: &Fragment,
    path: String,
    counter: &mut u32,
    violations: &mut Vec<Violation>,
) {
    let id = NodeId(*counter);
    *counter += 1;

    let actual = fragment.child_types();
    if !is_allowed(fragment.kind, &actual) {
        violations.push(Violation::new(id, path.clone(), fragment.kind, actual));
    }

    let mut seen: HashMap<NodeType, usize> = HashMap::new();
    for child in &fragment.children {
        let index = seen.entry(child.kind).or_default();
        let child_path = format!("{path}/{}[{index}]", child.kind);
        *index += 1;
        walk_fragment(child, child_path, counter, violations);
    }
}

/// Check a proposed child sequence for an existing node before an edit applies it.
pub(crate) fn check_children(doc: &Document, parent: NodeId, proposed: Vec<NodeType>) -> Result<()> {
    let kind = doc.kind(parent).ok_or(Error::NodeNotFound(parent.0))?;
    if is_allowed(kind, &proposed) {
        Ok(())
    } else {
        Err(Error::Structure(vec![Violation::new(
            parent,
            doc.path(parent),
            kind,
            proposed,
        )]))
    }
}

/// Validate and convert violations into an error.
pub fn check(doc: &Document) -> Result<()> {
    let violations = validate(doc);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Structure(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fragment, Run};

    #[test]
    fn test_every_type_has_a_rule() {
        for kind in NodeType::ALL {
            assert!(registry().contains_key(&kind), "missing rule for {kind}");
        }
    }

    #[test]
    fn test_grammar_notation() {
        assert_eq!(
            children_allowed(NodeType::WorkEntry).to_string(),
            "entryTitleHeader (bulletList | positionEntry+)"
        );
        assert_eq!(
            children_allowed(NodeType::ResumeSection).to_string(),
            "sectionTitle (educationEntry+ | workEntry+ | researchEntry+ | projectEntry+ | leadershipEntry+ | skillsEntry+)?"
        );
        assert_eq!(children_allowed(NodeType::Institution).to_string(), "text*");
        assert_eq!(children_allowed(NodeType::Text).to_string(), "");
    }

    #[test]
    fn test_permissive_containers_accept_empty() {
        assert!(children_allowed(NodeType::SectionTitle).accepts_empty());
        assert!(children_allowed(NodeType::Paragraph).accepts_empty());
        assert!(children_allowed(NodeType::BulletList).accepts_empty());
        assert!(!children_allowed(NodeType::EntryTitleHeader).accepts_empty());
        assert!(!children_allowed(NodeType::ContactRow).accepts_empty());
    }

    #[test]
    fn test_validate_reports_path_and_sequence() {
        let doc = Document::from_fragment(&Fragment::node(
            NodeType::Doc,
            vec![Fragment::node(
                NodeType::PersonalSection,
                vec![
                    Fragment::field(NodeType::Heading, vec![Run::plain("A B")]),
                    Fragment::leaf(NodeType::ContactRow),
                ],
            )],
        ))
        .unwrap();

        let violations = validate(&doc);
        assert_eq!(violations.len(), 2);

        assert_eq!(violations[0].path, "doc/personalSection[0]");
        assert_eq!(
            violations[0].actual,
            vec![NodeType::Heading, NodeType::ContactRow]
        );
        assert_eq!(
            violations[0].expected,
            "heading paragraph? separatorLine contactRow?"
        );

        assert_eq!(violations[1].path, "doc/personalSection[0]/contactRow[0]");
        assert_eq!(
            violations[1].to_string(),
            "doc/personalSection[0]/contactRow[0]: expected `contactDetail+`, found `(empty)`"
        );

        assert!(matches!(check(&doc), Err(Error::Structure(v)) if v.len() == 2));
    }

    #[test]
    fn test_text_runs_cannot_have_children() {
        let mut run = Fragment::plain("x");
        run.children.push(Fragment::plain("y"));
        let heading = Fragment::node(NodeType::Heading, vec![run]);

        let violations = validate_fragment(&heading);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "heading/text[0]");
    }
}
