//! Record → tree → record tests against a complete résumé fixture.

use proptest::prelude::*;
use serde_json::{Value, json};

use vitae::model::{Fragment, NodeType};
use vitae::record::{SectionEntries, SectionKind};
use vitae::{
    AdapterConfig, Document, Mark, ResumeRecord, RichText, build_document, extract_record,
    validate,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_record() -> ResumeRecord {
    let json = std::fs::read_to_string(format!("{FIXTURES_DIR}/resume.json"))
        .expect("Failed to read fixture");
    ResumeRecord::from_json(&json).expect("Failed to parse fixture")
}

fn count(doc: &Document, kind: NodeType) -> usize {
    doc.iter_dfs()
        .filter(|&id| doc.kind(id) == Some(kind))
        .count()
}

// ============================================================================
// Tree shape
// ============================================================================

#[test]
fn test_fixture_builds_valid_tree() {
    let doc = build_document(&fixture_record());
    let violations = validate(&doc);
    assert!(violations.is_empty(), "violations: {violations:?}");

    assert_eq!(count(&doc, NodeType::ResumeSection), 6);
    assert_eq!(count(&doc, NodeType::EducationEntry), 1);
    assert_eq!(count(&doc, NodeType::Degree), 2);
    assert_eq!(count(&doc, NodeType::WorkEntry), 2);
    assert_eq!(count(&doc, NodeType::ResearchEntry), 1);
    // Acme (2) + Systems Lab (2); Initech is flattened
    assert_eq!(count(&doc, NodeType::PositionEntry), 4);
    assert_eq!(count(&doc, NodeType::ProjectEntry), 2);
    assert_eq!(count(&doc, NodeType::LeadershipEntry), 1);
    assert_eq!(count(&doc, NodeType::SkillsEntry), 1);
    assert_eq!(count(&doc, NodeType::ContactDetail), 3);
}

#[test]
fn test_fixture_tree_json_reloads() {
    let doc = build_document(&fixture_record());
    let json = doc.to_json().unwrap();
    let reloaded = Document::from_json(&json).unwrap();
    assert_eq!(reloaded.to_fragment(), doc.to_fragment());
    assert_eq!(reloaded.node_count(), doc.node_count());
}

// ============================================================================
// Record fidelity
// ============================================================================

#[test]
fn test_fixture_round_trip_is_stable() {
    let record = fixture_record();
    let doc = build_document(&record);
    let extracted = extract_record(&doc);

    // Formatted bullets come back as runs, so compare the trees they build
    assert_eq!(build_document(&extracted).to_fragment(), doc.to_fragment());
    assert_eq!(extract_record(&build_document(&extracted)), extracted);
}

#[test]
fn test_fixture_round_trip_values() {
    let record = fixture_record();
    let extracted = extract_record(&build_document(&record));

    assert_eq!(extracted.personal, record.personal);
    assert_eq!(extracted.sections.len(), record.sections.len());
    for (got, want) in extracted.sections.iter().zip(&record.sections) {
        assert_eq!(got.title, want.title);
        assert_eq!(got.resolved_kind(), want.resolved_kind());
    }

    // Education, projects, leadership and skills are all plain text
    for i in [0, 3, 4, 5] {
        assert_eq!(extracted.sections[i], record.sections[i], "section {i}");
    }

    let SectionEntries::Experience(work) = &extracted.sections[1].entries else {
        panic!("expected experience entries");
    };
    let acme = &work[0];
    assert_eq!(acme.positions.len(), 2);
    assert_eq!(acme.positions[1].location, Some(RichText::from("NYC")));
    assert_eq!(acme.positions[0].dates, Some(RichText::from("2021 - Present")));

    let latency = acme.positions[0].bullets[1].runs();
    assert_eq!(latency.len(), 2);
    assert_eq!(latency[0].text, "Cut p99 latency by ");
    assert_eq!(latency[1].text, "40%");
    assert!(latency[1].marks.contains(Mark::Bold));
}

#[test]
fn test_research_positions_keep_own_locations() {
    let extracted = extract_record(&build_document(&fixture_record()));
    assert_eq!(extracted.sections[2].resolved_kind(), Some(SectionKind::Research));
    let SectionEntries::Experience(lab) = &extracted.sections[2].entries else {
        panic!("expected experience entries");
    };
    let locations: Vec<_> = lab[0]
        .positions
        .iter()
        .map(|p| p.location.as_ref().map(RichText::plain_text))
        .collect();
    assert_eq!(
        locations,
        vec![Some("Springfield".to_string()), Some("Zurich".to_string())]
    );
}

#[test]
fn test_custom_placeholders_round_trip() {
    let config: AdapterConfig = serde_json::from_str(
        r#"{"placeholders": {"institution": "TBD", "location": "-", "dates": "?"}}"#,
    )
    .unwrap();
    let record = ResumeRecord::from_json(
        r#"{"personal": {"name": "A"}, "sections": [{"title": "Education", "entries": [{"degrees": []}]}]}"#,
    )
    .unwrap();

    let doc = vitae::build_document_with(&record, &config);
    let header = doc
        .iter_dfs()
        .find(|&id| doc.kind(id) == Some(NodeType::EntryTitleHeader))
        .unwrap();
    assert_eq!(doc.plain_text(header), "TBD-?");
    assert_eq!(vitae::extract_record_with(&doc, &config), record);
}

// ============================================================================
// Generated records
// ============================================================================

/// Field text: never blank, sometimes bold, with stray `&`, `<` and `,`.
fn text() -> impl Strategy<Value = String> {
    let plain = "[A-Za-z][A-Za-z0-9 .,&<-]{0,12}";
    prop_oneof![
        3 => plain.prop_map(String::from),
        1 => plain.prop_map(|t| format!("<b>{t}</b>")),
    ]
}

fn opt_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(text())
}

fn bullets() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(text(), 0..3)
}

fn education() -> impl Strategy<Value = Value> {
    let degree = (text(), opt_text(), opt_text(), bullets()).prop_map(|(kind, major, gpa, bullets)| {
        json!({"degreeType": kind, "major": major, "gpa": gpa, "bullets": bullets})
    });
    (text(), opt_text(), opt_text(), proptest::collection::vec(degree, 0..3)).prop_map(
        |(school, location, dates, degrees)| {
            json!({"school": school, "location": location, "dates": dates, "degrees": degrees})
        },
    )
}

fn experience() -> impl Strategy<Value = Value> {
    // A titled position is never mistaken for an empty placeholder header
    let position = (text(), opt_text(), opt_text(), opt_text(), bullets()).prop_map(
        |(title, description, location, dates, bullets)| {
            json!({
                "title": title, "description": description,
                "location": location, "dates": dates, "bullets": bullets
            })
        },
    );
    (text(), proptest::collection::vec(position, 0..4))
        .prop_map(|(company, positions)| json!({"company": company, "positions": positions}))
}

fn highlight() -> impl Strategy<Value = Value> {
    (text(), opt_text(), proptest::collection::vec("[A-Za-z]{1,6}", 0..3)).prop_map(
        |(title, description, skills)| {
            json!({"title": title, "description": description, "skills": skills})
        },
    )
}

fn record_strategy() -> impl Strategy<Value = ResumeRecord> {
    let entries = |s: BoxedStrategy<Value>| proptest::collection::vec(s, 0..3);
    (
        text(),
        opt_text(),
        entries(education().boxed()),
        entries(experience().boxed()),
        entries(experience().boxed()),
        entries(highlight().boxed()),
        entries(highlight().boxed()),
        // No separator inside a single skill
        proptest::collection::vec("[A-Za-z+#&<]{1,8}", 0..6),
    )
        .prop_map(|(name, summary, education, work, research, projects, leadership, skills)| {
            ResumeRecord::from_value(json!({
                "personal": {"name": name, "summary": summary, "email": "a@b.c"},
                "sections": [
                    {"title": "Education", "kind": "education", "entries": education},
                    {"title": "Experience", "kind": "work", "entries": work},
                    {"title": "Research", "kind": "research", "entries": research},
                    {"title": "Projects", "kind": "project", "entries": projects},
                    {"title": "Leadership", "kind": "leadership", "entries": leadership},
                    {"title": "Skills", "kind": "skills", "entries": skills}
                ]
            }))
            .unwrap()
        })
}

/// Entry count per section, and bullet counts per entry.
fn shape(record: &ResumeRecord) -> Vec<(usize, Vec<usize>)> {
    record
        .sections
        .iter()
        .map(|section| {
            let bullets = match &section.entries {
                SectionEntries::Education(entries) => entries
                    .iter()
                    .flat_map(|e| e.degrees.iter().map(|d| d.bullets.len()))
                    .collect(),
                SectionEntries::Experience(entries) => entries
                    .iter()
                    .flat_map(|e| {
                        std::iter::once(e.positions.len())
                            .chain(e.positions.iter().map(|p| p.bullets.len()))
                    })
                    .collect(),
                _ => Vec::new(),
            };
            (section.entries.len(), bullets)
        })
        .collect()
}

proptest! {
    #[test]
    fn built_trees_satisfy_grammar(record in record_strategy()) {
        let doc = build_document(&record);
        prop_assert!(validate(&doc).is_empty());
        prop_assert!(vitae::schema::validate_fragment(&doc.to_fragment()).is_empty());
    }

    #[test]
    fn extraction_keeps_shape(record in record_strategy()) {
        let extracted = extract_record(&build_document(&record));
        prop_assert_eq!(shape(&extracted), shape(&record));
    }

    #[test]
    fn extraction_keeps_text(record in record_strategy()) {
        let extracted = extract_record(&build_document(&record));
        prop_assert_eq!(
            extracted.personal.name.plain_text(),
            record.personal.name.plain_text()
        );
        prop_assert_eq!(&extracted.sections[5].entries, &record.sections[5].entries);
    }

    #[test]
    fn extraction_is_a_fixed_point(record in record_strategy()) {
        let once = extract_record(&build_document(&record));
        let twice = extract_record(&build_document(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn fragments_reload_unchanged(record in record_strategy()) {
        let fragment: Fragment = vitae::adapter::build_fragment(&record, &AdapterConfig::default());
        let doc = Document::from_fragment(&fragment).unwrap();
        prop_assert_eq!(doc.to_fragment(), fragment);
    }
}
