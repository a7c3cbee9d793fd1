//! End-to-end scenarios: building, editing, and extracting résumés.

use serde_json::json;

use vitae::model::{Fragment, NodeId, NodeType};
use vitae::record::{SectionEntries, SectionKind};
use vitae::service::{AnalyzeRequest, AnalyzeResponse};
use vitae::{Document, Error, Run, ResumeRecord, RichText, build_document, extract_record, validate};

fn build(value: serde_json::Value) -> Document {
    build_document(&ResumeRecord::from_value(value).expect("record should parse"))
}

fn first(doc: &Document, kind: NodeType) -> NodeId {
    doc.iter_dfs()
        .find(|&id| doc.kind(id) == Some(kind))
        .unwrap_or_else(|| panic!("no {kind} node"))
}

fn children(doc: &Document, id: NodeId) -> Vec<NodeType> {
    doc.child_types(id)
}

fn work_record(locations: [&str; 2]) -> serde_json::Value {
    json!({
        "personal": {"name": "A B"},
        "sections": [{"title": "Work Experience", "entries": [{
            "company": "Acme",
            "positions": [
                {"title": "Lead", "location": locations[0], "dates": "2022", "bullets": ["Shipped v2"]},
                {"title": "Dev", "location": locations[1], "dates": "2020", "bullets": ["Shipped v1"]}
            ]
        }]}]
    })
}

// ============================================================================
// Building
// ============================================================================

#[test]
fn test_skills_become_one_run() {
    let doc = build(json!({
        "personal": {"name": "A B"},
        "sections": [{"title": "Skills", "entries": ["Go", "SQL"]}]
    }));
    assert!(validate(&doc).is_empty());

    let skills = first(&doc, NodeType::SkillsEntry);
    let paragraph = doc.child_of_type(skills, NodeType::Paragraph).unwrap();
    assert_eq!(doc.runs(paragraph), vec![Run::plain("Go, SQL")]);
}

#[test]
fn test_distinct_locations_stay_on_positions() {
    let doc = build(work_record(["NYC", "SF"]));
    assert!(validate(&doc).is_empty());

    let entry = first(&doc, NodeType::WorkEntry);
    let header = doc.child_of_type(entry, NodeType::EntryTitleHeader).unwrap();
    assert_eq!(
        children(&doc, header),
        vec![NodeType::Institution, NodeType::Location, NodeType::Date]
    );
    let institution = doc.child_of_type(header, NodeType::Institution).unwrap();
    assert_eq!(doc.plain_text(institution), "Acme");
    let location = doc.child_of_type(header, NodeType::Location).unwrap();
    assert_eq!(doc.plain_text(location), "");

    let positions: Vec<_> = doc.children_of_type(entry, NodeType::PositionEntry).collect();
    assert_eq!(positions.len(), 2);
    for (position, expected) in positions.iter().zip(["NYC", "SF"]) {
        let list = doc.child_of_type(*position, NodeType::BulletList).unwrap();
        assert_eq!(children(&doc, list), vec![NodeType::ListItem]);

        let pos_header = doc
            .child_of_type(*position, NodeType::PositionEntryHeader)
            .unwrap();
        let location = doc.child_of_type(pos_header, NodeType::Location).unwrap();
        assert_eq!(doc.plain_text(location), expected);
    }
}

#[test]
fn test_shared_location_is_hoisted() {
    let doc = build(work_record(["NYC", "NYC"]));
    let entry = first(&doc, NodeType::WorkEntry);
    let header = doc.child_of_type(entry, NodeType::EntryTitleHeader).unwrap();
    let location = doc.child_of_type(header, NodeType::Location).unwrap();
    assert_eq!(doc.plain_text(location), "NYC");

    for position in doc.children_of_type(entry, NodeType::PositionEntry) {
        let pos_header = doc
            .child_of_type(position, NodeType::PositionEntryHeader)
            .unwrap();
        assert!(doc.child_of_type(pos_header, NodeType::Location).is_none());
    }

    // Both positions read the shared location back
    let record = extract_record(&doc);
    let SectionEntries::Experience(entries) = &record.sections[0].entries else {
        panic!("expected experience entries");
    };
    for position in &entries[0].positions {
        assert_eq!(position.location, Some(RichText::from("NYC")));
    }
}

#[test]
fn test_missing_location_gets_placeholder() {
    let doc = build(json!({
        "personal": {"name": "A B"},
        "sections": [{"title": "Education", "entries": [{
            "school": "State U", "dates": "2018", "degrees": [{"degreeType": "B.S."}]
        }]}]
    }));
    assert!(validate(&doc).is_empty());

    let header = first(&doc, NodeType::EntryTitleHeader);
    assert_eq!(
        children(&doc, header),
        vec![NodeType::Institution, NodeType::Location, NodeType::Date]
    );
    let location = doc.child_of_type(header, NodeType::Location).unwrap();
    assert_eq!(doc.plain_text(location), "Location...");

    let record = extract_record(&doc);
    let SectionEntries::Education(entries) = &record.sections[0].entries else {
        panic!("expected education entries");
    };
    assert_eq!(entries[0].location, None);
}

#[test]
fn test_flat_work_entry_keeps_its_position() {
    let doc = build(json!({
        "personal": {"name": "A B"},
        "sections": [{"title": "Work", "entries": [{
            "company": "Acme", "title": "Dev", "location": "NYC", "dates": "2020",
            "bullets": ["shipped", "led"]
        }]}]
    }));
    assert!(validate(&doc).is_empty());

    let list = first(&doc, NodeType::BulletList);
    assert_eq!(doc.child_types(list).len(), 2);

    let record = extract_record(&doc);
    let SectionEntries::Experience(entries) = &record.sections[0].entries else {
        panic!("expected experience entries");
    };
    let position = &entries[0].positions[0];
    assert_eq!(position.title, Some(RichText::from("Dev")));
    assert_eq!(position.location, Some(RichText::from("NYC")));
    assert_eq!(position.bullets.len(), 2);
}

#[test]
fn test_unrecognized_section_keeps_title_only() {
    let doc = build(json!({
        "personal": {"name": "A B"},
        "sections": [{"title": "Hobbies", "entries": [{"name": "chess"}]}]
    }));
    assert!(validate(&doc).is_empty());
    let section = first(&doc, NodeType::ResumeSection);
    assert_eq!(children(&doc, section), vec![NodeType::SectionTitle]);
}

#[test]
fn test_explicit_kind_survives_retitling() {
    let mut doc = build(json!({
        "personal": {"name": "A B"},
        "sections": [{"title": "Things I Built", "kind": "project", "entries": [
            {"title": "Compiler", "description": "A toy compiler"}
        ]}]
    }));
    assert_eq!(doc.child_types(first(&doc, NodeType::ResumeSection)).len(), 2);

    let title = first(&doc, NodeType::SectionTitle);
    let run = doc.children(title).next().unwrap();
    doc.set_text(run, "Side Quests").unwrap();

    let record = extract_record(&doc);
    assert_eq!(record.sections[0].kind, Some(SectionKind::Project));
    let SectionEntries::Highlights(entries) = &record.sections[0].entries else {
        panic!("expected highlight entries");
    };
    assert_eq!(entries[0].title, RichText::from("Compiler"));
    assert_eq!(entries[0].description, Some(RichText::from("A toy compiler")));
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_added_bullet_is_extracted() {
    let mut doc = build(work_record(["NYC", "SF"]));
    let list = first(&doc, NodeType::BulletList);
    let item = Fragment::node(
        NodeType::ListItem,
        vec![Fragment::paragraph(vec![Fragment::plain("Mentored interns")])],
    );
    doc.append_child(list, &item).unwrap();
    assert!(validate(&doc).is_empty());

    let record = extract_record(&doc);
    let SectionEntries::Experience(entries) = &record.sections[0].entries else {
        panic!("expected experience entries");
    };
    assert_eq!(
        entries[0].positions[0].bullets,
        vec![RichText::from("Shipped v2"), RichText::from("Mentored interns")]
    );
    assert_eq!(entries[0].positions[1].bullets.len(), 1);
}

#[test]
fn test_invalid_edit_is_rejected() {
    let mut doc = build(work_record(["NYC", "SF"]));
    let before = doc.to_fragment();
    let list = first(&doc, NodeType::BulletList);

    let err = doc
        .append_child(list, &Fragment::plain("loose text"))
        .unwrap_err();
    assert!(matches!(err, Error::Structure(_)));
    assert_eq!(doc.to_fragment(), before);
}

#[test]
fn test_removed_header_extracts_blank() {
    // Trees loaded from outside may break the grammar; extraction still succeeds
    let tree = json!({"type": "doc", "content": [
        {"type": "personalSection", "content": [
            {"type": "heading", "content": [{"type": "text", "text": "A B"}]},
            {"type": "separatorLine"}
        ]},
        {"type": "resumeSection", "content": [
            {"type": "sectionTitle", "content": [{"type": "text", "text": "Work"}]},
            {"type": "workEntry", "content": [{"type": "bulletList"}]}
        ]}
    ]});
    let doc = Document::from_value(tree).unwrap();
    assert!(!validate(&doc).is_empty());

    let record = extract_record(&doc);
    let SectionEntries::Experience(entries) = &record.sections[0].entries else {
        panic!("expected experience entries");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].company, RichText::default());
    assert!(entries[0].positions.is_empty());
}

// ============================================================================
// Matching service exchange
// ============================================================================

#[test]
fn test_service_exchange() {
    let doc = build(work_record(["NYC", "SF"]));
    let request = AnalyzeRequest::new(&doc, "Senior Rust engineer");
    assert!(request.resume_html.contains("<li>Shipped v2</li>"));

    let response: AnalyzeResponse = serde_json::from_value(json!({
        "document": serde_json::to_value(doc.to_fragment()).unwrap(),
        "mappings": [{"jd_phrase": "Senior", "resume_phrase": "Lead"}]
    }))
    .unwrap();
    let replaced = response.document.into_document().unwrap();
    assert_eq!(replaced.to_fragment(), doc.to_fragment());
    assert_eq!(response.mappings[0].resume_phrase, "Lead");
}
