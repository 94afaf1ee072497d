use super::*;

fn entries(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

// =============================================================================
// split_entries
// =============================================================================

#[test]
fn split_drops_blank_lines() {
    assert_eq!(split_entries("a\nb\n\nc"), entries(&["a", "b", "c"]));
}

#[test]
fn split_accepts_escaped_newlines() {
    assert_eq!(split_entries(r"a\nb\n\nc"), entries(&["a", "b", "c"]));
}

#[test]
fn split_accepts_crlf() {
    assert_eq!(split_entries("first\r\nsecond\r\n"), entries(&["first", "second"]));
}

#[test]
fn split_trims_each_entry() {
    assert_eq!(split_entries("  US 10,000,001  \n\t \n Widget "), entries(&["US 10,000,001", "Widget"]));
}

#[test]
fn split_empty_and_whitespace_only() {
    assert!(split_entries("").is_empty());
    assert!(split_entries(" \n \n\t").is_empty());
}

#[test]
fn split_keeps_other_text_opaque() {
    let line = r#"Smith, J. "On Widgets", Proc. ACM, 2021"#;
    assert_eq!(split_entries(line), entries(&[line]));
}

// =============================================================================
// from_document
// =============================================================================

#[test]
fn from_document_splits_every_kind() {
    let doc = Document::new("ada@uni.edu")
        .with_text("patents", "P1\nP2")
        .with_text("publications", "Pub1")
        .with_text("conferences", "")
        .with_text("events", "E1\n\nE2\nE3");
    let record = ContributionRecord::from_document(&doc);
    assert_eq!(record.email, "ada@uni.edu");
    assert_eq!(record.patents, entries(&["P1", "P2"]));
    assert_eq!(record.publications, entries(&["Pub1"]));
    assert!(record.conferences.is_empty());
    assert_eq!(record.events, entries(&["E1", "E2", "E3"]));
}

#[test]
fn from_document_missing_and_null_fields_are_empty() {
    let mut doc = Document::new("bob@uni.edu");
    doc.fields.insert("patents".into(), FieldValue::Null);
    doc.fields.insert("events".into(), FieldValue::Unsupported);
    let record = ContributionRecord::from_document(&doc);
    assert!(record.patents.is_empty());
    assert!(record.publications.is_empty());
    assert!(record.events.is_empty());
}

#[test]
fn from_document_flattens_list_fields() {
    let mut doc = Document::new("cy@uni.edu");
    doc.fields.insert(
        "publications".into(),
        FieldValue::List(entries(&["A", "  ", "B\nC"])),
    );
    let record = ContributionRecord::from_document(&doc);
    assert_eq!(record.publications, entries(&["A", "B", "C"]));
}

#[test]
fn from_document_ignores_unknown_fields() {
    let doc = Document::new("d@uni.edu").with_text("awards", "Best paper");
    assert_eq!(
        ContributionRecord::from_document(&doc),
        ContributionRecord { email: "d@uni.edu".into(), ..ContributionRecord::default() }
    );
}

#[test]
fn from_document_keeps_stored_text() {
    let stored = "  He said \"hi\" \n\nsecond\\nthird";
    let mut doc = Document::new("a@uni.edu").with_text("patents", stored);
    doc.fields
        .insert("events".into(), FieldValue::List(vec!["x".into(), "y".into()]));
    let record = ContributionRecord::from_document(&doc);

    assert_eq!(record.stored_text(ContributionKind::Patents), stored);
    assert_eq!(record.stored_text(ContributionKind::Events), "x\ny");
    assert_eq!(record.stored_text(ContributionKind::Publications), "");
    assert_eq!(record.patents, entries(&["He said \"hi\"", "second", "third"]));
}

#[test]
fn entries_maps_kind_to_field() {
    let record = ContributionRecord {
        email: "e@uni.edu".into(),
        patents: entries(&["p"]),
        publications: entries(&["u"]),
        conferences: entries(&["c"]),
        events: entries(&["e"]),
        ..ContributionRecord::default()
    };
    assert_eq!(record.entries(ContributionKind::Patents), ["p"]);
    assert_eq!(record.entries(ContributionKind::Publications), ["u"]);
    assert_eq!(record.entries(ContributionKind::Conferences), ["c"]);
    assert_eq!(record.entries(ContributionKind::Events), ["e"]);
}

// =============================================================================
// Preview
// =============================================================================

#[test]
fn preview_shows_all_when_three_or_fewer() {
    for n in 0..=PREVIEW_COUNT {
        let items: Vec<String> = (0..n).map(|i| format!("item {i}")).collect();
        let preview = Preview::of(&items);
        assert_eq!(preview.shown.len(), n);
        assert_eq!(preview.remaining, 0);
        assert!(!preview.has_more());
    }
}

#[test]
fn preview_counts_remainder_past_three() {
    let items: Vec<String> = (0..7).map(|i| format!("item {i}")).collect();
    let preview = Preview::of(&items);
    assert_eq!(preview.shown, &items[..3]);
    assert_eq!(preview.remaining, 4);
    assert!(preview.has_more());
}

// =============================================================================
// Tab / ContributionKind
// =============================================================================

#[test]
fn tab_parse_known_slugs() {
    assert_eq!(Tab::parse(Some("patents")), Tab::Kind(ContributionKind::Patents));
    assert_eq!(Tab::parse(Some("events")), Tab::Kind(ContributionKind::Events));
    assert_eq!(Tab::parse(Some("overview")), Tab::Overview);
}

#[test]
fn tab_parse_unknown_or_missing_is_overview() {
    assert_eq!(Tab::parse(None), Tab::Overview);
    assert_eq!(Tab::parse(Some("awards")), Tab::Overview);
    assert_eq!(Tab::parse(Some("Patents")), Tab::Overview);
}

#[test]
fn tab_slug_round_trips_through_parse() {
    for tab in Tab::ALL {
        assert_eq!(Tab::parse(Some(tab.slug())), tab);
    }
}

#[test]
fn kind_order_matches_export_columns() {
    let fields: Vec<&str> = ContributionKind::ALL.iter().map(|k| k.field()).collect();
    assert_eq!(fields, ["patents", "publications", "conferences", "events"]);
}
