//! Regression tests for malformed real-world OSIS
//!
//! Modules in the wild routinely ship unbalanced milestones, bad numeric
//! attributes and stray end tags. None of these may abort a pass; each is
//! rendered best-effort and reported as a `RenderIssue`.

use mu_osis::{render, render_osis_str, MarkupEvent, OsisError, RenderIssue, RenderParameters};

// =============================================================================
// Attributes
// =============================================================================

#[test]
fn non_numeric_verse_id_falls_back_to_next_number() {
    let xml = r#"<verse osisID="Gen.1.1">One</verse><verse osisID="Gen.1.x">Two</verse>"#;
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert!(passage.html.contains("id='1.2'"), "{}", passage.html);
    assert!(matches!(
        passage.issues.as_slice(),
        [RenderIssue::MalformedAttribute { element, attribute, .. }]
            if element == "verse" && attribute == "osisID"
    ));
}

#[test]
fn non_numeric_title_level_uses_default() {
    let xml = r#"<title level="two">Heading</title>"#;
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert!(passage.html.contains("<h1 class='heading1'>Heading</h1>"));
    assert_eq!(passage.issues.len(), 1);
}

#[test]
fn multi_character_note_marker_uses_cycle() {
    let xml = r#"<note n="12">text</note>"#;
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert_eq!(passage.notes[0].marker, 'a');
}

// =============================================================================
// Unbalanced markup
// =============================================================================

#[test]
fn verse_opened_inside_open_verse_closes_previous() {
    let events = vec![
        MarkupEvent::start("verse", &[("sID", "Gen.1.1"), ("osisID", "Gen.1.1")]),
        MarkupEvent::end("verse"),
        MarkupEvent::text("first"),
        MarkupEvent::start("verse", &[("sID", "Gen.1.2"), ("osisID", "Gen.1.2")]),
        MarkupEvent::end("verse"),
        MarkupEvent::text("second"),
        MarkupEvent::start("verse", &[("eID", "Gen.1.2")]),
        MarkupEvent::end("verse"),
    ];
    let passage = render(&events, &RenderParameters::default());
    assert!(passage.html.contains("first</span><span class='verse' id='1.2'>"));
    assert_eq!(passage.issues.len(), 1);
}

#[test]
fn note_left_open_at_verse_end_is_reset() {
    let events = vec![
        MarkupEvent::start("verse", &[("sID", "Gen.1.1"), ("osisID", "Gen.1.1")]),
        MarkupEvent::end("verse"),
        MarkupEvent::text("text"),
        MarkupEvent::start("note", &[]),
        MarkupEvent::text("dangling"),
        MarkupEvent::start("verse", &[("eID", "Gen.1.1")]),
        MarkupEvent::end("verse"),
        MarkupEvent::text(" after"),
    ];
    let passage = render(&events, &RenderParameters::default());
    assert!(passage.html.contains("</span> after"));
    assert!(!passage.html.contains("dangling"));
    assert!(passage
        .issues
        .iter()
        .any(|i| matches!(i, RenderIssue::UnbalancedMarkup { .. })));
}

#[test]
fn title_left_open_at_verse_end_is_aborted() {
    let events = vec![
        MarkupEvent::start("verse", &[("sID", "Gen.1.1"), ("osisID", "Gen.1.1")]),
        MarkupEvent::end("verse"),
        MarkupEvent::start("title", &[]),
        MarkupEvent::text("never closed"),
        MarkupEvent::start("verse", &[("eID", "Gen.1.1")]),
        MarkupEvent::end("verse"),
        MarkupEvent::text("Later text"),
    ];
    let passage = render(&events, &RenderParameters::default());
    assert!(passage.html.contains("Later text"));
    assert!(passage
        .issues
        .iter()
        .any(|i| matches!(i, RenderIssue::UnbalancedMarkup { .. })));
}

#[test]
fn stray_end_tags_are_ignored() {
    let events = vec![
        MarkupEvent::end("q"),
        MarkupEvent::end("l"),
        MarkupEvent::end("lg"),
        MarkupEvent::end("div"),
        MarkupEvent::end("hi"),
        MarkupEvent::end("w"),
        MarkupEvent::text("text"),
    ];
    let passage = render(&events, &RenderParameters::default());
    assert_eq!(
        passage.html,
        "<div class='passage' dir='ltr' lang='en'>text</div>"
    );
}

#[test]
fn deep_nesting_stays_balanced() {
    let mut events = Vec::new();
    for _ in 0..200 {
        events.push(MarkupEvent::start("hi", &[("type", "bold")]));
    }
    events.push(MarkupEvent::text("deep"));
    for _ in 0..200 {
        events.push(MarkupEvent::end("hi"));
    }
    let passage = render(&events, &RenderParameters::default());
    assert_eq!(
        passage.html.matches("<b>").count(),
        passage.html.matches("</b>").count()
    );
    assert!(passage.html.contains("deep"));
}

// =============================================================================
// Notes and references
// =============================================================================

#[test]
fn verse_with_only_a_note_keeps_its_marker() {
    let xml = r#"<verse osisID="Gen.1.1">In the beginning</verse><verse osisID="Gen.1.2"><note>This verse is omitted in some manuscripts.</note></verse>"#;
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert_eq!(passage.notes.len(), 1);
    assert_eq!(passage.notes[0].verse, 2);
    assert!(passage.html.contains("id='1.2'"));
    assert!(passage.html.contains("<span class='noteRef'>a</span>"));
}

#[test]
fn spaced_book_reference_links_one_verse() {
    let xml = "See <reference>John 3:16</reference>";
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert!(passage
        .html
        .contains("<a href='osis://?osis=John.3.16'>John 3:16</a>"));
    assert!(passage.issues.is_empty());
}

#[test]
fn lexical_links_stay_out_of_note_text() {
    let xml = r#"<verse osisID="Gen.1.1">God<note>Heb. <w lemma="strong:H0430">elohim</w></note></verse>"#;
    let params = RenderParameters::default().with_strongs(true);
    let passage = render_osis_str(xml, &params).unwrap();
    assert_eq!(passage.notes[0].text, "Heb. elohim");
    assert!(!passage.html.contains("hdef:"));
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn text_is_html_escaped() {
    let xml = "<verse osisID=\"Gen.1.1\">a &lt;b&gt; &amp; c</verse>";
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert!(passage.html.contains("a &lt;b&gt; &amp; c"));
}

#[test]
fn entity_references_are_rendered() {
    let xml = "<verse osisID=\"Gen.4.8\">Cain &amp; Abel&#8217;s field</verse>";
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert!(passage.html.contains("Cain &amp; Abel\u{2019}s field"));
}

#[test]
fn document_values_are_escaped_in_markup() {
    let xml = r#"<w lemma="strong:G3004" morph="robinson:V'">said</w><note n="&lt;">odd marker</note>"#;
    let params = RenderParameters::default().with_morphology(true);
    let passage = render_osis_str(xml, &params).unwrap();
    assert!(passage
        .html
        .contains("<a href='robinson:V&apos;' class='morphology'>V&apos;</a>"));
    assert!(passage.html.contains("<span class='noteRef'>&lt;</span>"));
    assert_eq!(passage.notes[0].marker, '<');
}

#[test]
fn note_text_is_kept_plain() {
    let xml = "<note>x &lt; y</note>";
    let passage = render_osis_str(xml, &RenderParameters::default()).unwrap();
    assert_eq!(passage.notes[0].text, "x < y");
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let err = render_osis_str("<verse osisID=\"Gen.1.1\">text</q>", &RenderParameters::default())
        .unwrap_err();
    assert!(matches!(err, OsisError::Parse(_)));
}
