//! Integration tests for mu-osis
//!
//! End-to-end passes over OSIS XML and hand-built event streams.
//! Run: cargo test --all-features

use mu_osis::{
    parse_osis, render, render_osis_str, render_osis_str_with_resolver, MarkupEvent, NoteKind,
    PassStatus, ReferenceResolver, RenderLimits, RenderParameters, UnresolvedReference,
    VerseKey, VerseRange, VerseRef,
};

const PASSAGE_OPEN: &str = "<div class='passage' dir='ltr' lang='en'>";

fn body(html: &str) -> &str {
    html.strip_prefix(PASSAGE_OPEN)
        .and_then(|rest| rest.strip_suffix("</div>"))
        .expect("passage wrapper missing")
}

fn render_xml(xml: &str, params: &RenderParameters) -> mu_osis::RenderedPassage {
    render_osis_str(xml, params).expect("OSIS should parse")
}

// -- Verses and chapters ------------------------------------------------------

#[test]
fn test_genesis_1_1_event_stream() {
    let events = vec![
        MarkupEvent::start("verse", &[("osisID", "Gen.1.1")]),
        MarkupEvent::text("In the beginning"),
        MarkupEvent::end("verse"),
    ];
    let passage = render(&events, &RenderParameters::default());
    assert!(passage.html.contains("id='1.1'"));
    assert!(passage
        .html
        .contains("<span class='verseNo'>1</span>&#160;In the beginning"));
    assert_eq!(passage.status, PassStatus::Complete);
}

#[test]
fn test_chapter_with_milestone_verses() {
    let xml = r#"<chapter osisID="Ps.23">
<verse sID="Ps.23.1" osisID="Ps.23.1"/>The LORD is my shepherd; I shall not want.<verse eID="Ps.23.1"/>
<verse sID="Ps.23.2" osisID="Ps.23.2"/>He maketh me to lie down in green pastures.<verse eID="Ps.23.2"/>
</chapter>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    let html = body(&passage.html);
    assert!(html.starts_with("<div class='chapterNo' id='23'>23</div>"));
    let first = html.find("id='23.1'").unwrap();
    let second = html.find("id='23.2'").unwrap();
    assert!(first < second);
    assert!(passage.issues.is_empty(), "{:?}", passage.issues);
}

#[test]
fn test_empty_verse_leaves_no_trace() {
    let xml = r#"<verse osisID="Gen.1.1">In the beginning</verse><verse osisID="Gen.1.2"> </verse><verse osisID="Gen.1.3">And God said</verse>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    assert!(!passage.html.contains("id='1.2'"));
    assert!(passage.html.contains("id='1.1'"));
    assert!(passage.html.contains("id='1.3'"));
}

#[test]
fn test_verse_per_line_uses_div() {
    let params = RenderParameters::default().with_verse_per_line(true);
    let passage = render_xml(r#"<verse osisID="John.11.35">Jesus wept.</verse>"#, &params);
    assert_eq!(
        body(&passage.html),
        "<div class='chapterNo' id='11'>11</div><div class='verse' id='11.35'><span class='verseNo'>35</span>&#160;Jesus wept.</div>"
    );
}

// -- Titles -------------------------------------------------------------------

#[test]
fn test_title_after_verse_open_precedes_verse_number() {
    let xml = r#"<verse osisID="Gen.1.1"><title type="section">The Creation</title>In the beginning</verse>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    let html = body(&passage.html);
    let heading = html.find("<h1 class='heading1'>The Creation</h1>").unwrap();
    let number = html.find("<span class='verseNo'>1</span>").unwrap();
    assert!(heading < number);
    assert!(html.ends_with("In the beginning</span>"));
}

#[test]
fn test_preverse_title_milestone_form() {
    let xml = r#"<verse sID="Ps.3.1" osisID="Ps.3.1"/><title canonical="true" subType="x-preverse" level="2">A Psalm of David</title>LORD, how are they increased<verse eID="Ps.3.1"/>"#;
    let passage = render_xml(xml, &RenderParameters::default().with_titles(false));
    let html = body(&passage.html);
    assert!(html.starts_with(
        "<div class='chapterNo' id='3'>3</div><h2 class='heading2'>A Psalm of David</h2><span class='verse' id='3.1'>"
    ));
}

#[test]
fn test_consecutive_titles_keep_document_order() {
    let xml = r#"<verse sID="Ps.3.1" osisID="Ps.3.1"/><title>First</title><title>Second</title>LORD, how are they increased<verse eID="Ps.3.1"/>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    assert!(passage.html.contains(
        "<h1 class='heading1'>First</h1><h1 class='heading1'>Second</h1><span class='verse' id='3.1'>"
    ));
}

// -- Notes and references -----------------------------------------------------

#[test]
fn test_notes_are_extracted_in_order() {
    let xml = r#"<verse osisID="Gen.1.2">And the earth was without form<note>Or, a waste</note>, and void<note n="*">Or, an emptiness</note>.</verse>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    assert_eq!(passage.notes.len(), 2);
    assert_eq!(passage.notes[0].marker, 'a');
    assert_eq!(passage.notes[0].text, "Or, a waste");
    assert_eq!(passage.notes[0].verse, 2);
    assert_eq!(passage.notes[1].marker, '*');
    assert!(passage.html.contains("form<span class='noteRef'>a</span>, and void"));
    assert!(!passage.html.contains("Or, a waste"));
}

#[test]
fn test_cross_reference_note_is_not_linked_inline() {
    let xml = r#"<verse osisID="John.1.1">In the beginning was the Word<note type="crossReference"><reference osisRef="Gen.1.1">Gen 1:1</reference>; <reference osisRef="1John.1.1">1 John 1:1</reference></note></verse>"#;
    let params = RenderParameters::default().with_versification("KJV");
    let passage = render_xml(xml, &params);
    assert_eq!(passage.notes.len(), 2);
    assert!(passage.notes.iter().all(|n| n.kind == NoteKind::Reference));
    assert_eq!(passage.notes[1].target.as_deref(), Some("1John.1.1"));
    assert!(!passage.html.contains("<a href"));
}

#[test]
fn test_inline_reference_link() {
    let xml = r#"<p>See <reference osisRef="Rom.8.28">Romans 8:28</reference> and <reference>29</reference>.</p>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    assert!(passage.html.contains(
        "<a href='osis://?osis=Rom.8.28'>Romans 8:28</a> and <a href='osis://?osis=Rom.8.29'>29</a>"
    ));
    assert!(passage.notes.is_empty());
}

struct FixedResolver;

impl ReferenceResolver for FixedResolver {
    fn resolve(
        &self,
        reference: &str,
        _basis: Option<&VerseRef>,
    ) -> Result<Vec<VerseRange>, UnresolvedReference> {
        if reference == "the beginning" {
            Ok(vec![VerseRange::single(VerseRef::new("Gen", 1, 1))])
        } else {
            Err(UnresolvedReference {
                reference: reference.to_string(),
            })
        }
    }
}

#[test]
fn test_custom_resolver() {
    let xml = "<reference>the beginning</reference> <reference>Narnia 1:1</reference>";
    let passage =
        render_osis_str_with_resolver(xml, &RenderParameters::default(), &FixedResolver).unwrap();
    let html = body(&passage.html);
    assert_eq!(
        html,
        "<a href='osis://?osis=Gen.1.1'>the beginning</a> Narnia 1:1"
    );
    assert_eq!(passage.issues.len(), 1);
}

// -- Lexical links ------------------------------------------------------------

#[test]
fn test_strongs_hebrew_example() {
    let xml = r#"<w lemma="strong:H0430">God</w>"#;
    let passage = render_xml(xml, &RenderParameters::default().with_strongs(true));
    assert_eq!(passage.html.matches("href='hdef:").count(), 1);
    assert!(passage
        .html
        .contains("God <a href='hdef:00430' class='strongs'>0430</a>"));
}

#[test]
fn test_greek_word_with_morphology() {
    let xml = r#"<w lemma="strong:G3056" morph="robinson:N-NSM">Word</w>"#;
    let params = RenderParameters::default().with_strongs(true).with_morphology(true);
    let passage = render_xml(xml, &params);
    assert!(passage.html.contains(
        "Word <a href='gdef:03056' class='strongs'>3056</a> <a href='robinson:N-NSM' class='morphology'>N-NSM</a>"
    ));
}

// -- Poetry, quotes and formatting --------------------------------------------

#[test]
fn test_poetry_line_group() {
    let xml = r#"<lg><l level="1">The LORD is my shepherd;</l><l level="2">I shall not want.</l></lg>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    assert_eq!(
        body(&passage.html),
        "<div class='lg'>The LORD is my shepherd;<br />&#160;&#160;I shall not want.<br /></div>"
    );
}

#[test]
fn test_red_letter_quote() {
    let xml = r#"<verse osisID="John.14.6">Jesus saith unto him, <q who="Jesus" marker="">I am the way</q></verse>"#;
    let passage = render_xml(xml, &RenderParameters::default().with_red_letter(true));
    assert!(passage
        .html
        .contains("<span class='redLetter'>I am the way</span>"));
}

#[test]
fn test_divine_name_and_trans_change() {
    let xml = r#"<divineName>Lord</divineName> <transChange type="added">is</transChange> <hi type="italic">good</hi>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    assert_eq!(
        body(&passage.html),
        "<span class='divineName'>Lord</span> <span class='transChange'>is</span> <i>good</i>"
    );
}

#[test]
fn test_lists_and_tables() {
    let xml = "<list><item>one</item></list><table><row><cell>a</cell></row></table>";
    let passage = render_xml(xml, &RenderParameters::default());
    assert_eq!(
        body(&passage.html),
        "<ul><li>one</li></ul><table><tr><td>a</td></tr></table>"
    );
}

// -- User markers -------------------------------------------------------------

#[test]
fn test_bookmark_and_my_note_markers() {
    let params = RenderParameters::default()
        .with_bookmark(VerseKey::new(3, 16), "green")
        .with_my_note(VerseKey::new(3, 16));
    let xml = r#"<chapter osisID="John.3"><verse osisID="John.3.16">For God so loved the world</verse></chapter>"#;
    let passage = render_xml(xml, &params);
    assert!(passage
        .html
        .contains("&#160;<span class='bookmark green'></span>For God"));
    assert!(passage
        .html
        .contains("the world<span class='myNoteImg'></span></span>"));
}

// -- Reader and limits --------------------------------------------------------

#[test]
fn test_full_osis_document() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<osis xmlns="http://www.bibletechnologies.net/2003/OSIS/namespace">
  <osisText osisIDWork="KJV">
    <header><work osisWork="KJV"><title>King James Version</title></work></header>
    <div type="book" osisID="Gen">
      <chapter osisID="Gen.1">
        <verse osisID="Gen.1.1">In the beginning God created the heaven and the earth.</verse>
      </chapter>
    </div>
  </osisText>
</osis>"#;
    let passage = render_xml(xml, &RenderParameters::default());
    assert!(!passage.html.contains("King James Version"));
    assert!(passage.html.contains("God created the heaven"));
    assert!(passage.is_complete());
}

#[test]
fn test_reader_event_count_matches_dispatch() {
    let events = parse_osis(r#"<verse osisID="Gen.1.1">In</verse>"#).unwrap();
    assert_eq!(events.len(), 3);
    let from_events = render(&events, &RenderParameters::default());
    let from_xml = render_xml(
        r#"<verse osisID="Gen.1.1">In</verse>"#,
        &RenderParameters::default(),
    );
    assert_eq!(from_events, from_xml);
}

#[test]
fn test_embedded_limits_stop_large_passage() {
    let limits = RenderLimits {
        max_output_bytes: Some(2048),
        ..RenderLimits::embedded()
    };
    let params = RenderParameters::default().with_limits(limits);
    let mut xml = String::new();
    for v in 1..=200 {
        xml.push_str(&format!(
            "<verse osisID=\"Ps.119.{}\">Blessed are the undefiled in the way.</verse>",
            v
        ));
    }
    let passage = render_xml(&xml, &params);
    assert_eq!(passage.status, PassStatus::OutputTooLarge { limit: 2048 });
    assert!(passage.notes.is_empty());
    assert!(!passage.html.contains("verse"));
}
