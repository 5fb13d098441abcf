// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use crate::model::{ChartKind, ContentNode, Slide, SlideLayout};

use super::stream::{FinalizeErrorKind, StreamParser};

/// A deck exercising every layout family plus images, entities and comments.
const FULL_DOC: &str = "<PRESENTATION>\n  <SECTION layout=\"left\">\n    <H1>Intro</H1>\n    <P>Welcome &amp; enjoy</P>\n    <IMG query=\"city skyline\"/>\n    <BULLETS>\n      <DIV><H3>One</H3><P>First point</P></DIV>\n      <DIV><H3>Two</H3><P>Second point</P></DIV>\n    </BULLETS>\n  </SECTION>\n  <!-- generator note -->\n  <SECTION layout=\"right\">\n    <H2>Compare</H2>\n    <COLUMNS>\n      <DIV><H3>Before</H3><P>Old way</P></DIV>\n      <DIV><H3>After</H3><P>New way</P><IMG query=\"sunrise\"/></DIV>\n    </COLUMNS>\n  </SECTION>\n  <SECTION layout=\"vertical\">\n    <H1>Numbers</H1>\n    <CHART charttype=\"line\">\n      <TR><TD>Q1</TD><TD>10</TD></TR>\n      <TR><TD>Q2</TD><TD>25</TD></TR>\n    </CHART>\n  </SECTION>\n  <SECTION layout=\"left\">\n    <H1>Team</H1>\n    <ICONS>\n      <DIV><ICON name=\"rocket\"/><H3>Ship</H3><P>Weekly releases</P></DIV>\n      <DIV><ICON name=\"shield\"/><H3>Guard</H3><P>Safe defaults</P></DIV>\n    </ICONS>\n  </SECTION>\n  <SECTION layout=\"left\">\n    <H1>Plan</H1>\n    <TIMELINE>\n      <DIV><H3>Kickoff</H3><P>Day 1</P></DIV>\n      <DIV><H3>Launch</H3><P>Day 30</P></DIV>\n    </TIMELINE>\n  </SECTION>\n</PRESENTATION>\n";

fn parse_full(doc: &str) -> Vec<Slide> {
    StreamParser::new()
        .finalize(doc)
        .unwrap_or_else(|err| panic!("expected well-formed markup, got: {err}"))
}

#[test]
fn full_document_parses_every_family() {
    let slides = parse_full(FULL_DOC);
    assert_eq!(slides.len(), 5);

    let intro = &slides[0];
    assert_eq!(intro.slide_id().as_str(), "s:0001");
    assert_eq!(intro.layout(), SlideLayout::Left);
    assert_eq!(intro.root_image().map(|img| img.query()), Some("city skyline"));
    assert_eq!(
        intro.content()[0],
        ContentNode::heading(1, "Intro")
    );
    assert_eq!(
        intro.content()[1],
        ContentNode::Paragraph("Welcome & enjoy".to_owned())
    );
    let ContentNode::Bullets(groups) = &intro.content()[2] else {
        panic!("expected bullets, got {:?}", intro.content()[2]);
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0].nodes(),
        &[
            ContentNode::heading(3, "One"),
            ContentNode::Paragraph("First point".to_owned()),
        ]
    );

    let compare = &slides[1];
    assert_eq!(compare.layout(), SlideLayout::Right);
    let ContentNode::Columns(columns) = compare.layout_family().expect("columns") else {
        panic!("expected columns");
    };
    assert_eq!(columns.len(), 2);
    assert_eq!(
        columns[1].nodes().last(),
        Some(&ContentNode::Image("sunrise".to_owned()))
    );

    let numbers = &slides[2];
    assert_eq!(numbers.layout(), SlideLayout::Vertical);
    let ContentNode::Chart { kind, rows } = numbers.layout_family().expect("chart") else {
        panic!("expected chart");
    };
    assert_eq!(*kind, ChartKind::Line);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label(), "Q1");
    assert_eq!(rows[0].value(), "10");
    assert_eq!(rows[1].label(), "Q2");
    assert_eq!(rows[1].value(), "25");

    let team = &slides[3];
    let ContentNode::Icons(items) = team.layout_family().expect("icons") else {
        panic!("expected icons");
    };
    assert_eq!(items[0].icon(), "rocket");
    assert_eq!(items[0].heading(), "Ship");
    assert_eq!(items[0].text(), "Weekly releases");
    assert_eq!(items[1].icon(), "shield");

    let plan = &slides[4];
    let ContentNode::Timeline(steps) = plan.layout_family().expect("timeline") else {
        panic!("expected timeline");
    };
    assert_eq!(steps[0].heading(), "Kickoff");
    assert_eq!(steps[1].text(), "Day 30");
}

// Chunk-invariance: feeding any prefix first, then the full buffer, yields the
// same slides as parsing the full buffer in one call, and every prefix result
// is exactly a prefix of the final slide list.
#[test]
fn chunk_invariance_over_every_split_point() {
    let oneshot = parse_full(FULL_DOC);

    for split in 0..=FULL_DOC.len() {
        if !FULL_DOC.is_char_boundary(split) {
            continue;
        }
        let mut parser = StreamParser::new();
        let partial = parser.feed(&FULL_DOC[..split]);
        let closed = partial.slides();
        assert!(
            closed.len() <= oneshot.len(),
            "split {split}: more slides in a prefix than in the whole"
        );
        assert_eq!(
            closed,
            &oneshot[..closed.len()],
            "split {split}: prefix slides diverge from the one-shot parse"
        );

        let full = parser.feed(FULL_DOC);
        assert_eq!(full.slides(), oneshot.as_slice(), "split {split}");
        assert_eq!(
            parser.finalize(FULL_DOC).expect("finalize"),
            oneshot,
            "split {split}"
        );
    }
}

#[test]
fn closed_slide_count_grows_monotonically() {
    let mut parser = StreamParser::new();
    let mut last = 0;
    for end in 0..=FULL_DOC.len() {
        if !FULL_DOC.is_char_boundary(end) {
            continue;
        }
        let partial = parser.feed(&FULL_DOC[..end]);
        assert!(
            partial.slides().len() >= last,
            "closed slide count shrank at byte {end}"
        );
        last = partial.slides().len();
    }
    assert_eq!(last, 5);
}

// The truncation scenario: a buffer cut mid-tag holds zero closed slides; the
// remainder completes the slide.
#[test]
fn mid_tag_truncation_discards_the_open_section() {
    let truncated = "<PRESENTATION><SECTION layout=\"left\"><H1>Intro</H1><P>Hello</P></SEC";
    let mut parser = StreamParser::new();

    let partial = parser.feed(truncated);
    assert!(partial.slides().is_empty());
    assert!(partial.open_section());
    assert_eq!(partial.bytes_consumed(), truncated.len() - "</SEC".len());

    let full = format!("{truncated}TION></PRESENTATION>");
    let partial = parser.feed(&full);
    assert_eq!(partial.slides().len(), 1);
    assert!(!partial.open_section());

    let slide = &partial.slides()[0];
    assert_eq!(slide.layout(), SlideLayout::Left);
    assert_eq!(slide.content()[0], ContentNode::heading(1, "Intro"));
    assert_eq!(
        slide.content()[1],
        ContentNode::Paragraph("Hello".to_owned())
    );
}

#[rstest]
#[case("left", SlideLayout::Left)]
#[case("RIGHT", SlideLayout::Right)]
#[case("Vertical", SlideLayout::Vertical)]
#[case("sideways", SlideLayout::Left)]
#[case("", SlideLayout::Left)]
fn section_layout_attribute(#[case] attr: &str, #[case] expected: SlideLayout) {
    let doc =
        format!("<PRESENTATION><SECTION layout=\"{attr}\"><P>x</P></SECTION></PRESENTATION>");
    let slides = parse_full(&doc);
    assert_eq!(slides[0].layout(), expected);
}

#[test]
fn unknown_tags_are_skipped_and_their_text_absorbed() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><P>stay <B>bold</B> calm</P><WIDGET x=\"1\"/></SECTION></PRESENTATION>";
    let slides = parse_full(doc);
    assert_eq!(
        slides[0].content(),
        &[ContentNode::Paragraph("stay bold calm".to_owned())]
    );
}

#[test]
fn second_layout_family_in_a_slide_is_skipped_wholesale() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><BULLETS><DIV><P>kept</P></DIV></BULLETS><CYCLE><DIV><H3>dropped</H3><P>dropped too</P></DIV></CYCLE><P>after</P></SECTION></PRESENTATION>";
    let slides = parse_full(doc);
    let slide = &slides[0];

    assert_eq!(slide.layout_family_count(), 1);
    assert!(matches!(slide.layout_family(), Some(ContentNode::Bullets(_))));
    // Text of the skipped container is dropped, content after it survives.
    assert_eq!(
        slide.content().last(),
        Some(&ContentNode::Paragraph("after".to_owned()))
    );
}

#[test]
fn every_parsed_slide_has_at_most_one_layout_family_node() {
    for slide in parse_full(FULL_DOC) {
        assert!(slide.layout_family_count() <= 1);
    }
}

#[test]
fn only_the_first_root_image_wins() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><IMG query=\"first\"/><IMG query=\"second\"/></SECTION></PRESENTATION>";
    let slides = parse_full(doc);
    assert_eq!(
        slides[0].root_image().map(|img| img.query()),
        Some("first")
    );
}

#[test]
fn image_query_falls_back_to_element_text() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><IMG>mountain lake</IMG></SECTION></PRESENTATION>";
    let slides = parse_full(doc);
    assert_eq!(
        slides[0].root_image().map(|img| img.query()),
        Some("mountain lake")
    );
}

#[test]
fn empty_textual_elements_are_dropped() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><H1>  </H1><P></P><P>real</P></SECTION></PRESENTATION>";
    let slides = parse_full(doc);
    assert_eq!(
        slides[0].content(),
        &[ContentNode::Paragraph("real".to_owned())]
    );
}

#[test]
fn finalize_reports_unterminated_section_and_keeps_partial() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><P>done</P></SECTION><SECTION layout=\"right\"><P>half</P>";
    let parser = StreamParser::new();
    let err = parser.finalize(doc).expect_err("unterminated section");

    assert_eq!(
        err.kind(),
        FinalizeErrorKind::UnclosedElement { tag: "SECTION" }
    );
    assert_eq!(err.partial().len(), 1);
    assert_eq!(
        err.partial()[0].content(),
        &[ContentNode::Paragraph("done".to_owned())]
    );
}

#[test]
fn finalize_reports_buffer_cut_inside_a_tag() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><P>ok</P></SECTION><SECT";
    let parser = StreamParser::new();
    let err = parser.finalize(doc).expect_err("cut inside tag");

    assert!(matches!(
        err.kind(),
        FinalizeErrorKind::TruncatedMarkup { .. }
    ));
    assert_eq!(err.partial().len(), 1);
}

#[test]
fn root_close_recovers_an_unclosed_section_but_reports_it() {
    let doc = "<PRESENTATION><SECTION layout=\"left\"><P>kept</P></PRESENTATION>";
    let parser = StreamParser::new();
    let err = parser.finalize(doc).expect_err("implicit close");

    assert_eq!(
        err.kind(),
        FinalizeErrorKind::UnclosedElement { tag: "SECTION" }
    );
    // Best-effort recovery still committed the slide.
    assert_eq!(err.partial().len(), 1);
    assert_eq!(
        err.partial()[0].content(),
        &[ContentNode::Paragraph("kept".to_owned())]
    );
}

#[test]
fn stray_close_tags_are_ignored() {
    let doc = "<PRESENTATION></BULLETS><SECTION layout=\"left\"></H2><P>ok</P></SECTION></PRESENTATION>";
    let slides = parse_full(doc);
    assert_eq!(slides.len(), 1);
    assert_eq!(
        slides[0].content(),
        &[ContentNode::Paragraph("ok".to_owned())]
    );
}

#[test]
fn slide_ids_are_positional_and_stable_across_reparses() {
    let mut parser = StreamParser::new();
    let oneshot = parse_full(FULL_DOC);
    let refed = parser.feed(FULL_DOC);
    for (a, b) in oneshot.iter().zip(refed.slides()) {
        assert_eq!(a.slide_id(), b.slide_id());
    }
    assert_eq!(oneshot[4].slide_id().as_str(), "s:0005");
}

#[test]
fn feed_tolerates_a_shrunken_buffer() {
    // Callers feed cumulatively, but a defensive reparse of a shorter buffer
    // must still be a clean parse of exactly that buffer.
    let mut parser = StreamParser::new();
    parser.feed(FULL_DOC);
    let partial = parser.feed("<PRESENTATION>");
    assert!(partial.slides().is_empty());
    assert_eq!(parser.fed_bytes(), FULL_DOC.len());
}
