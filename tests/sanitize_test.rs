use deckgen::{sanitize, DeckError, Point};

#[test]
fn test_recovers_outline_with_smart_quotes_and_trailing_commas() {
    // Generator chatter around a JSON object with curly quotes and trailing
    // commas, the way LLM output actually arrives.
    let raw = "Sure! Here is your outline:\n\n{\u{201C}title\u{201D}: \u{201C}X\u{201D}, \u{201C}sections\u{201D}: [{\u{201C}title\u{201D}:\u{201C}Y\u{201D},\u{201C}points\u{201D}:[\u{201C}Z\u{201D},]}],}\n\nLet me know if you need changes.";

    let outline = sanitize(raw).expect("should recover outline");
    assert_eq!(outline.title, "X");
    assert_eq!(outline.sections.len(), 1);
    assert_eq!(outline.sections[0].title, "Y");
    assert_eq!(
        outline.sections[0].points,
        vec![Point::Simple("Z".to_string())]
    );
}

#[test]
fn test_braceless_text_fails_with_raw_payload() {
    let raw = "I am unable to help with that request.";
    let err = sanitize(raw).expect_err("no structure to recover");
    match err {
        DeckError::MalformedOutline { raw: attached } => assert_eq!(attached, raw),
        other => panic!("Expected MalformedOutline, got: {}", other),
    }
}

#[test]
fn test_multiple_candidates_first_valid_wins() {
    // The first brace-delimited fragment is not a valid outline; the second
    // one is. Recovery should settle on the valid one.
    let raw = r#"Thinking: {"notes": "draft"} and the final answer:
{"title": "Real", "sections": [{"title": "S", "points": ["P"]}]}"#;

    let outline = sanitize(raw).expect("should find the valid candidate");
    assert_eq!(outline.title, "Real");
}

#[test]
fn test_braces_inside_string_values_do_not_split_candidates() {
    // The first fragment parses but is not an outline, so recovery has to
    // scan for further balanced runs; the real outline contains an unpaired
    // closing brace inside a string value.
    let raw = r#"draft: {"note": "unfinished"} final:
{"title": "Mind the } brace", "sections": [{"title": "S", "points": ["P"]}]}"#;

    let outline = sanitize(raw).expect("should recover outline");
    assert_eq!(outline.title, "Mind the } brace");
}

#[test]
fn test_backtick_snippets_become_strings() {
    let raw = r#"{"title": "T", "sections": [{"title": "S", "points": [{"main": "M", "code": `x = 1`}]}],}"#;

    let outline = sanitize(raw).expect("should repair backticks");
    match &outline.sections[0].points[0] {
        Point::Structured { code, language, .. } => {
            assert_eq!(code.as_deref(), Some("x = 1"));
            // Defaulted because the snippet arrived without a language.
            assert_eq!(language.as_deref(), Some("javascript"));
        }
        other => panic!("Expected structured point, got {:?}", other),
    }
}

#[test]
fn test_schema_violation_in_strict_json_names_the_field() {
    let raw = r#"{"title": "", "sections": [{"title": "S", "points": ["P"]}]}"#;
    let err = sanitize(raw).expect_err("empty title is invalid");
    match err {
        DeckError::InvalidOutlineSchema { path, .. } => assert_eq!(path, "title"),
        other => panic!("Expected InvalidOutlineSchema, got: {}", other),
    }
}

#[test]
fn test_section_image_is_carried_through() {
    let raw = r#"{
        "title": "T",
        "sections": [{
            "title": "S",
            "points": ["P"],
            "image": {"url": "https://example.com/pic.png", "credit": {"name": "Ann", "link": "https://example.com/ann"}}
        }]
    }"#;

    let outline = sanitize(raw).expect("valid outline");
    let image = outline.sections[0].image.as_ref().expect("image");
    assert_eq!(image.url, "https://example.com/pic.png");
    assert_eq!(image.credit.as_ref().unwrap().name, "Ann");
}
