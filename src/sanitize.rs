// ABOUTME: Outline sanitizer for the deckgen application
// ABOUTME: Repairs and validates loosely-structured generator output into an Outline

use crate::errors::{DeckError, Result};
use crate::outline::{ImageCredit, ImageRef, Outline, Point, Section};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

/// Language assumed for code snippets that arrive without one.
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

static SMART_DOUBLE_QUOTES: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{201C}\u{201D}\u{201E}\u{201F}]").unwrap());
static SMART_SINGLE_QUOTES: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{2018}\u{2019}]").unwrap());
static BACKTICK_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new("`([^`]*)`").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").unwrap());
static BARE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap());

/// Recover a validated outline from raw generator text.
///
/// The text is first parsed strictly; failing that, every brace-delimited
/// candidate substring is tried as-is and then after the repair passes.
/// The first candidate that both parses and passes schema validation wins.
pub fn sanitize(raw: &str) -> Result<Outline> {
    // Strict parse of the whole text. A schema violation here is terminal:
    // the generator produced well-formed JSON of the wrong shape.
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return outline_from_value(&value);
    }

    for (idx, candidate) in candidates(raw).into_iter().enumerate() {
        if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
            match outline_from_value(&value) {
                Ok(outline) => {
                    info!("Recovered outline from candidate {} without repair", idx);
                    return Ok(outline);
                }
                Err(e) => {
                    debug!("Candidate {} parsed but failed validation: {}", idx, e);
                }
            }
        }

        let repaired = repair_json_text(&candidate);
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            match outline_from_value(&value) {
                Ok(outline) => {
                    info!("Recovered outline from candidate {} after repair", idx);
                    return Ok(outline);
                }
                Err(e) => {
                    debug!("Repaired candidate {} failed validation: {}", idx, e);
                }
            }
        }
    }

    Err(DeckError::MalformedOutline {
        raw: raw.to_string(),
    })
}

/// Extract brace-delimited candidate substrings, widest span first.
fn candidates(text: &str) -> Vec<String> {
    let mut found = Vec::new();

    // Widest span: everything from the first '{' to the last '}'.
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            found.push(text[start..=end].to_string());
        }
    }

    // Balanced top-level runs, for generator output that interleaves prose
    // with more than one JSON fragment. Braces inside double-quoted strings
    // do not count toward nesting depth.
    let mut depth = 0usize;
    let mut run_start = None;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    run_start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = run_start.take() {
                            let run = text[s..=i].to_string();
                            if !found.contains(&run) {
                                found.push(run);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    found
}

/// Apply the repair passes, in order: typographic quotes, backtick spans,
/// blank-line collapse, tabs, trailing commas, bare object keys.
pub fn repair_json_text(text: &str) -> String {
    let text = SMART_DOUBLE_QUOTES.replace_all(text, "\"");
    let text = SMART_SINGLE_QUOTES.replace_all(&text, "'");
    let text = BACKTICK_SPAN.replace_all(&text, |caps: &Captures| {
        format!("\"{}\"", caps[1].replace('"', "\\\""))
    });
    let text = BLANK_LINES.replace_all(&text, "\n");
    let text = text.replace('\t', "    ");
    let text = TRAILING_COMMA.replace_all(&text, "${1}");
    let text = BARE_KEY.replace_all(&text, "${1}\"${2}\":");
    text.trim().to_string()
}

/// Validate a parsed JSON value against the outline schema, normalizing as
/// described in the crate docs. Errors name the offending field path.
pub fn outline_from_value(value: &Value) -> Result<Outline> {
    let obj = value
        .as_object()
        .ok_or_else(|| schema_error("$", "expected a JSON object"))?;

    let title = required_string(obj.get("title"), "title")?;
    let description = optional_string(obj.get("description"));

    let raw_sections = obj
        .get("sections")
        .and_then(Value::as_array)
        .ok_or_else(|| schema_error("sections", "expected an array"))?;
    if raw_sections.is_empty() {
        return Err(schema_error("sections", "must not be empty"));
    }

    let mut sections = Vec::with_capacity(raw_sections.len());
    for (i, raw) in raw_sections.iter().enumerate() {
        sections.push(section_from_value(raw, i)?);
    }

    Ok(Outline {
        title,
        description,
        sections,
    })
}

fn section_from_value(value: &Value, index: usize) -> Result<Section> {
    let path = format!("sections[{}]", index);
    let obj = value
        .as_object()
        .ok_or_else(|| schema_error(&path, "expected a JSON object"))?;

    let title = required_string(obj.get("title"), &format!("{}.title", path))?;

    let raw_points = obj
        .get("points")
        .and_then(Value::as_array)
        .ok_or_else(|| schema_error(&format!("{}.points", path), "expected an array"))?;
    if raw_points.is_empty() {
        return Err(schema_error(&format!("{}.points", path), "must not be empty"));
    }

    let mut points = Vec::with_capacity(raw_points.len());
    for (j, raw) in raw_points.iter().enumerate() {
        points.push(point_from_value(raw, &format!("{}.points[{}]", path, j))?);
    }

    Ok(Section {
        title,
        points,
        image: image_from_value(obj.get("image")),
        image_query: optional_string(obj.get("imageQuery")),
    })
}

fn point_from_value(value: &Value, path: &str) -> Result<Point> {
    match value {
        Value::String(s) => Ok(Point::Simple(s.clone())),
        Value::Object(obj) => {
            let main = required_string(obj.get("main"), &format!("{}.main", path))?;
            let description = optional_string(obj.get("description"));
            let code = obj
                .get("code")
                .and_then(Value::as_str)
                .map(str::to_string);
            // Normalization, not validation: snippets without a language get
            // the default.
            let language = match (&code, optional_string(obj.get("language"))) {
                (Some(_), None) => Some(DEFAULT_CODE_LANGUAGE.to_string()),
                (_, lang) => lang,
            };
            Ok(Point::Structured {
                main,
                description,
                code,
                language,
            })
        }
        _ => Err(schema_error(path, "expected a string or an object")),
    }
}

fn image_from_value(value: Option<&Value>) -> Option<ImageRef> {
    let obj = value?.as_object()?;
    let url = obj.get("url")?.as_str()?.to_string();
    let credit = obj.get("credit").and_then(Value::as_object).and_then(|c| {
        Some(ImageCredit {
            name: c.get("name")?.as_str()?.to_string(),
            link: c.get("link")?.as_str()?.to_string(),
        })
    });
    Some(ImageRef {
        url,
        alt: optional_string(obj.get("alt")),
        credit,
    })
}

fn required_string(value: Option<&Value>, path: &str) -> Result<String> {
    match value.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        Some(_) => Err(schema_error(path, "must not be empty")),
        None => Err(schema_error(path, "expected a non-empty string")),
    }
}

/// Empty and whitespace-only strings are treated as absent.
fn optional_string(value: Option<&Value>) -> Option<String> {
    match value.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Some(s.to_string()),
        _ => None,
    }
}

fn schema_error(path: &str, reason: &str) -> DeckError {
    DeckError::InvalidOutlineSchema {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
