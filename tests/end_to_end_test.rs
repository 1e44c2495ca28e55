use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::ZipArchive;

fn run_command(args: &[&str]) -> Output {
    Command::new("cargo")
        .arg("run")
        .arg("--")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

const MESSY_OUTLINE: &str = "Here is the outline you asked for:\n\n{\u{201C}title\u{201D}: \u{201C}Rust in Production\u{201D}, \u{201C}sections\u{201D}: [\n  {\u{201C}title\u{201D}: \u{201C}Why Rust\u{201D}, \u{201C}points\u{201D}: [\u{201C}Speed\u{201D}, \u{201C}Safety\u{201D},]},\n  {\u{201C}title\u{201D}: \u{201C}Adoption\u{201D}, \u{201C}points\u{201D}: [{\u{201C}main\u{201D}: \u{201C}Start small\u{201D}, \u{201C}code\u{201D}: \u{201C}cargo new app\u{201D}}]}\n],}\n";

#[test]
fn test_sanitize_then_generate_pipeline() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let raw_path = temp_dir.path().join("raw.txt");
    let outline_path = temp_dir.path().join("outline.json");
    let pptx_path = temp_dir.path().join("deck.pptx");

    fs::write(&raw_path, MESSY_OUTLINE).expect("Failed to write raw text");

    // Repair the generator output into strict outline JSON.
    let output = run_command(&[
        "sanitize",
        "-i",
        raw_path.to_str().unwrap(),
        "-o",
        outline_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "sanitize failed: {:?}", output);

    let json = fs::read_to_string(&outline_path).expect("outline written");
    let outline: serde_json::Value = serde_json::from_str(&json).expect("strict JSON");
    assert_eq!(outline["title"], "Rust in Production");
    // The code snippet picked up the default language.
    assert_eq!(outline["sections"][1]["points"][0]["language"], "javascript");

    // Generate a deck from the sanitized outline.
    let output = run_command(&[
        "generate",
        "-i",
        outline_path.to_str().unwrap(),
        "-o",
        pptx_path.to_str().unwrap(),
        "--theme",
        "tech",
    ]);
    assert!(output.status.success(), "generate failed: {:?}", output);
    assert!(pptx_path.exists(), "PPTX file was not created");

    let metadata = fs::metadata(&pptx_path).expect("Failed to get file metadata");
    assert!(metadata.len() > 0, "PPTX file is empty");

    // Verify slide files within the PPTX archive: title + two sections.
    let file = fs::File::open(&pptx_path).expect("Failed to open PPTX file");
    let mut archive = ZipArchive::new(file).expect("Failed to read PPTX as ZIP");
    let slide_files: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .collect();
    assert_eq!(slide_files.len(), 3, "Expected exactly three slide XML files");
    assert!(slide_files.contains(&"ppt/slides/slide1.xml".to_string()));
    assert!(slide_files.contains(&"ppt/slides/slide3.xml".to_string()));
}

#[test]
fn test_generate_accepts_raw_generator_text_directly() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let raw_path = temp_dir.path().join("raw.txt");
    let pptx_path = temp_dir.path().join("deck.pptx");

    fs::write(&raw_path, MESSY_OUTLINE).expect("Failed to write raw text");

    let output = run_command(&[
        "generate",
        "-i",
        raw_path.to_str().unwrap(),
        "-o",
        pptx_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "generate failed: {:?}", output);
    assert!(pptx_path.exists());
}

#[test]
fn test_generate_data_uri_to_stdout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let outline_path = temp_dir.path().join("outline.json");
    fs::write(
        &outline_path,
        r#"{"title":"Demo","sections":[{"title":"Intro","points":["Point A"]}]}"#,
    )
    .expect("Failed to write outline");

    let output = run_command(&[
        "generate",
        "-i",
        outline_path.to_str().unwrap(),
        "--data-uri",
    ]);
    assert!(output.status.success(), "generate failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("data:application/vnd.openxmlformats-officedocument.presentationml.presentation;base64,"),
        "stdout did not contain a data URI: {}",
        stdout
    );
}

#[test]
fn test_generate_surfaces_raw_text_on_malformed_input() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let raw_path = temp_dir.path().join("raw.txt");
    fs::write(&raw_path, "No outline here at all.").expect("Failed to write raw text");

    let output = run_command(&[
        "generate",
        "-i",
        raw_path.to_str().unwrap(),
        "-o",
        temp_dir.path().join("deck.pptx").to_str().unwrap(),
    ]);
    assert!(!output.status.success(), "generate should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No outline here at all."), "raw text missing from diagnostics: {}", stderr);
}

#[test]
fn test_templates_command_lists_pptx_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("corporate.pptx"), b"stub").unwrap();
    fs::write(temp_dir.path().join("minimal.pptx"), b"stub").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), b"stub").unwrap();

    let output = run_command(&["templates", "--dir", temp_dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "templates failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("corporate"));
    assert!(stdout.contains("minimal"));
    assert!(!stdout.contains("notes"));
}

#[test]
fn test_generate_rejects_unknown_template() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let outline_path = temp_dir.path().join("outline.json");
    fs::write(
        &outline_path,
        r#"{"title":"Demo","sections":[{"title":"Intro","points":["Point A"]}]}"#,
    )
    .unwrap();
    fs::write(temp_dir.path().join("corporate.pptx"), b"stub").unwrap();

    let output = run_command(&[
        "generate",
        "-i",
        outline_path.to_str().unwrap(),
        "-o",
        temp_dir.path().join("deck.pptx").to_str().unwrap(),
        "--template",
        "no-such-template",
        "--templates-dir",
        temp_dir.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success(), "unknown template should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown template"));
}
