use deckgen::images::FetchedImage;
use deckgen::{
    build_deck, data_uri, layout_deck, package, sanitize, DeckOptions, Element, PackageConfig,
};
use std::io::Read;
use zip::ZipArchive;

fn demo_outline() -> deckgen::Outline {
    sanitize(
        r#"{"title":"Quarterly Review","sections":[
            {"title":"Numbers","points":["Revenue up","Costs down"]},
            {"title":"Plans","points":[{"main":"Ship v2","description":"Everything faster."}]}
        ]}"#,
    )
    .unwrap()
}

fn read_entry(archive: &mut ZipArchive<std::io::Cursor<Vec<u8>>>, name: &str) -> String {
    let mut entry = archive.by_name(name).expect(name);
    let mut content = String::new();
    entry.read_to_string(&mut content).expect("utf-8 entry");
    content
}

#[test]
fn test_package_structure() {
    let bytes = build_deck(&demo_outline(), &DeckOptions::default()).expect("deck builds");
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");

    let names: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .collect();

    assert!(names.contains(&"[Content_Types].xml".to_string()));
    assert!(names.contains(&"_rels/.rels".to_string()));
    assert!(names.contains(&"docProps/app.xml".to_string()));
    assert!(names.contains(&"docProps/core.xml".to_string()));
    assert!(names.contains(&"ppt/presentation.xml".to_string()));

    let slide_files: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .collect();
    assert_eq!(slide_files.len(), 3, "title slide plus two content slides");

    // 16:9 default canvas.
    let presentation = read_entry(&mut archive, "ppt/presentation.xml");
    assert!(presentation.contains(r#"cx="9144000" cy="5143500""#));

    // Deck title lands in the core properties.
    let core = read_entry(&mut archive, "docProps/core.xml");
    assert!(core.contains("<dc:title>Quarterly Review</dc:title>"));
}

#[test]
fn test_slide_xml_carries_text_and_bullets() {
    let bytes = build_deck(&demo_outline(), &DeckOptions::default()).expect("deck builds");
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");

    let slide2 = read_entry(&mut archive, "ppt/slides/slide2.xml");
    assert!(slide2.contains("Numbers"));
    assert!(slide2.contains("Revenue up"));
    assert!(slide2.contains("buChar"));
    // Modern theme primary colors the header bar.
    assert!(slide2.contains(r#"val="2563eb""#));
}

#[test]
fn test_external_image_is_linked_not_embedded() {
    let outline = sanitize(
        r#"{"title":"T","sections":[{"title":"S","points":["P"],
            "image":{"url":"https://example.com/chart.png"}}]}"#,
    )
    .unwrap();

    let bytes = build_deck(&outline, &DeckOptions::default()).expect("deck builds");
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");

    let rels = read_entry(&mut archive, "ppt/slides/_rels/slide2.xml.rels");
    assert!(rels.contains(r#"TargetMode="External""#));
    assert!(rels.contains("https://example.com/chart.png"));

    let slide = read_entry(&mut archive, "ppt/slides/slide2.xml");
    assert!(slide.contains("r:link"));
    assert!(!slide.contains("r:embed"));
}

#[test]
fn test_fetched_image_is_embedded_as_media() {
    let outline = sanitize(
        r#"{"title":"T","sections":[{"title":"S","points":["P"],
            "image":{"url":"https://example.com/chart.png"}}]}"#,
    )
    .unwrap();

    // Simulate a completed fetch instead of hitting the network.
    let mut deck = layout_deck(&outline, &DeckOptions::default());
    for elements in deck.iter_mut() {
        for element in elements.iter_mut() {
            if let Element::Image(image) = element {
                image.data = Some(FetchedImage {
                    bytes: vec![0x89, 0x50, 0x4E, 0x47],
                    extension: "png",
                });
            }
        }
    }

    let bytes = package(&deck, &PackageConfig::default()).expect("packages");
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");

    let names: Vec<String> = (0..archive.len())
        .filter_map(|i| archive.by_index(i).ok().map(|f| f.name().to_string()))
        .collect();
    assert!(names.iter().any(|n| n.starts_with("ppt/media/image2_")));

    let slide = read_entry(&mut archive, "ppt/slides/slide2.xml");
    assert!(slide.contains("r:embed"));
}

#[test]
fn test_template_name_recorded_in_app_props() {
    let deck = layout_deck(&demo_outline(), &DeckOptions::default());
    let config = PackageConfig {
        title: "Quarterly Review".to_string(),
        aspect_ratio: "4:3".to_string(),
        template: Some("corporate".to_string()),
    };

    let bytes = package(&deck, &config).expect("packages");
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");

    let app = read_entry(&mut archive, "docProps/app.xml");
    assert!(app.contains("<Template>corporate</Template>"));

    let presentation = read_entry(&mut archive, "ppt/presentation.xml");
    assert!(presentation.contains(r#"cy="6858000""#));
}

#[test]
fn test_data_uri_round_trips_package_bytes() {
    let bytes = build_deck(&demo_outline(), &DeckOptions::default()).expect("deck builds");
    let uri = data_uri(&bytes);

    let prefix =
        "data:application/vnd.openxmlformats-officedocument.presentationml.presentation;base64,";
    assert!(uri.starts_with(prefix));

    use base64::Engine as _;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(&uri[prefix.len()..])
        .expect("valid base64");
    assert_eq!(decoded, bytes);
}

#[test]
fn test_xml_special_characters_are_escaped() {
    let outline = sanitize(
        r#"{"title":"Q&A <session>","sections":[{"title":"S","points":["Fish & chips"]}]}"#,
    )
    .unwrap();

    let bytes = build_deck(&outline, &DeckOptions::default()).expect("deck builds");
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid zip");

    let core = read_entry(&mut archive, "docProps/core.xml");
    assert!(core.contains("Q&amp;A &lt;session&gt;"));

    let slide2 = read_entry(&mut archive, "ppt/slides/slide2.xml");
    assert!(slide2.contains("Fish &amp; chips"));
}
