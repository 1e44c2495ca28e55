// ABOUTME: PPTX packaging module for the deckgen application
// ABOUTME: Serializes positioned slide elements into an OOXML presentation archive

use crate::errors::{DeckError, Result};
use crate::layout::{Element, ImageElement, TextElement};
use crate::style::{Align, Frame, ShapeKind, ShapeSpec};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{info, warn};
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::{write::FileOptions, ZipWriter};

/// Media type of the packaged document, used for the data URI.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Configuration for PPTX packaging
#[derive(Debug, Clone)]
pub struct PackageConfig {
    pub title: String,
    pub aspect_ratio: String, // "16:9" or "4:3"
    pub template: Option<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            title: "Presentation".to_string(),
            aspect_ratio: "16:9".to_string(),
            template: None,
        }
    }
}

/// Serialize a laid-out deck (one element list per slide, in paint order)
/// into PPTX bytes. All-or-nothing: geometry is validated up front so a
/// failure never leaves a partial document behind.
pub fn package(deck: &[Vec<Element>], config: &PackageConfig) -> Result<Vec<u8>> {
    info!("Packaging {} slides", deck.len());
    validate_geometry(deck)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    // Set slide dimensions based on aspect ratio
    let (cx, cy) = match config.aspect_ratio.as_str() {
        "16:9" => (9144000i64, 5143500i64),
        "4:3" => (9144000i64, 6858000i64),
        _ => {
            warn!(
                "Unsupported aspect ratio: {}. Using 16:9 instead.",
                config.aspect_ratio
            );
            (9144000, 5143500)
        }
    };

    write_content_types(&mut zip, deck.len())?;
    write_package_rels(&mut zip)?;
    write_doc_props(&mut zip, deck.len(), config)?;
    write_presentation(&mut zip, deck.len(), cx, cy, &config.aspect_ratio)?;

    for (i, elements) in deck.iter().enumerate() {
        write_slide(&mut zip, i + 1, elements, cx, cy)?;
    }

    info!("Finalizing PPTX archive");
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Wrap packaged bytes as a data URI usable as a download link target.
pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", PPTX_MIME, BASE64.encode(bytes))
}

/// The layout engine only emits positive extents; anything else here is a bug
/// upstream, reported rather than encoded.
fn validate_geometry(deck: &[Vec<Element>]) -> Result<()> {
    for (slide_idx, elements) in deck.iter().enumerate() {
        for (el_idx, element) in elements.iter().enumerate() {
            let Frame { x, y, w, h } = element.frame();
            if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
                return Err(DeckError::PackagingError(format!(
                    "Slide {} element {} has non-finite geometry",
                    slide_idx + 1,
                    el_idx
                )));
            }
            if w <= 0.0 || h <= 0.0 {
                return Err(DeckError::PackagingError(format!(
                    "Slide {} element {} has non-positive dimensions {}x{}",
                    slide_idx + 1,
                    el_idx,
                    w,
                    h
                )));
            }
        }
    }
    Ok(())
}

fn emu(pct: f32, total: i64) -> i64 {
    ((pct as f64 / 100.0) * total as f64).round() as i64
}

fn xfrm(frame: &Frame, cx: i64, cy: i64) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        emu(frame.x, cx),
        emu(frame.y, cy),
        emu(frame.w, cx),
        emu(frame.h, cy)
    )
}

fn write_content_types<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    slide_count: usize,
) -> Result<()> {
    info!("Creating PPTX structure: [Content_Types].xml");
    zip.start_file("[Content_Types].xml", FileOptions::default())?;
    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="jpeg" ContentType="image/jpeg"/>
    <Default Extension="jpg" ContentType="image/jpeg"/>
    <Default Extension="png" ContentType="image/png"/>
    <Default Extension="gif" ContentType="image/gif"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
    {slides}
</Types>"#,
        slides = (0..slide_count).map(|i| {
            format!(r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#, i + 1)
        }).collect::<Vec<String>>().join("\n")
    );
    zip.write_all(content_types.as_bytes())?;
    Ok(())
}

fn write_package_rels<W: Write + std::io::Seek>(zip: &mut ZipWriter<W>) -> Result<()> {
    info!("Creating PPTX structure: _rels/.rels");
    zip.start_file("_rels/.rels", FileOptions::default())?;
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;
    zip.write_all(rels.as_bytes())?;
    Ok(())
}

fn write_doc_props<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    slide_count: usize,
    config: &PackageConfig,
) -> Result<()> {
    info!("Creating PPTX structure: docProps/app.xml");
    zip.start_file("docProps/app.xml", FileOptions::default())?;
    let template = config
        .template
        .as_deref()
        .map(|name| format!("\n    <Template>{}</Template>", escape(name)))
        .unwrap_or_default();
    let app_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>deckgen</Application>
    <Slides>{}</Slides>{}
</Properties>"#,
        slide_count, template
    );
    zip.write_all(app_xml.as_bytes())?;

    info!("Creating PPTX structure: docProps/core.xml");
    zip.start_file("docProps/core.xml", FileOptions::default())?;
    let core_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{}</dc:title>
    <dc:creator>deckgen</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
        escape(&config.title),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
    zip.write_all(core_xml.as_bytes())?;
    Ok(())
}

fn write_presentation<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    slide_count: usize,
    cx: i64,
    cy: i64,
    aspect_ratio: &str,
) -> Result<()> {
    info!("Creating PPTX structure: ppt/_rels/presentation.xml.rels");
    zip.start_file("ppt/_rels/presentation.xml.rels", FileOptions::default())?;

    let mut pres_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for i in 0..slide_count {
        pres_rels.push_str(&format!(
            r#"    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i + 1,
            i + 1
        ));
        pres_rels.push('\n');
    }
    pres_rels.push_str("</Relationships>");
    zip.write_all(pres_rels.as_bytes())?;

    info!("Creating PPTX structure: ppt/presentation.xml");
    zip.start_file("ppt/presentation.xml", FileOptions::default())?;
    let size_type = if aspect_ratio == "4:3" {
        r#" type="screen4x3""#
    } else {
        ""
    };
    let presentation_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    <p:sldSz cx="{cx}" cy="{cy}"{size_type}/>
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
        slide_ids = (0..slide_count)
            .map(|i| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 1))
            .collect::<Vec<String>>()
            .join("\n"),
        cx = cx,
        cy = cy,
        size_type = size_type
    );
    zip.write_all(presentation_xml.as_bytes())?;
    Ok(())
}

// A pending relationship entry for one slide's rels part.
enum SlideRel {
    Media { name: String },
    External { url: String },
}

fn write_slide<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    slide_num: usize,
    elements: &[Element],
    cx: i64,
    cy: i64,
) -> Result<()> {
    info!("Processing slide {}", slide_num);

    // First pass over images: stage media bytes and relationship entries so
    // the shape tree can reference them by rId.
    let mut rels: Vec<SlideRel> = Vec::new();
    let mut media: Vec<(String, Vec<u8>)> = Vec::new();
    let mut image_rel_ids: Vec<usize> = Vec::new();

    for element in elements {
        if let Element::Image(image) = element {
            let rel_id = rels.len() + 1;
            image_rel_ids.push(rel_id);
            match &image.data {
                Some(fetched) => {
                    let name = format!("image{}_{}.{}", slide_num, rel_id, fetched.extension);
                    media.push((name.clone(), fetched.bytes.clone()));
                    rels.push(SlideRel::Media { name });
                }
                None => {
                    rels.push(SlideRel::External {
                        url: image.source.url.clone(),
                    });
                }
            }
        }
    }

    for (name, bytes) in &media {
        info!("Adding image to PPTX: ppt/media/{}", name);
        zip.start_file(format!("ppt/media/{}", name), FileOptions::default())?;
        zip.write_all(bytes)?;
    }

    if !rels.is_empty() {
        info!(
            "Creating slide relationships: ppt/slides/_rels/slide{}.xml.rels",
            slide_num
        );
        zip.start_file(
            format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
            FileOptions::default(),
        )?;
        let mut slide_rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
        );
        for (idx, rel) in rels.iter().enumerate() {
            match rel {
                SlideRel::Media { name } => slide_rels.push_str(&format!(
                    r#"    <Relationship Id="rId{}" Type="{}" Target="../media/{}"/>"#,
                    idx + 1,
                    REL_TYPE_IMAGE,
                    name
                )),
                SlideRel::External { url } => slide_rels.push_str(&format!(
                    r#"    <Relationship Id="rId{}" Type="{}" Target="{}" TargetMode="External"/>"#,
                    idx + 1,
                    REL_TYPE_IMAGE,
                    escape(url)
                )),
            }
            slide_rels.push('\n');
        }
        slide_rels.push_str("</Relationships>");
        zip.write_all(slide_rels.as_bytes())?;
    }

    // Second pass: the shape tree, in paint order. Shape ids start at 2;
    // id 1 is the group shape.
    let mut body = String::new();
    let mut image_cursor = 0usize;
    for (idx, element) in elements.iter().enumerate() {
        let shape_id = idx + 2;
        match element {
            Element::Shape(shape) => body.push_str(&shape_xml(shape, shape_id, cx, cy)),
            Element::Text(text) => body.push_str(&text_xml(text, shape_id, cx, cy)),
            Element::Image(image) => {
                let rel_id = image_rel_ids[image_cursor];
                image_cursor += 1;
                let embedded = matches!(rels[rel_id - 1], SlideRel::Media { .. });
                body.push_str(&pic_xml(image, shape_id, rel_id, embedded, cx, cy));
            }
        }
    }

    info!("Creating slide XML: ppt/slides/slide{}.xml", slide_num);
    zip.start_file(
        format!("ppt/slides/slide{}.xml", slide_num),
        FileOptions::default(),
    )?;
    let slide_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
    <p:cSld>
        <p:spTree>
            <p:nvGrpSpPr>
                <p:cNvPr id="1" name=""/>
                <p:cNvGrpSpPr/>
                <p:nvPr/>
            </p:nvGrpSpPr>
            <p:grpSpPr>
                <a:xfrm>
                    <a:off x="0" y="0"/>
                    <a:ext cx="0" cy="0"/>
                    <a:chOff x="0" y="0"/>
                    <a:chExt cx="0" cy="0"/>
                </a:xfrm>
            </p:grpSpPr>
{body}        </p:spTree>
    </p:cSld>
    <p:clrMapOvr>
        <a:masterClrMapping/>
    </p:clrMapOvr>
</p:sld>"#,
        body = body
    );
    zip.write_all(slide_xml.as_bytes())?;
    Ok(())
}

fn shape_xml(shape: &ShapeSpec, id: usize, cx: i64, cy: i64) -> String {
    let prst = match shape.kind {
        ShapeKind::Rect => "rect",
        ShapeKind::Ellipse => "ellipse",
    };
    let alpha = shape
        .opacity
        .map(|o| format!(r#"<a:alpha val="{}"/>"#, (o * 100000.0).round() as i64))
        .unwrap_or_default();
    let line = shape
        .line
        .as_deref()
        .map(|c| format!(r#"<a:ln><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln>"#, c))
        .unwrap_or_default();
    format!(
        r#"            <p:sp>
                <p:nvSpPr>
                    <p:cNvPr id="{id}" name="Shape {id}"/>
                    <p:cNvSpPr/>
                    <p:nvPr/>
                </p:nvSpPr>
                <p:spPr>
                    {xfrm}
                    <a:prstGeom prst="{prst}"><a:avLst/></a:prstGeom>
                    <a:solidFill><a:srgbClr val="{fill}">{alpha}</a:srgbClr></a:solidFill>
                    {line}
                </p:spPr>
                <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>
            </p:sp>
"#,
        id = id,
        xfrm = xfrm(&shape.frame, cx, cy),
        prst = prst,
        fill = shape.fill,
        alpha = alpha,
        line = line
    )
}

fn text_xml(text: &TextElement, id: usize, cx: i64, cy: i64) -> String {
    let algn = match text.align {
        Align::Left => "l",
        Align::Center => "ctr",
    };
    let bullet = match &text.bullet {
        Some(spec) => format!(
            r#"<a:buClr><a:srgbClr val="{}"/></a:buClr><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#,
            spec.color
        ),
        None => "<a:buNone/>".to_string(),
    };
    let bold = if text.bold { r#" b="1""# } else { "" };
    let italic = if text.italic { r#" i="1""# } else { "" };
    format!(
        r#"            <p:sp>
                <p:nvSpPr>
                    <p:cNvPr id="{id}" name="TextBox {id}"/>
                    <p:cNvSpPr txBox="1"/>
                    <p:nvPr/>
                </p:nvSpPr>
                <p:spPr>
                    {xfrm}
                    <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
                    <a:noFill/>
                </p:spPr>
                <p:txBody>
                    <a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr>
                    <a:lstStyle/>
                    <a:p>
                        <a:pPr algn="{algn}">{bullet}</a:pPr>
                        <a:r>
                            <a:rPr lang="en-US" sz="{sz}"{bold}{italic} dirty="0">
                                <a:solidFill><a:srgbClr val="{color}"/></a:solidFill>
                                <a:latin typeface="{font}"/>
                            </a:rPr>
                            <a:t>{content}</a:t>
                        </a:r>
                    </a:p>
                </p:txBody>
            </p:sp>
"#,
        id = id,
        xfrm = xfrm(&text.frame, cx, cy),
        algn = algn,
        bullet = bullet,
        sz = text.font_size * 100,
        bold = bold,
        italic = italic,
        color = text.color,
        font = escape(&text.font_face),
        content = escape(&text.content)
    )
}

fn pic_xml(
    image: &ImageElement,
    id: usize,
    rel_id: usize,
    embedded: bool,
    cx: i64,
    cy: i64,
) -> String {
    let blip = if embedded {
        format!(r#"<a:blip r:embed="rId{}"/>"#, rel_id)
    } else {
        format!(r#"<a:blip r:link="rId{}"/>"#, rel_id)
    };
    let descr = image
        .source
        .alt
        .as_deref()
        .map(|alt| format!(r#" descr="{}""#, escape(alt)))
        .unwrap_or_default();
    format!(
        r#"            <p:pic>
                <p:nvPicPr>
                    <p:cNvPr id="{id}" name="Picture {id}"{descr}/>
                    <p:cNvPicPr>
                        <a:picLocks noChangeAspect="1"/>
                    </p:cNvPicPr>
                    <p:nvPr/>
                </p:nvPicPr>
                <p:blipFill>
                    {blip}
                    <a:stretch>
                        <a:fillRect/>
                    </a:stretch>
                </p:blipFill>
                <p:spPr>
                    {xfrm}
                    <a:prstGeom prst="rect">
                        <a:avLst/>
                    </a:prstGeom>
                </p:spPr>
            </p:pic>
"#,
        id = id,
        descr = descr,
        blip = blip,
        xfrm = xfrm(&image.frame, cx, cy)
    )
}
