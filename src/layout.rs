// ABOUTME: Slide layout engine for the deckgen application
// ABOUTME: Computes positioned drawable elements from slide descriptors and styles

use crate::images::FetchedImage;
use crate::outline::{ImageRef, Point};
use crate::slides::SlideDescriptor;
use crate::style::{Align, BulletSpec, Frame, ShapeKind, ShapeSpec, SlideStyle, StyleBundle, TextPreset};
use log::warn;

// Calibrated layout constants. The vertical cursor and all frames are in
// percent-of-canvas units; heights are estimates, not measured text metrics,
// since the renderer wraps text itself.
const BODY_START_Y: f32 = 20.0;
const POINT_X: f32 = 5.0;
const POINT_TEXT_HEIGHT: f32 = 6.0;
const POINT_ADVANCE: f32 = 8.0;
const POINT_GAP: f32 = 2.0;

const DESC_X: f32 = 8.0;
const DESC_CHARS_PER_LINE: f32 = 30.0;
const DESC_LINE_HEIGHT: f32 = 3.0;
const DESC_GAP: f32 = 2.0;
const DESC_COLOR: &str = "666666";

const CODE_X: f32 = 8.0;
const CODE_TEXT_X: f32 = 9.0;
const CODE_LINE_HEIGHT: f32 = 2.5;
const CODE_PADDING: f32 = 3.0;
const CODE_TEXT_INSET_Y: f32 = 1.0;
const CODE_GAP: f32 = 1.0;
const CODE_FILL: &str = "444444";
const CODE_LINE_COLOR: &str = "AAAAAA";
const CODE_TEXT_COLOR: &str = "FFFFFF";
const CODE_FONT: &str = "Consolas";

const SIDE_IMAGE_FRAME: Frame = Frame::new(55.0, 30.0, 40.0, 50.0);
const TOP_IMAGE_FRAME: Frame = Frame::new(5.0, 20.0, 90.0, 30.0);
const TOP_IMAGE_GAP: f32 = 5.0;

const CONTENT_TITLE_FRAME: Frame = Frame::new(5.0, 5.0, 90.0, 10.0);

/// Where a content slide's image goes, relative to the points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePlacement {
    /// Right-hand column; points keep to the left half of the canvas.
    #[default]
    SideColumn,
    /// A full-width band above the points; the cursor starts below it.
    TopBand,
}

/// Options for the layout engine. Built per request; never shared state.
#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    pub image_placement: ImagePlacement,
}

/// A text box with resolved geometry and typography.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub frame: Frame,
    pub font_size: u32,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub font_face: String,
    pub bullet: Option<BulletSpec>,
}

/// An image placement. `data` is filled in later if the caller fetched the
/// bytes for embedding; otherwise the packager links the URL.
#[derive(Debug, Clone)]
pub struct ImageElement {
    pub frame: Frame,
    pub source: ImageRef,
    pub data: Option<FetchedImage>,
}

/// One positioned drawable. The element sequence for a slide is its paint
/// order: backgrounds and shapes first, code text inside its backdrop last.
#[derive(Debug, Clone)]
pub enum Element {
    Shape(ShapeSpec),
    Text(TextElement),
    Image(ImageElement),
}

impl Element {
    pub fn frame(&self) -> Frame {
        match self {
            Element::Shape(s) => s.frame,
            Element::Text(t) => t.frame,
            Element::Image(i) => i.frame,
        }
    }
}

// Column widths for the point stack; narrower when an image shares the
// canvas to the right.
struct BodyColumns {
    point_w: f32,
    desc_w: f32,
    code_w: f32,
}

const SIDE_COLUMNS: BodyColumns = BodyColumns {
    point_w: 50.0,
    desc_w: 42.0,
    code_w: 40.0,
};

const FULL_COLUMNS: BodyColumns = BodyColumns {
    point_w: 90.0,
    desc_w: 84.0,
    code_w: 80.0,
};

/// Lay out one slide into its positioned element list.
pub fn layout_slide(
    slide: &SlideDescriptor,
    styles: &StyleBundle,
    options: &LayoutOptions,
) -> Vec<Element> {
    match slide {
        SlideDescriptor::Title { title, subtitle } => {
            layout_title_slide(title, subtitle.as_deref(), &styles.title)
        }
        SlideDescriptor::Content {
            title,
            points,
            image,
        } => layout_content_slide(title, points, image.as_ref(), styles, options),
    }
}

/// Title slides use the fixed centered layout from the style bundle; there is
/// no flowing cursor.
fn layout_title_slide(title: &str, subtitle: Option<&str>, style: &SlideStyle) -> Vec<Element> {
    let mut elements = vec![background(style)];
    elements.extend(style.shapes.iter().cloned().map(Element::Shape));
    elements.push(Element::Text(text_from_preset(title, &style.title)));

    if let Some(subtitle) = subtitle {
        if let Some(preset) = &style.subtitle {
            elements.push(Element::Text(text_from_preset(subtitle, preset)));
        }
    }

    elements
}

fn layout_content_slide(
    title: &str,
    points: &[Point],
    image: Option<&ImageRef>,
    styles: &StyleBundle,
    options: &LayoutOptions,
) -> Vec<Element> {
    let style = &styles.content;
    let mut elements = vec![background(style)];
    elements.extend(style.shapes.iter().cloned().map(Element::Shape));

    // Title over the header bar, shifted down slightly from the preset.
    let mut title_text = text_from_preset(title, &style.title);
    title_text.frame = CONTENT_TITLE_FRAME;
    elements.push(Element::Text(title_text));

    let (start_y, columns) = match (image, options.image_placement) {
        (Some(image), ImagePlacement::SideColumn) => {
            elements.push(image_element(image, SIDE_IMAGE_FRAME));
            (BODY_START_Y, &SIDE_COLUMNS)
        }
        (Some(image), ImagePlacement::TopBand) => {
            elements.push(image_element(image, TOP_IMAGE_FRAME));
            // The band claims vertical space shared with the points, so the
            // cursor starts below it.
            (
                TOP_IMAGE_FRAME.y + TOP_IMAGE_FRAME.h + TOP_IMAGE_GAP,
                &FULL_COLUMNS,
            )
        }
        (None, ImagePlacement::SideColumn) => (BODY_START_Y, &SIDE_COLUMNS),
        (None, ImagePlacement::TopBand) => (BODY_START_Y, &FULL_COLUMNS),
    };

    let (final_y, point_elements) = layout_points(points, start_y, columns, styles);
    elements.extend(point_elements);

    if final_y > 100.0 {
        warn!(
            "Slide '{}' overflows the canvas (cursor at {:.1}%); content will not be clipped",
            title, final_y
        );
    }

    elements
}

/// Flow the point stack from `start_y`, threading the cursor through a fold
/// rather than mutating shared state. Returns the final cursor position and
/// the emitted elements in paint order.
fn layout_points(
    points: &[Point],
    start_y: f32,
    columns: &BodyColumns,
    styles: &StyleBundle,
) -> (f32, Vec<Element>) {
    points
        .iter()
        .fold((start_y, Vec::new()), |(y, mut elements), point| {
            let next_y = match point {
                Point::Simple(text) => emit_simple_point(text, y, columns, styles, &mut elements),
                Point::Structured {
                    main,
                    description,
                    code,
                    ..
                } => {
                    let mut cursor =
                        emit_main_point(main, y, columns, styles, &mut elements);
                    // An empty description string is treated as absent.
                    if let Some(desc) = description.as_deref().filter(|d| !d.trim().is_empty()) {
                        cursor = emit_description(desc, cursor, columns, &mut elements);
                    }
                    if let Some(code) = code.as_deref() {
                        cursor = emit_code_block(code, cursor, columns, &mut elements);
                    }
                    cursor
                }
            };
            (next_y + POINT_GAP, elements)
        })
}

fn emit_simple_point(
    text: &str,
    y: f32,
    columns: &BodyColumns,
    styles: &StyleBundle,
    elements: &mut Vec<Element>,
) -> f32 {
    let mut element = body_text(text, styles);
    element.frame = Frame::new(POINT_X, y, columns.point_w, POINT_TEXT_HEIGHT);
    element.font_size = 18;
    elements.push(Element::Text(element));
    y + POINT_ADVANCE
}

fn emit_main_point(
    main: &str,
    y: f32,
    columns: &BodyColumns,
    styles: &StyleBundle,
    elements: &mut Vec<Element>,
) -> f32 {
    let mut element = body_text(main, styles);
    element.frame = Frame::new(POINT_X, y, columns.point_w, POINT_TEXT_HEIGHT);
    element.font_size = 20;
    element.color = styles.theme.primary.to_string();
    element.bold = true;
    elements.push(Element::Text(element));
    y + POINT_ADVANCE
}

/// Bulleted body text styled from the content preset, with the theme primary
/// bullet as a fallback when no preset was composed.
fn body_text(content: &str, styles: &StyleBundle) -> TextElement {
    match &styles.content.body {
        Some(preset) => text_from_preset(content, preset),
        None => TextElement {
            content: content.to_string(),
            frame: Frame::new(POINT_X, BODY_START_Y, 90.0, POINT_TEXT_HEIGHT),
            font_size: 24,
            color: "333333".to_string(),
            bold: false,
            italic: false,
            align: Align::Left,
            font_face: "Arial".to_string(),
            bullet: Some(BulletSpec {
                color: styles.theme.primary.to_string(),
            }),
        },
    }
}

/// Height is estimated from character count; see `DESC_CHARS_PER_LINE`.
fn emit_description(
    description: &str,
    y: f32,
    columns: &BodyColumns,
    elements: &mut Vec<Element>,
) -> f32 {
    let lines = (description.chars().count() as f32 / DESC_CHARS_PER_LINE).ceil();
    let estimated_height = lines.max(1.0) * DESC_LINE_HEIGHT;

    elements.push(Element::Text(TextElement {
        content: description.to_string(),
        frame: Frame::new(DESC_X, y, columns.desc_w, estimated_height),
        font_size: 14,
        color: DESC_COLOR.to_string(),
        bold: false,
        italic: true,
        align: Align::Left,
        font_face: "Arial".to_string(),
        bullet: Some(BulletSpec {
            color: DESC_COLOR.to_string(),
        }),
    }));
    y + estimated_height + DESC_GAP
}

/// A backdrop rectangle sized by line count, then one monospaced text element
/// per code line painted inside it.
fn emit_code_block(
    code: &str,
    y: f32,
    columns: &BodyColumns,
    elements: &mut Vec<Element>,
) -> f32 {
    let lines: Vec<&str> = if code.is_empty() {
        Vec::new()
    } else {
        code.lines().collect()
    };
    // An empty snippet still gets a rectangle of minimum padding height.
    let rect_height = lines.len() as f32 * CODE_LINE_HEIGHT + CODE_PADDING;

    elements.push(Element::Shape(ShapeSpec {
        kind: ShapeKind::Rect,
        frame: Frame::new(CODE_X, y, columns.code_w, rect_height),
        fill: CODE_FILL.to_string(),
        line: Some(CODE_LINE_COLOR.to_string()),
        opacity: None,
    }));

    for (idx, line) in lines.iter().enumerate() {
        elements.push(Element::Text(TextElement {
            content: line.to_string(),
            frame: Frame::new(
                CODE_TEXT_X,
                y + CODE_TEXT_INSET_Y + idx as f32 * CODE_LINE_HEIGHT,
                columns.code_w - 2.0,
                CODE_LINE_HEIGHT,
            ),
            font_size: 10,
            color: CODE_TEXT_COLOR.to_string(),
            bold: false,
            italic: false,
            align: Align::Left,
            font_face: CODE_FONT.to_string(),
            bullet: None,
        }));
    }

    y + rect_height + CODE_GAP
}

fn background(style: &SlideStyle) -> Element {
    Element::Shape(ShapeSpec::rect(
        Frame::new(0.0, 0.0, 100.0, 100.0),
        &style.background,
    ))
}

fn text_from_preset(content: &str, preset: &TextPreset) -> TextElement {
    TextElement {
        content: content.to_string(),
        frame: preset.frame,
        font_size: preset.font_size,
        color: preset.color.clone(),
        bold: preset.bold,
        italic: preset.italic,
        align: preset.align,
        font_face: preset.font_face.to_string(),
        bullet: preset.bullet.clone(),
    }
}

fn image_element(image: &ImageRef, frame: Frame) -> Element {
    Element::Image(ImageElement {
        frame,
        source: image.clone(),
        data: None,
    })
}
