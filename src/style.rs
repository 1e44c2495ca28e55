// ABOUTME: Style composition for the deckgen application
// ABOUTME: Builds per-slide-kind style bundles (shapes and text presets) from a theme

use crate::theme::Theme;

/// A bounding box in percent-of-canvas units. `x`/`y` may be negative for
/// decorative shapes that bleed off the canvas edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Frame {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    Ellipse,
}

/// A decorative shape descriptor: geometry plus fill, with optional outline
/// color and opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub frame: Frame,
    pub fill: String,
    pub line: Option<String>,
    pub opacity: Option<f32>,
}

impl ShapeSpec {
    pub fn rect(frame: Frame, fill: &str) -> Self {
        Self {
            kind: ShapeKind::Rect,
            frame,
            fill: fill.to_string(),
            line: None,
            opacity: None,
        }
    }

    pub fn ellipse(frame: Frame, fill: &str, opacity: f32) -> Self {
        Self {
            kind: ShapeKind::Ellipse,
            frame,
            fill: fill.to_string(),
            line: None,
            opacity: Some(opacity),
        }
    }
}

/// Bullet styling for a text preset.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletSpec {
    pub color: String,
}

/// Typography and default geometry for one kind of text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPreset {
    pub frame: Frame,
    pub font_size: u32,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub font_face: &'static str,
    pub bullet: Option<BulletSpec>,
}

/// The full styling for one slide kind: background color, decorative shapes
/// and the named text presets.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideStyle {
    pub background: String,
    pub shapes: Vec<ShapeSpec>,
    pub title: TextPreset,
    pub subtitle: Option<TextPreset>,
    pub body: Option<TextPreset>,
}

/// Styles for both slide kinds, built once per deck from a resolved theme.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleBundle {
    pub theme: Theme,
    pub title: SlideStyle,
    pub content: SlideStyle,
}

/// Compose the style bundle for a theme. Pure; the bundle is never mutated
/// after construction.
pub fn compose(theme: &Theme) -> StyleBundle {
    StyleBundle {
        theme: *theme,
        title: title_slide_style(theme),
        content: content_slide_style(theme),
    }
}

fn title_slide_style(theme: &Theme) -> SlideStyle {
    SlideStyle {
        background: theme.background.to_string(),
        shapes: vec![
            // Header bar across the top fifth of the canvas.
            ShapeSpec::rect(Frame::new(0.0, 0.0, 100.0, 20.0), theme.primary),
            // Thin accent divider just below the header.
            ShapeSpec::rect(Frame::new(5.0, 18.0, 90.0, 0.3), theme.accent),
            // Translucent circle bleeding off the top-right corner.
            ShapeSpec::ellipse(Frame::new(70.0, -10.0, 40.0, 40.0), theme.secondary, 0.2),
        ],
        title: TextPreset {
            frame: Frame::new(5.0, 30.0, 90.0, 20.0),
            font_size: 44,
            color: theme.primary.to_string(),
            bold: true,
            italic: false,
            align: Align::Center,
            font_face: "Arial",
            bullet: None,
        },
        subtitle: Some(TextPreset {
            frame: Frame::new(10.0, 55.0, 80.0, 15.0),
            font_size: 28,
            color: "404040".to_string(),
            bold: false,
            italic: false,
            align: Align::Center,
            font_face: "Arial",
            bullet: None,
        }),
        body: None,
    }
}

fn content_slide_style(theme: &Theme) -> SlideStyle {
    SlideStyle {
        background: theme.background.to_string(),
        shapes: vec![
            ShapeSpec::rect(Frame::new(0.0, 0.0, 100.0, 15.0), theme.primary),
            ShapeSpec::rect(Frame::new(5.0, 14.0, 90.0, 0.2), theme.accent),
        ],
        // Title renders over the header bar, so it is white.
        title: TextPreset {
            frame: Frame::new(5.0, 4.0, 90.0, 10.0),
            font_size: 32,
            color: "FFFFFF".to_string(),
            bold: true,
            italic: false,
            align: Align::Left,
            font_face: "Arial",
            bullet: None,
        },
        subtitle: None,
        body: Some(TextPreset {
            frame: Frame::new(5.0, 20.0, 90.0, 6.0),
            font_size: 24,
            color: "333333".to_string(),
            bold: false,
            italic: false,
            align: Align::Left,
            font_face: "Arial",
            bullet: Some(BulletSpec {
                color: theme.primary.to_string(),
            }),
        }),
    }
}
