// ABOUTME: Outline data model for the deckgen application
// ABOUTME: Defines the title/sections/points structure consumed by the pipeline

use serde::{Deserialize, Serialize};

/// A validated presentation outline: the semantic content of a deck before
/// any layout happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,

    /// Optional one-line summary, rendered as the title slide subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub sections: Vec<Section>,
}

/// One section of the outline; becomes one content slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    pub points: Vec<Point>,

    /// Already-resolved illustration for this section, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,

    /// Search query used upstream to find an image. Carried for diagnostics;
    /// the crate never performs the search itself.
    #[serde(default, rename = "imageQuery", skip_serializing_if = "Option::is_none")]
    pub image_query: Option<String>,
}

/// A bullet point: either a plain string or a structured point with an
/// optional description and code snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Point {
    Structured {
        main: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Simple(String),
}

impl Point {
    /// The bullet text shown at the top level of the point.
    pub fn text(&self) -> &str {
        match self {
            Point::Simple(s) => s,
            Point::Structured { main, .. } => main,
        }
    }
}

/// A displayable image reference with optional attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<ImageCredit>,
}

/// Attribution for an image, as returned by the image-search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCredit {
    pub name: String,
    pub link: String,
}
