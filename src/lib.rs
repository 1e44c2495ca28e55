// ABOUTME: Library module for the deckgen program.
// ABOUTME: Contains core functionality for sanitizing outlines, laying out slides, and packaging PPTX files.

// Reexport modules
pub mod config;
pub mod deck;
pub mod errors;
pub mod images;
pub mod layout;
pub mod outline;
pub mod pptx;
pub mod sanitize;
pub mod slides;
pub mod style;
pub mod theme;
pub mod utils;

// Reexport common types and functions
pub use config::{list_templates, Config};
pub use deck::{build_deck, build_deck_data_uri, layout_deck, DeckOptions};
pub use errors::{DeckError, Result};
pub use images::{fetch_image, pick_image, ImageCandidate};
pub use layout::{layout_slide, Element, ImagePlacement, LayoutOptions};
pub use outline::{ImageCredit, ImageRef, Outline, Point, Section};
pub use pptx::{data_uri, package, PackageConfig, PPTX_MIME};
pub use sanitize::sanitize;
pub use slides::{slides_from_outline, SlideDescriptor};
pub use style::{compose, StyleBundle};
pub use theme::Theme;
