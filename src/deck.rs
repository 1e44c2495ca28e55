// ABOUTME: Deck assembly pipeline for the deckgen application
// ABOUTME: Composes theme, styles, transformation, layout and packaging into one call

use crate::errors::Result;
use crate::images;
use crate::layout::{layout_slide, Element, LayoutOptions};
use crate::outline::Outline;
use crate::pptx::{self, PackageConfig};
use crate::slides::slides_from_outline;
use crate::style;
use crate::theme::Theme;
use log::{info, warn};

/// Options for a single deck build. Constructed per request; nothing here is
/// shared across requests.
#[derive(Debug, Clone)]
pub struct DeckOptions {
    pub theme: String,
    pub layout: LayoutOptions,
    pub package: PackageConfig,
    /// Fetch image bytes for embedding. When off (or when a fetch fails) the
    /// package references image URLs externally instead.
    pub fetch_images: bool,
    pub fetch_timeout_ms: u64,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            theme: "modern".to_string(),
            layout: LayoutOptions::default(),
            package: PackageConfig::default(),
            fetch_images: false,
            fetch_timeout_ms: 10000,
        }
    }
}

/// Lay out every slide of an outline. Exposed separately from packaging so
/// callers can inspect or post-process the element lists.
pub fn layout_deck(outline: &Outline, options: &DeckOptions) -> Vec<Vec<Element>> {
    let theme = Theme::resolve(&options.theme);
    let styles = style::compose(&theme);
    let slides = slides_from_outline(outline);

    info!(
        "Laying out {} slides with theme '{}'",
        slides.len(),
        theme.id
    );

    slides
        .iter()
        .map(|slide| layout_slide(slide, &styles, &options.layout))
        .collect()
}

/// Build a complete deck: resolve the theme, compose styles, transform the
/// outline, lay out each slide and package the result as PPTX bytes.
pub fn build_deck(outline: &Outline, options: &DeckOptions) -> Result<Vec<u8>> {
    let mut deck = layout_deck(outline, options);

    if options.fetch_images {
        resolve_images(&mut deck, options.fetch_timeout_ms);
    }

    let mut package_config = options.package.clone();
    if package_config.title == PackageConfig::default().title {
        package_config.title = outline.title.clone();
    }

    pptx::package(&deck, &package_config)
}

/// Build a deck and wrap it as a base64 data URI for direct download use.
pub fn build_deck_data_uri(outline: &Outline, options: &DeckOptions) -> Result<String> {
    let bytes = build_deck(outline, options)?;
    Ok(pptx::data_uri(&bytes))
}

/// Fetch bytes for every image element in place. A failed fetch downgrades
/// that image to an external reference rather than failing the deck.
fn resolve_images(deck: &mut [Vec<Element>], timeout_ms: u64) {
    for elements in deck.iter_mut() {
        for element in elements.iter_mut() {
            if let Element::Image(image) = element {
                match images::fetch_image(&image.source.url, timeout_ms) {
                    Ok(fetched) => image.data = Some(fetched),
                    Err(e) => {
                        warn!(
                            "Could not fetch image {}; linking externally: {}",
                            image.source.url, e
                        );
                    }
                }
            }
        }
    }
}
