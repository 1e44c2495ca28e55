// ABOUTME: Outline-to-slide transformation for the deckgen application
// ABOUTME: Expands a validated outline into an ordered sequence of slide descriptors

use crate::outline::{ImageRef, Outline, Point};

/// One slide's semantic content, prior to positioning.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideDescriptor {
    Title {
        title: String,
        subtitle: Option<String>,
    },
    Content {
        title: String,
        points: Vec<Point>,
        image: Option<ImageRef>,
    },
}

impl SlideDescriptor {
    pub fn is_title(&self) -> bool {
        matches!(self, SlideDescriptor::Title { .. })
    }
}

/// Produce the slide sequence for an outline: one title slide followed by one
/// content slide per section, in order. Points are carried through verbatim.
pub fn slides_from_outline(outline: &Outline) -> Vec<SlideDescriptor> {
    let mut slides = Vec::with_capacity(1 + outline.sections.len());

    slides.push(SlideDescriptor::Title {
        title: outline.title.clone(),
        subtitle: outline.description.clone(),
    });

    for section in &outline.sections {
        slides.push(SlideDescriptor::Content {
            title: section.title.clone(),
            points: section.points.clone(),
            image: section.image.clone(),
        });
    }

    slides
}
