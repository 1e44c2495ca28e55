// ABOUTME: Image handling for the deckgen application
// ABOUTME: Picks search candidates and fetches remote image bytes for embedding

use crate::errors::{DeckError, Result};
use crate::outline::{ImageCredit, ImageRef};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One result from the external image-search collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCandidate {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub credit: Option<ImageCredit>,
}

/// Image bytes fetched and validated, ready to be embedded in the package.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Select an image from search candidates: the first one wins. An empty
/// candidate list means "no image for this slide", not an error.
pub fn pick_image(candidates: &[ImageCandidate], query: &str) -> Option<ImageRef> {
    let selected = candidates.first()?;
    info!(
        "Selected image {} of {} candidates for query \"{}\"",
        selected.id.as_deref().unwrap_or("<unidentified>"),
        candidates.len(),
        query
    );
    Some(ImageRef {
        url: selected.url.clone(),
        alt: Some(query.to_string()),
        credit: selected.credit.clone(),
    })
}

/// Fetch image bytes from a URL with retry, and verify they decode as a
/// supported picture format before handing them to the packager.
pub fn fetch_image(url: &str, timeout_ms: u64) -> Result<FetchedImage> {
    info!("Fetching image: {}", url);

    let client = Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(DeckError::FetchError)?;

    // Try up to 3 times with increasing backoff
    let mut retry_delay = 1000; // Start with 1 second
    let mut last_error = None;

    for attempt in 1..=3 {
        match client.get(url).send() {
            Ok(response) => {
                if response.status().is_success() {
                    let bytes = response.bytes().map_err(DeckError::FetchError)?;
                    return validate_image_bytes(bytes.to_vec(), url);
                } else {
                    let status = response.status();
                    last_error = Some(DeckError::ValidationError(format!(
                        "HTTP error: {}",
                        status
                    )));
                }
            }
            Err(e) => {
                last_error = Some(DeckError::FetchError(e));
            }
        }

        info!(
            "Fetch attempt {} failed, retrying in {} ms",
            attempt, retry_delay
        );
        std::thread::sleep(Duration::from_millis(retry_delay));
        retry_delay *= 2; // Exponential backoff
    }

    Err(last_error.unwrap_or_else(|| {
        DeckError::ValidationError("Unknown error fetching image".to_string())
    }))
}

/// PPTX media parts need a correct extension, and a picture that does not
/// decode would produce a deck with a broken frame, so both are checked here.
fn validate_image_bytes(bytes: Vec<u8>, url: &str) -> Result<FetchedImage> {
    let extension = match image::guess_format(&bytes) {
        Ok(image::ImageFormat::Png) => "png",
        Ok(image::ImageFormat::Jpeg) => "jpeg",
        Ok(image::ImageFormat::Gif) => "gif",
        Ok(other) => {
            return Err(DeckError::ImageError(format!(
                "Unsupported image format {:?} from {}",
                other, url
            )));
        }
        Err(e) => {
            return Err(DeckError::ImageError(format!(
                "Could not identify image data from {}: {}",
                url, e
            )));
        }
    };

    if let Err(e) = image::load_from_memory(&bytes) {
        warn!("Image from {} failed to decode: {}", url, e);
        return Err(DeckError::ImageError(format!(
            "Image from {} failed to decode: {}",
            url, e
        )));
    }

    Ok(FetchedImage { bytes, extension })
}
