// ABOUTME: Theme resolution for the deckgen application
// ABOUTME: Maps theme identifiers to fixed color palettes with a safe fallback

use log::warn;

/// A resolved color palette. Colors are hex strings without a leading `#`,
/// ready to be written into DrawingML `srgbClr` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
}

const MODERN: Theme = Theme {
    id: "modern",
    primary: "2563eb",
    secondary: "3b82f6",
    accent: "60a5fa",
    background: "FFFFFF",
};

const TECH: Theme = Theme {
    id: "tech",
    primary: "7c3aed",
    secondary: "8b5cf6",
    accent: "a78bfa",
    background: "FFFFFF",
};

const NATURE: Theme = Theme {
    id: "nature",
    primary: "059669",
    secondary: "10b981",
    accent: "34d399",
    background: "FFFFFF",
};

impl Theme {
    /// Resolve a theme identifier to a palette. Unknown or empty identifiers
    /// fall back to `modern`, so this never fails.
    pub fn resolve(id: &str) -> Theme {
        match id {
            "modern" => MODERN,
            "tech" => TECH,
            "nature" => NATURE,
            other => {
                if !other.is_empty() {
                    warn!("Unknown theme '{}', falling back to 'modern'", other);
                }
                MODERN
            }
        }
    }

    /// The identifiers accepted by `resolve` without falling back.
    pub fn options() -> &'static [&'static str] {
        &["modern", "tech", "nature"]
    }
}

impl Default for Theme {
    fn default() -> Self {
        MODERN
    }
}
