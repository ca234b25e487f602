//! Keyword-driven glyph selection.
//!
//! The description is lower-cased and checked against [`GLYPH_RULES`] from top
//! to bottom; the first rule with a keyword occurring anywhere in the text
//! wins. When nothing matches, [`GlyphKind::Geometric`] is drawn.
//!
//! ```
//! use iconmaker::{select_glyph, GlyphKind};
//!
//! assert_eq!(select_glyph("A shiny Gold Star"), GlyphKind::Star);
//! // "round" is checked before "star"
//! assert_eq!(select_glyph("round star icon"), GlyphKind::Circle);
//! assert_eq!(select_glyph("xyz nonsense"), GlyphKind::Geometric);
//! ```

mod path;
mod shapes;

pub use shapes::Painter;

use serde::{Deserialize, Serialize};

// ============================================================================
// GlyphKind
// ============================================================================

/// The drawable glyph routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlyphKind {
    Circle,
    Star,
    Heart,
    Arrow,
    Gear,
    House,
    Envelope,
    Music,
    Camera,
    Lock,
    /// Three stacked rounded squares; drawn when no keyword matches.
    Geometric,
}

impl GlyphKind {
    /// Paints this glyph at its fixed 512x512 coordinates.
    pub fn draw(&self, painter: &mut Painter<'_>) {
        match self {
            Self::Circle => shapes::circle(painter),
            Self::Star => shapes::star(painter),
            Self::Heart => shapes::heart(painter),
            Self::Arrow => shapes::arrow(painter),
            Self::Gear => shapes::gear(painter),
            Self::House => shapes::house(painter),
            Self::Envelope => shapes::envelope(painter),
            Self::Music => shapes::music_note(painter),
            Self::Camera => shapes::camera(painter),
            Self::Lock => shapes::lock(painter),
            Self::Geometric => shapes::geometric(painter),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Arrow => "arrow",
            Self::Gear => "gear",
            Self::House => "house",
            Self::Envelope => "envelope",
            Self::Music => "music",
            Self::Camera => "camera",
            Self::Lock => "lock",
            Self::Geometric => "geometric",
        }
    }
}

// ============================================================================
// Dispatch Table
// ============================================================================

/// A set of trigger keywords and the glyph they select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRule {
    pub keywords: &'static [&'static str],
    pub kind: GlyphKind,
}

impl GlyphRule {
    /// Returns true if any keyword occurs in the (already lower-cased) text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Rules in priority order. Reordering changes the output for descriptions
/// that hit more than one rule.
pub const GLYPH_RULES: [GlyphRule; 10] = [
    GlyphRule {
        keywords: &["circle", "round", "ball", "dot"],
        kind: GlyphKind::Circle,
    },
    GlyphRule {
        keywords: &["star", "rating", "favorite"],
        kind: GlyphKind::Star,
    },
    GlyphRule {
        keywords: &["heart", "love", "like"],
        kind: GlyphKind::Heart,
    },
    GlyphRule {
        keywords: &["arrow", "play", "forward", "next"],
        kind: GlyphKind::Arrow,
    },
    GlyphRule {
        keywords: &["gear", "settings", "config", "cog"],
        kind: GlyphKind::Gear,
    },
    GlyphRule {
        keywords: &["house", "home", "building"],
        kind: GlyphKind::House,
    },
    GlyphRule {
        keywords: &["envelope", "mail", "message", "email"],
        kind: GlyphKind::Envelope,
    },
    GlyphRule {
        keywords: &["music", "note", "sound", "audio"],
        kind: GlyphKind::Music,
    },
    GlyphRule {
        keywords: &["camera", "photo", "picture", "image"],
        kind: GlyphKind::Camera,
    },
    GlyphRule {
        keywords: &["lock", "security", "protect", "safe"],
        kind: GlyphKind::Lock,
    },
];

/// Picks the glyph for a description.
pub fn select_glyph(description: &str) -> GlyphKind {
    let lowered = description.to_lowercase();
    GLYPH_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.kind)
        .unwrap_or(GlyphKind::Geometric)
}
