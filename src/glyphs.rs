//! Glyph Mapping
//!
//! Converts normalized text into an ordered sequence of per-character
//! fingerspelling image references, with word-boundary markers between words.

use std::path::PathBuf;

use serde::Serialize;

/// One element of the fingerspelling output sequence.
///
/// Serializes untagged: an image reference becomes its URL string and a word
/// break becomes JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GlyphToken {
    /// URL of a per-character image asset
    Image(String),
    /// Word boundary marker
    WordBreak,
}

impl GlyphToken {
    pub fn is_break(&self) -> bool {
        matches!(self, GlyphToken::WordBreak)
    }
}

/// Maps text onto per-character image assets on disk
pub struct GlyphMapper {
    asset_dir: PathBuf,
}

impl GlyphMapper {
    /// Create a mapper over the given asset directory
    pub fn new(asset_dir: PathBuf) -> Self {
        Self { asset_dir }
    }

    /// Map text to an image sequence with word-break markers.
    ///
    /// Characters without an asset on disk are skipped silently. The output
    /// never starts or ends with a break and never contains two in a row.
    pub fn map(&self, text: &str) -> Vec<GlyphToken> {
        let mut tokens: Vec<GlyphToken> = Vec::new();

        for word in text.to_uppercase().split_whitespace() {
            let mut emitted = false;
            for ch in word.chars().filter(|c| c.is_ascii_alphanumeric()) {
                let filename = format!("{ch}.jpg");
                // Existence is checked per request; assets may change on disk
                if self.asset_dir.join(&filename).exists() {
                    if !emitted && !tokens.is_empty() {
                        tokens.push(GlyphToken::WordBreak);
                    }
                    tokens.push(GlyphToken::Image(format!("/asl_images/{filename}")));
                    emitted = true;
                }
            }
        }

        tokens
    }
}
