// ABOUTME: Digest-based tagger.
// ABOUTME: Uses the hex part of the built image ID as the tag.

use super::{TagError, TagOptions, Tagger};

/// Tags an image with the hex digest of its image ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumTagger;

impl Tagger for ChecksumTagger {
    fn generate_tag(&self, opts: &TagOptions<'_>) -> Result<String, TagError> {
        let hex = opts.digest.trim();
        let hex = hex.strip_prefix("sha256:").unwrap_or(hex);

        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TagError::InvalidDigest {
                image: opts.image_name.to_string(),
                digest: opts.digest.to_string(),
            });
        }

        Ok(hex.to_ascii_lowercase())
    }
}
