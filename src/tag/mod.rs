// ABOUTME: Tag policies that assign a version tag to a freshly built image.
// ABOUTME: Exposes the Tagger trait and the enumerated set of known policies.

mod checksum;
mod date_time;
mod policy;

pub use checksum::ChecksumTagger;
pub use date_time::DateTimeTagger;
pub use policy::{TagPolicy, UnknownTagPolicy};

/// What a tagger knows about the image it is tagging.
#[derive(Debug, Clone, Copy)]
pub struct TagOptions<'a> {
    /// Repository of the artifact, e.g. `ghcr.io/org/app`.
    pub image_name: &'a str,
    /// Image ID reported by the builder, e.g. `sha256:4f…`.
    pub digest: &'a str,
}

/// Produces the tag for a built image.
pub trait Tagger: Send + Sync {
    fn generate_tag(&self, opts: &TagOptions<'_>) -> Result<String, TagError>;
}

/// Errors from tag generation.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("invalid image digest for {image}: {digest:?}")]
    InvalidDigest { image: String, digest: String },
}
