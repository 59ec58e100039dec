// ABOUTME: Time-based tagger.
// ABOUTME: Tags images with the UTC time at which they were tagged.

use chrono::{DateTime, Utc};

use super::{TagError, TagOptions, Tagger};

/// Default layout; docker tags cannot contain colons.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone)]
pub struct DateTimeTagger {
    format: String,
    clock: fn() -> DateTime<Utc>,
}

impl DateTimeTagger {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            clock: Utc::now,
        }
    }

    /// Use a fixed clock, for deterministic tags.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for DateTimeTagger {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

impl Tagger for DateTimeTagger {
    fn generate_tag(&self, _opts: &TagOptions<'_>) -> Result<String, TagError> {
        Ok((self.clock)().format(&self.format).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn formats_fixed_clock() {
        let tagger = DateTimeTagger::default().with_clock(fixed);
        let tag = tagger
            .generate_tag(&TagOptions {
                image_name: "app",
                digest: "",
            })
            .unwrap();
        assert_eq!(tag, "2024-03-09_14-05-07");
    }

    #[test]
    fn ignores_digest() {
        let tagger = DateTimeTagger::new("%Y").with_clock(fixed);
        let tag = tagger
            .generate_tag(&TagOptions {
                image_name: "app",
                digest: "not a digest",
            })
            .unwrap();
        assert_eq!(tag, "2024");
    }
}
