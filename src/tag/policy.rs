// ABOUTME: Known tag policy identifiers.
// ABOUTME: Parses sha256 and dateTime and builds the matching tagger.

use std::fmt;
use std::str::FromStr;

use super::{ChecksumTagger, DateTimeTagger, Tagger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPolicy {
    /// Tag with the image digest.
    Sha256,
    /// Tag with the UTC build time.
    DateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag policy: {0:?} (expected one of: sha256, dateTime)")]
pub struct UnknownTagPolicy(pub String);

impl TagPolicy {
    pub const ALL: [TagPolicy; 2] = [TagPolicy::Sha256, TagPolicy::DateTime];

    pub fn tagger(self) -> Box<dyn Tagger> {
        match self {
            TagPolicy::Sha256 => Box::new(ChecksumTagger),
            TagPolicy::DateTime => Box::new(DateTimeTagger::default()),
        }
    }
}

impl FromStr for TagPolicy {
    type Err = UnknownTagPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(TagPolicy::Sha256),
            "dateTime" => Ok(TagPolicy::DateTime),
            _ => Err(UnknownTagPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for TagPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagPolicy::Sha256 => write!(f, "sha256"),
            TagPolicy::DateTime => write!(f, "dateTime"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_round_trip_through_display() {
        for policy in TagPolicy::ALL {
            assert_eq!(policy.to_string().parse::<TagPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        assert!("SHA256".parse::<TagPolicy>().is_err());
        assert!("datetime".parse::<TagPolicy>().is_err());
    }

    #[test]
    fn unknown_policy_names_the_input() {
        let err = "gitCommit".parse::<TagPolicy>().unwrap_err();
        assert!(err.to_string().contains("gitCommit"));
    }
}
