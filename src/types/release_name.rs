// ABOUTME: Helm release name validation.
// ABOUTME: Release names are dot-separated RFC 1123 labels, at most 53 characters overall.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseNameError {
    #[error("release name cannot be empty")]
    Empty,

    #[error("release name exceeds maximum length of 53 characters")]
    TooLong,

    #[error("release name has an empty label between dots")]
    EmptyLabel,

    #[error("release name label cannot start with a hyphen: {0:?}")]
    StartsWithHyphen(String),

    #[error("release name label cannot end with a hyphen: {0:?}")]
    EndsWithHyphen(String),

    #[error("release name must be lowercase")]
    NotLowercase,

    #[error("invalid character in release name: '{0}'")]
    InvalidChar(char),
}

/// Helm caps release names at 53 characters so derived resource names fit.
const MAX_LEN: usize = 53;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseName(String);

impl ReleaseName {
    pub fn new(value: &str) -> Result<Self, ReleaseNameError> {
        if value.is_empty() {
            return Err(ReleaseNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(ReleaseNameError::TooLong);
        }

        if let Some(c) = value.chars().find(|&c| !matches!(c, 'a'..='z' | '0'..='9' | '-' | '.')) {
            return Err(if c.is_ascii_uppercase() {
                ReleaseNameError::NotLowercase
            } else {
                ReleaseNameError::InvalidChar(c)
            });
        }

        value.split('.').try_for_each(check_label)?;

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A label holds only `[a-z0-9-]` here; hyphens may not open or close it.
fn check_label(label: &str) -> Result<(), ReleaseNameError> {
    if label.is_empty() {
        return Err(ReleaseNameError::EmptyLabel);
    }
    if label.starts_with('-') {
        return Err(ReleaseNameError::StartsWithHyphen(label.to_string()));
    }
    if label.ends_with('-') {
        return Err(ReleaseNameError::EndsWithHyphen(label.to_string()));
    }
    Ok(())
}

impl fmt::Display for ReleaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
