//! Error types for tagstream.
//!
//! Configuration is the only place the core can fail. Once a
//! [`StreamParser`](crate::StreamParser) exists, every chunk of text is
//! accepted: malformed markup, stray closing tags and unknown angle-bracket
//! sequences are handled by parsing policy rather than reported.

use thiserror::Error;

/// Invalid parser configuration.
///
/// Returned synchronously when building a [`TagRegistry`](crate::TagRegistry)
/// or a [`StreamParser`](crate::StreamParser). No partially configured parser
/// is ever produced.
///
/// # Example
///
/// ```ignore
/// let err = StreamParser::with_tags([("1bad", "x")]).unwrap_err();
/// assert_eq!(err, ConfigError::InvalidTagName { name: "1bad".into() });
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A tag was configured with an empty name.
    #[error("tag name must be a non-empty string")]
    EmptyTagName,

    /// A tag name does not match `^[A-Za-z][A-Za-z0-9_-]*$`.
    #[error(
        "invalid tag name {name:?}: must start with a letter and contain only letters, digits, '_' or '-'"
    )]
    InvalidTagName {
        /// The rejected name.
        name: String,
    },

    /// A tag was configured with an empty step label.
    #[error("step label for tag {tag:?} must be a non-empty string")]
    EmptyStepLabel {
        /// The tag whose label is empty.
        tag: String,
    },

    /// The label used for content outside any block is empty.
    #[error("answer label must be a non-empty string")]
    EmptyAnswerLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::EmptyTagName.to_string(),
            "tag name must be a non-empty string"
        );
        assert_eq!(
            ConfigError::EmptyStepLabel {
                tag: "think".into()
            }
            .to_string(),
            "step label for tag \"think\" must be a non-empty string"
        );
        assert!(
            ConfigError::InvalidTagName {
                name: "1bad".into()
            }
            .to_string()
            .starts_with("invalid tag name \"1bad\"")
        );
    }
}
