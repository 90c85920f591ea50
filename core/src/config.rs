//! Parser configuration.
//!
//! This module provides [`ParserConfig`], the plain-data description of a
//! parser: which tags are recognized, what step label each one carries, and
//! when partial content is surfaced.
//!
//! A config is not validated until a parser (or a
//! [`TagRegistry`](crate::TagRegistry)) is built from it, so it can be
//! assembled freely or deserialized from a file with the `serde` feature.
//!
//! # Example
//!
//! ```ignore
//! use tagstream_core::{ParserConfig, StreamParser};
//!
//! // Non-streaming, content outside tags labeled "answer"
//! let config = ParserConfig::new()
//!     .with_tag("think", "reasoning")
//!     .with_tag("tool", "tool call");
//!
//! // Surface tag content as it arrives
//! let config = config.with_streaming(true);
//!
//! let parser = StreamParser::new(config)?;
//! ```

use std::collections::BTreeMap;

/// Label given to content outside any configured block.
pub const DEFAULT_ANSWER_LABEL: &str = "answer";

/// Configuration for a [`StreamParser`](crate::StreamParser).
///
/// # Default Values
///
/// | Setting | Default | Effect |
/// |---------|---------|--------|
/// | `tags` | empty | No markers recognized; everything is answer text |
/// | `streaming` | `false` | Block content surfaces only when the block closes |
/// | `answer_label` | `"answer"` | Label for content outside any block |
/// | `answer_streaming` | `true` | Answer text streams as incomplete deltas |
///
/// Answer text streams by default so a reply is visible as soon as it is
/// produced, even with block streaming off. Set `answer_streaming` to `false`
/// to receive answer text as one complete message when the next tag opens or
/// the stream is finalized; a tag-free stream then yields nothing until
/// [`finalize`](crate::StreamParser::finalize), which returns the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Tag name to step label.
    pub tags: BTreeMap<String, String>,

    /// Emit incomplete deltas for content inside tag blocks.
    pub streaming: bool,

    /// Label for content outside any configured block.
    pub answer_label: String,

    /// Emit incomplete deltas for content outside any block.
    ///
    /// When disabled, answer text is held until a tag opens or the stream
    /// is finalized. Ignored when `streaming` is enabled, which streams
    /// every state.
    pub answer_streaming: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tags: BTreeMap::new(),
            streaming: false,
            answer_label: DEFAULT_ANSWER_LABEL.to_string(),
            answer_streaming: true,
        }
    }
}

impl ParserConfig {
    /// Creates a configuration with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tag, replacing the label if the name is already configured.
    pub fn with_tag(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.tags.insert(name.into(), label.into());
        self
    }

    /// Adds every `(name, label)` pair.
    pub fn with_tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tags
            .extend(tags.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Enables or disables streaming of tag block content.
    #[inline]
    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.streaming = enabled;
        self
    }

    /// Sets the label used for content outside any block.
    #[inline]
    pub fn with_answer_label(mut self, label: impl Into<String>) -> Self {
        self.answer_label = label.into();
        self
    }

    /// Enables or disables streaming of answer content.
    #[inline]
    pub fn with_answer_streaming(mut self, enabled: bool) -> Self {
        self.answer_streaming = enabled;
        self
    }
}
