//! The incremental step parser.
//!
//! [`StreamParser`] turns arbitrarily split text into [`StepMessage`]s. It
//! keeps four pieces of state between calls:
//!
//! - the **buffer**: a tail such as `<` or `</thi` that may still turn out
//!   to be a marker once more text arrives. A `<` that can no longer start
//!   a marker (`x < 5`) is released as text immediately
//! - the active [`BlockState`]
//! - the **current content** accumulated under that state
//! - how much of the current content has already gone out as partial deltas
//!
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/parser_state.mmd"))]
//!
//! # Chunk boundaries
//!
//! The same text produces the same content per label however it is split.
//! Only the number of partial deltas, and so the ordinals they consume,
//! depends on chunking.
//!
//! # Example
//!
//! ```ignore
//! use tagstream_core::{ParserConfig, StreamParser};
//!
//! let mut parser = StreamParser::new(ParserConfig::new().with_tag("think", "reasoning"))?;
//!
//! let mut messages = Vec::new();
//! for chunk in ["<th", "ink>step one</", "think>done"] {
//!     messages.extend(parser.process_chunk(chunk));
//! }
//! messages.extend(parser.finalize());
//!
//! assert_eq!(messages[0].label, "reasoning");
//! assert_eq!(messages[0].content, "step one");
//! ```

use tracing::{debug, trace};

use crate::{
    BlockState, ConfigError, MarkerKind, MarkerMatcher, ParserConfig, PartialPolicy, StepCounters,
    StepMessage, TagRegistry, is_marker_prefix,
};

/// Incremental parser for one text stream.
///
/// Drive it with [`process_chunk`](Self::process_chunk) for every fragment,
/// then call [`finalize`](Self::finalize) once at the end of the stream.
///
/// # Complete messages
///
/// Flushing a block on its closing marker (or on another opening marker, or
/// at [`finalize`](Self::finalize)) emits only content not already sent as
/// partial deltas. When a streamed block has been sent in full, its closing
/// marker emits nothing, so no `complete` message exists for that block. The
/// end of such a block is observable through [`state`](Self::state), or by
/// leaving block streaming off.
#[derive(Debug, Clone)]
pub struct StreamParser {
    registry: TagRegistry,
    policy: PartialPolicy,
    answer_label: String,

    buffer: String,
    state: BlockState,
    current: String,
    /// Byte length of the prefix of `current` already sent as partials.
    sent: usize,
    counters: StepCounters,
}

impl StreamParser {
    /// Validates `config` and creates a parser in the idle state.
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        if config.answer_label.is_empty() {
            return Err(ConfigError::EmptyAnswerLabel);
        }
        let registry = TagRegistry::new(config.tags)?;

        debug!(
            tags = registry.len(),
            streaming = config.streaming,
            answer_streaming = config.answer_streaming,
            "stream parser configured"
        );

        Ok(Self {
            registry,
            policy: PartialPolicy {
                blocks: config.streaming,
                answer: config.answer_streaming,
            },
            answer_label: config.answer_label,
            buffer: String::new(),
            state: BlockState::Idle,
            current: String::new(),
            sent: 0,
            counters: StepCounters::new(),
        })
    }

    /// Creates a non-streaming parser for the given `(name, label)` pairs.
    pub fn with_tags<I, K, V>(tags: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(ParserConfig::new().with_tags(tags))
    }

    /// Feeds the next fragment of the stream.
    ///
    /// Returns the messages this fragment completes or releases, in order.
    /// Any text is accepted.
    pub fn process_chunk(&mut self, chunk: &str) -> Vec<StepMessage> {
        trace!(
            len = chunk.len(),
            buffered = self.buffer.len(),
            "processing chunk"
        );

        let mut buffer = core::mem::take(&mut self.buffer);
        buffer.push_str(chunk);

        let markers: Vec<_> = MarkerMatcher::new(&self.registry)
            .find_iter(&buffer)
            .collect();

        let mut messages = Vec::new();
        let mut appended = false;
        let mut pos = 0;

        for marker in markers {
            appended |= self.append(&buffer[pos..marker.span.start]);
            pos = marker.span.end;

            match marker.kind {
                MarkerKind::Close if self.state == BlockState::InBlock(marker.tag) => {
                    messages.extend(self.emit(true));
                    self.transition(BlockState::Idle);
                    appended = false;
                }
                MarkerKind::Close => {
                    debug!(
                        tag = self.registry.name(marker.tag),
                        "absorbed unmatched closing marker"
                    );
                }
                MarkerKind::Open => {
                    messages.extend(self.emit(true));
                    self.transition(BlockState::InBlock(marker.tag));
                    appended = false;
                }
            }
        }

        // Hold back a trailing marker split across chunks.
        let tail = &buffer[pos..];
        match tail.rfind('<').filter(|&lt| is_marker_prefix(&tail[lt..])) {
            Some(lt) => {
                let hold = pos + lt;
                appended |= self.append(&buffer[pos..hold]);
                buffer.replace_range(..hold, "");
            }
            None => {
                appended |= self.append(&buffer[pos..]);
                buffer.clear();
            }
        }
        self.buffer = buffer;

        if appended && self.policy.allows(self.state) {
            messages.extend(self.emit(false));
        }

        messages
    }

    /// Flushes whatever remains at the end of the stream.
    ///
    /// Buffered text is treated as literal and any unsent content is emitted
    /// as one complete message under the active label, even if its block
    /// never closed. A second call without new input returns `None`.
    pub fn finalize(&mut self) -> Option<StepMessage> {
        if !self.buffer.is_empty() {
            let rest = core::mem::take(&mut self.buffer);
            self.current.push_str(&rest);
        }

        let message = self.emit(true);
        debug!(
            state = ?self.state,
            emitted = message.is_some(),
            "stream finalized"
        );
        message
    }

    /// Processes every chunk, then finalizes.
    pub fn parse_all<I>(&mut self, chunks: I) -> Vec<StepMessage>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut messages = Vec::new();
        for chunk in chunks {
            messages.extend(self.process_chunk(chunk.as_ref()));
        }
        messages.extend(self.finalize());
        messages
    }

    /// The active state.
    #[inline]
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Label that content appended now would carry.
    pub fn active_label(&self) -> &str {
        match self.state {
            BlockState::Idle => &self.answer_label,
            BlockState::InBlock(id) => self.registry.label(id),
        }
    }

    /// Text held back because it may be the start of a marker.
    #[inline]
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// The validated tags.
    #[inline]
    pub fn tags(&self) -> &TagRegistry {
        &self.registry
    }

    /// Returns true if tag block content is streamed as partial deltas.
    #[inline]
    pub fn is_streaming(&self) -> bool {
        self.policy.blocks
    }

    /// The ordinal most recently issued for `label`, or 0.
    #[inline]
    pub fn last_ordinal(&self, label: &str) -> usize {
        self.counters.last(label)
    }

    fn append(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.current.push_str(text);
        true
    }

    /// Emits the unsent part of the current content and marks it sent.
    fn emit(&mut self, complete: bool) -> Option<StepMessage> {
        let label = match self.state {
            BlockState::Idle => self.answer_label.as_str(),
            BlockState::InBlock(id) => self.registry.label(id),
        };
        let message = self
            .counters
            .make_message(label, &self.current[self.sent..], complete);
        self.sent = self.current.len();
        message
    }

    fn transition(&mut self, next: BlockState) {
        debug!(from = ?self.state, to = ?next, "block state transition");
        self.state = next;
        self.current.clear();
        self.sent = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(tags: &[(&str, &str)]) -> StreamParser {
        StreamParser::with_tags(tags.iter().copied()).unwrap()
    }

    #[test]
    fn test_split_marker_is_buffered() {
        let mut p = parser(&[("think", "reasoning")]);

        assert!(p.process_chunk("<th").is_empty());
        assert_eq!(p.pending(), "<th");
        assert_eq!(p.state(), BlockState::Idle);

        assert!(p.process_chunk("ink>abc</").is_empty());
        assert_eq!(p.pending(), "</");
        assert_eq!(p.active_label(), "reasoning");

        let out = p.process_chunk("think>");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].content, "abc");
        assert!(out[0].complete);
        assert_eq!(p.pending(), "");
        assert_eq!(p.state(), BlockState::Idle);
        assert_eq!(p.finalize(), None);
    }

    #[test]
    fn test_only_last_lt_is_held() {
        let mut p = parser(&[("think", "reasoning")]);
        let out = p.process_chunk("a < b <c");
        assert_eq!(p.pending(), "<c");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].content, "a < b ");
        assert!(!out[0].complete);
    }

    #[test]
    fn test_non_marker_lt_is_released() {
        let mut p = parser(&[("think", "reasoning")]);
        let out = p.process_chunk("if x < 5");
        assert_eq!(p.pending(), "");
        assert_eq!(out[0].content, "if x < 5");

        let out = p.process_chunk(" and y <");
        assert_eq!(p.pending(), "<");
        assert_eq!(out[0].content, " and y ");

        let out = p.process_chunk("= z");
        assert_eq!(p.pending(), "");
        assert_eq!(out[0].content, "<= z");
    }

    #[test]
    fn test_streamed_block_close_emits_nothing() {
        let mut p = StreamParser::new(
            ParserConfig::new()
                .with_tag("think", "reasoning")
                .with_streaming(true),
        )
        .unwrap();
        let out = p.process_chunk("<think>abc");
        assert_eq!(out.len(), 1);
        assert!(!out[0].complete);

        assert!(p.process_chunk("</think>").is_empty());
        assert_eq!(p.state(), BlockState::Idle);
    }

    #[test]
    fn test_idle_content_flushed_by_open_marker() {
        let mut p = parser(&[("think", "reasoning")]);
        let out = p.process_chunk("hello<think>x");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "answer");
        assert_eq!(out[0].content, "hello");
        assert!(out[0].complete);

        let last = p.finalize().unwrap();
        assert_eq!(last.label, "reasoning");
        assert_eq!(last.content, "x");
    }

    #[test]
    fn test_emit_skips_already_sent_prefix() {
        let mut p = parser(&[("think", "reasoning")]);
        let first = p.process_chunk("partial");
        assert_eq!(first[0].content, "partial");
        assert!(!first[0].complete);

        // The open marker finds nothing unsent to flush.
        assert!(p.process_chunk("<think>").is_empty());
        assert_eq!(p.last_ordinal("answer"), 1);
    }

    #[test]
    fn test_finalize_twice() {
        let mut p = parser(&[]);
        p.process_chunk("x<");
        let last = p.finalize().unwrap();
        assert_eq!(last.content, "<");
        assert_eq!(p.finalize(), None);
    }

    #[test]
    fn test_empty_answer_label_rejected() {
        let result = StreamParser::new(ParserConfig::new().with_answer_label(""));
        assert_eq!(result.unwrap_err(), ConfigError::EmptyAnswerLabel);
    }
}
