#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
//! Incremental segmentation of chunked LLM output into tagged step messages.
//!
//! ```ignore
//! use tagstream::{ParserConfig, StreamParser};
//!
//! let mut parser = StreamParser::new(
//!     ParserConfig::new()
//!         .with_tag("think", "reasoning")
//!         .with_tag("tool", "tool call"),
//! )?;
//!
//! for chunk in llm_chunks {
//!     for message in parser.process_chunk(&chunk) {
//!         render(message);
//!     }
//! }
//! if let Some(message) = parser.finalize() {
//!     render(message);
//! }
//! ```
pub use tagstream_core::*;
