//! Core machinery for tagstream: incremental segmentation of chunked text
//! into tagged step messages.
//!
//! Most users want the `tagstream` facade crate, which re-exports this one.

pub mod config;
mod error;
pub mod lexer;
mod message;
pub mod parser;
mod policy;
mod registry;

#[cfg(any(feature = "tokio", feature = "futures"))]
pub mod async_stream;

pub use config::{DEFAULT_ANSWER_LABEL, ParserConfig};
pub use error::ConfigError;
pub use lexer::{Marker, MarkerKind, MarkerMatcher, is_marker_prefix};
pub use message::{StepCounters, StepMessage};
pub use parser::StreamParser;
pub use policy::PartialPolicy;
pub use registry::{BlockState, TagId, TagRegistry, TagSpec, is_valid_tag_name};
