//! Async adapters around [`StreamParser`].
//!
//! The parser itself never suspends. These adapters pull chunks from an
//! asynchronous source, feed them through a parser, and forward the
//! resulting messages, finalizing once the source is exhausted.
//!
#![cfg_attr(feature = "docs", doc = simple_mermaid::mermaid!("../docs/diagrams/async_stream.mmd"))]
//!
//! # Features
//!
//! - `tokio`: [`tokio_impl::ChannelParser`] pumps an `mpsc` channel of chunks
//!   into an `mpsc` channel of messages
//! - `futures`: [`futures_impl::StepStream`] wraps any `Stream` of chunks and
//!   is itself a `Stream` of messages (runtime-agnostic)
//!
//! Both preserve the parser's emission order and emit the finalize result
//! last. Dropping an adapter drops its parser; nothing needs cleaning up.
//!
//! # Example
//!
//! ```ignore
//! use tagstream::async_stream::{StreamConfig, tokio_impl::ChannelParser};
//! use tagstream::ParserConfig;
//!
//! let (chunk_tx, chunk_rx) = tokio::sync::mpsc::channel::<String>(32);
//! let config = ParserConfig::new().with_tag("think", "reasoning");
//! let (handle, mut messages) = ChannelParser::spawn(config, chunk_rx, StreamConfig::default())?;
//!
//! chunk_tx.send("<think>hm</think>ok".into()).await?;
//! drop(chunk_tx);
//!
//! while let Some(message) = messages.recv().await {
//!     println!("{} #{}: {}", message.label, message.ordinal, message.content);
//! }
//! handle.await??;
//! ```

use thiserror::Error;

/// Error type for async adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The message receiver was dropped before the stream finished.
    #[error("channel closed unexpectedly")]
    ChannelClosed,
}

/// Configuration for the channel adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Capacity of the outgoing message channel. Default: 64.
    ///
    /// A capacity of 0 is treated as 1.
    pub message_buffer_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl StreamConfig {
    /// Default configuration, usable in const contexts.
    pub const DEFAULT: Self = Self {
        message_buffer_size: 64,
    };

    /// Creates a configuration with default values.
    #[inline]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the message channel capacity.
    #[inline]
    pub const fn with_message_buffer_size(mut self, size: usize) -> Self {
        self.message_buffer_size = size;
        self
    }
}

#[cfg(feature = "tokio")]
pub mod tokio_impl {
    //! Tokio-based channel adapter.

    use super::{StreamConfig, StreamError};
    use crate::{ConfigError, ParserConfig, StepMessage, StreamParser};
    use ::tokio::sync::mpsc;
    use ::tokio::task::JoinHandle;
    use tracing::debug;

    /// Receives chunks on one channel and sends step messages on another.
    pub struct ChannelParser<C> {
        parser: StreamParser,
        chunk_rx: mpsc::Receiver<C>,
        message_tx: mpsc::Sender<StepMessage>,
    }

    impl<C: AsRef<str>> ChannelParser<C> {
        /// Wraps an existing parser.
        pub fn new(
            parser: StreamParser,
            chunk_rx: mpsc::Receiver<C>,
            message_tx: mpsc::Sender<StepMessage>,
        ) -> Self {
            Self {
                parser,
                chunk_rx,
                message_tx,
            }
        }

        /// Builds a parser from `config` and runs it on a new task.
        ///
        /// Returns the task handle and the receiving end of the message
        /// channel.
        #[allow(clippy::type_complexity)]
        pub fn spawn(
            config: ParserConfig,
            chunk_rx: mpsc::Receiver<C>,
            stream_config: StreamConfig,
        ) -> Result<
            (
                JoinHandle<Result<(), StreamError>>,
                mpsc::Receiver<StepMessage>,
            ),
            ConfigError,
        >
        where
            C: Send + 'static,
        {
            let parser = StreamParser::new(config)?;
            let (message_tx, message_rx) = mpsc::channel(stream_config.message_buffer_size.max(1));
            let handle = ::tokio::spawn(Self::new(parser, chunk_rx, message_tx).run());
            Ok((handle, message_rx))
        }

        /// Runs until the chunk channel closes, then finalizes.
        pub async fn run(mut self) -> Result<(), StreamError> {
            while let Some(chunk) = self.chunk_rx.recv().await {
                let messages = self.parser.process_chunk(chunk.as_ref());
                for message in messages {
                    send(&self.message_tx, message).await?;
                }
            }

            if let Some(message) = self.parser.finalize() {
                send(&self.message_tx, message).await?;
            }
            debug!("chunk channel closed; parser finished");
            Ok(())
        }
    }

    async fn send(tx: &mpsc::Sender<StepMessage>, message: StepMessage) -> Result<(), StreamError> {
        tx.send(message)
            .await
            .map_err(|_| StreamError::ChannelClosed)
    }
}

#[cfg(feature = "futures")]
pub mod futures_impl {
    //! Futures-based stream adapter (runtime-agnostic).

    use crate::{ConfigError, ParserConfig, StepMessage, StreamParser};
    use core::pin::Pin;
    use core::task::{Context, Poll};
    use futures_core::Stream;
    use std::collections::VecDeque;

    /// A stream of [`StepMessage`]s parsed from a stream of chunks.
    pub struct StepStream<S> {
        inner: S,
        parser: StreamParser,
        pending: VecDeque<StepMessage>,
        finished: bool,
    }

    impl<S> StepStream<S> {
        /// Builds a parser from `config` and wraps `inner`.
        pub fn new(inner: S, config: ParserConfig) -> Result<Self, ConfigError> {
            Ok(Self::with_parser(inner, StreamParser::new(config)?))
        }

        /// Wraps `inner` with an existing parser.
        pub fn with_parser(inner: S, parser: StreamParser) -> Self {
            Self {
                inner,
                parser,
                pending: VecDeque::new(),
                finished: false,
            }
        }

        /// The underlying parser.
        #[inline]
        pub fn parser(&self) -> &StreamParser {
            &self.parser
        }
    }

    impl<S> Stream for StepStream<S>
    where
        S: Stream + Unpin,
        S::Item: AsRef<str>,
    {
        type Item = StepMessage;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            let this = self.get_mut();
            loop {
                if let Some(message) = this.pending.pop_front() {
                    return Poll::Ready(Some(message));
                }
                if this.finished {
                    return Poll::Ready(None);
                }

                match Pin::new(&mut this.inner).poll_next(cx) {
                    Poll::Ready(Some(chunk)) => {
                        let messages = this.parser.process_chunk(chunk.as_ref());
                        this.pending.extend(messages);
                    }
                    Poll::Ready(None) => {
                        this.finished = true;
                        this.pending.extend(this.parser.finalize());
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }
        }

        fn size_hint(&self) -> (usize, Option<usize>) {
            if self.finished {
                (self.pending.len(), Some(self.pending.len()))
            } else {
                (self.pending.len(), None)
            }
        }
    }
}
