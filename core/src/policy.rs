//! When partial content is surfaced.

use crate::BlockState;

/// Decides whether newly literal content may be emitted as an incomplete
/// delta before its block is flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialPolicy {
    /// Deltas inside tag blocks.
    pub blocks: bool,
    /// Deltas outside any block.
    pub answer: bool,
}

impl PartialPolicy {
    /// Returns true if content appended under `state` may be emitted now.
    #[inline]
    pub const fn allows(&self, state: BlockState) -> bool {
        match state {
            BlockState::Idle => self.answer || self.blocks,
            BlockState::InBlock(_) => self.blocks,
        }
    }
}
