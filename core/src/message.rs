//! Step messages and per-label ordinals.

use std::collections::HashMap;

/// One unit of parser output.
///
/// `content` is never empty. `ordinal` counts messages per `label`, starting
/// at 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepMessage {
    /// Position of this message among messages with the same label.
    pub ordinal: usize,
    /// Step label of the block (or the answer label).
    pub label: String,
    /// The text carried by this message.
    pub content: String,
    /// `true` when emitted because a block closed or the stream ended;
    /// `false` for an incremental delta.
    pub complete: bool,
}

/// Builds [`StepMessage`]s, numbering them per label.
///
/// Counters are created lazily and never reset.
#[derive(Debug, Clone, Default)]
pub struct StepCounters {
    last: HashMap<String, usize>,
}

impl StepCounters {
    /// Creates an empty set of counters.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the next message for `label`.
    ///
    /// Returns `None` without consuming an ordinal if `content` is empty.
    pub fn make_message(
        &mut self,
        label: &str,
        content: &str,
        complete: bool,
    ) -> Option<StepMessage> {
        if content.is_empty() {
            return None;
        }

        let ordinal = match self.last.get_mut(label) {
            Some(n) => {
                *n += 1;
                *n
            }
            None => {
                self.last.insert(label.to_string(), 1);
                1
            }
        };

        Some(StepMessage {
            ordinal,
            label: label.to_string(),
            content: content.to_string(),
            complete,
        })
    }

    /// The ordinal most recently issued for `label`, or 0.
    #[inline]
    pub fn last(&self, label: &str) -> usize {
        self.last.get(label).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_is_suppressed() {
        let mut counters = StepCounters::new();
        assert!(counters.make_message("answer", "", true).is_none());
        assert_eq!(counters.last("answer"), 0);
    }

    #[test]
    fn test_ordinals_are_per_label() {
        let mut counters = StepCounters::new();
        let a1 = counters.make_message("a", "x", true).unwrap();
        let b1 = counters.make_message("b", "y", false).unwrap();
        let a2 = counters.make_message("a", "z", false).unwrap();

        assert_eq!((a1.ordinal, b1.ordinal, a2.ordinal), (1, 1, 2));
        assert_eq!(a2.label, "a");
        assert_eq!(a2.content, "z");
        assert!(!a2.complete);
        assert_eq!(counters.last("a"), 2);
        assert_eq!(counters.last("b"), 1);
    }
}
