//! Marker recognition.
//!
//! Markup is lexed with a fixed [`logos`] grammar: opening markers
//! (`<name>`), closing markers (`</name>`), a bare `<`, and runs of text
//! containing no `<`. The [`MarkerMatcher`] keeps only the markers whose name
//! is in its [`TagRegistry`]; everything else is literal text.
//!
//! Every marker begins with `<` and contains no other `<`, so a configured
//! marker can only start where the lexer starts a token. One left-to-right
//! pass therefore yields the leftmost, non-overlapping matches a combined
//! alternation over the configured names would.

use core::ops::Range;

use logos::Logos;

use crate::{TagId, TagRegistry, is_valid_tag_name};

/// Raw markup tokens.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// `<name>` with a syntactically valid tag name.
    #[regex(r"<[A-Za-z][A-Za-z0-9_-]*>")]
    Open,

    /// `</name>` with a syntactically valid tag name.
    #[regex(r"</[A-Za-z][A-Za-z0-9_-]*>")]
    Close,

    /// A `<` that does not start a complete marker.
    #[token("<")]
    Lt,

    /// Text up to the next `<`.
    #[regex(r"[^<]+")]
    Text,
}

/// Whether a marker opens or closes a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `<name>`
    Open,
    /// `</name>`
    Close,
}

/// A configured marker found in scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Byte range of the whole marker, angle brackets included.
    pub span: Range<usize>,
    /// The tag the marker names.
    pub tag: TagId,
    /// Open or close.
    pub kind: MarkerKind,
}

/// Finds configured markers in text.
#[derive(Debug, Clone, Copy)]
pub struct MarkerMatcher<'r> {
    registry: &'r TagRegistry,
}

impl<'r> MarkerMatcher<'r> {
    /// Creates a matcher for the tags in `registry`.
    #[inline]
    pub const fn new(registry: &'r TagRegistry) -> Self {
        Self { registry }
    }

    /// All configured markers in `text`, left to right.
    ///
    /// With an empty registry nothing ever matches.
    pub fn find_iter<'t>(&self, text: &'t str) -> impl Iterator<Item = Marker> + use<'r, 't> {
        let registry = self.registry;

        Markup::lexer(text)
            .spanned()
            .filter_map(move |(token, span)| {
                let (kind, skip) = match token {
                    Ok(Markup::Open) => (MarkerKind::Open, 1),
                    Ok(Markup::Close) => (MarkerKind::Close, 2),
                    _ => return None,
                };
                let name = &text[span.start + skip..span.end - 1];
                registry.lookup(name).map(|tag| Marker { span, tag, kind })
            })
    }
}

/// Returns true if `tail` could still grow into a marker.
///
/// That is `<` or `</`, optionally followed by the start of a syntactically
/// valid tag name, and no `>` yet. The answer does not depend on which tags
/// are configured.
pub fn is_marker_prefix(tail: &str) -> bool {
    let Some(rest) = tail.strip_prefix('<') else {
        return false;
    };
    let name = rest.strip_prefix('/').unwrap_or(rest);
    name.is_empty() || is_valid_tag_name(name)
}
