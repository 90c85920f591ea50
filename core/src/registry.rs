//! Validated tag configuration.
//!
//! A [`TagRegistry`] is the compiled form of the tag map in a
//! [`ParserConfig`](crate::ParserConfig). Each accepted tag gets a dense
//! [`TagId`], which doubles as the identifier of the parser state "inside this
//! tag's block". The registry is immutable once built.

use std::collections::HashMap;

use crate::ConfigError;

/// Identifier of a configured tag, and of the block state it opens.
///
/// Ids are dense indices into the registry that issued them and are only
/// meaningful for that registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    /// Position of the tag in its registry.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The single active parser state.
///
/// There is no stack: opening a tag while another block is active replaces
/// the active block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockState {
    /// Outside any configured block.
    #[default]
    Idle,
    /// Inside the block opened by the given tag.
    InBlock(TagId),
}

/// A validated `(name, label)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    name: String,
    label: String,
}

impl TagSpec {
    /// Validates a single tag.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let label = label.into();

        if name.is_empty() {
            return Err(ConfigError::EmptyTagName);
        }
        if !is_valid_tag_name(&name) {
            return Err(ConfigError::InvalidTagName { name });
        }
        if label.is_empty() {
            return Err(ConfigError::EmptyStepLabel { tag: name });
        }

        Ok(Self { name, label })
    }

    /// The tag name as it appears between angle brackets.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The step label attached to content of this tag.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Returns true if `name` matches `^[A-Za-z][A-Za-z0-9_-]*$`.
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

/// The closed set of tags a parser recognizes.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    specs: Vec<TagSpec>,
    by_name: HashMap<String, TagId>,
}

impl TagRegistry {
    /// Validates every `(name, label)` pair.
    ///
    /// Fails on the first invalid entry; nothing is partially accepted. A
    /// repeated name keeps the label given last.
    pub fn new<I, K, V>(tags: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut registry = Self::default();

        for (name, label) in tags {
            let spec = TagSpec::new(name, label)?;
            match registry.by_name.get(spec.name()) {
                Some(id) => registry.specs[id.index()] = spec,
                None => {
                    let id = TagId(registry.specs.len() as u32);
                    registry.by_name.insert(spec.name.clone(), id);
                    registry.specs.push(spec);
                }
            }
        }

        Ok(registry)
    }

    /// Number of configured tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns true if no tags are configured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Looks up a tag by name.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<TagId> {
        self.by_name.get(name).copied()
    }

    /// The spec behind an id issued by this registry.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different registry with more tags.
    /// Use [`get`](Self::get) for ids of unknown origin.
    #[inline]
    pub fn spec(&self, id: TagId) -> &TagSpec {
        &self.specs[id.index()]
    }

    /// Like [`spec`](Self::spec), but `None` for an id this registry did not
    /// issue.
    #[inline]
    pub fn get(&self, id: TagId) -> Option<&TagSpec> {
        self.specs.get(id.index())
    }

    /// The step label of a tag.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`spec`](Self::spec).
    #[inline]
    pub fn label(&self, id: TagId) -> &str {
        self.spec(id).label()
    }

    /// The name of a tag.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`spec`](Self::spec).
    #[inline]
    pub fn name(&self, id: TagId) -> &str {
        self.spec(id).name()
    }

    /// All configured tags, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TagId, &TagSpec)> + '_ {
        self.specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (TagId(i as u32), spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("think"; "simple")]
    #[test_case("tool_call"; "underscore")]
    #[test_case("tool-call"; "hyphen")]
    #[test_case("ToolCall"; "mixed case")]
    #[test_case("h1"; "trailing digit")]
    #[test_case("x"; "single letter")]
    fn test_valid_tag_names(name: &str) {
        assert!(is_valid_tag_name(name));
    }

    #[test_case(""; "empty")]
    #[test_case("1bad"; "leading digit")]
    #[test_case("_tag"; "leading underscore")]
    #[test_case("tag@name"; "at sign")]
    #[test_case("tag name"; "space")]
    #[test_case("思考"; "non ascii")]
    #[test_case("a>b"; "angle bracket")]
    fn test_invalid_tag_names(name: &str) {
        assert!(!is_valid_tag_name(name));
    }

    #[test]
    fn test_tag_spec_errors() {
        assert_eq!(TagSpec::new("", "x"), Err(ConfigError::EmptyTagName));
        assert_eq!(
            TagSpec::new("1bad", "x"),
            Err(ConfigError::InvalidTagName {
                name: "1bad".into()
            })
        );
        assert_eq!(
            TagSpec::new("think", ""),
            Err(ConfigError::EmptyStepLabel {
                tag: "think".into()
            })
        );
    }

    #[test]
    fn test_registry_assigns_dense_ids() {
        let registry = TagRegistry::new([("think", "reasoning"), ("tool", "tool call")]).unwrap();
        assert_eq!(registry.len(), 2);

        let think = registry.lookup("think").unwrap();
        let tool = registry.lookup("tool").unwrap();
        assert_ne!(think, tool);
        assert_eq!(registry.label(think), "reasoning");
        assert_eq!(registry.name(tool), "tool");
        assert_eq!(registry.lookup("other"), None);

        let indices: Vec<usize> = registry.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_registry_rejects_whole_config() {
        let result = TagRegistry::new([("think", "reasoning"), ("bad tag", "x")]);
        assert!(matches!(result, Err(ConfigError::InvalidTagName { .. })));
    }

    #[test]
    fn test_registry_repeated_name_keeps_last_label() {
        let registry = TagRegistry::new([("think", "a"), ("think", "b")]).unwrap();
        assert_eq!(registry.len(), 1);
        let id = registry.lookup("think").unwrap();
        assert_eq!(registry.label(id), "b");
    }

    #[test]
    fn test_foreign_id_lookup() {
        let big = TagRegistry::new([("a", "x"), ("b", "y"), ("c", "z")]).unwrap();
        let small = TagRegistry::new([("think", "reasoning")]).unwrap();
        let foreign = big.lookup("c").unwrap();

        assert_eq!(small.get(foreign), None);
        let own = small.lookup("think").unwrap();
        assert_eq!(small.get(own).map(TagSpec::label), Some("reasoning"));
    }

    #[test]
    #[should_panic]
    fn test_foreign_id_panics_in_spec() {
        let big = TagRegistry::new([("a", "x"), ("b", "y")]).unwrap();
        let small = TagRegistry::new([("think", "reasoning")]).unwrap();
        let _ = small.spec(big.lookup("b").unwrap());
    }

    #[test]
    fn test_empty_registry() {
        let registry = TagRegistry::new(Vec::<(String, String)>::new()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(BlockState::default(), BlockState::Idle);
    }
}
