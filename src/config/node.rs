use super::Variables;
use crate::memento::KeySet;

/// One configuration block: a type tag, its scalar entries and nested blocks, all in
/// document order. Entry keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    pub tag: String,
    pub entries: Vec<(String, String)>,
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// No entries and no children, as written by `key:` with no value.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.entries.is_empty() && self.children.is_empty()
    }

    /// Levels below and including this node; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// A parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Set when the document names its key set; the configurator may override it.
    pub key_set: Option<KeySet>,
    pub variables: Variables,
    pub roots: Vec<ConfigNode>,
}

impl Document {
    #[must_use]
    pub fn new(roots: Vec<ConfigNode>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_key_set(mut self, key_set: KeySet) -> Self {
        self.key_set = Some(key_set);
        self
    }
}
