use serde::ser::{Serialize, SerializeMap, Serializer};

/// Attribute synthesised on every descriptor from its position in the output sequence.
pub const KEY_ATTRIBUTE: &str = "key";

/// Attribute mapping that preserves insertion order.
///
/// Inserting an existing name replaces its value but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
  entries: Vec<(String, String)>,
}

impl Attributes {
  /// Create an empty mapping.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or replace an attribute.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    let value = value.into();
    match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
      Some((_, slot)) => *slot = value,
      None => self.entries.push((name, value)),
    }
  }

  /// Remove an attribute, returning its value.
  pub fn remove(&mut self, name: &str) -> Option<String> {
    let index = self.entries.iter().position(|(existing, _)| existing == name)?;
    Some(self.entries.remove(index).1)
  }

  /// Look up an attribute value.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|(existing, _)| existing == name)
      .map(|(_, value)| value.as_str())
  }

  /// Iterate attributes in order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(name, value)| (name.as_str(), value.as_str()))
  }

  /// Number of attributes.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when there are no attributes.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut attributes = Self::new();
    for (name, value) in iter {
      attributes.insert(name, value);
    }
    attributes
  }
}

impl Serialize for Attributes {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.entries.len()))?;
    for (name, value) in &self.entries {
      map.serialize_entry(name, value)?;
    }
    map.end()
  }
}

/// Structured form of one generated tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDescriptor {
  /// Element name such as `link` or `meta`.
  pub tag_name: String,
  /// Attributes in source order, ending with [`KEY_ATTRIBUTE`].
  pub attributes: Attributes,
  /// Zero-based position of the element, as a string.
  pub key: String,
}
