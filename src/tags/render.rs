//! Serialisation of element descriptors into the loader's exported value.

use serde::Serialize;
use serde::ser::{SerializeSeq, Serializer};

use crate::tags::element::{Attributes, ElementDescriptor};

/// Renderable element value: an element type plus its props.
#[derive(Debug, Serialize)]
pub struct RenderableElement<'a> {
  /// Element name.
  #[serde(rename = "type")]
  pub tag_name: &'a str,
  /// Element attributes, including the list key.
  pub props: &'a Attributes,
}

/// Ordered list of descriptors produced for one manifest import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementList {
  elements: Vec<ElementDescriptor>,
}

impl ElementList {
  /// Wrap descriptors, keeping their order.
  pub fn new(elements: Vec<ElementDescriptor>) -> Self {
    Self { elements }
  }

  /// Descriptors in output order.
  pub fn elements(&self) -> &[ElementDescriptor] {
    &self.elements
  }

  /// Number of descriptors.
  pub fn len(&self) -> usize {
    self.elements.len()
  }

  /// Returns `true` when no descriptors were produced.
  pub fn is_empty(&self) -> bool {
    self.elements.is_empty()
  }

  /// Renderable values in output order.
  pub fn renderables(&self) -> impl Iterator<Item = RenderableElement<'_>> {
    self.elements.iter().map(|element| RenderableElement {
      tag_name: &element.tag_name,
      props: &element.attributes,
    })
  }

  /// JSON array of `{"type", "props"}` objects.
  pub fn to_json(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }

  /// ES module exporting the elements as React elements.
  pub fn to_module_source(&self) -> serde_json::Result<String> {
    let elements = self
      .elements
      .iter()
      .map(|element| {
        Ok(format!(
          "React.createElement({}, {})",
          serde_json::to_string(&element.tag_name)?,
          serde_json::to_string(&element.attributes)?
        ))
      })
      .collect::<serde_json::Result<Vec<String>>>()?;

    Ok(format!(
      "import * as React from 'react'; export default [{}]",
      elements.join(",")
    ))
  }
}

impl Serialize for ElementList {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(self.elements.len()))?;
    for renderable in self.renderables() {
      seq.serialize_element(&renderable)?;
    }
    seq.end()
  }
}
