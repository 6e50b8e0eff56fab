//! Parser for the single-line tags emitted by icon generators.
//!
//! Accepted grammar: `<name attr="value" attr="value" ...>`. Every attribute value is assumed
//! to be double quoted and must not itself contain `" `; the attribute region is split on that
//! sequence. Escaped quotes are not understood.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::LoaderError;
use crate::tags::element::{Attributes, ElementDescriptor, KEY_ATTRIBUTE};

fn tag_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"<([^ ]*)\s(.*)>").expect("invalid tag regex"))
}

/// Parse one tag into an [`ElementDescriptor`] keyed by its `position`.
///
/// Each attribute segment is split at its first `=`; one leading and one trailing `"` are
/// stripped from the value. Segments without `=` (such as the `/` of a self-closing tag)
/// become an attribute with an empty value. A `key` attribute holding `position` is always
/// appended last.
///
/// Tags that do not match `<name attrs>` at all, including attribute-less tags like
/// `<meta>`, are rejected with [`LoaderError::MalformedTag`].
pub fn parse_tag(tag: &str, position: usize) -> Result<ElementDescriptor, LoaderError> {
  let malformed = || LoaderError::MalformedTag {
    position,
    tag: tag.to_string(),
  };

  let captures = tag_pattern().captures(tag).ok_or_else(malformed)?;
  let tag_name = captures.get(1).ok_or_else(malformed)?.as_str();
  let region = captures.get(2).ok_or_else(malformed)?.as_str();

  let mut attributes: Attributes = region.split("\" ").map(split_attribute).collect();

  let key = position.to_string();
  attributes.remove(KEY_ATTRIBUTE);
  attributes.insert(KEY_ATTRIBUTE, key.clone());

  Ok(ElementDescriptor {
    tag_name: tag_name.to_string(),
    attributes,
    key,
  })
}

fn split_attribute(segment: &str) -> (&str, &str) {
  let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
  let value = value.strip_prefix('"').unwrap_or(value);
  let value = value.strip_suffix('"').unwrap_or(value);
  (name, value)
}
