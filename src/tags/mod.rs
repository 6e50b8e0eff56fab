//! Conversion of generated markup into render-ready element descriptors.

mod element;
mod parse;
mod render;

pub use element::{Attributes, ElementDescriptor, KEY_ATTRIBUTE};
pub use parse::parse_tag;
pub use render::{ElementList, RenderableElement};
