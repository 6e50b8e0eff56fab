//! Turn raw manifest text into a source image pointer plus opaque generator options.

use serde_json::{Map, Value};

use crate::error::LoaderError;

/// Manifest field naming the source image, relative to the manifest file.
pub const SOURCE_IMAGE_FIELD: &str = "sourceImage";

/// Generator option carrying the public URL prefix of the generated assets.
pub const OUTPUT_PATH_FIELD: &str = "path";

/// Parsed manifest describing the icon set to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestConfig {
  /// Source image path as written in the manifest.
  pub source_image: String,
  /// Every other manifest field, in source order, passed through to the generator untouched.
  pub generator_options: Map<String, Value>,
  /// Public URL prefix under which generated assets are referenced.
  pub output_path: String,
}

impl ManifestConfig {
  /// Point the generator at a new public URL prefix.
  ///
  /// The prefix replaces any `path` option supplied by the manifest itself.
  pub fn set_output_path(&mut self, output_path: impl Into<String>) {
    let output_path = output_path.into();
    self.generator_options.insert(
      OUTPUT_PATH_FIELD.to_string(),
      Value::String(output_path.clone()),
    );
    self.output_path = output_path;
  }
}

/// Parse manifest text into a [`ManifestConfig`].
///
/// The manifest must be a JSON object with a non-empty string `sourceImage`; anything else
/// in the object is kept as generator configuration.
pub fn parse_manifest(content: &str) -> Result<ManifestConfig, LoaderError> {
  let value: Value = serde_json::from_str(content).map_err(LoaderError::InvalidManifest)?;
  let Value::Object(mut fields) = value else {
    return Err(LoaderError::ManifestNotObject);
  };

  let source_image = match fields.shift_remove(SOURCE_IMAGE_FIELD) {
    Some(Value::String(path)) if !path.is_empty() => path,
    _ => return Err(LoaderError::MissingSourceImage),
  };

  let output_path = fields
    .get(OUTPUT_PATH_FIELD)
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string();

  Ok(ManifestConfig {
    source_image,
    generator_options: fields,
    output_path,
  })
}
