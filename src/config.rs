//! Loader option surface and discovery of the optional project configuration file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::asset_paths::join_asset_path;
use crate::error::LoaderError;

/// File name searched for when discovering loader options.
pub const DEFAULT_CONFIG_FILE: &str = "icon-manifest.config.json";

/// Output directory used when no `outputPath` is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "static/manifest";

/// URL prefix under which the host serves emitted static assets.
pub const PUBLIC_ASSET_PREFIX: &str = "/_next";

/// Options accepted by the loader.
///
/// Unknown fields are rejected, mirroring the host's option schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LoaderOptions {
  /// Output-relative directory where generated files are emitted.
  pub output_path: String,
  /// Run full generation even outside release builds.
  pub force_emit: bool,
}

impl Default for LoaderOptions {
  fn default() -> Self {
    Self {
      output_path: DEFAULT_OUTPUT_PATH.into(),
      force_emit: false,
    }
  }
}

impl LoaderOptions {
  /// Attempt to load options from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to default
  /// values so callers can continue operating with sensible assumptions.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read options from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    Self::from_json(&content).ok()
  }

  /// Parse options from JSON, reporting unknown or mistyped fields.
  pub fn from_json(content: &str) -> Result<Self, LoaderError> {
    serde_json::from_str(content).map_err(LoaderError::InvalidOptions)
  }

  /// Public URL prefix for emitted assets, e.g. `/_next/static/manifest`.
  pub fn public_path(&self) -> String {
    join_asset_path(PUBLIC_ASSET_PREFIX, &self.output_path)
  }

  /// Output-relative name for an emitted file.
  pub fn output_location(&self, name: &str) -> String {
    join_asset_path(&self.output_path, name)
  }
}
