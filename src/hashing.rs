//! Content-addressed name interpolation.
//!
//! Names are built from a pattern such as `[name].[hash].[ext]`. Hash placeholders are
//! replaced with a SHA-256 digest of the content, so identical content always yields the same
//! name and any change to the content yields a different one.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

use crate::asset_paths::relative_source_path;

/// Pattern used for hashed manifest and image names.
pub const DEFAULT_NAME_PATTERN: &str = "[name].[hash].[ext]";

/// Number of hex characters used for `[hash]` when no length is given.
pub const DEFAULT_HASH_LENGTH: usize = 20;

/// Produces deterministic output names for emitted content.
pub trait NameInterpolator {
  /// Expand `pattern` for a resource at `resource_path` holding `content`.
  fn interpolate(&self, pattern: &str, resource_path: &Path, content: &[u8]) -> String;
}

/// [`NameInterpolator`] backed by SHA-256 content hashes.
#[derive(Debug, Clone)]
pub struct ContentHashNamer {
  context: PathBuf,
}

impl ContentHashNamer {
  /// Create a namer resolving `[path]` relative to the project `context` directory.
  pub fn new(context: impl Into<PathBuf>) -> Self {
    Self {
      context: context.into(),
    }
  }
}

impl NameInterpolator for ContentHashNamer {
  fn interpolate(&self, pattern: &str, resource_path: &Path, content: &[u8]) -> String {
    let ext = resource_path
      .extension()
      .map(|ext| ext.to_string_lossy().into_owned())
      .unwrap_or_else(|| "bin".to_string());
    let name = resource_path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_else(|| "file".to_string());
    let directory = resource_directory(&self.context, resource_path);
    let digest = sha256_hex(content);

    let hashed = hash_placeholder().replace_all(pattern, |caps: &Captures| {
      let length = caps
        .get(1)
        .and_then(|value| value.as_str().parse::<usize>().ok())
        .unwrap_or(DEFAULT_HASH_LENGTH)
        .clamp(1, digest.len());
      digest[..length].to_string()
    });

    hashed
      .replace("[ext]", &ext)
      .replace("[name]", &name)
      .replace("[path]", &directory)
  }
}

fn hash_placeholder() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"(?i)\[(?:[^:\]]+:)?(?:hash|contenthash)(?::[a-z]+\d*)?(?::(\d+))?\]")
      .expect("invalid hash placeholder regex")
  })
}

/// Directory of the resource relative to the context, `..` replaced by `_`, with a trailing slash.
fn resource_directory(context: &Path, resource_path: &Path) -> String {
  let Some(parent) = resource_path.parent() else {
    return String::new();
  };

  let relative = relative_source_path(context, parent);
  if relative.is_empty() {
    return String::new();
  }

  let escaped: Vec<&str> = relative
    .split('/')
    .map(|segment| if segment == ".." { "_" } else { segment })
    .collect();
  format!("{}/", escaped.join("/"))
}

/// Lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(data);
  hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn namer() -> ContentHashNamer {
    ContentHashNamer::new("/project")
  }

  #[test]
  fn hashed_name_is_deterministic() {
    let path = Path::new("/project/assets/logo.png");
    let first = namer().interpolate(DEFAULT_NAME_PATTERN, path, b"image bytes");
    let second = namer().interpolate(DEFAULT_NAME_PATTERN, path, b"image bytes");

    assert_eq!(first, second);
    assert!(first.starts_with("logo."));
    assert!(first.ends_with(".png"));
    assert_eq!(first.len(), "logo.".len() + DEFAULT_HASH_LENGTH + ".png".len());
  }

  #[test]
  fn single_byte_change_changes_name() {
    let path = Path::new("/project/assets/logo.png");
    let first = namer().interpolate(DEFAULT_NAME_PATTERN, path, b"image bytes");
    let second = namer().interpolate(DEFAULT_NAME_PATTERN, path, b"image byteZ");
    assert_ne!(first, second);
  }

  #[test]
  fn honours_length_modifiers_and_contenthash() {
    let path = Path::new("/project/logo.png");
    let digest = sha256_hex(b"abc");

    let short = namer().interpolate("[name]-[hash:8].[ext]", path, b"abc");
    assert_eq!(short, format!("logo-{}.png", &digest[..8]));

    let full = namer().interpolate("[sha256:contenthash:hex:64]", path, b"abc");
    assert_eq!(full, digest);
  }

  #[test]
  fn expands_path_relative_to_context() {
    let path = Path::new("/project/assets/icons/logo.png");
    let name = namer().interpolate("[path][name].[ext]", path, b"");
    assert_eq!(name, "assets/icons/logo.png");

    let outside = namer().interpolate("[path][name].[ext]", Path::new("/shared/logo.png"), b"");
    assert_eq!(outside, "_/shared/logo.png");
  }

  #[test]
  fn falls_back_for_missing_extension() {
    let name = namer().interpolate("[name].[ext]", Path::new("/project/LICENSE"), b"");
    assert_eq!(name, "LICENSE.bin");
  }

  #[test]
  fn sha256_hex_matches_known_digest() {
    assert_eq!(
      sha256_hex(b"abc"),
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }
}
