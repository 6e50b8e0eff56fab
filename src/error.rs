//! Error types surfaced by the loader.
//!
//! None of these are recovered locally: the loader aborts the current manifest import and
//! the caller decides how to report the failure.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while processing a single manifest import.
#[derive(Debug, Error)]
pub enum LoaderError {
  /// The manifest payload is not valid JSON.
  #[error("failed to parse manifest JSON: {0}")]
  InvalidManifest(#[source] serde_json::Error),

  /// The manifest payload is valid JSON but not an object.
  #[error("manifest must be a JSON object")]
  ManifestNotObject,

  /// The manifest has no usable `sourceImage` entry.
  #[error("sourceImage is not defined")]
  MissingSourceImage,

  /// Loader options were rejected.
  #[error("invalid loader options: {0}")]
  InvalidOptions(#[source] serde_json::Error),

  /// The source image could not be read.
  #[error("failed to read source image {}: {source}", .path.display())]
  SourceImage {
    /// Resolved path of the source image.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },

  /// The icon generator failed.
  #[error("icon generation failed: {0}")]
  Generation(#[from] GeneratorError),

  /// The asset sink rejected a file.
  #[error(transparent)]
  Emit(#[from] EmitError),

  /// A generated tag does not follow the `<name attr="value" ...>` shape.
  #[error("malformed tag at position {position}: {tag:?}")]
  MalformedTag {
    /// Zero-based position of the tag in the generated sequence.
    position: usize,
    /// The offending tag text.
    tag: String,
  },
}

/// Failure reported by an asset sink.
#[derive(Debug, Error)]
#[error("failed to emit {name}: {source}")]
pub struct EmitError {
  /// Name of the asset that could not be registered.
  pub name: String,
  /// Underlying I/O error.
  #[source]
  pub source: std::io::Error,
}

/// Failure reported by an icon generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
  /// No generator is configured for full generation.
  #[error("no icon generator configured; pass a generator command to run full generation")]
  NotConfigured,

  /// The generator process could not be started or fed.
  #[error("failed to run generator `{program}`: {source}")]
  Spawn {
    /// Program that was executed.
    program: String,
    /// Underlying I/O error.
    source: std::io::Error,
  },

  /// The generator process exited unsuccessfully.
  #[error("generator `{program}` failed with status {status}: {stderr}")]
  Failed {
    /// Program that was executed.
    program: String,
    /// Exit status description.
    status: String,
    /// Captured standard error output.
    stderr: String,
  },

  /// The generator output could not be decoded.
  #[error("failed to parse generator output: {0}")]
  Output(#[source] serde_json::Error),

  /// A generated file carried invalid base64 contents.
  #[error("generated file {name} has invalid contents: {source}")]
  Encoding {
    /// Name of the generated file.
    name: String,
    /// Underlying decode error.
    source: base64::DecodeError,
  },
}
