//! Registration of generated files with the host's output pipeline.
//!
//! The [`AssetSink`] trait is the narrow capability the loader receives from its host.
//! [`AssetEmitter`] sits in front of it and derives the metadata (immutability and source
//! provenance) that accompanies every registration.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::asset_paths::{is_immutable_name, strip_query};
use crate::error::EmitError;

/// Metadata attached to an emitted asset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
  /// Set when the asset name is content-derived and may be cached indefinitely.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub immutable: Option<bool>,
  /// Project-relative path of the file the asset was produced from.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source_filename: Option<String>,
}

/// A generated file on its way to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
  /// Output-relative name, possibly carrying a `?query` suffix.
  pub name: String,
  /// File contents.
  pub contents: Vec<u8>,
  /// Whether the asset may be cached indefinitely.
  pub is_immutable: bool,
  /// Normalised source path the asset was derived from.
  pub source_provenance: Option<String>,
}

impl ResolvedAsset {
  /// Asset whose concrete name is already content-hashed.
  pub fn content_hashed(name: String, contents: Vec<u8>, source_provenance: String) -> Self {
    Self {
      name,
      contents,
      is_immutable: true,
      source_provenance: Some(source_provenance),
    }
  }

  /// Generated image variant, classified by the hash placeholder in its name.
  pub fn image_variant(name: String, contents: Vec<u8>, source_provenance: String) -> Self {
    let is_immutable = is_immutable_name(&name);
    Self {
      name,
      contents,
      is_immutable,
      source_provenance: Some(source_provenance),
    }
  }

  /// Auxiliary file (web manifest and similar) emitted without metadata.
  pub fn auxiliary(name: String, contents: Vec<u8>) -> Self {
    Self {
      name,
      contents,
      is_immutable: false,
      source_provenance: None,
    }
  }

  /// Name used as metadata key, with any query suffix removed.
  pub fn metadata_key(&self) -> &str {
    strip_query(&self.name)
  }

  /// Metadata handed to the sink, `None` for assets without any.
  pub fn info(&self) -> Option<AssetInfo> {
    if !self.is_immutable && self.source_provenance.is_none() {
      return None;
    }

    Some(AssetInfo {
      immutable: self.is_immutable.then_some(true),
      source_filename: self.source_provenance.clone(),
    })
  }
}

/// Host capability that accepts emitted files.
pub trait AssetSink {
  /// Register a file under `name` (which may include a `?query` suffix).
  fn emit_file(
    &mut self,
    name: &str,
    contents: &[u8],
    info: Option<&AssetInfo>,
  ) -> Result<(), EmitError>;
}

/// Front end over an [`AssetSink`] issuing exactly one registration per asset.
pub struct AssetEmitter<'a> {
  sink: &'a mut dyn AssetSink,
}

impl<'a> AssetEmitter<'a> {
  /// Wrap the provided sink.
  pub fn new(sink: &'a mut dyn AssetSink) -> Self {
    Self { sink }
  }

  /// Hand the asset to the sink under its original name.
  pub fn emit(&mut self, asset: ResolvedAsset) -> Result<(), EmitError> {
    let info = asset.info();
    debug!(
      asset = asset.metadata_key(),
      immutable = asset.is_immutable,
      source = asset.source_provenance.as_deref().unwrap_or("-"),
      "emitting asset"
    );
    self.sink.emit_file(&asset.name, &asset.contents, info.as_ref())
  }
}

/// A file recorded by [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
  /// Name passed to the sink.
  pub name: String,
  /// File contents.
  pub contents: Vec<u8>,
  /// Metadata passed to the sink.
  pub info: Option<AssetInfo>,
}

/// Sink that records every registration in order.
#[derive(Debug, Default)]
pub struct MemorySink {
  /// Files emitted so far.
  pub files: Vec<EmittedFile>,
}

impl MemorySink {
  /// Look up an emitted file by name.
  pub fn get(&self, name: &str) -> Option<&EmittedFile> {
    self.files.iter().find(|file| file.name == name)
  }
}

impl AssetSink for MemorySink {
  fn emit_file(
    &mut self,
    name: &str,
    contents: &[u8],
    info: Option<&AssetInfo>,
  ) -> Result<(), EmitError> {
    self.files.push(EmittedFile {
      name: name.to_string(),
      contents: contents.to_vec(),
      info: info.cloned(),
    });
    Ok(())
  }
}

/// Sink writing emitted files below an output directory.
#[derive(Debug)]
pub struct DirectorySink {
  root: PathBuf,
  written: Vec<PathBuf>,
}

impl DirectorySink {
  /// Create a sink rooted at `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      written: Vec::new(),
    }
  }

  /// Paths written so far.
  pub fn written(&self) -> &[PathBuf] {
    &self.written
  }

  fn destination(&self, name: &str) -> std::io::Result<PathBuf> {
    let relative = Path::new(strip_query(name));
    let escapes_root = relative
      .components()
      .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
    if escapes_root || relative.as_os_str().is_empty() {
      return Err(std::io::Error::new(
        ErrorKind::InvalidInput,
        "asset name must be a relative path inside the output directory",
      ));
    }

    Ok(self.root.join(relative))
  }
}

impl AssetSink for DirectorySink {
  fn emit_file(
    &mut self,
    name: &str,
    contents: &[u8],
    _info: Option<&AssetInfo>,
  ) -> Result<(), EmitError> {
    let to_emit_error = |source| EmitError {
      name: name.to_string(),
      source,
    };

    let destination = self.destination(name).map_err(to_emit_error)?;
    if let Some(parent) = destination.parent() {
      fs::create_dir_all(parent).map_err(to_emit_error)?;
    }
    fs::write(&destination, contents).map_err(to_emit_error)?;

    self.written.push(destination);
    Ok(())
  }
}
