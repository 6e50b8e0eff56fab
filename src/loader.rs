//! Loader entry point resolving one manifest import into emitted assets and elements.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::asset_paths::{relative_source_path, resolve_lexically};
use crate::config::LoaderOptions;
use crate::emit::{AssetEmitter, AssetSink, ResolvedAsset};
use crate::error::LoaderError;
use crate::generator::{IconGenerator, generate_full_set};
use crate::hashing::{DEFAULT_NAME_PATTERN, NameInterpolator};
use crate::manifest::parse_manifest;
use crate::mode::{BuildEnvironment, GenerationMode};
use crate::tags::{ElementList, parse_tag};

/// Result type used by the loader entry point.
pub type LoadResult<T> = Result<T, LoaderError>;

/// Receives build inputs that should trigger a rebuild when they change.
pub trait DependencyTracker {
  /// Register `path` as an input of the current build step.
  fn add_dependency(&mut self, path: &Path);
}

impl DependencyTracker for Vec<PathBuf> {
  fn add_dependency(&mut self, path: &Path) {
    self.push(path.to_path_buf());
  }
}

/// Tracker announcing dependencies to Cargo from a build script.
#[derive(Debug, Default, Clone, Copy)]
pub struct CargoRerunTracker;

impl DependencyTracker for CargoRerunTracker {
  fn add_dependency(&mut self, path: &Path) {
    println!("cargo:rerun-if-changed={}", path.display());
  }
}

/// Location of the manifest being loaded.
#[derive(Debug, Clone)]
pub struct LoaderContext {
  /// Project root; provenance paths are reported relative to it.
  pub root_context: PathBuf,
  /// Path of the manifest file being loaded.
  pub resource_path: PathBuf,
}

/// Capabilities provided by the host build system.
pub struct LoaderHost<'a> {
  /// Destination of emitted assets.
  pub sink: &'a mut dyn AssetSink,
  /// Receiver of build input registrations.
  pub dependencies: &'a mut dyn DependencyTracker,
  /// Generator used for full generation.
  pub generator: &'a dyn IconGenerator,
  /// Content-hash naming function.
  pub namer: &'a dyn NameInterpolator,
}

/// Everything produced by one manifest import.
#[derive(Debug, Clone)]
pub struct LoadOutput {
  /// Element descriptors, one per generated tag.
  pub elements: ElementList,
  /// Content-hashed name of the manifest itself.
  pub manifest_name: String,
  /// Content-hashed name of the source image.
  pub image_name: String,
  /// Mode the import ran in.
  pub mode: GenerationMode,
}

/// Resolves manifest imports for a single host context.
pub struct ManifestLoader<'a> {
  context: LoaderContext,
  options: LoaderOptions,
  environment: BuildEnvironment,
  host: LoaderHost<'a>,
}

impl<'a> ManifestLoader<'a> {
  /// Create a loader for the manifest described by `context`.
  pub fn new(
    context: LoaderContext,
    options: LoaderOptions,
    environment: BuildEnvironment,
    host: LoaderHost<'a>,
  ) -> Self {
    Self {
      context,
      options,
      environment,
      host,
    }
  }

  /// Process the manifest `content`, emitting assets and returning the element descriptors.
  ///
  /// Any failure aborts the import; assets emitted before the failure stay emitted.
  pub fn load(&mut self, content: &str) -> LoadResult<LoadOutput> {
    let mut manifest = parse_manifest(content)?;

    let manifest_name = self.host.namer.interpolate(
      DEFAULT_NAME_PATTERN,
      &self.context.resource_path,
      content.as_bytes(),
    );

    manifest.set_output_path(self.options.public_path());

    let source_path = self.source_image_path(&manifest.source_image);
    self.host.dependencies.add_dependency(&source_path);
    let image = fs::read(&source_path).map_err(|source| LoaderError::SourceImage {
      path: source_path.clone(),
      source,
    })?;

    let image_name = self
      .host
      .namer
      .interpolate(DEFAULT_NAME_PATTERN, &source_path, &image);
    let source_filename = relative_source_path(&self.context.root_context, &source_path);

    let mode = GenerationMode::select(self.environment, self.options.force_emit);
    debug!(
      manifest = %self.context.resource_path.display(),
      mode = ?mode,
      "resolving icon manifest"
    );

    let mut emitter = AssetEmitter::new(&mut *self.host.sink);
    let tags = if mode.is_full() {
      warn!("Generating a new set of favicons, this will take some time...");
      generate_full_set(
        self.host.generator,
        &image,
        &manifest,
        &self.options.output_path,
        &source_filename,
        &mut emitter,
      )?
    } else {
      emitter.emit(ResolvedAsset::content_hashed(
        self.options.output_location(&image_name),
        image,
        source_filename,
      ))?;
      vec![format!(
        r#"<link rel="icon" href="{}/{image_name}">"#,
        manifest.output_path
      )]
    };

    let elements = tags
      .iter()
      .enumerate()
      .map(|(position, tag)| parse_tag(tag, position))
      .collect::<LoadResult<Vec<_>>>()?;

    Ok(LoadOutput {
      elements: ElementList::new(elements),
      manifest_name,
      image_name,
      mode,
    })
  }

  /// Resolve the manifest's image path relative to the manifest file.
  fn source_image_path(&self, source_image: &str) -> PathBuf {
    let directory = self
      .context
      .resource_path
      .parent()
      .unwrap_or_else(|| Path::new(""));
    resolve_lexically(&directory.join(source_image))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::emit::MemorySink;
  use crate::generator::UnconfiguredGenerator;
  use crate::hashing::ContentHashNamer;
  use tempfile::tempdir;

  fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
  }

  #[test]
  fn dev_mode_emits_hashed_image_and_link() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let manifest_path = root.join("app/site.manifest");
    write_file(&root.join("app/images/logo.png"), b"png bytes");

    let mut sink = MemorySink::default();
    let mut dependencies: Vec<PathBuf> = Vec::new();
    let namer = ContentHashNamer::new(root);
    let mut loader = ManifestLoader::new(
      LoaderContext {
        root_context: root.to_path_buf(),
        resource_path: manifest_path,
      },
      LoaderOptions::default(),
      BuildEnvironment::Development,
      LoaderHost {
        sink: &mut sink,
        dependencies: &mut dependencies,
        generator: &UnconfiguredGenerator,
        namer: &namer,
      },
    );

    let output = loader.load(r#"{"sourceImage":"images/logo.png"}"#).unwrap();

    assert_eq!(output.mode, GenerationMode::Dev);
    assert!(output.image_name.starts_with("logo."));
    assert!(output.manifest_name.starts_with("site."));
    assert!(output.manifest_name.ends_with(".manifest"));

    let element = &output.elements.elements()[0];
    assert_eq!(element.tag_name, "link");
    assert_eq!(element.attributes.get("rel"), Some("icon"));
    assert_eq!(
      element.attributes.get("href"),
      Some(format!("/_next/static/manifest/{}", output.image_name).as_str())
    );

    drop(loader);
    assert_eq!(dependencies, vec![root.join("app/images/logo.png")]);
    assert_eq!(sink.files.len(), 1);
    let file = &sink.files[0];
    assert_eq!(file.name, format!("static/manifest/{}", output.image_name));
    assert_eq!(file.contents, b"png bytes");
    let info = file.info.as_ref().unwrap();
    assert_eq!(info.immutable, Some(true));
    assert_eq!(info.source_filename.as_deref(), Some("app/images/logo.png"));
  }

  #[test]
  fn parent_relative_source_image_is_resolved() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write_file(&root.join("shared/logo.png"), b"shared png");

    let mut sink = MemorySink::default();
    let mut dependencies: Vec<PathBuf> = Vec::new();
    let namer = ContentHashNamer::new(root);
    let mut loader = ManifestLoader::new(
      LoaderContext {
        root_context: root.to_path_buf(),
        resource_path: root.join("app/site.manifest"),
      },
      LoaderOptions::default(),
      BuildEnvironment::Development,
      LoaderHost {
        sink: &mut sink,
        dependencies: &mut dependencies,
        generator: &UnconfiguredGenerator,
        namer: &namer,
      },
    );

    loader.load(r#"{"sourceImage":"../shared/./logo.png"}"#).unwrap();

    drop(loader);
    assert_eq!(dependencies, vec![root.join("shared/logo.png")]);
    let info = sink.files[0].info.as_ref().unwrap();
    assert_eq!(info.source_filename.as_deref(), Some("shared/logo.png"));
  }

  #[test]
  fn unreadable_image_is_a_resource_error() {
    let dir = tempdir().unwrap();
    let mut sink = MemorySink::default();
    let mut dependencies: Vec<PathBuf> = Vec::new();
    let namer = ContentHashNamer::new(dir.path());
    let mut loader = ManifestLoader::new(
      LoaderContext {
        root_context: dir.path().to_path_buf(),
        resource_path: dir.path().join("site.manifest"),
      },
      LoaderOptions::default(),
      BuildEnvironment::Development,
      LoaderHost {
        sink: &mut sink,
        dependencies: &mut dependencies,
        generator: &UnconfiguredGenerator,
        namer: &namer,
      },
    );

    let err = loader.load(r#"{"sourceImage":"missing.png"}"#).unwrap_err();

    assert!(matches!(err, LoaderError::SourceImage { .. }));
    drop(loader);
    assert!(sink.files.is_empty());
    assert_eq!(dependencies.len(), 1);
  }
}
