//! Full icon-set generation through an external generator.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::asset_paths::join_asset_path;
use crate::emit::{AssetEmitter, ResolvedAsset};
use crate::error::{GeneratorError, LoaderError};
use crate::manifest::ManifestConfig;

/// A file produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  /// Name relative to the output directory.
  pub name: String,
  /// File contents.
  pub contents: Vec<u8>,
}

/// Everything a generator run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSet {
  /// Markup tags referencing the generated files, in generator order.
  pub tags: Vec<String>,
  /// Image variants.
  pub images: Vec<GeneratedFile>,
  /// Auxiliary files such as web manifests.
  pub files: Vec<GeneratedFile>,
}

/// External favicon-set generator.
pub trait IconGenerator {
  /// Generate the icon set for `image` using the manifest's generator options.
  fn generate(
    &self,
    image: &[u8],
    options: &Map<String, Value>,
  ) -> Result<GeneratedSet, GeneratorError>;
}

/// Generator used when none was configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

impl IconGenerator for UnconfiguredGenerator {
  fn generate(
    &self,
    _image: &[u8],
    _options: &Map<String, Value>,
  ) -> Result<GeneratedSet, GeneratorError> {
    Err(GeneratorError::NotConfigured)
  }
}

/// Generator delegating to an external program.
///
/// The program receives the source image on stdin and the generator options as a JSON
/// document in its last argument. It must print a JSON object of the shape
/// `{"html": [...], "images": [{"name", "contents"}], "files": [{"name", "contents"}]}` with
/// base64 encoded contents.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
  program: PathBuf,
  args: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CommandOutput {
  #[serde(default)]
  html: Vec<String>,
  #[serde(default)]
  images: Vec<EncodedFile>,
  #[serde(default)]
  files: Vec<EncodedFile>,
}

#[derive(Debug, Deserialize)]
struct EncodedFile {
  name: String,
  contents: String,
}

impl CommandGenerator {
  /// Create a generator running `program` with the leading `args`.
  pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
    Self {
      program: program.into(),
      args,
    }
  }

  fn program_name(&self) -> String {
    self.program.display().to_string()
  }
}

impl IconGenerator for CommandGenerator {
  fn generate(
    &self,
    image: &[u8],
    options: &Map<String, Value>,
  ) -> Result<GeneratedSet, GeneratorError> {
    let program = self.program_name();
    let options_json = serde_json::to_string(options).map_err(GeneratorError::Output)?;

    let mut child = Command::new(&self.program)
      .args(&self.args)
      .arg(options_json)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|source| GeneratorError::Spawn {
        program: program.clone(),
        source,
      })?;

    // A generator that exits without reading stdin closes the pipe early; its exit status
    // decides the outcome.
    if let Some(mut stdin) = child.stdin.take()
      && let Err(source) = stdin.write_all(image)
      && source.kind() != ErrorKind::BrokenPipe
    {
      return Err(GeneratorError::Spawn {
        program,
        source,
      });
    }

    let output = child
      .wait_with_output()
      .map_err(|source| GeneratorError::Spawn {
        program: program.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(GeneratorError::Failed {
        program,
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    decode_command_output(&output.stdout)
  }
}

fn decode_command_output(stdout: &[u8]) -> Result<GeneratedSet, GeneratorError> {
  let output: CommandOutput = serde_json::from_slice(stdout).map_err(GeneratorError::Output)?;

  Ok(GeneratedSet {
    tags: output.html,
    images: decode_files(output.images)?,
    files: decode_files(output.files)?,
  })
}

fn decode_files(files: Vec<EncodedFile>) -> Result<Vec<GeneratedFile>, GeneratorError> {
  files
    .into_iter()
    .map(|file| {
      let contents = general_purpose::STANDARD
        .decode(file.contents.as_bytes())
        .map_err(|source| GeneratorError::Encoding {
          name: file.name.clone(),
          source,
        })?;
      Ok(GeneratedFile {
        name: file.name,
        contents,
      })
    })
    .collect()
}

/// Run the generator once and emit everything it produced.
///
/// Image variants are emitted below `output_dir` with immutability classification and the
/// source provenance; auxiliary files are emitted below `output_dir` without metadata. The
/// generator's tags are returned untouched and in order. Generator failures are propagated.
pub fn generate_full_set(
  generator: &dyn IconGenerator,
  image: &[u8],
  manifest: &ManifestConfig,
  output_dir: &str,
  source_provenance: &str,
  emitter: &mut AssetEmitter<'_>,
) -> Result<Vec<String>, LoaderError> {
  let GeneratedSet {
    tags,
    images,
    files,
  } = generator.generate(image, &manifest.generator_options)?;

  for GeneratedFile { name, contents } in images {
    emitter.emit(ResolvedAsset::image_variant(
      join_asset_path(output_dir, &name),
      contents,
      source_provenance.to_string(),
    ))?;
  }

  for GeneratedFile { name, contents } in files {
    emitter.emit(ResolvedAsset::auxiliary(
      join_asset_path(output_dir, &name),
      contents,
    ))?;
  }

  Ok(tags)
}
