use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use icon_manifest_loader::generator::UnconfiguredGenerator;
use icon_manifest_loader::loader::CargoRerunTracker;
use icon_manifest_loader::{
  BuildEnvironment, CommandGenerator, ContentHashNamer, DependencyTracker, DirectorySink,
  IconGenerator, LoaderContext, LoaderHost, LoaderOptions, ManifestLoader,
};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Resolve an icon manifest into favicon assets and head elements.
#[derive(Debug, Parser)]
#[command(name = "icon-manifest", version, about)]
struct Cli {
  /// Manifest file to load.
  manifest: PathBuf,

  /// Project root used for provenance paths and option discovery.
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Directory that receives emitted assets.
  #[arg(long, default_value = "target/icon-manifest")]
  out_dir: PathBuf,

  /// Output-relative directory for generated files.
  #[arg(long)]
  output_path: Option<String>,

  /// Run full generation outside release builds.
  #[arg(long)]
  force_emit: bool,

  /// Treat this as a release build (defaults to `NODE_ENV`).
  #[arg(long)]
  release: bool,

  /// Generator program used for full generation.
  #[arg(long)]
  generator: Option<PathBuf>,

  /// Leading argument passed to the generator program (repeatable).
  #[arg(long = "generator-arg", allow_hyphen_values = true)]
  generator_args: Vec<String>,

  /// Format of the element list written to stdout.
  #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
  format: OutputFormat,

  /// Announce the source image to Cargo with `cargo:rerun-if-changed`.
  #[arg(long)]
  cargo: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
  /// JSON array of `{"type", "props"}` objects.
  Json,
  /// ES module exporting React elements.
  Module,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  match run(Cli::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("{err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let mut options = LoaderOptions::discover(&cli.root);
  if let Some(output_path) = cli.output_path {
    options.output_path = output_path;
  }
  options.force_emit |= cli.force_emit;

  let environment = if cli.release {
    BuildEnvironment::Release
  } else {
    BuildEnvironment::from_env_value(env::var("NODE_ENV").ok().as_deref())
  };

  let content = fs::read_to_string(&cli.manifest)
    .with_context(|| format!("failed to read {}", cli.manifest.display()))?;

  let generator: Box<dyn IconGenerator> = match cli.generator {
    Some(program) => Box::new(CommandGenerator::new(program, cli.generator_args)),
    None => Box::new(UnconfiguredGenerator),
  };
  let mut sink = DirectorySink::new(&cli.out_dir);
  let mut recorded: Vec<PathBuf> = Vec::new();
  let mut cargo_tracker = CargoRerunTracker;
  let dependencies: &mut dyn DependencyTracker = if cli.cargo {
    &mut cargo_tracker
  } else {
    &mut recorded
  };
  let namer = ContentHashNamer::new(&cli.root);

  let mut loader = ManifestLoader::new(
    LoaderContext {
      root_context: cli.root.clone(),
      resource_path: cli.manifest.clone(),
    },
    options,
    environment,
    LoaderHost {
      sink: &mut sink,
      dependencies,
      generator: generator.as_ref(),
      namer: &namer,
    },
  );

  let output = loader
    .load(&content)
    .with_context(|| format!("failed to load manifest {}", cli.manifest.display()))?;
  drop(loader);

  debug!(dependencies = ?recorded, "registered build inputs");
  info!(
    mode = ?output.mode,
    assets = sink.written().len(),
    elements = output.elements.len(),
    out_dir = %cli.out_dir.display(),
    "icon manifest resolved"
  );

  let rendered = match cli.format {
    OutputFormat::Json => serde_json::to_string_pretty(&output.elements)?,
    OutputFormat::Module => output.elements.to_module_source()?,
  };
  println!("{rendered}");

  Ok(())
}
