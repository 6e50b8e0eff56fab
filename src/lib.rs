#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod hashing;
pub mod loader;
pub mod manifest;
pub mod mode;
pub mod tags;

pub use config::LoaderOptions;
pub use emit::{AssetEmitter, AssetInfo, AssetSink, DirectorySink, MemorySink, ResolvedAsset};
pub use error::{EmitError, GeneratorError, LoaderError};
pub use generator::{CommandGenerator, GeneratedFile, GeneratedSet, IconGenerator};
pub use hashing::{ContentHashNamer, NameInterpolator};
pub use loader::{DependencyTracker, LoadOutput, LoaderContext, LoaderHost, ManifestLoader};
pub use manifest::{ManifestConfig, parse_manifest};
pub use mode::{BuildEnvironment, GenerationMode};
pub use tags::{Attributes, ElementDescriptor, ElementList, parse_tag};
