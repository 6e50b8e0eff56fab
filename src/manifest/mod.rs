//! Parsing of the manifest description file that triggers the loader.

mod parse;

pub use parse::{ManifestConfig, SOURCE_IMAGE_FIELD, OUTPUT_PATH_FIELD, parse_manifest};
