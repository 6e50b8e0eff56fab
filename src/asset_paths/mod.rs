//! Helpers for naming and classifying emitted assets.
//!
//! Path normalisation and immutability classification are split into focused submodules so
//! that the metadata attached to every emitted asset can be tested without a sink.

mod immutability;
mod normalize;

pub use immutability::{is_immutable_name, strip_query};
pub use normalize::{join_asset_path, normalize_path, relative_source_path, resolve_lexically};
