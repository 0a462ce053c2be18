//! Per-component compiler configuration synthesis.
//!
//! Each component gets its own config document, built from a shared base
//! template, an optional package-level override file, and a set of forced
//! overrides that pin the component's include root and output directories.
//! Every path in the result is absolute, so the document can live in the
//! cache directory rather than next to the sources it describes.
//!
//! # Submodules
//!
//! - [`jsonc`] - parsing of the commented JSON dialect config files use
//! - [`load`] - override file lookup and `extends` flattening
//! - [`merge`] - the merge rules shared by overrides and forced values
//! - [`paths`] - absolutization of path-valued fields
//! - [`synthesize`] - the synthesis transform itself
//! - [`store`] - concurrent writing of synthesized configs to the cache

pub mod jsonc;
pub mod load;
pub mod merge;
pub mod paths;
pub mod store;
pub mod synthesize;
mod types;

pub use store::write_component_configs;
pub use synthesize::synthesize;
pub use types::*;
