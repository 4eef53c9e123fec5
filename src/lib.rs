//! Layered configuration resolution.
//!
//! Resolves a typed configuration structure from three tiers, in order:
//! 1. **Environment** - a non-empty variable named by the field
//! 2. **File** - a JSON document keyed by the field's JSON key
//! 3. **Default** - a literal declared next to the field
//!
//! Schemas are declared with [`configurable!`], which builds a static field
//! descriptor table and typed accessors. The resolver walks that table, so any
//! structure shape works, including nested structures at any depth.
//!
//! ```no_run
//! use config_tiers::schemas::ServiceConfig;
//!
//! let mut config = ServiceConfig::default();
//! let resolution = config_tiers::load("config.json", &mut config);
//! for err in &resolution.errors {
//!     eprintln!("{}", err);
//! }
//! ```

pub mod cli;
pub mod coerce;
pub mod env;
pub mod error;
pub mod format;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod schemas;
pub mod walker;

pub use env::{Environment, ProcessEnv};
pub use error::{ConfigError, Origin};
pub use report::{FieldOutcome, FieldSource, Resolution};
pub use resolver::Resolver;
pub use schema::{
    Configurable, FieldDescriptor, FieldKind, FieldMut, FieldShape, IntWidth, Leaf, ValueMut,
};

use std::path::Path;

/// Resolve `dest` from the JSON file at `path` using the process environment.
pub fn load(path: impl AsRef<Path>, dest: &mut dyn Configurable) -> Resolution {
    Resolver::new().load(path, dest)
}
