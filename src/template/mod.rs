//! ARM template access - loading, path lookup and resource partitioning
//!
//! The template is held as a `serde_json::Value` tree. Nothing here
//! interprets Data Factory semantics beyond the `type` discriminator.

pub mod loader;
pub mod partition;
pub mod path;

pub use loader::{load_template, parse_template, resources};
pub use partition::{type_census, Partitioned, ResourceKind};
pub use path::{as_cell, lookup, lookup_array, lookup_str};
