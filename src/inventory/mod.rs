//! Inventory extraction - flatten Data Factory resources into tables
//!
//! `Flattener` projects the partitioned template into five row sets:
//! pipelines, activities, linked services, datasets and triggers.
//! `TableWriter` and `InventoryWriter` render them as text, CSV or JSON Lines.

pub mod flatten;
pub mod names;
pub mod rows;
pub mod writer;

pub use flatten::{FlattenConfig, Flattener, Inventory};
pub use names::{clean_resource_name, cleanse_name_array, NamePolicy};
pub use rows::{
    ActivityRow, DatasetRow, InventoryRow, LinkedServiceRow, PipelineRow, TableKind, TriggerRow,
};
pub use writer::{parse_delimiter, InventoryWriter, OutputFormat, TableWriter, WriterConfig};
