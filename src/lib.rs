//! # ADF Inventory - ARM Template Flattening
//!
//! Turns an Azure Data Factory ARM template export into flat, relational
//! inventories suitable for tabular display or CSV export.
//!
//! ## Modules
//!
//! - **template**: Load the template and partition its `resources` by type
//! - **inventory**: Cleanse ARM names, explode activities and write tables
//!
//! ## Quick Start
//!
//! ```rust
//! use adf_inventory::{FlattenConfig, Flattener};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let template = json!({
//!     "resources": [{
//!         "type": "Microsoft.DataFactory/factories/pipelines",
//!         "name": "[concat(parameters('factoryName'), '/LoadSales')]",
//!         "properties": {
//!             "activities": [{"name": "CopyRaw", "type": "Copy", "dependsOn": []}]
//!         },
//!         "dependsOn": []
//!     }]
//! });
//!
//! let inventory = Flattener::new(FlattenConfig::default()).flatten(&template)?;
//!
//! assert_eq!(inventory.pipelines[0].pipeline_name.as_deref(), Some("LoadSales"));
//! assert_eq!(inventory.activities[0].activity_name.as_deref(), Some("CopyRaw"));
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod error;
pub mod inventory;
pub mod template;

// Re-export commonly used types for convenience
pub use error::{InventoryError, Result};
pub use inventory::{
    FlattenConfig, Flattener, Inventory, InventoryWriter, NamePolicy, OutputFormat, TableKind,
    TableWriter, WriterConfig,
};

/// Main entry point: load a template from disk and flatten it
pub fn inventory_from_path<P: AsRef<Path>>(path: P, config: FlattenConfig) -> Result<Inventory> {
    let template = template::load_template(path)?;
    Flattener::new(config).flatten(&template)
}
