//! Row types for the five inventories
//!
//! Column names are part of the output contract; the serde names and
//! `COLUMNS` must stay in the same order.

use serde::Serialize;
use serde_json::Value;

/// The five inventories, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum TableKind {
    Pipelines,
    Activities,
    LinkedServices,
    Datasets,
    Triggers,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Pipelines,
        TableKind::Activities,
        TableKind::LinkedServices,
        TableKind::Datasets,
        TableKind::Triggers,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TableKind::Pipelines => "Pipelines",
            TableKind::Activities => "Activities",
            TableKind::LinkedServices => "LinkedServices",
            TableKind::Datasets => "Datasets",
            TableKind::Triggers => "Triggers",
        }
    }

    /// Output file name without extension, e.g. `ADF_Pipelines`
    pub fn file_stem(self) -> String {
        format!("ADF_{}", self.title())
    }
}

/// A row that can be written as a table cell sequence
pub trait InventoryRow: Serialize {
    const TABLE: TableKind;
    const COLUMNS: &'static [&'static str];

    /// Cell values in `COLUMNS` order
    fn cells(&self) -> Vec<Option<&str>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRow {
    #[serde(rename = "Folder")]
    pub folder: Option<String>,
    #[serde(rename = "PipelineName")]
    pub pipeline_name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "DependsOnObject")]
    pub depends_on: String,

    /// `properties.parameters`, kept for library callers only
    #[serde(skip)]
    pub parameters: Option<Value>,
}

impl InventoryRow for PipelineRow {
    const TABLE: TableKind = TableKind::Pipelines;
    const COLUMNS: &'static [&'static str] =
        &["Folder", "PipelineName", "Description", "DependsOnObject"];

    fn cells(&self) -> Vec<Option<&str>> {
        vec![
            self.folder.as_deref(),
            self.pipeline_name.as_deref(),
            self.description.as_deref(),
            Some(self.depends_on.as_str()),
        ]
    }
}

/// Columns projected from an activity or an included sub-activity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityShape {
    pub name: Option<String>,
    pub activity_type: Option<String>,
    pub stored_procedure_name: Option<String>,
    pub script_path: Option<String>,
    pub linked_service_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityRow {
    #[serde(rename = "PipelineName")]
    pub pipeline_name: Option<String>,
    #[serde(rename = "ActivityName")]
    pub activity_name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "ActivityType")]
    pub activity_type: Option<String>,
    #[serde(rename = "StoredProcedureName")]
    pub stored_procedure_name: Option<String>,
    #[serde(rename = "ScriptPath")]
    pub script_path: Option<String>,
    #[serde(rename = "LinkedServiceName")]
    pub linked_service_name: Option<String>,
    #[serde(rename = "DependentOnActivity")]
    pub dependent_on_activity: Option<String>,
    #[serde(rename = "DependencyCondition")]
    pub dependency_condition: Option<String>,
    #[serde(rename = "IncludedActName")]
    pub included_name: Option<String>,
    #[serde(rename = "IncludedActType")]
    pub included_type: Option<String>,
    #[serde(rename = "IncludedActivityStoredProcedureName")]
    pub included_stored_procedure_name: Option<String>,
    #[serde(rename = "IncludedActivityScriptPath")]
    pub included_script_path: Option<String>,
    #[serde(rename = "IncludedActivityLinkedServiceName")]
    pub included_linked_service_name: Option<String>,
}

impl ActivityRow {
    /// Copy an included sub-activity into the `Included*` columns
    pub fn with_included(mut self, included: ActivityShape) -> Self {
        self.included_name = included.name;
        self.included_type = included.activity_type;
        self.included_stored_procedure_name = included.stored_procedure_name;
        self.included_script_path = included.script_path;
        self.included_linked_service_name = included.linked_service_name;
        self
    }
}

impl InventoryRow for ActivityRow {
    const TABLE: TableKind = TableKind::Activities;
    const COLUMNS: &'static [&'static str] = &[
        "PipelineName",
        "ActivityName",
        "Description",
        "ActivityType",
        "StoredProcedureName",
        "ScriptPath",
        "LinkedServiceName",
        "DependentOnActivity",
        "DependencyCondition",
        "IncludedActName",
        "IncludedActType",
        "IncludedActivityStoredProcedureName",
        "IncludedActivityScriptPath",
        "IncludedActivityLinkedServiceName",
    ];

    fn cells(&self) -> Vec<Option<&str>> {
        vec![
            self.pipeline_name.as_deref(),
            self.activity_name.as_deref(),
            self.description.as_deref(),
            self.activity_type.as_deref(),
            self.stored_procedure_name.as_deref(),
            self.script_path.as_deref(),
            self.linked_service_name.as_deref(),
            self.dependent_on_activity.as_deref(),
            self.dependency_condition.as_deref(),
            self.included_name.as_deref(),
            self.included_type.as_deref(),
            self.included_stored_procedure_name.as_deref(),
            self.included_script_path.as_deref(),
            self.included_linked_service_name.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedServiceRow {
    #[serde(rename = "Folder")]
    pub folder: Option<String>,
    #[serde(rename = "LinkedServiceName")]
    pub linked_service_name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Type")]
    pub service_type: Option<String>,
    #[serde(rename = "DependsOn")]
    pub depends_on: String,
}

impl InventoryRow for LinkedServiceRow {
    const TABLE: TableKind = TableKind::LinkedServices;
    const COLUMNS: &'static [&'static str] =
        &["Folder", "LinkedServiceName", "Description", "Type", "DependsOn"];

    fn cells(&self) -> Vec<Option<&str>> {
        vec![
            self.folder.as_deref(),
            self.linked_service_name.as_deref(),
            self.description.as_deref(),
            self.service_type.as_deref(),
            Some(self.depends_on.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRow {
    #[serde(rename = "Folder")]
    pub folder: Option<String>,
    #[serde(rename = "DatasetName")]
    pub dataset_name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Type")]
    pub dataset_type: Option<String>,
    #[serde(rename = "LinkedServiceName")]
    pub linked_service_name: Option<String>,
    #[serde(rename = "DependsOn")]
    pub depends_on: String,
}

impl InventoryRow for DatasetRow {
    const TABLE: TableKind = TableKind::Datasets;
    const COLUMNS: &'static [&'static str] = &[
        "Folder",
        "DatasetName",
        "Description",
        "Type",
        "LinkedServiceName",
        "DependsOn",
    ];

    fn cells(&self) -> Vec<Option<&str>> {
        vec![
            self.folder.as_deref(),
            self.dataset_name.as_deref(),
            self.description.as_deref(),
            self.dataset_type.as_deref(),
            self.linked_service_name.as_deref(),
            Some(self.depends_on.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerRow {
    #[serde(rename = "TriggerName")]
    pub trigger_name: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Type")]
    pub trigger_type: Option<String>,
    #[serde(rename = "DependsOn")]
    pub depends_on: String,
}

impl InventoryRow for TriggerRow {
    const TABLE: TableKind = TableKind::Triggers;
    const COLUMNS: &'static [&'static str] = &["TriggerName", "Description", "Type", "DependsOn"];

    fn cells(&self) -> Vec<Option<&str>> {
        vec![
            self.trigger_name.as_deref(),
            self.description.as_deref(),
            self.trigger_type.as_deref(),
            Some(self.depends_on.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_keys_match_columns() {
        let row = ActivityRow {
            pipeline_name: Some("P1".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&row).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected: Vec<&str> = ActivityRow::COLUMNS.to_vec();
        keys.sort_unstable();
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(row.cells().len(), ActivityRow::COLUMNS.len());
    }

    #[test]
    fn test_pipeline_parameters_not_serialized() {
        let row = PipelineRow {
            folder: None,
            pipeline_name: Some("P1".to_string()),
            description: None,
            depends_on: "[]".to_string(),
            parameters: Some(serde_json::json!({"runDate": {"type": "string"}})),
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("runDate"));
        assert_eq!(row.cells().len(), PipelineRow::COLUMNS.len());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(TableKind::LinkedServices.file_stem(), "ADF_LinkedServices");
    }
}
