//! End-to-end flattening of ARM templates
//!
//! Uses the exported factory in `tests/fixtures/arm_template.json`, which
//! covers every inventory plus one resource type outside the inventory.

use adf_inventory::template::{self, type_census};
use adf_inventory::{
    inventory_from_path, FlattenConfig, Flattener, Inventory, InventoryError, NamePolicy,
    OutputFormat, TableKind, TableWriter, WriterConfig,
};
use serde_json::{json, Value};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/arm_template.json");

fn fixture_inventory() -> Inventory {
    inventory_from_path(FIXTURE, FlattenConfig::default()).unwrap()
}

fn render_all(inventory: &Inventory, format: OutputFormat) -> Vec<u8> {
    let config = WriterConfig {
        format,
        ..Default::default()
    };
    let mut writer = TableWriter::new(Vec::new(), config);
    for table in TableKind::ALL {
        writer.write_table(inventory, table).unwrap();
    }
    writer.into_inner()
}

#[test]
fn test_single_pipeline_scenario() {
    let template = json!({"resources": [{
        "type": "Microsoft.DataFactory/factories/pipelines",
        "name": "concat(variables('factoryId'),'/P1')]",
        "properties": {
            "folder": {"name": "F"},
            "description": "d",
            "activities": [{"name": "A1", "type": "Copy", "dependsOn": []}]
        },
        "dependsOn": []
    }]});

    let inventory = Flattener::new(FlattenConfig::default()).flatten(&template).unwrap();

    let pipeline = &inventory.pipelines[0];
    assert_eq!(pipeline.folder.as_deref(), Some("F"));
    assert_eq!(pipeline.pipeline_name.as_deref(), Some("P1"));
    assert_eq!(pipeline.description.as_deref(), Some("d"));
    assert_eq!(pipeline.depends_on, "[]");

    assert_eq!(inventory.activities.len(), 1);
    let activity = &inventory.activities[0];
    assert_eq!(activity.pipeline_name.as_deref(), Some("P1"));
    assert_eq!(activity.activity_name.as_deref(), Some("A1"));
    assert_eq!(activity.activity_type.as_deref(), Some("Copy"));
    assert!(activity.dependent_on_activity.is_none());
}

#[test]
fn test_unknown_type_is_ignored() {
    let template = json!({"resources": [
        {"type": "Microsoft.DataFactory/factories/notARealType", "name": "concat(variables('factoryId'),'/Ghost')]"},
        {"type": "Microsoft.DataFactory/factories/triggers", "name": "concat(variables('factoryId'),'/T1')]"}
    ]});

    let inventory = Flattener::new(FlattenConfig::default()).flatten(&template).unwrap();

    assert_eq!(inventory.triggers.len(), 1);
    let total: usize = TableKind::ALL.iter().map(|t| inventory.row_count(*t)).sum();
    assert_eq!(total, 1);
}

#[test]
fn test_fixture_pipelines() {
    let inventory = fixture_inventory();

    let names: Vec<_> = inventory
        .pipelines
        .iter()
        .map(|p| (p.folder.as_deref(), p.pipeline_name.as_deref()))
        .collect();
    assert_eq!(
        names,
        vec![(Some("Ingest"), Some("PL_Ingest")), (Some("Orchestration"), Some("PL_Master"))]
    );

    let master = &inventory.pipelines[1];
    assert_eq!(master.description.as_deref(), Some("Runs the nightly load"));
    assert_eq!(master.depends_on, "[/pipelines/PL_Ingest, /linkedServices/LS_SqlDw]");
    assert_eq!(master.parameters, Some(json!({"runDate": {"type": "string"}})));
}

#[test]
fn test_fixture_activities() {
    let inventory = fixture_inventory();

    let rows: Vec<_> = inventory
        .activities
        .iter()
        .map(|a| {
            (
                a.pipeline_name.as_deref(),
                a.activity_name.as_deref(),
                a.dependent_on_activity.as_deref(),
                a.included_name.as_deref(),
            )
        })
        .collect();

    assert_eq!(
        rows,
        vec![
            (Some("PL_Ingest"), Some("Each File"), Some("Lookup Files"), None),
            (Some("PL_Ingest"), Some("Each File"), Some("Lookup Files"), Some("Copy File")),
            (Some("PL_Ingest"), Some("Each File"), Some("Lookup Files"), Some("Clean File")),
            (Some("PL_Ingest"), Some("Lookup Files"), None, None),
            (Some("PL_Master"), Some("Merge Sales"), Some("Run Ingest"), None),
            (Some("PL_Master"), Some("Run Ingest"), None, None),
        ]
    );

    let clean_file = &inventory.activities[2];
    assert_eq!(clean_file.included_type.as_deref(), Some("DatabricksNotebook"));
    assert_eq!(clean_file.included_script_path.as_deref(), Some("/Shared/clean_file"));
    assert_eq!(clean_file.included_linked_service_name.as_deref(), Some("LS_Databricks"));

    let merge = &inventory.activities[4];
    assert_eq!(merge.dependency_condition.as_deref(), Some("Succeeded"));
    assert_eq!(merge.stored_procedure_name.as_deref(), Some("[[dbo].[usp_MergeSales]"));
    assert_eq!(merge.linked_service_name.as_deref(), Some("LS_SqlDw"));
}

#[test]
fn test_fixture_linked_services_datasets_triggers() {
    let inventory = fixture_inventory();

    let services: Vec<_> = inventory
        .linked_services
        .iter()
        .map(|s| (s.linked_service_name.as_deref(), s.service_type.as_deref()))
        .collect();
    assert_eq!(
        services,
        vec![(Some("LS_SqlDw"), Some("AzureSqlDW")), (Some("LS_Databricks"), Some("AzureDatabricks"))]
    );
    assert_eq!(inventory.linked_services[1].description.as_deref(), Some("Shared cluster"));

    let dataset = &inventory.datasets[0];
    assert_eq!(dataset.dataset_name.as_deref(), Some("DS_FileList"));
    assert_eq!(dataset.folder.as_deref(), Some("Control"));
    assert_eq!(dataset.linked_service_name.as_deref(), Some("LS_SqlDw"));
    assert_eq!(dataset.depends_on, "[/linkedServices/LS_SqlDw]");

    let trigger = &inventory.triggers[0];
    assert_eq!(trigger.trigger_name.as_deref(), Some("TR_Nightly"));
    assert_eq!(trigger.trigger_type.as_deref(), Some("ScheduleTrigger"));
    assert_eq!(trigger.depends_on, "[/pipelines/PL_Master]");
}

#[test]
fn test_fixture_passes_strict_names() {
    let config = FlattenConfig {
        name_policy: NamePolicy::Strict,
        ..Default::default()
    };
    assert!(inventory_from_path(FIXTURE, config).is_ok());
}

#[test]
fn test_type_census_counts_every_type() {
    let template = template::load_template(FIXTURE).unwrap();
    let census = type_census(template::resources(&template).unwrap());

    assert_eq!(census.len(), 5);
    assert_eq!(census["Microsoft.DataFactory/factories/pipelines"], 2);
    assert_eq!(census["Microsoft.DataFactory/factories/integrationRuntimes"], 1);
}

#[test]
fn test_output_is_deterministic() {
    let first = render_all(&fixture_inventory(), OutputFormat::Csv);
    let second = render_all(&fixture_inventory(), OutputFormat::Csv);
    assert_eq!(first, second);

    let first = render_all(&fixture_inventory(), OutputFormat::Jsonl);
    let second = render_all(&fixture_inventory(), OutputFormat::Jsonl);
    assert_eq!(first, second);
}

#[test]
fn test_shuffled_resources_give_same_inventory() {
    let mut template: Value = template::load_template(FIXTURE).unwrap();
    let expected = Flattener::new(FlattenConfig::default()).flatten(&template).unwrap();

    template["resources"].as_array_mut().unwrap().reverse();
    let reversed = Flattener::new(FlattenConfig::default()).flatten(&template).unwrap();

    assert_eq!(expected.pipelines, reversed.pipelines);
    assert_eq!(expected.activities, reversed.activities);
    assert_eq!(expected.datasets, reversed.datasets);
    assert_eq!(expected.triggers, reversed.triggers);
}

#[test]
fn test_missing_template_is_fatal() {
    let err = inventory_from_path("/nonexistent/arm_template.json", FlattenConfig::default()).unwrap_err();
    assert!(matches!(err, InventoryError::Io { .. }));
}
