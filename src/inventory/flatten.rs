use crate::error::Result;
use crate::inventory::names::{clean_resource_name, cleanse_name_array, format_name_list, NamePolicy};
use crate::inventory::rows::{
    ActivityRow, ActivityShape, DatasetRow, LinkedServiceRow, PipelineRow, TableKind, TriggerRow,
};
use crate::template::{as_cell, lookup, lookup_array, lookup_str, resources, Partitioned};
use serde_json::Value;

/// Configuration for the flattening process
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Handling of names that are not ARM expressions
    pub name_policy: NamePolicy,

    /// Separator between entries of a rendered `DependsOn` list
    pub list_separator: String,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            name_policy: NamePolicy::default(),
            list_separator: String::from(", "),
        }
    }
}

/// The five inventories extracted from one template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub pipelines: Vec<PipelineRow>,
    pub activities: Vec<ActivityRow>,
    pub linked_services: Vec<LinkedServiceRow>,
    pub datasets: Vec<DatasetRow>,
    pub triggers: Vec<TriggerRow>,
}

impl Inventory {
    pub fn row_count(&self, table: TableKind) -> usize {
        match table {
            TableKind::Pipelines => self.pipelines.len(),
            TableKind::Activities => self.activities.len(),
            TableKind::LinkedServices => self.linked_services.len(),
            TableKind::Datasets => self.datasets.len(),
            TableKind::Triggers => self.triggers.len(),
        }
    }
}

/// Flattens an ARM template into inventory rows
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new(config: FlattenConfig) -> Self {
        Flattener { config }
    }

    /// Flatten a parsed template. The output is fully sorted, so equal
    /// input always produces equal output.
    pub fn flatten(&self, template: &Value) -> Result<Inventory> {
        let partitioned = Partitioned::from_resources(resources(template)?);
        let mut inventory = Inventory::default();

        for pipeline in &partitioned.pipelines {
            let row = self.pipeline_row(pipeline)?;
            for activity in lookup_array(pipeline, "properties.activities") {
                explode_activity(row.pipeline_name.as_deref(), activity, &mut inventory.activities);
            }
            inventory.pipelines.push(row);
        }

        for service in &partitioned.linked_services {
            inventory.linked_services.push(LinkedServiceRow {
                folder: lookup_str(service, "properties.folder.name"),
                linked_service_name: self.resource_name(service)?,
                description: lookup_str(service, "properties.description"),
                service_type: lookup_str(service, "properties.type"),
                depends_on: self.depends_on(service)?,
            });
        }

        for dataset in &partitioned.datasets {
            inventory.datasets.push(DatasetRow {
                folder: lookup_str(dataset, "properties.folder.name"),
                dataset_name: self.resource_name(dataset)?,
                description: lookup_str(dataset, "properties.description"),
                dataset_type: lookup_str(dataset, "properties.type"),
                linked_service_name: lookup_str(dataset, "properties.linkedServiceName.referenceName"),
                depends_on: self.depends_on(dataset)?,
            });
        }

        for trigger in &partitioned.triggers {
            inventory.triggers.push(TriggerRow {
                trigger_name: self.resource_name(trigger)?,
                description: lookup_str(trigger, "properties.description"),
                trigger_type: lookup_str(trigger, "properties.type"),
                depends_on: self.depends_on(trigger)?,
            });
        }

        sort_inventory(&mut inventory);

        tracing::info!(
            pipelines = inventory.pipelines.len(),
            activities = inventory.activities.len(),
            linked_services = inventory.linked_services.len(),
            datasets = inventory.datasets.len(),
            triggers = inventory.triggers.len(),
            ignored = partitioned.ignored,
            "flattened template"
        );

        Ok(inventory)
    }

    fn pipeline_row(&self, pipeline: &Value) -> Result<PipelineRow> {
        Ok(PipelineRow {
            folder: lookup_str(pipeline, "properties.folder.name"),
            pipeline_name: self.resource_name(pipeline)?,
            description: lookup_str(pipeline, "properties.description"),
            depends_on: self.depends_on(pipeline)?,
            parameters: lookup(pipeline, "properties.parameters").cloned(),
        })
    }

    fn resource_name(&self, resource: &Value) -> Result<Option<String>> {
        let raw = resource.get("name").and_then(Value::as_str);
        clean_resource_name(raw, self.config.name_policy)
    }

    fn depends_on(&self, resource: &Value) -> Result<String> {
        let raw = lookup_array(resource, "dependsOn").iter().map(Value::as_str);
        let names = cleanse_name_array(raw, self.config.name_policy)?;
        Ok(format_name_list(&names, &self.config.list_separator))
    }
}

/// One element per array entry, or a single `None` when the array is empty
fn explode_outer(items: &[Value]) -> impl Iterator<Item = Option<&Value>> {
    let placeholder = items.is_empty().then_some(None);
    items.iter().map(Some).chain(placeholder)
}

fn activity_shape(activity: &Value) -> ActivityShape {
    ActivityShape {
        name: lookup_str(activity, "name"),
        activity_type: lookup_str(activity, "type"),
        stored_procedure_name: lookup_str(activity, "typeProperties.storedProcedureName"),
        script_path: lookup_str(activity, "typeProperties.scriptPath"),
        linked_service_name: lookup_str(activity, "linkedServiceName.referenceName"),
    }
}

/// Emit the rows for one activity: one per dependency edge (at least one),
/// then one per included sub-activity. Included rows repeat the first
/// dependency so they sort directly after their parent row.
fn explode_activity(pipeline_name: Option<&str>, activity: &Value, rows: &mut Vec<ActivityRow>) {
    let shape = activity_shape(activity);
    let base = ActivityRow {
        pipeline_name: pipeline_name.map(str::to_string),
        activity_name: shape.name,
        description: lookup_str(activity, "description"),
        activity_type: shape.activity_type,
        stored_procedure_name: shape.stored_procedure_name,
        script_path: shape.script_path,
        linked_service_name: shape.linked_service_name,
        ..Default::default()
    };

    let first = rows.len();
    for dependency in explode_outer(lookup_array(activity, "dependsOn")) {
        let mut row = base.clone();
        if let Some(dependency) = dependency {
            row.dependent_on_activity = lookup_str(dependency, "activity");
            row.dependency_condition = lookup_array(dependency, "dependencyConditions")
                .first()
                .and_then(as_cell);
        }
        rows.push(row);
    }

    let anchor = rows[first].clone();
    for included in lookup_array(activity, "typeProperties.activities") {
        rows.push(anchor.clone().with_included(activity_shape(included)));
    }
}

fn sort_inventory(inventory: &mut Inventory) {
    // All sorts are stable; linked services keep template order
    inventory
        .pipelines
        .sort_by(|a, b| (&a.folder, &a.pipeline_name).cmp(&(&b.folder, &b.pipeline_name)));
    inventory.activities.sort_by(|a, b| {
        (&a.pipeline_name, &a.activity_name, &a.dependent_on_activity).cmp(&(
            &b.pipeline_name,
            &b.activity_name,
            &b.dependent_on_activity,
        ))
    });
    inventory
        .datasets
        .sort_by(|a, b| (&a.folder, &a.dataset_name).cmp(&(&b.folder, &b.dataset_name)));
    inventory.triggers.sort_by(|a, b| a.trigger_name.cmp(&b.trigger_name));
}
