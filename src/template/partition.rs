//! Split the `resources` array by Data Factory resource type

use serde_json::Value;
use std::collections::BTreeMap;

/// Resource types that feed an inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Pipeline,
    LinkedService,
    Dataset,
    Trigger,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Pipeline,
        ResourceKind::LinkedService,
        ResourceKind::Dataset,
        ResourceKind::Trigger,
    ];

    /// The exact `type` string in the template
    pub fn type_name(self) -> &'static str {
        match self {
            ResourceKind::Pipeline => "Microsoft.DataFactory/factories/pipelines",
            ResourceKind::LinkedService => "Microsoft.DataFactory/factories/linkedServices",
            ResourceKind::Dataset => "Microsoft.DataFactory/factories/datasets",
            ResourceKind::Trigger => "Microsoft.DataFactory/factories/triggers",
        }
    }

    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == type_name)
    }
}

/// Resources grouped by kind, borrowed from the parsed template
#[derive(Debug, Default)]
pub struct Partitioned<'a> {
    pub pipelines: Vec<&'a Value>,
    pub linked_services: Vec<&'a Value>,
    pub datasets: Vec<&'a Value>,
    pub triggers: Vec<&'a Value>,

    /// Resources with a missing or unrecognized `type`
    pub ignored: usize,
}

impl<'a> Partitioned<'a> {
    pub fn from_resources(resources: &'a [Value]) -> Self {
        let mut partitioned = Partitioned::default();

        for resource in resources {
            let type_name = resource.get("type").and_then(Value::as_str);
            let kind = type_name.and_then(ResourceKind::from_type_name);

            match kind {
                Some(ResourceKind::Pipeline) => partitioned.pipelines.push(resource),
                Some(ResourceKind::LinkedService) => partitioned.linked_services.push(resource),
                Some(ResourceKind::Dataset) => partitioned.datasets.push(resource),
                Some(ResourceKind::Trigger) => partitioned.triggers.push(resource),
                None => {
                    tracing::debug!(
                        resource_type = type_name.unwrap_or("<none>"),
                        "skipping resource outside the inventory"
                    );
                    partitioned.ignored += 1;
                }
            }
        }

        partitioned
    }
}

/// Distinct resource types with their occurrence counts
pub fn type_census(resources: &[Value]) -> BTreeMap<String, usize> {
    let mut census = BTreeMap::new();
    for resource in resources {
        let type_name = resource
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("<none>")
            .to_string();
        *census.entry(type_name).or_insert(0) += 1;
    }
    census
}
