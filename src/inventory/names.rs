//! ARM name-expression cleansing
//!
//! Data Factory exports encode resource names as template expressions, e.g.
//! `[concat(parameters('factoryName'), '/IngestSales')]`, and references
//! between resources as `[concat(variables('factoryId'), '/pipelines/X')]`.
//! Everything that knows about that encoding lives in this module.

use crate::error::{InventoryError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static RESIDUAL_EXPRESSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:concat|variables|parameters)\(|[\[\]']").unwrap()
});

/// Substrings removed from each dependency reference, in order
const DEPENDENCY_NOISE: [&str; 3] = ["concat(variables('factoryId')", "[,", ")]"];

/// What to do with a name that is not an ARM name expression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Keep the raw string unmodified and log a warning
    #[default]
    PassThrough,
    /// Abort the run
    Strict,
}

/// Reduce a resource `name` expression to the bare resource name.
///
/// `concat(variables('factoryId'),'/X')]` becomes `X`. `None` stays `None`.
pub fn clean_resource_name(raw: Option<&str>, policy: NamePolicy) -> Result<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let Some((_, tail)) = raw.split_once(',') else {
        return not_an_expression(raw, policy).map(Some);
    };

    let name = tail
        .replace(")]", "")
        .replace('\'', "")
        .trim()
        .trim_start_matches('/')
        .to_string();

    check_residual(name, policy).map(Some)
}

/// Cleanse a `dependsOn` array. Null entries are dropped, order is kept.
pub fn cleanse_name_array<'a, I>(raw: I, policy: NamePolicy) -> Result<Vec<String>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut cleansed = Vec::new();

    for name in raw.into_iter().flatten() {
        if !name.contains(',') {
            cleansed.push(not_an_expression(name, policy)?);
            continue;
        }

        let mut stripped = name.to_string();
        for noise in DEPENDENCY_NOISE {
            stripped = stripped.replace(noise, "");
        }
        let stripped = stripped.trim().trim_matches('\'').trim().to_string();

        cleansed.push(check_residual(stripped, policy)?);
    }

    Ok(cleansed)
}

/// Render a name list the way the inventory has always shown it: `[a, b]`
pub fn format_name_list(names: &[String], separator: &str) -> String {
    format!("[{}]", names.join(separator))
}

/// True when a cleansed name still contains ARM expression syntax
pub fn has_residual_expression(name: &str) -> bool {
    RESIDUAL_EXPRESSION_REGEX.is_match(name)
}

fn not_an_expression(raw: &str, policy: NamePolicy) -> Result<String> {
    match policy {
        NamePolicy::PassThrough => {
            tracing::warn!(raw, "name is not an ARM expression, keeping it as-is");
            Ok(raw.to_string())
        }
        NamePolicy::Strict => Err(InventoryError::MalformedName {
            raw: raw.to_string(),
        }),
    }
}

fn check_residual(name: String, policy: NamePolicy) -> Result<String> {
    if !has_residual_expression(&name) {
        return Ok(name);
    }

    match policy {
        NamePolicy::PassThrough => {
            tracing::warn!(name = %name, "cleansed name still carries expression syntax");
            Ok(name)
        }
        NamePolicy::Strict => Err(InventoryError::ResidualExpression { name }),
    }
}
