//! Option lists for select filters.
//!
//! Fixed option lists are filtered locally. Remote option sources are
//! searched through the same [`PageGateway`] the table uses, sending the typed
//! text as the `search` parameter.

use serde_json::Value;

use super::filter::{FilterDefinition, FilterKind, OptionSource, SelectOption};
use crate::api::{ApiError, PageGateway, QueryParams};

/// Maximum number of remote options requested per lookup.
pub const REMOTE_OPTION_LIMIT: u32 = 50;

/// Options of `definition` matching `term`.
///
/// Matching is a case-insensitive substring test on the label for fixed
/// lists and is left to the backend for remote sources. Date filters have no
/// options.
///
/// # Errors
///
/// Returns the gateway error when a remote lookup fails.
pub async fn search_options(
    gateway: &dyn PageGateway,
    definition: &FilterDefinition,
    term: &str,
) -> Result<Vec<SelectOption>, ApiError> {
    let needle = term.trim();
    match &definition.kind {
        FilterKind::Date => Ok(Vec::new()),
        FilterKind::Select(OptionSource::Static(options)) => {
            let lowered = needle.to_lowercase();
            Ok(options
                .iter()
                .filter(|option| option.label.to_lowercase().contains(&lowered))
                .cloned()
                .collect())
        }
        FilterKind::Select(OptionSource::Remote {
            endpoint,
            value_field,
            label_field,
        }) => {
            let mut params = QueryParams::new();
            params.push("page", "1");
            params.push("page_size", REMOTE_OPTION_LIMIT.to_string());
            if !needle.is_empty() {
                params.push("search", needle);
            }

            let envelope = gateway.fetch_page(endpoint, &params).await?;
            tracing::debug!(
                endpoint = endpoint.as_str(),
                matches = envelope.results.len(),
                "loaded filter options"
            );
            Ok(envelope
                .results
                .iter()
                .filter_map(|row| option_from_row(row, value_field, label_field))
                .collect())
        }
    }
}

fn option_from_row(row: &Value, value_field: &str, label_field: &str) -> Option<SelectOption> {
    let value = scalar_text(row.get(value_field)?)?;
    let label = row
        .get(label_field)
        .and_then(scalar_text)
        .unwrap_or_else(|| value.clone());
    Some(SelectOption::new(value, label))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
