//! Loads one page of a list view as described by the configuration.

use std::sync::Arc;

use alarmdesk::{
    AlarmdeskConfig, DataTable, FilterValues, NoopTelemetrySink, PageGateway, Query, Resource,
    StderrJsonlTelemetrySink, TableError, TableView, TelemetrySink,
};
use serde_json::Value;

/// Builds the query the listing starts from.
///
/// # Errors
///
/// Returns configuration errors for malformed values and filter errors for
/// undeclared ids or values that do not fit their filter.
pub fn initial_query(config: &AlarmdeskConfig, resource: Resource) -> Result<Query, TableError> {
    let definitions = resource.filters();
    let mut filters = FilterValues::new();
    for (id, raw) in config.filter_assignments()? {
        let definition = definitions
            .iter()
            .find(|definition| definition.id.as_str() == id)
            .ok_or_else(|| TableError::UnknownFilter {
                id: id.as_str().into(),
            })?;
        filters.insert(definition.id.clone(), definition.parse_value(&raw)?);
    }

    Ok(Query {
        page: config.page.max(1),
        page_size: config.page_size()?,
        search: config.search.clone().unwrap_or_default(),
        sort: config.sort_request()?,
        filters,
    })
}

/// Mounts the configured list view and waits for its first page.
///
/// # Errors
///
/// Returns the errors of [`initial_query`] and [`DataTable::mount`]. Fetch
/// failures are reported through the returned view.
pub async fn load_page(
    config: &AlarmdeskConfig,
    gateway: Arc<dyn PageGateway>,
) -> Result<(Resource, TableView<Value>), TableError> {
    let resource = config.resource_kind()?;
    let table_config = resource
        .table_config()
        .with_search_debounce(config.search_debounce())
        .with_initial_query(initial_query(config, resource)?);

    let telemetry: Arc<dyn TelemetrySink> = if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    };

    tracing::debug!(%resource, "loading list page");
    let table = DataTable::mount_with_telemetry(table_config, gateway, telemetry)?;
    let view = table.settled().await;
    Ok((resource, view))
}
