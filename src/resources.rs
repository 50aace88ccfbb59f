//! Catalogue of the list views served by the backend.
//!
//! Each [`Resource`] supplies only what differs between views: its endpoint,
//! filter declarations, sortable columns and display columns. Everything
//! else is handled by the shared [`DataTable`](crate::table::DataTable).

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::table::{FilterDefinition, SelectOption, SortableField, TableConfig};

/// A list view of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Rental and private properties.
    Properties,
    /// Smoke-alarm service jobs.
    AlarmJobs,
    /// Beeping-alarm maintenance tickets.
    BeepingAlarms,
    /// Letting agencies.
    Agencies,
}

/// A displayed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Row field, `__`-separated for nested values.
    pub key: &'static str,
    /// Header text.
    pub title: &'static str,
}

impl Column {
    const fn new(key: &'static str, title: &'static str) -> Self {
        Self { key, title }
    }

    /// Display text for this column of `row`; blank when absent.
    #[must_use]
    pub fn cell(&self, row: &Value) -> String {
        let found = self
            .key
            .split("__")
            .try_fold(row, |value, segment| value.get(segment));
        match found {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => if *flag { "yes" } else { "no" }.to_owned(),
            Some(Value::Array(items)) => items.len().to_string(),
            _ => String::new(),
        }
    }
}

const PROPERTY_COLUMNS: &[Column] = &[
    Column::new("id", "ID"),
    Column::new("address", "Address"),
    Column::new("suburb", "Suburb"),
    Column::new("agency__name", "Agency"),
    Column::new("next_service_date", "Next service"),
    Column::new("status", "Status"),
];

const JOB_COLUMNS: &[Column] = &[
    Column::new("id", "ID"),
    Column::new("property_address", "Property"),
    Column::new("technician", "Technician"),
    Column::new("scheduled_date", "Scheduled"),
    Column::new("status", "Status"),
];

const BEEPING_COLUMNS: &[Column] = &[
    Column::new("id", "ID"),
    Column::new("property_address", "Property"),
    Column::new("location", "Location"),
    Column::new("reported_date", "Reported"),
    Column::new("status", "Status"),
];

const AGENCY_COLUMNS: &[Column] = &[
    Column::new("id", "ID"),
    Column::new("name", "Name"),
    Column::new("contact_name", "Contact"),
    Column::new("email", "Email"),
    Column::new("property_count", "Properties"),
];

impl Resource {
    /// Every resource, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Properties,
        Self::AlarmJobs,
        Self::BeepingAlarms,
        Self::Agencies,
    ];

    /// Name accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::AlarmJobs => "jobs",
            Self::BeepingAlarms => "beeping-alarms",
            Self::Agencies => "agencies",
        }
    }

    /// List endpoint, relative to the API base URL.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Properties => "properties/",
            Self::AlarmJobs => "jobs/",
            Self::BeepingAlarms => "beeping-alarms/",
            Self::Agencies => "agencies/",
        }
    }

    /// Declared filters, in display order.
    #[must_use]
    pub fn filters(self) -> Vec<FilterDefinition> {
        match self {
            Self::Properties => vec![
                agency_filter(),
                FilterDefinition::select(
                    "property_type",
                    "Type",
                    vec![
                        SelectOption::new("rental", "Rental"),
                        SelectOption::new("private", "Private"),
                    ],
                ),
                FilterDefinition::select(
                    "status",
                    "Status",
                    vec![
                        SelectOption::new("compliant", "Compliant"),
                        SelectOption::new("due_soon", "Due soon"),
                        SelectOption::new("overdue", "Overdue"),
                    ],
                ),
                FilterDefinition::date("next_service", "Next service")
                    .with_param("next_service_date"),
            ],
            Self::AlarmJobs => vec![
                agency_filter(),
                FilterDefinition::select(
                    "status",
                    "Status",
                    vec![
                        SelectOption::new("scheduled", "Scheduled"),
                        SelectOption::new("completed", "Completed"),
                        SelectOption::new("cancelled", "Cancelled"),
                    ],
                ),
                FilterDefinition::date("scheduled", "Scheduled").with_param("scheduled_date"),
            ],
            Self::BeepingAlarms => vec![
                FilterDefinition::select(
                    "status",
                    "Status",
                    vec![
                        SelectOption::new("open", "Open"),
                        SelectOption::new("in_progress", "In progress"),
                        SelectOption::new("resolved", "Resolved"),
                    ],
                ),
                FilterDefinition::date("reported", "Reported").with_param("reported_date"),
            ],
            Self::Agencies => Vec::new(),
        }
    }

    /// Sortable columns and where they are sorted.
    #[must_use]
    pub fn sortable(self) -> Vec<SortableField> {
        match self {
            Self::Properties => vec![
                SortableField::server("address"),
                SortableField::server("suburb"),
                SortableField::server("next_service_date"),
                SortableField::client("agency__name"),
                SortableField::client("status"),
            ],
            Self::AlarmJobs => vec![
                SortableField::server("scheduled_date"),
                SortableField::server("property_address"),
                SortableField::client("technician"),
                SortableField::client("status"),
            ],
            Self::BeepingAlarms => vec![
                SortableField::server("reported_date"),
                SortableField::client("property_address"),
                SortableField::client("location"),
                SortableField::client("status"),
            ],
            Self::Agencies => vec![
                SortableField::server("name"),
                SortableField::client("property_count"),
            ],
        }
    }

    /// Ordering sent when no server-side sort is active.
    #[must_use]
    pub const fn default_ordering(self) -> &'static str {
        match self {
            Self::Properties => "address",
            Self::AlarmJobs => "-scheduled_date",
            Self::BeepingAlarms => "-reported_date",
            Self::Agencies => "name",
        }
    }

    /// Displayed columns.
    #[must_use]
    pub const fn columns(self) -> &'static [Column] {
        match self {
            Self::Properties => PROPERTY_COLUMNS,
            Self::AlarmJobs => JOB_COLUMNS,
            Self::BeepingAlarms => BEEPING_COLUMNS,
            Self::Agencies => AGENCY_COLUMNS,
        }
    }

    /// Table configuration for this resource with default initial values.
    #[must_use]
    pub fn table_config(self) -> TableConfig {
        TableConfig::new(self.endpoint())
            .with_filters(self.filters())
            .with_sortable(self.sortable())
            .with_default_ordering(self.default_ordering())
    }
}

fn agency_filter() -> FilterDefinition {
    FilterDefinition::remote_select("agency", "Agency", "agencies/", "id", "name")
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unrecognised resource names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource {0} (expected properties, jobs, beeping-alarms or agencies)")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "properties" | "property" => Ok(Self::Properties),
            "jobs" | "alarm-jobs" => Ok(Self::AlarmJobs),
            "beeping-alarms" | "beeping" => Ok(Self::BeepingAlarms),
            "agencies" | "agency" => Ok(Self::Agencies),
            _ => Err(UnknownResource(raw.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{Column, Resource};
    use crate::table::{FilterKind, SortMode};

    #[rstest]
    #[case("properties", Resource::Properties)]
    #[case("Jobs", Resource::AlarmJobs)]
    #[case(" beeping ", Resource::BeepingAlarms)]
    #[case("agency", Resource::Agencies)]
    fn parses_resource_names(#[case] raw: &str, #[case] expected: Resource) {
        assert_eq!(raw.parse::<Resource>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_resources() {
        assert!("tenants".parse::<Resource>().is_err());
    }

    #[rstest]
    fn names_round_trip_through_parse() {
        for resource in Resource::ALL {
            assert_eq!(resource.name().parse::<Resource>(), Ok(resource));
        }
    }

    #[rstest]
    fn every_column_of_a_sortable_field_is_declared() {
        for resource in Resource::ALL {
            let config = resource.table_config();
            assert_eq!(config.endpoint, resource.endpoint());
            assert!(config.default_ordering.is_some());
            for field in &config.sortable {
                assert!(config.sort_mode(&field.key).is_some());
            }
        }
    }

    #[rstest]
    fn property_filters_include_remote_agency_lookup() {
        let filters = Resource::Properties.filters();
        let agency = filters
            .iter()
            .find(|definition| definition.id.as_str() == "agency")
            .expect("properties should filter by agency");
        assert!(matches!(agency.kind, FilterKind::Select(_)));
        assert_eq!(
            Resource::Properties.table_config().sort_mode("agency__name"),
            Some(SortMode::Client)
        );
    }

    #[rstest]
    #[case(Column { key: "agency__name", title: "Agency" }, "Acme")]
    #[case(Column { key: "id", title: "ID" }, "7")]
    #[case(Column { key: "tenants", title: "Tenants" }, "2")]
    #[case(Column { key: "suburb", title: "Suburb" }, "")]
    fn cells_render_nested_values(#[case] column: Column, #[case] expected: &str) {
        let row = json!({
            "id": 7,
            "agency": {"name": "Acme"},
            "tenants": [{"name": "a"}, {"name": "b"}],
            "suburb": null,
        });
        assert_eq!(column.cell(&row), expected);
    }
}
