//! Alarmdesk library crate providing list views over the property and
//! smoke-alarm management API.
//!
//! The library wraps `reqwest` behind a page gateway, drives paginated,
//! searchable and filterable list views through a single generic
//! [`DataTable`] controller, and surfaces friendly errors that can be shown
//! in a banner or on the command line.

pub mod api;
pub mod config;
pub mod resources;
pub mod staged;
pub mod table;
pub mod telemetry;

pub use api::{
    AccessToken, Agency, AgencyRef, AlarmJob, ApiError, BeepingAlarm, HttpPageGateway,
    PageEnvelope, PageGateway, Property, QueryParams, StaticTokenProvider, Tenant, TokenProvider,
};
pub use config::AlarmdeskConfig;
pub use resources::{Column, Resource};
pub use staged::StagedList;
pub use table::{
    DataTable, FilterDefinition, FilterId, FilterValue, FilterValues, PageSize, Query, Sort,
    SortDirection, StalePolicy, TableConfig, TableError, TableView,
};
pub use telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink};
