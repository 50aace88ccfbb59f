//! Generic paginated, filterable list controller.
//!
//! [`DataTable`] owns the query of one list view and publishes what the
//! rendering layer needs. The submodules hold the pure parts: query
//! serialisation, filter values and their local/applied split, page
//! arithmetic, and client-side sorting.

pub mod controller;
pub mod error;
pub mod filter;
pub mod filter_state;
pub mod options;
pub mod pagination;
pub mod query;
pub mod sort;

pub use controller::{DEFAULT_SEARCH_DEBOUNCE, DataTable, StalePolicy, TableConfig, TableView};
pub use error::TableError;
pub use filter::{
    DateMode, DateSelection, FilterDefinition, FilterId, FilterKind, FilterValue, OptionSource,
    SelectOption,
};
pub use filter_state::{FilterState, FilterValues};
pub use options::search_options;
pub use query::{PageSize, Query, Sort, SortDirection, SortMode, SortableField};
pub use sort::{RowFields, SortKey, sort_rows};
