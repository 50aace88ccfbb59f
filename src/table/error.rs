//! Errors raised by table state transitions.

use thiserror::Error;

use super::filter::FilterId;
use crate::api::ApiError;

/// Errors surfaced by the table controller and its filter state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    /// The filter id is not part of the table's declared filters.
    #[error("unknown filter: {id}")]
    UnknownFilter {
        /// The undeclared filter id.
        id: FilterId,
    },

    /// A value of the wrong shape was supplied for a filter.
    #[error("filter {id} does not accept this kind of value")]
    FilterKindMismatch {
        /// Filter receiving the value.
        id: FilterId,
    },

    /// The option is not one of the filter's fixed choices.
    #[error("{value} is not a valid choice for {id}")]
    UnknownOption {
        /// Filter receiving the value.
        id: FilterId,
        /// The rejected option value.
        value: String,
    },

    /// A date could not be parsed.
    #[error("{value} is not a valid date for {id} (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Filter receiving the value.
        id: FilterId,
        /// The rejected input.
        value: String,
    },

    /// A date range has only one bound.
    #[error("select both dates for {id} or switch to a single date")]
    IncompleteDateRange {
        /// Filter holding the partial range.
        id: FilterId,
    },

    /// A date range ends before it starts.
    #[error("the start date for {id} is after its end date")]
    InvertedDateRange {
        /// Filter holding the inverted range.
        id: FilterId,
    },

    /// The field is not declared as sortable.
    #[error("column {field} cannot be sorted")]
    UnknownSortField {
        /// The rejected field key.
        field: String,
    },

    /// Loading supporting data from the API failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
