//! The query that drives list fetches.
//!
//! A [`Query`] holds everything that determines what a fetch returns: page,
//! page size, search text, sort and the applied filter values. It knows how to
//! serialise itself into the backend's query-string parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::filter::FilterDefinition;
use super::filter_state::FilterValues;
use crate::api::QueryParams;

/// Allowed page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// 10 rows per page.
    #[default]
    Ten,
    /// 25 rows per page.
    TwentyFive,
    /// 50 rows per page.
    Fifty,
    /// 100 rows per page.
    OneHundred,
    /// 200 rows per page.
    TwoHundred,
}

impl PageSize {
    /// Every selectable size, smallest first.
    pub const ALL: [Self; 5] = [
        Self::Ten,
        Self::TwentyFive,
        Self::Fifty,
        Self::OneHundred,
        Self::TwoHundred,
    ];

    /// Rows per page.
    #[must_use]
    pub const fn get(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::OneHundred => 100,
            Self::TwoHundred => 200,
        }
    }

    /// Maps a row count back onto a page size.
    #[must_use]
    pub fn from_rows(rows: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == rows)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.get())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// An explicit sort on one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    /// Field key as understood by the backend or by [`super::sort::RowFields`].
    pub field: String,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending sort on `field`.
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Parses the `ordering` notation: `field` or `-field`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (direction, field) = match trimmed.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, trimmed),
        };
        (!field.is_empty()).then(|| Self {
            field: field.to_owned(),
            direction,
        })
    }

    /// Renders the `ordering` parameter value.
    #[must_use]
    pub fn ordering(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.field.clone(),
            SortDirection::Desc => format!("-{}", self.field),
        }
    }
}

/// Where a sortable column is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Sent as the `ordering` parameter; the backend's order is trusted.
    #[default]
    Server,
    /// Applied to the fetched page with [`super::sort::sort_rows`].
    Client,
}

/// A column the user may sort by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortableField {
    /// Field key.
    pub key: String,
    /// Where sorting happens.
    pub mode: SortMode,
}

impl SortableField {
    /// Column sorted by the backend.
    #[must_use]
    pub fn server(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mode: SortMode::Server,
        }
    }

    /// Column sorted within the fetched page.
    #[must_use]
    pub fn client(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mode: SortMode::Client,
        }
    }
}

/// The full set of parameters that determines a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: PageSize,
    /// Effective (debounced) search text.
    pub search: String,
    /// Explicit sort, `None` for the default ordering.
    pub sort: Option<Sort>,
    /// Applied filter values.
    pub filters: FilterValues,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
            search: String::new(),
            sort: None,
            filters: FilterValues::new(),
        }
    }
}

impl Query {
    /// Serialises the query into request parameters.
    ///
    /// `ordering` is passed in by the caller because only it knows whether
    /// the active sort is server-side. Filters are emitted in declaration
    /// order; blank search text is omitted.
    #[must_use]
    pub fn to_params(&self, definitions: &[FilterDefinition], ordering: Option<&str>) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("page", self.page.to_string());
        params.push("page_size", self.page_size.get().to_string());

        let search = self.search.trim();
        if !search.is_empty() {
            params.push("search", search);
        }
        if let Some(ordering_value) = ordering {
            params.push("ordering", ordering_value);
        }

        for definition in definitions {
            if let Some(value) = self.filters.get(&definition.id) {
                definition.write_params(value, &mut params);
            }
        }
        params
    }
}
