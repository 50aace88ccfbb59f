//! Paginated response envelope returned by list endpoints.

use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// One page of results as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    /// Total number of matching records across all pages.
    pub count: u64,
    /// Records on this page.
    pub results: Vec<T>,
    /// Number of pages for the requested page size.
    pub total_pages: u32,
    /// Page number the backend served (1-based).
    pub current_page: u32,
}

impl PageEnvelope<serde_json::Value> {
    /// Decodes every row into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] naming the first row that does not match.
    pub fn decode<T>(self) -> Result<PageEnvelope<T>, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let results = self
            .results
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(row).map_err(|error| ApiError::Decode {
                    message: format!("row {index}: {error}"),
                })
            })
            .collect::<Result<Vec<T>, ApiError>>()?;

        Ok(PageEnvelope {
            count: self.count,
            results,
            total_pages: self.total_pages,
            current_page: self.current_page,
        })
    }
}
