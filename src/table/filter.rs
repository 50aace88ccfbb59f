//! Filter declarations and values.
//!
//! Each table declares its filters up front as [`FilterDefinition`]s. Values
//! are a tagged union discriminated by kind, so a date range and a selected
//! option can never be confused, and a date filter's mode always agrees with
//! the fields it carries.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::TableError;
use crate::api::QueryParams;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifier of a declared filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilterId(String);

impl FilterId {
    /// Wraps a filter id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for FilterId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A choice in a select filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value sent to the backend.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl SelectOption {
    /// Creates an option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Which branch of a date filter is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateMode {
    /// One exact date.
    Single,
    /// An inclusive from/to range.
    Range,
}

/// The value of a date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSelection {
    /// Exact date, possibly not chosen yet.
    Single(Option<NaiveDate>),
    /// Range bounds, either possibly not chosen yet.
    Range {
        /// Inclusive start.
        from: Option<NaiveDate>,
        /// Inclusive end.
        to: Option<NaiveDate>,
    },
}

impl DateSelection {
    /// Active mode.
    #[must_use]
    pub const fn mode(&self) -> DateMode {
        match self {
            Self::Single(_) => DateMode::Single,
            Self::Range { .. } => DateMode::Range,
        }
    }

    /// Sets the single date, leaving range mode if necessary.
    #[must_use]
    pub const fn with_single(self, date: Option<NaiveDate>) -> Self {
        Self::Single(date)
    }

    /// Sets the range start, leaving single mode if necessary.
    #[must_use]
    pub const fn with_from(self, date: Option<NaiveDate>) -> Self {
        match self {
            Self::Range { to, .. } => Self::Range { from: date, to },
            Self::Single(_) => Self::Range {
                from: date,
                to: None,
            },
        }
    }

    /// Sets the range end, leaving single mode if necessary.
    #[must_use]
    pub const fn with_to(self, date: Option<NaiveDate>) -> Self {
        match self {
            Self::Range { from, .. } => Self::Range { from, to: date },
            Self::Single(_) => Self::Range {
                from: None,
                to: date,
            },
        }
    }

    /// Switches mode, discarding the other branch's dates.
    #[must_use]
    pub const fn switch_mode(self, mode: DateMode) -> Self {
        match (self, mode) {
            (current @ Self::Single(_), DateMode::Single)
            | (current @ Self::Range { .. }, DateMode::Range) => current,
            (_, DateMode::Single) => Self::Single(None),
            (_, DateMode::Range) => Self::Range {
                from: None,
                to: None,
            },
        }
    }

    /// True when no date has been chosen.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(
            self,
            Self::Single(None)
                | Self::Range {
                    from: None,
                    to: None
                }
        )
    }

    fn validate(&self, id: &FilterId) -> Result<(), TableError> {
        match self {
            Self::Single(_) => Ok(()),
            Self::Range {
                from: Some(from),
                to: Some(to),
            } if from > to => Err(TableError::InvertedDateRange { id: id.clone() }),
            Self::Range {
                from: Some(_),
                to: None,
            }
            | Self::Range {
                from: None,
                to: Some(_),
            } => Err(TableError::IncompleteDateRange { id: id.clone() }),
            Self::Range { .. } => Ok(()),
        }
    }
}

/// A filter value, discriminated by filter kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// A chosen option of a select filter.
    Selected(SelectOption),
    /// A date filter value.
    Date(DateSelection),
}

impl FilterValue {
    /// True when the value constrains nothing and should count as cleared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Selected(_) => false,
            Self::Date(selection) => selection.is_empty(),
        }
    }

    /// Short text for chips and summaries.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Selected(option) => option.label.clone(),
            Self::Date(DateSelection::Single(date)) => format_date(*date),
            Self::Date(DateSelection::Range { from, to }) => {
                format!("{} to {}", format_date(*from), format_date(*to))
            }
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "…".to_owned(), |day| day.format(DATE_FORMAT).to_string())
}

/// Where a select filter's options come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// A fixed list.
    Static(Vec<SelectOption>),
    /// Searched on demand from a list endpoint.
    Remote {
        /// List endpoint to search.
        endpoint: String,
        /// Record field used as the option value.
        value_field: String,
        /// Record field used as the option label.
        label_field: String,
    },
}

/// The kind of widget a filter uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    /// Pick one option.
    Select(OptionSource),
    /// Pick a date or a date range.
    Date,
}

/// A filter declared by a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDefinition {
    /// Filter id, unique within the table.
    pub id: FilterId,
    /// Human-readable name.
    pub label: String,
    /// Widget kind.
    pub kind: FilterKind,
    /// Query parameter name; date ranges append `_from`/`_to`.
    pub param: String,
}

impl FilterDefinition {
    /// Select filter with a fixed option list.
    #[must_use]
    pub fn select(id: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self::with_kind(id, label, FilterKind::Select(OptionSource::Static(options)))
    }

    /// Select filter whose options are searched from `endpoint`.
    #[must_use]
    pub fn remote_select(
        id: &str,
        label: &str,
        endpoint: &str,
        value_field: &str,
        label_field: &str,
    ) -> Self {
        Self::with_kind(
            id,
            label,
            FilterKind::Select(OptionSource::Remote {
                endpoint: endpoint.to_owned(),
                value_field: value_field.to_owned(),
                label_field: label_field.to_owned(),
            }),
        )
    }

    /// Date filter supporting single dates and ranges.
    #[must_use]
    pub fn date(id: &str, label: &str) -> Self {
        Self::with_kind(id, label, FilterKind::Date)
    }

    fn with_kind(id: &str, label: &str, kind: FilterKind) -> Self {
        Self {
            id: FilterId::new(id),
            label: label.to_owned(),
            kind,
            param: id.to_owned(),
        }
    }

    /// Overrides the query parameter name.
    #[must_use]
    pub fn with_param(mut self, param: &str) -> Self {
        param.clone_into(&mut self.param);
        self
    }

    /// Checks that `value` fits this filter.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::FilterKindMismatch`] for a value of the wrong
    /// kind and [`TableError::UnknownOption`] for a choice outside a fixed
    /// option list.
    pub fn accepts(&self, value: &FilterValue) -> Result<(), TableError> {
        match (&self.kind, value) {
            (FilterKind::Select(OptionSource::Static(options)), FilterValue::Selected(chosen)) => {
                if options.iter().any(|option| option.value == chosen.value) {
                    Ok(())
                } else {
                    Err(TableError::UnknownOption {
                        id: self.id.clone(),
                        value: chosen.value.clone(),
                    })
                }
            }
            (FilterKind::Select(OptionSource::Remote { .. }), FilterValue::Selected(_))
            | (FilterKind::Date, FilterValue::Date(_)) => Ok(()),
            _ => Err(TableError::FilterKindMismatch {
                id: self.id.clone(),
            }),
        }
    }

    /// Checks that `value` is complete enough to send.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::IncompleteDateRange`] when only one range bound
    /// is set and [`TableError::InvertedDateRange`] when the bounds are
    /// reversed.
    pub fn validate(&self, value: &FilterValue) -> Result<(), TableError> {
        match value {
            FilterValue::Selected(_) => Ok(()),
            FilterValue::Date(selection) => selection.validate(&self.id),
        }
    }

    /// Appends the query parameters for `value`.
    pub fn write_params(&self, value: &FilterValue, params: &mut QueryParams) {
        match value {
            FilterValue::Selected(option) => params.push(self.param.as_str(), option.value.as_str()),
            FilterValue::Date(DateSelection::Single(date)) => {
                if let Some(day) = date {
                    params.push(self.param.as_str(), day.format(DATE_FORMAT).to_string());
                }
            }
            FilterValue::Date(DateSelection::Range { from, to }) => {
                if let Some(day) = from {
                    params.push(
                        format!("{}_from", self.param),
                        day.format(DATE_FORMAT).to_string(),
                    );
                }
                if let Some(day) = to {
                    params.push(
                        format!("{}_to", self.param),
                        day.format(DATE_FORMAT).to_string(),
                    );
                }
            }
        }
    }

    /// Parses textual input for this filter.
    ///
    /// Select filters match a fixed option by value or label (case
    /// insensitive); remote selects take the input as the option value. Date
    /// filters take `YYYY-MM-DD` for a single date and `FROM..TO` for a range,
    /// where either bound may be left blank.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownOption`] or [`TableError::InvalidDate`]
    /// when the input does not fit.
    pub fn parse_value(&self, raw: &str) -> Result<FilterValue, TableError> {
        let input = raw.trim();
        match &self.kind {
            FilterKind::Select(OptionSource::Static(options)) => options
                .iter()
                .find(|option| {
                    option.value.eq_ignore_ascii_case(input)
                        || option.label.eq_ignore_ascii_case(input)
                })
                .cloned()
                .map(FilterValue::Selected)
                .ok_or_else(|| TableError::UnknownOption {
                    id: self.id.clone(),
                    value: input.to_owned(),
                }),
            FilterKind::Select(OptionSource::Remote { .. }) => {
                Ok(FilterValue::Selected(SelectOption::new(input, input)))
            }
            FilterKind::Date => {
                let selection = match input.split_once("..") {
                    Some((from, to)) => DateSelection::Range {
                        from: self.parse_date(from)?,
                        to: self.parse_date(to)?,
                    },
                    None => DateSelection::Single(self.parse_date(input)?),
                };
                Ok(FilterValue::Date(selection))
            }
        }
    }

    fn parse_date(&self, raw: &str) -> Result<Option<NaiveDate>, TableError> {
        let input = raw.trim();
        if input.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map(Some)
            .map_err(|_| TableError::InvalidDate {
                id: self.id.clone(),
                value: input.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::{DateMode, DateSelection, FilterDefinition, FilterValue, SelectOption};
    use crate::api::QueryParams;
    use crate::table::error::TableError;

    fn day(value: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, value)
    }

    #[fixture]
    fn status_filter() -> FilterDefinition {
        FilterDefinition::select(
            "status",
            "Status",
            vec![
                SelectOption::new("scheduled", "Scheduled"),
                SelectOption::new("completed", "Completed"),
            ],
        )
    }

    #[rstest]
    fn single_date_on_range_drops_bounds() {
        let range = DateSelection::Range {
            from: day(1),
            to: day(9),
        };
        let single = range.with_single(day(4));
        assert_eq!(single, DateSelection::Single(day(4)));
        assert_eq!(single.mode(), DateMode::Single);
    }

    #[rstest]
    fn range_bound_on_single_drops_single_date() {
        let single = DateSelection::Single(day(4));
        let range = single.with_from(day(1));
        assert_eq!(
            range,
            DateSelection::Range {
                from: day(1),
                to: None
            }
        );
        assert_eq!(
            DateSelection::Single(day(4)).with_to(day(9)),
            DateSelection::Range {
                from: None,
                to: day(9)
            }
        );
    }

    #[rstest]
    fn switching_mode_clears_other_branch() {
        let range = DateSelection::Range {
            from: day(1),
            to: day(9),
        };
        assert_eq!(
            range.switch_mode(DateMode::Single),
            DateSelection::Single(None)
        );
        assert_eq!(range.switch_mode(DateMode::Range), range);
    }

    #[rstest]
    #[case::only_from(DateSelection::Range { from: day(1), to: None })]
    #[case::only_to(DateSelection::Range { from: None, to: day(2) })]
    fn partial_ranges_fail_validation(#[case] selection: DateSelection) {
        let filter = FilterDefinition::date("scheduled", "Scheduled");
        assert_eq!(
            filter.validate(&FilterValue::Date(selection)),
            Err(TableError::IncompleteDateRange {
                id: "scheduled".into()
            })
        );
    }

    #[rstest]
    fn inverted_ranges_fail_validation() {
        let filter = FilterDefinition::date("scheduled", "Scheduled");
        let value = FilterValue::Date(DateSelection::Range {
            from: day(9),
            to: day(1),
        });
        assert!(matches!(
            filter.validate(&value),
            Err(TableError::InvertedDateRange { .. })
        ));
    }

    #[rstest]
    fn static_select_rejects_unlisted_option(status_filter: FilterDefinition) {
        let value = FilterValue::Selected(SelectOption::new("lost", "Lost"));
        assert!(matches!(
            status_filter.accepts(&value),
            Err(TableError::UnknownOption { .. })
        ));
    }

    #[rstest]
    fn select_rejects_date_values(status_filter: FilterDefinition) {
        let value = FilterValue::Date(DateSelection::Single(day(1)));
        assert!(matches!(
            status_filter.accepts(&value),
            Err(TableError::FilterKindMismatch { .. })
        ));
    }

    #[rstest]
    #[case("completed")]
    #[case("Completed")]
    fn parse_matches_value_or_label(status_filter: FilterDefinition, #[case] raw: &str) {
        assert_eq!(
            status_filter.parse_value(raw),
            Ok(FilterValue::Selected(SelectOption::new(
                "completed",
                "Completed"
            )))
        );
    }

    #[rstest]
    #[case("2024-06-03", DateSelection::Single(day(3)))]
    #[case("2024-06-01..2024-06-09", DateSelection::Range { from: day(1), to: day(9) })]
    #[case("..2024-06-09", DateSelection::Range { from: None, to: day(9) })]
    fn parse_reads_dates_and_ranges(#[case] raw: &str, #[case] expected: DateSelection) {
        let filter = FilterDefinition::date("scheduled", "Scheduled");
        assert_eq!(filter.parse_value(raw), Ok(FilterValue::Date(expected)));
    }

    #[rstest]
    fn parse_rejects_malformed_dates() {
        let filter = FilterDefinition::date("scheduled", "Scheduled");
        assert!(matches!(
            filter.parse_value("03/06/2024"),
            Err(TableError::InvalidDate { .. })
        ));
    }

    #[rstest]
    fn empty_single_date_writes_nothing() {
        let filter = FilterDefinition::date("scheduled", "Scheduled");
        let mut params = QueryParams::new();
        filter.write_params(&FilterValue::Date(DateSelection::Single(None)), &mut params);
        assert!(params.pairs().is_empty());
    }

    #[rstest]
    fn labels_summarise_values() {
        let value = FilterValue::Date(DateSelection::Range {
            from: day(1),
            to: None,
        });
        assert_eq!(value.label(), "2024-06-01 to …");
    }
}
