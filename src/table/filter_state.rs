//! Local and applied filter values.
//!
//! Users edit filters locally and only send them with an explicit apply, so
//! that every widget change does not trigger a request. Clearing is the
//! exception: it updates both sides at once.

use std::collections::BTreeMap;

use super::error::TableError;
use super::filter::{FilterDefinition, FilterId, FilterValue};

/// Values keyed by filter id. An absent id means the filter is cleared.
pub type FilterValues = BTreeMap<FilterId, FilterValue>;

/// Declared filters with their in-progress and applied values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    definitions: Vec<FilterDefinition>,
    local: FilterValues,
    applied: FilterValues,
}

impl FilterState {
    /// Creates a state with every declared filter cleared.
    #[must_use]
    pub const fn new(definitions: Vec<FilterDefinition>) -> Self {
        Self {
            definitions,
            local: FilterValues::new(),
            applied: FilterValues::new(),
        }
    }

    /// Looks up a declared filter.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownFilter`] when `id` was not declared.
    pub fn definition(&self, id: &FilterId) -> Result<&FilterDefinition, TableError> {
        self.definitions
            .iter()
            .find(|definition| &definition.id == id)
            .ok_or_else(|| TableError::UnknownFilter { id: id.clone() })
    }

    /// In-progress values.
    #[must_use]
    pub const fn local(&self) -> &FilterValues {
        &self.local
    }

    /// Values last sent to the backend.
    #[must_use]
    pub const fn applied(&self) -> &FilterValues {
        &self.applied
    }

    /// True when local edits have not been applied yet.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.local != self.applied
    }

    /// Records a local edit; `None` or an empty date clears the local value.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownFilter`] for undeclared ids and the
    /// errors of [`FilterDefinition::accepts`] for ill-fitting values.
    pub fn set_local(&mut self, id: &FilterId, value: Option<FilterValue>) -> Result<(), TableError> {
        let definition = self.definition(id)?;
        match value.filter(|candidate| !candidate.is_empty()) {
            Some(candidate) => {
                definition.accepts(&candidate)?;
                self.local.insert(id.clone(), candidate);
            }
            None => {
                self.local.remove(id);
            }
        }
        Ok(())
    }

    /// Checks every local value is complete enough to send.
    ///
    /// # Errors
    ///
    /// Returns the first validation error in declaration order.
    pub fn validate_local(&self) -> Result<(), TableError> {
        for definition in &self.definitions {
            if let Some(value) = self.local.get(&definition.id) {
                definition.validate(value)?;
            }
        }
        Ok(())
    }

    /// Copies local values to the applied side.
    ///
    /// Returns `false` when nothing was pending.
    ///
    /// # Errors
    ///
    /// Returns the validation error that blocked the apply; the applied side
    /// is left untouched in that case.
    pub fn apply(&mut self) -> Result<bool, TableError> {
        if !self.has_pending_changes() {
            return Ok(false);
        }
        self.validate_local()?;
        self.applied.clone_from(&self.local);
        Ok(true)
    }

    /// Clears one filter on both sides.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownFilter`] for undeclared ids.
    pub fn clear(&mut self, id: &FilterId) -> Result<(), TableError> {
        self.definition(id)?;
        self.local.remove(id);
        self.applied.remove(id);
        Ok(())
    }

    /// Clears every filter on both sides.
    pub fn clear_all(&mut self) {
        self.local.clear();
        self.applied.clear();
    }

    /// Sets initial values on both sides, as when a view mounts with
    /// preselected filters.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Self::set_local`] or
    /// [`Self::validate_local`].
    pub fn preset(&mut self, values: FilterValues) -> Result<(), TableError> {
        for (id, value) in values {
            self.set_local(&id, Some(value))?;
        }
        self.validate_local()?;
        self.applied.clone_from(&self.local);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::{FilterState, FilterValues};
    use crate::table::error::TableError;
    use crate::table::filter::{DateSelection, FilterDefinition, FilterId, FilterValue, SelectOption};

    fn status(value: &str) -> FilterValue {
        FilterValue::Selected(SelectOption::new(value, value))
    }

    #[fixture]
    fn state() -> FilterState {
        FilterState::new(vec![
            FilterDefinition::select(
                "status",
                "Status",
                vec![
                    SelectOption::new("open", "open"),
                    SelectOption::new("resolved", "resolved"),
                ],
            ),
            FilterDefinition::date("reported", "Reported"),
        ])
    }

    #[rstest]
    fn local_edit_marks_pending_until_applied(mut state: FilterState) {
        let id = FilterId::from("status");
        state
            .set_local(&id, Some(status("open")))
            .expect("declared filter should accept option");
        assert!(state.has_pending_changes());
        assert!(state.applied().get(&id).is_none());

        assert_eq!(state.apply(), Ok(true));
        assert!(!state.has_pending_changes());
        assert_eq!(state.applied().get(&id), Some(&status("open")));
    }

    #[rstest]
    fn reselecting_applied_value_is_not_pending(mut state: FilterState) {
        let id = FilterId::from("status");
        state.set_local(&id, Some(status("open"))).expect("set");
        state.apply().expect("apply");

        state.set_local(&id, Some(status("resolved"))).expect("set");
        state.set_local(&id, Some(status("open"))).expect("set");
        assert!(!state.has_pending_changes());
        assert_eq!(state.apply(), Ok(false));
    }

    #[rstest]
    fn undeclared_filters_are_rejected(mut state: FilterState) {
        let error = state
            .set_local(&FilterId::from("colour"), Some(status("red")))
            .expect_err("undeclared id should fail");
        assert_eq!(
            error,
            TableError::UnknownFilter {
                id: "colour".into()
            }
        );
        assert!(state.local().is_empty());
    }

    #[rstest]
    fn clear_updates_both_sides_at_once(mut state: FilterState) {
        let id = FilterId::from("status");
        state.set_local(&id, Some(status("open"))).expect("set");
        state.apply().expect("apply");

        state.clear(&id).expect("clear declared filter");
        assert!(state.local().get(&id).is_none());
        assert!(state.applied().get(&id).is_none());
        assert!(!state.has_pending_changes());
    }

    #[rstest]
    fn incomplete_range_blocks_apply(mut state: FilterState) {
        let id = FilterId::from("reported");
        let partial = FilterValue::Date(DateSelection::Range {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
        });
        state.set_local(&id, Some(partial)).expect("set");

        assert_eq!(
            state.apply(),
            Err(TableError::IncompleteDateRange { id: id.clone() })
        );
        assert!(state.applied().is_empty());
        assert!(state.has_pending_changes());
    }

    #[rstest]
    fn empty_date_counts_as_cleared(mut state: FilterState) {
        let id = FilterId::from("reported");
        state
            .set_local(&id, Some(FilterValue::Date(DateSelection::Single(None))))
            .expect("set");
        assert!(state.local().is_empty());
    }

    #[rstest]
    fn preset_applies_immediately(mut state: FilterState) {
        let mut values = FilterValues::new();
        values.insert("status".into(), status("resolved"));

        state.preset(values).expect("preset should succeed");
        assert!(!state.has_pending_changes());
        assert_eq!(state.applied().len(), 1);
    }
}
