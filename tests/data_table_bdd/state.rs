//! Scenario state for data table BDD tests.

use std::future::Future;
use std::rc::Rc;

use alarmdesk::{DataTable, Property, TableError};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Runtime that outlives individual steps, so the controller's fetch tasks
/// keep running between them.
#[derive(Clone)]
pub(crate) struct ScenarioRuntime(Rc<Runtime>);

impl ScenarioRuntime {
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// State shared across steps in a data table scenario.
#[derive(ScenarioState, Default)]
pub(crate) struct TableState {
    /// Runtime driving the controller's fetch tasks.
    pub(crate) runtime: Slot<ScenarioRuntime>,
    /// Stand-in for the REST backend.
    pub(crate) server: Slot<MockServer>,
    /// The controller under test.
    pub(crate) table: Slot<DataTable<Property>>,
    /// Error returned by the last handler call.
    pub(crate) handler_error: Slot<TableError>,
}

/// Generated property rows `first..=last`.
pub(crate) fn property_rows(first: u64, last: u64) -> Vec<Value> {
    (first..=last)
        .map(|id| {
            json!({
                "id": id,
                "address": format!("{id} Harbour St"),
                "agency": {"id": 1, "name": "Acme Realty"},
                "tenants": [],
                "next_service_date": "2024-06-01",
            })
        })
        .collect()
}

impl TableState {
    /// Starts the runtime and the mock backend unless a previous step did.
    pub(crate) fn start_backend(&self) -> Result<ScenarioRuntime, String> {
        let runtime = self.runtime.get().map_or_else(|| self.start_runtime(), Ok)?;
        if self.server.with_ref(|_| ()).is_none() {
            self.server.set(runtime.block_on(MockServer::start()));
        }
        Ok(runtime)
    }

    /// The runtime started by [`Self::start_backend`].
    pub(crate) fn runtime(&self) -> Result<ScenarioRuntime, String> {
        self.runtime
            .get()
            .ok_or_else(|| "runtime not initialised".to_owned())
    }

    fn start_runtime(&self) -> Result<ScenarioRuntime, String> {
        let runtime = Runtime::new().map_err(|error| format!("tokio runtime: {error}"))?;
        let shared = ScenarioRuntime(Rc::new(runtime));
        self.runtime.set(shared.clone());
        Ok(shared)
    }

    /// Runs `action` against the mounted table inside the scenario runtime.
    pub(crate) fn with_table<R>(
        &self,
        action: impl FnOnce(&ScenarioRuntime, &mut DataTable<Property>) -> R,
    ) -> Result<R, String> {
        let runtime = self.runtime()?;
        let mut table = self
            .table
            .take()
            .ok_or_else(|| "table not mounted".to_owned())?;
        let outcome = action(&runtime, &mut table);
        self.table.set(table);
        Ok(outcome)
    }
}
