//! Paginated, filterable list controller.
//!
//! [`DataTable`] turns user intents (search, page, page size, sort, filter
//! edits) into a canonical [`Query`], fetches a page whenever the applied
//! query changes, and publishes a [`TableView`] snapshot for rendering.
//!
//! Handlers update state synchronously and spawn at most one fetch on the
//! Tokio runtime. Every fetch is stamped with a generation number and only the
//! latest generation may update the view, so a slow response to an older
//! query can never overwrite a newer one. Search input is debounced.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::Instant;

use super::error::TableError;
use super::filter::{FilterDefinition, FilterId, FilterValue};
use super::filter_state::{FilterState, FilterValues};
use super::pagination::{clamp_page, entry_range, page_window};
use super::query::{PageSize, Query, Sort, SortMode, SortableField};
use super::sort::{RowFields, sort_rows};
use crate::api::{ApiError, PageEnvelope, PageGateway, QueryParams};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Quiet period before typed search text is sent.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// What happens to the displayed rows when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Keep showing the last successful page.
    #[default]
    Keep,
    /// Empty the table.
    Clear,
}

/// Static description of a list view.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// List endpoint, relative to the API base URL.
    pub endpoint: String,
    /// Declared filters.
    pub filters: Vec<FilterDefinition>,
    /// Columns the user may sort by.
    pub sortable: Vec<SortableField>,
    /// Ordering sent when no server-side sort is active.
    pub default_ordering: Option<String>,
    /// Quiet period for search input.
    pub search_debounce: Duration,
    /// Row handling on fetch failure.
    pub stale_policy: StalePolicy,
    /// Query used at mount.
    pub initial_query: Query,
}

impl TableConfig {
    /// Configuration for `endpoint` with no filters or sortable columns.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            filters: Vec::new(),
            sortable: Vec::new(),
            default_ordering: None,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            stale_policy: StalePolicy::default(),
            initial_query: Query::default(),
        }
    }

    /// Declares the table's filters.
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<FilterDefinition>) -> Self {
        self.filters = filters;
        self
    }

    /// Declares the sortable columns.
    #[must_use]
    pub fn with_sortable(mut self, sortable: Vec<SortableField>) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets the ordering used when no server-side sort is active.
    #[must_use]
    pub fn with_default_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.default_ordering = Some(ordering.into());
        self
    }

    /// Overrides the search quiet period.
    #[must_use]
    pub const fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    /// Overrides the failure policy.
    #[must_use]
    pub const fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Sets the query used at mount.
    #[must_use]
    pub fn with_initial_query(mut self, query: Query) -> Self {
        self.initial_query = query;
        self
    }

    /// Where `field` is sorted, if it is sortable at all.
    #[must_use]
    pub fn sort_mode(&self, field: &str) -> Option<SortMode> {
        self.sortable
            .iter()
            .find(|sortable| sortable.key == field)
            .map(|sortable| sortable.mode)
    }

    /// The `ordering` parameter for `sort`.
    ///
    /// Client-side sorts fall back to the default ordering because the
    /// backend cannot order by those fields.
    #[must_use]
    pub fn ordering_for(&self, sort: Option<&Sort>) -> Option<String> {
        match sort {
            Some(active) if self.sort_mode(&active.field) == Some(SortMode::Server) => {
                Some(active.ordering())
            }
            _ => self.default_ordering.clone(),
        }
    }

    fn params_for(&self, query: &Query) -> QueryParams {
        query.to_params(&self.filters, self.ordering_for(query.sort.as_ref()).as_deref())
    }
}

/// Snapshot of a table for the rendering layer.
#[derive(Debug, Clone)]
pub struct TableView<T> {
    /// Rows of the last successful fetch, in server order.
    pub data: Vec<T>,
    /// True while the latest fetch is in flight.
    pub loading: bool,
    /// Message for the error banner.
    pub error: Option<String>,
    /// Total matching rows reported by the backend.
    pub total_count: u64,
    /// Total pages reported by the backend, 0 until known.
    pub total_pages: u32,
    /// The applied query.
    pub query: Query,
    /// Search text as typed, possibly not sent yet.
    pub search_input: String,
    /// True while typed search text waits for its quiet period.
    pub search_pending: bool,
    /// Local and applied filter values.
    pub filters: FilterState,
    /// Where the active sort is applied.
    pub sort_mode: Option<SortMode>,
    generation: u64,
}

impl<T> TableView<T> {
    fn new(config: &TableConfig, query: Query, filters: FilterState) -> Self {
        let sort_mode = query
            .sort
            .as_ref()
            .and_then(|sort| config.sort_mode(&sort.field));
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
            total_count: 0,
            total_pages: 0,
            search_input: query.search.clone(),
            search_pending: false,
            query,
            filters,
            sort_mode,
            generation: 0,
        }
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.query.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.query.page_size
    }

    /// Search text last sent.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.query.search
    }

    /// Active sort, if any.
    #[must_use]
    pub const fn sort(&self) -> Option<&Sort> {
        self.query.sort.as_ref()
    }

    /// In-progress filter values.
    #[must_use]
    pub const fn local_values(&self) -> &FilterValues {
        self.filters.local()
    }

    /// Filter values last sent.
    #[must_use]
    pub const fn applied_values(&self) -> &FilterValues {
        self.filters.applied()
    }

    /// True when filter edits await an apply.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        self.filters.has_pending_changes()
    }

    /// Page links for the pager.
    #[must_use]
    pub fn page_links(&self) -> Vec<Option<u32>> {
        page_window(self.total_pages, self.query.page)
    }

    /// First and last row numbers shown, for "showing X to Y of Z".
    #[must_use]
    pub fn entry_range(&self) -> Option<(u64, u64)> {
        entry_range(self.query.page, self.query.page_size, self.total_count)
    }
}

impl<T: RowFields + Clone> TableView<T> {
    /// Rows in display order: client-side sorts are applied to the fetched
    /// page, server-side sorts keep the backend's order.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<T> {
        match (&self.query.sort, self.sort_mode) {
            (Some(sort), Some(SortMode::Client)) => {
                sort_rows(self.data.clone(), &sort.field, sort.direction)
            }
            _ => self.data.clone(),
        }
    }
}

struct FetchRequest {
    generation: u64,
    params: QueryParams,
}

struct Shared<T> {
    config: TableConfig,
    gateway: Arc<dyn PageGateway>,
    telemetry: Arc<dyn TelemetrySink>,
    state: watch::Sender<TableView<T>>,
}

impl<T> Shared<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn begin_fetch(&self) -> FetchRequest {
        let mut request = FetchRequest {
            generation: 0,
            params: QueryParams::new(),
        };
        self.state.send_modify(|view| {
            view.generation = view.generation.wrapping_add(1);
            view.loading = true;
            request.generation = view.generation;
            request.params = self.config.params_for(&view.query);
        });
        request
    }

    fn commit_search(&self) -> FetchRequest {
        self.state.send_modify(|view| {
            view.query.search.clone_from(&view.search_input);
            view.query.page = 1;
            view.search_pending = false;
        });
        self.begin_fetch()
    }

    async fn run_fetch(&self, request: FetchRequest) {
        let endpoint = self.config.endpoint.as_str();
        tracing::debug!(endpoint, generation = request.generation, "fetching table page");

        let started = Instant::now();
        let result = self
            .gateway
            .fetch_page(endpoint, &request.params)
            .await
            .and_then(PageEnvelope::<Value>::decode::<T>);
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.finish(request.generation, result, latency_ms);
    }

    fn finish(&self, generation: u64, result: Result<PageEnvelope<T>, ApiError>, latency_ms: u64) {
        let endpoint = self.config.endpoint.clone();
        let mut event = None;

        self.state.send_if_modified(|view| {
            if view.generation != generation {
                tracing::debug!(
                    endpoint = %endpoint,
                    generation,
                    latest = view.generation,
                    "dropping stale table response"
                );
                event = Some(TelemetryEvent::StaleResponseDropped {
                    endpoint: endpoint.clone(),
                    generation,
                });
                return false;
            }

            view.loading = false;
            match &result {
                Ok(envelope) => {
                    view.data.clone_from(&envelope.results);
                    view.total_count = envelope.count;
                    view.total_pages = envelope.total_pages;
                    view.error = None;
                    event = Some(TelemetryEvent::PageFetched {
                        endpoint: endpoint.clone(),
                        latency_ms,
                        row_count: envelope.results.len(),
                    });
                }
                Err(error) => {
                    tracing::warn!(endpoint = %endpoint, %error, "table fetch failed");
                    view.error = Some(error.user_message().to_owned());
                    if self.config.stale_policy == StalePolicy::Clear {
                        view.data.clear();
                    }
                    event = Some(TelemetryEvent::PageFetchFailed {
                        endpoint: endpoint.clone(),
                        message: error.to_string(),
                    });
                }
            }
            true
        });

        if let Some(recorded) = event {
            self.telemetry.record(recorded);
        }
    }
}

/// Controller for one list view.
///
/// Dropping the controller is the unmount: the pending search timer and any
/// in-flight fetch are aborted, so nothing touches the view afterwards.
pub struct DataTable<T> {
    shared: Arc<Shared<T>>,
    tasks: JoinSet<()>,
    debounce: Option<AbortHandle>,
}

impl<T> DataTable<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Builds the controller and starts the first fetch.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownSortField`] when the initial sort is not
    /// declared and the filter errors of [`FilterState::preset`] for invalid
    /// initial filter values.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn mount(config: TableConfig, gateway: Arc<dyn PageGateway>) -> Result<Self, TableError> {
        Self::mount_with_telemetry(config, gateway, Arc::new(NoopTelemetrySink))
    }

    /// Like [`Self::mount`], recording fetch outcomes to `telemetry`.
    ///
    /// # Errors
    ///
    /// See [`Self::mount`].
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn mount_with_telemetry(
        config: TableConfig,
        gateway: Arc<dyn PageGateway>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self, TableError> {
        let mut query = config.initial_query.clone();
        query.page = query.page.max(1);

        if let Some(sort) = &query.sort
            && config.sort_mode(&sort.field).is_none()
        {
            return Err(TableError::UnknownSortField {
                field: sort.field.clone(),
            });
        }

        let mut filters = FilterState::new(config.filters.clone());
        filters.preset(std::mem::take(&mut query.filters))?;
        query.filters = filters.applied().clone();

        let view = TableView::new(&config, query, filters);
        let (state, _) = watch::channel(view);

        let mut table = Self {
            shared: Arc::new(Shared {
                config,
                gateway,
                telemetry,
                state,
            }),
            tasks: JoinSet::new(),
            debounce: None,
        };
        table.start_fetch();
        Ok(table)
    }

    /// Static configuration of the table.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.shared.config
    }

    /// Current snapshot.
    #[must_use]
    pub fn view(&self) -> TableView<T> {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TableView<T>> {
        self.shared.state.subscribe()
    }

    /// Waits until no search is pending and no fetch is in flight.
    pub async fn settled(&self) -> TableView<T> {
        let mut receiver = self.shared.state.subscribe();
        receiver
            .wait_for(|view| !view.loading && !view.search_pending)
            .await
            .map_or_else(|_| self.view(), |view| view.clone())
    }

    /// Records typed search text and sends it after the quiet period.
    ///
    /// Each call restarts the timer, so a burst of keystrokes produces one
    /// fetch with the final text. The page resets to 1 immediately.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let input = text.into();
        self.shared.state.send_modify(|view| {
            view.search_input = input;
            view.search_pending = true;
            view.query.page = 1;
        });

        if let Some(pending) = self.debounce.take() {
            pending.abort();
        }
        self.reap_finished();

        let shared = Arc::clone(&self.shared);
        let delay = self.shared.config.search_debounce;
        let handle = self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let request = shared.commit_search();
            shared.run_fetch(request).await;
        });
        self.debounce = Some(handle);
    }

    /// Moves to page `page`, clamped to the known page range.
    ///
    /// Does nothing when the clamped page is already current.
    pub fn set_page(&mut self, page: i64) {
        let changed = self.shared.state.send_if_modified(|view| {
            let target = clamp_page(page, view.total_pages);
            if target == view.query.page {
                return false;
            }
            view.query.page = target;
            true
        });
        if changed {
            self.start_fetch();
        }
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.shared.state.send_modify(|view| {
            view.query.page_size = page_size;
            view.query.page = 1;
        });
        self.start_fetch();
    }

    /// Sorts by `field`, flipping the direction when it is already active.
    ///
    /// Server-side columns refetch; client-side columns only reorder the
    /// current page unless the effective `ordering` parameter changes.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownSortField`] for undeclared columns.
    pub fn set_sort_field(&mut self, field: &str) -> Result<(), TableError> {
        let mode = self
            .shared
            .config
            .sort_mode(field)
            .ok_or_else(|| TableError::UnknownSortField {
                field: field.to_owned(),
            })?;

        let config = &self.shared.config;
        let mut ordering_changed = false;
        self.shared.state.send_modify(|view| {
            let before = config.ordering_for(view.query.sort.as_ref());
            let next = match &view.query.sort {
                Some(current) if current.field == field => Sort {
                    field: field.to_owned(),
                    direction: current.direction.toggled(),
                },
                _ => Sort::ascending(field),
            };
            view.query.sort = Some(next);
            view.sort_mode = Some(mode);
            ordering_changed = config.ordering_for(view.query.sort.as_ref()) != before;
        });

        if ordering_changed {
            self.start_fetch();
        }
        Ok(())
    }

    /// Edits a filter locally without fetching.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownFilter`] for undeclared ids and
    /// mismatch errors for values that do not fit the filter.
    pub fn set_filter_local(
        &mut self,
        id: &FilterId,
        value: Option<FilterValue>,
    ) -> Result<(), TableError> {
        let mut outcome = Ok(());
        self.shared.state.send_if_modified(|view| {
            outcome = view.filters.set_local(id, value);
            outcome.is_ok()
        });
        outcome
    }

    /// Sends the locally edited filters and returns to page 1.
    ///
    /// With nothing pending this only returns to page 1. Incomplete date
    /// ranges block the apply: the message is shown in the error banner and
    /// no request is sent.
    ///
    /// # Errors
    ///
    /// Returns the validation error that blocked the apply.
    pub fn apply_filters(&mut self) -> Result<(), TableError> {
        let mut outcome = Ok(());
        let should_fetch = self.shared.state.send_if_modified(|view| {
            match view.filters.apply() {
                Ok(true) => {
                    view.query.filters = view.filters.applied().clone();
                    view.query.page = 1;
                    view.error = None;
                    true
                }
                Ok(false) if view.query.page != 1 => {
                    view.query.page = 1;
                    true
                }
                Ok(false) => false,
                Err(error) => {
                    view.error = Some(error.to_string());
                    outcome = Err(error);
                    true
                }
            }
        });

        if should_fetch && outcome.is_ok() {
            self.start_fetch();
        }
        outcome
    }

    /// Clears one filter, applying immediately.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownFilter`] for undeclared ids.
    pub fn clear_filter(&mut self, id: &FilterId) -> Result<(), TableError> {
        let mut outcome = Ok(());
        self.shared.state.send_if_modified(|view| {
            outcome = view.filters.clear(id);
            if outcome.is_err() {
                return false;
            }
            view.query.filters = view.filters.applied().clone();
            view.query.page = 1;
            true
        });
        outcome?;
        self.start_fetch();
        Ok(())
    }

    /// Clears every filter, applying immediately.
    pub fn clear_all_filters(&mut self) {
        self.shared.state.send_modify(|view| {
            view.filters.clear_all();
            view.query.filters.clear();
            view.query.page = 1;
            view.error = None;
        });
        self.start_fetch();
    }

    /// Fetches the applied query again.
    pub fn refresh(&mut self) {
        self.start_fetch();
    }

    fn start_fetch(&mut self) {
        self.reap_finished();
        let request = self.shared.begin_fetch();
        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(async move { shared.run_fetch(request).await });
    }

    fn reap_finished(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }
}
