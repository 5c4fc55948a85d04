//! One search session: the state behind a search screen and the fetches it drives.
//!
//! Every mutating action ends the same way: recompile the query, then
//! [`SearchSession::refresh`], which serves the current page from the result
//! cache or asks the transport for it. Responses are matched to the request
//! that produced them. A response for a request that is no longer current is
//! never shown; it only fills the cache when that key has no entry yet.

use common::{
    criteria::AppliedFilter,
    field_registry::FieldRegistry,
    filter_form::FilterForm,
    page_state::{NavigationState, PageState},
    search_query::{CompiledQuery, SearchQuery, SearchRequest},
    search_result::{FacetGroup, SearchResponse},
    session_snapshot::SessionSnapshot,
};
use indexmap::IndexMap;
use tracing::{debug, error, info, warn};

use crate::{
    api::search::SearchTransport,
    clock::{Clock, SystemClock},
    config::SearchConfig,
    pagination::PaginationController,
    result_cache::{ResultCache, key_digest},
};

type CompiledQueryObserver = Box<dyn FnMut(&CompiledQuery)>;

/// Identifies the request a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub request: SearchRequest,
}

pub struct SearchSession<T: SearchTransport, C: Clock = SystemClock> {
    transport: T,
    clock: C,
    registry: FieldRegistry,
    form: FilterForm,
    query: SearchQuery,
    compiled: CompiledQuery,
    cache: ResultCache<SearchResponse>,
    pagination: PaginationController,
    last_response: SearchResponse,
    observers: Vec<CompiledQueryObserver>,
}

impl<T: SearchTransport, C: Clock> SearchSession<T, C> {
    pub fn new(transport: T, clock: C, config: &SearchConfig) -> Self {
        Self::with_registry(transport, clock, config, FieldRegistry::default())
    }

    pub fn with_registry(transport: T, clock: C, config: &SearchConfig, registry: FieldRegistry) -> Self {
        let query = SearchQuery::default();
        Self {
            transport,
            clock,
            form: FilterForm::from_registry(&registry),
            registry,
            compiled: query.compile(),
            query,
            cache: ResultCache::new(config.cache_ttl()),
            pagination: PaginationController::new(config.page_size),
            last_response: SearchResponse::empty(),
            observers: Vec::new(),
        }
    }

    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    /// The filter modal's inputs. Nothing is applied until [`Self::apply_filters`].
    pub fn form_mut(&mut self) -> &mut FilterForm {
        &mut self.form
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn cache(&self) -> &ResultCache<SearchResponse> {
        &self.cache
    }

    pub fn free_text(&self) -> &str {
        &self.query.query_string
    }

    pub fn applied_filters(&self) -> &[AppliedFilter] {
        self.query.filters.as_slice()
    }

    pub fn facet_selection(&self) -> IndexMap<String, Vec<String>> {
        self.query.facet_filters.to_map()
    }

    pub fn is_facet_active(&self, field: &str, value: &str) -> bool {
        self.query.facet_filters.is_active(field, value)
    }

    pub fn page_state(&self) -> PageState {
        *self.pagination.state()
    }

    pub fn navigation(&self) -> NavigationState {
        self.pagination.navigation()
    }

    pub fn compiled_query(&self) -> &CompiledQuery {
        &self.compiled
    }

    pub fn last_response(&self) -> &SearchResponse {
        &self.last_response
    }

    pub fn facet_groups(&self) -> Vec<FacetGroup> {
        FacetGroup::from_facet_counts(&self.registry, &self.last_response.facet_counts)
    }

    /// Registers a callback run each time the compiled query text changes.
    pub fn on_compiled_query_changed(&mut self, observer: impl FnMut(&CompiledQuery) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The request the screen should currently be showing.
    pub fn current_key(&self) -> SearchRequest {
        SearchRequest::new(&self.compiled, self.pagination.current_page(), self.pagination.page_size())
    }

    fn recompile(&mut self) {
        let compiled = self.query.compile();
        if compiled == self.compiled {
            return;
        }
        debug!("compiled query: {}", compiled);
        self.compiled = compiled;
        for observer in self.observers.iter_mut() {
            observer(&self.compiled);
        }
    }

    fn show(&mut self, response: SearchResponse) {
        self.pagination.set_total(response.total);
        self.last_response = response;
    }

    async fn requery(&mut self) {
        self.pagination.reset();
        self.recompile();
        self.refresh().await;
    }

    pub async fn submit_free_text(&mut self, text: &str) {
        self.query.query_string = text.trim().to_string();
        self.requery().await;
    }

    /// Replaces the applied filters with whatever the form currently holds.
    pub async fn apply_filters(&mut self) {
        let filters = self.form.collect(&self.registry, self.clock.today());
        info!("applying {} filters", filters.len());
        self.query.filters.replace(filters);
        self.requery().await;
    }

    /// Removes one applied filter by position. Out-of-range indexes change nothing.
    pub async fn remove_filter(&mut self, index: usize) -> Option<AppliedFilter> {
        let removed = self.query.filters.remove_at(index)?;
        self.requery().await;
        Some(removed)
    }

    /// Clears filters, form, facets and cached results, then searches again from page 1.
    pub async fn clear_all_filters(&mut self) {
        self.query.filters.clear();
        self.form.reset();
        self.query.facet_filters.clear();
        self.cache.clear();
        info!("cleared all filters");
        self.requery().await;
    }

    /// Returns whether the value is selected afterwards.
    pub async fn toggle_facet(&mut self, field: &str, value: &str) -> bool {
        let selected = self.query.facet_filters.toggle(field, value);
        self.requery().await;
        selected
    }

    pub async fn clear_facets(&mut self) {
        self.query.facet_filters.clear();
        self.requery().await;
    }

    pub async fn restore_facets(&mut self, selection: IndexMap<String, Vec<String>>) {
        self.query.facet_filters.replace_all(selection);
        self.requery().await;
    }

    pub async fn go_to_page(&mut self, page: u64) -> bool {
        if !self.pagination.go_to(page) {
            debug!("page {page} out of range, ignored");
            return false;
        }
        self.refresh().await;
        true
    }

    pub async fn next_page(&mut self) -> bool {
        let page = self.pagination.current_page().saturating_add(1);
        self.go_to_page(page).await
    }

    pub async fn previous_page(&mut self) -> bool {
        let page = self.pagination.current_page().saturating_sub(1);
        self.go_to_page(page).await
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        let request = self.current_key();
        info!("fetch issued: {} page {}", key_digest(&request), request.page);
        FetchTicket { request }
    }

    /// Takes a finished fetch. Returns whether it was shown; results for a superseded request are not.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, outcome: anyhow::Result<SearchResponse>) -> bool {
        let is_current = ticket.request == self.current_key();
        match outcome {
            Ok(response) => {
                let digest = key_digest(&ticket.request);
                if !is_current {
                    // a fresher entry for the same key keeps its payload and its age
                    if !self.cache.contains_key(&ticket.request) {
                        self.cache.put(ticket.request, response, self.clock.now());
                    }
                    debug!("discarding stale response: {}", digest);
                    return false;
                }
                self.cache.put(ticket.request, response.clone(), self.clock.now());
                info!("fetch complete: {} ({} total)", digest, response.total);
                self.show(response);
                true
            }
            Err(err) => {
                if !is_current {
                    warn!("stale fetch failed: {} {:#}", key_digest(&ticket.request), err);
                    return false;
                }
                error!("search failed: {:#}", err);
                self.show(SearchResponse::empty());
                true
            }
        }
    }

    /// Shows the current page, from the cache when possible. A page past the end of the
    /// results is pulled back to the last page.
    pub async fn refresh(&mut self) {
        self.load_current_page().await;
        if self.pagination.clamp_to_total() {
            debug!("page past the end, moved to {}", self.pagination.current_page());
            if self.last_response.total > 0 {
                self.load_current_page().await;
            }
        }
    }

    async fn load_current_page(&mut self) {
        let key = self.current_key();
        if let Some(response) = self.cache.get(&key, self.clock.now()) {
            self.show(response);
            return;
        }
        let ticket = self.begin_fetch();
        let outcome = self.transport.search(&ticket.request).await;
        self.complete_fetch(ticket, outcome);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            free_text: self.query.query_string.clone(),
            facets: self.facet_selection(),
            page: self.pagination.current_page(),
        }
    }

    fn load_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.query.query_string = snapshot.free_text.trim().to_string();
        self.query.facet_filters.replace_all(snapshot.facets);
        self.pagination.restore_page(snapshot.page);
    }

    /// Rebuilds free text, facets and page from a snapshot. Applied filters are left as they are.
    pub async fn restore(&mut self, snapshot: SessionSnapshot) {
        self.load_snapshot(snapshot);
        self.recompile();
        self.refresh().await;
    }

    /// [`Self::restore`] plus [`Self::apply_filters`], with a single fetch. The snapshot's page is kept.
    pub async fn restore_with_form(&mut self, snapshot: SessionSnapshot) {
        let filters = self.form.collect(&self.registry, self.clock.today());
        self.query.filters.replace(filters);
        self.load_snapshot(snapshot);
        self.recompile();
        self.refresh().await;
    }
}
