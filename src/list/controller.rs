//! One list view, wired end to end.
//!
//! Filter state and debounced search feed the resource query; query results
//! feed the table; the row menu and confirmation dialog feed the action
//! mutation, whose invalidations feed back into the query as a refetch.
//!
//! The controller never performs I/O on its own. Methods that change the
//! read return a [`FetchTicket`]; the caller executes it (see
//! [`crate::query::load_page`]) and hands the result back to
//! [`ListController::apply`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use catalog_schema::Page;

use crate::api::CatalogClient;
use crate::error::{CatalogError, Result};
use crate::mutation::{ActionMutation, MutationOutcome, MutationSpec, Navigation, Notification};
use crate::query::{FetchTicket, ListInputs, QueryCache, QueryState, ResourceQuery};
use crate::resources::{MenuItem, Resource};

use super::debounce::Debounced;
use super::dialog::{DialogState, RowMenu};
use super::filter_state::{FilterKey, FilterState};
use super::pagination::{ChangeReason, PaginationModel};
use super::table::{ResourceTable, TableEvent};

/// What happened after a confirmed action finished.
#[derive(Debug, Default)]
pub struct ConfirmResult {
    pub notification: Option<Notification>,
    pub navigate_to: Option<Navigation>,
    /// Re-read of the list, issued when the action invalidated it
    pub refetch: Option<FetchTicket>,
    pub succeeded: bool,
}

/// What choosing a row menu entry leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Navigate(Navigation),
    /// A confirmation dialog was opened
    Confirm,
    /// The entry did not apply (unknown row, dialog already open)
    Ignored,
}

pub struct ListController<R: Resource> {
    filters: FilterState,
    search: Debounced<String>,
    /// Search text the current read was built from
    applied_search: String,
    query: ResourceQuery<Page<R::Record>>,
    table: ResourceTable<R::Record>,
    dialog: DialogState<R::Action>,
    menu: RowMenu,
    mutation: ActionMutation,
}

impl<R: Resource> ListController<R> {
    pub fn new(filters: FilterState, page_size: u32, debounce: Duration) -> Self {
        let applied_search = filters.get(FilterKey::Q).to_string();
        Self {
            filters,
            search: Debounced::new(debounce),
            applied_search,
            query: ResourceQuery::new(),
            table: ResourceTable::new(R::columns(), PaginationModel::new(0, page_size)),
            dialog: DialogState::default(),
            menu: RowMenu::default(),
            mutation: ActionMutation::new(),
        }
    }

    /// Start on `page` (zero-based) instead of the first page.
    pub fn with_page(mut self, page: u32) -> Self {
        let model = PaginationModel::new(page, self.table.pagination().page_size);
        self.table.reset_pagination(model);
        self
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn table(&self) -> &ResourceTable<R::Record> {
        &self.table
    }

    pub fn state(&self) -> &QueryState<Page<R::Record>> {
        self.query.state()
    }

    pub fn dialog(&self) -> &DialogState<R::Action> {
        &self.dialog
    }

    pub fn menu(&self) -> &RowMenu {
        &self.menu
    }

    pub fn is_mutating(&self) -> bool {
        self.mutation.is_in_flight()
    }

    /// The view's mutation runner, for callers that run specs from
    /// [`Self::begin_confirm`] on another task.
    pub fn mutation(&self) -> ActionMutation {
        self.mutation.clone()
    }

    /// Text currently in the search box, which may not be applied yet.
    pub fn search_text(&self) -> &str {
        self.filters.get(FilterKey::Q)
    }

    /// Inputs the current read is built from.
    pub fn inputs(&self) -> ListInputs {
        let mut inputs = ListInputs::new(R::PATH, self.table.pagination())
            .with_search(self.applied_search.clone());
        inputs.filters = self.filters.filters();
        inputs
    }

    /// Issue the first read.
    pub fn start(&mut self) -> Option<FetchTicket> {
        self.sync_query()
    }

    /// Record a keystroke in the search box. The read follows once the text
    /// has been stable for the debounce delay (see [`Self::tick`]).
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.filters.set(FilterKey::Q, text.clone());
        self.search.input(text, now);
    }

    /// Advance the debounce clock.
    pub fn tick(&mut self, now: Instant) -> Option<FetchTicket> {
        let text = self.search.poll(now)?;
        self.apply_search(text)
    }

    /// Apply pending search text immediately.
    pub fn flush_search(&mut self) -> Option<FetchTicket> {
        let text = self.search.flush()?;
        self.apply_search(text)
    }

    /// When the pending search text becomes due.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    fn apply_search(&mut self, text: String) -> Option<FetchTicket> {
        if text.trim() == self.applied_search.trim() {
            self.applied_search = text;
            return None;
        }
        self.applied_search = text;
        self.reset_page();
        self.sync_query()
    }

    /// Set or clear one filter. The list goes back to its first page.
    pub fn set_filter(&mut self, key: FilterKey, value: &str) -> Option<FetchTicket> {
        if key == FilterKey::Q {
            self.filters.set(FilterKey::Q, value);
            self.search.flush();
            return self.apply_search(value.to_string());
        }
        if self.filters.get(key) == value {
            return None;
        }
        self.filters.set(key, value);
        self.reset_page();
        self.sync_query()
    }

    /// Step a filter through the resource's options, ending on "any".
    pub fn cycle_filter(&mut self, key: FilterKey) -> Option<FetchTicket> {
        let options = R::filter_options(key);
        let current = self.filters.get(key);
        let next = match options.iter().position(|o| o.value == current) {
            None => options.first().map(|o| o.value).unwrap_or(""),
            Some(i) => options.get(i + 1).map(|o| o.value).unwrap_or(""),
        };
        self.set_filter(key, next)
    }

    pub fn clear_filters(&mut self) -> Option<FetchTicket> {
        let had_search = !self.applied_search.trim().is_empty();
        if self.filters.is_empty() && !had_search {
            return None;
        }
        self.filters = FilterState::new();
        self.search.flush();
        self.applied_search.clear();
        self.reset_page();
        self.sync_query()
    }

    /// Pagination change from the table. Programmatic changes (no reason)
    /// are ignored.
    pub fn change_page(
        &mut self,
        model: PaginationModel,
        reason: Option<ChangeReason>,
    ) -> Option<FetchTicket> {
        match self.table.handle_pagination_change(model, reason)? {
            TableEvent::PaginationChanged(_) => self.sync_query(),
            TableEvent::RowActivated(_) => None,
        }
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let model = self.table.pagination().next(self.table.row_count());
        self.change_page(model, Some(ChangeReason::PageControl))
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        let model = self.table.pagination().previous();
        self.change_page(model, Some(ChangeReason::PageControl))
    }

    pub fn cycle_page_size(&mut self) -> Option<FetchTicket> {
        let model = self.table.pagination().cycle_page_size();
        self.change_page(model, Some(ChangeReason::PageSizeSelect))
    }

    fn reset_page(&mut self) {
        let first = self.table.pagination().first();
        self.table.reset_pagination(first);
    }

    fn sync_query(&mut self) -> Option<FetchTicket> {
        let ticket = self.query.set_inputs(&self.inputs())?;
        self.table.set_rows(Vec::new(), 0);
        self.table.set_loading(true);
        Some(ticket)
    }

    /// Re-read the current page, keeping the rows shown meanwhile.
    pub fn refetch(&mut self) -> Option<FetchTicket> {
        let ticket = self.query.refetch()?;
        self.table.set_loading(true);
        Some(ticket)
    }

    /// Hand back the result of a ticket. Returns `false` if it was stale.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: std::result::Result<Arc<Page<R::Record>>, Arc<CatalogError>>,
    ) -> bool {
        if !self.query.resolve(ticket, result) {
            return false;
        }
        let state = self.query.state();
        let rows = state.rows().to_vec();
        let count = state.count();
        let loading = state.is_loading;
        self.table.set_rows(rows, count);
        self.table.set_loading(loading);
        true
    }

    /// Execute a ticket through the cache and apply its result.
    pub async fn load(
        &mut self,
        client: &CatalogClient,
        cache: &QueryCache,
        ticket: FetchTicket,
    ) -> bool {
        let result = crate::query::load_page::<R::Record>(client, cache, &ticket).await;
        self.apply(&ticket, result)
    }

    /// Sort the rows of the current page. The read is unaffected.
    pub fn sort_by(&mut self, field: &str) -> bool {
        self.table.sort_by(field)
    }

    pub fn toggle_menu(&mut self, row_id: &str) {
        self.menu.toggle(row_id);
    }

    pub fn close_menu(&mut self) {
        self.menu.close();
    }

    /// Menu entries of a row on the current page.
    pub fn menu_items(&self, row_id: &str) -> Vec<MenuItem<R::Action>> {
        self.table.find(row_id).map(R::menu).unwrap_or_default()
    }

    /// Choose a menu entry for `row_id`. Closes the menu.
    pub fn choose(&mut self, row_id: &str, item: MenuItem<R::Action>) -> MenuOutcome {
        self.menu.close();
        match item {
            MenuItem::View => MenuOutcome::Navigate(Navigation::to(R::detail_route(row_id))),
            MenuItem::Action(action) => match self.open_dialog(action, row_id) {
                Ok(()) => MenuOutcome::Confirm,
                Err(_) => MenuOutcome::Ignored,
            },
        }
    }

    /// Ask for confirmation of `action` on `row_id`.
    pub fn open_dialog(&mut self, action: R::Action, row_id: &str) -> Result<()> {
        self.menu.close();
        self.dialog.open(action, row_id)
    }

    pub fn cancel_dialog(&mut self) -> bool {
        self.dialog.cancel()
    }

    /// Text of the open dialog.
    pub fn prompt(&self) -> Option<&'static str> {
        self.dialog.action().map(|action| R::prompt(*action))
    }

    /// Move the dialog to `Confirming` and describe the call to make.
    /// Returns `None` unless a dialog is open and waiting.
    pub fn begin_confirm(&mut self, remark: Option<&str>) -> Option<MutationSpec> {
        let (action, target) = self.dialog.confirm()?;
        debug!(resource = R::NAME, ?action, target = %target, "confirmed");
        Some(R::mutation(action, &target, remark))
    }

    /// Apply the outcome of the call started by [`Self::begin_confirm`].
    pub fn finish_confirm(
        &mut self,
        spec: &MutationSpec,
        outcome: Result<MutationOutcome>,
    ) -> ConfirmResult {
        match outcome {
            Ok(outcome) => {
                self.dialog.resolve(true);
                let touches_list = self
                    .query
                    .key()
                    .is_some_and(|key| spec.invalidates.iter().any(|scope| scope.matches(key)));
                let refetch = if touches_list { self.refetch() } else { None };
                ConfirmResult {
                    notification: Some(outcome.notification),
                    navigate_to: outcome.navigate_to,
                    refetch,
                    succeeded: true,
                }
            }
            Err(err) => {
                self.dialog.resolve(false);
                ConfirmResult {
                    notification: spec.messages.for_error(&err),
                    navigate_to: None,
                    refetch: None,
                    succeeded: false,
                }
            }
        }
    }

    /// Confirm the open dialog, run its mutation and apply the outcome.
    pub async fn confirm(
        &mut self,
        client: &CatalogClient,
        cache: &QueryCache,
        remark: Option<&str>,
    ) -> Option<ConfirmResult> {
        let spec = self.begin_confirm(remark)?;
        let mutation = self.mutation.clone();
        let outcome = mutation.run(client, cache, &spec).await;
        Some(self.finish_confirm(&spec, outcome))
    }

    /// Stop applying results; used when the view goes away.
    pub fn unmount(&mut self) {
        self.query.unmount();
        self.table.set_loading(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiRequest, CatalogBackend};
    use crate::resources::{OrganizationAction, Organizations};
    use async_trait::async_trait;
    use catalog_schema::Organization;
    use http::StatusCode;
    use parking_lot::Mutex;
    use serde_json::json;

    const DELAY: Duration = Duration::from_millis(500);

    fn controller() -> ListController<Organizations> {
        ListController::new(FilterState::new(), 10, DELAY)
    }

    fn org(id: &str) -> Organization {
        serde_json::from_value(json!({
            "id": id, "name": id, "status": "pending", "is_verified": true
        }))
        .unwrap()
    }

    fn page(ids: &[&str], count: u64) -> Arc<Page<Organization>> {
        Arc::new(Page {
            count,
            results: ids.iter().map(|id| org(id)).collect(),
        })
    }

    #[test]
    fn test_first_read_key() {
        let mut list = controller();
        let ticket = list.start().unwrap();
        assert_eq!(ticket.key.to_string(), "/organisations/?limit=10&offset=0");
        assert!(list.table().is_loading());
    }

    #[test]
    fn test_starting_page() {
        let mut list = controller().with_page(2);
        let ticket = list.start().unwrap();
        assert_eq!(ticket.key.param("offset"), Some("20"));
    }

    #[test]
    fn test_filter_change_resets_to_first_page() {
        let mut list = controller();
        let first = list.start().unwrap();
        list.apply(&first, Ok(page(&["a"], 45)));
        let second = list.next_page().unwrap();
        assert_eq!(second.key.param("offset"), Some("10"));

        let filtered = list.set_filter(FilterKey::Status, "pending").unwrap();
        assert_eq!(
            filtered.key.to_string(),
            "/organisations/?status=pending&limit=10&offset=0"
        );
        assert_eq!(list.table().pagination().page, 0);
        assert!(list.set_filter(FilterKey::Status, "pending").is_none());
    }

    #[test]
    fn test_search_waits_for_debounce() {
        let mut list = controller();
        list.start();
        let t0 = Instant::now();
        list.type_search("a", t0);
        list.type_search("ac", t0 + Duration::from_millis(100));
        list.type_search("acme", t0 + Duration::from_millis(200));
        assert_eq!(list.search_text(), "acme");
        assert!(list.tick(t0 + Duration::from_millis(600)).is_none());

        let ticket = list.tick(t0 + Duration::from_millis(700)).unwrap();
        assert_eq!(ticket.key.param("search"), Some("acme"));
        assert!(list.tick(t0 + Duration::from_millis(2000)).is_none());
    }

    #[test]
    fn test_whitespace_only_search_change_does_not_refetch() {
        let mut list = controller();
        list.start();
        assert!(list.set_filter(FilterKey::Q, "acme").is_some());
        assert!(list.set_filter(FilterKey::Q, "acme ").is_none());
    }

    #[test]
    fn test_stale_page_is_not_shown() {
        let mut list = controller();
        let a = list.start().unwrap();
        let b = list.set_filter(FilterKey::Status, "approved").unwrap();
        assert!(list.apply(&b, Ok(page(&["b1"], 1))));
        assert!(!list.apply(&a, Ok(page(&["a1", "a2"], 2))));
        assert_eq!(list.table().row_id(0), Some("b1"));
        assert_eq!(list.table().row_count(), 1);
    }

    #[test]
    fn test_view_navigates_and_actions_open_dialog() {
        let mut list = controller();
        let t = list.start().unwrap();
        list.apply(&t, Ok(page(&["o1", "o2"], 2)));
        list.toggle_menu("o1");
        assert_eq!(
            list.choose("o1", MenuItem::View),
            MenuOutcome::Navigate(Navigation::to("/admin/organizations/o1"))
        );
        assert_eq!(list.menu().open_row(), None);

        assert_eq!(
            list.choose("o2", MenuItem::Action(OrganizationAction::Delete)),
            MenuOutcome::Confirm
        );
        assert_eq!(
            list.prompt(),
            Some("Are you sure you want to delete this organization?")
        );
        assert_eq!(
            list.choose("o1", MenuItem::Action(OrganizationAction::Block)),
            MenuOutcome::Ignored
        );
    }

    struct Backend {
        fail: Option<StatusCode>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatalogBackend for Backend {
        async fn send(&self, request: ApiRequest) -> Result<serde_json::Value> {
            self.calls.lock().push(request.endpoint());
            if request.method == http::Method::GET {
                return Ok(json!({"count": 1, "results": [
                    {"id": "o1", "name": "Acme", "status": "approved", "is_verified": true}
                ]}));
            }
            match self.fail {
                Some(status) => Err(ApiError::with_status(request.path, status, "nope").into()),
                None => Ok(json!({"message": "organization approved"})),
            }
        }
    }

    #[tokio::test]
    async fn test_confirm_runs_mutation_and_refetches() {
        let backend = Arc::new(Backend {
            fail: None,
            calls: Mutex::new(Vec::new()),
        });
        let client = CatalogClient::from_backend(backend.clone());
        let cache = QueryCache::new();
        let mut list = controller();

        let ticket = list.start().unwrap();
        assert!(list.load(&client, &cache, ticket).await);
        list.open_dialog(OrganizationAction::Approve, "o1").unwrap();

        let result = list.confirm(&client, &cache, None).await.unwrap();
        assert!(result.succeeded);
        assert_eq!(
            result.notification,
            Some(Notification::success("Organization approved"))
        );
        assert!(list.dialog().is_closed());

        let refetch = result.refetch.unwrap();
        assert!(list.load(&client, &cache, refetch).await);
        assert_eq!(
            *backend.calls.lock(),
            vec![
                "/organisations/?limit=10&offset=0".to_string(),
                "/admin/organisations/pk/o1/actions/approved/".to_string(),
                "/organisations/?limit=10&offset=0".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_confirm_reopens_dialog_with_notification() {
        let backend = Arc::new(Backend {
            fail: Some(StatusCode::BAD_REQUEST),
            calls: Mutex::new(Vec::new()),
        });
        let client = CatalogClient::from_backend(backend);
        let cache = QueryCache::new();
        let mut list = controller();
        list.start();
        list.open_dialog(OrganizationAction::Reject, "o1").unwrap();

        let result = list.confirm(&client, &cache, None).await.unwrap();
        assert!(!result.succeeded);
        assert_eq!(
            result.notification,
            Some(Notification::error("Error occurred while changing status"))
        );
        assert!(!list.dialog().is_closed());
        assert!(!list.dialog().is_confirming());
        assert!(list.cancel_dialog());
    }
}
