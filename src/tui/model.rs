//! Resource browser model types for testable state management
//!
//! The browser is a reducer: key presses map to [`BrowserAction`]s, actions
//! update a [`BrowserModel`] and may hand back an [`Effect`] for the driver to
//! execute. The component only ever renders a [`BrowserView`] snapshot, so the
//! whole interaction is testable without a terminal.

use std::sync::Arc;
use std::time::Duration;

use iocraft::prelude::{KeyCode, KeyModifiers};
use tokio::time::Instant;

use catalog_schema::Page;

use crate::display::table_footer;
use crate::error::{CatalogError, Result};
use crate::list::controller::{ListController, MenuOutcome};
use crate::list::dialog::DialogControls;
use crate::list::filter_state::{FilterKey, FilterState};
use crate::list::table::{Align, Cell, SortDirection};
use crate::mutation::{ActionMutation, MutationOutcome, MutationSpec, Navigation, Notification};
use crate::query::FetchTicket;
use crate::resources::Resource;
use crate::tui::components::empty_state::EmptyStateKind;
use crate::tui::components::footer::Shortcut;
use crate::tui::components::shortcuts::ShortcutsBuilder;

/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Table,
    Search,
    /// A row's action menu is open
    Menu,
    /// A confirmation dialog is open
    Dialog,
}

/// All possible actions on the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    // Rows
    MoveDown,
    MoveUp,
    GoToTop,
    GoToBottom,

    // Pages
    NextPage,
    PreviousPage,
    CyclePageSize,

    // Search
    FocusSearch,
    SearchInput(char),
    SearchBackspace,
    /// Leave the search box, applying its text right away
    ExitSearch,
    /// Empty the search box and leave it
    ClearSearch,

    // Filters and sorting
    /// Step the n-th filter of the resource to its next value
    CycleFilter(usize),
    ClearFilters,
    CycleSort,

    // Row menu
    OpenMenu,
    MenuDown,
    MenuUp,
    MenuSelect,
    CloseMenu,

    // Dialog
    Confirm,
    Cancel,

    Refresh,
    Quit,
}

/// Work the driver performs on behalf of the model.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Read a page and hand it to [`BrowserModel::apply_fetch`]
    Fetch(FetchTicket),
    /// Read a page past the cache, then [`BrowserModel::apply_fetch`]
    Reload(FetchTicket),
    /// Run a confirmed action and hand it to [`BrowserModel::apply_mutation`]
    Mutate(MutationSpec),
    Quit,
}

/// Convert a key event to a BrowserAction
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    mode: InputMode,
) -> Option<BrowserAction> {
    if modifiers.contains(KeyModifiers::CONTROL)
        && matches!(code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return Some(BrowserAction::Quit);
    }

    match mode {
        InputMode::Search => search_key_to_action(code),
        InputMode::Menu => match code {
            KeyCode::Char('j') | KeyCode::Down => Some(BrowserAction::MenuDown),
            KeyCode::Char('k') | KeyCode::Up => Some(BrowserAction::MenuUp),
            KeyCode::Enter => Some(BrowserAction::MenuSelect),
            KeyCode::Esc | KeyCode::Char('q') => Some(BrowserAction::CloseMenu),
            _ => None,
        },
        InputMode::Dialog => match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(BrowserAction::Confirm)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(BrowserAction::Cancel),
            _ => None,
        },
        InputMode::Table => match code {
            KeyCode::Char('j') | KeyCode::Down => Some(BrowserAction::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(BrowserAction::MoveUp),
            KeyCode::Char('g') | KeyCode::Home => Some(BrowserAction::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(BrowserAction::GoToBottom),

            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                Some(BrowserAction::NextPage)
            }
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
                Some(BrowserAction::PreviousPage)
            }
            KeyCode::Char('z') => Some(BrowserAction::CyclePageSize),

            KeyCode::Char('/') => Some(BrowserAction::FocusSearch),
            KeyCode::Char(c @ '1'..='9') => Some(BrowserAction::CycleFilter(
                c as usize - '1' as usize,
            )),
            KeyCode::Char('c') => Some(BrowserAction::ClearFilters),
            KeyCode::Char('s') => Some(BrowserAction::CycleSort),

            KeyCode::Enter => Some(BrowserAction::OpenMenu),
            KeyCode::Char('r') => Some(BrowserAction::Refresh),
            KeyCode::Char('q') | KeyCode::Esc => Some(BrowserAction::Quit),
            _ => None,
        },
    }
}

fn search_key_to_action(code: KeyCode) -> Option<BrowserAction> {
    match code {
        KeyCode::Esc => Some(BrowserAction::ClearSearch),
        KeyCode::Enter | KeyCode::Tab => Some(BrowserAction::ExitSearch),
        KeyCode::Backspace => Some(BrowserAction::SearchBackspace),
        KeyCode::Char(c) => Some(BrowserAction::SearchInput(c)),
        _ => None,
    }
}

/// State of one browser screen over resource `R`.
pub struct BrowserModel<R: Resource> {
    list: ListController<R>,
    /// Table or Search; menu and dialog modes follow from the list state
    focus: InputMode,
    selected: usize,
    menu_index: usize,
    toast: Option<(Notification, Instant)>,
    navigation: Option<Navigation>,
}

impl<R: Resource> BrowserModel<R> {
    pub fn new(filters: FilterState, page_size: u32, debounce: Duration) -> Self {
        Self {
            list: ListController::new(filters, page_size, debounce),
            focus: InputMode::Table,
            selected: 0,
            menu_index: 0,
            toast: None,
            navigation: None,
        }
    }

    pub fn list(&self) -> &ListController<R> {
        &self.list
    }

    /// Runner shared with the list, so a second confirm is refused while
    /// one is in flight.
    pub fn mutation(&self) -> ActionMutation {
        self.list.mutation()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Last route a View entry or an action asked to open.
    pub fn navigation(&self) -> Option<&Navigation> {
        self.navigation.as_ref()
    }

    pub fn toast(&self) -> Option<&Notification> {
        self.toast.as_ref().map(|(notification, _)| notification)
    }

    pub fn mode(&self) -> InputMode {
        if !self.list.dialog().is_closed() {
            InputMode::Dialog
        } else if self.list.menu().open_row().is_some() {
            InputMode::Menu
        } else {
            self.focus
        }
    }

    pub fn start(&mut self) -> Option<Effect> {
        self.list.start().map(Effect::Fetch)
    }

    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        now: Instant,
    ) -> Option<Effect> {
        let action = key_to_action(code, modifiers, self.mode())?;
        self.dispatch(action, now)
    }

    pub fn dispatch(&mut self, action: BrowserAction, now: Instant) -> Option<Effect> {
        let rows = self.list.table().rows().len();
        match action {
            BrowserAction::MoveDown => {
                if self.selected + 1 < rows {
                    self.selected += 1;
                }
                None
            }
            BrowserAction::MoveUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            BrowserAction::GoToTop => {
                self.selected = 0;
                None
            }
            BrowserAction::GoToBottom => {
                self.selected = rows.saturating_sub(1);
                None
            }

            BrowserAction::NextPage => self.fetch(|list| list.next_page()),
            BrowserAction::PreviousPage => self.fetch(|list| list.previous_page()),
            BrowserAction::CyclePageSize => self.fetch(|list| list.cycle_page_size()),

            BrowserAction::FocusSearch => {
                self.focus = InputMode::Search;
                None
            }
            BrowserAction::SearchInput(c) => {
                let mut text = self.list.search_text().to_string();
                text.push(c);
                self.list.type_search(text, now);
                None
            }
            BrowserAction::SearchBackspace => {
                let mut text = self.list.search_text().to_string();
                text.pop();
                self.list.type_search(text, now);
                None
            }
            BrowserAction::ExitSearch => {
                self.focus = InputMode::Table;
                self.fetch(|list| list.flush_search())
            }
            BrowserAction::ClearSearch => {
                self.focus = InputMode::Table;
                self.fetch(|list| list.set_filter(FilterKey::Q, ""))
            }

            BrowserAction::CycleFilter(index) => {
                let key = *R::FILTERS.get(index)?;
                self.fetch(|list| list.cycle_filter(key))
            }
            BrowserAction::ClearFilters => self.fetch(|list| list.clear_filters()),
            BrowserAction::CycleSort => {
                self.cycle_sort();
                None
            }

            BrowserAction::OpenMenu => {
                let row_id = self.list.table().row_id(self.selected)?.to_string();
                self.list.toggle_menu(&row_id);
                self.menu_index = 0;
                None
            }
            BrowserAction::MenuDown => {
                let len = self.open_menu_len();
                if self.menu_index + 1 < len {
                    self.menu_index += 1;
                }
                None
            }
            BrowserAction::MenuUp => {
                self.menu_index = self.menu_index.saturating_sub(1);
                None
            }
            BrowserAction::MenuSelect => {
                self.select_menu_entry(now);
                None
            }
            BrowserAction::CloseMenu => {
                self.list.close_menu();
                None
            }

            BrowserAction::Confirm => {
                if self.list.is_mutating() {
                    return None;
                }
                self.list.begin_confirm(None).map(Effect::Mutate)
            }
            BrowserAction::Cancel => {
                self.list.cancel_dialog();
                None
            }

            BrowserAction::Refresh => self.list.refetch().map(Effect::Reload),
            BrowserAction::Quit => {
                self.list.unmount();
                Some(Effect::Quit)
            }
        }
    }

    /// Run a read-changing list call; the selection goes back to the top.
    fn fetch(
        &mut self,
        change: impl FnOnce(&mut ListController<R>) -> Option<FetchTicket>,
    ) -> Option<Effect> {
        let ticket = change(&mut self.list)?;
        self.selected = 0;
        Some(Effect::Fetch(ticket))
    }

    /// Ascending, then descending, then the next sortable column.
    fn cycle_sort(&mut self) {
        let sortable: Vec<&'static str> = self
            .list
            .table()
            .columns()
            .iter()
            .filter(|column| column.compare.is_some())
            .map(|column| column.field)
            .collect();
        let Some(first) = sortable.first().copied() else {
            return;
        };
        let field = match self.list.table().sort() {
            None => first,
            Some(sort) if sort.direction == SortDirection::Ascending => sort.field,
            Some(sort) => sortable
                .iter()
                .position(|field| *field == sort.field)
                .and_then(|i| sortable.get(i + 1))
                .copied()
                .unwrap_or(first),
        };
        self.list.sort_by(field);
    }

    fn open_menu_len(&self) -> usize {
        self.list
            .menu()
            .open_row()
            .map(|row_id| self.list.menu_items(row_id).len())
            .unwrap_or(0)
    }

    fn select_menu_entry(&mut self, now: Instant) {
        let Some(row_id) = self.list.menu().open_row().map(str::to_string) else {
            return;
        };
        let Some(item) = self.list.menu_items(&row_id).get(self.menu_index).copied() else {
            return;
        };
        if let MenuOutcome::Navigate(navigation) = self.list.choose(&row_id, item) {
            self.show(Notification::info(format!("Open {}", navigation.route)), now);
            self.navigation = Some(navigation);
        }
    }

    fn show(&mut self, notification: Notification, now: Instant) {
        self.toast = Some((notification, now + TOAST_DURATION));
    }

    /// Advance timers: apply a due search and expire the toast.
    pub fn tick(&mut self, now: Instant) -> Option<Effect> {
        if self.toast.as_ref().is_some_and(|(_, until)| *until <= now) {
            self.toast = None;
        }
        self.fetch(|list| list.tick(now))
    }

    /// Next instant at which [`Self::tick`] has something to do.
    pub fn deadline(&self) -> Option<Instant> {
        let toast = self.toast.as_ref().map(|(_, until)| *until);
        match (self.list.search_deadline(), toast) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Hand back a page read. Stale results are dropped.
    pub fn apply_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: std::result::Result<Arc<Page<R::Record>>, Arc<CatalogError>>,
        now: Instant,
    ) -> bool {
        let error = result.as_ref().err().map(|err| err.to_string());
        if !self.list.apply(ticket, result) {
            return false;
        }
        let rows = self.list.table().rows().len();
        self.selected = self.selected.min(rows.saturating_sub(1));
        if let Some(message) = error {
            self.show(Notification::error(message), now);
        }
        true
    }

    /// Hand back the outcome of an [`Effect::Mutate`].
    pub fn apply_mutation(
        &mut self,
        spec: &MutationSpec,
        outcome: Result<MutationOutcome>,
        now: Instant,
    ) -> Option<Effect> {
        let result = self.list.finish_confirm(spec, outcome);
        // Failures without a mapped message stay silent; the dialog stays open.
        if let Some(notification) = result.notification {
            self.show(notification, now);
        }
        if let Some(navigation) = result.navigate_to {
            self.navigation = Some(navigation);
        }
        result.refetch.map(Effect::Fetch)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> BrowserView {
        let table = self.list.table();
        let mode = self.mode();

        let sort = table.sort();
        let headers = table
            .columns()
            .iter()
            .map(|column| match sort {
                Some(s) if s.field == column.field => {
                    let arrow = match s.direction {
                        SortDirection::Ascending => "▲",
                        SortDirection::Descending => "▼",
                    };
                    format!("{} {arrow}", column.header)
                }
                _ => column.header.to_string(),
            })
            .collect();

        let rows = table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| RowView {
                number: table.row_number(index),
                cells: table.cells(row),
                selected: index == self.selected,
            })
            .collect();

        let filtered = !self.list.filters().is_empty();
        let empty = if !table.rows().is_empty() {
            None
        } else if table.is_loading() {
            Some(EmptyStateKind::Loading)
        } else if filtered {
            Some(EmptyStateKind::NoMatches)
        } else {
            Some(EmptyStateKind::NoData)
        };

        let menu = self.list.menu().open_row().map(|row_id| MenuView {
            row_id: row_id.to_string(),
            items: self
                .list
                .menu_items(row_id)
                .iter()
                .map(|item| item.label())
                .collect(),
            selected: self.menu_index,
        });

        let dialog = self.list.dialog().controls().map(|controls| DialogView {
            prompt: self.list.prompt().unwrap_or_default().to_string(),
            controls,
        });

        BrowserView {
            title: R::TITLE.to_string(),
            mode,
            search: SearchView {
                text: self.list.search_text().to_string(),
                placeholder: R::SEARCH_PLACEHOLDER.to_string(),
                focused: mode == InputMode::Search,
                pending: self.list.search_deadline().is_some(),
            },
            filters: self.filter_chips(),
            headers,
            aligns: table.columns().iter().map(|column| column.align).collect(),
            rows,
            loading: table.is_loading(),
            empty,
            footer_text: table_footer(table),
            menu,
            dialog,
            toast: self.toast().cloned(),
            navigation: self.navigation.as_ref().map(|n| n.route.clone()),
            shortcuts: shortcuts_for(mode, R::FILTERS.len()),
        }
    }

    fn filter_chips(&self) -> Vec<FilterChip> {
        R::FILTERS
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let value = self.list.filters().get(*key);
                let label = R::filter_options(*key)
                    .iter()
                    .find(|option| option.value == value)
                    .map(|option| option.label)
                    .unwrap_or("Any");
                FilterChip {
                    key: index + 1,
                    name: key.label().to_string(),
                    value: label.to_string(),
                    active: !value.is_empty(),
                }
            })
            .collect()
    }
}

fn shortcuts_for(mode: InputMode, filter_count: usize) -> Vec<Shortcut> {
    match mode {
        InputMode::Table => {
            let filters = match filter_count {
                0 => None,
                1 => Some("1".to_string()),
                n => Some(format!("1-{n}")),
            };
            let mut builder = ShortcutsBuilder::new().with_navigation().with_paging();
            if let Some(keys) = &filters {
                builder = builder.add(keys, "Filter").add("c", "Clear");
            }
            builder
                .with_search()
                .add("s", "Sort")
                .add("Enter", "Actions")
                .add("r", "Refresh")
                .with_quit()
                .build()
        }
        InputMode::Search => ShortcutsBuilder::new()
            .add("Enter", "Apply")
            .add("Esc", "Clear & Exit")
            .add("C-q", "Quit")
            .build(),
        InputMode::Menu => ShortcutsBuilder::new()
            .add("j/k", "Navigate")
            .add("Enter", "Select")
            .add("Esc", "Close")
            .build(),
        InputMode::Dialog => ShortcutsBuilder::new()
            .add("y", "Yes")
            .add("n", "No")
            .build(),
    }
}

/// Everything the browser component renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserView {
    pub title: String,
    pub mode: InputMode,
    pub search: SearchView,
    pub filters: Vec<FilterChip>,
    /// Column headers without the row number column
    pub headers: Vec<String>,
    pub aligns: Vec<Align>,
    pub rows: Vec<RowView>,
    pub loading: bool,
    pub empty: Option<EmptyStateKind>,
    pub footer_text: String,
    pub menu: Option<MenuView>,
    pub dialog: Option<DialogView>,
    pub toast: Option<Notification>,
    pub navigation: Option<String>,
    pub shortcuts: Vec<Shortcut>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchView {
    pub text: String,
    pub placeholder: String,
    pub focused: bool,
    /// Typed text not applied to the list yet
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    /// Digit that cycles this filter
    pub key: usize,
    pub name: String,
    pub value: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub number: u64,
    pub cells: Vec<Cell>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub row_id: String,
    pub items: Vec<String>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub prompt: String,
    pub controls: DialogControls,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::resources::{Datasets, Organizations};
    use catalog_schema::{ActionResponse, Organization};
    use http::StatusCode;
    use serde_json::json;

    const DELAY: Duration = Duration::from_millis(500);

    fn model() -> BrowserModel<Organizations> {
        BrowserModel::new(FilterState::new(), 10, DELAY)
    }

    fn org(id: &str, name: &str, active: bool) -> Organization {
        serde_json::from_value(json!({
            "id": id, "name": name, "status": "approved", "is_active": active
        }))
        .unwrap()
    }

    fn loaded(orgs: Vec<Organization>, count: u64) -> (BrowserModel<Organizations>, Instant) {
        let now = Instant::now();
        let mut model = model();
        let Some(Effect::Fetch(ticket)) = model.start() else {
            panic!("expected a first read");
        };
        let page = Arc::new(Page {
            count,
            results: orgs,
        });
        assert!(model.apply_fetch(&ticket, Ok(page), now));
        (model, now)
    }

    fn fetch_key(effect: Option<Effect>) -> String {
        match effect {
            Some(Effect::Fetch(ticket)) => ticket.key.to_string(),
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_key_to_action_by_mode() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            key_to_action(KeyCode::Char('j'), none, InputMode::Table),
            Some(BrowserAction::MoveDown)
        );
        assert_eq!(
            key_to_action(KeyCode::Char('j'), none, InputMode::Search),
            Some(BrowserAction::SearchInput('j'))
        );
        assert_eq!(
            key_to_action(KeyCode::Char('j'), none, InputMode::Menu),
            Some(BrowserAction::MenuDown)
        );
        assert_eq!(key_to_action(KeyCode::Char('j'), none, InputMode::Dialog), None);
        assert_eq!(
            key_to_action(KeyCode::Char('2'), none, InputMode::Table),
            Some(BrowserAction::CycleFilter(1))
        );
        assert_eq!(
            key_to_action(KeyCode::Char('q'), KeyModifiers::CONTROL, InputMode::Search),
            Some(BrowserAction::Quit)
        );
        assert_eq!(
            key_to_action(KeyCode::Esc, none, InputMode::Dialog),
            Some(BrowserAction::Cancel)
        );
    }

    #[test]
    fn test_selection_stays_on_page() {
        let (mut model, now) = loaded(vec![org("a", "A", true), org("b", "B", true)], 2);
        model.dispatch(BrowserAction::MoveDown, now);
        model.dispatch(BrowserAction::MoveDown, now);
        assert_eq!(model.selected(), 1);
        model.dispatch(BrowserAction::GoToTop, now);
        model.dispatch(BrowserAction::MoveUp, now);
        assert_eq!(model.selected(), 0);
        model.dispatch(BrowserAction::GoToBottom, now);
        assert_eq!(model.selected(), 1);
    }

    #[test]
    fn test_paging_issues_reads() {
        let (mut model, now) = loaded(vec![org("a", "A", true)], 25);
        assert_eq!(
            fetch_key(model.dispatch(BrowserAction::NextPage, now)),
            "/organisations/?limit=10&offset=10"
        );
        assert_eq!(
            fetch_key(model.dispatch(BrowserAction::CyclePageSize, now)),
            "/organisations/?limit=100&offset=0"
        );
    }

    #[test]
    fn test_typing_waits_for_debounce() {
        let (mut model, now) = loaded(vec![], 0);
        model.dispatch(BrowserAction::FocusSearch, now);
        assert_eq!(model.mode(), InputMode::Search);
        for c in "acme".chars() {
            assert!(model.dispatch(BrowserAction::SearchInput(c), now).is_none());
        }
        model.dispatch(BrowserAction::SearchBackspace, now);
        assert!(model.view().search.pending);
        assert_eq!(model.deadline(), Some(now + DELAY));
        assert!(model.tick(now + Duration::from_millis(100)).is_none());

        let key = fetch_key(model.tick(now + DELAY));
        assert_eq!(key, "/organisations/?search=acm&limit=10&offset=0");
        assert!(!model.view().search.pending);
    }

    #[test]
    fn test_exit_search_applies_immediately() {
        let (mut model, now) = loaded(vec![], 0);
        model.dispatch(BrowserAction::FocusSearch, now);
        model.dispatch(BrowserAction::SearchInput('x'), now);
        let key = fetch_key(model.dispatch(BrowserAction::ExitSearch, now));
        assert!(key.contains("search=x"));
        assert_eq!(model.mode(), InputMode::Table);
    }

    #[test]
    fn test_filter_chips_cycle() {
        let (mut model, now) = loaded(vec![], 0);
        let key = fetch_key(model.dispatch(BrowserAction::CycleFilter(0), now));
        assert!(key.contains("status=pending"));
        let chips = model.view().filters;
        assert_eq!(chips.len(), 3);
        assert_eq!(chips[0].name, "Status");
        assert_eq!(chips[0].value, "Pending");
        assert!(chips[0].active);
        assert_eq!(chips[1].value, "Any");
        assert!(model.dispatch(BrowserAction::CycleFilter(7), now).is_none());
    }

    #[test]
    fn test_sort_cycles_direction_then_column() {
        let (mut model, now) = loaded(vec![org("a", "b", true), org("b", "a", true)], 2);
        model.dispatch(BrowserAction::CycleSort, now);
        assert_eq!(model.view().headers[0], "NAME ▲");
        assert_eq!(model.list().table().row_id(0), Some("b"));
        model.dispatch(BrowserAction::CycleSort, now);
        assert_eq!(model.view().headers[0], "NAME ▼");
        model.dispatch(BrowserAction::CycleSort, now);
        let headers = model.view().headers;
        assert_eq!(headers[0], "NAME");
        assert_eq!(headers[1], "DATASETS ▲");
    }

    #[test]
    fn test_menu_view_navigates() {
        let (mut model, now) = loaded(vec![org("o1", "Acme", true)], 1);
        model.dispatch(BrowserAction::OpenMenu, now);
        assert_eq!(model.mode(), InputMode::Menu);
        let menu = model.view().menu.unwrap();
        assert_eq!(menu.items, vec!["View", "Block", "Delete"]);

        model.dispatch(BrowserAction::MenuSelect, now);
        assert_eq!(model.mode(), InputMode::Table);
        assert_eq!(
            model.navigation().map(|n| n.route.as_str()),
            Some("/admin/organizations/o1")
        );
    }

    #[test]
    fn test_confirm_flow() {
        let (mut model, now) = loaded(vec![org("o1", "Acme", false)], 1);
        model.dispatch(BrowserAction::OpenMenu, now);
        model.dispatch(BrowserAction::MenuDown, now);
        model.dispatch(BrowserAction::MenuSelect, now);
        assert_eq!(model.mode(), InputMode::Dialog);
        assert_eq!(
            model.view().dialog.unwrap().prompt,
            "Are you sure you want to unblock this organization?"
        );

        let Some(Effect::Mutate(spec)) = model.dispatch(BrowserAction::Confirm, now) else {
            panic!("expected a mutation");
        };
        assert_eq!(spec.request.path, "/admin/organisations/pk/o1/actions/unblock/");
        assert!(model.view().dialog.unwrap().controls.confirm_loading);
        assert!(model.dispatch(BrowserAction::Confirm, now).is_none());
        assert!(model.dispatch(BrowserAction::Cancel, now).is_none());
        assert_eq!(model.mode(), InputMode::Dialog);

        let outcome = MutationOutcome {
            response: ActionResponse { message: None },
            notification: Notification::success("Organization unblocked"),
            invalidated: Vec::new(),
            navigate_to: None,
        };
        let refetch = model.apply_mutation(&spec, Ok(outcome), now);
        assert!(matches!(refetch, Some(Effect::Fetch(_))));
        assert_eq!(model.mode(), InputMode::Table);
        assert_eq!(
            model.toast(),
            Some(&Notification::success("Organization unblocked"))
        );
        assert!(model.tick(now + TOAST_DURATION).is_none());
        assert_eq!(model.toast(), None);
    }

    #[test]
    fn test_failed_action_keeps_dialog_with_error_toast() {
        let (mut model, now) = loaded(vec![org("o1", "Acme", true)], 1);
        model.dispatch(BrowserAction::OpenMenu, now);
        model.dispatch(BrowserAction::MenuDown, now);
        model.dispatch(BrowserAction::MenuSelect, now);
        let Some(Effect::Mutate(spec)) = model.dispatch(BrowserAction::Confirm, now) else {
            panic!("expected a mutation");
        };
        let err = ApiError::with_status(spec.request.path.clone(), StatusCode::NOT_FOUND, "gone");
        assert!(model.apply_mutation(&spec, Err(err.into()), now).is_none());
        assert_eq!(model.mode(), InputMode::Dialog);
        assert_eq!(
            model.toast(),
            Some(&Notification::error("Organization not found"))
        );
        model.dispatch(BrowserAction::Cancel, now);
        assert_eq!(model.mode(), InputMode::Table);
    }

    #[test]
    fn test_unmapped_action_failure_is_silent() {
        let (mut model, now) = loaded(vec![org("o1", "Acme", true)], 1);
        model.dispatch(BrowserAction::OpenMenu, now);
        model.dispatch(BrowserAction::MenuDown, now);
        model.dispatch(BrowserAction::MenuSelect, now);
        let Some(Effect::Mutate(spec)) = model.dispatch(BrowserAction::Confirm, now) else {
            panic!("expected a mutation");
        };
        let err = ApiError::with_status(
            spec.request.path.clone(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom",
        );
        assert!(model.apply_mutation(&spec, Err(err.into()), now).is_none());
        assert_eq!(model.toast(), None);
        assert_eq!(model.mode(), InputMode::Dialog);
        assert!(!model.view().dialog.unwrap().controls.confirm_loading);
    }

    #[test]
    fn test_refresh_reads_past_the_cache() {
        let (mut model, now) = loaded(vec![org("o1", "Acme", true)], 1);
        let Some(Effect::Reload(ticket)) = model.dispatch(BrowserAction::Refresh, now) else {
            panic!("expected a reload");
        };
        assert_eq!(ticket.key.to_string(), "/organisations/?limit=10&offset=0");
        assert!(model.view().loading);

        let page = Arc::new(Page {
            count: 2,
            results: vec![org("o1", "Acme", true), org("o2", "Beta", true)],
        });
        assert!(model.apply_fetch(&ticket, Ok(page), now));
        assert_eq!(model.view().rows.len(), 2);
    }

    #[test]
    fn test_fetch_error_shows_toast_and_empty_state() {
        let now = Instant::now();
        let mut model: BrowserModel<Datasets> = BrowserModel::new(FilterState::new(), 10, DELAY);
        let Some(Effect::Fetch(ticket)) = model.start() else {
            panic!("expected a first read");
        };
        assert_eq!(model.view().empty, Some(EmptyStateKind::Loading));
        let err = Arc::new(CatalogError::from(ApiError::with_status(
            "/datasets/",
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom",
        )));
        assert!(model.apply_fetch(&ticket, Err(err), now));
        let view = model.view();
        assert_eq!(view.empty, Some(EmptyStateKind::NoData));
        assert_eq!(
            view.toast.map(|t| t.level),
            Some(crate::mutation::NotificationLevel::Error)
        );
    }

    #[test]
    fn test_empty_with_filters_is_no_matches() {
        let (mut model, now) = loaded(vec![], 0);
        let Some(Effect::Fetch(ticket)) = model.dispatch(BrowserAction::CycleFilter(1), now)
        else {
            panic!("expected a fetch");
        };
        model.apply_fetch(&ticket, Ok(Arc::new(Page::empty())), now);
        assert_eq!(model.view().empty, Some(EmptyStateKind::NoMatches));
    }

    #[test]
    fn test_view_rows_are_numbered_across_pages() {
        let (mut model, now) = loaded(vec![org("a", "A", true)], 25);
        let Some(Effect::Fetch(ticket)) = model.dispatch(BrowserAction::NextPage, now) else {
            panic!("expected a fetch");
        };
        let page = Arc::new(Page {
            count: 25,
            results: vec![org("k", "K", true), org("l", "L", true)],
        });
        model.apply_fetch(&ticket, Ok(page), now);
        let view = model.view();
        assert_eq!(view.rows[0].number, 11);
        assert!(view.rows[0].selected);
        assert_eq!(view.rows[1].number, 12);
        assert_eq!(view.footer_text, "Showing 11-12 of 25 · page 2/3 · page size 10");
    }

    #[test]
    fn test_quit_unmounts() {
        let (mut model, now) = loaded(vec![], 0);
        assert!(matches!(
            model.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, now),
            Some(Effect::Quit)
        ));
    }
}
