//! Fullscreen resource browser
//!
//! The [`ResourceBrowser`] component only renders [`BrowserView`] snapshots
//! and forwards key presses. A driver task owns the [`BrowserModel`], runs
//! its effects (page reads, actions) and sends back a fresh view after every
//! change.

use std::sync::Arc;

use iocraft::prelude::*;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, sleep_until};
use tracing::debug;

use catalog_schema::Page;

use crate::api::CatalogClient;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::list::filter_state::FilterState;
use crate::mutation::{MutationOutcome, MutationSpec};
use crate::query::{FetchTicket, QueryCache, load_page, reload_page};
use crate::resources::Resource;
use crate::tui::components::{
    DataTable, EmptyState, Footer, Header, ModalBorderColor, ModalContainer, ModalOverlay,
    SearchBox, render_toast,
};
use crate::tui::model::{BrowserModel, BrowserView, Effect};
use crate::tui::theme::theme;

/// A key press forwarded from the terminal to the driver
#[derive(Debug, Clone, Copy)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Messages from the driver to the component
#[derive(Debug)]
pub enum BrowserUpdate {
    View(Box<BrowserView>),
    Exit,
}

/// Receiving end of the driver's updates, taken by the component once
pub type UpdateSlot = Arc<Mutex<Option<UnboundedReceiver<BrowserUpdate>>>>;

#[derive(Default, Props)]
pub struct ResourceBrowserProps {
    /// View to show before the driver sends its first update
    pub initial: Option<BrowserView>,
    pub keys: Option<UnboundedSender<KeyPress>>,
    pub updates: Option<UpdateSlot>,
}

#[component]
pub fn ResourceBrowser<'a>(
    props: &ResourceBrowserProps,
    mut hooks: Hooks,
) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let theme = theme();

    let initial = props.initial.clone().unwrap_or_default();
    let mut view: State<BrowserView> = hooks.use_state(move || initial);
    let mut should_exit = hooks.use_state(|| false);

    let updates = props.updates.clone();
    hooks.use_future(async move {
        let Some(mut rx) = updates.and_then(|slot| slot.lock().take()) else {
            return;
        };
        while let Some(update) = rx.recv().await {
            match update {
                BrowserUpdate::View(next) => view.set(*next),
                BrowserUpdate::Exit => break,
            }
        }
        should_exit.set(true);
    });

    let keys = props.keys.clone();
    hooks.use_terminal_events(move |event| {
        if let TerminalEvent::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
            && kind != KeyEventKind::Release
            && let Some(keys) = &keys
        {
            // The driver is gone once the screen is closing.
            let _ = keys.send(KeyPress { code, modifiers });
        }
    });

    if should_exit.get() {
        system.exit();
    }

    let view = view.read().clone();
    let search_query = view.search.text.clone();

    let menu = view.menu.as_ref().map(|menu| {
        element! {
            ModalOverlay {
                ModalContainer(
                    width: 32u32,
                    title: format!("Row {}", menu.row_id),
                    footer_text: "Enter select · Esc close".to_string(),
                ) {
                    #(menu.items.iter().enumerate().map(|(index, item)| {
                        let selected = index == menu.selected;
                        element! {
                            Text(
                                content: format!("{} {}", if selected { ">" } else { " " }, item),
                                color: if selected { theme.highlight } else { theme.text },
                                weight: if selected { Weight::Bold } else { Weight::Normal },
                            )
                        }
                    }))
                }
            }
        }
    });

    let dialog = view.dialog.as_ref().map(|dialog| {
        let controls = dialog.controls;
        let confirm = if controls.confirm_loading {
            "[ Working... ]"
        } else {
            "[ y Confirm ]"
        };
        element! {
            ModalOverlay(backdrop: true) {
                ModalContainer(
                    width: 60u32,
                    border_color: ModalBorderColor::Warning,
                    title: "Confirm".to_string(),
                ) {
                    Text(content: dialog.prompt.clone(), color: theme.text)
                    View(margin_top: 1, flex_direction: FlexDirection::Row, column_gap: 2) {
                        Text(
                            content: confirm,
                            color: if controls.confirm_enabled { theme.warning } else { theme.text_dimmed },
                            weight: Weight::Bold,
                        )
                        Text(
                            content: "[ n Cancel ]",
                            color: if controls.cancel_enabled { theme.text } else { theme.text_dimmed },
                        )
                    }
                }
            }
        }
    });

    element! {
        View(
            width,
            height,
            flex_direction: FlexDirection::Column,
            background_color: theme.background,
        ) {
            Header(
                title: view.title.clone(),
                summary: view.navigation.clone().map(|route| format!("→ {route}")),
                loading: view.loading,
            )

            View(width: 100pct, padding_left: 1, padding_right: 1, flex_shrink: 0.0) {
                SearchBox(search: view.search.clone())
            }

            View(
                width: 100pct,
                height: 1,
                flex_shrink: 0.0,
                flex_direction: FlexDirection::Row,
                padding_left: 2,
                column_gap: 3,
            ) {
                #(view.filters.iter().map(|chip| element! {
                    Text(
                        content: format!("[{}] {}: {}", chip.key, chip.name, chip.value),
                        color: if chip.active { theme.info } else { theme.text_dimmed },
                    )
                }))
            }

            View(flex_grow: 1.0, width: 100pct, padding_left: 1, padding_right: 1) {
                #(Some(match view.empty {
                    Some(kind) => element! {
                        EmptyState(kind, search_query: Some(search_query))
                    }.into_any(),
                    None => element! {
                        DataTable(
                            headers: view.headers.clone(),
                            aligns: view.aligns.clone(),
                            rows: view.rows.clone(),
                            loading: view.loading,
                        )
                    }.into_any(),
                }))
            }

            View(height: 1, flex_shrink: 0.0, padding_left: 2) {
                Text(content: view.footer_text.clone(), color: theme.text_dimmed)
            }

            #(render_toast(&view.toast))

            Footer(shortcuts: view.shortcuts.clone())

            #(menu)
            #(dialog)
        }
    }
}

/// A finished effect, handed back to the model.
enum Completion<T> {
    Fetch(
        FetchTicket,
        std::result::Result<Arc<Page<T>>, Arc<CatalogError>>,
    ),
    Mutation(MutationSpec, Result<MutationOutcome>),
}

/// Run the browser over `R` until the user quits.
pub async fn run_browser<R: Resource>(config: &Config, filters: FilterState) -> Result<()> {
    let client = CatalogClient::from_config(config)?;
    let mut model =
        BrowserModel::<R>::new(filters, config.page_size, config.search_debounce());
    let first = model.start();
    let initial = model.view();

    let (key_tx, key_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let slot: UpdateSlot = Arc::new(Mutex::new(Some(update_rx)));

    debug!(resource = R::NAME, "starting browser");
    let driver = tokio::spawn(drive(model, client, first, key_rx, update_tx));

    let result = element!(ResourceBrowser(
        initial: initial,
        keys: key_tx,
        updates: slot,
    ))
    .fullscreen()
    .await
    .map_err(|e| CatalogError::Other(format!("TUI error: {}", e)));

    driver.abort();
    result
}

async fn drive<R: Resource>(
    mut model: BrowserModel<R>,
    client: CatalogClient,
    first: Option<Effect>,
    mut keys: UnboundedReceiver<KeyPress>,
    updates: UnboundedSender<BrowserUpdate>,
) {
    let cache = QueryCache::new();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion<R::Record>>();
    let mut pending: Vec<Effect> = first.into_iter().collect();

    loop {
        for effect in pending.drain(..) {
            match effect {
                Effect::Fetch(ticket) => {
                    debug!(key = %ticket.key, "fetch");
                    let (client, cache, done) = (client.clone(), cache.clone(), done_tx.clone());
                    tokio::spawn(async move {
                        let result = load_page::<R::Record>(&client, &cache, &ticket).await;
                        let _ = done.send(Completion::Fetch(ticket, result));
                    });
                }
                Effect::Reload(ticket) => {
                    debug!(key = %ticket.key, "reload");
                    let (client, cache, done) = (client.clone(), cache.clone(), done_tx.clone());
                    tokio::spawn(async move {
                        let result = reload_page::<R::Record>(&client, &cache, &ticket).await;
                        let _ = done.send(Completion::Fetch(ticket, result));
                    });
                }
                Effect::Mutate(spec) => {
                    debug!(endpoint = %spec.request.endpoint(), "mutate");
                    let (client, cache, done) = (client.clone(), cache.clone(), done_tx.clone());
                    let mutation = model.mutation();
                    tokio::spawn(async move {
                        let outcome = mutation.run(&client, &cache, &spec).await;
                        let _ = done.send(Completion::Mutation(spec, outcome));
                    });
                }
                Effect::Quit => {
                    let _ = updates.send(BrowserUpdate::Exit);
                    return;
                }
            }
        }

        if updates
            .send(BrowserUpdate::View(Box::new(model.view())))
            .is_err()
        {
            return;
        }

        let deadline = model.deadline();
        let effect = tokio::select! {
            key = keys.recv() => match key {
                Some(key) => model.handle_key(key.code, key.modifiers, Instant::now()),
                None => return,
            },
            Some(done) = done_rx.recv() => match done {
                Completion::Fetch(ticket, result) => {
                    model.apply_fetch(&ticket, result, Instant::now());
                    None
                }
                Completion::Mutation(spec, outcome) => {
                    model.apply_mutation(&spec, outcome, Instant::now())
                }
            },
            _ = wait_until(deadline) => model.tick(Instant::now()),
        };
        pending.extend(effect);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
