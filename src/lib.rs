pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod list;
pub mod mutation;
pub mod paths;
pub mod query;
pub mod resources;
pub mod tui;

pub use api::{ApiError, ApiRequest, CatalogBackend, CatalogClient};
pub use config::Config;
pub use error::{CatalogError, Result};
pub use list::{FilterKey, FilterState, ListController, PaginationModel, ResourceTable};
pub use mutation::{ActionMutation, MutationSpec, Notification, NotificationLevel};
pub use query::{FetchTicket, QueryCache, QueryKey};
pub use resources::{Datasets, Organizations, Resource, Users};
