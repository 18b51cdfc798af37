//! The administered resources.
//!
//! Each resource ties a list endpoint to its filters, columns, row menu,
//! confirmation prompts and mutations. The list controller, the CLI and the
//! TUI are generic over [`Resource`].

pub mod datasets;
pub mod organizations;
pub mod requests;
pub mod users;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CatalogError;
use crate::list::filter_state::FilterKey;
use crate::list::table::Column;
use crate::list::table::Row;
use crate::mutation::MutationSpec;

pub use datasets::{DatasetAction, Datasets};
pub use organizations::{OrganizationAction, Organizations, StatusSelector};
pub use requests::RequestAction;
pub use users::{UserAction, Users};

/// One entry of a row's action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem<A> {
    /// Open the record's detail view
    View,
    /// Run an action after confirmation
    Action(A),
}

impl<A: fmt::Display> MenuItem<A> {
    pub fn label(&self) -> String {
        match self {
            MenuItem::View => "View".to_string(),
            MenuItem::Action(action) => action.to_string(),
        }
    }
}

/// A selectable value of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const BOOLEAN_OPTIONS: &[FilterOption] = &[
    FilterOption {
        value: "true",
        label: "True",
    },
    FilterOption {
        value: "false",
        label: "False",
    },
];

/// Actions a user can confirm on a row.
///
/// `Display` gives the menu label, `FromStr` accepts the wire name.
pub trait RowAction:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = CatalogError> + Send + Sync + 'static
{
    /// Path segment sent to the backend
    fn wire_name(&self) -> &'static str;

    /// Whether the action removes the record
    fn is_destructive(&self) -> bool;
}

/// A paginated, filterable, server-driven resource list.
pub trait Resource: Send + Sync + 'static {
    type Record: Row + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    type Action: RowAction;

    /// Name used on the command line
    const NAME: &'static str;
    /// Heading of the list view
    const TITLE: &'static str;
    /// List endpoint
    const PATH: &'static str;
    /// Route of the detail view, joined with the row id
    const DETAIL_ROUTE: &'static str;
    const SEARCH_PLACEHOLDER: &'static str;
    /// Filters the view offers, besides free-text search
    const FILTERS: &'static [FilterKey];

    fn columns() -> Vec<Column<Self::Record>>;

    /// Values offered for one filter.
    fn filter_options(key: FilterKey) -> &'static [FilterOption];

    /// Menu entries for one row.
    fn menu(record: &Self::Record) -> Vec<MenuItem<Self::Action>>;

    /// Question shown in the confirmation dialog.
    fn prompt(action: Self::Action) -> &'static str;

    /// The backend call behind `action` on the row `target`.
    fn mutation(action: Self::Action, target: &str, remark: Option<&str>) -> MutationSpec;

    fn detail_route(target: &str) -> String {
        format!("{}/{}", Self::DETAIL_ROUTE, target)
    }
}

/// Request body for a row action: `{remark}` when one is given.
pub(crate) fn remark_body(remark: Option<&str>) -> Option<serde_json::Value> {
    remark
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| serde_json::json!({ "remark": r }))
}

/// Parse error for an unknown action name.
pub(crate) fn unknown_action(resource: &str, value: &str, expected: &[&str]) -> CatalogError {
    CatalogError::InvalidArgument {
        key: "action".to_string(),
        message: format!(
            "unknown {resource} action '{value}', expected one of: {}",
            expected.join(", ")
        ),
    }
}
