use std::fmt;
use std::str::FromStr;

use catalog_schema::User;

use crate::api::{ApiRequest, endpoints};
use crate::display::{long_date_or_missing, or_missing};
use crate::error::CatalogError;
use crate::list::filter_state::FilterKey;
use crate::list::table::{Align, Cell, CellStyle, Column, Row};
use crate::mutation::{MutationMessages, MutationSpec};
use crate::query::KeyScope;

use super::{
    BOOLEAN_OPTIONS, FilterOption, MenuItem, Resource, RowAction, remark_body, unknown_action,
};

impl Row for User {
    fn row_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    Block,
    Unblock,
    Delete,
}

impl RowAction for UserAction {
    fn wire_name(&self) -> &'static str {
        match self {
            UserAction::Block => "block",
            UserAction::Unblock => "unblock",
            UserAction::Delete => "delete",
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, UserAction::Delete)
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserAction::Block => "Block",
            UserAction::Unblock => "Unblock",
            UserAction::Delete => "Delete",
        })
    }
}

impl FromStr for UserAction {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(UserAction::Block),
            "unblock" => Ok(UserAction::Unblock),
            "delete" => Ok(UserAction::Delete),
            other => Err(unknown_action("user", other, &["block", "unblock", "delete"])),
        }
    }
}

pub struct Users;

impl Resource for Users {
    type Record = User;
    type Action = UserAction;

    const NAME: &'static str = "users";
    const TITLE: &'static str = "Users";
    const PATH: &'static str = endpoints::ADMIN_USERS;
    const DETAIL_ROUTE: &'static str = "/users";
    const SEARCH_PLACEHOLDER: &'static str = "Search for name or email...";
    const FILTERS: &'static [FilterKey] = &[FilterKey::Active];

    fn columns() -> Vec<Column<User>> {
        vec![
            Column::new("first_name", "FIRST NAME", |u: &User| {
                Cell::plain(or_missing(u.first_name.as_deref()))
            })
            .align(Align::Center),
            Column::new("last_name", "LAST NAME", |u: &User| {
                Cell::plain(or_missing(u.last_name.as_deref()))
            })
            .align(Align::Center),
            Column::new("email", "EMAIL", |u: &User| Cell::plain(u.email.clone()))
                .sortable(|a, b| a.email.cmp(&b.email)),
            Column::new("role", "ROLE", |u: &User| {
                Cell::styled(u.role.to_string(), CellStyle::Muted)
            })
            .align(Align::Center),
            Column::new("date_joined", "DATE JOINED", |u: &User| {
                Cell::plain(long_date_or_missing(u.date_joined))
            })
            .sortable(|a, b| a.date_joined.cmp(&b.date_joined))
            .align(Align::Center),
            Column::new("is_active", "ACTIVE", |u: &User| Cell::flag(u.is_active))
                .align(Align::Center),
        ]
    }

    fn filter_options(key: FilterKey) -> &'static [FilterOption] {
        match key {
            FilterKey::Active => BOOLEAN_OPTIONS,
            _ => &[],
        }
    }

    fn menu(user: &User) -> Vec<MenuItem<UserAction>> {
        let toggle = if user.is_active {
            UserAction::Block
        } else {
            UserAction::Unblock
        };
        vec![MenuItem::Action(toggle), MenuItem::Action(UserAction::Delete)]
    }

    fn prompt(action: UserAction) -> &'static str {
        match action {
            UserAction::Block => "Are you sure you want to block this user?",
            UserAction::Unblock => "Are you sure you want to unblock this user?",
            UserAction::Delete => "Are you sure you want to delete this user?",
        }
    }

    fn mutation(action: UserAction, target: &str, remark: Option<&str>) -> MutationSpec {
        let mut request = ApiRequest::post(endpoints::user_action(target, action.wire_name()));
        if let Some(body) = remark_body(remark) {
            request = request.json(body);
        }
        let success = match action {
            UserAction::Block => "User blocked",
            UserAction::Unblock => "User unblocked",
            UserAction::Delete => "User deleted",
        };
        MutationSpec::new(
            request,
            MutationMessages::new(success)
                .on_validation("Error occurred while updating user")
                .on_not_found("User not found"),
        )
        .invalidating([KeyScope::prefix(endpoints::ADMIN_USERS)])
    }
}
