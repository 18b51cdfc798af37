use std::fmt;
use std::str::FromStr;

use catalog_schema::{Organization, OrganizationStatus};

use crate::api::{ApiRequest, FormField, endpoints};
use crate::error::CatalogError;
use crate::list::filter_state::FilterKey;
use crate::list::pagination::PaginationModel;
use crate::list::table::{Align, Cell, CellStyle, Column, Row};
use crate::mutation::{MutationMessages, MutationSpec};
use crate::query::{KeyScope, ListInputs, QueryKey};

use super::{
    BOOLEAN_OPTIONS, FilterOption, MenuItem, Resource, RowAction, remark_body, unknown_action,
};
use crate::display::{day_or_missing, relative_or_missing};

const STATUS_OPTIONS: &[FilterOption] = &[
    FilterOption {
        value: "pending",
        label: "Pending",
    },
    FilterOption {
        value: "rejected",
        label: "Rejected",
    },
    FilterOption {
        value: "approved",
        label: "Approved",
    },
];

impl Row for Organization {
    fn row_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrganizationAction {
    Approve,
    Reject,
    Block,
    Unblock,
    Delete,
}

impl OrganizationAction {
    pub const ALL: [OrganizationAction; 5] = [
        OrganizationAction::Approve,
        OrganizationAction::Reject,
        OrganizationAction::Block,
        OrganizationAction::Unblock,
        OrganizationAction::Delete,
    ];

    fn success_message(&self) -> &'static str {
        match self {
            OrganizationAction::Approve => "Organization approved",
            OrganizationAction::Reject => "Organization rejected",
            OrganizationAction::Block => "Organization blocked",
            OrganizationAction::Unblock => "Organization unblocked",
            OrganizationAction::Delete => "Organization deleted",
        }
    }
}

impl RowAction for OrganizationAction {
    fn wire_name(&self) -> &'static str {
        match self {
            OrganizationAction::Approve => "approved",
            OrganizationAction::Reject => "rejected",
            OrganizationAction::Block => "block",
            OrganizationAction::Unblock => "unblock",
            OrganizationAction::Delete => "delete",
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, OrganizationAction::Delete)
    }
}

impl fmt::Display for OrganizationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrganizationAction::Approve => "Approve",
            OrganizationAction::Reject => "Reject",
            OrganizationAction::Block => "Block",
            OrganizationAction::Unblock => "Unblock",
            OrganizationAction::Delete => "Delete",
        };
        f.write_str(label)
    }
}

impl FromStr for OrganizationAction {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(OrganizationAction::Approve),
            "reject" | "rejected" => Ok(OrganizationAction::Reject),
            "block" => Ok(OrganizationAction::Block),
            "unblock" => Ok(OrganizationAction::Unblock),
            "delete" => Ok(OrganizationAction::Delete),
            other => Err(unknown_action(
                "organization",
                other,
                &["approve", "reject", "block", "unblock", "delete"],
            )),
        }
    }
}

/// Reads that change when an organization changes.
pub fn organization_scopes() -> [KeyScope; 3] {
    [
        KeyScope::prefix(endpoints::ORGANIZATIONS),
        KeyScope::prefix(endpoints::ADMIN_ORGANIZATIONS),
        KeyScope::prefix(endpoints::USER_ORGANIZATIONS),
    ]
}

pub fn status_style(status: OrganizationStatus) -> CellStyle {
    match status {
        OrganizationStatus::Pending => CellStyle::Warning,
        OrganizationStatus::Approved => CellStyle::Info,
        OrganizationStatus::Rejected => CellStyle::Danger,
    }
}

pub fn status_cell(org: &Organization) -> Cell {
    Cell::styled(org.status.label(), status_style(org.status))
}

/// The per-row status picker.
///
/// Unverified organizations cannot change status; the picker is disabled
/// and carries a tooltip saying why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSelector {
    pub value: OrganizationStatus,
    pub enabled: bool,
    pub tooltip: Option<&'static str>,
}

impl StatusSelector {
    pub const NOT_VERIFIED: &'static str = "Organization not verified";

    /// Statuses offered in the picker. `pending` can be displayed but never
    /// chosen.
    pub const CHOICES: [OrganizationStatus; 2] =
        [OrganizationStatus::Rejected, OrganizationStatus::Approved];

    pub fn for_organization(org: &Organization) -> Self {
        Self {
            value: org.status,
            enabled: org.is_verified,
            tooltip: (!org.is_verified).then_some(Self::NOT_VERIFIED),
        }
    }

    /// Action to confirm when the user picks `chosen`, if any.
    pub fn choose(&self, chosen: OrganizationStatus) -> Option<OrganizationAction> {
        if !self.enabled || chosen == self.value {
            return None;
        }
        match chosen {
            OrganizationStatus::Pending => None,
            OrganizationStatus::Approved => Some(OrganizationAction::Approve),
            OrganizationStatus::Rejected => Some(OrganizationAction::Reject),
        }
    }
}

pub struct Organizations;

impl Resource for Organizations {
    type Record = Organization;
    type Action = OrganizationAction;

    const NAME: &'static str = "orgs";
    const TITLE: &'static str = "Organization";
    const PATH: &'static str = endpoints::ORGANIZATIONS;
    const DETAIL_ROUTE: &'static str = "/admin/organizations";
    const SEARCH_PLACEHOLDER: &'static str = "Search for name...";
    const FILTERS: &'static [FilterKey] =
        &[FilterKey::Status, FilterKey::Verified, FilterKey::Active];

    fn columns() -> Vec<Column<Organization>> {
        vec![
            Column::new("name", "NAME", |o: &Organization| Cell::plain(o.name.clone()))
                .sortable(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            Column::new("data_count", "DATASETS", |o: &Organization| {
                Cell::plain(o.data_count.to_string())
            })
            .sortable(|a, b| a.data_count.cmp(&b.data_count))
            .align(Align::Center),
            Column::new("views_count", "VIEWS", |o: &Organization| {
                Cell::plain(o.views_count.to_string())
            })
            .sortable(|a, b| a.views_count.cmp(&b.views_count))
            .align(Align::Center),
            Column::new("downloads_count", "DOWNLOADS", |o: &Organization| {
                Cell::plain(o.downloads_count.to_string())
            })
            .sortable(|a, b| a.downloads_count.cmp(&b.downloads_count))
            .align(Align::Center),
            Column::new("status", "STATUS", status_cell).align(Align::Center),
            Column::new("created_at", "CREATED AT", |o: &Organization| {
                Cell::plain(day_or_missing(o.created_at))
            })
            .sortable(|a, b| a.created_at.cmp(&b.created_at))
            .align(Align::Center),
            Column::new("updated_at", "UPDATED AT", |o: &Organization| {
                Cell::plain(relative_or_missing(o.updated_at))
            })
            .sortable(|a, b| a.updated_at.cmp(&b.updated_at))
            .align(Align::Center),
            Column::new("is_verified", "VERIFIED", |o: &Organization| {
                Cell::flag(o.is_verified)
            })
            .align(Align::Center),
            Column::new("is_active", "ACTIVE", |o: &Organization| Cell::flag(o.is_active))
                .align(Align::Center),
        ]
    }

    fn filter_options(key: FilterKey) -> &'static [FilterOption] {
        match key {
            FilterKey::Status => STATUS_OPTIONS,
            FilterKey::Verified | FilterKey::Active => BOOLEAN_OPTIONS,
            FilterKey::Q => &[],
        }
    }

    fn menu(org: &Organization) -> Vec<MenuItem<OrganizationAction>> {
        let toggle = if org.is_active {
            OrganizationAction::Block
        } else {
            OrganizationAction::Unblock
        };
        vec![
            MenuItem::View,
            MenuItem::Action(toggle),
            MenuItem::Action(OrganizationAction::Delete),
        ]
    }

    fn prompt(action: OrganizationAction) -> &'static str {
        match action {
            OrganizationAction::Approve => "Are you sure you want to approve this organization?",
            OrganizationAction::Reject => "Are you sure you want to reject this organization?",
            OrganizationAction::Block => "Are you sure you want to block this organization?",
            OrganizationAction::Unblock => "Are you sure you want to unblock this organization?",
            OrganizationAction::Delete => "Are you sure you want to delete this organization?",
        }
    }

    fn mutation(action: OrganizationAction, target: &str, remark: Option<&str>) -> MutationSpec {
        let mut request =
            ApiRequest::post(endpoints::organization_action(target, action.wire_name()));
        if let Some(body) = remark_body(remark) {
            request = request.json(body);
        }
        MutationSpec::new(
            request,
            MutationMessages::new(action.success_message())
                .on_validation("Error occurred while changing status")
                .on_not_found("Organization not found"),
        )
        .invalidating(organization_scopes())
    }
}

/// Fields of the create and edit organization forms.
///
/// `None` fields are left out of the request, so an edit only sends what
/// changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub kind: Option<String>,
    pub linked_in: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
    pub logo: Option<Logo>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Logo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Logo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Logo({}, {} bytes)", self.file_name, self.bytes.len())
    }
}

impl OrganizationForm {
    pub fn fields(&self) -> Vec<FormField> {
        let text = [
            ("name", &self.name),
            ("description", &self.description),
            ("email", &self.email),
            ("type", &self.kind),
            ("linkedIn", &self.linked_in),
            ("twitter", &self.twitter),
            ("website", &self.website),
        ];
        let mut fields: Vec<FormField> = text
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| FormField::text(name, v.clone())))
            .collect();
        if let Some(logo) = &self.logo {
            fields.push(FormField::file(
                "logo",
                logo.file_name.clone(),
                logo.bytes.clone(),
            ));
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

pub fn create(form: &OrganizationForm) -> MutationSpec {
    MutationSpec::new(
        ApiRequest::post(endpoints::ORGANIZATIONS).form(form.fields()),
        MutationMessages::new("Organization successfully created")
            .on_validation("Error occurred while creating organization"),
    )
    .invalidating([
        KeyScope::prefix(endpoints::USER_ORGANIZATIONS),
        KeyScope::prefix(endpoints::ORGANIZATIONS),
        KeyScope::prefix(endpoints::ADMIN_ORGANIZATIONS),
    ])
}

pub fn edit(slug: &str, form: &OrganizationForm) -> MutationSpec {
    MutationSpec::new(
        ApiRequest::patch(endpoints::organization(slug)).form(form.fields()),
        MutationMessages::new("Organization successfully updated")
            .on_validation("Error occurred while updating organization")
            .on_not_found("Organization not found"),
    )
    .invalidating(organization_scopes())
}

pub fn remove_member(org_id: &str, user_id: &str) -> MutationSpec {
    MutationSpec::new(
        ApiRequest::delete(endpoints::organization_member(org_id, user_id)),
        MutationMessages::new("User removed from organization")
            .on_not_found("Organization not found"),
    )
    .invalidating([
        KeyScope::prefix(endpoints::organization_members(org_id)),
        KeyScope::prefix(endpoints::ORGANIZATIONS),
    ])
}

pub fn verify(pin: &str) -> MutationSpec {
    MutationSpec::new(
        ApiRequest::post(endpoints::ORGANIZATION_VERIFICATION)
            .json(serde_json::json!({ "pin": pin.trim() })),
        MutationMessages::new("Organization has been verified").on_validation("Code has expired"),
    )
    .invalidating(organization_scopes())
}

pub fn resend_pin(org_id: &str) -> MutationSpec {
    MutationSpec::new(
        ApiRequest::post(endpoints::resend_pin(org_id)),
        MutationMessages::new("Verification code sent").on_not_found("Organization does not exist"),
    )
}

/// Key of the pending / approved / rejected counts.
pub fn indicators_key() -> QueryKey {
    QueryKey::detail(endpoints::ORGANIZATION_INDICATORS)
}

/// Inputs of one page of an organization's members.
pub fn members_inputs(org_id: &str, pagination: PaginationModel) -> ListInputs {
    ListInputs::new(endpoints::organization_members(org_id), pagination)
}
