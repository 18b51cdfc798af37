//! Organization commands beyond listing and row actions.
//!
//! - `orgs create` / `orgs edit`: multipart organization forms
//! - `orgs verify` / `orgs resend-pin`: email verification
//! - `orgs requests` / `orgs request`: join requests
//! - `orgs members` / `orgs remove-user`: membership
//! - `orgs indicators`: counts by status

use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;

use catalog_schema::{OrganizationIndicators, OrganizationRequest, User};

use crate::api::ApiRequest;
use crate::cli::{OrgFormArgs, OutputOptions};
use crate::display::{render_indicators, render_table, table_footer};
use crate::error::{CatalogError, Result};
use crate::list::pagination::PaginationModel;
use crate::list::table::ResourceTable;
use crate::resources::organizations::{self, Logo, OrganizationForm};
use crate::resources::requests::{self, RequestAction};
use crate::resources::{Resource, Users};

use super::interactive::require_confirmation;
use super::{CommandOutput, connect, run_mutation};

impl OrgFormArgs {
    /// Build the form, reading the logo file if one was given.
    async fn into_form(self) -> Result<OrganizationForm> {
        let logo = match self.logo {
            Some(path) => {
                let bytes = tokio::fs::read(&path).await?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "logo".to_string());
                Some(Logo { file_name, bytes })
            }
            None => None,
        };
        Ok(OrganizationForm {
            name: self.name,
            description: self.description,
            email: self.email,
            kind: self.kind,
            linked_in: self.linkedin,
            twitter: self.twitter,
            website: self.website,
            logo,
        })
    }
}

fn missing(key: &str) -> CatalogError {
    CatalogError::InvalidArgument {
        key: key.to_string(),
        message: format!("--{key} is required"),
    }
}

/// Create an organization
pub async fn cmd_org_create(form: OrgFormArgs, output: OutputOptions) -> Result<()> {
    let form = form.into_form().await?;
    if form.name.as_deref().is_none_or(|name| name.trim().is_empty()) {
        return Err(missing("name"));
    }
    if form.email.as_deref().is_none_or(|email| email.trim().is_empty()) {
        return Err(missing("email"));
    }
    let (_, client) = connect()?;
    run_mutation(&client, &organizations::create(&form), output).await?;
    Ok(())
}

/// Update the given fields of an organization
pub async fn cmd_org_edit(slug: &str, form: OrgFormArgs, output: OutputOptions) -> Result<()> {
    let form = form.into_form().await?;
    if form.is_empty() {
        return Err(CatalogError::InvalidArgument {
            key: "form".to_string(),
            message: "nothing to update; pass at least one field".to_string(),
        });
    }
    let (_, client) = connect()?;
    run_mutation(&client, &organizations::edit(slug, &form), output).await?;
    Ok(())
}

pub async fn cmd_org_remove_user(
    org: &str,
    user: &str,
    yes: bool,
    output: OutputOptions,
) -> Result<()> {
    require_confirmation(
        "Are you sure you want to remove this user from the organization?",
        yes,
    )?;
    let (_, client) = connect()?;
    run_mutation(&client, &organizations::remove_member(org, user), output).await?;
    Ok(())
}

pub async fn cmd_org_verify(pin: &str, output: OutputOptions) -> Result<()> {
    if pin.trim().is_empty() {
        return Err(missing("pin"));
    }
    let (_, client) = connect()?;
    run_mutation(&client, &organizations::verify(pin), output).await?;
    Ok(())
}

pub async fn cmd_org_resend_pin(org: &str, output: OutputOptions) -> Result<()> {
    let (_, client) = connect()?;
    run_mutation(&client, &organizations::resend_pin(org), output).await?;
    Ok(())
}

fn requests_table(requests: &[OrganizationRequest]) -> String {
    if requests.is_empty() {
        return "No pending requests".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "NAME", "USER"]);
    for request in requests {
        let name = request.user_data.full_name();
        let name = if name.is_empty() { "-".to_string() } else { name };
        builder.push_record([request.id.clone(), name, request.user.clone()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// List pending join requests of an organization
pub async fn cmd_org_requests(org: &str, output: OutputOptions) -> Result<()> {
    let (_, client) = connect()?;
    let pending = requests::fetch_requests(&client, org).await?;
    CommandOutput::new(json!({
        "organization": org,
        "requests": pending,
    }))
    .with_text(requests_table(&pending))
    .print(output)
}

/// Grant or deny a join request
pub async fn cmd_org_request(
    org: &str,
    request_id: &str,
    action: &str,
    yes: bool,
    output: OutputOptions,
) -> Result<()> {
    let action: RequestAction = action.parse()?;
    let prompt = match action {
        RequestAction::Approve => "Are you sure you want to grant this request?",
        RequestAction::Reject => "Are you sure you want to deny this request?",
    };
    require_confirmation(prompt, yes)?;
    let (_, client) = connect()?;
    run_mutation(
        &client,
        &requests::request_action(action, request_id, org),
        output,
    )
    .await?;
    Ok(())
}

pub async fn cmd_org_indicators(output: OutputOptions) -> Result<()> {
    let (_, client) = connect()?;
    let indicators: OrganizationIndicators = client
        .fetch(ApiRequest::from(&organizations::indicators_key()))
        .await?;
    CommandOutput::new(serde_json::to_value(indicators)?)
        .with_text(render_indicators(&indicators))
        .print(output)
}

/// List members of an organization
pub async fn cmd_org_members(
    org: &str,
    page: u32,
    page_size: Option<u32>,
    output: OutputOptions,
) -> Result<()> {
    let (config, client) = connect()?;
    let pagination = PaginationModel::new(
        page.saturating_sub(1),
        page_size.unwrap_or(config.page_size),
    );
    let key = organizations::members_inputs(org, pagination).key();
    let members = client.get_page::<User>(&key).await?;

    let mut table = ResourceTable::new(Users::columns(), pagination);
    table.set_rows(members.results, members.count);

    let text = format!("{}\n{}", render_table(&table), table_footer(&table));
    CommandOutput::new(json!({
        "organization": org,
        "count": table.row_count(),
        "page": page,
        "page_size": pagination.page_size,
        "results": table.rows(),
    }))
    .with_text(text)
    .print(output)
}
