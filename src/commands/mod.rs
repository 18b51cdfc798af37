//! Command implementations behind the `catalog` binary.
//!
//! Every command prints a human-readable rendering by default and a JSON
//! document with `--json`.

mod actions;
mod browse;
mod config;
pub mod interactive;
mod list;
mod orgs;

pub use actions::{cmd_action, cmd_dataset_delete};
pub use browse::cmd_browse;
pub use config::{cmd_config_get, cmd_config_path, cmd_config_set, cmd_config_show};
pub use list::{cmd_ls, filter_state};
pub use orgs::{
    cmd_org_create, cmd_org_edit, cmd_org_indicators, cmd_org_members, cmd_org_remove_user,
    cmd_org_request, cmd_org_requests, cmd_org_resend_pin, cmd_org_verify,
};

use serde_json::{Value, json};

use crate::api::CatalogClient;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::format_notification;
use crate::error::{CatalogError, Result};
use crate::mutation::{ActionMutation, MutationOutcome, MutationSpec};
use crate::query::QueryCache;

/// Result of a command in both of its renderings.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print the JSON form with `--json`, the text form otherwise. Commands
    /// without a text form fall back to JSON.
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load the configuration and build a client from it.
pub(crate) fn connect() -> Result<(Config, CatalogClient)> {
    let config = Config::load()?;
    let client = CatalogClient::from_config(&config)?;
    Ok((config, client))
}

/// Run one mutation and print its notification.
///
/// A failure the mutation has a notification for is returned as
/// [`CatalogError::ActionFailed`] carrying that text.
pub(crate) async fn run_mutation(
    client: &CatalogClient,
    spec: &MutationSpec,
    output: OutputOptions,
) -> Result<MutationOutcome> {
    let cache = QueryCache::new();
    let outcome = match ActionMutation::new().run(client, &cache, spec).await {
        Ok(outcome) => outcome,
        Err(err) => {
            return Err(match spec.messages.for_error(&err) {
                Some(notification) => CatalogError::ActionFailed {
                    message: notification.message,
                    source: Box::new(err),
                },
                None => err,
            });
        }
    };

    let navigate_to = outcome.navigate_to.as_ref().map(|n| n.route.clone());
    let mut text = format_notification(&outcome.notification);
    if let Some(route) = &navigate_to {
        text.push_str(&format!("\nNext: {route}"));
    }
    CommandOutput::new(json!({
        "success": true,
        "endpoint": spec.request.endpoint(),
        "notification": outcome.notification,
        "navigate_to": navigate_to,
        "response": outcome.response,
    }))
    .with_text(text)
    .print(output)?;
    Ok(outcome)
}
