use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::resources::{Datasets, Organizations, Users};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Admin console for a data catalog")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output selection shared by every command.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Search, filter and paging options of the `ls` commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter by status (e.g. pending, approved, published)
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by verification (true or false)
    #[arg(long, value_parser = parse_bool_strict)]
    pub verified: Option<bool>,

    /// Filter by active flag (true or false)
    #[arg(long, value_parser = parse_bool_strict)]
    pub active: Option<bool>,

    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page: 5, 10 or 100 (default: from config)
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<u32>,

    #[command(flatten)]
    pub output: OutputOptions,
}

/// A confirmable action on one row.
#[derive(Args, Debug, Clone)]
pub struct ActionArgs {
    /// Id of the record
    pub id: String,

    /// Action to run (see `--help` of the resource for the accepted names)
    pub action: String,

    /// Remark sent along with the action
    #[arg(long)]
    pub remark: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub output: OutputOptions,
}

/// Fields of the create and edit organization forms.
#[derive(Args, Debug, Clone, Default)]
pub struct OrgFormArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Organization type
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// LinkedIn profile URL
    #[arg(long)]
    pub linkedin: Option<String>,

    /// Twitter handle or URL
    #[arg(long)]
    pub twitter: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    /// Image file to upload as the logo
    #[arg(long)]
    pub logo: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Administer organizations
    #[command(visible_alias = "o")]
    Orgs {
        #[command(subcommand)]
        action: OrgsAction,
    },

    /// Administer datasets
    #[command(visible_alias = "d")]
    Datasets {
        #[command(subcommand)]
        action: DatasetsAction,
    },

    /// Administer users
    #[command(visible_alias = "u")]
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Browse a resource list in a full-screen interface
    #[command(visible_alias = "b")]
    Browse {
        /// Resource to browse
        #[arg(value_enum)]
        resource: BrowseTarget,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum OrgsAction {
    /// List organizations
    Ls(ListArgs),

    /// Run an action on an organization: approve, reject, block, unblock, delete
    Action(ActionArgs),

    /// Create an organization
    Create {
        #[command(flatten)]
        form: OrgFormArgs,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Update fields of an organization
    Edit {
        /// Slug of the organization
        slug: String,

        #[command(flatten)]
        form: OrgFormArgs,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Remove a member from an organization
    RemoveUser {
        /// Organization id
        org: String,

        /// User id
        user: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Verify an organization with the emailed code
    Verify {
        pin: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Send a new verification code
    ResendPin {
        /// Organization id
        org: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// List pending join requests of an organization
    Requests {
        /// Organization id
        org: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Grant or deny a join request
    Request {
        /// Organization id
        org: String,

        /// Join request id
        request: String,

        /// approve (grant) or reject (deny)
        action: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show organization counts by status
    Indicators {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// List members of an organization
    Members {
        /// Organization id
        org: String,

        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Rows per page: 5, 10 or 100
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<u32>,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum DatasetsAction {
    /// List datasets
    Ls(ListArgs),

    /// Run an action on a dataset: publish, reject, unpublish, further-review, delete
    Action(ActionArgs),

    /// Delete a dataset
    Delete {
        /// Dataset id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    Ls(ListArgs),

    /// Run an action on a user: block, unblock, delete
    Action(ActionArgs),
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Get a configuration value
    Get {
        /// One of: api_url, auth.token, timeout, page_size, search_debounce_ms
        key: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Set a configuration value
    Set {
        key: String,
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Print the path of the configuration file
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowseTarget {
    Orgs,
    Datasets,
    Users,
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            cmd_action, cmd_browse, cmd_config_get, cmd_config_path, cmd_config_set,
            cmd_config_show, cmd_dataset_delete, cmd_ls, cmd_org_create, cmd_org_edit,
            cmd_org_indicators, cmd_org_members, cmd_org_remove_user, cmd_org_request,
            cmd_org_requests, cmd_org_resend_pin, cmd_org_verify,
        };

        match self {
            Commands::Orgs { action } => match action {
                OrgsAction::Ls(args) => cmd_ls::<Organizations>(args).await,
                OrgsAction::Action(args) => cmd_action::<Organizations>(args).await,
                OrgsAction::Create { form, output } => cmd_org_create(form, output).await,
                OrgsAction::Edit { slug, form, output } => cmd_org_edit(&slug, form, output).await,
                OrgsAction::RemoveUser {
                    org,
                    user,
                    yes,
                    output,
                } => cmd_org_remove_user(&org, &user, yes, output).await,
                OrgsAction::Verify { pin, output } => cmd_org_verify(&pin, output).await,
                OrgsAction::ResendPin { org, output } => cmd_org_resend_pin(&org, output).await,
                OrgsAction::Requests { org, output } => cmd_org_requests(&org, output).await,
                OrgsAction::Request {
                    org,
                    request,
                    action,
                    yes,
                    output,
                } => cmd_org_request(&org, &request, &action, yes, output).await,
                OrgsAction::Indicators { output } => cmd_org_indicators(output).await,
                OrgsAction::Members {
                    org,
                    page,
                    page_size,
                    output,
                } => cmd_org_members(&org, page, page_size, output).await,
            },

            Commands::Datasets { action } => match action {
                DatasetsAction::Ls(args) => cmd_ls::<Datasets>(args).await,
                DatasetsAction::Action(args) => cmd_action::<Datasets>(args).await,
                DatasetsAction::Delete { id, yes, output } => {
                    cmd_dataset_delete(&id, yes, output).await
                }
            },

            Commands::Users { action } => match action {
                UsersAction::Ls(args) => cmd_ls::<Users>(args).await,
                UsersAction::Action(args) => cmd_action::<Users>(args).await,
            },

            Commands::Browse { resource } => cmd_browse(resource).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { output } => cmd_config_show(output),
                ConfigAction::Get { key, output } => cmd_config_get(&key, output),
                ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
                ConfigAction::Path => cmd_config_path(),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Parse a boolean value strictly (only "true" or "false", case-insensitive)
fn parse_bool_strict(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!(
            "Invalid boolean value '{s}'. Must be 'true' or 'false'"
        )),
    }
}

fn parse_page_size(s: &str) -> Result<u32, String> {
    use crate::list::pagination::PAGE_SIZE_OPTIONS;

    let size: u32 = s
        .parse()
        .map_err(|_| format!("Invalid page size '{s}'. Must be a number"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("Invalid page size '{s}'. Must be one of: 5, 10, 100"))
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "catalog", &mut io::stdout());
}
