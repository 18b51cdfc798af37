use crate::cli::BrowseTarget;
use crate::config::Config;
use crate::error::Result;
use crate::list::filter_state::FilterState;
use crate::resources::{Datasets, Organizations, Users};
use crate::tui::run_browser;

/// Open the full-screen browser for one resource
pub async fn cmd_browse(target: BrowseTarget) -> Result<()> {
    let config = Config::load()?;
    let filters = FilterState::new();
    match target {
        BrowseTarget::Orgs => run_browser::<Organizations>(&config, filters).await,
        BrowseTarget::Datasets => run_browser::<Datasets>(&config, filters).await,
        BrowseTarget::Users => run_browser::<Users>(&config, filters).await,
    }
}
