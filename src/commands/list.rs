use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use crate::cli::ListArgs;
use crate::display::{render_table, table_footer};
use crate::error::{CatalogError, Result};
use crate::list::filter_state::{FilterKey, FilterState};
use crate::list::pagination::PAGE_SIZE_OPTIONS;
use crate::list::ListController;
use crate::query::QueryCache;
use crate::resources::Resource;

use super::{CommandOutput, connect};

/// Filter state of an `ls` invocation, checked against what `R` offers.
pub fn filter_state<R: Resource>(args: &ListArgs) -> Result<FilterState> {
    let mut filters = FilterState::new();
    if let Some(search) = &args.search {
        filters.set(FilterKey::Q, search.trim());
    }

    let requested = [
        (FilterKey::Status, args.status.clone()),
        (FilterKey::Verified, args.verified.map(|v| v.to_string())),
        (FilterKey::Active, args.active.map(|v| v.to_string())),
    ];
    for (key, value) in requested {
        let Some(value) = value else {
            continue;
        };
        if !R::FILTERS.contains(&key) {
            return Err(CatalogError::InvalidArgument {
                key: key.to_string(),
                message: format!("{} cannot be filtered by {key}", R::NAME),
            });
        }
        let value = value.trim().to_ascii_lowercase().replace('-', "_");
        let options = R::filter_options(key);
        if !options.iter().any(|option| option.value == value) {
            let expected: Vec<&str> = options.iter().map(|option| option.value).collect();
            return Err(CatalogError::InvalidArgument {
                key: key.to_string(),
                message: format!("'{value}' is not one of: {}", expected.join(", ")),
            });
        }
        filters.set(key, value);
    }
    Ok(filters)
}

/// List one page of a resource
pub async fn cmd_ls<R: Resource>(args: ListArgs) -> Result<()> {
    let filters = filter_state::<R>(&args)?;
    let (config, client) = connect()?;

    let page_size = args.page_size.unwrap_or(config.page_size);
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
        return Err(CatalogError::InvalidPageSize(page_size));
    }

    let cache = QueryCache::new();
    let mut list = ListController::<R>::new(filters, page_size, config.search_debounce())
        .with_page(args.page.saturating_sub(1));
    if let Some(ticket) = list.start() {
        list.load(&client, &cache, ticket).await;
    }
    if let Some(err) = list.state().error.clone() {
        return Err(CatalogError::Query(err));
    }

    let table = list.table();
    let json_output = json!({
        "resource": R::NAME,
        "count": table.row_count(),
        "page": args.page,
        "page_size": page_size,
        "page_count": table.page_count(),
        "results": table.rows(),
    });

    let title = R::TITLE.if_supports_color(Stream::Stdout, |t| t.bold()).to_string();
    let footer = table_footer(table)
        .if_supports_color(Stream::Stdout, |t| t.dimmed())
        .to_string();
    let text_output = format!("{title}\n{}\n{footer}", render_table(table));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(args.output)
}
