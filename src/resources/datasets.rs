use std::fmt;
use std::str::FromStr;

use catalog_schema::{Dataset, DatasetStatus};

use crate::api::{ApiRequest, endpoints};
use crate::display::{day_or_missing, or_missing, relative_or_missing};
use crate::error::CatalogError;
use crate::list::filter_state::FilterKey;
use crate::list::table::{Align, Cell, CellStyle, Column, Row};
use crate::mutation::{MutationMessages, MutationSpec};
use crate::query::KeyScope;

use super::{FilterOption, MenuItem, Resource, RowAction, remark_body, unknown_action};

const STATUS_OPTIONS: &[FilterOption] = &[
    FilterOption {
        value: "pending",
        label: "Pending",
    },
    FilterOption {
        value: "published",
        label: "Published",
    },
    FilterOption {
        value: "rejected",
        label: "Rejected",
    },
    FilterOption {
        value: "unpublished",
        label: "Unpublished",
    },
    FilterOption {
        value: "further_review",
        label: "Further review",
    },
];

impl Row for Dataset {
    fn row_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetAction {
    Publish,
    Reject,
    Unpublish,
    FurtherReview,
    Delete,
}

impl RowAction for DatasetAction {
    fn wire_name(&self) -> &'static str {
        match self {
            DatasetAction::Publish => "published",
            DatasetAction::Reject => "rejected",
            DatasetAction::Unpublish => "unpublished",
            DatasetAction::FurtherReview => "further_review",
            DatasetAction::Delete => "delete",
        }
    }

    fn is_destructive(&self) -> bool {
        matches!(self, DatasetAction::Delete)
    }
}

impl fmt::Display for DatasetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DatasetAction::Publish => "Publish",
            DatasetAction::Reject => "Reject",
            DatasetAction::Unpublish => "Unpublish",
            DatasetAction::FurtherReview => "Further review",
            DatasetAction::Delete => "Delete",
        })
    }
}

impl FromStr for DatasetAction {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "publish" | "published" => Ok(DatasetAction::Publish),
            "reject" | "rejected" => Ok(DatasetAction::Reject),
            "unpublish" | "unpublished" => Ok(DatasetAction::Unpublish),
            "further_review" | "review" => Ok(DatasetAction::FurtherReview),
            "delete" => Ok(DatasetAction::Delete),
            other => Err(unknown_action(
                "dataset",
                other,
                &["publish", "reject", "unpublish", "further-review", "delete"],
            )),
        }
    }
}

pub fn status_style(status: DatasetStatus) -> CellStyle {
    match status {
        DatasetStatus::Pending => CellStyle::Warning,
        DatasetStatus::Published => CellStyle::Success,
        DatasetStatus::Rejected => CellStyle::Danger,
        DatasetStatus::Unpublished => CellStyle::Muted,
        DatasetStatus::FurtherReview => CellStyle::Info,
    }
}

fn dataset_scopes() -> [KeyScope; 2] {
    [
        KeyScope::prefix(endpoints::ADMIN_DATASETS),
        KeyScope::prefix(endpoints::DATASETS),
    ]
}

pub struct Datasets;

impl Resource for Datasets {
    type Record = Dataset;
    type Action = DatasetAction;

    const NAME: &'static str = "datasets";
    const TITLE: &'static str = "Datasets";
    const PATH: &'static str = endpoints::ADMIN_DATASETS;
    const DETAIL_ROUTE: &'static str = "/admin/datasets";
    const SEARCH_PLACEHOLDER: &'static str = "Search for title...";
    const FILTERS: &'static [FilterKey] = &[FilterKey::Status];

    fn columns() -> Vec<Column<Dataset>> {
        vec![
            Column::new("title", "TITLE", |d: &Dataset| Cell::plain(d.title.clone()))
                .sortable(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            Column::new("owner", "OWNER", |d: &Dataset| {
                Cell::plain(or_missing(Some(&d.owner().display_name())))
            }),
            Column::new("views_count", "VIEWS", |d: &Dataset| {
                Cell::plain(d.views_count.to_string())
            })
            .sortable(|a, b| a.views_count.cmp(&b.views_count))
            .align(Align::Center),
            Column::new("downloads_count", "DOWNLOADS", |d: &Dataset| {
                Cell::plain(d.downloads_count.to_string())
            })
            .sortable(|a, b| a.downloads_count.cmp(&b.downloads_count))
            .align(Align::Center),
            Column::new("status", "STATUS", |d: &Dataset| {
                Cell::styled(d.status.label(), status_style(d.status))
            })
            .align(Align::Center),
            Column::new("created_at", "CREATED AT", |d: &Dataset| {
                Cell::plain(day_or_missing(d.created_at))
            })
            .sortable(|a, b| a.created_at.cmp(&b.created_at))
            .align(Align::Center),
            Column::new("updated_at", "UPDATED AT", |d: &Dataset| {
                Cell::plain(relative_or_missing(d.updated_at))
            })
            .sortable(|a, b| a.updated_at.cmp(&b.updated_at))
            .align(Align::Center),
        ]
    }

    fn filter_options(key: FilterKey) -> &'static [FilterOption] {
        match key {
            FilterKey::Status => STATUS_OPTIONS,
            _ => &[],
        }
    }

    /// Status transitions offered depend on the current status.
    fn menu(dataset: &Dataset) -> Vec<MenuItem<DatasetAction>> {
        let mut items = vec![MenuItem::View];
        let transitions: &[DatasetAction] = match dataset.status {
            DatasetStatus::Pending | DatasetStatus::FurtherReview => {
                &[DatasetAction::Publish, DatasetAction::Reject]
            }
            DatasetStatus::Published => &[DatasetAction::Unpublish, DatasetAction::FurtherReview],
            DatasetStatus::Unpublished => &[DatasetAction::Publish, DatasetAction::FurtherReview],
            DatasetStatus::Rejected => &[DatasetAction::FurtherReview],
        };
        items.extend(transitions.iter().copied().map(MenuItem::Action));
        items.push(MenuItem::Action(DatasetAction::Delete));
        items
    }

    fn prompt(action: DatasetAction) -> &'static str {
        match action {
            DatasetAction::Publish => "Are you sure you want to publish this dataset?",
            DatasetAction::Reject => "Are you sure you want to reject this dataset?",
            DatasetAction::Unpublish => "Are you sure you want to unpublish this dataset?",
            DatasetAction::FurtherReview => {
                "Are you sure you want to send this dataset for further review?"
            }
            DatasetAction::Delete => "Are you sure you want to delete this dataset?",
        }
    }

    /// Deleting goes through the public dataset endpoint and sends the
    /// caller back to the account dataset list.
    fn mutation(action: DatasetAction, target: &str, remark: Option<&str>) -> MutationSpec {
        if action == DatasetAction::Delete {
            return MutationSpec::new(
                ApiRequest::delete(endpoints::dataset(target)),
                MutationMessages::new("Dataset successfully deleted")
                    .on_not_found("Dataset not found"),
            )
            .invalidating(dataset_scopes())
            .navigating_to(endpoints::ACCOUNT_DATASETS_ROUTE);
        }

        let mut request = ApiRequest::post(endpoints::dataset_action(target, action.wire_name()));
        if let Some(body) = remark_body(remark) {
            request = request.json(body);
        }
        let success = match action {
            DatasetAction::Publish => "Dataset published",
            DatasetAction::Reject => "Dataset rejected",
            DatasetAction::Unpublish => "Dataset unpublished",
            DatasetAction::FurtherReview => "Dataset sent for further review",
            DatasetAction::Delete => "Dataset successfully deleted",
        };
        MutationSpec::new(
            request,
            MutationMessages::new(success)
                .on_validation("Error occurred while changing status")
                .on_not_found("Dataset not found"),
        )
        .invalidating(dataset_scopes())
    }
}
