use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::status::DatasetStatus;
use crate::user::deserialize_id;

/// User reference embedded in a dataset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Organization reference embedded in a dataset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOrganization {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Who owns a dataset. A dataset belongs to a user or to an organization,
/// never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner<'a> {
    User(&'a DatasetUser),
    Organization(&'a DatasetOrganization),
    None,
}

impl Owner<'_> {
    pub fn display_name(&self) -> String {
        match self {
            Owner::User(user) => [user.first_name.as_deref(), user.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
            Owner::Organization(org) => org.name.clone(),
            Owner::None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

/// A downloadable resource attached to a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: DatasetStatus,
    pub user: Option<DatasetUser>,
    pub organization: Option<DatasetOrganization>,
    pub tags: Vec<Tag>,
    pub files: Vec<DatasetFile>,
    pub views_count: u64,
    pub downloads_count: u64,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Dataset {
    pub fn owner(&self) -> Owner<'_> {
        match (&self.user, &self.organization) {
            (_, Some(org)) => Owner::Organization(org),
            (Some(user), None) => Owner::User(user),
            (None, None) => Owner::None,
        }
    }
}

#[derive(Deserialize)]
struct RawDataset {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    status: DatasetStatus,
    #[serde(default)]
    user: Option<DatasetUser>,
    #[serde(default)]
    organization: Option<DatasetOrganization>,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    files: Vec<DatasetFile>,
    #[serde(default)]
    views_count: u64,
    #[serde(default)]
    downloads_count: u64,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = String;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        if raw.user.is_some() && raw.organization.is_some() {
            return Err(format!(
                "dataset '{}' is owned by both a user and an organization",
                raw.id
            ));
        }
        Ok(Dataset {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            status: raw.status,
            user: raw.user,
            organization: raw.organization,
            tags: raw.tags,
            files: raw.files,
            views_count: raw.views_count,
            downloads_count: raw.downloads_count,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}
