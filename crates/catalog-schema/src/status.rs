use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a status string is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Review status of an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrganizationStatus {
    pub const ALL: [OrganizationStatus; 3] = [
        OrganizationStatus::Pending,
        OrganizationStatus::Approved,
        OrganizationStatus::Rejected,
    ];

    /// Wire form, as sent in query strings and action paths
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationStatus::Pending => "pending",
            OrganizationStatus::Approved => "approved",
            OrganizationStatus::Rejected => "rejected",
        }
    }

    /// Human label shown in tables and selectors
    pub fn label(&self) -> &'static str {
        match self {
            OrganizationStatus::Pending => "Pending",
            OrganizationStatus::Approved => "Approved",
            OrganizationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for OrganizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrganizationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError {
                kind: "organization status",
                value: s.to_string(),
                expected: "pending, approved, rejected",
            })
    }
}

/// Publication status of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetStatus {
    Pending,
    Published,
    Rejected,
    Unpublished,
    FurtherReview,
}

impl DatasetStatus {
    pub const ALL: [DatasetStatus; 5] = [
        DatasetStatus::Pending,
        DatasetStatus::Published,
        DatasetStatus::Rejected,
        DatasetStatus::Unpublished,
        DatasetStatus::FurtherReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetStatus::Pending => "pending",
            DatasetStatus::Published => "published",
            DatasetStatus::Rejected => "rejected",
            DatasetStatus::Unpublished => "unpublished",
            DatasetStatus::FurtherReview => "further_review",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatasetStatus::Pending => "Pending",
            DatasetStatus::Published => "Published",
            DatasetStatus::Rejected => "Rejected",
            DatasetStatus::Unpublished => "Unpublished",
            DatasetStatus::FurtherReview => "Further review",
        }
    }
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['-', ' '], "_");
        DatasetStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ParseStatusError {
                kind: "dataset status",
                value: s.to_string(),
                expected: "pending, published, rejected, unpublished, further_review",
            })
    }
}

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseStatusError {
                kind: "role",
                value: s.to_string(),
                expected: "user, admin",
            }),
        }
    }
}
