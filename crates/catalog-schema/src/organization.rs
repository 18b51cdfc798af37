use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::status::OrganizationStatus;
use crate::user::deserialize_id;

/// An organization as returned by the list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub status: OrganizationStatus,
    /// Number of datasets owned by the organization
    #[serde(default)]
    pub data_count: u64,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub downloads_count: u64,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

fn default_true() -> bool {
    true
}

/// Counts backing the pending / approved / rejected badges of the admin list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationIndicators {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub pending: u64,
}

/// Name fields of the user asking to join an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUser {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl RequestUser {
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        parts.join(" ")
    }
}

/// A pending request from a user to join an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRequest {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Id of the requesting user
    #[serde(deserialize_with = "deserialize_id")]
    pub user: String,
    /// Id of the organization the user wants to join
    #[serde(deserialize_with = "deserialize_id")]
    pub organization: String,
    #[serde(default)]
    pub user_data: RequestUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_organization_record_decodes() {
        let org: Organization = serde_json::from_str(
            r#"{"id": "o1", "name": "Acme", "status": "pending", "is_verified": true}"#,
        )
        .unwrap();
        assert_eq!(org.id, "o1");
        assert_eq!(org.status, OrganizationStatus::Pending);
        assert!(org.is_verified);
        assert!(org.is_active);
        assert_eq!(org.data_count, 0);
        assert!(org.created_at.is_none());
    }

    #[test]
    fn test_full_organization_record_decodes() {
        let org: Organization = serde_json::from_str(
            r#"{
                "id": 7,
                "slug": "acme",
                "name": "Acme",
                "email": "ops@acme.test",
                "is_verified": false,
                "is_active": false,
                "status": "approved",
                "data_count": 3,
                "views_count": 120,
                "downloads_count": 9,
                "created_at": "2026-10-19T08:30:00.123456Z",
                "updated_at": "2026-10-18T08:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(org.id, "7");
        assert_eq!(org.slug, "acme");
        assert!(!org.is_active);
        assert_eq!(org.views_count, 120);
        assert!(org.created_at.is_some());
    }

    #[test]
    fn test_organization_with_unknown_status_is_rejected() {
        let result: Result<Organization, _> =
            serde_json::from_str(r#"{"id": "o1", "name": "Acme", "status": "archived"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_user_full_name_skips_missing_parts() {
        let user = RequestUser {
            first_name: Some("Ada".into()),
            last_name: None,
        };
        assert_eq!(user.full_name(), "Ada");
        assert_eq!(RequestUser::default().full_name(), "");
    }

    #[test]
    fn test_join_request_decodes() {
        let request: OrganizationRequest = serde_json::from_str(
            r#"{"id": "r1", "user": "u1", "organization": "o1",
                "user_data": {"first_name": "Ada", "last_name": "Lovelace"}}"#,
        )
        .unwrap();
        assert_eq!(request.user_data.full_name(), "Ada Lovelace");
    }
}
