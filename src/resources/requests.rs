//! Requests from users to join an organization.

use std::fmt;
use std::str::FromStr;

use catalog_schema::OrganizationRequest;

use crate::api::{ApiRequest, CatalogClient, endpoints};
use crate::error::{CatalogError, Result};
use crate::mutation::{MutationMessages, MutationSpec};
use crate::query::{KeyScope, QueryKey};

use super::unknown_action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    Approve,
    Reject,
}

impl RequestAction {
    pub fn wire_name(&self) -> &'static str {
        match self {
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
        }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestAction::Approve => "Grant",
            RequestAction::Reject => "Deny",
        })
    }
}

impl FromStr for RequestAction {
    type Err = CatalogError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "grant" => Ok(RequestAction::Approve),
            "reject" | "deny" => Ok(RequestAction::Reject),
            other => Err(unknown_action("request", other, &["approve", "reject"])),
        }
    }
}

/// Key of the pending join requests of one organization.
pub fn requests_key(org_id: &str) -> QueryKey {
    QueryKey::new(endpoints::ORGANIZATION_REQUESTS, [("pk", org_id)])
}

/// The endpoint returns a bare array rather than a page.
pub async fn fetch_requests(
    client: &CatalogClient,
    org_id: &str,
) -> Result<Vec<OrganizationRequest>> {
    client.fetch(ApiRequest::from(&requests_key(org_id))).await
}

/// Grant or deny one join request. Granting changes the member list of
/// `org_id`, so both reads are invalidated.
pub fn request_action(action: RequestAction, request_id: &str, org_id: &str) -> MutationSpec {
    let success = match action {
        RequestAction::Approve => "Request approved",
        RequestAction::Reject => "Request rejected",
    };
    MutationSpec::new(
        ApiRequest::post(endpoints::organization_request_action(
            request_id,
            action.wire_name(),
        )),
        MutationMessages::new(success)
            .on_validation("Error occurred while processing request")
            .on_not_found("Request does not exist"),
    )
    .invalidating([
        KeyScope::prefix(endpoints::ORGANIZATION_REQUESTS),
        KeyScope::prefix(endpoints::organization_members(org_id)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_key() {
        assert_eq!(
            requests_key("o1").to_string(),
            "/admin/organisation_requests/?pk=o1"
        );
    }

    #[test]
    fn test_request_action_spec() {
        let spec = request_action(RequestAction::Reject, "r9", "o1");
        assert_eq!(
            spec.request.path,
            "/admin/organisation_requests/pk/r9/actions/reject/"
        );
        assert_eq!(spec.messages.success, "Request rejected");
        assert_eq!(
            spec.invalidates[1],
            KeyScope::prefix("/admin/organisations/o1/users/")
        );
    }

    #[test]
    fn test_action_aliases() {
        assert_eq!("grant".parse::<RequestAction>().unwrap(), RequestAction::Approve);
        assert_eq!("deny".parse::<RequestAction>().unwrap(), RequestAction::Reject);
    }
}
