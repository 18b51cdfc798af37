//! Backend paths. These must match the server verbatim.

use url::form_urlencoded::byte_serialize;

pub const ORGANIZATIONS: &str = "/organisations/";
pub const ADMIN_ORGANIZATIONS: &str = "/admin/organisations/";
pub const USER_ORGANIZATIONS: &str = "/user/organisations/";
pub const ORGANIZATION_VERIFICATION: &str = "/organisations/verification/";
pub const ORGANIZATION_INDICATORS: &str = "/admin/organisations/indicators/";
pub const ORGANIZATION_REQUESTS: &str = "/admin/organisation_requests/";

pub const DATASETS: &str = "/datasets/";
pub const ADMIN_DATASETS: &str = "/admin/datasets/";

pub const ADMIN_USERS: &str = "/admin/users/";

/// Route the UI returns to after a dataset is deleted.
pub const ACCOUNT_DATASETS_ROUTE: &str = "/account/datasets";

fn segment(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

pub fn organization(slug: &str) -> String {
    format!("{ORGANIZATIONS}{}/", segment(slug))
}

pub fn organization_action(id: &str, action: &str) -> String {
    format!("{ADMIN_ORGANIZATIONS}pk/{}/actions/{action}/", segment(id))
}

pub fn organization_member(org_id: &str, user_id: &str) -> String {
    format!(
        "{ORGANIZATIONS}{}/users/{}/",
        segment(org_id),
        segment(user_id)
    )
}

pub fn organization_members(org_id: &str) -> String {
    format!("{ADMIN_ORGANIZATIONS}{}/users/", segment(org_id))
}

pub fn resend_pin(org_id: &str) -> String {
    format!("{ORGANIZATIONS}resend-pin/{}/", segment(org_id))
}

pub fn organization_request_action(request_id: &str, action: &str) -> String {
    format!("{ORGANIZATION_REQUESTS}pk/{}/actions/{action}/", segment(request_id))
}

pub fn dataset(id: &str) -> String {
    format!("{DATASETS}{}/", segment(id))
}

pub fn dataset_action(id: &str, action: &str) -> String {
    format!("{ADMIN_DATASETS}pk/{}/actions/{action}/", segment(id))
}

pub fn user_action(id: &str, action: &str) -> String {
    format!("{ADMIN_USERS}pk/{}/actions/{action}/", segment(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_paths() {
        assert_eq!(
            organization_action("o1", "approved"),
            "/admin/organisations/pk/o1/actions/approved/"
        );
        assert_eq!(
            organization_request_action("r9", "reject"),
            "/admin/organisation_requests/pk/r9/actions/reject/"
        );
        assert_eq!(
            dataset_action("d1", "further_review"),
            "/admin/datasets/pk/d1/actions/further_review/"
        );
        assert_eq!(user_action("u1", "block"), "/admin/users/pk/u1/actions/block/");
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(organization("acme"), "/organisations/acme/");
        assert_eq!(organization_member("o1", "u2"), "/organisations/o1/users/u2/");
        assert_eq!(organization_members("o1"), "/admin/organisations/o1/users/");
        assert_eq!(resend_pin("o1"), "/organisations/resend-pin/o1/");
        assert_eq!(dataset("d1"), "/datasets/d1/");
    }

    #[test]
    fn test_segments_are_escaped() {
        assert_eq!(organization("a/b"), "/organisations/a%2Fb/");
    }
}
