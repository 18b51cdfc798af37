mod common;

use std::time::Duration;

use http::{Method, StatusCode};
use serde_json::{Value, json};
use tokio::time::Instant;

use catalog::display::table::table_footer;
use catalog::list::ChangeReason;
use catalog::query::{load_page, reload_page};
use catalog::resources::requests::{fetch_requests, request_action};
use catalog::resources::{DatasetAction, OrganizationAction, RequestAction};
use catalog::{
    ActionMutation, Datasets, FilterKey, FilterState, ListController, Notification,
    Organizations, PaginationModel, QueryCache,
};

use common::{MockBackend, Reply, client};

const DEBOUNCE: Duration = Duration::from_millis(500);

fn orgs(ids: &[&str], count: u64) -> Value {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("Org {id}"), "status": "pending"}))
        .collect();
    json!({"count": count, "results": results})
}

fn organizations() -> ListController<Organizations> {
    ListController::new(FilterState::new(), 10, DEBOUNCE)
}

#[tokio::test]
async fn test_identical_reads_share_one_request() {
    let backend = MockBackend::new();
    backend.on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o1", "o2"], 2)));
    let client = client(&backend);
    let cache = QueryCache::new();

    let mut first = organizations();
    let mut second = organizations();
    let a = first.start().unwrap();
    let b = second.start().unwrap();
    assert_eq!(a.key, b.key);

    let (applied_a, applied_b) = tokio::join!(
        first.load(&client, &cache, a),
        second.load(&client, &cache, b)
    );
    assert!(applied_a && applied_b);
    assert_eq!(backend.count("GET"), 1);
    assert_eq!(first.table().row_id(1), Some("o2"));
    assert_eq!(second.table().row_id(1), Some("o2"));

    // A later reader with the same inputs is served from the cache.
    let mut third = organizations();
    let c = third.start().unwrap();
    assert!(third.load(&client, &cache, c).await);
    assert_eq!(backend.count("GET"), 1);
}

#[tokio::test]
async fn test_action_invalidates_and_list_rereads() {
    let backend = MockBackend::new();
    backend
        .on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o1", "o2"], 2)))
        .on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o2"], 1)))
        .on(
            Method::POST,
            "/admin/organisations/pk/o1/actions/delete/",
            Reply::Ok(Value::Null),
        );
    let client = client(&backend);
    let cache = QueryCache::new();
    let mut list = organizations();

    let ticket = list.start().unwrap();
    assert!(list.load(&client, &cache, ticket).await);
    assert_eq!(list.table().row_count(), 2);

    list.open_dialog(OrganizationAction::Delete, "o1").unwrap();
    let result = list.confirm(&client, &cache, None).await.unwrap();
    assert!(result.succeeded);
    assert_eq!(
        result.notification,
        Some(Notification::success("Organization deleted"))
    );

    let refetch = result.refetch.expect("list should re-read");
    assert!(list.load(&client, &cache, refetch).await);
    assert_eq!(list.table().row_count(), 1);
    assert_eq!(list.table().row_id(0), Some("o2"));
    assert_eq!(
        backend.calls(),
        vec![
            "GET /organisations/?limit=10&offset=0",
            "POST /admin/organisations/pk/o1/actions/delete/",
            "GET /organisations/?limit=10&offset=0",
        ]
    );
}

#[tokio::test]
async fn test_repeated_action_on_missing_row_reports_not_found() {
    let backend = MockBackend::new();
    backend
        .on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o1"], 1)))
        .on(
            Method::POST,
            "/admin/organisations/pk/o1/actions/block/",
            Reply::Ok(json!({"message": "organization blocked"})),
        )
        .on(
            Method::POST,
            "/admin/organisations/pk/o1/actions/block/",
            Reply::Status(StatusCode::NOT_FOUND, "Not found."),
        );
    let client = client(&backend);
    let cache = QueryCache::new();
    let mut list = organizations();
    let ticket = list.start().unwrap();
    list.load(&client, &cache, ticket).await;

    list.open_dialog(OrganizationAction::Block, "o1").unwrap();
    let first = list.confirm(&client, &cache, None).await.unwrap();
    assert_eq!(
        first.notification,
        Some(Notification::success("Organization blocked"))
    );

    list.open_dialog(OrganizationAction::Block, "o1").unwrap();
    let second = list.confirm(&client, &cache, None).await.unwrap();
    assert!(!second.succeeded);
    assert_eq!(
        second.notification,
        Some(Notification::error("Organization not found"))
    );
    assert!(second.refetch.is_none());
}

#[tokio::test]
async fn test_dataset_delete_navigates_to_account_list() {
    let backend = MockBackend::new();
    backend
        .on(
            Method::GET,
            "/admin/datasets/",
            Reply::Ok(json!({"count": 1, "results": [
                {"id": "d1", "title": "Rainfall", "status": "published"}
            ]})),
        )
        .on(Method::DELETE, "/datasets/d1/", Reply::Ok(Value::Null));
    let client = client(&backend);
    let cache = QueryCache::new();
    let mut list: ListController<Datasets> = ListController::new(FilterState::new(), 10, DEBOUNCE);

    let ticket = list.start().unwrap();
    assert!(list.load(&client, &cache, ticket).await);

    list.open_dialog(DatasetAction::Delete, "d1").unwrap();
    let result = list.confirm(&client, &cache, None).await.unwrap();
    assert!(result.succeeded);
    assert_eq!(
        result.notification,
        Some(Notification::success("Dataset successfully deleted"))
    );
    assert_eq!(
        result.navigate_to.map(|nav| nav.route),
        Some("/account/datasets".to_string())
    );
    assert_eq!(backend.count("DELETE /datasets/d1/"), 1);
}

#[tokio::test]
async fn test_filters_and_paging_reach_the_query() {
    let backend = MockBackend::new();
    backend.on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o41", "o42"], 42)));
    let client = client(&backend);
    let cache = QueryCache::new();

    let mut list = organizations().with_page(4);
    list.start();
    let ticket = list.set_filter(FilterKey::Status, "pending").unwrap();
    assert_eq!(ticket.key.param("status"), Some("pending"));
    // Changing a filter goes back to the first page.
    assert_eq!(ticket.key.param("offset"), Some("0"));

    assert!(list.load(&client, &cache, ticket).await);
    assert_eq!(list.table().page_count(), 5);

    let last = list
        .change_page(PaginationModel::new(4, 10), Some(ChangeReason::Jump))
        .unwrap();
    assert_eq!(last.key.param("offset"), Some("40"));
    assert!(list.load(&client, &cache, last).await);
    assert_eq!(
        table_footer(list.table()),
        "Showing 41-42 of 42 · page 5/5 · page size 10"
    );
}

#[tokio::test]
async fn test_failed_read_is_shared_error() {
    let backend = MockBackend::new();
    backend.on(
        Method::GET,
        "/organisations/",
        Reply::Status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
    );
    let client = client(&backend);
    let cache = QueryCache::new();
    let mut list = organizations();

    let ticket = list.start().unwrap();
    assert!(list.load(&client, &cache, ticket).await);
    assert!(list.state().error.is_some());
    assert!(list.table().is_empty_state());
}

#[tokio::test]
async fn test_join_requests_decode_and_resolve() {
    let backend = MockBackend::new();
    backend
        .on(
            Method::GET,
            "/admin/organisation_requests/",
            Reply::Ok(json!([
                {"id": 4, "user": 7, "organization": "o1",
                 "user_data": {"first_name": "Ada", "last_name": "Lovelace"}}
            ])),
        )
        .on(
            Method::POST,
            "/admin/organisation_requests/pk/4/actions/approve/",
            Reply::Ok(Value::Null),
        );
    let client = client(&backend);
    let cache = QueryCache::new();

    let requests = fetch_requests(&client, "o1").await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, "4");
    assert_eq!(requests[0].user_data.full_name(), "Ada Lovelace");
    assert_eq!(
        backend.calls(),
        vec!["GET /admin/organisation_requests/?pk=o1"]
    );

    let spec = request_action(RequestAction::Approve, "4", "o1");
    let outcome = ActionMutation::new().run(&client, &cache, &spec).await.unwrap();
    assert_eq!(outcome.notification, Notification::success("Request approved"));
}

#[tokio::test]
async fn test_refresh_reads_the_page_again() {
    let backend = MockBackend::new();
    backend
        .on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o1"], 1)))
        .on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o1", "o2"], 2)));
    let client = client(&backend);
    let cache = QueryCache::new();
    let mut list = organizations();

    let ticket = list.start().unwrap();
    assert!(list.load(&client, &cache, ticket).await);
    assert_eq!(list.table().row_count(), 1);

    // A plain refetch of a fresh page is answered by the cache.
    let cached = list.refetch().unwrap();
    let result = load_page::<catalog_schema::Organization>(&client, &cache, &cached).await;
    assert!(list.apply(&cached, result));
    assert_eq!(backend.count("GET"), 1);

    let refresh = list.refetch().unwrap();
    let result = reload_page::<catalog_schema::Organization>(&client, &cache, &refresh).await;
    assert!(list.apply(&refresh, result));
    assert_eq!(backend.count("GET"), 2);
    assert_eq!(list.table().row_count(), 2);
    assert_eq!(list.table().row_id(1), Some("o2"));
}

#[tokio::test(start_paused = true)]
async fn test_search_burst_issues_one_read() {
    let backend = MockBackend::new();
    backend.on(Method::GET, "/organisations/", Reply::Ok(orgs(&["o7"], 1)));
    let client = client(&backend);
    let cache = QueryCache::new();
    let mut list = organizations();
    let ticket = list.start().unwrap();
    list.load(&client, &cache, ticket).await;

    for text in ["a", "ac", "acme"] {
        list.type_search(text, Instant::now());
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(list.tick(Instant::now()).is_none());
    }

    let due = list.search_deadline().unwrap();
    assert!(list.tick(due - Duration::from_millis(1)).is_none());
    let ticket = list.tick(due).unwrap();
    assert_eq!(ticket.key.param("search"), Some("acme"));
    assert!(list.tick(due + DEBOUNCE).is_none());

    assert!(list.load(&client, &cache, ticket).await);
    assert_eq!(
        backend.calls(),
        vec![
            "GET /organisations/?limit=10&offset=0",
            "GET /organisations/?search=acme&limit=10&offset=0",
        ]
    );
}
