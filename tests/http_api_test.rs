//! Functional tests for the HTTP surface.
//!
//! Every application-level outcome is expected to be HTTP 200 with the
//! outcome in the body; several tests pin long-standing wire behaviors
//! existing clients depend on.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use common::test_router;

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).expect("response body was not JSON");
    (status, value)
}

async fn create_issue(router: &Router, project: &str, body: Value) -> Value {
    let (status, value) = send(
        router,
        Method::POST,
        &format!("/api/issues/{project}"),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    value
}

#[tokio::test]
async fn test_create_issue_with_every_field() {
    let router = test_router().await;
    let body = create_issue(
        &router,
        "apitest",
        json!({
            "issue_title": "Test Issue",
            "issue_text": "This is a test issue",
            "created_by": "Abraham",
            "assigned_to": "John",
            "status_text": "In progress"
        }),
    )
    .await;

    assert_eq!(body["issue_title"], "Test Issue");
    assert_eq!(body["issue_text"], "This is a test issue");
    assert_eq!(body["created_by"], "Abraham");
    assert_eq!(body["assigned_to"], "John");
    assert_eq!(body["status_text"], "In progress");
    assert_eq!(body["open"], true);
    assert!(body["_id"].is_string());
    assert_eq!(body["created_on"], body["updated_on"]);
}

#[tokio::test]
async fn test_create_issue_with_only_required_fields() {
    let router = test_router().await;
    let body = create_issue(
        &router,
        "apitest",
        json!({
            "issue_title": "Required Field Test",
            "issue_text": "Only required fields",
            "created_by": "Ingrid"
        }),
    )
    .await;

    assert_eq!(body["issue_title"], "Required Field Test");
    assert_eq!(body["assigned_to"], "");
    assert_eq!(body["status_text"], "");
    assert_eq!(body["open"], true);
}

#[tokio::test]
async fn test_create_issue_with_missing_required_fields() {
    let router = test_router().await;

    let (status, body) = send(&router, Method::POST, "/api/issues/apitest", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "required field(s) missing");

    // An empty string counts as missing too.
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/issues/apitest",
        Some(json!({"issue_title": "", "issue_text": "x", "created_by": "y"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "required field(s) missing");

    // Nothing was persisted.
    let (_, body) = send(&router, Method::GET, "/api/issues/apitest", None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_issues_in_insertion_order() {
    let router = test_router().await;
    for title in ["first", "second", "third"] {
        create_issue(
            &router,
            "apitest",
            json!({"issue_title": title, "issue_text": "x", "created_by": "alice"}),
        )
        .await;
    }

    let (status, body) = send(&router, Method::GET, "/api/issues/apitest", None).await;
    assert_eq!(status, StatusCode::OK);

    let issues = body.as_array().unwrap();
    assert_eq!(issues.len(), 3);
    let titles: Vec<_> = issues.iter().map(|i| i["issue_title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["first", "second", "third"]);
    for issue in issues {
        assert!(issue["_id"].is_string());
    }
}

#[tokio::test]
async fn test_list_unknown_project_returns_empty_array() {
    let router = test_router().await;
    let (status, body) = send(&router, Method::GET, "/api/issues/never-seen", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_issues_with_one_filter() {
    let router = test_router().await;
    create_issue(
        &router,
        "apitest",
        json!({"issue_title": "a", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    create_issue(
        &router,
        "apitest",
        json!({"issue_title": "b", "issue_text": "x", "created_by": "bob"}),
    )
    .await;

    let (_, body) = send(&router, Method::GET, "/api/issues/apitest?created_by=alice", None).await;
    let issues = body.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["issue_title"], "a");
}

#[tokio::test]
async fn test_list_issues_with_multiple_filters() {
    let router = test_router().await;
    create_issue(
        &router,
        "apitest",
        json!({"issue_title": "a", "issue_text": "x", "created_by": "alice", "assigned_to": "carol"}),
    )
    .await;
    create_issue(
        &router,
        "apitest",
        json!({"issue_title": "b", "issue_text": "x", "created_by": "alice", "assigned_to": "dan"}),
    )
    .await;
    create_issue(
        &router,
        "apitest",
        json!({"issue_title": "c", "issue_text": "x", "created_by": "bob", "assigned_to": "carol"}),
    )
    .await;

    let (_, body) = send(
        &router,
        Method::GET,
        "/api/issues/apitest?created_by=alice&assigned_to=carol",
        None,
    )
    .await;
    let issues = body.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["issue_title"], "a");
}

#[tokio::test]
async fn test_list_filter_is_case_insensitive() {
    let router = test_router().await;
    create_issue(
        &router,
        "apitest",
        json!({"issue_title": "a", "issue_text": "x", "created_by": "Alice"}),
    )
    .await;

    let (_, body) = send(&router, Method::GET, "/api/issues/apitest?created_by=ALICE", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_filter_on_unknown_field_matches_nothing() {
    let router = test_router().await;
    create_issue(
        &router,
        "apitest",
        json!({"issue_title": "a", "issue_text": "x", "created_by": "alice"}),
    )
    .await;

    let (status, body) = send(&router, Method::GET, "/api/issues/apitest?severity=high", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update_one_field() {
    let router = test_router().await;
    let created = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "Original", "issue_text": "x", "created_by": "alice", "assigned_to": "bob"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap().to_string();

    // Make sure the refreshed timestamp lands on a later millisecond.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": id, "issue_title": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "successfully updated");
    assert_eq!(body["_id"], id);

    let (_, body) = send(&router, Method::GET, "/api/issues/apitest", None).await;
    let issue = &body.as_array().unwrap()[0];
    assert_eq!(issue["issue_title"], "Renamed");
    // Everything else is untouched.
    assert_eq!(issue["issue_text"], "x");
    assert_eq!(issue["created_by"], "alice");
    assert_eq!(issue["assigned_to"], "bob");
    assert_eq!(issue["open"], true);
    assert_eq!(issue["created_on"], created["created_on"]);

    let before = chrono::DateTime::parse_from_rfc3339(created["updated_on"].as_str().unwrap()).unwrap();
    let after = chrono::DateTime::parse_from_rfc3339(issue["updated_on"].as_str().unwrap()).unwrap();
    assert!(after > before, "updated_on must advance past {before}");
}

#[tokio::test]
async fn test_update_multiple_fields() {
    let router = test_router().await;
    let created = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "t", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    let (_, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({
            "_id": id,
            "issue_text": "rewritten",
            "assigned_to": "carol",
            "status_text": "qa"
        })),
    )
    .await;
    assert_eq!(body["result"], "successfully updated");

    let (_, body) = send(&router, Method::GET, "/api/issues/apitest", None).await;
    let issue = &body.as_array().unwrap()[0];
    assert_eq!(issue["issue_text"], "rewritten");
    assert_eq!(issue["assigned_to"], "carol");
    assert_eq!(issue["status_text"], "qa");
    assert_eq!(issue["issue_title"], "t");
}

#[tokio::test]
async fn test_update_with_missing_id() {
    let router = test_router().await;
    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"issue_title": "no id here"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "missing _id"}));
}

#[tokio::test]
async fn test_update_with_no_fields_to_update() {
    let router = test_router().await;
    let created = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "t", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "no update field(s) sent");
    assert_eq!(body["_id"], *id);

    // Empty strings and open:false count as nothing sent.
    let (_, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": id, "issue_title": "", "open": false})),
    )
    .await;
    assert_eq!(body["error"], "no update field(s) sent");
}

#[tokio::test]
async fn test_update_with_unknown_but_valid_id() {
    let router = test_router().await;
    let ghost = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": ghost, "issue_title": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "could not update", "_id": ghost}));
}

#[tokio::test]
async fn test_update_with_malformed_id_never_hits_the_store() {
    let router = test_router().await;
    let (status, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": "definitely-not-an-id", "issue_title": "nope"})),
    )
    .await;
    // Malformed ids answer in-band, not with a server error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "could not update");
    assert_eq!(body["_id"], "definitely-not-an-id");
}

#[tokio::test]
async fn test_update_open_true_closes_the_issue() {
    let router = test_router().await;
    let created = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "t", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    // Long-standing wire quirk: clients close an issue by sending
    // open:true. Pinned here so it never drifts.
    let (_, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": id, "open": true})),
    )
    .await;
    assert_eq!(body["result"], "successfully updated");

    let (_, body) = send(&router, Method::GET, "/api/issues/apitest", None).await;
    assert_eq!(body.as_array().unwrap()[0]["open"], false);
}

#[tokio::test]
async fn test_update_clears_optional_field_sent_empty() {
    let router = test_router().await;
    let created = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "t", "issue_text": "x", "created_by": "alice", "assigned_to": "bob"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    let (_, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": id, "issue_title": "kept", "assigned_to": ""})),
    )
    .await;
    assert_eq!(body["result"], "successfully updated");

    let (_, body) = send(&router, Method::GET, "/api/issues/apitest", None).await;
    let issue = &body.as_array().unwrap()[0];
    assert_eq!(issue["assigned_to"], "");
    assert_eq!(issue["issue_title"], "kept");
}

#[tokio::test]
async fn test_update_echoes_id_verbatim() {
    let router = test_router().await;
    let created = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "t", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    let upper = created["_id"].as_str().unwrap().to_uppercase();

    let (_, body) = send(
        &router,
        Method::PUT,
        "/api/issues/apitest",
        Some(json!({"_id": upper, "status_text": "qa"})),
    )
    .await;
    assert_eq!(body["result"], "successfully updated");
    assert_eq!(body["_id"], upper);
}

#[tokio::test]
async fn test_delete_an_issue() {
    let router = test_router().await;
    let keep = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "keep", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    let doomed = create_issue(
        &router,
        "apitest",
        json!({"issue_title": "doomed", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    let id = doomed["_id"].as_str().unwrap();

    let (status, body) = send(
        &router,
        Method::DELETE,
        "/api/issues/apitest",
        Some(json!({"_id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "successfully deleted", "_id": id}));

    // The sibling survives.
    let (_, body) = send(&router, Method::GET, "/api/issues/apitest", None).await;
    let issues = body.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["_id"], keep["_id"]);

    // Deleting again fails in-band.
    let (status, body) = send(
        &router,
        Method::DELETE,
        "/api/issues/apitest",
        Some(json!({"_id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "could not delete", "_id": id}));
}

#[tokio::test]
async fn test_delete_with_malformed_id() {
    let router = test_router().await;
    let (status, body) = send(
        &router,
        Method::DELETE,
        "/api/issues/apitest",
        Some(json!({"_id": "garbage"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "could not delete", "_id": "garbage"}));
}

#[tokio::test]
async fn test_delete_with_missing_id() {
    let router = test_router().await;

    let (status, body) = send(&router, Method::DELETE, "/api/issues/apitest", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "missing _id"}));

    // Even with no body at all.
    let (status, body) = send(&router, Method::DELETE, "/api/issues/apitest", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"error": "missing _id"}));
}

#[tokio::test]
async fn test_projects_are_isolated() {
    let router = test_router().await;
    let created = create_issue(
        &router,
        "alpha",
        json!({"issue_title": "a", "issue_text": "x", "created_by": "alice"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap();

    // The issue is invisible from another project.
    let (_, body) = send(&router, Method::GET, "/api/issues/beta", None).await;
    assert_eq!(body, json!([]));

    // And unreachable for mutation through it.
    let (_, body) = send(
        &router,
        Method::DELETE,
        "/api/issues/beta",
        Some(json!({"_id": id})),
    )
    .await;
    assert_eq!(body["error"], "could not delete");
}
