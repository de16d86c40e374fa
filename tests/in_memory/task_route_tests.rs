//! In-memory integration tests for the `/tasks` routes.

use super::helpers::{app, create_project, create_task, names, send, task_body};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use rstest::rstest;
use serde_json::json;
use tower::ServiceExt;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn done_task_is_stamped_at_creation(app: Router) {
    create_task(&app, task_body("Shipped", "done")).await;

    let response = send(&app, Method::GET, "/tasks", None).await;

    let task = response.body()[0].clone();
    assert_eq!(task["status"], json!("done"));
    assert_eq!(task["doneDate"], task["createdDate"]);
    assert_eq!(task["startDate"], task["createdDate"]);
    assert_eq!(task["projectId"], json!(null));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_missing_fields_lists_them(app: Router) {
    let response = send(
        &app,
        Method::POST,
        "/tasks",
        Some(json!({ "name": "T1", "status": "to-do" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = response.body()["error"].as_str().unwrap_or_default();
    assert!(error.contains("description"), "unexpected error: {error}");
    assert!(error.contains("dueDate"), "unexpected error: {error}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_is_a_bad_request(app: Router) {
    let response = send(&app, Method::POST, "/tasks", Some(task_body("T1", "blocked"))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_task_name_is_a_bad_request(app: Router) {
    create_task(&app, task_body("T1", "to-do")).await;

    let response = send(&app, Method::POST, "/tasks", Some(task_body("T1", "to-do"))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_for_unknown_project_is_not_found(app: Router) {
    let mut body = task_body("T1", "to-do");
    body["projectId"] = json!("7b0c8f0e-2d7f-4a8e-9d55-0f3c1c6e9a11");

    let response = send(&app, Method::POST, "/tasks", Some(body)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_task_fields(app: Router) {
    let id = create_task(&app, task_body("T1", "to-do")).await;
    let mut replacement = task_body("T1 renamed", "in-progress");
    replacement["description"] = json!("Rewritten");

    let response = send(&app, Method::PUT, &format!("/tasks/{id}"), Some(replacement)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body()["message"], json!("Task updated"));
    let listed = send(&app, Method::GET, "/tasks", None).await;
    let task = listed.body()[0].clone();
    assert_eq!(task["name"], json!("T1 renamed"));
    assert_eq!(task["description"], json!("Rewritten"));
    assert_eq!(task["status"], json!("in-progress"));
    assert_eq!(task["doneDate"], json!(null));
}

#[rstest]
#[case::unknown_id("/tasks/7b0c8f0e-2d7f-4a8e-9d55-0f3c1c6e9a11")]
#[case::malformed_id("/tasks/42")]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_task_is_not_found(app: Router, #[case] target: &'static str) {
    let response = send(&app, Method::PUT, target, Some(task_body("Ghost", "to-do"))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_task_once(app: Router) {
    let id = create_task(&app, task_body("T1", "to-do")).await;

    let first = send(&app, Method::DELETE, &format!("/tasks/{id}"), None).await;
    let second = send(&app, Method::DELETE, &format!("/tasks/{id}"), None).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.body()["message"], json!("Task deleted"));
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filter_by_status_needs_a_value_and_tolerates_unknown_ones(app: Router) {
    create_task(&app, task_body("Open", "to-do")).await;
    create_task(&app, task_body("Closed", "done")).await;

    let done = send(&app, Method::GET, "/tasks/filter?status=done", None).await;
    let unknown = send(&app, Method::GET, "/tasks/filter?status=later", None).await;
    let missing = send(&app, Method::GET, "/tasks/filter", None).await;

    assert_eq!(names(done.body()), vec!["Closed".to_owned()]);
    assert_eq!(unknown.status(), StatusCode::OK);
    assert_eq!(unknown.body(), &json!([]));
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filter_by_status_decodes_the_query(app: Router) {
    create_task(&app, task_body("Started", "in-progress")).await;

    let response = send(&app, Method::GET, "/tasks/filter?status=in%2Dprogress", None).await;

    assert_eq!(names(response.body()), vec!["Started".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_name_fragments_ignoring_case(app: Router) {
    create_task(&app, task_body("Write Report", "to-do")).await;
    create_task(&app, task_body("Review code", "to-do")).await;

    let response = send(&app, Method::GET, "/tasks/search?name=REPORT", None).await;

    assert_eq!(names(response.body()), vec!["Write Report".to_owned()]);
}

#[rstest]
#[case::percent_encoded("/tasks/search?name=big%20job")]
#[case::plus_encoded("/tasks/search?name=big+job")]
#[tokio::test(flavor = "multi_thread")]
async fn search_decodes_encoded_spaces(app: Router, #[case] target: &'static str) {
    create_task(&app, task_body("Big job", "to-do")).await;
    create_task(&app, task_body("Bigger", "to-do")).await;

    let response = send(&app, Method::GET, target, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(response.body()), vec!["Big job".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_json_body_is_a_bad_request(app: Router) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .expect("request should build");

    let response = app.oneshot(request).await.expect("router is infallible");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sort_tasks_by_due_date(app: Router) {
    let mut later = task_body("Later", "to-do");
    later["dueDate"] = json!("2024-06-01");
    create_task(&app, later).await;
    create_task(&app, task_body("Sooner", "to-do")).await;

    let sorted = send(&app, Method::GET, "/tasks/sort?field=dueDate", None).await;
    let rejected = send(&app, Method::GET, "/tasks/sort?field=createdAt", None).await;

    assert_eq!(
        names(sorted.body()),
        vec!["Sooner".to_owned(), "Later".to_owned()]
    );
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_with_project_due_today_embed_the_project(app: Router) {
    let empty = send(&app, Method::GET, "/tasks/taskWithProject", None).await;
    assert_eq!(empty.status(), StatusCode::NOT_FOUND);

    let due = create_project(&app, json!({ "name": "Due", "dueDate": "2024-03-09T12:00:00Z" })).await;
    let later = create_project(&app, json!({ "name": "Later", "dueDate": "2024-04-09" })).await;
    let mut in_due = task_body("In due", "to-do");
    in_due["projectId"] = json!(due);
    let mut in_later = task_body("In later", "to-do");
    in_later["projectId"] = json!(later);
    create_task(&app, in_due).await;
    create_task(&app, in_later).await;

    let response = send(&app, Method::GET, "/tasks/taskWithProject", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(response.body()), vec!["In due".to_owned()]);
    assert_eq!(response.body()[0]["project"]["name"], json!("Due"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_status_reports_the_new_status(app: Router) {
    let id = create_task(&app, task_body("T1", "to-do")).await;

    let response = send(
        &app,
        Method::PATCH,
        "/tasks/changeStatus",
        Some(json!({ "taskId": id, "newStatus": "in-progress" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.body()["message"],
        json!("Task status updated to in-progress")
    );
    assert_eq!(response.body()["taskId"], json!(id));
    let listed = send(&app, Method::GET, "/tasks", None).await;
    assert!(listed.body()[0]["startDate"].is_string());
    assert_eq!(listed.body()[0]["doneDate"], json!(null));
}

#[rstest]
#[case::missing_status(json!({ "taskId": "7b0c8f0e-2d7f-4a8e-9d55-0f3c1c6e9a11" }))]
#[case::unknown_status(json!({
    "taskId": "7b0c8f0e-2d7f-4a8e-9d55-0f3c1c6e9a11",
    "newStatus": "paused",
}))]
#[tokio::test(flavor = "multi_thread")]
async fn change_status_rejects_invalid_bodies(app: Router, #[case] body: serde_json::Value) {
    let response = send(&app, Method::PATCH, "/tasks/changeStatus", Some(body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_status_without_new_status_names_the_field(app: Router) {
    let id = create_task(&app, task_body("T1", "to-do")).await;

    let response = send(
        &app,
        Method::PATCH,
        "/tasks/changeStatus",
        Some(json!({ "taskId": id })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = response.body()["error"].as_str().unwrap_or_default();
    assert!(error.contains("newStatus"), "unexpected error: {error}");
}
