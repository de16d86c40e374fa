//! In-memory integration tests for the `/projects` routes.

use super::helpers::{app, create_project, create_task, names, send, task_body};
use axum::{
    Router,
    http::{Method, StatusCode},
};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_project_is_listed_with_wire_field_names(app: Router) {
    let id = create_project(
        &app,
        json!({ "name": "Alpha", "description": "First", "dueDate": "2024-04-01" }),
    )
    .await;

    let response = send(&app, Method::GET, "/projects", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let listed = response.body()[0].clone();
    assert_eq!(listed["id"], json!(id));
    assert_eq!(listed["name"], json!("Alpha"));
    assert_eq!(listed["description"], json!("First"));
    assert_eq!(listed["startDate"], json!(null));
    assert!(listed["dueDate"].as_str().is_some_and(|due| due.starts_with("2024-04-01")));
}

#[rstest]
#[case::missing_body(None)]
#[case::blank_name(Some(json!({ "name": "   " })))]
#[tokio::test(flavor = "multi_thread")]
async fn project_without_name_is_a_bad_request(
    app: Router,
    #[case] body: Option<serde_json::Value>,
) {
    let response = send(&app, Method::POST, "/projects", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = response.body()["error"].as_str().unwrap_or_default();
    assert!(error.contains("name"), "unexpected error: {error}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_project_name_is_a_bad_request(app: Router) {
    create_project(&app, json!({ "name": "Dup" })).await;

    let response = send(&app, Method::POST, "/projects", Some(json!({ "name": "Dup" }))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let listed = send(&app, Method::GET, "/projects", None).await;
    assert_eq!(names(listed.body()), vec!["Dup".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_project_date_is_a_bad_request(app: Router) {
    let response = send(
        &app,
        Method::POST,
        "/projects",
        Some(json!({ "name": "Alpha", "startDate": "next tuesday" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_project_fields(app: Router) {
    let id = create_project(&app, json!({ "name": "Alpha", "description": "Old" })).await;

    let response = send(
        &app,
        Method::PUT,
        &format!("/projects/{id}"),
        Some(json!({ "name": "Alpha v2" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body()["message"], json!("Project updated"));
    let listed = send(&app, Method::GET, "/projects", None).await;
    assert_eq!(listed.body()[0]["name"], json!("Alpha v2"));
    assert_eq!(listed.body()[0]["description"], json!(null));
}

#[rstest]
#[case::unknown_id("/projects/7b0c8f0e-2d7f-4a8e-9d55-0f3c1c6e9a11")]
#[case::malformed_id("/projects/not-a-uuid")]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_project_is_not_found(app: Router, #[case] target: &'static str) {
    let response = send(&app, Method::PUT, target, Some(json!({ "name": "Ghost" }))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_unassigns_project_tasks(app: Router) {
    let project_id = create_project(&app, json!({ "name": "Alpha" })).await;
    let task_id = create_task(&app, task_body("T1", "to-do")).await;
    let assigned = send(
        &app,
        Method::POST,
        "/projects/assignTask",
        Some(json!({ "taskId": task_id, "projectId": project_id })),
    )
    .await;
    assert_eq!(assigned.status(), StatusCode::OK);

    let deleted = send(&app, Method::DELETE, &format!("/projects/{project_id}"), None).await;

    assert_eq!(deleted.status(), StatusCode::OK);
    assert_eq!(deleted.body()["unassignedTasks"], json!(1));
    let tasks = send(&app, Method::GET, "/tasks", None).await;
    assert_eq!(tasks.body()[0]["projectId"], json!(null));
    let again = send(&app, Method::DELETE, &format!("/projects/{project_id}"), None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_an_assigned_task_is_a_bad_request(app: Router) {
    let alpha = create_project(&app, json!({ "name": "Alpha" })).await;
    let beta = create_project(&app, json!({ "name": "Beta" })).await;
    let task_id = create_task(&app, task_body("T1", "to-do")).await;
    send(
        &app,
        Method::POST,
        "/projects/assignTask",
        Some(json!({ "taskId": task_id, "projectId": alpha })),
    )
    .await;

    let response = send(
        &app,
        Method::POST,
        "/projects/assignTask",
        Some(json!({ "taskId": task_id, "projectId": beta })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assign_with_missing_ids_is_a_bad_request(app: Router) {
    let response = send(&app, Method::POST, "/projects/assignTask", Some(json!({}))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_task_between_projects(app: Router) {
    let alpha = create_project(&app, json!({ "name": "Alpha" })).await;
    let beta = create_project(&app, json!({ "name": "Beta" })).await;
    let task_id = create_task(&app, task_body("T1", "to-do")).await;
    send(
        &app,
        Method::POST,
        "/projects/assignTask",
        Some(json!({ "taskId": task_id, "projectId": alpha })),
    )
    .await;

    let moved = send(
        &app,
        Method::POST,
        "/projects/moveTask",
        Some(json!({ "taskId": task_id, "fromProjectId": alpha, "toProjectId": beta })),
    )
    .await;
    let stale = send(
        &app,
        Method::POST,
        "/projects/moveTask",
        Some(json!({ "taskId": task_id, "fromProjectId": alpha, "toProjectId": beta })),
    )
    .await;

    assert_eq!(moved.status(), StatusCode::OK);
    assert_eq!(
        moved.body()["message"],
        json!("Task successfully moved to the target project")
    );
    assert_eq!(stale.status(), StatusCode::NOT_FOUND);
    let in_beta = send(&app, Method::GET, "/projects/filterTasks?projectName=Beta", None).await;
    assert_eq!(names(in_beta.body()), vec!["T1".to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filter_tasks_by_unknown_project_is_not_found(app: Router) {
    let response = send(&app, Method::GET, "/projects/filterTasks?projectName=Nope", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sort_projects_puts_missing_dates_first(app: Router) {
    create_project(&app, json!({ "name": "Late", "startDate": "2024-05-01" })).await;
    create_project(&app, json!({ "name": "Undated" })).await;
    create_project(&app, json!({ "name": "Early", "startDate": "2024-01-01" })).await;

    let sorted = send(&app, Method::GET, "/projects/sort?field=startDate", None).await;
    let rejected = send(&app, Method::GET, "/projects/sort?field=name", None).await;

    assert_eq!(sorted.status(), StatusCode::OK);
    assert_eq!(
        names(sorted.body()),
        vec!["Undated".to_owned(), "Early".to_owned(), "Late".to_owned()]
    );
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_with_tasks_due_today_embed_all_their_tasks(app: Router) {
    let empty = send(&app, Method::GET, "/projects/projectWithTask", None).await;
    assert_eq!(empty.status(), StatusCode::NOT_FOUND);

    let project_id = create_project(&app, json!({ "name": "Alpha" })).await;
    let mut due_today = task_body("Due", "to-do");
    due_today["dueDate"] = json!("2024-03-09T12:00:00Z");
    due_today["projectId"] = json!(project_id);
    let mut later = task_body("Later", "to-do");
    later["projectId"] = json!(project_id);
    create_task(&app, due_today).await;
    create_task(&app, later).await;

    let response = send(&app, Method::GET, "/projects/projectWithTask", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let entry = response.body()[0].clone();
    assert_eq!(entry["name"], json!("Alpha"));
    let mut task_names = names(&entry["tasks"]);
    task_names.sort();
    assert_eq!(task_names, vec!["Due".to_owned(), "Later".to_owned()]);
}

#[rstest]
#[case::unknown_path(Method::GET, "/milestones")]
#[case::wrong_method(Method::PATCH, "/projects")]
#[tokio::test(flavor = "multi_thread")]
async fn unrouted_requests_are_not_found(
    app: Router,
    #[case] method: Method,
    #[case] target: &'static str,
) {
    let response = send(&app, method, target, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = response.body()["error"].as_str().unwrap_or_default();
    assert!(error.starts_with("no route for"), "unexpected error: {error}");
}
