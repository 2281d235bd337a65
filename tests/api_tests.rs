mod common;

use reqwest::StatusCode;
use serde_json::json;

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(resp.text().await.unwrap(), "ok");

    common::cleanup(app).await;
}

// ── Service key guard ───────────────────────────────────────────

#[tokio::test]
async fn requests_without_service_key_rejected() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/api/v1/projects"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .client
        .get(app.url("/api/v1/projects"))
        .bearer_auth("wrong-key-wrong-key-wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .client
        .post(app.url("/functions/v1/webhooks"))
        .json(&json!({ "action": "list" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn apikey_header_accepted() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/api/v1/projects"))
        .header("apikey", common::SERVICE_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    common::cleanup(app).await;
}

// ── Kanban columns ──────────────────────────────────────────────

#[tokio::test]
async fn kanban_columns_crud() {
    let app = common::spawn_app().await;

    let board = app.create_board().await;
    let (list, status) = app.get("/api/v1/kanban/columns").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Backlog", "Doing", "Review", "Done", "Cancelled"]);

    let review_id = board[2]["id"].as_str().unwrap();
    let (updated, status) = app
        .put(
            &format!("/api/v1/kanban/columns/{review_id}"),
            &json!({ "title": "QA", "position": 2, "color": "#ffcc00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "QA");
    assert_eq!(updated["color"], "#ffcc00");

    let (_, status) = app
        .delete(&format!("/api/v1/kanban/columns/{review_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (list, _) = app.get("/api/v1/kanban/columns").await;
    assert_eq!(list.as_array().unwrap().len(), 4);

    common::cleanup(app).await;
}

#[tokio::test]
async fn column_cannot_be_completion_and_cancellation() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .post(
            "/api/v1/kanban/columns",
            &json!({ "title": "Both", "is_completion": true, "is_cancellation": true }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("cannot be both"));

    common::cleanup(app).await;
}

// ── Projects & stages ───────────────────────────────────────────

#[tokio::test]
async fn projects_crud_with_soft_delete() {
    let app = common::spawn_app().await;

    let project = app.create_project("Acme ERP").await;
    let id = project["id"].as_str().unwrap();
    assert_eq!(project["status"], "planned");
    assert_eq!(project["is_active"], true);

    let (fetched, status) = app.get(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Acme ERP");

    let (updated, status) = app
        .put(
            &format!("/api/v1/projects/{id}"),
            &json!({
                "name": "Acme ERP v2",
                "total_value": 2500.0,
                "start_date": "2026-01-05",
                "end_date": "2026-03-31",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Acme ERP v2");
    assert_eq!(updated["start_date"], "2026-01-05");

    let (_, status) = app.delete(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app.get(&format!("/api/v1/projects/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (list, _) = app.get("/api/v1/projects").await;
    assert!(list.as_array().unwrap().is_empty());

    common::cleanup(app).await;
}

#[tokio::test]
async fn project_dates_validated() {
    let app = common::spawn_app().await;

    let (_, status) = app
        .post(
            "/api/v1/projects",
            &json!({ "name": "Backwards", "start_date": "2026-05-01", "end_date": "2026-04-01" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app.post("/api/v1/projects", &json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn stages_crud_in_position_order() {
    let app = common::spawn_app().await;

    let project = app.create_project("Website").await;
    let project_id = project["id"].as_str().unwrap();

    app.create_stage(project_id, "Launch", 2).await;
    let design = app.create_stage(project_id, "Design", 0).await;
    app.create_stage(project_id, "Build", 1).await;

    let names: Vec<String> = app
        .stages(project_id)
        .await
        .iter()
        .filter_map(|s| s["name"].as_str().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Design", "Build", "Launch"]);
    assert_eq!(design["completed"], false);
    assert_eq!(design["status"], "pending");

    let design_id = design["id"].as_str().unwrap();
    let (updated, status) = app
        .put(
            &format!("/api/v1/stages/{design_id}"),
            &json!({ "name": "UX Design", "position": 0, "value": 450.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "UX Design");
    assert_eq!(updated["value"], 450.0);

    let (_, status) = app.delete(&format!("/api/v1/stages/{design_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stages(project_id).await.len(), 2);

    common::cleanup(app).await;
}

#[tokio::test]
async fn stage_for_missing_project_is_not_found() {
    let app = common::spawn_app().await;

    let (_, status) = app
        .post(
            &format!("/api/v1/projects/{}/stages", uuid::Uuid::now_v7()),
            &json!({ "name": "Orphan" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn deleting_missing_stage_or_column_is_not_found() {
    let app = common::spawn_app().await;

    let project = app.create_project("Website").await;
    let stage = app
        .create_stage(project["id"].as_str().unwrap(), "Design", 0)
        .await;
    let stage_path = format!("/api/v1/stages/{}", stage["id"].as_str().unwrap());

    let (_, status) = app.delete(&stage_path).await;
    assert_eq!(status, StatusCode::OK);
    let (_, status) = app.delete(&stage_path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let column = app.create_column("Backlog", 0, (false, false)).await;
    let column_path = format!("/api/v1/kanban/columns/{}", column["id"].as_str().unwrap());

    let (_, status) = app.delete(&column_path).await;
    assert_eq!(status, StatusCode::OK);
    let (_, status) = app.delete(&column_path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

// ── Tasks ───────────────────────────────────────────────────────

#[tokio::test]
async fn tasks_crud() {
    let app = common::spawn_app().await;

    let (task, status) = app
        .post(
            "/api/v1/tasks",
            &json!({
                "title": "Kickoff",
                "content": "Prepare agenda",
                "checklist": [{ "title": "Book room" }, { "title": "Send invite", "done": true }],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "todo");
    assert_eq!(task["checklist"][0]["done"], false);
    assert_eq!(task["checklist"][1]["done"], true);

    let id = task["id"].as_str().unwrap();
    let (updated, status) = app
        .put(
            &format!("/api/v1/tasks/{id}"),
            &json!({ "title": "Kickoff", "status": "in_progress", "checklist": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");

    let (_, status) = app
        .put(
            &format!("/api/v1/tasks/{id}"),
            &json!({ "title": "Kickoff", "status": "someday" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (list, _) = app.get("/api/v1/tasks").await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    common::cleanup(app).await;
}

// ── Chat rooms ──────────────────────────────────────────────────

#[tokio::test]
async fn deleted_chat_room_disappears_from_list() {
    let app = common::spawn_app().await;

    let (general, status) = app
        .post("/api/v1/chat/rooms", &json!({ "name": "General" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    app.post("/api/v1/chat/rooms", &json!({ "name": "Finance" }))
        .await;

    let general_id = general["id"].as_str().unwrap();
    let (_, status) = app
        .delete(&format!("/api/v1/chat/rooms/{general_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (rooms, status) = app.get("/api/v1/chat/rooms").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = rooms
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Finance"]);

    // Row is kept, only deactivated
    let active: bool = sqlx::query_scalar("SELECT is_active FROM chat_rooms WHERE id = $1")
        .bind(uuid::Uuid::parse_str(general_id).unwrap())
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(!active);

    // Deleting again is a 404
    let (_, status) = app
        .delete(&format!("/api/v1/chat/rooms/{general_id}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}
