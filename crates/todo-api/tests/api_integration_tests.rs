use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use todo_api::app;
use tower::ServiceExt;

// リクエストを送り、ステータスと JSON 本文（空なら Null）を返すヘルパー
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

/// 作成 → 一覧 → 更新 → 一覧 → 削除 → 一覧
#[tokio::test]
async fn test_buy_milk_round_trip() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/todos",
        Some(json!({"title": "Buy milk", "description": "2%"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["description"], "2%");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, list) = send(&app, "GET", "/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0], created);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/todos/{id}"),
        Some(json!({"title": "Buy milk", "description": "whole"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["description"], "whole");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (_, list) = send(&app, "GET", "/todos", None).await;
    assert_eq!(list[0]["description"], "whole");

    let (status, body) = send(&app, "DELETE", &format!("/todos/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, list) = send(&app, "GET", "/todos", None).await;
    assert!(!ids(&list).contains(&id));
}

#[tokio::test]
async fn test_list_after_n_creates_has_n_records() {
    let app = app();

    let mut created = Vec::new();
    for n in 0..5 {
        let (status, todo) = send(&app, "POST", "/todos", Some(json!({"title": format!("task {n}")}))).await;
        assert_eq!(status, StatusCode::CREATED);
        created.push(todo["id"].as_str().unwrap().to_string());
    }

    let (_, list) = send(&app, "GET", "/todos", None).await;
    created.reverse();
    assert_eq!(ids(&list), created);
}

#[tokio::test]
async fn test_not_found_leaves_collection_unchanged() {
    let app = app();
    let (_, kept) = send(&app, "POST", "/todos", Some(json!({"title": "keep"}))).await;
    let (_, gone) = send(&app, "POST", "/todos", Some(json!({"title": "gone"}))).await;
    let gone_id = gone["id"].as_str().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/todos/{gone_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // 2 回目の削除と削除済み ID の更新は 404
    let (status, body) = send(&app, "DELETE", &format!("/todos/{gone_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Todo not found"}));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/todos/{gone_id}"),
        Some(json!({"title": "revived"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, "GET", "/todos", None).await;
    assert_eq!(list, json!([kept]));
}
