//! HTTP API（axum）
//!
//! `/todos` の CRUD 4 エンドポイントと `/health` を提供します。
//! エラー本文はすべて `{"message": ...}` 形式です。

pub mod error;
pub mod handlers;

use axum::http::{header, Method};
use axum::{
    routing::{get, put},
    Router,
};
use infrastructure::{InMemoryTodoRepository, TodoRepository};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorBody};

/// InMemory ストアでルータを構築（ローカル確認用）
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// 外部から状態を注入できる版
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/:id",
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// ブラウザからの利用を想定し、全オリジンを許可
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryTodoRepository::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use domain::Todo;
    use tower::ServiceExt; // for `oneshot`

    fn app_with_store() -> (Router, Arc<InMemoryTodoRepository>) {
        let store = Arc::new(InMemoryTodoRepository::default());
        let app = app_with_state(AppState::new(store.clone()));
        (app, store)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_health_returns_ok() {
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn post_todos_returns_201_with_server_assigned_id() {
        let (app, store) = app_with_store();

        let body = serde_json::json!({"title": "Buy milk", "description": "2%"});
        let response = app.oneshot(json_request("POST", "/todos", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["description"], "2%");
        assert_eq!(json["id"].as_str().unwrap().len(), 26);
        assert!(json["createdAt"].is_string());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn post_todos_ignores_client_supplied_id() {
        let (app, _store) = app_with_store();

        let body = serde_json::json!({"id": "mine", "title": "A"});
        let response = app.oneshot(json_request("POST", "/todos", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_ne!(body_json(response).await["id"], "mine");
    }

    #[tokio::test]
    async fn post_todos_without_title_is_400_and_not_stored() {
        let (app, store) = app_with_store();

        for body in [
            serde_json::json!({"description": "no title"}),
            serde_json::json!({"title": "", "description": "empty"}),
            serde_json::json!({"title": "   "}),
        ] {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/todos", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["message"], "Title is required");
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn post_todos_with_malformed_json_is_400() {
        let (app, store) = app_with_store();

        let request = Request::builder()
            .method("POST")
            .uri("/todos")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = body_json(response).await["message"].as_str().unwrap().to_string();
        assert!(message.starts_with("Invalid JSON"), "{message}");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn get_todos_returns_newest_first() {
        let (app, _store) = app_with_store();

        for title in ["A", "B", "C"] {
            let resp = app
                .clone()
                .oneshot(json_request("POST", "/todos", serde_json::json!({"title": title})))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let request = Request::builder().method("GET").uri("/todos").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let todos: Vec<Todo> = serde_json::from_slice(&bytes).unwrap();
        let titles: Vec<String> = todos.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn put_unknown_or_malformed_id_is_404() {
        let (app, store) = app_with_store();
        let body = serde_json::json!({"title": "x"});

        let unknown = format!("/todos/{}", domain::TodoId::new());
        for uri in [unknown.as_str(), "/todos/not-a-ulid"] {
            let response = app
                .clone()
                .oneshot(json_request("PUT", uri, body.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_json(response).await["message"], "Todo not found");
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn put_with_blank_title_is_400_and_keeps_record() {
        let (app, store) = app_with_store();
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/todos", serde_json::json!({"title": "Keep"})))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/todos/{id}"),
                serde_json::json!({"title": " ", "description": "d"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let todos = store.list_all().await.unwrap();
        assert_eq!(todos[0].title, "Keep");
    }

    #[tokio::test]
    async fn delete_unknown_id_is_404() {
        let (app, _store) = app_with_store();

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/todos/{}", domain::TodoId::new()))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Todo not found");
    }

    #[tokio::test]
    async fn cors_preflight_is_allowed() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/todos")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "PUT")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
