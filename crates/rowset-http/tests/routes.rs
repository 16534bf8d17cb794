use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use rowset_core::{CorsSettings, DatabaseSettings, Settings, IDENTIFIER_ROUTE, ROOT_ROUTE};
use rowset_http::{apply_layers, axum_route, HttpResult, ListQuery, PageResponse};
use rowset_orm::{
    get_or_fail, paginate_request, session_scope, Filter, MemoryStore, Model, OrderBy, Page,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceExt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Book {
    id: i64,
    title: String,
}

impl Model for Book {
    fn table_name() -> &'static str {
        "books"
    }
}

#[derive(Clone)]
struct AppState {
    store: MemoryStore,
    settings: Settings,
}

async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> HttpResult<PageResponse<Book>> {
    let request = query.resolve(&state.settings).order_by(OrderBy::asc("id"));
    let page: Page<Book> = session_scope(&state.store, |session| {
        Box::pin(async move { paginate_request::<Book, _>(session, request).await })
    })
    .await?;
    Ok(Json(page))
}

async fn get_book(State(state): State<AppState>, Path(identifier): Path<i64>) -> HttpResult<Json<Book>> {
    let book = session_scope(&state.store, |session| {
        Box::pin(async move { get_or_fail::<Book, _>(session, vec![Filter::eq("id", identifier)]).await })
    })
    .await?;
    Ok(Json(book))
}

fn settings() -> Settings {
    Settings {
        project_name: "library".to_string(),
        default_limit: 3,
        default_offset: 0,
        cors: CorsSettings {
            enabled: true,
            allow_origins: Some(vec!["https://example.com".to_string()]),
            allow_methods: Some(vec!["GET".to_string()]),
            allow_headers: None,
        },
        database: DatabaseSettings {
            host: "localhost".to_string(),
            port: 5432,
            driver: "postgresql".to_string(),
            user: "app".to_string(),
            password: "secret".to_string(),
            name: "library".to_string(),
        },
    }
}

fn app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    for id in 1..=8 {
        store
            .insert("books", json!({"id": id, "title": format!("Volume {}", id)}))
            .unwrap();
    }

    let settings = settings();
    let books = Router::new()
        .route(&axum_route(ROOT_ROUTE), get(list_books))
        .route(&axum_route(IDENTIFIER_ROUTE), get(get_book));
    let router = Router::new().nest("/books", books).with_state(AppState {
        store: store.clone(),
        settings: settings.clone(),
    });

    (apply_layers(router, &settings).unwrap(), store)
}

async fn send(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_list_uses_configured_defaults() {
    let (router, _) = app();
    let (status, body) = send(router, "/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 8);
    assert_eq!(body["count"], 3);
    assert_eq!(body["limit"], 3);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["results"][0], json!({"id": 1, "title": "Volume 1"}));
}

#[tokio::test]
async fn test_list_window_from_query_string() {
    let (router, store) = app();
    let (status, body) = send(router, "/books?offset=6&limit=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][1]["id"], 8);
    assert_eq!(store.commits(), 1);
}

#[tokio::test]
async fn test_negative_limit_is_bad_request() {
    let (router, store) = app();
    let (status, body) = send(router, "/books?limit=-1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["detail"],
        "Invalid argument: limit must be non-negative, got -1"
    );
    assert!(store.executed().is_empty());
    assert_eq!(store.rollbacks(), 1);
}

#[tokio::test]
async fn test_get_by_identifier() {
    let (router, _) = app();
    let (status, body) = send(router, "/books/5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 5, "title": "Volume 5"}));
}

#[tokio::test]
async fn test_missing_identifier_is_not_found() {
    let (router, store) = app();
    let (status, body) = send(router, "/books/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Book not found: id = 42");
    assert_eq!(store.rollbacks(), 1);
    assert_eq!(store.released(), 1);
}

#[tokio::test]
async fn test_backend_failure_is_opaque() {
    let (router, store) = app();
    store.fail_next("connection refused");
    let (status, body) = send(router, "/books").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let (router, _) = app();
    let response = router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/books")
                .header("origin", "https://example.com")
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://example.com"
    );
}
