//! Integration tests for `HttpQueryService` against an in-process stub of the
//! query service. Each test binds its own server on an ephemeral port.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use talkql_client::{HttpQueryService, QueryService, ServiceError};
use talkql_core::{ResponseModes, TurnRequest};

// =============================================================================
// Helpers
// =============================================================================

/// Serve `router` on 127.0.0.1 and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Echoes the request fields back so tests can check the wire body.
async fn echo_query(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "query_used": "SELECT * FROM users",
        "query_result": format!(
            "{}|{}|{}",
            body["query"].as_str().unwrap_or_default(),
            body["vizEnabled"],
            body["tabularMode"]
        ),
        "viz_result": { "kind": "bar", "points": [1, 2, 3] }
    }))
}

fn healthy_service() -> Router {
    Router::new()
        .route(
            "/check-connection",
            get(|| async {
                Json(json!({
                    "is_connected": true,
                    "db_type": "postgres",
                    "database_name": "shop"
                }))
            }),
        )
        .route("/query", post(echo_query))
        .route("/disconnect-database", post(|| async { StatusCode::OK }))
}

// =============================================================================
// Happy paths
// =============================================================================

#[tokio::test]
async fn test_check_connection_connected() {
    let base = spawn(healthy_service()).await;
    let service = HttpQueryService::new(base);

    let status = service.check_connection().await.unwrap();
    assert!(status.is_connected);
    assert_eq!(status.db_type.as_deref(), Some("postgres"));
    assert_eq!(status.database_name.as_deref(), Some("shop"));
}

#[tokio::test]
async fn test_check_connection_not_connected() {
    let router = Router::new().route(
        "/check-connection",
        get(|| async { Json(json!({ "is_connected": false })) }),
    );
    let base = spawn(router).await;
    let service = HttpQueryService::new(base);

    let status = service.check_connection().await.unwrap();
    assert!(!status.is_connected);
    assert!(status.database_name.is_none());
}

#[tokio::test]
async fn test_query_sends_wire_body_and_parses_reply() {
    let base = spawn(healthy_service()).await;
    let service = HttpQueryService::new(format!("{}/", base));

    let modes = ResponseModes {
        visualization: true,
        tabular: false,
    };
    let reply = service
        .query(&TurnRequest::new("list users", modes))
        .await
        .unwrap();

    assert_eq!(reply.query_used.as_deref(), Some("SELECT * FROM users"));
    assert_eq!(reply.query_result, "list users|true|false");
    assert_eq!(
        reply.visualization_payload,
        Some(json!({ "kind": "bar", "points": [1, 2, 3] }))
    );
}

#[tokio::test]
async fn test_disconnect_success() {
    let base = spawn(healthy_service()).await;
    let service = HttpQueryService::new(base);
    assert!(service.disconnect().await.is_ok());
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_query_rejection_carries_detail() {
    let router = Router::new().route(
        "/query",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "No database connection" })),
            )
        }),
    );
    let base = spawn(router).await;
    let service = HttpQueryService::new(base);

    let err = service
        .query(&TurnRequest::new("anything", ResponseModes::default()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Rejected {
            status: 400,
            detail: Some("No database connection".to_string()),
        }
    );
}

#[tokio::test]
async fn test_query_rejection_without_body() {
    let router = Router::new().route(
        "/query",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
    );
    let base = spawn(router).await;
    let service = HttpQueryService::new(base);

    let err = service
        .query(&TurnRequest::new("anything", ResponseModes::default()))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Rejected {
            status: 500,
            detail: None,
        }
    );
    assert_eq!(err.detail(), None);
}

#[tokio::test]
async fn test_query_malformed_success_reply() {
    let router = Router::new().route(
        "/query",
        post(|| async { Json(json!({ "query_used": "SELECT 1" })) }),
    );
    let base = spawn(router).await;
    let service = HttpQueryService::new(base);

    let err = service
        .query(&TurnRequest::new("anything", ResponseModes::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Malformed(_)));
    assert!(err.detail().unwrap().contains("query_result"));
}

#[tokio::test]
async fn test_disconnect_rejected() {
    let router = Router::new().route(
        "/disconnect-database",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({ "detail": "Nothing to disconnect" })),
            )
        }),
    );
    let base = spawn(router).await;
    let service = HttpQueryService::new(base);

    let err = service.disconnect().await.unwrap_err();
    assert_eq!(err.detail(), Some("Nothing to disconnect"));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = HttpQueryService::new(format!("http://{}", addr));
    let err = service.check_connection().await.unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)));
    assert!(err.detail().is_some());
}

#[tokio::test]
async fn test_unknown_route_is_rejected() {
    let base = spawn(Router::new()).await;
    let service = HttpQueryService::new(base);

    let err = service.check_connection().await.unwrap_err();
    assert!(matches!(err, ServiceError::Rejected { status: 404, .. }));
}
