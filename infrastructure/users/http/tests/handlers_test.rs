use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use common_errors::{PROBLEM_CONTENT_TYPE, ProblemDetails};
use database_traits::{DocumentCollection, SharedCollection};
use serde_json::{Value, json};
use test_utils::*;
use tower::ServiceExt;
use user_http::{UserHandlers, UserServices};
use user_validation::ValidationService;

fn app(collection: SharedCollection) -> Router {
    UserHandlers::routes()
        .with_state(UserServices::new(collection, ValidationService::default()))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn problem(response: Response) -> ProblemDetails {
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(content_type.as_deref(), Some(PROBLEM_CONTENT_TYPE));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_user_lifecycle() {
    let collection = shared_memory_collection();

    let response = app(collection.clone())
        .oneshot(empty_request(Method::GET, "/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let response = app(collection.clone())
        .oneshot(json_request(
            Method::POST,
            "/users",
            json!({ "name": "Alice" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap();
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Alice");
    assert_eq!(location, format!("/users/{id}"));

    let response = app(collection.clone())
        .oneshot(empty_request(Method::GET, &location))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "id": id, "name": "Alice" }));

    let response = app(collection.clone())
        .oneshot(json_request(
            Method::PUT,
            &format!("/users/{id}"),
            json!({ "name": "Alicia" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "id": id, "name": "Alicia" }));

    let response = app(collection.clone())
        .oneshot(empty_request(Method::GET, "/users/all"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{ "id": id, "name": "Alicia" }])
    );

    let response = app(collection.clone())
        .oneshot(empty_request(Method::DELETE, &format!("/users/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "id": id, "name": "Alicia" }));

    let response = app(collection)
        .oneshot(empty_request(Method::GET, &format!("/users/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_returns_stored_users() {
    let collection = shared_memory_collection();
    let ids = create_test_users(collection.as_ref()).await.unwrap();

    let response = app(collection)
        .oneshot(empty_request(Method::GET, "/users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let users = body_json(response).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 3);
    for id in ids {
        assert!(users.iter().any(|user| user["id"] == id.as_str()));
    }
}

#[tokio::test]
async fn test_missing_user_is_problem_not_found() {
    let collection = shared_memory_collection();
    let id = missing_user_id();

    for request in [
        empty_request(Method::GET, &format!("/users/{id}")),
        empty_request(Method::DELETE, &format!("/users/{id}")),
        json_request(
            Method::PUT,
            &format!("/users/{id}"),
            json!({ "name": "Nobody" }),
        ),
    ] {
        let response = app(collection.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let problem = problem(response).await;
        assert_eq!(problem.status, 404);
        assert_eq!(problem.title, "Not Found");
        assert!(problem.detail.is_none());
    }

    assert!(collection.scan().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_user_validation_failure() {
    let collection = shared_memory_collection();

    for body in [json!({}), json!({ "name": "" }), json!({ "name": "   " })] {
        let response = app(collection.clone())
            .oneshot(json_request(Method::POST, "/users", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let problem = problem(response).await;
        assert_eq!(problem.status, 400);
        assert_eq!(problem.title, "Validation Failed");
        assert_eq!(problem.detail.as_deref(), Some("Name is required."));
    }

    assert!(collection.scan().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_user_validation_failure_keeps_document() {
    let collection = shared_memory_collection();
    let id = create_test_user(collection.as_ref()).await.unwrap();

    let response = app(collection.clone())
        .oneshot(json_request(
            Method::PUT,
            &format!("/users/{id}"),
            json!({ "name": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(problem(response).await.title, "Validation Failed");

    let stored = collection.get(&id).await.unwrap();
    assert_eq!(stored.content["name"], "Test User");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let collection = shared_memory_collection();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app(collection.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let problem = problem(response).await;
    assert_eq!(problem.title, "Bad Request");
    assert!(problem.detail.is_some());
    assert!(collection.scan().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .body(Body::from(json!({ "name": "Alice" }).to_string()))
        .unwrap();

    let response = app(shared_memory_collection())
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(problem(response).await.title, "Bad Request");
}

#[tokio::test]
async fn test_store_failure_is_internal_server_error() {
    let collection = unavailable_collection();

    for request in [
        empty_request(Method::GET, "/users"),
        empty_request(Method::GET, &format!("/users/{}", missing_user_id())),
        json_request(Method::POST, "/users", json!({ "name": "Alice" })),
    ] {
        let response = app(collection.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let problem = problem(response).await;
        assert_eq!(problem.status, 500);
        assert_eq!(problem.title, "Internal Server Error");
        assert!(problem.detail.is_none());
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app(shared_memory_collection())
        .oneshot(empty_request(Method::GET, "/accounts"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
