mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;

use catalog_api::{
    CatalogApiError, Client, CredentialStore, Id, LoginCredentials, MemoryCredentials,
    ProductFields,
};
use common::{FakeBackend, Reply};

fn widget() -> serde_json::Value {
    json!({"id": "42", "name": "Widget", "price": 9.99, "stock": 3})
}

fn id(raw: &str) -> Id {
    raw.parse().unwrap()
}

async fn logged_in(backend: &FakeBackend) -> (Client, Arc<MemoryCredentials>) {
    backend.on(
        Method::POST,
        "/login",
        Reply::Json(
            StatusCode::OK,
            json!({"token": "T1", "user": {"id": 1, "email": "a@b.com"}}),
        ),
    );
    let store = Arc::new(MemoryCredentials::new());
    let client = backend.client(store.clone());
    client
        .login(&LoginCredentials::new("a@b.com", "x"))
        .await
        .unwrap();
    (client, store)
}

#[tokio::test]
async fn test_login_stores_token_and_user() {
    let backend = FakeBackend::start().await;
    let (client, store) = logged_in(&backend).await;

    assert_eq!(store.get().as_deref(), Some("T1"));
    let user = client.session().current().user.expect("user after login");
    assert_eq!(user.id, Id::from(1));
    assert_eq!(user.email, "a@b.com");

    let request = backend.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/login");
    assert_eq!(request.body, Some(json!({"email": "a@b.com", "password": "x"})));
    assert_eq!(request.authorization, None);
}

#[tokio::test]
async fn test_login_accepts_wrapped_response() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/login",
        Reply::Json(
            StatusCode::OK,
            json!({"data": {"token": "T2", "user": {"id": "u-9", "email": "c@d.com", "name": "Cy"}}}),
        ),
    );
    let client = backend.client(Arc::new(MemoryCredentials::new()));

    let user = client
        .login(&LoginCredentials::new("c@d.com", "pw"))
        .await
        .unwrap();

    assert_eq!(user.name.as_deref(), Some("Cy"));
    assert_eq!(client.session().token().as_deref(), Some("T2"));
}

#[tokio::test]
async fn test_failed_login_leaves_session_absent() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/login",
        Reply::Json(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "These credentials do not match our records."}),
        ),
    );
    let store = Arc::new(MemoryCredentials::new());
    let client = backend.client(store.clone());

    let err = client
        .login(&LoginCredentials::new("a@b.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogApiError::ValidationRejected { .. }));
    assert_eq!(client.session().current().user, None);
    assert_eq!(store.get(), None);
}

#[tokio::test]
async fn test_bearer_header_follows_the_store() {
    let backend = FakeBackend::start().await;
    backend.on(Method::GET, "/products", Reply::Json(StatusCode::OK, json!([])));
    let store = Arc::new(MemoryCredentials::new());
    let client = backend.client(store.clone());

    client.list_products().await.unwrap();
    let request = backend.last_request();
    assert_eq!(request.authorization, None);
    assert_eq!(request.accept.as_deref(), Some("application/json"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));

    store.set("abc").unwrap();
    client.list_products().await.unwrap();
    assert_eq!(
        backend.last_request().authorization.as_deref(),
        Some("Bearer abc")
    );

    store.clear().unwrap();
    client.list_products().await.unwrap();
    assert_eq!(backend.last_request().authorization, None);
}

#[tokio::test]
async fn test_empty_token_is_never_sent() {
    let backend = FakeBackend::start().await;
    backend.on(Method::GET, "/products", Reply::Json(StatusCode::OK, json!([])));
    let client = backend.client(Arc::new(MemoryCredentials::with_token("")));

    client.list_products().await.unwrap();
    assert_eq!(backend.last_request().authorization, None);
}

#[tokio::test]
async fn test_get_product_bare_and_wrapped_are_identical() {
    let backend = FakeBackend::start().await;
    let client = backend.client(Arc::new(MemoryCredentials::new()));

    backend.on(Method::GET, "/products/42", Reply::Json(StatusCode::OK, widget()));
    let bare = client.get_product(&id("42")).await.unwrap();

    backend.on(
        Method::GET,
        "/products/42",
        Reply::Json(StatusCode::OK, json!({"data": widget()})),
    );
    let wrapped = client.get_product(&id("42")).await.unwrap();

    assert_eq!(bare, wrapped);
    assert_eq!(serde_json::to_value(&bare).unwrap(), widget());
}

#[tokio::test]
async fn test_list_products_unwraps_paginated_collection() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::GET,
        "/products",
        Reply::Json(
            StatusCode::OK,
            json!({"data": [widget()], "links": {}, "meta": {"total": 1}}),
        ),
    );
    let client = backend.client(Arc::new(MemoryCredentials::new()));

    let products = client.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Widget");
}

#[tokio::test]
async fn test_create_product_coerces_textual_numbers() {
    let backend = FakeBackend::start().await;
    backend.on(Method::POST, "/products", Reply::Json(StatusCode::CREATED, widget()));
    let (client, _store) = logged_in(&backend).await;

    let created = client
        .create_product(ProductFields::new("Widget", "A widget", "9.99", "3"))
        .await
        .unwrap();

    assert_eq!(created.id, "42");
    let request = backend.last_request();
    assert_eq!(request.authorization.as_deref(), Some("Bearer T1"));
    assert_eq!(
        request.body,
        Some(json!({"name": "Widget", "description": "A widget", "price": 9.99, "stock": 3}))
    );
}

#[tokio::test]
async fn test_create_product_validation_rejected() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/products",
        Reply::Json(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"message": "Invalid price", "errors": {"price": ["Invalid price"]}}),
        ),
    );
    let (client, _store) = logged_in(&backend).await;

    let err = client
        .create_product(ProductFields::new("", "d", -1, 0))
        .await
        .unwrap_err();

    match err {
        CatalogApiError::ValidationRejected {
            status,
            message,
            errors,
        } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(message.as_deref(), Some("Invalid price"));
            assert_eq!(errors["price"], vec!["Invalid price".to_string()]);
        }
        other => panic!("expected ValidationRejected, got {other:?}"),
    }
    assert_eq!(
        backend.last_request().body,
        Some(json!({"name": "", "description": "d", "price": -1, "stock": 0}))
    );
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_update_product_puts_fields() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::PUT,
        "/products/42",
        Reply::Json(StatusCode::OK, json!({"data": widget()})),
    );
    let (client, _store) = logged_in(&backend).await;

    let fields = ProductFields::new("Widget", "A widget", 9.99, 3).stock("abc");
    client.update_product(&id("42"), fields).await.unwrap();

    let request = backend.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.body.unwrap()["stock"], json!("abc"));
}

#[tokio::test]
async fn test_delete_product_no_content() {
    let backend = FakeBackend::start().await;
    backend.on(Method::DELETE, "/products/42", Reply::Empty(StatusCode::NO_CONTENT));
    let (client, _store) = logged_in(&backend).await;

    client.delete_product(&id("42")).await.unwrap();

    let request = backend.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn test_unauthorized_delete_logs_out() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::DELETE,
        "/products/42",
        Reply::Json(StatusCode::UNAUTHORIZED, json!({"message": "Unauthenticated."})),
    );
    let (client, store) = logged_in(&backend).await;

    let err = client.delete_product(&id("42")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.message(), Some("Unauthenticated."));
    assert_eq!(client.session().current().user, None);
    assert_eq!(store.get(), None);
}

#[tokio::test]
async fn test_forbidden_on_any_operation_logs_out() {
    let backend = FakeBackend::start().await;
    backend.on(Method::GET, "/products", Reply::Empty(StatusCode::FORBIDDEN));
    let (client, _store) = logged_in(&backend).await;
    let view = client.session().clone();

    let err = client.list_products().await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert!(!view.is_authenticated());
}

#[tokio::test]
async fn test_not_found_is_distinct() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::GET,
        "/products/9",
        Reply::Json(StatusCode::NOT_FOUND, json!({"message": "Product not found"})),
    );
    let (client, _store) = logged_in(&backend).await;

    let err = client.get_product(&id("9")).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.message(), Some("Product not found"));
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::GET,
        "/products",
        Reply::Raw(StatusCode::INTERNAL_SERVER_ERROR, "Whoops"),
    );
    let client = backend.client(Arc::new(MemoryCredentials::new()));

    let err = client.list_products().await.unwrap_err();

    assert!(matches!(err, CatalogApiError::Server { message: None, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_bodies() {
    let backend = FakeBackend::start().await;
    let client = backend.client(Arc::new(MemoryCredentials::new()));

    backend.on(Method::GET, "/products", Reply::Raw(StatusCode::OK, "<html></html>"));
    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, CatalogApiError::MalformedResponse(_)));

    backend.on(
        Method::GET,
        "/products",
        Reply::Json(StatusCode::OK, json!({"products": []})),
    );
    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, CatalogApiError::MalformedResponse(_)));

    backend.on(Method::GET, "/products/42", Reply::Empty(StatusCode::OK));
    let err = client.get_product(&id("42")).await.unwrap_err();
    assert!(matches!(err, CatalogApiError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_transport_failure_keeps_session() {
    let store = Arc::new(MemoryCredentials::new());
    let client = Client::with_http_client(common::http_client(), "http://127.0.0.1:1/api", store);
    client
        .session()
        .establish(
            "T1",
            serde_json::from_value(json!({"id": 1, "email": "a@b.com"})).unwrap(),
        )
        .unwrap();

    let err = client.list_products().await.unwrap_err();

    assert!(matches!(err, CatalogApiError::Transport(_)));
    assert!(err.is_retryable());
    assert_eq!(err.status(), None);
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_sends_token_then_clears() {
    let backend = FakeBackend::start().await;
    backend.on(Method::POST, "/logout", Reply::Empty(StatusCode::NO_CONTENT));
    let (client, store) = logged_in(&backend).await;

    client.logout().await.unwrap();

    assert_eq!(
        backend.last_request().authorization.as_deref(),
        Some("Bearer T1")
    );
    assert_eq!(store.get(), None);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_even_when_remote_fails() {
    let backend = FakeBackend::start().await;
    backend.on(
        Method::POST,
        "/logout",
        Reply::Raw(StatusCode::SERVICE_UNAVAILABLE, "down"),
    );
    let (client, store) = logged_in(&backend).await;

    let remote = client.logout().await;

    assert!(matches!(remote, Err(CatalogApiError::Server { .. })));
    assert_eq!(store.get(), None);
    assert_eq!(client.session().current().user, None);
}

#[tokio::test]
async fn test_logout_clears_when_unreachable() {
    let store = Arc::new(MemoryCredentials::with_token("T1"));
    let client = Client::with_http_client(
        common::http_client(),
        "http://127.0.0.1:1/api/",
        store.clone(),
    );

    assert!(client.logout().await.is_err());
    assert_eq!(store.get(), None);
    assert_eq!(client.base_url(), "http://127.0.0.1:1/api");
}
