//! HTTP handlers for the books module. Every handler maps a request onto one
//! controller call; failures become `AppError` responses unchanged.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_http::{ApiJson, AppResult};

use super::controller::BookController;
use super::models::{Book, CreateBookDto, UpdateBookDto};

/// Build the module router with the controller as shared state
pub fn router(controller: BookController) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .with_state(controller)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(controller): State<BookController>) -> AppResult<Json<Vec<Book>>> {
    let books = controller.find_all().await?;
    Ok(Json(books))
}

async fn get_book(
    State(controller): State<BookController>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = controller.find_one(&id).await?;
    Ok(Json(book))
}

async fn create_book(
    State(controller): State<BookController>,
    ApiJson(body): ApiJson<CreateBookDto>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = controller.create(body).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(controller): State<BookController>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateBookDto>,
) -> AppResult<Json<Book>> {
    let book = controller.update(&id, body).await?;
    Ok(Json(book))
}

async fn delete_book(
    State(controller): State<BookController>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    controller.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::{
        service::{BookService, MockBookService},
        store::InMemoryBookService,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        response::Response,
    };
    use bookshelf_http::AppError;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn in_memory() -> (Arc<InMemoryBookService>, Router) {
        let service = Arc::new(InMemoryBookService::new());
        let router = router(BookController::new(service.clone()));
        (service, router)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn lord_of_the_rings() -> serde_json::Value {
        serde_json::json!({
            "title": "Senhore dos Aneis",
            "author": "Celso",
            "genre": "RPG",
            "quantity": 1,
            "isAvailable": true,
            "locality": "University"
        })
    }

    #[tokio::test]
    async fn post_creates_book() {
        let (service, router) = in_memory();

        let response = router
            .oneshot(json_request("POST", "/", lord_of_the_rings()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["title"], "Senhore dos Aneis");
        assert!(body["id"].is_string());
        assert!(body["updateAt"].is_string());
        assert_eq!(service.len().await, 1);
    }

    #[tokio::test]
    async fn post_with_missing_field_is_rejected_before_the_service() {
        let mut service = MockBookService::new();
        service.expect_create().never();
        let router = router(BookController::new(Arc::new(service)));

        let mut body = lord_of_the_rings();
        body.as_object_mut().unwrap().remove("genre");
        let response = router
            .oneshot(json_request("POST", "/", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "validation_error");
        assert!(body["error"]["trace_id"].is_string());
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let mut service = MockBookService::new();
        service.expect_update().never();
        let router = router(BookController::new(Arc::new(service)));

        let request = Request::builder()
            .method("PATCH")
            .uri("/570b218d-3572-4a68-8e36-776f966da3bc")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title": "#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn body_without_content_type_is_a_bad_request() {
        let mut service = MockBookService::new();
        service.expect_create().never();
        let router = router(BookController::new(Arc::new(service)));

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(lord_of_the_rings().to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn blank_title_is_reported_per_field() {
        let (service, router) = in_memory();

        let mut body = lord_of_the_rings();
        body["title"] = serde_json::json!("   ");
        let response = router
            .oneshot(json_request("POST", "/", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["details"][0]["field"], "title");
        assert_eq!(body["error"]["details"][0]["error"], "must not be blank");
        assert!(service.is_empty().await);
    }

    #[tokio::test]
    async fn get_lists_books_in_order() {
        let (service, router) = in_memory();
        service.seed_demo_data().await;

        let response = router.oneshot(empty_request("GET", "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let titles: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|book| book["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Harry Potter", "Narnia", "Interstellar"]);
    }

    #[tokio::test]
    async fn get_unknown_book_is_not_found() {
        let (_, router) = in_memory();

        let response = router
            .oneshot(empty_request("GET", "/570b218d-3572-4a68-8e36-776f966da3bc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn patch_updates_and_delete_removes() {
        let (service, router) = in_memory();
        let created = service
            .create(serde_json::from_value(lord_of_the_rings()).unwrap())
            .await
            .unwrap();
        let uri = format!("/{}", created.id);

        let response = router
            .clone()
            .oneshot(json_request(
                "PATCH",
                &uri,
                serde_json::json!({ "title": "Senhore dos Aneis as Duas Torres" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], "Senhore dos Aneis as Duas Torres");
        assert_eq!(body["genre"], "RPG");

        let response = router
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let response = router.oneshot(empty_request("GET", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn service_failure_becomes_internal_error() {
        let mut service = MockBookService::new();
        service
            .expect_find_all()
            .times(1)
            .returning(|| Err(AppError::Internal(anyhow::anyhow!("disk on fire"))));
        let router = router(BookController::new(Arc::new(service)));

        let response = router.oneshot(empty_request("GET", "/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "internal_error");
    }

    #[tokio::test]
    async fn health_route_is_not_captured_by_id() {
        let mut service = MockBookService::new();
        service.expect_find_one().never();
        let router = router(BookController::new(Arc::new(service)));

        let response = router
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
