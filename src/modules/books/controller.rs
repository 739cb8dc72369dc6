use std::sync::Arc;

use bookshelf_http::AppResult;

use super::models::{Book, CreateBookDto, UpdateBookDto};
use super::service::BookService;

/// Entry point for book requests. Each operation makes exactly one service
/// call and hands its outcome back untouched.
#[derive(Clone)]
pub struct BookController {
    service: Arc<dyn BookService>,
}

impl BookController {
    pub fn new(service: Arc<dyn BookService>) -> Self {
        Self { service }
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_all(&self) -> AppResult<Vec<Book>> {
        self.service.find_all().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_one(&self, id: &str) -> AppResult<Book> {
        self.service.find_one(id).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn create(&self, body: CreateBookDto) -> AppResult<Book> {
        self.service.create(body).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn update(&self, id: &str, body: UpdateBookDto) -> AppResult<Book> {
        self.service.update(id, body).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> AppResult<()> {
        self.service.remove(id).await
    }
}
