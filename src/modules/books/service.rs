use async_trait::async_trait;
use bookshelf_http::AppResult;

use super::models::{Book, CreateBookDto, UpdateBookDto};

/// Persistence-backed operations on the book catalog.
///
/// The service owns id generation and timestamps; callers only ever see
/// snapshots it hands back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookService: Send + Sync {
    /// Every record, in the service's order
    async fn find_all(&self) -> AppResult<Vec<Book>>;
    async fn find_one(&self, id: &str) -> AppResult<Book>;
    async fn create(&self, body: CreateBookDto) -> AppResult<Book>;
    /// Replace the supplied fields and return the new snapshot
    async fn update(&self, id: &str, body: UpdateBookDto) -> AppResult<Book>;
    async fn remove(&self, id: &str) -> AppResult<()>;
}
