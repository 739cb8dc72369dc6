use async_trait::async_trait;
use bookshelf_http::{AppError, AppResult};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use super::models::{Book, CreateBookDto, UpdateBookDto};
use super::service::BookService;

/// Book service keeping the catalog in process memory.
///
/// Records are listed in insertion order.
#[derive(Default)]
pub struct InMemoryBookService {
    books: RwLock<Vec<Book>>,
}

impl InMemoryBookService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of records
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }

    /// Load the sample catalog, skipping titles that are already present.
    pub async fn seed_demo_data(&self) -> usize {
        let mut books = self.books.write().await;
        let mut added = 0;

        for sample in demo_catalog() {
            if books.iter().any(|book| book.title == sample.title) {
                continue;
            }
            books.push(Book::new(new_id(), OffsetDateTime::now_utc(), sample));
            added += 1;
        }

        added
    }
}

#[async_trait]
impl BookService for InMemoryBookService {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.books.read().await.clone())
    }

    async fn find_one(&self, id: &str) -> AppResult<Book> {
        self.books
            .read()
            .await
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, body: CreateBookDto) -> AppResult<Book> {
        body.validate()?;

        let book = Book::new(new_id(), OffsetDateTime::now_utc(), body);
        self.books.write().await.push(book.clone());

        tracing::debug!(book_id = %book.id, "book created");
        Ok(book)
    }

    async fn update(&self, id: &str, body: UpdateBookDto) -> AppResult<Book> {
        body.validate()?;

        let mut books = self.books.write().await;
        let slot = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| not_found(id))?;

        let updated = slot.with_changes(body, OffsetDateTime::now_utc());
        *slot = updated.clone();

        tracing::debug!(book_id = %id, "book updated");
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> AppResult<()> {
        let mut books = self.books.write().await;
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| not_found(id))?;

        books.remove(index);

        tracing::debug!(book_id = %id, "book removed");
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("book '{}' not found", id))
}

fn demo_catalog() -> Vec<CreateBookDto> {
    [("Harry Potter", 3), ("Narnia", 1), ("Interstellar", 5)]
        .into_iter()
        .map(|(title, quantity)| CreateBookDto {
            title: title.to_string(),
            author: "Celso".to_string(),
            genre: "Adventure".to_string(),
            quantity,
            is_available: true,
            locality: "University".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(title: &str) -> CreateBookDto {
        CreateBookDto {
            title: title.to_string(),
            author: "Celso".to_string(),
            genre: "RPG".to_string(),
            quantity: 1,
            is_available: true,
            locality: "University".to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let service = InMemoryBookService::new();
        let before = OffsetDateTime::now_utc();

        let book = service.create(body("Senhore dos Aneis")).await.unwrap();

        assert!(Uuid::parse_str(&book.id).is_ok());
        assert!(book.update_at >= before);
        assert_eq!(book.title, "Senhore dos Aneis");
        assert_eq!(service.find_one(&book.id).await.unwrap(), book);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let service = InMemoryBookService::new();
        for title in ["Harry Potter", "Narnia", "Interstellar"] {
            service.create(body(title)).await.unwrap();
        }

        let titles: Vec<String> = service
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();

        assert_eq!(titles, ["Harry Potter", "Narnia", "Interstellar"]);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let service = InMemoryBookService::new();

        let err = service.find_one("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = service
            .update("missing", UpdateBookDto::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = service.remove("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_replaces_only_supplied_fields() {
        let service = InMemoryBookService::new();
        let book = service.create(body("Senhore dos Aneis")).await.unwrap();

        let updated = service
            .update(
                &book.id,
                UpdateBookDto {
                    title: Some("Senhore dos Aneis as Duas Torres".to_string()),
                    ..UpdateBookDto::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, book.id);
        assert_eq!(updated.title, "Senhore dos Aneis as Duas Torres");
        assert_eq!(updated.genre, "RPG");
        assert!(updated.update_at >= book.update_at);
        assert_eq!(service.find_one(&book.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn remove_deletes_the_record() {
        let service = InMemoryBookService::new();
        let keep = service.create(body("Narnia")).await.unwrap();
        let gone = service.create(body("Interstellar")).await.unwrap();

        service.remove(&gone.id).await.unwrap();

        assert_eq!(service.find_all().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let service = InMemoryBookService::new();

        let err = service.create(body(" ")).await.unwrap_err();
        match err {
            AppError::Validation { details, .. } => {
                assert_eq!(details, vec![json!({"field": "title", "error": "must not be blank"})]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(service.is_empty().await);
    }

    #[tokio::test]
    async fn blank_update_leaves_the_record_untouched() {
        let service = InMemoryBookService::new();
        let book = service.create(body("Narnia")).await.unwrap();

        let err = service
            .update(
                &book.id,
                UpdateBookDto {
                    title: Some(" ".to_string()),
                    locality: Some(String::new()),
                    quantity: Some(9),
                    ..UpdateBookDto::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            AppError::Validation { details, .. } => {
                assert_eq!(
                    details,
                    vec![
                        json!({"field": "locality", "error": "must not be blank"}),
                        json!({"field": "title", "error": "must not be blank"}),
                    ]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(service.find_one(&book.id).await.unwrap(), book);
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let service = InMemoryBookService::new();

        assert_eq!(service.seed_demo_data().await, 3);
        assert_eq!(service.seed_demo_data().await, 0);
        assert_eq!(service.len().await, 3);
    }
}
