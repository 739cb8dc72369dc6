pub mod controller;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use serde_json::json;
use utoipa::PartialSchema;

use controller::BookController;
use service::BookService;
use store::InMemoryBookService;

/// Book catalog module: CRUD over `/api/books`
pub struct BooksModule {
    store: Arc<InMemoryBookService>,
    controller: BookController,
}

impl BooksModule {
    /// Wire the controller to the given in-memory service
    pub fn new(store: Arc<InMemoryBookService>) -> Self {
        let service: Arc<dyn BookService> = store.clone();
        Self {
            store,
            controller: BookController::new(service),
        }
    }

    pub fn controller(&self) -> &BookController {
        &self.controller
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryBookService::new()))
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.books.seed_demo_data {
            let added = self.store.seed_demo_data().await;
            tracing::info!(module = self.name(), added, "seeded demo catalog");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.controller.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.store.len().await;
        tracing::info!(module = self.name(), books, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn schema_ref(name: &str) -> serde_json::Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn json_content(schema: serde_json::Value) -> serde_json::Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": json_content(schema_ref("ErrorResponse"))
    })
}

fn id_parameter() -> serde_json::Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book identifier",
        "schema": { "type": "string" }
    }])
}

fn openapi_fragment() -> serde_json::Value {
    let schema = |s: utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>| {
        serde_json::to_value(s).unwrap_or_default()
    };

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "List of books",
                            "content": json_content(json!({
                                "type": "array",
                                "items": schema_ref("Book")
                            }))
                        },
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": json_content(schema_ref("CreateBookDto"))
                    },
                    "responses": {
                        "201": {
                            "description": "Book created",
                            "content": json_content(schema_ref("Book"))
                        },
                        "400": error_response("Malformed request body"),
                        "422": error_response("Validation error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "200": {
                            "description": "The book",
                            "content": json_content(schema_ref("Book"))
                        },
                        "404": error_response("Book not found")
                    }
                },
                "patch": {
                    "summary": "Update a book",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "requestBody": {
                        "required": true,
                        "content": json_content(schema_ref("UpdateBookDto"))
                    },
                    "responses": {
                        "200": {
                            "description": "Updated book",
                            "content": json_content(schema_ref("Book"))
                        },
                        "400": error_response("Malformed request body"),
                        "404": error_response("Book not found"),
                        "422": error_response("Validation error")
                    }
                },
                "delete": {
                    "summary": "Remove a book",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "204": { "description": "Book removed" },
                        "404": error_response("Book not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": schema(models::Book::schema()),
                "CreateBookDto": schema(models::CreateBookDto::schema()),
                "UpdateBookDto": schema(models::UpdateBookDto::schema())
            }
        }
    })
}

/// Create the books module backed by a fresh in-memory catalog
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::default())
}
