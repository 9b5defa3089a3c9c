pub mod fixtures;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod validation;
pub mod view;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use once_cell::sync::OnceCell;
use serde_json::json;
use stacks_authz::KeyedTokenIssuer;
use stacks_kernel::{InitCtx, Migration, Module};

use routes::BooksState;
use service::ListingService;
use store::SqliteBookStore;

/// Library catalog: listing, search and record maintenance under `/books`.
pub struct BooksModule {
    state: OnceCell<BooksState>,
}

impl BooksModule {
    pub const fn new() -> Self {
        Self {
            state: OnceCell::new(),
        }
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    /// Routes carry their own `/books` prefix so `/books/` keeps its trailing slash.
    fn mount_path(&self) -> String {
        "/".to_string()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let store = SqliteBookStore::new(Arc::clone(ctx.db));
        let tokens = KeyedTokenIssuer::new(ctx.settings.auth.csrf_secret.as_bytes());
        let state = BooksState {
            service: Arc::new(ListingService::new(Arc::new(store), Arc::new(tokens))),
            catalog: ctx.settings.catalog.clone(),
        };

        if self.state.set(state).is_err() {
            anyhow::bail!("books module initialized twice");
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            default_page_size = ctx.settings.catalog.default_page_size,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        match self.state.get() {
            Some(state) => routes::router(state.clone()),
            None => {
                tracing::error!(module = self.name(), "routes requested before init; mounting none");
                Router::new()
            }
        }
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/books/list": {
                    "get": {
                        "summary": "Listing fragments",
                        "description": "With `ajax`, the `#books-container` and `#pagination-container` fragments for the clamped page; otherwise a redirect to the full page.",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "page", "in": "query", "schema": { "type": "integer", "default": 1 } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer", "default": 10 } },
                            { "name": "ajax", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "HTML fragment pair",
                                "content": { "text/html": { "schema": { "type": "string" } } }
                            },
                            "303": { "description": "Redirect to the full listing page" }
                        }
                    }
                },
                "/books/search": {
                    "get": {
                        "summary": "Search books by title, author or ISBN",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "q", "in": "query", "schema": { "type": "string" } },
                            { "name": "ajax", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Every match, ordered by title",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SearchEnvelope" }
                                    }
                                }
                            },
                            "500": {
                                "description": "Search failed",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/SearchEnvelope" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/books/{id}": {
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "requestBody": {
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "_token": { "type": "string" } },
                                        "required": ["_token"]
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Deleted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ActionEnvelope" }
                                    }
                                }
                            },
                            "403": {
                                "description": "Invalid anti-forgery token; nothing deleted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ActionEnvelope" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "BookView": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "publicationDate": { "type": "string", "format": "date" },
                            "genre": { "type": "string" },
                            "copies": { "type": "integer", "minimum": 0 },
                            "csrfToken": {
                                "type": "string",
                                "description": "Authorizes deleting this book from the current session"
                            }
                        },
                        "required": ["id", "title", "author", "isbn", "publicationDate", "genre", "copies", "csrfToken"]
                    },
                    "SearchEnvelope": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "results": { "type": "array", "items": { "$ref": "#/components/schemas/BookView" } },
                            "count": { "type": "integer" },
                            "message": { "type": "string" },
                            "searchTerm": { "type": "string" }
                        },
                        "required": ["success", "searchTerm"]
                    },
                    "ActionEnvelope": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "id": { "type": "string" },
                            "message": { "type": "string" },
                            "errors": {
                                "type": "object",
                                "additionalProperties": { "type": "string" }
                            }
                        },
                        "required": ["success"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: store::MIGRATION_INIT,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacks_db::{apply_migrations, Database};
    use stacks_kernel::settings::Settings;

    #[tokio::test]
    async fn routes_are_available_after_init() {
        let module = BooksModule::new();
        assert!(module.state.get().is_none());

        let settings = Settings::default();
        let db = Arc::new(Database::open_in_memory().unwrap());
        let migrations: Vec<(String, Migration)> = module
            .migrations()
            .into_iter()
            .map(|migration| (module.name().to_string(), migration))
            .collect();
        apply_migrations(&db, &migrations).unwrap();

        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        module.init(&ctx).await.unwrap();
        assert!(module.state.get().is_some());
        assert!(module.init(&ctx).await.is_err());
        assert_eq!(module.state.get().unwrap().catalog.default_page_size, 10);
    }

    #[test]
    fn openapi_fragment_parses() {
        let spec = BooksModule::new().openapi().unwrap();
        assert!(spec["paths"]["/books/search"]["get"].is_object());
        assert!(spec["components"]["schemas"]["BookView"]["properties"]["csrfToken"].is_object());
    }
}
