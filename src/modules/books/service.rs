//! Pagination, search and record actions over a [`BookStore`].

use std::sync::Arc;

use stacks_authz::{SessionId, TokenIssuer};
use stacks_http::error::AppError;
use thiserror::Error;

use super::models::{Book, BookId, BookView, NewBook, PageRequest, PageResult};
use super::store::{BookStore, StoreError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("book {0} not found")]
    NotFound(BookId),

    #[error("Invalid CSRF token")]
    InvalidToken,

    /// Distinct from an empty result: the store could not answer.
    #[error("An error occurred during search: {0}")]
    SearchFailed(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => AppError::not_found(err.to_string()),
            CatalogError::InvalidToken => AppError::forbidden(err.to_string()),
            CatalogError::SearchFailed(_) | CatalogError::Storage(_) => {
                AppError::Internal(anyhow::Error::new(err))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Token intent authorizing deletion of one record.
fn delete_intent(id: BookId) -> String {
    format!("delete{id}")
}

pub struct ListingService {
    store: Arc<dyn BookStore>,
    tokens: Arc<dyn TokenIssuer>,
}

impl ListingService {
    pub fn new(store: Arc<dyn BookStore>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    /// One title-ordered page. Any integers are accepted: both are raised to at least 1
    /// and the page is clamped to the last page for the current record count.
    pub async fn get_page(&self, page: i64, limit: i64) -> Result<PageResult> {
        let requested = PageRequest::normalized(page, limit);
        let total_books = self.store.count().await?;
        let request = requested.clamped(total_books);
        let books = self.store.find_page(request.offset(), request.limit).await?;

        tracing::debug!(
            requested_page = requested.page,
            page = request.page,
            limit = request.limit,
            total_books,
            "listing page assembled"
        );

        Ok(PageResult {
            books,
            current_page: request.page,
            last_page: request.last_page(total_books),
            total_books,
            limit: request.limit,
        })
    }

    /// Every record whose title, author or isbn contains `term`, ignoring case.
    ///
    /// A blank term yields no records rather than the whole catalog. Results are not
    /// paginated.
    pub async fn search(&self, term: &str) -> Result<Vec<Book>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        match self.store.search(term).await {
            Ok(books) => {
                tracing::debug!(term, matches = books.len(), "search completed");
                Ok(books)
            }
            Err(err) => {
                tracing::warn!(term, error = %err, "search failed");
                Err(CatalogError::SearchFailed(err.to_string()))
            }
        }
    }

    pub fn delete_token(&self, id: BookId, session: &SessionId) -> String {
        self.tokens.mint(session, &delete_intent(id))
    }

    /// Browser-facing rows, each carrying a delete token bound to `session`.
    pub fn book_views(&self, books: &[Book], session: &SessionId) -> Vec<BookView> {
        books
            .iter()
            .map(|book| BookView::new(book, self.delete_token(book.id, session)))
            .collect()
    }

    pub async fn get(&self, id: BookId) -> Result<Book> {
        self.store.get(id).await?.ok_or(CatalogError::NotFound(id))
    }

    pub async fn create(&self, book: NewBook) -> Result<Book> {
        let book = self.store.insert(book).await?;
        tracing::info!(id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    pub async fn update(&self, id: BookId, book: NewBook) -> Result<Book> {
        let book = self
            .store
            .update(id, book)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        tracing::info!(id = %book.id, "book updated");
        Ok(book)
    }

    /// Delete `id` if `token` was minted for it in this session. Nothing is removed otherwise.
    pub async fn delete(&self, id: BookId, session: &SessionId, token: &str) -> Result<()> {
        let book = self.get(id).await?;
        if !self.tokens.verify(session, &delete_intent(book.id), token) {
            tracing::warn!(id = %id, "delete rejected: token mismatch");
            return Err(CatalogError::InvalidToken);
        }

        if !self.store.delete(id).await? {
            return Err(CatalogError::NotFound(id));
        }
        tracing::info!(id = %id, "book deleted");
        Ok(())
    }
}
