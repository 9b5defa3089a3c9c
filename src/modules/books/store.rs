//! Book persistence.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use stacks_db::{Database, DbError};
use thiserror::Error;

use super::models::{Book, BookId, NewBook};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("storage task failed: {0}")]
    Task(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(DbError::Sqlite(err))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable book storage. Listings and searches are ordered by title ascending, ignoring
/// case, with the id breaking ties.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn count(&self) -> Result<u64>;

    /// `limit` records starting at `offset` in title order.
    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<Book>>;

    /// Records whose title, author or isbn contains `term`, ignoring case.
    async fn search(&self, term: &str) -> Result<Vec<Book>>;

    async fn get(&self, id: BookId) -> Result<Option<Book>>;

    async fn insert(&self, book: NewBook) -> Result<Book>;

    /// Returns `None` when no record has `id`.
    async fn update(&self, id: BookId, book: NewBook) -> Result<Option<Book>>;

    /// Returns true if the book existed and was deleted.
    async fn delete(&self, id: BookId) -> Result<bool>;
}

const COLUMNS: &str = "id, title, author, isbn, publication_date, genre, copies";
const TITLE_ORDER: &str = "ORDER BY title COLLATE NOCASE ASC, id ASC";

pub const MIGRATION_INIT: &str = r#"
    CREATE TABLE book (
        id               TEXT PRIMARY KEY,
        title            TEXT NOT NULL CHECK (title <> ''),
        author           TEXT NOT NULL CHECK (author <> ''),
        isbn             TEXT NOT NULL CHECK (isbn <> ''),
        publication_date TEXT NOT NULL,
        genre            TEXT NOT NULL,
        copies           INTEGER NOT NULL CHECK (copies >= 0)
    );
    CREATE INDEX book_title_idx ON book (title COLLATE NOCASE, id);
"#;

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    let id: String = row.get(0)?;
    let id = id
        .parse::<BookId>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))?;

    Ok(Book {
        id,
        title: row.get(1)?,
        author: row.get(2)?,
        isbn: row.get(3)?,
        publication_date: row.get(4)?,
        genre: row.get(5)?,
        copies: row.get(6)?,
    })
}

/// SQLite-backed store; queries run on the blocking pool.
#[derive(Clone)]
pub struct SqliteBookStore {
    db: Arc<Database>,
}

impl SqliteBookStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.with_conn(|conn| Ok(f(conn)?)))
            .await
            .map_err(|err| StoreError::Task(err.to_string()))?
            .map_err(StoreError::from)
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn count(&self) -> Result<u64> {
        self.blocking(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM book", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<Book>> {
        let (offset, limit) = (to_sql_int(offset), to_sql_int(limit));
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM book {TITLE_ORDER} LIMIT ?1 OFFSET ?2"
            ))?;
            let books = stmt
                .query_map(params![limit, offset], book_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(books)
        })
        .await
    }

    async fn search(&self, term: &str) -> Result<Vec<Book>> {
        let term = term.to_string();
        self.blocking(move |conn| {
            // `instr` keeps `%` and `_` in the term literal; both sides go through `lower`.
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM book
                 WHERE instr(lower(title), lower(?1)) > 0
                    OR instr(lower(author), lower(?1)) > 0
                    OR instr(lower(isbn), lower(?1)) > 0
                 {TITLE_ORDER}"
            ))?;
            let books = stmt
                .query_map(params![term], book_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(books)
        })
        .await
    }

    async fn get(&self, id: BookId) -> Result<Option<Book>> {
        self.blocking(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM book WHERE id = ?1"),
                params![id.to_string()],
                book_from_row,
            )
            .optional()
        })
        .await
    }

    async fn insert(&self, book: NewBook) -> Result<Book> {
        let book = Book::from_new(BookId::generate(), book);
        self.blocking(move |conn| {
            conn.execute(
                &format!("INSERT INTO book ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                params![
                    book.id.to_string(),
                    &book.title,
                    &book.author,
                    &book.isbn,
                    book.publication_date,
                    &book.genre,
                    book.copies
                ],
            )?;
            Ok(book)
        })
        .await
    }

    async fn update(&self, id: BookId, book: NewBook) -> Result<Option<Book>> {
        let book = Book::from_new(id, book);
        self.blocking(move |conn| {
            let changed = conn.execute(
                "UPDATE book
                 SET title = ?2, author = ?3, isbn = ?4, publication_date = ?5, genre = ?6, copies = ?7
                 WHERE id = ?1",
                params![
                    book.id.to_string(),
                    &book.title,
                    &book.author,
                    &book.isbn,
                    book.publication_date,
                    &book.genre,
                    book.copies
                ],
            )?;
            Ok((changed > 0).then_some(book))
        })
        .await
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        self.blocking(move |conn| {
            let changed = conn.execute("DELETE FROM book WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
        .await
    }
}
