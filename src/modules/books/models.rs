use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::{Timestamp, Uuid};

/// Genres offered by the book form. Stored genres are not restricted to this list.
pub const GENRES: &[&str] = &[
    "Fiction",
    "Non-fiction",
    "Science Fiction",
    "Fantasy",
    "Mystery",
    "Thriller",
    "Romance",
    "Biography",
    "History",
    "Science",
    "Other",
];

/// Opaque, stable identifier of a book record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// New time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::new_v7(Timestamp::now(uuid::NoContext)))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Persisted book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: String,
    pub copies: u32,
}

impl Book {
    pub fn from_new(id: BookId, book: NewBook) -> Self {
        Self {
            id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            publication_date: book.publication_date,
            genre: book.genre,
            copies: book.copies,
        }
    }
}

/// Validated field values for a book that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: String,
    pub copies: u32,
}

/// Field name to message, in field order.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Normalized pagination request: both numbers are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Accepts any caller-supplied integers; values below 1 become 1.
    pub fn normalized(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            limit: limit.max(1) as u64,
        }
    }

    /// `max(1, ceil(total / limit))`.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.limit).max(1)
    }

    /// Same request with the page clamped to `[1, last_page(total)]`.
    pub fn clamped(self, total: u64) -> Self {
        Self {
            page: self.page.min(self.last_page(total)),
            ..self
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of the title-ordered listing.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub books: Vec<Book>,
    pub current_page: u64,
    pub last_page: u64,
    pub total_books: u64,
    pub limit: u64,
}

/// Book as exposed to the browser, carrying the token that authorizes its deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: String,
    pub genre: String,
    pub copies: u32,
    pub csrf_token: String,
}

impl BookView {
    pub fn new(book: &Book, csrf_token: String) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            publication_date: book.publication_date.format("%Y-%m-%d").to_string(),
            genre: book.genre.clone(),
            copies: book.copies,
            csrf_token,
        }
    }
}

/// JSON body of the search endpoint in data mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<BookView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub search_term: String,
}

impl SearchEnvelope {
    pub fn found(results: Vec<BookView>, search_term: impl Into<String>) -> Self {
        Self {
            success: true,
            count: Some(results.len()),
            results: Some(results),
            message: None,
            search_term: search_term.into(),
        }
    }

    pub fn failed(message: impl Into<String>, search_term: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            count: None,
            message: Some(message.into()),
            search_term: search_term.into(),
        }
    }
}

/// JSON body answering create, update and delete in AJAX mode.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ActionEnvelope {
    pub fn ok(id: Option<BookId>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            id,
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            errors: Some(errors),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_below_one_resolves_to_one() {
        for page in [-5, 0, 1] {
            assert_eq!(PageRequest::normalized(page, 10).page, 1);
        }
        assert_eq!(PageRequest::normalized(3, -1).limit, 1);
    }

    #[test]
    fn last_page_is_ceiling_with_floor_of_one() {
        let request = PageRequest::normalized(1, 2);
        assert_eq!(request.last_page(0), 1);
        assert_eq!(request.last_page(1), 1);
        assert_eq!(request.last_page(4), 2);
        assert_eq!(request.last_page(5), 3);

        for limit in 1..=7 {
            for total in 0..=30 {
                let clamped = PageRequest::normalized(i64::MAX, limit).clamped(total);
                let expected = std::cmp::max(1, (total + limit as u64 - 1) / limit as u64);
                assert_eq!(clamped.page, expected);
                assert!(clamped.offset() < total.max(1));
            }
        }
    }

    #[test]
    fn book_id_round_trips_through_text() {
        let id = BookId::generate();
        assert_eq!(id.to_string().parse::<BookId>().unwrap(), id);
        assert!("99999".parse::<BookId>().is_err());
    }

    #[test]
    fn search_envelope_shapes() {
        let ok = serde_json::to_value(SearchEnvelope::found(vec![], "Test")).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["count"], 0);
        assert_eq!(ok["searchTerm"], "Test");
        assert!(ok.get("message").is_none());

        let failed = serde_json::to_value(SearchEnvelope::failed("boom", "Test")).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["message"], "boom");
        assert!(failed.get("results").is_none());
    }

    #[test]
    fn book_view_uses_camel_case_and_iso_dates() {
        let book = Book {
            id: BookId::generate(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "978-0-441-17271-9".to_string(),
            publication_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            genre: "Science Fiction".to_string(),
            copies: 2,
        };
        let view = serde_json::to_value(BookView::new(&book, "tok".to_string())).unwrap();
        assert_eq!(view["publicationDate"], "1965-08-01");
        assert_eq!(view["csrfToken"], "tok");
        assert_eq!(view["id"], book.id.to_string());
    }
}
