//! Server-side rules for the book form.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::models::{Book, FieldErrors, NewBook};

const MAX_TEXT_LEN: usize = 255;
const MAX_GENRE_LEN: usize = 100;

/// Ten digits (optionally separated, check character may be X) or thirteen digits.
static ISBN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d[- ]?){9}[\dXx]$|^(?:\d[- ]?){13}$").expect("ISBN pattern is valid")
});

/// Raw submitted form fields, kept verbatim so a rejected form can be re-rendered.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: String,
    pub genre: String,
    pub copies: String,
    pub ajax: Option<String>,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            publication_date: book.publication_date.format("%Y-%m-%d").to_string(),
            genre: book.genre.clone(),
            copies: book.copies.to_string(),
            ajax: None,
        }
    }

    pub fn is_ajax(&self) -> bool {
        self.ajax.is_some()
    }

    /// Check every field, reporting the first problem per field.
    pub fn validate(&self) -> Result<NewBook, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required_text(
            &mut errors,
            "title",
            &self.title,
            "Please enter the book title",
            MAX_TEXT_LEN,
            "The title cannot be longer than 255 characters",
        );
        let author = required_text(
            &mut errors,
            "author",
            &self.author,
            "Please enter the author name",
            MAX_TEXT_LEN,
            "The author name cannot be longer than 255 characters",
        );

        let isbn = self.isbn.trim();
        if isbn.is_empty() {
            errors.insert("isbn", "Please enter the ISBN".to_string());
        } else if !is_valid_isbn(isbn) {
            errors.insert("isbn", "Please enter a valid 10 or 13-digit ISBN".to_string());
        }

        let publication_date = match self.publication_date.trim() {
            "" => {
                errors.insert("publication_date", "Please select a publication date".to_string());
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert("publication_date", "Please enter a valid date".to_string());
                    None
                }
            },
        };

        let genre = required_text(
            &mut errors,
            "genre",
            &self.genre,
            "Please select a genre",
            MAX_GENRE_LEN,
            "The genre cannot be longer than 100 characters",
        );

        let copies = match self.copies.trim() {
            "" => {
                errors.insert("copies", "Please enter the number of copies".to_string());
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(n) if n < 0 => {
                    errors.insert("copies", "The number of copies cannot be negative".to_string());
                    None
                }
                Ok(n) => match u32::try_from(n) {
                    Ok(n) => Some(n),
                    Err(_) => {
                        errors.insert("copies", "The number of copies is too large".to_string());
                        None
                    }
                },
                Err(_) => {
                    errors.insert("copies", "Please enter a whole number".to_string());
                    None
                }
            },
        };

        match (title, author, publication_date, genre, copies) {
            (Some(title), Some(author), Some(publication_date), Some(genre), Some(copies))
                if errors.is_empty() =>
            {
                Ok(NewBook {
                    title,
                    author,
                    isbn: isbn.to_string(),
                    publication_date,
                    genre,
                    copies,
                })
            }
            _ => Err(errors),
        }
    }
}

pub fn is_valid_isbn(isbn: &str) -> bool {
    ISBN_PATTERN.is_match(isbn)
}

fn required_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    blank_message: &str,
    max_len: usize,
    long_message: &str,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, blank_message.to_string());
        None
    } else if value.chars().count() > max_len {
        errors.insert(field, long_message.to_string());
        None
    } else {
        Some(value.to_string())
    }
}
