//! Server-rendered HTML for the catalog pages and fragments.
//!
//! Every dynamic value goes through [`escape_html`]. Container ids (`books-container`,
//! `books-table`, `pagination-container`, `alert-container`, `book-search`, `page-size`)
//! are the contract the browser controllers in `assets/js` rely on.

use std::fmt::Write as _;

use super::models::{BookId, BookView, FieldErrors, PageResult, GENRES};
use super::validation::BookForm;
use crate::utils::escape_html;

/// Pagination shows this many page numbers either side of the current one.
const PAGE_WINDOW: u64 = 2;

/// Style of a dismissible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
    Warning,
    Info,
}

impl AlertKind {
    /// Unknown names fall back to `Info`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "success" => AlertKind::Success,
            "danger" => AlertKind::Danger,
            "warning" => AlertKind::Warning,
            _ => AlertKind::Info,
        }
    }

    fn css(self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Danger => "danger",
            AlertKind::Warning => "warning",
            AlertKind::Info => "info",
        }
    }
}

pub fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Stacks</title>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
    <link rel="stylesheet" href="/assets/css/app.css">
</head>
<body>
    <nav class="navbar navbar-dark bg-dark mb-4">
        <div class="container">
            <a class="navbar-brand" href="/books/">Stacks</a>
            <a class="btn btn-outline-light btn-sm" href="/books/new">Add book</a>
        </div>
    </nav>
    <main class="container">
        <div id="alert-container"></div>
        {content}
    </main>
    <script type="module" src="/assets/js/app.js"></script>
</body>
</html>"#,
        title = escape_html(title),
    )
}

/// Dismissible notice fragment.
pub fn alert(kind: AlertKind, message: &str) -> String {
    format!(
        r#"<div class="alert alert-{css} alert-dismissible fade show" role="alert">
    {message}
    <button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button>
</div>"#,
        css = kind.css(),
        message = escape_html(message),
    )
}

fn book_row(book: &BookView) -> String {
    let id = book.id;
    format!(
        r#"<tr data-book-id="{id}">
    <td>{title}</td>
    <td>{author}</td>
    <td>{isbn}</td>
    <td>{date}</td>
    <td>
        <div class="btn-group btn-group-sm">
            <a href="/books/{id}" class="btn btn-info" title="View">View</a>
            <a href="/books/{id}/edit" class="btn btn-primary" title="Edit">Edit</a>
            <form method="post" action="/books/{id}" class="d-inline">
                <input type="hidden" name="_token" value="{token}">
                <input type="hidden" name="_method" value="DELETE">
                <button type="submit" class="btn btn-danger delete-book-btn" title="Delete">Delete</button>
            </form>
        </div>
    </td>
</tr>"#,
        title = escape_html(&book.title),
        author = escape_html(&book.author),
        isbn = escape_html(&book.isbn),
        date = escape_html(&book.publication_date),
        token = escape_html(&book.csrf_token),
    )
}

/// The `#books-table` element with one row per book.
pub fn books_table(books: &[BookView]) -> String {
    let rows = if books.is_empty() {
        r#"<tr class="no-results-row"><td colspan="5" class="text-center py-3">No books found</td></tr>"#
            .to_string()
    } else {
        books.iter().map(book_row).collect::<Vec<_>>().join("\n")
    };

    format!(
        r#"<table id="books-table" class="table table-striped align-middle">
    <thead>
        <tr>
            <th>Title</th>
            <th>Author</th>
            <th>ISBN</th>
            <th>Publication date</th>
            <th>Actions</th>
        </tr>
    </thead>
    <tbody>
{rows}
    </tbody>
</table>"#
    )
}

fn page_item(label: &str, target: Option<u64>, limit: u64, state: &str) -> String {
    match target {
        Some(page) => format!(
            r#"<li class="page-item{state}"><a class="page-link" href="/books/?page={page}&amp;limit={limit}" data-page="{page}">{label}</a></li>"#
        ),
        None => format!(
            r#"<li class="page-item{state}"><span class="page-link">{label}</span></li>"#
        ),
    }
}

/// Pagination control: previous/next plus a window of page numbers around the current page.
pub fn pagination(current: u64, last: u64, total: u64, limit: u64) -> String {
    let mut items = Vec::new();

    let prev_state = if current <= 1 { " disabled" } else { "" };
    items.push(page_item("&laquo;", Some(current.saturating_sub(1).max(1)), limit, prev_state));

    let start = current.saturating_sub(PAGE_WINDOW).max(1);
    let end = (current + PAGE_WINDOW).min(last);
    if start > 1 {
        items.push(page_item("1", Some(1), limit, ""));
        if start > 2 {
            items.push(page_item("&hellip;", None, limit, " disabled"));
        }
    }
    for page in start..=end {
        let state = if page == current { " active" } else { "" };
        items.push(page_item(&page.to_string(), Some(page), limit, state));
    }
    if end < last {
        if end + 1 < last {
            items.push(page_item("&hellip;", None, limit, " disabled"));
        }
        items.push(page_item(&last.to_string(), Some(last), limit, ""));
    }

    let next_state = if current >= last { " disabled" } else { "" };
    items.push(page_item("&raquo;", Some((current + 1).min(last)), limit, next_state));

    format!(
        r#"<nav aria-label="Book pages" data-current-page="{current}" data-last-page="{last}" data-total-books="{total}">
    <ul class="pagination justify-content-center">
        {items}
    </ul>
    <p class="text-center text-muted small">Page {current} of {last} &middot; {total} books</p>
</nav>"#,
        items = items.join("\n        "),
    )
}

/// Table and pagination wrapped in their containers, as spliced by the listing controller.
pub fn listing_fragments(page: &PageResult, books: &[BookView]) -> String {
    format!(
        r#"<div id="books-container">{table}</div><div id="pagination-container">{pagination}</div>"#,
        table = books_table(books),
        pagination = pagination(page.current_page, page.last_page, page.total_books, page.limit),
    )
}

fn page_size_selector(current: u64, options: &[i64]) -> String {
    let mut sizes: Vec<u64> = options
        .iter()
        .filter_map(|size| u64::try_from(*size).ok())
        .filter(|size| *size > 0)
        .collect();
    if !sizes.contains(&current) {
        sizes.push(current);
        sizes.sort_unstable();
    }

    let mut html = String::from(
        r#"<label class="form-label me-2" for="page-size">Per page</label><select id="page-size" class="form-select form-select-sm d-inline-block w-auto">"#,
    );
    for size in sizes {
        let selected = if size == current { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{size}"{selected}>{size}</option>"#);
    }
    html.push_str("</select>");
    html
}

/// Full listing page.
pub fn index_page(
    page: &PageResult,
    books: &[BookView],
    page_size_options: &[i64],
    notice: Option<(AlertKind, &str)>,
) -> String {
    let notice = notice
        .map(|(kind, message)| alert(kind, message))
        .unwrap_or_default();

    let content = format!(
        r#"{notice}
<div class="d-flex justify-content-between align-items-center mb-3">
    <h1 class="h3 mb-0">Books</h1>
    <div>{selector}</div>
</div>
<div class="mb-3 search-box">
    <input type="search" id="book-search" class="form-control" placeholder="Search by title, author or ISBN" autocomplete="off">
</div>
<div id="books-container">{table}</div>
<div id="pagination-container">{pagination}</div>"#,
        selector = page_size_selector(page.limit, page_size_options),
        table = books_table(books),
        pagination = pagination(page.current_page, page.last_page, page.total_books, page.limit),
    );

    layout("Books", &content)
}

/// Full page of server-rendered search results.
pub fn search_page(term: &str, books: &[BookView]) -> String {
    let summary = if books.is_empty() {
        format!(r#"No books found matching "{}""#, escape_html(term))
    } else {
        format!(
            r#"{} result(s) for "{}""#,
            books.len(),
            escape_html(term)
        )
    };

    let content = format!(
        r#"<h1 class="h3">Search</h1>
<form method="get" action="/books/search" class="mb-3">
    <input type="search" name="q" class="form-control" value="{term}">
</form>
<p class="text-muted">{summary}</p>
<div id="books-container">{table}</div>
<a href="/books/" class="btn btn-secondary">Back to list</a>"#,
        term = escape_html(term),
        table = books_table(books),
    );

    layout("Search", &content)
}

/// Detail page for one book.
pub fn show_page(book: &BookView) -> String {
    let content = format!(
        r#"<h1 class="h3">{title}</h1>
<dl class="row">
    <dt class="col-sm-3">Author</dt><dd class="col-sm-9">{author}</dd>
    <dt class="col-sm-3">ISBN</dt><dd class="col-sm-9">{isbn}</dd>
    <dt class="col-sm-3">Publication date</dt><dd class="col-sm-9">{date}</dd>
    <dt class="col-sm-3">Genre</dt><dd class="col-sm-9">{genre}</dd>
    <dt class="col-sm-3">Copies</dt><dd class="col-sm-9">{copies}</dd>
</dl>
<div class="d-flex gap-2">
    <a href="/books/" class="btn btn-secondary">Back to list</a>
    <a href="/books/{id}/edit" class="btn btn-primary">Edit</a>
    <form method="post" action="/books/{id}">
        <input type="hidden" name="_token" value="{token}">
        <button type="submit" class="btn btn-danger">Delete</button>
    </form>
</div>"#,
        id = book.id,
        title = escape_html(&book.title),
        author = escape_html(&book.author),
        isbn = escape_html(&book.isbn),
        date = escape_html(&book.publication_date),
        genre = escape_html(&book.genre),
        copies = book.copies,
        token = escape_html(&book.csrf_token),
    );

    layout(&book.title, &content)
}

fn field(
    name: &str,
    label: &str,
    input_type: &str,
    value: &str,
    errors: &FieldErrors,
    extra: &str,
) -> String {
    let (class, feedback) = match errors.get(name) {
        Some(message) => (
            " is-invalid",
            format!(
                r#"<div class="invalid-feedback d-block">{}</div>"#,
                escape_html(message)
            ),
        ),
        None => ("", String::new()),
    };

    format!(
        r#"<div class="mb-3">
    <label class="form-label" for="book_{name}">{label}</label>
    <input type="{input_type}" id="book_{name}" name="{name}" class="form-control{class}" value="{value}"{extra}>
    {feedback}
</div>"#,
        value = escape_html(value),
    )
}

/// Create form when `id` is `None`, edit form otherwise. Rejected values and their
/// messages are rendered back inline.
pub fn form_page(id: Option<BookId>, form: &BookForm, errors: &FieldErrors) -> String {
    let (title, action, submit) = match id {
        Some(id) => ("Edit book", format!("/books/{id}/edit"), "Update"),
        None => ("New book", "/books/new".to_string(), "Save"),
    };

    let genres = GENRES
        .iter()
        .map(|genre| format!(r#"<option value="{genre}"></option>"#))
        .collect::<String>();

    let fields = [
        field("title", "Title", "text", &form.title, errors, r#" maxlength="255""#),
        field("author", "Author", "text", &form.author, errors, r#" maxlength="255""#),
        field("isbn", "ISBN", "text", &form.isbn, errors, ""),
        field(
            "publication_date",
            "Publication date",
            "date",
            &form.publication_date,
            errors,
            "",
        ),
        field("genre", "Genre", "text", &form.genre, errors, r#" list="genre-options" maxlength="100""#),
        field("copies", "Copies", "number", &form.copies, errors, r#" min="0""#),
    ]
    .join("\n");

    let content = format!(
        r#"<h1 class="h3">{title}</h1>
<form name="book" method="post" action="{action}" novalidate>
{fields}
    <datalist id="genre-options">{genres}</datalist>
    <button type="submit" class="btn btn-primary">{submit}</button>
    <a href="/books/" class="btn btn-secondary">Back to list</a>
</form>"#
    );

    layout(title, &content)
}
