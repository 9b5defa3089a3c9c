//! HTTP surface of the catalog.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use stacks_authz::SessionId;
use stacks_http::error::AppError;
use stacks_kernel::settings::CatalogSettings;

use super::models::{ActionEnvelope, BookId, FieldErrors, SearchEnvelope};
use super::service::{CatalogError, ListingService};
use super::validation::BookForm;
use super::view::{self, AlertKind};
use crate::utils::{int_param, wants_data};

const DEFAULT_PAGE: i64 = 1;

/// Shared handler state.
#[derive(Clone)]
pub struct BooksState {
    pub service: Arc<ListingService>,
    pub catalog: CatalogSettings,
}

/// Query accepted by the listing and search endpoints. Values stay raw so malformed
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    page: Option<String>,
    limit: Option<String>,
    ajax: Option<String>,
    q: Option<String>,
    notice: Option<String>,
}

impl ListingQuery {
    fn page(&self) -> i64 {
        int_param(self.page.as_deref(), DEFAULT_PAGE)
    }

    fn limit(&self, catalog: &CatalogSettings) -> i64 {
        int_param(self.limit.as_deref(), catalog.default_page_size)
    }
}

/// Outcome of a plain form submission, carried to the listing through the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    Created,
    Updated,
    Deleted,
    InvalidToken,
}

impl Notice {
    fn param(self) -> &'static str {
        match self {
            Notice::Created => "created",
            Notice::Updated => "updated",
            Notice::Deleted => "deleted",
            Notice::InvalidToken => "invalid_token",
        }
    }

    /// Unknown values are ignored.
    fn from_param(raw: &str) -> Option<Self> {
        match raw {
            "created" => Some(Notice::Created),
            "updated" => Some(Notice::Updated),
            "deleted" => Some(Notice::Deleted),
            "invalid_token" => Some(Notice::InvalidToken),
            _ => None,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Notice::Created => "Book has been successfully registered",
            Notice::Updated => "Book has been successfully updated",
            Notice::Deleted => "Book has been successfully deleted",
            Notice::InvalidToken => "Invalid CSRF token",
        }
    }

    fn alert(self) -> (AlertKind, &'static str) {
        let kind = match self {
            Notice::InvalidToken => AlertKind::Danger,
            _ => AlertKind::Success,
        };
        (kind, self.message())
    }

    /// 303 to the listing, which shows this notice.
    fn redirect(self) -> Response {
        Redirect::to(&format!("/books/?notice={}", self.param())).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    #[serde(rename = "_token")]
    token: String,
    ajax: Option<String>,
}

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/books", get(index))
        .route("/books/", get(index))
        .route("/books/list", get(list))
        .route("/books/search", get(search))
        .route("/books/alert", get(alert))
        .route("/books/new", get(new_form).post(create))
        .route("/books/{id}", get(show).post(delete).delete(delete))
        .route("/books/{id}/edit", get(edit_form).post(update))
        .with_state(state)
}

fn parse_id(raw: &str) -> Result<BookId, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("book {raw} not found")))
}

async fn render_index(
    state: &BooksState,
    session: &SessionId,
    page: i64,
    limit: i64,
    notice: Option<(AlertKind, &str)>,
) -> Result<String, AppError> {
    let result = state.service.get_page(page, limit).await?;
    let books = state.service.book_views(&result.books, session);
    Ok(view::index_page(
        &result,
        &books,
        &state.catalog.page_size_options,
        notice,
    ))
}

/// Full listing page.
async fn index(
    State(state): State<BooksState>,
    session: SessionId,
    Query(query): Query<ListingQuery>,
) -> Result<Html<String>, AppError> {
    let html = render_index(
        &state,
        &session,
        query.page(),
        query.limit(&state.catalog),
        query
            .notice
            .as_deref()
            .and_then(Notice::from_param)
            .map(Notice::alert),
    )
    .await?;
    Ok(Html(html))
}

/// Table and pagination fragments; without `ajax` the browser is sent to the full page.
async fn list(
    State(state): State<BooksState>,
    session: SessionId,
    Query(query): Query<ListingQuery>,
) -> Result<Response, AppError> {
    let result = state
        .service
        .get_page(query.page(), query.limit(&state.catalog))
        .await?;

    if query.ajax.is_none() {
        let target = format!("/books/?page={}&limit={}", result.current_page, result.limit);
        return Ok(Redirect::to(&target).into_response());
    }

    let books = state.service.book_views(&result.books, &session);
    Ok(Html(view::listing_fragments(&result, &books)).into_response())
}

/// Unpaginated search: JSON envelope in data mode, a results page otherwise.
async fn search(
    State(state): State<BooksState>,
    session: SessionId,
    headers: HeaderMap,
    Query(query): Query<ListingQuery>,
) -> Result<Response, AppError> {
    let term = query.q.clone().unwrap_or_default();
    let data = wants_data(&headers, query.ajax.is_some());

    match state.service.search(&term).await {
        Ok(books) => {
            let views = state.service.book_views(&books, &session);
            if data {
                Ok(Json(SearchEnvelope::found(views, term)).into_response())
            } else {
                Ok(Html(view::search_page(&term, &views)).into_response())
            }
        }
        Err(err @ CatalogError::SearchFailed(_)) if data => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SearchEnvelope::failed(err.to_string(), term)),
        )
            .into_response()),
        Err(err @ CatalogError::SearchFailed(_)) => {
            let message = err.to_string();
            let html = render_index(
                &state,
                &session,
                DEFAULT_PAGE,
                state.catalog.default_page_size,
                Some((AlertKind::Danger, &message)),
            )
            .await?;
            Ok(Html(html).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Dismissible notice fragment requested by the browser scripts.
async fn alert(Query(query): Query<AlertQuery>) -> Html<String> {
    let kind = AlertKind::parse(query.kind.as_deref().unwrap_or("info"));
    Html(view::alert(kind, query.message.as_deref().unwrap_or_default()))
}

async fn new_form() -> Html<String> {
    Html(view::form_page(None, &BookForm::default(), &FieldErrors::new()))
}

async fn create(
    State(state): State<BooksState>,
    headers: HeaderMap,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let data = wants_data(&headers, form.is_ajax());

    match form.validate() {
        Ok(book) => {
            let book = state.service.create(book).await?;
            if data {
                Ok(Json(ActionEnvelope::ok(Some(book.id), Notice::Created.message())).into_response())
            } else {
                Ok(Notice::Created.redirect())
            }
        }
        Err(errors) => Ok(rejected_form(None, &form, errors, data)),
    }
}

fn rejected_form(id: Option<BookId>, form: &BookForm, errors: FieldErrors, data: bool) -> Response {
    tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "book form rejected");
    if data {
        Json(ActionEnvelope::invalid(errors)).into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(view::form_page(id, form, &errors)),
        )
            .into_response()
    }
}

async fn show(
    State(state): State<BooksState>,
    session: SessionId,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let book = state.service.get(parse_id(&id)?).await?;
    let book_view = state
        .service
        .book_views(std::slice::from_ref(&book), &session)
        .remove(0);
    Ok(Html(view::show_page(&book_view)))
}

async fn edit_form(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let book = state.service.get(parse_id(&id)?).await?;
    Ok(Html(view::form_page(
        Some(book.id),
        &BookForm::from_book(&book),
        &FieldErrors::new(),
    )))
}

async fn update(
    State(state): State<BooksState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let data = wants_data(&headers, form.is_ajax());

    match form.validate() {
        Ok(book) => {
            let book = state.service.update(id, book).await?;
            if data {
                Ok(Json(ActionEnvelope::ok(Some(book.id), Notice::Updated.message())).into_response())
            } else {
                Ok(Notice::Updated.redirect())
            }
        }
        Err(errors) => {
            // Unknown ids are a 404 even when the submitted fields are also wrong.
            state.service.get(id).await?;
            Ok(rejected_form(Some(id), &form, errors, data))
        }
    }
}

/// Delete guarded by the per-record token; a bad token never removes anything.
async fn delete(
    State(state): State<BooksState>,
    session: SessionId,
    headers: HeaderMap,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let data = wants_data(&headers, form.ajax.is_some());

    match state.service.delete(id, &session, &form.token).await {
        Ok(()) if data => {
            Ok(Json(ActionEnvelope::ok(None, Notice::Deleted.message())).into_response())
        }
        Ok(()) => Ok(Notice::Deleted.redirect()),
        Err(err @ CatalogError::InvalidToken) if data => Ok((
            StatusCode::FORBIDDEN,
            Json(ActionEnvelope::failed(err.to_string())),
        )
            .into_response()),
        Err(CatalogError::InvalidToken) => Ok(Notice::InvalidToken.redirect()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::service::tests::{service_over, BrokenStore};
    use crate::modules::books::store::tests::seeded_store;
    use crate::modules::books::store::{BookStore, SqliteBookStore};
    use axum::{
        body::Body,
        http::{header, Request},
        middleware,
    };
    use stacks_authz::{session_layer, SessionConfig};
    use tower::ServiceExt;
    use uuid::Uuid;

    const COOKIE: &str = "stacks_session";

    struct TestApp {
        router: Router,
        state: BooksState,
        store: SqliteBookStore,
        session: String,
    }

    impl TestApp {
        async fn new() -> Self {
            let store = seeded_store().await;
            let state = BooksState {
                service: Arc::new(service_over(store.clone())),
                catalog: CatalogSettings::default(),
            };
            Self {
                router: with_session(router(state.clone())),
                state,
                store,
                session: Uuid::new_v4().to_string(),
            }
        }

        fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::COOKIE, format!("{COOKIE}={}", self.session))
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(self.request("GET", uri).body(Body::empty()).unwrap())
                .await
        }

        async fn get_json(&self, uri: &str) -> Response {
            self.send(
                self.request("GET", uri)
                    .header("x-requested-with", "XMLHttpRequest")
                    .header(header::ACCEPT, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
        }

        async fn post_form(&self, uri: &str, body: &str, ajax: bool) -> Response {
            let mut request = self
                .request("POST", uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            if ajax {
                request = request.header("x-requested-with", "XMLHttpRequest");
            }
            self.send(request.body(Body::from(body.to_string())).unwrap())
                .await
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        fn token_for(&self, id: BookId) -> String {
            self.state
                .service
                .delete_token(id, &SessionId::from_raw(self.session.clone()))
        }
    }

    fn with_session(router: Router) -> Router {
        router.layer(middleware::from_fn_with_state(
            SessionConfig {
                cookie_name: COOKIE.to_string(),
            },
            session_layer,
        ))
    }

    async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        serde_json::from_str(&text(response).await).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap()
    }

    const VALID_FORM: &str = "title=Emma&author=Jane+Austen&isbn=978-0-14-143958-7\
        &publication_date=1815-12-23&genre=Romance&copies=2";

    #[tokio::test]
    async fn index_renders_full_page() {
        let app = TestApp::new().await;
        let response = app.get("/books/?page=abc&limit=2").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = text(response).await;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Another Book"));
        assert!(html.contains("Final Test"));
        assert!(!html.contains("Test Book 1"));
        assert!(html.contains(r#"data-current-page="1" data-last-page="2" data-total-books="4""#));
    }

    #[tokio::test]
    async fn malformed_limit_uses_default_page_size() {
        let app = TestApp::new().await;
        let html = text(app.get("/books?limit=lots").await).await;
        assert!(html.contains(r#"<option value="10" selected>10</option>"#));
        assert!(html.contains("Test Book 2"));
    }

    #[tokio::test]
    async fn fragment_mode_returns_both_containers_clamped() {
        let app = TestApp::new().await;
        let response = app.get("/books/list?page=3&limit=2&ajax=1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = text(response).await;
        assert!(html.starts_with(r#"<div id="books-container">"#));
        assert!(html.contains(r#"<div id="pagination-container">"#));
        assert!(html.contains("Test Book 1"));
        assert!(html.contains("Test Book 2"));
        assert!(!html.contains("Another Book"));
        assert!(html.contains(r#"data-current-page="2""#));
    }

    #[tokio::test]
    async fn list_without_ajax_redirects_to_clamped_index() {
        let app = TestApp::new().await;
        let response = app.get("/books/list?page=9&limit=2").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/books/?page=2&limit=2");
    }

    #[tokio::test]
    async fn search_json_envelope() {
        let app = TestApp::new().await;

        let body = json(app.get_json("/books/search?q=Test&ajax=1").await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
        assert_eq!(body["searchTerm"], "Test");
        let first = &body["results"][0];
        assert_eq!(first["title"], "Final Test");
        assert_eq!(first["publicationDate"], "2020-01-01");
        let id: BookId = first["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(first["csrfToken"], app.token_for(id));

        assert_eq!(
            json(app.get_json("/books/search?q=Author%201&ajax=1").await).await["count"],
            2
        );
        assert_eq!(
            json(app.get_json("/books/search?q=978-1&ajax=1").await).await["count"],
            1
        );

        let none = json(app.get_json("/books/search?q=NonExistentTerm&ajax=1").await).await;
        assert_eq!(none["success"], true);
        assert_eq!(none["count"], 0);
        assert_eq!(none["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn repeated_search_reproduces_result_set() {
        let app = TestApp::new().await;
        let ids = |body: serde_json::Value| -> Vec<String> {
            body["results"]
                .as_array()
                .unwrap()
                .iter()
                .map(|book| book["id"].as_str().unwrap().to_string())
                .collect()
        };

        let first = ids(json(app.get_json("/books/search?q=test").await).await);
        let again = ids(json(app.get_json("/books/search?q=test").await).await);
        assert_eq!(first.len(), 3);
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn search_failure_is_an_error_envelope() {
        let state = BooksState {
            service: Arc::new(service_over(BrokenStore)),
            catalog: CatalogSettings::default(),
        };
        let response = with_session(router(state))
            .oneshot(
                Request::builder()
                    .uri("/books/search?q=Test&ajax=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["searchTerm"], "Test");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("An error occurred during search"));
    }

    #[tokio::test]
    async fn search_page_without_data_mode() {
        let app = TestApp::new().await;
        let response = app.get("/books/search?q=Test").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = text(response).await;
        assert!(html.contains(r#"3 result(s) for "Test""#));
        assert!(html.contains("Test Book 2"));
    }

    #[tokio::test]
    async fn alert_fragment() {
        let app = TestApp::new().await;
        let html = text(app.get("/books/alert?type=success&message=Saved%21").await).await;
        assert!(html.contains("alert-success"));
        assert!(html.contains("Saved!"));

        let html = text(app.get("/books/alert?type=nope&message=x").await).await;
        assert!(html.contains("alert-info"));
    }

    #[tokio::test]
    async fn tampered_token_deletes_nothing() {
        let app = TestApp::new().await;
        let book = app.store.find_page(0, 1).await.unwrap().remove(0);
        let mut token = app.token_for(book.id);
        token.replace_range(0..1, if token.starts_with('a') { "b" } else { "a" });

        let response = app
            .post_form(&format!("/books/{}", book.id), &format!("_token={token}"), true)
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid CSRF token");
        assert_eq!(app.store.count().await.unwrap(), 4);

        let response = app
            .post_form(&format!("/books/{}", book.id), "_token=invalid_token", false)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/books/?notice=invalid_token");
        assert_eq!(app.store.count().await.unwrap(), 4);

        let html = text(app.get("/books/?notice=invalid_token").await).await;
        assert!(html.contains("alert-danger"));
        assert!(html.contains("Invalid CSRF token"));
    }

    #[tokio::test]
    async fn plain_form_delete_reports_success_on_the_listing() {
        let app = TestApp::new().await;
        let book = app.store.find_page(0, 1).await.unwrap().remove(0);

        let response = app
            .post_form(
                &format!("/books/{}", book.id),
                &format!("_token={}", app.token_for(book.id)),
                false,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/books/?notice=deleted");
        assert_eq!(app.store.count().await.unwrap(), 3);

        let html = text(app.get(location(&response)).await).await;
        assert!(html.contains("alert-success"));
        assert!(html.contains("Book has been successfully deleted"));
        assert!(!html.contains("alert-danger"));
    }

    #[tokio::test]
    async fn unknown_notice_is_ignored() {
        let app = TestApp::new().await;
        let html = text(app.get("/books/?notice=%3Cscript%3E").await).await;
        assert!(!html.contains(r#"role="alert""#));
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn valid_token_deletes_the_record() {
        let app = TestApp::new().await;
        let book = app.store.find_page(0, 1).await.unwrap().remove(0);

        let response = app
            .post_form(
                &format!("/books/{}", book.id),
                &format!("_token={}", app.token_for(book.id)),
                true,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["success"], true);
        assert_eq!(app.store.count().await.unwrap(), 3);

        let response = app
            .send(
                app.request("DELETE", &format!("/books/{}", book.id))
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(format!("_token={}", app.token_for(book.id))))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn token_from_another_session_is_rejected() {
        let app = TestApp::new().await;
        let book = app.store.find_page(0, 1).await.unwrap().remove(0);
        let foreign = app
            .state
            .service
            .delete_token(book.id, &SessionId::generate());

        let response = app
            .post_form(&format!("/books/{}", book.id), &format!("_token={foreign}&ajax=1"), false)
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn create_in_ajax_and_form_modes() {
        let app = TestApp::new().await;

        let body = json(app.post_form("/books/new", VALID_FORM, true).await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Book has been successfully registered");
        let id: BookId = body["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(app.store.get(id).await.unwrap().unwrap().title, "Emma");

        let response = app.post_form("/books/new", VALID_FORM, false).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/books/?notice=created");
        assert_eq!(app.store.count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn invalid_create_reports_field_errors() {
        let app = TestApp::new().await;
        let bad = "title=&author=Someone&isbn=123&publication_date=1815-12-23&genre=Romance&copies=-1";

        let body = json(app.post_form("/books/new", bad, true).await).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["title"], "Please enter the book title");
        assert_eq!(body["errors"]["isbn"], "Please enter a valid 10 or 13-digit ISBN");
        assert_eq!(body["errors"]["copies"], "The number of copies cannot be negative");
        assert!(body["errors"].get("author").is_none());

        let response = app.post_form("/books/new", bad, false).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = text(response).await;
        assert!(html.contains("is-invalid"));
        assert!(html.contains(r#"value="Someone""#));
        assert_eq!(app.store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn edit_updates_existing_record() {
        let app = TestApp::new().await;
        let book = app.store.find_page(0, 1).await.unwrap().remove(0);
        let uri = format!("/books/{}/edit", book.id);

        let html = text(app.get(&uri).await).await;
        assert!(html.contains(&format!(r#"value="{}""#, book.title)));

        let body = json(app.post_form(&uri, VALID_FORM, true).await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], book.id.to_string());
        assert_eq!(app.store.get(book.id).await.unwrap().unwrap().title, "Emma");
        assert_eq!(app.store.count().await.unwrap(), 4);

        let response = app.post_form(&uri, VALID_FORM, false).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/books/?notice=updated");
        let html = text(app.get(location(&response)).await).await;
        assert!(html.contains("Book has been successfully updated"));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = TestApp::new().await;
        let missing = BookId::generate();

        assert_eq!(app.get(&format!("/books/{missing}")).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/books/99999").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            app.get(&format!("/books/{missing}/edit")).await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            app.post_form(&format!("/books/{missing}/edit"), VALID_FORM, true)
                .await
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn show_page_lists_fields() {
        let app = TestApp::new().await;
        let book = app.store.find_page(0, 1).await.unwrap().remove(0);

        let response = app.get(&format!("/books/{}", book.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = text(response).await;
        assert!(html.contains(&book.isbn));
        assert!(html.contains("2020-01-01"));
        assert!(html.contains(&app.token_for(book.id)));
    }
}
