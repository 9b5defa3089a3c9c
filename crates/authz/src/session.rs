use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Opaque identifier of the browser session a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random session id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an already-known id without validation.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of the cookie carrying the session id.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
}

/// Read the session id from the `Cookie` headers, accepting only well-formed UUIDs.
fn session_from_cookies(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
        .map(|uuid| SessionId(uuid.to_string()))
}

/// Middleware that attaches a [`SessionId`] to every request, issuing a cookie when absent.
pub async fn session_layer(
    State(config): State<SessionConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let (session, issued) = match session_from_cookies(request.headers(), &config.cookie_name) {
        Some(session) => (session, false),
        None => (SessionId::generate(), true),
    };
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if issued {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            config.cookie_name,
            session.as_str()
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => tracing::warn!(error = %err, "unable to encode session cookie"),
        }
    }

    response
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SessionId>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "session middleware is not installed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = SessionConfig {
            cookie_name: "sid".to_string(),
        };
        Router::new()
            .route(
                "/",
                get(|session: SessionId| async move { session.as_str().to_string() }),
            )
            .layer(middleware::from_fn_with_state(config, session_layer))
    }

    #[test]
    fn parses_session_cookie_among_others() {
        let id = Uuid::new_v4().to_string();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; sid={id}")).unwrap(),
        );

        assert_eq!(
            session_from_cookies(&headers, "sid").map(|s| s.0),
            Some(id)
        );
    }

    #[test]
    fn ignores_malformed_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=not-a-uuid"));

        assert!(session_from_cookies(&headers, "sid").is_none());
    }

    #[tokio::test]
    async fn issues_cookie_when_missing() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("sid="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn reuses_existing_session() {
        let id = Uuid::new_v4().to_string();
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, format!("sid={id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, id.as_bytes());
    }
}
