//! Shared HTTP client, error types, and the command context.

use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::anyhow;
use boxoffice_api_models::ErrorBody;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::confirm::Confirm;
use crate::console::Console;
use crate::session::{Session, SessionError, SessionStore};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
const JSON_MIME: &str = "application/json";
const GENERIC_FAILURE: &str = "Request failed";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    /// Already written to the status line or alert channel.
    Reported { exit_code: i32 },
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// A request failure whose message the controller already surfaced.
    pub(crate) const fn reported_request() -> Self {
        Self::Reported { exit_code: 3 }
    }

    /// A missing-input prompt the controller already surfaced.
    pub(crate) const fn reported_prompt() -> Self {
        Self::Reported { exit_code: 2 }
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Reported { exit_code } => *exit_code,
        }
    }

    pub(crate) const fn is_reported(&self) -> bool {
        matches!(self, Self::Reported { .. })
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
            Self::Reported { .. } => String::new(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        Self::failure(error)
    }
}

/// Failure of a single API exchange.
#[derive(Debug, Error)]
pub(crate) enum RequestError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        body: Value,
    },
    /// No usable response arrived (connection, timeout, invalid URL).
    #[error("{0}")]
    Transport(String),
    /// A 2xx body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RequestError {
    #[must_use]
    pub(crate) const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Parsed body of a non-success response.
    #[must_use]
    pub(crate) const fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => Some(body),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// Status and parsed body of the most recent exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RawResponse {
    pub(crate) status: u16,
    pub(crate) data: Value,
}

/// Payload attached to an outgoing request.
#[derive(Debug, Clone, Default)]
pub(crate) enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Method, body, and extra headers for one request.
#[derive(Debug, Clone)]
pub(crate) struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) body: RequestBody,
    pub(crate) headers: Vec<(HeaderName, HeaderValue)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub(crate) fn get() -> Self {
        Self::default()
    }

    pub(crate) fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub(crate) fn json(method: Method, body: &impl Serialize) -> CliResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|err| CliError::failure(anyhow!("failed to encode request body: {err}")))?;
        Ok(Self {
            method,
            body: RequestBody::Json(value),
            headers: Vec::new(),
        })
    }

    pub(crate) fn form(method: Method, fields: Vec<(String, String)>) -> Self {
        Self {
            method,
            body: RequestBody::Form(fields),
            headers: Vec::new(),
        }
    }
}

/// Dependencies constructed from CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
}

impl CliDependencies {
    /// Construct an HTTP client tagged with the invocation's trace id.
    pub(crate) fn new(timeout_secs: u64, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self { client })
    }
}

/// Issues API requests and remembers the last raw response.
#[derive(Clone)]
pub(crate) struct ApiClient {
    http: Client,
    last_response: Arc<Mutex<Option<RawResponse>>>,
}

impl ApiClient {
    pub(crate) fn new(http: Client) -> Self {
        Self {
            http,
            last_response: Arc::new(Mutex::new(None)),
        }
    }

    /// Build the outgoing request without sending it.
    pub(crate) fn prepare(
        &self,
        session: &Session,
        path: &str,
        options: RequestOptions,
    ) -> Result<reqwest::Request, RequestError> {
        let target = build_url(&session.base_url, path);
        let url = Url::parse(&target)
            .map_err(|err| RequestError::Transport(format!("invalid URL '{target}': {err}")))?;

        let mut builder = self
            .http
            .request(options.method, url)
            .header(ACCEPT, JSON_MIME);

        builder = match options.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, JSON_MIME),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
        };

        if let Some(token) = session.bearer() {
            builder = builder.bearer_auth(token);
        }

        for (name, value) in options.headers {
            builder = builder.header(name, value);
        }

        builder
            .build()
            .map_err(|err| RequestError::Transport(format!("failed to build request: {err}")))
    }

    /// Send a request and return the parsed body of a 2xx response.
    pub(crate) async fn request(
        &self,
        session: &Session,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, RequestError> {
        let request = self.prepare(session, path, options)?;
        let method = request.method().clone();

        let response = self.http.execute(request).await.map_err(|err| {
            RequestError::Transport(format!("request to {path} failed: {err}"))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|err| {
            RequestError::Transport(format!("failed to read response from {path}: {err}"))
        })?;
        let data = parse_body(&text);

        tracing::debug!(%method, path, status = status.as_u16(), "api response");
        self.record(RawResponse {
            status: status.as_u16(),
            data: data.clone(),
        });

        if status.is_success() {
            Ok(data)
        } else {
            Err(RequestError::Status {
                status,
                message: error_message(status, &data),
                body: data,
            })
        }
    }

    /// The most recent completed exchange, if any.
    pub(crate) fn last_response(&self) -> Option<RawResponse> {
        self.last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, raw: RawResponse) {
        tracing::debug!(status = raw.status, body = %raw.data, "raw response");
        *self
            .last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(raw);
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) api: ApiClient,
    pub(crate) session: SessionStore,
    pub(crate) console: Console,
    pub(crate) confirm: Arc<dyn Confirm>,
    pub(crate) output: OutputFormat,
}

impl AppContext {
    /// Issue a request with the current session's base URL and token.
    pub(crate) async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, RequestError> {
        self.api.request(self.session.current(), path, options).await
    }
}

/// Join the base address and an API-relative path.
///
/// Surrounding whitespace and one trailing `/` are dropped from the base.
#[must_use]
pub(crate) fn build_url(base: &str, path: &str) -> String {
    let base = base.trim();
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}{path}")
}

/// Parse a response body, wrapping non-JSON text as `{"raw": text}`.
#[must_use]
pub(crate) fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

/// Message for a non-success response: `detail`, then status reason, then a
/// generic fallback.
#[must_use]
pub(crate) fn error_message(status: StatusCode, body: &Value) -> String {
    ErrorBody::from_value(body)
        .message()
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::header::AUTHORIZATION;

    fn session(base_url: &str, token: &str) -> Session {
        Session {
            base_url: base_url.to_string(),
            token: token.to_string(),
        }
    }

    fn api() -> ApiClient {
        ApiClient::new(Client::new())
    }

    #[test]
    fn build_url_strips_single_trailing_slash() {
        assert_eq!(
            build_url("http://localhost:8000/", "/api/v1/movies"),
            "http://localhost:8000/api/v1/movies"
        );
        assert_eq!(
            build_url("  http://localhost:8000  ", "/api/v1/movies"),
            "http://localhost:8000/api/v1/movies"
        );
        assert_eq!(
            build_url("http://host/prefix", "/api/v1/bookings"),
            "http://host/prefix/api/v1/bookings"
        );
    }

    #[test]
    fn parse_body_wraps_non_json_text() {
        assert_eq!(parse_body(""), json!({}));
        assert_eq!(parse_body("[1,2]"), json!([1, 2]));
        assert_eq!(
            parse_body("<html>bad gateway</html>"),
            json!({"raw": "<html>bad gateway</html>"})
        );
    }

    #[test]
    fn error_message_prefers_detail_then_reason() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, &json!({"detail": "Movie not found"})),
            "Movie not found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, &json!({"raw": "upstream"})),
            "Bad Gateway"
        );
        let unnamed = StatusCode::from_u16(599).expect("valid status code");
        assert_eq!(error_message(unnamed, &json!({})), "Request failed");
    }

    #[test]
    fn prepare_attaches_bearer_token_when_present() {
        let request = api()
            .prepare(
                &session("http://localhost:8000/", "tok123"),
                "/api/v1/movies",
                RequestOptions::get(),
            )
            .expect("request should build");
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/v1/movies"
        );
        assert_eq!(
            request.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer tok123")
        );
        assert_eq!(
            request.headers().get(ACCEPT).and_then(|v| v.to_str().ok()),
            Some(JSON_MIME)
        );
        assert_eq!(
            request.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some(JSON_MIME)
        );
    }

    #[test]
    fn prepare_omits_authorization_without_token() {
        let request = api()
            .prepare(
                &session("http://localhost:8000", ""),
                "/api/v1/showtimes",
                RequestOptions::get(),
            )
            .expect("request should build");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn prepare_form_bodies_use_urlencoded_content_type() {
        let request = api()
            .prepare(
                &session("http://localhost:8000", ""),
                "/api/v1/auth/login",
                RequestOptions::form(
                    reqwest::Method::POST,
                    vec![
                        ("username".to_string(), "alice".to_string()),
                        ("password".to_string(), "p&ss".to_string()),
                    ],
                ),
            )
            .expect("request should build");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/x-www-form-urlencoded")
        );
        let body = request
            .body()
            .and_then(reqwest::Body::as_bytes)
            .expect("form body is buffered");
        assert_eq!(body, b"username=alice&password=p%26ss");
    }

    #[test]
    fn prepare_rejects_unparseable_base_url() {
        let err = api()
            .prepare(&session("not a url", ""), "/api/v1/movies", RequestOptions::get())
            .expect_err("invalid base should fail");
        assert!(matches!(err, RequestError::Transport(message) if message.contains("invalid URL")));
    }

    #[tokio::test]
    async fn request_returns_body_and_records_raw_response() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/movies")
                .header("authorization", "Bearer tok123")
                .header("accept", JSON_MIME);
            then.status(200)
                .header("content-type", JSON_MIME)
                .json_body(json!([{"id": 1}]));
        });

        let client = api();
        let body = client
            .request(
                &session(&server.base_url(), "tok123"),
                "/api/v1/movies",
                RequestOptions::get(),
            )
            .await
            .expect("request should succeed");

        mock.assert();
        assert_eq!(body, json!([{"id": 1}]));
        assert_eq!(
            client.last_response(),
            Some(RawResponse {
                status: 200,
                data: json!([{"id": 1}])
            })
        );
    }

    #[tokio::test]
    async fn request_surfaces_detail_on_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/v1/movies/7");
            then.status(404)
                .header("content-type", JSON_MIME)
                .json_body(json!({"detail": "Movie not found"}));
        });

        let client = api();
        let err = client
            .request(
                &session(&server.base_url(), ""),
                "/api/v1/movies/7",
                RequestOptions::method(reqwest::Method::DELETE),
            )
            .await
            .expect_err("404 should fail");

        assert_eq!(err.to_string(), "Movie not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            client.last_response().map(|raw| raw.status),
            Some(404)
        );
    }

    #[tokio::test]
    async fn request_wraps_non_json_bodies() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/bookings");
            then.status(200).body("plain text");
        });

        let body = api()
            .request(
                &session(&server.base_url(), ""),
                "/api/v1/bookings",
                RequestOptions::get(),
            )
            .await
            .expect("non-JSON success still resolves");
        assert_eq!(body, json!({"raw": "plain text"}));
    }

    #[tokio::test]
    async fn failed_status_without_detail_uses_reason_phrase() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/showtimes");
            then.status(503).body("maintenance");
        });

        let err = api()
            .request(
                &session(&server.base_url(), ""),
                "/api/v1/showtimes",
                RequestOptions::get(),
            )
            .await
            .expect_err("503 should fail");
        assert_eq!(err.to_string(), "Service Unavailable");
        match err {
            RequestError::Status { body, .. } => assert_eq!(body, json!({"raw": "maintenance"})),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn cli_error_exit_codes() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
        assert_eq!(CliError::reported_request().exit_code(), 3);
        assert_eq!(CliError::reported_prompt().exit_code(), 2);
        assert!(CliError::reported_prompt().is_reported());
        assert_eq!(CliError::validation("bad").display_message(), "bad");
    }
}
