//! Controllers, one module per resource.
//!
//! Each controller catches request failures at its own boundary: list and
//! form operations write `Error: ...` to the status line, row actions write
//! `Failed: ...` to the alert channel. Either way the returned error is
//! already reported and only carries the exit code.

pub(crate) mod auth;
pub(crate) mod bookings;
pub(crate) mod movies;
pub(crate) mod overview;
pub(crate) mod session;
pub(crate) mod showtimes;

use boxoffice_api_models::StatusMessage;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::{AppContext, CliError, CliResult, RequestError, RequestOptions};
use crate::forms::target_id;

/// Fetch a collection endpoint and decode every record.
pub(crate) async fn fetch_list<T: DeserializeOwned>(
    ctx: &AppContext,
    path: &str,
) -> Result<Vec<T>, RequestError> {
    ctx.request(path, RequestOptions::get()).await.and_then(decode)
}

pub(crate) async fn fetch_record<T: DeserializeOwned>(
    ctx: &AppContext,
    path: &str,
) -> Result<T, RequestError> {
    ctx.request(path, RequestOptions::get()).await.and_then(decode)
}

pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, RequestError> {
    serde_json::from_value(body).map_err(|err| RequestError::Decode(err.to_string()))
}

/// Write a failure to the status line.
pub(crate) fn report_inline(ctx: &AppContext, err: &RequestError) -> CliError {
    log_failure(err);
    ctx.console.status(format!("Error: {err}"));
    CliError::reported_request()
}

/// Write a failed row action to the alert channel.
pub(crate) fn report_alert(ctx: &AppContext, err: &RequestError) -> CliError {
    log_failure(err);
    ctx.console.alert(format!("Failed: {err}"));
    CliError::reported_request()
}

/// Read an id field, prompting on the status line when it is blank. Only
/// numeric ids reach a request path.
pub(crate) fn require_target(
    ctx: &AppContext,
    raw: Option<&str>,
    prompt: &str,
) -> CliResult<i64> {
    let Some(raw) = target_id(raw) else {
        ctx.console.status(prompt);
        return Err(CliError::reported_prompt());
    };
    raw.parse().map_err(|_| {
        ctx.console.status(format!("Error: Invalid ID: {raw}"));
        CliError::reported_prompt()
    })
}

pub(crate) fn confirmed(ctx: &AppContext, prompt: &str) -> CliResult<bool> {
    let approved = ctx.confirm.confirm(prompt)?;
    if !approved {
        tracing::debug!(prompt, "operation declined");
    }
    Ok(approved)
}

/// Identifier of a record returned by a create call, as displayed.
#[must_use]
pub(crate) fn record_id(body: &Value) -> String {
    match body.get("id") {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) => id.clone(),
        _ => "?".to_string(),
    }
}

/// Log the server's acknowledgement of a status change or deletion.
pub(crate) fn log_acknowledgement(path: &str, body: Value) {
    let ack: StatusMessage = serde_json::from_value(body).unwrap_or_default();
    tracing::debug!(path, message = ack.message.as_deref().unwrap_or(""), "action acknowledged");
}

fn log_failure(err: &RequestError) {
    tracing::warn!(status = ?err.status(), error = %err, "request failed");
    if let Some(body) = err.body() {
        tracing::debug!(%body, "error response body");
    }
}
