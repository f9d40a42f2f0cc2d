#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Wire DTOs for the box office ticketing API.
//!
//! Records returned by the server are decoded leniently: the console never
//! enforces invariants on them, it only needs enough structure to render rows.
//! Timestamps stay as the strings the server sent (naive ISO-8601 without an
//! offset) and are parsed only when displayed.
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Movie record as listed by `GET /api/v1/movies`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Server-assigned identifier.
    pub id: i64,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-text genre label.
    #[serde(default)]
    pub genre: String,
    /// Running time in minutes.
    #[serde(default)]
    pub duration: i64,
    /// Optional synopsis.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the movie is still offered.
    #[serde(default)]
    pub is_active: bool,
    /// Creation timestamp when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body accepted by movie create and update.
///
/// `duration` is `None` when the operator's input could not be read as a
/// number; it is still sent (as `null`) so the server reports the problem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieInput {
    /// Display title.
    pub title: String,
    /// Optional synopsis; `null` when left blank.
    pub description: Option<String>,
    /// Running time in minutes.
    pub duration: Option<Number>,
    /// Free-text genre label.
    pub genre: String,
}

/// Showtime record as listed by `GET /api/v1/showtimes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Showtime {
    /// Server-assigned identifier.
    pub id: i64,
    /// Movie being screened.
    #[serde(default)]
    pub movie_id: i64,
    /// Screening start.
    #[serde(default)]
    pub start_time: String,
    /// Screening end, derived by the server from the movie duration.
    #[serde(default)]
    pub end_time: String,
    /// Seats in the room.
    #[serde(default)]
    pub total_seats: i64,
    /// Seats not yet booked.
    #[serde(default)]
    pub available_seats: i64,
    /// Whether the showtime is still bookable.
    #[serde(default)]
    pub is_active: bool,
}

/// Body accepted by showtime create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShowtimeInput {
    /// Movie being screened.
    pub movie_id: Option<Number>,
    /// Start as a UTC ISO-8601 timestamp.
    pub start_time: String,
    /// Seats in the room.
    pub total_seats: Option<Number>,
}

/// Showtime summary nested inside a booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookedShowtime {
    /// Movie of the booked showtime, if the server expanded it.
    #[serde(default)]
    pub movie_id: Option<i64>,
    /// Showtime start, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// Booking record as listed by `GET /api/v1/bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    /// Server-assigned identifier.
    pub id: i64,
    /// Owner of the booking.
    #[serde(default)]
    pub user_id: i64,
    /// Booked showtime.
    #[serde(default)]
    pub showtime_id: i64,
    /// Expanded showtime details.
    #[serde(default)]
    pub showtime: Option<BookedShowtime>,
    /// Number of seats reserved.
    #[serde(default)]
    pub seats: i64,
    /// Lifecycle label (`pending`, `confirmed`, `cancelled`, ...).
    #[serde(default)]
    pub status: String,
    /// When the booking was made.
    #[serde(default)]
    pub booking_time: String,
}

impl Booking {
    /// Movie identifier carried by the nested showtime, when present.
    #[must_use]
    pub fn movie_id(&self) -> Option<i64> {
        self.showtime.as_ref().and_then(|showtime| showtime.movie_id)
    }
}

/// Body accepted by booking create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingInput {
    /// Showtime to book.
    pub showtime_id: Option<Number>,
    /// Number of seats requested.
    pub seats: Option<Number>,
}

/// Body accepted by `POST /api/v1/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Clear-text password, sent verbatim.
    pub password: String,
}

/// Account returned after registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredUser {
    /// Server-assigned identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Whether the account may use admin endpoints.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether the account is enabled.
    #[serde(default)]
    pub is_active: bool,
}

/// Bearer token issued by `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Opaque bearer credential; absent on malformed responses.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token scheme, normally `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Error payload returned on non-success responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// Either a message string or a list of validation failures.
    #[serde(default)]
    pub detail: Option<Value>,
}

/// One entry of a validation failure list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationItem {
    /// Location of the offending input (e.g. `["body", "duration"]`).
    #[serde(default)]
    pub loc: Vec<Value>,
    /// Human-readable reason.
    #[serde(default)]
    pub msg: String,
    /// Machine-readable error kind.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ErrorBody {
    /// Extract the error body from an arbitrary response value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Human-readable message carried by `detail`, if any.
    ///
    /// Strings are returned as-is; validation lists are rendered as
    /// `loc: msg` entries joined with `; `. Any other JSON value is rendered
    /// as compact JSON text.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Array(items) => {
                let rendered = items
                    .iter()
                    .map(|item| {
                        serde_json::from_value::<ValidationItem>(item.clone())
                            .map_or_else(|_| item.to_string(), |entry| entry.describe())
                    })
                    .collect::<Vec<_>>();
                if rendered.is_empty() {
                    None
                } else {
                    Some(rendered.join("; "))
                }
            }
            other => Some(other.to_string()),
        }
    }
}

impl ValidationItem {
    fn describe(&self) -> String {
        let location = self
            .loc
            .iter()
            .map(|part| match part {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".");
        if location.is_empty() {
            self.msg.clone()
        } else {
            format!("{location}: {}", self.msg)
        }
    }
}

/// Acknowledgement returned by delete and status-change endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusMessage {
    /// Server-provided confirmation text.
    #[serde(default)]
    pub message: Option<String>,
}
