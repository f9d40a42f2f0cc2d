//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use boxoffice_api_models::{Booking, Movie, Showtime};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const NOT_AVAILABLE: &str = "N/A";

pub(crate) fn render_movies(movies: &[Movie], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(movies),
        OutputFormat::Table => {
            let mut text = format!(
                "{:<6} {:<32} {:<16} {:>9} ACTIVE",
                "ID", "TITLE", "GENRE", "DURATION"
            );
            for movie in movies {
                let _ = write!(
                    text,
                    "\n{:<6} {:<32} {:<16} {:>9} {}",
                    movie.id,
                    movie.title,
                    movie.genre,
                    format_duration(movie.duration),
                    active_glyph(movie.is_active)
                );
            }
            Ok(text)
        }
        OutputFormat::Html => Ok(movies
            .iter()
            .map(|movie| {
                format!(
                    "<tr data-movie-id=\"{id}\"><td>{id}</td><td>{title}</td><td>{genre}</td>\
                     <td>{duration}</td><td>{active}</td><td>{actions}</td></tr>",
                    id = movie.id,
                    title = escape_html(&movie.title),
                    genre = escape_html(&movie.genre),
                    duration = format_duration(movie.duration),
                    active = active_glyph(movie.is_active),
                    actions = row_actions("movie", movie.id, &["edit", "deactivate", "delete"]),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub(crate) fn render_showtimes(showtimes: &[Showtime], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(showtimes),
        OutputFormat::Table => {
            let mut text = format!(
                "{:<6} {:<6} {:<19} {:<19} {:>6} {:>9} ACTIVE",
                "ID", "MOVIE", "START", "END", "TOTAL", "AVAILABLE"
            );
            for showtime in showtimes {
                let _ = write!(
                    text,
                    "\n{:<6} {:<6} {:<19} {:<19} {:>6} {:>9} {}",
                    showtime.id,
                    showtime.movie_id,
                    format_date(&showtime.start_time),
                    format_date(&showtime.end_time),
                    showtime.total_seats,
                    showtime.available_seats,
                    active_glyph(showtime.is_active)
                );
            }
            Ok(text)
        }
        OutputFormat::Html => Ok(showtimes
            .iter()
            .map(|showtime| {
                format!(
                    "<tr data-showtime-id=\"{id}\"><td>{id}</td><td>{movie}</td><td>{start}</td>\
                     <td>{end}</td><td>{total}</td><td>{available}</td><td>{active}</td>\
                     <td>{actions}</td></tr>",
                    id = showtime.id,
                    movie = showtime.movie_id,
                    start = escape_html(&format_date(&showtime.start_time)),
                    end = escape_html(&format_date(&showtime.end_time)),
                    total = showtime.total_seats,
                    available = showtime.available_seats,
                    active = active_glyph(showtime.is_active),
                    actions =
                        row_actions("showtime", showtime.id, &["edit", "deactivate", "delete"]),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub(crate) fn render_bookings(bookings: &[Booking], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(bookings),
        OutputFormat::Table => {
            let mut text = format!(
                "{:<6} {:>5} {:<10} {:<19} {:<6} {:<8} MOVIE",
                "ID", "SEATS", "STATUS", "BOOKED AT", "USER", "SHOWTIME"
            );
            for booking in bookings {
                let _ = write!(
                    text,
                    "\n{:<6} {:>5} {:<10} {:<19} {:<6} {:<8} {}",
                    booking.id,
                    booking.seats,
                    booking.status,
                    format_date(&booking.booking_time),
                    booking.user_id,
                    booking.showtime_id,
                    movie_label(booking)
                );
            }
            Ok(text)
        }
        OutputFormat::Html => Ok(bookings
            .iter()
            .map(|booking| {
                format!(
                    "<tr data-booking-id=\"{id}\"><td>{id}</td><td>{seats}</td><td>{status}</td>\
                     <td>{booked}</td><td>{user}</td><td>{showtime}</td><td>{movie}</td>\
                     <td>{actions}</td></tr>",
                    id = booking.id,
                    seats = booking.seats,
                    status = escape_html(&booking.status),
                    booked = escape_html(&format_date(&booking.booking_time)),
                    user = booking.user_id,
                    showtime = booking.showtime_id,
                    movie = movie_label(booking),
                    actions = row_actions("booking", booking.id, &["cancel", "delete"]),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Print a movie as the values `movies update` would take.
pub(crate) fn render_movie_detail(movie: &Movie, format: OutputFormat) -> CliResult<String> {
    let fields = [
        ("id", movie.id.to_string()),
        ("title", movie.title.clone()),
        ("genre", movie.genre.clone()),
        ("duration", movie.duration.to_string()),
        ("description", movie.description.clone().unwrap_or_default()),
        ("active", movie.is_active.to_string()),
    ];
    render_detail(movie, &fields, format)
}

/// Print a showtime as the values `showtimes update` would take; the start is
/// shown as a local `YYYY-MM-DDTHH:MM` value.
pub(crate) fn render_showtime_detail(
    showtime: &Showtime,
    format: OutputFormat,
) -> CliResult<String> {
    let fields = [
        ("id", showtime.id.to_string()),
        ("movie_id", showtime.movie_id.to_string()),
        ("start", to_local_input_value(&showtime.start_time)),
        ("total_seats", showtime.total_seats.to_string()),
        ("available_seats", showtime.available_seats.to_string()),
        ("active", showtime.is_active.to_string()),
    ];
    render_detail(showtime, &fields, format)
}

fn render_detail(
    record: &impl Serialize,
    fields: &[(&str, String)],
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(record),
        OutputFormat::Table => Ok(fields
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Html => {
            let mut text = String::from("<dl>");
            for (name, value) in fields {
                let _ = write!(text, "<dt>{name}</dt><dd>{}</dd>", escape_html(value));
            }
            text.push_str("</dl>");
            Ok(text)
        }
    }
}

fn to_json(value: &(impl Serialize + ?Sized)) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn row_actions(kind: &str, id: i64, actions: &[&str]) -> String {
    actions
        .iter()
        .map(|action| {
            format!(
                "<button type=\"button\" data-action=\"{action}\" data-{kind}-id=\"{id}\">{}</button>",
                action_label(action)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn action_label(action: &str) -> String {
    let mut chars = action.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn movie_label(booking: &Booking) -> String {
    booking
        .movie_id()
        .map_or_else(|| NOT_AVAILABLE.to_string(), |id| id.to_string())
}

/// Escape text for insertion into HTML.
#[must_use]
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Human-readable timestamp. Offset-bearing values are shown in local time,
/// naive values as given, and anything unparseable unchanged.
#[must_use]
pub(crate) fn format_date(iso: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(iso) {
        return parsed
            .with_timezone(&Local)
            .format(DISPLAY_FORMAT)
            .to_string();
    }
    parse_naive(iso).map_or_else(
        || iso.to_string(),
        |naive| naive.format(DISPLAY_FORMAT).to_string(),
    )
}

/// `YYYY-MM-DDTHH:MM` value suitable for editing; empty when unparseable.
#[must_use]
pub(crate) fn to_local_input_value(iso: &str) -> String {
    let iso = iso.trim();
    if iso.is_empty() {
        return String::new();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(iso) {
        return parsed.with_timezone(&Local).format(INPUT_FORMAT).to_string();
    }
    parse_naive(iso).map_or_else(String::new, |naive| {
        naive.format(INPUT_FORMAT).to_string()
    })
}

#[must_use]
pub(crate) fn format_duration(minutes: i64) -> String {
    format!("{minutes} min")
}

#[must_use]
pub(crate) const fn active_glyph(active: bool) -> &'static str {
    if active { "✅" } else { "❌" }
}

fn parse_naive(iso: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(iso, format).ok())
}
