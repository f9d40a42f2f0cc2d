#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Administrative console for the box office ticketing API.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: controllers grouped by resource
//! - `client.rs`: HTTP client, request errors, and the command context
//! - `session.rs`: persisted base URL and bearer token
//! - `console.rs`: status line, alerts, and rendered output
//! - `confirm.rs`: confirmation prompts for destructive operations
//! - `forms.rs`: coercion of raw field values into request bodies
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod confirm;
pub(crate) mod console;
pub(crate) mod forms;
pub(crate) mod output;
pub(crate) mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use cli::run;
