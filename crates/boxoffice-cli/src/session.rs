//! Persisted console session: API base address and bearer token.
//!
//! The store is a flat JSON object of string entries, mirroring a browser's
//! local key-value storage. Every mutation rewrites the file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Base address used when nothing has been saved and no default is given.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const KEY_API_BASE: &str = "api_base";
const KEY_ACCESS_TOKEN: &str = "access_token";
const SESSION_DIR: &str = ".boxoffice";
const SESSION_FILE: &str = "session.json";

/// Errors raised while reading or writing the session file.
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("failed to read session file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write session file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode session file")]
    Encode(#[from] serde_json::Error),
}

/// Snapshot of the values every request is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) base_url: String,
    pub(crate) token: String,
}

impl Session {
    pub(crate) fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Token to present as `Authorization: Bearer`, if any.
    pub(crate) fn bearer(&self) -> Option<&str> {
        if self.is_authenticated() {
            Some(self.token.as_str())
        } else {
            None
        }
    }

    pub(crate) fn status_label(&self) -> &'static str {
        if self.is_authenticated() {
            "Authenticated"
        } else {
            "Not authenticated"
        }
    }
}

/// Owns the session and its backing file.
#[derive(Debug)]
pub(crate) struct SessionStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    session: Session,
}

impl SessionStore {
    /// Load the store from `path`, falling back to `default_base_url` when no
    /// base address was saved. A missing file is an empty store.
    pub(crate) fn load(
        path: impl Into<PathBuf>,
        default_base_url: &str,
    ) -> Result<Self, SessionError> {
        let path = path.into();
        let entries = read_entries(&path)?;
        let default_base_url = non_empty(default_base_url).unwrap_or(DEFAULT_BASE_URL);

        let base_url = entries
            .get(KEY_API_BASE)
            .map(String::as_str)
            .and_then(non_empty)
            .unwrap_or(default_base_url)
            .to_string();
        let token = entries.get(KEY_ACCESS_TOKEN).cloned().unwrap_or_default();

        Ok(Self {
            path,
            entries,
            session: Session { base_url, token },
        })
    }

    pub(crate) const fn current(&self) -> &Session {
        &self.session
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Save a new base address; blank input saves [`DEFAULT_BASE_URL`].
    pub(crate) fn set_base_url(&mut self, raw: &str) -> Result<&str, SessionError> {
        let value = non_empty(raw).unwrap_or(DEFAULT_BASE_URL).to_string();
        self.entries.insert(KEY_API_BASE.to_string(), value.clone());
        self.session.base_url = value;
        self.persist()?;
        Ok(&self.session.base_url)
    }

    pub(crate) fn set_token(&mut self, raw: &str) -> Result<(), SessionError> {
        let token = raw.trim().to_string();
        tracing::debug!(authenticated = !token.is_empty(), "session token updated");
        self.entries
            .insert(KEY_ACCESS_TOKEN.to_string(), token.clone());
        self.session.token = token;
        self.persist()
    }

    pub(crate) fn clear_token(&mut self) -> Result<(), SessionError> {
        self.entries.remove(KEY_ACCESS_TOKEN);
        self.session.token.clear();
        tracing::debug!("session token cleared");
        self.persist()
    }

    fn persist(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SessionError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, payload).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// `$HOME/.boxoffice/session.json`, or the same path under the working
/// directory when `HOME` is unset.
#[must_use]
pub(crate) fn default_session_path() -> PathBuf {
    let root = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(PathBuf::new, PathBuf::from);
    root.join(SESSION_DIR).join(SESSION_FILE)
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, SessionError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(SessionError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str(&text) {
        Ok(entries) => Ok(entries),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "session file is malformed; starting with an empty session"
            );
            Ok(BTreeMap::new())
        }
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
