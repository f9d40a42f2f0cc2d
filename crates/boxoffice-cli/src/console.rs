//! Output surface shared by every controller.
//!
//! Status lines and rendered tables go to stdout, alerts and the raw response
//! dump go to stderr. Tests swap in a capturing console to observe both.

use std::sync::{Arc, Mutex, PoisonError};

use crate::client::RawResponse;

/// Destination of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Channel {
    /// Per-command status line (`Loaded 3 movies.`, `Error: ...`).
    Status,
    /// Failures of row actions (`Failed: ...`).
    Alert,
    /// Rendered records.
    Output,
    /// Last raw response, printed on request.
    Raw,
}

type Captured = Arc<Mutex<Vec<(Channel, String)>>>;

#[derive(Clone, Default)]
pub(crate) struct Console {
    capture: Option<Captured>,
}

impl Console {
    pub(crate) fn stdio() -> Self {
        Self::default()
    }

    pub(crate) fn status(&self, line: impl Into<String>) {
        self.emit(Channel::Status, line.into());
    }

    pub(crate) fn alert(&self, line: impl Into<String>) {
        self.emit(Channel::Alert, line.into());
    }

    pub(crate) fn output(&self, text: impl Into<String>) {
        self.emit(Channel::Output, text.into());
    }

    pub(crate) fn raw(&self, raw: &RawResponse) {
        let text = serde_json::to_string_pretty(raw)
            .unwrap_or_else(|_| format!("{{\"status\": {}}}", raw.status));
        self.emit(Channel::Raw, text);
    }

    fn emit(&self, channel: Channel, text: String) {
        if let Some(capture) = &self.capture {
            capture
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((channel, text));
            return;
        }
        match channel {
            Channel::Status | Channel::Output => println!("{text}"),
            Channel::Alert | Channel::Raw => eprintln!("{text}"),
        }
    }
}

#[cfg(test)]
#[derive(Clone)]
pub(crate) struct ConsoleCapture(Captured);

#[cfg(test)]
impl Console {
    pub(crate) fn capture() -> (Self, ConsoleCapture) {
        let captured = Captured::default();
        (
            Self {
                capture: Some(Arc::clone(&captured)),
            },
            ConsoleCapture(captured),
        )
    }
}

#[cfg(test)]
impl ConsoleCapture {
    pub(crate) fn lines(&self, channel: Channel) -> Vec<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(kind, _)| *kind == channel)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}
