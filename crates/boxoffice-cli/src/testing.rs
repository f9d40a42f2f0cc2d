//! Command context wired to a mock server for controller tests.

use std::sync::Arc;

use httpmock::MockServer;
use reqwest::Client;
use tempfile::TempDir;

use crate::cli::OutputFormat;
use crate::client::{ApiClient, AppContext};
use crate::confirm::{Confirm, ScriptedConfirm};
use crate::console::{Console, ConsoleCapture};
use crate::session::SessionStore;

pub(crate) struct Harness {
    pub(crate) ctx: AppContext,
    pub(crate) console: ConsoleCapture,
    pub(crate) confirm: Arc<ScriptedConfirm>,
    _dir: TempDir,
}

impl Harness {
    /// Unauthenticated context pointed at `server` that approves every prompt.
    pub(crate) fn new(server: &MockServer) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let session = SessionStore::load(dir.path().join("session.json"), &server.base_url())
            .expect("load session");
        let (console, capture) = Console::capture();
        let confirm = Arc::new(ScriptedConfirm::new(true));
        let shared: Arc<dyn Confirm> = Arc::clone(&confirm) as Arc<dyn Confirm>;

        Self {
            ctx: AppContext {
                api: ApiClient::new(Client::new()),
                session,
                console,
                confirm: shared,
                output: OutputFormat::Table,
            },
            console: capture,
            confirm,
            _dir: dir,
        }
    }

    pub(crate) fn authenticated(mut self, token: &str) -> Self {
        self.ctx.session.set_token(token).expect("store token");
        self
    }

    pub(crate) fn answering(mut self, answer: bool) -> Self {
        self.confirm = Arc::new(ScriptedConfirm::new(answer));
        self.ctx.confirm = Arc::clone(&self.confirm) as Arc<dyn Confirm>;
        self
    }

    pub(crate) fn output(mut self, format: OutputFormat) -> Self {
        self.ctx.output = format;
        self
    }
}
