//! Confirmation prompts gating destructive operations.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::anyhow;

use crate::client::{CliError, CliResult};

/// Asks the operator to approve an action.
pub(crate) trait Confirm: Send + Sync {
    /// `Ok(false)` means the operator declined; callers treat it as a no-op.
    fn confirm(&self, prompt: &str) -> CliResult<bool>;
}

/// Prompts on the terminal, or approves everything with `--yes`.
pub(crate) struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    pub(crate) const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> CliResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !io::stdin().is_terminal() {
            return Err(CliError::validation(format!(
                "confirmation required ({prompt}); pass --yes when running non-interactively"
            )));
        }

        let mut stderr = io::stderr();
        write!(stderr, "{prompt} [y/N] ")
            .and_then(|()| stderr.flush())
            .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|err| CliError::failure(anyhow!("failed to read confirmation: {err}")))?;
        Ok(is_affirmative(&answer))
    }
}

#[must_use]
pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
pub(crate) use scripted::ScriptedConfirm;
