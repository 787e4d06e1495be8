//! Producer delegating to an external command such as `pdftotext` or `tesseract`.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{Result, TextProducer};
use crate::error::SourceError;

/// Runs `program args... <path>` and returns its standard output.
#[derive(Debug, Clone)]
pub struct ShellScriptProducer {
    program: String,
    args: Vec<String>,
}

impl ShellScriptProducer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command_error(&self, reason: impl Into<String>) -> SourceError {
        SourceError::Command {
            program: self.program.clone(),
            reason: reason.into(),
        }
    }
}

impl TextProducer for ShellScriptProducer {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn produce(&self, path: &Path) -> Result<String> {
        debug!("Running {} {:?} {}", self.program, self.args, path.display());

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.command_error(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.command_error(format!("{}: {}", output.status, stderr.trim())));
        }

        String::from_utf8(output.stdout).map_err(|_| self.command_error("output is not valid UTF-8"))
    }
}
