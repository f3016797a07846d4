//! OCR through an external recognizer process.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info};

use super::OcrService;
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs a recognizer command, feeding the image on stdin and reading the
/// recognized text from stdout.
///
/// The default is `tesseract stdin stdout -l tur+eng`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOcr {
    program: String,
    args: Vec<String>,
}

impl CommandOcr {
    /// Create a recognizer for `program` with `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Create a recognizer from OCR configuration.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// The program this recognizer runs.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandOcr {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}

impl OcrService for CommandOcr {
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        info!("Running recognizer `{}` on {} bytes", self.program, image.len());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OcrError::Spawn {
                command: self.program.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a full stdout pipe cannot
        // deadlock the child.
        let writer = child.stdin.take().map(|mut stdin| {
            let data = image.to_vec();
            thread::spawn(move || stdin.write_all(&data))
        });

        let output = child.wait_with_output().map_err(OcrError::Io)?;

        let write_result = writer
            .and_then(|handle| handle.join().ok())
            .unwrap_or(Ok(()));

        if !output.status.success() {
            return Err(OcrError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // The recognizer may stop reading once it has what it needs
        match write_result {
            Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(OcrError::Io(e)),
            _ => {}
        }

        let text = String::from_utf8(output.stdout)?;
        if text.trim().is_empty() {
            return Err(OcrError::EmptyOutput);
        }

        debug!("Recognizer returned {} characters", text.len());
        Ok(text)
    }
}
