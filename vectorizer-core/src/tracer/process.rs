//! Tracer backend that runs the external tracing program as a subprocess.
//!
//! Protocol: one JSON [`TraceRequest`] on stdin, SVG markup on stdout.
//! Anything on stderr is kept for the error report.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{validate_svg, TraceError, TraceRequest, Tracer};
use crate::config::TracerSettings;
use crate::ingest::SourceImage;
use crate::options::TraceOptions;

/// Maximum characters of stderr kept in an error.
const MAX_STDERR_CHARS: usize = 2_000;

/// Runs an external command per trace request.
#[derive(Debug, Clone)]
pub struct ProcessTracer {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessTracer {
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }

    pub fn from_settings(settings: &TracerSettings) -> Self {
        Self::new(
            settings.command.clone(),
            settings.args.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    async fn run(&self, payload: Vec<u8>) -> Result<String, TraceError> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Set headless environment
        cmd.env("NO_COLOR", "1");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TraceError::Unavailable(format!("command not found: {}", self.command))
            } else {
                TraceError::Unavailable(format!("failed to spawn {}: {}", self.command, e))
            }
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TraceError::Unavailable("tracer stdin unavailable".to_string()))?;

        let write = async move {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.len() > MAX_STDERR_CHARS {
                let cut = (0..=MAX_STDERR_CHARS)
                    .rev()
                    .find(|i| stderr.is_char_boundary(*i))
                    .unwrap_or(0);
                stderr.truncate(cut);
            }
            return Err(TraceError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }
        match written {
            // A tracer may stop reading once it has what it needs
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("Tracer closed stdin before reading the whole request");
            }
            other => other?,
        }

        validate_svg(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Tracer for ProcessTracer {
    fn name(&self) -> &str {
        &self.command
    }

    async fn trace(&self, image: &SourceImage, options: &TraceOptions) -> Result<String, TraceError> {
        let payload = serde_json::to_vec(&TraceRequest::new(image, options))?;

        info!(
            command = %self.command,
            image = %image.name,
            payload_bytes = payload.len(),
            timeout_secs = self.timeout.as_secs(),
            "Running tracer"
        );

        // kill_on_drop reaps the child when the timeout drops the future
        match timeout(self.timeout, self.run(payload)).await {
            Ok(result) => {
                if let Ok(svg) = &result {
                    debug!(svg_bytes = svg.len(), "Tracer finished");
                }
                result
            }
            Err(_) => Err(TraceError::Timeout(self.timeout.as_secs())),
        }
    }
}
