//! MermaidCliRenderer -- renders diagrams by running the Mermaid CLI.
//!
//! Each render writes the definition to a scratch directory, runs
//! `mmdc -i <in> -o <out> -t <theme>` and reads the SVG back. A non-zero
//! exit means the definition did not parse and carries the CLI's stderr;
//! a CLI that cannot be started or does not finish in time is reported as
//! unavailable.

use std::process::Stdio;
use std::time::Duration;

use mermaidai_core::render::DiagramRenderer;
use mermaidai_types::error::RenderError;
use mermaidai_types::theme::Theme;

/// Default render timeout. Headless browser startup dominates.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct MermaidCliRenderer {
    program: String,
    /// Arguments placed before the render flags, e.g. an `npx` package name.
    prefix_args: Vec<String>,
    timeout: Duration,
}

impl MermaidCliRenderer {
    /// Use `mmdc` from `PATH`.
    pub fn new() -> Self {
        Self::with_command("mmdc", Vec::<String>::new())
    }

    /// Use a custom launcher, e.g. `npx -y @mermaid-js/mermaid-cli`.
    pub fn with_command(
        program: impl Into<String>,
        prefix_args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            prefix_args: prefix_args.into_iter().map(Into::into).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for MermaidCliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramRenderer for MermaidCliRenderer {
    async fn render(&self, definition: &str, theme: Theme) -> Result<String, RenderError> {
        let scratch = tempfile::tempdir()
            .map_err(|e| RenderError::Unavailable(format!("failed to create scratch dir: {e}")))?;
        let input = scratch.path().join("diagram.mmd");
        let output = scratch.path().join("diagram.svg");

        tokio::fs::write(&input, definition)
            .await
            .map_err(|e| RenderError::Unavailable(format!("failed to write input: {e}")))?;

        let child = tokio::process::Command::new(&self.program)
            .args(&self.prefix_args)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-t")
            .arg(theme.mermaid_theme())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RenderError::Unavailable(format!("failed to start {}: {e}", self.program)))?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RenderError::Unavailable(format!("render timed out after {:?}", self.timeout))
            })?
            .map_err(|e| RenderError::Unavailable(format!("failed to wait for renderer: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            tracing::debug!(status = %result.status, "Mermaid CLI rejected definition");
            return Err(RenderError::Syntax(if stderr.is_empty() {
                format!("renderer exited with {}", result.status)
            } else {
                stderr
            }));
        }

        tokio::fs::read_to_string(&output)
            .await
            .map_err(|e| RenderError::Unavailable(format!("failed to read rendered output: {e}")))
    }
}
