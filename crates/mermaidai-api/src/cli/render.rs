//! `mermaidai render` -- render a diagram file to SVG.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use console::style;

use mermaidai_core::render::DiagramRenderer;
use mermaidai_core::templates;
use mermaidai_infra::render::MermaidCliRenderer;
use mermaidai_types::theme::Theme;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Diagram definition to render.
    #[arg(required_unless_present = "template")]
    pub input: Option<PathBuf>,

    /// Render a built-in template instead of a file (sequence, flowchart, class, state, er).
    #[arg(long, conflicts_with = "input")]
    pub template: Option<String>,

    /// Where to write the SVG. Defaults to the input path with an `.svg` extension,
    /// or stdout for templates.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Color theme.
    #[arg(long, default_value = "light")]
    pub theme: Theme,

    /// Mermaid CLI launcher, e.g. `mmdc` or `npx -y @mermaid-js/mermaid-cli`.
    #[arg(long, default_value = "mmdc")]
    pub mmdc: String,

    /// Seconds to wait for the renderer.
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl RenderArgs {
    fn renderer(&self) -> anyhow::Result<MermaidCliRenderer> {
        let mut parts = self.mmdc.split_whitespace();
        let program = parts.next().context("--mmdc must not be empty")?;
        Ok(MermaidCliRenderer::with_command(program, parts)
            .with_timeout(Duration::from_secs(self.timeout)))
    }

    async fn definition(&self) -> anyhow::Result<String> {
        if let Some(name) = &self.template {
            let template = templates::find(name)
                .with_context(|| format!("unknown template '{name}'"))?;
            return Ok(template.definition.to_string());
        }
        let input = self.input.as_ref().context("no input file given")?;
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("failed to read {}", input.display()))
    }

    fn output_path(&self) -> Option<PathBuf> {
        self.output
            .clone()
            .or_else(|| self.input.as_ref().map(|input| input.with_extension("svg")))
    }
}

pub async fn render(args: RenderArgs, json: bool) -> anyhow::Result<()> {
    let definition = args.definition().await?;
    let svg = args.renderer()?.render(&definition, args.theme).await?;

    match args.output_path() {
        Some(path) => {
            tokio::fs::write(&path, &svg)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            if json {
                let out = serde_json::json!({
                    "output": path.display().to_string(),
                    "theme": args.theme,
                    "bytes": svg.len(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "  {} Rendered {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => println!("{svg}"),
    }
    Ok(())
}
