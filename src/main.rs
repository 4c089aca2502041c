use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use notedown::{Config, RenderMode};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Editor/preview view model as JSON
    Editor,
    /// Compact widget view model as JSON
    Widget,
    /// Paginated print layout as JSON
    Print,
    /// Typst markup of the print layout
    Typst,
    /// PDF bytes
    Pdf,
}

#[derive(Parser)]
#[command(name = "notedown")]
#[command(about = "Render markdown notes for the editor, the widget or print")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    #[arg(short, long, value_enum, default_value = "editor")]
    mode: Mode,

    /// Raw source lines the widget may use (overrides the config, 0 for all)
    #[arg(long)]
    lines: Option<usize>,

    /// TOML config file
    #[arg(short, long, default_value = "notedown.toml")]
    config: PathBuf,

    /// Output file (defaults to stdout, or the input name with .pdf for PDF)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Toggle the checklist item on this 0-based line and write the file back
    #[arg(long)]
    toggle: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Read input file
    let markdown = fs::read_to_string(&cli.input)
        .with_context(|| format!("Error reading {}", cli.input.display()))?;

    if let Some(line) = cli.toggle {
        let Some(updated) = notedown::try_toggle_checklist(&markdown, line) else {
            bail!("line {line} of {} is not a checklist item", cli.input.display());
        };
        fs::write(&cli.input, updated)
            .with_context(|| format!("Error writing {}", cli.input.display()))?;
        println!("Toggled line {} of {}", line, cli.input.display());
        return Ok(());
    }

    let config = Config::load(&cli.config)?;

    let bytes = match cli.mode {
        Mode::Editor => json(&notedown::render(&markdown, RenderMode::Editor, &config))?,
        Mode::Widget => json(&notedown::render(
            &markdown,
            RenderMode::Widget {
                line_limit: cli.lines,
            },
            &config,
        ))?,
        Mode::Print => json(&notedown::render(&markdown, RenderMode::Print, &config))?,
        Mode::Typst => notedown::markdown_to_typst_with_config(&markdown, &config).into_bytes(),
        Mode::Pdf => {
            let pdf_bytes = notedown::markdown_to_pdf_with_config(&markdown, &config)?;
            // Determine output path
            let output = cli
                .output
                .unwrap_or_else(|| cli.input.with_extension("pdf"));
            fs::write(&output, pdf_bytes)
                .with_context(|| format!("Error writing {}", output.display()))?;
            println!("Created {}", output.display());
            return Ok(());
        }
    };

    match cli.output {
        Some(output) => fs::write(&output, bytes)
            .with_context(|| format!("Error writing {}", output.display()))?,
        None => io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

fn json(rendered: &notedown::Rendered) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(rendered)?;
    bytes.push(b'\n');
    Ok(bytes)
}
