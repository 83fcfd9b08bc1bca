use std::fmt;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hoist_errors::{Diagnostic, Renderer};
use hoist_ide::{Analysis, CancellationToken, FileRange, Server};
use hoist_inputs::{File, LineCol};
use text_size::{TextRange, TextSize};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version)]
enum Options {
    /// Reports syntax and declaration errors.
    Check { path: Utf8PathBuf },
    /// Moves the field at a position, and the property wrapping it, into the
    /// base class.
    MoveField {
        path: Utf8PathBuf,
        /// Byte offset of the cursor.
        #[arg(long, conflicts_with = "line", required_unless_present = "line")]
        offset: Option<u32>,
        /// One-based line of the cursor.
        #[arg(long, requires = "column")]
        line: Option<u32>,
        /// One-based column of the cursor, in bytes.
        #[arg(long, requires = "line")]
        column: Option<u32>,
        /// Write the result back instead of printing it.
        #[arg(long)]
        write: bool,
    },
    /// Runs the language server over stdio.
    Server,
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Offset(u32),
    LineColumn { line: u32, column: u32 },
}

impl Cursor {
    fn resolve(self, analysis: &Analysis, file: File) -> Option<TextSize> {
        let len = TextSize::of(file.text(analysis.db()));
        let offset = match self {
            Self::Offset(offset) => TextSize::new(offset),
            Self::LineColumn { line, column } => {
                let line_col = LineCol { line: line.checked_sub(1)?, col: column.checked_sub(1)? };
                file.line_index(analysis.db()).offset(line_col)?
            }
        };
        (offset <= len).then_some(offset)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "offset {offset}"),
            Self::LineColumn { line, column } => write!(f, "{line}:{column}"),
        }
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();

    match Options::parse() {
        Options::Check { path } => check(&path),
        Options::MoveField { path, offset, line, column, write } => {
            let cursor = match (offset, line, column) {
                (Some(offset), _, _) => Cursor::Offset(offset),
                (None, Some(line), Some(column)) => Cursor::LineColumn { line, column },
                _ => anyhow::bail!("either `--offset` or `--line` and `--column` is required"),
            };
            move_field(&path, cursor, write)
        }
        Options::Server => {
            Server::new()?.run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr so that stdout stays free for results and LSP traffic.
fn init_tracing() {
    let filter = std::env::var("HOIST_LOG").unwrap_or_else(|_| "warn".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().parse_lossy(filter))
        .with_writer(std::io::stderr)
        .init();
}

fn load(analysis: &Analysis, path: &Utf8Path) -> Result<File> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;
    Ok(File::new(analysis.db(), path.to_owned(), text))
}

fn check(path: &Utf8Path) -> Result<ExitCode> {
    let analysis = Analysis::default();
    let file = load(&analysis, path)?;

    let renderer = Renderer::styled();
    let diagnostics = analysis.diagnostics(file);

    let path = file.path(analysis.db()).as_str();
    let text = file.text(analysis.db());

    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.render(&renderer, path, text));
    }

    if diagnostics.iter().any(Diagnostic::is_error) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn move_field(path: &Utf8Path, cursor: Cursor, write: bool) -> Result<ExitCode> {
    let analysis = Analysis::default();
    let file = load(&analysis, path)?;

    let offset =
        cursor.resolve(&analysis, file).with_context(|| format!("{cursor} is outside `{path}`"))?;
    let range = FileRange { file, range: TextRange::empty(offset) };

    let Some(offer) = analysis.offer_refactoring(range) else {
        eprintln!("{path}: no movable field with a base class at {cursor}");
        return Ok(ExitCode::FAILURE);
    };

    let change = offer.compute_edit(&CancellationToken::new())?;
    let mut text = file.text(analysis.db()).to_owned();
    change.edit.apply(&mut text);

    if write {
        std::fs::write(path, &text).with_context(|| format!("failed to write `{path}`"))?;
        tracing::info!(%path, "moved field");
    } else {
        print!("{text}");
    }

    Ok(ExitCode::SUCCESS)
}
