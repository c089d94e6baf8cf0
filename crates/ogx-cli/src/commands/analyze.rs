use std::fmt::Write as _;
use std::path::PathBuf;

use ogx_analyzer::{AnalysisError, SourceModule};
use ogx_core::ChainWithPosition;
use serde::Serialize;

use super::{CommandError, exit_with, read_text};

pub struct AnalyzeArgs {
    pub source_path: PathBuf,
    pub line: Option<u32>,
    pub json: bool,
    pub color: bool,
}

/// One chain as printed by `--json`.
#[derive(Debug, Serialize)]
struct ChainEntry {
    chain: String,
    line: u32,
    column: u32,
}

impl From<&ChainWithPosition> for ChainEntry {
    fn from(c: &ChainWithPosition) -> Self {
        Self {
            chain: c.chain.dotted(),
            line: c.position.line,
            column: c.position.column,
        }
    }
}

pub fn run(args: AnalyzeArgs) {
    match render(&args) {
        Ok(out) => print!("{}", out),
        Err(err) => exit_with(err),
    }
}

pub fn render(args: &AnalyzeArgs) -> Result<String, CommandError> {
    let text = read_text(&args.source_path)?;
    let module = SourceModule::parse(text);
    let chains = free_chains(&module, args.line).map_err(|source| match source {
        AnalysisError::Syntax(diagnostics) => {
            let path = args.source_path.display().to_string();
            CommandError::Syntax(
                diagnostics
                    .printer()
                    .source(module.text())
                    .path(&path)
                    .colored(args.color)
                    .render(),
            )
        }
        source => CommandError::Analysis {
            path: args.source_path.clone(),
            source,
        },
    })?;
    tracing::debug!(chains = chains.len(), "analyzed scope");

    if args.json {
        let entries: Vec<ChainEntry> = chains.iter().map(ChainEntry::from).collect();
        let mut out = serde_json::to_string_pretty(&entries)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for c in &chains {
        let _ = writeln!(out, "{} @ {}", c.chain, c.position);
    }
    Ok(out)
}

fn free_chains(
    module: &SourceModule,
    line: Option<u32>,
) -> Result<Vec<ChainWithPosition>, AnalysisError> {
    let scope = match line {
        Some(line) => module.function_or_lambda_at_line(line)?,
        None => module.module_scope()?,
    };
    module.free_variable_chains(&scope)
}
