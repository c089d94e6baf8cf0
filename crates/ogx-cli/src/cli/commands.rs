//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("ogx")
        .about("Inspect OGX registry streams and the source they ship")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(dump_command())
        .subcommand(check_command())
        .subcommand(analyze_command())
}

/// Render a registry stream one record per line.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the records of a registry stream")
        .after_help(
            r#"EXAMPLES:
  ogx dump graph.ogx            # plain stream
  ogx dump graph.ogx --framed   # stream followed by its root id
  ogx dump graph.ogx --framed --repr  # also rehydrate the root"#,
        )
        .arg(stream_path_arg())
        .arg(framed_arg())
        .arg(repr_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// Parse a source file and report syntax errors.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Report syntax errors in a source file")
        .arg(source_path_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}

/// List the free variable chains of a scope.
pub fn analyze_command() -> Command {
    Command::new("analyze")
        .about("List the free variable chains a scope reads")
        .after_help(
            r#"EXAMPLES:
  ogx analyze job.py              # module scope
  ogx analyze job.py --line 12    # function at line 12
  ogx analyze job.py --json       # chains with positions as JSON"#,
        )
        .arg(source_path_arg())
        .arg(line_arg())
        .arg(json_arg())
        .arg(color_arg())
        .arg(verbose_arg())
}
