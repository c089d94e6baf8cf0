//! Tests for CLI dispatch logic.

use std::path::PathBuf;

use super::*;
use crate::cli::commands::{analyze_command, check_command, dump_command};

#[test]
fn dump_params() {
    let m = dump_command()
        .try_get_matches_from(["dump", "graph.ogx", "--framed", "--color", "never"])
        .unwrap();
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.stream_path, PathBuf::from("graph.ogx"));
    assert!(params.framed);
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn dump_defaults() {
    let m = dump_command().try_get_matches_from(["dump", "graph.ogx"]).unwrap();
    let params = DumpParams::from_matches(&m);

    assert!(!params.framed);
    assert!(!params.repr);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn dump_requires_a_stream() {
    let result = dump_command().try_get_matches_from(["dump"]);
    assert!(result.is_err());
}

#[test]
fn repr_needs_framed() {
    let result = dump_command().try_get_matches_from(["dump", "graph.ogx", "--repr"]);
    assert!(result.is_err());

    let m = dump_command()
        .try_get_matches_from(["dump", "graph.ogx", "--framed", "--repr"])
        .unwrap();
    assert!(DumpParams::from_matches(&m).repr);
}

#[test]
fn check_params() {
    let m = check_command()
        .try_get_matches_from(["check", "job.py", "--color", "always"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.source_path, PathBuf::from("job.py"));
    assert_eq!(params.color, ColorChoice::Always);
}

#[test]
fn analyze_params() {
    let m = analyze_command()
        .try_get_matches_from(["analyze", "job.py", "--line", "12", "--json"])
        .unwrap();
    let params = AnalyzeParams::from_matches(&m);

    assert_eq!(params.source_path, PathBuf::from("job.py"));
    assert_eq!(params.line, Some(12));
    assert!(params.json);
}

#[test]
fn analyze_rejects_line_zero() {
    let result = analyze_command().try_get_matches_from(["analyze", "job.py", "--line", "0"]);
    assert!(result.is_err());
}

#[test]
fn verbosity_counts() {
    let m = analyze_command()
        .try_get_matches_from(["analyze", "job.py", "-vvv"])
        .unwrap();
    assert_eq!(m.get_count("verbose"), 3);
}

#[test]
fn unknown_color_rejected() {
    let result = check_command().try_get_matches_from(["check", "job.py", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    let result = build_cli().try_get_matches_from(["ogx"]);
    assert!(result.is_err());
}

#[test]
fn help_lists_commands() {
    let help = build_cli().render_help().to_string();
    assert!(help.contains("dump"));
    assert!(help.contains("check"));
    assert!(help.contains("analyze"));
}
