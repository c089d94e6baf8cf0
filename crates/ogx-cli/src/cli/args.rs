//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Registry stream file (positional).
pub fn stream_path_arg() -> Arg {
    Arg::new("stream_path")
        .value_name("STREAM")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Registry stream file")
}

/// Stream carries a trailing root id (--framed).
pub fn framed_arg() -> Arg {
    Arg::new("framed")
        .long("framed")
        .action(ArgAction::SetTrue)
        .help("Expect an int64 root id after the end-of-stream marker")
}

/// Rehydrate the root and print its repr (--repr).
pub fn repr_arg() -> Arg {
    Arg::new("repr")
        .long("repr")
        .action(ArgAction::SetTrue)
        .requires("framed")
        .help("Rehydrate the root object and print its repr")
}

/// Source file to analyze (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Source file to analyze")
}

/// Line of the function or lambda to analyze (--line).
pub fn line_arg() -> Arg {
    Arg::new("line")
        .long("line")
        .value_name("N")
        .value_parser(value_parser!(u32).range(1..))
        .help("Analyze the function or lambda defined at this line instead of the module")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print chains as JSON")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Log verbosity (-v, repeatable).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Log more (-v info, -vv debug, -vvv trace)")
}
