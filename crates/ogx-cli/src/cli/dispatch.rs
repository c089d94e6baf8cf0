//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::analyze::AnalyzeArgs;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;

pub struct DumpParams {
    pub stream_path: PathBuf,
    pub framed: bool,
    pub repr: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            stream_path: required_path(m, "stream_path"),
            framed: m.get_flag("framed"),
            repr: m.get_flag("repr"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            stream_path: p.stream_path,
            framed: p.framed,
            repr: p.repr,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub source_path: PathBuf,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: required_path(m, "source_path"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            source_path: p.source_path,
            color: p.color.should_colorize(),
        }
    }
}

pub struct AnalyzeParams {
    pub source_path: PathBuf,
    pub line: Option<u32>,
    pub json: bool,
    pub color: ColorChoice,
}

impl AnalyzeParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: required_path(m, "source_path"),
            line: m.get_one::<u32>("line").copied(),
            json: m.get_flag("json"),
            color: parse_color(m),
        }
    }
}

impl From<AnalyzeParams> for AnalyzeArgs {
    fn from(p: AnalyzeParams) -> Self {
        Self {
            source_path: p.source_path,
            line: p.line,
            json: p.json,
            color: p.color.should_colorize(),
        }
    }
}

// Positionals marked `required(true)` are always present once clap accepts the input.
fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
