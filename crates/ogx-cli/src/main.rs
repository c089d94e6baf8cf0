#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cli;
mod commands;

use cli::{AnalyzeParams, CheckParams, DumpParams, build_cli, init_tracing};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("dump", m)) => {
            init_tracing(m.get_count("verbose"));
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("check", m)) => {
            init_tracing(m.get_count("verbose"));
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("analyze", m)) => {
            init_tracing(m.get_count("verbose"));
            let params = AnalyzeParams::from_matches(m);
            commands::analyze::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
