use std::path::PathBuf;

use ogx_analyzer::SourceModule;

use super::{CommandError, exit_with, read_text};

pub struct CheckArgs {
    pub source_path: PathBuf,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    if let Err(err) = render(&args) {
        exit_with(err);
    }
    // Silent on success (like cargo check)
}

pub fn render(args: &CheckArgs) -> Result<(), CommandError> {
    let text = read_text(&args.source_path)?;
    let module = SourceModule::parse(text);
    if module.is_valid() {
        return Ok(());
    }

    let path = args.source_path.display().to_string();
    let rendered = module
        .diagnostics()
        .filtered()
        .printer()
        .source(module.text())
        .path(&path)
        .colored(args.color)
        .render();
    Err(CommandError::Syntax(rendered))
}
