use std::path::PathBuf;

use ogx_core::Colors;
use ogx_lib::{Rehydrator, RehydratorConfig};
use ogx_wire::{SliceReader, dump, load, load_framed};

use super::{CommandError, exit_with, read_bytes};

pub struct DumpArgs {
    pub stream_path: PathBuf,
    pub framed: bool,
    pub repr: bool,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    match render(&args) {
        Ok(out) => print!("{}", out),
        Err(err) => exit_with(err),
    }
}

pub fn render(args: &DumpArgs) -> Result<String, CommandError> {
    let bytes = read_bytes(&args.stream_path)?;
    let colors = Colors::new(args.color);

    if !args.framed {
        let table = load(&bytes)?;
        return Ok(dump(&table, colors));
    }

    let mut reader = SliceReader::new(&bytes);
    let (table, root) = load_framed(&mut reader)?;
    tracing::info!(records = table.len(), %root, "loaded framed stream");
    let mut out = dump(&table, colors);
    out.push_str(&format!("root {}\n", root));

    if args.repr {
        let config = RehydratorConfig::default();
        let value = Rehydrator::new(&table, &config)
            .materialize(root)
            .map_err(ogx_lib::Error::from)?;
        out.push_str(&format!("repr {}\n", value.repr()));
    }
    Ok(out)
}
