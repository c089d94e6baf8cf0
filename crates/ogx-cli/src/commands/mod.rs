use std::path::{Path, PathBuf};

use ogx_analyzer::AnalysisError;
use ogx_wire::WireError;

pub mod analyze;
pub mod check;
pub mod dump;


/// Failure of a CLI command, printed as `error: ...` before exiting with status 1.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("can't read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed stream: {0}")]
    Wire(#[from] WireError),

    #[error("can't rehydrate root: {0}")]
    Decode(#[from] ogx_lib::Error),

    /// Pre-rendered syntax diagnostics.
    #[error("{0}")]
    Syntax(String),

    #[error("can't analyze {}: {source}", .path.display())]
    Analysis {
        path: PathBuf,
        source: AnalysisError,
    },

    #[error("can't serialize chains: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, CommandError> {
    std::fs::read(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_text(path: &Path) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn exit_with(err: CommandError) -> ! {
    match err {
        CommandError::Syntax(rendered) => eprintln!("{rendered}"),
        other => eprintln!("error: {}", other),
    }
    std::process::exit(1);
}
