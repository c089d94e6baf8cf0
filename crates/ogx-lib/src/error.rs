//! Encode-side and decode-side errors.

use std::io;

use ogx_analyzer::AnalysisError;
use ogx_core::{NameNotDefined, ObjectId};
use ogx_wire::WireError;

/// Errors raised while walking a value graph.
///
/// Only [`WalkError::is_fatal`] errors abort a whole walk. The rest describe
/// one sub-object and, depending on configuration, either propagate or
/// degrade that sub-object to an Unconvertible record.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("`{name}` is a reserved name and can't be walked")]
    ReservedName { name: String },

    #[error("can't get source text for {what}: {reason}")]
    CantGetSourceText { what: String, reason: String },

    #[error("invalid with block in {path} at line {line}: {source}")]
    WithBlock {
        path: String,
        line: u32,
        #[source]
        source: AnalysisError,
    },

    #[error("can't analyze {path}: {source}")]
    Analysis {
        path: String,
        #[source]
        source: AnalysisError,
    },

    #[error("member access chain ends at module `{module}`")]
    ModuleEndsChain { module: String },

    #[error("module `{module}` has no member `{member}`")]
    ModuleMissingMember { module: String, member: String },

    #[error("value mapping failed: {0}")]
    Mapping(String),

    #[error("pending result failed: {0}")]
    PendingResult(String),

    #[error(transparent)]
    Wire(#[from] WireError),
}

impl WalkError {
    /// Errors that leave the stream unusable or violate a hard rule.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WalkError::ReservedName { .. } | WalkError::Wire(_))
    }

    /// Errors the walker may record as an Unconvertible sub-object.
    ///
    /// With-block errors are reported, never degraded: emitting a placeholder
    /// would hide the offending line from the caller.
    pub fn degrades(&self) -> bool {
        matches!(
            self,
            WalkError::CantGetSourceText { .. }
                | WalkError::Analysis { .. }
                | WalkError::ModuleEndsChain { .. }
                | WalkError::ModuleMissingMember { .. }
                | WalkError::Mapping(_)
                | WalkError::PendingResult(_)
        )
    }

    /// Source line the error points at, when there is one.
    pub fn line(&self) -> Option<u32> {
        match self {
            WalkError::WithBlock { source, .. } | WalkError::Analysis { source, .. } => source.line(),
            _ => None,
        }
    }
}

/// Errors raised while rehydrating a decoded table.
#[derive(Debug, thiserror::Error)]
pub enum RehydrateError {
    #[error("object {0} is not in the table")]
    UnknownId(ObjectId),

    #[error(transparent)]
    NameNotDefined(#[from] NameNotDefined),

    #[error("object {0} depends on itself through a definition")]
    CyclicDefinition(ObjectId),

    #[error("unknown singleton `{0}`")]
    UnknownSingleton(String),

    #[error("instance has no method `{method}`")]
    MissingMethod { method: String },

    #[error("invalid packed data: {0}")]
    InvalidPackedData(String),

    #[error("invalid json payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("can't construct definition at {path}:{line}: {reason}")]
    Construction { path: String, line: u32, reason: String },

    #[error("value mapping failed: {0}")]
    Mapping(String),

    #[error("object {id} expected to be {expected}")]
    UnexpectedRecord { id: ObjectId, expected: &'static str },

    /// Revisiting an id whose materialization already failed.
    #[error("object {id} failed earlier: {reason}")]
    Failed { id: ObjectId, reason: String },
}

/// Errors of the session-level operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Rehydrate(#[from] RehydrateError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
