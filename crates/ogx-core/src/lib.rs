#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for OGX.
//!
//! Two layers:
//! - **Addressing**: object ids, free-variable chains and source positions,
//!   shared by the wire format and the source analyzer
//! - **Host values**: the dynamic, reference-counted value model that the
//!   walker linearizes and the rehydrator reconstructs

mod chain;
mod colors;
mod dtype;
mod id;
mod namespace;
mod repr;
mod value;

#[cfg(test)]
mod chain_tests;

pub use chain::{ChainError, ChainWithPosition, FreeVariableChain, Position};
pub use colors::Colors;
pub use dtype::{Dtype, ElementType, PackedDataError};
pub use id::ObjectId;
pub use namespace::{NameNotDefined, Namespace, Slot, UnresolvedName};
pub use value::{
    BoundMethod, BuiltinKind, BuiltinObject, ClassObject, CodeLocation, ExceptionObject,
    FunctionObject, Identity, InstanceObject, ModuleObject, Object, OpaqueObject, PackedArray,
    PendingValue, RemoteObject, SourceFile, Value, WithBlockObject,
};
