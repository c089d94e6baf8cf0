//! Object graph exchange.
//!
//! Hands a live, possibly cyclic value graph to another process and builds
//! an equivalent graph from the bytes on the other side.
//!
//! # Example
//!
//! ```
//! use ogx_core::Value;
//! use ogx_lib::{RehydratorConfig, WalkerConfig};
//!
//! let list = Value::list(vec![Value::int(1), Value::str("two")]);
//! let walker = WalkerConfig::default();
//! let encoded = ogx_lib::encode(&list, &walker).unwrap();
//!
//! let decoded = ogx_lib::decode(&encoded.bytes, encoded.root, &RehydratorConfig::matching(&walker)).unwrap();
//! assert!(decoded.graph_eq(&list));
//! ```
//!
//! Functions and classes travel as source text plus a line number, with
//! their free variables resolved against the scopes they close over. See
//! [`walker`] for the encode side and [`rehydrate`] for the decode side.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod collab;
pub mod config;
mod error;
pub mod rehydrate;
pub mod resolve;
mod session;
pub mod sources;
pub mod walker;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod session_tests;
#[cfg(test)]
mod test_utils;

pub use collab::{
    CodeInspector, HostConstructor, ModuleIndex, ModuleTable, NoMapping, NoModules, SourceConstructor,
    SourceInspector, ValueMapping,
};
pub use config::{AbortSingletons, NamedSingletons, RehydratorConfig, WalkerConfig};
pub use error::{Error, RehydrateError, Result, WalkError};
pub use rehydrate::Rehydrator;
pub use resolve::{Resolution, ScopeResolver};
pub use session::{Encoded, Session, decode, decode_path, decode_reader, encode, encode_framed};
pub use walker::ObjectWalker;
