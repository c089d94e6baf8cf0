#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Registry stream format for OGX.
//!
//! A stream is a flat sequence of records, each `id:i64 tag:u8 payload`,
//! terminated by the id `-1`. Children are always written before the
//! containers that reference them, except where a container reaches itself
//! through a cycle.
//!
//! - [`GraphRegistry`] writes records one at a time to any `io::Write`
//! - [`load`] / [`load_from_reader`] / [`load_framed`] read a whole stream into an [`IdTable`]
//! - [`dump`] renders an [`IdTable`] for humans

mod bytes;
mod dump;
mod error;
mod load;
mod record;
mod registry;
mod tag;

#[cfg(test)]
mod bytes_tests;
#[cfg(test)]
mod load_tests;
#[cfg(test)]
mod registry_tests;

pub use bytes::{ByteReader, ByteWriter, SliceReader, StreamReader};
pub use dump::dump;
pub use error::WireError;
pub use load::{IdTable, load, load_framed, load_from_reader, read_record};
pub use record::{Bindings, Primitive, Record};
pub use registry::GraphRegistry;
pub use tag::Tag;

pub type Result<T> = std::result::Result<T, WireError>;
