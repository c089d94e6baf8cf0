//! Session boundary: bytes in, values out, and back.
//!
//! A plain stream is the registry records and the sentinel; the caller keeps
//! the root id. A framed stream appends the root id as `int64`, so a reader
//! on the other end of a pipe or file needs nothing else.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ogx_core::{ObjectId, Value};
use ogx_wire::{ByteReader, ByteWriter, IdTable, SliceReader, StreamReader, WireError};

use crate::collab::{CodeInspector, HostConstructor, ModuleIndex, NoMapping, NoModules, SourceInspector, ValueMapping};
use crate::config::{RehydratorConfig, WalkerConfig};
use crate::error::{RehydrateError, Result};
use crate::rehydrate::Rehydrator;
use crate::walker::ObjectWalker;

/// An encoded stream and the id of its root value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub root: ObjectId,
}

/// Configuration and collaborators for both directions.
pub struct Session<'a> {
    walker: &'a WalkerConfig,
    rehydrator: &'a RehydratorConfig,
    mapping: &'a dyn ValueMapping,
    modules: &'a dyn ModuleIndex,
    inspector: &'a dyn SourceInspector,
    constructor: Option<&'a dyn HostConstructor>,
}

impl<'a> Session<'a> {
    pub fn new(walker: &'a WalkerConfig, rehydrator: &'a RehydratorConfig) -> Self {
        Self {
            walker,
            rehydrator,
            mapping: &NoMapping,
            modules: &NoModules,
            inspector: &CodeInspector,
            constructor: None,
        }
    }

    pub fn with_mapping(mut self, mapping: &'a dyn ValueMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_module_index(mut self, modules: &'a dyn ModuleIndex) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_inspector(mut self, inspector: &'a dyn SourceInspector) -> Self {
        self.inspector = inspector;
        self
    }

    pub fn with_constructor(mut self, constructor: &'a dyn HostConstructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    fn walker<W: Write>(&self, out: W) -> ObjectWalker<'a, W> {
        ObjectWalker::new(out, self.walker)
            .with_mapping(self.mapping)
            .with_module_index(self.modules)
            .with_inspector(self.inspector)
    }

    fn rehydrator<'t>(&self, table: &'t IdTable) -> Rehydrator<'t>
    where
        'a: 't,
    {
        let rehydrator = Rehydrator::new(table, self.rehydrator)
            .with_mapping(self.mapping)
            .with_module_index(self.modules);
        match self.constructor {
            Some(constructor) => rehydrator.with_constructor(constructor),
            None => rehydrator,
        }
    }

    pub fn encode(&self, value: &Value) -> Result<Encoded> {
        let mut walker = self.walker(Vec::new());
        let root = walker.walk(value)?;
        let bytes = walker.finish()?;
        tracing::debug!(%root, bytes = bytes.len(), "encoded");
        Ok(Encoded { bytes, root })
    }

    /// Streams the records and then the root id to `out`.
    pub fn encode_framed<W: Write>(&self, value: &Value, out: W) -> Result<ObjectId> {
        let mut walker = self.walker(out);
        let root = walker.walk(value)?;
        let mut out = walker.finish()?;
        let mut trailer = ByteWriter::with_capacity(8);
        trailer.add_id(root);
        out.write_all(trailer.as_slice())?;
        out.flush()?;
        Ok(root)
    }

    pub fn decode(&self, bytes: &[u8], root: ObjectId) -> Result<Value> {
        let table = ogx_wire::load(bytes)?;
        self.materialize(&table, root)
    }

    /// Reads one framed stream from `reader`. Bytes after it are left unread.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<Value> {
        let mut reader = StreamReader::new(reader);
        let (table, root) = ogx_wire::load_framed(&mut reader)?;
        self.materialize(&table, root)
    }

    /// Memory-maps `path` and decodes the framed stream it holds.
    pub fn decode_path(&self, path: impl AsRef<Path>) -> Result<Value> {
        let file = File::open(path.as_ref())?;
        // The mapping is read once, while the file stays open.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        let mut reader = SliceReader::new(&mmap);
        let (table, root) = ogx_wire::load_framed(&mut reader)?;
        if !reader.is_at_end() {
            return Err(WireError::TrailingBytes {
                offset: reader.offset(),
            }
            .into());
        }
        tracing::debug!(path = %path.as_ref().display(), records = table.len(), "decoding file");
        self.materialize(&table, root)
    }

    fn materialize(&self, table: &IdTable, root: ObjectId) -> Result<Value> {
        if !table.contains(root) {
            return Err(RehydrateError::UnknownId(root).into());
        }
        let mut rehydrator = self.rehydrator(table);
        let value = rehydrator.materialize(root)?;
        tracing::debug!(%root, materialized = rehydrator.materialized(), "decoded");
        Ok(value)
    }
}

/// Encodes with default collaborators.
pub fn encode(value: &Value, config: &WalkerConfig) -> Result<Encoded> {
    let rehydrator = RehydratorConfig::matching(config);
    Session::new(config, &rehydrator).encode(value)
}

pub fn encode_framed<W: Write>(value: &Value, out: W, config: &WalkerConfig) -> Result<ObjectId> {
    let rehydrator = RehydratorConfig::matching(config);
    Session::new(config, &rehydrator).encode_framed(value, out)
}

/// Decodes with default collaborators.
pub fn decode(bytes: &[u8], root: ObjectId, config: &RehydratorConfig) -> Result<Value> {
    let walker = WalkerConfig::new(config.singletons.clone());
    Session::new(&walker, config).decode(bytes, root)
}

pub fn decode_reader<R: Read>(reader: R, config: &RehydratorConfig) -> Result<Value> {
    let walker = WalkerConfig::new(config.singletons.clone());
    Session::new(&walker, config).decode_reader(reader)
}

pub fn decode_path(path: impl AsRef<Path>, config: &RehydratorConfig) -> Result<Value> {
    let walker = WalkerConfig::new(config.singletons.clone());
    Session::new(&walker, config).decode_path(path)
}
