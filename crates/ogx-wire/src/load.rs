//! Reader side of the registry stream.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use ogx_core::{Dtype, FreeVariableChain, ObjectId, Position};

use crate::Result;
use crate::bytes::{ByteReader, SliceReader};
use crate::error::WireError;
use crate::record::{Bindings, Primitive, Record};
use crate::tag::Tag;

/// Deepest nesting of inline primitive lists or dtype descriptors a record may carry.
const MAX_NESTING: u32 = 128;

/// Complete id -> record mapping of one stream. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdTable {
    records: BTreeMap<ObjectId, Record>,
}

impl IdTable {
    pub fn get(&self, id: ObjectId) -> Option<&Record> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Record)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    fn insert(&mut self, id: ObjectId, record: Record) -> Result<()> {
        match self.records.entry(id) {
            Entry::Occupied(_) => Err(WireError::DuplicateId(id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Every referenced id must name a record somewhere in the stream.
    fn check_references(&self) -> Result<()> {
        for (id, record) in &self.records {
            if let Some(referenced) = record.references().into_iter().find(|r| !self.contains(*r)) {
                return Err(WireError::DanglingReference { id: *id, referenced });
            }
        }
        Ok(())
    }
}

/// Loads a complete in-memory stream. Bytes after the sentinel are an error.
pub fn load(bytes: &[u8]) -> Result<IdTable> {
    let mut reader = SliceReader::new(bytes);
    let table = load_from_reader(&mut reader)?;
    if !reader.is_at_end() {
        return Err(WireError::TrailingBytes {
            offset: reader.offset(),
        });
    }
    Ok(table)
}

/// Loads records up to and including the sentinel, leaving the reader just past it.
pub fn load_from_reader<R: ByteReader>(reader: &mut R) -> Result<IdTable> {
    let mut table = IdTable::default();
    while let Some((id, record)) = read_record(reader)? {
        table.insert(id, record)?;
    }
    table.check_references()?;
    tracing::debug!(records = table.len(), bytes = reader.offset(), "loaded registry stream");
    Ok(table)
}

/// Loads a stream followed by its `int64` root id.
pub fn load_framed<R: ByteReader>(reader: &mut R) -> Result<(IdTable, ObjectId)> {
    let table = load_from_reader(reader)?;
    let offset = reader.offset();
    let root = reader.read_id()?;
    if !table.contains(root) {
        return Err(WireError::OutOfRange {
            offset,
            what: "root id",
            value: root.get(),
        });
    }
    Ok((table, root))
}

/// Reads one record. `None` means the sentinel was consumed.
pub fn read_record<R: ByteReader>(reader: &mut R) -> Result<Option<(ObjectId, Record)>> {
    let offset = reader.offset();
    let raw = match reader.read_i64() {
        Ok(raw) => raw,
        // Nothing at all where the next id should be.
        Err(WireError::Truncated { needed: 8, .. }) => return Err(WireError::MissingSentinel),
        Err(e) => return Err(e),
    };
    let id = ObjectId::new(raw);
    if id.is_end_of_stream() {
        return Ok(None);
    }
    if raw < 0 {
        return Err(WireError::OutOfRange {
            offset,
            what: "object id",
            value: raw,
        });
    }

    let tag_offset = reader.offset();
    let byte = reader.read_u8()?;
    let tag = Tag::from_u8(byte).ok_or(WireError::UnknownTag {
        id,
        tag: byte,
        offset: tag_offset,
    })?;
    let record = read_payload(reader, id, tag)?;
    Ok(Some((id, record)))
}

fn read_payload<R: ByteReader>(r: &mut R, id: ObjectId, tag: Tag) -> Result<Record> {
    let record = match tag {
        Tag::None
        | Tag::Int
        | Tag::Long
        | Tag::Float
        | Tag::Bool
        | Tag::Str
        | Tag::ListOfPrimitives => Record::Primitive(read_primitive(r, id, tag, 0)?),
        Tag::Tuple => Record::Tuple(r.read_id_list()?),
        Tag::List => Record::List(r.read_id_list()?),
        Tag::Dict => {
            let keys = r.read_id_list()?;
            let values = r.read_id_list()?;
            if keys.len() != values.len() {
                return Err(WireError::OutOfRange {
                    offset: r.offset(),
                    what: "dict value count",
                    value: values.len() as i64,
                });
            }
            Record::Dict { keys, values }
        }
        Tag::File => {
            let path = r.read_string()?;
            let text = r.read_string()?;
            Record::File { path, text }
        }
        Tag::Function => {
            let file = r.read_id()?;
            let line = r.read_line32()?;
            let bindings = read_bindings(r, id)?;
            Record::Function { file, line, bindings }
        }
        Tag::Class => {
            let file = r.read_id()?;
            let line = r.read_line32()?;
            let bindings = read_bindings(r, id)?;
            let bases = r.read_id_list()?;
            Record::Class {
                file,
                line,
                bindings,
                bases,
            }
        }
        Tag::ClassInstance => {
            let class = r.read_id()?;
            let count = r.read_len32()?;
            let mut members = BTreeMap::new();
            for _ in 0..count {
                let name = r.read_string()?;
                let member = r.read_id()?;
                if let Some(key) = insert_unique(&mut members, name, member) {
                    return Err(WireError::DuplicateKey { id, key });
                }
            }
            Record::ClassInstance { class, members }
        }
        Tag::InstanceMethod => {
            let instance = r.read_id()?;
            let name = r.read_string()?;
            Record::InstanceMethod { instance, name }
        }
        Tag::NamedSingleton => Record::NamedSingleton(r.read_string()?),
        Tag::BuiltinExceptionInstance => {
            let type_name = r.read_string()?;
            let args = r.read_id()?;
            Record::BuiltinExceptionInstance { type_name, args }
        }
        Tag::PyAbortException => {
            let type_name = r.read_string()?;
            let args = r.read_id()?;
            Record::PyAbortException { type_name, args }
        }
        Tag::RemotePyObject => Record::RemoteObjectRef(r.read_string()?),
        Tag::PackedHomogenousData => {
            let dtype = read_dtype(r, id, 0)?;
            let bytes = r.read_blob()?;
            Record::PackedHomogeneousData { dtype, bytes }
        }
        Tag::WithBlock => {
            let bindings = read_bindings(r, id)?;
            let file = r.read_id()?;
            let line = r.read_line32()?;
            Record::WithBlock { bindings, file, line }
        }
        Tag::StacktraceAsJson => Record::StackTrace(r.read_string()?),
        Tag::Unconvertible => {
            let path = if r.read_bool()? {
                Some(r.read_string_tuple()?)
            } else {
                None
            };
            Record::Unconvertible(path)
        }
        Tag::UnresolvedSymbol => {
            let name = r.read_string()?;
            let line = read_u32_from_i64(r, "line")?;
            let column = read_u32_from_i64(r, "column")?;
            Record::UnresolvedSymbol {
                name,
                position: Position::new(line, column),
            }
        }
    };
    Ok(record)
}

fn read_u32_from_i64<R: ByteReader>(r: &mut R, what: &'static str) -> Result<u32> {
    let offset = r.offset();
    let n = r.read_i64()?;
    u32::try_from(n).map_err(|_| WireError::OutOfRange { offset, what, value: n })
}

fn check_depth<R: ByteReader>(r: &R, id: ObjectId, depth: u32) -> Result<()> {
    if depth > MAX_NESTING {
        return Err(WireError::TooDeep {
            id,
            offset: r.offset(),
            limit: MAX_NESTING,
        });
    }
    Ok(())
}

fn read_primitive<R: ByteReader>(
    r: &mut R,
    id: ObjectId,
    tag: Tag,
    depth: u32,
) -> Result<Primitive> {
    check_depth(r, id, depth)?;
    Ok(match tag {
        Tag::None => Primitive::None,
        Tag::Int => Primitive::Int(r.read_i64()?),
        Tag::Long => Primitive::Long(r.read_string()?),
        Tag::Float => Primitive::Float(r.read_f64()?),
        Tag::Bool => Primitive::Bool(r.read_bool()?),
        Tag::Str => Primitive::Str(r.read_string()?),
        Tag::ListOfPrimitives => {
            let count = r.read_count64()?;
            let mut items = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                let offset = r.offset();
                let byte = r.read_u8()?;
                let item_tag = Tag::from_u8(byte)
                    .filter(|t| t.is_primitive())
                    .ok_or(WireError::UnknownTag {
                        id,
                        tag: byte,
                        offset,
                    })?;
                items.push(read_primitive(r, id, item_tag, depth + 1)?);
            }
            Primitive::List(items)
        }
        _ => {
            return Err(WireError::UnknownTag {
                id,
                tag: tag.as_u8(),
                offset: r.offset(),
            });
        }
    })
}

fn read_dtype<R: ByteReader>(r: &mut R, id: ObjectId, depth: u32) -> Result<Dtype> {
    check_depth(r, id, depth)?;
    let offset = r.offset();
    let byte = r.read_u8()?;
    Ok(match Tag::from_u8(byte) {
        Some(Tag::None) => Dtype::None,
        Some(Tag::Int) => Dtype::Int(r.read_i64()?),
        Some(Tag::Str) => Dtype::Str(r.read_string()?),
        Some(Tag::Tuple) => Dtype::Tuple(read_dtype_seq(r, id, depth + 1)?),
        Some(Tag::List) => Dtype::List(read_dtype_seq(r, id, depth + 1)?),
        Some(Tag::Dict) => {
            let count = r.read_len32()?;
            let mut entries = Vec::with_capacity(count.min(64));
            for _ in 0..count {
                let k = read_dtype(r, id, depth + 1)?;
                let v = read_dtype(r, id, depth + 1)?;
                entries.push((k, v));
            }
            Dtype::Dict(entries)
        }
        _ => {
            return Err(WireError::UnknownTag {
                id,
                tag: byte,
                offset,
            });
        }
    })
}

fn read_dtype_seq<R: ByteReader>(r: &mut R, id: ObjectId, depth: u32) -> Result<Vec<Dtype>> {
    let count = r.read_len32()?;
    let mut items = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        items.push(read_dtype(r, id, depth)?);
    }
    Ok(items)
}

fn read_bindings<R: ByteReader>(r: &mut R, id: ObjectId) -> Result<Bindings> {
    let count = r.read_len32()?;
    let mut bindings = Bindings::new();
    for _ in 0..count {
        let dotted = r.read_string()?;
        let chain: FreeVariableChain = dotted
            .parse()
            .map_err(|e: ogx_core::ChainError| WireError::InvalidChain(e.to_string()))?;
        let target = r.read_id()?;
        if let Some(key) = insert_unique(&mut bindings, chain, target) {
            return Err(WireError::DuplicateKey { id, key });
        }
    }
    Ok(bindings)
}

/// Hands the key back when it is already present.
fn insert_unique<K: Ord + ToString>(
    map: &mut BTreeMap<K, ObjectId>,
    key: K,
    value: ObjectId,
) -> Option<String> {
    match map.entry(key) {
        Entry::Occupied(slot) => Some(slot.key().to_string()),
        Entry::Vacant(slot) => {
            slot.insert(value);
            None
        }
    }
}
