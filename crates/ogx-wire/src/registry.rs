//! Writer side of the registry stream.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;

use ogx_core::{Dtype, ObjectId, Position};

use crate::Result;
use crate::bytes::ByteWriter;
use crate::error::WireError;
use crate::record::{Bindings, Primitive, Record};
use crate::tag::Tag;

/// Streams records to `W`, one `write_all` per record.
///
/// Nothing beyond the record being encoded is held in memory. Defining the
/// same id twice is a caller bug; the walker rules it out with its identity
/// table, so it is not checked here.
pub struct GraphRegistry<W: Write> {
    out: W,
    scratch: ByteWriter,
    next_id: i64,
    unconvertible: HashSet<ObjectId>,
    bytes_written: u64,
}

impl<W: Write> GraphRegistry<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            scratch: ByteWriter::with_capacity(256),
            next_id: 0,
            unconvertible: HashSet::new(),
            bytes_written: 0,
        }
    }

    /// Next unused id. Has no other effect.
    pub fn allocate_object(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Whether `id` was recorded as [`Record::Unconvertible`].
    pub fn is_unconvertible(&self, id: ObjectId) -> bool {
        self.unconvertible.contains(&id)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn begin(&mut self, id: ObjectId, tag: Tag) {
        self.scratch.clear();
        self.scratch.add_id(id);
        self.scratch.add_byte(tag.as_u8());
    }

    fn commit(&mut self) -> Result<()> {
        self.out.write_all(self.scratch.as_slice())?;
        self.bytes_written += self.scratch.len() as u64;
        Ok(())
    }

    fn add_line(&mut self, line: u32) -> Result<()> {
        let n = i32::try_from(line).map_err(|_| WireError::OutOfRange {
            offset: self.scratch.len(),
            what: "line",
            value: line as i64,
        })?;
        self.scratch.add_i32(n);
        Ok(())
    }

    fn add_bindings(&mut self, bindings: &Bindings) -> Result<()> {
        self.scratch.add_len32(bindings.len())?;
        for (chain, id) in bindings {
            self.scratch.add_string(&chain.dotted())?;
            self.scratch.add_id(*id);
        }
        Ok(())
    }

    pub fn define_primitive(&mut self, id: ObjectId, primitive: &Primitive) -> Result<()> {
        tracing::trace!(%id, tag = primitive.tag().name(), "define");
        self.scratch.clear();
        self.scratch.add_id(id);
        write_primitive(&mut self.scratch, primitive)?;
        self.commit()
    }

    pub fn define_tuple(&mut self, id: ObjectId, members: &[ObjectId]) -> Result<()> {
        tracing::trace!(%id, len = members.len(), "define tuple");
        self.begin(id, Tag::Tuple);
        self.scratch.add_id_list(members);
        self.commit()
    }

    pub fn define_list(&mut self, id: ObjectId, members: &[ObjectId]) -> Result<()> {
        tracing::trace!(%id, len = members.len(), "define list");
        self.begin(id, Tag::List);
        self.scratch.add_id_list(members);
        self.commit()
    }

    pub fn define_dict(&mut self, id: ObjectId, keys: &[ObjectId], values: &[ObjectId]) -> Result<()> {
        tracing::trace!(%id, len = keys.len(), "define dict");
        self.begin(id, Tag::Dict);
        self.scratch.add_id_list(keys);
        self.scratch.add_id_list(values);
        self.commit()
    }

    pub fn define_file(&mut self, id: ObjectId, path: &str, text: &str) -> Result<()> {
        tracing::trace!(%id, path, "define file");
        self.begin(id, Tag::File);
        self.scratch.add_string(path)?;
        self.scratch.add_string(text)?;
        self.commit()
    }

    pub fn define_function(
        &mut self,
        id: ObjectId,
        file: ObjectId,
        line: u32,
        bindings: &Bindings,
    ) -> Result<()> {
        tracing::trace!(%id, %file, line, "define function");
        self.begin(id, Tag::Function);
        self.scratch.add_id(file);
        self.add_line(line)?;
        self.add_bindings(bindings)?;
        self.commit()
    }

    pub fn define_class(
        &mut self,
        id: ObjectId,
        file: ObjectId,
        line: u32,
        bindings: &Bindings,
        bases: &[ObjectId],
    ) -> Result<()> {
        tracing::trace!(%id, %file, line, "define class");
        self.begin(id, Tag::Class);
        self.scratch.add_id(file);
        self.add_line(line)?;
        self.add_bindings(bindings)?;
        self.scratch.add_id_list(bases);
        self.commit()
    }

    /// Members are written in name order.
    pub fn define_class_instance(
        &mut self,
        id: ObjectId,
        class: ObjectId,
        members: &BTreeMap<String, ObjectId>,
    ) -> Result<()> {
        tracing::trace!(%id, %class, "define class instance");
        self.begin(id, Tag::ClassInstance);
        self.scratch.add_id(class);
        self.scratch.add_len32(members.len())?;
        for (name, member) in members {
            self.scratch.add_string(name)?;
            self.scratch.add_id(*member);
        }
        self.commit()
    }

    pub fn define_instance_method(&mut self, id: ObjectId, instance: ObjectId, name: &str) -> Result<()> {
        tracing::trace!(%id, %instance, name, "define instance method");
        self.begin(id, Tag::InstanceMethod);
        self.scratch.add_id(instance);
        self.scratch.add_string(name)?;
        self.commit()
    }

    pub fn define_named_singleton(&mut self, id: ObjectId, name: &str) -> Result<()> {
        tracing::trace!(%id, name, "define named singleton");
        self.begin(id, Tag::NamedSingleton);
        self.scratch.add_string(name)?;
        self.commit()
    }

    pub fn define_builtin_exception_instance(
        &mut self,
        id: ObjectId,
        type_name: &str,
        args: ObjectId,
    ) -> Result<()> {
        tracing::trace!(%id, type_name, "define builtin exception");
        self.begin(id, Tag::BuiltinExceptionInstance);
        self.scratch.add_string(type_name)?;
        self.scratch.add_id(args);
        self.commit()
    }

    pub fn define_py_abort_exception(&mut self, id: ObjectId, type_name: &str, args: ObjectId) -> Result<()> {
        tracing::trace!(%id, type_name, "define abort exception");
        self.begin(id, Tag::PyAbortException);
        self.scratch.add_string(type_name)?;
        self.scratch.add_id(args);
        self.commit()
    }

    pub fn define_remote_object(&mut self, id: ObjectId, json: &str) -> Result<()> {
        tracing::trace!(%id, "define remote object");
        self.begin(id, Tag::RemotePyObject);
        self.scratch.add_string(json)?;
        self.commit()
    }

    pub fn define_packed_homogeneous_data(&mut self, id: ObjectId, dtype: &Dtype, bytes: &[u8]) -> Result<()> {
        tracing::trace!(%id, %dtype, len = bytes.len(), "define packed data");
        self.begin(id, Tag::PackedHomogenousData);
        write_dtype(&mut self.scratch, dtype)?;
        self.scratch.add_blob(bytes)?;
        self.commit()
    }

    pub fn define_with_block(
        &mut self,
        id: ObjectId,
        bindings: &Bindings,
        file: ObjectId,
        line: u32,
    ) -> Result<()> {
        tracing::trace!(%id, %file, line, "define with-block");
        self.begin(id, Tag::WithBlock);
        self.add_bindings(bindings)?;
        self.scratch.add_id(file);
        self.add_line(line)?;
        self.commit()
    }

    pub fn define_stack_trace(&mut self, id: ObjectId, json: &str) -> Result<()> {
        tracing::trace!(%id, "define stack trace");
        self.begin(id, Tag::StacktraceAsJson);
        self.scratch.add_string(json)?;
        self.commit()
    }

    pub fn define_unconvertible(&mut self, id: ObjectId, path: Option<&[String]>) -> Result<()> {
        tracing::trace!(%id, ?path, "define unconvertible");
        self.begin(id, Tag::Unconvertible);
        match path {
            None => self.scratch.add_byte(0),
            Some(path) => {
                self.scratch.add_byte(1);
                self.scratch.add_string_tuple(path)?;
            }
        }
        self.commit()?;
        self.unconvertible.insert(id);
        Ok(())
    }

    pub fn define_unresolved_symbol(&mut self, id: ObjectId, name: &str, position: Position) -> Result<()> {
        tracing::trace!(%id, name, %position, "define unresolved symbol");
        self.begin(id, Tag::UnresolvedSymbol);
        self.scratch.add_string(name)?;
        self.scratch.add_i64(position.line as i64);
        self.scratch.add_i64(position.column as i64);
        self.commit()
    }

    /// Writes a decoded record back out. Used to re-encode loaded tables.
    pub fn define(&mut self, id: ObjectId, record: &Record) -> Result<()> {
        match record {
            Record::Primitive(p) => self.define_primitive(id, p),
            Record::Tuple(ids) => self.define_tuple(id, ids),
            Record::List(ids) => self.define_list(id, ids),
            Record::Dict { keys, values } => self.define_dict(id, keys, values),
            Record::File { path, text } => self.define_file(id, path, text),
            Record::Function { file, line, bindings } => self.define_function(id, *file, *line, bindings),
            Record::Class {
                file,
                line,
                bindings,
                bases,
            } => self.define_class(id, *file, *line, bindings, bases),
            Record::ClassInstance { class, members } => self.define_class_instance(id, *class, members),
            Record::InstanceMethod { instance, name } => self.define_instance_method(id, *instance, name),
            Record::NamedSingleton(name) => self.define_named_singleton(id, name),
            Record::BuiltinExceptionInstance { type_name, args } => {
                self.define_builtin_exception_instance(id, type_name, *args)
            }
            Record::PyAbortException { type_name, args } => self.define_py_abort_exception(id, type_name, *args),
            Record::RemoteObjectRef(json) => self.define_remote_object(id, json),
            Record::PackedHomogeneousData { dtype, bytes } => self.define_packed_homogeneous_data(id, dtype, bytes),
            Record::WithBlock { bindings, file, line } => self.define_with_block(id, bindings, *file, *line),
            Record::StackTrace(json) => self.define_stack_trace(id, json),
            Record::Unconvertible(path) => self.define_unconvertible(id, path.as_deref()),
            Record::UnresolvedSymbol { name, position } => self.define_unresolved_symbol(id, name, *position),
        }
    }

    /// Writes the `-1` sentinel. Must be the last record.
    pub fn define_end_of_stream(&mut self) -> Result<()> {
        self.scratch.clear();
        self.scratch.add_id(ObjectId::END_OF_STREAM);
        self.commit()?;
        self.out.flush()?;
        Ok(())
    }
}

/// Tag byte plus payload of one primitive. Lists nest.
fn write_primitive(w: &mut ByteWriter, primitive: &Primitive) -> Result<()> {
    w.add_byte(primitive.tag().as_u8());
    match primitive {
        Primitive::None => {}
        Primitive::Int(n) => w.add_i64(*n),
        Primitive::Long(digits) => w.add_string(digits)?,
        Primitive::Float(f) => w.add_f64(*f),
        Primitive::Bool(b) => w.add_bool(*b),
        Primitive::Str(s) => w.add_string(s)?,
        Primitive::List(items) => {
            w.add_i64(items.len() as i64);
            for item in items {
                write_primitive(w, item)?;
            }
        }
    }
    Ok(())
}

/// Dtype descriptors reuse the record tag bytes for their node kinds.
fn write_dtype(w: &mut ByteWriter, dtype: &Dtype) -> Result<()> {
    match dtype {
        Dtype::None => w.add_byte(Tag::None.as_u8()),
        Dtype::Int(n) => {
            w.add_byte(Tag::Int.as_u8());
            w.add_i64(*n);
        }
        Dtype::Str(s) => {
            w.add_byte(Tag::Str.as_u8());
            w.add_string(s)?;
        }
        Dtype::Tuple(items) | Dtype::List(items) => {
            let tag = if matches!(dtype, Dtype::Tuple(_)) { Tag::Tuple } else { Tag::List };
            w.add_byte(tag.as_u8());
            w.add_len32(items.len())?;
            for item in items {
                write_dtype(w, item)?;
            }
        }
        Dtype::Dict(entries) => {
            w.add_byte(Tag::Dict.as_u8());
            w.add_len32(entries.len())?;
            for (k, v) in entries {
                write_dtype(w, k)?;
                write_dtype(w, v)?;
            }
        }
    }
    Ok(())
}
