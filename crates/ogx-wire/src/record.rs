//! Decoded record variants.
//!
//! A [`Record`] is the reader-side description of one stream entry. No live
//! values exist at this level: children are ids into the same table.

use std::collections::BTreeMap;

use ogx_core::{Dtype, FreeVariableChain, ObjectId, Position};

use crate::tag::Tag;

/// Free-variable chain -> id table of a function, class or with-block.
///
/// Ordered so that the written table is deterministic.
pub type Bindings = BTreeMap<FreeVariableChain, ObjectId>;

/// Inline scalar payloads. `List` is the compact form for homogeneous-primitive lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    None,
    Int(i64),
    /// Decimal digits of an integer outside the `i64` range.
    Long(String),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Primitive>),
}

impl Primitive {
    pub fn tag(&self) -> Tag {
        match self {
            Primitive::None => Tag::None,
            Primitive::Int(_) => Tag::Int,
            Primitive::Long(_) => Tag::Long,
            Primitive::Float(_) => Tag::Float,
            Primitive::Bool(_) => Tag::Bool,
            Primitive::Str(_) => Tag::Str,
            Primitive::List(_) => Tag::ListOfPrimitives,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Primitive(Primitive),
    Tuple(Vec<ObjectId>),
    List(Vec<ObjectId>),
    Dict {
        keys: Vec<ObjectId>,
        values: Vec<ObjectId>,
    },
    File {
        path: String,
        text: String,
    },
    Function {
        file: ObjectId,
        line: u32,
        bindings: Bindings,
    },
    Class {
        file: ObjectId,
        line: u32,
        bindings: Bindings,
        bases: Vec<ObjectId>,
    },
    ClassInstance {
        class: ObjectId,
        members: BTreeMap<String, ObjectId>,
    },
    InstanceMethod {
        instance: ObjectId,
        name: String,
    },
    NamedSingleton(String),
    BuiltinExceptionInstance {
        type_name: String,
        args: ObjectId,
    },
    PyAbortException {
        type_name: String,
        args: ObjectId,
    },
    /// Opaque JSON payload naming a value that lives on the remote side.
    RemoteObjectRef(String),
    PackedHomogeneousData {
        dtype: Dtype,
        bytes: Vec<u8>,
    },
    WithBlock {
        bindings: Bindings,
        file: ObjectId,
        line: u32,
    },
    /// Stack trace serialized as JSON.
    StackTrace(String),
    Unconvertible(Option<Vec<String>>),
    UnresolvedSymbol {
        name: String,
        position: Position,
    },
}

impl Record {
    pub fn tag(&self) -> Tag {
        match self {
            Record::Primitive(p) => p.tag(),
            Record::Tuple(_) => Tag::Tuple,
            Record::List(_) => Tag::List,
            Record::Dict { .. } => Tag::Dict,
            Record::File { .. } => Tag::File,
            Record::Function { .. } => Tag::Function,
            Record::Class { .. } => Tag::Class,
            Record::ClassInstance { .. } => Tag::ClassInstance,
            Record::InstanceMethod { .. } => Tag::InstanceMethod,
            Record::NamedSingleton(_) => Tag::NamedSingleton,
            Record::BuiltinExceptionInstance { .. } => Tag::BuiltinExceptionInstance,
            Record::PyAbortException { .. } => Tag::PyAbortException,
            Record::RemoteObjectRef(_) => Tag::RemotePyObject,
            Record::PackedHomogeneousData { .. } => Tag::PackedHomogenousData,
            Record::WithBlock { .. } => Tag::WithBlock,
            Record::StackTrace(_) => Tag::StacktraceAsJson,
            Record::Unconvertible(_) => Tag::Unconvertible,
            Record::UnresolvedSymbol { .. } => Tag::UnresolvedSymbol,
        }
    }

    /// Every id this record points at, in payload order.
    pub fn references(&self) -> Vec<ObjectId> {
        match self {
            Record::Tuple(ids) | Record::List(ids) => ids.clone(),
            Record::Dict { keys, values } => keys.iter().chain(values).copied().collect(),
            Record::Function { file, bindings, .. } => {
                std::iter::once(*file).chain(bindings.values().copied()).collect()
            }
            Record::Class {
                file,
                bindings,
                bases,
                ..
            } => std::iter::once(*file)
                .chain(bindings.values().copied())
                .chain(bases.iter().copied())
                .collect(),
            Record::ClassInstance { class, members } => {
                std::iter::once(*class).chain(members.values().copied()).collect()
            }
            Record::InstanceMethod { instance, .. } => vec![*instance],
            Record::BuiltinExceptionInstance { args, .. } | Record::PyAbortException { args, .. } => {
                vec![*args]
            }
            Record::WithBlock { bindings, file, .. } => bindings
                .values()
                .copied()
                .chain(std::iter::once(*file))
                .collect(),
            Record::Primitive(_)
            | Record::File { .. }
            | Record::NamedSingleton(_)
            | Record::RemoteObjectRef(_)
            | Record::PackedHomogeneousData { .. }
            | Record::StackTrace(_)
            | Record::Unconvertible(_)
            | Record::UnresolvedSymbol { .. } => Vec::new(),
        }
    }

    /// True for records whose reconstruction compiles source text.
    pub fn is_code(&self) -> bool {
        matches!(
            self,
            Record::Function { .. } | Record::Class { .. } | Record::WithBlock { .. }
        )
    }
}
