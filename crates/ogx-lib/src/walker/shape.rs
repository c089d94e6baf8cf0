//! Runtime shape classification.
//!
//! Some values fit more than one shape: an exception is also an instance,
//! a builtin type is also a class. The order of the arms in [`classify`] is
//! the dispatch precedence, first match wins.

use indexmap::IndexMap;
use ogx_core::{
    BoundMethod, ClassObject, FunctionObject, Object, PackedArray, PendingValue, SourceFile, Value,
    WithBlockObject,
};
use ogx_wire::Primitive;

use crate::config::NamedSingletons;

pub enum Shape<'v> {
    Remote(&'v serde_json::Value),
    Packed(&'v PackedArray),
    Pending(&'v PendingValue),
    BuiltinException { type_name: String, args: &'v Value },
    NamedSingleton(String),
    StackTrace(&'v serde_json::Value),
    WithBlock(&'v WithBlockObject),
    Unconvertible(Option<&'v [String]>),
    File(&'v SourceFile),
    Tuple(&'v [Value]),
    /// A list whose elements are all primitives, written inline.
    PrimitiveList(Vec<Primitive>),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Primitive(Primitive),
    Function(&'v FunctionObject),
    Class(&'v ClassObject),
    BoundMethod(&'v BoundMethod),
    Instance {
        class: &'v Value,
        members: IndexMap<String, Value>,
    },
    /// Nothing the walker knows how to encode.
    Other,
}

impl Shape<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Remote(_) => "remote",
            Shape::Packed(_) => "packed",
            Shape::Pending(_) => "pending",
            Shape::BuiltinException { .. } => "builtin exception",
            Shape::NamedSingleton(_) => "named singleton",
            Shape::StackTrace(_) => "stack trace",
            Shape::WithBlock(_) => "with block",
            Shape::Unconvertible(_) => "unconvertible",
            Shape::File(_) => "file",
            Shape::Tuple(_) => "tuple",
            Shape::PrimitiveList(_) => "primitive list",
            Shape::List(_) => "list",
            Shape::Dict(_) => "dict",
            Shape::Primitive(_) => "primitive",
            Shape::Function(_) => "function",
            Shape::Class(_) => "class",
            Shape::BoundMethod(_) => "bound method",
            Shape::Instance { .. } => "instance",
            Shape::Other => "other",
        }
    }
}

pub fn classify<'v>(value: &'v Value, singletons: &NamedSingletons) -> Shape<'v> {
    match value.object() {
        Object::Remote(remote) => return Shape::Remote(&remote.payload),
        Object::Packed(packed) => return Shape::Packed(packed),
        Object::Pending(pending) => return Shape::Pending(pending),
        Object::Exception(e) => {
            if let Some(name) = singletons.name_of(&e.class) {
                return Shape::BuiltinException {
                    type_name: name.to_string(),
                    args: &e.args,
                };
            }
        }
        _ => {}
    }

    if let Some(name) = singletons.name_of(value) {
        return Shape::NamedSingleton(name.to_string());
    }

    match value.object() {
        Object::Traceback(trace) => Shape::StackTrace(trace),
        Object::WithBlock(block) => Shape::WithBlock(block),
        Object::Unconvertible(path) => Shape::Unconvertible(path.as_deref()),
        Object::File(file) => Shape::File(file),
        Object::Tuple(items) => Shape::Tuple(items),
        Object::List(items) => {
            let items = items.borrow();
            match items.iter().map(to_primitive).collect::<Option<Vec<_>>>() {
                Some(primitives) => Shape::PrimitiveList(primitives),
                None => Shape::List(items.clone()),
            }
        }
        Object::Dict(entries) => Shape::Dict(entries.borrow().clone()),
        Object::Function(f) => Shape::Function(f),
        Object::Class(c) => Shape::Class(c),
        Object::BoundMethod(m) => Shape::BoundMethod(m),
        Object::Instance(inst) => Shape::Instance {
            class: &inst.class,
            members: inst.members.borrow().clone(),
        },
        Object::Exception(e) => Shape::Instance {
            class: &e.class,
            members: IndexMap::from([("args".to_string(), e.args.clone())]),
        },
        _ => match to_primitive(value) {
            Some(primitive) => Shape::Primitive(primitive),
            None => Shape::Other,
        },
    }
}

pub fn to_primitive(value: &Value) -> Option<Primitive> {
    let primitive = match value.object() {
        Object::None => Primitive::None,
        Object::Bool(b) => Primitive::Bool(*b),
        Object::Int(n) => Primitive::Int(*n),
        Object::Long(digits) => Primitive::Long(digits.clone()),
        Object::Float(f) => Primitive::Float(*f),
        Object::Str(s) => Primitive::Str(s.clone()),
        _ => return None,
    };
    Some(primitive)
}
