//! Decode side: turns a loaded [`IdTable`] back into live values.
//!
//! Each id moves from unvisited to materializing to either materialized or
//! failed, and is materialized at most once, so sharing in the encoded graph
//! is sharing in the decoded one. Lists, dicts and plain instances are
//! memoized empty and filled afterwards, which lets cycles through them
//! close. Code values compile their source only after all their bindings
//! exist; reaching one again while its bindings are being built is a
//! [`RehydrateError::CyclicDefinition`].

mod construct;


use std::collections::HashMap;
use std::rc::Rc;

use ogx_core::{
    BoundMethod, Dtype, ExceptionObject, NameNotDefined, Object, ObjectId, RemoteObject, SourceFile, Value,
};
use ogx_wire::{IdTable, Primitive, Record};

use crate::collab::{HostConstructor, ModuleIndex, NoMapping, NoModules, SourceConstructor, ValueMapping};
use crate::config::RehydratorConfig;
use crate::error::RehydrateError;

enum State {
    Materializing,
    Materialized(Value),
    Failed(String),
}

pub struct Rehydrator<'a> {
    table: &'a IdTable,
    config: &'a RehydratorConfig,
    mapping: &'a dyn ValueMapping,
    modules: &'a dyn ModuleIndex,
    constructor: Option<&'a dyn HostConstructor>,
    default_constructor: SourceConstructor,
    states: HashMap<ObjectId, State>,
}

impl<'a> Rehydrator<'a> {
    pub fn new(table: &'a IdTable, config: &'a RehydratorConfig) -> Self {
        Self {
            table,
            config,
            mapping: &NoMapping,
            modules: &NoModules,
            constructor: None,
            default_constructor: SourceConstructor::new(),
            states: HashMap::new(),
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

    pub fn with_constructor(mut self, constructor: &'a dyn HostConstructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Number of ids materialized so far.
    pub fn materialized(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, State::Materialized(_)))
            .count()
    }

    pub fn materialize(&mut self, id: ObjectId) -> Result<Value, RehydrateError> {
        match self.states.get(&id) {
            Some(State::Materialized(value)) => return Ok(value.clone()),
            Some(State::Materializing) => return Err(RehydrateError::CyclicDefinition(id)),
            Some(State::Failed(reason)) => {
                return Err(RehydrateError::Failed {
                    id,
                    reason: reason.clone(),
                });
            }
            None => {}
        }

        let table = self.table;
        let record = table.get(id).ok_or(RehydrateError::UnknownId(id))?;
        // Reading an unresolved name fails every time it happens.
        if let Record::UnresolvedSymbol { name, position } = record {
            return Err(RehydrateError::NameNotDefined(NameNotDefined {
                name: name.clone(),
                position: Some(*position),
            }));
        }

        tracing::trace!(%id, tag = record.tag().name(), "materialize");
        self.states.insert(id, State::Materializing);
        match self.build(id, record) {
            Ok(value) => {
                self.states.insert(id, State::Materialized(value.clone()));
                Ok(value)
            }
            Err(err) => {
                self.states.insert(id, State::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    fn constructor(&self) -> &dyn HostConstructor {
        match self.constructor {
            Some(constructor) => constructor,
            None => &self.default_constructor,
        }
    }

    fn memoize(&mut self, id: ObjectId, value: &Value) {
        self.states.insert(id, State::Materialized(value.clone()));
    }

    fn materialize_all(&mut self, ids: &[ObjectId]) -> Result<Vec<Value>, RehydrateError> {
        ids.iter().map(|&id| self.materialize(id)).collect()
    }

    fn build(&mut self, id: ObjectId, record: &Record) -> Result<Value, RehydrateError> {
        match record {
            Record::Primitive(primitive) => Ok(primitive_value(primitive)),
            Record::Tuple(ids) => Ok(Value::tuple(self.materialize_all(ids)?)),
            Record::List(ids) => {
                let list = Value::list(Vec::new());
                self.memoize(id, &list);
                let items = self.materialize_all(ids)?;
                if let Object::List(cell) = list.object() {
                    *cell.borrow_mut() = items;
                }
                Ok(list)
            }
            Record::Dict { keys, values } => {
                let dict = Value::dict(Vec::new());
                self.memoize(id, &dict);
                let keys = self.materialize_all(keys)?;
                let values = self.materialize_all(values)?;
                if let Object::Dict(cell) = dict.object() {
                    *cell.borrow_mut() = keys.into_iter().zip(values).collect();
                }
                Ok(dict)
            }
            Record::File { path, text } => Ok(Value::new(Object::File(Rc::new(SourceFile::new(
                path.as_str(),
                text.as_str(),
            ))))),
            Record::Function { file, line, bindings } => {
                self.build_code(construct::CodeKind::Function, *file, *line, bindings, &[])
            }
            Record::Class {
                file,
                line,
                bindings,
                bases,
            } => self.build_code(construct::CodeKind::Class, *file, *line, bindings, bases),
            Record::WithBlock { bindings, file, line } => {
                self.build_code(construct::CodeKind::WithBlock, *file, *line, bindings, &[])
            }
            Record::ClassInstance { class, members } => self.build_instance(id, *class, members),
            Record::InstanceMethod { instance, name } => {
                let instance = self.materialize(*instance)?;
                if instance.get_attr(name).is_none() {
                    return Err(RehydrateError::MissingMethod { method: name.clone() });
                }
                Ok(Value::new(Object::BoundMethod(BoundMethod {
                    instance,
                    name: name.clone(),
                })))
            }
            Record::NamedSingleton(name) => self
                .config
                .singletons
                .value_of(name)
                .ok_or_else(|| RehydrateError::UnknownSingleton(name.clone())),
            Record::BuiltinExceptionInstance { type_name, args } => {
                let class = self
                    .config
                    .singletons
                    .value_of(type_name)
                    .ok_or_else(|| RehydrateError::UnknownSingleton(type_name.clone()))?;
                self.exception(class, *args)
            }
            Record::PyAbortException { type_name, args } => {
                let class = self
                    .config
                    .abort_singletons
                    .get(type_name)
                    .ok_or_else(|| RehydrateError::UnknownSingleton(type_name.clone()))?;
                self.exception(class, *args)
            }
            Record::RemoteObjectRef(json) => Ok(Value::new(Object::Remote(RemoteObject {
                payload: serde_json::from_str(json)?,
            }))),
            Record::PackedHomogeneousData { dtype, bytes } => unpack(dtype, bytes),
            Record::StackTrace(json) => Ok(Value::new(Object::Traceback(serde_json::from_str(json)?))),
            Record::Unconvertible(None) => Ok(Value::unconvertible(None)),
            Record::Unconvertible(Some(path)) => match self.modules.object_for(path) {
                Some(value) => Ok(value),
                None => {
                    tracing::debug!(%id, path = %path.join("."), "module path not found, using placeholder");
                    Ok(Value::unconvertible(Some(path.clone())))
                }
            },
            Record::UnresolvedSymbol { name, position } => Err(RehydrateError::NameNotDefined(NameNotDefined {
                name: name.clone(),
                position: Some(*position),
            })),
        }
    }

    fn exception(&mut self, class: Value, args: ObjectId) -> Result<Value, RehydrateError> {
        let args = self.materialize(args)?;
        Ok(Value::new(Object::Exception(ExceptionObject { class, args })))
    }
}

pub fn primitive_value(primitive: &Primitive) -> Value {
    match primitive {
        Primitive::None => Value::none(),
        Primitive::Int(n) => Value::int(*n),
        Primitive::Long(digits) => Value::long(digits.as_str()),
        Primitive::Float(f) => Value::float(*f),
        Primitive::Bool(b) => Value::bool(*b),
        Primitive::Str(s) => Value::str(s.as_str()),
        Primitive::List(items) => Value::list(items.iter().map(primitive_value).collect()),
    }
}

/// Expands packed data into a list of scalars.
fn unpack(dtype: &Dtype, bytes: &[u8]) -> Result<Value, RehydrateError> {
    let items = dtype
        .unpack(bytes)
        .map_err(|e| RehydrateError::InvalidPackedData(e.to_string()))?;
    Ok(Value::list(items))
}
