//! Encode side: linearizes a live value graph into a registry stream.
//!
//! Every value is defined at most once per walk. The id is registered
//! before the children are walked, so a container reached again through
//! one of its children is written as a reference to the id being defined.

mod code;
mod shape;

#[cfg(test)]
mod shape_tests;

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use indexmap::IndexMap;
use ogx_core::{Identity, ObjectId, Object, SourceFile, Value};
use ogx_wire::{GraphRegistry, Primitive};

pub use shape::{Shape, classify, to_primitive};

use crate::collab::{CodeInspector, ModuleIndex, NoMapping, NoModules, SourceInspector, ValueMapping};
use crate::config::WalkerConfig;
use crate::error::WalkError;
use crate::sources::SourceCache;

pub struct ObjectWalker<'a, W: Write> {
    registry: GraphRegistry<W>,
    config: &'a WalkerConfig,
    mapping: &'a dyn ValueMapping,
    modules: &'a dyn ModuleIndex,
    inspector: &'a dyn SourceInspector,
    ids: HashMap<Identity, ObjectId>,
    converted: HashMap<Identity, Value>,
    /// Owners of every identity key above.
    keep_alive: Vec<Value>,
    files: HashMap<String, ObjectId>,
    sources: SourceCache,
}

impl<'a, W: Write> ObjectWalker<'a, W> {
    pub fn new(out: W, config: &'a WalkerConfig) -> Self {
        Self {
            registry: GraphRegistry::new(out),
            config,
            mapping: &NoMapping,
            modules: &NoModules,
            inspector: &CodeInspector,
            ids: HashMap::new(),
            converted: HashMap::new(),
            keep_alive: Vec::new(),
            files: HashMap::new(),
            sources: SourceCache::new(),
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

    pub fn registry(&self) -> &GraphRegistry<W> {
        &self.registry
    }

    /// Id of a value already walked in this session.
    pub fn id_of(&self, value: &Value) -> Option<ObjectId> {
        self.ids.get(&value.identity()).copied()
    }

    /// Walks `value` and everything it reaches. Returns the value's id.
    pub fn walk(&mut self, value: &Value) -> Result<ObjectId, WalkError> {
        if let Some(id) = self.id_of(value) {
            return Ok(id);
        }

        let target = match self.substitute(value) {
            Ok(target) => target,
            Err(err) => {
                let id = self.register(value);
                return self.recover(id, value, err);
            }
        };
        if !target.ptr_eq(value)
            && let Some(id) = self.id_of(&target)
        {
            self.remember(value, id);
            return Ok(id);
        }

        let id = self.register(value);
        if !target.ptr_eq(value) {
            self.remember(&target, id);
        }
        match self.dispatch(id, &target) {
            Ok(()) => Ok(id),
            Err(err) => self.recover(id, &target, err),
        }
    }

    /// Writes the end-of-stream sentinel and hands back the writer.
    pub fn finish(mut self) -> Result<W, WalkError> {
        self.registry.define_end_of_stream()?;
        tracing::debug!(
            objects = self.ids.len(),
            files = self.files.len(),
            bytes = self.registry.bytes_written(),
            "walk finished"
        );
        Ok(self.registry.into_inner())
    }

    fn register(&mut self, value: &Value) -> ObjectId {
        let id = self.registry.allocate_object();
        tracing::trace!(%id, kind = %value.type_label(), "allocate");
        self.remember(value, id);
        id
    }

    fn remember(&mut self, value: &Value, id: ObjectId) {
        self.ids.insert(value.identity(), id);
        self.keep_alive.push(value.clone());
    }

    /// The value to walk in place of `value`, substituted at most once.
    fn substitute(&mut self, value: &Value) -> Result<Value, WalkError> {
        if let Some(converted) = self.converted.get(&value.identity()) {
            tracing::debug!(kind = %value.type_label(), "converted value cache hit");
            return Ok(converted.clone());
        }
        if !self.mapping.can_map(value) {
            return Ok(value.clone());
        }
        if self.config.singletons.name_of(value).is_some() {
            tracing::warn!(kind = %value.type_label(), "value mapping claims a named singleton");
        }
        let pure = self.mapping.mappable_to_pure(value).map_err(WalkError::Mapping)?;
        tracing::debug!(from = %value.type_label(), to = %pure.type_label(), "substituted");
        self.converted.insert(value.identity(), pure.clone());
        self.keep_alive.push(value.clone());
        Ok(pure)
    }

    /// Degrades a recoverable failure to an Unconvertible record at `id`.
    fn recover(&mut self, id: ObjectId, value: &Value, err: WalkError) -> Result<ObjectId, WalkError> {
        if err.is_fatal() || !err.degrades() || !self.config.degrade_to_unconvertible {
            return Err(err);
        }
        tracing::warn!(%id, kind = %value.type_label(), error = %err, "recording as unconvertible");
        let path = self.modules.path_for(value);
        self.registry.define_unconvertible(id, path.as_deref())?;
        Ok(id)
    }

    fn walk_all(&mut self, values: &[Value]) -> Result<Vec<ObjectId>, WalkError> {
        values.iter().map(|v| self.walk(v)).collect()
    }

    fn dispatch(&mut self, id: ObjectId, value: &Value) -> Result<(), WalkError> {
        let config = self.config;
        let shape = classify(value, &config.singletons);
        tracing::trace!(%id, shape = shape.name(), "dispatch");
        match shape {
            Shape::Remote(payload) => self.registry.define_remote_object(id, &payload.to_string())?,
            Shape::Packed(packed) => {
                self.registry
                    .define_packed_homogeneous_data(id, &packed.dtype, &packed.bytes)?
            }
            Shape::Pending(pending) => {
                let resolved = pending.wait().map_err(WalkError::PendingResult)?;
                if self.id_of(&resolved).is_none() {
                    self.remember(&resolved, id);
                }
                return self.dispatch(id, &resolved);
            }
            Shape::BuiltinException { type_name, args } => {
                let args = self.walk(args)?;
                self.registry
                    .define_builtin_exception_instance(id, &type_name, args)?
            }
            Shape::NamedSingleton(name) => self.registry.define_named_singleton(id, &name)?,
            Shape::StackTrace(trace) => self.registry.define_stack_trace(id, &trace.to_string())?,
            Shape::WithBlock(block) => self.walk_with_block(id, block)?,
            Shape::Unconvertible(path) => self.registry.define_unconvertible(id, path)?,
            Shape::File(file) => self.define_file(id, file)?,
            Shape::Tuple(items) => {
                let items = self.walk_all(items)?;
                self.registry.define_tuple(id, &items)?
            }
            Shape::PrimitiveList(items) => {
                self.registry
                    .define_primitive(id, &Primitive::List(items))?
            }
            Shape::List(items) => {
                let items = self.walk_all(&items)?;
                self.registry.define_list(id, &items)?
            }
            Shape::Dict(entries) => {
                let mut keys = Vec::with_capacity(entries.len());
                let mut values = Vec::with_capacity(entries.len());
                for (k, v) in &entries {
                    keys.push(self.walk(k)?);
                    values.push(self.walk(v)?);
                }
                self.registry.define_dict(id, &keys, &values)?
            }
            Shape::Primitive(primitive) => self.registry.define_primitive(id, &primitive)?,
            Shape::Function(function) => self.walk_function(id, value, function)?,
            Shape::Class(class) => self.walk_class(id, value, class)?,
            Shape::BoundMethod(method) => {
                let instance = self.walk(&method.instance)?;
                self.registry
                    .define_instance_method(id, instance, &method.name)?
            }
            Shape::Instance { class, members } => self.walk_instance(id, value, class, members)?,
            Shape::Other => {
                let path = self.modules.path_for(value);
                tracing::debug!(%id, kind = %value.type_label(), ?path, "no rule, recording as unconvertible");
                self.registry.define_unconvertible(id, path.as_deref())?
            }
        }
        Ok(())
    }

    fn define_file(&mut self, id: ObjectId, file: &SourceFile) -> Result<(), WalkError> {
        self.registry.define_file(id, &file.path, &file.text)?;
        self.files.entry(file.path.clone()).or_insert(id);
        Ok(())
    }

    fn walk_instance(
        &mut self,
        id: ObjectId,
        instance: &Value,
        class: &Value,
        members: IndexMap<String, Value>,
    ) -> Result<(), WalkError> {
        let class_id = self.walk(class)?;
        if self.registry.is_unconvertible(class_id) {
            tracing::debug!(%id, class = %class_id, "class is unconvertible");
            let path = self.modules.path_for(instance);
            self.registry.define_unconvertible(id, path.as_deref())?;
            return Ok(());
        }

        let members = if members.is_empty() && matches!(instance.object(), Object::Instance(_)) {
            self.data_members(instance, class)?
        } else {
            members
        };

        let mut ids = BTreeMap::new();
        for (name, member) in members {
            let member_id = self.walk(&member)?;
            ids.insert(name, member_id);
        }
        self.registry.define_class_instance(id, class_id, &ids)?;
        Ok(())
    }
}
