//! Code values and class instances.

use std::collections::BTreeMap;
use std::rc::Rc;

use indexmap::IndexMap;
use ogx_core::{Namespace, Object, ObjectId, PackedArray, SourceFile, UnresolvedName, Value};
use ogx_wire::{Bindings, Record};

use super::Rehydrator;
use crate::error::RehydrateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CodeKind {
    Function,
    Class,
    WithBlock,
}

impl Rehydrator<'_> {
    pub(super) fn build_code(
        &mut self,
        kind: CodeKind,
        file_id: ObjectId,
        line: u32,
        bindings: &Bindings,
        bases: &[ObjectId],
    ) -> Result<Value, RehydrateError> {
        let file = self.source_file(file_id)?;

        if self.config.allow_module_level_lookups
            && kind != CodeKind::WithBlock
            && let Some(existing) = self.modules.module_level_object(&file.path, line)
        {
            tracing::debug!(path = %file.path, line, "reusing module-level definition");
            return Ok(existing);
        }

        let globals = self.globals(bindings)?;
        let bases = self.materialize_all(bases)?;
        let constructor = self.constructor();
        match kind {
            CodeKind::Function => constructor.function(&file, line, globals),
            CodeKind::Class => constructor.class(&file, line, globals, bases),
            CodeKind::WithBlock => constructor.with_block(&file, line, globals),
        }
    }

    /// Binding values keyed by dotted chain. Unresolved symbols become
    /// deferred slots, failing only when the code reads them.
    fn globals(&mut self, bindings: &Bindings) -> Result<Namespace, RehydrateError> {
        let globals = Namespace::new();
        let table = self.table;
        for (chain, &bound) in bindings {
            match table.get(bound) {
                Some(Record::UnresolvedSymbol { name, position }) => {
                    globals.insert_deferred(
                        chain.dotted(),
                        UnresolvedName {
                            name: name.clone(),
                            position: *position,
                        },
                    );
                }
                _ => globals.insert(chain.dotted(), self.materialize(bound)?),
            }
        }
        Ok(globals)
    }

    fn source_file(&mut self, id: ObjectId) -> Result<Rc<SourceFile>, RehydrateError> {
        let value = self.materialize(id)?;
        match value.object() {
            Object::File(file) => Ok(Rc::clone(file)),
            _ => Err(RehydrateError::UnexpectedRecord { id, expected: "file" }),
        }
    }

    /// Plain instances are memoized before their members exist. Instances
    /// of invertible classes need every member first, since inverting reads them.
    pub(super) fn build_instance(
        &mut self,
        id: ObjectId,
        class_id: ObjectId,
        members: &BTreeMap<String, ObjectId>,
    ) -> Result<Value, RehydrateError> {
        let class = self.materialize(class_id)?;

        if self.mapping.can_invert(&class) {
            let retain = self.config.retain_packed_for_invertible;
            let mut values = IndexMap::with_capacity(members.len());
            for (name, &member) in members {
                values.insert(name.clone(), self.materialize_member(member, retain)?);
            }
            let instance = self.instantiate(class_id, &class)?;
            if let Some(inst) = instance.as_instance() {
                for (name, value) in values {
                    inst.set_member(name, value);
                }
            }
            tracing::debug!(%id, class = %class.type_label(), "inverting instance");
            return self
                .mapping
                .pure_to_mappable(&instance)
                .map_err(RehydrateError::Mapping);
        }

        let instance = self.instantiate(class_id, &class)?;
        self.memoize(id, &instance);
        for (name, &member) in members {
            let value = self.materialize(member)?;
            if let Some(inst) = instance.as_instance() {
                inst.set_member(name.as_str(), value);
            }
        }
        Ok(instance)
    }

    fn instantiate(&self, class_id: ObjectId, class: &Value) -> Result<Value, RehydrateError> {
        let instance = self.constructor().instantiate(class)?;
        if instance.as_instance().is_none() {
            return Err(RehydrateError::UnexpectedRecord {
                id: class_id,
                expected: "instantiable class",
            });
        }
        Ok(instance)
    }

    /// Packed members of invertible instances may stay packed.
    fn materialize_member(&mut self, id: ObjectId, retain_packed: bool) -> Result<Value, RehydrateError> {
        let table = self.table;
        if retain_packed
            && !self.states.contains_key(&id)
            && let Some(Record::PackedHomogeneousData { dtype, bytes }) = table.get(id)
        {
            let packed = Value::new(Object::Packed(PackedArray {
                dtype: dtype.clone(),
                bytes: bytes.clone(),
            }));
            self.memoize(id, &packed);
            return Ok(packed);
        }
        self.materialize(id)
    }
}
