//! Functions, classes and with blocks: source file, line and bindings.

use std::io::Write;
use std::rc::Rc;

use indexmap::IndexMap;
use ogx_analyzer::{AnalysisError, Scope};
use ogx_core::{
    ChainWithPosition, ClassObject, FreeVariableChain, FunctionObject, ObjectId, SourceFile, Value,
    WithBlockObject,
};
use ogx_wire::Bindings;

use super::ObjectWalker;
use crate::error::WalkError;
use crate::resolve::{Environment, Resolution, ScopeResolver};

fn analysis_error(file: &SourceFile) -> impl FnOnce(AnalysisError) -> WalkError + '_ {
    move |source| WalkError::Analysis {
        path: file.path.clone(),
        source,
    }
}

impl<W: Write> ObjectWalker<'_, W> {
    fn check_reserved(&self, name: &str) -> Result<(), WalkError> {
        if name == self.config.reserved_name {
            return Err(WalkError::ReservedName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn walk_function(
        &mut self,
        id: ObjectId,
        value: &Value,
        function: &FunctionObject,
    ) -> Result<(), WalkError> {
        self.check_reserved(&function.name)?;
        let file = self.inspector.source_file(value)?;
        let line = self.inspector.starting_line(value)?;

        let module = self.sources.get(&file);
        let scope = module
            .function_or_lambda_at_line(line)
            .map_err(analysis_error(&file))?;
        let chains = module
            .free_variable_chains(&scope)
            .map_err(analysis_error(&file))?;
        let resolution =
            ScopeResolver::new(self.config).resolve(Environment::Function(function), &chains)?;

        let file_id = self.intern_file(&file)?;
        let bindings = self.walk_bindings(resolution)?;
        self.registry.define_function(id, file_id, line, &bindings)?;
        Ok(())
    }

    pub(super) fn walk_class(&mut self, id: ObjectId, value: &Value, class: &ClassObject) -> Result<(), WalkError> {
        self.check_reserved(&class.name)?;
        let file = self.inspector.source_file(value)?;
        let line = self.inspector.starting_line(value)?;

        let module = self.sources.get(&file);
        let def = module.class_at_line(line).map_err(analysis_error(&file))?;
        let base_chains = module.base_class_chains(&def);
        let chains = module
            .free_variable_chains(&Scope::Class(def))
            .map_err(analysis_error(&file))?;
        let resolution = ScopeResolver::new(self.config)
            .resolve(Environment::Class(class, &base_chains), &chains)?;

        let file_id = self.intern_file(&file)?;
        let bindings = self.walk_bindings(resolution)?;
        let bases = self.walk_all(&class.bases)?;
        self.registry
            .define_class(id, file_id, line, &bindings, &bases)?;
        Ok(())
    }

    /// Refuses blocks a `return` or `yield` would escape from.
    ///
    /// Names the block binds are shipped too when they were already bound
    /// on entry: the block may read them before its own assignment runs.
    pub(super) fn walk_with_block(&mut self, id: ObjectId, block: &WithBlockObject) -> Result<(), WalkError> {
        let file = &block.file;
        let line = block.line;
        let module = self.sources.get(file);
        let scope = module
            .with_body_at_line(line)
            .map_err(|source| WalkError::WithBlock {
                path: file.path.clone(),
                line,
                source,
            })?;

        let mut chains = module
            .free_variable_chains(&scope)
            .map_err(analysis_error(file))?;
        let bound = module
            .bound_values_in_scope(&scope)
            .map_err(analysis_error(file))?;
        let with_position = match &scope {
            Scope::WithBody(with) => with
                .with_token()
                .map(|t| module.lines().position(t.text_range().start())),
            _ => None,
        }
        .unwrap_or_default();
        for name in bound {
            if block.unbound_locals.contains(&name) || !block.bound_variables.contains_key(&name) {
                continue;
            }
            let chain = FreeVariableChain::single(name);
            if chains.iter().any(|c| c.chain == chain) {
                continue;
            }
            chains.push(ChainWithPosition::new(chain, with_position));
        }

        let resolution = ScopeResolver::new(self.config).resolve(Environment::WithBlock(block), &chains)?;
        let file_id = self.intern_file(file)?;
        let bindings = self.walk_bindings(resolution)?;
        self.registry.define_with_block(id, &bindings, file_id, line)?;
        Ok(())
    }

    /// Members an instance with an empty member map is encoded with: the
    /// data members its class's `__init__` assigns, read off the instance.
    pub(super) fn data_members(
        &mut self,
        instance: &Value,
        class: &Value,
    ) -> Result<IndexMap<String, Value>, WalkError> {
        let Some(code) = class.as_class().and_then(|c| c.code.as_ref()) else {
            return Ok(IndexMap::new());
        };
        let module = self.sources.get(&code.file);
        let def = module
            .class_at_line(code.line)
            .map_err(analysis_error(&code.file))?;
        let names = module.data_members(&def).map_err(analysis_error(&code.file))?;
        Ok(names
            .into_iter()
            .filter_map(|name| instance.get_attr(&name).map(|v| (name, v)))
            .collect())
    }

    /// Each source file is written once per walk.
    fn intern_file(&mut self, file: &Rc<SourceFile>) -> Result<ObjectId, WalkError> {
        if let Some(&id) = self.files.get(&file.path) {
            tracing::debug!(path = %file.path, %id, "file already written");
            return Ok(id);
        }
        let id = self.registry.allocate_object();
        self.registry.define_file(id, &file.path, &file.text)?;
        self.files.insert(file.path.clone(), id);
        Ok(id)
    }

    fn walk_bindings(&mut self, resolution: Resolution) -> Result<Bindings, WalkError> {
        let mut bindings = Bindings::new();
        for (chain, resolved) in resolution.resolved {
            let id = self.walk(&resolved.value)?;
            bindings.insert(chain, id);
        }
        for (name, position) in resolution.unresolved {
            let id = self.registry.allocate_object();
            self.registry.define_unresolved_symbol(id, &name, position)?;
            tracing::debug!(%name, %position, "unresolved free variable");
            bindings.insert(FreeVariableChain::single(name), id);
        }
        Ok(bindings)
    }
}
