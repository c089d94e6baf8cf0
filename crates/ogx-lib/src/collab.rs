//! Collaborators the walker and rehydrator consult but don't own.
//!
//! - [`ModuleIndex`]: importable paths of module-level objects, both ways
//! - [`ValueMapping`]: substitution of native values by walkable ones, and back
//! - [`SourceInspector`]: where a function or class was defined
//! - [`HostConstructor`]: builds functions, classes and instances on decode
//!
//! Each trait has a default implementation good enough for the host value
//! model in `ogx-core`.

use std::rc::Rc;

use indexmap::IndexMap;
use ogx_analyzer::Scope;
use ogx_analyzer::parser::ast::Stmt;
use ogx_core::{ClassObject, CodeLocation, FunctionObject, Namespace, Object, SourceFile, Value};

use crate::error::{RehydrateError, WalkError};
use crate::sources::SourceCache;

pub trait ModuleIndex {
    /// Dotted import path of `value`, split into components.
    fn path_for(&self, value: &Value) -> Option<Vec<String>>;

    /// The live object an import path names.
    fn object_for(&self, path: &[String]) -> Option<Value>;

    /// A live module-level function or class defined at `path:line`.
    fn module_level_object(&self, _path: &str, _line: u32) -> Option<Value> {
        None
    }
}

/// An index that knows no modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModules;

impl ModuleIndex for NoModules {
    fn path_for(&self, _value: &Value) -> Option<Vec<String>> {
        None
    }

    fn object_for(&self, _path: &[String]) -> Option<Value> {
        None
    }
}

/// Registered modules, searched by name and by member identity.
#[derive(Debug, Clone, Default)]
pub struct ModuleTable {
    modules: IndexMap<String, Value>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module value under its own name. Other values are ignored.
    pub fn register(&mut self, module: Value) {
        let Some(name) = module.as_module().map(|m| m.name.clone()) else {
            tracing::warn!(kind = %module.type_label(), "not a module, ignoring");
            return;
        };
        self.modules.insert(name, module);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn member_path(&self, module_name: &str, member: &str, value: &Value) -> Option<Vec<String>> {
        let module = self.modules.get(module_name)?.as_module()?;
        let found = module.members.get(member)?;
        if !found.ptr_eq(value) {
            return None;
        }
        Some(split_path(module_name, member))
    }
}

fn split_path(module: &str, member: &str) -> Vec<String> {
    module
        .split('.')
        .chain(std::iter::once(member))
        .map(str::to_string)
        .collect()
}

impl ModuleIndex for ModuleTable {
    fn path_for(&self, value: &Value) -> Option<Vec<String>> {
        match value.object() {
            Object::Module(m) if self.modules.contains_key(&m.name) => {
                return Some(m.name.split('.').map(str::to_string).collect());
            }
            Object::Function(FunctionObject {
                name,
                module: Some(module),
                ..
            })
            | Object::Class(ClassObject {
                name,
                module: Some(module),
                ..
            }) => {
                if let Some(path) = self.member_path(module, name, value) {
                    return Some(path);
                }
            }
            // Opaque handles name their type, which is the best we can do.
            Object::Opaque(o) => {
                if let Some(module) = &o.module {
                    return Some(split_path(module, &o.type_name));
                }
            }
            _ => {}
        }

        self.modules.iter().find_map(|(module_name, module)| {
            let members = &module.as_module()?.members;
            members.entries().into_iter().find_map(|(member, slot)| {
                let bound = slot.value()?;
                bound.ptr_eq(value).then(|| split_path(module_name, &member))
            })
        })
    }

    fn object_for(&self, path: &[String]) -> Option<Value> {
        (1..=path.len()).rev().find_map(|split| {
            let module = self.modules.get(&path[..split].join("."))?;
            path[split..]
                .iter()
                .try_fold(module.clone(), |value, component| value.get_attr(component))
        })
    }

    fn module_level_object(&self, path: &str, line: u32) -> Option<Value> {
        self.modules.values().find_map(|module| {
            let members = &module.as_module()?.members;
            members.entries().into_iter().find_map(|(_, slot)| {
                let value = slot.value()?;
                let code = match value.object() {
                    Object::Function(f) => f.code.as_ref(),
                    Object::Class(c) => c.code.as_ref(),
                    _ => None,
                }?;
                (code.file.path == path && code.line == line).then(|| value.clone())
            })
        })
    }
}

/// Replaces host-native values by walkable ones on encode and inverts them on decode.
pub trait ValueMapping {
    fn can_map(&self, value: &Value) -> bool;

    fn mappable_to_pure(&self, value: &Value) -> Result<Value, String>;

    /// Whether instances of `class` decode back into a native value.
    fn can_invert(&self, class: &Value) -> bool;

    fn pure_to_mappable(&self, instance: &Value) -> Result<Value, String>;
}

/// Identity mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMapping;

impl ValueMapping for NoMapping {
    fn can_map(&self, _value: &Value) -> bool {
        false
    }

    fn mappable_to_pure(&self, value: &Value) -> Result<Value, String> {
        Ok(value.clone())
    }

    fn can_invert(&self, _class: &Value) -> bool {
        false
    }

    fn pure_to_mappable(&self, instance: &Value) -> Result<Value, String> {
        Ok(instance.clone())
    }
}

pub trait SourceInspector {
    /// File a function, class or with block was defined in.
    fn source_file(&self, value: &Value) -> Result<Rc<SourceFile>, WalkError>;

    /// 1-based line of the definition.
    fn starting_line(&self, value: &Value) -> Result<u32, WalkError>;
}

/// Reads the code location carried by the value itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeInspector;

impl CodeInspector {
    fn location(value: &Value) -> Result<(Rc<SourceFile>, u32), WalkError> {
        let code = match value.object() {
            Object::Function(f) => f.code.as_ref(),
            Object::Class(c) => c.code.as_ref(),
            Object::WithBlock(w) => return Ok((Rc::clone(&w.file), w.line)),
            _ => None,
        };
        match code {
            Some(CodeLocation { file, line }) => Ok((Rc::clone(file), *line)),
            None => Err(WalkError::CantGetSourceText {
                what: value.type_label(),
                reason: "no code location (defined outside a source file?)".to_string(),
            }),
        }
    }
}

impl SourceInspector for CodeInspector {
    fn source_file(&self, value: &Value) -> Result<Rc<SourceFile>, WalkError> {
        Self::location(value).map(|(file, _)| file)
    }

    fn starting_line(&self, value: &Value) -> Result<u32, WalkError> {
        Self::location(value).map(|(_, line)| line)
    }
}

/// Decode-side construction of code values.
///
/// `globals` already holds every binding the record carried, keyed by
/// dotted chain; the constructed value reads its free names from there.
pub trait HostConstructor {
    fn function(&self, file: &Rc<SourceFile>, line: u32, globals: Namespace) -> Result<Value, RehydrateError>;

    fn class(
        &self,
        file: &Rc<SourceFile>,
        line: u32,
        globals: Namespace,
        bases: Vec<Value>,
    ) -> Result<Value, RehydrateError>;

    /// A with block, as a function without parameters.
    fn with_block(&self, file: &Rc<SourceFile>, line: u32, globals: Namespace) -> Result<Value, RehydrateError>;

    /// An instance of `class` without members.
    fn instantiate(&self, class: &Value) -> Result<Value, RehydrateError>;
}

/// Builds values of the `ogx-core` model straight from the shipped source.
#[derive(Default)]
pub struct SourceConstructor {
    sources: SourceCache,
}

impl SourceConstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(&self) -> &SourceCache {
        &self.sources
    }
}

fn construction_error(file: &SourceFile, line: u32, reason: impl ToString) -> RehydrateError {
    RehydrateError::Construction {
        path: file.path.clone(),
        line,
        reason: reason.to_string(),
    }
}

/// A definition sees its own name, as it would in the module that defined it.
/// Names shipped as bindings take precedence.
fn bind_own_name(globals: &Namespace, name: &str, value: &Value) {
    if name != "<lambda>" && !globals.contains(name) {
        globals.insert(name, value.clone());
    }
}

impl HostConstructor for SourceConstructor {
    fn function(&self, file: &Rc<SourceFile>, line: u32, globals: Namespace) -> Result<Value, RehydrateError> {
        let module = self.sources.get(file);
        let scope = module
            .function_or_lambda_at_line(line)
            .map_err(|e| construction_error(file, line, e))?;
        let name = match &scope {
            Scope::Function(f) => f
                .name()
                .map(|t| t.text().to_string())
                .ok_or_else(|| construction_error(file, line, "function without a name"))?,
            _ => "<lambda>".to_string(),
        };
        tracing::trace!(%name, path = %file.path, line, "construct function");
        let code = CodeLocation::new(Rc::clone(file), line);
        let function = Value::function(FunctionObject::new(name.as_str(), Some(code), globals.clone()));
        bind_own_name(&globals, &name, &function);
        Ok(function)
    }

    fn class(
        &self,
        file: &Rc<SourceFile>,
        line: u32,
        globals: Namespace,
        bases: Vec<Value>,
    ) -> Result<Value, RehydrateError> {
        let module = self.sources.get(file);
        let def = module
            .class_at_line(line)
            .map_err(|e| construction_error(file, line, e))?;
        let class_name = def
            .name()
            .map(|t| t.text().to_string())
            .ok_or_else(|| construction_error(file, line, "class without a name"))?;
        tracing::trace!(name = %class_name, path = %file.path, line, "construct class");

        let code = CodeLocation::new(Rc::clone(file), line);
        let class = ClassObject::new(class_name.as_str(), Some(code), globals.clone()).with_bases(bases);
        let body = def.body();
        for stmt in body.iter().flat_map(|body| body.statements()) {
            let Stmt::FuncDef(method) = stmt else {
                continue;
            };
            let (Some(name), Some(def_token)) = (method.name(), method.def_token()) else {
                continue;
            };
            let method_line = module.lines().line(def_token.text_range().start());
            let code = CodeLocation::new(Rc::clone(file), method_line);
            let function = FunctionObject::new(name.text(), Some(code), globals.clone());
            class.set_attr(name.text(), Value::function(function));
        }
        let class = Value::class(class);
        bind_own_name(&globals, &class_name, &class);
        Ok(class)
    }

    fn with_block(&self, file: &Rc<SourceFile>, line: u32, globals: Namespace) -> Result<Value, RehydrateError> {
        let module = self.sources.get(file);
        module
            .with_body_at_line(line)
            .map_err(|e| construction_error(file, line, e))?;
        let code = CodeLocation::new(Rc::clone(file), line);
        Ok(Value::function(FunctionObject::new("<with-block>", Some(code), globals)))
    }

    fn instantiate(&self, class: &Value) -> Result<Value, RehydrateError> {
        Ok(Value::instance(class.clone(), IndexMap::new()))
    }
}
