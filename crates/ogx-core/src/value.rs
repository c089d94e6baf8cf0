//! Host value model.
//!
//! Values are shared handles (`Rc`) so that aliasing and cycles in the host
//! graph survive a round trip. Containers that can participate in cycles use
//! interior mutability: the rehydrator creates them empty, memoizes them, and
//! fills them afterwards.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::chain::FreeVariableChain;
use crate::dtype::Dtype;
use crate::namespace::{NameNotDefined, Namespace};

/// Non-owning identity of a value.
///
/// Used only as a hash key. Whoever stores an `Identity` must also keep the
/// owning `Value` alive for as long as the key is in use.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Identity(usize);

#[derive(Clone)]
pub struct Value(Rc<Object>);

pub enum Object {
    None,
    Bool(bool),
    Int(i64),
    /// Arbitrary-precision integer, kept as decimal digits.
    Long(String),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(RefCell<Vec<Value>>),
    Dict(RefCell<Vec<(Value, Value)>>),
    Function(FunctionObject),
    Class(ClassObject),
    Instance(InstanceObject),
    BoundMethod(BoundMethod),
    Module(ModuleObject),
    Builtin(BuiltinObject),
    Exception(ExceptionObject),
    Remote(RemoteObject),
    Packed(PackedArray),
    Pending(PendingValue),
    Traceback(serde_json::Value),
    WithBlock(WithBlockObject),
    File(Rc<SourceFile>),
    /// Placeholder for a value that could not cross the boundary.
    Unconvertible(Option<Vec<String>>),
    Opaque(OpaqueObject),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Where a definition lives: its file and the 1-based line it starts on.
#[derive(Debug, Clone)]
pub struct CodeLocation {
    pub file: Rc<SourceFile>,
    pub line: u32,
}

impl CodeLocation {
    pub fn new(file: Rc<SourceFile>, line: u32) -> Self {
        Self { file, line }
    }
}

pub struct FunctionObject {
    pub name: String,
    pub code: Option<CodeLocation>,
    pub globals: Namespace,
    pub closure: IndexMap<String, Value>,
    pub module: Option<String>,
}

impl FunctionObject {
    pub fn new(name: impl Into<String>, code: Option<CodeLocation>, globals: Namespace) -> Self {
        Self {
            name: name.into(),
            code,
            globals,
            closure: IndexMap::new(),
            module: None,
        }
    }

    pub fn with_closure(mut self, closure: IndexMap<String, Value>) -> Self {
        self.closure = closure;
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Reads a free name the way the function body would at call time.
    pub fn lookup(&self, name: &str) -> Result<Value, NameNotDefined> {
        if let Some(v) = self.closure.get(name) {
            return Ok(v.clone());
        }
        match self.globals.slot(name) {
            Some(slot) => slot.get(),
            None => Err(NameNotDefined {
                name: name.to_string(),
                position: None,
            }),
        }
    }

    /// Evaluates a whole member access chain, descending through attributes.
    pub fn lookup_chain(&self, chain: &FreeVariableChain) -> Result<Value, NameNotDefined> {
        let (mut value, consumed) = match self.closure.get(chain.root()) {
            Some(v) => (v.clone(), 1),
            None => match self.globals.lookup_chain(chain) {
                Some((slot, consumed)) => (slot.get()?, consumed),
                None => {
                    return Err(NameNotDefined {
                        name: chain.root().to_string(),
                        position: None,
                    });
                }
            },
        };
        for component in &chain.components()[consumed..] {
            value = value.get_attr(component).ok_or_else(|| NameNotDefined {
                name: chain.dotted(),
                position: None,
            })?;
        }
        Ok(value)
    }
}

pub struct ClassObject {
    pub name: String,
    pub code: Option<CodeLocation>,
    pub bases: Vec<Value>,
    pub attributes: RefCell<IndexMap<String, Value>>,
    pub globals: Namespace,
    pub module: Option<String>,
}

impl ClassObject {
    pub fn new(name: impl Into<String>, code: Option<CodeLocation>, globals: Namespace) -> Self {
        Self {
            name: name.into(),
            code,
            bases: Vec::new(),
            attributes: RefCell::new(IndexMap::new()),
            globals,
            module: None,
        }
    }

    pub fn with_bases(mut self, bases: Vec<Value>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn set_attr(&self, name: impl Into<String>, value: Value) {
        self.attributes.borrow_mut().insert(name.into(), value);
    }

    /// Own attribute, then the bases in declaration order (depth first).
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.attributes.borrow().get(name) {
            return Some(v.clone());
        }
        self.bases
            .iter()
            .find_map(|base| base.as_class().and_then(|c| c.lookup(name)))
    }

    /// Member functions defined directly in the class body.
    pub fn methods(&self) -> Vec<Value> {
        self.attributes
            .borrow()
            .values()
            .filter(|v| v.as_function().is_some())
            .cloned()
            .collect()
    }
}

pub struct InstanceObject {
    pub class: Value,
    pub members: RefCell<IndexMap<String, Value>>,
}

impl InstanceObject {
    pub fn new(class: Value, members: IndexMap<String, Value>) -> Self {
        Self {
            class,
            members: RefCell::new(members),
        }
    }

    pub fn member(&self, name: &str) -> Option<Value> {
        self.members.borrow().get(name).cloned()
    }

    pub fn set_member(&self, name: impl Into<String>, value: Value) {
        self.members.borrow_mut().insert(name.into(), value);
    }

    pub fn class_name(&self) -> String {
        self.class.type_label()
    }
}

pub struct BoundMethod {
    pub instance: Value,
    pub name: String,
}

impl BoundMethod {
    /// The function the method name refers to on the instance or its class.
    pub fn function(&self) -> Option<Value> {
        self.instance.get_attr(&self.name)
    }
}

pub struct ModuleObject {
    pub name: String,
    pub members: Namespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    Function,
    Type,
    ExceptionType,
}

pub struct BuiltinObject {
    pub name: String,
    pub kind: BuiltinKind,
}

pub struct ExceptionObject {
    pub class: Value,
    pub args: Value,
}

pub struct RemoteObject {
    pub payload: serde_json::Value,
}

pub struct PackedArray {
    pub dtype: Dtype,
    pub bytes: Vec<u8>,
}

pub struct WithBlockObject {
    pub file: Rc<SourceFile>,
    pub line: u32,
    /// Names the enclosing frame had bound when the block was entered.
    pub bound_variables: IndexMap<String, Value>,
    /// Locals of the enclosing frame that were declared but never assigned.
    pub unbound_locals: Vec<String>,
}

pub struct OpaqueObject {
    pub type_name: String,
    pub module: Option<String>,
}

type Resolver = Box<dyn FnOnce() -> Result<Value, String>>;

/// A result that may not be available yet. Waiting blocks until it is.
pub struct PendingValue {
    resolver: RefCell<Option<Resolver>>,
    result: OnceCell<Result<Value, String>>,
}

impl PendingValue {
    pub fn new(resolver: impl FnOnce() -> Result<Value, String> + 'static) -> Self {
        Self {
            resolver: RefCell::new(Some(Box::new(resolver))),
            result: OnceCell::new(),
        }
    }

    pub fn ready(value: Value) -> Self {
        let result = OnceCell::new();
        let _ = result.set(Ok(value));
        Self {
            resolver: RefCell::new(None),
            result,
        }
    }

    pub fn wait(&self) -> Result<Value, String> {
        if let Some(result) = self.result.get() {
            return result.clone();
        }
        let resolver = self.resolver.borrow_mut().take();
        let result = match resolver {
            Some(resolve) => resolve(),
            None => Err("pending value was abandoned".to_string()),
        };
        let _ = self.result.set(result.clone());
        result
    }
}

impl Value {
    pub fn new(object: Object) -> Self {
        Self(Rc::new(object))
    }

    pub fn none() -> Self {
        Self::new(Object::None)
    }

    pub fn bool(b: bool) -> Self {
        Self::new(Object::Bool(b))
    }

    pub fn int(n: i64) -> Self {
        Self::new(Object::Int(n))
    }

    pub fn long(digits: impl Into<String>) -> Self {
        Self::new(Object::Long(digits.into()))
    }

    pub fn float(f: f64) -> Self {
        Self::new(Object::Float(f))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Self::new(Object::Str(s.into()))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Self::new(Object::Tuple(items))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::new(Object::List(RefCell::new(items)))
    }

    pub fn dict(entries: Vec<(Value, Value)>) -> Self {
        Self::new(Object::Dict(RefCell::new(entries)))
    }

    pub fn function(f: FunctionObject) -> Self {
        Self::new(Object::Function(f))
    }

    pub fn class(c: ClassObject) -> Self {
        Self::new(Object::Class(c))
    }

    pub fn instance(class: Value, members: IndexMap<String, Value>) -> Self {
        Self::new(Object::Instance(InstanceObject::new(class, members)))
    }

    pub fn module(name: impl Into<String>, members: Namespace) -> Self {
        Self::new(Object::Module(ModuleObject {
            name: name.into(),
            members,
        }))
    }

    pub fn builtin(name: impl Into<String>, kind: BuiltinKind) -> Self {
        Self::new(Object::Builtin(BuiltinObject {
            name: name.into(),
            kind,
        }))
    }

    pub fn unconvertible(path: Option<Vec<String>>) -> Self {
        Self::new(Object::Unconvertible(path))
    }

    pub fn opaque(type_name: impl Into<String>, module: Option<String>) -> Self {
        Self::new(Object::Opaque(OpaqueObject {
            type_name: type_name.into(),
            module,
        }))
    }

    #[inline]
    pub fn object(&self) -> &Object {
        &self.0
    }

    #[inline]
    pub fn identity(&self) -> Identity {
        Identity(Rc::as_ptr(&self.0) as *const () as usize)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self.object(),
            Object::None
                | Object::Bool(_)
                | Object::Int(_)
                | Object::Long(_)
                | Object::Float(_)
                | Object::Str(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.object() {
            Object::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.object() {
            Object::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionObject> {
        match self.object() {
            Object::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassObject> {
        match self.object() {
            Object::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceObject> {
        match self.object() {
            Object::Instance(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&ModuleObject> {
        match self.object() {
            Object::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_builtin(&self) -> Option<&BuiltinObject> {
        match self.object() {
            Object::Builtin(b) => Some(b),
            _ => None,
        }
    }

    /// Snapshot of a list's elements.
    pub fn list_items(&self) -> Option<Vec<Value>> {
        match self.object() {
            Object::List(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    /// Snapshot of a dict's entries.
    pub fn dict_entries(&self) -> Option<Vec<(Value, Value)>> {
        match self.object() {
            Object::Dict(entries) => Some(entries.borrow().clone()),
            _ => None,
        }
    }

    /// Attribute access: module members, instance members then class
    /// attributes, class attributes through bases.
    pub fn get_attr(&self, name: &str) -> Option<Value> {
        match self.object() {
            Object::Module(m) => m.members.get(name),
            Object::Instance(inst) => inst
                .member(name)
                .or_else(|| inst.class.as_class().and_then(|c| c.lookup(name))),
            Object::Class(c) => c.lookup(name),
            _ => None,
        }
    }

    /// Short, human-oriented name of the value's type.
    pub fn type_label(&self) -> String {
        match self.object() {
            Object::None => "NoneType".into(),
            Object::Bool(_) => "bool".into(),
            Object::Int(_) => "int".into(),
            Object::Long(_) => "long".into(),
            Object::Float(_) => "float".into(),
            Object::Str(_) => "str".into(),
            Object::Tuple(_) => "tuple".into(),
            Object::List(_) => "list".into(),
            Object::Dict(_) => "dict".into(),
            Object::Function(f) => f.name.clone(),
            Object::Class(c) => c.name.clone(),
            Object::Instance(i) => i.class_name(),
            Object::BoundMethod(_) => "instancemethod".into(),
            Object::Module(_) => "module".into(),
            Object::Builtin(b) => b.name.clone(),
            Object::Exception(e) => e.class.type_label(),
            Object::Remote(_) => "remote".into(),
            Object::Packed(_) => "packed".into(),
            Object::Pending(_) => "future".into(),
            Object::Traceback(_) => "traceback".into(),
            Object::WithBlock(_) => "with-block".into(),
            Object::File(_) => "file".into(),
            Object::Unconvertible(_) => "unconvertible".into(),
            Object::Opaque(o) => o.type_name.clone(),
        }
    }

    /// Structural equality that follows cycles.
    ///
    /// Pairs already under comparison are assumed equal, so two isomorphic
    /// cyclic graphs compare equal.
    pub fn graph_eq(&self, other: &Value) -> bool {
        let mut assumed = Vec::new();
        graph_eq(self, other, &mut assumed)
    }
}

fn graph_eq(a: &Value, b: &Value, assumed: &mut Vec<(Identity, Identity)>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    let key = (a.identity(), b.identity());
    if assumed.contains(&key) {
        return true;
    }
    assumed.push(key);

    let seq_eq = |xs: &[Value], ys: &[Value], assumed: &mut Vec<(Identity, Identity)>| {
        xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| graph_eq(x, y, assumed))
    };

    match (a.object(), b.object()) {
        (Object::None, Object::None) => true,
        (Object::Bool(x), Object::Bool(y)) => x == y,
        (Object::Int(x), Object::Int(y)) => x == y,
        (Object::Long(x), Object::Long(y)) => x == y,
        (Object::Float(x), Object::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Object::Str(x), Object::Str(y)) => x == y,
        (Object::Tuple(xs), Object::Tuple(ys)) => seq_eq(xs, ys, assumed),
        (Object::List(xs), Object::List(ys)) => {
            let (xs, ys) = (xs.borrow().clone(), ys.borrow().clone());
            seq_eq(&xs, &ys, assumed)
        }
        (Object::Dict(xs), Object::Dict(ys)) => {
            let (xs, ys) = (xs.borrow().clone(), ys.borrow().clone());
            xs.len() == ys.len()
                && xs.iter().zip(&ys).all(|((kx, vx), (ky, vy))| {
                    graph_eq(kx, ky, assumed) && graph_eq(vx, vy, assumed)
                })
        }
        (Object::Instance(x), Object::Instance(y)) => {
            let (xm, ym) = (x.members.borrow().clone(), y.members.borrow().clone());
            graph_eq(&x.class, &y.class, assumed)
                && xm.len() == ym.len()
                && xm.iter().all(|(name, xv)| {
                    ym.get(name)
                        .is_some_and(|yv| graph_eq(xv, yv, assumed))
                })
        }
        (Object::Class(x), Object::Class(y)) => x.name == y.name && seq_eq(&x.bases, &y.bases, assumed),
        (Object::Function(x), Object::Function(y)) => {
            x.name == y.name
                && x.code.as_ref().map(|c| (&c.file.path, c.line))
                    == y.code.as_ref().map(|c| (&c.file.path, c.line))
        }
        (Object::BoundMethod(x), Object::BoundMethod(y)) => {
            x.name == y.name && graph_eq(&x.instance, &y.instance, assumed)
        }
        (Object::Module(x), Object::Module(y)) => x.name == y.name,
        (Object::Builtin(x), Object::Builtin(y)) => x.name == y.name && x.kind == y.kind,
        (Object::Exception(x), Object::Exception(y)) => {
            graph_eq(&x.class, &y.class, assumed) && graph_eq(&x.args, &y.args, assumed)
        }
        (Object::Remote(x), Object::Remote(y)) => x.payload == y.payload,
        (Object::Packed(x), Object::Packed(y)) => x.dtype == y.dtype && x.bytes == y.bytes,
        (Object::Traceback(x), Object::Traceback(y)) => x == y,
        (Object::File(x), Object::File(y)) => x == y,
        (Object::Unconvertible(x), Object::Unconvertible(y)) => x == y,
        (Object::Opaque(x), Object::Opaque(y)) => {
            x.type_name == y.type_name && x.module == y.module
        }
        _ => false,
    }
}

impl Deref for Value {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.0
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}
