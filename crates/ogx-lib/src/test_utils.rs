//! Fixtures shared by the unit tests.

use std::rc::Rc;

use ogx_core::{ClassObject, CodeLocation, Colors, FunctionObject, Namespace, Object, SourceFile, Value};

use crate::config::{RehydratorConfig, WalkerConfig};
use crate::walker::ObjectWalker;

pub fn source(path: &str, text: &str) -> Rc<SourceFile> {
    Rc::new(SourceFile::new(path, text))
}

/// A function defined at `line` of `file`, registered in `globals` under its name.
pub fn def_function(file: &Rc<SourceFile>, line: u32, name: &str, globals: &Namespace) -> Value {
    let code = CodeLocation::new(Rc::clone(file), line);
    let function = Value::function(FunctionObject::new(name, Some(code), globals.clone()));
    globals.insert(name, function.clone());
    function
}

pub fn def_class(file: &Rc<SourceFile>, line: u32, name: &str, globals: &Namespace, bases: Vec<Value>) -> Value {
    let code = CodeLocation::new(Rc::clone(file), line);
    let class = Value::class(ClassObject::new(name, Some(code), globals.clone()).with_bases(bases));
    globals.insert(name, class.clone());
    class
}

/// Appends `item` to a list value.
pub fn push(list: &Value, item: Value) {
    if let Object::List(items) = list.object() {
        items.borrow_mut().push(item);
    }
}

pub fn dump_bytes(bytes: &[u8]) -> String {
    let table = ogx_wire::load(bytes).expect("valid stream");
    ogx_wire::dump(&table, Colors::OFF)
}

/// Walks `value` with default collaborators and renders the stream.
pub fn walk_dump(value: &Value, config: &WalkerConfig) -> String {
    let mut walker = ObjectWalker::new(Vec::new(), config);
    walker.walk(value).expect("walk succeeds");
    dump_bytes(&walker.finish().expect("stream finishes"))
}

pub fn roundtrip(value: &Value) -> Value {
    let walker = WalkerConfig::default();
    let encoded = crate::encode(value, &walker).expect("encode succeeds");
    crate::decode(&encoded.bytes, encoded.root, &RehydratorConfig::matching(&walker)).expect("decode succeeds")
}
