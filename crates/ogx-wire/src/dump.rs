//! Human-readable listing of a loaded stream.
//!
//! One line per record, in id order:
//!
//! ```text
//! #0  Str 'x'
//! #1  List [#0, #0]
//! #2  Function #3:4 {np.float64: #5}
//! ```

use std::fmt::Write as _;

use ogx_core::{Colors, ObjectId};

use crate::load::IdTable;
use crate::record::{Bindings, Primitive, Record};

/// Renders every record of `table`.
pub fn dump(table: &IdTable, colors: Colors) -> String {
    let width = table
        .iter()
        .last()
        .map(|(id, _)| id.to_string().len())
        .unwrap_or(2);
    let mut out = String::new();
    for (id, record) in table.iter() {
        let label = id.to_string();
        out.push_str(colors.id);
        out.push_str(&label);
        out.push_str(colors.reset);
        for _ in label.len()..width + 2 {
            out.push(' ');
        }
        out.push_str(colors.tag);
        out.push_str(record.tag().name());
        out.push_str(colors.reset);
        out.push(' ');
        dump_payload(&mut out, record, colors);
        out.push('\n');
    }
    out
}

fn dump_payload(out: &mut String, record: &Record, c: Colors) {
    match record {
        Record::Primitive(p) => dump_primitive(out, p, c),
        Record::Tuple(ids) | Record::List(ids) => dump_ids(out, ids, c),
        Record::Dict { keys, values } => {
            out.push('{');
            for (i, (k, v)) in keys.iter().zip(values).enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                push_id(out, *k, c);
                out.push_str(": ");
                push_id(out, *v, c);
            }
            out.push('}');
        }
        Record::File { path, text } => {
            let _ = write!(out, "{path} {}({} bytes){}", c.dim, text.len(), c.reset);
        }
        Record::Function { file, line, bindings } => {
            dump_location(out, *file, *line, c);
            out.push(' ');
            dump_bindings(out, bindings, c);
        }
        Record::Class {
            file,
            line,
            bindings,
            bases,
        } => {
            dump_location(out, *file, *line, c);
            out.push(' ');
            dump_bindings(out, bindings, c);
            out.push_str(" bases ");
            dump_ids(out, bases, c);
        }
        Record::ClassInstance { class, members } => {
            push_id(out, *class, c);
            out.push_str(" {");
            for (i, (name, id)) in members.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{name}: ");
                push_id(out, *id, c);
            }
            out.push('}');
        }
        Record::InstanceMethod { instance, name } => {
            push_id(out, *instance, c);
            let _ = write!(out, ".{name}");
        }
        Record::NamedSingleton(name) => out.push_str(name),
        Record::BuiltinExceptionInstance { type_name, args }
        | Record::PyAbortException { type_name, args } => {
            let _ = write!(out, "{type_name} args ");
            push_id(out, *args, c);
        }
        Record::RemoteObjectRef(json) | Record::StackTrace(json) => {
            let _ = write!(out, "{}{json}{}", c.literal, c.reset);
        }
        Record::PackedHomogeneousData { dtype, bytes } => {
            let _ = write!(out, "{dtype} {}({} bytes){}", c.dim, bytes.len(), c.reset);
        }
        Record::WithBlock { bindings, file, line } => {
            dump_location(out, *file, *line, c);
            out.push(' ');
            dump_bindings(out, bindings, c);
        }
        Record::Unconvertible(None) => out.push('-'),
        Record::Unconvertible(Some(path)) => out.push_str(&path.join(".")),
        Record::UnresolvedSymbol { name, position } => {
            let _ = write!(out, "{name} {}@ {position}{}", c.dim, c.reset);
        }
    }
}

fn dump_primitive(out: &mut String, p: &Primitive, c: Colors) {
    match p {
        Primitive::None => out.push_str("None"),
        Primitive::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Primitive::Long(digits) => {
            let _ = write!(out, "{digits}");
        }
        Primitive::Float(f) => {
            let _ = write!(out, "{f:?}");
        }
        Primitive::Bool(true) => out.push_str("True"),
        Primitive::Bool(false) => out.push_str("False"),
        Primitive::Str(s) => {
            let _ = write!(out, "{}{s:?}{}", c.literal, c.reset);
        }
        Primitive::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                dump_primitive(out, item, c);
            }
            out.push(']');
        }
    }
}

fn dump_location(out: &mut String, file: ObjectId, line: u32, c: Colors) {
    push_id(out, file, c);
    let _ = write!(out, "{}:{line}{}", c.dim, c.reset);
}

fn dump_bindings(out: &mut String, bindings: &Bindings, c: Colors) {
    out.push('{');
    for (i, (chain, id)) in bindings.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{chain}: ");
        push_id(out, *id, c);
    }
    out.push('}');
}

fn dump_ids(out: &mut String, ids: &[ObjectId], c: Colors) {
    out.push('[');
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_id(out, *id, c);
    }
    out.push(']');
}

fn push_id(out: &mut String, id: ObjectId, c: Colors) {
    out.push_str(c.id);
    let _ = write!(out, "{id}");
    out.push_str(c.reset);
}
