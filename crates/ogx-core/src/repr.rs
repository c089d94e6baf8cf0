//! Python-flavoured rendering of values, used by tests and the CLI.

use std::fmt::Write as _;

use crate::value::{BuiltinKind, Identity, Object, Value};

impl Value {
    /// Renders the value. Containers already being rendered print as `[...]`,
    /// `{...}` or `Name(...)`, so cyclic graphs terminate.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        let mut stack = Vec::new();
        write_repr(&mut out, self, &mut stack);
        out
    }
}

fn write_repr(out: &mut String, value: &Value, stack: &mut Vec<Identity>) {
    let id = value.identity();
    if stack.contains(&id) {
        let marker = match value.object() {
            Object::List(_) => "[...]".to_string(),
            Object::Dict(_) => "{...}".to_string(),
            Object::Tuple(_) => "(...)".to_string(),
            _ => format!("{}(...)", value.type_label()),
        };
        out.push_str(&marker);
        return;
    }

    stack.push(id);
    match value.object() {
        Object::None => out.push_str("None"),
        Object::Bool(true) => out.push_str("True"),
        Object::Bool(false) => out.push_str("False"),
        Object::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Object::Long(digits) => {
            let _ = write!(out, "{digits}L");
        }
        Object::Float(f) => {
            let _ = write!(out, "{f:?}");
        }
        Object::Str(s) => write_str_literal(out, s),
        Object::Tuple(items) => {
            out.push('(');
            write_seq(out, items, stack);
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Object::List(items) => {
            let items = items.borrow().clone();
            out.push('[');
            write_seq(out, &items, stack);
            out.push(']');
        }
        Object::Dict(entries) => {
            let entries = entries.borrow().clone();
            out.push('{');
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, k, stack);
                out.push_str(": ");
                write_repr(out, v, stack);
            }
            out.push('}');
        }
        Object::Function(f) => {
            let _ = write!(out, "<function {}>", f.name);
        }
        Object::Class(c) => {
            let _ = write!(out, "<class '{}'>", c.name);
        }
        Object::Instance(inst) => {
            let members = inst.members.borrow().clone();
            let _ = write!(out, "{}(", inst.class_name());
            for (i, (name, v)) in members.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{name}=");
                write_repr(out, v, stack);
            }
            out.push(')');
        }
        Object::BoundMethod(m) => {
            let _ = write!(
                out,
                "<bound method {}.{}>",
                m.instance.type_label(),
                m.name
            );
        }
        Object::Module(m) => {
            let _ = write!(out, "<module '{}'>", m.name);
        }
        Object::Builtin(b) => {
            let _ = match b.kind {
                BuiltinKind::Function => write!(out, "<built-in function {}>", b.name),
                BuiltinKind::Type | BuiltinKind::ExceptionType => {
                    write!(out, "<type '{}'>", b.name)
                }
            };
        }
        Object::Exception(e) => {
            out.push_str(&e.class.type_label());
            match e.args.object() {
                Object::Tuple(args) => {
                    out.push('(');
                    write_seq(out, args, stack);
                    out.push(')');
                }
                _ => {
                    out.push('(');
                    write_repr(out, &e.args, stack);
                    out.push(')');
                }
            }
        }
        Object::Remote(r) => {
            let _ = write!(out, "<remote {}>", r.payload);
        }
        Object::Packed(p) => {
            let _ = write!(out, "<packed {} x{}B>", p.dtype, p.bytes.len());
        }
        Object::Pending(_) => out.push_str("<future>"),
        Object::Traceback(_) => out.push_str("<traceback>"),
        Object::WithBlock(w) => {
            let _ = write!(out, "<with-block {}:{}>", w.file.path, w.line);
        }
        Object::File(file) => {
            let _ = write!(out, "<file {}>", file.path);
        }
        Object::Unconvertible(None) => out.push_str("<unconvertible>"),
        Object::Unconvertible(Some(path)) => {
            let _ = write!(out, "<unconvertible {}>", path.join("."));
        }
        Object::Opaque(o) => {
            let _ = write!(out, "<{} object>", o.type_name);
        }
    }
    stack.pop();
}

fn write_seq(out: &mut String, items: &[Value], stack: &mut Vec<Identity>) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(out, item, stack);
    }
}

fn write_str_literal(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
}
