use std::collections::BTreeMap;
use std::io::{self, Write};

use ogx_core::{Dtype, FreeVariableChain, ObjectId, Position};

use crate::error::WireError;
use crate::load::load;
use crate::record::{Bindings, Primitive, Record};
use crate::registry::GraphRegistry;

fn chain(dotted: &str) -> FreeVariableChain {
    dotted.parse().unwrap()
}

#[test]
fn ids_are_allocated_from_zero() {
    let mut reg = GraphRegistry::new(Vec::new());

    assert_eq!(reg.allocate_object(), ObjectId::new(0));
    assert_eq!(reg.allocate_object(), ObjectId::new(1));
    assert!(reg.into_inner().is_empty());
}

#[test]
fn record_layout_is_id_tag_payload() {
    let mut reg = GraphRegistry::new(Vec::new());
    let id = reg.allocate_object();
    reg.define_primitive(id, &Primitive::Int(5)).unwrap();
    reg.define_end_of_stream().unwrap();

    let bytes = reg.into_inner();

    assert_eq!(
        bytes,
        vec![
            0, 0, 0, 0, 0, 0, 0, 0, // id
            2, // Int
            5, 0, 0, 0, 0, 0, 0, 0, // payload
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // sentinel
        ]
    );
}

#[test]
fn sentinel_is_the_last_eight_bytes() {
    let mut reg = GraphRegistry::new(Vec::new());
    let id = reg.allocate_object();
    reg.define_primitive(id, &Primitive::Str("abc".into())).unwrap();
    reg.define_end_of_stream().unwrap();
    let written = reg.bytes_written();

    let bytes = reg.into_inner();

    assert_eq!(written as usize, bytes.len());
    assert_eq!(&bytes[bytes.len() - 8..], &(-1i64).to_le_bytes());
}

#[test]
fn unconvertible_ids_are_tracked() {
    let mut reg = GraphRegistry::new(Vec::new());
    let a = reg.allocate_object();
    let b = reg.allocate_object();
    reg.define_unconvertible(a, Some(&["socket".to_string(), "socket".to_string()]))
        .unwrap();
    reg.define_primitive(b, &Primitive::None).unwrap();

    assert!(reg.is_unconvertible(a));
    assert!(!reg.is_unconvertible(b));
}

#[test]
fn bindings_are_written_in_chain_order() {
    let mut reg = GraphRegistry::new(Vec::new());
    let file = reg.allocate_object();
    let f = reg.allocate_object();
    let x = reg.allocate_object();
    let mut bindings = Bindings::new();
    bindings.insert(chain("np.float64"), x);
    bindings.insert(chain("a"), x);
    reg.define_primitive(x, &Primitive::Int(1)).unwrap();
    reg.define_file(file, "m.py", "def f(): pass\n").unwrap();
    reg.define_function(f, file, 1, &bindings).unwrap();
    reg.define_end_of_stream().unwrap();

    let table = load(&reg.into_inner()).unwrap();

    let Some(Record::Function { bindings, .. }) = table.get(f) else {
        panic!("expected a function record");
    };
    let keys: Vec<String> = bindings.keys().map(|c| c.dotted()).collect();
    assert_eq!(keys, vec!["a", "np.float64"]);
}

#[test]
fn define_round_trips_every_record_kind() {
    let id = ObjectId::new;
    let mut bindings = Bindings::new();
    bindings.insert(chain("x"), id(0));
    let mut members = BTreeMap::new();
    members.insert("b".to_string(), id(0));
    members.insert("a".to_string(), id(1));

    let records = vec![
        Record::Primitive(Primitive::List(vec![
            Primitive::Int(1),
            Primitive::Long("123456789012345678901234567890".into()),
            Primitive::List(vec![Primitive::Bool(false), Primitive::None]),
        ])),
        Record::Primitive(Primitive::Float(-0.25)),
        Record::File {
            path: "m.py".into(),
            text: "x = 1\n".into(),
        },
        Record::Tuple(vec![id(0), id(1)]),
        Record::List(vec![]),
        Record::Dict {
            keys: vec![id(0)],
            values: vec![id(1)],
        },
        Record::Function {
            file: id(2),
            line: 3,
            bindings: bindings.clone(),
        },
        Record::Class {
            file: id(2),
            line: 9,
            bindings: bindings.clone(),
            bases: vec![id(6)],
        },
        Record::ClassInstance { class: id(7), members },
        Record::InstanceMethod {
            instance: id(8),
            name: "area".into(),
        },
        Record::NamedSingleton("len".into()),
        Record::BuiltinExceptionInstance {
            type_name: "ValueError".into(),
            args: id(3),
        },
        Record::PyAbortException {
            type_name: "InvalidPyforaOperation".into(),
            args: id(3),
        },
        Record::RemoteObjectRef(r#"{"objectId": 4}"#.into()),
        Record::PackedHomogeneousData {
            dtype: Dtype::List(vec![Dtype::Tuple(vec![Dtype::Str("x".into()), Dtype::Str("<f8".into())])]),
            bytes: vec![0; 8],
        },
        Record::WithBlock {
            bindings,
            file: id(2),
            line: 12,
        },
        Record::StackTrace("[]".into()),
        Record::Unconvertible(None),
        Record::UnresolvedSymbol {
            name: "qqq".into(),
            position: Position::new(4, 11),
        },
    ];

    let mut reg = GraphRegistry::new(Vec::new());
    for (i, record) in records.iter().enumerate() {
        reg.define(id(i as i64), record).unwrap();
    }
    reg.define_end_of_stream().unwrap();

    let table = load(&reg.into_inner()).unwrap();

    assert_eq!(table.len(), records.len());
    for (i, record) in records.iter().enumerate() {
        assert_eq!(table.get(id(i as i64)), Some(record));
    }
}

#[test]
fn oversized_line_is_rejected() {
    let mut reg = GraphRegistry::new(Vec::new());

    let err = reg
        .define_function(ObjectId::new(0), ObjectId::new(1), u32::MAX, &Bindings::new())
        .unwrap_err();

    assert!(matches!(err, WireError::OutOfRange { what: "line", .. }));
}

struct CountingWriter {
    writes: usize,
    bytes: Vec<u8>,
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn each_record_is_one_write() {
    let mut reg = GraphRegistry::new(CountingWriter {
        writes: 0,
        bytes: Vec::new(),
    });
    reg.define_primitive(ObjectId::new(0), &Primitive::Str("a".into()))
        .unwrap();
    reg.define_list(ObjectId::new(1), &[ObjectId::new(0)]).unwrap();
    reg.define_end_of_stream().unwrap();

    let out = reg.into_inner();

    assert_eq!(out.writes, 3);
    assert_eq!(load(&out.bytes).unwrap().len(), 2);
}

#[test]
fn io_errors_surface() {
    struct Broken;
    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("pipe closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut reg = GraphRegistry::new(Broken);
    let err = reg.define_primitive(ObjectId::new(0), &Primitive::None).unwrap_err();

    insta::assert_snapshot!(err, @"io error: pipe closed");
}
