use std::io::Cursor;

use ogx_core::ObjectId;

use crate::bytes::{ByteReader, ByteWriter, SliceReader, StreamReader};
use crate::error::WireError;
use crate::load::{load, load_framed, load_from_reader, read_record};
use crate::record::{Primitive, Record};
use crate::registry::GraphRegistry;

fn id(n: i64) -> ObjectId {
    ObjectId::new(n)
}

/// `[x, x]` where `x = "shared"`, root at #1.
fn shared_list_stream() -> Vec<u8> {
    let mut reg = GraphRegistry::new(Vec::new());
    let x = reg.allocate_object();
    let list = reg.allocate_object();
    reg.define_primitive(x, &Primitive::Str("shared".into())).unwrap();
    reg.define_list(list, &[x, x]).unwrap();
    reg.define_end_of_stream().unwrap();
    reg.into_inner()
}

#[test]
fn loads_until_sentinel() {
    let table = load(&shared_list_stream()).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.get(id(1)), Some(&Record::List(vec![id(0), id(0)])));
}

#[test]
fn empty_input_is_missing_sentinel() {
    insta::assert_snapshot!(load(&[]).unwrap_err(), @"stream ended without the end-of-stream marker");
}

#[test]
fn stream_without_sentinel_is_rejected() {
    let mut bytes = shared_list_stream();
    bytes.truncate(bytes.len() - 8);

    assert!(matches!(load(&bytes).unwrap_err(), WireError::MissingSentinel));
}

#[test]
fn partial_id_is_truncation() {
    let mut bytes = shared_list_stream();
    bytes.truncate(bytes.len() - 3);

    assert!(matches!(
        load(&bytes).unwrap_err(),
        WireError::Truncated { needed: 3, .. }
    ));
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = shared_list_stream();
    let end = bytes.len();
    bytes.push(0);

    let err = load(&bytes).unwrap_err();

    assert!(matches!(err, WireError::TrailingBytes { offset } if offset == end));
}

#[test]
fn unknown_tag_is_fatal() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    w.add_byte(99);

    insta::assert_snapshot!(load(w.as_slice()).unwrap_err(), @"unknown tag 99 for object #0 at byte 8");
}

#[test]
fn duplicate_id_is_fatal() {
    let mut reg = GraphRegistry::new(Vec::new());
    reg.define_primitive(id(0), &Primitive::None).unwrap();
    reg.define_primitive(id(0), &Primitive::Int(1)).unwrap();
    reg.define_end_of_stream().unwrap();

    insta::assert_snapshot!(load(&reg.into_inner()).unwrap_err(), @"object #0 is defined twice");
}

#[test]
fn dangling_reference_is_fatal() {
    let mut reg = GraphRegistry::new(Vec::new());
    reg.define_tuple(id(0), &[id(5)]).unwrap();
    reg.define_end_of_stream().unwrap();

    insta::assert_snapshot!(
        load(&reg.into_inner()).unwrap_err(),
        @"object #0 references #5, which is never defined"
    );
}

#[test]
fn self_reference_is_accepted() {
    let mut reg = GraphRegistry::new(Vec::new());
    reg.define_list(id(0), &[id(0)]).unwrap();
    reg.define_end_of_stream().unwrap();

    let table = load(&reg.into_inner()).unwrap();

    assert_eq!(table.get(id(0)), Some(&Record::List(vec![id(0)])));
}

#[test]
fn dict_key_value_counts_must_match() {
    let mut reg = GraphRegistry::new(Vec::new());
    reg.define_primitive(id(0), &Primitive::None).unwrap();
    reg.define_dict(id(1), &[id(0)], &[]).unwrap();
    reg.define_end_of_stream().unwrap();

    assert!(matches!(
        load(&reg.into_inner()).unwrap_err(),
        WireError::OutOfRange { what: "dict value count", .. }
    ));
}

#[test]
fn nested_primitive_list_rejects_container_tags() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    w.add_byte(7); // ListOfPrimitives
    w.add_i64(1);
    w.add_byte(10); // List is not a primitive

    assert!(matches!(
        load(w.as_slice()).unwrap_err(),
        WireError::UnknownTag { tag: 10, offset: 17, .. }
    ));
}

#[test]
fn read_record_stops_at_sentinel() {
    let bytes = shared_list_stream();
    let mut r = SliceReader::new(&bytes);

    assert!(read_record(&mut r).unwrap().is_some());
    assert!(read_record(&mut r).unwrap().is_some());
    assert!(read_record(&mut r).unwrap().is_none());
    assert!(r.is_at_end());
}

#[test]
fn reader_stops_after_sentinel() {
    let mut bytes = shared_list_stream();
    bytes.extend_from_slice(&1i64.to_le_bytes());
    let mut r = StreamReader::new(Cursor::new(bytes));

    let table = load_from_reader(&mut r).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(r.read_i64().unwrap(), 1);
}

#[test]
fn framed_stream_yields_root() {
    let mut bytes = shared_list_stream();
    bytes.extend_from_slice(&1i64.to_le_bytes());
    let mut r = StreamReader::new(Cursor::new(bytes));

    let (table, root) = load_framed(&mut r).unwrap();

    assert_eq!(root, id(1));
    assert_eq!(table.len(), 2);
}

#[test]
fn framed_root_must_exist() {
    let mut bytes = shared_list_stream();
    bytes.extend_from_slice(&9i64.to_le_bytes());
    let mut r = SliceReader::new(&bytes);

    insta::assert_snapshot!(load_framed(&mut r).unwrap_err(), @"root id 9 out of range at byte 60");
}

#[test]
fn framed_stream_cut_before_root_is_truncated() {
    let mut r = StreamReader::new(Cursor::new(shared_list_stream()));

    assert!(matches!(
        load_framed(&mut r).unwrap_err(),
        WireError::Truncated { needed: 8, .. }
    ));
}

#[test]
fn bad_chain_in_bindings_is_rejected() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    w.add_byte(16); // Function
    w.add_i64(0);
    w.add_i32(1);
    w.add_i32(1);
    w.add_string("a..b").unwrap();
    w.add_i64(0);
    w.add_i64(-1);

    insta::assert_snapshot!(
        load(w.as_slice()).unwrap_err(),
        @"invalid free variable chain: free variable chain `a..b` has an empty component"
    );
}

#[test]
fn deeply_nested_primitive_list_is_an_error() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    for _ in 0..10_000 {
        w.add_byte(7); // ListOfPrimitives
        w.add_i64(1);
    }
    w.add_byte(1);
    w.add_i64(-1);

    let err = load(w.as_slice()).unwrap_err();

    assert!(matches!(err, WireError::TooDeep { limit: 128, .. }), "{err}");
}

#[test]
fn moderately_nested_primitive_list_loads() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    for _ in 0..3 {
        w.add_byte(7);
        w.add_i64(1);
    }
    w.add_byte(2);
    w.add_i64(5);
    w.add_i64(-1);

    let table = load(w.as_slice()).unwrap();

    let leaf = Primitive::List(vec![Primitive::Int(5)]);
    let nested = Primitive::List(vec![Primitive::List(vec![leaf])]);
    assert_eq!(table.get(id(0)), Some(&Record::Primitive(nested)));
}

#[test]
fn deeply_nested_dtype_is_an_error() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    w.add_byte(9); // PackedHomogenousData
    for _ in 0..10_000 {
        w.add_byte(10); // List descriptor
        w.add_i32(1);
    }
    w.add_byte(1);
    w.add_i32(0);
    w.add_i64(-1);

    let err = load(w.as_slice()).unwrap_err();

    assert!(matches!(err, WireError::TooDeep { id, .. } if id == ObjectId::new(0)), "{err}");
}

#[test]
fn repeated_chain_in_bindings_is_rejected() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    w.add_byte(16); // Function
    w.add_i64(0);
    w.add_i32(1);
    w.add_i32(2);
    w.add_string("a.b").unwrap();
    w.add_i64(0);
    w.add_string("a.b").unwrap();
    w.add_i64(0);
    w.add_i64(-1);

    insta::assert_snapshot!(load(w.as_slice()).unwrap_err(), @"object #0 carries `a.b` twice");
}

#[test]
fn repeated_instance_member_is_rejected() {
    let mut w = ByteWriter::new();
    w.add_i64(0);
    w.add_byte(19); // ClassInstance
    w.add_i64(0);
    w.add_i32(2);
    w.add_string("side").unwrap();
    w.add_i64(0);
    w.add_string("side").unwrap();
    w.add_i64(0);
    w.add_i64(-1);

    let err = load(w.as_slice()).unwrap_err();

    assert!(matches!(err, WireError::DuplicateKey { ref key, .. } if key == "side"), "{err}");
}
