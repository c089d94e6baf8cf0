use std::io::Write as _;

use indexmap::IndexMap;
use ogx_core::{ClassObject, Namespace, ObjectId, Value};
use ogx_wire::{GraphRegistry, Primitive};

use crate::config::{RehydratorConfig, WalkerConfig};
use crate::error::{Error, RehydrateError, WalkError};
use crate::session::{Session, decode, decode_path, decode_reader, encode, encode_framed};
use crate::test_utils::{def_function, push, source};

fn sample() -> Value {
    let shared = Value::tuple(vec![Value::float(0.25), Value::long("99999999999999999999")]);
    let list = Value::list(vec![shared.clone(), Value::none()]);
    push(&list, list.clone());
    Value::dict(vec![(Value::str("a"), list), (Value::str("b"), shared)])
}

#[test]
fn encode_then_decode() {
    let walker = WalkerConfig::default();
    let rehydrator = RehydratorConfig::matching(&walker);
    let session = Session::new(&walker, &rehydrator);
    let value = sample();

    let encoded = session.encode(&value).unwrap();
    let decoded = session.decode(&encoded.bytes, encoded.root).unwrap();

    assert_eq!(encoded.root, ObjectId::new(0));
    assert!(decoded.graph_eq(&value));
    insta::assert_snapshot!(decoded.repr(), @"{'a': [(0.25, 99999999999999999999L), None, [...]], 'b': (0.25, 99999999999999999999L)}");
}

#[test]
fn framed_stream_ends_with_the_root() {
    let config = WalkerConfig::default();
    let value = Value::list(vec![Value::int(4)]);
    let mut bytes = Vec::new();

    let root = encode_framed(&value, &mut bytes, &config).unwrap();

    assert_eq!(bytes[bytes.len() - 8..], root.get().to_le_bytes());
    let decoded = decode_reader(bytes.as_slice(), &RehydratorConfig::matching(&config)).unwrap();
    assert!(decoded.graph_eq(&value));
}

#[test]
fn truncated_framed_stream() {
    let config = WalkerConfig::default();
    let mut bytes = Vec::new();
    encode_framed(&sample(), &mut bytes, &config).unwrap();
    bytes.truncate(bytes.len() - 3);

    let err = decode_reader(bytes.as_slice(), &RehydratorConfig::default()).unwrap_err();

    assert!(err.to_string().starts_with("stream terminated unexpectedly"), "{err}");
}

#[test]
fn decode_from_file() {
    let config = WalkerConfig::default();
    let value = sample();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    encode_framed(&value, file.as_file_mut(), &config).unwrap();

    let decoded = decode_path(file.path(), &RehydratorConfig::matching(&config)).unwrap();
    assert!(decoded.graph_eq(&value));

    file.write_all(&[0]).unwrap();
    let err = decode_path(file.path(), &RehydratorConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Wire(ogx_wire::WireError::TrailingBytes { .. })), "{err}");
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();

    let err = decode_path(dir.path().join("absent.ogx"), &RehydratorConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn stream_without_sentinel_is_rejected() {
    let mut registry = GraphRegistry::new(Vec::new());
    registry
        .define_primitive(ObjectId::new(0), &Primitive::Int(1))
        .unwrap();
    let bytes = registry.into_inner();

    let err = decode(&bytes, ObjectId::new(0), &RehydratorConfig::default()).unwrap_err();

    insta::assert_snapshot!(err, @"stream ended without the end-of-stream marker");
}

#[test]
fn root_must_be_in_the_stream() {
    let encoded = encode(&Value::int(1), &WalkerConfig::default()).unwrap();

    let err = decode(&encoded.bytes, ObjectId::new(5), &RehydratorConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Rehydrate(RehydrateError::UnknownId(id)) if id == ObjectId::new(5)));
}

#[test]
fn walk_errors_surface() {
    let file = source("r.py", "def __inline_fora():\n    pass\n");
    let f = def_function(&file, 1, "__inline_fora", &Namespace::new());

    let err = encode(&f, &WalkerConfig::default()).unwrap_err();

    assert!(matches!(err, Error::Walk(WalkError::ReservedName { .. })));
}

#[test]
fn class_instance_round_trip() {
    let file = source("p.py", "class Point:\n    def __init__(self, x):\n        self.x = x\n\n    def norm(self):\n        return abs(self.x)\n");
    let globals = Namespace::new();
    let class = Value::class(ClassObject::new("Point", Some(ogx_core::CodeLocation::new(file, 1)), globals));
    let point = Value::instance(class, IndexMap::from([("x".to_string(), Value::int(-3))]));

    let decoded = crate::test_utils::roundtrip(&point);

    assert!(decoded.graph_eq(&point));
    let norm = decoded.get_attr("norm").expect("method from source");
    assert_eq!(norm.as_function().map(|f| f.name.as_str()), Some("norm"));
    insta::assert_snapshot!(decoded.repr(), @"Point(x=-3)");
}
