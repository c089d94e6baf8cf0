use indexmap::IndexMap;
use ogx_core::{BuiltinKind, ClassObject, Dtype, ExceptionObject, Namespace, Object, PackedArray, Value};
use ogx_wire::Primitive;

use crate::config::NamedSingletons;
use crate::walker::{Shape, classify, to_primitive};

fn shape_of(value: &Value, singletons: &NamedSingletons) -> &'static str {
    classify(value, singletons).name()
}

#[test]
fn primitives() {
    assert_eq!(to_primitive(&Value::int(3)), Some(Primitive::Int(3)));
    assert_eq!(to_primitive(&Value::long("123456789012345678901234567890")), Some(Primitive::Long("123456789012345678901234567890".into())));
    assert_eq!(to_primitive(&Value::none()), Some(Primitive::None));
    assert_eq!(to_primitive(&Value::list(vec![])), None);
}

#[test]
fn homogeneous_primitive_list_is_inline() {
    let singletons = NamedSingletons::new();
    let list = Value::list(vec![Value::int(1), Value::str("a")]);

    let Shape::PrimitiveList(items) = classify(&list, &singletons) else {
        panic!("expected a primitive list");
    };
    assert_eq!(items, vec![Primitive::Int(1), Primitive::Str("a".into())]);

    let nested = Value::list(vec![Value::int(1), list]);
    assert_eq!(shape_of(&nested, &singletons), "list");
}

#[test]
fn singleton_beats_structure() {
    let mut singletons = NamedSingletons::new();
    let magic = Value::list(vec![Value::int(42)]);
    singletons.insert("MAGIC", magic.clone());

    assert_eq!(shape_of(&magic, &singletons), "named singleton");
    assert_eq!(shape_of(&Value::list(vec![Value::int(42)]), &singletons), "primitive list");
}

#[test]
fn packed_data_beats_singleton() {
    let mut singletons = NamedSingletons::new();
    let packed = Value::new(Object::Packed(PackedArray {
        dtype: Dtype::Str("<i4".into()),
        bytes: vec![0; 8],
    }));
    singletons.insert("ZEROS", packed.clone());

    assert_eq!(shape_of(&packed, &singletons), "packed");
}

#[test]
fn exception_of_builtin_type() {
    let singletons = NamedSingletons::builtins();
    let class = singletons.value_of("KeyError").expect("registered");
    let exception = Value::new(Object::Exception(ExceptionObject {
        class,
        args: Value::tuple(vec![]),
    }));

    let Shape::BuiltinException { type_name, .. } = classify(&exception, &singletons) else {
        panic!("expected a builtin exception");
    };
    assert_eq!(type_name, "KeyError");
}

#[test]
fn exception_of_user_type_is_an_instance() {
    let singletons = NamedSingletons::builtins();
    let class = Value::class(ClassObject::new("AppError", None, Namespace::new()));
    let exception = Value::new(Object::Exception(ExceptionObject {
        class,
        args: Value::str("oops"),
    }));

    let Shape::Instance { members, .. } = classify(&exception, &singletons) else {
        panic!("expected an instance");
    };
    assert_eq!(members.keys().collect::<Vec<_>>(), vec!["args"]);
}

#[test]
fn remaining_shapes() {
    let singletons = NamedSingletons::new();
    let class = Value::class(ClassObject::new("C", None, Namespace::new()));
    let cases = [
        (Value::tuple(vec![]), "tuple"),
        (Value::dict(vec![]), "dict"),
        (Value::float(0.5), "primitive"),
        (class.clone(), "class"),
        (Value::instance(class, IndexMap::new()), "instance"),
        (Value::unconvertible(None), "unconvertible"),
        (Value::builtin("len", BuiltinKind::Function), "other"),
        (Value::module("m", Namespace::new()), "other"),
    ];

    for (value, expected) in cases {
        assert_eq!(shape_of(&value, &singletons), expected, "{}", value.type_label());
    }
}
