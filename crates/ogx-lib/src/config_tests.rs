use ogx_core::{BuiltinKind, Value};

use crate::config::{AbortSingletons, NamedSingletons, RehydratorConfig, WalkerConfig};

#[test]
fn builtins_are_keyed_by_identity() {
    let singletons = NamedSingletons::builtins();
    let len = singletons.value_of("len").expect("len is a builtin");

    assert_eq!(singletons.name_of(&len), Some("len"));
    // Same name, different object.
    let impostor = Value::builtin("len", BuiltinKind::Function);
    assert_eq!(singletons.name_of(&impostor), None);
}

#[test]
fn builtin_table_contents() {
    let singletons = NamedSingletons::builtins();
    let names: Vec<&str> = singletons.iter().map(|(name, _)| name).collect();

    insta::assert_snapshot!(names.join(" "), @"int float str bool list dict tuple object len range isinstance Exception ValueError TypeError KeyError IndexError AttributeError NameError ZeroDivisionError StopIteration RuntimeError AssertionError");
    assert_eq!(singletons.len(), 22);
}

#[test]
fn insert_replaces_both_directions() {
    let mut singletons = NamedSingletons::new();
    let first = Value::str("first");
    let second = Value::str("second");
    singletons.insert("x", first.clone());
    singletons.insert("x", second.clone());

    assert_eq!(singletons.name_of(&first), None);
    assert_eq!(singletons.name_of(&second), Some("x"));
    assert!(singletons.value_of("x").expect("registered").ptr_eq(&second));
}

#[test]
fn walker_defaults() {
    let config = WalkerConfig::default();

    assert_eq!(config.exclude_list, vec!["staticmethod".to_string()]);
    assert_eq!(config.reserved_name, "__inline_fora");
    assert!(config.degrade_to_unconvertible);
    assert!(config.is_excluded("staticmethod"));
    assert!(!config.is_excluded("classmethod"));
    assert!((config.terminal_value_filter)(&Value::none()));
}

#[test]
fn builtins_namespace_shares_singleton_values() {
    let config = WalkerConfig::default();
    let from_namespace = config.builtins.get("range").expect("range in builtins");
    let from_table = config.singletons.value_of("range").expect("range registered");

    assert!(from_namespace.ptr_eq(&from_table));
}

#[test]
fn rehydrator_config_matches_walker() {
    let walker = WalkerConfig::default();
    let rehydrator = RehydratorConfig::matching(&walker);
    let a = walker.singletons.value_of("ValueError").expect("registered");
    let b = rehydrator.singletons.value_of("ValueError").expect("registered");

    assert!(a.ptr_eq(&b));
    assert!(rehydrator.retain_packed_for_invertible);
    assert!(rehydrator.allow_module_level_lookups);
}

#[test]
fn abort_singletons_defaults() {
    let aborts = AbortSingletons::defaults();

    assert!(aborts.get("InvalidPyforaOperation").is_some());
    assert!(aborts.get("ForaToPythonConversionError").is_some());
    assert!(aborts.get("ValueError").is_none());
}
