//! Explicit policy objects for the walker and the rehydrator.
//!
//! Nothing here is global: each walk or decode session receives its own
//! tables, so two sessions with different singletons never interfere.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use ogx_core::{BuiltinKind, Identity, Namespace, Value};

const BUILTIN_TYPES: &[&str] = &["int", "float", "str", "bool", "list", "dict", "tuple", "object"];

const BUILTIN_FUNCTIONS: &[&str] = &["len", "range", "isinstance"];

const BUILTIN_EXCEPTIONS: &[&str] = &[
    "Exception",
    "ValueError",
    "TypeError",
    "KeyError",
    "IndexError",
    "AttributeError",
    "NameError",
    "ZeroDivisionError",
    "StopIteration",
    "RuntimeError",
    "AssertionError",
];

const ABORT_EXCEPTIONS: &[&str] = &["InvalidPyforaOperation", "ForaToPythonConversionError"];

/// Bidirectional name <-> value table for values that travel by name.
///
/// Lookups from value to name go by identity, never by equality.
#[derive(Clone, Default)]
pub struct NamedSingletons {
    by_name: IndexMap<String, Value>,
    by_identity: HashMap<Identity, String>,
}

impl NamedSingletons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builtin types, functions and exception types.
    pub fn builtins() -> Self {
        let mut table = Self::new();
        let kinds = [
            (BUILTIN_TYPES, BuiltinKind::Type),
            (BUILTIN_FUNCTIONS, BuiltinKind::Function),
            (BUILTIN_EXCEPTIONS, BuiltinKind::ExceptionType),
        ];
        for (names, kind) in kinds {
            for name in names {
                table.insert(*name, Value::builtin(*name, kind));
            }
        }
        table
    }

    /// Registers `value` under `name`, replacing any previous entry for either.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(old) = self.by_name.get(&name) {
            self.by_identity.remove(&old.identity());
        }
        self.by_identity.insert(value.identity(), name.clone());
        self.by_name.insert(name, value);
    }

    pub fn name_of(&self, value: &Value) -> Option<&str> {
        self.by_identity.get(&value.identity()).map(String::as_str)
    }

    pub fn value_of(&self, name: &str) -> Option<Value> {
        self.by_name.get(name).cloned()
    }

    /// A fresh namespace holding every singleton under its name.
    pub fn namespace(&self) -> Namespace {
        Namespace::from_values(self.by_name.iter().map(|(name, v)| (name.clone(), v.clone())))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.by_name.iter().map(|(name, v)| (name.as_str(), v))
    }
}

impl fmt::Debug for NamedSingletons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_name.keys()).finish()
    }
}

/// Exception types raised on the remote side when it aborts a computation.
#[derive(Clone, Debug)]
pub struct AbortSingletons(NamedSingletons);

impl AbortSingletons {
    pub fn new(table: NamedSingletons) -> Self {
        Self(table)
    }

    pub fn defaults() -> Self {
        let mut table = NamedSingletons::new();
        for name in ABORT_EXCEPTIONS {
            table.insert(*name, Value::builtin(*name, BuiltinKind::ExceptionType));
        }
        Self(table)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.value_of(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name, value);
    }
}

impl Default for AbortSingletons {
    fn default() -> Self {
        Self::defaults()
    }
}

pub type TerminalValueFilter = Rc<dyn Fn(&Value) -> bool>;

/// Encode-side policy.
#[derive(Clone)]
pub struct WalkerConfig {
    pub singletons: NamedSingletons,
    /// Where free names that aren't bound in the code's own scopes are looked up last.
    pub builtins: Namespace,
    /// Chain roots the resolver never tries to bind.
    pub exclude_list: Vec<String>,
    /// Module descent stops at values this rejects.
    pub terminal_value_filter: TerminalValueFilter,
    /// Definitions with this name are refused outright.
    pub reserved_name: String,
    pub degrade_to_unconvertible: bool,
}

impl WalkerConfig {
    pub fn new(singletons: NamedSingletons) -> Self {
        let builtins = singletons.namespace();
        Self {
            singletons,
            builtins,
            exclude_list: vec!["staticmethod".to_string()],
            terminal_value_filter: Rc::new(|_| true),
            reserved_name: "__inline_fora".to_string(),
            degrade_to_unconvertible: true,
        }
    }

    pub fn with_terminal_value_filter(mut self, filter: impl Fn(&Value) -> bool + 'static) -> Self {
        self.terminal_value_filter = Rc::new(filter);
        self
    }

    pub fn with_degrade_to_unconvertible(mut self, degrade: bool) -> Self {
        self.degrade_to_unconvertible = degrade;
        self
    }

    pub fn is_excluded(&self, root: &str) -> bool {
        self.exclude_list.iter().any(|name| name == root)
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self::new(NamedSingletons::builtins())
    }
}

impl fmt::Debug for WalkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkerConfig")
            .field("singletons", &self.singletons)
            .field("builtins", &self.builtins)
            .field("exclude_list", &self.exclude_list)
            .field("reserved_name", &self.reserved_name)
            .field("degrade_to_unconvertible", &self.degrade_to_unconvertible)
            .finish_non_exhaustive()
    }
}

/// Decode-side policy.
#[derive(Clone, Debug)]
pub struct RehydratorConfig {
    pub singletons: NamedSingletons,
    pub abort_singletons: AbortSingletons,
    /// Keep packed arrays packed when they are members of an invertible instance.
    pub retain_packed_for_invertible: bool,
    /// Reuse live module-level definitions instead of compiling source again.
    pub allow_module_level_lookups: bool,
}

impl RehydratorConfig {
    pub fn new(singletons: NamedSingletons) -> Self {
        Self {
            singletons,
            abort_singletons: AbortSingletons::defaults(),
            retain_packed_for_invertible: true,
            allow_module_level_lookups: true,
        }
    }

    /// Rehydrator config sharing the walker's singleton values, so a round
    /// trip gives back the very same builtin objects.
    pub fn matching(walker: &WalkerConfig) -> Self {
        Self::new(walker.singletons.clone())
    }
}

impl Default for RehydratorConfig {
    fn default() -> Self {
        Self::new(NamedSingletons::builtins())
    }
}
