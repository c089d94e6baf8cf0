//! Shared, mutable name tables (module globals, rehydrated scopes).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::chain::{FreeVariableChain, Position};
use crate::value::Value;

/// Deferred failure raised when code reads a name that was never resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("name not defined: {name}")]
pub struct NameNotDefined {
    pub name: String,
    pub position: Option<Position>,
}

/// A free variable that could not be resolved when the code was shipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedName {
    pub name: String,
    pub position: Position,
}

impl UnresolvedName {
    pub fn to_error(&self) -> NameNotDefined {
        NameNotDefined {
            name: self.name.clone(),
            position: Some(self.position),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Slot {
    Bound(Value),
    Deferred(UnresolvedName),
}

impl Slot {
    /// The bound value; deferred slots count as unbound.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Bound(v) => Some(v),
            Slot::Deferred(_) => None,
        }
    }

    pub fn get(&self) -> Result<Value, NameNotDefined> {
        match self {
            Slot::Bound(v) => Ok(v.clone()),
            Slot::Deferred(name) => Err(name.to_error()),
        }
    }
}

/// Insertion-ordered name table with shared ownership.
///
/// Cloning a `Namespace` clones the handle, not the table: functions defined
/// in one module all see the same globals.
#[derive(Clone, Default)]
pub struct Namespace(Rc<RefCell<IndexMap<String, Slot>>>);

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let ns = Self::new();
        for (name, value) in entries {
            ns.insert(name, value);
        }
        ns
    }

    pub fn insert(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().insert(name.into(), Slot::Bound(value));
    }

    pub fn insert_deferred(&self, name: impl Into<String>, unresolved: UnresolvedName) {
        self.0
            .borrow_mut()
            .insert(name.into(), Slot::Deferred(unresolved));
    }

    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.0.borrow().get(name).cloned()
    }

    /// Bound value for `name`; deferred and missing names are both `None`.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).and_then(|s| s.value().cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Slot> {
        self.0.borrow_mut().shift_remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, Slot)> {
        self.0
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Looks up the longest dotted prefix of `chain` stored as a single key.
    ///
    /// Rehydrated code stores bindings under their dotted chain (`np.float64`),
    /// so `np.float64.max` resolves through the `np.float64` entry with one
    /// component left over. Returns the slot and the number of components consumed.
    pub fn lookup_chain(&self, chain: &FreeVariableChain) -> Option<(Slot, usize)> {
        let table = self.0.borrow();
        (1..=chain.len()).rev().find_map(|len| {
            let key = chain.components()[..len].join(".");
            table.get(&key).map(|slot| (slot.clone(), len))
        })
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.borrow().keys()).finish()
    }
}
