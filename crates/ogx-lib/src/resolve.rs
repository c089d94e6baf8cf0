//! Free-variable resolution against a definition's lexical environment.
//!
//! A chain resolves in two steps. First its root (or the longest dotted
//! prefix stored as one key) is looked up in the scopes the definition can
//! see. Then the remaining components are followed for as long as the value
//! is a module: `np.linalg.norm` binds `np.linalg.norm` if `np.linalg` is a
//! module, `df.shape` binds just `df`. Roots found nowhere are unresolved and
//! fail only when the decoded code reads them.

use std::collections::BTreeMap;

use ogx_core::{
    ChainWithPosition, ClassObject, FreeVariableChain, FunctionObject, Namespace, Position, Value,
    WithBlockObject,
};

use crate::config::WalkerConfig;
use crate::error::WalkError;

#[derive(Debug, Clone)]
pub struct ResolvedChain {
    pub value: Value,
    pub position: Position,
}

/// Outcome of resolving one definition's chains.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Binding key (the chain up to the first non-module value) to value.
    pub resolved: BTreeMap<FreeVariableChain, ResolvedChain>,
    /// Unbound roots, each with the position it was first read at.
    pub unresolved: BTreeMap<String, Position>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.unresolved.is_empty()
    }
}

/// The environment a definition's free names are read from.
#[derive(Clone, Copy)]
pub enum Environment<'a> {
    Function(&'a FunctionObject),
    /// A class plus the chains its base list was written with, by position.
    Class(&'a ClassObject, &'a [Option<FreeVariableChain>]),
    WithBlock(&'a WithBlockObject),
}

pub struct ScopeResolver<'a> {
    config: &'a WalkerConfig,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(config: &'a WalkerConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, env: Environment<'_>, chains: &[ChainWithPosition]) -> Result<Resolution, WalkError> {
        let mut resolution = Resolution::default();
        for ChainWithPosition { chain, position } in chains {
            if self.config.is_excluded(chain.root()) {
                tracing::trace!(%chain, "excluded");
                continue;
            }
            let Some((value, consumed)) = self.lookup(env, chain) else {
                resolution
                    .unresolved
                    .entry(chain.root().to_string())
                    .or_insert(*position);
                continue;
            };
            let (key, value) = self.descend(chain, value, consumed)?;
            tracing::trace!(%chain, %key, "resolved");
            resolution.resolved.entry(key).or_insert(ResolvedChain {
                value,
                position: *position,
            });
        }
        Ok(resolution)
    }

    fn lookup(&self, env: Environment<'_>, chain: &FreeVariableChain) -> Option<(Value, usize)> {
        let found = match env {
            Environment::Function(f) => lookup_in_function(f, chain),
            Environment::Class(class, base_chains) => class
                .methods()
                .iter()
                .find_map(|m| m.as_function().and_then(|f| lookup_in_function(f, chain)))
                .or_else(|| lookup_in_bases(class, base_chains, chain))
                .or_else(|| lookup_in_namespace(&class.globals, chain)),
            Environment::WithBlock(block) => block
                .bound_variables
                .get(chain.root())
                .map(|v| (v.clone(), 1)),
        };
        found.or_else(|| lookup_in_namespace(&self.config.builtins, chain))
    }

    /// Follows module members until the value is no longer a module.
    fn descend(
        &self,
        chain: &FreeVariableChain,
        mut value: Value,
        mut consumed: usize,
    ) -> Result<(FreeVariableChain, Value), WalkError> {
        loop {
            let Some(module) = value.as_module() else {
                break;
            };
            if !(self.config.terminal_value_filter)(&value) {
                break;
            }
            let Some(member) = chain.components().get(consumed) else {
                let module_name = module.name.clone();
                if !self.config.degrade_to_unconvertible {
                    return Err(WalkError::ModuleEndsChain { module: module_name });
                }
                tracing::debug!(%chain, module = %module_name, "chain ends at a module");
                let path = module_name.split('.').map(str::to_string).collect();
                value = Value::unconvertible(Some(path));
                break;
            };
            let next = module
                .members
                .get(member)
                .ok_or_else(|| WalkError::ModuleMissingMember {
                    module: module.name.clone(),
                    member: member.clone(),
                })?;
            value = next;
            consumed += 1;
        }
        let key = chain.prefix(consumed).unwrap_or_else(|| chain.clone());
        Ok((key, value))
    }
}

fn lookup_in_function(f: &FunctionObject, chain: &FreeVariableChain) -> Option<(Value, usize)> {
    if let Some(v) = f.closure.get(chain.root()) {
        return Some((v.clone(), 1));
    }
    lookup_in_namespace(&f.globals, chain)
}

/// Deferred slots count as unbound.
fn lookup_in_namespace(ns: &Namespace, chain: &FreeVariableChain) -> Option<(Value, usize)> {
    let (slot, consumed) = ns.lookup_chain(chain)?;
    slot.value().map(|v| (v.clone(), consumed))
}

fn lookup_in_bases(
    class: &ClassObject,
    base_chains: &[Option<FreeVariableChain>],
    chain: &FreeVariableChain,
) -> Option<(Value, usize)> {
    base_chains
        .iter()
        .zip(&class.bases)
        .find_map(|(base_chain, base)| {
            let base_chain = base_chain.as_ref()?;
            chain
                .components()
                .starts_with(base_chain.components())
                .then(|| (base.clone(), base_chain.len()))
        })
}
