//! Free-variable member access chains.
//!
//! A chain is the dotted path `a.b.c` rooted at a name that a function,
//! class or with-block reads without binding it. Chains key the bindings
//! table of every code record, so they need value equality and a total order.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("free variable chain cannot be empty")]
    Empty,
    #[error("free variable chain `{0}` has an empty component")]
    EmptyComponent(String),
}

/// Non-empty sequence of identifier components, e.g. `("np", "float64")`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct FreeVariableChain(Vec<String>);

impl FreeVariableChain {
    pub fn new<I, S>(components: I) -> Result<Self, ChainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        if components.is_empty() {
            return Err(ChainError::Empty);
        }
        if components.iter().any(|c| c.is_empty()) {
            return Err(ChainError::EmptyComponent(components.join(".")));
        }
        Ok(Self(components))
    }

    /// Chain made of a single root name.
    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn root(&self) -> &str {
        &self.0[0]
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// First `len` components, or `None` when `len` is zero or too long.
    pub fn prefix(&self, len: usize) -> Option<Self> {
        if len == 0 || len > self.0.len() {
            return None;
        }
        Some(Self(self.0[..len].to_vec()))
    }

    /// Extends the chain by one attribute access.
    pub fn child(&self, component: impl Into<String>) -> Self {
        let mut components = self.0.clone();
        components.push(component.into());
        Self(components)
    }

    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for FreeVariableChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(component)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FreeVariableChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chain({})", self)
    }
}

impl FromStr for FreeVariableChain {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ChainError::Empty);
        }
        Self::new(s.split('.'))
    }
}

impl From<FreeVariableChain> for String {
    fn from(chain: FreeVariableChain) -> Self {
        chain.dotted()
    }
}

/// Source position of a chain's root name.
///
/// `line` is 1-based, `column` is a 0-based byte offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChainWithPosition {
    pub chain: FreeVariableChain,
    pub position: Position,
}

impl ChainWithPosition {
    pub fn new(chain: FreeVariableChain, position: Position) -> Self {
        Self { chain, position }
    }
}

impl fmt::Display for ChainWithPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.chain, self.position)
    }
}
