//! Interned identifiers and the table that owns them.
//!
//! An [`Ident`] can only be obtained for text that the [`SymbolTable`]
//! already knows about. The table grows when types are registered and is
//! read-only afterwards, so untrusted input can never add entries to it.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::{REST_FIELD, TYPE_KEY};

/// An identifier known to a [`SymbolTable`].
///
/// Ordering, equality and hashing follow the identifier text, so maps keyed
/// by `Ident` can be queried with a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident(Arc<str>);

impl Ident {
    fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    /// Returns the canonical text of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Ident {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The set of identifiers that exist at runtime.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashSet<Ident>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table holding only the reserved identifiers.
    pub fn new() -> Self {
        let mut table = Self {
            symbols: HashSet::new(),
        };
        table.intern(TYPE_KEY);
        table.intern(REST_FIELD);
        table
    }

    /// Adds `text` to the table, returning the existing entry if present.
    ///
    /// Only type registration calls this; lookups from conversion input go
    /// through [`SymbolTable::lookup`].
    pub(crate) fn intern(&mut self, text: &str) -> Ident {
        if let Some(existing) = self.symbols.get(text) {
            return existing.clone();
        }
        let ident = Ident::new(text);
        self.symbols.insert(ident.clone());
        ident
    }

    /// Returns the identifier for `text` if it already exists.
    ///
    /// Never inserts.
    pub fn lookup(&self, text: &str) -> Option<Ident> {
        self.symbols.get(text).cloned()
    }

    /// Returns true if `text` is a known identifier.
    pub fn contains(&self, text: &str) -> bool {
        self.symbols.contains(text)
    }

    /// Number of known identifiers.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the table holds no identifiers.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
