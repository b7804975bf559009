//! Class symbols and their binding to IR classes

use crate::declarations::IrClass;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;
use weft_descriptors::ClassifierIdx;

/// Shared, lockable handle to an IR class
pub type IrClassRef = Arc<RwLock<IrClass>>;

/// Reference to a class that may or may not have a body yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassSymbol(pub ClassifierIdx);

impl fmt::Display for ClassSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class{}", self.0)
    }
}

/// Symbol to owner bindings for one session
pub struct SymbolTable {
    owners: DashMap<ClassSymbol, IrClassRef, FxBuildHasher>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            owners: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn reference_class(&self, idx: ClassifierIdx) -> ClassSymbol {
        ClassSymbol(idx)
    }

    pub fn is_bound(&self, symbol: ClassSymbol) -> bool {
        self.owners.contains_key(&symbol)
    }

    pub fn owner(&self, symbol: ClassSymbol) -> Option<IrClassRef> {
        self.owners.get(&symbol).map(|r| r.value().clone())
    }

    /// Binds `symbol` to `class` unless it is already bound.
    ///
    /// Returns the owner after the call and whether `class` became it.
    pub fn bind(&self, symbol: ClassSymbol, class: IrClass) -> (IrClassRef, bool) {
        self.bind_ref(symbol, Arc::new(RwLock::new(class)))
    }

    /// Like [`bind`](Self::bind), for a class already behind a handle
    pub fn bind_ref(&self, symbol: ClassSymbol, class: IrClassRef) -> (IrClassRef, bool) {
        match self.owners.entry(symbol) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                entry.insert(class.clone());
                (class, true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
