//! Session-wide interning of simple types
//!
//! Uses `DashMap` so that type construction can run on several worker
//! threads. The `entry` call locks the key's shard, which makes
//! get-existing-or-insert-new a single atomic step.

use crate::types::{CanonicalSimpleType, SimpleTypeData};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

pub struct Interner {
    types: DashMap<SimpleTypeData, CanonicalSimpleType, FxBuildHasher>,
    hits: AtomicUsize,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self {
            types: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicUsize::new(0),
        }
    }

    /// Returns the canonical instance structurally equal to `candidate`,
    /// storing `candidate` first if there is none yet.
    pub fn intern(&self, candidate: SimpleTypeData) -> CanonicalSimpleType {
        match self.types.entry(candidate) {
            Entry::Occupied(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(classifier = %entry.key().classifier_id, "interner hit");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let canonical = CanonicalSimpleType::from_interned(Arc::new(entry.key().clone()));
                trace!(ty = %canonical, "interner miss");
                entry.insert(canonical.clone());
                canonical
            }
        }
    }

    /// Number of distinct simple types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Number of `intern` calls answered from the cache
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier_id::ClassifierIdResolver;
    use weft_descriptors::{ModelBuilder, Visibility};

    fn string_data(nullable: bool) -> SimpleTypeData {
        let mut builder = ModelBuilder::new();
        let string = builder.class("kotlin", "String");
        let model = builder.build();
        let ids = ClassifierIdResolver::new();
        SimpleTypeData {
            classifier_id: ids.resolve(&model, string).unwrap(),
            outer_type: None,
            visibility: Visibility::Public,
            arguments: Vec::new(),
            is_marked_nullable: nullable,
        }
    }

    #[test]
    fn test_interner_deduplication() {
        let interner = Interner::new();

        let a = interner.intern(string_data(false));
        let b = interner.intern(string_data(false));
        let c = interner.intern(string_data(true));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
        assert_eq!(interner.hits(), 1);
    }

    #[test]
    fn test_visibility_participates_in_identity() {
        let interner = Interner::new();
        let public = interner.intern(string_data(false));
        let mut data = string_data(false);
        data.visibility = Visibility::Unknown;
        let unknown = interner.intern(data);
        assert_ne!(public, unknown);
    }
}
