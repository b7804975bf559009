//! Compilation session - the owner of every session-scoped cache
//!
//! Nothing in the IR core is global: interned types, classifier IDs,
//! symbol bindings and the implementation-class caches all live in an
//! [`IrSession`] that callers create and pass around.

use crate::classifier_id::ClassifierIdResolver;
use crate::factory::TypeFactory;
use crate::interner::Interner;
use crate::symbols::{ClassSymbol, IrClassRef, SymbolTable};
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;
use serde::Deserialize;
use std::sync::Arc;
use weft_descriptors::SemanticModel;
use weft_error::IrResult;

/// Session options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the nested implementation slot of annotation classes
    pub impl_class_name: String,
    /// Prefix of synthesized backing fields
    pub backing_field_prefix: String,
    /// Substitute type-alias spellings when converting types
    pub use_abbreviations: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            impl_class_name: "Impl".to_string(),
            backing_field_prefix: "_".to_string(),
            use_abbreviations: true,
        }
    }
}

/// Slot for the implementation class of one declaration. Empty until a
/// request succeeds.
type ImplCell = Arc<Mutex<Option<IrClassRef>>>;

/// Implementation classes already requested, and classes already generated
pub struct GenerationCache {
    impl_classes: DashMap<ClassSymbol, ImplCell, FxBuildHasher>,
    generated: DashSet<ClassSymbol, FxBuildHasher>,
}

impl Default for GenerationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationCache {
    pub fn new() -> Self {
        Self {
            impl_classes: DashMap::with_hasher(FxBuildHasher),
            generated: DashSet::with_hasher(FxBuildHasher),
        }
    }

    pub fn impl_class(&self, declaration: ClassSymbol) -> Option<IrClassRef> {
        let cell = self.impl_classes.get(&declaration)?.value().clone();
        let class = cell.lock().clone();
        class
    }

    /// Returns the cached implementation of `declaration`, running `create`
    /// until it succeeds once. Errors are returned and leave the cell empty.
    ///
    /// Only the cell of `declaration` is locked while `create` runs: callers
    /// asking for the same declaration wait for the first one, others do not.
    /// `create` must not request `declaration` again.
    pub fn get_or_try_insert_impl(
        &self,
        declaration: ClassSymbol,
        create: impl FnOnce() -> IrResult<IrClassRef>,
    ) -> IrResult<IrClassRef> {
        let cell = self.impl_classes.entry(declaration).or_default().value().clone();
        let mut slot = cell.lock();
        if let Some(class) = slot.as_ref() {
            return Ok(class.clone());
        }
        let class = create()?;
        *slot = Some(class.clone());
        Ok(class)
    }

    /// Returns `true` if `class` was not marked before
    pub fn mark_generated(&self, class: ClassSymbol) -> bool {
        self.generated.insert(class)
    }

    pub fn is_generated(&self, class: ClassSymbol) -> bool {
        self.generated.contains(&class)
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }
}

#[derive(Default)]
pub struct IrSession {
    config: SessionConfig,
    classifier_ids: ClassifierIdResolver,
    interner: Interner,
    symbols: SymbolTable,
    generation: GenerationCache,
}

impl IrSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn classifier_ids(&self) -> &ClassifierIdResolver {
        &self.classifier_ids
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn generation(&self) -> &GenerationCache {
        &self.generation
    }

    /// Type factory over `model`, sharing this session's caches
    pub fn type_factory<'a>(&'a self, model: &'a SemanticModel) -> TypeFactory<'a> {
        TypeFactory::new(self, model)
    }
}
