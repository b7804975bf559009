//! weft-ir - Canonical intermediate representation
//!
//! The IR core builds a structurally shared representation of the
//! declarations a frontend produced:
//! - Classifier IDs resolved from container chains
//! - Interned simple types, with outer types for inner classes
//! - IR classes with properties, backing fields and constructors
//!
//! # Architecture
//!
//! ```text
//! SemanticModel (weft-descriptors)
//!         ↓
//!   [TypeFactory] ── ClassifierIdResolver
//!         │        └─ Interner
//!         ↓
//!   [Lowering]
//!         ↓
//!   IrModuleFragment
//!   └── IrClass
//!       ├── Properties (field + getter)
//!       ├── Constructors
//!       └── Nested slots
//!         ↓
//!   [Synthetic implementation classes] (weft-lowering)
//! ```
//!
//! All caches are owned by an [`IrSession`].

pub mod classifier_id;
pub mod declarations;
pub mod factory;
pub mod interner;
pub mod lower;
pub mod session;
pub mod symbols;
pub mod types;

pub use classifier_id::ClassifierIdResolver;
pub use declarations::{
    IrAccessor, IrAnnotation, IrClass, IrConstructor, IrConstructorBuilder, IrField,
    IrModuleFragment, IrOrigin, IrProperty, IrStatement, IrValueParameter, Modality, NestedSlot,
};
pub use factory::TypeFactory;
pub use interner::Interner;
pub use lower::{lower_class, lower_declarations};
pub use session::{GenerationCache, IrSession, SessionConfig};
pub use symbols::{ClassSymbol, IrClassRef, SymbolTable};
pub use types::{
    CanonicalFlexibleType, CanonicalSimpleType, CanonicalType, ClassifierId, ClassifierIdKind,
    ClassifierPath, SimpleTypeData, TypeProjection,
};
pub use weft_descriptors::{Variance, Visibility};
