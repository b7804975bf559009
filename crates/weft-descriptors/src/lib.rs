//! weft-descriptors - The semantic model handed over by a frontend
//!
//! The IR core treats this model as read-only input:
//! - Classifier descriptors (classes, interfaces, type aliases, type parameters)
//! - Semantic types, including flexible and abbreviated types
//! - Class bodies (properties and constructors) that are available
//!
//! # Example
//!
//! ```rust
//! use weft_descriptors::{ModelBuilder, SimpleType, TypeArgument};
//!
//! let mut builder = ModelBuilder::new();
//! let string = builder.class("kotlin", "String");
//! let list = builder.generic_class("kotlin.collections", "List", &["E"]);
//! let model = builder.build();
//!
//! let ty = SimpleType::of(list).with_arguments(vec![
//!     TypeArgument::invariant(SimpleType::of(string)),
//! ]);
//! assert_eq!(model.classifier(ty.classifier).unwrap().name, "List");
//! ```

pub mod builder;
pub mod model;
pub mod types;

pub use builder::ModelBuilder;
pub use model::{
    ClassDeclaration, ClassifierDescriptor, ClassifierIdx, ClassifierKind, ConstructorDeclaration,
    Container, DescriptorOrigin, FieldAssignment, ParameterDeclaration, PropertyDeclaration,
    SemanticModel, Visibility,
};
pub use types::{SemanticType, SimpleType, TypeArgument, Variance};
