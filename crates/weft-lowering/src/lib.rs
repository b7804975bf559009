//! weft-lowering - Lowering of annotation classes to implementation classes
//!
//! Annotation classes cannot be instantiated by the target runtime, so each
//! one gets a parallel implementation class: one private backing field and
//! one public getter per annotation property, plus a constructor taking the
//! property values in declaration order.
//!
//! # Example
//!
//! ```rust
//! use weft_descriptors::{ClassDeclaration, ModelBuilder, PropertyDeclaration, SimpleType};
//! use weft_ir::{lower_declarations, IrSession};
//! use weft_lowering::SyntheticImplGenerator;
//!
//! let mut builder = ModelBuilder::new();
//! let string = builder.class("kotlin", "String");
//! let tag = builder.annotation_class("demo", "Tag");
//! builder.nested_class(tag, "Impl", &[]);
//! builder.declare(
//!     ClassDeclaration::new(tag)
//!         .with_property(PropertyDeclaration::new("name", SimpleType::of(string))),
//! );
//! let model = builder.build();
//!
//! let session = IrSession::new();
//! let fragment = lower_declarations(&session, &model).unwrap();
//! let generator = SyntheticImplGenerator::new(&session);
//! let impl_class = generator.get_impl_class(&fragment.classes[0]).unwrap();
//! assert_eq!(impl_class.read().properties.len(), 1);
//! ```

pub mod impl_generator;

pub use impl_generator::SyntheticImplGenerator;
