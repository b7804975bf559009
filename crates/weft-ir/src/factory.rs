//! Semantic type → canonical type conversion
//!
//! Every simple type produced here goes through the session's interner.
//! Inner classes get their outer types rebuilt from the flattened argument
//! list: the trailing arguments belong to the class itself, the prefix is
//! handed to the containing class, recursively.

use crate::session::IrSession;
use crate::types::{
    CanonicalFlexibleType, CanonicalSimpleType, CanonicalType, ClassifierId, SimpleTypeData,
    TypeProjection,
};
use tracing::debug;
use weft_descriptors::{ClassifierIdx, SemanticModel, SemanticType, SimpleType, Visibility};
use weft_error::{IrError, IrResult};

pub struct TypeFactory<'a> {
    session: &'a IrSession,
    model: &'a SemanticModel,
}

impl<'a> TypeFactory<'a> {
    pub fn new(session: &'a IrSession, model: &'a SemanticModel) -> Self {
        Self { session, model }
    }

    pub fn create(&self, source: &SemanticType) -> IrResult<CanonicalType> {
        let use_abbreviation = self.session.config().use_abbreviations;
        match source {
            SemanticType::Simple(simple) => {
                Ok(CanonicalType::Simple(self.create_simple(simple, use_abbreviation)?))
            }
            SemanticType::Flexible { lower, upper } => {
                Ok(CanonicalType::Flexible(CanonicalFlexibleType {
                    lower: self.create_simple(lower, use_abbreviation)?,
                    upper: self.create_simple(upper, use_abbreviation)?,
                }))
            }
        }
    }

    pub fn create_simple(
        &self,
        source: &SimpleType,
        use_abbreviation: bool,
    ) -> IrResult<CanonicalSimpleType> {
        let source = match &source.abbreviation {
            Some(abbreviation) if use_abbreviation => abbreviation.as_ref(),
            _ => source,
        };
        let classifier = self.model.classifier(source.classifier)?;

        if classifier.supports_type_parameters() {
            let arguments = source
                .arguments
                .iter()
                .map(|argument| {
                    Ok(TypeProjection {
                        variance: argument.variance,
                        is_star: argument.star,
                        ty: self.create(&argument.ty)?,
                    })
                })
                .collect::<IrResult<Vec<_>>>()?;

            self.create_with_all_outer_types(source.classifier, arguments, source.nullable)
        } else {
            let classifier_id = self.classifier_id(source.classifier)?;
            Ok(self.create_from_parts(
                classifier_id,
                None,
                Visibility::Unknown,
                Vec::new(),
                source.nullable,
            ))
        }
    }

    pub fn create_from_parts(
        &self,
        classifier_id: ClassifierId,
        outer_type: Option<CanonicalSimpleType>,
        visibility: Visibility,
        arguments: Vec<TypeProjection>,
        is_marked_nullable: bool,
    ) -> CanonicalSimpleType {
        self.session.interner().intern(SimpleTypeData {
            classifier_id,
            outer_type,
            visibility,
            arguments,
            is_marked_nullable,
        })
    }

    fn create_with_all_outer_types(
        &self,
        idx: ClassifierIdx,
        mut arguments: Vec<TypeProjection>,
        is_marked_nullable: bool,
    ) -> IrResult<CanonicalSimpleType> {
        let classifier = self.model.classifier(idx)?;

        let outer_type = if classifier.is_inner {
            let declared = classifier.type_parameters.len();
            if arguments.len() < declared {
                return Err(self.malformed(
                    idx,
                    format!(
                        "{} type arguments for {} declared type parameters",
                        arguments.len(),
                        declared
                    ),
                ));
            }
            let own = arguments.split_off(arguments.len() - declared);
            let container = classifier
                .containing_classifier()
                .filter(|&c| {
                    self.model
                        .classifier(c)
                        .map(|c| c.supports_type_parameters())
                        .unwrap_or(false)
                })
                .ok_or_else(|| {
                    self.malformed(idx, "inner class is not declared inside a class".to_string())
                })?;
            // Outer types are never nullable
            let outer = self.create_with_all_outer_types(container, arguments, false)?;
            arguments = own;
            Some(outer)
        } else {
            None
        };

        let classifier_id = self.classifier_id(idx)?;
        debug!(
            classifier = %classifier_id,
            arguments = arguments.len(),
            has_outer = outer_type.is_some(),
            "creating simple type"
        );
        Ok(self.create_from_parts(
            classifier_id,
            outer_type,
            classifier.visibility,
            arguments,
            is_marked_nullable,
        ))
    }

    fn classifier_id(&self, idx: ClassifierIdx) -> IrResult<ClassifierId> {
        self.session.classifier_ids().resolve(self.model, idx)
    }

    fn malformed(&self, idx: ClassifierIdx, reason: String) -> IrError {
        let classifier = self
            .classifier_id(idx)
            .map(|id| id.to_string())
            .unwrap_or_else(|_| idx.to_string());
        IrError::MalformedType { classifier, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_descriptors::{ClassifierIdx, ModelBuilder, TypeArgument, Variance};

    struct Fixture {
        model: SemanticModel,
        string: ClassifierIdx,
        int: ClassifierIdx,
        list: ClassifierIdx,
        outer: ClassifierIdx,
        inner: ClassifierIdx,
    }

    fn fixture() -> Fixture {
        let mut builder = ModelBuilder::new();
        let string = builder.class("kotlin", "String");
        let int = builder.class("kotlin", "Int");
        let list = builder.generic_class("kotlin.collections", "List", &["E"]);
        let outer = builder.generic_class("demo", "Outer", &["T"]);
        let inner = builder.inner_class(outer, "Inner", &["U"]);
        Fixture {
            model: builder.build(),
            string,
            int,
            list,
            outer,
            inner,
        }
    }

    fn arg(idx: ClassifierIdx) -> TypeArgument {
        TypeArgument::invariant(SimpleType::of(idx))
    }

    #[test]
    fn test_top_level_type_has_no_outer() {
        let f = fixture();
        let session = IrSession::new();
        let factory = session.type_factory(&f.model);

        let ty = factory.create_simple(&SimpleType::of(f.string), true).unwrap();
        assert!(ty.outer_type().is_none());
        assert!(ty.arguments().is_empty());
        assert_eq!(ty.visibility(), Visibility::Public);
        assert_eq!(ty.to_string(), "kotlin/String");
    }

    #[test]
    fn test_same_structure_is_same_instance() {
        let f = fixture();
        let session = IrSession::new();
        let factory = session.type_factory(&f.model);

        let list_of_string = SimpleType::of(f.list).with_arguments(vec![arg(f.string)]);
        let a = factory.create_simple(&list_of_string, true).unwrap();
        let b = factory.create_simple(&list_of_string, true).unwrap();
        let c = factory
            .create_simple(&SimpleType::of(f.list).with_arguments(vec![arg(f.int)]), true)
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "kotlin/collections/List<kotlin/String>");
    }

    #[test]
    fn test_inner_class_outer_chain() {
        let f = fixture();
        let session = IrSession::new();
        let factory = session.type_factory(&f.model);

        let source = SimpleType::of(f.inner)
            .with_arguments(vec![arg(f.string), arg(f.int)])
            .nullable();
        let ty = factory.create_simple(&source, true).unwrap();

        assert!(ty.is_marked_nullable());
        assert_eq!(ty.arguments().len(), 1);
        assert_eq!(ty.arguments()[0].ty.to_string(), "kotlin/Int");

        let outer = ty.outer_type().unwrap();
        assert!(!outer.is_marked_nullable());
        assert_eq!(outer.to_string(), "demo/Outer<kotlin/String>");
        assert_eq!(ty.to_string(), "demo/Outer<kotlin/String>.Inner<kotlin/Int>?");

        // The outer type is shared with a direct use of Outer<String>
        let direct = factory
            .create_simple(&SimpleType::of(f.outer).with_arguments(vec![arg(f.string)]), true)
            .unwrap();
        assert_eq!(*outer, direct);
    }

    #[test]
    fn test_inner_without_own_parameters() {
        let mut builder = ModelBuilder::new();
        let string = builder.class("kotlin", "String");
        let outer = builder.generic_class("demo", "Outer", &["T"]);
        let inner = builder.inner_class(outer, "Cursor", &[]);
        let model = builder.build();
        let session = IrSession::new();

        let ty = session
            .type_factory(&model)
            .create_simple(&SimpleType::of(inner).with_arguments(vec![arg(string)]), true)
            .unwrap();
        assert!(ty.arguments().is_empty());
        assert_eq!(ty.outer_type().unwrap().arguments().len(), 1);
    }

    #[test]
    fn test_doubly_inner_chain() {
        let mut builder = ModelBuilder::new();
        let int = builder.class("kotlin", "Int");
        let a = builder.generic_class("demo", "A", &["X"]);
        let b = builder.inner_class(a, "B", &["Y", "Z"]);
        let c = builder.inner_class(b, "C", &["W"]);
        let model = builder.build();
        let session = IrSession::new();

        let args = (0..4).map(|_| arg(int)).collect();
        let ty = session
            .type_factory(&model)
            .create_simple(&SimpleType::of(c).with_arguments(args), true)
            .unwrap();

        assert_eq!(ty.outer_depth(), 2);
        assert_eq!(ty.arguments().len(), 1);
        let b_ty = ty.outer_type().unwrap();
        assert_eq!(b_ty.arguments().len(), 2);
        assert_eq!(b_ty.outer_type().unwrap().arguments().len(), 1);
    }

    #[test]
    fn test_static_nested_class_keeps_all_arguments() {
        let mut builder = ModelBuilder::new();
        let int = builder.class("kotlin", "Int");
        let outer = builder.generic_class("demo", "Outer", &["T"]);
        let nested = builder.nested_class(outer, "Entry", &["K"]);
        let model = builder.build();
        let session = IrSession::new();

        let ty = session
            .type_factory(&model)
            .create_simple(&SimpleType::of(nested).with_arguments(vec![arg(int)]), true)
            .unwrap();
        assert!(ty.outer_type().is_none());
        assert_eq!(ty.arguments().len(), 1);
        assert_eq!(ty.to_string(), "demo/Outer.Entry<kotlin/Int>");
    }

    #[test]
    fn test_too_few_arguments_is_malformed() {
        let f = fixture();
        let session = IrSession::new();
        let err = session
            .type_factory(&f.model)
            .create_simple(&SimpleType::of(f.inner), true)
            .unwrap_err();
        match err {
            IrError::MalformedType { classifier, .. } => assert_eq!(classifier, "demo/Outer.Inner"),
            other => panic!("expected malformed type, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_classifier() {
        let f = fixture();
        let session = IrSession::new();
        let err = session
            .type_factory(&f.model)
            .create_simple(&SimpleType::of(ClassifierIdx(99)), true)
            .unwrap_err();
        assert_eq!(err, IrError::UnknownClassifier { index: 99 });
    }

    #[test]
    fn test_type_parameter_has_unknown_visibility() {
        let mut builder = ModelBuilder::new();
        let outer = builder.generic_class("demo", "Box", &["T"]);
        let t = builder.type_parameter(outer, "T");
        let model = builder.build();
        let session = IrSession::new();

        let ty = session
            .type_factory(&model)
            .create_simple(&SimpleType::of(t).nullable(), true)
            .unwrap();
        assert_eq!(ty.visibility(), Visibility::Unknown);
        assert_eq!(ty.to_string(), "demo/Box#T?");
    }

    #[test]
    fn test_abbreviation_substitution() {
        let mut builder = ModelBuilder::new();
        let string = builder.class("kotlin", "String");
        let alias = builder.type_alias("demo", "Name", &[]);
        let model = builder.build();
        let session = IrSession::new();
        let factory = session.type_factory(&model);

        let source = SimpleType::of(string).abbreviated_as(SimpleType::of(alias));
        assert_eq!(factory.create_simple(&source, true).unwrap().to_string(), "demo/Name");
        assert_eq!(factory.create_simple(&source, false).unwrap().to_string(), "kotlin/String");
    }

    #[test]
    fn test_flexible_and_projections() {
        let f = fixture();
        let session = IrSession::new();
        let factory = session.type_factory(&f.model);

        let lower = SimpleType::of(f.list).with_arguments(vec![
            TypeArgument::projected(Variance::Out, SimpleType::of(f.string)),
        ]);
        let upper = SimpleType::of(f.list)
            .with_arguments(vec![TypeArgument::star(SimpleType::of(f.string))])
            .nullable();
        let ty = factory
            .create(&SemanticType::Flexible { lower, upper })
            .unwrap();

        match &ty {
            CanonicalType::Flexible(flexible) => {
                assert_eq!(flexible.lower.arguments()[0].variance, Variance::Out);
                assert!(flexible.upper.arguments()[0].is_star);
            }
            other => panic!("expected flexible type, got {}", other),
        }
        assert_eq!(
            ty.to_string(),
            "(kotlin/collections/List<out kotlin/String>..kotlin/collections/List<*>?)"
        );
    }
}
