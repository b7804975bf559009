//! Programmatic construction of semantic models

use crate::model::{
    ClassDeclaration, ClassifierDescriptor, ClassifierIdx, ClassifierKind, Container,
    DescriptorOrigin, SemanticModel,
};
use weft_error::Span;

/// Incrementally builds a [`SemanticModel`]
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: SemanticModel,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source file and returns its ID
    pub fn file(&mut self, name: impl Into<String>) -> u32 {
        self.model.files.push(name.into());
        (self.model.files.len() - 1) as u32
    }

    /// Adds an arbitrary classifier descriptor
    pub fn classifier(&mut self, descriptor: ClassifierDescriptor) -> ClassifierIdx {
        self.model.classifiers.push(descriptor);
        ClassifierIdx((self.model.classifiers.len() - 1) as u32)
    }

    /// Top-level class without type parameters
    pub fn class(&mut self, package: &str, name: &str) -> ClassifierIdx {
        self.generic_class(package, name, &[])
    }

    pub fn generic_class(&mut self, package: &str, name: &str, params: &[&str]) -> ClassifierIdx {
        let mut descriptor = ClassifierDescriptor::new(
            name,
            ClassifierKind::Class,
            Container::Package(package.to_string()),
        );
        descriptor.type_parameters = params.iter().map(|p| p.to_string()).collect();
        self.classifier(descriptor)
    }

    pub fn annotation_class(&mut self, package: &str, name: &str) -> ClassifierIdx {
        self.classifier(ClassifierDescriptor::new(
            name,
            ClassifierKind::AnnotationClass,
            Container::Package(package.to_string()),
        ))
    }

    pub fn type_alias(&mut self, package: &str, name: &str, params: &[&str]) -> ClassifierIdx {
        let mut descriptor = ClassifierDescriptor::new(
            name,
            ClassifierKind::TypeAlias,
            Container::Package(package.to_string()),
        );
        descriptor.type_parameters = params.iter().map(|p| p.to_string()).collect();
        self.classifier(descriptor)
    }

    /// Static nested class
    pub fn nested_class(&mut self, outer: ClassifierIdx, name: &str, params: &[&str]) -> ClassifierIdx {
        let mut descriptor =
            ClassifierDescriptor::new(name, ClassifierKind::Class, Container::Classifier(outer));
        descriptor.type_parameters = params.iter().map(|p| p.to_string()).collect();
        self.classifier(descriptor)
    }

    /// Inner class capturing the outer instance
    pub fn inner_class(&mut self, outer: ClassifierIdx, name: &str, params: &[&str]) -> ClassifierIdx {
        let idx = self.nested_class(outer, name, params);
        self.model.classifiers[idx.0 as usize].is_inner = true;
        idx
    }

    pub fn type_parameter(&mut self, owner: ClassifierIdx, name: &str) -> ClassifierIdx {
        self.classifier(ClassifierDescriptor::new(
            name,
            ClassifierKind::TypeParameter,
            Container::Classifier(owner),
        ))
    }

    pub fn from_dependency(&mut self, idx: ClassifierIdx) -> &mut Self {
        self.model.classifiers[idx.0 as usize].origin = DescriptorOrigin::Dependency;
        self
    }

    pub fn span(&mut self, idx: ClassifierIdx, span: Span) -> &mut Self {
        self.model.classifiers[idx.0 as usize].span = Some(span);
        self
    }

    /// Makes the body of a classifier available
    pub fn declare(&mut self, declaration: ClassDeclaration) -> &mut Self {
        self.model.declarations.push(declaration);
        self
    }

    pub fn build(self) -> SemanticModel {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_class_registration() {
        let mut builder = ModelBuilder::new();
        let outer = builder.generic_class("demo", "Outer", &["T"]);
        let inner = builder.inner_class(outer, "Inner", &["U"]);
        let model = builder.build();

        let descriptor = model.classifier(inner).unwrap();
        assert!(descriptor.is_inner);
        assert_eq!(descriptor.containing_classifier(), Some(outer));
        assert_eq!(descriptor.type_parameters, vec!["U".to_string()]);
    }

    #[test]
    fn test_dependency_origin() {
        let mut builder = ModelBuilder::new();
        let tag = builder.annotation_class("demo", "Tag");
        builder.from_dependency(tag);
        let model = builder.build();
        assert_eq!(model.classifier(tag).unwrap().origin, DescriptorOrigin::Dependency);
    }
}
