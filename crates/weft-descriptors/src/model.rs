//! Classifier descriptors and class declarations

use crate::types::{SemanticType, SimpleType};
use serde::Deserialize;
use std::fmt;
use weft_error::{IrError, IrResult, Span};

/// Index of a classifier inside a [`SemanticModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ClassifierIdx(pub u32);

impl fmt::Display for ClassifierIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
    Local,
    /// Visibility is not known for this use site
    Unknown,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::Private => "private",
            Visibility::Local => "local",
            Visibility::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Class,
    Interface,
    AnnotationClass,
    Object,
    EnumClass,
    TypeAlias,
    TypeParameter,
}

/// Where a classifier is declared
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    /// Top level of a package (dot separated, may be empty)
    Package(String),
    Classifier(ClassifierIdx),
}

/// Whether a classifier was compiled in this session or loaded from a
/// pre-built dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorOrigin {
    #[default]
    Source,
    Dependency,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassifierDescriptor {
    pub name: String,
    pub kind: ClassifierKind,
    pub container: Container,
    /// Non-static nested class capturing its outer instance
    #[serde(default)]
    pub is_inner: bool,
    /// Own type parameters, excluding those of enclosing classes
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub origin: DescriptorOrigin,
    #[serde(default)]
    pub span: Option<Span>,
}

impl ClassifierDescriptor {
    pub fn new(name: impl Into<String>, kind: ClassifierKind, container: Container) -> Self {
        Self {
            name: name.into(),
            kind,
            container,
            is_inner: false,
            type_parameters: Vec::new(),
            visibility: Visibility::Public,
            origin: DescriptorOrigin::Source,
            span: None,
        }
    }

    /// Everything but type parameters can be applied to type arguments
    pub fn supports_type_parameters(&self) -> bool {
        self.kind != ClassifierKind::TypeParameter
    }

    pub fn is_annotation_class(&self) -> bool {
        self.kind == ClassifierKind::AnnotationClass
    }

    pub fn containing_classifier(&self) -> Option<ClassifierIdx> {
        match self.container {
            Container::Classifier(idx) => Some(idx),
            Container::Package(_) => None,
        }
    }
}

/// A property declared in a class body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    /// Name of an already materialized backing field
    #[serde(default)]
    pub backing_field: Option<String>,
    /// Name override already attached to the getter
    #[serde(default)]
    pub getter_name_override: Option<String>,
}

impl PropertyDeclaration {
    pub fn new(name: impl Into<String>, ty: impl Into<SemanticType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            backing_field: None,
            getter_name_override: None,
        }
    }

    pub fn with_backing_field(mut self, field: impl Into<String>) -> Self {
        self.backing_field = Some(field.into());
        self
    }

    pub fn with_getter_name_override(mut self, name: impl Into<String>) -> Self {
        self.getter_name_override = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldAssignment {
    pub field: String,
    pub parameter: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ConstructorDeclaration {
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    #[serde(default)]
    pub assignments: Vec<FieldAssignment>,
}

/// A classifier whose body is available
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassDeclaration {
    pub classifier: ClassifierIdx,
    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDeclaration>,
}

impl ClassDeclaration {
    pub fn new(classifier: ClassifierIdx) -> Self {
        Self {
            classifier,
            properties: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDeclaration) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorDeclaration) -> Self {
        self.constructors.push(constructor);
        self
    }
}

/// The descriptor graph handed over by the frontend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SemanticModel {
    /// Source file names, indexed by `Span::file_id`
    #[serde(default)]
    pub files: Vec<String>,
    pub classifiers: Vec<ClassifierDescriptor>,
    #[serde(default)]
    pub declarations: Vec<ClassDeclaration>,
}

impl SemanticModel {
    /// Parses and validates a JSON model
    pub fn from_json(text: &str) -> IrResult<Self> {
        let model: SemanticModel =
            serde_json::from_str(text).map_err(|e| IrError::Model(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    pub fn classifier(&self, idx: ClassifierIdx) -> IrResult<&ClassifierDescriptor> {
        self.classifiers
            .get(idx.0 as usize)
            .ok_or(IrError::UnknownClassifier { index: idx.0 })
    }

    pub fn classifier_indices(&self) -> impl Iterator<Item = ClassifierIdx> {
        (0..self.classifiers.len() as u32).map(ClassifierIdx)
    }

    pub fn declaration(&self, idx: ClassifierIdx) -> Option<&ClassDeclaration> {
        self.declarations.iter().find(|d| d.classifier == idx)
    }

    /// Classifiers declared directly inside `owner`
    pub fn nested_classifiers(
        &self,
        owner: ClassifierIdx,
    ) -> impl Iterator<Item = (ClassifierIdx, &ClassifierDescriptor)> + '_ {
        self.classifier_indices()
            .zip(self.classifiers.iter())
            .filter(move |(_, c)| c.containing_classifier() == Some(owner))
    }

    /// Checks that every classifier reference points inside the model
    /// and that the container graph has no cycles
    pub fn validate(&self) -> IrResult<()> {
        for idx in self.classifier_indices() {
            let mut current = idx;
            let mut depth = 0usize;
            while let Some(parent) = self.classifier(current)?.containing_classifier() {
                depth += 1;
                if depth > self.classifiers.len() {
                    return Err(IrError::Model(format!(
                        "container chain of classifier {} is cyclic",
                        idx
                    )));
                }
                current = parent;
            }
        }
        for declaration in &self.declarations {
            self.classifier(declaration.classifier)?;
            for property in &declaration.properties {
                self.check_type(&property.ty)?;
            }
            for constructor in &declaration.constructors {
                for parameter in &constructor.parameters {
                    self.check_type(&parameter.ty)?;
                }
                if let Some(bad) = constructor
                    .assignments
                    .iter()
                    .find(|a| a.parameter >= constructor.parameters.len())
                {
                    return Err(IrError::Model(format!(
                        "assignment to `{}` uses missing parameter {}",
                        bad.field, bad.parameter
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_type(&self, ty: &SemanticType) -> IrResult<()> {
        match ty {
            SemanticType::Simple(simple) => self.check_simple_type(simple),
            SemanticType::Flexible { lower, upper } => {
                self.check_simple_type(lower)?;
                self.check_simple_type(upper)
            }
        }
    }

    fn check_simple_type(&self, ty: &SimpleType) -> IrResult<()> {
        self.classifier(ty.classifier)?;
        for argument in &ty.arguments {
            self.check_type(&argument.ty)?;
        }
        if let Some(abbreviation) = &ty.abbreviation {
            self.check_simple_type(abbreviation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "files": ["Tags.kt"],
        "classifiers": [
            { "name": "String", "kind": "class", "container": { "package": "kotlin" } },
            { "name": "Tag", "kind": "annotation_class", "container": { "package": "demo" } },
            { "name": "Impl", "kind": "class", "container": { "classifier": 1 } }
        ],
        "declarations": [
            {
                "classifier": 1,
                "properties": [
                    { "name": "name", "type": { "simple": { "classifier": 0 } } }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let model = SemanticModel::from_json(MODEL).unwrap();
        assert_eq!(model.classifiers.len(), 3);
        assert_eq!(model.files, vec!["Tags.kt".to_string()]);

        let tag = model.classifier(ClassifierIdx(1)).unwrap();
        assert!(tag.is_annotation_class());
        assert_eq!(tag.visibility, Visibility::Public);

        let nested: Vec<_> = model
            .nested_classifiers(ClassifierIdx(1))
            .map(|(_, c)| c.name.as_str())
            .collect();
        assert_eq!(nested, vec!["Impl"]);
        assert_eq!(model.declaration(ClassifierIdx(1)).unwrap().properties.len(), 1);
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let json = r#"{
            "classifiers": [
                { "name": "Inner", "kind": "class", "container": { "classifier": 5 } }
            ]
        }"#;
        let err = SemanticModel::from_json(json).unwrap_err();
        assert_eq!(err, IrError::UnknownClassifier { index: 5 });
    }

    #[test]
    fn test_cyclic_container_rejected() {
        let json = r#"{
            "classifiers": [
                { "name": "A", "kind": "class", "container": { "classifier": 1 } },
                { "name": "B", "kind": "class", "container": { "classifier": 0 } }
            ]
        }"#;
        assert!(matches!(SemanticModel::from_json(json), Err(IrError::Model(_))));
    }

    #[test]
    fn test_syntax_error_reported_as_model_error() {
        assert!(matches!(
            SemanticModel::from_json("{ not json"),
            Err(IrError::Model(_))
        ));
    }
}
