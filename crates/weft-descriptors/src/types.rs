//! Semantic types as produced by the frontend

use crate::model::ClassifierIdx;
use serde::Deserialize;

/// Variance of a type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

impl Variance {
    /// Keyword rendered in front of the argument, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Variance::Invariant => None,
            Variance::In => Some("in"),
            Variance::Out => Some("out"),
        }
    }
}

/// A frontend type. The set of kinds is closed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Simple(SimpleType),
    /// A type whose nullability is only known to lie between two bounds
    Flexible { lower: SimpleType, upper: SimpleType },
}

impl From<SimpleType> for SemanticType {
    fn from(ty: SimpleType) -> Self {
        SemanticType::Simple(ty)
    }
}

/// A classifier applied to arguments.
///
/// For inner classes `arguments` is flattened: the arguments of every
/// enclosing class come first, the class's own arguments come last.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimpleType {
    pub classifier: ClassifierIdx,
    #[serde(default)]
    pub arguments: Vec<TypeArgument>,
    #[serde(default)]
    pub nullable: bool,
    /// The type alias spelling this type was written with
    #[serde(default)]
    pub abbreviation: Option<Box<SimpleType>>,
}

impl SimpleType {
    pub fn of(classifier: ClassifierIdx) -> Self {
        Self {
            classifier,
            arguments: Vec::new(),
            nullable: false,
            abbreviation: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeArgument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn abbreviated_as(mut self, abbreviation: SimpleType) -> Self {
        self.abbreviation = Some(Box::new(abbreviation));
        self
    }
}

/// A type argument with its projection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeArgument {
    #[serde(default)]
    pub variance: Variance,
    #[serde(default)]
    pub star: bool,
    #[serde(rename = "type")]
    pub ty: SemanticType,
}

impl TypeArgument {
    pub fn invariant(ty: impl Into<SemanticType>) -> Self {
        Self {
            variance: Variance::Invariant,
            star: false,
            ty: ty.into(),
        }
    }

    pub fn projected(variance: Variance, ty: impl Into<SemanticType>) -> Self {
        Self {
            variance,
            star: false,
            ty: ty.into(),
        }
    }

    /// `*`; `bound` is the type the star stands for
    pub fn star(bound: impl Into<SemanticType>) -> Self {
        Self {
            variance: Variance::Out,
            star: true,
            ty: bound.into(),
        }
    }
}
