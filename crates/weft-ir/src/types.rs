//! Canonical IR type model
//!
//! Simple types are hash-consed: a [`CanonicalSimpleType`] is a handle to
//! data owned by the session's [`Interner`](crate::Interner), and two handles
//! are equal exactly when they point at the same allocation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use weft_descriptors::{Variance, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierIdKind {
    Class,
    TypeAlias,
    TypeParameter,
}

/// Structural path of a classifier: package plus the chain of containing
/// classifiers down to the classifier itself
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassifierPath {
    /// Dot separated package name, possibly empty
    pub package: String,
    /// Outermost first; the last segment is the classifier's own name
    pub segments: Vec<String>,
    pub kind: ClassifierIdKind,
}

/// Stable identity of a classifier, shared per distinct path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassifierId(Arc<ClassifierPath>);

impl ClassifierId {
    pub(crate) fn from_path(path: Arc<ClassifierPath>) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &ClassifierPath {
        &self.0
    }

    pub fn package(&self) -> &str {
        &self.0.package
    }

    pub fn kind(&self) -> ClassifierIdKind {
        self.0.kind
    }

    pub fn short_name(&self) -> &str {
        self.0.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Whether both IDs share the same allocation
    pub fn is_same_instance(&self, other: &ClassifierId) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for ClassifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = &self.0;
        if !path.package.is_empty() {
            write!(f, "{}/", path.package.replace('.', "/"))?;
        }
        let (last, enclosing) = match path.segments.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };
        if !enclosing.is_empty() {
            let separator = match path.kind {
                ClassifierIdKind::TypeParameter => '#',
                _ => '.',
            };
            write!(f, "{}{}", enclosing.join("."), separator)?;
        }
        write!(f, "{}", last)
    }
}

/// A type argument together with its variance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeProjection {
    pub variance: Variance,
    pub is_star: bool,
    pub ty: CanonicalType,
}

impl fmt::Display for TypeProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_star {
            return write!(f, "*");
        }
        match self.variance.label() {
            Some(label) => write!(f, "{} {}", label, self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

/// Interning key of a simple type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleTypeData {
    pub classifier_id: ClassifierId,
    /// Present for inner classes only
    pub outer_type: Option<CanonicalSimpleType>,
    pub visibility: Visibility,
    pub arguments: Vec<TypeProjection>,
    pub is_marked_nullable: bool,
}

/// Interned simple type
#[derive(Clone)]
pub struct CanonicalSimpleType(Arc<SimpleTypeData>);

impl CanonicalSimpleType {
    pub(crate) fn from_interned(data: Arc<SimpleTypeData>) -> Self {
        Self(data)
    }

    pub fn data(&self) -> &SimpleTypeData {
        &self.0
    }

    pub fn classifier_id(&self) -> &ClassifierId {
        &self.0.classifier_id
    }

    pub fn outer_type(&self) -> Option<&CanonicalSimpleType> {
        self.0.outer_type.as_ref()
    }

    pub fn visibility(&self) -> Visibility {
        self.0.visibility
    }

    pub fn arguments(&self) -> &[TypeProjection] {
        &self.0.arguments
    }

    pub fn is_marked_nullable(&self) -> bool {
        self.0.is_marked_nullable
    }

    /// Number of outer levels above this type
    pub fn outer_depth(&self) -> usize {
        std::iter::successors(self.outer_type(), |t| t.outer_type()).count()
    }
}

impl PartialEq for CanonicalSimpleType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CanonicalSimpleType {}

impl Hash for CanonicalSimpleType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

impl fmt::Debug for CanonicalSimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalSimpleType({})", self)
    }
}

impl fmt::Display for CanonicalSimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outer_type() {
            Some(outer) => write!(f, "{}.{}", outer, self.classifier_id().short_name())?,
            None => write!(f, "{}", self.classifier_id())?,
        }
        if !self.arguments().is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.arguments().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", argument)?;
            }
            write!(f, ">")?;
        }
        if self.is_marked_nullable() {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A type bounded by two simple types. Not interned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalFlexibleType {
    pub lower: CanonicalSimpleType,
    pub upper: CanonicalSimpleType,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalType {
    Simple(CanonicalSimpleType),
    Flexible(CanonicalFlexibleType),
}

impl CanonicalType {
    pub fn as_simple(&self) -> Option<&CanonicalSimpleType> {
        match self {
            CanonicalType::Simple(simple) => Some(simple),
            CanonicalType::Flexible(_) => None,
        }
    }
}

impl From<CanonicalSimpleType> for CanonicalType {
    fn from(ty: CanonicalSimpleType) -> Self {
        CanonicalType::Simple(ty)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalType::Simple(simple) => write!(f, "{}", simple),
            CanonicalType::Flexible(flexible) => {
                write!(f, "({}..{})", flexible.lower, flexible.upper)
            }
        }
    }
}
