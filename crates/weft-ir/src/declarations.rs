//! IR declarations - classes and their members
//!
//! Contains classes, properties (backing field + getter), constructors and
//! the module fragment that collects the classes lowered in a session.

use crate::symbols::{ClassSymbol, IrClassRef};
use crate::types::{CanonicalType, ClassifierId};
use std::fmt;
use weft_descriptors::{ClassifierKind, Visibility};
use weft_error::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Final,
    Open,
    Abstract,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Final => "final",
            Modality::Open => "open",
            Modality::Abstract => "abstract",
        }
    }
}

/// How a declaration came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrOrigin {
    /// Lowered from a source declaration
    Defined,
    /// Materialized from a pre-built dependency
    Dependency,
    /// Synthesized implementation class or member
    SyntheticImpl,
}

impl IrOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrOrigin::Defined => "defined",
            IrOrigin::Dependency => "dependency",
            IrOrigin::SyntheticImpl => "synthetic-impl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrAnnotation {
    /// Emit the annotated member under this name instead of its own
    NameOverride(String),
}

impl fmt::Display for IrAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrAnnotation::NameOverride(name) => write!(f, "@NameOverride(\"{}\")", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrField {
    pub name: String,
    pub ty: CanonicalType,
    pub visibility: Visibility,
    pub origin: IrOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrAccessor {
    pub name: String,
    pub return_type: CanonicalType,
    pub visibility: Visibility,
    pub origin: IrOrigin,
    pub annotations: Vec<IrAnnotation>,
}

impl IrAccessor {
    /// Internal name of the getter of `property`
    pub fn getter_name(property: &str) -> String {
        format!("<get-{}>", property)
    }

    /// Name the emitter will use for this accessor
    pub fn emitted_name(&self) -> &str {
        self.annotations
            .iter()
            .map(|a| match a {
                IrAnnotation::NameOverride(name) => name.as_str(),
            })
            .next()
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrProperty {
    pub name: String,
    pub ty: CanonicalType,
    pub backing_field: Option<IrField>,
    pub getter: Option<IrAccessor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrValueParameter {
    pub name: String,
    pub ty: CanonicalType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrStatement {
    /// Call of the superclass constructor
    DelegateToSuper,
    /// `this.<field> = <parameter>`
    SetField { field: String, parameter: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrConstructor {
    pub visibility: Visibility,
    pub is_primary: bool,
    pub parameters: Vec<IrValueParameter>,
    pub body: Vec<IrStatement>,
}

impl IrConstructor {
    /// Fields assigned by the body, in order
    pub fn assigned_fields(&self) -> impl Iterator<Item = &str> {
        self.body.iter().filter_map(|s| match s {
            IrStatement::SetField { field, .. } => Some(field.as_str()),
            IrStatement::DelegateToSuper => None,
        })
    }
}

/// Accumulates parameters and assignments; the constructor is built once
#[derive(Debug, Clone)]
pub struct IrConstructorBuilder {
    visibility: Visibility,
    is_primary: bool,
    parameters: Vec<IrValueParameter>,
    body: Vec<IrStatement>,
}

impl Default for IrConstructorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IrConstructorBuilder {
    /// A constructor that only delegates to the superclass
    pub fn new() -> Self {
        Self {
            visibility: Visibility::Public,
            is_primary: false,
            parameters: Vec::new(),
            body: vec![IrStatement::DelegateToSuper],
        }
    }

    /// Continues from an existing constructor
    pub fn extend(constructor: IrConstructor) -> Self {
        Self {
            visibility: constructor.visibility,
            is_primary: constructor.is_primary,
            parameters: constructor.parameters,
            body: constructor.body,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Returns the index of the new parameter
    pub fn add_parameter(&mut self, name: impl Into<String>, ty: CanonicalType) -> usize {
        self.parameters.push(IrValueParameter {
            name: name.into(),
            ty,
        });
        self.parameters.len() - 1
    }

    pub fn assign_field(&mut self, field: impl Into<String>, parameter: usize) {
        self.body.push(IrStatement::SetField {
            field: field.into(),
            parameter,
        });
    }

    pub fn build(self) -> IrConstructor {
        IrConstructor {
            visibility: self.visibility,
            is_primary: self.is_primary,
            parameters: self.parameters,
            body: self.body,
        }
    }
}

/// A class slot declared inside another class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedSlot {
    pub name: String,
    pub id: ClassifierId,
    pub symbol: ClassSymbol,
}

/// Class in IR
#[derive(Debug, Clone)]
pub struct IrClass {
    pub symbol: ClassSymbol,
    pub id: ClassifierId,
    pub name: String,
    pub kind: ClassifierKind,
    pub visibility: Visibility,
    pub modality: Modality,
    pub origin: IrOrigin,
    /// Declaring class, for nested classes
    pub parent: Option<ClassSymbol>,
    pub span: Option<Span>,
    pub properties: Vec<IrProperty>,
    pub constructors: Vec<IrConstructor>,
    pub nested: Vec<NestedSlot>,
}

impl IrClass {
    pub fn new(symbol: ClassSymbol, id: ClassifierId, name: impl Into<String>, kind: ClassifierKind) -> Self {
        Self {
            symbol,
            id,
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            modality: Modality::Final,
            origin: IrOrigin::Defined,
            parent: None,
            span: None,
            properties: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn find_nested(&self, name: &str) -> Option<&NestedSlot> {
        self.nested.iter().find(|slot| slot.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&IrProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &IrField> {
        self.properties.iter().filter_map(|p| p.backing_field.as_ref())
    }

    pub fn accessors(&self) -> impl Iterator<Item = &IrAccessor> {
        self.properties.iter().filter_map(|p| p.getter.as_ref())
    }

    pub fn primary_constructor(&self) -> Option<&IrConstructor> {
        self.constructors.iter().find(|c| c.is_primary)
    }
}

impl fmt::Display for IrClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ClassifierKind::AnnotationClass => "annotation class",
            ClassifierKind::Interface => "interface",
            ClassifierKind::Object => "object",
            ClassifierKind::EnumClass => "enum class",
            _ => "class",
        };
        writeln!(
            f,
            "{} {} {} {} [{}]",
            self.visibility.as_str(),
            self.modality.as_str(),
            kind,
            self.id,
            self.origin.as_str()
        )?;

        for ctor in &self.constructors {
            write!(f, "  {} constructor(", ctor.visibility.as_str())?;
            for (i, p) in ctor.parameters.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", p.name, p.ty)?;
            }
            writeln!(f, "){}", if ctor.is_primary { " primary" } else { "" })?;
            for statement in &ctor.body {
                match statement {
                    IrStatement::DelegateToSuper => writeln!(f, "    super()")?,
                    IrStatement::SetField { field, parameter } => {
                        let name = ctor
                            .parameters
                            .get(*parameter)
                            .map(|p| p.name.as_str())
                            .unwrap_or("?");
                        writeln!(f, "    this.{} = {}", field, name)?;
                    }
                }
            }
        }

        for property in &self.properties {
            writeln!(f, "  property {}: {}", property.name, property.ty)?;
            if let Some(field) = &property.backing_field {
                writeln!(f, "    field {} {}: {}", field.visibility.as_str(), field.name, field.ty)?;
            }
            if let Some(getter) = &property.getter {
                write!(
                    f,
                    "    getter {} {}(): {}",
                    getter.visibility.as_str(),
                    getter.name,
                    getter.return_type
                )?;
                for annotation in &getter.annotations {
                    write!(f, " {}", annotation)?;
                }
                writeln!(f)?;
            }
        }

        for slot in &self.nested {
            writeln!(f, "  nested {}", slot.id)?;
        }
        Ok(())
    }
}

/// Classes lowered in one session, in declaration order
#[derive(Debug, Default)]
pub struct IrModuleFragment {
    pub classes: Vec<IrClassRef>,
}

impl IrModuleFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: IrClassRef) {
        self.classes.push(class);
    }

    /// Finds a class by its rendered classifier ID
    pub fn find(&self, id: &str) -> Option<&IrClassRef> {
        self.classes.iter().find(|c| c.read().id.to_string() == id)
    }
}

impl fmt::Display for IrModuleFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, class) in self.classes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", class.read())?;
        }
        Ok(())
    }
}
