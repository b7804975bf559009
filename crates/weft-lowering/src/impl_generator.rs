//! Implementation classes for annotation classes
//!
//! Per annotation class the generator moves through three states: not
//! requested, implementation resolved, generated. Both transitions are
//! recorded in the session's [`GenerationCache`](weft_ir::GenerationCache),
//! so repeated or concurrent requests never synthesize members twice.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use weft_descriptors::{ClassifierKind, Visibility};
use weft_error::{IrError, IrResult};
use weft_ir::{
    ClassSymbol, IrAccessor, IrAnnotation, IrClass, IrClassRef, IrConstructorBuilder, IrField,
    IrModuleFragment, IrOrigin, IrProperty, IrSession, NestedSlot,
};

/// Where the implementation class of a declaration comes from
enum ImplSlot {
    /// Bound to a complete class from a pre-built dependency
    Materialized(IrClassRef),
    /// Bound to a class declared in this session, members still missing
    Declared(IrClassRef),
    /// Not bound yet
    Synthesized(ClassSymbol, IrClass),
}

pub struct SyntheticImplGenerator<'s> {
    session: &'s IrSession,
}

impl<'s> SyntheticImplGenerator<'s> {
    pub fn new(session: &'s IrSession) -> Self {
        Self { session }
    }

    /// Returns the generated implementation class of `declaration`.
    ///
    /// The first successful request resolves (or synthesizes) the class and
    /// generates its members; later requests return the cached class. A
    /// failed request leaves no trace in the session.
    pub fn get_impl_class(&self, declaration: &IrClassRef) -> IrResult<IrClassRef> {
        let symbol = declaration.read().symbol;
        self.session
            .generation()
            .get_or_try_insert_impl(symbol, || match self.resolve_impl_class(declaration)? {
                ImplSlot::Materialized(class) => Ok(class),
                ImplSlot::Declared(class) => {
                    self.generate(&class)?;
                    Ok(class)
                }
                ImplSlot::Synthesized(slot, shell) => {
                    let shell: IrClassRef = Arc::new(RwLock::new(shell));
                    self.generate(&shell)?;
                    let (_, inserted) = self.session.symbols().bind_ref(slot, shell.clone());
                    if !inserted {
                        warn!(%slot, "implementation slot bound concurrently; keeping the synthesized class");
                    }
                    Ok(shell)
                }
            })
    }

    /// Implementation classes of every annotation class in `fragment`
    pub fn generate_all(&self, fragment: &IrModuleFragment) -> IrResult<Vec<IrClassRef>> {
        fragment
            .classes
            .iter()
            .filter(|class| class.read().kind == ClassifierKind::AnnotationClass)
            .map(|class| self.get_impl_class(class))
            .collect()
    }

    /// Adds backing fields, getters and the constructor to `impl_class`.
    ///
    /// Does nothing for classes already generated. A declaration without
    /// properties leaves the class untouched and not marked, so it can be
    /// generated later.
    pub fn generate(&self, impl_class: &IrClassRef) -> IrResult<()> {
        let mut class = impl_class.write();
        let generation = self.session.generation();
        if generation.is_generated(class.symbol) {
            trace!(class = %class.id, "already generated");
            return Ok(());
        }

        let declaration = class
            .parent
            .and_then(|parent| self.session.symbols().owner(parent))
            .filter(|parent| !Arc::ptr_eq(parent, impl_class))
            .ok_or_else(|| IrError::MissingParent {
                class: class.id.to_string(),
            })?;
        let declaration = declaration.read();

        if declaration.properties.is_empty() {
            debug!(class = %class.id, "declaration has no properties; skipping");
            return Ok(());
        }
        if !generation.mark_generated(class.symbol) {
            return Ok(());
        }

        let prefix = &self.session.config().backing_field_prefix;
        let primary = class.constructors.iter().position(|c| c.is_primary);
        let constructor = match primary {
            Some(index) => IrConstructorBuilder::extend(class.constructors.remove(index)),
            None => IrConstructorBuilder::new().primary(),
        };
        let mut constructor = constructor.visibility(Visibility::Public);

        let mut properties = Vec::with_capacity(declaration.properties.len());
        for property in &declaration.properties {
            let field_name = format!("{}{}", prefix, property.name);
            let parameter = constructor.add_parameter(property.name.clone(), property.ty.clone());
            constructor.assign_field(field_name.clone(), parameter);

            properties.push(IrProperty {
                name: property.name.clone(),
                ty: property.ty.clone(),
                backing_field: Some(IrField {
                    name: field_name,
                    ty: property.ty.clone(),
                    visibility: Visibility::Private,
                    origin: IrOrigin::SyntheticImpl,
                }),
                getter: Some(IrAccessor {
                    name: IrAccessor::getter_name(&property.name),
                    return_type: property.ty.clone(),
                    visibility: Visibility::Public,
                    origin: IrOrigin::SyntheticImpl,
                    // Emit `name()` rather than the getter's internal name
                    annotations: vec![IrAnnotation::NameOverride(property.name.clone())],
                }),
            });
        }

        class.properties = properties;
        class.constructors.insert(0, constructor.build());
        info!(
            class = %class.id,
            properties = class.properties.len(),
            "generated implementation class"
        );
        Ok(())
    }

    fn resolve_impl_class(&self, declaration: &IrClassRef) -> IrResult<ImplSlot> {
        let declaration = declaration.read();
        let slot = declaration
            .find_nested(&self.session.config().impl_class_name)
            .ok_or_else(|| IrError::NoImplClass {
                declaration: declaration.id.to_string(),
                span: declaration.span,
            })?;

        match self.session.symbols().owner(slot.symbol) {
            Some(owner) if owner.read().origin == IrOrigin::Dependency => {
                debug!(class = %slot.id, "reusing materialized implementation class");
                self.session.generation().mark_generated(slot.symbol);
                Ok(ImplSlot::Materialized(owner))
            }
            Some(owner) => {
                debug!(class = %slot.id, "implementation class declared in source");
                Ok(ImplSlot::Declared(owner))
            }
            None => {
                debug!(class = %slot.id, "synthesizing implementation class shell");
                Ok(ImplSlot::Synthesized(
                    slot.symbol,
                    Self::create_impl_shell(&declaration, slot),
                ))
            }
        }
    }

    /// Class with a default constructor and one stub field and getter per
    /// declared property
    fn create_impl_shell(declaration: &IrClass, slot: &NestedSlot) -> IrClass {
        let mut class = IrClass::new(slot.symbol, slot.id.clone(), slot.name.clone(), ClassifierKind::Class);
        class.origin = IrOrigin::SyntheticImpl;
        class.parent = Some(declaration.symbol);
        class.span = declaration.span;
        class
            .constructors
            .push(IrConstructorBuilder::new().primary().build());

        for property in &declaration.properties {
            class.properties.push(IrProperty {
                name: property.name.clone(),
                ty: property.ty.clone(),
                backing_field: Some(IrField {
                    name: property.name.clone(),
                    ty: property.ty.clone(),
                    visibility: Visibility::Public,
                    origin: IrOrigin::SyntheticImpl,
                }),
                getter: Some(IrAccessor {
                    name: IrAccessor::getter_name(&property.name),
                    return_type: property.ty.clone(),
                    visibility: Visibility::Public,
                    origin: IrOrigin::SyntheticImpl,
                    annotations: Vec::new(),
                }),
            });
        }
        class
    }
}
