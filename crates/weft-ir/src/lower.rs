//! Lowering semantic declarations → IR classes
//!
//! Converts every class body present in the semantic model into an
//! [`IrClass`] and binds the class symbol to it. Classifiers without a body
//! stay unbound.

use crate::declarations::{
    IrAccessor, IrAnnotation, IrClass, IrConstructorBuilder, IrField, IrModuleFragment, IrOrigin,
    IrProperty, NestedSlot,
};
use crate::factory::TypeFactory;
use crate::session::IrSession;
use crate::symbols::ClassSymbol;
use tracing::{debug, warn};
use weft_descriptors::{
    ClassDeclaration, ClassifierKind, DescriptorOrigin, SemanticModel, Visibility,
};
use weft_error::IrResult;

/// Converts all class declarations of `model` into an IR module fragment
pub fn lower_declarations(session: &IrSession, model: &SemanticModel) -> IrResult<IrModuleFragment> {
    let factory = session.type_factory(model);
    let mut fragment = IrModuleFragment::new();

    for declaration in &model.declarations {
        let class = lower_class(session, &factory, model, declaration)?;
        let symbol = class.symbol;
        let (owner, inserted) = session.symbols().bind(symbol, class);
        if !inserted {
            warn!(%symbol, "class declared twice; keeping the first body");
            continue;
        }
        fragment.add_class(owner);
    }

    debug!(classes = fragment.classes.len(), "lowered declarations");
    Ok(fragment)
}

/// Converts one class declaration without binding it
pub fn lower_class(
    session: &IrSession,
    factory: &TypeFactory<'_>,
    model: &SemanticModel,
    declaration: &ClassDeclaration,
) -> IrResult<IrClass> {
    let idx = declaration.classifier;
    let descriptor = model.classifier(idx)?;
    let id = session.classifier_ids().resolve(model, idx)?;
    let origin = match descriptor.origin {
        DescriptorOrigin::Source => IrOrigin::Defined,
        DescriptorOrigin::Dependency => IrOrigin::Dependency,
    };

    let mut class = IrClass::new(session.symbols().reference_class(idx), id, &descriptor.name, descriptor.kind);
    class.visibility = descriptor.visibility;
    class.origin = origin;
    class.span = descriptor.span;
    class.parent = descriptor.containing_classifier().map(ClassSymbol);

    for (nested_idx, nested) in model.nested_classifiers(idx) {
        if nested.kind == ClassifierKind::TypeParameter {
            continue;
        }
        class.nested.push(NestedSlot {
            name: nested.name.clone(),
            id: session.classifier_ids().resolve(model, nested_idx)?,
            symbol: session.symbols().reference_class(nested_idx),
        });
    }

    for property in &declaration.properties {
        let ty = factory.create(&property.ty)?;
        let backing_field = property.backing_field.as_ref().map(|name| IrField {
            name: name.clone(),
            ty: ty.clone(),
            visibility: Visibility::Private,
            origin,
        });
        let getter = IrAccessor {
            name: IrAccessor::getter_name(&property.name),
            return_type: ty.clone(),
            visibility: Visibility::Public,
            origin,
            annotations: property
                .getter_name_override
                .iter()
                .map(|name| IrAnnotation::NameOverride(name.clone()))
                .collect(),
        };
        class.properties.push(IrProperty {
            name: property.name.clone(),
            ty,
            backing_field,
            getter: Some(getter),
        });
    }

    for (i, constructor) in declaration.constructors.iter().enumerate() {
        let mut builder = IrConstructorBuilder::new();
        if i == 0 {
            builder = builder.primary();
        }
        for parameter in &constructor.parameters {
            builder.add_parameter(parameter.name.clone(), factory.create(&parameter.ty)?);
        }
        for assignment in &constructor.assignments {
            builder.assign_field(assignment.field.clone(), assignment.parameter);
        }
        class.constructors.push(builder.build());
    }

    Ok(class)
}
