//! Integration tests for the weft IR core
//!
//! This crate drives the complete pipeline end to end:
//! Semantic model → Canonical types → IR classes → Implementation classes

use weft_descriptors::SemanticModel;
use weft_error::{Diagnostics, FileTable, IrResult};
use weft_ir::{lower_declarations, IrClassRef, IrModuleFragment, IrSession};
use weft_lowering::SyntheticImplGenerator;

/// Result of running a semantic model through the pipeline
pub struct CompileResult {
    /// Whether every stage succeeded
    pub success: bool,
    /// Rendered failure, if any
    pub diagnostics: Diagnostics,
    /// Session holding every cache used by the run
    pub session: IrSession,
    /// Lowered declarations
    pub fragment: IrModuleFragment,
    /// Implementation classes of the annotation classes
    pub impls: Vec<IrClassRef>,
    /// Rendered declarations followed by implementation classes
    pub ir_debug: String,
}

/// Parses a JSON semantic model and runs the full pipeline
pub fn compile(json: &str) -> CompileResult {
    match SemanticModel::from_json(json) {
        Ok(model) => compile_model(&model),
        Err(error) => failed(IrSession::new(), error.into()),
    }
}

/// Runs the full pipeline over an already built model
pub fn compile_model(model: &SemanticModel) -> CompileResult {
    let session = IrSession::new();
    match run(&session, model) {
        Ok((fragment, impls)) => {
            let mut ir_debug = fragment.to_string();
            for class in &impls {
                ir_debug.push('\n');
                ir_debug.push_str(&class.read().to_string());
            }
            CompileResult {
                success: true,
                diagnostics: Diagnostics::new(),
                session,
                fragment,
                impls,
                ir_debug,
            }
        }
        Err(error) => failed(session, error.into()),
    }
}

fn run(session: &IrSession, model: &SemanticModel) -> IrResult<(IrModuleFragment, Vec<IrClassRef>)> {
    let fragment = lower_declarations(session, model)?;
    let impls = SyntheticImplGenerator::new(session).generate_all(&fragment)?;
    Ok((fragment, impls))
}

fn failed(session: IrSession, diagnostics: Diagnostics) -> CompileResult {
    CompileResult {
        success: false,
        diagnostics,
        session,
        fragment: IrModuleFragment::new(),
        impls: Vec::new(),
        ir_debug: String::new(),
    }
}

/// Asserts that the model runs through the pipeline without errors
pub fn assert_compiles(json: &str) -> CompileResult {
    let result = compile(json);
    if !result.success {
        panic!(
            "Expected model to compile, but got errors:\n{}",
            result.diagnostics.render(&FileTable::new())
        );
    }
    result
}

/// Asserts that the pipeline fails and returns the rendered diagnostics
pub fn assert_compile_fails(json: &str) -> String {
    let result = compile(json);
    if result.success {
        panic!("Expected model to fail, but it succeeded");
    }
    result.diagnostics.render(&FileTable::new())
}

/// Asserts that the rendered IR contains a specific string
pub fn assert_ir_contains(json: &str, expected: &str) {
    let result = assert_compiles(json);
    if !result.ir_debug.contains(expected) {
        panic!(
            "Expected IR to contain '{}', but it didn't.\n\nGenerated IR:\n{}",
            expected, result.ir_debug
        );
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use weft_descriptors::{ClassifierIdx, ModelBuilder, SimpleType, TypeArgument, Visibility};
    use weft_ir::CanonicalType;

    const TAGS: &str = include_str!("../fixtures/tags.json");

    // =========================================
    // Canonical types
    // =========================================

    #[test]
    fn test_generic_inner_class_instantiation() {
        let result = assert_compiles(TAGS);
        let holder = result.fragment.find("demo/Holder").unwrap().read();
        let cursor = holder.property("cursor").unwrap();

        let inner = cursor.ty.as_simple().unwrap();
        assert_eq!(inner.classifier_id().to_string(), "demo/Outer.Inner");
        assert!(inner.is_marked_nullable());
        assert_eq!(inner.arguments().len(), 1);
        assert_eq!(inner.arguments()[0].ty.to_string(), "kotlin/Int");

        let outer = inner.outer_type().unwrap();
        assert_eq!(outer.classifier_id().to_string(), "demo/Outer");
        assert!(!outer.is_marked_nullable());
        assert_eq!(outer.arguments().len(), 1);
        assert_eq!(outer.arguments()[0].ty.to_string(), "kotlin/String");

        assert_eq!(cursor.ty.to_string(), "demo/Outer<kotlin/String>.Inner<kotlin/Int>?");
    }

    #[test]
    fn test_argument_slicing() {
        for own in 0..3usize {
            for outer_count in 0..3usize {
                let mut builder = ModelBuilder::new();
                let names: Vec<String> = (0..own + outer_count).map(|i| format!("T{}", i)).collect();
                let args: Vec<ClassifierIdx> = names.iter().map(|n| builder.class("t", n)).collect();
                let outer_params: Vec<&str> = names[..outer_count].iter().map(String::as_str).collect();
                let own_params: Vec<&str> = names[outer_count..].iter().map(String::as_str).collect();
                let outer = builder.generic_class("demo", "Outer", &outer_params);
                let inner = builder.inner_class(outer, "Inner", &own_params);
                let model = builder.build();

                let session = IrSession::new();
                let source = SimpleType::of(inner).with_arguments(
                    args.iter().map(|&a| TypeArgument::invariant(SimpleType::of(a))).collect(),
                );
                let ty = session.type_factory(&model).create_simple(&source, true).unwrap();

                let rendered = |t: &weft_ir::CanonicalSimpleType| -> Vec<String> {
                    t.arguments().iter().map(|a| a.ty.to_string()).collect()
                };
                let expected_own: Vec<String> = names[outer_count..].iter().map(|n| format!("t/{}", n)).collect();
                let expected_outer: Vec<String> = names[..outer_count].iter().map(|n| format!("t/{}", n)).collect();
                assert_eq!(rendered(&ty), expected_own);
                assert_eq!(rendered(ty.outer_type().unwrap()), expected_outer);
            }
        }
    }

    #[test]
    fn test_concurrent_interning() {
        let mut builder = ModelBuilder::new();
        let string = builder.class("kotlin", "String");
        let map = builder.generic_class("kotlin.collections", "Map", &["K", "V"]);
        let model = builder.build();
        let session = IrSession::new();
        let source = SimpleType::of(map).with_arguments(vec![
            TypeArgument::invariant(SimpleType::of(string)),
            TypeArgument::invariant(SimpleType::of(string).nullable()),
        ]);

        let types: Vec<CanonicalType> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        session
                            .type_factory(&model)
                            .create(&source.clone().into())
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(types.iter().all(|t| t == &types[0]));
        // String, String?, Map<String, String?>
        assert_eq!(session.interner().len(), 3);
    }

    #[test]
    fn test_visibility_from_classifier() {
        let mut builder = ModelBuilder::new();
        let hidden = builder.class("demo", "Hidden");
        let mut model = builder.build();
        model.classifiers[hidden.0 as usize].visibility = Visibility::Internal;
        let session = IrSession::new();

        let ty = session
            .type_factory(&model)
            .create_simple(&SimpleType::of(hidden), true)
            .unwrap();
        assert_eq!(ty.visibility(), Visibility::Internal);
    }

    // =========================================
    // Implementation classes
    // =========================================

    #[test]
    fn test_annotation_impl_rendering() {
        let result = assert_compiles(TAGS);
        assert_eq!(result.impls.len(), 1);
        assert_eq!(
            result.impls[0].read().to_string(),
            "public final class demo/Tag.Impl [synthetic-impl]
  public constructor(name: kotlin/String, level: kotlin/Int) primary
    super()
    this._name = name
    this._level = level
  property name: kotlin/String
    field private _name: kotlin/String
    getter public <get-name>(): kotlin/String @NameOverride(\"name\")
  property level: kotlin/Int
    field private _level: kotlin/Int
    getter public <get-level>(): kotlin/Int @NameOverride(\"level\")
"
        );
    }

    #[test]
    fn test_impl_shares_interned_property_types() {
        let result = assert_compiles(TAGS);
        let tag = result.fragment.find("demo/Tag").unwrap().read();
        let impl_class = result.impls[0].read();
        let declared = &tag.property("name").unwrap().ty;
        let field = impl_class.fields().next().unwrap();
        match (declared, &field.ty) {
            (CanonicalType::Simple(a), CanonicalType::Simple(b)) => {
                assert_eq!(a, b);
            }
            _ => panic!("expected simple types"),
        }
    }

    #[test]
    fn test_rerunning_generation_is_stable() {
        let result = assert_compiles(TAGS);
        let generator = SyntheticImplGenerator::new(&result.session);
        let tag = result.fragment.find("demo/Tag").unwrap();

        let again = generator.get_impl_class(tag).unwrap();
        assert!(Arc::ptr_eq(&again, &result.impls[0]));
        generator.generate(&again).unwrap();
        assert_eq!(again.read().fields().count(), 2);
        assert_eq!(again.read().constructors.len(), 1);
    }

    #[test]
    fn test_ir_contains_declarations() {
        assert_ir_contains(TAGS, "public final annotation class demo/Tag [defined]");
        assert_ir_contains(TAGS, "  nested demo/Tag.Impl");
        assert_ir_contains(TAGS, "property cursor: demo/Outer<kotlin/String>.Inner<kotlin/Int>?");
    }

    // =========================================
    // Failures
    // =========================================

    #[test]
    fn test_missing_impl_slot_fails() {
        let json = r#"{
            "files": ["Broken.kt"],
            "classifiers": [
                { "name": "String", "kind": "class", "container": { "package": "kotlin" } },
                { "name": "Broken", "kind": "annotation_class", "container": { "package": "demo" } }
            ],
            "declarations": [
                {
                    "classifier": 1,
                    "properties": [ { "name": "text", "type": { "simple": { "classifier": 0 } } } ]
                }
            ]
        }"#;
        let rendered = assert_compile_fails(json);
        assert!(rendered.contains("error[ES001]"));
        assert!(rendered.contains("demo/Broken"));
    }

    #[test]
    fn test_inner_class_with_missing_arguments_fails() {
        let json = r#"{
            "classifiers": [
                { "name": "Outer", "kind": "class", "container": { "package": "demo" }, "type_parameters": ["T"] },
                { "name": "Inner", "kind": "class", "container": { "classifier": 0 }, "is_inner": true, "type_parameters": ["U"] },
                { "name": "Holder", "kind": "class", "container": { "package": "demo" } }
            ],
            "declarations": [
                {
                    "classifier": 2,
                    "properties": [ { "name": "bad", "type": { "simple": { "classifier": 1 } } } ]
                }
            ]
        }"#;
        let rendered = assert_compile_fails(json);
        assert!(rendered.contains("error[ET002]"));
        assert!(rendered.contains("demo/Outer.Inner"));
    }

    #[test]
    fn test_invalid_json_fails() {
        let rendered = assert_compile_fails("{ \"classifiers\": [ }");
        assert!(rendered.contains("error[EM001]"));
    }
}
