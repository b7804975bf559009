//! Canonical identifier resolution

use crate::types::{ClassifierId, ClassifierIdKind, ClassifierPath};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use tracing::trace;
use weft_descriptors::{ClassifierIdx, ClassifierKind, Container, SemanticModel};
use weft_error::IrResult;

/// Maps classifiers to shared [`ClassifierId`]s.
///
/// The ID depends only on the container chain and names, so a class loaded
/// from a dependency and the same class declared in source resolve to the
/// same ID.
pub struct ClassifierIdResolver {
    ids: DashMap<ClassifierPath, ClassifierId, FxBuildHasher>,
}

impl Default for ClassifierIdResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierIdResolver {
    pub fn new() -> Self {
        Self {
            ids: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn resolve(&self, model: &SemanticModel, idx: ClassifierIdx) -> IrResult<ClassifierId> {
        let path = Self::path_of(model, idx)?;
        Ok(self.canonical(path))
    }

    /// ID of a class named `name` nested directly in `outer`
    pub fn nested(&self, outer: &ClassifierId, name: &str) -> ClassifierId {
        let mut segments = outer.path().segments.clone();
        segments.push(name.to_string());
        self.canonical(ClassifierPath {
            package: outer.package().to_string(),
            segments,
            kind: ClassifierIdKind::Class,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn canonical(&self, path: ClassifierPath) -> ClassifierId {
        match self.ids.entry(path) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let id = ClassifierId::from_path(Arc::new(entry.key().clone()));
                trace!(%id, "new classifier id");
                entry.insert(id.clone());
                id
            }
        }
    }

    fn path_of(model: &SemanticModel, idx: ClassifierIdx) -> IrResult<ClassifierPath> {
        let descriptor = model.classifier(idx)?;
        let kind = match descriptor.kind {
            ClassifierKind::TypeAlias => ClassifierIdKind::TypeAlias,
            ClassifierKind::TypeParameter => ClassifierIdKind::TypeParameter,
            _ => ClassifierIdKind::Class,
        };

        let mut segments = vec![descriptor.name.clone()];
        let mut container = &descriptor.container;
        let package = loop {
            match container {
                Container::Package(package) => break package.clone(),
                Container::Classifier(parent) => {
                    let parent = model.classifier(*parent)?;
                    segments.push(parent.name.clone());
                    container = &parent.container;
                }
            }
        };
        segments.reverse();

        Ok(ClassifierPath {
            package,
            segments,
            kind,
        })
    }
}
