//! Fatal errors raised while building canonical types and synthetic classes
//!
//! None of these are recoverable: construction of the requested type or
//! class is abandoned and the error is surfaced to the session driver.

use crate::diagnostic::{Diagnostic, ErrorCode};
use crate::span::Span;
use thiserror::Error;

pub type IrResult<T> = std::result::Result<T, IrError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IrError {
    /// The declaration does not contain the nested implementation slot
    #[error("no implementation class found for annotation class `{declaration}`")]
    NoImplClass {
        declaration: String,
        span: Option<Span>,
    },

    /// An implementation class whose declaring class cannot be resolved
    #[error("implementation class `{class}` has no declaring annotation class")]
    MissingParent { class: String },

    /// A classifier index that does not exist in the semantic model
    #[error("unknown classifier #{index}")]
    UnknownClassifier { index: u32 },

    /// A semantic type whose shape contradicts its classifier
    #[error("malformed type `{classifier}`: {reason}")]
    MalformedType { classifier: String, reason: String },

    /// The semantic model itself could not be read
    #[error("invalid semantic model: {0}")]
    Model(String),
}

impl IrError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IrError::NoImplClass { .. } => ErrorCode::NO_IMPL_CLASS,
            IrError::MissingParent { .. } => ErrorCode::MISSING_PARENT,
            IrError::UnknownClassifier { .. } => ErrorCode::UNKNOWN_CLASSIFIER,
            IrError::MalformedType { .. } => ErrorCode::MALFORMED_TYPE,
            IrError::Model(_) => ErrorCode::INVALID_MODEL,
        }
    }

    /// Converts the error into a renderable diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.to_string()).with_code(self.code());
        match self {
            IrError::NoImplClass {
                span: Some(span), ..
            } => diagnostic
                .with_label(*span, "annotation class declared here")
                .with_note("the frontend must declare a nested implementation class slot"),
            IrError::NoImplClass { span: None, .. } => diagnostic
                .with_note("the frontend must declare a nested implementation class slot"),
            _ => diagnostic,
        }
    }
}
