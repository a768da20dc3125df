//! Structured error taxonomy for the evaluator and type inferencer.
//!
//! Extends the teacher's `thiserror`-derived style with the variants
//! the spec's evaluator and inferencer require.

use crate::symbol::Symbol;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SchemeError {
    #[error("not a boolean")]
    NonBooleanExpression,

    #[error("symbol not found: {0}")]
    SymbolNotFound(Symbol),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("recursive unification of {0} with itself")]
    RecursiveUnification(String),

    #[error("{0}")]
    ArityOrShape(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error("parse error: {0}")]
    Parser(String),
}

pub type Result<T> = std::result::Result<T, SchemeError>;
