//! File-level statements.
//!
//! A source file is a flat list of statements: `include`s, `namespace`
//! declarations, and definitions. The namespace table builder consumes these
//! to compute a file's exports; the import extractor walks them to compute
//! what a generated file must import.

use crate::{Definition, Span};

/// An `include "other.idl"` statement.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct IncludeStmt {
    /// The include path as written, e.g. `"shared.idl"`.
    pub path: String,
    pub span: Span,
}

/// A `namespace <scope> <path>` statement, e.g. `namespace js com.test.shared`.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceStmt {
    pub scope: String,
    pub path: String,
    pub span: Span,
}

/// One statement of a source file.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Include(IncludeStmt),
    Namespace(NamespaceStmt),
    Def(Definition),
}

impl Statement {
    /// The definition carried by this statement, if it is one.
    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Statement::Def(def) => Some(def),
            Statement::Include(_) | Statement::Namespace(_) => None,
        }
    }
}
