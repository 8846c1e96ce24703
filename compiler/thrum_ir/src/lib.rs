//! Thrum IR - Intermediate Representation Types
//!
//! This crate contains the core data structures for the Thrum IDL compiler:
//! - Spans for source locations
//! - Dotted identifiers and the one shared splitting helper
//! - Type references (`TypeRef`) and base types
//! - Constant value trees (`ConstValue`)
//! - Definitions (typedef, const, enum, struct-like, service)
//! - File statements (include, namespace, definition)
//!
//! The IR arrives from an external parser as a ready-made tree with source
//! locations attached; nothing in this crate re-parses text.
//!
//! # Design Philosophy
//!
//! - **Closed sums everywhere**: every dispatch over definition, type, or
//!   constant kinds is an exhaustive `match`, so a new IDL construct is a
//!   compile-time-enforced checklist.
//! - **Names stay textual**: identifiers are dotted strings whose meaning
//!   depends on the namespace they are resolved under, so they are kept
//!   unresolved in the tree and interpreted lazily by the resolver.

mod const_value;
mod def;
mod ident;
mod span;
mod statement;
mod traits;
mod types;

pub use const_value::{ConstEntry, ConstKind, ConstValue};
pub use def::{
    ConstDef, Definition, EnumDef, EnumMember, FieldDefinition, FieldId, FunctionDefinition,
    Requiredness, ServiceDef, StructDef, StructKind, TypedefDef,
};
pub use ident::{split_dotted, Ident};
pub use span::Span;
pub use statement::{IncludeStmt, NamespaceStmt, Statement};
pub use traits::{Named, Spanned};
pub use types::{BaseType, TypeRef};
