//! Type references.
//!
//! A `TypeRef` is how a field, argument, constant, or return type names its
//! type. Identifier references are not normalized at parse time: the same
//! node can resolve differently depending on which namespace's resolution
//! context it is resolved under.

use std::fmt;

use crate::{Ident, Span};

/// Builtin base types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    /// Only legal as a function return type.
    Void,
}

impl BaseType {
    /// The IDL keyword for this type.
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Bool => "bool",
            BaseType::I8 => "i8",
            BaseType::I16 => "i16",
            BaseType::I32 => "i32",
            BaseType::I64 => "i64",
            BaseType::Double => "double",
            BaseType::String => "string",
            BaseType::Binary => "binary",
            BaseType::Void => "void",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A reference to a type as written in source.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeRef {
    Base(BaseType, Span),
    /// A possibly-dotted identifier, resolved lazily.
    Named(Ident),
    List(Box<TypeRef>, Span),
    Set(Box<TypeRef>, Span),
    Map(Box<TypeRef>, Box<TypeRef>, Span),
}

impl TypeRef {
    /// Shorthand for a base type with a dummy span.
    pub fn base(base: BaseType) -> Self {
        TypeRef::Base(base, Span::DUMMY)
    }

    /// Shorthand for a named type reference.
    pub fn named(name: impl Into<String>, span: Span) -> Self {
        TypeRef::Named(Ident::new(name, span))
    }

    /// The source location of this type reference.
    pub fn span(&self) -> Span {
        match self {
            TypeRef::Base(_, span)
            | TypeRef::List(_, span)
            | TypeRef::Set(_, span)
            | TypeRef::Map(_, _, span) => *span,
            TypeRef::Named(ident) => ident.span,
        }
    }

    /// Whether this is the `bool` base type.
    pub fn is_bool(&self) -> bool {
        matches!(self, TypeRef::Base(BaseType::Bool, _))
    }

    /// Whether this is the `void` base type.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Base(BaseType::Void, _))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Base(base, _) => write!(f, "{base}"),
            TypeRef::Named(ident) => write!(f, "{ident}"),
            TypeRef::List(elem, _) => write!(f, "list<{elem}>"),
            TypeRef::Set(elem, _) => write!(f, "set<{elem}>"),
            TypeRef::Map(key, value, _) => write!(f, "map<{key}, {value}>"),
        }
    }
}
