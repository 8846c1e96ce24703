//! Definitions: the statements a namespace exports.
//!
//! A `Definition` is one of the named, exportable statements of an IDL file.
//! Identity is (namespace path, name); the namespace table owns the nodes and
//! everything downstream holds references.

use std::fmt;

use crate::{ConstValue, Ident, Span, TypeRef};

/// Wire field id. Signed 16-bit on the wire.
pub type FieldId = i16;

/// Field requiredness as declared in source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Requiredness {
    Required,
    Optional,
    /// No keyword in source: required-ish on write, optional on read.
    Default,
}

/// A field of a struct-like definition or a function argument.
///
/// Field ids are unique within one struct-like definition. `Required` fields
/// with no default must always be supplied by callers and must be present on
/// a successful decode.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldDefinition {
    pub id: FieldId,
    pub name: Ident,
    pub requiredness: Requiredness,
    pub ty: TypeRef,
    pub default_value: Option<ConstValue>,
    pub span: Span,
}

impl FieldDefinition {
    /// A field with `Default` requiredness and no default value.
    pub fn new(id: FieldId, name: impl Into<String>, ty: TypeRef, span: Span) -> Self {
        FieldDefinition {
            id,
            name: Ident::new(name, span),
            requiredness: Requiredness::Default,
            ty,
            default_value: None,
            span,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.requiredness = Requiredness::Required;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.requiredness = Requiredness::Optional;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: ConstValue) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A service function.
///
/// Argument ids follow declaration order; `throws` fields each name an
/// exception-typed field.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDefinition {
    pub name: Ident,
    pub fields: Vec<FieldDefinition>,
    pub return_type: TypeRef,
    pub throws: Vec<FieldDefinition>,
    pub span: Span,
}

/// Which struct-like flavor a definition is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum StructKind {
    Struct,
    Union,
    Exception,
}

impl fmt::Display for StructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructKind::Struct => f.write_str("struct"),
            StructKind::Union => f.write_str("union"),
            StructKind::Exception => f.write_str("exception"),
        }
    }
}

/// A struct, union, or exception definition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct StructDef {
    pub kind: StructKind,
    pub name: Ident,
    pub fields: Vec<FieldDefinition>,
    pub span: Span,
}

/// A typedef: an alias from one name to another type, possibly chained.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypedefDef {
    pub name: Ident,
    pub alias_of: TypeRef,
    pub span: Span,
}

/// A constant definition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstDef {
    pub name: Ident,
    pub ty: TypeRef,
    pub initializer: ConstValue,
    pub span: Span,
}

/// One member of an enum definition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumMember {
    pub name: Ident,
    /// Explicit value, if written in source. Unvalued members auto-increment
    /// from the previous member.
    pub value: Option<i64>,
    pub span: Span,
}

/// An enum definition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDef {
    pub name: Ident,
    pub members: Vec<EnumMember>,
    pub span: Span,
}

/// A service definition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceDef {
    pub name: Ident,
    /// Dotted reference to the parent service, if any.
    pub extends: Option<Ident>,
    pub functions: Vec<FunctionDefinition>,
    pub span: Span,
}

/// Any named, exportable definition.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Definition {
    Typedef(TypedefDef),
    Const(ConstDef),
    Enum(EnumDef),
    Struct(StructDef),
    Service(ServiceDef),
}

impl Definition {
    /// The defined name.
    pub fn name(&self) -> &str {
        match self {
            Definition::Typedef(def) => &def.name.text,
            Definition::Const(def) => &def.name.text,
            Definition::Enum(def) => &def.name.text,
            Definition::Struct(def) => &def.name.text,
            Definition::Service(def) => &def.name.text,
        }
    }

    /// The source location of the whole definition.
    pub fn span(&self) -> Span {
        match self {
            Definition::Typedef(def) => def.span,
            Definition::Const(def) => def.span,
            Definition::Enum(def) => def.span,
            Definition::Struct(def) => def.span,
            Definition::Service(def) => def.span,
        }
    }

    /// A short noun for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Definition::Typedef(_) => "typedef",
            Definition::Const(_) => "const",
            Definition::Enum(_) => "enum",
            Definition::Struct(def) => match def.kind {
                StructKind::Struct => "struct",
                StructKind::Union => "union",
                StructKind::Exception => "exception",
            },
            Definition::Service(_) => "service",
        }
    }
}
