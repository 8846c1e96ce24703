//! Constant value trees.
//!
//! Initializers of `const` definitions and field default values. Integer
//! literals keep their raw source text: the one permitted implicit coercion
//! (int → bool) is only legal for the literal texts `"0"` and `"1"`.

use std::fmt;

use crate::Span;

/// A key/value pair in a map literal.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstEntry {
    pub key: ConstValue,
    pub value: ConstValue,
}

/// The kind of a constant value.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstKind {
    /// Integer literal, keeping the raw source text.
    Int { text: String, value: i64 },
    Double(f64),
    String(String),
    Bool(bool),
    /// A reference to another constant (or an enum member), by dotted name.
    Ident(String),
    List(Vec<ConstValue>),
    Map(Vec<ConstEntry>),
}

/// A constant value with its source location.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstValue {
    pub kind: ConstKind,
    pub span: Span,
}

impl ConstValue {
    pub fn new(kind: ConstKind, span: Span) -> Self {
        ConstValue { kind, span }
    }

    /// An integer literal whose text is the canonical decimal rendering.
    pub fn int(value: i64, span: Span) -> Self {
        ConstValue::new(
            ConstKind::Int {
                text: value.to_string(),
                value,
            },
            span,
        )
    }

    /// An integer literal with explicit source text.
    pub fn int_text(text: impl Into<String>, value: i64, span: Span) -> Self {
        ConstValue::new(
            ConstKind::Int {
                text: text.into(),
                value,
            },
            span,
        )
    }

    pub fn double(value: f64, span: Span) -> Self {
        ConstValue::new(ConstKind::Double(value), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Self {
        ConstValue::new(ConstKind::String(value.into()), span)
    }

    pub fn bool_lit(value: bool, span: Span) -> Self {
        ConstValue::new(ConstKind::Bool(value), span)
    }

    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        ConstValue::new(ConstKind::Ident(name.into()), span)
    }

    pub fn list(elements: Vec<ConstValue>, span: Span) -> Self {
        ConstValue::new(ConstKind::List(elements), span)
    }

    pub fn map(entries: Vec<ConstEntry>, span: Span) -> Self {
        ConstValue::new(ConstKind::Map(entries), span)
    }

    /// Whether any identifier reference is reachable from this value.
    pub fn references_identifiers(&self) -> bool {
        match &self.kind {
            ConstKind::Ident(_) => true,
            ConstKind::List(elements) => elements.iter().any(ConstValue::references_identifiers),
            ConstKind::Map(entries) => entries
                .iter()
                .any(|e| e.key.references_identifiers() || e.value.references_identifiers()),
            ConstKind::Int { .. }
            | ConstKind::Double(_)
            | ConstKind::String(_)
            | ConstKind::Bool(_) => false,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConstKind::Int { text, .. } => f.write_str(text),
            ConstKind::Double(value) => write!(f, "{value}"),
            ConstKind::String(value) => write!(f, "{value:?}"),
            ConstKind::Bool(value) => write!(f, "{value}"),
            ConstKind::Ident(name) => f.write_str(name),
            ConstKind::List(elements) => {
                f.write_str("[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                f.write_str("]")
            }
            ConstKind::Map(entries) => {
                f.write_str("{")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", entry.key, entry.value)?;
                }
                f.write_str("}")
            }
        }
    }
}
