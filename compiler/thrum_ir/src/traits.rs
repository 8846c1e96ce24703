//! Small shared traits over IR nodes.

use crate::{Definition, FieldDefinition, FunctionDefinition, Ident, Span, TypeRef};

/// Nodes that carry a source location.
pub trait Spanned {
    fn span(&self) -> Span;
}

/// Nodes that carry a declared name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for TypeRef {
    fn span(&self) -> Span {
        TypeRef::span(self)
    }
}

impl Spanned for FieldDefinition {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for FunctionDefinition {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for Definition {
    fn span(&self) -> Span {
        Definition::span(self)
    }
}

impl Named for Ident {
    fn name(&self) -> &str {
        &self.text
    }
}

impl Named for FieldDefinition {
    fn name(&self) -> &str {
        &self.name.text
    }
}

impl Named for FunctionDefinition {
    fn name(&self) -> &str {
        &self.name.text
    }
}

impl Named for Definition {
    fn name(&self) -> &str {
        Definition::name(self)
    }
}
