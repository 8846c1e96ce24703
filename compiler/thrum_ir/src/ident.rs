//! Dotted identifiers.
//!
//! An identifier as written in IDL source may be dotted
//! (`shared.SharedStruct`, `Colors.RED`). Its meaning depends on the
//! namespace it is resolved under, so the tree keeps the raw text and the
//! resolver interprets it lazily. All dotted-name splitting goes through
//! [`split_dotted`] so the resolver and the constant inliner agree on
//! segment semantics.

use std::fmt;

use crate::Span;

/// Split a dotted name into its head segment and the remaining tail.
///
/// The tail keeps its own internal dots: `"a.b.c"` → `("a", Some("b.c"))`,
/// `"a"` → `("a", None)`.
#[inline]
pub fn split_dotted(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (name, None),
    }
}

/// A possibly-dotted identifier with its source location.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

impl Ident {
    /// Create a new identifier.
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Ident {
            text: text.into(),
            span,
        }
    }

    /// Create an identifier with a dummy span, for synthesized nodes.
    pub fn synthetic(text: impl Into<String>) -> Self {
        Ident::new(text, Span::DUMMY)
    }

    /// The first dotted segment.
    pub fn head(&self) -> &str {
        split_dotted(&self.text).0
    }

    /// Everything after the first dot, if any.
    pub fn tail(&self) -> Option<&str> {
        split_dotted(&self.text).1
    }

    /// Whether the identifier has more than one segment.
    pub fn is_dotted(&self) -> bool {
        self.text.contains('.')
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({} @ {})", self.text, self.span)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_dotted_single_segment() {
        assert_eq!(split_dotted("Foo"), ("Foo", None));
    }

    #[test]
    fn test_split_dotted_keeps_tail_dots() {
        assert_eq!(split_dotted("a.b.c"), ("a", Some("b.c")));
    }

    #[test]
    fn test_ident_head_tail() {
        let id = Ident::synthetic("shared.SharedStruct");
        assert!(id.is_dotted());
        assert_eq!(id.head(), "shared");
        assert_eq!(id.tail(), Some("SharedStruct"));

        let plain = Ident::synthetic("Local");
        assert!(!plain.is_dotted());
        assert_eq!(plain.head(), "Local");
        assert_eq!(plain.tail(), None);
    }
}
