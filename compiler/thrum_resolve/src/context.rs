//! Resolution context: which namespace a lookup starts from.

use thrum_diagnostic::{Diagnostic, ErrorCode};
use thrum_ir::Span;

use crate::{Namespace, NamespaceMap};

/// A resolution context: the namespace a dotted name is being resolved
/// under, plus the full table for include hops.
#[derive(Copy, Clone, Debug)]
pub struct ResolveContext<'a> {
    pub current: &'a Namespace,
    pub namespaces: &'a NamespaceMap,
}

impl<'a> ResolveContext<'a> {
    pub fn new(current: &'a Namespace, namespaces: &'a NamespaceMap) -> Self {
        ResolveContext {
            current,
            namespaces,
        }
    }

    /// The context for the namespace behind an include alias of the current
    /// namespace, if the alias is known.
    ///
    /// Returns an error when the alias is registered but its accessor is
    /// missing from the table — an inconsistency in the loader-supplied
    /// wiring.
    pub fn enter_include(self, alias: &str, span: Span) -> Option<Result<Self, Diagnostic>> {
        let accessor = self.current.include_accessor(alias)?;
        Some(match self.namespaces.get(accessor) {
            Some(next) => Ok(ResolveContext::new(next, self.namespaces)),
            None => Err(Diagnostic::error(ErrorCode::E1104)
                .with_message(format!(
                    "include alias `{alias}` points at unknown namespace accessor `{accessor}`"
                ))
                .with_label(span, "referenced here")
                .with_note(format!(
                    "while resolving in namespace `{}`",
                    self.current.path
                ))),
        })
    }
}
