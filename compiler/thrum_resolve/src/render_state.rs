//! Per-file render state.
//!
//! The state of the file currently being generated. Scoped to one file's
//! generation pass and discarded afterwards — nothing here may leak across
//! files, because qualified references depend on which definitions this
//! particular file has already generated.

use rustc_hash::FxHashSet;

use crate::{Namespace, NamespaceMap, ResolveContext};

/// Render state for one file's generation pass.
#[derive(Clone, Debug)]
pub struct RenderState<'a> {
    /// The namespace of the file being generated.
    pub current_namespace: &'a Namespace,
    /// The whole project's namespace table.
    pub namespaces: &'a NamespaceMap,
    /// Names of definitions already generated into this file. References to
    /// these are emitted unqualified.
    pub current_definitions: FxHashSet<String>,
}

impl<'a> RenderState<'a> {
    pub fn new(current_namespace: &'a Namespace, namespaces: &'a NamespaceMap) -> Self {
        RenderState {
            current_namespace,
            namespaces,
            current_definitions: FxHashSet::default(),
        }
    }

    /// Record that a definition has been generated into the current file.
    pub fn mark_generated(&mut self, name: impl Into<String>) {
        self.current_definitions.insert(name.into());
    }

    /// The resolution context rooted at the current namespace.
    pub fn resolve_context(&self) -> ResolveContext<'a> {
        ResolveContext::new(self.current_namespace, self.namespaces)
    }
}
