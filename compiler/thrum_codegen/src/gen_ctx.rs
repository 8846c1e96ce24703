//! Per-file generation context.
//!
//! Threads the render state and the per-file options clone through the
//! generation call graph as an explicit argument. No ambient state: the
//! context is created at the top of one file's generation pass and dropped
//! at the end of it.

use thrum_resolve::{Namespace, NamespaceMap, RenderState, ResolveContext};

use crate::CompilerOptions;

/// Everything one file's generation pass carries.
#[derive(Clone, Debug)]
pub struct GenContext<'a> {
    pub state: RenderState<'a>,
    /// Per-file clone; holds the field-promotion cache.
    pub options: CompilerOptions,
}

impl<'a> GenContext<'a> {
    pub fn new(
        namespace: &'a Namespace,
        namespaces: &'a NamespaceMap,
        options: &CompilerOptions,
    ) -> Self {
        GenContext {
            state: RenderState::new(namespace, namespaces),
            options: options.clone(),
        }
    }

    pub fn resolve_context(&self) -> ResolveContext<'a> {
        self.state.resolve_context()
    }
}
