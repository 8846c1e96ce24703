//! Dotted-identifier resolution.
//!
//! Resolves a dotted name to its defining statement, hopping through include
//! aliases and unwrapping typedef chains. Typedef unwrapping tracks visited
//! definitions and reports a cycle instead of recursing unboundedly.

use rustc_hash::FxHashSet;

use thrum_diagnostic::{Diagnostic, ErrorCode};
use thrum_ir::{split_dotted, Definition, Span, TypeRef};

use crate::{Namespace, ResolveContext};

/// A resolved definition together with the namespace that defines it.
/// (namespace path, name) is the definition's identity.
#[derive(Copy, Clone, Debug)]
pub struct ResolvedDefinition<'a> {
    pub definition: &'a Definition,
    /// The defining namespace.
    pub namespace: &'a Namespace,
}

impl<'a> ResolvedDefinition<'a> {
    /// The `namespace.Name` identity of the definition.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace.path, self.definition.name())
    }
}

/// Resolve a dotted identifier to its defining statement.
///
/// The head segment is looked up in the current namespace's exports first.
/// A hit that is a typedef aliasing another identifier unwraps, repeatedly,
/// until a non-typedef definition or a typedef aliasing a non-identifier
/// type is reached; that terminal definition is returned as-is. If the head
/// is instead an include alias (direct or indirect), resolution recurses
/// into that namespace with the remaining dotted tail.
pub fn resolve_identifier_definition<'a>(
    name: &str,
    span: Span,
    ctx: ResolveContext<'a>,
) -> Result<ResolvedDefinition<'a>, Diagnostic> {
    let mut visited = FxHashSet::default();
    resolve_in(name, span, ctx, &mut visited)
}

fn resolve_in<'a>(
    name: &str,
    span: Span,
    ctx: ResolveContext<'a>,
    visited: &mut FxHashSet<(String, String)>,
) -> Result<ResolvedDefinition<'a>, Diagnostic> {
    let (head, tail) = split_dotted(name);

    if let Some(definition) = ctx.current.exports.get(head) {
        if let Definition::Typedef(typedef) = definition {
            if let TypeRef::Named(alias) = &typedef.alias_of {
                if !visited.insert((ctx.current.path.clone(), head.to_string())) {
                    return Err(typedef_cycle(head, &ctx.current.path, span));
                }
                return resolve_in(&alias.text, span, ctx, visited);
            }
        }
        return Ok(ResolvedDefinition {
            definition,
            namespace: ctx.current,
        });
    }

    if let Some(entered) = ctx.enter_include(head, span) {
        let next = entered?;
        let Some(tail) = tail else {
            return Err(unresolved(name, &ctx.current.path, span)
                .with_note("an include alias alone does not name a definition"));
        };
        return resolve_in(tail, span, next, visited);
    }

    Err(unresolved(name, &ctx.current.path, span))
}

fn unresolved(name: &str, namespace: &str, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1101)
        .with_message(format!(
            "unable to resolve identifier `{name}` in namespace `{namespace}`"
        ))
        .with_label(span, "not found")
}

fn typedef_cycle(name: &str, namespace: &str, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1102)
        .with_message(format!(
            "typedef `{name}` in namespace `{namespace}` is part of an alias cycle"
        ))
        .with_label(span, "resolution of this identifier never terminates")
        .with_note("break the cycle by aliasing a concrete type")
}
