//! Name qualification.
//!
//! Given a dotted name and the render state of the file being generated,
//! compute the reference the emitter should print. Three cases, in priority
//! order: local export, included-namespace alias, single-segment builtin
//! pass-through.

use thrum_diagnostic::{Diagnostic, ErrorCode};
use thrum_ir::{split_dotted, Definition};

use crate::RenderState;

/// The synthetic container generated constants are qualified under.
pub const CONSTANTS_CONTAINER: &str = "__CONSTANTS__";

/// The qualified form of one identifier occurrence.
///
/// Computed on demand per occurrence; its shape depends on the current
/// file's already-generated definitions, so it is never cached across files.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ResolvedIdentifier {
    /// The name exactly as written in source.
    pub raw_name: String,
    /// The local symbol the name refers to.
    pub name: String,
    /// Everything after the first segment, or the whole name if undotted.
    pub base_name: String,
    /// Module/namespace qualifier to prefix, or `None` for same-module
    /// references.
    pub path_name: Option<String>,
    /// The exact reference to emit.
    pub full_name: String,
}

/// Compute the qualified reference for `name` in the file being rendered.
pub fn resolve_identifier_name(
    name: &str,
    state: &RenderState<'_>,
) -> Result<ResolvedIdentifier, Diagnostic> {
    let current = state.current_namespace;
    let (path_name, tail) = split_dotted(name);
    let base_name = tail.unwrap_or(path_name);

    // The name is exported by the namespace being generated.
    if let Some(definition) = current.exports.get(path_name) {
        if state.current_definitions.contains(path_name) {
            return Ok(ResolvedIdentifier {
                raw_name: name.to_string(),
                name: path_name.to_string(),
                base_name: base_name.to_string(),
                path_name: None,
                full_name: name.to_string(),
            });
        }

        let root_name = match definition {
            Definition::Const(_) => CONSTANTS_CONTAINER,
            _ => path_name,
        };

        // Services do not re-export a value under their own name, so the
        // reference is the root alone.
        if let Definition::Service(_) = definition {
            return Ok(ResolvedIdentifier {
                raw_name: name.to_string(),
                name: path_name.to_string(),
                base_name: base_name.to_string(),
                path_name: Some(root_name.to_string()),
                full_name: root_name.to_string(),
            });
        }

        return Ok(ResolvedIdentifier {
            raw_name: name.to_string(),
            name: path_name.to_string(),
            base_name: base_name.to_string(),
            path_name: Some(root_name.to_string()),
            full_name: format!("{root_name}.{name}"),
        });
    }

    // The name reaches into an included namespace: keep it as written and
    // let the emitter turn the alias into an import-qualified reference.
    if current.included_namespaces.contains_key(path_name) {
        return Ok(ResolvedIdentifier {
            raw_name: name.to_string(),
            name: base_name.to_string(),
            base_name: base_name.to_string(),
            path_name: Some(path_name.to_string()),
            full_name: name.to_string(),
        });
    }

    // A bare single-segment name that matched nothing is assumed to be a
    // builtin type name and passes through unchanged.
    if tail.is_none() {
        return Ok(ResolvedIdentifier {
            raw_name: name.to_string(),
            name: path_name.to_string(),
            base_name: base_name.to_string(),
            path_name: None,
            full_name: name.to_string(),
        });
    }

    Err(Diagnostic::error(ErrorCode::E1103).with_message(format!(
        "unable to resolve identifier `{name}` in namespace `{}`",
        current.path
    )))
}
