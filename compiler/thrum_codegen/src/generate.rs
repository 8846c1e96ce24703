//! Per-file and per-project generation drivers.
//!
//! A module is generated in one pass over its statements, in source order,
//! with a fresh [`GenContext`] that is dropped afterwards. Files are
//! independent, so project generation fans out with `rayon`; nothing mutable
//! is shared between files.

use rayon::prelude::*;

use thrum_diagnostic::{Diagnostic, ErrorCode};
use thrum_ir::{Definition, EnumDef, Statement};
use thrum_resolve::{identifiers_for_statements, resolve_const_value, Namespace, NamespaceMap};
use thrum_runtime::CodecRegistry;

use crate::decl::{AliasDecl, ConstDecl, Decl, EnumDecl, EnumMemberDecl, Module};
use crate::service_gen::generate_service;
use crate::struct_gen::generate_struct;
use crate::types::type_expr;
use crate::{CompilerOptions, GenContext};

/// One input file: the accessor its namespace is registered under, plus its
/// statements.
#[derive(Clone, Debug)]
pub struct ProjectFile {
    pub accessor: String,
    pub statements: Vec<Statement>,
}

impl ProjectFile {
    pub fn new(accessor: impl Into<String>, statements: Vec<Statement>) -> Self {
        ProjectFile {
            accessor: accessor.into(),
            statements,
        }
    }
}

/// Generate the output module for one file.
#[tracing::instrument(level = "debug", skip_all, fields(namespace = %namespace.path))]
pub fn generate_module(
    statements: &[Statement],
    namespace: &Namespace,
    namespaces: &NamespaceMap,
    options: &CompilerOptions,
) -> Result<Module, Diagnostic> {
    let mut ctx = GenContext::new(namespace, namespaces, options);
    let imports = identifiers_for_statements(statements, &ctx.state)?;

    let mut decls = Vec::new();
    for statement in statements {
        let Some(def) = statement.as_definition() else {
            continue;
        };
        let decl = match def {
            Definition::Typedef(typedef) => Decl::Alias(AliasDecl {
                name: typedef.name.text.clone(),
                ty: type_expr(&typedef.alias_of, &ctx.state)?,
            }),
            Definition::Enum(def) => Decl::Enum(enum_decl(def)),
            Definition::Const(def) => Decl::Const(ConstDecl {
                name: def.name.text.clone(),
                ty: type_expr(&def.ty, &ctx.state)?,
                value: resolve_const_value(&def.initializer, &def.ty, ctx.resolve_context())?,
            }),
            Definition::Struct(def) => Decl::Struct(generate_struct(def, &mut ctx)?),
            Definition::Service(def) => Decl::Service(generate_service(def, &mut ctx)?),
        };
        decls.push(decl);
        ctx.state.mark_generated(def.name());
    }

    tracing::debug!(decls = decls.len(), "module generation complete");
    Ok(Module {
        namespace_path: namespace.path.clone(),
        imports,
        decls,
    })
}

/// Resolve enum member values: explicit values stand, unvalued members
/// increment from the previous member, starting at zero.
fn enum_decl(def: &EnumDef) -> EnumDecl {
    let mut next = 0;
    let members = def
        .members
        .iter()
        .map(|member| {
            let value = member.value.unwrap_or(next);
            next = value + 1;
            EnumMemberDecl {
                name: member.name.text.clone(),
                value,
            }
        })
        .collect();

    EnumDecl {
        name: def.name.text.clone(),
        members,
    }
}

/// Generate every file of a project, in parallel.
///
/// Returns all modules, or every per-file diagnostic when any file fails —
/// a failing file produces no partial output.
pub fn generate_project(
    files: &[ProjectFile],
    namespaces: &NamespaceMap,
    options: &CompilerOptions,
) -> Result<Vec<Module>, Vec<Diagnostic>> {
    let results: Vec<Result<Module, Diagnostic>> = files
        .par_iter()
        .map(|file| {
            let namespace = namespaces.get(&file.accessor).ok_or_else(|| {
                Diagnostic::error(ErrorCode::E1104).with_message(format!(
                    "project file references unknown namespace accessor `{}`",
                    file.accessor
                ))
            })?;
            generate_module(&file.statements, namespace, namespaces, options)
        })
        .collect();

    let mut modules = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(module) => modules.push(module),
            Err(diag) => errors.push(diag),
        }
    }
    if errors.is_empty() {
        Ok(modules)
    } else {
        Err(errors)
    }
}

/// Collect every generated codec plan into a registry, keyed by qualified
/// name. Service method structs register under the service's namespace.
pub fn build_registry(modules: &[Module]) -> CodecRegistry {
    let mut registry = CodecRegistry::new();
    for module in modules {
        for decl in &module.decls {
            match decl {
                Decl::Struct(artifact) => {
                    registry.insert(artifact.codec_key.clone(), artifact.codec.clone());
                }
                Decl::Service(artifact) => {
                    for method_struct in &artifact.method_structs {
                        registry
                            .insert(method_struct.codec_key.clone(), method_struct.codec.clone());
                    }
                }
                Decl::Alias(_) | Decl::Enum(_) | Decl::Const(_) => {}
            }
        }
    }
    registry
}
