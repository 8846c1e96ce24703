//! Import extraction.
//!
//! Walks a file's statements and produces the set of identifiers the
//! generated file must import. The complicating factor: a file may need an
//! identifier not literally present in its tree. If a field's declared type
//! is a typedef that aliases, say, a map, the generated codec must also know
//! the map's key and value types to encode and decode the field, so those
//! identifiers are collected too.

use std::collections::BTreeSet;

use thrum_diagnostic::Diagnostic;
use thrum_ir::{ConstKind, ConstValue, Definition, Statement, TypeRef};

use crate::{resolve_identifier_definition, RenderState};

/// Collect the identifiers the given statements require, sorted.
///
/// Per statement kind: include/namespace/enum statements contribute nothing;
/// constants contribute their declared type and initializer references;
/// typedefs contribute their aliased type without typedef-chasing; struct,
/// union, and exception fields contribute their types with typedef-chasing
/// plus default-value references; services contribute the `extends` target
/// and, per function, argument, throws, and return types, all chased.
#[tracing::instrument(level = "debug", skip_all)]
pub fn identifiers_for_statements(
    statements: &[Statement],
    state: &RenderState<'_>,
) -> Result<Vec<String>, Diagnostic> {
    let mut results = BTreeSet::new();

    for statement in statements {
        match statement {
            Statement::Include(_) | Statement::Namespace(_) => {}

            Statement::Def(def) => match def {
                Definition::Enum(_) => {}

                Definition::Const(def) => {
                    identifiers_for_field_type(&def.ty, &mut results, state, false)?;
                    identifiers_for_const_value(Some(&def.initializer), &mut results);
                }

                Definition::Typedef(def) => {
                    identifiers_for_field_type(&def.alias_of, &mut results, state, false)?;
                }

                Definition::Struct(def) => {
                    for field in &def.fields {
                        identifiers_for_field_type(&field.ty, &mut results, state, true)?;
                        identifiers_for_const_value(field.default_value.as_ref(), &mut results);
                    }
                }

                Definition::Service(def) => {
                    if let Some(extends) = &def.extends {
                        results.insert(extends.text.clone());
                    }

                    for function in &def.functions {
                        for field in function.fields.iter().chain(&function.throws) {
                            identifiers_for_field_type(&field.ty, &mut results, state, true)?;
                            identifiers_for_const_value(field.default_value.as_ref(), &mut results);
                        }
                        identifiers_for_field_type(
                            &function.return_type,
                            &mut results,
                            state,
                            true,
                        )?;
                    }
                }
            },
        }
    }

    Ok(results.into_iter().collect())
}

/// Collect identifiers from a type reference.
///
/// With `resolve_typedefs`, an identifier that resolves to a typedef also
/// contributes the identifiers of the typedef's aliased type — the codec for
/// a field of that type needs the true underlying shape.
fn identifiers_for_field_type(
    field_type: &TypeRef,
    results: &mut BTreeSet<String>,
    state: &RenderState<'_>,
    resolve_typedefs: bool,
) -> Result<(), Diagnostic> {
    match field_type {
        TypeRef::Named(ident) => {
            if resolve_typedefs {
                let resolved =
                    resolve_identifier_definition(&ident.text, ident.span, state.resolve_context())?;
                if let Definition::Typedef(typedef) = resolved.definition {
                    identifiers_for_field_type(&typedef.alias_of, results, state, false)?;
                }
            }
            results.insert(ident.text.clone());
        }

        TypeRef::Map(key, value, _) => {
            identifiers_for_field_type(key, results, state, false)?;
            identifiers_for_field_type(value, results, state, false)?;
        }

        TypeRef::Set(elem, _) | TypeRef::List(elem, _) => {
            identifiers_for_field_type(elem, results, state, false)?;
        }

        TypeRef::Base(..) => {}
    }
    Ok(())
}

/// Collect identifiers referenced inside a constant value, transitively
/// through list and map literals.
fn identifiers_for_const_value(value: Option<&ConstValue>, results: &mut BTreeSet<String>) {
    let Some(value) = value else {
        return;
    };
    match &value.kind {
        ConstKind::Ident(name) => {
            results.insert(name.clone());
        }
        ConstKind::List(elements) => {
            for element in elements {
                identifiers_for_const_value(Some(element), results);
            }
        }
        ConstKind::Map(entries) => {
            for entry in entries {
                identifiers_for_const_value(Some(&entry.key), results);
                identifiers_for_const_value(Some(&entry.value), results);
            }
        }
        ConstKind::Int { .. } | ConstKind::Double(_) | ConstKind::String(_) | ConstKind::Bool(_) => {
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Namespace, NamespaceMap};
    use pretty_assertions::assert_eq;
    use thrum_ir::{
        BaseType, ConstDef, EnumDef, FieldDefinition, FunctionDefinition, Ident, ServiceDef, Span,
        StructDef, StructKind, TypedefDef,
    };

    fn named(name: &str) -> TypeRef {
        TypeRef::named(name, Span::DUMMY)
    }

    fn project_with(defs: Vec<Definition>) -> (Namespace, NamespaceMap) {
        let mut ns = Namespace::new("root");
        for def in defs {
            ns.add_definition(def);
        }
        (ns, NamespaceMap::new())
    }

    #[test]
    fn test_enum_contributes_nothing() {
        let statements = vec![Statement::Def(Definition::Enum(EnumDef {
            name: Ident::synthetic("Colors"),
            members: vec![],
            span: Span::DUMMY,
        }))];
        let (ns, map) = project_with(vec![]);
        let state = RenderState::new(&ns, &map);
        let imports =
            identifiers_for_statements(&statements, &state).unwrap_or_else(|d| panic!("{d}"));
        assert!(imports.is_empty());
    }

    #[test]
    fn test_const_contributes_type_and_initializer() {
        let statements = vec![Statement::Def(Definition::Const(ConstDef {
            name: Ident::synthetic("FALLBACK"),
            ty: named("Size"),
            initializer: ConstValue::ident("Size.SMALL", Span::DUMMY),
            span: Span::DUMMY,
        }))];
        let (ns, map) = project_with(vec![Definition::Enum(EnumDef {
            name: Ident::synthetic("Size"),
            members: vec![],
            span: Span::DUMMY,
        })]);
        let state = RenderState::new(&ns, &map);
        let imports =
            identifiers_for_statements(&statements, &state).unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(imports, vec!["Size".to_string(), "Size.SMALL".to_string()]);
    }

    #[test]
    fn test_typedef_contributes_without_chasing() {
        // typedef OtherAlias MyAlias — OtherAlias's own dependencies are not
        // pulled in at this point.
        let statements = vec![Statement::Def(Definition::Typedef(TypedefDef {
            name: Ident::synthetic("MyAlias"),
            alias_of: named("OtherAlias"),
            span: Span::DUMMY,
        }))];
        let (ns, map) = project_with(vec![Definition::Typedef(TypedefDef {
            name: Ident::synthetic("OtherAlias"),
            alias_of: TypeRef::Map(
                Box::new(named("KeyType")),
                Box::new(named("ValueType")),
                Span::DUMMY,
            ),
            span: Span::DUMMY,
        })]);
        let state = RenderState::new(&ns, &map);
        let imports =
            identifiers_for_statements(&statements, &state).unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(imports, vec!["OtherAlias".to_string()]);
    }

    #[test]
    fn test_struct_field_chases_typedefs() {
        // typedef map<KeyType, ValueType> Lookup; struct S { 1: Lookup table }
        // The codec for `table` needs KeyType and ValueType too.
        let lookup = Definition::Typedef(TypedefDef {
            name: Ident::synthetic("Lookup"),
            alias_of: TypeRef::Map(
                Box::new(named("KeyType")),
                Box::new(named("ValueType")),
                Span::DUMMY,
            ),
            span: Span::DUMMY,
        });
        let key_type = Definition::Struct(StructDef {
            kind: StructKind::Struct,
            name: Ident::synthetic("KeyType"),
            fields: vec![],
            span: Span::DUMMY,
        });
        let value_type = Definition::Struct(StructDef {
            kind: StructKind::Struct,
            name: Ident::synthetic("ValueType"),
            fields: vec![],
            span: Span::DUMMY,
        });
        let statements = vec![Statement::Def(Definition::Struct(StructDef {
            kind: StructKind::Struct,
            name: Ident::synthetic("S"),
            fields: vec![FieldDefinition::new(1, "table", named("Lookup"), Span::DUMMY)],
            span: Span::DUMMY,
        }))];

        let (ns, map) = project_with(vec![lookup, key_type, value_type]);
        let state = RenderState::new(&ns, &map);
        let imports =
            identifiers_for_statements(&statements, &state).unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(
            imports,
            vec![
                "KeyType".to_string(),
                "Lookup".to_string(),
                "ValueType".to_string()
            ]
        );
    }

    #[test]
    fn test_service_contributes_extends_and_signature_types() {
        let parent = Definition::Service(ServiceDef {
            name: Ident::synthetic("Base"),
            extends: None,
            functions: vec![],
            span: Span::DUMMY,
        });
        let arg_struct = Definition::Struct(StructDef {
            kind: StructKind::Struct,
            name: Ident::synthetic("Query"),
            fields: vec![],
            span: Span::DUMMY,
        });
        let err_struct = Definition::Struct(StructDef {
            kind: StructKind::Exception,
            name: Ident::synthetic("NotFound"),
            fields: vec![],
            span: Span::DUMMY,
        });
        let ret_struct = Definition::Struct(StructDef {
            kind: StructKind::Struct,
            name: Ident::synthetic("Hit"),
            fields: vec![],
            span: Span::DUMMY,
        });

        let statements = vec![Statement::Def(Definition::Service(ServiceDef {
            name: Ident::synthetic("Search"),
            extends: Some(Ident::synthetic("Base")),
            functions: vec![FunctionDefinition {
                name: Ident::synthetic("lookup"),
                fields: vec![FieldDefinition::new(1, "query", named("Query"), Span::DUMMY)],
                return_type: named("Hit"),
                throws: vec![FieldDefinition::new(
                    1,
                    "notFound",
                    named("NotFound"),
                    Span::DUMMY,
                )],
                span: Span::DUMMY,
            }],
            span: Span::DUMMY,
        }))];

        let (ns, map) = project_with(vec![parent, arg_struct, err_struct, ret_struct]);
        let state = RenderState::new(&ns, &map);
        let imports =
            identifiers_for_statements(&statements, &state).unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(
            imports,
            vec![
                "Base".to_string(),
                "Hit".to_string(),
                "NotFound".to_string(),
                "Query".to_string()
            ]
        );
    }

    #[test]
    fn test_void_return_contributes_nothing() {
        let statements = vec![Statement::Def(Definition::Service(ServiceDef {
            name: Ident::synthetic("Ping"),
            extends: None,
            functions: vec![FunctionDefinition {
                name: Ident::synthetic("ping"),
                fields: vec![],
                return_type: TypeRef::base(BaseType::Void),
                throws: vec![],
                span: Span::DUMMY,
            }],
            span: Span::DUMMY,
        }))];
        let (ns, map) = project_with(vec![]);
        let state = RenderState::new(&ns, &map);
        let imports =
            identifiers_for_statements(&statements, &state).unwrap_or_else(|d| panic!("{d}"));
        assert!(imports.is_empty());
    }
}
