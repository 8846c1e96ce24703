//! Constant inlining.
//!
//! Rewrites a constant expression tree so that every reference to another
//! constant is replaced by the literal value it ultimately denotes. One
//! constant may be defined in terms of another, possibly in an included
//! namespace; the relationship is fully flattened at generation time so
//! downstream consumers never re-resolve.
//!
//! The one permitted implicit coercion: an integer literal against a bool
//! target, legal only for the literal texts `"1"` and `"0"`.
//!
//! The `expected_type` is reused for every nested element of list and map
//! literals rather than tracking the literal's true element type. Blunt, but
//! it keeps downstream type checks trivial.

use thrum_diagnostic::{Diagnostic, ErrorCode};
use thrum_ir::{split_dotted, ConstEntry, ConstKind, ConstValue, Definition, Span, TypeRef};

use crate::ResolveContext;

/// Inline every constant reference in `value`, coercing int literals to bool
/// where the expected type requires it.
pub fn resolve_const_value(
    value: &ConstValue,
    expected_type: &TypeRef,
    ctx: ResolveContext<'_>,
) -> Result<ConstValue, Diagnostic> {
    match &value.kind {
        ConstKind::Int { text, .. } => {
            if expected_type.is_bool() {
                match text.as_str() {
                    "1" => Ok(ConstValue::bool_lit(true, value.span)),
                    "0" => Ok(ConstValue::bool_lit(false, value.span)),
                    _ => Err(Diagnostic::error(ErrorCode::E1201)
                        .with_message("can only assign booleans the int values `1` or `0`")
                        .with_label(value.span, format!("found `{text}`"))),
                }
            } else {
                Ok(value.clone())
            }
        }

        ConstKind::Ident(name) => resolve_ident_value(name, value.span, expected_type, ctx),

        ConstKind::List(elements) => {
            let elements = elements
                .iter()
                .map(|element| resolve_const_value(element, expected_type, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ConstValue::list(elements, value.span))
        }

        ConstKind::Map(entries) => {
            let entries = entries
                .iter()
                .map(|entry| {
                    Ok(ConstEntry {
                        key: resolve_const_value(&entry.key, expected_type, ctx)?,
                        value: resolve_const_value(&entry.value, expected_type, ctx)?,
                    })
                })
                .collect::<Result<Vec<_>, Diagnostic>>()?;
            Ok(ConstValue::map(entries, value.span))
        }

        ConstKind::Double(_) | ConstKind::String(_) | ConstKind::Bool(_) => Ok(value.clone()),
    }
}

/// Resolve an identifier in constant position.
///
/// A head that names a local `const` inlines its initializer, recursively.
/// A head that names any other definition kind passes the identifier through
/// unchanged (enum member references stay symbolic). A head that is an
/// include alias recurses into that namespace with the dotted tail.
fn resolve_ident_value(
    name: &str,
    span: Span,
    expected_type: &TypeRef,
    ctx: ResolveContext<'_>,
) -> Result<ConstValue, Diagnostic> {
    let (head, tail) = split_dotted(name);

    if let Some(definition) = ctx.current.exports.get(head) {
        return match definition {
            Definition::Const(def) => resolve_const_value(&def.initializer, expected_type, ctx),
            _ => Ok(ConstValue::ident(name, span)),
        };
    }

    if let Some(entered) = ctx.enter_include(head, span) {
        let next = entered?;
        if let Some(tail) = tail {
            return resolve_ident_value(tail, span, expected_type, next);
        }
    }

    Err(Diagnostic::error(ErrorCode::E1202)
        .with_message(format!("unable to resolve value of identifier `{name}`"))
        .with_label(span, "no constant with this name")
        .with_note(format!(
            "searched namespace `{}` and its includes",
            ctx.current.path
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Namespace, NamespaceMap};
    use pretty_assertions::assert_eq;
    use thrum_ir::{BaseType, ConstDef, EnumDef, EnumMember, Ident};

    fn const_def(name: &str, ty: TypeRef, initializer: ConstValue) -> Definition {
        Definition::Const(ConstDef {
            name: Ident::synthetic(name),
            ty,
            initializer,
            span: Span::DUMMY,
        })
    }

    fn i32_ty() -> TypeRef {
        TypeRef::base(BaseType::I32)
    }

    fn bool_ty() -> TypeRef {
        TypeRef::base(BaseType::Bool)
    }

    #[test]
    fn test_const_referencing_const_flattens() {
        // const i32 A = 5; const i32 B = A
        let mut ns = Namespace::new("root");
        ns.add_definition(const_def("A", i32_ty(), ConstValue::int(5, Span::DUMMY)));
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let inlined = resolve_const_value(&ConstValue::ident("A", Span::DUMMY), &i32_ty(), ctx)
            .unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(inlined, ConstValue::int(5, Span::DUMMY));
    }

    #[test]
    fn test_chained_references_flatten_recursively() {
        // const i32 A = 5; const i32 B = A; const i32 C = B
        let mut ns = Namespace::new("root");
        ns.add_definition(const_def("A", i32_ty(), ConstValue::int(5, Span::DUMMY)));
        ns.add_definition(const_def("B", i32_ty(), ConstValue::ident("A", Span::DUMMY)));
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let inlined = resolve_const_value(&ConstValue::ident("B", Span::DUMMY), &i32_ty(), ctx)
            .unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(inlined, ConstValue::int(5, Span::DUMMY));
    }

    #[test]
    fn test_int_one_coerces_to_true() {
        let ns = Namespace::new("root");
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let inlined = resolve_const_value(&ConstValue::int(1, Span::DUMMY), &bool_ty(), ctx)
            .unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(inlined, ConstValue::bool_lit(true, Span::DUMMY));

        let inlined = resolve_const_value(&ConstValue::int(0, Span::DUMMY), &bool_ty(), ctx)
            .unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(inlined, ConstValue::bool_lit(false, Span::DUMMY));
    }

    #[test]
    fn test_other_ints_fail_bool_coercion() {
        let ns = Namespace::new("root");
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let Err(diag) = resolve_const_value(&ConstValue::int(2, Span::new(9, 10)), &bool_ty(), ctx)
        else {
            panic!("expected coercion failure");
        };
        assert_eq!(diag.code, ErrorCode::E1201);
        assert_eq!(diag.primary_span(), Some(Span::new(9, 10)));
    }

    #[test]
    fn test_list_elements_inline_with_shared_expected_type() {
        // const list<i32> L = [ A, 2 ] — the element check reuses the
        // declared type, deliberately.
        let mut ns = Namespace::new("root");
        ns.add_definition(const_def("A", i32_ty(), ConstValue::int(1, Span::DUMMY)));
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let literal = ConstValue::list(
            vec![
                ConstValue::ident("A", Span::DUMMY),
                ConstValue::int(2, Span::DUMMY),
            ],
            Span::DUMMY,
        );
        let list_ty = TypeRef::List(Box::new(i32_ty()), Span::DUMMY);
        let inlined = resolve_const_value(&literal, &list_ty, ctx).unwrap_or_else(|d| panic!("{d}"));
        assert!(!inlined.references_identifiers());
    }

    #[test]
    fn test_cross_namespace_reference() {
        let mut shared = Namespace::new("com.test.shared");
        shared.add_definition(const_def(
            "LIMIT",
            i32_ty(),
            ConstValue::int(64, Span::DUMMY),
        ));
        let mut root = Namespace::new("com.test.root");
        root.add_include("shared", "com.test.shared", "com_test_shared");
        let mut map = NamespaceMap::new();
        map.insert("com_test_shared", shared);
        let ctx = ResolveContext::new(&root, &map);

        let inlined = resolve_const_value(
            &ConstValue::ident("shared.LIMIT", Span::DUMMY),
            &i32_ty(),
            ctx,
        )
        .unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(inlined, ConstValue::int(64, Span::DUMMY));
    }

    #[test]
    fn test_enum_member_reference_passes_through() {
        let mut ns = Namespace::new("root");
        ns.add_definition(Definition::Enum(EnumDef {
            name: Ident::synthetic("Colors"),
            members: vec![EnumMember {
                name: Ident::synthetic("RED"),
                value: None,
                span: Span::DUMMY,
            }],
            span: Span::DUMMY,
        }));
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let inlined =
            resolve_const_value(&ConstValue::ident("Colors.RED", Span::DUMMY), &i32_ty(), ctx)
                .unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(inlined, ConstValue::ident("Colors.RED", Span::DUMMY));
    }

    #[test]
    fn test_unresolved_identifier_fails() {
        let ns = Namespace::new("root");
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let Err(diag) =
            resolve_const_value(&ConstValue::ident("NOPE", Span::DUMMY), &i32_ty(), ctx)
        else {
            panic!("expected resolution failure");
        };
        assert_eq!(diag.code, ErrorCode::E1202);
    }
}
