//! Lowering declared types to wire plans.
//!
//! The codec for a field must know the true underlying shape to encode and
//! decode it, so named references resolve through typedef chains here:
//! enums lower to i32, structs become registry references by qualified name,
//! and a typedef's aliased type is lowered in the namespace that defines the
//! typedef.

use thrum_diagnostic::{Diagnostic, ErrorCode};
use thrum_ir::{BaseType, Definition, TypeRef};
use thrum_resolve::{resolve_identifier_definition, ResolveContext};
use thrum_runtime::WirePlan;

/// Lower a declared field/argument/return type to its wire plan.
pub fn wire_plan_for_type(ty: &TypeRef, ctx: ResolveContext<'_>) -> Result<WirePlan, Diagnostic> {
    match ty {
        TypeRef::Base(base, span) => match base {
            BaseType::Bool => Ok(WirePlan::Bool),
            BaseType::I8 => Ok(WirePlan::Byte),
            BaseType::I16 => Ok(WirePlan::I16),
            BaseType::I32 => Ok(WirePlan::I32),
            BaseType::I64 => Ok(WirePlan::I64),
            BaseType::Double => Ok(WirePlan::Double),
            BaseType::String => Ok(WirePlan::String),
            BaseType::Binary => Ok(WirePlan::Binary),
            BaseType::Void => Err(Diagnostic::error(ErrorCode::E1301)
                .with_message("`void` is only legal as a function return type")
                .with_label(*span, "used as a field type here")),
        },

        TypeRef::Named(ident) => {
            let resolved = resolve_identifier_definition(&ident.text, ident.span, ctx)?;
            match resolved.definition {
                // Enums travel as their numeric value.
                Definition::Enum(_) => Ok(WirePlan::I32),

                Definition::Struct(_) => Ok(WirePlan::nested(resolved.qualified_name())),

                // The resolver only returns typedefs whose alias is a
                // non-identifier type; lower that type in the namespace the
                // typedef was defined in.
                Definition::Typedef(typedef) => {
                    let next = ResolveContext::new(resolved.namespace, ctx.namespaces);
                    wire_plan_for_type(&typedef.alias_of, next)
                }

                Definition::Const(_) | Definition::Service(_) => {
                    Err(Diagnostic::error(ErrorCode::E1302)
                        .with_message(format!(
                            "{} `{}` cannot be used as a field type",
                            resolved.definition.kind_name(),
                            ident.text
                        ))
                        .with_label(ident.span, "referenced as a type here"))
                }
            }
        }

        TypeRef::List(elem, _) => Ok(WirePlan::List(Box::new(wire_plan_for_type(elem, ctx)?))),
        TypeRef::Set(elem, _) => Ok(WirePlan::Set(Box::new(wire_plan_for_type(elem, ctx)?))),
        TypeRef::Map(key, value, _) => Ok(WirePlan::Map(
            Box::new(wire_plan_for_type(key, ctx)?),
            Box::new(wire_plan_for_type(value, ctx)?),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use thrum_ir::{EnumDef, Ident, Span, StructDef, StructKind, TypedefDef};
    use thrum_resolve::{Namespace, NamespaceMap};

    fn named(name: &str) -> TypeRef {
        TypeRef::named(name, Span::DUMMY)
    }

    #[test]
    fn test_typedef_chain_resolves_to_base_codec() {
        // typedef i64 A; typedef A B; typedef B C; a field of type C
        // encodes as i64.
        let mut ns = Namespace::new("root");
        ns.add_definition(Definition::Typedef(TypedefDef {
            name: Ident::synthetic("A"),
            alias_of: TypeRef::base(BaseType::I64),
            span: Span::DUMMY,
        }));
        ns.add_definition(Definition::Typedef(TypedefDef {
            name: Ident::synthetic("B"),
            alias_of: named("A"),
            span: Span::DUMMY,
        }));
        ns.add_definition(Definition::Typedef(TypedefDef {
            name: Ident::synthetic("C"),
            alias_of: named("B"),
            span: Span::DUMMY,
        }));
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let plan = wire_plan_for_type(&named("C"), ctx).unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(plan, WirePlan::I64);
    }

    #[test]
    fn test_typedef_of_container_lowers_elementwise() {
        // typedef map<string, Inner> Lookup
        let mut ns = Namespace::new("root");
        ns.add_definition(Definition::Struct(StructDef {
            kind: StructKind::Struct,
            name: Ident::synthetic("Inner"),
            fields: vec![],
            span: Span::DUMMY,
        }));
        ns.add_definition(Definition::Typedef(TypedefDef {
            name: Ident::synthetic("Lookup"),
            alias_of: TypeRef::Map(
                Box::new(TypeRef::base(BaseType::String)),
                Box::new(named("Inner")),
                Span::DUMMY,
            ),
            span: Span::DUMMY,
        }));
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let plan = wire_plan_for_type(&named("Lookup"), ctx).unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(
            plan,
            WirePlan::Map(
                Box::new(WirePlan::String),
                Box::new(WirePlan::nested("root.Inner"))
            )
        );
    }

    #[test]
    fn test_enum_lowers_to_i32() {
        let mut ns = Namespace::new("root");
        ns.add_definition(Definition::Enum(EnumDef {
            name: Ident::synthetic("Colors"),
            members: vec![],
            span: Span::DUMMY,
        }));
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let plan = wire_plan_for_type(&named("Colors"), ctx).unwrap_or_else(|d| panic!("{d}"));
        assert_eq!(plan, WirePlan::I32);
    }

    #[test]
    fn test_void_field_type_rejected() {
        let ns = Namespace::new("root");
        let map = NamespaceMap::new();
        let ctx = ResolveContext::new(&ns, &map);

        let Err(diag) = wire_plan_for_type(&TypeRef::base(BaseType::Void), ctx) else {
            panic!("expected rejection");
        };
        assert_eq!(diag.code, ErrorCode::E1301);
    }
}
