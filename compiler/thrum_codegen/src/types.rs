//! Mapping declared types to contract type expressions.
//!
//! Contracts use the *declared* type of a field (typedef aliases stay
//! aliases); only codec plans chase typedefs to the underlying shape.

use thrum_diagnostic::Diagnostic;
use thrum_ir::{BaseType, TypeRef};
use thrum_resolve::{resolve_identifier_name, RenderState};

use crate::decl::TypeExpr;

/// The contract type expression for a declared type, with named references
/// qualified for the file being generated.
pub fn type_expr(ty: &TypeRef, state: &RenderState<'_>) -> Result<TypeExpr, Diagnostic> {
    match ty {
        TypeRef::Base(base, _) => Ok(match base {
            BaseType::Bool => TypeExpr::Bool,
            BaseType::I8 => TypeExpr::I8,
            BaseType::I16 => TypeExpr::I16,
            BaseType::I32 => TypeExpr::I32,
            BaseType::I64 => TypeExpr::I64,
            BaseType::Double => TypeExpr::Double,
            BaseType::String => TypeExpr::String,
            BaseType::Binary => TypeExpr::Binary,
            BaseType::Void => TypeExpr::Void,
        }),
        TypeRef::Named(ident) => {
            let resolved = resolve_identifier_name(&ident.text, state)?;
            Ok(TypeExpr::named(resolved.full_name))
        }
        TypeRef::List(elem, _) => Ok(TypeExpr::List(Box::new(type_expr(elem, state)?))),
        TypeRef::Set(elem, _) => Ok(TypeExpr::Set(Box::new(type_expr(elem, state)?))),
        TypeRef::Map(key, value, _) => Ok(TypeExpr::Map(
            Box::new(type_expr(key, state)?),
            Box::new(type_expr(value, state)?),
        )),
    }
}
