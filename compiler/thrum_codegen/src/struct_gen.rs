//! Struct, union, and exception generation.
//!
//! Per struct-like definition: an arguments contract, a full-value contract,
//! a codec plan, and a `create<Name>` factory. Field promotion, when active,
//! pulls the single field of the marker type out of the arguments contract
//! and into a dedicated factory parameter, caching the promoted field's
//! naming in the per-file options clone for the factory to read back.

use thrum_diagnostic::Diagnostic;
use thrum_ir::{FieldDefinition, Requiredness, StructDef, TypeRef};
use thrum_resolve::resolve_const_value;
use thrum_runtime::{CodecPlan, FieldPlan};

use crate::decl::{Contract, FactoryFn, FieldInit, Param, Property, StructArtifact, TypeExpr};
use crate::types::type_expr;
use crate::wire_plan::wire_plan_for_type;
use crate::{CompilerOptions, GenContext};

/// Generate the artifacts for one struct-like definition.
pub fn generate_struct(
    def: &StructDef,
    ctx: &mut GenContext<'_>,
) -> Result<StructArtifact, Diagnostic> {
    let args_contract = args_contract(def, ctx)?;
    let value_contract = value_contract(def, ctx)?;
    let codec = codec_plan(def, ctx)?;
    let codec_key = format!("{}.{}", ctx.state.current_namespace.path, def.name.text);
    let factory = factory_fn(def, &args_contract, ctx)?;

    Ok(StructArtifact {
        name: def.name.text.clone(),
        args_contract,
        value_contract,
        codec,
        codec_key,
        factory,
    })
}

/// The single field whose declared type matches the promotion marker type.
fn promoted_field<'b>(
    fields: &'b [FieldDefinition],
    options: &CompilerOptions,
) -> Option<&'b FieldDefinition> {
    if !options.function_field_promotion.is_enabled {
        return None;
    }
    fields.iter().find(|field| {
        matches!(&field.ty, TypeRef::Named(ident)
            if ident.text == options.function_field_promotion.type_name)
    })
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The arguments contract: what callers must supply.
///
/// Under interfaces-with-functions, defaulted fields are dropped (the
/// factory fills them in) and the promoted field, if any, is dropped too —
/// it arrives as a separate factory parameter.
fn args_contract(def: &StructDef, ctx: &mut GenContext<'_>) -> Result<Contract, Diagnostic> {
    let mut fields: Vec<&FieldDefinition> = def.fields.iter().collect();

    if ctx.options.use_interfaces_with_functions {
        fields.retain(|field| field.default_value.is_none());

        // The promoted field is searched among the fields that survive the
        // default-value trim.
        if ctx.options.function_field_promotion.is_enabled {
            let marker = ctx.options.function_field_promotion.type_name.clone();
            let promoted_name = fields
                .iter()
                .find(|field| {
                    matches!(&field.ty, TypeRef::Named(ident) if ident.text == marker)
                })
                .map(|field| field.name.text.clone());

            if let Some(name) = promoted_name {
                let promotion = &mut ctx.options.function_field_promotion;
                promotion.field_name = name.clone();
                promotion.param_name = lower_first(&name);
                promotion.qualified_type_name =
                    format!("{}.{}", promotion.type_name, promotion.type_name);

                fields.retain(|field| field.name.text != name);
            }
        }
    }

    let properties = fields
        .into_iter()
        .map(|field| property(field, ctx, false))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Contract {
        name: format!("{}Args", def.name.text),
        properties,
    })
}

/// The full-value contract: every field, with defaulted fields immutable.
fn value_contract(def: &StructDef, ctx: &GenContext<'_>) -> Result<Contract, Diagnostic> {
    let properties = def
        .fields
        .iter()
        .map(|field| property(field, ctx, true))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Contract {
        name: def.name.text.clone(),
        properties,
    })
}

fn property(
    field: &FieldDefinition,
    ctx: &GenContext<'_>,
    full_form: bool,
) -> Result<Property, Diagnostic> {
    Ok(Property {
        name: field.name.text.clone(),
        ty: type_expr(&field.ty, &ctx.state)?,
        optional: field.requiredness == Requiredness::Optional,
        readonly: full_form
            && ctx.options.use_interfaces_with_functions
            && field.default_value.is_some(),
    })
}

/// The codec plan: fields in declaration order, typedefs chased to the
/// underlying wire shape.
fn codec_plan(def: &StructDef, ctx: &GenContext<'_>) -> Result<CodecPlan, Diagnostic> {
    let fields = def
        .fields
        .iter()
        .map(|field| {
            let mut plan = FieldPlan::new(
                field.id,
                field.name.text.clone(),
                wire_plan_for_type(&field.ty, ctx.resolve_context())?,
            );
            if field.requiredness == Requiredness::Required {
                plan = plan.required();
            }
            if field.default_value.is_some() {
                plan = plan.with_default();
            }
            Ok(plan)
        })
        .collect::<Result<Vec<_>, Diagnostic>>()?;

    Ok(CodecPlan::new(def.name.text.clone(), fields))
}

/// The `create<Name>` factory: takes the arguments contract (plus the
/// promoted parameter when active) and initializes every field of the full
/// value from its default, the promoted parameter, or the arguments object.
fn factory_fn(
    def: &StructDef,
    args_contract: &Contract,
    ctx: &GenContext<'_>,
) -> Result<FactoryFn, Diagnostic> {
    let mut params = vec![Param {
        name: "args".to_string(),
        ty: TypeExpr::named(args_contract.name.clone()),
        optional: false,
    }];

    let promote = promoted_field(&def.fields, &ctx.options);
    if let Some(promote) = promote {
        let marker = &ctx.options.function_field_promotion.type_name;
        params.push(Param {
            name: lower_first(&promote.name.text),
            ty: TypeExpr::named(format!("{marker}.{marker}")),
            optional: false,
        });
    }

    let inits = def
        .fields
        .iter()
        .map(|field| {
            if let Some(default) = &field.default_value {
                let value = resolve_const_value(default, &field.ty, ctx.resolve_context())?;
                return Ok(FieldInit::Default {
                    field: field.name.text.clone(),
                    value,
                });
            }
            if promote.is_some_and(|p| p.name.text == field.name.text) {
                return Ok(FieldInit::Promoted {
                    field: field.name.text.clone(),
                    param: lower_first(&field.name.text),
                });
            }
            Ok(FieldInit::FromArgs {
                field: field.name.text.clone(),
            })
        })
        .collect::<Result<Vec<_>, Diagnostic>>()?;

    Ok(FactoryFn {
        name: format!("create{}", def.name.text),
        result: def.name.text.clone(),
        params,
        inits,
    })
}
