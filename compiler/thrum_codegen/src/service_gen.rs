//! Service generation.
//!
//! Per service: the handler contract (composed across `extends` without
//! duplicating inherited signatures), the synthetic `<Method>__Args` and
//! `<Method>__Result` structs run through the struct generator, reflective
//! service metadata, and the dispatch plan the runtime client and processor
//! execute.

use thrum_diagnostic::Diagnostic;
use thrum_ir::{
    FieldDefinition, FunctionDefinition, Ident, Requiredness, ServiceDef, StructDef, StructKind,
};
use thrum_resolve::resolve_identifier_name;
use thrum_runtime::{MethodPlan, ServicePlan};

use crate::decl::{
    ArgumentMetadata, HandlerContract, HandlerMethod, MethodMetadata, Param, ServiceArtifact,
    ServiceMetadata, TypeExpr,
};
use crate::struct_gen::generate_struct;
use crate::types::type_expr;
use crate::GenContext;

/// Generate the artifacts for one service.
pub fn generate_service(
    def: &ServiceDef,
    ctx: &mut GenContext<'_>,
) -> Result<ServiceArtifact, Diagnostic> {
    let handler = handler_contract(def, ctx)?;
    let metadata = service_metadata(def);

    let mut method_structs = Vec::with_capacity(def.functions.len() * 2);
    let mut methods = Vec::with_capacity(def.functions.len());
    for function in &def.functions {
        let args = generate_struct(&args_struct(function), ctx)?;
        let result = generate_struct(&result_struct(function), ctx)?;
        methods.push(MethodPlan {
            name: function.name.text.clone(),
            args: args.codec.clone(),
            result: result.codec.clone(),
        });
        method_structs.push(args);
        method_structs.push(result);
    }

    Ok(ServiceArtifact {
        name: def.name.text.clone(),
        metadata,
        handler,
        method_structs,
        plan: ServicePlan::new(def.name.text.clone(), methods),
    })
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The synthetic struct carrying a function's arguments.
fn args_struct(function: &FunctionDefinition) -> StructDef {
    StructDef {
        kind: StructKind::Struct,
        name: Ident::synthetic(format!("{}__Args", capitalize(&function.name.text))),
        fields: function.fields.clone(),
        span: function.span,
    }
}

/// The synthetic result envelope: `success` under field id 0 (absent for
/// void functions) plus one optional field per declared throws exception.
fn result_struct(function: &FunctionDefinition) -> StructDef {
    let mut fields = Vec::with_capacity(function.throws.len() + 1);
    if !function.return_type.is_void() {
        fields.push(
            FieldDefinition::new(0, "success", function.return_type.clone(), function.span)
                .optional(),
        );
    }
    for throw in &function.throws {
        let mut field = throw.clone();
        field.requiredness = Requiredness::Optional;
        fields.push(field);
    }

    StructDef {
        kind: StructKind::Struct,
        name: Ident::synthetic(format!("{}__Result", capitalize(&function.name.text))),
        fields,
        span: function.span,
    }
}

/// The handler contract: one method per function, parameters in declaration
/// order plus a trailing optional context parameter.
fn handler_contract(
    def: &ServiceDef,
    ctx: &GenContext<'_>,
) -> Result<HandlerContract, Diagnostic> {
    let methods = def
        .functions
        .iter()
        .map(|function| handler_method(function, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    let extends = match &def.extends {
        Some(parent) => {
            let resolved = resolve_identifier_name(&parent.text, &ctx.state)?;
            Some(format!("{}.Handler", resolved.full_name))
        }
        None => None,
    };

    Ok(HandlerContract { methods, extends })
}

fn handler_method(
    function: &FunctionDefinition,
    ctx: &GenContext<'_>,
) -> Result<HandlerMethod, Diagnostic> {
    let mut params = function
        .fields
        .iter()
        .map(|field| {
            Ok(Param {
                name: field.name.text.clone(),
                ty: type_expr(&field.ty, &ctx.state)?,
                optional: field.requiredness == Requiredness::Optional,
            })
        })
        .collect::<Result<Vec<_>, Diagnostic>>()?;
    params.push(Param {
        name: "context".to_string(),
        ty: TypeExpr::named("Context"),
        optional: true,
    });

    Ok(HandlerMethod {
        name: function.name.text.clone(),
        params,
        returns: type_expr(&function.return_type, &ctx.state)?,
        maybe_async: true,
    })
}

fn service_metadata(def: &ServiceDef) -> ServiceMetadata {
    ServiceMetadata {
        name: def.name.text.clone(),
        methods: def
            .functions
            .iter()
            .map(|function| MethodMetadata {
                name: function.name.text.clone(),
                arguments: function
                    .fields
                    .iter()
                    .map(|field| ArgumentMetadata {
                        name: field.name.text.clone(),
                        field_id: field.id,
                    })
                    .collect(),
            })
            .collect(),
    }
}
