//! Code generation for the Thrum IDL compiler.
//!
//! Turns resolved definitions into structured output IR:
//! - [`decl`]: the declarations an external emitter renders to source text —
//!   contracts, factories, handler contracts, enum/const/alias declarations
//! - [`generate_struct`]: per struct-like definition, an arguments contract,
//!   a full-value contract, a codec plan, and a `create<Name>` factory, with
//!   optional field promotion
//! - [`generate_service`]: per service, a handler contract (composed across
//!   `extends`), per-method args/result structs, service metadata, and the
//!   client/processor dispatch plan
//! - [`generate_module`] / [`generate_project`]: the per-file driver and the
//!   embarrassingly parallel project driver; render state never crosses a
//!   file boundary
//!
//! Codec semantics live in `thrum_runtime`, which executes the plans this
//! crate produces.

pub mod decl;
mod generate;
mod gen_ctx;
mod options;
mod service_gen;
mod struct_gen;
mod types;
mod wire_plan;

pub use gen_ctx::GenContext;
pub use generate::{build_registry, generate_module, generate_project, ProjectFile};
pub use options::{CompilerOptions, FieldPromotion};
pub use service_gen::generate_service;
pub use struct_gen::generate_struct;
pub use types::type_expr;
pub use wire_plan::wire_plan_for_type;
