//! Output IR: the structured declarations handed to the external emitter.
//!
//! Nothing here is text. Type references carry the qualified names computed
//! by the name qualifier; codec and service plans are `thrum_runtime` data
//! the emitter can render or the runtime can execute directly.

use thrum_ir::ConstValue;
use thrum_runtime::{CodecPlan, ServicePlan};

/// A type as it appears in generated contracts.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum TypeExpr {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    Void,
    /// A qualified reference, exactly as the emitter should print it.
    Named(String),
    List(Box<TypeExpr>),
    Set(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> TypeExpr {
        TypeExpr::Named(name.into())
    }
}

/// One property of a contract.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Property {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
    /// Defaulted fields are immutable on the full-value contract.
    pub readonly: bool,
}

/// A property-bag contract (arguments or full-value form of a struct).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Contract {
    pub name: String,
    pub properties: Vec<Property>,
}

/// A parameter of a factory function or handler method.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
}

/// How the factory initializes one field of the full value.
#[derive(Clone, PartialEq, Debug)]
pub enum FieldInit {
    /// From the field's declared default, already inlined to literals.
    Default { field: String, value: ConstValue },
    /// From the promoted factory parameter.
    Promoted { field: String, param: String },
    /// From the arguments object.
    FromArgs { field: String },
}

/// The `create<Name>` convenience constructor.
#[derive(Clone, PartialEq, Debug)]
pub struct FactoryFn {
    pub name: String,
    /// Name of the full-value contract the factory returns.
    pub result: String,
    pub params: Vec<Param>,
    /// One initializer per field, in declaration order.
    pub inits: Vec<FieldInit>,
}

/// One method of a handler contract.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct HandlerMethod {
    pub name: String,
    /// Declared parameters in order, plus a trailing optional context param.
    pub params: Vec<Param>,
    pub returns: TypeExpr,
    /// Handler methods may resolve synchronously or asynchronously; the
    /// emitter renders the return type as "value or future of value".
    pub maybe_async: bool,
}

/// The handler contract of a service.
///
/// With `extends`, the emitter renders a local-methods-only contract
/// intersected with the parent's handler contract; inherited signatures are
/// composed, never duplicated.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct HandlerContract {
    /// Methods declared directly on this service.
    pub methods: Vec<HandlerMethod>,
    /// Qualified reference to the parent service's handler contract.
    pub extends: Option<String>,
}

/// One enum member with its resolved value.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EnumMemberDecl {
    pub name: String,
    pub value: i64,
}

/// An enum declaration.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<EnumMemberDecl>,
}

/// A constant with its fully inlined value, emitted into the constants
/// container.
#[derive(Clone, PartialEq, Debug)]
pub struct ConstDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub value: ConstValue,
}

/// A type alias declaration.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AliasDecl {
    pub name: String,
    pub ty: TypeExpr,
}

/// Metadata for one service method argument.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ArgumentMetadata {
    pub name: String,
    pub field_id: i16,
}

/// Metadata for one service method.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MethodMetadata {
    pub name: String,
    pub arguments: Vec<ArgumentMetadata>,
}

/// Reflective metadata emitted alongside a service.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ServiceMetadata {
    pub name: String,
    pub methods: Vec<MethodMetadata>,
}

/// Everything generated for one struct-like definition.
#[derive(Clone, PartialEq, Debug)]
pub struct StructArtifact {
    pub name: String,
    pub args_contract: Contract,
    pub value_contract: Contract,
    pub codec: CodecPlan,
    /// Registry key the codec is published under (`namespace.Name`).
    pub codec_key: String,
    pub factory: FactoryFn,
}

/// Everything generated for one service.
#[derive(Clone, PartialEq, Debug)]
pub struct ServiceArtifact {
    pub name: String,
    pub metadata: ServiceMetadata,
    pub handler: HandlerContract,
    /// Synthetic `<Method>__Args` / `<Method>__Result` structs, in method
    /// declaration order.
    pub method_structs: Vec<StructArtifact>,
    /// The dispatch plan executed by the runtime client and processor.
    pub plan: ServicePlan,
}

/// One generated declaration.
#[derive(Clone, PartialEq, Debug)]
pub enum Decl {
    Alias(AliasDecl),
    Enum(EnumDecl),
    Const(ConstDecl),
    Struct(StructArtifact),
    Service(ServiceArtifact),
}

impl Decl {
    /// The declared name.
    pub fn name(&self) -> &str {
        match self {
            Decl::Alias(decl) => &decl.name,
            Decl::Enum(decl) => &decl.name,
            Decl::Const(decl) => &decl.name,
            Decl::Struct(artifact) => &artifact.name,
            Decl::Service(artifact) => &artifact.name,
        }
    }
}

/// One generated file.
#[derive(Clone, PartialEq, Debug)]
pub struct Module {
    /// Dotted path of the namespace this module was generated for.
    pub namespace_path: String,
    /// Identifiers the file must import, sorted.
    pub imports: Vec<String>,
    /// Declarations in source-statement order.
    pub decls: Vec<Decl>,
}
