//! Generator configuration.
//!
//! Loaded by an external options loader and consumed here as given. The
//! promotion record doubles as a per-file cache: `field_name`, `param_name`,
//! and `qualified_type_name` are filled in while the promoted struct's
//! arguments contract is generated, and read back by the factory generator.
//! Options are cloned per file so the cache never leaks across files.

/// Field promotion: hoist the single field of a designated type into its own
/// factory parameter instead of the generic arguments object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPromotion {
    pub is_enabled: bool,
    /// The marker type name a field must be declared as to be promoted.
    pub type_name: String,
    /// Cached: the promoted parameter name (field name, first letter
    /// lowered).
    pub param_name: String,
    /// Cached: the promoted field's declared name.
    pub field_name: String,
    /// Cached: `TypeName.TypeName`, the qualified form of the marker type.
    pub qualified_type_name: String,
}

impl FieldPromotion {
    /// Enable promotion for fields of the given marker type.
    pub fn enabled(type_name: impl Into<String>) -> Self {
        FieldPromotion {
            is_enabled: true,
            type_name: type_name.into(),
            ..FieldPromotion::default()
        }
    }
}

/// Recognized generator options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Generate factory-style struct construction and trim defaulted fields
    /// from arguments contracts.
    pub use_interfaces_with_functions: bool,
    pub function_field_promotion: FieldPromotion,
}
