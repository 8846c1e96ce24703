//! Codec and service plans.
//!
//! A plan is the generator's structured description of how a struct or
//! service maps onto the wire. Plans hold references (qualified names) to
//! nested codecs, never copies; the [`CodecRegistry`] resolves references at
//! execution time.

use rustc_hash::FxHashMap;

use crate::wire::WireType;

/// How one value shape encodes on the wire.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum WirePlan {
    Bool,
    Byte,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    /// A nested struct, referenced by qualified codec name.
    Struct { codec: String },
    List(Box<WirePlan>),
    Set(Box<WirePlan>),
    Map(Box<WirePlan>, Box<WirePlan>),
}

impl WirePlan {
    /// The wire-type tag this shape is written under.
    pub fn wire_type(&self) -> WireType {
        match self {
            WirePlan::Bool => WireType::Bool,
            WirePlan::Byte => WireType::Byte,
            WirePlan::I16 => WireType::I16,
            WirePlan::I32 => WireType::I32,
            WirePlan::I64 => WireType::I64,
            WirePlan::Double => WireType::Double,
            WirePlan::String | WirePlan::Binary => WireType::String,
            WirePlan::Struct { .. } => WireType::Struct,
            WirePlan::List(_) => WireType::List,
            WirePlan::Set(_) => WireType::Set,
            WirePlan::Map(..) => WireType::Map,
        }
    }

    /// A nested struct reference.
    pub fn nested(codec: impl Into<String>) -> WirePlan {
        WirePlan::Struct {
            codec: codec.into(),
        }
    }
}

/// One field of a codec plan.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FieldPlan {
    pub id: i16,
    pub name: String,
    /// Declared `required`. Absence at encode time is a protocol violation.
    pub required: bool,
    /// Whether the field declared a default value. Required fields with a
    /// default are not checked at decode time.
    pub has_default: bool,
    pub plan: WirePlan,
}

impl FieldPlan {
    pub fn new(id: i16, name: impl Into<String>, plan: WirePlan) -> Self {
        FieldPlan {
            id,
            name: name.into(),
            required: false,
            has_default: false,
            plan,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// The codec plan for one struct-like definition: its fields in declaration
/// order.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CodecPlan {
    /// Display name, used in struct markers and protocol violations.
    pub name: String,
    pub fields: Vec<FieldPlan>,
}

impl CodecPlan {
    pub fn new(name: impl Into<String>, fields: Vec<FieldPlan>) -> Self {
        CodecPlan {
            name: name.into(),
            fields,
        }
    }

    /// Look up a field by wire id.
    pub fn field_by_id(&self, id: i16) -> Option<&FieldPlan> {
        self.fields.iter().find(|field| field.id == id)
    }
}

/// One service method: its name plus the plans for the synthetic args and
/// result structs.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MethodPlan {
    pub name: String,
    pub args: CodecPlan,
    pub result: CodecPlan,
}

impl MethodPlan {
    /// The result envelope's `success` slot, absent for void methods.
    pub fn success_field(&self) -> Option<&FieldPlan> {
        self.result.field_by_id(0)
    }
}

/// The dispatch plan for one service.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ServicePlan {
    pub name: String,
    pub methods: Vec<MethodPlan>,
}

impl ServicePlan {
    pub fn new(name: impl Into<String>, methods: Vec<MethodPlan>) -> Self {
        ServicePlan {
            name: name.into(),
            methods,
        }
    }

    /// Look up a method by wire name.
    pub fn method(&self, name: &str) -> Option<&MethodPlan> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// Resolves qualified codec names to plans at execution time.
#[derive(Clone, Debug, Default)]
pub struct CodecRegistry {
    plans: FxHashMap<String, CodecPlan>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        CodecRegistry::default()
    }

    /// Register a plan under its qualified name.
    pub fn insert(&mut self, qualified_name: impl Into<String>, plan: CodecPlan) {
        self.plans.insert(qualified_name.into(), plan);
    }

    pub fn get(&self, qualified_name: &str) -> Option<&CodecPlan> {
        self.plans.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_types() {
        assert_eq!(WirePlan::Binary.wire_type(), WireType::String);
        assert_eq!(
            WirePlan::Map(Box::new(WirePlan::String), Box::new(WirePlan::I32)).wire_type(),
            WireType::Map
        );
        assert_eq!(WirePlan::nested("ns.Thing").wire_type(), WireType::Struct);
    }

    #[test]
    fn test_success_field_lookup() {
        let method = MethodPlan {
            name: "ping".to_string(),
            args: CodecPlan::new("Ping__Args", vec![]),
            result: CodecPlan::new("Ping__Result", vec![]),
        };
        assert!(method.success_field().is_none());

        let method = MethodPlan {
            name: "get".to_string(),
            args: CodecPlan::new("Get__Args", vec![]),
            result: CodecPlan::new(
                "Get__Result",
                vec![FieldPlan::new(0, "success", WirePlan::I32)],
            ),
        };
        assert_eq!(
            method.success_field().map(|field| field.name.as_str()),
            Some("success")
        );
    }
}
