//! Plan-driven struct encoding and decoding.
//!
//! Encode walks the plan's fields in declaration order and fails immediately
//! on a missing required field. Decode loops over field headers until the
//! stop marker, skipping unknown ids and mismatched wire types by wire type,
//! then verifies every required field without a default was populated.

use crate::error::ProtocolError;
use crate::plan::{CodecPlan, CodecRegistry, WirePlan};
use crate::protocol::{skip, ProtocolReader, ProtocolWriter};
use crate::value::{StructValue, Value};
use crate::wire::WireType;

/// Encode `args` according to `plan`.
pub fn encode_struct<W: ProtocolWriter>(
    plan: &CodecPlan,
    args: &StructValue,
    registry: &CodecRegistry,
    output: &mut W,
) -> Result<(), ProtocolError> {
    output.write_struct_begin(&plan.name)?;
    for field in &plan.fields {
        match args.get(&field.name) {
            Some(value) => {
                output.write_field_begin(&field.name, field.plan.wire_type(), field.id)?;
                write_value(&field.plan, value, registry, output)?;
                output.write_field_end()?;
            }
            None if field.required => {
                return Err(ProtocolError::required_field_unset(&field.name));
            }
            None => {}
        }
    }
    output.write_field_stop()?;
    output.write_struct_end()?;
    Ok(())
}

/// Decode a struct according to `plan`.
pub fn decode_struct<R: ProtocolReader>(
    plan: &CodecPlan,
    registry: &CodecRegistry,
    input: &mut R,
) -> Result<StructValue, ProtocolError> {
    input.read_struct_begin()?;
    let mut out = StructValue::new();
    loop {
        let header = input.read_field_begin()?;
        if header.wire_type == WireType::Stop {
            break;
        }
        match plan.field_by_id(header.id) {
            Some(field) if field.plan.wire_type() == header.wire_type => {
                let value = read_value(&field.plan, registry, input)?;
                out.insert(&field.name, value);
            }
            // Unknown field id, or a known id under the wrong wire type:
            // consume the payload and keep going.
            _ => skip(input, header.wire_type)?,
        }
        input.read_field_end()?;
    }
    input.read_struct_end()?;

    for field in &plan.fields {
        if field.required && !field.has_default && !out.contains(&field.name) {
            return Err(ProtocolError::missing_required(&plan.name));
        }
    }
    Ok(out)
}

fn nested_plan<'a>(
    registry: &'a CodecRegistry,
    codec: &str,
) -> Result<&'a CodecPlan, ProtocolError> {
    registry
        .get(codec)
        .ok_or_else(|| ProtocolError::unknown(format!("no codec registered under `{codec}`")))
}

fn write_value<W: ProtocolWriter>(
    plan: &WirePlan,
    value: &Value,
    registry: &CodecRegistry,
    output: &mut W,
) -> Result<(), ProtocolError> {
    match (plan, value) {
        (WirePlan::Bool, Value::Bool(v)) => output.write_bool(*v),
        (WirePlan::Byte, Value::Byte(v)) => output.write_byte(*v),
        (WirePlan::I16, Value::I16(v)) => output.write_i16(*v),
        (WirePlan::I32, Value::I32(v)) => output.write_i32(*v),
        (WirePlan::I64, Value::I64(v)) => output.write_i64(*v),
        (WirePlan::Double, Value::Double(v)) => output.write_double(*v),
        (WirePlan::String, Value::String(v)) => output.write_string(v),
        (WirePlan::Binary, Value::Binary(v)) => output.write_binary(v),
        (WirePlan::List(elem), Value::List(items)) => {
            output.write_list_begin(elem.wire_type(), items.len())?;
            for item in items {
                write_value(elem, item, registry, output)?;
            }
            output.write_list_end()
        }
        (WirePlan::Set(elem), Value::Set(items)) => {
            output.write_set_begin(elem.wire_type(), items.len())?;
            for item in items {
                write_value(elem, item, registry, output)?;
            }
            output.write_set_end()
        }
        (WirePlan::Map(key, value_plan), Value::Map(entries)) => {
            output.write_map_begin(key.wire_type(), value_plan.wire_type(), entries.len())?;
            for (entry_key, entry_value) in entries {
                write_value(key, entry_key, registry, output)?;
                write_value(value_plan, entry_value, registry, output)?;
            }
            output.write_map_end()
        }
        (WirePlan::Struct { codec }, Value::Struct(inner)) => {
            encode_struct(nested_plan(registry, codec)?, inner, registry, output)
        }
        (plan, value) => Err(ProtocolError::invalid_data(format!(
            "value {value:?} does not match wire shape `{}`",
            plan.wire_type()
        ))),
    }
}

fn read_value<R: ProtocolReader>(
    plan: &WirePlan,
    registry: &CodecRegistry,
    input: &mut R,
) -> Result<Value, ProtocolError> {
    match plan {
        WirePlan::Bool => Ok(Value::Bool(input.read_bool()?)),
        WirePlan::Byte => Ok(Value::Byte(input.read_byte()?)),
        WirePlan::I16 => Ok(Value::I16(input.read_i16()?)),
        WirePlan::I32 => Ok(Value::I32(input.read_i32()?)),
        WirePlan::I64 => Ok(Value::I64(input.read_i64()?)),
        WirePlan::Double => Ok(Value::Double(input.read_double()?)),
        WirePlan::String => Ok(Value::String(input.read_string()?)),
        WirePlan::Binary => Ok(Value::Binary(input.read_binary()?)),
        WirePlan::List(elem) => {
            let (wire_type, len) = input.read_list_begin()?;
            expect_elem_type(wire_type, elem)?;
            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                items.push(read_value(elem, registry, input)?);
            }
            input.read_list_end()?;
            Ok(Value::List(items))
        }
        WirePlan::Set(elem) => {
            let (wire_type, len) = input.read_set_begin()?;
            expect_elem_type(wire_type, elem)?;
            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                items.push(read_value(elem, registry, input)?);
            }
            input.read_set_end()?;
            Ok(Value::Set(items))
        }
        WirePlan::Map(key, value) => {
            let (key_type, value_type, len) = input.read_map_begin()?;
            expect_elem_type(key_type, key)?;
            expect_elem_type(value_type, value)?;
            let mut entries = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                let entry_key = read_value(key, registry, input)?;
                let entry_value = read_value(value, registry, input)?;
                entries.push((entry_key, entry_value));
            }
            input.read_map_end()?;
            Ok(Value::Map(entries))
        }
        WirePlan::Struct { codec } => {
            let inner = decode_struct(nested_plan(registry, codec)?, registry, input)?;
            Ok(Value::Struct(inner))
        }
    }
}

fn expect_elem_type(found: WireType, plan: &WirePlan) -> Result<(), ProtocolError> {
    let expected = plan.wire_type();
    if found == expected {
        Ok(())
    } else {
        Err(ProtocolError::invalid_data(format!(
            "container declares element type `{found}`, expected `{expected}`"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{BinaryReader, BinaryWriter};
    use crate::error::ProtocolErrorKind;
    use crate::plan::FieldPlan;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn inner_plan() -> CodecPlan {
        CodecPlan::new(
            "Inner",
            vec![
                FieldPlan::new(1, "id", WirePlan::I32).required(),
                FieldPlan::new(2, "label", WirePlan::String),
            ],
        )
    }

    fn outer_plan() -> CodecPlan {
        CodecPlan::new(
            "Outer",
            vec![
                FieldPlan::new(1, "inner", WirePlan::nested("test.Inner")).required(),
                FieldPlan::new(2, "tags", WirePlan::List(Box::new(WirePlan::String))),
                FieldPlan::new(
                    3,
                    "scores",
                    WirePlan::Map(Box::new(WirePlan::String), Box::new(WirePlan::I64)),
                ),
                FieldPlan::new(4, "flags", WirePlan::Set(Box::new(WirePlan::Bool))),
            ],
        )
    }

    fn registry() -> CodecRegistry {
        let mut registry = CodecRegistry::new();
        registry.insert("test.Inner", inner_plan());
        registry.insert("test.Outer", outer_plan());
        registry
    }

    fn encode(plan: &CodecPlan, args: &StructValue, registry: &CodecRegistry) -> Vec<u8> {
        let mut output = BinaryWriter::new();
        encode_struct(plan, args, registry, &mut output).unwrap_or_else(|e| panic!("{e}"));
        output.into_bytes()
    }

    #[test]
    fn test_nested_round_trip() {
        let registry = registry();
        let args = StructValue::new()
            .with(
                "inner",
                Value::Struct(
                    StructValue::new()
                        .with("id", Value::I32(7))
                        .with("label", Value::string("seven")),
                ),
            )
            .with(
                "tags",
                Value::List(vec![Value::string("a"), Value::string("b")]),
            )
            .with(
                "scores",
                Value::Map(vec![(Value::string("x"), Value::I64(9))]),
            )
            .with("flags", Value::Set(vec![Value::Bool(true)]));

        let bytes = encode(&outer_plan(), &args, &registry);
        let mut input = BinaryReader::new(&bytes);
        let decoded = decode_struct(&outer_plan(), &registry, &mut input)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(decoded, args);
    }

    #[test]
    fn test_encode_missing_required_names_field() {
        let registry = registry();
        let args = StructValue::new().with("label", Value::string("no id"));
        let mut output = BinaryWriter::new();
        let Err(err) = encode_struct(&inner_plan(), &args, &registry, &mut output) else {
            panic!("expected protocol violation");
        };
        assert_eq!(err.kind, ProtocolErrorKind::Unknown);
        assert!(err.message.contains("`id`"), "message: {}", err.message);
    }

    #[test]
    fn test_encode_stops_at_first_missing_required() {
        // Both fields required and absent: the violation names the first in
        // declaration order.
        let plan = CodecPlan::new(
            "Pair",
            vec![
                FieldPlan::new(1, "first", WirePlan::I32).required(),
                FieldPlan::new(2, "second", WirePlan::I32).required(),
            ],
        );
        let registry = CodecRegistry::new();
        let mut output = BinaryWriter::new();
        let Err(err) = encode_struct(&plan, &StructValue::new(), &registry, &mut output) else {
            panic!("expected protocol violation");
        };
        assert!(err.message.contains("`first`"));
    }

    #[test]
    fn test_decode_missing_required_names_struct() {
        let registry = registry();
        // Encode with a plan that has no required fields, decode with one
        // that requires `id`.
        let lax = CodecPlan::new(
            "Inner",
            vec![FieldPlan::new(2, "label", WirePlan::String)],
        );
        let bytes = encode(&lax, &StructValue::new().with("label", Value::string("x")), &registry);
        let mut input = BinaryReader::new(&bytes);
        let Err(err) = decode_struct(&inner_plan(), &registry, &mut input) else {
            panic!("expected protocol violation");
        };
        assert!(err.message.contains("`Inner`"), "message: {}", err.message);
    }

    #[test]
    fn test_required_with_default_not_checked_at_decode() {
        let registry = registry();
        let plan = CodecPlan::new(
            "Defaulted",
            vec![FieldPlan::new(1, "n", WirePlan::I32).required().with_default()],
        );
        let lax = CodecPlan::new("Defaulted", vec![]);
        let bytes = encode(&lax, &StructValue::new(), &registry);
        let mut input = BinaryReader::new(&bytes);
        let decoded =
            decode_struct(&plan, &registry, &mut input).unwrap_or_else(|e| panic!("{e}"));
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_unknown_field_id_skipped() {
        let registry = registry();
        // Writer knows field 9, reader does not.
        let wide = CodecPlan::new(
            "Inner",
            vec![
                FieldPlan::new(1, "id", WirePlan::I32).required(),
                FieldPlan::new(
                    9,
                    "extra",
                    WirePlan::List(Box::new(WirePlan::nested("test.Inner"))),
                ),
            ],
        );
        let args = StructValue::new().with("id", Value::I32(3)).with(
            "extra",
            Value::List(vec![Value::Struct(
                StructValue::new().with("id", Value::I32(4)),
            )]),
        );
        let bytes = encode(&wide, &args, &registry);
        let mut input = BinaryReader::new(&bytes);
        let decoded =
            decode_struct(&inner_plan(), &registry, &mut input).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(decoded, StructValue::new().with("id", Value::I32(3)));
    }

    #[test]
    fn test_mismatched_wire_type_skipped() {
        let registry = registry();
        // Field 2 written as i32 where the reader expects a string.
        let writer_plan = CodecPlan::new(
            "Inner",
            vec![
                FieldPlan::new(1, "id", WirePlan::I32).required(),
                FieldPlan::new(2, "label", WirePlan::I32),
            ],
        );
        let args = StructValue::new()
            .with("id", Value::I32(5))
            .with("label", Value::I32(6));
        let bytes = encode(&writer_plan, &args, &registry);
        let mut input = BinaryReader::new(&bytes);
        let decoded =
            decode_struct(&inner_plan(), &registry, &mut input).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(decoded, StructValue::new().with("id", Value::I32(5)));
    }

    #[test]
    fn test_unregistered_codec_reference_fails() {
        let plan = CodecPlan::new(
            "Dangling",
            vec![FieldPlan::new(1, "x", WirePlan::nested("test.Nowhere"))],
        );
        let registry = CodecRegistry::new();
        let args = StructValue::new().with("x", Value::Struct(StructValue::new()));
        let mut output = BinaryWriter::new();
        let Err(err) = encode_struct(&plan, &args, &registry, &mut output) else {
            panic!("expected missing codec error");
        };
        assert!(err.message.contains("test.Nowhere"));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            id in any::<i32>(),
            label in ".*",
            tags in proptest::collection::vec(".*", 0..4),
            scores in proptest::collection::vec((".*", any::<i64>()), 0..4),
        ) {
            let registry = registry();
            let args = StructValue::new()
                .with(
                    "inner",
                    Value::Struct(
                        StructValue::new()
                            .with("id", Value::I32(id))
                            .with("label", Value::string(label)),
                    ),
                )
                .with("tags", Value::List(tags.into_iter().map(Value::string).collect()))
                .with(
                    "scores",
                    Value::Map(
                        scores
                            .into_iter()
                            .map(|(k, v)| (Value::string(k), Value::I64(v)))
                            .collect(),
                    ),
                );

            let bytes = encode(&outer_plan(), &args, &registry);
            let mut input = BinaryReader::new(&bytes);
            let decoded = decode_struct(&outer_plan(), &registry, &mut input)
                .unwrap_or_else(|e| panic!("{e}"));
            prop_assert_eq!(decoded, args);
        }
    }
}
