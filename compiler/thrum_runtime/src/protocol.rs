//! Protocol reader/writer traits and payload skipping.
//!
//! Codecs drive these traits; the binary protocol implements them. A
//! different protocol (compact, JSON) would slot in behind the same seam.

use crate::error::{ProtocolError, ProtocolErrorKind};
use crate::wire::{MessageKind, WireType};

/// Header of an RPC message frame.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MessageHeader {
    pub name: String,
    pub kind: MessageKind,
    pub sequence_id: i32,
}

/// Header of one struct field. A `Stop` wire type terminates the field list;
/// its id is meaningless.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FieldHeader {
    pub wire_type: WireType,
    pub id: i16,
}

/// Sink half of a protocol.
pub trait ProtocolWriter {
    fn write_message_begin(
        &mut self,
        name: &str,
        kind: MessageKind,
        sequence_id: i32,
    ) -> Result<(), ProtocolError>;
    fn write_message_end(&mut self) -> Result<(), ProtocolError>;

    fn write_struct_begin(&mut self, name: &str) -> Result<(), ProtocolError>;
    fn write_struct_end(&mut self) -> Result<(), ProtocolError>;

    fn write_field_begin(
        &mut self,
        name: &str,
        wire_type: WireType,
        id: i16,
    ) -> Result<(), ProtocolError>;
    fn write_field_end(&mut self) -> Result<(), ProtocolError>;
    fn write_field_stop(&mut self) -> Result<(), ProtocolError>;

    fn write_list_begin(&mut self, elem: WireType, len: usize) -> Result<(), ProtocolError>;
    fn write_list_end(&mut self) -> Result<(), ProtocolError>;
    fn write_set_begin(&mut self, elem: WireType, len: usize) -> Result<(), ProtocolError>;
    fn write_set_end(&mut self) -> Result<(), ProtocolError>;
    fn write_map_begin(
        &mut self,
        key: WireType,
        value: WireType,
        len: usize,
    ) -> Result<(), ProtocolError>;
    fn write_map_end(&mut self) -> Result<(), ProtocolError>;

    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError>;
    fn write_byte(&mut self, value: i8) -> Result<(), ProtocolError>;
    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError>;
    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError>;
    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError>;
    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError>;
    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError>;
    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError>;
}

/// Source half of a protocol.
pub trait ProtocolReader {
    fn read_message_begin(&mut self) -> Result<MessageHeader, ProtocolError>;
    fn read_message_end(&mut self) -> Result<(), ProtocolError>;

    fn read_struct_begin(&mut self) -> Result<(), ProtocolError>;
    fn read_struct_end(&mut self) -> Result<(), ProtocolError>;

    fn read_field_begin(&mut self) -> Result<FieldHeader, ProtocolError>;
    fn read_field_end(&mut self) -> Result<(), ProtocolError>;

    fn read_list_begin(&mut self) -> Result<(WireType, usize), ProtocolError>;
    fn read_list_end(&mut self) -> Result<(), ProtocolError>;
    fn read_set_begin(&mut self) -> Result<(WireType, usize), ProtocolError>;
    fn read_set_end(&mut self) -> Result<(), ProtocolError>;
    fn read_map_begin(&mut self) -> Result<(WireType, WireType, usize), ProtocolError>;
    fn read_map_end(&mut self) -> Result<(), ProtocolError>;

    fn read_bool(&mut self) -> Result<bool, ProtocolError>;
    fn read_byte(&mut self) -> Result<i8, ProtocolError>;
    fn read_i16(&mut self) -> Result<i16, ProtocolError>;
    fn read_i32(&mut self) -> Result<i32, ProtocolError>;
    fn read_i64(&mut self) -> Result<i64, ProtocolError>;
    fn read_double(&mut self) -> Result<f64, ProtocolError>;
    fn read_string(&mut self) -> Result<String, ProtocolError>;
    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError>;
}

/// Skip one payload of the given wire type.
///
/// This is what makes unknown fields forward-compatible: the payload is
/// consumed structurally and discarded.
pub fn skip<R: ProtocolReader + ?Sized>(
    input: &mut R,
    wire_type: WireType,
) -> Result<(), ProtocolError> {
    match wire_type {
        WireType::Stop => Err(ProtocolError::new(
            ProtocolErrorKind::InvalidData,
            "cannot skip a stop marker",
        )),
        WireType::Void => Ok(()),
        WireType::Bool => input.read_bool().map(|_| ()),
        WireType::Byte => input.read_byte().map(|_| ()),
        WireType::Double => input.read_double().map(|_| ()),
        WireType::I16 => input.read_i16().map(|_| ()),
        WireType::I32 => input.read_i32().map(|_| ()),
        WireType::I64 => input.read_i64().map(|_| ()),
        // String and binary share a tag; skipping never validates UTF-8.
        WireType::String => input.read_binary().map(|_| ()),
        WireType::Struct => {
            input.read_struct_begin()?;
            loop {
                let header = input.read_field_begin()?;
                if header.wire_type == WireType::Stop {
                    break;
                }
                skip(input, header.wire_type)?;
                input.read_field_end()?;
            }
            input.read_struct_end()
        }
        WireType::List => {
            let (elem, len) = input.read_list_begin()?;
            for _ in 0..len {
                skip(input, elem)?;
            }
            input.read_list_end()
        }
        WireType::Set => {
            let (elem, len) = input.read_set_begin()?;
            for _ in 0..len {
                skip(input, elem)?;
            }
            input.read_set_end()
        }
        WireType::Map => {
            let (key, value, len) = input.read_map_begin()?;
            for _ in 0..len {
                skip(input, key)?;
                skip(input, value)?;
            }
            input.read_map_end()
        }
    }
}
