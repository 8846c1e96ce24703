//! The binary protocol.
//!
//! Big-endian scalars, length-prefixed strings, strict message framing
//! (version word carrying the message kind). Struct boundaries and field
//! ends write nothing; the field header is a tag byte plus a 16-bit id, and
//! a zero tag byte terminates the field list.

use crate::error::{ProtocolError, ProtocolErrorKind};
use crate::protocol::{FieldHeader, MessageHeader, ProtocolReader, ProtocolWriter};
use crate::wire::{MessageKind, WireType};

const VERSION_1: u32 = 0x8001_0000;
const VERSION_MASK: u32 = 0xffff_0000;

fn len_to_i32(len: usize) -> Result<i32, ProtocolError> {
    i32::try_from(len).map_err(|_| {
        ProtocolError::new(
            ProtocolErrorKind::InvalidData,
            format!("length {len} exceeds i32::MAX"),
        )
    })
}

/// Writer half of the binary protocol, accumulating into a byte buffer.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        BinaryWriter::default()
    }

    /// The bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, yielding the frame.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl ProtocolWriter for BinaryWriter {
    fn write_message_begin(
        &mut self,
        name: &str,
        kind: MessageKind,
        sequence_id: i32,
    ) -> Result<(), ProtocolError> {
        let word = VERSION_1 | u32::from(kind.tag());
        self.buf.extend_from_slice(&word.to_be_bytes());
        self.write_string(name)?;
        self.write_i32(sequence_id)
    }

    fn write_message_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_struct_begin(&mut self, _name: &str) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_struct_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_field_begin(
        &mut self,
        _name: &str,
        wire_type: WireType,
        id: i16,
    ) -> Result<(), ProtocolError> {
        self.buf.push(wire_type.tag());
        self.buf.extend_from_slice(&id.to_be_bytes());
        Ok(())
    }

    fn write_field_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_field_stop(&mut self) -> Result<(), ProtocolError> {
        self.buf.push(WireType::Stop.tag());
        Ok(())
    }

    fn write_list_begin(&mut self, elem: WireType, len: usize) -> Result<(), ProtocolError> {
        self.buf.push(elem.tag());
        self.write_i32(len_to_i32(len)?)
    }

    fn write_list_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_set_begin(&mut self, elem: WireType, len: usize) -> Result<(), ProtocolError> {
        self.write_list_begin(elem, len)
    }

    fn write_set_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_map_begin(
        &mut self,
        key: WireType,
        value: WireType,
        len: usize,
    ) -> Result<(), ProtocolError> {
        self.buf.push(key.tag());
        self.buf.push(value.tag());
        self.write_i32(len_to_i32(len)?)
    }

    fn write_map_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError> {
        self.buf.push(u8::from(value));
        Ok(())
    }

    fn write_byte(&mut self, value: i8) -> Result<(), ProtocolError> {
        self.buf.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError> {
        self.buf.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError> {
        self.buf.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError> {
        self.buf.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError> {
        self.buf.extend_from_slice(&value.to_be_bytes());
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError> {
        self.write_binary(value.as_bytes())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError> {
        self.write_i32(len_to_i32(value.len())?)?;
        self.buf.extend_from_slice(value);
        Ok(())
    }
}

/// Reader half of the binary protocol, a cursor over a received frame.
#[derive(Debug)]
pub struct BinaryReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        BinaryReader { buf, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if self.remaining() < n {
            return Err(ProtocolError::new(
                ProtocolErrorKind::InvalidData,
                "unexpected end of input",
            ));
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    fn read_len(&mut self) -> Result<usize, ProtocolError> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| {
            ProtocolError::new(
                ProtocolErrorKind::NegativeSize,
                format!("negative length {len}"),
            )
        })
    }

    fn read_wire_type(&mut self) -> Result<WireType, ProtocolError> {
        let tag = self.take_u8()?;
        WireType::from_tag(tag).ok_or_else(|| {
            ProtocolError::new(
                ProtocolErrorKind::InvalidData,
                format!("unknown wire-type tag {tag}"),
            )
        })
    }
}

impl ProtocolReader for BinaryReader<'_> {
    fn read_message_begin(&mut self) -> Result<MessageHeader, ProtocolError> {
        let word = u32::from_be_bytes(
            self.take(4)?
                .try_into()
                .map_err(|_| ProtocolError::invalid_data("unexpected end of input"))?,
        );
        if word & VERSION_MASK != VERSION_1 {
            return Err(ProtocolError::new(
                ProtocolErrorKind::BadVersion,
                format!("bad message version in word 0x{word:08X}"),
            ));
        }
        #[allow(clippy::cast_possible_truncation)]
        let kind = MessageKind::from_tag((word & 0xff) as u8).ok_or_else(|| {
            ProtocolError::invalid_data(format!("unknown message kind in word 0x{word:08X}"))
        })?;
        let name = self.read_string()?;
        let sequence_id = self.read_i32()?;
        Ok(MessageHeader {
            name,
            kind,
            sequence_id,
        })
    }

    fn read_message_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_struct_begin(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_struct_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_field_begin(&mut self) -> Result<FieldHeader, ProtocolError> {
        let wire_type = self.read_wire_type()?;
        if wire_type == WireType::Stop {
            return Ok(FieldHeader { wire_type, id: 0 });
        }
        let id = self.read_i16()?;
        Ok(FieldHeader { wire_type, id })
    }

    fn read_field_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_list_begin(&mut self) -> Result<(WireType, usize), ProtocolError> {
        let elem = self.read_wire_type()?;
        let len = self.read_len()?;
        Ok((elem, len))
    }

    fn read_list_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_set_begin(&mut self) -> Result<(WireType, usize), ProtocolError> {
        self.read_list_begin()
    }

    fn read_set_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_map_begin(&mut self) -> Result<(WireType, WireType, usize), ProtocolError> {
        let key = self.read_wire_type()?;
        let value = self.read_wire_type()?;
        let len = self.read_len()?;
        Ok((key, value, len))
    }

    fn read_map_end(&mut self) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.take_u8()? != 0)
    }

    fn read_byte(&mut self) -> Result<i8, ProtocolError> {
        #[allow(clippy::cast_possible_wrap)]
        Ok(self.take_u8()? as i8)
    }

    fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        let bytes = self.take(2)?;
        Ok(i16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        let bytes = self.take(8)?;
        Ok(i64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    fn read_double(&mut self) -> Result<f64, ProtocolError> {
        let bytes = self.take(8)?;
        Ok(f64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    fn read_string(&mut self) -> Result<String, ProtocolError> {
        let bytes = self.read_binary()?;
        String::from_utf8(bytes)
            .map_err(|_| ProtocolError::invalid_data("string payload is not valid UTF-8"))
    }

    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let len = self.read_len()?;
        Ok(self.take(len)?.to_vec())
    }
}
