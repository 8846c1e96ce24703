//! Wire-type tags and RPC message kinds.

use std::fmt;

/// Wire-type tag of a field payload.
///
/// The numeric values are the on-wire tags and must not change. Binary
/// strings and `string` share tag 11.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum WireType {
    Stop = 0,
    Void = 1,
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl WireType {
    /// The on-wire tag byte.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a tag byte.
    pub fn from_tag(tag: u8) -> Option<WireType> {
        match tag {
            0 => Some(WireType::Stop),
            1 => Some(WireType::Void),
            2 => Some(WireType::Bool),
            3 => Some(WireType::Byte),
            4 => Some(WireType::Double),
            6 => Some(WireType::I16),
            8 => Some(WireType::I32),
            10 => Some(WireType::I64),
            11 => Some(WireType::String),
            12 => Some(WireType::Struct),
            13 => Some(WireType::Map),
            14 => Some(WireType::Set),
            15 => Some(WireType::List),
            _ => None,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireType::Stop => "stop",
            WireType::Void => "void",
            WireType::Bool => "bool",
            WireType::Byte => "byte",
            WireType::Double => "double",
            WireType::I16 => "i16",
            WireType::I32 => "i32",
            WireType::I64 => "i64",
            WireType::String => "string",
            WireType::Struct => "struct",
            WireType::Map => "map",
            WireType::Set => "set",
            WireType::List => "list",
        };
        f.write_str(name)
    }
}

/// Kind of an RPC message frame.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum MessageKind {
    Call = 1,
    Reply = 2,
    Exception = 3,
}

impl MessageKind {
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<MessageKind> {
        match tag {
            1 => Some(MessageKind::Call),
            2 => Some(MessageKind::Reply),
            3 => Some(MessageKind::Exception),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Call => f.write_str("call"),
            MessageKind::Reply => f.write_str("reply"),
            MessageKind::Exception => f.write_str("exception"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_tags_round_trip() {
        for tag in 0u8..=16 {
            if let Some(wire) = WireType::from_tag(tag) {
                assert_eq!(wire.tag(), tag);
            }
        }
        assert_eq!(WireType::from_tag(5), None);
        assert_eq!(WireType::from_tag(200), None);
    }

    #[test]
    fn test_message_kind_tags() {
        assert_eq!(MessageKind::from_tag(1), Some(MessageKind::Call));
        assert_eq!(MessageKind::from_tag(3), Some(MessageKind::Exception));
        assert_eq!(MessageKind::from_tag(0), None);
    }
}
