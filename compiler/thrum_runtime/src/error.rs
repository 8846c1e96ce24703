//! Runtime error families.
//!
//! [`ProtocolError`] covers wire violations local to one struct or frame.
//! [`ApplicationError`] is the RPC-layer family distinct from protocol
//! violations; it travels on the wire as an exception frame with a
//! (message, kind) payload. Handler failures surface as [`HandlerError`]
//! and are converted by the processor, never propagated raw.

use std::fmt;

use crate::protocol::{skip, ProtocolReader, ProtocolWriter};
use crate::wire::WireType;

/// What went wrong at the protocol layer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ProtocolErrorKind {
    Unknown,
    InvalidData,
    NegativeSize,
    BadVersion,
}

impl fmt::Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolErrorKind::Unknown => f.write_str("unknown"),
            ProtocolErrorKind::InvalidData => f.write_str("invalid data"),
            ProtocolErrorKind::NegativeSize => f.write_str("negative size"),
            ProtocolErrorKind::BadVersion => f.write_str("bad version"),
        }
    }
}

/// A wire-protocol violation.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("protocol error ({kind}): {message}")]
pub struct ProtocolError {
    pub kind: ProtocolErrorKind,
    pub message: String,
}

impl ProtocolError {
    pub fn new(kind: ProtocolErrorKind, message: impl Into<String>) -> Self {
        ProtocolError {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        ProtocolError::new(ProtocolErrorKind::Unknown, message)
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        ProtocolError::new(ProtocolErrorKind::InvalidData, message)
    }

    /// A required field had no value at encode time.
    pub fn required_field_unset(field: &str) -> Self {
        ProtocolError::unknown(format!("required field `{field}` is unset"))
    }

    /// A required field was missing after decoding a struct.
    pub fn missing_required(struct_name: &str) -> Self {
        ProtocolError::unknown(format!("unable to read `{struct_name}` from input"))
    }
}

/// What went wrong at the RPC layer.
///
/// The numeric values travel on the wire inside exception frames.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(i32)]
pub enum ApplicationErrorKind {
    Unknown = 0,
    UnknownMethod = 1,
    InvalidMessageType = 2,
    WrongMethodName = 3,
    BadSequenceId = 4,
    MissingResult = 5,
    InternalError = 6,
    ProtocolError = 7,
}

impl ApplicationErrorKind {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> ApplicationErrorKind {
        match code {
            1 => ApplicationErrorKind::UnknownMethod,
            2 => ApplicationErrorKind::InvalidMessageType,
            3 => ApplicationErrorKind::WrongMethodName,
            4 => ApplicationErrorKind::BadSequenceId,
            5 => ApplicationErrorKind::MissingResult,
            6 => ApplicationErrorKind::InternalError,
            7 => ApplicationErrorKind::ProtocolError,
            _ => ApplicationErrorKind::Unknown,
        }
    }
}

impl fmt::Display for ApplicationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationErrorKind::Unknown => f.write_str("unknown"),
            ApplicationErrorKind::UnknownMethod => f.write_str("unknown method"),
            ApplicationErrorKind::InvalidMessageType => f.write_str("invalid message type"),
            ApplicationErrorKind::WrongMethodName => f.write_str("wrong method name"),
            ApplicationErrorKind::BadSequenceId => f.write_str("bad sequence id"),
            ApplicationErrorKind::MissingResult => f.write_str("missing result"),
            ApplicationErrorKind::InternalError => f.write_str("internal error"),
            ApplicationErrorKind::ProtocolError => f.write_str("protocol error"),
        }
    }
}

/// An RPC-layer failure, as carried by exception frames.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("application error ({kind}): {message}")]
pub struct ApplicationError {
    pub kind: ApplicationErrorKind,
    pub message: String,
}

/// Field ids of the exception payload struct.
const FIELD_MESSAGE: i16 = 1;
const FIELD_KIND: i16 = 2;

impl ApplicationError {
    pub fn new(kind: ApplicationErrorKind, message: impl Into<String>) -> Self {
        ApplicationError {
            kind,
            message: message.into(),
        }
    }

    /// Write the exception payload: message under field 1, kind under
    /// field 2.
    pub fn encode<W: ProtocolWriter>(&self, output: &mut W) -> Result<(), ProtocolError> {
        output.write_struct_begin("ApplicationException")?;
        output.write_field_begin("message", WireType::String, FIELD_MESSAGE)?;
        output.write_string(&self.message)?;
        output.write_field_end()?;
        output.write_field_begin("type", WireType::I32, FIELD_KIND)?;
        output.write_i32(self.kind.code())?;
        output.write_field_end()?;
        output.write_field_stop()?;
        output.write_struct_end()?;
        Ok(())
    }

    /// Read an exception payload, skipping unknown fields.
    pub fn decode<R: ProtocolReader>(input: &mut R) -> Result<ApplicationError, ProtocolError> {
        let mut message = String::new();
        let mut kind = ApplicationErrorKind::Unknown;

        input.read_struct_begin()?;
        loop {
            let header = input.read_field_begin()?;
            if header.wire_type == WireType::Stop {
                break;
            }
            match (header.id, header.wire_type) {
                (FIELD_MESSAGE, WireType::String) => message = input.read_string()?,
                (FIELD_KIND, WireType::I32) => {
                    kind = ApplicationErrorKind::from_code(input.read_i32()?);
                }
                _ => skip(input, header.wire_type)?,
            }
            input.read_field_end()?;
        }
        input.read_struct_end()?;

        Ok(ApplicationError { kind, message })
    }
}

/// A transport failure reported by the injected connection.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
        }
    }
}

/// A handler failure, converted by the processor into an exception reply.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError {
            message: message.into(),
        }
    }
}

/// Everything a client call can fail with.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Application(#[from] ApplicationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
