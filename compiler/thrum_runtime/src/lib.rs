//! Runtime contract for Thrum-generated artifacts.
//!
//! The generator emits *plans* — data describing how each struct and service
//! maps onto the wire — and this crate executes them:
//! - [`wire`]: wire-type tags and RPC message kinds
//! - [`protocol`]: reader/writer traits and payload skipping
//! - [`binary`]: the binary protocol (big-endian, strict message framing)
//! - [`plan`]: codec and service plans plus the codec registry
//! - [`codec`]: plan-driven struct encode/decode
//! - [`client`]: call serialization and reply correlation over an injected
//!   connection
//! - [`processor`]: inbound dispatch to a handler, with uniform
//!   succeed/fail reply framing
//!
//! Two error families, deliberately distinct: [`ProtocolError`] for wire
//! violations (a missing required field, malformed frames) and
//! [`ApplicationError`] for RPC-layer failures (unknown method, wrong reply
//! correlation, handler errors).

mod binary;
mod client;
mod codec;
mod error;
mod plan;
mod processor;
mod protocol;
mod value;
mod wire;

pub use binary::{BinaryReader, BinaryWriter};
pub use client::{Connection, ServiceClient};
pub use codec::{decode_struct, encode_struct};
pub use error::{
    ApplicationError, ApplicationErrorKind, ClientError, HandlerError, ProtocolError,
    ProtocolErrorKind, TransportError,
};
pub use plan::{CodecPlan, CodecRegistry, FieldPlan, MethodPlan, ServicePlan, WirePlan};
pub use processor::{Handler, Processor};
pub use protocol::{skip, FieldHeader, MessageHeader, ProtocolReader, ProtocolWriter};
pub use value::{StructValue, Value};
pub use wire::{MessageKind, WireType};
