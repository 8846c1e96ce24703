//! The generated-service client.
//!
//! Serializes calls, sends them through the injected connection, and
//! correlates replies by method name. Sequence numbers increment per client
//! instance; demultiplexing concurrent replies onto callers is the
//! connection's responsibility.

use crate::binary::{BinaryReader, BinaryWriter};
use crate::codec::{decode_struct, encode_struct};
use crate::error::{ApplicationError, ApplicationErrorKind, ClientError, TransportError};
use crate::plan::{CodecRegistry, ServicePlan};
use crate::protocol::{ProtocolReader, ProtocolWriter};
use crate::value::{StructValue, Value};
use crate::wire::MessageKind;

/// The opaque request/response seam a client sends frames through.
///
/// An implementation may multiplex any number of in-flight requests; the
/// client only requires that each call's bytes come back as that call's
/// reply.
pub trait Connection {
    fn send(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// A client for one service, driven by the service's plan.
#[derive(Debug)]
pub struct ServiceClient<'a, C> {
    plan: &'a ServicePlan,
    registry: &'a CodecRegistry,
    connection: C,
    sequence_id: i32,
}

impl<'a, C: Connection> ServiceClient<'a, C> {
    pub fn new(plan: &'a ServicePlan, registry: &'a CodecRegistry, connection: C) -> Self {
        ServiceClient {
            plan,
            registry,
            connection,
            sequence_id: 0,
        }
    }

    fn increment_sequence_id(&mut self) -> i32 {
        self.sequence_id += 1;
        self.sequence_id
    }

    /// Call `method` with `args`, blocking on the connection for the reply.
    pub fn call(&mut self, method: &str, args: &StructValue) -> Result<Value, ClientError> {
        let Some(plan) = self.plan.method(method) else {
            return Err(ApplicationError::new(
                ApplicationErrorKind::UnknownMethod,
                format!("service `{}` has no method `{method}`", self.plan.name),
            )
            .into());
        };

        let sequence_id = self.increment_sequence_id();
        let mut output = BinaryWriter::new();
        output.write_message_begin(method, MessageKind::Call, sequence_id)?;
        encode_struct(&plan.args, args, self.registry, &mut output)?;
        output.write_message_end()?;

        let data = self.connection.send(output.bytes())?;
        let mut input = BinaryReader::new(&data);
        let header = input.read_message_begin()?;

        if header.name != method {
            return Err(ApplicationError::new(
                ApplicationErrorKind::WrongMethodName,
                format!(
                    "received a response to an unknown RPC function: {}",
                    header.name
                ),
            )
            .into());
        }

        if header.kind == MessageKind::Exception {
            let err = ApplicationError::decode(&mut input)?;
            input.read_message_end()?;
            return Err(err.into());
        }

        let result = decode_struct(&plan.result, self.registry, &mut input)?;
        input.read_message_end()?;

        match plan.success_field() {
            Some(success) => match result.get(&success.name) {
                Some(value) => Ok(value.clone()),
                None => Err(ApplicationError::new(
                    ApplicationErrorKind::Unknown,
                    format!("{method} failed: unknown result"),
                )
                .into()),
            },
            // Void method: an empty result envelope is success.
            None => Ok(Value::Void),
        }
    }
}
