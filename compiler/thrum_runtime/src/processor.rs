//! The generated-service processor.
//!
//! Reads an inbound call, dispatches by method name to the matching
//! decode → invoke → encode pipeline, and always produces a well-formed
//! reply or exception frame. The succeed/fail branching is uniform across
//! methods: one pipeline, parameterized by the method's plans.

use crate::binary::{BinaryReader, BinaryWriter};
use crate::codec::{decode_struct, encode_struct};
use crate::error::{ApplicationError, ApplicationErrorKind, HandlerError, ProtocolError};
use crate::plan::{CodecRegistry, MethodPlan, ServicePlan};
use crate::protocol::{skip, ProtocolReader, ProtocolWriter};
use crate::value::{StructValue, Value};
use crate::wire::{MessageKind, WireType};

/// The service implementation the processor dispatches into.
///
/// Implementations must be safe for concurrent invocation if inbound
/// messages are processed concurrently; the processor imposes no
/// serialization of its own.
pub trait Handler {
    fn call(&self, method: &str, args: &StructValue) -> Result<Value, HandlerError>;
}

/// A processor for one service, driven by the service's plan.
#[derive(Debug)]
pub struct Processor<'a, H> {
    plan: &'a ServicePlan,
    registry: &'a CodecRegistry,
    handler: H,
}

impl<'a, H: Handler> Processor<'a, H> {
    pub fn new(plan: &'a ServicePlan, registry: &'a CodecRegistry, handler: H) -> Self {
        Processor {
            plan,
            registry,
            handler,
        }
    }

    /// Process one inbound frame into one outbound frame.
    ///
    /// Every handler or decode failure becomes an exception reply; an `Err`
    /// here means the inbound frame itself was unreadable.
    pub fn process(&self, request: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let mut input = BinaryReader::new(request);
        let header = input.read_message_begin()?;

        match self.plan.method(&header.name) {
            Some(method) => self.process_method(method, header.sequence_id, &mut input),
            None => {
                // Never invokes a handler: consume the payload and answer
                // with an unknown-method exception.
                skip(&mut input, WireType::Struct)?;
                input.read_message_end()?;
                let err = ApplicationError::new(
                    ApplicationErrorKind::UnknownMethod,
                    format!("unknown function {}", header.name),
                );
                exception_frame(&header.name, header.sequence_id, &err)
            }
        }
    }

    fn process_method(
        &self,
        method: &MethodPlan,
        sequence_id: i32,
        input: &mut BinaryReader<'_>,
    ) -> Result<Vec<u8>, ProtocolError> {
        match self.run_pipeline(method, input) {
            Ok(result) => {
                let mut output = BinaryWriter::new();
                output.write_message_begin(&method.name, MessageKind::Reply, sequence_id)?;
                encode_struct(&method.result, &result, self.registry, &mut output)?;
                output.write_message_end()?;
                Ok(output.into_bytes())
            }
            Err(message) => exception_frame(
                &method.name,
                sequence_id,
                &ApplicationError::new(ApplicationErrorKind::Unknown, message),
            ),
        }
    }

    /// The per-method pipeline: decode arguments, invoke the handler, build
    /// the result envelope. Any failure is collapsed to its message and
    /// surfaces as an exception reply.
    fn run_pipeline(
        &self,
        method: &MethodPlan,
        input: &mut BinaryReader<'_>,
    ) -> Result<StructValue, String> {
        let args = decode_struct(&method.args, self.registry, input).map_err(|e| e.to_string())?;
        input.read_message_end().map_err(|e| e.to_string())?;

        let value = self
            .handler
            .call(&method.name, &args)
            .map_err(|e| e.message)?;

        let mut result = StructValue::new();
        if let Some(success) = method.success_field() {
            result.insert(&success.name, value);
        }
        Ok(result)
    }
}

fn exception_frame(
    name: &str,
    sequence_id: i32,
    err: &ApplicationError,
) -> Result<Vec<u8>, ProtocolError> {
    let mut output = BinaryWriter::new();
    output.write_message_begin(name, MessageKind::Exception, sequence_id)?;
    err.encode(&mut output)?;
    output.write_message_end()?;
    Ok(output.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Connection, ServiceClient};
    use crate::error::{ClientError, TransportError};
    use crate::plan::{CodecPlan, FieldPlan, WirePlan};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn adder_plan() -> ServicePlan {
        ServicePlan::new(
            "Adder",
            vec![
                MethodPlan {
                    name: "add".to_string(),
                    args: CodecPlan::new(
                        "Add__Args",
                        vec![
                            FieldPlan::new(1, "a", WirePlan::I32).required(),
                            FieldPlan::new(2, "b", WirePlan::I32).required(),
                        ],
                    ),
                    result: CodecPlan::new(
                        "Add__Result",
                        vec![FieldPlan::new(0, "success", WirePlan::I32)],
                    ),
                },
                MethodPlan {
                    name: "reset".to_string(),
                    args: CodecPlan::new("Reset__Args", vec![]),
                    result: CodecPlan::new("Reset__Result", vec![]),
                },
            ],
        )
    }

    struct AdderHandler {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Handler for AdderHandler {
        fn call(&self, method: &str, args: &StructValue) -> Result<Value, HandlerError> {
            self.calls.borrow_mut().push(method.to_string());
            match method {
                "add" => {
                    let (Some(Value::I32(a)), Some(Value::I32(b))) =
                        (args.get("a"), args.get("b"))
                    else {
                        return Err(HandlerError::new("bad arguments"));
                    };
                    a.checked_add(*b)
                        .map(Value::I32)
                        .ok_or_else(|| HandlerError::new("overflow"))
                }
                "reset" => Ok(Value::Void),
                _ => Err(HandlerError::new(format!("unhandled method {method}"))),
            }
        }
    }

    fn call_frame(name: &str, sequence_id: i32, args: &StructValue, plan: &CodecPlan) -> Vec<u8> {
        let registry = CodecRegistry::new();
        let mut output = BinaryWriter::new();
        output
            .write_message_begin(name, MessageKind::Call, sequence_id)
            .unwrap_or_else(|e| panic!("{e}"));
        encode_struct(plan, args, &registry, &mut output).unwrap_or_else(|e| panic!("{e}"));
        output.write_message_end().unwrap_or_else(|e| panic!("{e}"));
        output.into_bytes()
    }

    fn read_reply(bytes: &[u8]) -> (String, MessageKind, i32) {
        let mut input = BinaryReader::new(bytes);
        let header = input.read_message_begin().unwrap_or_else(|e| panic!("{e}"));
        (header.name, header.kind, header.sequence_id)
    }

    #[test]
    fn test_successful_dispatch_encodes_reply() {
        let plan = adder_plan();
        let registry = CodecRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let processor = Processor::new(&plan, &registry, AdderHandler { calls: calls.clone() });

        let args = StructValue::new()
            .with("a", Value::I32(2))
            .with("b", Value::I32(3));
        let request = call_frame("add", 7, &args, &plan.methods[0].args);
        let reply = processor.process(&request).unwrap_or_else(|e| panic!("{e}"));

        let (name, kind, sequence_id) = read_reply(&reply);
        assert_eq!((name.as_str(), kind, sequence_id), ("add", MessageKind::Reply, 7));

        let mut input = BinaryReader::new(&reply);
        input.read_message_begin().unwrap_or_else(|e| panic!("{e}"));
        let result = decode_struct(&plan.methods[0].result, &registry, &mut input)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(result.get("success"), Some(&Value::I32(5)));
        assert_eq!(*calls.borrow(), vec!["add".to_string()]);
    }

    #[test]
    fn test_unknown_method_replies_exception_without_invoking_handler() {
        let plan = adder_plan();
        let registry = CodecRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let processor = Processor::new(&plan, &registry, AdderHandler { calls: calls.clone() });

        let request = call_frame("subtract", 9, &StructValue::new(), &CodecPlan::new("X", vec![]));
        let reply = processor.process(&request).unwrap_or_else(|e| panic!("{e}"));

        let (name, kind, sequence_id) = read_reply(&reply);
        assert_eq!(
            (name.as_str(), kind, sequence_id),
            ("subtract", MessageKind::Exception, 9)
        );

        let mut input = BinaryReader::new(&reply);
        input.read_message_begin().unwrap_or_else(|e| panic!("{e}"));
        let err = ApplicationError::decode(&mut input).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(err.kind, ApplicationErrorKind::UnknownMethod);
        assert!(calls.borrow().is_empty(), "handler must not be invoked");
    }

    #[test]
    fn test_handler_failure_becomes_exception_reply() {
        let plan = adder_plan();
        let registry = CodecRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let processor = Processor::new(&plan, &registry, AdderHandler { calls });

        let args = StructValue::new()
            .with("a", Value::I32(i32::MAX))
            .with("b", Value::I32(1));
        let request = call_frame("add", 1, &args, &plan.methods[0].args);
        let reply = processor.process(&request).unwrap_or_else(|e| panic!("{e}"));

        let (_, kind, _) = read_reply(&reply);
        assert_eq!(kind, MessageKind::Exception);

        let mut input = BinaryReader::new(&reply);
        input.read_message_begin().unwrap_or_else(|e| panic!("{e}"));
        let err = ApplicationError::decode(&mut input).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(err.kind, ApplicationErrorKind::Unknown);
        assert_eq!(err.message, "overflow");
    }

    #[test]
    fn test_missing_required_argument_becomes_exception_reply() {
        let plan = adder_plan();
        let registry = CodecRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let processor = Processor::new(&plan, &registry, AdderHandler { calls: calls.clone() });

        // Encode the args with a lax plan so the required `b` is absent.
        let lax = CodecPlan::new(
            "Add__Args",
            vec![FieldPlan::new(1, "a", WirePlan::I32)],
        );
        let args = StructValue::new().with("a", Value::I32(1));
        let request = call_frame("add", 2, &args, &lax);
        let reply = processor.process(&request).unwrap_or_else(|e| panic!("{e}"));

        let (_, kind, _) = read_reply(&reply);
        assert_eq!(kind, MessageKind::Exception);
        assert!(calls.borrow().is_empty());
    }

    /// A loopback connection: the client's frames go straight into a
    /// processor.
    struct Loopback<'a, H> {
        processor: Processor<'a, H>,
    }

    impl<H: Handler> Connection for Loopback<'_, H> {
        fn send(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
            self.processor
                .process(request)
                .map_err(|e| TransportError::new(e.to_string()))
        }
    }

    #[test]
    fn test_client_processor_loopback() {
        let plan = adder_plan();
        let registry = CodecRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let connection = Loopback {
            processor: Processor::new(&plan, &registry, AdderHandler { calls }),
        };
        let mut client = ServiceClient::new(&plan, &registry, connection);

        let args = StructValue::new()
            .with("a", Value::I32(20))
            .with("b", Value::I32(22));
        let value = client.call("add", &args).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(value, Value::I32(42));

        let value = client
            .call("reset", &StructValue::new())
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(value, Value::Void);
    }

    #[test]
    fn test_loopback_handler_error_surfaces_as_application_error() {
        let plan = adder_plan();
        let registry = CodecRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let connection = Loopback {
            processor: Processor::new(&plan, &registry, AdderHandler { calls }),
        };
        let mut client = ServiceClient::new(&plan, &registry, connection);

        let args = StructValue::new()
            .with("a", Value::I32(i32::MAX))
            .with("b", Value::I32(1));
        let Err(ClientError::Application(err)) = client.call("add", &args) else {
            panic!("expected application error");
        };
        assert_eq!(err.message, "overflow");
    }
}
