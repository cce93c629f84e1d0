use std::collections::BTreeMap;
use std::fmt;

use log::{debug, trace, warn};

use crate::codec::{decode_payload, to_bytes, Record};
use crate::errors::{ActorError, ErrorInfo, HandlerResult};

type OperationHandler = Box<dyn Fn(&[u8]) -> HandlerResult<Vec<u8>>>;

/// Mutable table of guest operations, filled during startup.
///
/// Once every handler is registered the table is sealed into a read-only
/// [`Dispatcher`]; nothing can be registered after that point.
#[derive(Default)]
pub struct OperationRegistry {
    handlers: BTreeMap<String, OperationHandler>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a request/response handler for `operation`.
    ///
    /// Registering the same name again replaces the earlier handler.
    pub fn register<Req, Resp, F>(&mut self, operation: impl Into<String>, handler: F) -> &mut Self
    where
        Req: Record,
        Resp: Record,
        F: Fn(Req) -> HandlerResult<Resp> + 'static,
    {
        let operation = operation.into();
        let name = operation.clone();
        let wrapped = move |payload: &[u8]| -> HandlerResult<Vec<u8>> {
            let request = decode_request::<Req>(&name, payload)?;
            let response = handler(request)?;
            Ok(to_bytes(&response)?)
        };
        self.insert(operation, Box::new(wrapped))
    }

    /// Registers a handler whose operation returns nothing. A successful
    /// call answers with an empty buffer.
    pub fn register_void<Req, F>(&mut self, operation: impl Into<String>, handler: F) -> &mut Self
    where
        Req: Record,
        F: Fn(Req) -> HandlerResult<()> + 'static,
    {
        let operation = operation.into();
        let name = operation.clone();
        let wrapped = move |payload: &[u8]| -> HandlerResult<Vec<u8>> {
            let request = decode_request::<Req>(&name, payload)?;
            handler(request)?;
            Ok(Vec::new())
        };
        self.insert(operation, Box::new(wrapped))
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Ends the registration phase.
    pub fn seal(self) -> Dispatcher {
        debug!(
            "event=registry_sealed module=dispatch operations={}",
            self.handlers.len()
        );
        Dispatcher {
            handlers: self.handlers,
        }
    }

    fn insert(&mut self, operation: String, handler: OperationHandler) -> &mut Self {
        if self.handlers.insert(operation.clone(), handler).is_some() {
            warn!(
                "event=operation_replaced module=dispatch operation={}",
                operation
            );
        } else {
            debug!(
                "event=operation_registered module=dispatch operation={}",
                operation
            );
        }
        self
    }
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Read-only dispatch table serving inbound operations.
pub struct Dispatcher {
    handlers: BTreeMap<String, OperationHandler>,
}

impl Dispatcher {
    /// Runs the handler registered for `operation` against `payload`.
    ///
    /// On success returns the encoded response (empty for void operations).
    /// Any failure yields the error alone; no response bytes are produced.
    pub fn invoke(&self, operation: &str, payload: &[u8]) -> HandlerResult<Vec<u8>> {
        let handler = self.handlers.get(operation).ok_or_else(|| {
            ActorError::Dispatch(
                ErrorInfo::new(
                    "actor_core.unknown_operation",
                    format!("no handler registered for operation {operation}"),
                )
                .with_context("operation", operation),
            )
        })?;
        trace!(
            "event=invoke module=dispatch operation={} payload_len={}",
            operation,
            payload.len()
        );
        match handler(payload) {
            Ok(response) => {
                trace!(
                    "event=invoke_ok module=dispatch operation={} response_len={}",
                    operation,
                    response.len()
                );
                Ok(response)
            }
            Err(err) => {
                debug!(
                    "event=invoke_failed module=dispatch operation={} code={}",
                    operation,
                    err.info().code
                );
                Err(err)
            }
        }
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    /// Registered operation names in sorted order.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("operations", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn decode_request<Req: Record>(operation: &str, payload: &[u8]) -> HandlerResult<Req> {
    decode_payload(payload).map_err(|err| {
        let err = ActorError::from(err);
        debug!(
            "event=request_decode_failed module=dispatch operation={} code={}",
            operation,
            err.info().code
        );
        match err {
            ActorError::Decode(info) => {
                ActorError::Decode(info.with_context("operation", operation))
            }
            other => other,
        }
    })
}
