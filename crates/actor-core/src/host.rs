use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::codec::{decode_payload, to_bytes, Record};
use crate::errors::HandlerResult;

/// Binding used when a guest does not name a capability instance.
pub const DEFAULT_BINDING: &str = "default";

/// Opaque primitive that carries an outbound call to the host.
///
/// The call blocks until the host answers. Timeouts and cancellation belong
/// to the host runtime.
pub trait HostTransport: Send + Sync {
    fn host_call(
        &self,
        binding: &str,
        namespace: &str,
        operation: &str,
        payload: Vec<u8>,
    ) -> HandlerResult<Vec<u8>>;
}

impl<F> HostTransport for F
where
    F: Fn(&str, &str, &str, Vec<u8>) -> HandlerResult<Vec<u8>> + Send + Sync,
{
    fn host_call(
        &self,
        binding: &str,
        namespace: &str,
        operation: &str,
        payload: Vec<u8>,
    ) -> HandlerResult<Vec<u8>> {
        self(binding, namespace, operation, payload)
    }
}

/// Client for one capability instance, identified by binding and namespace.
#[derive(Clone)]
pub struct HostClient {
    transport: Arc<dyn HostTransport>,
    binding: String,
    namespace: String,
}

impl HostClient {
    /// Creates a client for `namespace` on the default binding.
    pub fn new(transport: Arc<dyn HostTransport>, namespace: impl Into<String>) -> Self {
        Self {
            transport,
            binding: DEFAULT_BINDING.to_string(),
            namespace: namespace.into(),
        }
    }

    /// Targets a named capability instance instead of the default one.
    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    /// Capability instance this client targets.
    pub fn binding(&self) -> &str {
        &self.binding
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Encodes `request`, sends it to the host and decodes the answer.
    pub fn call<Req: Record, Resp: Record>(
        &self,
        operation: &str,
        request: &Req,
    ) -> HandlerResult<Resp> {
        let response = self.call_raw(operation, to_bytes(request)?)?;
        Ok(decode_payload(&response)?)
    }

    /// Like [`HostClient::call`] but discards whatever the host answers.
    pub fn call_no_reply<Req: Record>(&self, operation: &str, request: &Req) -> HandlerResult<()> {
        self.call_raw(operation, to_bytes(request)?)?;
        Ok(())
    }

    fn call_raw(&self, operation: &str, payload: Vec<u8>) -> HandlerResult<Vec<u8>> {
        trace!(
            "event=host_call module=host binding={} namespace={} operation={} payload_len={}",
            self.binding,
            self.namespace,
            operation,
            payload.len()
        );
        self.transport
            .host_call(&self.binding, &self.namespace, operation, payload)
            .map_err(|err| {
                debug!(
                    "event=host_call_failed module=host binding={} namespace={} operation={} code={}",
                    self.binding,
                    self.namespace,
                    operation,
                    err.info().code
                );
                err
            })
    }
}

impl fmt::Debug for HostClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostClient")
            .field("binding", &self.binding)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// Calls an operation exposed by another actor.
///
/// `actor_ref` may be an image reference, a public key or a call alias; it is
/// sent as the namespace on the default binding.
pub fn call_actor<Req: Record, Resp: Record>(
    transport: Arc<dyn HostTransport>,
    actor_ref: &str,
    operation: &str,
    request: &Req,
) -> HandlerResult<Resp> {
    HostClient::new(transport, actor_ref).call(operation, request)
}
