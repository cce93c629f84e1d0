use std::fmt;
use std::sync::Arc;

use crate::errors::HandlerResult;
use crate::host::{HostClient, HostTransport};
use crate::registry::{Dispatcher, OperationRegistry};

/// Runtime context of one guest instance.
///
/// Owns the sealed dispatch table and the transport used for outbound calls.
/// The host drives it one call at a time.
pub struct Guest {
    dispatcher: Dispatcher,
    transport: Arc<dyn HostTransport>,
}

impl Guest {
    /// Ends registration by sealing `registry`.
    pub fn new(registry: OperationRegistry, transport: Arc<dyn HostTransport>) -> Self {
        Self {
            dispatcher: registry.seal(),
            transport,
        }
    }

    /// Dispatch entry point for inbound calls from the host.
    pub fn dispatch(&self, operation: &str, payload: &[u8]) -> HandlerResult<Vec<u8>> {
        self.dispatcher.invoke(operation, payload)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Shared handle on the outbound transport.
    pub fn transport(&self) -> Arc<dyn HostTransport> {
        Arc::clone(&self.transport)
    }

    /// Client for `namespace` on the default binding.
    pub fn host_client(&self, namespace: &str) -> HostClient {
        HostClient::new(self.transport(), namespace)
    }
}

impl fmt::Debug for Guest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guest")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
