use std::sync::{Arc, Mutex};

use actor_core::{
    call_actor, to_bytes, ActorError, Empty, HandlerResult, HealthCheckRequest,
    HealthCheckResponse, HostClient, HostTransport, DEFAULT_BINDING,
};

#[derive(Debug, Clone, PartialEq)]
struct Call {
    binding: String,
    namespace: String,
    operation: String,
    payload: Vec<u8>,
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<Call>>,
    reply: Vec<u8>,
}

impl Recorder {
    fn replying(reply: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply,
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl HostTransport for Recorder {
    fn host_call(
        &self,
        binding: &str,
        namespace: &str,
        operation: &str,
        payload: Vec<u8>,
    ) -> HandlerResult<Vec<u8>> {
        self.calls.lock().unwrap().push(Call {
            binding: binding.into(),
            namespace: namespace.into(),
            operation: operation.into(),
            payload,
        });
        Ok(self.reply.clone())
    }
}

#[test]
fn client_sends_encoded_request_on_default_binding() {
    let reply = to_bytes(&HealthCheckResponse::unhealthy("degraded")).unwrap();
    let recorder = Recorder::replying(reply);
    let client = HostClient::new(recorder.clone(), "wasmcloud:health");
    assert_eq!(client.binding(), DEFAULT_BINDING);

    let request = HealthCheckRequest { placeholder: true };
    let response: HealthCheckResponse = client.call("HealthRequest", &request).unwrap();
    assert_eq!(response.message, "degraded");

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].binding, "default");
    assert_eq!(calls[0].namespace, "wasmcloud:health");
    assert_eq!(calls[0].operation, "HealthRequest");
    assert_eq!(calls[0].payload, to_bytes(&request).unwrap());
}

#[test]
fn zero_field_request_is_an_empty_map() {
    let recorder = Recorder::replying(Vec::new());
    let client = HostClient::new(recorder.clone(), "wasmcloud:blobstore").with_binding("backup");
    client.call_no_reply("Ping", &Empty).unwrap();
    let calls = recorder.calls();
    assert_eq!(calls[0].binding, "backup");
    assert_eq!(calls[0].payload, vec![0x80]);
}

#[test]
fn empty_reply_decodes_as_default() {
    let recorder = Recorder::replying(Vec::new());
    let client = HostClient::new(recorder, "wasmcloud:health");
    let response: HealthCheckResponse = client.call("HealthRequest", &Empty).unwrap();
    assert_eq!(response, HealthCheckResponse::default());
}

#[test]
fn transport_error_is_returned_unchanged() {
    let failing = Arc::new(
        |_: &str, _: &str, _: &str, _: Vec<u8>| -> HandlerResult<Vec<u8>> {
            Err(ActorError::transport("host.unreachable", "link not found"))
        },
    );
    let client = HostClient::new(failing, "wasmcloud:logging");
    let err = client.call_no_reply("WriteLog", &Empty).unwrap_err();
    assert!(matches!(err, ActorError::Transport(_)));
    assert_eq!(err.info().code, "host.unreachable");
}

#[test]
fn garbage_reply_is_a_decode_error() {
    let recorder = Recorder::replying(vec![0x81, 0xa7]);
    let client = HostClient::new(recorder, "wasmcloud:health");
    let err = client
        .call::<_, HealthCheckResponse>("HealthRequest", &Empty)
        .unwrap_err();
    assert!(matches!(err, ActorError::Decode(_)));
}

#[test]
fn actor_calls_use_the_reference_as_namespace() {
    let reply = to_bytes(&HealthCheckResponse::healthy()).unwrap();
    let recorder = Recorder::replying(reply);
    let response: HealthCheckResponse =
        call_actor(recorder.clone(), "wasmcloud/echo:0.3.0", "HealthRequest", &Empty).unwrap();
    assert!(response.healthy);
    let calls = recorder.calls();
    assert_eq!(calls[0].binding, DEFAULT_BINDING);
    assert_eq!(calls[0].namespace, "wasmcloud/echo:0.3.0");
}
