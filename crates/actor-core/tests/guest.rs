use std::sync::{Arc, Mutex};

use actor_core::{
    decode, register_default_health_check, Empty, Guest, HandlerResult, HealthCheckResponse,
    HostTransport, OperationRegistry, DEFAULT_BINDING, OP_HEALTH_REQUEST,
};

fn recording() -> (Arc<dyn HostTransport>, Arc<Mutex<Vec<(String, String)>>>) {
    let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let transport: Arc<dyn HostTransport> = Arc::new(
        move |binding: &str, namespace: &str, _: &str, _: Vec<u8>| -> HandlerResult<Vec<u8>> {
            sink.lock()
                .unwrap()
                .push((binding.to_string(), namespace.to_string()));
            Ok(Vec::new())
        },
    );
    (transport, seen)
}

#[test]
fn guest_dispatches_sealed_operations() {
    let mut registry = OperationRegistry::new();
    register_default_health_check(&mut registry);
    let (transport, _) = recording();
    let guest = Guest::new(registry, transport);

    let reply = guest.dispatch(OP_HEALTH_REQUEST, &[]).unwrap();
    let response: HealthCheckResponse = decode(&reply).unwrap();
    assert!(response.healthy);
    assert!(guest.dispatcher().contains(OP_HEALTH_REQUEST));
    assert_eq!(
        guest.dispatch("Unknown", &[]).unwrap_err().info().code,
        "actor_core.unknown_operation"
    );
}

#[test]
fn guest_clients_share_its_transport() {
    let (transport, seen) = recording();
    let guest = Guest::new(OperationRegistry::new(), transport);

    guest
        .host_client("wasmcloud:logging")
        .call_no_reply("WriteLog", &Empty)
        .unwrap();
    guest
        .host_client("wasmcloud:blobstore")
        .with_binding("archive")
        .call_no_reply("RemoveContainer", &Empty)
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            (DEFAULT_BINDING.to_string(), "wasmcloud:logging".to_string()),
            ("archive".to_string(), "wasmcloud:blobstore".to_string()),
        ]
    );
}
