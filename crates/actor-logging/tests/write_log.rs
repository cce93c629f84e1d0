use std::sync::{Arc, Mutex};

use actor_core::{decode, HandlerResult, HostTransport};
use actor_logging::{Logging, WriteLogArgs, NAMESPACE, OP_LOG};

type Seen = Arc<Mutex<Vec<(String, String, String, WriteLogArgs)>>>;

fn recording() -> (Arc<dyn HostTransport>, Seen) {
    let seen: Seen = Arc::default();
    let sink = Arc::clone(&seen);
    let transport: Arc<dyn HostTransport> = Arc::new(
        move |binding: &str, namespace: &str, operation: &str, payload: Vec<u8>| -> HandlerResult<Vec<u8>> {
            let args: WriteLogArgs = decode(&payload)?;
            sink.lock().unwrap().push((
                binding.to_string(),
                namespace.to_string(),
                operation.to_string(),
                args,
            ));
            Ok(Vec::new())
        },
    );
    (transport, seen)
}

#[test]
fn write_log_targets_logging_namespace() {
    let (transport, seen) = recording();
    Logging::new(transport)
        .write_log("inventory", "ERROR", "disk full")
        .unwrap();
    let seen = seen.lock().unwrap();
    let (binding, namespace, operation, args) = &seen[0];
    assert_eq!(binding, "default");
    assert_eq!(namespace, NAMESPACE);
    assert_eq!(operation, OP_LOG);
    assert_eq!(args.level, "error");
    assert_eq!(args.text, "disk full");
}

#[test]
fn unknown_level_is_sent_as_info() {
    let (transport, seen) = recording();
    Logging::with_binding(transport, "audit")
        .write_log("", "verbose", "hello")
        .unwrap();
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, "audit");
    assert_eq!(seen[0].3.level, "info");
    assert!(seen[0].3.target.is_empty());
}
