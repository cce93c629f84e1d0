use std::sync::{Arc, Mutex};

use actor_core::{decode, HandlerResult, HostTransport};
use actor_logging::{enable_macros, WriteLogArgs};
use log::LevelFilter;

// The log facade is process-wide, so every check lives in one test.
#[test]
fn macros_reach_the_host_once_enabled() {
    let seen: Arc<Mutex<Vec<WriteLogArgs>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let transport: Arc<dyn HostTransport> = Arc::new(
        move |_: &str, _: &str, _: &str, payload: Vec<u8>| -> HandlerResult<Vec<u8>> {
            sink.lock().unwrap().push(decode(&payload)?);
            Ok(Vec::new())
        },
    );

    enable_macros(Arc::clone(&transport), LevelFilter::Info).unwrap();
    log::info!(target: "inventory", "restocked {} items", 12);
    log::debug!(target: "inventory", "filtered out");

    {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].target, "inventory");
        assert_eq!(seen[0].level, "info");
        assert_eq!(seen[0].text, "restocked 12 items");
    }

    let err = enable_macros(transport, LevelFilter::Trace).unwrap_err();
    assert_eq!(err.info().code, "actor_logging.logger_installed");
}
