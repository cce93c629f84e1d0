use std::cell::RefCell;
use std::rc::Rc;

use actor_core::{
    register_default_health_check, register_health_request, to_bytes, ActorError, Empty,
    HealthCheckRequest, HealthCheckResponse, OperationRegistry, OP_HEALTH_REQUEST,
};

#[test]
fn healthy_response_round_trips() {
    let response = HealthCheckResponse {
        healthy: true,
        message: String::new(),
    };
    let restored: HealthCheckResponse = actor_core::decode(&to_bytes(&response).unwrap()).unwrap();
    assert_eq!(restored, response);
}

#[test]
fn health_check_answers_with_encoded_response() {
    let mut registry = OperationRegistry::new();
    register_health_request(&mut registry, |_| Ok(HealthCheckResponse::healthy()));
    let dispatcher = registry.seal();

    let request = to_bytes(&HealthCheckRequest::default()).unwrap();
    let response = dispatcher.invoke(OP_HEALTH_REQUEST, &request).unwrap();
    assert_eq!(response, to_bytes(&HealthCheckResponse::healthy()).unwrap());
}

#[test]
fn default_health_check_reports_healthy() {
    let mut registry = OperationRegistry::new();
    register_default_health_check(&mut registry);
    let dispatcher = registry.seal();
    let response = dispatcher.invoke(OP_HEALTH_REQUEST, &[]).unwrap();
    let decoded: HealthCheckResponse = actor_core::decode(&response).unwrap();
    assert!(decoded.healthy);
    assert!(decoded.message.is_empty());
}

#[test]
fn unknown_operation_is_a_dispatch_error() {
    let dispatcher = OperationRegistry::new().seal();
    let err = dispatcher.invoke("Missing", &[0x80]).unwrap_err();
    match &err {
        ActorError::Dispatch(info) => {
            assert_eq!(info.code, "actor_core.unknown_operation");
            assert_eq!(info.context.get("operation").map(String::as_str), Some("Missing"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn malformed_request_never_reaches_the_handler() {
    let calls = Rc::new(RefCell::new(0u32));
    let seen = Rc::clone(&calls);
    let mut registry = OperationRegistry::new();
    register_health_request(&mut registry, move |_| {
        *seen.borrow_mut() += 1;
        Ok(HealthCheckResponse::healthy())
    });
    let dispatcher = registry.seal();

    // map of one entry whose value is cut off
    let err = dispatcher
        .invoke(OP_HEALTH_REQUEST, &[0x81, 0xab, b'p', b'l'])
        .unwrap_err();
    assert_eq!(err.info().code, "actor_core.decode_truncated");
    assert_eq!(
        err.info().context.get("operation").map(String::as_str),
        Some(OP_HEALTH_REQUEST)
    );
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn handler_failure_yields_only_the_error() {
    let mut registry = OperationRegistry::new();
    register_health_request(&mut registry, |_| {
        Err(ActorError::handler("health.failed", "database unreachable"))
    });
    let dispatcher = registry.seal();
    let err = dispatcher.invoke(OP_HEALTH_REQUEST, &[]).unwrap_err();
    assert!(matches!(err, ActorError::Handler(_)));
    assert_eq!(err.info().message, "database unreachable");
}

#[test]
fn void_operation_answers_with_empty_buffer() {
    let hits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&hits);
    let mut registry = OperationRegistry::new();
    registry.register_void("Notify", move |request: HealthCheckRequest| {
        sink.borrow_mut().push(request.placeholder);
        Ok(())
    });
    let dispatcher = registry.seal();

    let payload = to_bytes(&HealthCheckRequest { placeholder: true }).unwrap();
    assert!(dispatcher.invoke("Notify", &payload).unwrap().is_empty());
    assert_eq!(*hits.borrow(), vec![true]);
}

#[test]
fn later_registration_replaces_earlier_one() {
    let mut registry = OperationRegistry::new();
    registry
        .register("Echo", |_: Empty| Ok(HealthCheckResponse::unhealthy("first")))
        .register("Echo", |_: Empty| Ok(HealthCheckResponse::unhealthy("second")));
    assert_eq!(registry.len(), 1);
    let dispatcher = registry.seal();
    let response = dispatcher.invoke("Echo", &[0x80]).unwrap();
    let decoded: HealthCheckResponse = actor_core::decode(&response).unwrap();
    assert_eq!(decoded.message, "second");
}

#[test]
fn sealed_dispatcher_lists_operations_in_order() {
    let mut registry = OperationRegistry::new();
    registry
        .register("Zeta", |_: Empty| Ok(Empty))
        .register("Alpha", |_: Empty| Ok(Empty));
    register_default_health_check(&mut registry);
    let dispatcher = registry.seal();
    let names: Vec<&str> = dispatcher.operations().collect();
    assert_eq!(names, vec!["Alpha", OP_HEALTH_REQUEST, "Zeta"]);
    assert!(dispatcher.contains("Zeta"));
    assert!(!dispatcher.contains("zeta"));
}
