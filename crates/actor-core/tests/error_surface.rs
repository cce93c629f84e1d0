use actor_core::{decode, ActorError, DecodeError, EncodeError, ErrorInfo, HealthCheckResponse};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("operation", "HealthRequest")
        .with_context("binding", "default")
}

#[test]
fn handler_error_surface() {
    let err = ActorError::Handler(sample_info("H001", "store offline"));
    assert_eq!(err.info().code, "H001");
    assert!(err.info().context.contains_key("operation"));
}

#[test]
fn transport_error_surface() {
    let err = ActorError::transport("T001", "link missing");
    assert!(matches!(err, ActorError::Transport(_)));
    assert_eq!(err.info().message, "link missing");
}

#[test]
fn decode_errors_keep_their_code() {
    let truncated = DecodeError::Truncated { offset: 4 };
    let err = ActorError::from(truncated);
    assert!(matches!(err, ActorError::Decode(_)));
    assert_eq!(err.info().code, "actor_core.decode_truncated");

    let nested = ActorError::from(DecodeError::NestingTooDeep { limit: 64 });
    assert_eq!(nested.info().code, "actor_core.decode_nesting");
    assert!(nested.info().hint.is_some());
}

#[test]
fn encode_errors_keep_their_code() {
    let err = ActorError::from(EncodeError::LengthOverflow { len: usize::MAX });
    assert!(matches!(err, ActorError::Encode(_)));
    assert_eq!(err.info().code, "actor_core.encode_length_overflow");
}

#[test]
fn type_mismatch_names_expected_kind() {
    // {"healthy": "x"}
    let bytes = [0x81, 0xa7, b'h', b'e', b'a', b'l', b't', b'h', b'y', 0xa1, b'x'];
    let err = ActorError::from(decode::<HealthCheckResponse>(&bytes).unwrap_err());
    assert_eq!(err.info().code, "actor_core.decode_type_mismatch");
    assert_eq!(
        err.info().context.get("expected").map(String::as_str),
        Some("bool")
    );
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = ActorError::Dispatch(sample_info("actor_core.unknown_operation", "no handler"));
    let json = serde_json::to_value(&err).expect("json");
    assert_eq!(json["family"], "Dispatch");
    assert_eq!(json["detail"]["code"], "actor_core.unknown_operation");
    let restored: ActorError = serde_json::from_value(json).expect("restore");
    assert_eq!(restored, err);
}

#[test]
fn display_includes_code_and_message() {
    let err = ActorError::Config(ErrorInfo::new("actor_logging.logger_installed", "already set"));
    let rendered = err.to_string();
    assert!(rendered.contains("actor_logging.logger_installed"));
    assert!(rendered.contains("already set"));
}
