//! Structured error types shared across actor interface crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`ActorError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (operation names, offsets, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Failure raised while reading a value from wire bytes.
///
/// A decode error aborts the whole record; callers never observe a partially
/// populated value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended before the value was complete.
    #[error("input truncated at offset {offset}")]
    Truncated {
        /// Byte offset at which more input was required.
        offset: usize,
    },
    /// The next value carries a different wire type than the schema expects.
    #[error("type mismatch at offset {offset}: expected {expected}, found marker 0x{found:02x}")]
    TypeMismatch {
        /// Wire type the schema asked for.
        expected: &'static str,
        /// Raw marker byte found on the wire.
        found: u8,
        /// Byte offset of the offending marker.
        offset: usize,
    },
    /// The marker byte is reserved and cannot be interpreted or skipped.
    #[error("unsupported wire tag 0x{tag:02x} at offset {offset}")]
    UnsupportedTag {
        /// Raw marker byte.
        tag: u8,
        /// Byte offset of the marker.
        offset: usize,
    },
    /// A string payload is not valid UTF-8.
    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// Byte offset of the string payload.
        offset: usize,
    },
    /// Containers are nested deeper than the decoder allows.
    #[error("value nesting exceeds the depth limit of {limit}")]
    NestingTooDeep {
        /// Configured depth limit.
        limit: usize,
    },
}

impl DecodeError {
    /// Stable error code used when the failure is surfaced as an [`ActorError`].
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::Truncated { .. } => "actor_core.decode_truncated",
            DecodeError::TypeMismatch { .. } => "actor_core.decode_type_mismatch",
            DecodeError::UnsupportedTag { .. } => "actor_core.decode_unsupported_tag",
            DecodeError::InvalidUtf8 { .. } => "actor_core.decode_invalid_utf8",
            DecodeError::NestingTooDeep { .. } => "actor_core.decode_nesting",
        }
    }
}

/// Failure raised while writing a value to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The underlying sink rejected the write.
    #[error("failed to write to sink: {0}")]
    WriteFailed(String),
    /// A container holds more entries than the wire format can announce.
    #[error("container of {len} entries exceeds the wire limit")]
    LengthOverflow {
        /// Number of entries the caller tried to write.
        len: usize,
    },
}

impl EncodeError {
    /// Stable error code used when the failure is surfaced as an [`ActorError`].
    pub fn code(&self) -> &'static str {
        match self {
            EncodeError::WriteFailed(_) => "actor_core.encode_write_failed",
            EncodeError::LengthOverflow { .. } => "actor_core.encode_length_overflow",
        }
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::WriteFailed(err.to_string())
    }
}

/// Canonical error type crossing the guest/host boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ActorError {
    /// Payload bytes could not be decoded into the expected record.
    #[error("decode error: {0}")]
    Decode(ErrorInfo),
    /// A record could not be written to its sink.
    #[error("encode error: {0}")]
    Encode(ErrorInfo),
    /// A registered handler reported a failure.
    #[error("handler error: {0}")]
    Handler(ErrorInfo),
    /// The host transport failed to deliver an outbound call.
    #[error("transport error: {0}")]
    Transport(ErrorInfo),
    /// No handler is registered for the requested operation.
    #[error("dispatch error: {0}")]
    Dispatch(ErrorInfo),
    /// Guest setup failed, e.g. a second logger was installed.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl ActorError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ActorError::Decode(info)
            | ActorError::Encode(info)
            | ActorError::Handler(info)
            | ActorError::Transport(info)
            | ActorError::Dispatch(info)
            | ActorError::Config(info) => info,
        }
    }

    /// Shorthand for a handler failure with the given code and message.
    pub fn handler(code: impl Into<String>, message: impl Into<String>) -> Self {
        ActorError::Handler(ErrorInfo::new(code, message))
    }

    /// Shorthand for a transport failure with the given code and message.
    pub fn transport(code: impl Into<String>, message: impl Into<String>) -> Self {
        ActorError::Transport(ErrorInfo::new(code, message))
    }
}

impl From<DecodeError> for ActorError {
    fn from(err: DecodeError) -> Self {
        let info = ErrorInfo::new(err.code(), err.to_string());
        let info = match &err {
            DecodeError::TypeMismatch { expected, .. } => info.with_context("expected", *expected),
            DecodeError::NestingTooDeep { .. } => {
                info.with_hint("payloads must not nest containers this deeply")
            }
            _ => info,
        };
        ActorError::Decode(info)
    }
}

impl From<EncodeError> for ActorError {
    fn from(err: EncodeError) -> Self {
        ActorError::Encode(ErrorInfo::new(err.code(), err.to_string()))
    }
}

/// Result type returned by operation handlers and host calls.
pub type HandlerResult<T> = Result<T, ActorError>;
