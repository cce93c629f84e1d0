//! Shared machinery for actor capability contracts: a self-describing record
//! codec, an inbound operation dispatcher and an outbound host call client.

pub mod codec;
pub mod errors;
pub mod guest;
pub mod health;
pub mod host;
pub mod registry;

pub use codec::{
    decode, decode_nullable, decode_payload, encode, encode_nullable, to_bytes, Decoder, Empty,
    Encoder, Field, Record, Value,
};
pub use errors::{ActorError, DecodeError, EncodeError, ErrorInfo, HandlerResult};
pub use guest::Guest;
pub use health::{
    register_default_health_check, register_health_request, CapabilityConfiguration,
    HealthCheckRequest, HealthCheckResponse, OP_HEALTH_REQUEST,
};
pub use host::{call_actor, HostClient, HostTransport, DEFAULT_BINDING};
pub use registry::{Dispatcher, OperationRegistry};
