//! Health-check contract every guest exposes, plus the link-time
//! configuration record sent to capability providers.

use std::collections::BTreeMap;

use crate::codec::{Field, Record};
use crate::errors::HandlerResult;
use crate::registry::OperationRegistry;

/// Operation the host uses to check guest health.
pub const OP_HEALTH_REQUEST: &str = "HealthRequest";

/// Request sent by the host to determine guest health.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthCheckRequest {
    pub placeholder: bool,
}

impl Record for HealthCheckRequest {
    const FIELDS: &'static [Field<Self>] = &[Field {
        name: "placeholder",
        decode: |r, d| {
            r.placeholder = d.read_bool()?;
            Ok(())
        },
        encode: |r, e| e.write_bool(r.placeholder),
    }];
}

/// Guest answer to a health check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthCheckResponse {
    /// Whether the guest considers itself healthy.
    pub healthy: bool,
    /// Additional information about the guest's health.
    pub message: String,
}

impl HealthCheckResponse {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            message: String::new(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: message.into(),
        }
    }
}

impl Record for HealthCheckResponse {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "healthy",
            decode: |r, d| {
                r.healthy = d.read_bool()?;
                Ok(())
            },
            encode: |r, e| e.write_bool(r.healthy),
        },
        Field {
            name: "message",
            decode: |r, d| {
                r.message = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.message),
        },
    ];
}

/// Data sent to a capability provider when a guest is linked to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityConfiguration {
    /// Module (guest) identity.
    pub module: String,
    /// Configuration properties of the link.
    pub values: BTreeMap<String, String>,
}

impl Record for CapabilityConfiguration {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "module",
            decode: |r, d| {
                r.module = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.module),
        },
        Field {
            name: "values",
            decode: |r, d| {
                r.values = d.read_string_map()?;
                Ok(())
            },
            encode: |r, e| e.write_string_map(&r.values),
        },
    ];
}

/// Registers `handler` for [`OP_HEALTH_REQUEST`].
pub fn register_health_request<F>(registry: &mut OperationRegistry, handler: F)
where
    F: Fn(HealthCheckRequest) -> HandlerResult<HealthCheckResponse> + 'static,
{
    registry.register(OP_HEALTH_REQUEST, handler);
}

/// Registers a health handler that always reports healthy.
pub fn register_default_health_check(registry: &mut OperationRegistry) {
    register_health_request(registry, |_| Ok(HealthCheckResponse::healthy()));
}
