//! HTTP server capability contract.
//!
//! The provider accepts HTTP requests on the guest's behalf and forwards each
//! one as a `HandleRequest` call. Guests register a handler with
//! [`register_handle_request`] and answer with a [`Response`].

use std::collections::BTreeMap;

use actor_core::{ActorError, ErrorInfo, Field, HandlerResult, OperationRegistry, Record};
use log::debug;
use serde::Serialize;

mod method;

pub use method::Method;

/// Contract namespace of HTTP server providers.
pub const NAMESPACE: &str = "wasmcloud:httpserver";

/// Inbound operation carrying one HTTP request.
pub const OP_HANDLE_REQUEST: &str = "HandleRequest";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query_string: String,
    pub header: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Non-empty segments of the request path. `""`, `"/"` and `"//"` all
    /// yield nothing; `"/foo/"` yields `["foo"]`.
    pub fn path_segments(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    pub fn method(&self) -> Method {
        match self.method.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl Record for Request {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "method",
            decode: |r, d| {
                r.method = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.method),
        },
        Field {
            name: "path",
            decode: |r, d| {
                r.path = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.path),
        },
        Field {
            name: "queryString",
            decode: |r, d| {
                r.query_string = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.query_string),
        },
        Field {
            name: "header",
            decode: |r, d| {
                r.header = d.read_string_map()?;
                Ok(())
            },
            encode: |r, e| e.write_string_map(&r.header),
        },
        Field {
            name: "body",
            decode: |r, d| {
                r.body = d.read_bytes()?;
                Ok(())
            },
            encode: |r, e| e.write_bytes(&r.body),
        },
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status_code: u32,
    pub status: String,
    pub header: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    fn with_status(status_code: u32, status: &str) -> Self {
        Self {
            status_code,
            status: status.to_string(),
            ..Self::default()
        }
    }

    /// 200 OK with an empty body.
    pub fn ok() -> Self {
        Self::with_status(200, "OK")
    }

    pub fn not_found() -> Self {
        Self::with_status(404, "Not Found")
    }

    pub fn bad_request() -> Self {
        Self::with_status(400, "Bad Request")
    }

    /// 500 with `message` as the body.
    pub fn internal_server_error(message: &str) -> Self {
        Self {
            body: message.as_bytes().to_vec(),
            ..Self::with_status(500, "Internal Server Error")
        }
    }

    /// Serializes `payload` as the JSON body of a response with the given
    /// status. Sets `Content-Type: application/json`.
    pub fn json<T: Serialize>(
        payload: &T,
        status_code: u32,
        status: &str,
    ) -> Result<Self, ActorError> {
        let body = serde_json::to_vec(payload).map_err(|err| {
            ActorError::Encode(
                ErrorInfo::new("http_server.json_body", err.to_string())
                    .with_context("status_code", status_code.to_string()),
            )
        })?;
        let mut response = Self::with_status(status_code, status);
        response
            .header
            .insert("Content-Type".to_string(), "application/json".to_string());
        response.body = body;
        Ok(response)
    }
}

impl Record for Response {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            name: "statusCode",
            decode: |r, d| {
                r.status_code = d.read_u32()?;
                Ok(())
            },
            encode: |r, e| e.write_u32(r.status_code),
        },
        Field {
            name: "status",
            decode: |r, d| {
                r.status = d.read_string()?;
                Ok(())
            },
            encode: |r, e| e.write_str(&r.status),
        },
        Field {
            name: "header",
            decode: |r, d| {
                r.header = d.read_string_map()?;
                Ok(())
            },
            encode: |r, e| e.write_string_map(&r.header),
        },
        Field {
            name: "body",
            decode: |r, d| {
                r.body = d.read_bytes()?;
                Ok(())
            },
            encode: |r, e| e.write_bytes(&r.body),
        },
    ];
}

/// Registers `handler` for every request the provider forwards.
pub fn register_handle_request<F>(registry: &mut OperationRegistry, handler: F)
where
    F: Fn(Request) -> HandlerResult<Response> + 'static,
{
    registry.register(OP_HANDLE_REQUEST, move |request: Request| {
        debug!(
            "event=http_request module=http_server method={} path={}",
            request.method(),
            request.path
        );
        handler(request)
    });
}
