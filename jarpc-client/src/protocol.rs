//! Client-side protocol engine
//!
//! [`ClientEngine`] builds request strings and decodes response strings
//! for one protocol revision. It owns the request-id counter: ids are
//! integers assigned 1, 2, 3, … per engine instance (0 is reserved and
//! never assigned), shared safely between threads, and resettable with
//! [`reset_id`](ClientEngine::reset_id).
//!
//! Decoding is strict: anything that is not a well-formed response for
//! the engine's revision raises [`Error::InvalidResponse`] (-32001), and
//! a server error envelope becomes a typed [`Error::JsonRpc`] carrying
//! the envelope's code, message and optional data. Client-side failures
//! are always raised as typed errors, never rendered back into protocol
//! envelopes.

use crate::batch::BatchResponse;
use jarpc_core::{
    Error, ErrorCode, ErrorObject, Id, ProtocolVersion, V1Request, V2Request, JSONRPC_VERSION,
};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

/// Request builder and response parser for one protocol revision.
#[derive(Debug)]
pub struct ClientEngine {
    version: ProtocolVersion,
    next_id: AtomicI64,
}

impl ClientEngine {
    /// Engine for the given protocol revision; the id counter starts at 1.
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            next_id: AtomicI64::new(1),
        }
    }

    /// Engine speaking JSON-RPC 2.0.
    pub fn v2() -> Self {
        Self::new(ProtocolVersion::V2)
    }

    /// The protocol revision this engine speaks.
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Reset the id counter to 1.
    pub fn reset_id(&self) {
        self.next_id.store(1, Ordering::SeqCst);
    }

    fn take_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Build a request string for a method call or notification.
    ///
    /// Method calls consume the next id from the counter. In v1 mode the
    /// request carries no `jsonrpc` marker, a notification is expressed
    /// as `id: null`, and `params` is forced positional: null becomes an
    /// empty array and object params are rejected.
    pub fn build_request(
        &self,
        method: &str,
        params: &Value,
        is_notification: bool,
    ) -> Result<String, Error> {
        match self.version {
            ProtocolVersion::V2 => {
                let request = if is_notification {
                    V2Request::notification(method, params.clone())
                } else {
                    V2Request::call(method, params.clone(), Id::Number(self.take_id()))
                };
                serde_json::to_string(&request).map_err(|e| Error::Serialization(e.to_string()))
            }
            ProtocolVersion::V1 => {
                let params = match params {
                    Value::Null => Value::Array(Vec::new()),
                    Value::Array(_) => params.clone(),
                    _ => {
                        return Err(Error::InvalidRequest(
                            "JSON-RPC 1.0 params must be positional (array or null)".to_string(),
                        ))
                    }
                };
                let request = if is_notification {
                    V1Request::notification(method, params)
                } else {
                    V1Request::call(method, params, Id::Number(self.take_id()))
                };
                serde_json::to_string(&request).map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }

    /// Decode a single response string into its result value.
    ///
    /// A server error envelope is raised as [`Error::JsonRpc`]; shape
    /// violations raise [`Error::InvalidResponse`]; unparseable text
    /// raises a parse-error envelope.
    pub fn parse_response(&self, response: &str) -> Result<Value, Error> {
        let value: Value = serde_json::from_str(response)
            .map_err(|_| Error::JsonRpc(ErrorObject::from_code(ErrorCode::ParseError)))?;
        let (id, outcome) = match self.version {
            ProtocolVersion::V2 => parse_v2_entry(&value)?,
            ProtocolVersion::V1 => parse_v1_entry(&value)?,
        };
        match outcome {
            Ok(result) => {
                if self.version == ProtocolVersion::V2 && id.is_null() {
                    return Err(Error::InvalidResponse(
                        "success response carries a null id".to_string(),
                    ));
                }
                Ok(result)
            }
            Err(error) => {
                // A null id is only legitimate on a request the server
                // could not attribute, which it reports as InvalidRequest.
                if self.version == ProtocolVersion::V2
                    && id.is_null()
                    && error.code != ErrorCode::InvalidRequest.code()
                {
                    return Err(Error::InvalidResponse(
                        "error response carries a null id".to_string(),
                    ));
                }
                Err(Error::JsonRpc(error))
            }
        }
    }

    /// Decode a batch response string into an id-keyed map.
    ///
    /// Batch is a JSON-RPC 2.0 construct; in v1 mode this is always an
    /// invalid response. Entries are decoded independently: an entry that
    /// fails validation is recorded as a ClientInvalidResponse error
    /// keyed by its id when one can be extracted, else by id -1.
    /// Duplicate ids keep the last entry.
    pub fn parse_batch_response(&self, response: &str) -> Result<BatchResponse, Error> {
        if self.version == ProtocolVersion::V1 {
            return Err(Error::InvalidResponse(
                "batch responses are a JSON-RPC 2.0 construct".to_string(),
            ));
        }
        let value: Value = serde_json::from_str(response)
            .map_err(|_| Error::JsonRpc(ErrorObject::from_code(ErrorCode::ParseError)))?;
        let Value::Array(entries) = value else {
            return Err(Error::InvalidResponse(
                "batch response must be a JSON array".to_string(),
            ));
        };

        let mut responses = BatchResponse::default();
        for entry in &entries {
            match parse_v2_entry(entry) {
                Ok((id, outcome)) => {
                    let key = if id.is_null() { Id::Number(-1) } else { id };
                    responses.insert(key, outcome);
                }
                Err(error) => {
                    let key = entry
                        .get("id")
                        .and_then(Id::from_value)
                        .filter(|id| !id.is_null())
                        .unwrap_or(Id::Number(-1));
                    responses.insert(
                        key,
                        Err(ErrorObject::new(
                            ErrorCode::ClientInvalidResponse.code(),
                            error.to_string(),
                        )),
                    );
                }
            }
        }
        Ok(responses)
    }
}

impl Default for ClientEngine {
    fn default() -> Self {
        Self::v2()
    }
}

type Outcome = (Id, Result<Value, ErrorObject>);

fn parse_v2_entry(value: &Value) -> Result<Outcome, Error> {
    let Value::Object(fields) = value else {
        return Err(Error::InvalidResponse(
            "response must be a JSON object".to_string(),
        ));
    };
    if fields.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(Error::InvalidResponse(
            "response is missing the jsonrpc marker".to_string(),
        ));
    }
    let Some(id_value) = fields.get("id") else {
        return Err(Error::InvalidResponse(
            "response is missing an id".to_string(),
        ));
    };
    let Some(id) = Id::from_value(id_value) else {
        return Err(Error::InvalidResponse(
            "response id must be an integer, string or null".to_string(),
        ));
    };
    match (fields.get("result"), fields.get("error")) {
        (Some(result), None) => Ok((id, Ok(result.clone()))),
        (None, Some(error)) => Ok((id, Err(parse_error_object(error, true)?))),
        _ => Err(Error::InvalidResponse(
            "response must carry exactly one of result and error".to_string(),
        )),
    }
}

fn parse_v1_entry(value: &Value) -> Result<Outcome, Error> {
    let Value::Object(fields) = value else {
        return Err(Error::InvalidResponse(
            "response must be a JSON object".to_string(),
        ));
    };
    let (Some(id_value), Some(result), Some(error)) =
        (fields.get("id"), fields.get("result"), fields.get("error"))
    else {
        return Err(Error::InvalidResponse(
            "response must carry id, result and error".to_string(),
        ));
    };
    let Some(id) = Id::from_value(id_value) else {
        return Err(Error::InvalidResponse(
            "response id must be an integer, string or null".to_string(),
        ));
    };
    if error.is_null() {
        Ok((id, Ok(result.clone())))
    } else if result.is_null() {
        Ok((id, Err(parse_error_object(error, false)?)))
    } else {
        Err(Error::InvalidResponse(
            "response carries both a result and an error".to_string(),
        ))
    }
}

/// Decode an error member into an [`ErrorObject`].
///
/// The code is always required; v2 also requires the message, while v1
/// servers may omit it (it defaults to the empty string).
fn parse_error_object(error: &Value, message_required: bool) -> Result<ErrorObject, Error> {
    let Value::Object(fields) = error else {
        return Err(Error::InvalidResponse(
            "error member must be a JSON object".to_string(),
        ));
    };
    let code = fields
        .get("code")
        .and_then(Value::as_i64)
        .and_then(|code| i32::try_from(code).ok())
        .ok_or_else(|| {
            Error::InvalidResponse("error member is missing an integer code".to_string())
        })?;
    let message = match fields.get("message") {
        Some(Value::String(message)) => message.clone(),
        None if !message_required => String::new(),
        _ => {
            return Err(Error::InvalidResponse(
                "error member is missing a string message".to_string(),
            ))
        }
    };
    Ok(ErrorObject {
        code,
        message,
        data: fields.get("data").cloned(),
    })
}
