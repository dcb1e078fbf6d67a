//! Response normalization
//!
//! Turns a [`RawResponse`] into a [`Normalized`] response: a decoded JSON
//! object with lower-cased top-level keys, tagged by whether the HTTP
//! exchange returned 200. Whether the gateway actually accepted the request
//! is decided later by the outcome mapper.

use crate::error::{ClientError, ClientResult};
use crate::transport::RawResponse;
use serde::Serialize;
use serde_json::{Map, Value};

pub const STATUS_FIELD: &str = "status";
pub const MESSAGE_FIELD: &str = "message";

/// Decoded response body with case-folded keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn from_object(object: Map<String, Value>) -> Self {
        Payload(
            object
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Field rendered as a string. Numbers and booleans are stringified;
    /// null, arrays and objects yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The gateway's internal status code, if any.
    pub fn status_code(&self) -> Option<String> {
        self.text(STATUS_FIELD)
    }

    /// Non-blank `message` field.
    pub fn message(&self) -> Option<String> {
        self.text(MESSAGE_FIELD).filter(|m| !m.trim().is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// HTTP 200 with a decodable body.
    Accepted(Payload),
    /// Any other HTTP status with a decodable body.
    Rejected { status: u16, payload: Payload },
    /// No HTTP exchange completed; carries `"network error: <reason>"`.
    Unreachable(String),
}

/// Decode and case-fold a raw response. A body that is not a JSON object is
/// a gateway contract violation and is returned as [`ClientError::Decode`].
pub fn normalize(raw: &RawResponse) -> ClientResult<Normalized> {
    match raw {
        RawResponse::Failed(failure) => Ok(Normalized::Unreachable(format!(
            "network error: {}",
            failure.reason
        ))),
        RawResponse::Completed { status, body } => {
            let payload = match serde_json::from_slice::<Value>(body)? {
                Value::Object(object) => Payload::from_object(object),
                other => {
                    return Err(ClientError::decode(format!(
                        "expected a JSON object, got {}",
                        json_kind(&other)
                    )))
                }
            };

            if *status == 200 {
                Ok(Normalized::Accepted(payload))
            } else {
                Ok(Normalized::Rejected {
                    status: *status,
                    payload,
                })
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
