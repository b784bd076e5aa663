//! Request and response envelopes
//!
//! Every gateway call sends a [`RequestEnvelope`] and receives a
//! [`ResponseEnvelope`]. The response is a tagged union: once it has been
//! built from the raw wire body, downstream code never inspects absent
//! fields.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::operation::Operation;
use crate::error::{GatewayError, Result, INTERNAL_ERROR};

// =============================================================================
// Request
// =============================================================================

/// An operation name plus its named parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    operation: Operation,
    params: Map<String, Value>,
}

impl RequestEnvelope {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            params: Map::new(),
        }
    }

    /// Adds a single named parameter.
    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Flattens a form record into the parameter map.
    pub fn with_form<T: Serialize>(operation: Operation, form: &T) -> Result<Self> {
        let params = match serde_json::to_value(form).map_err(|source| GatewayError::Encode {
            operation: operation.name(),
            source,
        })? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        Ok(Self { operation, params })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// A parameter rendered as a plain string (path and query use).
    pub fn param_str(&self, name: &str) -> Option<String> {
        self.params.get(name).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

// =============================================================================
// Response
// =============================================================================

/// The error half of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

impl ServiceError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Reads the `error` member of a raw body, if it carries one.
    ///
    /// Decoding is lenient: a code that is not a valid status number falls
    /// back to the body's top-level `code`, then to `fallback`. Siblings of
    /// `error` are never looked at, whatever their shape.
    pub fn from_body(body: &Value, fallback: u16) -> Option<Self> {
        let error = body.get("error").filter(|error| !error.is_null())?;
        let code = error
            .get("code")
            .and_then(wire_code)
            .or_else(|| body.get("code").and_then(wire_code))
            .unwrap_or(fallback);
        let message = match error {
            Value::String(message) => message.clone(),
            _ => match error.get("message") {
                Some(Value::String(message)) => message.clone(),
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            },
        };
        Some(Self::new(code, message))
    }
}

/// A status code sent as a number or a numeric string.
fn wire_code(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

/// A gateway response with exactly one active case.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Failure(ServiceError),
    Result(Value),
    Items(Vec<Value>),
    /// Success without a payload (the gateway answered `null` or nothing).
    Empty,
}

impl ResponseEnvelope {
    /// Decides the active case of a raw `{error?, result?, items?}` body.
    ///
    /// An `error` wins over anything else that came along with it. An
    /// `items` member that is not a list is a failure, never an empty
    /// listing.
    pub fn from_wire(body: Value) -> Self {
        if let Some(error) = ServiceError::from_body(&body, INTERNAL_ERROR) {
            return ResponseEnvelope::Failure(error);
        }
        let mut map = match body {
            Value::Object(map) => map,
            Value::Null => return ResponseEnvelope::Empty,
            Value::Array(items) => return ResponseEnvelope::Items(items),
            other => return ResponseEnvelope::Result(other),
        };
        match (map.remove("items"), map.remove("result")) {
            (Some(Value::Array(items)), _) => ResponseEnvelope::Items(items),
            (None | Some(Value::Null), None | Some(Value::Null)) => ResponseEnvelope::Empty,
            (None | Some(Value::Null), Some(result)) => ResponseEnvelope::Result(result),
            (Some(_), _) => ResponseEnvelope::malformed_items(),
        }
    }

    pub(crate) fn malformed_items() -> Self {
        ResponseEnvelope::Failure(ServiceError::new(INTERNAL_ERROR, "malformed items in response"))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ResponseEnvelope::Failure(_))
    }

    /// Decodes a single record, treating a missing payload as an error.
    pub fn into_result<T: DeserializeOwned>(self, operation: Operation) -> Result<T> {
        self.into_optional_result(operation)?
            .ok_or(GatewayError::UnexpectedShape {
                operation: operation.name(),
                expected: "result",
            })
    }

    /// Decodes a single record that the gateway may legitimately omit.
    pub fn into_optional_result<T: DeserializeOwned>(
        self,
        operation: Operation,
    ) -> Result<Option<T>> {
        match self {
            ResponseEnvelope::Failure(e) => Err(GatewayError::Service(e)),
            ResponseEnvelope::Result(value) => decode(operation, value).map(Some),
            ResponseEnvelope::Empty => Ok(None),
            ResponseEnvelope::Items(_) => Err(GatewayError::UnexpectedShape {
                operation: operation.name(),
                expected: "result",
            }),
        }
    }

    /// Decodes a listing. A missing `items` field is an empty listing.
    pub fn into_items<T: DeserializeOwned>(self, operation: Operation) -> Result<Vec<T>> {
        match self {
            ResponseEnvelope::Failure(e) => Err(GatewayError::Service(e)),
            ResponseEnvelope::Items(values) => values
                .into_iter()
                .map(|v| decode(operation, v))
                .collect(),
            ResponseEnvelope::Empty => Ok(Vec::new()),
            ResponseEnvelope::Result(_) => Err(GatewayError::UnexpectedShape {
                operation: operation.name(),
                expected: "items",
            }),
        }
    }
}

fn decode<T: DeserializeOwned>(operation: Operation, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| GatewayError::Decode {
        operation: operation.name(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_wins_over_payload() {
        let envelope = ResponseEnvelope::from_wire(json!({
            "error": { "code": 401, "message": "login required" },
            "result": { "name": "ignored" },
            "items": [{ "name": "ignored" }]
        }));
        assert_eq!(
            envelope,
            ResponseEnvelope::Failure(ServiceError::new(401, "login required"))
        );
    }

    #[test]
    fn test_error_code_falls_back_to_top_level_code() {
        let envelope = ResponseEnvelope::from_wire(json!({
            "error": { "message": "nope" },
            "code": 403
        }));
        assert_eq!(envelope, ResponseEnvelope::Failure(ServiceError::new(403, "nope")));
    }

    #[test]
    fn test_error_survives_malformed_siblings() {
        let envelope = ResponseEnvelope::from_wire(json!({
            "error": { "code": 401, "message": "login required" },
            "items": "oops"
        }));
        assert_eq!(
            envelope,
            ResponseEnvelope::Failure(ServiceError::new(401, "login required"))
        );
    }

    #[test]
    fn test_error_code_is_decoded_leniently() {
        let envelope = ResponseEnvelope::from_wire(json!({
            "error": { "code": "401", "message": "login required" }
        }));
        assert_eq!(
            envelope,
            ResponseEnvelope::Failure(ServiceError::new(401, "login required"))
        );

        let envelope = ResponseEnvelope::from_wire(json!({
            "error": { "code": 70000, "message": "odd" }
        }));
        assert_eq!(
            envelope,
            ResponseEnvelope::Failure(ServiceError::new(INTERNAL_ERROR, "odd"))
        );

        let envelope = ResponseEnvelope::from_wire(json!({ "error": "boom" }));
        assert_eq!(
            envelope,
            ResponseEnvelope::Failure(ServiceError::new(INTERNAL_ERROR, "boom"))
        );
    }

    #[test]
    fn test_malformed_items_is_a_failure() {
        let envelope = ResponseEnvelope::from_wire(json!({ "items": {} }));
        assert!(envelope.is_failure());
        assert!(envelope.into_items::<Value>(Operation::GetAllCart).is_err());
    }

    #[test]
    fn test_missing_message_defaults_to_empty() {
        let envelope = ResponseEnvelope::from_wire(json!({ "error": { "code": 500 } }));
        assert_eq!(envelope, ResponseEnvelope::Failure(ServiceError::new(500, "")));
    }

    #[test]
    fn test_items_and_empty_cases() {
        assert_eq!(
            ResponseEnvelope::from_wire(json!({ "items": [1, 2] })),
            ResponseEnvelope::Items(vec![json!(1), json!(2)])
        );
        assert_eq!(ResponseEnvelope::from_wire(Value::Null), ResponseEnvelope::Empty);
        assert_eq!(
            ResponseEnvelope::from_wire(json!({ "result": null })),
            ResponseEnvelope::Empty
        );
        let listed: Vec<u32> = ResponseEnvelope::Empty
            .into_items(Operation::GetAllCart)
            .unwrap();
        assert!(listed.is_empty());
    }

    #[test]
    fn test_wrong_case_is_rejected() {
        let err = ResponseEnvelope::Result(json!({}))
            .into_items::<Value>(Operation::QueryBooks)
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedShape { expected: "items", .. }));

        let err = ResponseEnvelope::Empty
            .into_result::<Value>(Operation::GetBook)
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnexpectedShape { expected: "result", .. }));
    }

    #[test]
    fn test_request_params_from_form() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Form {
            display_name: String,
        }
        let request = RequestEnvelope::with_form(
            Operation::SaveProfile,
            &Form {
                display_name: "Ann".into(),
            },
        )
        .unwrap();
        assert_eq!(request.param_str("displayName").as_deref(), Some("Ann"));

        let keyed = RequestEnvelope::new(Operation::GetBook).with_param("websafeBookKey", "abc");
        assert_eq!(keyed.param_str("websafeBookKey").as_deref(), Some("abc"));
    }
}
