//! HTTP adapter for the bookstore gateway
//!
//! Maps request envelopes onto the API's REST layout and folds HTTP
//! responses back into [`ResponseEnvelope`]s.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::envelope::{RequestEnvelope, ResponseEnvelope, ServiceError};
use super::operation::{Operation, ParamPlacement};
use super::Gateway;
use crate::error::{GatewayError, Result, INTERNAL_ERROR};
use crate::session::Session;

/// Gateway reached over HTTP, authenticated with the session's bearer token.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    root: Url,
    session: Session,
}

impl HttpGateway {
    pub fn new(root: Url, session: Session, timeout: Duration) -> Result<Self> {
        if root.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(root.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            root,
            session,
        })
    }

    /// Absolute URL of a request, with `{name}` path segments filled in.
    pub fn url_for(&self, request: &RequestEnvelope) -> Result<Url> {
        let mut url = self.root.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::InvalidUrl(self.root.to_string()))?;
            segments.pop_if_empty();
            for segment in request.operation().path().split('/') {
                match path_param(segment) {
                    Some(name) => {
                        segments.push(&request.param_str(name).unwrap_or_default());
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        Ok(url)
    }
}

fn path_param(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Parameters that are not already carried by the path.
fn loose_params(request: &RequestEnvelope) -> Vec<(String, String)> {
    let path = request.operation().path();
    request
        .params()
        .keys()
        .filter(|name| !path.contains(&format!("{{{name}}}")))
        .filter_map(|name| request.param_str(name).map(|v| (name.clone(), v)))
        .collect()
}

/// Builds the envelope for an HTTP answer.
///
/// Error bodies (or non-success statuses) become `Failure`; listings read
/// `items`; single-record operations take the whole body as the result.
pub fn envelope_from_http(operation: Operation, status: StatusCode, body: Value) -> ResponseEnvelope {
    let fallback = if status.is_success() {
        INTERNAL_ERROR
    } else {
        status.as_u16()
    };
    if let Some(error) = ServiceError::from_body(&body, fallback) {
        return ResponseEnvelope::Failure(error);
    }
    if !status.is_success() {
        return ResponseEnvelope::Failure(ServiceError::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
        ));
    }
    if body.is_null() {
        return ResponseEnvelope::Empty;
    }
    if operation.returns_items() {
        return match body {
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => ResponseEnvelope::Items(items),
                None | Some(Value::Null) => ResponseEnvelope::Empty,
                Some(_) => ResponseEnvelope::malformed_items(),
            },
            Value::Array(items) => ResponseEnvelope::Items(items),
            _ => ResponseEnvelope::Empty,
        };
    }
    ResponseEnvelope::Result(body)
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn dispatch(&self, request: RequestEnvelope) -> Result<ResponseEnvelope> {
        let operation = request.operation();
        let url = self.url_for(&request)?;
        debug!(%operation, %url, "dispatching gateway call");

        let mut builder = self.client.request(operation.method(), url);
        if let Some(token) = self.session.credential() {
            builder = builder.bearer_auth(token);
        }
        builder = match operation.placement() {
            ParamPlacement::Body => builder.json(request.params()),
            ParamPlacement::Query => builder.query(&loose_params(&request)),
            ParamPlacement::None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(body) => body,
                Err(source) if status.is_success() => {
                    return Err(GatewayError::Decode {
                        operation: operation.name(),
                        source,
                    })
                }
                Err(_) => Value::Null,
            }
        };
        Ok(envelope_from_http(operation, status, body))
    }
}
