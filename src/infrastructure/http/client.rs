use crate::core::client::ClientResult;
use crate::core::invocation::Credential;
use crate::domain::error::ClientError;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Authenticated JSON client for the secrets API
pub struct ApiClient {
    http: reqwest::Client,
    host: String,
    credential: Credential,
}

impl ApiClient {
    /// Create a client bound to one API host and credential
    pub fn new(host: &str, credential: Credential, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("secretsctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Network {
                url: host.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            host: host.trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }

    /// Send one request and decode the JSON response body.
    ///
    /// An empty body decodes to `Value::Null`. Non-2xx responses become
    /// `ClientError::Api` carrying the server's messages.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let url = self.endpoint(path);
        debug!(%method, %url, "sending request");

        let mut builder = self
            .http
            .request(method, &url)
            .bearer_auth(self.credential.expose())
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let network_error = |e: reqwest::Error| ClientError::Network {
            url: url.clone(),
            message: e.to_string(),
        };

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        let text = response.text().await.map_err(network_error)?;
        debug!(status = status.as_u16(), bytes = text.len(), "received response");

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    messages: Vec<String>,
}

/// Build an API error from a failed response body
pub fn api_error(status: u16, body: &str) -> ClientError {
    let messages = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.messages)
        .unwrap_or_default();
    ClientError::Api { status, messages }
}

/// Take `key` out of a response envelope and decode it
pub fn extract<T: DeserializeOwned>(value: Value, key: &str) -> ClientResult<T> {
    let inner = match value {
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| ClientError::Decode(format!("response is missing the `{}` field", key)))?,
        other => {
            return Err(ClientError::Decode(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };
    serde_json::from_value(inner).map_err(|e| ClientError::Decode(e.to_string()))
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
