use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{AdminError, AdminResult, GENERIC_ERROR};
use crate::session::SessionHandle;

/// `{ "data": ..., "message": ... }` wrapper around every backend payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One configured backend: a base URL plus the shared session for bearer auth.
#[derive(Clone)]
pub struct HttpClient {
    name: &'static str,
    client: Client,
    base_url: Url,
    session: SessionHandle,
}

impl HttpClient {
    pub fn new(name: &'static str, base_url: Url, session: SessionHandle) -> AdminResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            name,
            client: Client::builder().default_headers(headers).build()?,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends with the session's bearer token when one is held.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> AdminResult<Value> {
        self.send(method, path, &[], body, true).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> AdminResult<Envelope<T>> {
        let value = self.send(Method::GET, path, query, None, true).await?;
        decode(path, value)
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> AdminResult<Envelope<T>> {
        let value = self.send(Method::PATCH, path, query, body, true).await?;
        decode(path, value)
    }

    /// For login: never carries a bearer credential.
    pub async fn post_anonymous<T: DeserializeOwned>(&self, path: &str, body: &Value) -> AdminResult<Envelope<T>> {
        let value = self.send(Method::POST, path, &[], Some(body), false).await?;
        decode(path, value)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        authenticated: bool,
    ) -> AdminResult<Value> {
        let url = self.endpoint(path)?;
        let mut builder = self.client.request(method.clone(), url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if authenticated {
            if let Some(token) = self.session.access_token() {
                builder = builder.bearer_auth(token);
            }
        }

        tracing::debug!("{} {} {}", self.name, method, path);
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = server_message(&bytes).unwrap_or_else(|| GENERIC_ERROR.to_string());
            tracing::warn!("{} {} {} -> {}: {}", self.name, method, path, status, message);
            return Err(AdminError::request(Some(status.as_u16()), message));
        }

        tracing::debug!("{} {} {} -> {}", self.name, method, path, status);
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| AdminError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }

    // Appended rather than `Url::join`ed so a base path like `/api` survives.
    fn endpoint(&self, path: &str) -> AdminResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> AdminResult<Envelope<T>> {
    if value.is_null() {
        return Ok(Envelope {
            data: None,
            message: None,
        });
    }
    serde_json::from_value(value).map_err(|e| AdminError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}
