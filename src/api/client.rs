//! JSON API client with a fixed base URL, a per-request timeout, and consistent
//! error mapping. The client never stores credentials; a bearer token is
//! attached per request and is never logged.

use super::{
    config::{build_url_with_base, ApiConfig},
    errors::ApiError,
};
use crate::APP_USER_AGENT;
use reqwest::{Client, Method, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use ulid::Ulid;

/// Maximum number of error body characters kept in `ApiError::Http`.
const MAX_ERROR_CHARS: usize = 200;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub enum Body {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A single API call: method, query, body, headers, and an optional bearer
/// credential. Defaults to a bare `GET`.
#[derive(Clone, Debug, Default)]
pub struct ApiRequest {
    method: Method,
    query: Vec<(String, String)>,
    body: Option<Body>,
    headers: Vec<(String, String)>,
    bearer: Option<SecretString>,
}

impl ApiRequest {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    #[must_use]
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = Some(Body::Form(pairs));
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: &SecretString) -> Self {
        self.bearer = Some(token.clone());
        self
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    /// Returns `ApiError::Config` if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs the request and decodes the JSON body. An empty success body
    /// decodes as JSON `null`.
    ///
    /// # Errors
    /// Returns `ApiError::Http` for non-2xx responses, and transport or decode errors otherwise.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let response = self.execute(path, request).await?;
        handle_json_response(response).await
    }

    /// Performs the request and discards the response body.
    ///
    /// # Errors
    /// Returns `ApiError::Http` for non-2xx responses, and transport errors otherwise.
    pub async fn send(&self, path: &str, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.execute(path, request).await?;
        handle_empty_response(response).await
    }

    async fn execute(&self, path: &str, request: ApiRequest) -> Result<Response, ApiError> {
        let url = build_url_with_base(&self.base_url, path);
        let request_id = Ulid::new().to_string();

        let span = info_span!(
            "api.request",
            http.method = %request.method,
            path = %path,
            request_id = %request_id
        );

        let mut builder = self
            .client
            .request(request.method, &url)
            .header(REQUEST_ID_HEADER, &request_id);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        builder = match request.body {
            Some(Body::Json(body)) => builder.json(&body),
            Some(Body::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };

        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        debug!(
            status = response.status().as_u16(),
            request_id = %request_id,
            "api response"
        );

        Ok(response)
    }
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ApiError::Serialization(format!("Failed to build request: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(http_error(response).await);
    }

    let text = response
        .text()
        .await
        .map_err(|err| ApiError::Parse(format!("Failed to read response: {err}")))?;
    let payload = if text.trim().is_empty() {
        "null"
    } else {
        text.as_str()
    };

    serde_json::from_str(payload)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Http {
        status,
        body: sanitize_body(&body),
    }
}

/// Trims and truncates error bodies so they are safe to surface to users.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
