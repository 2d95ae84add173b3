//! Authenticated access to the remote configuration API.
//!
//! [`ApiClient`] builds endpoint URLs, attaches the content-type and
//! `Fastly-Key` headers, checks response status codes, and retries
//! transient failures of idempotent requests. The network itself sits
//! behind the [`Transport`] trait: [`transport::HyperTransport`] in
//! production, a scripted fake in tests.

pub mod model;
pub mod transport;

use std::time::Duration;

use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::{Method, StatusCode};
use url::Url;

use crate::error::SwitchError;

pub const DEFAULT_API_URL: &str = "https://api.fastly.com";
pub const TOKEN_ENV_VAR: &str = "FASTLY_API_TOKEN_ADMIN";
pub const AUTH_HEADER: &str = "fastly-key";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    /// Turn a non-2xx response into [`SwitchError::ApiStatus`].
    pub fn error_for_status(self, method: &Method, url: &Url) -> Result<String, SwitchError> {
        if self.status.is_success() {
            Ok(self.body)
        } else {
            Err(self.into_error(method, url))
        }
    }

    fn into_error(self, method: &Method, url: &Url) -> SwitchError {
        SwitchError::ApiStatus {
            method: method.clone(),
            url: url.to_string(),
            status: self.status,
            body: self.body,
        }
    }
}

// async_trait is required here because Transport is used as Box<dyn Transport>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SwitchError>;
}

pub struct ApiClient {
    transport: Box<dyn Transport>,
    base_url: Url,
    auth: HeaderValue,
    retries: u32,
    retry_backoff: Duration,
}

impl ApiClient {
    pub fn new(
        transport: Box<dyn Transport>,
        base_url: &str,
        token: &str,
    ) -> Result<Self, SwitchError> {
        if token.is_empty() {
            return Err(SwitchError::MissingToken {
                env_var: TOKEN_ENV_VAR,
            });
        }
        let mut auth = HeaderValue::from_str(token).map_err(|_| SwitchError::InvalidToken)?;
        auth.set_sensitive(true);

        Ok(Self {
            transport,
            base_url: parse_base_url(base_url)?,
            auth,
            retries: 0,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        })
    }

    /// Retry transient failures of `GET` and `PATCH` requests up to
    /// `retries` extra times, sleeping `backoff` between attempts.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.retry_backoff = backoff;
        self
    }

    /// Build an endpoint URL under the API base. Each segment is
    /// percent-encoded as a single path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, SwitchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SwitchError::InvalidApiUrl {
                url: self.base_url.to_string(),
                reason: "cannot be used as a base".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Perform a request and return the body of a 2xx response.
    pub async fn call(
        &self,
        method: Method,
        url: Url,
        form: Option<String>,
    ) -> Result<String, SwitchError> {
        let response = self.send(method.clone(), url.clone(), form).await?;
        response.error_for_status(&method, &url)
    }

    /// Perform a request and return the response whatever its status,
    /// except 5xx, which is reported as an error once retries run out.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        form: Option<String>,
    ) -> Result<ApiResponse, SwitchError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(AUTH_HEADER, self.auth.clone());

        let request = ApiRequest {
            method,
            url,
            headers,
            body: form,
        };

        let attempts = if is_idempotent(&request.method) {
            self.retries.saturating_add(1)
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt,
                "api request"
            );

            let outcome = match self.transport.send(request.clone()).await {
                Ok(response) if response.status.is_server_error() => {
                    Err(response.into_error(&request.method, &request.url))
                }
                other => other,
            };

            match outcome {
                Err(e) if e.is_transient() && attempt < attempts => {
                    tracing::warn!(
                        method = %request.method,
                        url = %request.url,
                        attempt,
                        error = %e,
                        "transient api failure, retrying"
                    );
                    tokio::time::sleep(self.retry_backoff).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

fn is_idempotent(method: &Method) -> bool {
    *method == Method::GET || *method == Method::PATCH
}

/// Parse and check the API base URL.
pub fn parse_base_url(raw: &str) -> Result<Url, SwitchError> {
    let url = Url::parse(raw).map_err(|e| SwitchError::InvalidApiUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(SwitchError::InvalidApiUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{other}' (expected http or https)"),
            })
        }
    }
    if url.cannot_be_a_base() {
        return Err(SwitchError::InvalidApiUrl {
            url: raw.to_string(),
            reason: "cannot be used as a base".into(),
        });
    }
    Ok(url)
}

/// Encode `key=value` pairs as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn form_body(pairs: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
