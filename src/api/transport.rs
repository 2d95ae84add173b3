//! Production [`Transport`] backed by a hyper client over rustls.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::{ApiRequest, ApiResponse, Transport};
use crate::error::SwitchError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, Full<Bytes>>;

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring`.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub struct HyperTransport {
    client: HttpClient,
    timeout: Duration,
}

impl HyperTransport {
    /// `timeout` bounds each request from connect until the body is read.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_http_client(),
            timeout,
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SwitchError> {
        let method = request.method.clone();
        let url = request.url.to_string();

        let mut req_builder = hyper::Request::builder()
            .method(request.method)
            .uri(url.as_str());

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        let body = request.body.map(Bytes::from).unwrap_or_default();
        let req = req_builder
            .body(Full::new(body))
            .map_err(|e| SwitchError::RequestBuild {
                method: method.clone(),
                url: url.clone(),
                source: e,
            })?;

        let exchange = async {
            let response =
                self.client
                    .request(req)
                    .await
                    .map_err(|e| SwitchError::HttpRequest {
                        method: method.clone(),
                        url: url.clone(),
                        source: Box::new(e),
                    })?;

            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| SwitchError::ResponseBody {
                    method: method.clone(),
                    url: url.clone(),
                    source: Box::new(e),
                })?
                .to_bytes();

            Ok::<_, SwitchError>(ApiResponse {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| SwitchError::Timeout {
                method: method.clone(),
                url: url.clone(),
                timeout: self.timeout,
            })?
    }
}
