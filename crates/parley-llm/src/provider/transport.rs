//! Moving encoded request bodies to a backend and raw response bodies back

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_smithy_types::Blob;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::TransportError;
use crate::types::RequestContext;

/// Sends one encoded request and returns the raw response body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `body` and wait for the backend's answer
    async fn send(&self, ctx: &RequestContext, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// How an HTTP backend expects its API key
#[derive(Debug, Clone)]
pub enum Auth {
    /// No credential is sent
    None,
    /// `Authorization: Bearer <key>`
    Bearer(SecretString),
    /// Key in a dedicated header such as `x-api-key`
    Header {
        /// Header name
        name: HeaderName,
        /// API key
        key: SecretString,
    },
}

impl Auth {
    /// Key sent in a dedicated header
    pub fn header(name: &'static str, key: SecretString) -> Self {
        Self::Header {
            name: HeaderName::from_static(name),
            key,
        }
    }
}

/// JSON-over-HTTPS transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    auth: Auth,
    headers: HeaderMap,
}

impl HttpTransport {
    /// POST to `url` with the given credential
    pub fn new(url: Url, auth: Auth) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            auth,
            headers: HeaderMap::new(),
        }
    }

    /// Add a fixed header sent with every request
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers
            .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        self
    }

    /// Endpoint this transport posts to
    pub const fn url(&self) -> &Url {
        &self.url
    }

    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let mut builder = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .headers(self.headers.clone())
            .body(body);

        builder = match &self.auth {
            Auth::None => builder,
            Auth::Bearer(key) => builder.bearer_auth(key.expose_secret()),
            Auth::Header { name, key } => builder.header(name, key.expose_secret()),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %self.url, status = %status, "backend returned error");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, ctx: &RequestContext, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        tokio::select! {
            () = ctx.cancellation.cancelled() => Err(TransportError::Cancelled),
            result = self.post(body) => result,
        }
    }
}

/// AWS `InvokeModel` transport; request signing is done by the SDK
#[derive(Debug, Clone)]
pub struct BedrockTransport {
    client: aws_sdk_bedrockruntime::Client,
    region: String,
    model_id: String,
}

impl BedrockTransport {
    /// Client for `region` using the default AWS credential chain
    pub async fn new(region: &str, model_id: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_owned()))
            .load()
            .await;

        Self {
            client: aws_sdk_bedrockruntime::Client::new(&config),
            region: region.to_owned(),
            model_id: model_id.into(),
        }
    }

    /// Region the client was built for
    pub fn region(&self) -> &str {
        &self.region
    }

    async fn invoke(&self, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| match e.raw_response().map(|r| r.status().as_u16()) {
                Some(status) if status >= 400 => TransportError::Status {
                    status,
                    body: DisplayErrorContext(&e).to_string(),
                },
                _ => TransportError::Request(DisplayErrorContext(&e).to_string()),
            })?;

        Ok(output.body.into_inner())
    }
}

#[async_trait]
impl Transport for BedrockTransport {
    async fn send(&self, ctx: &RequestContext, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        tokio::select! {
            () = ctx.cancellation.cancelled() => Err(TransportError::Cancelled),
            result = self.invoke(body) => result,
        }
    }
}
