use std::time::Duration;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};

use crate::error::{Result, SourceError};
use crate::traits::{ByteSource, Connector};

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for HTTP sources.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// TCP connect timeout. Default: 10 s.
    pub connect_timeout: Option<Duration>,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            user_agent: concat!("snapshooter/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Issues one GET per connection attempt against an MJPEG endpoint.
///
/// `user:password@` credentials in the URL are sent as HTTP Basic auth.
/// Idle pooled connections are disabled so every attempt opens a new socket.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client,
    url: Url,
}

impl HttpConnector {
    /// Create a connector with default configuration.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_config(url, HttpConfig::default())
    }

    /// Create a connector with explicit configuration.
    pub fn with_config(url: &str, config: HttpConfig) -> Result<Self> {
        let url = parse_url(url)?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent(config.user_agent);
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    /// The endpoint, credentials included.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Connector for HttpConnector {
    type Source = HttpSource;

    async fn connect(&mut self) -> Result<HttpSource> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| SourceError::Request(err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: redact_url(&self.url),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        tracing::debug!(
            url = %redact_url(&self.url),
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or("<none>"),
            "http source connected"
        );

        Ok(HttpSource {
            response,
            content_type,
        })
    }

    fn target(&self) -> String {
        redact_url(&self.url)
    }
}

/// The streaming body of one HTTP response.
#[derive(Debug)]
pub struct HttpSource {
    response: Response,
    content_type: Option<String>,
}

impl ByteSource for HttpSource {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        self.response
            .chunk()
            .await
            .map_err(|err| SourceError::Request(err.without_url()))
    }
}

/// Render a URL for logs with its password masked.
pub fn redact_url(url: &Url) -> String {
    if url.password().is_none() {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let _ = redacted.set_password(Some("***"));
    redacted.to_string()
}

fn parse_url(input: &str) -> Result<Url> {
    let url = Url::parse(input).map_err(|err| SourceError::InvalidUrl {
        url: input.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SourceError::InvalidUrl {
            url: redact_url(&url),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
