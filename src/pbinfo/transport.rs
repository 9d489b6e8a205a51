//! HTTP transport used by [`PbInfoClient`](super::PbInfoClient).

use std::borrow::Cow;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::OnceCell;
use tracing::{debug, trace};
use url::Url;

use super::errors::FetchError;
use crate::utils::{fmt_duration, log_if_slow};

/// Requests slower than this are logged as warnings.
const SLOW_REQUEST: Duration = Duration::from_secs(5);

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: Url,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Response {
    /// Turn a non-2xx status into a [`FetchError::Status`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                url: self.url,
                status: self.status,
            })
        }
    }

    /// Body as text; invalid UTF-8 sequences are replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Performs GET requests. Implementations must be shareable across tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Response, FetchError>;
}

/// [`Transport`] backed by a lazily built `reqwest::Client`.
#[derive(Debug)]
pub struct HttpTransport {
    client: OnceCell<reqwest::Client>,
    timeout: Duration,
    user_agent: String,
}

impl HttpTransport {
    /// A zero `timeout` disables the per-request limit.
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            client: OnceCell::new(),
            timeout,
            user_agent: user_agent.into(),
        }
    }

    /// Use an already configured client instead of building one.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: OnceCell::new_with(Some(client)),
            timeout: Duration::ZERO,
            user_agent: String::new(),
        }
    }

    async fn client(&self) -> Result<&reqwest::Client, reqwest::Error> {
        self.client
            .get_or_try_init(|| async {
                let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
                if !self.timeout.is_zero() {
                    builder = builder.timeout(self.timeout);
                }
                debug!(timeout = fmt_duration(self.timeout), "Building HTTP client");
                builder.build()
            })
            .await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        let client = self
            .client()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let start = Instant::now();
        let resp = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        trace!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            duration = fmt_duration(start.elapsed()),
            "GET"
        );
        log_if_slow(start, SLOW_REQUEST, url.as_str());

        Ok(Response {
            url: url.clone(),
            status,
            body: body.to_vec(),
        })
    }
}
