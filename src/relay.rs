use bytes::{Bytes, BytesMut};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};

use crate::config::ImageRelayConfig;

pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const ACCEPT: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "pl-PL,pl;q=0.9,en-US;q=0.8,en;q=0.7";

#[derive(Debug)]
pub enum RelayError {
    InvalidUrl(String),
    /// Upstream answered with a non-success status.
    Status(StatusCode),
    Timeout,
    TooLarge { limit: usize },
    Transport(String),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
            RelayError::Status(status) => write!(f, "upstream returned {status}"),
            RelayError::Timeout => write!(f, "upstream timed out"),
            RelayError::TooLarge { limit } => write!(f, "upstream body exceeds {limit} bytes"),
            RelayError::Transport(msg) => write!(f, "upstream request failed: {msg}"),
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Timeout
        } else {
            RelayError::Transport(err.to_string())
        }
    }
}

#[derive(Debug)]
pub struct RelayedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// One-shot image fetcher with a fixed browser-like header set, a total
/// request timeout and a byte ceiling.
pub struct ImageRelay {
    client: reqwest::Client,
    max_bytes: usize,
}

impl ImageRelay {
    pub fn new(config: &ImageRelayConfig) -> Result<Self, String> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| format!("Failed to build image relay client: {e}"))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    pub async fn fetch(&self, raw_url: &str) -> Result<RelayedImage, RelayError> {
        let url = parse_url(raw_url)?;

        let mut resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RelayError::Status(status));
        }

        if resp
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(RelayError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let mut body = BytesMut::new();
        while let Some(chunk) = resp.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(RelayError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RelayedImage {
            bytes: body.freeze(),
            content_type,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw.trim()).map_err(|e| RelayError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RelayError::InvalidUrl(format!("unsupported scheme '{other}'"))),
    }
}
