use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{error, warn};

/// What came back from one GET.
///
/// `error` and `body` are independent: a rate-limited or rejected request still
/// carries the API's JSON explanation in its body.
#[derive(Debug, Default)]
pub struct Exchange {
    pub error: Option<Error>,
    pub status: Option<StatusCode>,
    pub body: Option<String>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: Url) -> Exchange;
}

pub struct ReqwestTransport {
    web: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let web = reqwest::Client::builder()
            .user_agent(concat!("hypixel-sdk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { web })
    }
    pub fn from_client(web: reqwest::Client) -> Self {
        Self { web }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: Url) -> Exchange {
        let res = match self.web.get(url).send().await {
            Ok(res) => res,
            Err(e) => {
                let e = e.without_url();
                request_error_log(&e);
                return Exchange {
                    error: Some(e.into()),
                    ..Default::default()
                };
            }
        };

        let status = res.status();
        let error = Error::from_status(status);
        match res.text().await {
            Ok(body) => Exchange {
                error,
                status: Some(status),
                body: Some(body),
            },
            Err(e) => {
                let e = e.without_url();
                request_error_log(&e);
                Exchange {
                    error: Some(e.into()),
                    status: Some(status),
                    body: None,
                }
            }
        }
    }
}

// the url carries the key, callers strip it before logging
fn request_error_log(err: &reqwest::Error) {
    if err.is_timeout() {
        warn!("Timeout when requesting Hypixel API: {}", err);
    } else if err.is_connect() {
        error!("Failed to connect to Hypixel API: {}", err);
    } else if err.is_body() || err.is_decode() {
        error!("Failed to read Hypixel API response: {}", err);
    } else {
        error!("Error when requesting Hypixel API: {}", err);
    }
}
