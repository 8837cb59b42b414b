use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::error::{FetchError, FetchResult};

/// Asynchronous HTTP GET returning a JSON body.
///
/// Retries and timeouts belong to the implementation, not to the cache
/// layer above it.
pub trait Transport: Send + Sync {
    fn get_json(&self, url: &str) -> BoxFuture<'static, FetchResult<Value>>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ReqwestTransport { client })
    }
}

impl Transport for ReqwestTransport {
    fn get_json(&self, url: &str) -> BoxFuture<'static, FetchResult<Value>> {
        let client = self.client.clone();
        let url = url.to_string();
        async move {
            let resp = client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Transport {
                    url: url.clone(),
                    message: e.to_string(),
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            resp.json::<Value>().await.map_err(|e| FetchError::Decode {
                url,
                message: e.to_string(),
            })
        }
        .boxed()
    }
}
