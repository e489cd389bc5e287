use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Method, Request, Response};
use std::time::Duration;

/// Seam for swapping the HTTP transport used by source loading.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;

    /// GET `url` and return the body; non-2xx statuses are errors.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let req = Request::new(Method::GET, url.parse()?);
        let resp = self.execute(req).await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}

/// Plain `reqwest` client with a request timeout. The public data
/// endpoints need no authentication.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("health_need_scorecard/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self(client)
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}
