use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::{DevfeedError, Result};
use crate::config::ApiConfig;
use crate::domain::{Article, Video};
use crate::fetcher::ContentClient;
use crate::normalizer::Normalize;

/// A listable dev.to resource.
pub trait ApiResource {
    const PATH: &'static str;
}

impl ApiResource for Article {
    const PATH: &'static str = "articles";
}

impl ApiResource for Video {
    const PATH: &'static str = "videos";
}

pub struct HttpContentClient<I> {
    client: Client,
    base_url: String,
    _kind: PhantomData<fn() -> I>,
}

impl<I: ApiResource> HttpContentClient<I> {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        // Fail on a malformed base URL at startup rather than on first fetch.
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            _kind: PhantomData,
        })
    }

    pub fn page_url(&self, page: u32, page_size: u32) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, I::PATH))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &page_size.to_string());
        Ok(url)
    }
}

#[async_trait]
impl<I> ContentClient<I> for HttpContentClient<I>
where
    I: ApiResource + Normalize + Send + 'static,
{
    async fn fetch(&self, page: u32, page_size: u32) -> Result<Vec<I>> {
        let url = self.page_url(page, page_size)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DevfeedError::Server {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        I::normalize(&body)
    }
}
