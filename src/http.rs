use std::future::Future;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

const UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Where pages and API responses come from
pub trait Transport {
    /// GET `url` and return the body as text
    fn get_text(&self, url: &str) -> impl Future<Output = color_eyre::Result<String>>;

    /// GET `url` with a query string and parse the body as JSON
    fn get_json(&self, url: &str, query: &[(&str, String)]) -> impl Future<Output = color_eyre::Result<Value>>;
}

/// HTTP client used for both the NPS site and the places API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> color_eyre::Result<Self> {
        Ok(
            Self {
                client: Client::builder()
                    .default_headers(Self::default_headers())
                    .build()?,
            }
        )
    }

    fn default_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, HeaderValue::from_static(UA));
        map
    }
}

impl Transport for HttpClient {
    async fn get_text(&self, url: &str) -> color_eyre::Result<String> {
        Ok(
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?
        )
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> color_eyre::Result<Value> {
        Ok(
            self.client
                .get(url)
                .query(query)
                .send()
                .await?
                .error_for_status()?
                .json::<Value>()
                .await?
        )
    }
}
