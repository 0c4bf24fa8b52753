use crate::actors::traits::SearchBackend;
use crate::config::SearchConfig;
use crate::error::AppError;
use crate::models::{AutocompleteResponse, DestinationsResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

/// reqwest client for the destination service (`{base}/destinations`, ...).
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base: String,
}

impl HttpStorefrontApi {
    pub fn new(config: &SearchConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, &config.api_base))
    }

    pub fn with_client(client: Client, base: &str) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str, query: Option<&str>) -> Result<Url, AppError> {
        let mut url = Url::parse(&format!("{}/{}", self.base, path))?;
        if let Some(q) = query {
            url.query_pairs_mut().append_pair("q", q);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AppError> {
        debug!(%url, "GET");
        let res = self.client.get(url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Api(format!(
                "{} failed with status {}: {}",
                url.path(),
                status,
                body
            )));
        }
        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl SearchBackend for HttpStorefrontApi {
    #[instrument(skip(self))]
    async fn destinations(&self) -> Result<DestinationsResponse, AppError> {
        let url = self.endpoint("destinations", None)?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn autocomplete(&self, query: String) -> Result<AutocompleteResponse, AppError> {
        let url = self.endpoint("search/autocomplete", Some(&query))?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn search_destinations(&self, query: String) -> Result<DestinationsResponse, AppError> {
        let url = self.endpoint("search/destinations", Some(&query))?;
        self.get_json(url).await
    }
}
