use crate::actors::traits::AnalysisBackend;
use crate::config::SearchConfig;
use crate::error::AppError;
use crate::models::{
    AnalysisEnvelope, AnalysisOutcome, ContactRequest, ContactResponse, ItineraryRequest,
    ItineraryResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

/// reqwest client for the analysis service (`{analysis_base}/api/...`).
#[derive(Debug, Clone)]
pub struct HttpAnalysisApi {
    client: Client,
    base: String,
}

impl HttpAnalysisApi {
    pub fn new(config: &SearchConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, &config.analysis_base))
    }

    pub fn with_client(client: Client, base: &str) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// POSTs `payload` as JSON. Contact and itinerary failures carry their
    /// reason in the body, so non-2xx bodies are still decoded when they are
    /// JSON.
    async fn post_json<B, T>(&self, endpoint: &str, payload: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/api/{}", self.base, endpoint);
        debug!(%url, "POST");
        let res = self.client.post(&url).json(payload).send().await?;
        let status = res.status();
        let body = res.text().await?;

        match serde_json::from_str::<T>(&body) {
            Ok(decoded) => Ok(decoded),
            Err(_) if !status.is_success() => Err(AppError::Api(format!(
                "{} failed with status {}: {}",
                endpoint, status, body
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisApi {
    #[instrument(skip(self))]
    async fn analyze(&self, query: String) -> Result<AnalysisOutcome, AppError> {
        let envelope: AnalysisEnvelope = self
            .post_json("search", &serde_json::json!({ "query": query }))
            .await?;
        AnalysisOutcome::try_from(envelope)
    }

    #[instrument(skip(self, request), fields(reference_id = %request.reference_id))]
    async fn submit_contact(&self, request: ContactRequest) -> Result<ContactResponse, AppError> {
        self.post_json("submit-contact", &request).await
    }

    #[instrument(skip(self, request), fields(selections = request.selections.len()))]
    async fn generate_itinerary(&self, request: ItineraryRequest) -> Result<ItineraryResponse, AppError> {
        self.post_json("generate-itinerary", &request).await
    }
}
