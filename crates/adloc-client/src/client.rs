//! Campaign service HTTP client.

use std::sync::Arc;
use std::time::Instant;

use adloc_models::{AnalysisPayload, CampaignEntity, CampaignId, EmbeddingsPayload};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::TokenSource;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::metrics::record_request;
use crate::service::CampaignService;
use crate::types::{
    Acknowledgement, CreateCampaignRequest, CreateCampaignResponse, FetchCampaignResponse,
    GenerateRequest, GenerateResponse, GenerationResult, HealthResponse, ListCampaignsResponse,
    MediaFile,
};

/// reqwest-backed `CampaignService`.
#[derive(Clone)]
pub struct HttpCampaignService {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl HttpCampaignService {
    /// Create a new client.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenSource>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("adloc-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Transport)?;

        // Relative joins keep any path prefix only when the base ends in '/'.
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Create from environment variables.
    pub fn from_env(tokens: Arc<dyn TokenSource>) -> ClientResult<Self> {
        Self::new(ClientConfig::from_env(), tokens)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check whether the service answers.
    pub async fn health_check(&self) -> ClientResult<HealthResponse> {
        let url = self.endpoint("api/health")?;
        self.send_json("health", self.http.get(url)).await
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn campaign_endpoint(&self, id: &CampaignId, suffix: &str) -> ClientResult<Url> {
        let path = format!("api/videos/{}{}", urlencoding::encode(id.as_str()), suffix);
        self.endpoint(&path)
    }

    /// Resolve a media or analysis reference, which is usually root-relative.
    pub fn resolve_ref(&self, reference: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(reference)?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and decode a JSON body, turning every failure shape
    /// into a `ClientError`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let started = Instant::now();

        let response = match self.authorize(request).send().await {
            Ok(response) => response,
            Err(e) => {
                record_request(operation, 0, started.elapsed());
                warn!(operation, "Campaign service unreachable: {}", e);
                return Err(ClientError::Transport(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;
        record_request(operation, status.as_u16(), started.elapsed());

        if !status.is_success() {
            let err = ClientError::from_response_body(status.as_u16(), &body);
            warn!(operation, status = status.as_u16(), "Campaign service rejected request: {}", err);
            return Err(err);
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ClientError::invalid_response(format!("{}: {}", operation, e)))?;

        if value.get("ok") == Some(&Value::Bool(false)) {
            return Err(ClientError::from_response_body(status.as_u16(), &body));
        }

        debug!(operation, status = status.as_u16(), "Campaign service request succeeded");

        serde_json::from_value(value)
            .map_err(|e| ClientError::invalid_response(format!("{}: {}", operation, e)))
    }

    fn file_part(file: MediaFile) -> ClientResult<Part> {
        let MediaFile {
            file_name,
            content_type,
            bytes,
        } = file;
        let part = Part::bytes(bytes).file_name(file_name);
        match content_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| ClientError::invalid_input(format!("Invalid content type: {}", e))),
            None => Ok(part),
        }
    }
}

#[async_trait]
impl CampaignService for HttpCampaignService {
    async fn list_campaigns(&self) -> ClientResult<Vec<CampaignEntity>> {
        let url = self.endpoint("api/videos")?;
        let response: ListCampaignsResponse =
            self.send_json("list_campaigns", self.http.get(url)).await?;
        Ok(response.videos)
    }

    async fn fetch_campaign(&self, id: &CampaignId) -> ClientResult<CampaignEntity> {
        let url = self.campaign_endpoint(id, "")?;
        let response: FetchCampaignResponse =
            self.send_json("fetch_campaign", self.http.get(url)).await?;
        Ok(response.video)
    }

    async fn create_campaign(&self, request: CreateCampaignRequest) -> ClientResult<CampaignEntity> {
        request.validate()?;

        let url = self.endpoint("api/transform")?;
        let CreateCampaignRequest {
            video,
            profiles,
            details,
        } = request;

        let mut form = Form::new().part("video", Self::file_part(video)?);
        if let Some(profiles) = profiles {
            form = form.part("profiles", Self::file_part(profiles)?);
        }
        if let Some(name) = details.name {
            form = form.text("name", name);
        }
        if let Some(product_desc) = details.product_desc {
            form = form.text("product_desc", product_desc);
        }
        if let Some(goal) = details.goal {
            form = form.text("goal", goal);
        }

        let response: CreateCampaignResponse = self
            .send_json("create_campaign", self.http.post(url).multipart(form))
            .await?;
        Ok(response.into_entity(Utc::now()))
    }

    async fn fetch_analysis(&self, analysis_ref: &str) -> ClientResult<AnalysisPayload> {
        let url = self.resolve_ref(analysis_ref)?;
        self.send_json("fetch_analysis", self.http.get(url)).await
    }

    async fn request_generation(
        &self,
        id: &CampaignId,
        group_count: u32,
    ) -> ClientResult<GenerationResult> {
        let url = self.campaign_endpoint(id, "/generate-ads")?;
        let response: GenerateResponse = self
            .send_json(
                "request_generation",
                self.http.post(url).json(&GenerateRequest { group_count }),
            )
            .await?;
        Ok(response.into())
    }

    async fn fetch_embeddings(&self, id: &CampaignId) -> ClientResult<EmbeddingsPayload> {
        let url = self.campaign_endpoint(id, "/embeddings")?;
        self.send_json("fetch_embeddings", self.http.get(url)).await
    }

    async fn delete_campaign(&self, id: &CampaignId) -> ClientResult<()> {
        let url = self.campaign_endpoint(id, "")?;
        let _: Acknowledgement = self
            .send_json("delete_campaign", self.http.delete(url))
            .await?;
        Ok(())
    }
}
