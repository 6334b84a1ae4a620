use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use wundr_core::{
    CoreError, Label, LabelGateway, Prompt, PromptGateway, PromptRequest, TranslationGateway,
};

pub mod wire;

use wire::{LabelsRequest, LabelsResponse, PromptsRequest, PromptsResponse, TranslateRequest,
    TranslateResponse};

const USER_AGENT: &str = concat!("wundr/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One client for all three proxy endpoints. Timeouts live here; the
/// resolver treats "no response" the same as a returned failure.
#[derive(Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Upstream(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, CoreError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("{path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Upstream(format!("{path} returned {status}")));
        }

        // Non-JSON or schema-violating bodies fail this call only.
        response
            .json::<R>()
            .await
            .map_err(|e| CoreError::Upstream(format!("{path}: {e}")))
    }
}

#[async_trait::async_trait]
impl LabelGateway for HttpGateway {
    async fn detect(&self, image: &[u8], include_text: bool) -> Result<Vec<Label>, CoreError> {
        let req = LabelsRequest {
            image_base64: base64::engine::general_purpose::STANDARD.encode(image),
            include_text,
        };
        let resp: LabelsResponse = self.post_json("/api/labels", &req).await?;
        let labels = resp.into_labels()?;
        tracing::debug!(count = labels.len(), "label detection finished");
        Ok(labels)
    }
}

#[async_trait::async_trait]
impl TranslationGateway for HttpGateway {
    async fn translate(&self, word: &str, target: &str) -> Result<String, CoreError> {
        let req = TranslateRequest { word, target };
        let resp: TranslateResponse = self.post_json("/api/translate", &req).await?;
        resp.into_translated()
    }
}

#[async_trait::async_trait]
impl PromptGateway for HttpGateway {
    async fn generate(&self, req: &PromptRequest) -> Result<Vec<Prompt>, CoreError> {
        let wire = PromptsRequest {
            object: &req.object,
            native: &req.native,
            target: &req.target,
            level: req.level.as_str(),
            count: req.count,
        };
        let resp: PromptsResponse = self.post_json("/api/prompts", &wire).await?;
        resp.into_prompts()
    }
}
