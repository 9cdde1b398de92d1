use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    recipe::{
        ports::LLMClient,
        value_objects::{ContentPart, GenerationRequest},
    },
};

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    model_name: String,
    base_url: Url,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl From<GenerationRequest> for GeminiRequest {
    fn from(request: GenerationRequest) -> Self {
        let parts = request
            .parts
            .into_iter()
            .map(|part| match part {
                ContentPart::InlineData { mime_type, data } => Part::InlineData {
                    inline_data: InlineData { mime_type, data },
                },
                ContentPart::Text(text) => Part::Text { text },
            })
            .collect();

        Self {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part::Text {
                    text: request.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: request.response_mime_type,
                response_schema: request.response_schema,
            },
        }
    }
}

impl GeminiResponse {
    /// Concatenated text of the first candidate, `None` when there is none.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiLLMClient {
    pub fn new(config: &LLMConfig) -> Result<Self, CoreError> {
        let mut base_url = Url::parse(&config.gemini_base_url).map_err(|e| {
            CoreError::Invalid(format!(
                "invalid Gemini base URL {}: {}",
                config.gemini_base_url, e
            ))
        })?;
        // `Url::join` replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            model_name: config.gemini_model.clone(),
            base_url,
            client: Client::new(),
        })
    }

    fn endpoint(&self) -> Result<Url, CoreError> {
        self.base_url
            .join(&format!(
                "v1beta/models/{}:generateContent",
                self.model_name
            ))
            .map_err(|e| CoreError::Invalid(format!("invalid Gemini endpoint: {}", e)))
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let url = self.endpoint()?;

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                CoreError::TransportError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::TransportError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            CoreError::TransportError(format!("Failed to parse LLM response: {}", e))
        })?;

        gemini_response.into_text().ok_or_else(|| {
            error!("Gemini API returned no text");
            CoreError::EmptyResponse
        })
    }
}

impl LLMClient for GeminiLLMClient {
    async fn generate_content(&self, request: GenerationRequest) -> Result<String, CoreError> {
        debug!(
            model = %self.model_name,
            parts = request.parts.len(),
            "calling Gemini generateContent"
        );

        self.call_gemini_api(GeminiRequest::from(request)).await
    }
}
