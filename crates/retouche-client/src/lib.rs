//! Client for a Gemini-style multimodal image editing endpoint.
//!
//! Bundles an image, an optional region mask, and a prompt into one
//! `generateContent` request and unpacks the response into zero-or-one
//! image plus zero-or-one text note. The client owns no UI concerns and no
//! raster logic; payloads cross this boundary already base64-encoded.

pub mod error;
pub mod types;

pub use error::ClientError;

use types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

/// Default model used for image editing and generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Optional environment override for the endpoint base URL.
pub const BASE_URL_ENV: &str = "RETOUCHE_API_BASE";

/// A base64 payload with its MIME type, as sent to or received from the
/// model.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64-encoded bytes (no data-URL prefix).
    pub data: String,
}

/// What the model produced: at least one of the two fields is set.
#[derive(Debug, Clone, Default)]
pub struct EditOutput {
    pub image: Option<InlineImage>,
    pub text: Option<String>,
}

/// Remote model client.
pub struct EditClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl EditClient {
    /// Create a client with the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a client from the environment. The key is read at request
    /// construction, not process start, so a missing key is a per-request
    /// error the UI can surface.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ClientError::MissingApiKey)?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            client.base_url = base_url;
        }
        Ok(client)
    }

    /// Override the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Edit an image: parts are ordered image, optional mask, prompt.
    pub async fn edit_image(
        &self,
        image: InlineImage,
        mask: Option<InlineImage>,
        prompt: &str,
    ) -> Result<EditOutput, ClientError> {
        let mut parts = vec![Part::inline(image.mime_type, image.data)];
        if let Some(mask) = mask {
            parts.push(Part::inline(mask.mime_type, mask.data));
        }
        parts.push(Part::text(prompt));
        self.generate_content(parts).await
    }

    /// Generate an image from text alone.
    pub async fn generate_image(&self, prompt: &str) -> Result<EditOutput, ClientError> {
        self.generate_content(vec![Part::text(prompt)]).await
    }

    async fn generate_content(&self, parts: Vec<Part>) -> Result<EditOutput, ClientError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig::default(),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        log::info!("dispatching generateContent to model {}", self.model);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::error!("model request failed with status {status}");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        extract_output(body)
    }
}

/// Collect the first candidate's parts into an [`EditOutput`]. Text parts
/// concatenate; the last image part wins.
fn extract_output(response: GenerateContentResponse) -> Result<EditOutput, ClientError> {
    let mut output = EditOutput::default();

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    for part in parts {
        if let Some(text) = part.text {
            output.text = Some(match output.text.take() {
                Some(existing) => existing + &text,
                None => text,
            });
        }
        if let Some(inline) = part.inline_data {
            output.image = Some(InlineImage {
                mime_type: inline.mime_type,
                data: inline.data,
            });
        }
    }

    if output.image.is_none() && output.text.is_none() {
        return Err(ClientError::EmptyResponse);
    }
    Ok(output)
}
