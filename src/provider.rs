//! Sources of card artwork.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::assets;
use crate::deck::CardSpec;
use crate::error::{ConfigError, ProviderError};

/// Minimum gap between two image API requests.
const REQUEST_PACING: Duration = Duration::from_millis(600);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Produces the base artwork for one card.
pub trait ImageProvider {
    fn fetch(&mut self, card: &CardSpec, prompt: &str) -> Result<RgbaImage, ProviderError>;
}

/// Returns the same background image for every card. No network access.
#[derive(Debug, Clone)]
pub struct PlaceholderProvider {
    image: RgbaImage,
}

impl PlaceholderProvider {
    pub fn new(image: RgbaImage) -> Self {
        PlaceholderProvider { image }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let image = assets::load_image(path)?;
        info!("Test mode: using placeholder art {}", path.display());
        Ok(PlaceholderProvider { image })
    }
}

impl ImageProvider for PlaceholderProvider {
    fn fetch(&mut self, _card: &CardSpec, _prompt: &str) -> Result<RgbaImage, ProviderError> {
        Ok(self.image.clone())
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    b64_json: Option<String>,
}

/// Client for the OpenAI image generation endpoint.
pub struct OpenAiProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    size: String,
    last_request: Option<Instant>,
}

impl OpenAiProvider {
    pub fn new(
        api_base: &str,
        api_key: &str,
        model: &str,
        size: &str,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(OpenAiProvider {
            client,
            endpoint: format!("{}/v1/images/generations", api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
            size: size.to_string(),
            last_request: None,
        })
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < REQUEST_PACING {
                thread::sleep(REQUEST_PACING - elapsed);
            }
        }
        self.last_request = Some(Instant::now());
    }
}

impl ImageProvider for OpenAiProvider {
    fn fetch(&mut self, card: &CardSpec, prompt: &str) -> Result<RgbaImage, ProviderError> {
        self.pace();

        // dall-e models only return base64 when asked to
        let response_format = self.model.starts_with("dall-e").then_some("b64_json");
        let request = GenerationRequest {
            model: &self.model,
            prompt,
            size: &self.size,
            n: 1,
            response_format,
        };

        debug!("POST {} for {} ({})", self.endpoint, card, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerationResponse = response.json()?;
        decode_image(parsed)
    }
}

fn decode_image(response: GenerationResponse) -> Result<RgbaImage, ProviderError> {
    let payload = response
        .data
        .into_iter()
        .next()
        .and_then(|img| img.b64_json)
        .ok_or(ProviderError::EmptyResponse)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}
