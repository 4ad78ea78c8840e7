use crate::models::StartupIdea;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the speech API
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech API key not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Speech API returned error: {0}")]
    ApiError(String),
}

/// Voice parameters sent with every synthesis request
#[derive(Debug, Clone)]
pub struct VoiceSettings {
    pub voice_id: String,
    pub model_id: String,
    pub stability: f64,
    pub similarity_boost: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice_id: "EXAVITQu4vr4xnSDxMaL".to_string(),
            model_id: "eleven_monolingual_v1".to_string(),
            stability: 0.7,
            similarity_boost: 0.8,
        }
    }
}

/// ElevenLabs text-to-speech client
pub struct SpeechClient {
    endpoint: String,
    api_key: Option<String>,
    voice: VoiceSettings,
    client: Client,
}

impl SpeechClient {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        voice: VoiceSettings,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key: api_key.filter(|key| !key.is_empty()),
            voice,
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Synthesize `text`, returning the encoded audio (MPEG)
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::NotConfigured)?;

        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.endpoint.trim_end_matches('/'),
            self.voice.voice_id
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .json(&json!({
                "text": text,
                "model_id": self.voice.model_id,
                "voice_settings": {
                    "stability": self.voice.stability,
                    "similarity_boost": self.voice.similarity_boost,
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SpeechError::ApiError(format!(
                "Synthesis failed: {}",
                response.status()
            )));
        }

        let audio = response.bytes().await?;
        tracing::debug!("Synthesized {} bytes of audio", audio.len());
        Ok(audio.to_vec())
    }
}

/// Spoken overview of an idea card; `expanded` adds business details
pub fn narration_text(idea: &StartupIdea, expanded: bool) -> String {
    let mut parts = vec![
        format!("{}.", idea.title),
        idea.description.clone(),
        format!(
            "This is a {} difficulty project with a market size of {}.",
            idea.difficulty.as_str().to_lowercase(),
            idea.market_size
        ),
        format!("Expected time to market is {}.", idea.time_to_market),
    ];

    if expanded {
        parts.push(format!("Revenue Model: {}.", idea.revenue_model));
        parts.push(format!("Target Audience: {}.", idea.target_audience));
        parts.push(format!("Key Features include: {}.", idea.key_features.join(", ")));
        parts.push(format!("Competitive Advantage: {}.", idea.competitive_advantage));
    }

    parts.join(" ")
}
