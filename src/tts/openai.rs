//! OpenAI text-to-speech client
//!
//! One blocking-per-call HTTP request per utterance; no retry, caching, or
//! chunking of long input.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{AudioFormat, SpeechSynthesizer, SynthesisError, Voice};
use crate::config::{SecretString, TtsConfig};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TTS_MODEL: &str = "gpt-4o-mini-tts";

/// Speech client bound to one API key, endpoint, and model.
///
/// Built once at start-up and shared immutably for the rest of the process.
#[derive(Debug, Clone)]
pub struct OpenAiSpeechClient {
    http: Client,
    api_key: SecretString,
    url: String,
    model: String,
}

impl OpenAiSpeechClient {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            http: Client::new(),
            api_key,
            url: speech_url(OPENAI_BASE_URL),
            model: DEFAULT_TTS_MODEL.to_string(),
        }
    }

    /// Build the client from the `[tts]` configuration section.
    pub fn from_config(config: &TtsConfig) -> Result<Self, SynthesisError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(SynthesisError::MissingApiKey)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            url: speech_url(&config.base_url),
            model: config.model.clone(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.url = speech_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn speech_url(base_url: &str) -> String {
    format!("{}/audio/speech", base_url.trim_end_matches('/'))
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechClient {
    async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        format: AudioFormat,
    ) -> Result<Vec<u8>, SynthesisError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
            "voice": voice.as_str(),
            "response_format": format.extension(),
        });

        let response = self
            .http
            .post(&self.url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let audio_bytes = response.bytes().await?.to_vec();

        tracing::info!(
            "OpenAI TTS: generated {} bytes of audio (voice={}, format={}, model={}, {} chars)",
            audio_bytes.len(),
            voice,
            format,
            self.model,
            text.chars().count(),
        );

        Ok(audio_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::Server) -> OpenAiSpeechClient {
        OpenAiSpeechClient::new(SecretString::new("test-openai-key")).with_base_url(&server.url())
    }

    #[test]
    fn test_speech_url_trims_trailing_slash() {
        assert_eq!(
            speech_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/audio/speech"
        );
        assert_eq!(speech_url("http://localhost:8080"), "http://localhost:8080/audio/speech");
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = TtsConfig::default();
        let result = OpenAiSpeechClient::from_config(&config);
        assert!(matches!(result, Err(SynthesisError::MissingApiKey)));

        let config = TtsConfig {
            api_key: Some(SecretString::new("")),
            ..TtsConfig::default()
        };
        assert!(matches!(
            OpenAiSpeechClient::from_config(&config),
            Err(SynthesisError::MissingApiKey)
        ));
    }

    #[test]
    fn test_from_config_uses_model() {
        let config = TtsConfig {
            api_key: Some(SecretString::new("sk-test")),
            model: "tts-1-hd".to_string(),
            ..TtsConfig::default()
        };
        let client = OpenAiSpeechClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "tts-1-hd");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = OpenAiSpeechClient::new(SecretString::new("sk-super-secret"));
        let printed = format!("{:?}", client);
        assert!(!printed.contains("sk-super-secret"));
    }

    #[tokio::test]
    async fn test_tts_success() {
        let fake_audio = vec![0xFFu8; 256];
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .match_header("Authorization", "Bearer test-openai-key")
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(fake_audio.clone())
            .create_async()
            .await;

        let result = client(&server)
            .synthesize("Hello world", Voice::Alloy, AudioFormat::Mp3)
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), fake_audio);
    }

    #[tokio::test]
    async fn test_tts_sends_correct_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"gpt-4o-mini-tts","voice":"verse","response_format":"wav","input":"Olá, tudo bem?"}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(vec![0u8; 10])
            .create_async()
            .await;

        let _ = client(&server)
            .synthesize("Olá, tudo bem?", Voice::Verse, AudioFormat::Wav)
            .await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_tts_api_error_returns_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let result = client(&server)
            .synthesize("Hello", Voice::Alloy, AudioFormat::Mp3)
            .await;

        mock.assert_async().await;
        match result {
            Err(SynthesisError::Api { status, body }) => {
                assert_eq!(status, 429);
                assert!(body.contains("Rate limit"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tts_invalid_voice_error_mentions_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .with_status(400)
            .with_body(r#"{"error": {"message": "Invalid voice"}}"#)
            .create_async()
            .await;

        let err = client(&server)
            .synthesize("Hello", Voice::Ballad, AudioFormat::Mp3)
            .await
            .unwrap_err();

        mock.assert_async().await;
        let message = err.to_string();
        assert!(message.contains("400"), "error should mention status code: {}", message);
        assert!(message.contains("Invalid voice"));
    }

    #[tokio::test]
    async fn test_tts_server_error_500() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let result = client(&server)
            .synthesize("Hello", Voice::Alloy, AudioFormat::Wav)
            .await;

        mock.assert_async().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tts_empty_audio_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/audio/speech")
            .with_status(200)
            .with_body(Vec::<u8>::new())
            .create_async()
            .await;

        let result = client(&server)
            .synthesize("Hello", Voice::Alloy, AudioFormat::Mp3)
            .await;

        mock.assert_async().await;
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tts_connection_refused_is_request_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let client = OpenAiSpeechClient::new(SecretString::new("key"))
            .with_base_url("http://127.0.0.1:9");
        let result = client
            .synthesize("Hello", Voice::Alloy, AudioFormat::Mp3)
            .await;
        assert!(matches!(result, Err(SynthesisError::Request(_))));
    }

    #[tokio::test]
    async fn test_tts_different_voices() {
        for voice in [Voice::Alloy, Voice::Verse, Voice::Shimmer] {
            let mut server = mockito::Server::new_async().await;
            let mock = server
                .mock("POST", "/audio/speech")
                .match_body(mockito::Matcher::PartialJsonString(format!(
                    r#"{{"voice":"{}"}}"#,
                    voice
                )))
                .with_status(200)
                .with_body(vec![1u8; 10])
                .create_async()
                .await;

            let result = client(&server)
                .synthesize("Test", voice, AudioFormat::Mp3)
                .await;

            mock.assert_async().await;
            assert!(result.is_ok(), "voice '{}' should work", voice);
        }
    }
}
