use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{error, info, instrument};

use lingua_core::errors::UpstreamError;
use lingua_core::record::TranslationRecord;
use lingua_core::upstream::Summarizer;

pub const DEFAULT_BASE_URL: &str = "https://ai.gateway.lovable.dev/v1";
pub const CREDENTIAL_VAR: &str = "LINGUA_SUMMARY_API_KEY";

const MODEL: &str = "google/gemini-2.5-flash";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const FALLBACK_SUMMARY: &str = "Unable to generate summary";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates concise summaries of \
translation sessions. Focus on key insights, language patterns, and main topics discussed.";

/// Client for the chat-completion gateway used to summarize translation
/// sessions. The whole transcript is enumerated into a single prompt: no
/// streaming, no token-limit handling, no retry.
pub struct ChatSummarizer {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl ChatSummarizer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Network(format!("build client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }
}

/// Serialize records into the numbered transcript embedded in the prompt.
pub fn build_transcript(translations: &[TranslationRecord]) -> String {
    translations
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{}. From {} to {}:\n   Original: \"{}\"\n   Translation: \"{}\"",
                i + 1,
                t.source_language,
                t.target_language,
                t.source_text,
                t.translated_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn user_prompt(transcript: &str) -> String {
    format!(
        "Please create a concise summary of these translations:\n\n{transcript}\n\n\
         Provide insights about: 1) Main topics/themes, 2) Language patterns, \
         3) Key phrases or terms that appeared frequently."
    )
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    #[instrument(skip(self, translations), fields(count = translations.len()))]
    async fn summarize(&self, translations: &[TranslationRecord]) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(UpstreamError::MissingCredential(CREDENTIAL_VAR))?;

        let transcript = build_transcript(translations);
        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(&transcript) },
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            error!(status, body = %body, "AI gateway error");
            return Err(UpstreamError::from_status(status, body));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| UpstreamError::Network(format!("decode response: {e}")))?;

        let summary = payload
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or(FALLBACK_SUMMARY)
            .to_string();

        info!("summary generated");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingua_core::ids::TranslationId;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(source: &str, target: &str, original: &str, translated: &str) -> TranslationRecord {
        TranslationRecord {
            id: TranslationId::new(),
            source_language: source.into(),
            target_language: target.into(),
            source_text: original.into(),
            translated_text: translated.into(),
            word_count: original.split_whitespace().count() as u32,
            created_at: "2026-08-01T10:00:00Z".into(),
        }
    }

    #[test]
    fn transcript_is_numbered_blocks() {
        let records = vec![
            record("es", "en", "hola", "hello"),
            record("fr", "en", "bonjour", "hello"),
        ];
        let transcript = build_transcript(&records);
        assert_eq!(
            transcript,
            "1. From es to en:\n   Original: \"hola\"\n   Translation: \"hello\"\n\n\
             2. From fr to en:\n   Original: \"bonjour\"\n   Translation: \"hello\""
        );
    }

    #[test]
    fn transcript_of_empty_batch_is_empty() {
        assert_eq!(build_transcript(&[]), "");
    }

    #[test]
    fn user_prompt_embeds_transcript() {
        let prompt = user_prompt("1. From es to en: ...");
        assert!(prompt.starts_with("Please create a concise summary"));
        assert!(prompt.contains("1. From es to en: ..."));
        assert!(prompt.contains("Key phrases"));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let summarizer = ChatSummarizer::new("http://127.0.0.1:1", None).unwrap();
        let result = summarizer.summarize(&[record("es", "en", "hola", "hello")]).await;
        assert!(matches!(result, Err(UpstreamError::MissingCredential(_))));
    }

    #[tokio::test]
    async fn summarizes_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "google/gemini-2.5-flash"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Mostly greetings." } }
                ]
            })))
            .mount(&server)
            .await;

        let summarizer =
            ChatSummarizer::new(server.uri(), Some(SecretString::from("test-key"))).unwrap();
        let summary = summarizer
            .summarize(&[record("es", "en", "hola", "hello")])
            .await
            .unwrap();
        assert_eq!(summary, "Mostly greetings.");
    }

    #[tokio::test]
    async fn falls_back_when_choices_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let summarizer =
            ChatSummarizer::new(server.uri(), Some(SecretString::from("test-key"))).unwrap();
        let summary = summarizer
            .summarize(&[record("es", "en", "hola", "hello")])
            .await
            .unwrap();
        assert_eq!(summary, FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn upstream_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(402).set_body_string("payment required"))
            .mount(&server)
            .await;

        let summarizer =
            ChatSummarizer::new(server.uri(), Some(SecretString::from("test-key"))).unwrap();
        let result = summarizer.summarize(&[record("es", "en", "hola", "hello")]).await;
        assert!(matches!(
            result,
            Err(UpstreamError::UpstreamStatus { status: 402, .. })
        ));
    }
}
