use async_trait::async_trait;

use crate::errors::UpstreamError;
use crate::lang::LanguagePair;
use crate::record::TranslationRecord;

/// Seam between the server and the translation API client. A single
/// best-effort forward: no retry, no batching, no caching.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` along `pair`, returning the translated text.
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<String, UpstreamError>;
}

/// Seam between the server and the chat-completion gateway.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize a batch of past translation records into prose insights.
    async fn summarize(&self, translations: &[TranslationRecord]) -> Result<String, UpstreamError>;
}
