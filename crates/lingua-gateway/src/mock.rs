use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use lingua_core::errors::UpstreamError;
use lingua_core::lang::LanguagePair;
use lingua_core::record::TranslationRecord;
use lingua_core::upstream::{Summarizer, Translator};

/// Scripted translator for deterministic testing without network calls.
/// Responses are consumed in order; an exhausted script fails the call.
pub struct MockTranslator {
    responses: Mutex<VecDeque<Result<String, UpstreamError>>>,
    fallback: Option<String>,
    call_count: AtomicUsize,
}

impl MockTranslator {
    pub fn new(responses: Vec<Result<String, UpstreamError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Convenience: answer every call with the same translated text.
    pub fn always(text: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: Some(text.to_string()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, _text: &str, _pair: &LanguagePair) -> Result<String, UpstreamError> {
        let _ = self.call_count.fetch_add(1, Ordering::Relaxed);
        let mut responses = self.responses.lock();
        match responses.pop_front() {
            Some(response) => response,
            None => match &self.fallback {
                Some(text) => Ok(text.clone()),
                None => Err(UpstreamError::InvalidRequest(
                    "MockTranslator: no response configured".to_string(),
                )),
            },
        }
    }
}

/// Scripted summarizer counterpart to [`MockTranslator`].
pub struct MockSummarizer {
    responses: Mutex<VecDeque<Result<String, UpstreamError>>>,
    call_count: AtomicUsize,
}

impl MockSummarizer {
    pub fn new(responses: Vec<Result<String, UpstreamError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _translations: &[TranslationRecord]) -> Result<String, UpstreamError> {
        let _ = self.call_count.fetch_add(1, Ordering::Relaxed);
        let mut responses = self.responses.lock();
        match responses.pop_front() {
            Some(response) => response,
            None => Err(UpstreamError::InvalidRequest(
                "MockSummarizer: no response configured".to_string(),
            )),
        }
    }
}
