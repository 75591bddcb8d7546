use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, instrument};

use lingua_core::errors::UpstreamError;
use lingua_core::lang::LanguagePair;
use lingua_core::upstream::Translator;

pub const DEFAULT_BASE_URL: &str = "https://api.mymemory.translated.net";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the MyMemory public translation API (no API key required).
/// A single best-effort forward per call: no retry, no rate-limit handling.
pub struct MyMemoryTranslator {
    client: Client,
    base_url: String,
}

impl MyMemoryTranslator {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Network(format!("build client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    #[instrument(skip(self, text), fields(pair = %pair.langpair_param()))]
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<String, UpstreamError> {
        let url = format!("{}/get", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("q", text), ("langpair", &pair.langpair_param())])
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            error!(status, body = %body, "translation API error");
            return Err(UpstreamError::from_status(status, body));
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| UpstreamError::Network(format!("decode response: {e}")))?;

        debug!(payload = %payload, "translation response");

        // responseStatus is 200 on success; MyMemory reports quota and
        // langpair errors inside an otherwise-200 payload.
        let response_status = payload_status(&payload);
        if response_status != Some(200) {
            let details = payload
                .get("responseDetails")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            error!(?response_status, details, "translation rejected");
            return Err(UpstreamError::Rejected(details.to_string()));
        }

        payload
            .pointer("/responseData/translatedText")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| UpstreamError::Rejected("missing translatedText".to_string()))
    }
}

/// MyMemory sends responseStatus as a number on success but as a quoted
/// string on some error paths.
fn payload_status(payload: &serde_json::Value) -> Option<i64> {
    match payload.get("responseStatus") {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}
