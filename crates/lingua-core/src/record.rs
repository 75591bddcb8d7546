use serde::{Deserialize, Serialize};

use crate::ids::TranslationId;
use crate::lang::LanguagePair;

/// A persisted translation event. Immutable once created; the only
/// mutation the store supports is deletion by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: TranslationId,
    pub source_language: String,
    pub target_language: String,
    pub source_text: String,
    pub translated_text: String,
    pub word_count: u32,
    pub created_at: String,
}

impl TranslationRecord {
    pub fn pair(&self) -> LanguagePair {
        LanguagePair::new(self.source_language.as_str(), self.target_language.as_str())
    }
}

/// Input for inserting a record. The id, word count, and timestamp are
/// assigned by the store at insert time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTranslation {
    pub source_language: String,
    pub target_language: String,
    pub source_text: String,
    pub translated_text: String,
}

/// Number of whitespace-separated tokens in the source text.
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("hola mundo"), 2);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn word_count_collapses_runs_of_whitespace() {
        assert_eq!(word_count("  a\t b \n c  "), 3);
    }

    #[test]
    fn record_pair() {
        let record = TranslationRecord {
            id: TranslationId::new(),
            source_language: "es".into(),
            target_language: "en".into(),
            source_text: "hola".into(),
            translated_text: "hello".into(),
            word_count: 1,
            created_at: "2026-08-01T10:00:00Z".into(),
        };
        assert_eq!(record.pair().to_string(), "ES-EN");
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = TranslationRecord {
            id: TranslationId::from_raw("tr_abc"),
            source_language: "fr".into(),
            target_language: "en".into(),
            source_text: "bonjour le monde".into(),
            translated_text: "hello world".into(),
            word_count: 3,
            created_at: "2026-08-01T10:00:00Z".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: TranslationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id.as_str(), "tr_abc");
        assert_eq!(parsed.word_count, 3);
    }
}
