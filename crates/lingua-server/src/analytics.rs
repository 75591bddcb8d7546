use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use lingua_core::record::TranslationRecord;

/// Aggregates are computed at read time over the most recent rows,
/// never stored.
pub const ANALYTICS_WINDOW: u32 = 100;

/// Aggregates served to the analytics panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_translations: u32,
    pub total_words: u64,
    pub today: u32,
    pub top_pair: Option<String>,
}

/// Compute panel aggregates from a newest-first window of records.
/// `today` is the server's local calendar day.
pub fn summarize(records: &[TranslationRecord], today: NaiveDate) -> AnalyticsSummary {
    let total_words = records.iter().map(|r| u64::from(r.word_count)).sum();

    let today_count = records
        .iter()
        .filter(|r| {
            DateTime::parse_from_rfc3339(&r.created_at)
                .map(|dt| dt.with_timezone(&Local).date_naive() == today)
                .unwrap_or(false)
        })
        .count() as u32;

    AnalyticsSummary {
        total_translations: records.len() as u32,
        total_words,
        today: today_count,
        top_pair: top_pair(records),
    }
}

/// Most frequent pair in the window. Ties go to the pair encountered
/// first walking from the most recent record.
fn top_pair(records: &[TranslationRecord]) -> Option<String> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    for record in records {
        let label = record.pair().to_string();
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(usize, u32)> = None;
    for (i, (_, n)) in counts.iter().enumerate() {
        match best {
            Some((_, best_n)) if *n <= best_n => {}
            _ => best = Some((i, *n)),
        }
    }
    best.map(|(i, _)| counts[i].0.clone())
}
