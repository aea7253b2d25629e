use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Normalize dialogue text for storage: collapse whitespace runs to single
/// spaces, trim, and lowercase. Applied once at the point of storage;
/// speaker labels keep their original case.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One stored utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueRecord {
    pub speaker: String,
    pub dialogue: String,
}

/// One analyst's Q&A block: the affiliation announced by the moderator and
/// the exchange that followed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystExchange {
    pub analyst_company: String,
    pub dialogue: Vec<DialogueRecord>,
}

/// Where leading continuation text should be merged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeftoverAnchor<'a> {
    /// The last dialogue record of the named analyst's Q&A entry.
    Analyst(&'a str),
    /// The last commentary record.
    Commentary,
}

/// The accumulating result of a single-document parse.
///
/// Created empty, mutated while the pages are scanned, and handed to the
/// caller complete once the last page is processed. Serializes to exactly
/// the three-bucket output shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueStore {
    pub commentary_and_future_outlook: Vec<DialogueRecord>,
    pub analyst_discussion: BTreeMap<String, AnalystExchange>,
    pub end: Vec<DialogueRecord>,
}

impl DialogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an utterance to the commentary bucket. Text that is empty
    /// after normalization is not stored.
    pub fn append_commentary(&mut self, speaker: &str, dialogue: &str) {
        let cleaned = normalize_text(dialogue);
        if cleaned.is_empty() {
            return;
        }
        self.commentary_and_future_outlook.push(DialogueRecord {
            speaker: speaker.to_string(),
            dialogue: cleaned,
        });
    }

    /// Append an utterance to the closing bucket.
    pub fn append_end(&mut self, speaker: &str, dialogue: &str) {
        let cleaned = normalize_text(dialogue);
        if cleaned.is_empty() {
            return;
        }
        self.end.push(DialogueRecord {
            speaker: speaker.to_string(),
            dialogue: cleaned,
        });
    }

    /// Open a Q&A entry for an analyst the moderator just introduced.
    ///
    /// If the analyst was already introduced earlier in the call the
    /// existing entry is kept, so a follow-up round never drops the
    /// dialogue stored the first time around.
    pub fn start_analyst(&mut self, name: &str, company: &str) {
        self.analyst_discussion
            .entry(name.to_string())
            .or_insert_with(|| AnalystExchange {
                analyst_company: company.to_string(),
                dialogue: Vec::new(),
            });
    }

    /// Append an utterance to the named analyst's exchange.
    pub fn append_to_analyst(&mut self, analyst: &str, speaker: &str, dialogue: &str) {
        let cleaned = normalize_text(dialogue);
        if cleaned.is_empty() {
            return;
        }
        let Some(entry) = self.analyst_discussion.get_mut(analyst) else {
            debug!(analyst, "no Q&A entry for analyst, dropping utterance");
            return;
        };
        entry.dialogue.push(DialogueRecord {
            speaker: speaker.to_string(),
            dialogue: cleaned,
        });
    }

    /// Merge continuation text into the last open record of the bucket the
    /// anchor names, joined by a single space. A missing anchor (empty
    /// bucket, unknown analyst) drops the text.
    pub fn append_leftover(&mut self, anchor: LeftoverAnchor<'_>, text: &str) {
        let cleaned = normalize_text(text);
        if cleaned.is_empty() {
            return;
        }
        let record = match anchor {
            LeftoverAnchor::Analyst(name) => self
                .analyst_discussion
                .get_mut(name)
                .and_then(|entry| entry.dialogue.last_mut()),
            LeftoverAnchor::Commentary => self.commentary_and_future_outlook.last_mut(),
        };
        match record {
            Some(record) => {
                record.dialogue.push(' ');
                record.dialogue.push_str(&cleaned);
            }
            None => debug!(
                chars = cleaned.len(),
                "no open record for leftover text, dropping"
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commentary_and_future_outlook.is_empty()
            && self.analyst_discussion.is_empty()
            && self.end.is_empty()
    }
}
