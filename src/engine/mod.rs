use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{IntentClassifier, SpeakerVerifier};
use crate::models::{normalize_text, DialogueStore, ModeratorIntent, PageMap};

pub mod continuation;
pub mod tokenizer;

pub use tokenizer::{candidate_labels, LabelMatcher, PageTokens, Utterance};

/// Errors that abort a whole-document parse. Classifier failures never
/// land here; they are absorbed at the token they affect.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document produced no page text")]
    EmptyDocument,
    #[error("verified speaker name set is empty")]
    EmptyVerifiedNameSet,
    #[error("failed to build speaker label pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The call phase currently active during the scan. Transitions happen
/// only on classified moderator utterances; `End` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No moderator utterance has been classified yet.
    #[default]
    Undetermined,
    Commentary,
    AnalystQa,
    End,
}

/// Configuration for a document parse.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Speaker label reserved for the call facilitator, compared
    /// case-sensitively against tokenized labels.
    pub moderator_label: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            moderator_label: "Moderator".to_string(),
        }
    }
}

/// Result of a whole-document parse: either the three-bucket structure,
/// or a flat speaker map when the document carries no moderator at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    Segmented(DialogueStore),
    Flat(BTreeMap<String, String>),
}

/// The stateful single-pass segmentation engine.
///
/// Walks pages in ascending index order; each page flows tokenizer →
/// continuation resolver → per-token moderator gate or phase routing →
/// dialogue store. One instance processes exactly one document between
/// resets.
#[derive(Debug, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
    phase: Phase,
    last_speaker: Option<String>,
    current_analyst: Option<String>,
    store: DialogueStore,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Clear all per-document state. `segment` calls this on entry, so a
    /// single instance can be reused across documents sequentially.
    pub fn reset(&mut self) {
        self.phase = Phase::Undetermined;
        self.last_speaker = None;
        self.current_analyst = None;
        self.store = DialogueStore::new();
    }

    /// Scan the pages and return the completed store.
    pub async fn segment<C: IntentClassifier>(
        &mut self,
        pages: &PageMap,
        matcher: &LabelMatcher,
        classifier: &C,
    ) -> Result<DialogueStore, ParseError> {
        self.reset();

        if pages.values().all(|text| text.trim().is_empty()) {
            return Err(ParseError::EmptyDocument);
        }

        for (&page, text) in pages {
            if text.trim().is_empty() {
                debug!(page, "skipping empty page");
                continue;
            }
            self.process_page(page, text, matcher, classifier).await;
        }

        Ok(std::mem::take(&mut self.store))
    }

    async fn process_page<C: IntentClassifier>(
        &mut self,
        page: u32,
        text: &str,
        matcher: &LabelMatcher,
        classifier: &C,
    ) {
        let tokens = matcher.tokenize(text);
        debug!(page, utterances = tokens.utterances.len(), "tokenized page");

        if let Some(leading) = &tokens.leading {
            continuation::resolve_leading(
                &mut self.store,
                leading,
                self.last_speaker.as_deref(),
                self.current_analyst.as_deref(),
                &self.config.moderator_label,
            );
        }

        for utterance in &tokens.utterances {
            self.last_speaker = Some(utterance.speaker.clone());
            if utterance.speaker == self.config.moderator_label {
                self.classify_moderator(&utterance.dialogue, classifier).await;
            } else {
                self.route(&utterance.speaker, &utterance.dialogue);
            }
        }
    }

    /// Moderator intent gate. The utterance text is consumed purely for
    /// phase control and is never stored. Classifier failures leave the
    /// phase and analyst context unchanged.
    async fn classify_moderator<C: IntentClassifier>(&mut self, dialogue: &str, classifier: &C) {
        if self.phase == Phase::End {
            debug!("closing phase is terminal, skipping moderator classification");
            return;
        }

        let intent = match classifier.classify_intent(dialogue).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!("intent classification failed, phase unchanged: {e:#}");
                return;
            }
        };

        match intent {
            ModeratorIntent::Opening => {
                self.phase = Phase::Commentary;
            }
            ModeratorIntent::NewAnalystStart {
                analyst_name,
                analyst_company,
            } => {
                debug!(analyst = %analyst_name, company = %analyst_company, "new analyst introduced");
                self.store.start_analyst(&analyst_name, &analyst_company);
                self.current_analyst = Some(analyst_name);
                self.phase = Phase::AnalystQa;
            }
            ModeratorIntent::End => {
                self.phase = Phase::End;
            }
            ModeratorIntent::Unrecognized => {
                warn!("unrecognized moderator intent, phase unchanged");
            }
        }
    }

    /// Route a non-moderator token to the bucket the current phase names.
    /// Tokens seen before any moderator classification default to
    /// commentary.
    fn route(&mut self, speaker: &str, dialogue: &str) {
        match self.phase {
            Phase::Undetermined | Phase::Commentary => {
                self.store.append_commentary(speaker, dialogue);
            }
            Phase::AnalystQa => match &self.current_analyst {
                Some(analyst) => self.store.append_to_analyst(analyst, speaker, dialogue),
                // Introductions always set the context, so this only fires
                // if a caller mutated state between pages.
                None => self.store.append_commentary(speaker, dialogue),
            },
            Phase::End => {
                self.store.append_end(speaker, dialogue);
            }
        }
    }
}

/// Parse a document with the generic label heuristic. Degrades to a flat
/// speaker map when no page carries the moderator label.
pub async fn segment_document<C: IntentClassifier>(
    pages: &PageMap,
    classifier: &C,
    config: &SegmenterConfig,
) -> Result<ParseOutcome, ParseError> {
    segment_with_matcher(pages, LabelMatcher::generic(), classifier, config).await
}

/// Parse a document with the two-pass verified-name design: the generic
/// heuristic gathers candidate labels, the verifier filters them, and the
/// scan re-tokenizes with the exact alternation. Verification failure
/// falls back to the generic heuristic.
pub async fn segment_document_verified<C, V>(
    pages: &PageMap,
    classifier: &C,
    verifier: &V,
    config: &SegmenterConfig,
) -> Result<ParseOutcome, ParseError>
where
    C: IntentClassifier,
    V: SpeakerVerifier,
{
    let matcher = build_verified_matcher(pages, verifier, config).await;
    segment_with_matcher(pages, matcher, classifier, config).await
}

async fn segment_with_matcher<C: IntentClassifier>(
    pages: &PageMap,
    matcher: LabelMatcher,
    classifier: &C,
    config: &SegmenterConfig,
) -> Result<ParseOutcome, ParseError> {
    if pages.values().all(|text| text.trim().is_empty()) {
        return Err(ParseError::EmptyDocument);
    }

    let marker = format!("{}:", config.moderator_label);
    if !pages.values().any(|text| text.contains(&marker)) {
        info!("no moderator label found, degrading to flat speaker map");
        return Ok(ParseOutcome::Flat(flat_speaker_map(pages, &matcher)));
    }

    let mut segmenter = Segmenter::new(config.clone());
    let store = segmenter.segment(pages, &matcher, classifier).await?;
    Ok(ParseOutcome::Segmented(store))
}

async fn build_verified_matcher<V: SpeakerVerifier>(
    pages: &PageMap,
    verifier: &V,
    config: &SegmenterConfig,
) -> LabelMatcher {
    let candidates = candidate_labels(pages);
    if candidates.is_empty() {
        return LabelMatcher::generic();
    }

    match verifier.verify_speakers(&candidates).await {
        Ok(mut names) if !names.is_empty() => {
            if !names.iter().any(|n| n == &config.moderator_label) {
                names.push(config.moderator_label.clone());
            }
            match LabelMatcher::from_verified_names(&names) {
                Ok(matcher) => {
                    info!(names = names.len(), "using verified speaker names");
                    matcher
                }
                Err(e) => {
                    warn!("could not build verified pattern, keeping generic heuristic: {e}");
                    LabelMatcher::generic()
                }
            }
        }
        Ok(_) => {
            warn!("verifier returned no names, keeping generic label heuristic");
            LabelMatcher::generic()
        }
        Err(e) => {
            warn!("speaker verification failed, keeping generic label heuristic: {e:#}");
            LabelMatcher::generic()
        }
    }
}

/// Best-effort degraded mode for documents without a moderator: every
/// recognized utterance is concatenated under its speaker label.
pub fn flat_speaker_map(pages: &PageMap, matcher: &LabelMatcher) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for text in pages.values() {
        for utterance in matcher.tokenize(text).utterances {
            let cleaned = normalize_text(&utterance.dialogue);
            if cleaned.is_empty() {
                continue;
            }
            let speech = map.entry(utterance.speaker).or_default();
            if !speech.is_empty() {
                speech.push(' ');
            }
            speech.push_str(&cleaned);
        }
    }
    map
}
