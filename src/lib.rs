pub mod engine;
pub mod io;
pub mod llm;
pub mod models;

pub use engine::{
    candidate_labels, flat_speaker_map, segment_document, segment_document_verified, LabelMatcher,
    PageTokens, ParseError, ParseOutcome, Phase, Segmenter, SegmenterConfig, Utterance,
};
pub use io::{
    load_pages_file, load_pages_json, process_document, run_batch, write_outcome, BatchSummary,
    FailureRoster,
};
pub use llm::{GroqClient, GroqConfig, IntentClassifier, SpeakerVerifier};
pub use models::{
    normalize_text, AnalystExchange, DialogueRecord, DialogueStore, ModeratorIntent, PageMap,
};
