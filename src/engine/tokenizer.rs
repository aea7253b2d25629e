use std::collections::HashSet;

use regex::Regex;

use crate::engine::ParseError;
use crate::models::PageMap;

/// Heuristic label pattern: a run of capitalized words followed by a
/// colon. Periods are allowed only as single-letter initials ("A. K.
/// Sharma:"), so a sentence end never glues onto the next label. Can still
/// misfire on incidental colons in dialogue text, which is why the
/// verified strategy exists.
const GENERIC_LABEL: &str = r"\b(?:[A-Z]\.|[A-Z][A-Za-z'-]+)(?:[ \t](?:[A-Z]\.|[A-Z][A-Za-z'-]+)){0,3}:";

/// One speaker-attributed utterance on a page. `dialogue` is the raw span
/// up to the next recognized label; it may be empty for a trailing label.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub speaker: String,
    pub dialogue: String,
}

/// Tokenization result for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageTokens {
    /// Text appearing before the first recognized label. A page with no
    /// labels at all puts its entire text here.
    pub leading: Option<String>,
    pub utterances: Vec<Utterance>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Strategy {
    Generic,
    Verified,
}

/// Speaker-label matching strategy. Two interchangeable modes: the generic
/// heuristic (default) and an exact alternation over verified names,
/// strictly more precise once names are available.
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    pattern: Regex,
    strategy: Strategy,
}

impl LabelMatcher {
    pub fn generic() -> Self {
        Self {
            pattern: Regex::new(GENERIC_LABEL).expect("generic label pattern is valid"),
            strategy: Strategy::Generic,
        }
    }

    /// Build an exact-match strategy from a verified name set. Longer names
    /// go first in the alternation so "Jane Doe" wins over "Jane".
    pub fn from_verified_names(names: &[String]) -> Result<Self, ParseError> {
        let mut names: Vec<&str> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(ParseError::EmptyVerifiedNameSet);
        }
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternation}):"))?;
        Ok(Self {
            pattern,
            strategy: Strategy::Verified,
        })
    }

    pub fn is_verified(&self) -> bool {
        self.strategy == Strategy::Verified
    }

    /// Split one page's raw text into leading untagged text plus an ordered
    /// sequence of (speaker, dialogue) utterances. Pure function of the
    /// page text and the strategy.
    pub fn tokenize(&self, text: &str) -> PageTokens {
        let mut tokens = PageTokens::default();
        let matches: Vec<regex::Match> = self.pattern.find_iter(text).collect();

        if matches.is_empty() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                tokens.leading = Some(trimmed.to_string());
            }
            return tokens;
        }

        let lead = text[..matches[0].start()].trim();
        if !lead.is_empty() {
            tokens.leading = Some(lead.to_string());
        }

        for (i, label) in matches.iter().enumerate() {
            let speaker = text[label.start()..label.end()]
                .trim_end_matches(':')
                .trim()
                .to_string();
            let dialogue_end = matches.get(i + 1).map_or(text.len(), |next| next.start());
            tokens.utterances.push(Utterance {
                speaker,
                dialogue: text[label.end()..dialogue_end].to_string(),
            });
        }

        tokens
    }
}

/// First pass of the two-pass design: gather candidate labels across all
/// pages with the generic heuristic, in first-seen order, for external
/// verification.
pub fn candidate_labels(pages: &PageMap) -> Vec<String> {
    let matcher = LabelMatcher::generic();
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for text in pages.values() {
        for utterance in matcher.tokenize(text).utterances {
            if seen.insert(utterance.speaker.clone()) {
                candidates.push(utterance.speaker);
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_tokenize() {
        let matcher = LabelMatcher::generic();
        let tokens = matcher.tokenize(
            "Moderator: Good morning, let's begin. Jane Doe: What about margins?",
        );

        assert!(tokens.leading.is_none());
        assert_eq!(tokens.utterances.len(), 2);
        assert_eq!(tokens.utterances[0].speaker, "Moderator");
        assert_eq!(
            tokens.utterances[0].dialogue.trim(),
            "Good morning, let's begin."
        );
        assert_eq!(tokens.utterances[1].speaker, "Jane Doe");
        assert_eq!(tokens.utterances[1].dialogue.trim(), "What about margins?");
    }

    #[test]
    fn test_leading_text_before_first_label() {
        let matcher = LabelMatcher::generic();
        let tokens = matcher.tokenize("half of the year. Moderator: Thank you.");

        assert_eq!(tokens.leading.as_deref(), Some("half of the year."));
        assert_eq!(tokens.utterances.len(), 1);
    }

    #[test]
    fn test_page_without_labels_is_all_leading() {
        let matcher = LabelMatcher::generic();
        let tokens = matcher.tokenize("  continuation of a long answer from the prior page  ");

        assert_eq!(
            tokens.leading.as_deref(),
            Some("continuation of a long answer from the prior page")
        );
        assert!(tokens.utterances.is_empty());
    }

    #[test]
    fn test_initials_in_labels() {
        let matcher = LabelMatcher::generic();
        let tokens = matcher.tokenize("A. K. Sharma: Margins improved across segments. Raj: Thanks.");

        assert_eq!(tokens.utterances.len(), 2);
        assert_eq!(tokens.utterances[0].speaker, "A. K. Sharma");
    }

    #[test]
    fn test_sentence_end_does_not_glue_onto_next_label() {
        let matcher = LabelMatcher::generic();
        let tokens = matcher.tokenize("Moderator: Welcome. Raj: Thanks.");

        assert_eq!(tokens.utterances.len(), 2);
        assert_eq!(tokens.utterances[0].speaker, "Moderator");
        assert_eq!(tokens.utterances[0].dialogue.trim(), "Welcome.");
        assert_eq!(tokens.utterances[1].speaker, "Raj");
    }

    #[test]
    fn test_trailing_label_has_empty_dialogue() {
        let matcher = LabelMatcher::generic();
        let tokens = matcher.tokenize("Raj: We grew revenue. Moderator:");

        assert_eq!(tokens.utterances.len(), 2);
        assert!(tokens.utterances[1].dialogue.trim().is_empty());
    }

    #[test]
    fn test_verified_matcher_ignores_incidental_colons() {
        let names = vec!["Raj".to_string(), "Jane".to_string()];
        let matcher = LabelMatcher::from_verified_names(&names).unwrap();
        let tokens = matcher.tokenize("Raj: We signed the MOU: a large one. Jane: Thanks.");

        assert_eq!(tokens.utterances.len(), 2);
        assert_eq!(
            tokens.utterances[0].dialogue.trim(),
            "We signed the MOU: a large one."
        );

        // The generic heuristic misfires on the same text.
        let generic = LabelMatcher::generic().tokenize("Raj: We signed the MOU: a large one.");
        assert_eq!(generic.utterances.len(), 2);
    }

    #[test]
    fn test_verified_prefers_longer_names() {
        let names = vec!["Jane".to_string(), "Jane Doe".to_string()];
        let matcher = LabelMatcher::from_verified_names(&names).unwrap();
        let tokens = matcher.tokenize("Jane Doe: Hello.");

        assert_eq!(tokens.utterances[0].speaker, "Jane Doe");
    }

    #[test]
    fn test_empty_name_set_is_rejected() {
        assert!(LabelMatcher::from_verified_names(&[]).is_err());
    }

    #[test]
    fn test_candidate_labels_dedupe_in_order() {
        let mut pages = PageMap::new();
        pages.insert(1, "Moderator: Welcome. Raj: Thanks.".to_string());
        pages.insert(2, "Raj: More remarks. Jane: A question.".to_string());

        assert_eq!(candidate_labels(&pages), vec!["Moderator", "Raj", "Jane"]);
    }
}
