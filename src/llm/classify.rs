use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::llm::client::GroqClient;
use crate::llm::prompts::{INTENT_SYSTEM_PROMPT, SPEAKER_VERIFY_SYSTEM_PROMPT};
use crate::models::ModeratorIntent;

/// Classifies a moderator utterance into a phase signal.
///
/// Transport and service failures are `Err`; replies that do not parse
/// into a known intent are `Ok(ModeratorIntent::Unrecognized)`. The engine
/// treats both as fail-soft at the token that triggered the call.
#[allow(async_fn_in_trait)]
pub trait IntentClassifier {
    async fn classify_intent(&self, utterance: &str) -> Result<ModeratorIntent>;
}

/// Filters candidate speaker labels down to genuine participant names,
/// used to rebuild the exact-match label pattern.
#[allow(async_fn_in_trait)]
pub trait SpeakerVerifier {
    async fn verify_speakers(&self, candidates: &[String]) -> Result<Vec<String>>;
}

impl IntentClassifier for GroqClient {
    async fn classify_intent(&self, utterance: &str) -> Result<ModeratorIntent> {
        let reply = self.send_message(INTENT_SYSTEM_PROMPT, utterance).await?;
        debug!(reply = %reply, "moderator intent reply");
        Ok(ModeratorIntent::from_reply(&reply))
    }
}

#[derive(Debug, Deserialize)]
struct SpeakerReply {
    #[serde(default)]
    speakers: Vec<String>,
}

impl SpeakerVerifier for GroqClient {
    async fn verify_speakers(&self, candidates: &[String]) -> Result<Vec<String>> {
        let user = serde_json::to_string_pretty(candidates)?;
        let reply = self.send_message(SPEAKER_VERIFY_SYSTEM_PROMPT, &user).await?;
        debug!(reply = %reply, "speaker verification reply");

        let parsed: SpeakerReply = serde_json::from_str(&reply)
            .context("speaker verification reply was not valid JSON")?;
        Ok(parsed
            .speakers
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }
}
