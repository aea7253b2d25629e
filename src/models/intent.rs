use serde::Deserialize;

/// A moderator utterance classified into a phase signal.
///
/// The classifier reply is validated into this closed set; anything
/// malformed or incomplete becomes `Unrecognized`, which leaves the phase
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeratorIntent {
    /// The call is opening or still in opening commentary.
    Opening,
    /// The moderator hands the floor to an analyst.
    NewAnalystStart {
        analyst_name: String,
        analyst_company: String,
    },
    /// The call is closing.
    End,
    /// The reply could not be mapped to a known intent.
    Unrecognized,
}

/// Raw reply shape from the intent classifier.
#[derive(Debug, Deserialize)]
pub struct RawIntentReply {
    pub intent: String,
    #[serde(default)]
    pub analyst_name: Option<String>,
    #[serde(default)]
    pub analyst_company: Option<String>,
}

impl RawIntentReply {
    pub fn into_intent(self) -> ModeratorIntent {
        match self.intent.trim().to_lowercase().as_str() {
            "opening" => ModeratorIntent::Opening,
            "end" => ModeratorIntent::End,
            "new_analyst_start" => match (self.analyst_name, self.analyst_company) {
                (Some(name), Some(company)) if !name.trim().is_empty() => {
                    ModeratorIntent::NewAnalystStart {
                        analyst_name: name.trim().to_string(),
                        analyst_company: company.trim().to_string(),
                    }
                }
                _ => ModeratorIntent::Unrecognized,
            },
            _ => ModeratorIntent::Unrecognized,
        }
    }
}

impl ModeratorIntent {
    /// Parse a raw classifier reply. Transport failures are the caller's
    /// problem; content failures all land on `Unrecognized`.
    pub fn from_reply(raw: &str) -> Self {
        match serde_json::from_str::<RawIntentReply>(raw) {
            Ok(reply) => reply.into_intent(),
            Err(_) => ModeratorIntent::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_opening() {
        let intent = ModeratorIntent::from_reply(r#"{"intent": "opening"}"#);
        assert_eq!(intent, ModeratorIntent::Opening);
    }

    #[test]
    fn test_parse_new_analyst() {
        let intent = ModeratorIntent::from_reply(
            r#"{"intent": "new_analyst_start", "analyst_name": "Jane", "analyst_company": "Acme"}"#,
        );
        assert_eq!(
            intent,
            ModeratorIntent::NewAnalystStart {
                analyst_name: "Jane".to_string(),
                analyst_company: "Acme".to_string(),
            }
        );
    }

    #[test]
    fn test_intent_casing_is_tolerated() {
        let intent = ModeratorIntent::from_reply(r#"{"intent": "End"}"#);
        assert_eq!(intent, ModeratorIntent::End);
    }

    #[test]
    fn test_new_analyst_without_name_is_unrecognized() {
        let intent = ModeratorIntent::from_reply(r#"{"intent": "new_analyst_start"}"#);
        assert_eq!(intent, ModeratorIntent::Unrecognized);
    }

    #[test]
    fn test_malformed_reply_is_unrecognized() {
        assert_eq!(
            ModeratorIntent::from_reply("not json at all"),
            ModeratorIntent::Unrecognized
        );
        assert_eq!(
            ModeratorIntent::from_reply(r#"{"intent": "hold music"}"#),
            ModeratorIntent::Unrecognized
        );
    }
}
