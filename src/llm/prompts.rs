/// System prompt for moderator intent classification.
pub const INTENT_SYSTEM_PROMPT: &str = r#"You classify a statement made by the moderator of an earnings conference call into one of three categories:

- "opening": the call is starting, or the moderator is handing over for opening remarks or future outlook commentary.
- "new_analyst_start": the moderator is introducing an analyst who will ask questions. Extract the analyst's name and the firm they represent.
- "end": the moderator is closing the call.

Respond with JSON only, in exactly this shape:

{"intent": "opening"}

or, when introducing an analyst:

{"intent": "new_analyst_start", "analyst_name": "Jane Doe", "analyst_company": "Acme Capital"}

Use only the three intent values above. Do not add any other fields or text."#;

/// System prompt for speaker-name verification.
pub const SPEAKER_VERIFY_SYSTEM_PROMPT: &str = r#"You are given a JSON array of strings captured from an earnings-call transcript. Each string is either a person's name (a call participant) or some other text that merely resembles a speaker label, such as a heading, an abbreviation, or a sentence fragment.

Return the subset that are genuine person names, in JSON:

{"speakers": ["Jane Doe", "Suresh Manglani"]}

Keep the strings exactly as given, do not invent names, and return {"speakers": []} if none qualify."#;
