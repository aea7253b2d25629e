use tracing::debug;

use crate::models::{DialogueStore, LeftoverAnchor};

/// Route text that appears at the start of a page before any recognized
/// speaker label. It belongs to the previous page's final open turn.
///
/// Moderator turns are never continued across pages: once a moderator turn
/// ends, its classification already consumed the content. Anything else is
/// merged into the last record of the open analyst's exchange, or of the
/// commentary bucket when no analyst context is active. A missing anchor
/// drops the text.
pub fn resolve_leading(
    store: &mut DialogueStore,
    leading: &str,
    last_speaker: Option<&str>,
    current_analyst: Option<&str>,
    moderator_label: &str,
) {
    let Some(last) = last_speaker else {
        debug!("leading text with no prior speaker, dropping");
        return;
    };
    if last == moderator_label {
        debug!("leading text follows a moderator turn, dropping");
        return;
    }

    debug!(speaker = last, "appending leading text to open turn");
    let anchor = match current_analyst {
        Some(analyst) => LeftoverAnchor::Analyst(analyst),
        None => LeftoverAnchor::Commentary,
    };
    store.append_leftover(anchor, leading);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderator_leftover_is_dropped() {
        let mut store = DialogueStore::new();
        store.append_commentary("Raj", "earlier remarks");
        resolve_leading(&mut store, "stray text", Some("Moderator"), None, "Moderator");

        assert_eq!(
            store.commentary_and_future_outlook[0].dialogue,
            "earlier remarks"
        );
    }

    #[test]
    fn test_leftover_without_prior_speaker_is_dropped() {
        let mut store = DialogueStore::new();
        resolve_leading(&mut store, "first page header", None, None, "Moderator");

        assert!(store.is_empty());
    }

    #[test]
    fn test_leftover_goes_to_open_analyst() {
        let mut store = DialogueStore::new();
        store.append_commentary("Raj", "opening remarks");
        store.start_analyst("Jane", "Acme");
        store.append_to_analyst("Jane", "Jane", "could you talk about");
        resolve_leading(&mut store, "capacity expansion?", Some("Jane"), Some("Jane"), "Moderator");

        assert_eq!(
            store.analyst_discussion["Jane"].dialogue[0].dialogue,
            "could you talk about capacity expansion?"
        );
        assert_eq!(
            store.commentary_and_future_outlook[0].dialogue,
            "opening remarks"
        );
    }

    #[test]
    fn test_leftover_goes_to_commentary_without_analyst() {
        let mut store = DialogueStore::new();
        store.append_commentary("Raj", "we expect demand to");
        resolve_leading(&mut store, "recover next quarter.", Some("Raj"), None, "Moderator");

        assert_eq!(
            store.commentary_and_future_outlook[0].dialogue,
            "we expect demand to recover next quarter."
        );
    }
}
