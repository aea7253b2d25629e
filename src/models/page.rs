use std::collections::BTreeMap;

/// Ordered mapping from page index to extracted page text.
///
/// Index order is the only meaningful order. Gaps are legal: callers may
/// have discarded earlier pages as irrelevant (roster pages, cover
/// letters) before handing the map to the engine.
pub type PageMap = BTreeMap<u32, String>;
