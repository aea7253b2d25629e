use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::PageMap;

/// Load a page-map JSON file: an object mapping page index to extracted
/// page text, as produced by the document-to-text collaborator.
pub fn load_pages_file(path: &Path) -> Result<PageMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    load_pages_json(&content)
}

/// Parse a page-map JSON string. Pages with empty text are kept (the
/// engine skips them); indices must be positive integers.
pub fn load_pages_json(json: &str) -> Result<PageMap> {
    let raw: BTreeMap<String, String> =
        serde_json::from_str(json).context("Failed to parse page-map JSON")?;

    let mut pages = PageMap::new();
    for (key, text) in raw {
        let index: u32 = key
            .parse()
            .with_context(|| format!("page index {:?} is not an integer", key))?;
        if index == 0 {
            anyhow::bail!("page indices start at 1, got 0");
        }
        pages.insert(index, text);
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_pages_json() {
        let json = r#"{"2": "second page", "1": "first page"}"#;
        let pages = load_pages_json(json).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[&1], "first page");
        assert_eq!(pages[&2], "second page");
        assert_eq!(pages.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_gaps_in_page_indices_are_legal() {
        let json = r#"{"1": "cover", "4": "speech"}"#;
        let pages = load_pages_json(json).unwrap();
        assert_eq!(pages.keys().copied().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_zero_page_index_is_rejected() {
        assert!(load_pages_json(r#"{"0": "text"}"#).is_err());
    }

    #[test]
    fn test_non_integer_index_is_rejected() {
        assert!(load_pages_json(r#"{"cover": "text"}"#).is_err());
    }

    #[test]
    fn test_load_pages_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"1": "Moderator: Welcome."}"#).unwrap();

        let pages = load_pages_file(&path).unwrap();
        assert_eq!(pages[&1], "Moderator: Welcome.");
    }
}
