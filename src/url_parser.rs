//! Accepts either a raw Drive file ID or a sharing link and yields the ID.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DriveError, Result};

/// Sharing-link shapes produced by Drive and the Docs editors. Group 1 is the ID.
static LINK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://drive\.google\.com/file/(?:u/\d+/)?d/([a-zA-Z0-9_-]+)",
        r"^https?://drive\.google\.com/drive/(?:u/\d+/)?folders/([a-zA-Z0-9_-]+)",
        r"^https?://drive\.google\.com/(?:open|uc)\?(?:.*&)?id=([a-zA-Z0-9_-]+)",
        r"^https?://docs\.google\.com/(?:document|spreadsheets|presentation)/(?:u/\d+/)?d/([a-zA-Z0-9_-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid sharing link regex"))
    .collect()
});

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("invalid ID regex"));

/// Extract a file ID from a sharing link, or validate a raw ID.
///
/// ```
/// use drive_download::url_parser::extract_id;
///
/// let id = extract_id("https://docs.google.com/document/d/1AbCxyz/edit").unwrap();
/// assert_eq!(id, "1AbCxyz");
///
/// assert_eq!(extract_id("1AbCxyz").unwrap(), "1AbCxyz");
/// ```
pub fn extract_id(url_or_id: &str) -> Result<String> {
    let from_link = LINK_PATTERNS
        .iter()
        .find_map(|re| re.captures(url_or_id).and_then(|c| c.get(1)));
    if let Some(id) = from_link {
        return Ok(id.as_str().to_string());
    }

    if ID_REGEX.is_match(url_or_id) {
        return Ok(url_or_id.to_string());
    }

    Err(DriveError::InvalidUrlOrId(url_or_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_editor_links() {
        for url in [
            "https://docs.google.com/document/d/1AbC-xyz_9/edit",
            "https://docs.google.com/spreadsheets/d/1AbC-xyz_9/edit#gid=0",
            "https://docs.google.com/presentation/u/1/d/1AbC-xyz_9/view",
        ] {
            assert_eq!(extract_id(url).unwrap(), "1AbC-xyz_9", "{url}");
        }
    }

    #[test]
    fn test_uc_link_with_extra_params() {
        let url = "https://drive.google.com/uc?export=download&id=1AbCxyz";
        assert_eq!(extract_id(url).unwrap(), "1AbCxyz");
    }

    #[test]
    fn test_invalid_input() {
        assert!(extract_id("").is_err());
        assert!(extract_id("   ").is_err());
        assert!(extract_id("https://example.com/file/d/123").is_err());
        assert!(extract_id("has spaces in it").is_err());
    }

    #[test]
    fn test_raw_id_is_not_trimmed() {
        assert!(extract_id(" 1AbCxyz").is_err());
        assert!(extract_id("1AbCxyz\n").is_err());
    }
}
