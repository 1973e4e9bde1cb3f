//! Utility functions for byline cleanup, log formatting, and file system checks.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Strip the leading `"By "` from a byline.
///
/// The input is trimmed first. When it starts with `"By"` everything from the
/// fourth character on is returned, which assumes exactly one delimiter after
/// `"By"`: `"By  Jane"` keeps a leading space and `"Byline: Jane"` loses
/// `"Byl"`. Bylines without the prefix come back trimmed but otherwise
/// unchanged.
pub fn normalize_byline(author_text: &str) -> String {
    let authors = author_text.trim();
    if authors.starts_with("By") {
        authors.chars().skip(3).collect()
    } else {
        authors.to_string()
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Make sure the directory holding `path` exists.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).await?;
            info!(dir = %dir.display(), "Output directory ready");
        }
        _ => debug!("Output file has no parent directory to create"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_byline_strips_prefix() {
        assert_eq!(normalize_byline("By Jane Doe"), "Jane Doe");
        assert_eq!(normalize_byline("  By Jane Doe, MD\n"), "Jane Doe, MD");
    }

    #[test]
    fn test_normalize_byline_is_fixed_offset() {
        assert_eq!(normalize_byline("By  Jane"), " Jane");
        assert_eq!(normalize_byline("Byline: Jane"), "ine: Jane");
        assert_eq!(normalize_byline("By"), "");
    }

    #[test]
    fn test_normalize_byline_without_prefix() {
        assert_eq!(normalize_byline("NONE"), "NONE");
        assert_eq!(normalize_byline("  Reviewed by WebMD  "), "Reviewed by WebMD");
        assert_eq!(normalize_byline("by jane"), "by jane");
    }

    #[test]
    fn test_normalize_byline_multibyte() {
        assert_eq!(normalize_byline("By Zoë Ångström"), "Zoë Ångström");
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 100), "short");
        let long = "a".repeat(500);
        let result = truncate_for_log(&long, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_char_boundary() {
        assert_eq!(truncate_for_log("ééé", 1), "é…(+4 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b/out.csv");
        ensure_parent_dir(&out).await.unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_bare_filename() {
        ensure_parent_dir(Path::new("out.csv")).await.unwrap();
    }
}
