//! Book metadata and read-progress snapshots
//!
//! Mirrors the shape of the `mediaById` GraphQL query: identity, page count,
//! file extension, the last persisted progress, and library-level reading
//! defaults. The extension families here are closed sets; anything outside
//! them renders as the unsupported terminal state.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// EPUB-family extensions (flow-based books, positioned by CFI)
static EBOOK_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^epub$").expect("static pattern"));

/// Archive-family extensions (page-image containers)
static ARCHIVE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(cbz|cbr|zip|rar)$").expect("static pattern"));

/// PDF-family extensions (rendered as page images by the server)
static PDF_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^pdf$").expect("static pattern"));

/// Which family a book's file extension belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionFamily {
    Ebook,
    Archive,
    Pdf,
    Unknown,
}

impl ExtensionFamily {
    /// Classify a raw file extension (without the leading dot)
    pub fn of(extension: &str) -> Self {
        if EBOOK_EXTENSION.is_match(extension) {
            ExtensionFamily::Ebook
        } else if ARCHIVE_EXTENSION.is_match(extension) {
            ExtensionFamily::Archive
        } else if PDF_EXTENSION.is_match(extension) {
            ExtensionFamily::Pdf
        } else {
            ExtensionFamily::Unknown
        }
    }
}

/// Last persisted reading position for a book, as returned by the server.
///
/// Page-based and CFI-based fields coexist on the wire; which one is
/// meaningful depends on the reader variant selected for the book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub page: Option<i32>,
    pub epubcfi: Option<String>,
    pub percentage_completed: Option<f64>,
    pub elapsed_seconds: Option<u64>,
}

/// Library-level reading defaults surfaced by the book query.
///
/// The engine carries these through to callers; it does not interpret them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDefaults {
    pub default_reading_image_scale_fit: Option<String>,
    pub default_reading_mode: Option<String>,
    pub default_reading_dir: Option<String>,
}

/// Book metadata needed to mount a reading session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub pages: i32,
    pub extension: String,
    pub read_progress: Option<ProgressSnapshot>,
    pub library_config: Option<LibraryDefaults>,
}

impl Book {
    pub fn extension_family(&self) -> ExtensionFamily {
        ExtensionFamily::of(&self.extension)
    }

    /// Elapsed seconds from the persisted snapshot, if any
    pub fn persisted_elapsed_seconds(&self) -> Option<u64> {
        self.read_progress.as_ref().and_then(|p| p.elapsed_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_families() {
        assert_eq!(ExtensionFamily::of("epub"), ExtensionFamily::Ebook);
        assert_eq!(ExtensionFamily::of("EPUB"), ExtensionFamily::Ebook);
        assert_eq!(ExtensionFamily::of("cbz"), ExtensionFamily::Archive);
        assert_eq!(ExtensionFamily::of("cbr"), ExtensionFamily::Archive);
        assert_eq!(ExtensionFamily::of("zip"), ExtensionFamily::Archive);
        assert_eq!(ExtensionFamily::of("rar"), ExtensionFamily::Archive);
        assert_eq!(ExtensionFamily::of("pdf"), ExtensionFamily::Pdf);
        assert_eq!(ExtensionFamily::of("PDF"), ExtensionFamily::Pdf);
        assert_eq!(ExtensionFamily::of("xyz"), ExtensionFamily::Unknown);
        assert_eq!(ExtensionFamily::of(""), ExtensionFamily::Unknown);
    }

    #[test]
    fn test_family_requires_full_match() {
        // "epubx" or "cbz.bak" must not sneak into a family
        assert_eq!(ExtensionFamily::of("epubx"), ExtensionFamily::Unknown);
        assert_eq!(ExtensionFamily::of("cbz.bak"), ExtensionFamily::Unknown);
    }

    #[test]
    fn test_snapshot_deserializes_from_graphql_shape() {
        let json = serde_json::json!({
            "page": 5,
            "epubcfi": null,
            "percentageCompleted": null,
            "elapsedSeconds": 120
        });
        let snapshot: ProgressSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.page, Some(5));
        assert_eq!(snapshot.elapsed_seconds, Some(120));
        assert!(snapshot.epubcfi.is_none());
    }

    #[test]
    fn test_persisted_elapsed_seconds() {
        let book = Book {
            id: "1".into(),
            name: "Test".into(),
            pages: 10,
            extension: "cbz".into(),
            read_progress: Some(ProgressSnapshot {
                elapsed_seconds: Some(42),
                ..Default::default()
            }),
            library_config: None,
        };
        assert_eq!(book.persisted_elapsed_seconds(), Some(42));
    }
}
