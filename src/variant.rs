//! Reader variant selection
//!
//! A book resolves to exactly one rendering strategy at mount time, based on
//! its file extension and persisted progress. The choice is never
//! re-evaluated mid-session, even if the book's data is refetched.

use crate::book::{Book, ExtensionFamily};

/// The rendering strategy for a mounted reading session.
///
/// Closed set: EPUB (CFI-positioned), image-based pagination, or the
/// unsupported terminal state. Unsupported sessions construct no reader and
/// report no progress.
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderVariant {
    /// Flow-based EPUB reader. `initial_cfi` of None means start of book.
    Epub { initial_cfi: Option<String> },
    /// Paginated image reader (archives and PDFs). Seeded at the persisted
    /// page, or page 1 for a fresh book.
    ImageBased { initial_page: i32 },
    /// No reader for this format
    Unsupported,
}

impl ReaderVariant {
    /// Resolve the variant for a book. Pure function of
    /// (extension, progress snapshot); evaluated once per mount.
    pub fn select(book: &Book) -> Self {
        match book.extension_family() {
            ExtensionFamily::Ebook => ReaderVariant::Epub {
                initial_cfi: book
                    .read_progress
                    .as_ref()
                    .and_then(|p| p.epubcfi.clone())
                    .filter(|cfi| !cfi.is_empty()),
            },
            ExtensionFamily::Archive | ExtensionFamily::Pdf => ReaderVariant::ImageBased {
                initial_page: book
                    .read_progress
                    .as_ref()
                    .and_then(|p| p.page)
                    .filter(|page| *page >= 1)
                    .unwrap_or(1),
            },
            ExtensionFamily::Unknown => ReaderVariant::Unsupported,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ReaderVariant::Unsupported)
    }
}
