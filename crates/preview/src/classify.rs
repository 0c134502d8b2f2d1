//! Viewer-type classification.
//!
//! Maps a document's declared content type onto one of a closed set of
//! presentation strategies: inline PDF embed, inline image element, or
//! direct download. The mapping is total; anything unrecognized falls
//! back to download.

use bienestar_core::DocumentRecord;

/// Image subtype tokens recognized beyond the `image/` prefix.
const IMAGE_TOKENS: &[&str] = &[
    "jpeg",
    "jpg",
    "png",
    "gif",
    "bmp",
    "webp",
    "svg",
    "tiff",
    "tif",
    "ico",
];

/// Presentation strategy for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKind {
    /// Inline PDF embed.
    Pdf,
    /// Inline image element.
    Image,
    /// No inline preview; hand off to the download collaborator.
    Download,
}

/// Classify a MIME type string. Case-insensitive substring match, with
/// PDF taking precedence over image tokens.
pub fn classify(content_type: &str) -> ViewerKind {
    let ct = content_type.to_ascii_lowercase();

    if ct.contains("pdf") {
        return ViewerKind::Pdf;
    }
    if ct.contains("image/") || IMAGE_TOKENS.iter().any(|token| ct.contains(token)) {
        return ViewerKind::Image;
    }
    ViewerKind::Download
}

/// Whether the document is eligible for inline rendering at all.
pub fn can_preview(doc: &DocumentRecord) -> bool {
    classify(&doc.content_type) != ViewerKind::Download
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content_type: &str) -> DocumentRecord {
        DocumentRecord {
            id: 1,
            title: "Doc".to_string(),
            storage_path: "files/doc".to_string(),
            content_type: content_type.to_string(),
            size_bytes: None,
            category_id: None,
            tag_ids: vec![],
            group: None,
            created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
            updated_at: None,
        }
    }

    #[test]
    fn test_pdf_classification() {
        assert_eq!(classify("application/pdf"), ViewerKind::Pdf);
        assert_eq!(classify("application/x-pdf"), ViewerKind::Pdf);
        assert_eq!(classify("APPLICATION/PDF"), ViewerKind::Pdf);
    }

    #[test]
    fn test_image_classification() {
        assert_eq!(classify("image/png"), ViewerKind::Image);
        assert_eq!(classify("image/svg+xml"), ViewerKind::Image);
        assert_eq!(classify("IMAGE/JPEG"), ViewerKind::Image);
        // bare subtype tokens without the image/ prefix
        assert_eq!(classify("jpeg"), ViewerKind::Image);
        assert_eq!(classify("x-webp"), ViewerKind::Image);
    }

    #[test]
    fn test_everything_else_downloads() {
        assert_eq!(classify("application/vnd.openxmlformats-officedocument.wordprocessingml.document"), ViewerKind::Download);
        assert_eq!(classify("text/plain"), ViewerKind::Download);
        assert_eq!(classify("application/zip"), ViewerKind::Download);
        assert_eq!(classify(""), ViewerKind::Download);
    }

    #[test]
    fn test_classifier_is_total() {
        // every input lands in exactly one bucket; spot-check a spread
        // of odd inputs rather than a grid
        for ct in ["", "garbage", "application/octet-stream", "image/", "pdf", "video/mp4", "🙂"] {
            let kind = classify(ct);
            assert!(matches!(kind, ViewerKind::Pdf | ViewerKind::Image | ViewerKind::Download));
        }
    }

    #[test]
    fn test_can_preview_iff_not_download() {
        assert!(can_preview(&record("application/pdf")));
        assert!(can_preview(&record("image/png")));
        assert!(!can_preview(&record("text/csv")));
        assert!(!can_preview(&record("application/zip")));
    }
}
