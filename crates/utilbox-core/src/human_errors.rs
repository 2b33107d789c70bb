// SPDX-License-Identifier: MIT
//
// Human-readable error messages for the tool pages.
//
// Every engine error is mapped to plain English with a clear suggestion, so
// a visitor who just dropped a file onto a tool page sees something they can
// act on rather than a decoder backtrace.

use crate::error::UtilboxError;

/// Severity of an error from the visitor's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// May resolve on its own — worth trying again.
    Transient,
    /// The visitor must change something (pick another file, shrink it).
    ActionRequired,
    /// Cannot be fixed by retrying or swapping files.
    Permanent,
}

/// A display-ready error with a plain English message and a suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the visitor should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same input could succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour on the page).
    pub severity: Severity,
}

/// Convert a `UtilboxError` into something a tool page can show directly.
pub fn humanize_error(err: &UtilboxError) -> HumanError {
    match err {
        UtilboxError::InvalidImageInput(_) => HumanError {
            message: "This image couldn't be read.".into(),
            suggestion: "The file may be damaged or not actually an image. Try re-saving it as a JPEG or PNG and uploading again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UtilboxError::ImageError(_) => HumanError {
            message: "Something went wrong while processing this image.".into(),
            suggestion: "Try a different image, or convert it to JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        UtilboxError::PdfError(detail) => {
            if detail.contains("out of range") || detail.contains("not found") {
                HumanError {
                    message: "That page number doesn't exist in this PDF.".into(),
                    suggestion: "Check how many pages the document has and pick a page within that range.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There's a problem with this PDF file.".into(),
                    suggestion: "The file may be damaged or password-protected. Try opening it on your computer first to check it works.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            }
        }

        UtilboxError::QrError(_) => HumanError {
            message: "This text couldn't be turned into a QR code.".into(),
            suggestion: "QR codes hold a limited amount of data. Try shortening the text or linking to a page instead.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UtilboxError::UnsupportedConversion { from, to } => HumanError {
            message: format!("Converting {from} to {to} isn't supported."),
            suggestion: "Check the list of supported conversions on the tool page and pick a different output format.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        UtilboxError::InputTooLarge { limit, .. } => HumanError {
            message: "This file is too large.".into(),
            suggestion: format!(
                "The maximum upload size is {} MB. Try compressing the file first or splitting it into smaller parts.",
                limit / (1024 * 1024)
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UtilboxError::ImageTooLarge { .. } => HumanError {
            message: "This image has too many pixels to process.".into(),
            suggestion: "Resize the image to a smaller resolution and try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        UtilboxError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        UtilboxError::Serialization(_) => HumanError {
            message: "The tool had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecodable_image_is_action_required() {
        let err = UtilboxError::InvalidImageInput("failed to decode image".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn page_out_of_range_is_actionable() {
        let err = UtilboxError::PdfError("page 9 out of range (document has 3 pages)".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn damaged_pdf_is_permanent() {
        let err = UtilboxError::PdfError("failed to load PDF from memory: bad xref".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn oversized_upload_names_the_limit() {
        let err = UtilboxError::InputTooLarge {
            size: 60 * 1024 * 1024,
            limit: 25 * 1024 * 1024,
        };
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("25 MB"));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn io_error_is_transient() {
        let err = UtilboxError::Io(std::io::Error::other("disk hiccup"));
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }
}
