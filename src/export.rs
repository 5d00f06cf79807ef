//! Type resolution: which transfer mode a Drive MIME type needs.

use crate::error::{DriveError, Result};

/// Prefix shared by every Google Docs Editors (native) MIME type.
pub const NATIVE_PREFIX: &str = "application/vnd.google-apps.";

/// Native document kinds that can be exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeDocument {
    Document,
    Spreadsheet,
    Presentation,
}

impl NativeDocument {
    /// Look up a native MIME type. `None` means no export mapping exists.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            "application/vnd.google-apps.document" => Some(Self::Document),
            "application/vnd.google-apps.spreadsheet" => Some(Self::Spreadsheet),
            "application/vnd.google-apps.presentation" => Some(Self::Presentation),
            _ => None,
        }
    }

    /// Format the document is converted to server-side.
    pub fn export_mime_type(self) -> &'static str {
        match self {
            Self::Document => "application/pdf",
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Presentation => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

/// How the bytes of a file are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Server-side conversion to the given format.
    Export(NativeDocument),
    /// Raw stored bytes.
    Media,
}

impl TransferMode {
    /// Pick the transfer mode for a resolved MIME type.
    ///
    /// Native types outside the export table, folders included, are
    /// rejected with [`DriveError::UnsupportedType`].
    pub fn for_mime_type(mime_type: &str) -> Result<Self> {
        if !mime_type.starts_with(NATIVE_PREFIX) {
            return Ok(Self::Media);
        }
        NativeDocument::from_mime_type(mime_type)
            .map(Self::Export)
            .ok_or_else(|| DriveError::UnsupportedType(mime_type.to_string()))
    }

    /// Label used in progress lines.
    pub fn progress_label(self) -> &'static str {
        match self {
            Self::Export(_) => "Export and download",
            Self::Media => "Download",
        }
    }
}
