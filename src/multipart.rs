//! In-memory file uploads.
//!
//! Files never touch the disk: each [`VirtualFile`] is a name plus bytes,
//! turned into one `multipart/form-data` part. Field names follow the
//! position of the file in the upload (`file1`, `file2`, ...). The encoding
//! itself is left to reqwest.

use reqwest::blocking::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type used for every uploaded part.
pub const PART_MIME_TYPE: &str = "application/octet-stream";

/// A file held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualFile {
    /// File name sent in the part's `Content-Disposition`, kept verbatim.
    pub file_name: String,

    /// Raw file content.
    pub content: Vec<u8>,
}

impl VirtualFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Reads a file from disk, keeping only its final path component as name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, content })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Form field name for the file at `index` (1-based).
pub fn field_name(index: usize) -> String {
    format!("file{}", index)
}

/// Payload of `len` copies of `byte`.
pub fn repeated(byte: u8, len: usize) -> Vec<u8> {
    vec![byte; len]
}

/// Builds a multipart form with one part per file.
///
/// Parts are named by position, so the first file lands in `file1`.
pub fn build_form(files: &[VirtualFile]) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for (idx, file) in files.iter().enumerate() {
        let part = Part::bytes(file.content.clone())
            .file_name(file.file_name.clone())
            .mime_str(PART_MIME_TYPE)?;
        form = form.part(field_name(idx + 1), part);
    }
    Ok(form)
}
