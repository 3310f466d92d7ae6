//! Source documents

use std::path::Path;

/// Document text with the name and directory it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub filename: String,
    pub path: String,
    pub text: String,
}

impl Source {
    pub fn new(filename: impl Into<String>, path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            text: text.into(),
        }
    }

    /// A document that did not come from a file
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::new("<string>", "", text)
    }

    /// Split `file` into file name and directory, keeping `text`
    pub fn for_file(file: &Path, text: impl Into<String>) -> Self {
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = file
            .parent()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(filename, path, text)
    }

}

/// Directory relative lookups start from for a document stored under `path`
pub fn base_dir(path: &str) -> &Path {
    if path.is_empty() {
        Path::new(".")
    } else {
        Path::new(path)
    }
}
