//! Document loading utilities
//!
//! `DocumentLoader` reads source text from a file or a string and runs the
//! compiler on it. The CLI and the integration tests both go through it.
//!
//! # Example
//!
//! ```rust,ignore
//! use comtext::comtext::loader::DocumentLoader;
//! use comtext::comtext::pipeline::Compiler;
//! use comtext::comtext::target::Target;
//!
//! let compiler = Compiler::new(Default::default());
//! let output = DocumentLoader::from_path("notes.ctx")?
//!     .compile(&compiler, Target::Web)?;
//! ```

use crate::comtext::error::ParserError;
use crate::comtext::pipeline::{CompileOutput, Compiler};
use crate::comtext::source::Source;
use crate::comtext::target::Target;
use std::fs;
use std::path::Path;

/// Error that can occur when loading and compiling documents
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderError {
    /// IO error when reading file
    IoError(String),
    /// Compilation error
    ParseError(ParserError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::ParseError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<ParserError> for LoaderError {
    fn from(err: ParserError) -> Self {
        LoaderError::ParseError(err)
    }
}

/// A source document ready to be compiled
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    source: Source,
}

impl DocumentLoader {
    /// Load from a file path; libraries resolve relative to its directory
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Ok(DocumentLoader {
            source: Source::for_file(path, text),
        })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(text: S) -> Self {
        DocumentLoader {
            source: Source::from_string(text),
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Compile the loaded document for `target`
    pub fn compile(&self, compiler: &Compiler, target: Target) -> Result<CompileOutput, LoaderError> {
        Ok(compiler.compile(&self.source, target)?)
    }
}
