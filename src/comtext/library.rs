//! Library resolution and inclusion
//!
//! `\usepackage{name}` looks for `name` in every include directory, trying
//! each configured extension in order. A relative include directory is first
//! resolved against the directory of the including document and then against
//! the working directory. The library is parsed in the current pass only for
//! its definitions; whatever text it produces is dropped.

use crate::comtext::config::CompileOptions;
use crate::comtext::error::{ErrorCause, ParseResult};
use crate::comtext::frontmatter;
use crate::comtext::parsing::{Interpreter, ParseState};
use crate::comtext::source::{self, Source};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names to try for `name`, most specific first
fn candidate_names(name: &str, extensions: &[String]) -> Vec<String> {
    let mut names = Vec::with_capacity(extensions.len() + 1);
    let has_known_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known == ext));
    if has_known_extension {
        names.push(name.to_string());
    }
    names.extend(extensions.iter().map(|ext| format!("{}.{}", name, ext)));
    names
}

/// Directories searched for a document living in `base`
fn search_dirs(base: &Path, options: &CompileOptions) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for dir in &options.include_path {
        if dir.is_absolute() {
            dirs.push(dir.clone());
        } else {
            dirs.push(base.join(dir));
            dirs.push(dir.clone());
        }
    }
    dirs
}

/// Locate library `name` for a document living in `base`
pub fn resolve(name: &str, base: &Path, options: &CompileOptions) -> Option<PathBuf> {
    let names = candidate_names(name, &options.extensions);
    search_dirs(base, options)
        .into_iter()
        .flat_map(|dir| names.iter().map(move |file| dir.join(file)))
        .find(|candidate| candidate.is_file())
}

/// Resolve, read and parse library `name` on behalf of the document in `state`
pub fn include(interp: &mut Interpreter, state: &mut ParseState, name: &str) -> ParseResult<()> {
    let resolved = resolve(name, source::base_dir(state.path), interp.options)
        .ok_or_else(|| state.error(ErrorCause::FileNotFound(name.to_string())))?;

    let key = fs::canonicalize(&resolved).unwrap_or_else(|_| resolved.clone());
    if !interp.mark_loaded(key) {
        debug!(library = name, "already loaded");
        return Ok(());
    }

    debug!(library = name, path = %resolved.display(), "loading library");
    let text = fs::read_to_string(&resolved)
        .map_err(|err| state.error(ErrorCause::Io(format!("{}: {}", resolved.display(), err))))?;
    let source = Source::for_file(&resolved, text);
    let (_, body) = frontmatter::extract_header(&source)?;

    let mut sub = ParseState::with_document(&source.filename, &source.path, &body, state.target);
    sub.depth = state.depth;
    interp.parse_document(&mut sub)?;
    Ok(())
}
