//! Two-pass compilation
//!
//! The normalize pass expands every `ctx->ctx` macro and leaves render macros
//! in place. For doc or web output a render pass then re-parses the
//! normalized text with the registry built by the first pass, so definitions
//! and libraries are read exactly once.

use crate::comtext::config::CompileOptions;
use crate::comtext::error::ParseResult;
use crate::comtext::evaluator::{Evaluator, StandardEvaluator};
use crate::comtext::frontmatter::{self, Headers};
use crate::comtext::library;
use crate::comtext::macros::MacroRegistry;
use crate::comtext::parsing::{Interpreter, ParseState};
use crate::comtext::source::Source;
use crate::comtext::target::Target;
use serde::Serialize;
use tracing::{debug, info};

/// A compiled document and its front matter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileOutput {
    pub document: String,
    pub headers: Headers,
}

pub struct Compiler {
    options: CompileOptions,
    evaluator: Box<dyn Evaluator>,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self::with_evaluator(options, Box::new(StandardEvaluator::new()))
    }

    pub fn with_evaluator(options: CompileOptions, evaluator: Box<dyn Evaluator>) -> Self {
        Self { options, evaluator }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn compile(&self, source: &Source, target: Target) -> ParseResult<CompileOutput> {
        let (headers, text) = frontmatter::extract_header(source)?;
        let mut interp = Interpreter::new(
            MacroRegistry::with_builtins(),
            &self.options,
            self.evaluator.as_ref(),
        );

        let mut state =
            ParseState::with_document(&source.filename, &source.path, &text, Target::Normalize);
        for name in &self.options.preload {
            debug!(library = %name, "preloading");
            library::include(&mut interp, &mut state, name)?;
        }

        info!(file = %source.filename, "normalize pass");
        let normalized = interp.parse_document(&mut state)?;
        debug!(
            executed = state.executed,
            definitions = interp.registry.len(),
            "normalize pass done"
        );
        if !target.is_render() {
            return Ok(CompileOutput {
                document: normalized,
                headers,
            });
        }

        info!(file = %source.filename, %target, "render pass");
        let mut state = ParseState::with_document(&source.filename, &source.path, &normalized, target);
        let document = interp.parse_document(&mut state)?;
        Ok(CompileOutput { document, headers })
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comtext::error::ErrorCause;

    fn compile(text: &str, target: Target) -> ParseResult<CompileOutput> {
        Compiler::new(CompileOptions::default()).compile(&Source::from_string(text), target)
    }

    #[test]
    fn normalize_only() {
        let out = compile("\\newcommand{greet: raw() ctx->ctx}{Hello}\n\\greet{}", Target::Normalize)
            .unwrap();
        assert_eq!(out.document, "Hello\n\n");
        assert!(out.headers.is_empty());
    }

    #[test]
    fn render_macro_fires_in_its_pass() {
        let text = "\\newcommand{em: raw(x) ctx->web}{<em>#x</em>}\nSome \\em{bold} text.";
        let out = compile(text, Target::Web).unwrap();
        assert_eq!(out.document, "\n<p>Some <em>bold</em> text.</p>\n");
    }

    #[test]
    fn web_macro_stays_inert_in_doc_output() {
        let text = "\\newcommand{em: raw(x) ctx->web}{<em>#x</em>}\nSome \\em{bold}.";
        let out = compile(text, Target::Doc).unwrap();
        assert_eq!(out.document, "\n\\paragraph{}\nSome \\em{bold}.\n");
    }

    #[test]
    fn headers_are_returned() {
        let out = compile("---\ntitle: T\n---\nbody", Target::Normalize).unwrap();
        assert_eq!(out.headers["title"], serde_yaml::Value::from("T"));
        assert_eq!(out.document, "body\n\n");
    }

    #[test]
    fn errors_keep_source_rows_after_front_matter() {
        let err = compile("---\na: 1\n---\n\n}", Target::Normalize).unwrap_err();
        assert_eq!(err.cause, ErrorCause::UnexpectedEndMarker("}".into()));
        assert_eq!(err.row, 4);
    }
}
