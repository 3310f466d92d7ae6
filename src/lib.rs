//! # comtext
//!
//! A compiler for a LaTeX-like markup language with user-defined macros.
//!
//! Documents are compiled in two passes. The normalize pass expands every
//! macro meant for the intermediate `ctx` form, reads definitions and loads
//! libraries; the render pass turns the normalized text into `doc` or `web`
//! output and runs the macros reserved for that target. Plain text is grouped
//! into paragraphs in both passes.
//!
//! ```rust,ignore
//! use comtext::{Compiler, CompileOptions, Source, Target};
//!
//! let source = Source::from_string("\\newcommand{hi: raw(who)}{Hello, #who!}\n\\hi{world}");
//! let output = Compiler::new(CompileOptions::default()).compile(&source, Target::Web)?;
//! assert_eq!(output.document, "\n<p>Hello, world!</p>\n");
//! ```

pub mod comtext;

pub use comtext::config::CompileOptions;
pub use comtext::error::{ErrorCause, ParseResult, ParserError};
pub use comtext::evaluator::{Evaluator, Language, MacroBody, RawEvaluator, StandardEvaluator};
pub use comtext::pipeline::{CompileOutput, Compiler};
pub use comtext::source::Source;
pub use comtext::target::Target;
