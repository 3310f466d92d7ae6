//! The expansion engine
//!
//! A [`ParseState`] walks one document for one pass. The [`Interpreter`] owns
//! what outlives a single document: the macro registry, the set of loaded
//! libraries, the compile options and the evaluator. Handlers receive both, so
//! a macro can read scopes, define macros, include libraries and re-enter the
//! block loop on nested text.
//!
//! The block loop consumes the document one position at a time. At each
//! position it first checks for the end marker of the enclosing scope, then
//! asks the registry for the longest invocation starting there. Literal
//! characters go through the pass's autobreak engine; invocations dispatch to
//! their handler and the returned text is appended as is.

mod scope;

use crate::comtext::autobreak::AutoBreak;
use crate::comtext::config::CompileOptions;
use crate::comtext::cursor::Cursor;
use crate::comtext::error::{ErrorCause, ParseResult, ParserError};
use crate::comtext::evaluator::Evaluator;
use crate::comtext::macros::{Expansion, MacroRegistry};
use crate::comtext::source::Source;
use crate::comtext::target::Target;
use crate::comtext::text;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::trace;

/// Per-pass state over one document
#[derive(Debug, Clone)]
pub struct ParseState<'d> {
    pub file: &'d str,
    pub path: &'d str,
    pub document: &'d str,
    pub cursor: Cursor,
    /// Nesting of handler calls and parsed scopes
    pub depth: usize,
    /// Handlers that fired (passthrough invocations excluded)
    pub executed: usize,
    pub target: Target,
    pub autobreak: AutoBreak,
}

impl<'d> ParseState<'d> {
    pub fn new(source: &'d Source, target: Target) -> Self {
        Self::with_document(&source.filename, &source.path, &source.text, target)
    }

    /// State over `document`, reported under the given file name and path
    pub fn with_document(file: &'d str, path: &'d str, document: &'d str, target: Target) -> Self {
        Self {
            file,
            path,
            document,
            cursor: Cursor::new(),
            depth: 0,
            executed: 0,
            target,
            autobreak: AutoBreak::for_target(target),
        }
    }

    /// Unconsumed text
    pub fn rest(&self) -> &'d str {
        &self.document[self.cursor.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.cursor.pos >= self.document.len()
    }

    pub fn advance(&mut self, text: &str) {
        self.cursor.shift_forward_many(text);
    }

    /// Indentation of the line the cursor is on
    pub fn current_indent(&self) -> usize {
        let line_start = self.document[..self.cursor.pos]
            .rfind('\n')
            .map_or(0, |idx| idx + 1);
        text::indent_of(&self.document[line_start..])
    }

    /// An error located at the cursor
    pub fn error(&self, cause: ErrorCause) -> ParserError {
        ParserError::new(self.file, self.path, self.cursor.row, self.cursor.col, cause)
    }
}

/// Session state shared by every pass of one compilation
pub struct Interpreter<'a> {
    pub registry: MacroRegistry,
    pub options: &'a CompileOptions,
    pub evaluator: &'a dyn Evaluator,
    loaded: HashSet<PathBuf>,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        registry: MacroRegistry,
        options: &'a CompileOptions,
        evaluator: &'a dyn Evaluator,
    ) -> Self {
        Self {
            registry,
            options,
            evaluator,
            loaded: HashSet::new(),
        }
    }

    /// Record a library as loaded; false if it already was
    pub fn mark_loaded(&mut self, path: PathBuf) -> bool {
        self.loaded.insert(path)
    }

    fn descend(&self, state: &mut ParseState) -> ParseResult<()> {
        state.depth += 1;
        if state.depth > self.options.max_depth {
            return Err(state.error(ErrorCause::RecursionLimitExceeded(self.options.max_depth)));
        }
        Ok(())
    }

    /// Expand text until `end_marker` (consumed) or, without one, until EOF
    pub fn parse_block(
        &mut self,
        state: &mut ParseState,
        end_marker: Option<&str>,
    ) -> ParseResult<String> {
        let mut output = String::new();
        while !state.is_eof() {
            let rest = state.rest();
            if let Some(marker) = end_marker {
                if rest.starts_with(marker) {
                    state.advance(marker);
                    return Ok(output);
                }
            }

            let Some((name, id)) = self.registry.lookup(rest) else {
                // the loop condition guarantees a character here
                let ch = rest.chars().next().unwrap_or_default();
                output.push_str(&state.autobreak.process(ch));
                state.cursor.shift_forward(ch);
                continue;
            };

            state.advance(name);
            trace!(invocation = name, row = state.cursor.row, "dispatch");
            let handler = self.registry.handler(id).clone();
            self.descend(state)?;
            let expansion = handler.parse(self, state, name)?;
            state.depth -= 1;
            if let Expansion::Fired(_) = expansion {
                state.executed += 1;
            }
            output.push_str(expansion.text());
        }

        match end_marker {
            Some(marker) => Err(state.error(ErrorCause::ExpectedEndMarker(marker.to_string()))),
            None => Ok(output),
        }
    }

    /// Expand a whole document, closing any paragraph left open
    pub fn parse_document(&mut self, state: &mut ParseState) -> ParseResult<String> {
        let mut output = self.parse_block(state, None)?;
        output.push_str(&state.autobreak.close());
        Ok(output)
    }

    /// Re-expand macro output until a round fires no further macro.
    ///
    /// Rounds run with autobreak disabled and inherit the caller's depth, so a
    /// macro that keeps reproducing itself runs into the depth ceiling.
    pub fn expand_to_fixpoint(
        &mut self,
        parent: &mut ParseState,
        mut text: String,
    ) -> ParseResult<String> {
        let mut round = 0usize;
        loop {
            round += 1;
            let mut sub = ParseState::with_document(parent.file, parent.path, &text, parent.target);
            sub.autobreak = AutoBreak::disabled(parent.target);
            sub.depth = parent.depth;
            let output = self
                .parse_document(&mut sub)
                .map_err(|err| relocate(err, parent))?;
            let executed = sub.executed;
            parent.executed += executed;
            trace!(round, executed, "fixpoint round");
            if executed == 0 {
                return Ok(output);
            }
            text = output;
        }
    }
}

/// Report errors raised inside generated text at the invocation that generated it
fn relocate(err: ParserError, parent: &ParseState) -> ParserError {
    if err.file == parent.file && err.path == parent.path {
        parent.error(err.cause)
    } else {
        err
    }
}
