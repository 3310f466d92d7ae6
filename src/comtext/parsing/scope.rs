//! Scope reading
//!
//! Scopes are never balanced by counting braces. A verbatim scope ends at the
//! first `}` after its opening brace; a parsed scope ends at the first `}` the
//! block loop meets outside of an invocation. Inside a parsed scope any nested
//! `{` must be consumed by an invocation, since a bare `{` is itself an error.
//! A literal brace in content has to be written as `\{` or `\}`.

use super::{Interpreter, ParseState};
use crate::comtext::error::{ErrorCause, ParseResult};
use crate::comtext::keywords;

impl<'d> ParseState<'d> {
    fn expect_scope_begin(&mut self) -> ParseResult<()> {
        if !self.rest().starts_with(keywords::SCOPE_BEGIN) {
            return Err(self.error(ErrorCause::ExpectedBeginMarker(
                keywords::SCOPE_BEGIN.to_string(),
            )));
        }
        self.advance(keywords::SCOPE_BEGIN);
        Ok(())
    }

    /// Text up to the next `marker`, consuming both.
    ///
    /// When `marker` never occurs the cursor moves to the end of the document
    /// and the error names `display` (or the marker itself).
    pub fn match_to_next_occurrence(
        &mut self,
        marker: &str,
        display: Option<&str>,
    ) -> ParseResult<&'d str> {
        let rest = self.rest();
        match rest.find(marker) {
            Some(idx) => {
                let content = &rest[..idx];
                self.advance(content);
                self.advance(marker);
                Ok(content)
            }
            None => {
                self.cursor.shift_to_end(self.document);
                let shown = display.unwrap_or(marker);
                Err(self.error(ErrorCause::ExpectedEndMarker(shown.to_string())))
            }
        }
    }

    /// Raw contents of an immediate `{...}`
    pub fn match_verbatim_scope(&mut self) -> ParseResult<&'d str> {
        self.expect_scope_begin()?;
        self.match_to_next_occurrence(keywords::SCOPE_END, None)
    }

    /// Consume an immediate `{}`; false (nothing consumed) if absent
    pub fn match_empty_scope(&mut self) -> bool {
        let empty = format!("{}{}", keywords::SCOPE_BEGIN, keywords::SCOPE_END);
        if self.rest().starts_with(&empty) {
            self.advance(&empty);
            true
        } else {
            false
        }
    }

    /// The cursor must sit on a line break, which is left unconsumed
    pub fn expect_line_break(&self, cause: ErrorCause) -> ParseResult<()> {
        if self.rest().starts_with('\n') {
            Ok(())
        } else {
            Err(self.error(cause))
        }
    }
}

impl<'a> Interpreter<'a> {
    /// Expanded contents of an immediate `{...}`
    pub fn match_parsable_scope(&mut self, state: &mut ParseState) -> ParseResult<String> {
        state.expect_scope_begin()?;
        self.descend(state)?;
        let contents = self.parse_block(state, Some(keywords::SCOPE_END))?;
        state.depth -= 1;
        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use crate::comtext::config::CompileOptions;
    use crate::comtext::error::ErrorCause;
    use crate::comtext::evaluator::RawEvaluator;
    use crate::comtext::macros::MacroRegistry;
    use crate::comtext::parsing::{Interpreter, ParseState};
    use crate::comtext::target::Target;

    #[test]
    fn verbatim_scope_stops_at_first_closing_brace() {
        let mut state = ParseState::with_document("t", "", "{a{b}c}", Target::Normalize);
        assert_eq!(state.match_verbatim_scope().unwrap(), "a{b");
        assert_eq!(state.rest(), "c}");
    }

    #[test]
    fn verbatim_scope_requires_immediate_brace() {
        let mut state = ParseState::with_document("t", "", " {a}", Target::Normalize);
        let err = state.match_verbatim_scope().unwrap_err();
        assert_eq!(err.cause, ErrorCause::ExpectedBeginMarker("{".into()));
        assert_eq!(state.cursor.pos, 0);
    }

    #[test]
    fn missing_marker_reports_document_end() {
        let mut state = ParseState::with_document("t", "", "{abc\ndef", Target::Normalize);
        let err = state.match_verbatim_scope().unwrap_err();
        assert_eq!(err.cause, ErrorCause::ExpectedEndMarker("}".into()));
        assert_eq!((err.row, err.col), (1, 3));
    }

    #[test]
    fn display_marker_overrides_searched_marker() {
        let mut state = ParseState::with_document("t", "", "body", Target::Normalize);
        let err = state
            .match_to_next_occurrence("\n\\end{x}", Some("\\end{x}"))
            .unwrap_err();
        assert_eq!(err.cause, ErrorCause::ExpectedEndMarker("\\end{x}".into()));
    }

    #[test]
    fn empty_scope_is_optional() {
        let mut state = ParseState::with_document("t", "", "{}x", Target::Normalize);
        assert!(state.match_empty_scope());
        assert!(!state.match_empty_scope());
        assert_eq!(state.rest(), "x");
    }

    #[test]
    fn parsable_scope_expands_contents() {
        let options = CompileOptions::default();
        let evaluator = RawEvaluator;
        let mut interp = Interpreter::new(MacroRegistry::with_builtins(), &options, &evaluator);
        let mut state = ParseState::with_document("t", "", "{a \\{ b} rest", Target::Web);
        let contents = interp.match_parsable_scope(&mut state).unwrap();
        assert_eq!(contents, "\n<p>a { b");
        assert_eq!(state.rest(), " rest");
        assert_eq!(state.depth, 0);
    }

    #[test]
    fn parsable_scope_without_end() {
        let options = CompileOptions::default();
        let evaluator = RawEvaluator;
        let mut interp = Interpreter::new(MacroRegistry::with_builtins(), &options, &evaluator);
        let mut state = ParseState::with_document("t", "", "{open", Target::Normalize);
        let err = interp.match_parsable_scope(&mut state).unwrap_err();
        assert_eq!(err.cause, ErrorCause::ExpectedEndMarker("}".into()));
    }
}
