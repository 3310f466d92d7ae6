//! Builtin handlers
//!
//! Builtins are active in every pass. Escaped characters are rendered with the
//! spelling of the active target; when that spelling equals the invocation the
//! handler reports a passthrough so fixpoint rounds over normalized text settle.

use super::definition::read_definition;
use super::{Expansion, MacroKind};
use crate::comtext::error::{ErrorCause, ParseResult};
use crate::comtext::keywords::{self, EscapedChar};
use crate::comtext::library;
use crate::comtext::parsing::{Interpreter, ParseState};
use crate::comtext::target::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// A lone `\` that starts no known invocation
    Escape,
    EscapedChar(&'static EscapedChar),
    Comment,
    ScopeBegin,
    ScopeEnd,
    LoadLibrary,
    DefineMacro,
    DefineEnvironment,
    /// `\begin{name}` for an environment that was never defined
    EnvironmentBegin,
    EnvironmentEnd,
    Paragraph,
    Math,
}

impl Builtin {
    /// Every builtin with the spelling it is registered under
    pub fn all() -> Vec<(String, Builtin)> {
        let mut builtins = vec![(keywords::CH_ESCAPE.to_string(), Builtin::Escape)];
        builtins.extend(
            keywords::ESCAPED_CHARS
                .iter()
                .map(|ch| (ch.ctx.to_string(), Builtin::EscapedChar(ch))),
        );
        builtins.extend(
            [
                (keywords::CH_COMMENT, Builtin::Comment),
                (keywords::SCOPE_BEGIN, Builtin::ScopeBegin),
                (keywords::SCOPE_END, Builtin::ScopeEnd),
                (keywords::KW_LOAD_LIBRARY, Builtin::LoadLibrary),
                (keywords::KW_DEF_MACRO, Builtin::DefineMacro),
                (keywords::KW_DEF_ENVIRONMENT, Builtin::DefineEnvironment),
                (keywords::KW_ENVIRONMENT_BEGIN, Builtin::EnvironmentBegin),
                (keywords::KW_ENVIRONMENT_END, Builtin::EnvironmentEnd),
                (keywords::KW_PARAGRAPH, Builtin::Paragraph),
                (keywords::CH_MATH, Builtin::Math),
            ]
            .into_iter()
            .map(|(spelling, builtin)| (spelling.to_string(), builtin)),
        );
        builtins
    }

    pub fn parse(
        &self,
        interp: &mut Interpreter,
        state: &mut ParseState,
        invocation: &str,
    ) -> ParseResult<Expansion> {
        match *self {
            Builtin::Escape => Err(state.error(ErrorCause::UnknownFunction)),
            Builtin::EscapedChar(ch) => {
                let mut out = inline_prefix(state);
                let rendered = state.target.pick(ch);
                out.push_str(rendered);
                if rendered == invocation {
                    Ok(Expansion::Passthrough(out))
                } else {
                    Ok(Expansion::Fired(out))
                }
            }
            Builtin::Comment => {
                // the line break stays so blank lines after a comment still count
                let rest = state.rest();
                let comment = rest.find('\n').map_or(rest, |idx| &rest[..idx]);
                state.advance(comment);
                Ok(Expansion::Fired(String::new()))
            }
            Builtin::ScopeBegin => Err(state.error(ErrorCause::UnexpectedBeginMarker(
                keywords::SCOPE_BEGIN.to_string(),
            ))),
            Builtin::ScopeEnd => Err(state.error(ErrorCause::UnexpectedEndMarker(
                keywords::SCOPE_END.to_string(),
            ))),
            Builtin::LoadLibrary => {
                let name = state.match_verbatim_scope()?.trim();
                library::include(interp, state, name)?;
                Ok(Expansion::Fired(String::new()))
            }
            Builtin::DefineMacro => {
                read_definition(interp, state, MacroKind::Command)?;
                Ok(Expansion::Fired(String::new()))
            }
            Builtin::DefineEnvironment => {
                read_definition(interp, state, MacroKind::Environment)?;
                Ok(Expansion::Fired(String::new()))
            }
            Builtin::EnvironmentBegin => {
                let name = state.match_verbatim_scope()?;
                Err(state.error(ErrorCause::UnknownEnvironment(name.to_string())))
            }
            Builtin::EnvironmentEnd => Err(state.error(ErrorCause::UnexpectedEndMarker(
                keywords::KW_ENVIRONMENT_END.to_string(),
            ))),
            Builtin::Paragraph => {
                let mut out = state.autobreak.open(true);
                let enabled = state.autobreak.suspend();
                let body = interp.match_parsable_scope(state);
                state.autobreak.restore(enabled);
                out.push_str(&body?);
                Ok(Expansion::Fired(out))
            }
            Builtin::Math => {
                let mut out = inline_prefix(state);
                let formula = state.match_to_next_occurrence(keywords::CH_MATH, None)?;
                if state.target == Target::Web {
                    out.push_str(keywords::MATH_BEGIN_WEB);
                    out.push_str(formula);
                    out.push_str(keywords::MATH_END_WEB);
                    Ok(Expansion::Fired(out))
                } else {
                    out.push_str(keywords::CH_MATH);
                    out.push_str(formula);
                    out.push_str(keywords::CH_MATH);
                    Ok(Expansion::Passthrough(out))
                }
            }
        }
    }
}

/// Settle pending whitespace and make sure a paragraph is open
fn inline_prefix(state: &mut ParseState) -> String {
    let mut out = state.autobreak.flush();
    out.push_str(&state.autobreak.open(false));
    out
}

#[cfg(test)]
mod tests {
    use crate::comtext::config::CompileOptions;
    use crate::comtext::error::{ErrorCause, ParseResult};
    use crate::comtext::evaluator::RawEvaluator;
    use crate::comtext::macros::MacroRegistry;
    use crate::comtext::parsing::{Interpreter, ParseState};
    use crate::comtext::target::Target;

    fn run(document: &str, target: Target) -> ParseResult<String> {
        let options = CompileOptions::default();
        let evaluator = RawEvaluator;
        let mut interp = Interpreter::new(MacroRegistry::with_builtins(), &options, &evaluator);
        let mut state = ParseState::with_document("test.ctx", "", document, target);
        interp.parse_document(&mut state)
    }

    #[test]
    fn typographic_quotes_in_web() {
        assert_eq!(
            run("``hi'' it's", Target::Web).unwrap(),
            "\n<p>\u{201c}hi\u{201d} it\u{2019}s</p>\n"
        );
    }

    #[test]
    fn doc_escapes_specials() {
        assert_eq!(run("a & b_c", Target::Doc).unwrap(), "\n\\paragraph{}\na \\& b\\_c\n");
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(run("a % hidden\nb", Target::Normalize).unwrap(), "a b\n\n");
        assert_eq!(
            run("a % hidden\n\nb", Target::Web).unwrap(),
            "\n<p>a</p>\n\n<p>b</p>\n"
        );
    }

    #[test]
    fn math_is_kept_verbatim() {
        assert_eq!(run("see $a_1 < b$", Target::Normalize).unwrap(), "see $a_1 < b$\n\n");
        assert_eq!(
            run("see $a_1$", Target::Web).unwrap(),
            "\n<p>see \\(a_1\\)</p>\n"
        );
    }

    #[test]
    fn unterminated_math() {
        let err = run("$x", Target::Normalize).unwrap_err();
        assert_eq!(err.cause, ErrorCause::ExpectedEndMarker("$".into()));
    }

    #[test]
    fn paragraph_starts_a_new_block() {
        assert_eq!(
            run("a \\paragraph{b\n\nc} d", Target::Web).unwrap(),
            "\n<p>a</p>\n\n<p>b c d</p>\n"
        );
    }

    #[test]
    fn structural_errors() {
        let err = run("a { b", Target::Normalize).unwrap_err();
        assert_eq!(err.cause, ErrorCause::UnexpectedBeginMarker("{".into()));
        let err = run("\\end{x}", Target::Normalize).unwrap_err();
        assert_eq!(err.cause, ErrorCause::UnexpectedEndMarker("\\end".into()));
        let err = run("\\begin{list}", Target::Normalize).unwrap_err();
        assert_eq!(err.cause, ErrorCause::UnknownEnvironment("list".into()));
    }
}
