//! Definition statements
//!
//! `\newcommand{sig}{body}` and `\newenvironment{sig}{body}` share one grammar.
//! The signature reads `name: token token ...`, where tokens are separated by
//! `;` or whitespace outside parentheses:
//!
//! ```text
//! \newcommand{em: raw(text) ctx->web}{<em>#text</em>}
//! \newenvironment{quote: raw(who, *body); leaveblk}{
//!     <blockquote>#body (#who)</blockquote>
//! }
//! ```
//!
//! A body is either inline (`{text}` on one line) or a block opened by `{` at
//! the end of the directive line and closed by `}` at the directive's own
//! indentation.

use super::MacroKind;
use crate::comtext::error::{ErrorCause, ParseResult};
use crate::comtext::evaluator::{Language, MacroBody};
use crate::comtext::keywords;
use crate::comtext::parsing::{Interpreter, ParseState};
use crate::comtext::target::{BreakPolicy, Mode};
use crate::comtext::text;

/// A declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub verbatim: bool,
}

/// The part of a definition frozen by the first definition of a name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    /// One entry per parameter: read verbatim or expanded
    pub verbatim: Vec<bool>,
    pub mode: Mode,
    pub policy: BreakPolicy,
}

/// A parsed signature scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub language: Language,
    pub params: Vec<Param>,
    pub mode: Mode,
    pub policy: BreakPolicy,
}

impl Declaration {
    pub fn signature(&self) -> Signature {
        Signature {
            verbatim: self.params.iter().map(|param| param.verbatim).collect(),
            mode: self.mode,
            policy: self.policy,
        }
    }
}

/// One complete definition statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub kind: MacroKind,
    pub name: String,
    pub signature: Signature,
    pub body: MacroBody,
}

impl Definition {
    pub fn new(kind: MacroKind, declaration: Declaration, code: String) -> Self {
        let signature = declaration.signature();
        Self {
            kind,
            name: declaration.name,
            signature,
            body: MacroBody {
                language: declaration.language,
                params: declaration
                    .params
                    .into_iter()
                    .map(|param| param.name)
                    .collect(),
                code,
            },
        }
    }
}

/// Parse the contents of a signature scope
pub fn parse_signature(kind: MacroKind, text: &str) -> Result<Declaration, ErrorCause> {
    let mut parts = text.split(keywords::DEF_MARKER);
    let head = parts.next().unwrap_or_default();
    let Some(tail) = parts.next() else {
        return Err(ErrorCause::MissingDefMarker);
    };
    if parts.next().is_some() {
        return Err(ErrorCause::TooManyDefMarkers);
    }

    let name = head.trim();
    if name.is_empty()
        || name
            .chars()
            .any(|ch| ch.is_whitespace() || ch == '{' || ch == '}')
    {
        return Err(ErrorCause::ForbidChar(name.to_string()));
    }

    let mut language = None;
    let mut mode = None;
    let mut policy = None;
    for token in tokenize(tail) {
        if let Some((lang, params)) = parse_language(token)? {
            if language.replace((lang, params)).is_some() {
                return Err(ErrorCause::ConflictLanguage);
            }
        } else if let Some(m) = Mode::from_token(token) {
            if mode.replace(m).is_some() {
                return Err(ErrorCause::ConflictMode);
            }
        } else if let Some(p) = BreakPolicy::from_token(token) {
            if policy.replace(p).is_some() {
                return Err(ErrorCause::ConflictBreak);
            }
        } else {
            return Err(ErrorCause::UnknownParameter(token.to_string()));
        }
    }

    let (language, params) = language.unwrap_or((Language::Raw, Vec::new()));
    if kind == MacroKind::Environment {
        match params.last() {
            None => return Err(ErrorCause::TooFewArgs),
            Some(last) if !last.verbatim => return Err(ErrorCause::LastMustVerbatim),
            Some(_) => {}
        }
    }

    Ok(Declaration {
        name: name.to_string(),
        language,
        params,
        mode: mode.unwrap_or_default(),
        policy: policy.unwrap_or_default(),
    })
}

/// Split on `;` and on whitespace outside parentheses
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            keywords::PARAM_LEFT => depth += 1,
            keywords::PARAM_RIGHT => depth = depth.saturating_sub(1),
            keywords::DEF_SPLIT => {
                tokens.push(&text[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ if ch.is_whitespace() && depth == 0 => {
                tokens.push(&text[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    tokens.push(&text[start..]);
    tokens
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// `lang(p1, *p2)`, or `None` when the token names no language
fn parse_language(token: &str) -> Result<Option<(Language, Vec<Param>)>, ErrorCause> {
    let Some((tag, rest)) = token.split_once(keywords::PARAM_LEFT) else {
        return Ok(None);
    };
    let Some(language) = Language::from_tag(tag.trim()) else {
        return Ok(None);
    };
    let Some(inner) = rest.strip_suffix(keywords::PARAM_RIGHT) else {
        return Err(ErrorCause::UnknownParameter(token.to_string()));
    };
    if inner.trim().is_empty() {
        return Ok(Some((language, Vec::new())));
    }

    let params = inner
        .split(keywords::PARAM_SPLIT)
        .map(|raw| {
            let raw = raw.trim();
            let (verbatim, name) = match raw.strip_prefix(keywords::PARAM_VERBATIM) {
                Some(name) => (true, name.trim()),
                None => (false, raw),
            };
            if name.is_empty() || name.chars().any(|ch| keywords::PARAM_FORBID_CHARS.contains(ch)) {
                return Err(ErrorCause::ForbidChar(raw.to_string()));
            }
            Ok(Param {
                name: name.to_string(),
                verbatim,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some((language, params)))
}

/// Read a definition body whose directive sits at `indent`
pub fn read_body<'d>(state: &mut ParseState<'d>, indent: usize) -> ParseResult<String> {
    if !state.rest().starts_with(keywords::SCOPE_BEGIN) {
        return Err(state.error(ErrorCause::ExpectedBeginMarker(
            keywords::SCOPE_BEGIN.to_string(),
        )));
    }
    state.advance(keywords::SCOPE_BEGIN);

    if !state.rest().starts_with('\n') {
        let code = state.match_to_next_occurrence(keywords::SCOPE_END, None)?;
        if code.contains('\n') {
            return Err(state.error(ErrorCause::ExpectedLineBreak));
        }
        return Ok(code.to_string());
    }

    let closing = format!("\n{}{}", " ".repeat(indent), keywords::SCOPE_END);
    let block = state.match_to_next_occurrence(&closing, Some(keywords::SCOPE_END))?;
    let block = block.strip_prefix('\n').unwrap_or(block);
    match text::block_indent(block) {
        None => Ok(String::new()),
        Some(min) if min <= indent => Err(state.error(ErrorCause::Outdented(indent))),
        Some(min) => Ok(text::strip_indent(block, min)),
    }
}

/// Parse a whole definition statement and merge it into the registry
pub fn read_definition(
    interp: &mut Interpreter,
    state: &mut ParseState,
    kind: MacroKind,
) -> ParseResult<()> {
    let indent = state.current_indent();
    let signature = state.match_verbatim_scope()?;
    let declaration = parse_signature(kind, signature).map_err(|cause| state.error(cause))?;
    let code = read_body(state, indent)?;
    let definition = Definition::new(kind, declaration, code);
    interp
        .registry
        .define(definition, state.target)
        .map_err(|cause| state.error(cause))
}
