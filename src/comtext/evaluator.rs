//! Macro body evaluation
//!
//! The engine never interprets a macro body itself. It hands the bound body and
//! the argument values to an [`Evaluator`] and splices the returned text into
//! the document. [`RawEvaluator`] implements the `raw` language: plain text in
//! which `#name` is replaced by the argument bound to parameter `name`.
//! `script` bodies need an engine plugged into [`StandardEvaluator`].

use crate::comtext::keywords;
use crate::comtext::trie::PrefixIndex;
use std::fmt;

/// Language a macro body is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Raw,
    Script,
}

impl Language {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            keywords::LANG_RAW => Some(Language::Raw),
            keywords::LANG_SCRIPT => Some(Language::Script),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::Raw => keywords::LANG_RAW,
            Language::Script => keywords::LANG_SCRIPT,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A body bound to a macro by one definition statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroBody {
    pub language: Language,
    pub params: Vec<String>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    TooManyArguments {
        function: String,
        expected: usize,
        given: usize,
    },
    MissingArguments {
        function: String,
        missing: Vec<String>,
    },
    UnsupportedLanguage(Language),
    Runtime(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::TooManyArguments {
                function,
                expected,
                given,
            } => write!(
                f,
                "{}() takes {} positional arguments but {} were given",
                function, expected, given
            ),
            EvalError::MissingArguments { function, missing } => {
                let quoted: Vec<String> = missing.iter().map(|m| format!("'{}'", m)).collect();
                let listed = match quoted.as_slice() {
                    [] => String::new(),
                    [one] => one.clone(),
                    [init @ .., last] => format!("{} and {}", init.join(", "), last),
                };
                let plural = if missing.len() == 1 { "" } else { "s" };
                write!(
                    f,
                    "{}() missing {} required positional argument{}: {}",
                    function,
                    missing.len(),
                    plural,
                    listed
                )
            }
            EvalError::UnsupportedLanguage(language) => {
                write!(f, "no evaluator available for '{}' bodies", language)
            }
            EvalError::Runtime(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

/// Runs macro bodies
pub trait Evaluator: Send + Sync {
    /// Whether bodies in `language` can be evaluated
    fn supports(&self, language: Language) -> bool;

    /// Evaluate `body` of macro `name` against positional argument values
    fn evaluate(&self, name: &str, body: &MacroBody, args: &[String]) -> Result<String, EvalError>;
}

/// Reject calls whose argument count differs from the body's parameter list
pub fn check_arity(name: &str, body: &MacroBody, args: &[String]) -> Result<(), EvalError> {
    let expected = body.params.len();
    if args.len() > expected {
        return Err(EvalError::TooManyArguments {
            function: name.to_string(),
            expected,
            given: args.len(),
        });
    }
    if args.len() < expected {
        return Err(EvalError::MissingArguments {
            function: name.to_string(),
            missing: body.params[args.len()..].to_vec(),
        });
    }
    Ok(())
}

/// Text substitution of `#param` references
#[derive(Debug, Clone, Copy, Default)]
pub struct RawEvaluator;

impl RawEvaluator {
    pub fn substitute(code: &str, params: &[String], args: &[String]) -> String {
        let mut bindings = PrefixIndex::new();
        for (param, value) in params.iter().zip(args) {
            bindings.insert(param, value.as_str());
        }

        let mut out = String::with_capacity(code.len());
        let mut rest = code;
        while let Some(idx) = rest.find(keywords::RAW_VARIABLE) {
            out.push_str(&rest[..idx]);
            let after = &rest[idx + keywords::RAW_VARIABLE.len_utf8()..];
            match bindings.longest_prefix(after) {
                Some((param, value)) => {
                    out.push_str(value);
                    rest = &after[param.len()..];
                }
                None => {
                    out.push(keywords::RAW_VARIABLE);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl Evaluator for RawEvaluator {
    fn supports(&self, language: Language) -> bool {
        language == Language::Raw
    }

    fn evaluate(&self, name: &str, body: &MacroBody, args: &[String]) -> Result<String, EvalError> {
        if body.language != Language::Raw {
            return Err(EvalError::UnsupportedLanguage(body.language));
        }
        check_arity(name, body, args)?;
        Ok(Self::substitute(&body.code, &body.params, args))
    }
}

/// Raw substitution plus an optional engine for `script` bodies
#[derive(Default)]
pub struct StandardEvaluator {
    raw: RawEvaluator,
    script: Option<Box<dyn Evaluator>>,
}

impl StandardEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script_engine(mut self, engine: Box<dyn Evaluator>) -> Self {
        self.script = Some(engine);
        self
    }
}

impl Evaluator for StandardEvaluator {
    fn supports(&self, language: Language) -> bool {
        match language {
            Language::Raw => true,
            Language::Script => self
                .script
                .as_ref()
                .is_some_and(|engine| engine.supports(Language::Script)),
        }
    }

    fn evaluate(&self, name: &str, body: &MacroBody, args: &[String]) -> Result<String, EvalError> {
        match body.language {
            Language::Raw => self.raw.evaluate(name, body, args),
            Language::Script => match &self.script {
                Some(engine) => engine.evaluate(name, body, args),
                None => Err(EvalError::UnsupportedLanguage(Language::Script)),
            },
        }
    }
}

impl fmt::Debug for StandardEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardEvaluator")
            .field("script", &self.script.is_some())
            .finish()
    }
}
