//! Compilation targets and macro modes

use crate::comtext::keywords;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a pass produces.
///
/// The normalize pass always runs first and yields the intermediate `ctx`
/// document; doc and web are render passes run on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[serde(rename = "ctx", alias = "normalize")]
    Normalize,
    Doc,
    Web,
}

impl Target {
    pub fn name(self) -> &'static str {
        match self {
            Target::Normalize => "ctx",
            Target::Doc => "doc",
            Target::Web => "web",
        }
    }

    pub fn is_render(self) -> bool {
        self != Target::Normalize
    }

    /// Paragraph markers emitted by autobreak in this target
    pub fn paragraph_markers(self) -> (&'static str, &'static str) {
        match self {
            Target::Normalize => (keywords::PARA_BEGIN_CTX, keywords::PARA_END_CTX),
            Target::Doc => (keywords::PARA_BEGIN_DOC, keywords::PARA_END_DOC),
            Target::Web => (keywords::PARA_BEGIN_WEB, keywords::PARA_END_WEB),
        }
    }

    /// Select the spelling of an escaped character for this target
    pub fn pick(self, ch: &keywords::EscapedChar) -> &'static str {
        match self {
            Target::Normalize => ch.ctx,
            Target::Doc => ch.doc,
            Target::Web => ch.web,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTarget(pub String);

impl fmt::Display for UnknownTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown target '{}' (expected ctx, doc or web)", self.0)
    }
}

impl std::error::Error for UnknownTarget {}

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ctx" | "normalize" => Ok(Target::Normalize),
            "doc" => Ok(Target::Doc),
            "web" => Ok(Target::Web),
            other => Err(UnknownTarget(other.to_string())),
        }
    }
}

/// The pass in which a user macro body executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normalize,
    DocRender,
    WebRender,
}

impl Mode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            keywords::MODE_NORMALIZE => Some(Mode::Normalize),
            keywords::MODE_DOC => Some(Mode::DocRender),
            keywords::MODE_WEB => Some(Mode::WebRender),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Mode::Normalize => keywords::MODE_NORMALIZE,
            Mode::DocRender => keywords::MODE_DOC,
            Mode::WebRender => keywords::MODE_WEB,
        }
    }

    pub fn applies_to(self, target: Target) -> bool {
        matches!(
            (self, target),
            (Mode::Normalize, Target::Normalize)
                | (Mode::DocRender, Target::Doc)
                | (Mode::WebRender, Target::Web)
        )
    }
}

/// How an invocation interacts with the surrounding paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BreakPolicy {
    #[default]
    WrapInParagraph,
    LeaveParagraph,
}

impl BreakPolicy {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            keywords::BREAK_WRAP => Some(BreakPolicy::WrapInParagraph),
            keywords::BREAK_LEAVE => Some(BreakPolicy::LeaveParagraph),
            _ => None,
        }
    }
}
