//! Macro handlers and the registry that dispatches them
//!
//! The registry maps invocation spellings (`\usepackage`, `\greet`,
//! `\begin{quote}`, `''`, ...) to handlers through a [`PrefixIndex`], so the
//! block loop can find the longest invocation at any position. Handlers live
//! in an arena and the index stores their ids; redefining a user macro with a
//! new body language replaces the arena slot in place.

mod builtins;
mod definition;
mod invoke;

pub use builtins::Builtin;
pub use definition::{parse_signature, Declaration, Definition, Param, Signature};

use crate::comtext::error::{ErrorCause, ParseResult};
use crate::comtext::evaluator::{Evaluator, Language, MacroBody};
use crate::comtext::keywords;
use crate::comtext::parsing::{Interpreter, ParseState};
use crate::comtext::target::Target;
use crate::comtext::trie::PrefixIndex;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

pub type HandlerId = usize;

/// Result of running a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The handler transformed its input
    Fired(String),
    /// The invocation was reproduced as it stands in this pass
    Passthrough(String),
}

impl Expansion {
    pub fn text(&self) -> &str {
        match self {
            Expansion::Fired(text) | Expansion::Passthrough(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    Command,
    Environment,
}

impl MacroKind {
    /// Spelling that dispatches to a definition called `name`
    pub fn invocation(self, name: &str) -> String {
        match self {
            MacroKind::Command => keywords::macro_invocation(name),
            MacroKind::Environment => keywords::environment_begin(name),
        }
    }
}

/// A user-defined macro or environment
#[derive(Debug, Clone, PartialEq)]
pub struct UserMacro {
    pub kind: MacroKind,
    pub name: String,
    pub signature: Signature,
    pub bodies: BTreeMap<Language, MacroBody>,
}

impl UserMacro {
    /// The body to run: script when bound and evaluable, raw otherwise
    pub fn preferred_body(&self, evaluator: &dyn Evaluator) -> Option<&MacroBody> {
        let script = self.bodies.get(&Language::Script);
        let raw = self.bodies.get(&Language::Raw);
        match (script, raw) {
            (Some(script), _) if evaluator.supports(Language::Script) => Some(script),
            (_, Some(raw)) => Some(raw),
            (script, None) => script,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Handler {
    Builtin(Builtin),
    User(Rc<UserMacro>),
}

impl Handler {
    pub fn parse(
        &self,
        interp: &mut Interpreter,
        state: &mut ParseState,
        invocation: &str,
    ) -> ParseResult<Expansion> {
        match self {
            Handler::Builtin(builtin) => builtin.parse(interp, state, invocation),
            Handler::User(user) => user.invoke(interp, state, invocation),
        }
    }
}

/// Invocation spellings and their handlers
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    index: PrefixIndex<HandlerId>,
    handlers: Vec<Handler>,
}

impl MacroRegistry {
    /// A registry without any handler
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with every builtin
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (spelling, builtin) in Builtin::all() {
            registry.register(&spelling, Handler::Builtin(builtin));
        }
        registry
    }

    /// Bind `spelling` to `handler`, replacing what it was bound to
    pub fn register(&mut self, spelling: &str, handler: Handler) -> HandlerId {
        if let Some(&id) = self.index.get(spelling) {
            self.handlers[id] = handler;
            return id;
        }
        let id = self.handlers.len();
        self.handlers.push(handler);
        self.index.insert(spelling, id);
        id
    }

    /// Longest invocation at the start of `text`
    pub fn lookup<'t>(&self, text: &'t str) -> Option<(&'t str, HandlerId)> {
        self.index
            .longest_prefix(text)
            .map(|(name, &id)| (name, id))
    }

    pub fn handler(&self, id: HandlerId) -> &Handler {
        &self.handlers[id]
    }

    pub fn get(&self, spelling: &str) -> Option<&Handler> {
        self.index.get(spelling).map(|&id| &self.handlers[id])
    }

    pub fn contains(&self, spelling: &str) -> bool {
        self.index.contains(spelling)
    }

    /// The user definition behind `spelling`, if any
    pub fn user_macro(&self, spelling: &str) -> Option<&UserMacro> {
        match self.get(spelling)? {
            Handler::User(user) => Some(user),
            Handler::Builtin(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Merge one definition statement into the registry.
    ///
    /// The first definition of a spelling fixes its signature; later ones
    /// must repeat it exactly and may only add a body for a language that is
    /// still unbound.
    pub fn define(&mut self, definition: Definition, target: Target) -> Result<(), ErrorCause> {
        let Definition {
            kind,
            name,
            signature,
            body,
        } = definition;
        let spelling = kind.invocation(&name);

        if let Some(&id) = self.index.get(&spelling) {
            if let Handler::User(existing) = &mut self.handlers[id] {
                if existing.signature != signature {
                    return Err(ErrorCause::ParamMismatch);
                }
                if existing.bodies.contains_key(&body.language) {
                    return Err(ErrorCause::ConflictCode);
                }
                debug!(%spelling, language = %body.language, "bound additional body");
                Rc::make_mut(existing).bodies.insert(body.language, body);
                return Ok(());
            }
        }

        debug!(
            %spelling,
            mode = signature.mode.token(),
            active = signature.mode.applies_to(target),
            "defined macro"
        );
        let mut bodies = BTreeMap::new();
        bodies.insert(body.language, body);
        let user = UserMacro {
            kind,
            name,
            signature,
            bodies,
        };
        self.register(&spelling, Handler::User(Rc::new(user)));
        Ok(())
    }
}
