//! Invocation of user macros and environments

use super::{Expansion, MacroKind, UserMacro};
use crate::comtext::error::{ErrorCause, ParseResult};
use crate::comtext::keywords;
use crate::comtext::parsing::{Interpreter, ParseState};
use crate::comtext::target::{BreakPolicy, Target};
use crate::comtext::text;
use tracing::trace;

/// Argument values as read at the call site
struct CallArgs {
    values: Vec<String>,
    /// Whether a zero-arity command was followed by `{}`
    empty_scope: bool,
}

impl UserMacro {
    pub fn invoke(
        &self,
        interp: &mut Interpreter,
        state: &mut ParseState,
        invocation: &str,
    ) -> ParseResult<Expansion> {
        let call_indent = state.current_indent();
        let mut out = state.autobreak.flush();
        out.push_str(&match self.signature.policy {
            BreakPolicy::WrapInParagraph => state.autobreak.open(false),
            BreakPolicy::LeaveParagraph => state.autobreak.close(),
        });

        let enabled = state.autobreak.suspend();
        let args = self.read_arguments(interp, state, call_indent);
        state.autobreak.restore(enabled);
        let args = args?;

        if !self.signature.mode.applies_to(state.target) {
            trace!(invocation, target = %state.target, "deferred");
            out.push_str(&self.reemit(invocation, &args));
            return Ok(Expansion::Passthrough(out));
        }

        let body = self
            .preferred_body(interp.evaluator)
            .ok_or_else(|| state.error(ErrorCause::UnknownFunction))?;
        let result = interp
            .evaluator
            .evaluate(&self.name, body, &args.values)
            .map_err(|err| state.error(err.into()))?;

        let expanded = if state.target == Target::Normalize {
            interp.expand_to_fixpoint(state, result)?
        } else {
            result
        };
        out.push_str(&expanded);
        Ok(Expansion::Fired(out))
    }

    fn read_arguments(
        &self,
        interp: &mut Interpreter,
        state: &mut ParseState,
        call_indent: usize,
    ) -> ParseResult<CallArgs> {
        let flags = &self.signature.verbatim;
        if flags.is_empty() {
            let empty_scope = state.match_empty_scope();
            return Ok(CallArgs {
                values: Vec::new(),
                empty_scope,
            });
        }

        let scoped = match self.kind {
            MacroKind::Command => flags.len(),
            MacroKind::Environment => flags.len() - 1,
        };
        let mut values = Vec::with_capacity(flags.len());
        for &verbatim in &flags[..scoped] {
            let value = if verbatim {
                state.match_verbatim_scope()?.to_string()
            } else {
                interp.match_parsable_scope(state)?
            };
            values.push(value);
        }
        if self.kind == MacroKind::Environment {
            values.push(self.read_environment_body(state, call_indent)?);
        }
        Ok(CallArgs {
            values,
            empty_scope: false,
        })
    }

    /// Capture up to the `\end{name}` line at the call's indentation
    fn read_environment_body(&self, state: &mut ParseState, call_indent: usize) -> ParseResult<String> {
        state.expect_line_break(ErrorCause::EnvironmentExpectedLineBreak)?;
        let end_tag = keywords::environment_end(&self.name);
        let closing = format!("\n{}{}", " ".repeat(call_indent), end_tag);
        let captured = state.match_to_next_occurrence(&closing, Some(&end_tag))?;
        let captured = captured.strip_prefix('\n').unwrap_or(captured);
        Ok(text::strip_indent(captured, call_indent))
    }

    /// The invocation as written, for a pass that must not run it
    fn reemit(&self, invocation: &str, args: &CallArgs) -> String {
        let mut out = invocation.to_string();
        let scoped = match self.kind {
            MacroKind::Command => &args.values[..],
            MacroKind::Environment => &args.values[..args.values.len().saturating_sub(1)],
        };
        for value in scoped {
            out.push_str(keywords::SCOPE_BEGIN);
            out.push_str(value);
            out.push_str(keywords::SCOPE_END);
        }
        if args.empty_scope || (self.kind == MacroKind::Command && args.values.is_empty()) {
            out.push_str(keywords::SCOPE_BEGIN);
            out.push_str(keywords::SCOPE_END);
        }
        if self.kind == MacroKind::Environment {
            if let Some(body) = args.values.last() {
                out.push('\n');
                out.push_str(body);
                out.push('\n');
                out.push_str(&keywords::environment_end(&self.name));
            }
        }
        out
    }
}
