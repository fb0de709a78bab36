//! Recursive dispatch down a command tree.
//!
//! [`Command::execute`] parses the level it is called on, then either hands
//! the unclaimed tail to the child named by its first token or, when nothing
//! is left over, runs the level's own run sequence. Every level reached is
//! recorded in the returned [`Dispatch`].
//!
//! ```text
//! root.execute(["--flag", "a1", "a2", "sub", "--sub-flag", "v", "s1"])
//!
//! root   args [a1, a2]   tail [sub, --sub-flag, v, s1]
//!   └─ sub   args [s1]   tail []   → pre-run, run, post-run
//! ```

use serde::Serialize;
use tracing::debug;

use crate::command::Command;
use crate::error::DispatchError;
use crate::hooks::{CommandContext, HookPhase, HookScope};

/// One level reached during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    /// Registry keys from the executed root down to this level
    pub path: Vec<String>,
    /// The level's own name
    pub command: String,
    /// Positionals the level kept
    pub args: Vec<String>,
    /// Positionals the level passed down or left unclaimed
    pub tail: Vec<String>,
}

impl Visit {
    /// The path joined with spaces, as a user would type it.
    pub fn command_path(&self) -> String {
        self.path.join(" ")
    }
}

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The level at `path` had an empty tail and ran its run sequence
    Ran { path: Vec<String> },
    /// The level at `path` had no child named `name`; the tail was dropped
    Unmatched { path: Vec<String>, name: String },
}

impl Outcome {
    /// Returns true if a run sequence executed.
    pub fn is_ran(&self) -> bool {
        matches!(self, Outcome::Ran { .. })
    }

    /// Returns true if the walk stopped at an unknown child name.
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Outcome::Unmatched { .. })
    }

    /// Path of the level the walk stopped at.
    pub fn path(&self) -> &[String] {
        match self {
            Outcome::Ran { path } | Outcome::Unmatched { path, .. } => path,
        }
    }
}

/// Record of a completed dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    visits: Vec<Visit>,
    outcome: Outcome,
}

impl Dispatch {
    /// Levels reached, outermost first.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The level `execute` was called on.
    pub fn root(&self) -> &Visit {
        &self.visits[0]
    }

    /// The deepest level reached.
    pub fn leaf(&self) -> &Visit {
        &self.visits[self.visits.len() - 1]
    }

    /// Finds the visit recorded for a path of registry keys.
    pub fn visit<S: AsRef<str>>(&self, path: &[S]) -> Option<&Visit> {
        self.visits.iter().find(|visit| {
            visit.path.len() == path.len()
                && visit
                    .path
                    .iter()
                    .zip(path)
                    .all(|(key, wanted)| key == wanted.as_ref())
        })
    }
}

impl Command {
    /// Parses `args` and routes them down the tree.
    ///
    /// `args` must not include the program name. Pre-parse and post-parse
    /// hooks fire at every level reached; see [`execute_with`](Self::execute_with)
    /// to fire them only around the whole call.
    ///
    /// A level that fails to parse stops the walk: no hook fires at it or
    /// below, and the error is returned after the post-parse hooks of the
    /// levels above it have fired.
    pub fn execute<I, S>(&self, args: I) -> Result<Dispatch, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute_with(args, HookScope::default())
    }

    /// Like [`execute`](Self::execute), with an explicit pre/post-parse hook scope.
    pub fn execute_with<I, S>(&self, args: I, scope: HookScope) -> Result<Dispatch, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut visits = Vec::new();
        let outcome = self.dispatch(&raw, Vec::new(), scope, true, &mut visits)?;
        Ok(Dispatch { visits, outcome })
    }

    fn dispatch(
        &self,
        raw: &[String],
        path: Vec<String>,
        scope: HookScope,
        outermost: bool,
        visits: &mut Vec<Visit>,
    ) -> Result<Outcome, DispatchError> {
        let parsed = self.parse_raw(raw)?;
        visits.push(Visit {
            path: path.clone(),
            command: self.name().to_string(),
            args: parsed.args.clone(),
            tail: parsed.tail.clone(),
        });

        let ctx = CommandContext::new(self, &path, &parsed);
        let wraps = outermost || scope == HookScope::PerNode;
        if wraps {
            self.hooks().fire(HookPhase::PreParse, &ctx);
        }

        let result = match parsed.tail.split_first() {
            Some((name, rest)) => match self.get_command(name) {
                Some(child) => {
                    debug!(command = %self.name(), child = %name, "delegating to subcommand");
                    let mut child_path = path.clone();
                    child_path.push(name.clone());
                    child.dispatch(rest, child_path, scope, false, visits)
                }
                None => {
                    debug!(command = %self.name(), %name, "no matching subcommand, dropping tail");
                    Ok(Outcome::Unmatched {
                        path: path.clone(),
                        name: name.clone(),
                    })
                }
            },
            None => {
                self.hooks().run_sequence(&ctx);
                Ok(Outcome::Ran { path: path.clone() })
            }
        };

        if wraps {
            self.hooks().fire(HookPhase::PostParse, &ctx);
        }
        result
    }
}
