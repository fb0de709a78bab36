//! Per-level flag context and argument-split policy.
//!
//! Every command level owns a [`FlagSet`]: a compiled `clap::Command` that
//! knows the level's flags plus one catch-all positional. Clap consumes the
//! flag tokens and hands back the positionals in their original order; the
//! level's [`MinArgs`] policy then decides which of those it keeps and which
//! it passes down.
//!
//! # Interspersion
//!
//! ```text
//! interspersed:      a --flag b      → flags: --flag   positional: [a, b]
//! non-interspersed:  a --flag b      → flags: (none)   positional: [a, --flag, b]
//! ```
//!
//! Levels with children parse non-interspersed so that a child's name and
//! everything after it reach the child untouched.
//!
//! A flag given more than once keeps its last value.

use clap::{Arg, ArgAction, ArgMatches};

use crate::error::DispatchError;

/// Id of the catch-all positional. Flags must not reuse it.
pub(crate) const POSITIONAL_ID: &str = "__positional";

/// How a command level splits its positionals between itself and its children.
///
/// Built from an integer with `From<i32>`:
///
/// | value   | policy        | `args`             | `tail`          |
/// |---------|---------------|--------------------|-----------------|
/// | `0`     | `Passthrough` | empty              | all positionals |
/// | `k > 0` | `Take(k)`     | first `k`          | the rest        |
/// | `< 0`   | `Greedy`      | all positionals    | empty           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinArgs {
    /// Take nothing; everything is for a descendant
    #[default]
    Passthrough,
    /// Take exactly this many leading positionals, failing if fewer remain
    Take(usize),
    /// Take every positional; never delegate
    Greedy,
}

impl MinArgs {
    /// Splits `positional` into `(args, tail)` according to this policy.
    pub fn split(
        &self,
        command: &str,
        mut positional: Vec<String>,
    ) -> Result<(Vec<String>, Vec<String>), DispatchError> {
        match *self {
            MinArgs::Passthrough => Ok((Vec::new(), positional)),
            MinArgs::Take(expected) if positional.len() < expected => {
                Err(DispatchError::InsufficientArgs {
                    command: command.to_string(),
                    expected,
                    found: positional.len(),
                })
            }
            MinArgs::Take(expected) => {
                let tail = positional.split_off(expected);
                Ok((positional, tail))
            }
            MinArgs::Greedy => Ok((positional, Vec::new())),
        }
    }
}

impl From<i32> for MinArgs {
    fn from(value: i32) -> Self {
        match value {
            0 => MinArgs::Passthrough,
            n if n > 0 => MinArgs::Take(n as usize),
            _ => MinArgs::Greedy,
        }
    }
}

/// A compiled flag-parsing context for one command level.
#[derive(Debug, Clone)]
pub struct FlagSet {
    command: clap::Command,
    interspersed: bool,
}

impl FlagSet {
    /// Compiles the given flag declarations into a parsing context.
    pub(crate) fn compile(name: &str, flags: Vec<Arg>, interspersed: bool) -> Self {
        let mut positional = Arg::new(POSITIONAL_ID)
            .value_name("ARGS")
            .num_args(0..)
            .action(ArgAction::Append)
            .value_parser(clap::value_parser!(String));
        if !interspersed {
            positional = positional.trailing_var_arg(true);
        }

        let command = clap::Command::new(name.to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .args(flags)
            .arg(positional);

        Self {
            command,
            interspersed,
        }
    }

    /// Returns true if flags may follow positional arguments.
    pub fn is_interspersed(&self) -> bool {
        self.interspersed
    }

    /// Iterates over the declared flags.
    pub fn flags(&self) -> impl Iterator<Item = &Arg> {
        self.command
            .get_arguments()
            .filter(|arg| arg.get_id() != POSITIONAL_ID)
    }

    /// Runs the flag engine over `raw`, returning the matches and the
    /// positional tokens in their original order.
    ///
    /// Each call parses with its own copy of the compiled command.
    pub(crate) fn parse(&self, raw: &[String]) -> Result<(ArgMatches, Vec<String>), clap::Error> {
        let matches = self.command.clone().try_get_matches_from(raw)?;
        let positional = matches
            .get_many::<String>(POSITIONAL_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        Ok((matches, positional))
    }
}

/// Renders a clap error the way it would appear on a terminal.
pub(crate) fn render_error(err: &clap::Error, color: bool) -> String {
    let rendered = err.render();
    if color {
        rendered.ansi().to_string()
    } else {
        rendered.to_string()
    }
}
