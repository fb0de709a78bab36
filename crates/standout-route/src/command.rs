//! Command nodes.
//!
//! A command tree is built in two phases:
//!
//! 1. [`CommandBuilder`] collects the topology: name, [`MinArgs`] policy, flag
//!    declarations, children, output sink and hooks.
//! 2. [`CommandBuilder::build`] compiles every level's flag context and
//!    returns an immutable [`Command`].
//!
//! Parse results are never stored on the node. [`Command::parse`] returns a
//! [`Parsed`] record, so one compiled tree can serve any number of calls.
//!
//! # Registration rules
//!
//! - [`add_command`](CommandBuilder::add_command) keys the child by its
//!   lower-cased name; [`add_named_command`](CommandBuilder::add_named_command)
//!   uses the key verbatim.
//! - Registering under an existing key replaces the previous child.
//! - Any registration switches the parent to non-interspersed flag parsing.
//! - A child without an output sink takes a copy of the parent's sink at
//!   registration time. Setting the parent's sink later does not reach it.

use std::collections::HashMap;

use clap::{Arg, ArgMatches};
use tracing::debug;

use crate::error::DispatchError;
use crate::flags::{render_error, FlagSet, MinArgs};
use crate::hooks::Hooks;
use crate::output::OutputSink;

/// Result of parsing one command level.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// This level's own positional arguments
    pub args: Vec<String>,
    /// Positionals destined for a child (or left unclaimed)
    pub tail: Vec<String>,
    /// Clap matches for this level's flags
    pub matches: ArgMatches,
}

/// Builder for a command level and, through its children, a whole tree.
///
/// # Example
///
/// ```rust
/// use clap::{Arg, ArgAction};
/// use standout_route::{Command, Hooks};
///
/// let root = Command::builder("app")
///     .flag(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue))
///     .add_command(
///         Command::builder("Greet")
///             .min_args(1)
///             .hooks(Hooks::new().run(|ctx| println!("hello {}", ctx.args()[0]))),
///     )
///     .build();
///
/// let dispatch = root.execute(["--verbose", "greet", "world"]).unwrap();
/// assert_eq!(dispatch.leaf().args, vec!["world"]);
/// ```
#[derive(Debug)]
pub struct CommandBuilder {
    name: String,
    min_args: MinArgs,
    flags: Vec<Arg>,
    children: HashMap<String, CommandBuilder>,
    output: Option<OutputSink>,
    hooks: Hooks,
    interspersed: bool,
}

impl CommandBuilder {
    /// Creates a builder for a command with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_args: MinArgs::default(),
            flags: Vec::new(),
            children: HashMap::new(),
            output: None,
            hooks: Hooks::default(),
            interspersed: true,
        }
    }

    /// Returns the command's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the argument-split policy. Accepts a [`MinArgs`] or an `i32`.
    pub fn min_args(mut self, policy: impl Into<MinArgs>) -> Self {
        self.min_args = policy.into();
        self
    }

    /// Declares a flag for this level.
    ///
    /// The id `__positional` is reserved.
    pub fn flag(mut self, arg: Arg) -> Self {
        self.flags.push(arg);
        self
    }

    /// Declares several flags for this level.
    pub fn flags(mut self, args: impl IntoIterator<Item = Arg>) -> Self {
        self.flags.extend(args);
        self
    }

    /// Sets the lifecycle hooks, replacing any set before.
    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Sets the sink for flag-parsing diagnostics.
    pub fn output(mut self, sink: OutputSink) -> Self {
        self.output = Some(sink);
        self
    }

    /// Returns the sink set on this builder, if any.
    pub fn explicit_output(&self) -> Option<&OutputSink> {
        self.output.as_ref()
    }

    /// Returns true while no child has been registered.
    pub fn is_interspersed(&self) -> bool {
        self.interspersed
    }

    /// Registers a child under its lower-cased name.
    pub fn add_command(self, child: CommandBuilder) -> Self {
        let key = child.name.to_lowercase();
        self.add_named_command(key, child)
    }

    /// Registers a child under `name`, used verbatim.
    pub fn add_named_command(mut self, name: impl Into<String>, mut child: CommandBuilder) -> Self {
        if child.output.is_none() {
            child.output = self.output.clone();
        }
        self.interspersed = false;
        self.children.insert(name.into(), child);
        self
    }

    /// Looks up a registered child by exact key.
    pub fn get_command(&self, name: &str) -> Option<&CommandBuilder> {
        self.children.get(name)
    }

    /// Compiles this level and all its descendants.
    pub fn build(self) -> Command {
        let flags = FlagSet::compile(&self.name, self.flags, self.interspersed);
        let children = self
            .children
            .into_iter()
            .map(|(key, child)| (key, child.build()))
            .collect();

        Command {
            name: self.name,
            min_args: self.min_args,
            flags,
            children,
            output: self.output,
            hooks: self.hooks,
        }
    }
}

/// A compiled command level.
///
/// Immutable once built; `Send + Sync`, so a tree can be shared and executed
/// from several threads at once.
#[derive(Debug)]
pub struct Command {
    name: String,
    min_args: MinArgs,
    flags: FlagSet,
    children: HashMap<String, Command>,
    output: Option<OutputSink>,
    hooks: Hooks,
}

impl Command {
    /// Starts building a command with the given name.
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_args(&self) -> MinArgs {
        self.min_args
    }

    /// The compiled flag context.
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// The diagnostic sink, falling back to stderr when none was set.
    pub fn output(&self) -> OutputSink {
        self.output.clone().unwrap_or_default()
    }

    /// The sink explicitly set or inherited at registration, if any.
    pub fn explicit_output(&self) -> Option<&OutputSink> {
        self.output.as_ref()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Iterates over `(key, child)` pairs in no particular order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.children
            .iter()
            .map(|(key, child)| (key.as_str(), child))
    }

    /// Looks up a child by exact key.
    pub fn get_command(&self, name: &str) -> Option<&Command> {
        self.children.get(name)
    }

    /// Resolves a sequence of keys, starting at this level.
    ///
    /// An empty sequence resolves to `self`.
    pub fn find_command<S: AsRef<str>>(&self, names: &[S]) -> Option<&Command> {
        match names.split_first() {
            None => Some(self),
            Some((first, rest)) => self.get_command(first.as_ref())?.find_command(rest),
        }
    }

    /// Resolves a `separator`-delimited path such as `"db/migrate"`.
    ///
    /// An empty path resolves to a child registered under the empty key if
    /// there is one, and to `self` otherwise. An empty separator treats the
    /// whole path as a single key.
    pub fn find_command_by_path(&self, path: &str, separator: &str) -> Option<&Command> {
        if path.is_empty() {
            return self.get_command("").or(Some(self));
        }
        if separator.is_empty() {
            return self.get_command(path);
        }
        let names: Vec<&str> = path.split(separator).collect();
        self.find_command(&names)
    }

    /// Parses this level's flags and splits its positionals.
    ///
    /// Flag errors are rendered to this level's output sink before being
    /// returned.
    pub fn parse<I, S>(&self, args: I) -> Result<Parsed, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = args.into_iter().map(Into::into).collect();
        self.parse_raw(&raw)
    }

    pub(crate) fn parse_raw(&self, raw: &[String]) -> Result<Parsed, DispatchError> {
        let (matches, positional) = match self.flags.parse(raw) {
            Ok(parsed) => parsed,
            Err(source) => {
                let sink = self.output();
                if let Err(err) = sink.write_text(&render_error(&source, sink.supports_color())) {
                    debug!(command = %self.name, %err, "failed to write flag diagnostic");
                }
                debug!(command = %self.name, kind = %source.kind(), "flag parsing failed");
                return Err(DispatchError::FlagParse {
                    command: self.name.clone(),
                    source,
                });
            }
        };

        let (args, tail) = self.min_args.split(&self.name, positional)?;
        debug!(command = %self.name, ?args, ?tail, "parsed command arguments");

        Ok(Parsed {
            args,
            tail,
            matches,
        })
    }
}
