//! Lifecycle hooks for command levels.
//!
//! Each command level may register up to five hooks. They fit into the
//! dispatch walk as follows:
//!
//! ```text
//! parse this level's flags and positionals
//!   → PRE-PARSE ← (setup around everything below this level)
//!   → tail non-empty: delegate to the named child (recurse)
//!     tail empty:     PRE-RUN → RUN → POST-RUN
//!   → POST-PARSE ← (teardown, mirrors pre-parse)
//! ```
//!
//! Whether pre-parse and post-parse fire at every level reached or only around
//! the outermost call is chosen per call with [`HookScope`].
//!
//! Hooks are infallible: they observe a [`CommandContext`] and perform their
//! effect. Absent hooks are simply skipped; the presence of one never affects
//! whether another runs.

use std::fmt;
use std::sync::Arc;

use clap::ArgMatches;
use tracing::trace;

use crate::command::{Command, Parsed};
use crate::output::OutputSink;

/// A lifecycle hook point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    /// After this level parsed, before delegating or running
    PreParse,
    /// First step of the run sequence
    PreRun,
    /// The command body
    Run,
    /// Last step of the run sequence
    PostRun,
    /// After delegation or the run sequence completed
    PostParse,
}

impl HookPhase {
    /// All phases in firing order.
    pub const ALL: [HookPhase; 5] = [
        HookPhase::PreParse,
        HookPhase::PreRun,
        HookPhase::Run,
        HookPhase::PostRun,
        HookPhase::PostParse,
    ];

    /// The phases a leaf command runs, in order.
    pub const RUN_SEQUENCE: [HookPhase; 3] =
        [HookPhase::PreRun, HookPhase::Run, HookPhase::PostRun];
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::PreParse => write!(f, "pre-parse"),
            HookPhase::PreRun => write!(f, "pre-run"),
            HookPhase::Run => write!(f, "run"),
            HookPhase::PostRun => write!(f, "post-run"),
            HookPhase::PostParse => write!(f, "post-parse"),
        }
    }
}

/// Granularity of the pre-parse and post-parse hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookScope {
    /// Fire at every level the dispatch reaches
    #[default]
    PerNode,
    /// Fire only on the level `execute` was called on, wrapping the whole walk
    Root,
}

/// Everything a hook can see about the level it fires on.
pub struct CommandContext<'a> {
    command: &'a Command,
    path: &'a [String],
    parsed: &'a Parsed,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(command: &'a Command, path: &'a [String], parsed: &'a Parsed) -> Self {
        Self {
            command,
            path,
            parsed,
        }
    }

    /// The command level the hook fires on.
    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// Registry keys from the executed root down to this level.
    ///
    /// Empty for the root itself.
    pub fn path(&self) -> &'a [String] {
        self.path
    }

    /// This level's own positional arguments.
    pub fn args(&self) -> &'a [String] {
        &self.parsed.args
    }

    /// Positionals this level passed down (or left unclaimed).
    pub fn tail(&self) -> &'a [String] {
        &self.parsed.tail
    }

    /// Clap matches for this level's flags.
    pub fn matches(&self) -> &'a ArgMatches {
        &self.parsed.matches
    }

    /// Returns the value of a boolean flag, `false` if unknown or unset.
    pub fn get_flag(&self, id: &str) -> bool {
        self.parsed
            .matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// Returns the value of a typed flag, `None` if unknown, unset or of another type.
    pub fn get_one<T>(&self, id: &str) -> Option<&'a T>
    where
        T: std::any::Any + Clone + Send + Sync + 'static,
    {
        self.parsed.matches.try_get_one::<T>(id).ok().flatten()
    }

    /// The resolved output sink of this level.
    pub fn output(&self) -> OutputSink {
        self.command.output()
    }
}

impl fmt::Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("command", &self.command.name())
            .field("path", &self.path)
            .field("args", &self.parsed.args)
            .field("tail", &self.parsed.tail)
            .finish()
    }
}

/// Type alias for hook functions.
pub type HookFn = Arc<dyn Fn(&CommandContext<'_>) + Send + Sync>;

/// Per-level hook configuration.
///
/// Setting a hook for a phase that already has one replaces it.
///
/// # Example
///
/// ```rust
/// use standout_route::Hooks;
///
/// let hooks = Hooks::new()
///     .pre_run(|ctx| println!("preparing {}", ctx.command().name()))
///     .run(|ctx| println!("args: {:?}", ctx.args()));
///
/// assert!(hooks.has(standout_route::HookPhase::Run));
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    pre_parse: Option<HookFn>,
    pre_run: Option<HookFn>,
    run: Option<HookFn>,
    post_run: Option<HookFn>,
    post_parse: Option<HookFn>,
}

impl Hooks {
    /// Creates a new empty hooks configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        HookPhase::ALL.iter().all(|phase| !self.has(*phase))
    }

    /// Returns true if a hook is registered for `phase`.
    pub fn has(&self, phase: HookPhase) -> bool {
        self.slot(phase).is_some()
    }

    /// Returns the registered phases in firing order.
    pub fn phases(&self) -> Vec<HookPhase> {
        HookPhase::ALL
            .into_iter()
            .filter(|phase| self.has(*phase))
            .collect()
    }

    /// Sets the hook for an arbitrary phase.
    pub fn on<F>(mut self, phase: HookPhase, f: F) -> Self
    where
        F: Fn(&CommandContext<'_>) + Send + Sync + 'static,
    {
        let hook: HookFn = Arc::new(f);
        match phase {
            HookPhase::PreParse => self.pre_parse = Some(hook),
            HookPhase::PreRun => self.pre_run = Some(hook),
            HookPhase::Run => self.run = Some(hook),
            HookPhase::PostRun => self.post_run = Some(hook),
            HookPhase::PostParse => self.post_parse = Some(hook),
        }
        self
    }

    /// Sets the pre-parse hook.
    pub fn pre_parse<F>(self, f: F) -> Self
    where
        F: Fn(&CommandContext<'_>) + Send + Sync + 'static,
    {
        self.on(HookPhase::PreParse, f)
    }

    /// Sets the pre-run hook.
    pub fn pre_run<F>(self, f: F) -> Self
    where
        F: Fn(&CommandContext<'_>) + Send + Sync + 'static,
    {
        self.on(HookPhase::PreRun, f)
    }

    /// Sets the run hook, the body of the command.
    pub fn run<F>(self, f: F) -> Self
    where
        F: Fn(&CommandContext<'_>) + Send + Sync + 'static,
    {
        self.on(HookPhase::Run, f)
    }

    /// Sets the post-run hook.
    pub fn post_run<F>(self, f: F) -> Self
    where
        F: Fn(&CommandContext<'_>) + Send + Sync + 'static,
    {
        self.on(HookPhase::PostRun, f)
    }

    /// Sets the post-parse hook.
    pub fn post_parse<F>(self, f: F) -> Self
    where
        F: Fn(&CommandContext<'_>) + Send + Sync + 'static,
    {
        self.on(HookPhase::PostParse, f)
    }

    /// Fires the hook for `phase`, if one is registered.
    pub fn fire(&self, phase: HookPhase, ctx: &CommandContext<'_>) {
        if let Some(hook) = self.slot(phase) {
            trace!(command = ctx.command().name(), %phase, "firing hook");
            hook(ctx);
        }
    }

    /// Fires pre-run, run and post-run in order.
    pub fn run_sequence(&self, ctx: &CommandContext<'_>) {
        for phase in HookPhase::RUN_SEQUENCE {
            self.fire(phase, ctx);
        }
    }

    fn slot(&self, phase: HookPhase) -> Option<&HookFn> {
        match phase {
            HookPhase::PreParse => self.pre_parse.as_ref(),
            HookPhase::PreRun => self.pre_run.as_ref(),
            HookPhase::Run => self.run.as_ref(),
            HookPhase::PostRun => self.post_run.as_ref(),
            HookPhase::PostParse => self.post_parse.as_ref(),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("phases", &self.phases())
            .finish()
    }
}
