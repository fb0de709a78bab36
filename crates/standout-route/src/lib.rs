//! Hierarchical command routing with per-level flags and lifecycle hooks.
//!
//! `standout-route` routes a flat argument vector down a tree of commands.
//! Every level of the tree is a [`Command`] with its own clap flags and an
//! argument-split policy ([`MinArgs`]); the level parses what it can, keeps
//! its own positionals and passes the rest to the child named by the next
//! token.
//!
//! # Features
//!
//! - **Per-level flags**: each level declares plain `clap::Arg`s; clap is the
//!   flag engine, this crate only decides what goes where
//! - **Split policies**: pass everything down, take the first `k`, or take all
//! - **Lifecycle hooks**: pre-parse, pre-run, run, post-run, post-parse
//! - **Diagnostic sinks**: flag errors go to a per-level [`OutputSink`]
//! - **Reusable trees**: parse results are returned, never stored, so a built
//!   tree is immutable and `Send + Sync`
//!
//! # Example
//!
//! ```rust
//! use clap::{Arg, ArgAction};
//! use standout_route::{Command, Hooks};
//!
//! let root = Command::builder("app")
//!     .min_args(2)
//!     .flag(Arg::new("flag").long("flag").action(ArgAction::SetTrue))
//!     .add_command(
//!         Command::builder("Sub-Command")
//!             .min_args(1)
//!             .flag(Arg::new("sub-flag").long("sub-flag"))
//!             .hooks(Hooks::new().run(|ctx| {
//!                 let value = ctx.get_one::<String>("sub-flag");
//!                 println!("sub-command {:?} {:?}", ctx.args(), value);
//!             })),
//!     )
//!     .build();
//!
//! let dispatch = root
//!     .execute(["--flag", "arg1", "arg2", "sub-command", "--sub-flag", "v", "sub_arg1"])
//!     .unwrap();
//!
//! assert_eq!(dispatch.root().args, vec!["arg1", "arg2"]);
//! assert_eq!(dispatch.leaf().args, vec!["sub_arg1"]);
//! ```
//!
//! # Process Concerns
//!
//! Reading `std::env::args`, choosing exit codes and installing a `tracing`
//! subscriber are left to the caller. The crate logs through `tracing` at
//! `debug` and `trace` level and never prints anything except flag
//! diagnostics to the configured sinks.

mod command;
mod dispatch;
mod error;
mod flags;
mod hooks;
mod output;

pub use command::{Command, CommandBuilder, Parsed};

pub use dispatch::{Dispatch, Outcome, Visit};

pub use error::DispatchError;

pub use flags::{FlagSet, MinArgs};

pub use hooks::{CommandContext, HookFn, HookPhase, HookScope, Hooks};

pub use output::OutputSink;
