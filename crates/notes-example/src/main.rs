//! Sample note-taking CLI built on `standout-route`.
//!
//! This is a SAMPLE application. It does not store anything; each command
//! prints what it would do. It shows the parts a binary owns: reading the
//! process arguments, installing a log subscriber, writing to stdout and
//! turning dispatch errors into exit codes.
//!
//! ```text
//! notes [--trace]
//!   add <text...>
//!   list [--limit N] [--all]
//!   tag <id>
//!     set <tag>
//!     clear
//! ```
//!
//! Set `RUST_LOG=standout_route=debug` to watch the routing.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::bail;
use clap::{Arg, ArgAction};
use standout_route::{Command, CommandBuilder, DispatchError, Hooks, Outcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn add_command() -> CommandBuilder {
    Command::builder("add")
        .min_args(-1)
        .hooks(Hooks::new().run(|ctx| {
            let text = ctx.args().join(" ");
            info!(%text, "adding note");
            println!("added: {}", text);
        }))
}

fn list_command() -> CommandBuilder {
    Command::builder("list")
        .flag(
            Arg::new("limit")
                .long("limit")
                .short('n')
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .flag(Arg::new("all").long("all").action(ArgAction::SetTrue))
        .hooks(Hooks::new().run(|ctx| {
            if ctx.get_flag("all") {
                println!("listing all notes");
            } else {
                let limit = ctx.get_one::<usize>("limit").copied().unwrap_or(10);
                println!("listing up to {} notes", limit);
            }
        }))
}

fn tag_command() -> CommandBuilder {
    Command::builder("tag")
        .min_args(1)
        .hooks(
            Hooks::new()
                .pre_parse(|ctx| info!(note = %ctx.args()[0], "selecting note"))
                .run(|ctx| println!("note {} selected, nothing to do", ctx.args()[0])),
        )
        .add_command(Command::builder("set").min_args(1).hooks(Hooks::new().run(|ctx| {
            println!("tagged with {}", ctx.args()[0]);
        })))
        .add_command(Command::builder("clear").hooks(Hooks::new().run(|_| {
            println!("cleared tags");
        })))
}

/// Builds the command tree. `trace` is raised when `--trace` is given.
fn build_tree(trace: Arc<AtomicBool>) -> Command {
    Command::builder("notes")
        .flag(Arg::new("trace").long("trace").action(ArgAction::SetTrue))
        .hooks(
            Hooks::new()
                .pre_parse(move |ctx| trace.store(ctx.get_flag("trace"), Ordering::Relaxed))
                .run(|ctx| {
                    let mut names: Vec<&str> =
                        ctx.command().commands().map(|(key, _)| key).collect();
                    names.sort_unstable();
                    println!("commands: {}", names.join(", "));
                }),
        )
        .add_command(add_command())
        .add_command(list_command())
        .add_command(tag_command())
        .build()
}

fn run(args: Vec<String>) -> anyhow::Result<()> {
    let trace = Arc::new(AtomicBool::new(false));
    let root = build_tree(trace.clone());

    let dispatch = root.execute(args)?;

    if trace.load(Ordering::Relaxed) {
        println!("{}", serde_json::to_string_pretty(&dispatch)?);
    }
    if let Outcome::Unmatched { name, .. } = dispatch.outcome() {
        bail!("unknown command '{}'", name);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<DispatchError>() {
                // clap already rendered the diagnostic to stderr
                Some(DispatchError::FlagParse { .. }) => {}
                _ => eprintln!("notes: {}", err),
            }
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Command, Arc<AtomicBool>) {
        let trace = Arc::new(AtomicBool::new(false));
        (build_tree(trace.clone()), trace)
    }

    #[test]
    fn test_add_takes_all_words() {
        let (root, _) = tree();
        let dispatch = root.execute(["add", "buy", "oat", "milk"]).unwrap();
        assert_eq!(dispatch.leaf().command, "add");
        assert_eq!(dispatch.leaf().args, vec!["buy", "oat", "milk"]);
    }

    #[test]
    fn test_nested_tag_set() {
        let (root, _) = tree();
        let dispatch = root.execute(["tag", "12", "set", "urgent"]).unwrap();
        assert_eq!(dispatch.outcome().path(), ["tag", "set"]);
        assert_eq!(dispatch.visit(&["tag"]).unwrap().args, vec!["12"]);
        assert_eq!(dispatch.leaf().args, vec!["urgent"]);
    }

    #[test]
    fn test_trace_flag_is_observed() {
        let (root, trace) = tree();
        root.execute(["--trace", "list", "-n", "3"]).unwrap();
        assert!(trace.load(Ordering::Relaxed));
    }

    #[test]
    fn test_list_rejects_bad_limit() {
        let (root, _) = tree();
        let err = root.execute(["list", "--limit", "many"]).unwrap_err();
        assert!(err.is_flag_error());
        assert_eq!(err.command(), "list");
    }

    #[test]
    fn test_unknown_command_is_reported_by_binding() {
        let err = run(vec!["archive".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "unknown command 'archive'");
    }

    #[test]
    fn test_tag_without_id_fails() {
        let err = run(vec!["tag".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DispatchError>(),
            Some(DispatchError::InsufficientArgs { .. })
        ));
    }
}
