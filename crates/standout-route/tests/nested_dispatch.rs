use clap::{Arg, ArgAction};
use standout_route::{Command, CommandBuilder, Hooks, OutputSink};
use std::sync::{Arc, Mutex};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn reference_args() -> Vec<String> {
    strings(&[
        "--flag",
        "arg1",
        "arg2",
        "sub-command",
        "--sub-flag",
        "sub_flag_value",
        "sub_arg1",
        "sub-sub-command",
    ])
}

fn sub_command() -> CommandBuilder {
    Command::builder("Sub-Command")
        .min_args(1)
        .flag(Arg::new("sub-flag").long("sub-flag").action(ArgAction::Set))
}

fn root() -> CommandBuilder {
    Command::builder("app")
        .min_args(2)
        .flag(Arg::new("flag").long("flag").action(ArgAction::SetTrue))
}

// Reference tree: sub-sub-command lives under sub-command
#[test]
fn test_three_level_split() {
    let root = root()
        .add_command(sub_command().add_command(Command::builder("Sub-Sub-Command")))
        .build();

    let dispatch = root.execute(reference_args()).unwrap();

    let top = dispatch.root();
    assert_eq!(top.args, strings(&["arg1", "arg2"]));
    assert_eq!(
        top.tail,
        strings(&[
            "sub-command",
            "--sub-flag",
            "sub_flag_value",
            "sub_arg1",
            "sub-sub-command",
        ])
    );

    let sub = dispatch.visit(&["sub-command"]).unwrap();
    assert_eq!(sub.args, strings(&["sub_arg1"]));
    assert_eq!(sub.tail, strings(&["sub-sub-command"]));

    let leaf = dispatch.leaf();
    assert_eq!(leaf.path, strings(&["sub-command", "sub-sub-command"]));
    assert!(leaf.args.is_empty());
    assert!(leaf.tail.is_empty());
    assert!(dispatch.outcome().is_ran());
}

// Sibling registration: sub-command has no children, so its tail is dropped
#[test]
fn test_sibling_registration_drops_sub_tail() {
    let root = root()
        .add_command(sub_command())
        .add_command(Command::builder("Sub-Sub-Command"))
        .build();

    let dispatch = root.execute(reference_args()).unwrap();

    let sub = dispatch.visit(&["sub-command"]).unwrap();
    assert_eq!(sub.args, strings(&["sub_arg1"]));
    assert_eq!(sub.tail, strings(&["sub-sub-command"]));
    assert_eq!(dispatch.visits().len(), 2);
    assert!(dispatch.outcome().is_unmatched());
}

#[test]
fn test_flag_values_reach_their_own_level() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let root_seen = seen.clone();
    let sub_seen = seen.clone();
    let root = root()
        .hooks(Hooks::new().pre_parse(move |ctx| {
            root_seen
                .lock()
                .unwrap()
                .push(format!("root flag={}", ctx.get_flag("flag")));
        }))
        .add_command(
            sub_command()
                .hooks(Hooks::new().pre_parse(move |ctx| {
                    let value = ctx.get_one::<String>("sub-flag").cloned();
                    sub_seen
                        .lock()
                        .unwrap()
                        .push(format!("sub sub-flag={}", value.unwrap_or_default()));
                }))
                .add_command(Command::builder("Sub-Sub-Command")),
        )
        .build();

    root.execute(reference_args()).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["root flag=true", "sub sub-flag=sub_flag_value"]
    );
}

#[test]
fn test_root_flag_after_child_name_belongs_to_child() {
    let root = root()
        .add_command(sub_command().add_command(Command::builder("Sub-Sub-Command")))
        .build();

    // --flag is not declared on sub-command
    let sink = OutputSink::buffer();
    let root_with_sink = Command::builder("app")
        .output(sink.clone())
        .add_command(sub_command())
        .build();

    let err = root_with_sink
        .execute(["sub-command", "--flag", "x"])
        .unwrap_err();
    assert!(err.is_flag_error());
    assert_eq!(err.command(), "Sub-Command");
    assert!(sink.contents().unwrap().contains("--flag"));

    // and the original tree still routes fine afterwards
    assert!(root.execute(reference_args()).is_ok());
}

#[test]
fn test_missing_root_args_stop_everything() {
    let ran = Arc::new(Mutex::new(false));
    let ran_clone = ran.clone();
    let root = root()
        .add_command(sub_command().hooks(Hooks::new().run(move |_| {
            *ran_clone.lock().unwrap() = true;
        })))
        .build();

    let err = root.execute(["--flag", "only-one"]).unwrap_err();

    assert!(!err.is_flag_error());
    assert!(!*ran.lock().unwrap());
}

#[test]
fn test_sub_command_run_receives_its_args() {
    let seen = Arc::new(Mutex::new(None));
    let seen_clone = seen.clone();
    let root = root()
        .add_command(sub_command().hooks(Hooks::new().run(move |ctx| {
            *seen_clone.lock().unwrap() = Some(ctx.args().to_vec());
        })))
        .build();

    root.execute(["a", "b", "sub-command", "only"]).unwrap();

    assert_eq!(*seen.lock().unwrap(), Some(strings(&["only"])));
}
