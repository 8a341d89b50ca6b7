//! End-to-end script runs.

use std::io::Write;

use parley_cli::{CommandsFailed, DEMO_SCRIPT, Runner, parse, run_script};
use parley_core::{MediatorConfig, SenderPolicy};

#[test]
fn demo_transcript() {
    let outcome = run_script(DEMO_SCRIPT, MediatorConfig::default()).unwrap();
    assert_eq!(outcome.failed, 0);
    let lines = outcome.lines;

    insta::assert_snapshot!(lines.join("\n"), @r"
    Jaloliddin => Elena: Hi
    Elena => Jaloliddin: Hello!
    Eva => Jaloliddin: Hi everyone!
    Eva => Elena: Hi everyone!
    ");
}

#[test]
fn demo_transcript_including_sender() {
    let config = MediatorConfig::default().with_sender_policy(SenderPolicy::IncludeSender);
    let lines = run_script(DEMO_SCRIPT, config).unwrap().lines;

    insta::assert_snapshot!(lines.join("\n"), @r"
    Jaloliddin => Elena: Hi
    Elena => Jaloliddin: Hello!
    Eva => Jaloliddin: Hi everyone!
    Eva => Elena: Hi everyone!
    Eva => Eva: Hi everyone!
    ");
}

#[test]
fn script_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# late joiner misses the first broadcast").unwrap();
    writeln!(file, "register ann").unwrap();
    writeln!(file, "register bo").unwrap();
    writeln!(file, "broadcast ann first").unwrap();
    writeln!(file, "register cy").unwrap();
    writeln!(file, "broadcast ann second").unwrap();
    writeln!(file, "unregister bo").unwrap();
    writeln!(file, "send cy bo are you there").unwrap();
    writeln!(file, "send cy ann yes").unwrap();
    file.flush().unwrap();

    let source = std::fs::read_to_string(file.path()).unwrap();
    let outcome = run_script(&source, MediatorConfig::default()).unwrap();
    // `send cy bo` targets a member that already left.
    assert_eq!((outcome.failed, outcome.total), (1, 8));
    let lines = outcome.lines;

    insta::assert_snapshot!(lines.join("\n"), @r"
    ann => bo: first
    ann => bo: second
    ann => cy: second
    cy => ann: yes
    ");
}

#[test]
fn failed_commands_are_reported() {
    let outcome =
        run_script("register a\nsend a ghost hi\nunregister b\n", MediatorConfig::default())
            .unwrap();

    assert!(outcome.lines.is_empty());
    let err = outcome.check().unwrap_err();
    assert_eq!(err, CommandsFailed { failed: 2, total: 3 });
    assert_eq!(err.to_string(), "2 of 3 commands failed");
}

#[test]
fn parse_error_stops_before_running() {
    let err = run_script("register a\nbogus\n", MediatorConfig::default()).unwrap_err();
    assert_eq!(err.line, 2);
}

#[test]
fn runner_keeps_registration_order() {
    let mut runner = Runner::new(MediatorConfig::default());
    let commands = parse("register z\nregister a\nregister m\nbroadcast m hey\n").unwrap();
    assert_eq!(runner.run(&commands), 0);
    assert_eq!(runner.transcript().lines(), vec!["m => z: hey", "m => a: hey"]);
}
