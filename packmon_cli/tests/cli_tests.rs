use packmon_cli::{dispatch_line, Cli, Command, Dispatch};

/// Records what the handlers were called with.
#[derive(Default)]
struct Log {
    calls: Vec<(String, Vec<String>)>,
}

fn record(log: &mut Log, name: &str, args: &[&str]) {
    log.calls
        .push((name.into(), args.iter().map(|a| a.to_string()).collect()));
}

fn ok_cmd(log: &mut Log, args: &[&str]) -> i8 {
    record(log, "ok", args);
    0
}

fn two_args_cmd(log: &mut Log, args: &[&str]) -> i8 {
    record(log, "two", args);
    if args.len() != 2 {
        return -1;
    }
    0
}

const TABLE: &[Command<Log>] = &[
    Command {
        name: "ok",
        handler: ok_cmd,
    },
    Command {
        name: "two",
        handler: two_args_cmd,
    },
];

fn feed(cli: &mut Cli, log: &mut Log, input: &str) -> Vec<Dispatch> {
    input
        .bytes()
        .map(|b| cli.push(b, TABLE, log))
        .collect()
}

#[test]
fn dispatches_with_arguments() {
    let mut log = Log::default();
    let result = dispatch_line("two 0 4100", TABLE, &mut log);
    assert_eq!(result, Dispatch::Done(0));
    assert_eq!(log.calls, vec![("two".into(), vec!["0".into(), "4100".into()])]);
}

#[test]
fn usage_errors_propagate_as_negative_codes() {
    let mut log = Log::default();
    assert_eq!(dispatch_line("two 0", TABLE, &mut log), Dispatch::Done(-1));
}

#[test]
fn unknown_and_empty_lines() {
    let mut log = Log::default();
    assert_eq!(dispatch_line("nope", TABLE, &mut log), Dispatch::Unknown);
    assert_eq!(dispatch_line("", TABLE, &mut log), Dispatch::Empty);
    assert_eq!(dispatch_line("   ", TABLE, &mut log), Dispatch::Empty);
    assert!(log.calls.is_empty());
}

#[test]
fn extra_whitespace_is_collapsed() {
    let mut log = Log::default();
    assert_eq!(
        dispatch_line("  ok   a  \t b ", TABLE, &mut log),
        Dispatch::Done(0)
    );
    assert_eq!(log.calls, vec![("ok".into(), vec!["a".into(), "b".into()])]);
}

#[test]
fn line_feeds_terminate_like_carriage_returns() {
    let mut cli = Cli::new();
    let mut log = Log::default();

    let results = feed(&mut cli, &mut log, "ok\r");
    assert_eq!(*results.last().unwrap(), Dispatch::Done(0));

    let results = feed(&mut cli, &mut log, "ok\n");
    assert_eq!(*results.last().unwrap(), Dispatch::Done(0));
    assert_eq!(log.calls.len(), 2);
}

#[test]
fn crlf_reports_one_command_and_one_empty() {
    let mut cli = Cli::new();
    let mut log = Log::default();
    let results = feed(&mut cli, &mut log, "ok\r\n");
    assert_eq!(results[results.len() - 2], Dispatch::Done(0));
    assert_eq!(results[results.len() - 1], Dispatch::Empty);
    assert_eq!(log.calls.len(), 1);
}

#[test]
fn backspace_edits_the_line() {
    let mut cli = Cli::new();
    let mut log = Log::default();
    // "oj" corrected to "ok"
    feed(&mut cli, &mut log, "oj\x08k\r");
    assert_eq!(log.calls.len(), 1);
    assert_eq!(log.calls[0].0, "ok");
}

#[test]
fn overlong_line_is_discarded_and_buffer_recovers() {
    let mut cli: Cli<8> = Cli::new();
    let mut log = Log::default();

    let mut overflowed = false;
    for b in b"0123456789" {
        if cli.push(*b, TABLE, &mut log) == Dispatch::Overflow {
            overflowed = true;
        }
    }
    assert!(overflowed);

    // next line still parses
    for b in b"\rok\r" {
        cli.push(*b, TABLE, &mut log);
    }
    assert_eq!(log.calls.len(), 1);
}

#[test]
fn too_many_tokens_overflow() {
    let mut log = Log::default();
    assert_eq!(
        dispatch_line("ok 1 2 3 4 5 6 7 8", TABLE, &mut log),
        Dispatch::Overflow
    );
    assert!(log.calls.is_empty());
}
