//! What the pass does to source text.

use patty_diagnostic::{DiagnosticQueue, ErrorCode};
use patty_ir::StringInterner;
use pattyc::{compile_source, read_source, transform_program, DriverError, PassConfig};
use pretty_assertions::assert_eq;

use crate::common::{compile, compile_with, run};

#[test]
fn declaration_becomes_a_labeled_block() {
    assert_eq!(
        compile(
            "import { match } from 'ts-pattern';\nlet r = match(x).with('a', () => 1).otherwise(() => 2);"
        ),
        "\
import { match } from 'ts-pattern';
let r;
__patty_0_0: {
  if (x === 'a') {
    r = 1;
    break __patty_0_0;
  }
  {
    r = 2;
    break __patty_0_0;
  }
}
"
    );
}

#[test]
fn expression_position_becomes_an_iife() {
    let code = compile(
        "import { match } from 'ts-pattern';\nconsole.log(match(x).with(1, () => 'one').otherwise(() => 'other'));",
    );
    assert!(code.contains("console.log((() => {"), "{code}");
    assert!(!code.contains("match("), "{code}");
}

#[test]
fn files_without_the_import_are_untouched() {
    let source = "const r = match(x).with(1, () => 2).otherwise(() => 3);\n";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 0);
    assert_eq!(output.code, source);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn configured_names_without_discovery() {
    let source = "const x = 1;\nconst r = on(x).when(1, () => 2).otherwise(() => 3);";
    let mut config = PassConfig::with_bindings("on", None);
    config.chain.clause = "when".to_owned();
    let output = compile_with(source, &config);
    assert_eq!(output.rewritten, 1);
    assert!(!output.code.contains(".when("), "{}", output.code);
    assert_eq!(run(&output.code, &["r"]), ["2"]);
}

#[test]
fn aliased_import_is_followed() {
    let source = "
        import { match as m, P as Q } from 'ts-pattern';
        const match = () => 'not the matcher';
        const a = m('s').with(Q.string, () => 'string').run();
        const b = match();
    ";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 1);
    assert_eq!(run(&output.code, &["a", "b"]), ["string", "not the matcher"]);
}

#[test]
fn chains_without_a_terminal_are_left_alone() {
    let source = "
        import { match } from 'ts-pattern';
        const builder = match(x).with(1, () => 2);
        const value = builder.otherwise(() => 3);
    ";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 0);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn failures_are_reported_and_left_in_place() {
    let source = "
import { match, P } from 'ts-pattern';
const bad = match(x).with(P.when((v) => v > 1), () => 'big').otherwise(() => 'small');
const good = match(x).with(1, () => 'one').otherwise(() => 'other');
const unknown = match(x).with(2, () => 'two').orElse(() => 'other').run();
";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 1);
    let codes: Vec<ErrorCode> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E2004, ErrorCode::E2001]);
    assert!(output.diagnostics.iter().all(|d| d.is_warning()));
    assert!(output.code.contains("P.when((v) => v > 1)"), "{}", output.code);
    assert!(output.code.contains(".orElse("), "{}", output.code);
    assert!(!output.code.contains("with(1"), "{}", output.code);
}

#[test]
fn await_cannot_move_into_an_iife() {
    let source = "
import { match } from 'ts-pattern';
const f = async (x) => [match(x).with(1, () => 1).otherwise(await loadFallback())];
const g = async (x) => {
    const r = match(x).with(1, () => 1).otherwise(await loadFallback());
    return r;
};
";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 1);
    let codes: Vec<ErrorCode> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E3001]);
    assert!(output.code.contains(".otherwise(await loadFallback())]"), "{}", output.code);
}

#[test]
fn matches_in_subjects_and_defaults_are_compiled() {
    let source = "
        import { match } from 'ts-pattern';
        const pick = (v = match(0).with(0, () => 'zero').run()) => v;
        const outer = match(match(1).with(1, () => 'one').run())
            .with('one', () => 'outer saw one')
            .otherwise(() => 'no');
        const d = pick();
    ";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 3);
    assert_eq!(run(&output.code, &["outer", "d"]), ["outer saw one", "zero"]);
}

#[test]
fn matches_inside_control_flow() {
    let source = "
        import { match } from 'ts-pattern';
        let log = [];
        let i = 0;
        while (i < 3) {
            i += 1;
            if (i > 1) log.push(match(i).with(2, () => 'two').otherwise(() => 'many'));
            else {
                let label = match(i).with(1, () => 'one').run();
                log.push(label);
            }
        }
        try {
            throw match(i).with(3, () => 'three').run();
        } catch (e) {
            log.push(e);
        }
        const r = log.join(',');
    ";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 3);
    assert_eq!(run(&output.code, &["r"]), ["one,two,many,three"]);
}

#[test]
fn strip_import_after_full_compilation() {
    let mut config = PassConfig {
        strip_import: true,
        ..PassConfig::default()
    };
    let output = compile_with(
        "import { match, P } from 'ts-pattern';\nconst r = match(1).with(P.number, () => 'n').run();",
        &config,
    );
    assert!(output.code.starts_with("import { P } from 'ts-pattern';\n"), "{}", output.code);

    let output = compile_with(
        "import { match } from 'ts-pattern';\nconst r = match(1).with(P.when(f), () => 'n').run();",
        &config,
    );
    assert!(output.code.starts_with("import { match } from 'ts-pattern';\n"), "{}", output.code);

    config.discover_imports = false;
    let output = compile_with(
        "import { match } from 'ts-pattern';\nconst r = match(1).with(1, () => 'n').run();",
        &config,
    );
    assert!(!output.code.contains("import"), "{}", output.code);
}

#[test]
fn compiling_twice_is_identical() {
    let source = "
        import { match, P } from 'ts-pattern';
        const f = (v) => match(v).with({ a: P.select() }, (a) => a).otherwise(() => 0);
        const g = match(f({ a: 1 })).with(1, () => 'one').run();
    ";
    let first = compile(source);
    assert_eq!(compile(source), first);
}

#[test]
fn transform_program_reports_into_the_queue() {
    let source = "import { match } from 'ts-pattern';\nmatch(x).with(1, 2).run();";
    let interner = StringInterner::new();
    let parsed = patty_parse::parse(source, &interner).unwrap();
    let (mut program, mut arena) = (parsed.program, parsed.arena);
    let mut queue = DiagnosticQueue::new();
    let rewritten = transform_program(
        &mut program,
        &mut arena,
        &interner,
        &PassConfig::default(),
        &mut queue,
    );
    assert_eq!(rewritten, 0);
    assert_eq!(queue.warning_count(), 1);
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn parse_errors_fail_the_file() {
    let err = compile_source("const = 1;", &PassConfig::default()).unwrap_err();
    assert!(matches!(err, DriverError::Parse(_)), "{err:?}");
    assert!(err.code().is_parser_error());
    assert!(err.to_diagnostic().is_error());
}

#[test]
fn read_source_reports_io_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.ts");
    std::fs::write(&path, "const a = 1;\n").unwrap();
    assert_eq!(read_source(&path).unwrap(), "const a = 1;\n");

    let missing = dir.path().join("missing.ts");
    let err = read_source(&missing).unwrap_err();
    assert!(matches!(err, DriverError::Io { action: "read", .. }), "{err:?}");
    assert_eq!(err.code(), ErrorCode::E9003);
    assert!(err.to_string().starts_with("cannot read `"), "{err}");
}

#[test]
fn block_comments_do_not_stop_compilation() {
    let source = "
        /** Renders a status. */
        import { match } from 'ts-pattern';
        /* multi
           line */
        const r = match(1).with(1, /* inline */ () => 'one').run();
    ";
    let output = compile_with(source, &PassConfig::default());
    assert_eq!(output.rewritten, 1);
    assert_eq!(run(&output.code, &["r"]), ["one"]);

    let err = compile_source("const a = 1; /* open", &PassConfig::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E0006);
}
