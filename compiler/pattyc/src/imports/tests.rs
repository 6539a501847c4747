use super::*;
use pretty_assertions::assert_eq;

fn parse(source: &str, interner: &StringInterner) -> (Program, ExprArena) {
    let parsed = patty_parse::parse(source, interner).unwrap();
    (parsed.program, parsed.arena)
}

#[test]
fn discovers_aliased_names() {
    let interner = StringInterner::new();
    let (program, arena) = parse(
        "import { P as Pat, match as m } from 'ts-pattern';\nm(x).run();",
        &interner,
    );
    let found = discover(program, &arena, &interner);
    assert_eq!(found.matcher, Some(interner.intern("m")));
    assert_eq!(found.patterns, Some(interner.intern("Pat")));
}

#[test]
fn pattern_is_an_alias_of_p() {
    let interner = StringInterner::new();
    let (program, arena) = parse("import { match, Pattern } from 'ts-pattern';", &interner);
    let found = discover(program, &arena, &interner);
    assert_eq!(found.patterns, Some(interner.intern("Pattern")));
}

#[test]
fn other_modules_are_ignored() {
    let interner = StringInterner::new();
    let (program, arena) = parse(
        "import { match } from 'not-ts-pattern';\nimport match2 from 'ts-pattern';",
        &interner,
    );
    assert_eq!(discover(program, &arena, &interner), Discovered::default());
    assert_eq!(
        resolve(program, &arena, &interner, &PassConfig::default()),
        None
    );
}

#[test]
fn resolve_without_discovery_uses_configured_names() {
    let interner = StringInterner::new();
    let (program, arena) = parse("import { match as m } from 'ts-pattern';", &interner);
    let config = PassConfig::with_bindings("matchOn", None);
    let names = resolve(program, &arena, &interner, &config).unwrap();
    assert_eq!(names.matcher, interner.intern("matchOn"));
    assert_eq!(names.patterns, None);
}

#[test]
fn strip_removes_only_the_matcher() {
    let interner = StringInterner::new();
    let (mut program, mut arena) = parse(
        "import { match, P } from 'ts-pattern';\nconst s = P;",
        &interner,
    );
    let matcher = interner.intern("match");
    assert!(strip_matcher_import(&mut program, &mut arena, &interner, matcher));
    assert_eq!(
        patty_fmt::print_program(program, &arena, &interner),
        "import { P } from 'ts-pattern';\nconst s = P;\n"
    );
}

#[test]
fn strip_drops_an_emptied_import() {
    let interner = StringInterner::new();
    let (mut program, mut arena) = parse(
        "import { match } from 'ts-pattern';\nconst x = 1;",
        &interner,
    );
    let matcher = interner.intern("match");
    assert!(strip_matcher_import(&mut program, &mut arena, &interner, matcher));
    assert_eq!(
        patty_fmt::print_program(program, &arena, &interner),
        "const x = 1;\n"
    );
}

#[test]
fn strip_keeps_a_referenced_matcher() {
    let interner = StringInterner::new();
    let (mut program, mut arena) = parse(
        "import { match } from 'ts-pattern';\nconst f = () => match(1);",
        &interner,
    );
    let before = program;
    let matcher = interner.intern("match");
    assert!(!strip_matcher_import(&mut program, &mut arena, &interner, matcher));
    assert_eq!(program, before);
}
