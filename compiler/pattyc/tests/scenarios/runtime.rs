//! Generated code, executed.

use patty_diagnostic::ErrorCode;
use pattyc::PassConfig;
use pretty_assertions::assert_eq;

use crate::common::{compile, compile_with, eval, run, run_err};

const RESULT_UNION: &str = "
import { match, P } from 'ts-pattern';

const html = (result) => match(result)
    .with({ type: 'error', error: { foo: [1, 2] } }, () => '<p>Oups! An error occured</p>')
    .with({ type: 'ok', data: { type: 'text' } }, function (_) {
        return '<p>420</p>';
    })
    .with({ type: 'ok', data: { type: 'img', src: 'hi' } }, (res) => `<img src=${res.data.src} />`)
    .otherwise(() => 'idk bro');

const img = html({ type: 'ok', data: { type: 'img', src: 'hi' } });
const error = html({ type: 'error', error: { foo: [1, 2, 3] } });
const text = html({ type: 'ok', data: { type: 'text', content: 'x' } });
const other = html({ type: 'ok', data: { type: 'img', src: 'bye' } });
const short = html({ type: 'error', error: { foo: [1] } });
const missing = html(undefined);
";

#[test]
fn tagged_union_scenario() {
    assert_eq!(
        eval(RESULT_UNION, &["img", "error", "text", "other", "short", "missing"]),
        [
            "<img src=hi />",
            "<p>Oups! An error occured</p>",
            "<p>420</p>",
            "idk bro",
            "idk bro",
            "idk bro",
        ]
    );
}

#[test]
fn tagged_union_in_declaration_position() {
    let source = "
        import { match } from 'ts-pattern';
        const result = { type: 'error', error: { foo: [1, 2, 3] } };
        const html = match(result)
            .with({ type: 'error', error: { foo: [1, 2] } }, () => 'oops')
            .with({ type: 'ok', data: { type: 'text' } }, () => 'text')
            .otherwise(() => 'idk bro');
    ";
    assert_eq!(eval(source, &["html"]), ["oops"]);
}

#[test]
fn select_with_subpattern_gates_the_branch() {
    let source = "
        import { match, P } from 'ts-pattern';
        const f = (v) => match(v)
            .with({ id: P.select(P.string) }, (id) => `str:${id}`)
            .with({ id: P.select() }, (id) => `other:${id}`)
            .exhaustive();
        const a = f({ id: 'x' });
        const b = f({ id: 3 });
    ";
    assert_eq!(eval(source, &["a", "b"]), ["str:x", "other:3"]);
}

#[test]
fn named_selections_form_a_record() {
    let source = "
        import { match, P } from 'ts-pattern';
        const v = { a: 1, b: { c: 2 }, d: 3 };
        const r = match(v)
            .with({ a: P.select('a'), b: { c: P.select('c') } }, (sel, subject) => `${sel.a}-${sel.c}-${subject.d}`)
            .otherwise(() => 'none');
        const keys = match(v)
            .with({ b: { c: P.select('second') }, a: P.select('first') }, (sel) => JSON.stringify(sel))
            .run();
    ";
    assert_eq!(
        eval(source, &["r", "keys"]),
        ["1-2-3", r#"{"second":2,"first":1}"#]
    );
}

#[test]
fn subject_is_evaluated_once() {
    let source = "
        import { match } from 'ts-pattern';
        let calls = 0;
        const next = () => {
            calls += 1;
            return { kind: 'b', n: 2 };
        };
        const r = match(next())
            .with({ kind: 'a' }, () => 'a')
            .with({ kind: 'b', n: 1 }, () => 'b1')
            .with({ kind: 'b', n: 2 }, () => 'b2')
            .otherwise(() => 'none');
        const inline = [match(next()).with({ kind: 'a' }, () => 'a').otherwise((v) => v.n)][0];
    ";
    assert_eq!(eval(source, &["r", "inline", "calls"]), ["b2", "2", "2"]);
}

#[test]
fn first_matching_branch_wins() {
    let source = "
        import { match, P } from 'ts-pattern';
        const f = (v) => match(v)
            .with({ type: 'a' }, () => 'broad')
            .with({ type: 'a', n: 1 }, () => 'specific')
            .with(P._, () => 'any')
            .exhaustive();
        const a = f({ type: 'a', n: 1 });
        const b = f({ type: 'b' });
    ";
    assert_eq!(eval(source, &["a", "b"]), ["broad", "any"]);
}

#[test]
fn alternatives_are_tried_in_order() {
    let source = "
        import { match } from 'ts-pattern';
        const f = (v) => match(v)
            .with('a', 'b', (x) => `ab:${x}`)
            .with(1, 2, 3, (x) => `num:${x}`)
            .otherwise(() => 'none');
        const r = [f('b'), f(3), f('c')].join(',');
    ";
    assert_eq!(eval(source, &["r"]), ["ab:b,num:3,none"]);
}

#[test]
fn literal_forms() {
    let source = "
        import { match } from 'ts-pattern';
        const f = (v) => match(v)
            .with(-1, () => 'minus one')
            .with(NaN, () => 'nan')
            .with(undefined, () => 'undefined')
            .with(null, () => 'null')
            .with(true, () => 'true')
            .with(10n, () => 'bigint')
            .otherwise(() => 'other');
        const r = [f(-1), f(NaN), f(undefined), f(null), f(true), f(10n), f(false)].join(',');
    ";
    assert_eq!(
        eval(source, &["r"]),
        ["minus one,nan,undefined,null,true,bigint,other"]
    );
}

#[test]
fn type_tags() {
    let source = "
        import { match, P } from 'ts-pattern';
        const f = (v) => match(v)
            .with(P.string, () => 'string')
            .with(P.number, () => 'number')
            .with(P.boolean, () => 'boolean')
            .with(P.bigint, () => 'bigint')
            .with(P.nullish, () => 'nullish')
            .with(P.any, () => 'any')
            .exhaustive();
        const r = [f('s'), f(1), f(false), f(1n), f(null), f(undefined), f([])].join(',');
    ";
    assert_eq!(
        eval(source, &["r"]),
        ["string,number,boolean,bigint,nullish,nullish,any"]
    );
}

#[test]
fn arrays_match_by_prefix() {
    let source = "
        import { match, P } from 'ts-pattern';
        const f = (v) => match(v)
            .with([1, P.select()], (second) => `second:${second}`)
            .with([], () => 'array')
            .otherwise(() => 'not an array');
        const r = [f([1, 'x', 'y']), f([2]), f({ length: 2, 0: 1 }), f('12')].join(',');
    ";
    assert_eq!(
        eval(source, &["r"]),
        ["second:x,array,not an array,not an array"]
    );
}

#[test]
fn guards_run_after_structural_tests() {
    let source = "
        import { match, P } from 'ts-pattern';
        let guarded = 0;
        const big = (v) => {
            guarded += 1;
            return v.n > 10;
        };
        const f = (v) => match(v)
            .with({ n: P.number }, (v) => big(v), (v) => `big:${v.n}`)
            .with({ n: P.number }, (v) => `small:${v.n}`)
            .otherwise(() => 'none');
        const r = [f({ n: 20 }), f({ n: 2 }), f({ n: 'x' }), f(null)].join(',');
    ";
    assert_eq!(eval(source, &["r", "guarded"]), ["big:20,small:2,none,none", "2"]);
}

#[test]
fn block_bodies_return_through_the_sink() {
    let source = "
        import { match } from 'ts-pattern';
        const v = { kind: 'n', n: 5 };
        let r = match(v)
            .with({ kind: 'n' }, (x) => {
                if (x.n > 3) {
                    return 'large';
                }
                return 'small';
            })
            .with({ kind: 'e' }, () => {
                const unused = 1;
            })
            .otherwise(() => 'none');
        const e = match({ kind: 'e' })
            .with({ kind: 'e' }, () => {
                const unused = 1;
            })
            .otherwise(() => 'none');
        const nested = (() => {
            const inner = () => match(1).with(1, () => {
                const f = () => { return 'inner function'; };
                return f();
            }).run();
            return inner();
        })();
    ";
    assert_eq!(
        eval(source, &["r", "e", "nested"]),
        ["large", "undefined", "inner function"]
    );
}

#[test]
fn callable_handlers_receive_selection_and_subject() {
    let source = "
        import { match, P } from 'ts-pattern';
        const show = (sel, subject) => `${sel}/${subject.id}`;
        const plain = (subject) => `plain:${subject.id}`;
        const v = { id: 7 };
        const a = match(v).with({ id: P.select() }, show).run();
        const b = match(v).with({ id: 7 }, plain).run();
    ";
    assert_eq!(eval(source, &["a", "b"]), ["7/7", "plain:7"]);
}

#[test]
fn assignment_and_destructuring_contexts() {
    let source = "
        import { match } from 'ts-pattern';
        const obj = { out: null };
        let plain;
        plain = match(2).with(1, () => 'one').with(2, () => 'two').run();
        obj.out = match('a').with('a', () => 'A').run();
        const [first, second] = match(3).with(3, () => [30, 31]).otherwise(() => [0, 0]);
        let { x, y = 'default' } = match('p').with('p', () => ({ x: 'px' })).run();
        const out = obj.out;
    ";
    assert_eq!(
        eval(source, &["plain", "out", "first", "second", "x", "y"]),
        ["two", "A", "30", "31", "px", "default"]
    );
}

#[test]
fn handler_parameters_do_not_capture_the_assignment_target() {
    let source = "
        import { match } from 'ts-pattern';
        const a = [0, 0];
        let i = 0;
        const x = 1;
        a[i] = match(x).with(1, (i) => i * 10).otherwise(() => -1);
        const o = { k: 'outer', outer: 0, inner: 0 };
        o[o.k] = match(x).with(1, (o) => o + 1).otherwise(() => -1);
        const first = a[0];
        const second = a[1];
        const outer = o.outer;
        const inner = o.inner;
    ";
    assert_eq!(
        eval(source, &["first", "second", "outer", "inner"]),
        ["10", "0", "2", "0"]
    );
}

#[test]
fn nested_matches_compile_independently() {
    let source = "
        import { match, P } from 'ts-pattern';
        const f = (v) => match(v)
            .with({ type: 'pair', left: P.select('l'), right: P.select('r') }, ({ l, r }) => {
                const left = match(l).with(P.number, (n) => n * 2).otherwise(() => 0);
                return `${left}:${match(r).with(P.string, (s) => s.toUpperCase()).otherwise(() => '?')}`;
            })
            .otherwise(() => 'none');
        const r = [f({ type: 'pair', left: 2, right: 'x' }), f({ type: 'pair', left: 'a', right: 1 })].join(',');
    ";
    let code = compile(source);
    assert!(code.contains("__patty_1_"), "{code}");
    assert_eq!(run(&code, &["r"]), ["4:X,0:?"]);
}

#[test]
fn no_match_reports_the_subject() {
    let source = "
        import { match } from 'ts-pattern';
        let message;
        try {
            match({ type: 'x', n: [1, 2] }).with({ type: 'y' }, () => 1).run();
        } catch (e) {
            message = e.message;
        }
        let fallback;
        try {
            match(5n).with(1n, () => 1).run();
        } catch (e) {
            fallback = e.message;
        }
    ";
    assert_eq!(
        eval(source, &["message", "fallback"]),
        [
            r#"Pattern matching error: no pattern matches value {"type":"x","n":[1,2]}"#,
            "Pattern matching error: no pattern matches value 5",
        ]
    );
}

#[test]
fn no_match_is_uncaught_without_a_handler() {
    let code = compile(
        "import { match } from 'ts-pattern';\nconst r = match('z').with('a', () => 1).run();",
    );
    let err = run_err(&code);
    assert_eq!(err.code(), ErrorCode::E4001);
    assert_eq!(
        err.thrown_message().as_deref(),
        Some(r#"Pattern matching error: no pattern matches value "z""#)
    );
}

#[test]
fn exhaustive_omits_the_failure_path() {
    let source = "
        import { match } from 'ts-pattern';
        const r = match('z').with('a', () => 1).exhaustive();
        const s = match('z').with('a', () => 1).otherwise(() => 'fallback');
    ";
    let code = compile(source);
    assert!(!code.contains("Pattern matching error"), "{code}");
    assert_eq!(run(&code, &["r", "s"]), ["undefined", "fallback"]);
}

#[test]
fn null_safety_can_be_turned_off() {
    let source = "
        import { match } from 'ts-pattern';
        const r = match(null).with({ a: 1 }, () => 'a').otherwise(() => 'fallback');
    ";
    assert_eq!(eval(source, &["r"]), ["fallback"]);

    let mut config = PassConfig::default();
    config.codegen.null_safe = false;
    let code = compile_with(source, &config).code;
    assert!(!code.contains("?."), "{code}");
    assert_eq!(run_err(&code).code(), ErrorCode::E4002);
}
