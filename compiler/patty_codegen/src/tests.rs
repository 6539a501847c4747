use super::*;
use patty_diagnostic::ErrorCode;
use patty_ir::matching::MatchIr;
use patty_ir::{AssignOp, BindingKind, ExprArena, ExprId, ExprKind, StmtId, StmtKind, StringInterner};
use patty_lower::{ChainNames, LowerContext};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The match call and its output context, for a one-statement program.
fn site(arena: &ExprArena, stmt: StmtId) -> (ExprId, OutputContext) {
    match arena.stmt_kind(stmt) {
        StmtKind::VarDecl { kind, declarators } => {
            let decl = arena.list(declarators)[0];
            let context = match arena.get_binding(decl.target).kind {
                BindingKind::Ident(name) => OutputContext::VarDecl { kind, name },
                _ => OutputContext::PatternVarDecl {
                    kind,
                    target: decl.target,
                },
            };
            (decl.init.unwrap(), context)
        }
        StmtKind::Expr(expr) => match arena.expr_kind(expr) {
            ExprKind::Assign {
                op: AssignOp::Assign,
                target,
                value,
            } => (value, OutputContext::Assignment { target }),
            _ => (expr, OutputContext::Iife),
        },
        other => panic!("unexpected statement {other:?}"),
    }
}

fn lower(arena: &ExprArena, interner: &StringInterner, call: ExprId) -> MatchIr {
    let chain = ChainNames::default();
    let cx = LowerContext::new(
        arena,
        interner,
        interner.intern("match"),
        Some(interner.intern("P")),
        &chain,
    );
    patty_lower::lower_match(&cx, call).unwrap().unwrap()
}

fn compile_with(
    source: &str,
    options: CodegenOptions,
    cost: &dyn CostModel,
) -> Result<String, CodegenError> {
    let interner = StringInterner::new();
    let parsed = patty_parse::parse(source, &interner).unwrap();
    let mut arena = parsed.arena;
    let stmt = arena.list(parsed.program.body)[0];
    let (call, context) = site(&arena, stmt);
    let ir = lower(&arena, &interner, call);

    let generated = Codegen::new(&mut arena, &interner, options)
        .with_cost_model(cost)
        .generate(&ir, context, 0)?;
    let stmts = match generated {
        Generated::Expr(expr) => {
            let replacement = *arena.get_expr(expr);
            arena.set_expr(call, replacement);
            arena.alloc_list([stmt])
        }
        Generated::Stmts(stmts) => arena.alloc_list(stmts),
    };
    Ok(patty_fmt::print_stmts(stmts, &arena, &interner))
}

fn compile(source: &str) -> String {
    compile_with(source, CodegenOptions::default(), &IdentOnly).unwrap()
}

fn compile_err(source: &str) -> CodegenError {
    compile_with(source, CodegenOptions::default(), &IdentOnly).unwrap_err()
}

// ── Output contexts ─────────────────────────────────────────────────

#[test]
fn var_decl_assigns_and_breaks() {
    assert_eq!(
        compile("let r = match(x).with('a', () => 1).otherwise(() => 2);"),
        "\
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
fn expression_position_uses_an_arrow() {
    assert_eq!(
        compile("match(x).with(1, (v) => v + 1).run();"),
        "\
(() => {
  if (x === 1) {
    let v = x;
    return v + 1;
  }
  let __patty_0_0;
  try {
    __patty_0_0 = JSON.stringify(x);
  } catch (__patty_0_1) {
    __patty_0_0 = x;
  }
  throw new Error(`Pattern matching error: no pattern matches value ${__patty_0_0}`);
})();
"
    );
}

#[test]
fn const_declaration_goes_through_a_temporary() {
    assert_eq!(
        compile(
            "const out = match(getValue()).with({ type: 'ok', data: P.select() }, (d) => d).exhaustive();"
        ),
        "\
let __patty_0_0;
__patty_0_1: {
  const __patty_0_2 = getValue();
  if (__patty_0_2?.type === 'ok') {
    let d = __patty_0_2?.data;
    __patty_0_0 = d;
    break __patty_0_1;
  }
}
const out = __patty_0_0;
"
    );
}

#[test]
fn destructuring_declaration_rebinds_at_the_end() {
    assert_eq!(
        compile("const [a, b] = match(p).with([P._, 2], (t) => t).otherwise(() => [0, 0]);"),
        "\
let __patty_0_0;
__patty_0_1: {
  if (Array.isArray(p) && p?.length >= 2 && p?.[1] === 2) {
    let t = p;
    __patty_0_0 = t;
    break __patty_0_1;
  }
  {
    __patty_0_0 = [0, 0];
    break __patty_0_1;
  }
}
const [a, b] = __patty_0_0;
"
    );
}

#[test]
fn assignment_rewrites_returns_in_block_bodies() {
    assert_eq!(
        compile(
            "out = match(v).with({ kind: 'pair', a: P.select('a'), b: { c: P.select('c') } }, \
             (sel, whole) => { if (sel.a) { return sel.c; } return whole; }).run();"
        ),
        "\
__patty_0_0: {
  if (v?.kind === 'pair') {
    let sel = { a: v?.a, c: v?.b?.c };
    let whole = v;
    if (sel.a) {
      out = sel.c;
      break __patty_0_0;
    }
    out = whole;
    break __patty_0_0;
  }
  let __patty_0_1;
  try {
    __patty_0_1 = JSON.stringify(v);
  } catch (__patty_0_2) {
    __patty_0_1 = v;
  }
  throw new Error(`Pattern matching error: no pattern matches value ${__patty_0_1}`);
}
"
    );
}

// ── Branch tests ────────────────────────────────────────────────────

#[test]
fn guards_alternatives_and_type_tags() {
    assert_eq!(
        compile(
            "match(n).with(P.number, (k) => k > 2, (k) => k * 2).with('a', 'b', () => 'ab')\
             .with(P.nullish, () => null).exhaustive();"
        ),
        "\
(() => {
  if (typeof n === 'number' && ((k) => k > 2)(n)) {
    let k = n;
    return k * 2;
  }
  if (n === 'a' || n === 'b') {
    return 'ab';
  }
  if (n == null) {
    return null;
  }
})();
"
    );
}

#[test]
fn literal_tests() {
    let out = compile(
        "match(x).with(NaN, () => 1).with(undefined, () => 2).with(true, () => 3)\
         .with(-1, () => 4).with(10n, () => 5).with(null, () => 6).exhaustive();",
    );
    for test in [
        "if (Number.isNaN(x)) {",
        "if (x === undefined) {",
        "if (x === true) {",
        "if (x === -1) {",
        "if (x === 10n) {",
        "if (x === null) {",
    ] {
        assert!(out.contains(test), "missing `{test}` in:\n{out}");
    }
}

#[test]
fn plain_access_without_null_safety() {
    let out = compile_with(
        "match(x).with({ a: [1] }, () => 1).exhaustive();",
        CodegenOptions { null_safe: false },
        &IdentOnly,
    )
    .unwrap();
    assert!(out.contains("if (Array.isArray(x.a) && x.a.length >= 1 && x.a[0] === 1) {"));
}

#[test]
fn non_identifier_keys_use_index_access() {
    let out = compile("match(x).with({ 'content-type': 'json' }, () => 1).exhaustive();");
    assert!(out.contains("if (x?.['content-type'] === 'json') {"), "{out}");
}

#[test]
fn wildcard_branch_ends_the_chain() {
    assert_eq!(
        compile("let r = match(x).with(1, () => 1).with(P._, () => 2).with(3, () => 3).run();"),
        "\
let r;
__patty_0_0: {
  if (x === 1) {
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

// ── Subject caching ─────────────────────────────────────────────────

#[test]
fn shadowing_parameter_forces_a_cache() {
    assert_eq!(
        compile("match(x).with(1, (x) => x + 1).exhaustive();"),
        "\
((__patty_0_0) => {
  if (__patty_0_0 === 1) {
    let x = __patty_0_0;
    return x + 1;
  }
})(x);
"
    );
}

#[test]
fn cost_model_decides_field_access_caching() {
    let source = "match(a.b).with(1, () => 1).exhaustive();";
    let cached = compile_with(source, CodegenOptions::default(), &IdentOnly).unwrap();
    assert!(cached.starts_with("((__patty_0_0) => {"), "{cached}");
    assert!(cached.ends_with("})(a.b);\n"), "{cached}");

    let trusted = compile_with(source, CodegenOptions::default(), &TrustFieldAccess).unwrap();
    assert!(trusted.contains("if (a.b === 1) {"), "{trusted}");
}

// ── Handlers ────────────────────────────────────────────────────────

#[test]
fn callable_handlers_receive_selection_then_subject() {
    let out = compile("match(x).with({ a: P.select(P.string) }, handle).otherwise(fallback);");
    assert!(out.contains("if (typeof x?.a === 'string') {"), "{out}");
    assert!(out.contains("return handle(x?.a, x);"), "{out}");
    assert!(out.contains("return fallback(x);"), "{out}");
}

#[test]
fn untested_branch_is_unconditional() {
    let out = compile("match(x).with({ a: P.select() }, handle).otherwise(fallback);");
    assert!(out.contains("return handle(x?.a, x);"), "{out}");
    assert!(!out.contains("if ("), "{out}");
    assert!(!out.contains("fallback"), "{out}");
}

#[test]
fn unsafe_handlers_are_called_not_inlined() {
    let out = compile("match(x).with(1, async (v) => v).exhaustive();");
    assert!(out.contains("return (async (v) => v)(x);"), "{out}");

    let out = compile("match(x).with(1, function (v) { return this.y + v; }).exhaustive();");
    assert!(out.contains("return (function (v) {"), "{out}");

    let out = compile("match(x).with(1, (v = 2) => v).exhaustive();");
    assert!(out.contains("return ((v = 2) => v)(x);"), "{out}");
}

#[test]
fn handler_shadowing_the_output_is_called() {
    let out = compile("let r = match(x).with(1, () => { let r = 2; return r; }).run();");
    assert!(out.contains("r = (() => {"), "{out}");
    assert!(!out.contains("let r = 2;\n    r = r;"), "{out}");
}

#[test]
fn nested_function_returns_are_kept() {
    let out = compile(
        "let r = match(x).with(1, () => { const g = () => { return 2; }; return g(); }).run();",
    );
    assert!(out.contains("return 2;"), "{out}");
    assert!(out.contains("r = g();"), "{out}");
}

#[test]
fn block_body_that_falls_off_delivers_undefined() {
    let out = compile("let r = match(x).with(1, (v) => { log(v); }).exhaustive();");
    assert!(out.contains("log(v);\n    r = undefined;\n    break __patty_0_0;"), "{out}");
}

#[test]
fn extra_parameters_without_values_are_declared() {
    let out = compile("match(x).with({ a: P.select() }, (a, whole, extra) => a).exhaustive();");
    assert!(out.contains("let a = x?.a;\n    let whole = x;\n    let extra;"), "{out}");
}

// ── Errors ──────────────────────────────────────────────────────────

#[test]
fn literal_handler_is_rejected() {
    let err = compile_err("match(x).with(1, 'one').run();");
    assert_eq!(err.code(), ErrorCode::E3002);
    assert_eq!(err.to_string(), "string literal cannot be used as a handler");
}

#[test]
fn await_cannot_move_into_the_arrow() {
    let err = compile_err("match(x).with(1, await load).run();");
    assert_eq!(err.code(), ErrorCode::E3001);
    // Statement contexts keep the `await` where it was.
    assert!(compile_with(
        "let r = match(x).with(1, await load).run();",
        CodegenOptions::default(),
        &IdentOnly
    )
    .is_ok());
}

// ── Properties ──────────────────────────────────────────────────────

#[test]
fn generation_leaves_the_original_tree_alone() {
    let interner = StringInterner::new();
    let source = "let r = match(x).with(1, (v) => { if (v) { return 1; } return 2; }).run();";
    let parsed = patty_parse::parse(source, &interner).unwrap();
    let mut arena = parsed.arena;
    let before = patty_fmt::print_program(parsed.program, &arena, &interner);
    let stmt = arena.list(parsed.program.body)[0];
    let (call, context) = site(&arena, stmt);
    let ir = lower(&arena, &interner, call);
    Codegen::new(&mut arena, &interner, CodegenOptions::default())
        .generate(&ir, context, 0)
        .unwrap();
    assert_eq!(patty_fmt::print_program(parsed.program, &arena, &interner), before);
}

fn chain_source(values: &[u8]) -> String {
    let mut source = String::from("let r = match(x)");
    for (i, value) in values.iter().enumerate() {
        source.push_str(&format!(".with({value}, () => {i})"));
    }
    source.push_str(".run();");
    source
}

proptest! {
    #[test]
    fn branch_tests_follow_declaration_order(values in prop::collection::vec(0u8..50, 1..12)) {
        let out = compile(&chain_source(&values));
        let mut from = 0;
        for (i, value) in values.iter().enumerate() {
            let test = format!("if (x === {value}) {{\n    r = {i};");
            let found = out[from..].find(&test);
            prop_assert!(found.is_some(), "branch {} out of order in:\n{}", i, out);
            from += found.unwrap() + test.len();
        }
    }

    #[test]
    fn generating_twice_is_identical(values in prop::collection::vec(0u8..50, 1..8)) {
        let interner = StringInterner::new();
        let source = chain_source(&values);
        let parsed = patty_parse::parse(&source, &interner).unwrap();
        let mut arena = parsed.arena;
        let stmt = arena.list(parsed.program.body)[0];
        let (call, context) = site(&arena, stmt);
        let ir = lower(&arena, &interner, call);

        let mut printed = Vec::new();
        for _ in 0..2 {
            let Generated::Stmts(stmts) = Codegen::new(&mut arena, &interner, CodegenOptions::default())
                .generate(&ir, context, 0)
                .unwrap()
            else {
                panic!("declarations produce statements");
            };
            let stmts = arena.alloc_list(stmts);
            printed.push(patty_fmt::print_stmts(stmts, &arena, &interner));
        }
        prop_assert_eq!(&printed[0], &printed[1]);
    }
}
