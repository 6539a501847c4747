use super::*;
use patty_diagnostic::ErrorCode;
use patty_ir::matching::{Handler, LiteralPattern, Pattern, SelectBinding, TypeTag};
use patty_ir::{ExprArena, ExprKind, StringInterner};
use pretty_assertions::assert_eq;

struct Fixture {
    arena: ExprArena,
    interner: StringInterner,
    root: ExprId,
    chain: ChainNames,
}

impl Fixture {
    fn new(source: &str) -> Self {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let root = patty_parse::parse_expression(source, &mut arena, &interner).unwrap();
        Fixture {
            arena,
            interner,
            root,
            chain: ChainNames::default(),
        }
    }

    fn cx(&self) -> LowerContext<'_> {
        LowerContext::new(
            &self.arena,
            &self.interner,
            self.interner.intern("match"),
            Some(self.interner.intern("P")),
            &self.chain,
        )
    }

    fn lower(&self) -> Result<Option<MatchIr>, LowerError> {
        lower_match(&self.cx(), self.root)
    }

    fn ir(&self) -> MatchIr {
        self.lower().unwrap().unwrap()
    }

    fn err(&self) -> LowerError {
        self.lower().unwrap_err()
    }

    fn name(&self, text: &str) -> patty_ir::Name {
        self.interner.intern(text)
    }
}

fn pattern(source: &str) -> Pattern {
    let f = Fixture::new(&format!("match(x).with({source}, f).run()"));
    let ir = f.ir();
    ir.branches[0].patterns[0].clone()
}

// ── Recognition ─────────────────────────────────────────────────────

#[test]
fn unterminated_chains_are_not_candidates() {
    assert_eq!(Fixture::new("match(x).with(1, f)").lower(), Ok(None));
    assert_eq!(Fixture::new("match(x)").lower(), Ok(None));
    assert_eq!(Fixture::new("f(x).otherwise(g)").lower(), Ok(None));
}

#[test]
fn terminals() {
    let ir = Fixture::new("match(x).with(1, f).otherwise(g)").ir();
    assert!(matches!(ir.fallback, Some(Handler::Callable(_))));
    assert!(!ir.exhaustive);

    let ir = Fixture::new("match(x).with(1, f).exhaustive()").ir();
    assert!(ir.fallback.is_none());
    assert!(ir.exhaustive);

    let ir = Fixture::new("match(x).with(1, f).run()").ir();
    assert!(ir.fallback.is_none());
    assert!(!ir.exhaustive);
}

#[test]
fn custom_chain_names() {
    let mut f = Fixture::new("match(x).when(1, f).orElse(g)");
    f.chain.clause = "when".into();
    f.chain.fallback = "orElse".into();
    let ir = f.ir();
    assert_eq!(ir.branches.len(), 1);
    assert!(ir.fallback.is_some());
}

// ── Clauses ─────────────────────────────────────────────────────────

#[test]
fn branches_keep_declaration_order() {
    let f = Fixture::new("match(x).with('a', f).with('b', g).with('c', h).run()");
    let ir = f.ir();
    let literals: Vec<Pattern> = ir.branches.iter().map(|b| b.patterns[0].clone()).collect();
    assert_eq!(
        literals,
        vec![
            Pattern::Literal(LiteralPattern::Str(f.name("a"))),
            Pattern::Literal(LiteralPattern::Str(f.name("b"))),
            Pattern::Literal(LiteralPattern::Str(f.name("c"))),
        ]
    );
}

#[test]
fn alternatives_then_handler() {
    let ir = Fixture::new("match(x).with(1, 2, 3, (v) => v).run()").ir();
    let branch = &ir.branches[0];
    assert_eq!(branch.patterns.len(), 3);
    assert!(branch.guard.is_none());
    assert!(matches!(branch.handler, Handler::Inline(_)));
}

#[test]
fn three_args_with_function_middle_is_a_guard() {
    let f = Fixture::new("match(x).with(P.number, (n) => n > 2, (n) => n).run()");
    let ir = f.ir();
    let branch = &ir.branches[0];
    assert_eq!(branch.patterns.len(), 1);
    let guard = branch.guard.unwrap();
    assert!(matches!(f.arena.expr_kind(guard), ExprKind::Function(_)));
}

#[test]
fn three_args_without_function_middle_are_alternatives() {
    let ir = Fixture::new("match(x).with(1, 2, f).run()").ir();
    assert_eq!(ir.branches[0].patterns.len(), 2);
    assert!(ir.branches[0].guard.is_none());
}

#[test]
fn malformed_clauses() {
    assert_eq!(Fixture::new("match(x).with(f).run()").err().code(), ErrorCode::E2002);
    assert_eq!(Fixture::new("match(x).with().run()").err().code(), ErrorCode::E2002);
    assert_eq!(Fixture::new("match(x).otherwise().exhaustive()").err().code(), ErrorCode::E2002);
    assert_eq!(Fixture::new("match(x).exhaustive(1)").err().code(), ErrorCode::E2002);
    assert_eq!(Fixture::new("match(x).otherwise(f, g)").err().code(), ErrorCode::E2002);
}

#[test]
fn unrecognized_operation() {
    let err = Fixture::new("match(x).when(1, f).run()").err();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(err.to_string(), "unrecognized chain operation `.when()`");
}

#[test]
fn subject_arity_and_spread() {
    assert_eq!(Fixture::new("match().run()").err().code(), ErrorCode::E2006);
    assert_eq!(Fixture::new("match(a, b).run()").err().code(), ErrorCode::E2006);
    assert_eq!(Fixture::new("match(...xs).run()").err().code(), ErrorCode::E2007);
    assert_eq!(Fixture::new("match(x).with(...ps).run()").err().code(), ErrorCode::E2007);
}

// ── Patterns ────────────────────────────────────────────────────────

#[test]
fn literal_patterns() {
    assert_eq!(pattern("-1"), Pattern::Literal(LiteralPattern::Num((-1.0f64).to_bits())));
    assert_eq!(pattern("true"), Pattern::Literal(LiteralPattern::Bool(true)));
    assert_eq!(pattern("null"), Pattern::Literal(LiteralPattern::Null));
    assert_eq!(pattern("undefined"), Pattern::Literal(LiteralPattern::Undefined));
    assert_eq!(pattern("NaN"), Pattern::Literal(LiteralPattern::NaN));
    assert!(matches!(pattern("10n"), Pattern::Literal(LiteralPattern::BigInt(_))));
    assert!(matches!(pattern("`plain`"), Pattern::Literal(LiteralPattern::Str(_))));
}

#[test]
fn namespace_members() {
    assert_eq!(pattern("P.string"), Pattern::TypeTag(TypeTag::String));
    assert_eq!(pattern("P.nullish"), Pattern::TypeTag(TypeTag::Nullish));
    assert_eq!(pattern("P._"), Pattern::Wildcard);
    assert_eq!(pattern("P.any"), Pattern::Wildcard);
}

#[test]
fn nested_structure() {
    let f = Fixture::new("match(x).with({ type: 'error', error: { foo: [1, 2] } }, f).run()");
    let ir = f.ir();
    let Pattern::Object(fields) = &ir.branches[0].patterns[0] else {
        panic!("expected object pattern");
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].name, f.name("error"));
    let Pattern::Object(inner) = &fields[1].pattern else {
        panic!("expected nested object");
    };
    let Pattern::Array(elements) = &inner[0].pattern else {
        panic!("expected array");
    };
    assert_eq!(elements.len(), 2);
}

#[test]
fn select_arities() {
    let f = Fixture::new(
        "match(x).with({ a: P.select(), }, f).with({ b: P.select('k') }, f)\
         .with({ c: P.select(P.string) }, f).with({ d: P.select('k', P.number) }, f).run()",
    );
    let ir = f.ir();
    let select = |i: usize| {
        let Pattern::Object(fields) = &ir.branches[i].patterns[0] else {
            panic!("expected object");
        };
        let Pattern::Select(select) = &fields[0].pattern else {
            panic!("expected select");
        };
        select.clone()
    };
    assert_eq!(select(0).binding, SelectBinding::Anonymous);
    assert!(select(0).subpattern.is_none());
    assert_eq!(select(1).binding, SelectBinding::Named(f.name("k")));
    assert!(select(1).subpattern.is_none());
    assert_eq!(select(2).binding, SelectBinding::Anonymous);
    assert_eq!(select(2).subpattern.as_deref(), Some(&Pattern::TypeTag(TypeTag::String)));
    assert_eq!(select(3).binding, SelectBinding::Named(f.name("k")));
    assert_eq!(select(3).subpattern.as_deref(), Some(&Pattern::TypeTag(TypeTag::Number)));
}

#[test]
fn unsupported_expressions() {
    for source in ["someVar", "a + b", "f()", "{ [k]: 1 }", "[...xs]", "`a${b}`"] {
        let f = Fixture::new(&format!("match(x).with({source}, f).run()"));
        assert_eq!(f.err().code(), ErrorCode::E2003, "{source}");
    }
}

#[test]
fn unsupported_kinds() {
    for source in [
        "P.not(1)",
        "P.when((v) => v)",
        "P.set(P.string)",
        "P.map(P.string, 1)",
        "{ a: P.not(P.string) }",
        "P.union(1, 2)",
        "P.optional",
        "P.instanceOf(Error)",
        "P.frobnicate",
    ] {
        let f = Fixture::new(&format!("match(x).with({source}, f).run()"));
        assert_eq!(f.err().code(), ErrorCode::E2004, "{source}");
    }
}

#[test]
fn without_namespace_members_are_expressions() {
    let f = Fixture::new("match(x).with(P.string, f).run()");
    let cx = LowerContext::new(&f.arena, &f.interner, f.name("match"), None, &f.chain);
    let err = lower_match(&cx, f.root).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);
}

// ── Captures ────────────────────────────────────────────────────────

#[test]
fn capture_violations() {
    for source in [
        "{ a: P.select(), b: P.select() }",
        "{ a: P.select(), b: P.select('b') }",
        "{ a: P.select('b'), b: P.select() }",
        "{ a: P.select('k'), b: P.select('k') }",
    ] {
        let f = Fixture::new(&format!("match(x).with({source}, f).run()"));
        assert_eq!(f.err().code(), ErrorCode::E2005, "{source}");
    }
    let f = Fixture::new("match(x).with({ a: P.select() }, { b: 1 }, f).run()");
    assert_eq!(f.err().code(), ErrorCode::E2005);
}

#[test]
fn named_captures_in_first_encountered_order() {
    let f = Fixture::new("match(x).with({ b: P.select('b'), a: { c: P.select('a') } }, f).run()");
    let ir = f.ir();
    let names: Vec<SelectBinding> = ir.branches[0].selections().iter().map(|s| s.binding).collect();
    assert_eq!(
        names,
        vec![
            SelectBinding::Named(f.name("b")),
            SelectBinding::Named(f.name("a"))
        ]
    );
}
