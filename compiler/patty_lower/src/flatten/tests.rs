use super::*;
use patty_ir::StringInterner;
use pretty_assertions::assert_eq;

fn chain(source: &str) -> (ExprArena, ExprId, StringInterner) {
    let interner = StringInterner::new();
    let mut arena = ExprArena::new();
    let id = patty_parse::parse_expression(source, &mut arena, &interner).unwrap();
    (arena, id, interner)
}

fn names(source: &str) -> Option<Vec<String>> {
    let (arena, id, interner) = chain(source);
    let matcher = interner.intern("match");
    let calls = flatten_chain(&arena, id, matcher)?;
    Some(
        calls
            .iter()
            .skip(1)
            .map(|&call| interner.lookup(operation_name(&arena, call).unwrap()).to_owned())
            .collect(),
    )
}

#[test]
fn root_first_order() {
    assert_eq!(
        names("match(x).with(1, f).with(2, g).otherwise(h)"),
        Some(vec!["with".into(), "with".into(), "otherwise".into()])
    );
}

#[test]
fn bare_root_is_a_chain_of_one() {
    let (arena, id, interner) = chain("match(x)");
    let calls = flatten_chain(&arena, id, interner.intern("match")).unwrap();
    assert_eq!(calls, vec![id]);
}

#[test]
fn other_roots_are_rejected() {
    assert_eq!(names("other(x).with(1, f).run()"), None);
    assert_eq!(names("obj.match(x).with(1, f).run()"), None);
    assert_eq!(names("match(x).with(1, f).data"), None);
    assert_eq!(names("match"), None);
}

#[test]
fn optional_links_are_rejected() {
    assert_eq!(names("match(x)?.with(1, f).run()"), None);
    assert_eq!(names("match(x).with?.(1, f)"), None);
}

#[test]
fn aliased_matcher() {
    let (arena, id, interner) = chain("m(x).exhaustive()");
    assert!(flatten_chain(&arena, id, interner.intern("match")).is_none());
    assert_eq!(
        flatten_chain(&arena, id, interner.intern("m")).map(|c| c.len()),
        Some(2)
    );
}

#[test]
fn long_chains() {
    let mut source = String::from("match(x)");
    for i in 0..500 {
        source.push_str(&format!(".with({i}, f)"));
    }
    source.push_str(".run()");
    let (arena, id, interner) = chain(&source);
    let calls = flatten_chain(&arena, id, interner.intern("match")).unwrap();
    assert_eq!(calls.len(), 502);
}
