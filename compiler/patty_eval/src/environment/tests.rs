use super::*;
use patty_ir::StringInterner;

fn number(value: &Option<Value>) -> Option<f64> {
    value.as_ref().and_then(Value::as_number)
}

#[test]
fn scope_define_lookup() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut scope = Scope::new();
    scope.define(x, Value::Number(42.0), Mutability::Immutable);
    assert_eq!(number(&scope.lookup(x)), Some(42.0));
}

#[test]
fn child_scope_shadows_parent() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let parent = LocalScope::new(Scope::new());
    parent
        .borrow_mut()
        .define(x, Value::Number(1.0), Mutability::Immutable);

    let mut child = Scope::with_parent(parent.clone());
    child.define(x, Value::Number(2.0), Mutability::Immutable);

    assert_eq!(number(&child.lookup(x)), Some(2.0));
    assert_eq!(number(&parent.borrow().lookup(x)), Some(1.0));
}

#[test]
fn push_and_pop() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define(x, Value::Number(1.0), Mutability::Immutable);

    env.push_scope();
    assert_eq!(env.depth(), 2);
    env.define(x, Value::Number(2.0), Mutability::Immutable);
    assert_eq!(number(&env.lookup(x)), Some(2.0));

    env.pop_scope();
    assert_eq!(number(&env.lookup(x)), Some(1.0));

    env.pop_scope();
    assert_eq!(env.depth(), 1, "the outermost scope is never popped");
}

#[test]
fn assignment_respects_mutability() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let y = interner.intern("y");
    let z = interner.intern("z");

    let mut env = Environment::new();
    env.define(x, Value::Number(1.0), Mutability::Mutable);
    env.define(y, Value::Number(1.0), Mutability::Immutable);
    env.push_scope();

    assert_eq!(env.assign(x, Value::Number(2.0)), Ok(()));
    assert_eq!(env.assign(y, Value::Number(2.0)), Err(AssignError::Immutable));
    assert_eq!(env.assign(z, Value::Number(2.0)), Err(AssignError::Undefined));

    env.pop_scope();
    assert_eq!(number(&env.lookup(x)), Some(2.0));
}

#[test]
fn enclosed_environment_shares_the_captured_scope() {
    let interner = StringInterner::new();
    let count = interner.intern("count");

    let mut env = Environment::new();
    env.push_scope();
    env.define(count, Value::Number(0.0), Mutability::Mutable);
    let captured = env.current_scope();

    let mut body = env.enclosed(captured);
    assert_eq!(body.assign(count, Value::Number(1.0)), Ok(()));

    assert_eq!(number(&env.lookup(count)), Some(1.0));
}

#[test]
fn globals_are_read_only() {
    let interner = StringInterner::new();
    let nan = interner.intern("NaN");

    let mut env = Environment::new();
    env.define_global(nan, Value::Number(f64::NAN));
    env.push_scope();
    assert!(number(&env.lookup(nan)).is_some_and(f64::is_nan));
    assert_eq!(
        env.assign(nan, Value::Number(0.0)),
        Err(AssignError::Immutable)
    );
}
