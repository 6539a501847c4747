//! Generated chains agree with first-match semantics.

use proptest::prelude::*;

use crate::common::{compile, run};

/// One `.with` clause per entry; each clause lists its alternatives.
fn branches() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(0u8..6, 1..3), 1..6)
}

fn chain(subject: u8, branches: &[Vec<u8>], in_declaration: bool) -> String {
    let clauses: String = branches
        .iter()
        .enumerate()
        .map(|(i, alternatives)| {
            let patterns: Vec<String> = alternatives.iter().map(u8::to_string).collect();
            format!("\n    .with({}, () => {i})", patterns.join(", "))
        })
        .collect();
    let chain = format!("match(subject){clauses}\n    .otherwise(() => -1)");
    let binding = if in_declaration {
        format!("const r = {chain};")
    } else {
        format!("const r = [{chain}][0];")
    };
    format!("import {{ match }} from 'ts-pattern';\nconst subject = {subject};\n{binding}\n")
}

fn first_match(subject: u8, branches: &[Vec<u8>]) -> String {
    branches
        .iter()
        .position(|alternatives| alternatives.contains(&subject))
        .map_or_else(|| "-1".to_owned(), |i| i.to_string())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn first_matching_clause_wins(
        subject in 0u8..6,
        branches in branches(),
        in_declaration in any::<bool>(),
    ) {
        let code = compile(&chain(subject, &branches, in_declaration));
        prop_assert_eq!(run(&code, &["r"]), [first_match(subject, &branches)]);
    }

    #[test]
    fn compilation_is_deterministic(subject in 0u8..6, branches in branches()) {
        let source = chain(subject, &branches, true);
        prop_assert_eq!(compile(&source), compile(&source));
    }
}
