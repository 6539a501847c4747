//! Shared helpers: compile with the driver, then run the output.

use patty_eval::{EvalError, Interpreter};
use patty_ir::StringInterner;
use pattyc::{compile_source, CompileOutput, PassConfig};

/// Compile with the default configuration and expect no diagnostics.
pub fn compile(source: &str) -> String {
    let output = compile_with(source, &PassConfig::default());
    assert!(
        output.diagnostics.is_empty(),
        "unexpected diagnostics: {:#?}",
        output.diagnostics
    );
    output.code
}

pub fn compile_with(source: &str, config: &PassConfig) -> CompileOutput {
    compile_source(source, config).unwrap()
}

/// Run compiled code and read the listed globals as strings.
pub fn run(code: &str, names: &[&str]) -> Vec<String> {
    let interner = StringInterner::new();
    let parsed = patty_parse::parse(code, &interner)
        .unwrap_or_else(|err| panic!("generated code does not parse: {err}\n{code}"));
    let mut interp = Interpreter::new(&parsed.arena, &interner);
    if let Err(err) = interp.run(parsed.program) {
        panic!("generated code failed: {err}\n{code}");
    }
    names
        .iter()
        .map(|name| {
            interp
                .global(name)
                .unwrap_or_else(|| panic!("`{name}` is not defined\n{code}"))
                .to_string()
        })
        .collect()
}

/// Compile `source` and run it; the result of each listed global.
pub fn eval(source: &str, names: &[&str]) -> Vec<String> {
    run(&compile(source), names)
}

/// Run compiled code that is expected to fail.
pub fn run_err(code: &str) -> EvalError {
    let interner = StringInterner::new();
    let parsed = patty_parse::parse(code, &interner).unwrap();
    let mut interp = Interpreter::new(&parsed.arena, &interner);
    interp.run(parsed.program).unwrap_err()
}
