//! pattycake compiler CLI.
//!
//! Exit status: 0 on success (warnings included), 1 when the input cannot
//! be read or parsed or the output cannot be written, 2 on usage errors.

use std::io::{IsTerminal, Write};

use patty_diagnostic::emitter::{DiagnosticEmitter, TerminalEmitter};
use pattyc::cli::{parse_args, CliOptions, Command, USAGE};
use pattyc::{compile_source, read_source, DriverError};

fn main() {
    pattyc::tracing_setup::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Compile(options)) => options,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    std::process::exit(run(&options));
}

fn run(options: &CliOptions) -> i32 {
    let path = options.input.display().to_string();
    let is_tty = std::io::stderr().is_terminal();
    let emitter = TerminalEmitter::with_color_mode(std::io::stderr(), options.color, is_tty);

    let source = match read_source(&options.input) {
        Ok(source) => source,
        Err(err) => return fail(emitter, &err),
    };
    let mut emitter = emitter.with_source(path, source.as_str());

    let output = match compile_source(&source, &options.config) {
        Ok(output) => output,
        Err(err) => return fail(emitter, &err),
    };
    emitter.emit_all(&output.diagnostics);
    if !output.diagnostics.is_empty() {
        emitter.emit_summary(0, output.diagnostics.len());
    }
    emitter.flush();

    let written = match &options.output {
        Some(out) => {
            std::fs::write(out, &output.code).map_err(|err| DriverError::write(out, err))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.code.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|err| DriverError::write("<stdout>", err))
        }
    };
    match written {
        Ok(()) => 0,
        Err(err) => fail(emitter, &err),
    }
}

fn fail<W: Write>(mut emitter: TerminalEmitter<W>, err: &DriverError) -> i32 {
    emitter.emit(&err.to_diagnostic());
    emitter.emit_summary(1, 0);
    emitter.flush();
    1
}
