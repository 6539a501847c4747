//! Command-line arguments.

use std::path::PathBuf;

use patty_diagnostic::emitter::ColorMode;

use crate::PassConfig;

pub const USAGE: &str = "\
Usage: pattyc [options] <input>

Compiles ts-pattern `match(..)` chains in <input> into plain conditionals
and writes the result to stdout.

Options:
  -o <path>            Write output to <path> instead of stdout
  --matcher <name>     Matcher name when imports are not scanned (default: match)
  --patterns <name>    Pattern namespace when imports are not scanned (default: P)
  --no-discover        Do not scan `ts-pattern` imports; use the names above
  --no-null-safe       Use plain `.`/`[]` access in generated pattern tests
  --strip-import       Remove the `match` import once every use is compiled
  --color <when>       auto, always or never (default: auto)
  -h, --help           Print this help";

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Compile(CliOptions),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: PassConfig,
    pub color: ColorMode,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("missing value for `{0}`")]
    MissingValue(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: String, value: String },
    #[error("missing input file")]
    MissingInput,
    #[error("unexpected argument `{0}`")]
    ExtraArgument(String),
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Command, UsageError> {
    let mut config = PassConfig::default();
    let mut input = None;
    let mut output = None;
    let mut color = ColorMode::Auto;

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        let mut value = || {
            args.next()
                .cloned()
                .ok_or_else(|| UsageError::MissingValue(arg.clone()))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-o" => output = Some(PathBuf::from(value()?)),
            "--matcher" => config.bindings.matcher = value()?,
            "--patterns" => config.bindings.patterns = Some(value()?),
            "--no-discover" => config.discover_imports = false,
            "--no-null-safe" => config.codegen.null_safe = false,
            "--strip-import" => config.strip_import = true,
            "--color" => {
                let when = value()?;
                color = match when.as_str() {
                    "auto" => ColorMode::Auto,
                    "always" => ColorMode::Always,
                    "never" => ColorMode::Never,
                    _ => {
                        return Err(UsageError::InvalidValue {
                            flag: arg.clone(),
                            value: when,
                        })
                    }
                };
            }
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(UsageError::UnknownOption(flag.to_owned()));
            }
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => return Err(UsageError::ExtraArgument(extra.to_owned())),
        }
    }

    let input = input.ok_or(UsageError::MissingInput)?;
    Ok(Command::Compile(CliOptions {
        input,
        output,
        config,
        color,
    }))
}
