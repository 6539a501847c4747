//! Pass configuration.

use patty_codegen::CodegenOptions;
use patty_lower::ChainNames;

/// Module whose imports are scanned for the matcher and pattern namespace.
pub const PATTERN_MODULE: &str = "ts-pattern";

/// Local names of the match-builder root and the pattern namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatcherBindings {
    pub matcher: String,
    pub patterns: Option<String>,
}

impl Default for MatcherBindings {
    fn default() -> Self {
        MatcherBindings {
            matcher: "match".to_owned(),
            patterns: Some("P".to_owned()),
        }
    }
}

/// Everything that shapes one run of the pass over a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassConfig {
    /// Names used when discovery is off.
    pub bindings: MatcherBindings,
    /// Read the names from `import { match, P } from 'ts-pattern'`. A file
    /// without that import is left alone.
    pub discover_imports: bool,
    pub chain: ChainNames,
    pub codegen: CodegenOptions,
    /// Drop the `match` import specifier once nothing refers to it.
    pub strip_import: bool,
}

impl Default for PassConfig {
    fn default() -> Self {
        PassConfig {
            bindings: MatcherBindings::default(),
            discover_imports: true,
            chain: ChainNames::default(),
            codegen: CodegenOptions::default(),
            strip_import: false,
        }
    }
}

impl PassConfig {
    /// Configuration with fixed names and no import discovery.
    pub fn with_bindings(matcher: &str, patterns: Option<&str>) -> Self {
        PassConfig {
            bindings: MatcherBindings {
                matcher: matcher.to_owned(),
                patterns: patterns.map(str::to_owned),
            },
            discover_imports: false,
            ..PassConfig::default()
        }
    }
}
