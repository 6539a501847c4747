// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for the file pass.
//!
//! # Organization
//!
//! - `common` - compile and evaluate helpers
//! - `rewrite` - what the pass does to source text: contexts, nesting,
//!   imports, fail-soft diagnostics
//! - `runtime` - behavior of generated code, checked by running it with
//!   `patty_eval`
//! - `properties` - order preservation and determinism over generated
//!   branch lists
//!
//! ```bash
//! cargo test -p pattyc --test scenarios
//! cargo test -p pattyc --test scenarios runtime
//! ```

#[path = "scenarios/common.rs"]
mod common;
#[path = "scenarios/properties.rs"]
mod properties;
#[path = "scenarios/rewrite.rs"]
mod rewrite;
#[path = "scenarios/runtime.rs"]
mod runtime;
