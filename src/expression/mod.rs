//! Sandboxed arithmetic used by analogue equations and annotation endpoints.
//!
//! The grammar only reaches numbers, lists, the bound variables, and a fixed
//! table of math builtins.

pub(crate) mod ast;
pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod eval;
pub(crate) mod lexer;
pub(crate) mod parser;

use crate::foundation::error::UndulateResult;

pub use context::AnalogueContext;
pub use eval::{Environment, MAX_LIST_LEN, Value};

/// Parse and evaluate `src` against `env`.
#[tracing::instrument(level = "trace", skip(env))]
pub fn evaluate(src: &str, env: &mut Environment) -> UndulateResult<Value> {
    let expr = parser::parse_expr(src)?;
    Ok(env.eval(&expr)?)
}
