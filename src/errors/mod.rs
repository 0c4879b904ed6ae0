//! Error types and error handling for the interpreter pipeline.
//!
//! Each pass owns its own error taxonomy:
//!
//! - `SyntaxError` - grammar violations collected by the parser
//! - `TypeError` - static rule violations collected by the type checker
//! - `RuntimeError` - the single failure that stops evaluation
//!
//! Syntax and type errors are wrapped in a positioned `Error` so the
//! command line shell can point at the offending source line.

pub mod errors;
