//! Tree-walking interpreter.
//!
//! Evaluates a type-checked program directly from its AST. Runtime scopes
//! live in an arena and are addressed by index, which lets a function value
//! keep its defining scope alive for closures and recursion. `return` and
//! runtime errors both travel on the `Err` side of evaluation as an
//! [`interpreter::Interrupt`], so `?` propagates them unchanged.

pub mod environment;
pub mod interpreter;
pub mod value;
