//! Type checking module.
//!
//! A single pre-order walk over the AST that validates it against a
//! structural type system. The checker never modifies the tree; it only
//! produces the type of the program and a list of positioned errors:
//!
//! - Resolving identifiers through a chain of scopes, then the builtin table
//! - Checking operators, conditions, calls and declarations
//! - Checking function bodies and `return` against declared return types
//!
//! Once an error has been reported for an expression its type becomes
//! `Unknown`, and expressions built on an `Unknown` are not reported again.

pub mod type_checker;
pub mod types;

#[cfg(test)]
mod tests;
