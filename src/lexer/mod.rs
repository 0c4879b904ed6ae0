//! Lexical analysis.
//!
//! The lexer turns source text into positioned tokens, one per call to
//! `next_token`. Recognition is driven by an ordered table of anchored regex
//! patterns; keywords are looked up in `RESERVED_LOOKUP` after an identifier
//! has been matched. Bytes that match nothing become `Illegal` tokens, which
//! the parser later reports as syntax errors.

pub mod lexer;
pub mod tokens;
