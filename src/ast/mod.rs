/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Stmt` and `Expr` sum types and the `Program` root
/// - expressions: One struct per expression kind
/// - statements: One struct per statement kind
/// - types: Type annotations as written in source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
