/// AST (Abstract Syntax Tree) module
/// Contains every node a tree can be built from
///
/// Submodules:
/// - ast: Node identity, node kinds and the borrowed `Node` view
/// - declarations: Functions and modules
/// - expressions: The `Expr` sum type and its node structs
/// - scope: Variables and the scopes that own them
/// - types: Data types, operations and runtime values
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod scope;
pub mod types;
