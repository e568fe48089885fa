//! Tree traversal module.
//!
//! `walk_tree` visits a tree depth-first, left to right, and calls into a
//! `Visitor` before and after every node. The walker keeps the ancestry and
//! scope stacks in a `WalkContext` so visitors can ask for their parent or
//! resolve a variable name without tracking it themselves.
//!
//! The walker also enforces two rules every consumer depends on:
//!
//! - Variable references and assignments must resolve to a declaration in an
//!   enclosing scope
//! - Both operands of a binary expression must share a data type

pub mod visitor;
pub mod walker;

#[cfg(test)]
mod tests;
