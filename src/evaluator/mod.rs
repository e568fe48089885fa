//! Tree-walking interpreter.
//!
//! Runs a tree directly on the walker, without generating code, using the
//! same semantics the JIT gives it: wrapping 32-bit integer arithmetic,
//! first-match lexical scoping, conditionals that only take one branch and
//! returns that end the enclosing function.

pub mod evaluator;
