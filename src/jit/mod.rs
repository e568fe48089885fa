//! JIT execution module.
//!
//! Compiles modules in memory with LLVM's JIT execution engine and calls the
//! resulting native functions:
//!
//! - engine: native target setup, `ExecutionOptions` and `ExecutionContext`
//! - runner: one-call helpers that compile and run a single expression

pub mod engine;
pub mod runner;
