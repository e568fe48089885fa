//! Code generation module for the compiler.
//!
//! This module lowers trees into LLVM IR through inkwell. It handles:
//!
//! - Mapping data types to LLVM types
//! - One LLVM function per function, with stack slots for every variable
//! - Arithmetic, conditionals (as branches joined by a phi) and returns
//! - Verification of the finished LLVM module

pub mod compiler;
pub mod expr;
