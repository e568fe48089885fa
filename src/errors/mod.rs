//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout tree construction,
//! walking and execution. It includes:
//!
//! - Error structures carrying the identity of the failing node
//! - Specific error variants for each failure, grouped into categories
//!   (compile, fatal, invalid argument, execution)
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
