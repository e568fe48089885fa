#![allow(clippy::module_inception)]

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod builder;
#[cfg(feature = "llvm")]
pub mod compiler;
pub mod errors;
pub mod evaluator;
#[cfg(feature = "llvm")]
pub mod jit;
pub mod printer;
pub mod type_checker;
pub mod visitor;

extern crate regex;

/// Renders `error` the way the demo binary reports it.
///
/// ```text
/// Error: BinaryExprDataTypeMismatch (Both operands of ...)
/// -> at node #12
/// ```
pub fn format_error(error: &Error) -> String {
    let mut message = if let ErrorTip::None = error.get_tip() {
        format!("Error: {}", error.get_error_name())
    } else {
        format!("Error: {} ({})", error.get_error_name(), error.get_tip())
    };

    if let Some(node) = error.get_node() {
        message.push_str(&format!("\n-> at node {}", node));
    }
    message.push_str(&format!("\n   {}", error));

    message
}

pub fn display_error(error: &Error) {
    println!("{}", format_error(error));
}
