//! Pretty printer module.
//!
//! Renders a tree as indented text, one node per line, for debugging and for
//! the demo binary.

pub mod printer;

#[cfg(test)]
mod tests;
