//! Builders for immutable trees.
//!
//! Nodes that own declarations (blocks, functions, modules) are only created
//! through these builders. Each builder accumulates children through chained
//! `add_*` calls and freezes them with a single `build()`, which:
//!
//! - Rejects duplicate variable names within one scope
//! - Rejects empty blocks and duplicate function names
//! - Validates identifiers
//!
//! Ownership of every added child moves into the builder and then into the
//! built node.

pub mod builder;
