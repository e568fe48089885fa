//! Type checking module.
//!
//! Expression types are derived structurally from the tree, so the only rule
//! left to enforce is that both operands of a binary expression agree. The
//! walker applies `check_binary` to every binary expression it visits; the
//! `TypeChecker` visitor runs a walk that does nothing else, which is how a
//! tree is validated without evaluating or compiling it.

pub mod type_checker;
