use log::{debug, trace};

use crate::{
    ast::{ast::Node, expressions::Binary},
    errors::errors::{Error, ErrorImpl},
    visitor::{
        visitor::Visitor,
        walker::{walk_tree, WalkContext},
    },
};

/// Fails with a compile error when the operands of `binary` have different
/// data types.
pub fn check_binary(binary: &Binary) -> Result<(), Error> {
    let l_type = binary.l_value().data_type();
    let r_type = binary.r_value().data_type();

    if l_type != r_type {
        return Err(Error::at(
            ErrorImpl::BinaryExprDataTypeMismatch {
                l_value: l_type,
                r_value: r_type,
            },
            binary.id(),
        ));
    }

    trace!("binary {} checked as {}", binary.id(), r_type);
    Ok(())
}

/// Visitor that only lets the walker's own checks run.
#[derive(Debug, Default)]
pub struct TypeChecker {
    checked_binaries: usize,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker::default()
    }

    /// Number of binary expressions that passed the check during the last walk.
    pub fn checked_binaries(&self) -> usize {
        self.checked_binaries
    }
}

impl Visitor for TypeChecker {
    fn initialize(&mut self) -> Result<(), Error> {
        self.checked_binaries = 0;
        Ok(())
    }

    fn visited_binary(&mut self, _expr: &Binary, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        self.checked_binaries += 1;
        Ok(())
    }
}

/// Validates the tree rooted at `root`: every variable resolves and every
/// binary expression has matching operand types.
pub fn type_check<'a>(root: impl Into<Node<'a>>) -> Result<(), Error> {
    let mut checker = TypeChecker::new();
    walk_tree(&mut checker, root)?;
    debug!(
        "type check passed ({} binary expression(s))",
        checker.checked_binaries()
    );
    Ok(())
}
