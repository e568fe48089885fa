use std::fmt::Display;

use thiserror::Error;

use crate::ast::{ast::NodeId, types::DataType};

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    node: Option<NodeId>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, node: Option<NodeId>) -> Self {
        Error {
            internal_error: error_impl,
            node,
        }
    }

    /// Shorthand for errors raised at a specific node of the tree.
    pub fn at(error_impl: ErrorImpl, node: NodeId) -> Self {
        Error::new(error_impl, Some(node))
    }

    pub fn invalid_argument(argument: &str, reason: impl Into<String>) -> Self {
        Error::new(
            ErrorImpl::InvalidArgument {
                argument: argument.to_string(),
                reason: reason.into(),
            },
            None,
        )
    }

    pub fn invalid_state(message: impl Into<String>, node: Option<NodeId>) -> Self {
        Error::new(
            ErrorImpl::InvalidState {
                message: message.into(),
            },
            node,
        )
    }

    pub fn unhandled(case: impl Display, node: Option<NodeId>) -> Self {
        Error::new(
            ErrorImpl::UnhandledSwitchCase {
                case: case.to_string(),
            },
            node,
        )
    }

    pub fn get_node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::BinaryExprDataTypeMismatch { .. } => ErrorCategory::Compile,
            ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::VariableShadowed { .. }
            | ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::EmptyBlock
            | ErrorImpl::UnhandledSwitchCase { .. }
            | ErrorImpl::InvalidState { .. }
            | ErrorImpl::ReturnTypeMismatch { .. } => ErrorCategory::Fatal,
            ErrorImpl::InvalidArgument { .. } => ErrorCategory::InvalidArgument,
            ErrorImpl::DivisionByZero
            | ErrorImpl::EntryPointNotFound { .. }
            | ErrorImpl::NativeTarget { .. }
            | ErrorImpl::Backend { .. } => ErrorCategory::Execution,
        }
    }

    pub fn is_compile_error(&self) -> bool {
        self.category() == ErrorCategory::Compile
    }

    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Fatal
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::BinaryExprDataTypeMismatch { .. } => "BinaryExprDataTypeMismatch",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::VariableShadowed { .. } => "VariableShadowed",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::EmptyBlock => "EmptyBlock",
            ErrorImpl::UnhandledSwitchCase { .. } => "UnhandledSwitchCase",
            ErrorImpl::InvalidState { .. } => "InvalidState",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::InvalidArgument { .. } => "InvalidArgument",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::EntryPointNotFound { .. } => "EntryPointNotFound",
            ErrorImpl::NativeTarget { .. } => "NativeTarget",
            ErrorImpl::Backend { .. } => "Backend",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::BinaryExprDataTypeMismatch { l_value, r_value } => {
                ErrorTip::Suggestion(format!(
                    "Both operands of a binary expression must have the same type, found `{}` and `{}`",
                    l_value, r_value
                ))
            }
            ErrorImpl::VariableNotDeclared { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is not declared in any enclosing scope",
                variable
            )),
            ErrorImpl::VariableShadowed { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is hidden here by an inner declaration with the same name",
                variable
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::EmptyBlock => ErrorTip::Suggestion(String::from(
                "A block needs at least one expression to have a data type",
            )),
            ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected an expression of type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::InvalidArgument { argument, reason } => {
                ErrorTip::Suggestion(format!("Argument `{}`: {}", argument, reason))
            }
            ErrorImpl::EntryPointNotFound { name } => ErrorTip::Suggestion(format!(
                "No compiled function named `{}` was added to the execution context",
                name
            )),
            ErrorImpl::UnhandledSwitchCase { .. }
            | ErrorImpl::InvalidState { .. }
            | ErrorImpl::DivisionByZero
            | ErrorImpl::NativeTarget { .. }
            | ErrorImpl::Backend { .. } => ErrorTip::None,
        }
    }
}

/// How a caller is expected to react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A mistake in the tree's authoring; report it to the user.
    Compile,
    /// A broken tree invariant or unreachable path; a bug in the caller.
    Fatal,
    /// A required argument was absent or malformed.
    InvalidArgument,
    /// Raised while running compiled or interpreted code.
    Execution,
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("data types of lvalue ({l_value}) and rvalue ({r_value}) in binary expression do not match")]
    BinaryExprDataTypeMismatch { l_value: DataType, r_value: DataType },
    #[error("variable {variable:?} was not defined")]
    VariableNotDeclared { variable: String },
    #[error("variable {variable:?} is shadowed by another declaration where it is referenced")]
    VariableShadowed { variable: String },
    #[error("more than one variable named {variable:?} was defined in the same scope")]
    VariableAlreadyDeclared { variable: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("a block must contain at least one expression")]
    EmptyBlock,
    #[error("unhandled switch case: {case}")]
    UnhandledSwitchCase { case: String },
    #[error("invalid state: {message}")]
    InvalidState { message: String },
    #[error("return type mismatch: expected {expected}, received {received}")]
    ReturnTypeMismatch { expected: DataType, received: DataType },
    #[error("invalid value for argument {argument}: {reason}")]
    InvalidArgument { argument: String, reason: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("entry point {name:?} not found")]
    EntryPointNotFound { name: String },
    #[error("failed to initialize native target: {message}")]
    NativeTarget { message: String },
    #[error("code generation backend error: {message}")]
    Backend { message: String },
}

#[cfg(feature = "llvm")]
impl From<inkwell::builder::BuilderError> for Error {
    fn from(error: inkwell::builder::BuilderError) -> Self {
        Error::new(
            ErrorImpl::Backend {
                message: error.to_string(),
            },
            None,
        )
    }
}
