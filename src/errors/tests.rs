//! Unit tests for error handling.
//!
//! This module contains tests for error types, categories and tips.

use crate::ast::{ast::NodeId, types::DataType};
use crate::errors::errors::{Error, ErrorCategory, ErrorImpl, ErrorTip};

#[test]
fn test_error_creation() {
    let error = Error::new(ErrorImpl::EmptyBlock, None);

    assert_eq!(error.get_error_name(), "EmptyBlock");
    assert!(error.get_node().is_none());
}

#[test]
fn test_error_node() {
    let node = NodeId::next();
    let error = Error::at(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string(),
        },
        node,
    );

    assert_eq!(error.get_node(), Some(node));
}

#[test]
fn test_binary_mismatch_is_compile_error() {
    let error = Error::new(
        ErrorImpl::BinaryExprDataTypeMismatch {
            l_value: DataType::Float,
            r_value: DataType::Int32,
        },
        None,
    );

    assert_eq!(error.get_error_name(), "BinaryExprDataTypeMismatch");
    assert_eq!(error.category(), ErrorCategory::Compile);
    assert!(error.is_compile_error());
    assert!(!error.is_fatal());
}

#[test]
fn test_fatal_errors() {
    let errors = vec![
        Error::new(
            ErrorImpl::VariableNotDeclared {
                variable: "foo".to_string(),
            },
            None,
        ),
        Error::new(
            ErrorImpl::VariableAlreadyDeclared {
                variable: "x".to_string(),
            },
            None,
        ),
        Error::new(
            ErrorImpl::FunctionAlreadyDeclared {
                function: "main".to_string(),
            },
            None,
        ),
        Error::new(
            ErrorImpl::VariableShadowed {
                variable: "x".to_string(),
            },
            None,
        ),
        Error::new(ErrorImpl::EmptyBlock, None),
        Error::unhandled(DataType::Pointer, None),
        Error::invalid_state("stack is empty", None),
        Error::new(
            ErrorImpl::ReturnTypeMismatch {
                expected: DataType::Int32,
                received: DataType::Float,
            },
            None,
        ),
    ];

    for error in errors {
        assert!(error.is_fatal(), "{} should be fatal", error.get_error_name());
    }
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("name", "must not be empty");

    assert_eq!(error.get_error_name(), "InvalidArgument");
    assert_eq!(error.category(), ErrorCategory::InvalidArgument);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::InvalidArgument {
            argument: "name".to_string(),
            reason: "must not be empty".to_string(),
        }
    );
}

#[test]
fn test_execution_errors() {
    assert_eq!(
        Error::new(ErrorImpl::DivisionByZero, None).category(),
        ErrorCategory::Execution
    );
    assert_eq!(
        Error::new(
            ErrorImpl::EntryPointNotFound {
                name: "exprFunc".to_string(),
            },
            None,
        )
        .category(),
        ErrorCategory::Execution
    );
}

#[test]
fn test_unhandled_switch_case_message() {
    let error = Error::unhandled(DataType::Pointer, None);
    assert_eq!(error.to_string(), "unhandled switch case: Pointer");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(ErrorImpl::DivisionByZero, None);

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "x".to_string(),
        },
        None,
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("`x`")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display() {
    let error = Error::new(
        ErrorImpl::BinaryExprDataTypeMismatch {
            l_value: DataType::Float,
            r_value: DataType::Int32,
        },
        None,
    );

    assert_eq!(
        error.to_string(),
        "data types of lvalue (Float) and rvalue (Int32) in binary expression do not match"
    );
}
