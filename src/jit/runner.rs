use inkwell::context::Context;

use crate::{
    ast::{
        expressions::Expr,
        types::{DataType, Value},
    },
    builder::builder::expression_module,
    errors::errors::{Error, ErrorImpl},
};

use super::engine::{ExecutionContext, ExecutionOptions};

/// Name of the module a standalone expression is compiled into.
pub const MODULE_NAME: &str = "ExprModule";
/// Name of the function wrapping a standalone expression.
pub const ENTRY_POINT: &str = "exprFunc";

/// Wraps `expr` in `ENTRY_POINT` and compiles it into a fresh execution
/// context.
pub fn compile(
    context: &Context,
    expr: Expr,
    options: ExecutionOptions,
) -> Result<ExecutionContext<'_>, Error> {
    let module = expression_module(MODULE_NAME, ENTRY_POINT, expr)?;

    let mut execution = ExecutionContext::new(context, options)?;
    execution.add_module(&module)?;
    Ok(execution)
}

fn run_expr(expr: Expr, expected: DataType) -> Result<Value, Error> {
    let received = expr.data_type();
    if received != expected {
        return Err(Error::at(
            ErrorImpl::ReturnTypeMismatch { expected, received },
            expr.id(),
        ));
    }

    let context = Context::create();
    let execution = compile(&context, expr, ExecutionOptions::default())?;
    let value = execution.invoke(ENTRY_POINT)?;
    Ok(value)
}

fn mismatch(expected: DataType, value: Value) -> Error {
    Error::new(
        ErrorImpl::ReturnTypeMismatch {
            expected,
            received: value.data_type(),
        },
        None,
    )
}

/// Compiles and runs an `Int32` expression.
pub fn run_int32_expr(expr: Expr) -> Result<i32, Error> {
    let value = run_expr(expr, DataType::Int32)?;
    value
        .as_int32()
        .ok_or_else(|| mismatch(DataType::Int32, value))
}

/// Compiles and runs a `Float` expression.
pub fn run_float_expr(expr: Expr) -> Result<f32, Error> {
    let value = run_expr(expr, DataType::Float)?;
    value
        .as_float()
        .ok_or_else(|| mismatch(DataType::Float, value))
}
