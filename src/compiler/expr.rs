use inkwell::{
    values::{BasicValueEnum, IntValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::{
        ast::NodeId,
        expressions::{LiteralFloat, LiteralInt32},
        types::{DataType, OperationKind},
    },
    errors::errors::Error,
};

use super::compiler::Compiler;

pub fn gen_literal_int32<'ctx>(compiler: &Compiler<'ctx>, expr: &LiteralInt32) -> BasicValueEnum<'ctx> {
    compiler
        .context
        .i32_type()
        .const_int(expr.value() as u64, true)
        .into()
}

pub fn gen_literal_float<'ctx>(compiler: &Compiler<'ctx>, expr: &LiteralFloat) -> BasicValueEnum<'ctx> {
    compiler
        .context
        .f32_type()
        .const_float(expr.value() as f64)
        .into()
}

/// The constant an unassigned variable or a missing conditional part of type
/// `data_type` holds. `Void` has no value.
pub fn gen_zero<'ctx>(
    compiler: &Compiler<'ctx>,
    data_type: DataType,
    node: NodeId,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    let zero = match data_type {
        DataType::Void => return Ok(None),
        DataType::Bool => compiler.context.i8_type().const_zero().into(),
        DataType::Int32 => compiler.context.i32_type().const_zero().into(),
        DataType::Float => compiler.context.f32_type().const_zero().into(),
        DataType::Double => compiler.context.f64_type().const_zero().into(),
        DataType::Pointer => return Err(Error::unhandled(data_type, Some(node))),
    };

    Ok(Some(zero))
}

/// Emits the arithmetic instruction for `operation` on two operands of
/// `data_type`.
pub fn gen_binary<'ctx>(
    compiler: &Compiler<'ctx>,
    operation: OperationKind,
    data_type: DataType,
    l_value: BasicValueEnum<'ctx>,
    r_value: BasicValueEnum<'ctx>,
    node: NodeId,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let builder = &compiler.builder;

    match data_type {
        DataType::Int32 => {
            let (l, r) = (l_value.into_int_value(), r_value.into_int_value());
            let value = match operation {
                OperationKind::Add => builder.build_int_add(l, r, "add")?,
                OperationKind::Sub => builder.build_int_sub(l, r, "sub")?,
                OperationKind::Mul => builder.build_int_mul(l, r, "mul")?,
                OperationKind::Div => gen_wrapping_signed_div(compiler, l, r)?,
            };
            Ok(value.into())
        }
        DataType::Float | DataType::Double => {
            let (l, r) = (l_value.into_float_value(), r_value.into_float_value());
            let value = match operation {
                OperationKind::Add => builder.build_float_add(l, r, "fadd")?,
                OperationKind::Sub => builder.build_float_sub(l, r, "fsub")?,
                OperationKind::Mul => builder.build_float_mul(l, r, "fmul")?,
                OperationKind::Div => builder.build_float_div(l, r, "fdiv")?,
            };
            Ok(value.into())
        }
        DataType::Void | DataType::Bool | DataType::Pointer => Err(Error::unhandled(
            format!("{} on {}", operation, data_type),
            Some(node),
        )),
    }
}

/// Signed division where `MIN / -1` wraps to `MIN`, like the other integer
/// operations, instead of being undefined. A divisor of `-1` is replaced by
/// `1` and the quotient by the negated dividend.
fn gen_wrapping_signed_div<'ctx>(
    compiler: &Compiler<'ctx>,
    l: IntValue<'ctx>,
    r: IntValue<'ctx>,
) -> Result<IntValue<'ctx>, Error> {
    let builder = &compiler.builder;
    let int_type = r.get_type();

    let is_minus_one =
        builder.build_int_compare(IntPredicate::EQ, r, int_type.const_all_ones(), "isminusone")?;
    let divisor = builder
        .build_select(is_minus_one, int_type.const_int(1, false), r, "divisor")?
        .into_int_value();
    let quotient = builder.build_int_signed_div(l, divisor, "div")?;
    let negated = builder.build_int_neg(l, "neg")?;

    Ok(builder
        .build_select(is_minus_one, negated, quotient, "quotient")?
        .into_int_value())
}

/// Reduces a condition value to an `i1` that is set when the value is non-zero.
pub fn gen_truthiness<'ctx>(
    compiler: &Compiler<'ctx>,
    condition: BasicValueEnum<'ctx>,
    data_type: DataType,
    node: NodeId,
) -> Result<IntValue<'ctx>, Error> {
    let builder = &compiler.builder;

    match data_type {
        DataType::Bool | DataType::Int32 => {
            let value = condition.into_int_value();
            Ok(builder.build_int_compare(
                IntPredicate::NE,
                value,
                value.get_type().const_zero(),
                "cond",
            )?)
        }
        DataType::Float | DataType::Double => {
            let value = condition.into_float_value();
            Ok(builder.build_float_compare(
                FloatPredicate::ONE,
                value,
                value.get_type().const_zero(),
                "cond",
            )?)
        }
        DataType::Void | DataType::Pointer => Err(Error::unhandled(
            format!("condition of type {}", data_type),
            Some(node),
        )),
    }
}
