//! End-to-end tests that run the same trees through the evaluator and, when
//! available, the JIT, and expect identical results.

use treejit::{
    ast::{
        declarations::Module,
        expressions::Expr,
        scope::Variable,
        types::{DataType, OperationKind, Value},
    },
    builder::builder::{expression_module, BlockBuilder},
    evaluator::evaluator::evaluate_function,
    printer::printer::pretty_print,
    type_checker::type_checker::type_check,
};

const MODULE_NAME: &str = "ExprModule";
const ENTRY_POINT: &str = "exprFunc";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(feature = "llvm")]
fn run_both(module: &Module) -> Value {
    use inkwell::context::Context;
    use treejit::jit::engine::{ExecutionContext, ExecutionOptions};

    init_logger();
    let evaluated = evaluate_function(module, ENTRY_POINT).unwrap();

    let context = Context::create();
    let mut execution = ExecutionContext::new(&context, ExecutionOptions::default()).unwrap();
    execution.add_module(module).unwrap();
    let executed = execution.invoke(ENTRY_POINT).unwrap();

    assert_eq!(evaluated, executed, "evaluator and JIT disagree");
    evaluated
}

#[cfg(not(feature = "llvm"))]
fn run_both(module: &Module) -> Value {
    init_logger();
    evaluate_function(module, ENTRY_POINT).unwrap()
}

fn sample_module() -> Module {
    let var1 = Variable::new("var1", DataType::Int32);
    let var2 = Variable::new("var2", DataType::Int32);
    let block = BlockBuilder::new()
        .add_variable(var1.clone())
        .add_variable(var2.clone())
        .add_expression(Expr::assign(&var1, Expr::int32(12)))
        .add_expression(Expr::assign(
            &var2,
            Expr::binary(Expr::variable_ref(&var1), OperationKind::Mul, Expr::int32(6)),
        ))
        .add_expression(Expr::ret(Expr::variable_ref(&var2)))
        .build()
        .unwrap();

    expression_module(MODULE_NAME, ENTRY_POINT, Expr::from(block)).unwrap()
}

#[test]
fn test_sample_program() {
    let module = sample_module();

    assert!(type_check(&module).is_ok());
    assert_eq!(run_both(&module), Value::Int32(72));
}

#[test]
fn test_sample_program_printout() {
    let printed = pretty_print(&sample_module()).unwrap();
    let lines: Vec<&str> = printed.lines().collect();

    assert_eq!(lines[0], "Module: ExprModule");
    assert_eq!(lines[1], "\tFunction: exprFunc");
    assert_eq!(lines[3], "\t\t\tBlock:(var1:Int32, var2:Int32)");
    assert_eq!(lines.len(), 12);
}

#[test]
fn test_wrapping_int32_arithmetic() {
    let module = expression_module(
        MODULE_NAME,
        ENTRY_POINT,
        Expr::binary(Expr::int32(i32::MAX), OperationKind::Mul, Expr::int32(2)),
    )
    .unwrap();

    assert_eq!(run_both(&module), Value::Int32(-2));
}

#[test]
fn test_nested_blocks_and_shadowing() {
    let outer = Variable::new("x", DataType::Float);
    let inner = Variable::new("x", DataType::Float);
    let inner_block = BlockBuilder::new()
        .add_variable(inner.clone())
        .add_expression(Expr::assign(&inner, Expr::float(4.0)))
        .add_expression(Expr::binary(
            Expr::variable_ref(&inner),
            OperationKind::Mul,
            Expr::float(2.0),
        ))
        .build()
        .unwrap();
    let block = BlockBuilder::new()
        .add_variable(outer.clone())
        .add_expression(Expr::assign(&outer, Expr::float(0.5)))
        .add_expression(Expr::binary(
            inner_block.into(),
            OperationKind::Add,
            Expr::variable_ref(&outer),
        ))
        .build()
        .unwrap();
    let module = expression_module(MODULE_NAME, ENTRY_POINT, Expr::from(block)).unwrap();

    assert_eq!(run_both(&module), Value::Float(8.5));
}

#[test]
fn test_conditionals_agree() {
    for condition in [0, 1, -5] {
        let x = Variable::new("x", DataType::Int32);
        let block = BlockBuilder::new()
            .add_variable(x.clone())
            .add_expression(Expr::assign(&x, Expr::int32(condition)))
            .add_expression(Expr::conditional(
                Expr::variable_ref(&x),
                Some(Expr::binary(
                    Expr::variable_ref(&x),
                    OperationKind::Mul,
                    Expr::int32(3),
                )),
                None,
            ))
            .build()
            .unwrap();
        let module = expression_module(MODULE_NAME, ENTRY_POINT, Expr::from(block)).unwrap();

        assert_eq!(run_both(&module), Value::Int32(condition * 3));
    }
}

#[test]
fn test_int32_division_overflow_wraps() {
    for divisor in [-1, 1, 2] {
        let x = Variable::new("x", DataType::Int32);
        let block = BlockBuilder::new()
            .add_variable(x.clone())
            .add_expression(Expr::assign(&x, Expr::int32(divisor)))
            .add_expression(Expr::binary(
                Expr::int32(i32::MIN),
                OperationKind::Div,
                Expr::variable_ref(&x),
            ))
            .build()
            .unwrap();
        let module = expression_module(MODULE_NAME, ENTRY_POINT, Expr::from(block)).unwrap();

        assert_eq!(
            run_both(&module),
            Value::Int32(i32::MIN.wrapping_div(divisor))
        );
    }
}
