use std::time::Instant;

use treejit::{
    ast::{
        expressions::Expr,
        scope::Variable,
        types::{DataType, OperationKind},
    },
    builder::builder::{FunctionBuilder, ModuleBuilder},
    display_error,
    errors::errors::Error,
    evaluator::evaluator::evaluate_function,
    printer::printer::pretty_print,
    type_checker::type_checker::type_check,
};

const FUNCTION_NAME: &str = "sample";

/// var1 = 12; var2 = var1 * 6; return var2
fn build_sample() -> Result<treejit::ast::declarations::Module, Error> {
    let var1 = Variable::new("var1", DataType::Int32);
    let var2 = Variable::new("var2", DataType::Int32);

    let mut function = FunctionBuilder::new(FUNCTION_NAME, DataType::Int32);
    function
        .block_builder()
        .add_variable(var1.clone())
        .add_variable(var2.clone())
        .add_expression(Expr::assign(&var1, Expr::int32(12)))
        .add_expression(Expr::assign(
            &var2,
            Expr::binary(
                Expr::variable_ref(&var1),
                OperationKind::Mul,
                Expr::int32(6),
            ),
        ))
        .add_expression(Expr::ret(Expr::variable_ref(&var2)));

    ModuleBuilder::new("SampleModule")
        .add_function(function.build()?)
        .build()
}

#[cfg(feature = "llvm")]
fn run_jit(module: &treejit::ast::declarations::Module) -> Result<(), Error> {
    use inkwell::context::Context;
    use treejit::jit::engine::{ExecutionContext, ExecutionOptions};

    let start = Instant::now();
    let context = Context::create();
    let mut execution = ExecutionContext::new(&context, ExecutionOptions::default())?;
    execution.add_module(module)?;
    println!("Compiled in {:?}", start.elapsed());

    let value = execution.invoke(FUNCTION_NAME)?;
    println!("JIT result: {}", value);
    Ok(())
}

#[cfg(not(feature = "llvm"))]
fn run_jit(_module: &treejit::ast::declarations::Module) -> Result<(), Error> {
    println!("JIT disabled (built without the `llvm` feature)");
    Ok(())
}

fn run() -> Result<(), Error> {
    let module = build_sample()?;
    print!("{}", pretty_print(&module)?);

    let start = Instant::now();
    type_check(&module)?;
    println!("Type checked in {:?}", start.elapsed());

    let value = evaluate_function(&module, FUNCTION_NAME)?;
    println!("Evaluator result: {}", value);

    run_jit(&module)
}

fn main() {
    env_logger::init();

    if let Err(error) = run() {
        display_error(&error);
        std::process::exit(1);
    }
}
