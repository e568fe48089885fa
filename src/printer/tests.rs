//! Unit tests for the pretty printer.

use crate::{
    ast::{
        expressions::Expr,
        scope::Variable,
        types::{DataType, OperationKind},
    },
    builder::builder::{expression_module, BlockBuilder},
};

use super::printer::{describe, pretty_print, PrettyPrinter};
use crate::visitor::walker::walk_tree;

#[test]
fn test_print_literal() {
    assert_eq!(pretty_print(&Expr::int32(5)).unwrap(), "LiteralInt32: 5\n");
    assert_eq!(
        pretty_print(&Expr::float(1.5)).unwrap(),
        "LiteralFloat: 1.500000\n"
    );
}

#[test]
fn test_print_module() {
    let b = Variable::new("b", DataType::Float);
    let a = Variable::new("a", DataType::Int32);
    let block = BlockBuilder::new()
        .add_variable(b.clone())
        .add_variable(a.clone())
        .add_expression(Expr::assign(
            &a,
            Expr::binary(Expr::int32(1), OperationKind::Add, Expr::int32(-2)),
        ))
        .add_expression(Expr::conditional(
            Expr::variable_ref(&a),
            Some(Expr::ret(Expr::variable_ref(&b))),
            None,
        ))
        .build()
        .unwrap();
    let module = expression_module("ExprModule", "exprFunc", Expr::from(block)).unwrap();

    let expected = "\
Module: ExprModule
\tFunction: exprFunc
\t\tBlock:()
\t\t\tBlock:(a:Int32, b:Float)
\t\t\t\tAssignVariable: a
\t\t\t\t\tBinary: Add
\t\t\t\t\t\tLiteralInt32: 1
\t\t\t\t\t\tLiteralInt32: -2
\t\t\t\tConditional:
\t\t\t\t\tVariableRef: a
\t\t\t\t\tReturn:
\t\t\t\t\t\tVariableRef: b
";
    assert_eq!(pretty_print(&module).unwrap(), expected);
}

#[test]
fn test_printer_writes_into_sink() {
    let mut printer = PrettyPrinter::new(String::from("> "));
    walk_tree(&mut printer, &Expr::int32(1)).unwrap();

    assert_eq!(printer.into_inner(), "> LiteralInt32: 1\n");
}

#[test]
fn test_describe_binary() {
    let expr = Expr::binary(Expr::int32(1), OperationKind::Div, Expr::int32(2));
    assert_eq!(describe((&expr).into()), "Binary: Div");
}
