//! Unit tests for the tree walker.
//!
//! This module contains tests for:
//! - Hook ordering and the ancestry stack
//! - The block discard rule
//! - Variable resolution and shadowing
//! - Error propagation and `clean_up`

use crate::{
    ast::{
        ast::{Node, NodeKind},
        expressions::{Binary, Expr, LiteralInt32, VariableRef},
        scope::{Variable, VariableId},
        types::{DataType, OperationKind},
    },
    builder::builder::{BlockBuilder, FunctionBuilder},
    errors::errors::{Error, ErrorImpl},
};

use super::{
    visitor::Visitor,
    walker::{discards_result, walk_tree, WalkContext},
};

/// Records every hook it receives.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Visitor for Recorder {
    fn initialize(&mut self) -> Result<(), Error> {
        self.events.push("initialize".to_string());
        Ok(())
    }

    fn clean_up(&mut self) -> Result<(), Error> {
        self.events.push("clean_up".to_string());
        Ok(())
    }

    fn visiting_node(&mut self, node: Node<'_>, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        self.events.push(format!("visiting_node {}", node.kind()));
        Ok(())
    }

    fn visited_node(&mut self, node: Node<'_>, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        self.events.push(format!("visited_node {}", node.kind()));
        Ok(())
    }

    fn discard_value(&mut self, node: Node<'_>, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        self.events.push(format!("discard {}", node.kind()));
        Ok(())
    }

    fn visiting_binary(&mut self, _expr: &Binary, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        self.events.push("visiting_binary".to_string());
        Ok(())
    }

    fn visited_binary(&mut self, _expr: &Binary, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        self.events.push("visited_binary".to_string());
        Ok(())
    }

    fn visit_literal_int32(
        &mut self,
        expr: &LiteralInt32,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        self.events.push(format!("literal {}", expr.value()));
        Ok(())
    }
}

/// Pushes one entry per literal and pops one per discard.
#[derive(Default)]
struct StackVisitor {
    stack: Vec<i32>,
    discarded: Vec<i32>,
}

impl Visitor for StackVisitor {
    fn discard_value(&mut self, _node: Node<'_>, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        let value = self.stack.pop().expect("discard with an empty stack");
        self.discarded.push(value);
        Ok(())
    }

    fn visit_literal_int32(
        &mut self,
        expr: &LiteralInt32,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        self.stack.push(expr.value());
        Ok(())
    }
}

#[test]
fn test_hook_order_for_binary() {
    let expr = Expr::binary(Expr::int32(1), OperationKind::Add, Expr::int32(2));
    let mut recorder = Recorder::default();

    walk_tree(&mut recorder, &expr).unwrap();

    assert_eq!(
        recorder.events,
        vec![
            "initialize",
            "visiting_node Binary",
            "visiting_binary",
            "visiting_node LiteralInt32",
            "literal 1",
            "visited_node LiteralInt32",
            "visiting_node LiteralInt32",
            "literal 2",
            "visited_node LiteralInt32",
            "visited_binary",
            "visited_node Binary",
            "clean_up",
        ]
    );
}

#[test]
fn test_discard_follows_visited_node() {
    let block = BlockBuilder::new()
        .add_expression(Expr::int32(1))
        .add_expression(Expr::int32(2))
        .build()
        .unwrap();
    let expr = Expr::from(block);
    let mut recorder = Recorder::default();

    walk_tree(&mut recorder, &expr).unwrap();

    let discard = recorder
        .events
        .iter()
        .position(|event| event == "discard LiteralInt32")
        .unwrap();
    assert_eq!(recorder.events[discard - 1], "visited_node LiteralInt32");
    assert_eq!(recorder.events[discard + 1], "visiting_node LiteralInt32");
    assert_eq!(
        recorder
            .events
            .iter()
            .filter(|event| event.starts_with("discard"))
            .count(),
        1
    );
}

#[test]
fn test_block_discards_all_but_last() {
    for count in 1..=5 {
        let mut builder = BlockBuilder::new();
        for value in 0..count {
            builder.add_expression(Expr::int32(value));
        }
        let expr = Expr::from(builder.build().unwrap());

        let mut visitor = StackVisitor::default();
        walk_tree(&mut visitor, &expr).unwrap();

        assert_eq!(visitor.stack, vec![count - 1], "block of {} expression(s)", count);
        assert_eq!(visitor.discarded, (0..count - 1).collect::<Vec<i32>>());
    }
}

#[test]
fn test_discards_result() {
    assert!(discards_result(Some(NodeKind::Block), 0, 2));
    assert!(!discards_result(Some(NodeKind::Block), 1, 2));
    assert!(!discards_result(Some(NodeKind::Block), 0, 1));
    assert!(!discards_result(Some(NodeKind::Binary), 0, 2));
    assert!(!discards_result(Some(NodeKind::Conditional), 1, 3));
    assert!(!discards_result(None, 0, 2));
}

#[test]
fn test_walk_is_repeatable() {
    let x = Variable::new("x", DataType::Int32);
    let expr = Expr::from(
        BlockBuilder::new()
            .add_variable(x.clone())
            .add_expression(Expr::assign(&x, Expr::int32(3)))
            .add_expression(Expr::variable_ref(&x))
            .build()
            .unwrap(),
    );

    let mut first = Recorder::default();
    let mut second = Recorder::default();
    walk_tree(&mut first, &expr).unwrap();
    walk_tree(&mut second, &expr).unwrap();

    assert_eq!(first.events, second.events);
}

#[test]
fn test_ancestry() {
    #[derive(Default)]
    struct AncestryVisitor {
        seen: Vec<(i32, usize, Option<NodeKind>)>,
    }

    impl Visitor for AncestryVisitor {
        fn visit_literal_int32(
            &mut self,
            expr: &LiteralInt32,
            ctx: &WalkContext<'_>,
        ) -> Result<(), Error> {
            assert_eq!(ctx.current().map(|node| node.kind()), Some(NodeKind::LiteralInt32));
            self.seen
                .push((expr.value(), ctx.depth(), ctx.parent().map(|node| node.kind())));
            Ok(())
        }
    }

    let expr = Expr::binary(
        Expr::int32(1),
        OperationKind::Mul,
        Expr::ret(Expr::int32(2)),
    );
    let mut visitor = AncestryVisitor::default();
    walk_tree(&mut visitor, &expr).unwrap();

    assert_eq!(
        visitor.seen,
        vec![
            (1, 2, Some(NodeKind::Binary)),
            (2, 3, Some(NodeKind::Return)),
        ]
    );
}

#[derive(Default)]
struct ResolutionVisitor {
    resolved: Vec<VariableId>,
}

impl Visitor for ResolutionVisitor {
    fn visit_variable_ref(
        &mut self,
        expr: &VariableRef,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        let variable = ctx.resolve_variable(expr.name(), expr.id())?;
        self.resolved.push(variable.id());
        Ok(())
    }
}

#[test]
fn test_inner_scope_shadows_outer() {
    let outer = Variable::new("x", DataType::Int32);
    let inner = Variable::new("x", DataType::Int32);

    let inner_block = BlockBuilder::new()
        .add_variable(inner.clone())
        .add_expression(Expr::variable_ref(&inner))
        .build()
        .unwrap();
    let expr = Expr::from(
        BlockBuilder::new()
            .add_variable(outer.clone())
            .add_expression(Expr::variable_ref(&outer))
            .add_expression(inner_block)
            .add_expression(Expr::variable_ref(&outer))
            .build()
            .unwrap(),
    );

    let mut visitor = ResolutionVisitor::default();
    walk_tree(&mut visitor, &expr).unwrap();

    assert_eq!(visitor.resolved, vec![outer.id(), inner.id(), outer.id()]);
}

#[test]
fn test_function_parameters_are_in_scope() {
    let x = Variable::new("x", DataType::Int32);
    let mut builder = FunctionBuilder::new("f", DataType::Int32);
    builder.add_parameter(x.clone());
    builder.block_builder().add_expression(Expr::variable_ref(&x));
    let function = builder.build().unwrap();

    let mut visitor = ResolutionVisitor::default();
    walk_tree(&mut visitor, &function).unwrap();

    assert_eq!(visitor.resolved, vec![x.id()]);
}

#[test]
fn test_undeclared_variable_is_fatal() {
    let x = Variable::new("x", DataType::Int32);
    let reference = Expr::variable_ref(&x);
    let reference_id = reference.id();
    let expr = Expr::from(BlockBuilder::new().add_expression(reference).build().unwrap());

    let error = walk_tree(&mut Recorder::default(), &expr).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::VariableNotDeclared {
            variable: "x".to_string()
        }
    );
    assert!(error.is_fatal());
    assert_eq!(error.get_node(), Some(reference_id));
}

#[test]
fn test_undeclared_assignment_is_fatal() {
    let x = Variable::new("x", DataType::Int32);
    let expr = Expr::assign(&x, Expr::int32(1));

    let error = walk_tree(&mut Recorder::default(), &expr).unwrap_err();
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

/// `{ x: Int32; { x: Float; <inner(outer x)> } }`
fn shadowing_block(inner: impl FnOnce(&std::sync::Arc<Variable>) -> Expr) -> Expr {
    let outer = Variable::new("x", DataType::Int32);
    let shadow = Variable::new("x", DataType::Float);

    let inner_block = BlockBuilder::new()
        .add_variable(shadow.clone())
        .add_expression(Expr::assign(&shadow, Expr::float(0.5)))
        .add_expression(inner(&outer))
        .build()
        .unwrap();

    Expr::from(
        BlockBuilder::new()
            .add_variable(outer.clone())
            .add_expression(Expr::assign(&outer, Expr::int32(1)))
            .add_expression(inner_block)
            .build()
            .unwrap(),
    )
}

#[test]
fn test_reference_to_shadowed_variable_is_fatal() {
    let mut reference_id = None;
    let expr = shadowing_block(|outer| {
        let reference = Expr::variable_ref(outer);
        reference_id = Some(reference.id());
        Expr::binary(reference, OperationKind::Add, Expr::int32(1))
    });

    let mut recorder = Recorder::default();
    let error = walk_tree(&mut recorder, &expr).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::VariableShadowed {
            variable: "x".to_string()
        }
    );
    assert!(error.is_fatal());
    assert_eq!(error.get_node(), reference_id);
    assert!(!recorder.events.contains(&"visited_binary".to_string()));
}

#[test]
fn test_assignment_to_shadowed_variable_is_fatal() {
    let expr = shadowing_block(|outer| Expr::assign(outer, Expr::int32(2)));

    let error = walk_tree(&mut Recorder::default(), &expr).unwrap_err();
    assert_eq!(error.get_error_name(), "VariableShadowed");
}

#[test]
fn test_binary_type_mismatch_stops_walk() {
    let expr = Expr::binary(Expr::float(1.0), OperationKind::Add, Expr::int32(2));
    let mut recorder = Recorder::default();

    let error = walk_tree(&mut recorder, &expr).unwrap_err();

    assert!(error.is_compile_error());
    assert_eq!(error.get_node(), Some(expr.id()));
    assert!(!recorder.events.contains(&"visited_binary".to_string()));
    assert_eq!(recorder.events.last().unwrap(), "clean_up");
}

/// Fails in a configurable hook and counts `clean_up` calls.
#[derive(Default)]
struct FailingVisitor {
    fail_initialize: bool,
    fail_literal: bool,
    fail_clean_up: bool,
    clean_ups: usize,
}

impl Visitor for FailingVisitor {
    fn initialize(&mut self) -> Result<(), Error> {
        if self.fail_initialize {
            return Err(Error::invalid_state("initialize failed", None));
        }
        Ok(())
    }

    fn clean_up(&mut self) -> Result<(), Error> {
        self.clean_ups += 1;
        if self.fail_clean_up {
            return Err(Error::invalid_state("clean_up failed", None));
        }
        Ok(())
    }

    fn visit_literal_int32(
        &mut self,
        _expr: &LiteralInt32,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        if self.fail_literal {
            return Err(Error::invalid_state("literal failed", None));
        }
        Ok(())
    }
}

fn invalid_state_message(error: &Error) -> String {
    match error.get_impl() {
        ErrorImpl::InvalidState { message } => message.clone(),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_clean_up_runs_after_visitor_error() {
    let expr = Expr::int32(1);
    let mut visitor = FailingVisitor {
        fail_literal: true,
        ..Default::default()
    };

    let error = walk_tree(&mut visitor, &expr).unwrap_err();

    assert_eq!(invalid_state_message(&error), "literal failed");
    assert_eq!(visitor.clean_ups, 1);
}

#[test]
fn test_clean_up_runs_after_initialize_error() {
    let expr = Expr::int32(1);
    let mut visitor = FailingVisitor {
        fail_initialize: true,
        fail_literal: true,
        ..Default::default()
    };

    let error = walk_tree(&mut visitor, &expr).unwrap_err();

    assert_eq!(invalid_state_message(&error), "initialize failed");
    assert_eq!(visitor.clean_ups, 1);
}

#[test]
fn test_clean_up_error_is_reported() {
    let expr = Expr::int32(1);
    let mut visitor = FailingVisitor {
        fail_clean_up: true,
        ..Default::default()
    };

    let error = walk_tree(&mut visitor, &expr).unwrap_err();
    assert_eq!(invalid_state_message(&error), "clean_up failed");
}

#[test]
fn test_first_error_wins() {
    let expr = Expr::int32(1);
    let mut visitor = FailingVisitor {
        fail_literal: true,
        fail_clean_up: true,
        ..Default::default()
    };

    let error = walk_tree(&mut visitor, &expr).unwrap_err();

    assert_eq!(invalid_state_message(&error), "literal failed");
    assert_eq!(visitor.clean_ups, 1);
}
