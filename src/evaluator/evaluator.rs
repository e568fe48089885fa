use std::{collections::HashMap, sync::Arc};

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Node, NodeId},
        declarations::{Function, Module},
        expressions::{
            AssignVariable, Binary, Conditional, ConditionalPart, Expr, LiteralFloat,
            LiteralInt32, Return, VariableRef,
        },
        scope::{Variable, VariableId},
        types::{DataType, OperationKind, Value},
    },
    errors::errors::{Error, ErrorImpl},
    visitor::{
        visitor::Visitor,
        walker::{walk_tree, WalkContext},
    },
};

/// Interprets a tree with a value stack.
///
/// Every expression leaves exactly one value on the stack. Nodes inside an
/// untaken conditional branch, and every node after a `Return` in the same
/// function, are walked but not evaluated. A module evaluates to the value of
/// its last function.
#[derive(Debug, Default)]
pub struct Evaluator {
    values: Vec<Value>,
    variables: HashMap<VariableId, Value>,
    branches: Vec<bool>,
    skip_until: Option<NodeId>,
    returned: Option<Value>,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator::default()
    }

    /// Walks `root` and returns the value it produced.
    pub fn evaluate<'a>(&mut self, root: impl Into<Node<'a>>) -> Result<Value, Error> {
        walk_tree(self, root)?;

        match self.returned.take() {
            Some(value) => Ok(value),
            None => self.pop(),
        }
    }

    fn is_suppressed(&self) -> bool {
        self.skip_until.is_some() || self.returned.is_some()
    }

    fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    fn pop(&mut self) -> Result<Value, Error> {
        self.values
            .pop()
            .ok_or_else(|| Error::invalid_state("value stack is empty", None))
    }

    fn read(&self, variable: &Arc<Variable>, node: NodeId) -> Result<Value, Error> {
        match self.variables.get(&variable.id()) {
            Some(value) => Ok(*value),
            None => zero_of(variable.data_type(), node),
        }
    }
}

fn zero_of(data_type: DataType, node: NodeId) -> Result<Value, Error> {
    data_type
        .zero_value()
        .ok_or_else(|| Error::unhandled(data_type, Some(node)))
}

/// Applies `operation` to two values of the same type.
pub fn apply(
    operation: OperationKind,
    l_value: Value,
    r_value: Value,
    node: NodeId,
) -> Result<Value, Error> {
    let value = match (l_value, r_value) {
        (Value::Int32(l), Value::Int32(r)) => Value::Int32(match operation {
            OperationKind::Add => l.wrapping_add(r),
            OperationKind::Sub => l.wrapping_sub(r),
            OperationKind::Mul => l.wrapping_mul(r),
            OperationKind::Div => {
                if r == 0 {
                    return Err(Error::at(ErrorImpl::DivisionByZero, node));
                }
                l.wrapping_div(r)
            }
        }),
        (Value::Float(l), Value::Float(r)) => Value::Float(match operation {
            OperationKind::Add => l + r,
            OperationKind::Sub => l - r,
            OperationKind::Mul => l * r,
            OperationKind::Div => l / r,
        }),
        (Value::Double(l), Value::Double(r)) => Value::Double(match operation {
            OperationKind::Add => l + r,
            OperationKind::Sub => l - r,
            OperationKind::Mul => l * r,
            OperationKind::Div => l / r,
        }),
        (l, r) if l.data_type() == r.data_type() => {
            return Err(Error::unhandled(
                format!("{} on {}", operation, l.data_type()),
                Some(node),
            ));
        }
        (l, r) => {
            return Err(Error::at(
                ErrorImpl::BinaryExprDataTypeMismatch {
                    l_value: l.data_type(),
                    r_value: r.data_type(),
                },
                node,
            ));
        }
    };

    Ok(value)
}

impl Visitor for Evaluator {
    fn initialize(&mut self) -> Result<(), Error> {
        self.values.clear();
        self.variables.clear();
        self.branches.clear();
        self.skip_until = None;
        self.returned = None;
        Ok(())
    }

    fn visiting_function(
        &mut self,
        _function: &Function,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        self.values.clear();
        self.branches.clear();
        self.skip_until = None;
        self.returned = None;
        Ok(())
    }

    fn visited_function(
        &mut self,
        function: &Function,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        let value = match self.returned.take() {
            Some(value) => value,
            None => self.pop()?,
        };
        trace!("function {} produced {}", function.name(), value);
        self.values.clear();
        self.push(value);
        Ok(())
    }

    fn visiting_node(&mut self, node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        if self.is_suppressed() {
            return Ok(());
        }

        let taken_part = match ctx.conditional_part() {
            Some(ConditionalPart::Condition) | None => return Ok(()),
            Some(part) => part,
        };

        let condition = *self.branches.last().ok_or_else(|| {
            Error::invalid_state("branch visited before its condition", Some(node.id()))
        })?;

        if condition != (taken_part == ConditionalPart::TruePart) {
            trace!("skipping untaken branch {}", node.id());
            self.skip_until = Some(node.id());
        }

        Ok(())
    }

    fn visited_node(&mut self, node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        if self.skip_until == Some(node.id()) {
            self.skip_until = None;
            return Ok(());
        }
        if self.is_suppressed() {
            return Ok(());
        }

        if ctx.conditional_part() == Some(ConditionalPart::Condition) {
            let condition = self.pop()?;
            self.branches.push(condition.is_truthy());
        }

        Ok(())
    }

    fn discard_value(&mut self, _node: Node<'_>, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        if self.is_suppressed() {
            return Ok(());
        }

        self.pop()?;
        Ok(())
    }

    fn visited_conditional(
        &mut self,
        expr: &Conditional,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        if self.is_suppressed() {
            return Ok(());
        }

        let condition = self.branches.pop().ok_or_else(|| {
            Error::invalid_state("conditional has no evaluated condition", Some(expr.id()))
        })?;

        let taken = if condition {
            expr.true_part()
        } else {
            expr.false_part()
        };

        // A missing part produces the zero of the conditional's type.
        if taken.is_none() {
            self.push(zero_of(expr.data_type(), expr.id())?);
        }

        Ok(())
    }

    fn visited_binary(&mut self, expr: &Binary, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        if self.is_suppressed() {
            return Ok(());
        }

        let r_value = self.pop()?;
        let l_value = self.pop()?;
        let value = apply(expr.operation(), l_value, r_value, expr.id())?;
        self.push(value);
        Ok(())
    }

    fn visited_assign_variable(
        &mut self,
        expr: &AssignVariable,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        if self.is_suppressed() {
            return Ok(());
        }

        let variable = ctx.resolve_variable(expr.name(), expr.id())?;
        let value = self.pop()?;
        trace!("{} ({}) = {}", variable, variable.id(), value);
        self.variables.insert(variable.id(), value);
        self.push(value);
        Ok(())
    }

    fn visited_return(&mut self, expr: &Return, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        if self.is_suppressed() {
            return Ok(());
        }

        let value = self.pop()?;
        trace!("return {} at {}", value, expr.id());
        self.returned = Some(value);
        Ok(())
    }

    fn visit_literal_int32(
        &mut self,
        expr: &LiteralInt32,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        if !self.is_suppressed() {
            self.push(Value::Int32(expr.value()));
        }
        Ok(())
    }

    fn visit_literal_float(
        &mut self,
        expr: &LiteralFloat,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        if !self.is_suppressed() {
            self.push(Value::Float(expr.value()));
        }
        Ok(())
    }

    fn visit_variable_ref(
        &mut self,
        expr: &VariableRef,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        if self.is_suppressed() {
            return Ok(());
        }

        let variable = ctx.resolve_variable(expr.name(), expr.id())?;
        let value = self.read(variable, expr.id())?;
        self.push(value);
        Ok(())
    }
}

/// Evaluates a standalone expression.
pub fn evaluate_expr(expr: &Expr) -> Result<Value, Error> {
    let value = Evaluator::new().evaluate(expr)?;
    debug!("expression {} evaluated to {}", expr.id(), value);
    Ok(value)
}

/// Evaluates the function called `name` in `module`.
///
/// The result is checked against the function's declared return type; a
/// `void` function always produces `Value::Void`.
pub fn evaluate_function(module: &Module, name: &str) -> Result<Value, Error> {
    let function = module.find_function(name).ok_or_else(|| {
        Error::new(
            ErrorImpl::EntryPointNotFound {
                name: name.to_string(),
            },
            Some(module.id()),
        )
    })?;

    let value = Evaluator::new().evaluate(function)?;
    debug!("function {} evaluated to {}", name, value);

    match function.return_type() {
        DataType::Void => Ok(Value::Void),
        expected if expected == value.data_type() => Ok(value),
        expected => Err(Error::at(
            ErrorImpl::ReturnTypeMismatch {
                expected,
                received: value.data_type(),
            },
            function.id(),
        )),
    }
}
