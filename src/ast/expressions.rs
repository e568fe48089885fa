use std::sync::Arc;

use super::{
    ast::{NodeId, NodeKind},
    scope::{Scope, Variable},
    types::{DataType, OperationKind},
};

/// Expression
///
/// Closed set of expression nodes. Every variant exclusively owns its
/// structural children; variables are shared with the scope declaring them.
#[derive(Debug)]
pub enum Expr {
    LiteralInt32(LiteralInt32),
    LiteralFloat(LiteralFloat),
    Binary(Binary),
    VariableRef(VariableRef),
    Conditional(Conditional),
    Block(Block),
    AssignVariable(AssignVariable),
    Return(Return),
}

impl Expr {
    pub fn int32(value: i32) -> Self {
        Expr::LiteralInt32(LiteralInt32::new(value))
    }

    pub fn float(value: f32) -> Self {
        Expr::LiteralFloat(LiteralFloat::new(value))
    }

    pub fn binary(l_value: Expr, operation: OperationKind, r_value: Expr) -> Self {
        Expr::Binary(Binary::new(l_value, operation, r_value))
    }

    pub fn variable_ref(variable: &Arc<Variable>) -> Self {
        Expr::VariableRef(VariableRef::new(variable))
    }

    pub fn assign(variable: &Arc<Variable>, value: Expr) -> Self {
        Expr::AssignVariable(AssignVariable::new(variable, value))
    }

    pub fn ret(value: Expr) -> Self {
        Expr::Return(Return::new(value))
    }

    pub fn conditional(condition: Expr, true_part: Option<Expr>, false_part: Option<Expr>) -> Self {
        Expr::Conditional(Conditional::new(condition, true_part, false_part))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::LiteralInt32(_) => NodeKind::LiteralInt32,
            Expr::LiteralFloat(_) => NodeKind::LiteralFloat,
            Expr::Binary(_) => NodeKind::Binary,
            Expr::VariableRef(_) => NodeKind::VariableRef,
            Expr::Conditional(_) => NodeKind::Conditional,
            Expr::Block(_) => NodeKind::Block,
            Expr::AssignVariable(_) => NodeKind::AssignVariable,
            Expr::Return(_) => NodeKind::Return,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Expr::LiteralInt32(expr) => expr.id,
            Expr::LiteralFloat(expr) => expr.id,
            Expr::Binary(expr) => expr.id,
            Expr::VariableRef(expr) => expr.id,
            Expr::Conditional(expr) => expr.id,
            Expr::Block(expr) => expr.id,
            Expr::AssignVariable(expr) => expr.id,
            Expr::Return(expr) => expr.id,
        }
    }

    /// Structurally derived data type; nothing is cached on the node.
    pub fn data_type(&self) -> DataType {
        match self {
            Expr::LiteralInt32(_) => DataType::Int32,
            Expr::LiteralFloat(_) => DataType::Float,
            Expr::Binary(expr) => expr.data_type(),
            Expr::VariableRef(expr) => expr.data_type(),
            Expr::Conditional(expr) => expr.data_type(),
            Expr::Block(expr) => expr.data_type(),
            Expr::AssignVariable(expr) => expr.data_type(),
            Expr::Return(expr) => expr.data_type(),
        }
    }
}

impl From<Block> for Expr {
    fn from(block: Block) -> Self {
        Expr::Block(block)
    }
}

// LITERALS

#[derive(Debug)]
pub struct LiteralInt32 {
    id: NodeId,
    value: i32,
}

impl LiteralInt32 {
    pub fn new(value: i32) -> Self {
        LiteralInt32 {
            id: NodeId::next(),
            value,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

#[derive(Debug)]
pub struct LiteralFloat {
    id: NodeId,
    value: f32,
}

impl LiteralFloat {
    pub fn new(value: f32) -> Self {
        LiteralFloat {
            id: NodeId::next(),
            value,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

// COMPLEX

/// Binary Expression
///
/// Operand types are not compared here; the walker reports a mismatch when
/// the expression is visited.
#[derive(Debug)]
pub struct Binary {
    id: NodeId,
    l_value: Box<Expr>,
    operation: OperationKind,
    r_value: Box<Expr>,
}

impl Binary {
    pub fn new(l_value: Expr, operation: OperationKind, r_value: Expr) -> Self {
        Binary {
            id: NodeId::next(),
            l_value: Box::new(l_value),
            operation,
            r_value: Box::new(r_value),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn l_value(&self) -> &Expr {
        &self.l_value
    }

    pub fn r_value(&self) -> &Expr {
        &self.r_value
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    /// The rvalue's type. Only meaningful once the operand types were checked
    /// to be equal.
    pub fn data_type(&self) -> DataType {
        self.r_value.data_type()
    }
}

#[derive(Debug)]
pub struct VariableRef {
    id: NodeId,
    variable: Arc<Variable>,
}

impl VariableRef {
    pub fn new(variable: &Arc<Variable>) -> Self {
        VariableRef {
            id: NodeId::next(),
            variable: Arc::clone(variable),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.variable.name()
    }

    pub fn variable(&self) -> &Arc<Variable> {
        &self.variable
    }

    pub fn data_type(&self) -> DataType {
        self.variable.data_type()
    }
}

#[derive(Debug)]
pub struct AssignVariable {
    id: NodeId,
    variable: Arc<Variable>,
    value_expr: Box<Expr>,
}

impl AssignVariable {
    pub fn new(variable: &Arc<Variable>, value_expr: Expr) -> Self {
        AssignVariable {
            id: NodeId::next(),
            variable: Arc::clone(variable),
            value_expr: Box::new(value_expr),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.variable.name()
    }

    pub fn variable(&self) -> &Arc<Variable> {
        &self.variable
    }

    pub fn value_expr(&self) -> &Expr {
        &self.value_expr
    }

    pub fn data_type(&self) -> DataType {
        self.variable.data_type()
    }
}

#[derive(Debug)]
pub struct Return {
    id: NodeId,
    value_expr: Box<Expr>,
}

impl Return {
    pub fn new(value_expr: Expr) -> Self {
        Return {
            id: NodeId::next(),
            value_expr: Box::new(value_expr),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value_expr(&self) -> &Expr {
        &self.value_expr
    }

    pub fn data_type(&self) -> DataType {
        self.value_expr.data_type()
    }
}

/// Which child of a conditional a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalPart {
    Condition,
    TruePart,
    FalsePart,
}

#[derive(Debug)]
pub struct Conditional {
    id: NodeId,
    condition: Box<Expr>,
    true_part: Option<Box<Expr>>,
    false_part: Option<Box<Expr>>,
}

impl Conditional {
    pub fn new(condition: Expr, true_part: Option<Expr>, false_part: Option<Expr>) -> Self {
        Conditional {
            id: NodeId::next(),
            condition: Box::new(condition),
            true_part: true_part.map(Box::new),
            false_part: false_part.map(Box::new),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn true_part(&self) -> Option<&Expr> {
        self.true_part.as_deref()
    }

    pub fn false_part(&self) -> Option<&Expr> {
        self.false_part.as_deref()
    }

    /// Locates a direct child by identity.
    pub fn part_of(&self, child: NodeId) -> Option<ConditionalPart> {
        if self.condition.id() == child {
            Some(ConditionalPart::Condition)
        } else if self.true_part().map(Expr::id) == Some(child) {
            Some(ConditionalPart::TruePart)
        } else if self.false_part().map(Expr::id) == Some(child) {
            Some(ConditionalPart::FalsePart)
        } else {
            None
        }
    }

    pub fn data_type(&self) -> DataType {
        match (self.true_part(), self.false_part()) {
            (Some(true_part), _) => true_part.data_type(),
            (None, Some(false_part)) => false_part.data_type(),
            (None, None) => DataType::Void,
        }
    }
}

/// Block Expression
///
/// A series of expressions sharing one scope, such as a function body. Built
/// through `BlockBuilder`, which rejects empty blocks.
#[derive(Debug)]
pub struct Block {
    id: NodeId,
    scope: Scope,
    expressions: Vec<Expr>,
}

impl Block {
    pub(crate) fn new(scope: Scope, expressions: Vec<Expr>) -> Self {
        Block {
            id: NodeId::next(),
            scope,
            expressions,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn expressions(&self) -> &[Expr] {
        &self.expressions
    }

    /// The type of the last expression in the block.
    pub fn data_type(&self) -> DataType {
        self.expressions
            .last()
            .map(Expr::data_type)
            .unwrap_or(DataType::Void)
    }
}
