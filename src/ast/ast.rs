use std::{
    fmt::Display,
    sync::atomic::{AtomicU32, Ordering},
};

use super::{
    declarations::{Function, Module},
    expressions::Expr,
};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a node, unique within the process.
///
/// Assigned when the node is constructed and never reused, so errors can name
/// the exact node that failed even when two nodes are structurally equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node Kinds
///
/// Discriminant of every node the walker knows how to traverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Binary,
    VariableRef,
    Conditional,
    Block,
    LiteralInt32,
    LiteralFloat,
    AssignVariable,
    Return,
    Function,
    Module,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Binary => "Binary",
            NodeKind::VariableRef => "VariableRef",
            NodeKind::Conditional => "Conditional",
            NodeKind::Block => "Block",
            NodeKind::LiteralInt32 => "LiteralInt32",
            NodeKind::LiteralFloat => "LiteralFloat",
            NodeKind::AssignVariable => "AssignVariable",
            NodeKind::Return => "Return",
            NodeKind::Function => "Function",
            NodeKind::Module => "Module",
        };
        write!(f, "{}", name)
    }
}

/// Borrowed view of any node in a tree.
///
/// This is what the walker keeps on its ancestry stack and what the
/// `visiting_node` / `visited_node` hooks receive.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Module(&'a Module),
    Function(&'a Function),
    Expr(&'a Expr),
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Module(_) => NodeKind::Module,
            Node::Function(_) => NodeKind::Function,
            Node::Expr(expr) => expr.kind(),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Module(module) => module.id(),
            Node::Function(function) => function.id(),
            Node::Expr(expr) => expr.id(),
        }
    }

    pub fn as_expr(&self) -> Option<&'a Expr> {
        match self {
            Node::Expr(expr) => Some(expr),
            _ => None,
        }
    }
}

impl<'a> From<&'a Module> for Node<'a> {
    fn from(module: &'a Module) -> Self {
        Node::Module(module)
    }
}

impl<'a> From<&'a Function> for Node<'a> {
    fn from(function: &'a Function) -> Self {
        Node::Function(function)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expr(expr)
    }
}
