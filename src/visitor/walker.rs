use std::sync::Arc;

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Node, NodeId, NodeKind},
        declarations::{Function, Module},
        expressions::{
            AssignVariable, Binary, Block, Conditional, ConditionalPart, Expr, Return, VariableRef,
        },
        scope::{Scope, Variable},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::type_checker::check_binary,
};

use super::visitor::Visitor;

/// Traversal state of one walk.
///
/// Holds the path from the root to the current node and the stack of scopes
/// that are in effect there. Every hook receives it read-only; only the walker
/// mutates it.
#[derive(Debug, Default)]
pub struct WalkContext<'a> {
    ancestry: Vec<Node<'a>>,
    scopes: Vec<&'a Scope>,
}

impl<'a> WalkContext<'a> {
    fn new() -> Self {
        WalkContext::default()
    }

    /// The node being visited.
    pub fn current(&self) -> Option<Node<'a>> {
        self.ancestry.last().copied()
    }

    /// The immediate parent of the node being visited.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.ancestry.iter().rev().nth(1).copied()
    }

    /// Number of nodes on the path from the root to the current node, inclusive.
    pub fn depth(&self) -> usize {
        self.ancestry.len()
    }

    pub fn ancestry(&self) -> &[Node<'a>] {
        &self.ancestry
    }

    /// Which part of its parent conditional the current node is, if its
    /// parent is a conditional.
    pub fn conditional_part(&self) -> Option<ConditionalPart> {
        match (self.parent(), self.current()) {
            (Some(Node::Expr(Expr::Conditional(conditional))), Some(node)) => {
                conditional.part_of(node.id())
            }
            _ => None,
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Looks `name` up from the innermost active scope outwards.
    pub fn resolve(&self, name: &str) -> Option<&'a Arc<Variable>> {
        self.scopes
            .iter()
            .rev()
            .copied()
            .find_map(|scope| scope.find_variable(name))
    }

    /// Like `resolve`, but an unknown name is a fatal error raised at `node`.
    pub fn resolve_variable(&self, name: &str, node: NodeId) -> Result<&'a Arc<Variable>, Error> {
        self.resolve(name).ok_or_else(|| {
            Error::at(
                ErrorImpl::VariableNotDeclared {
                    variable: name.to_string(),
                },
                node,
            )
        })
    }

    /// Resolves the name `variable` is declared under and checks that the
    /// name still denotes `variable` itself, not an inner declaration hiding it.
    pub fn resolve_declared(
        &self,
        variable: &Arc<Variable>,
        node: NodeId,
    ) -> Result<&'a Arc<Variable>, Error> {
        let resolved = self.resolve_variable(variable.name(), node)?;
        if Arc::ptr_eq(resolved, variable) {
            Ok(resolved)
        } else {
            Err(Error::at(
                ErrorImpl::VariableShadowed {
                    variable: variable.name().to_string(),
                },
                node,
            ))
        }
    }

    fn push_node(&mut self, node: Node<'a>) {
        self.ancestry.push(node);
    }

    fn pop_node(&mut self) {
        self.ancestry.pop();
    }

    fn push_scope(&mut self, scope: &'a Scope) {
        self.scopes.push(scope);
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }
}

/// Whether the value of a node is discarded once it has been visited.
///
/// Only a block's last child produces the block's value; every earlier child
/// is evaluated for its side effects alone.
pub fn discards_result(parent: Option<NodeKind>, index: usize, sibling_count: usize) -> bool {
    parent == Some(NodeKind::Block) && index + 1 < sibling_count
}

/// Walks the tree rooted at `root`, invoking `visitor`'s hooks in order.
///
/// `initialize` runs first and `clean_up` runs exactly once at the end, even
/// when initialization or the traversal failed. The first error is returned.
pub fn walk_tree<'a, V: Visitor + ?Sized>(
    visitor: &mut V,
    root: impl Into<Node<'a>>,
) -> Result<(), Error> {
    let root = root.into();
    debug!("walking tree rooted at {} {}", root.kind(), root.id());

    let mut walker = TreeWalker {
        visitor,
        ctx: WalkContext::new(),
    };

    let result = walker
        .visitor
        .initialize()
        .and_then(|_| walker.walk(root));
    let cleaned = walker.visitor.clean_up();

    match &result {
        Ok(()) => debug!("finished walking {} {}", root.kind(), root.id()),
        Err(error) => debug!(
            "walk of {} {} failed: {}",
            root.kind(),
            root.id(),
            error.get_error_name()
        ),
    }

    result.and(cleaned)
}

struct TreeWalker<'a, 'v, V: Visitor + ?Sized> {
    visitor: &'v mut V,
    ctx: WalkContext<'a>,
}

impl<'a, 'v, V: Visitor + ?Sized> TreeWalker<'a, 'v, V> {
    fn walk(&mut self, node: Node<'a>) -> Result<(), Error> {
        match node {
            Node::Module(module) => self.walk_module(module),
            Node::Function(function) => self.walk_function(function),
            Node::Expr(expr) => self.walk_expr(expr),
        }
    }

    fn enter(&mut self, node: Node<'a>) -> Result<(), Error> {
        self.ctx.push_node(node);
        self.visitor.visiting_node(node, &self.ctx)
    }

    fn leave(&mut self, node: Node<'a>) -> Result<(), Error> {
        self.visitor.visited_node(node, &self.ctx)?;
        self.ctx.pop_node();
        Ok(())
    }

    fn walk_module(&mut self, module: &'a Module) -> Result<(), Error> {
        let node = Node::Module(module);
        self.enter(node)?;
        self.visitor.visiting_module(module, &self.ctx)?;

        for function in module.functions() {
            self.walk_function(function)?;
        }

        self.visitor.visited_module(module, &self.ctx)?;
        self.leave(node)
    }

    fn walk_function(&mut self, function: &'a Function) -> Result<(), Error> {
        let node = Node::Function(function);
        self.enter(node)?;
        self.ctx.push_scope(function.parameters());
        self.visitor.visiting_function(function, &self.ctx)?;

        self.walk_expr(function.body())?;

        self.visitor.visited_function(function, &self.ctx)?;
        self.ctx.pop_scope();
        self.leave(node)
    }

    fn walk_expr(&mut self, expr: &'a Expr) -> Result<(), Error> {
        match expr {
            Expr::LiteralInt32(literal) => {
                self.walk_leaf(expr, |visitor, ctx| visitor.visit_literal_int32(literal, ctx))
            }
            Expr::LiteralFloat(literal) => {
                self.walk_leaf(expr, |visitor, ctx| visitor.visit_literal_float(literal, ctx))
            }
            Expr::VariableRef(variable_ref) => self.walk_variable_ref(expr, variable_ref),
            Expr::Binary(binary) => self.walk_binary(expr, binary),
            Expr::Block(block) => self.walk_block(expr, block),
            Expr::Conditional(conditional) => self.walk_conditional(expr, conditional),
            Expr::AssignVariable(assign) => self.walk_assign_variable(expr, assign),
            Expr::Return(return_expr) => self.walk_return(expr, return_expr),
        }
    }

    fn walk_leaf(
        &mut self,
        expr: &'a Expr,
        visit: impl FnOnce(&mut V, &WalkContext<'a>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let node = Node::Expr(expr);
        self.enter(node)?;
        visit(&mut *self.visitor, &self.ctx)?;
        self.leave(node)
    }

    fn walk_variable_ref(
        &mut self,
        expr: &'a Expr,
        variable_ref: &'a VariableRef,
    ) -> Result<(), Error> {
        let node = Node::Expr(expr);
        self.enter(node)?;
        self.ctx
            .resolve_declared(variable_ref.variable(), variable_ref.id())?;
        self.visitor.visit_variable_ref(variable_ref, &self.ctx)?;
        self.leave(node)
    }

    fn walk_binary(&mut self, expr: &'a Expr, binary: &'a Binary) -> Result<(), Error> {
        let node = Node::Expr(expr);
        self.enter(node)?;
        self.visitor.visiting_binary(binary, &self.ctx)?;

        self.walk_expr(binary.l_value())?;
        self.walk_expr(binary.r_value())?;

        check_binary(binary)?;
        self.visitor.visited_binary(binary, &self.ctx)?;
        self.leave(node)
    }

    fn walk_block(&mut self, expr: &'a Expr, block: &'a Block) -> Result<(), Error> {
        let node = Node::Expr(expr);
        self.enter(node)?;
        self.ctx.push_scope(block.scope());
        trace!(
            "entered scope of block {} (scope depth {})",
            block.id(),
            self.ctx.scope_depth()
        );
        self.visitor.visiting_block(block, &self.ctx)?;

        let children = block.expressions();
        for (index, child) in children.iter().enumerate() {
            self.walk_expr(child)?;

            // The block is back on top of the ancestry stack at this point.
            let parent = self.ctx.current().map(|parent| parent.kind());
            if discards_result(parent, index, children.len()) {
                self.visitor.discard_value(Node::Expr(child), &self.ctx)?;
            }
        }

        self.visitor.visited_block(block, &self.ctx)?;
        self.ctx.pop_scope();
        trace!("left scope of block {}", block.id());
        self.leave(node)
    }

    fn walk_conditional(
        &mut self,
        expr: &'a Expr,
        conditional: &'a Conditional,
    ) -> Result<(), Error> {
        let node = Node::Expr(expr);
        self.enter(node)?;
        self.visitor.visiting_conditional(conditional, &self.ctx)?;

        self.walk_expr(conditional.condition())?;
        if let Some(true_part) = conditional.true_part() {
            self.walk_expr(true_part)?;
        }
        if let Some(false_part) = conditional.false_part() {
            self.walk_expr(false_part)?;
        }

        self.visitor.visited_conditional(conditional, &self.ctx)?;
        self.leave(node)
    }

    fn walk_assign_variable(
        &mut self,
        expr: &'a Expr,
        assign: &'a AssignVariable,
    ) -> Result<(), Error> {
        let node = Node::Expr(expr);
        self.enter(node)?;
        self.ctx.resolve_declared(assign.variable(), assign.id())?;
        self.visitor.visiting_assign_variable(assign, &self.ctx)?;

        self.walk_expr(assign.value_expr())?;

        self.visitor.visited_assign_variable(assign, &self.ctx)?;
        self.leave(node)
    }

    fn walk_return(&mut self, expr: &'a Expr, return_expr: &'a Return) -> Result<(), Error> {
        let node = Node::Expr(expr);
        self.enter(node)?;
        self.visitor.visiting_return(return_expr, &self.ctx)?;

        self.walk_expr(return_expr.value_expr())?;

        self.visitor.visited_return(return_expr, &self.ctx)?;
        self.leave(node)
    }
}
