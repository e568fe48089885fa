use crate::{
    ast::{
        ast::Node,
        declarations::{Function, Module},
        expressions::{
            AssignVariable, Binary, Block, Conditional, LiteralFloat, LiteralInt32, Return,
            VariableRef,
        },
    },
    errors::errors::Error,
};

use super::walker::WalkContext;

/// Hooks invoked by the tree walker.
///
/// Node kinds without children get a single `visit_*` hook; node kinds with
/// children get a `visiting_*` hook before their children are walked and a
/// `visited_*` hook afterwards. Every hook defaults to doing nothing, so an
/// implementation only overrides what it needs.
///
/// Any hook may fail; the walk stops at the first error and `clean_up` still
/// runs exactly once.
#[allow(unused_variables)]
pub trait Visitor {
    /// Runs once before the first node of a walk.
    fn initialize(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Runs once after a walk, whether it completed or failed.
    fn clean_up(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Executes before every node is visited. The node is already the top of
    /// `ctx.ancestry()`.
    fn visiting_node(&mut self, node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    /// Executes after every node is visited, while the node is still the top
    /// of `ctx.ancestry()`.
    fn visited_node(&mut self, node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    /// The value produced by `node`, a non-last child of a block, is not
    /// used by anything and should be dropped.
    fn discard_value(&mut self, node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visiting_module(&mut self, module: &Module, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visited_module(&mut self, module: &Module, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visiting_function(
        &mut self,
        function: &Function,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visited_function(
        &mut self,
        function: &Function,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visiting_block(&mut self, expr: &Block, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visited_block(&mut self, expr: &Block, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visiting_conditional(
        &mut self,
        expr: &Conditional,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visited_conditional(
        &mut self,
        expr: &Conditional,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visiting_binary(&mut self, expr: &Binary, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visited_binary(&mut self, expr: &Binary, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visiting_assign_variable(
        &mut self,
        expr: &AssignVariable,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visited_assign_variable(
        &mut self,
        expr: &AssignVariable,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visiting_return(&mut self, expr: &Return, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visited_return(&mut self, expr: &Return, ctx: &WalkContext<'_>) -> Result<(), Error> {
        Ok(())
    }

    fn visit_literal_int32(
        &mut self,
        expr: &LiteralInt32,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_literal_float(
        &mut self,
        expr: &LiteralFloat,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn visit_variable_ref(
        &mut self,
        expr: &VariableRef,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        Ok(())
    }
}
