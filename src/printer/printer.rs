use std::fmt::Write;

use crate::{
    ast::{ast::Node, expressions::Expr, scope::Scope},
    errors::errors::Error,
    visitor::{
        visitor::Visitor,
        walker::{walk_tree, WalkContext},
    },
};

/// Writes one line per node, indented with one tab per level of depth.
pub struct PrettyPrinter<W: Write> {
    out: W,
}

impl<W: Write> PrettyPrinter<W> {
    pub fn new(out: W) -> Self {
        PrettyPrinter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn describe_scope(scope: &Scope) -> String {
    let variables: Vec<String> = scope
        .sorted_variables()
        .iter()
        .map(|variable| variable.to_string())
        .collect();

    format!("({})", variables.join(", "))
}

/// The text printed for `node`, without indentation.
pub fn describe(node: Node<'_>) -> String {
    match node {
        Node::Module(module) => format!("Module: {}", module.name()),
        Node::Function(function) => format!("Function: {}", function.name()),
        Node::Expr(expr) => match expr {
            Expr::Block(block) => format!("Block:{}", describe_scope(block.scope())),
            Expr::Binary(binary) => format!("Binary: {}", binary.operation()),
            Expr::LiteralInt32(literal) => format!("LiteralInt32: {}", literal.value()),
            Expr::LiteralFloat(literal) => format!("LiteralFloat: {:.6}", literal.value()),
            Expr::VariableRef(variable_ref) => format!("VariableRef: {}", variable_ref.name()),
            Expr::AssignVariable(assign) => format!("AssignVariable: {}", assign.name()),
            Expr::Conditional(_) => String::from("Conditional:"),
            Expr::Return(_) => String::from("Return:"),
        },
    }
}

impl<W: Write> Visitor for PrettyPrinter<W> {
    fn visiting_node(&mut self, node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        let indent = "\t".repeat(ctx.depth().saturating_sub(1));
        writeln!(self.out, "{}{}", indent, describe(node))
            .map_err(|_| Error::invalid_state("failed to write pretty-printed tree", Some(node.id())))
    }
}

/// Renders the tree rooted at `root` into a string.
pub fn pretty_print<'a>(root: impl Into<Node<'a>>) -> Result<String, Error> {
    let mut printer = PrettyPrinter::new(String::new());
    walk_tree(&mut printer, root)?;
    Ok(printer.into_inner())
}
