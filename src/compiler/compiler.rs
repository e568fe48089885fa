//! Main compiler module.
//!
//! This module contains the Compiler structure, a visitor that lowers a tree
//! into an LLVM module. It manages the LLVM context, module and builder, the
//! stack slots of every variable, and the value each visited expression
//! produced.

use std::{collections::HashMap, sync::Arc};

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context,
    module::Module as LlvmModule,
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{BasicValue, BasicValueEnum, FunctionValue, PointerValue},
};
use log::{debug, trace};

use crate::{
    ast::{
        ast::{Node, NodeId},
        declarations::{Function, Module},
        expressions::{
            AssignVariable, Binary, Block, Conditional, ConditionalPart, Expr, LiteralFloat,
            LiteralInt32, Return, VariableRef,
        },
        scope::{Variable, VariableId},
        types::DataType,
    },
    errors::errors::{Error, ErrorImpl},
    visitor::{
        visitor::Visitor,
        walker::{walk_tree, WalkContext},
    },
};

use super::expr::{gen_binary, gen_literal_float, gen_literal_int32, gen_truthiness, gen_zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchStage {
    TruePart,
    FalsePart,
    Done,
}

/// Basic blocks of a conditional whose lowering is in progress.
struct ConditionalFrame<'ctx> {
    else_block: BasicBlock<'ctx>,
    merge_block: BasicBlock<'ctx>,
    stage: BranchStage,
    /// Value each branch produced and the block it branched to the merge from.
    incoming: Vec<(Option<BasicValueEnum<'ctx>>, BasicBlock<'ctx>)>,
}

/// The compiler state of one lowering pass.
///
/// # Type Parameters
///
/// * `'ctx` - Lifetime of the LLVM context
pub struct Compiler<'ctx> {
    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM module being built
    pub module: LlvmModule<'ctx>,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,

    named_allocas: HashMap<VariableId, PointerValue<'ctx>>,
    /// One entry per visited expression; `None` stands for a void value.
    values: Vec<Option<BasicValueEnum<'ctx>>>,
    conditionals: Vec<ConditionalFrame<'ctx>>,
    function: Option<(FunctionValue<'ctx>, DataType)>,
}

impl<'ctx> Compiler<'ctx> {
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        Compiler {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            named_allocas: HashMap::new(),
            values: vec![],
            conditionals: vec![],
            function: None,
        }
    }

    /// Maps a data type to its LLVM type. `Void` has no basic type and maps
    /// to `None`.
    pub fn convert_type(
        &self,
        data_type: DataType,
        node: NodeId,
    ) -> Result<Option<BasicTypeEnum<'ctx>>, Error> {
        let converted = match data_type {
            DataType::Void => return Ok(None),
            DataType::Bool => self.context.i8_type().into(),
            DataType::Int32 => self.context.i32_type().into(),
            DataType::Float => self.context.f32_type().into(),
            DataType::Double => self.context.f64_type().into(),
            DataType::Pointer => return Err(Error::unhandled(data_type, Some(node))),
        };

        Ok(Some(converted))
    }

    fn function_type(
        &self,
        return_type: DataType,
        parameters: &[BasicMetadataTypeEnum<'ctx>],
        node: NodeId,
    ) -> Result<FunctionType<'ctx>, Error> {
        Ok(match self.convert_type(return_type, node)? {
            Some(return_type) => return_type.fn_type(parameters, false),
            None => self.context.void_type().fn_type(parameters, false),
        })
    }

    /// Verifies the generated module and hands it over.
    pub fn release_module(self, verify: bool) -> Result<LlvmModule<'ctx>, Error> {
        if verify {
            self.module.verify().map_err(|message| {
                Error::new(
                    ErrorImpl::Backend {
                        message: message.to_string(),
                    },
                    None,
                )
            })?;
        }

        debug!(
            "released LLVM module {}",
            self.module.get_name().to_string_lossy()
        );
        Ok(self.module)
    }

    fn push(&mut self, value: Option<BasicValueEnum<'ctx>>) {
        self.values.push(value);
    }

    fn pop(&mut self, node: NodeId) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
        self.values
            .pop()
            .ok_or_else(|| Error::invalid_state("value stack is empty", Some(node)))
    }

    /// Pops a value that must not be void.
    fn pop_value(&mut self, node: NodeId) -> Result<BasicValueEnum<'ctx>, Error> {
        self.pop(node)?
            .ok_or_else(|| Error::invalid_state("expected a value, found void", Some(node)))
    }

    fn current_function(&self, node: NodeId) -> Result<(FunctionValue<'ctx>, DataType), Error> {
        self.function
            .ok_or_else(|| Error::invalid_state("no function is being generated", Some(node)))
    }

    fn insert_block(&self, node: NodeId) -> Result<BasicBlock<'ctx>, Error> {
        self.builder
            .get_insert_block()
            .ok_or_else(|| Error::invalid_state("builder has no insert block", Some(node)))
    }

    fn alloca_of(&self, variable: &Variable, node: NodeId) -> Result<PointerValue<'ctx>, Error> {
        self.named_allocas.get(&variable.id()).copied().ok_or_else(|| {
            Error::invalid_state(
                format!("no storage was allocated for variable {}", variable),
                Some(node),
            )
        })
    }

    /// Allocates a stack slot for `variable` and stores `initial` in it, or the
    /// zero of the variable's type.
    fn allocate(
        &mut self,
        variable: &Arc<Variable>,
        initial: Option<BasicValueEnum<'ctx>>,
        node: NodeId,
    ) -> Result<(), Error> {
        let variable_type = self
            .convert_type(variable.data_type(), node)?
            .ok_or_else(|| {
                Error::invalid_argument(
                    "variable",
                    format!("{} cannot be stored in a variable", variable),
                )
            })?;

        let alloca = self.builder.build_alloca(variable_type, variable.name())?;
        let initial = match initial {
            Some(value) => Some(value),
            None => gen_zero(self, variable.data_type(), node)?,
        };
        if let Some(value) = initial {
            self.builder.build_store(alloca, value)?;
        }

        trace!("allocated {} ({})", variable, variable.id());
        self.named_allocas.insert(variable.id(), alloca);
        Ok(())
    }

    fn build_return_value(
        &self,
        value: Option<BasicValueEnum<'ctx>>,
        return_type: DataType,
        node: NodeId,
    ) -> Result<(), Error> {
        if return_type == DataType::Void {
            self.builder.build_return(None)?;
            return Ok(());
        }

        match value {
            Some(value) => {
                self.builder.build_return(Some(&value))?;
                Ok(())
            }
            None => Err(Error::invalid_state(
                "cannot return a void value from a non-void function",
                Some(node),
            )),
        }
    }

    /// Ends the branch being generated with a jump to the merge block.
    fn close_branch(
        &mut self,
        value: Option<BasicValueEnum<'ctx>>,
        node: NodeId,
    ) -> Result<(), Error> {
        let block = self.insert_block(node)?;
        let frame = self
            .conditionals
            .last_mut()
            .ok_or_else(|| Error::invalid_state("no conditional is open", Some(node)))?;

        self.builder.build_unconditional_branch(frame.merge_block)?;
        frame.incoming.push((value, block));
        Ok(())
    }

    fn enter_false_part(&mut self, node: NodeId) -> Result<(), Error> {
        let frame = self
            .conditionals
            .last_mut()
            .ok_or_else(|| Error::invalid_state("no conditional is open", Some(node)))?;

        frame.stage = BranchStage::FalsePart;
        self.builder.position_at_end(frame.else_block);
        Ok(())
    }

    fn stage(&self, node: NodeId) -> Result<BranchStage, Error> {
        self.conditionals
            .last()
            .map(|frame| frame.stage)
            .ok_or_else(|| Error::invalid_state("no conditional is open", Some(node)))
    }

    /// Branches on the condition just generated.
    fn begin_conditional(&mut self, conditional: &Conditional) -> Result<(), Error> {
        let condition = self.pop_value(conditional.id())?;
        let condition = gen_truthiness(
            self,
            condition,
            conditional.condition().data_type(),
            conditional.id(),
        )?;

        let (function, _) = self.current_function(conditional.id())?;
        let then_block = self.context.append_basic_block(function, "then");
        let else_block = self.context.append_basic_block(function, "else");
        let merge_block = self.context.append_basic_block(function, "merge");

        self.builder
            .build_conditional_branch(condition, then_block, else_block)?;
        self.builder.position_at_end(then_block);

        self.conditionals.push(ConditionalFrame {
            else_block,
            merge_block,
            stage: BranchStage::TruePart,
            incoming: vec![],
        });
        Ok(())
    }

    /// Closes the true part with the conditional's zero when it is missing.
    fn skip_true_part(&mut self, conditional: &Conditional) -> Result<(), Error> {
        if self.stage(conditional.id())? == BranchStage::TruePart {
            let zero = gen_zero(self, conditional.data_type(), conditional.id())?;
            self.close_branch(zero, conditional.id())?;
            self.enter_false_part(conditional.id())?;
        }
        Ok(())
    }
}

impl<'ctx> Visitor for Compiler<'ctx> {
    fn initialize(&mut self) -> Result<(), Error> {
        self.named_allocas.clear();
        self.values.clear();
        self.conditionals.clear();
        self.function = None;
        Ok(())
    }

    fn visiting_node(&mut self, _node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        if let (Some(ConditionalPart::FalsePart), Some(Node::Expr(Expr::Conditional(conditional)))) =
            (ctx.conditional_part(), ctx.parent())
        {
            self.skip_true_part(conditional)?;
        }
        Ok(())
    }

    fn visited_node(&mut self, node: Node<'_>, ctx: &WalkContext<'_>) -> Result<(), Error> {
        let conditional = match ctx.parent() {
            Some(Node::Expr(Expr::Conditional(conditional))) => conditional,
            _ => return Ok(()),
        };

        match ctx.conditional_part() {
            Some(ConditionalPart::Condition) => self.begin_conditional(conditional),
            Some(ConditionalPart::TruePart) => {
                let value = self.pop(node.id())?;
                self.close_branch(value, node.id())?;
                self.enter_false_part(node.id())
            }
            Some(ConditionalPart::FalsePart) => {
                let value = self.pop(node.id())?;
                self.close_branch(value, node.id())?;
                if let Some(frame) = self.conditionals.last_mut() {
                    frame.stage = BranchStage::Done;
                }
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn discard_value(&mut self, node: Node<'_>, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        self.pop(node.id())?;
        Ok(())
    }

    fn visiting_module(&mut self, module: &Module, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        debug!(
            "generating module {} with {} function(s)",
            module.name(),
            module.functions().len()
        );
        Ok(())
    }

    fn visiting_function(
        &mut self,
        function: &Function,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        debug!("generating function {}", function.name());

        let parameters = function.parameters().sorted_variables();
        let mut parameter_types: Vec<BasicMetadataTypeEnum<'ctx>> = vec![];
        for parameter in &parameters {
            let parameter_type = self
                .convert_type(parameter.data_type(), function.id())?
                .ok_or_else(|| {
                    Error::invalid_argument(
                        "parameter",
                        format!("{} cannot be a function parameter", parameter),
                    )
                })?;
            parameter_types.push(parameter_type.into());
        }

        let function_type =
            self.function_type(function.return_type(), &parameter_types, function.id())?;
        let function_value = self
            .module
            .add_function(function.name(), function_type, None);
        let entry = self.context.append_basic_block(function_value, "entry");
        self.builder.position_at_end(entry);
        self.function = Some((function_value, function.return_type()));

        for (index, parameter) in parameters.iter().enumerate() {
            let value = function_value.get_nth_param(index as u32).ok_or_else(|| {
                Error::invalid_state(
                    format!("missing LLVM parameter for {}", parameter),
                    Some(function.id()),
                )
            })?;
            self.allocate(parameter, Some(value), function.id())?;
        }

        Ok(())
    }

    fn visited_function(
        &mut self,
        function: &Function,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        let return_type = function.return_type();
        let body_type = function.body().data_type();
        if return_type != DataType::Void && body_type != return_type {
            return Err(Error::at(
                ErrorImpl::ReturnTypeMismatch {
                    expected: return_type,
                    received: body_type,
                },
                function.id(),
            ));
        }

        let value = self.pop(function.id())?;
        if self.insert_block(function.id())?.get_terminator().is_none() {
            self.build_return_value(value, return_type, function.id())?;
        }

        self.function = None;
        Ok(())
    }

    fn visiting_block(&mut self, expr: &Block, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        for variable in expr.scope().sorted_variables() {
            self.allocate(variable, None, expr.id())?;
        }
        Ok(())
    }

    fn visited_conditional(
        &mut self,
        expr: &Conditional,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        self.skip_true_part(expr)?;
        if self.stage(expr.id())? == BranchStage::FalsePart {
            let zero = gen_zero(self, expr.data_type(), expr.id())?;
            self.close_branch(zero, expr.id())?;
        }

        let frame = self
            .conditionals
            .pop()
            .ok_or_else(|| Error::invalid_state("no conditional is open", Some(expr.id())))?;
        self.builder.position_at_end(frame.merge_block);

        let phi_type = match self.convert_type(expr.data_type(), expr.id())? {
            Some(phi_type) => phi_type,
            None => {
                self.push(None);
                return Ok(());
            }
        };

        let mut incoming: Vec<(BasicValueEnum<'ctx>, BasicBlock<'ctx>)> = vec![];
        for (value, block) in frame.incoming {
            let value = value.ok_or_else(|| {
                Error::invalid_state("conditional branch produced no value", Some(expr.id()))
            })?;
            incoming.push((value, block));
        }

        let phi = self.builder.build_phi(phi_type, "cond_value")?;
        let incoming: Vec<(&dyn BasicValue<'ctx>, BasicBlock<'ctx>)> = incoming
            .iter()
            .map(|(value, block)| (value as &dyn BasicValue<'ctx>, *block))
            .collect();
        phi.add_incoming(&incoming);

        self.push(Some(phi.as_basic_value()));
        Ok(())
    }

    fn visited_binary(&mut self, expr: &Binary, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        let r_value = self.pop_value(expr.id())?;
        let l_value = self.pop_value(expr.id())?;
        let value = gen_binary(
            self,
            expr.operation(),
            expr.data_type(),
            l_value,
            r_value,
            expr.id(),
        )?;
        self.push(Some(value));
        Ok(())
    }

    fn visited_assign_variable(
        &mut self,
        expr: &AssignVariable,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        let variable = ctx.resolve_variable(expr.name(), expr.id())?;
        let alloca = self.alloca_of(variable, expr.id())?;
        let value = self.pop_value(expr.id())?;

        self.builder.build_store(alloca, value)?;
        self.push(Some(value));
        Ok(())
    }

    fn visited_return(&mut self, expr: &Return, _ctx: &WalkContext<'_>) -> Result<(), Error> {
        let (function, return_type) = self.current_function(expr.id())?;
        if return_type != DataType::Void && expr.data_type() != return_type {
            return Err(Error::at(
                ErrorImpl::ReturnTypeMismatch {
                    expected: return_type,
                    received: expr.data_type(),
                },
                expr.id(),
            ));
        }

        let value = self.pop(expr.id())?;
        self.build_return_value(value, return_type, expr.id())?;

        // Code generated after a return is unreachable but still needs a block.
        let after_return = self.context.append_basic_block(function, "afterReturn");
        self.builder.position_at_end(after_return);

        let placeholder = gen_zero(self, expr.data_type(), expr.id())?;
        self.push(placeholder);
        Ok(())
    }

    fn visit_literal_int32(
        &mut self,
        expr: &LiteralInt32,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        let value = gen_literal_int32(self, expr);
        self.push(Some(value));
        Ok(())
    }

    fn visit_literal_float(
        &mut self,
        expr: &LiteralFloat,
        _ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        let value = gen_literal_float(self, expr);
        self.push(Some(value));
        Ok(())
    }

    fn visit_variable_ref(
        &mut self,
        expr: &VariableRef,
        ctx: &WalkContext<'_>,
    ) -> Result<(), Error> {
        let variable = ctx.resolve_variable(expr.name(), expr.id())?;
        let alloca = self.alloca_of(variable, expr.id())?;
        let value = self.builder.build_load(alloca, variable.name())?;
        self.push(Some(value));
        Ok(())
    }
}

/// Lowers `module` into a new LLVM module owned by `context`.
pub fn compile_module<'ctx>(
    context: &'ctx Context,
    module: &Module,
    verify: bool,
) -> Result<LlvmModule<'ctx>, Error> {
    let mut compiler = Compiler::new(context, module.name());
    walk_tree(&mut compiler, module)?;
    compiler.release_module(verify)
}
