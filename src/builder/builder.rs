use std::{collections::HashMap, mem, sync::Arc};

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    ast::{
        declarations::{Function, Module},
        expressions::{Block, Expr},
        scope::{Scope, Variable},
        types::DataType,
    },
    errors::errors::{Error, ErrorImpl},
};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Checks that `name` can be used as a variable, function or module name.
pub fn validate_identifier(argument: &str, name: &str) -> Result<(), Error> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_argument(
            argument,
            format!("`{}` is not a valid identifier", name),
        ))
    }
}

/// Accumulates variable declarations for one scope.
///
/// A name clash is remembered when the variable is added and reported by
/// `build()`, so chained calls never observe a half-built scope.
#[derive(Debug, Default)]
pub struct ScopeBuilder {
    variables: HashMap<String, Arc<Variable>>,
    error: Option<Error>,
}

impl ScopeBuilder {
    pub fn new() -> Self {
        ScopeBuilder::default()
    }

    pub fn add_variable(&mut self, variable: Arc<Variable>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }

        if let Err(error) = validate_identifier("variable", variable.name()) {
            self.error = Some(error);
        } else if self.variables.contains_key(variable.name()) {
            self.error = Some(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: variable.name().to_string(),
                },
                None,
            ));
        } else {
            self.variables.insert(variable.name().to_string(), variable);
        }

        self
    }

    pub fn build(&mut self) -> Result<Scope, Error> {
        let variables = mem::take(&mut self.variables);
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(Scope::new(variables)),
        }
    }
}

#[derive(Debug, Default)]
pub struct BlockBuilder {
    expressions: Vec<Expr>,
    scope_builder: ScopeBuilder,
}

impl BlockBuilder {
    pub fn new() -> Self {
        BlockBuilder::default()
    }

    pub fn add_variable(&mut self, variable: Arc<Variable>) -> &mut Self {
        self.scope_builder.add_variable(variable);
        self
    }

    pub fn add_expression(&mut self, expression: impl Into<Expr>) -> &mut Self {
        self.expressions.push(expression.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn build(&mut self) -> Result<Block, Error> {
        let scope = self.scope_builder.build()?;
        let expressions = mem::take(&mut self.expressions);

        if expressions.is_empty() {
            return Err(Error::new(ErrorImpl::EmptyBlock, None));
        }

        let block = Block::new(scope, expressions);
        trace!(
            "built block {} with {} expression(s) and {} variable(s)",
            block.id(),
            block.expressions().len(),
            block.scope().len()
        );
        Ok(block)
    }
}

/// Builds a function from a parameter list and either the internal block
/// builder or an explicit body expression.
#[derive(Debug)]
pub struct FunctionBuilder {
    name: String,
    return_type: DataType,
    block_builder: BlockBuilder,
    parameter_scope_builder: ScopeBuilder,
    body: Option<Expr>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, return_type: DataType) -> Self {
        FunctionBuilder {
            name: name.into(),
            return_type,
            block_builder: BlockBuilder::new(),
            parameter_scope_builder: ScopeBuilder::new(),
            body: None,
        }
    }

    pub fn block_builder(&mut self) -> &mut BlockBuilder {
        &mut self.block_builder
    }

    pub fn add_parameter(&mut self, variable: Arc<Variable>) -> &mut Self {
        self.parameter_scope_builder.add_variable(variable);
        self
    }

    /// Uses `body` instead of the internal block builder.
    pub fn with_body(&mut self, body: impl Into<Expr>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    pub fn build(&mut self) -> Result<Function, Error> {
        validate_identifier("function", &self.name)?;
        let parameters = self.parameter_scope_builder.build()?;

        let body = match self.body.take() {
            Some(body) => {
                if !self.block_builder.is_empty() {
                    return Err(Error::invalid_argument(
                        "body",
                        "an explicit body and block builder expressions were both supplied",
                    ));
                }
                body
            }
            None => Expr::Block(self.block_builder.build()?),
        };

        Ok(Function::new(
            self.name.clone(),
            self.return_type,
            parameters,
            body,
        ))
    }
}

#[derive(Debug)]
pub struct ModuleBuilder {
    name: String,
    functions: Vec<Function>,
}

impl ModuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleBuilder {
            name: name.into(),
            functions: vec![],
        }
    }

    pub fn add_function(&mut self, function: Function) -> &mut Self {
        self.functions.push(function);
        self
    }

    pub fn build(&mut self) -> Result<Module, Error> {
        validate_identifier("module", &self.name)?;
        let functions = mem::take(&mut self.functions);

        for (index, function) in functions.iter().enumerate() {
            if functions[..index]
                .iter()
                .any(|previous| previous.name() == function.name())
            {
                return Err(Error::at(
                    ErrorImpl::FunctionAlreadyDeclared {
                        function: function.name().to_string(),
                    },
                    function.id(),
                ));
            }
        }

        Ok(Module::new(self.name.clone(), functions))
    }
}

/// Wraps a single expression into a module holding one zero-parameter
/// function whose return type is the expression's type.
pub fn expression_module(
    module_name: &str,
    function_name: &str,
    expression: Expr,
) -> Result<Module, Error> {
    let mut function_builder = FunctionBuilder::new(function_name, expression.data_type());
    function_builder.block_builder().add_expression(expression);

    ModuleBuilder::new(module_name)
        .add_function(function_builder.build()?)
        .build()
}
