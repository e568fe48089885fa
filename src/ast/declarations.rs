use super::{
    ast::NodeId,
    expressions::Expr,
    scope::Scope,
    types::DataType,
};

/// Function Declaration
///
/// A named, typed entry point with its own parameter scope and a body.
#[derive(Debug)]
pub struct Function {
    id: NodeId,
    name: String,
    return_type: DataType,
    parameters: Scope,
    body: Box<Expr>,
}

impl Function {
    pub(crate) fn new(name: String, return_type: DataType, parameters: Scope, body: Expr) -> Self {
        Function {
            id: NodeId::next(),
            name,
            return_type,
            parameters,
            body: Box::new(body),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> DataType {
        self.return_type
    }

    pub fn parameters(&self) -> &Scope {
        &self.parameters
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }
}

/// Module Declaration
///
/// The root of a compilation unit: an ordered list of functions.
#[derive(Debug)]
pub struct Module {
    id: NodeId,
    name: String,
    functions: Vec<Function>,
}

impl Module {
    pub(crate) fn new(name: String, functions: Vec<Function>) -> Self {
        Module {
            id: NodeId::next(),
            name,
            functions,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn find_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|function| function.name() == name)
    }
}
