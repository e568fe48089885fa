use std::{
    collections::HashMap,
    fmt::Display,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use super::types::DataType;

static NEXT_VARIABLE_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a declared variable, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

impl Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A named, typed storage location.
///
/// Owned by exactly one `Scope`; expressions that read or write it hold a
/// shared handle and never own the declaration.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    id: VariableId,
    name: String,
    data_type: DataType,
}

impl Variable {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Arc<Variable> {
        Arc::new(Variable {
            id: VariableId(NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            data_type,
        })
    }

    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)
    }
}

/// Name to declaration mapping for one lexical level.
///
/// Only constructed through `ScopeBuilder`, which guarantees names are unique.
#[derive(Debug, Default)]
pub struct Scope {
    variables: HashMap<String, Arc<Variable>>,
}

impl Scope {
    pub(crate) fn new(variables: HashMap<String, Arc<Variable>>) -> Self {
        Scope { variables }
    }

    pub fn find_variable(&self, name: &str) -> Option<&Arc<Variable>> {
        self.variables.get(name)
    }

    /// All declared variables, in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = &Arc<Variable>> {
        self.variables.values()
    }

    /// All declared variables sorted by name, for output that must be stable.
    pub fn sorted_variables(&self) -> Vec<&Arc<Variable>> {
        let mut variables: Vec<&Arc<Variable>> = self.variables.values().collect();
        variables.sort_by(|a, b| a.name().cmp(b.name()));
        variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
