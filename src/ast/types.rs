//! Type system definitions for the AST.
//!
//! This module defines the static data types every expression carries, the
//! arithmetic operations a binary expression may perform, and the runtime
//! values those expressions produce once evaluated or executed.

use std::fmt::Display;

/// Static data type of an expression or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Void,
    Bool,
    Int32,
    Pointer,
    Float,
    Double,
}

impl DataType {
    /// The value an unassigned variable of this type holds.
    ///
    /// Returns `None` for types with no runtime value representation.
    pub fn zero_value(&self) -> Option<Value> {
        match self {
            DataType::Void => Some(Value::Void),
            DataType::Bool => Some(Value::Bool(false)),
            DataType::Int32 => Some(Value::Int32(0)),
            DataType::Float => Some(Value::Float(0.0)),
            DataType::Double => Some(Value::Double(0.0)),
            DataType::Pointer => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int32 | DataType::Float | DataType::Double)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Void => "void",
            DataType::Bool => "Bool",
            DataType::Int32 => "Int32",
            DataType::Pointer => "Pointer",
            DataType::Float => "Float",
            DataType::Double => "Double",
        };
        write!(f, "{}", name)
    }
}

/// Arithmetic operation performed by a binary expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OperationKind::Add => "Add",
            OperationKind::Sub => "Sub",
            OperationKind::Mul => "Mul",
            OperationKind::Div => "Div",
        };
        write!(f, "{}", name)
    }
}

/// A scalar produced by running an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Void,
    Bool(bool),
    Int32(i32),
    Float(f32),
    Double(f64),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Void => DataType::Void,
            Value::Bool(_) => DataType::Bool,
            Value::Int32(_) => DataType::Int32,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
        }
    }

    /// Non-zero numbers and `true` are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Void => false,
            Value::Bool(value) => *value,
            Value::Int32(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Double(value) => *value != 0.0,
        }
    }

    pub fn as_int32(&self) -> Option<i32> {
        match self {
            Value::Int32(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int32(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:.6}", value),
            Value::Double(value) => write!(f, "{:.6}", value),
        }
    }
}
