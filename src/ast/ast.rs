use std::{any::Any, fmt::{Debug, Display}};

use crate::errors::errors::{Error, ErrorImpl};

use super::types::Literals;

/// Statement Types
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum StmtType {
    Program,
    Block,
    Declaration,
    Read,
    Write,
    If,
    While,
    For,
    ExpressionStmt,
}

/// Statement Trait
///
/// Defines the behavior of all statement types in the AST.
pub trait Stmt: Debug {
    /// Returns the type of the statement.
    fn get_stmt_type(&self) -> StmtType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Clones the statement into a StmtWrapper.
    /// Clone cannot be derived for certain trait objects, so this method is necessary.
    fn clone_wrapper(&self) -> StmtWrapper;
    /// Returns the span of the statement.
    fn get_span(&self) -> &crate::Span;
}

/// Statement Wrapper
///
/// A wrapper that allows for any statement kind to be stored with helper methods
#[derive(Debug)]
pub struct StmtWrapper(Box<dyn Stmt>);

impl StmtWrapper {
    pub fn new<T: Stmt + 'static>(stmt: T) -> Self {
        StmtWrapper(Box::new(stmt))
    }

    /// Downcasts to the concrete node, or reports a malformed tree.
    pub fn downcast<T: 'static>(&self) -> Result<&T, Error> {
        self.0
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| malformed::<T>(self.0.get_span()))
    }
}

impl Stmt for StmtWrapper {
    fn get_stmt_type(&self) -> StmtType {
        self.0.get_stmt_type()
    }
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        self.0.clone_wrapper()
    }
    fn get_span(&self) -> &crate::Span {
        self.0.get_span()
    }
}

impl Clone for StmtWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

/// Expression Types
///
/// Binary expressions report the precedence level of their operator.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ExprType {
    Int,
    Float,
    Bool,
    String,
    Symbol,
    Assignment,
    LogicOr,
    LogicAnd,
    Equality,
    Comparison,
    Addition,
    Multiplication,
    Unary,
}

pub trait Expr: Debug {
    /// Returns the expression type of the expression.
    fn get_expr_type(&self) -> ExprType;
    /// Type conversion purposes - used with `.downcast_ref<T>()`
    fn as_any(&self) -> &dyn Any;
    /// Clones the expression into an ExprWrapper.
    fn clone_wrapper(&self) -> ExprWrapper;
    /// Returns the span of the expression.
    fn get_span(&self) -> &crate::Span;
}

/// Expression Wrapper
///
/// A wrapper that allows for any expression kind to be stored with helper methods
#[derive(Debug)]
pub struct ExprWrapper(Box<dyn Expr>);

impl ExprWrapper {
    pub fn new<T: Expr + 'static>(expression: T) -> Self {
        ExprWrapper(Box::new(expression))
    }

    /// Downcasts to the concrete node, or reports a malformed tree.
    pub fn downcast<T: 'static>(&self) -> Result<&T, Error> {
        self.0
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| malformed::<T>(self.0.get_span()))
    }
}

impl Expr for ExprWrapper {
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }
    fn get_expr_type(&self) -> ExprType {
        self.0.get_expr_type()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        self.0.clone_wrapper()
    }
    fn get_span(&self) -> &crate::Span {
        self.0.get_span()
    }
}

impl Clone for ExprWrapper {
    fn clone(&self) -> Self {
        self.clone_wrapper()
    }
}

fn malformed<T>(span: &crate::Span) -> Error {
    let name = std::any::type_name::<T>();
    let expected = name.rsplit("::").next().unwrap_or(name).to_string();
    Error::new(ErrorImpl::MalformedTree { expected }, span.start.clone())
}

/// Type Types
///
/// The type inferred for an expression. `Error` marks an expression whose
/// violation has already been reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeType {
    Literal(Literals),
    Error,
}

impl TypeType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeType::Literal(Literals::Int) | TypeType::Literal(Literals::Float))
    }

    pub fn is(&self, literal: Literals) -> bool {
        *self == TypeType::Literal(literal)
    }
}

impl Display for TypeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeType::Literal(literal) => write!(f, "{}", literal),
            TypeType::Error => write!(f, "error"),
        }
    }
}
