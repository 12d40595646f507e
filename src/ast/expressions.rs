use std::any::Any;

use crate::{lexer::tokens::{Token, TokenKind}, Span};

use super::ast::{Expr, ExprType, ExprWrapper};

// LITERALS

/// Integer Expression
/// Represents an integer literal in the AST.
#[derive(Debug, Clone)]
pub struct IntExpr {
    pub value: i32,
    pub span: Span,
}

impl Expr for IntExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Int
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}

/// Float Expression
/// Represents a floating point literal in the AST.
#[derive(Debug, Clone)]
pub struct FloatExpr {
    pub value: f64,
    pub span: Span,
}

impl Expr for FloatExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Float
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}

#[derive(Debug, Clone)]
pub struct BoolExpr {
    pub value: bool,
    pub span: Span,
}

impl Expr for BoolExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Bool
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}

/// String Expression
/// Represents a string literal in the AST. The value is already unescaped.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

impl Expr for StringExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::String
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}

/// Symbol Expression
/// A reference to a variable by name.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

impl Expr for SymbolExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Symbol
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}

// COMPLEX

/// Binary Expression
/// Represents a binary operation in the AST. `kind` records the precedence
/// level the operator belongs to.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: ExprWrapper,
    pub operator: Token,
    pub right: ExprWrapper,
    pub kind: ExprType,
    pub span: Span,
}

impl BinaryExpr {
    /// Classifies a binary operator token, `None` for anything else.
    pub fn kind_of(operator: TokenKind) -> Option<ExprType> {
        match operator {
            TokenKind::Or => Some(ExprType::LogicOr),
            TokenKind::And => Some(ExprType::LogicAnd),
            TokenKind::Equals | TokenKind::NotEquals => Some(ExprType::Equality),
            TokenKind::Less | TokenKind::Greater => Some(ExprType::Comparison),
            TokenKind::Plus | TokenKind::Dash | TokenKind::Dot => Some(ExprType::Addition),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(ExprType::Multiplication),
            _ => None,
        }
    }
}

impl Expr for BinaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        self.kind
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}

/// Prefix Expression
/// Unary `-` or `!` applied to an operand.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: ExprWrapper,
    pub span: Span,
}

impl Expr for PrefixExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Unary
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}

/// Assignment Expression
/// `assignee = value`. The value of the whole expression is the value
/// stored into the assignee.
#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub assignee: SymbolExpr,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Expr for AssignmentExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Assignment
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &crate::Span {
        &self.span
    }
}
