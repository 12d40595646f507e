use std::{any::Any, slice::Iter};

use crate::Span;

use super::{
    ast::{ExprWrapper, Stmt, StmtType, StmtWrapper},
    types::Literals,
};

/// The root of a parsed source file.
#[derive(Debug, Clone)]
pub struct ProgramStmt {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl ProgramStmt {
    pub fn iter(&self) -> Iter<'_, StmtWrapper> {
        self.body.iter()
    }
}

impl Stmt for ProgramStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Program
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// `{ ... }`. A bare `;` also parses to an empty block.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, StmtWrapper> {
        self.body.iter()
    }
}

impl Stmt for BlockStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Block
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// `TYPE a, b, c;`
#[derive(Debug, Clone)]
pub struct DeclarationStmt {
    pub var_type: Literals,
    pub identifiers: Vec<(String, Span)>,
    pub span: Span,
}

impl Stmt for DeclarationStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Declaration
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// `read a, b;`
#[derive(Debug, Clone)]
pub struct ReadStmt {
    pub identifiers: Vec<(String, Span)>,
    pub span: Span,
}

impl Stmt for ReadStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Read
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// `write e1, e2;` prints all values on one line.
#[derive(Debug, Clone)]
pub struct WriteStmt {
    pub expressions: Vec<ExprWrapper>,
    pub span: Span,
}

impl Stmt for WriteStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::Write
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: ExprWrapper,
    pub consequent: StmtWrapper,
    pub alternate: Option<StmtWrapper>,
    pub span: Span,
}

impl Stmt for IfStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::If
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: ExprWrapper,
    pub body: StmtWrapper,
    pub span: Span,
}

impl Stmt for WhileStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::While
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// `for ([TYPE] init; condition; step) body`
///
/// When a type is written before the init expression, `induction` names the
/// variable it declares.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub induction: Option<(Literals, String, Span)>,
    pub init: ExprWrapper,
    pub condition: ExprWrapper,
    pub step: ExprWrapper,
    pub body: StmtWrapper,
    pub span: Span,
}

impl Stmt for ForStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::For
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// An expression evaluated for its effect, `expr;`
#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: ExprWrapper,
    pub span: Span,
}

impl Stmt for ExpressionStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ExpressionStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}
