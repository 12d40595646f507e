use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper, Stmt, StmtType, StmtWrapper, TypeType},
        expressions::{AssignmentExpr, BinaryExpr, PrefixExpr, SymbolExpr},
        statements::{
            BlockStmt, DeclarationStmt, ExpressionStmt, ForStmt, IfStmt, ProgramStmt, ReadStmt,
            WhileStmt, WriteStmt,
        },
        types::Literals,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position,
};

/// The flat, global symbol table of one type checking run.
#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashMap<String, Literals>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            variable_lookup: HashMap::new(),
        }
    }

    pub fn declare_variable(&mut self, variable_name: &str, variable_type: Literals, current_position: Position) -> Result<(), Error> {
        if self.variable_lookup.contains_key(variable_name) {
            Err(Error::new(ErrorImpl::VariableAlreadyDeclared { variable: variable_name.to_string() }, current_position))
        } else {
            self.variable_lookup.insert(variable_name.to_string(), variable_type);
            Ok(())
        }
    }

    pub fn get_variable(&self, variable_name: &str) -> Option<Literals> {
        self.variable_lookup.get(variable_name).copied()
    }
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub environment: Environment,
    pub errors: Vec<Error>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            environment: Environment::new(),
            errors: vec![],
        }
    }

    fn report(&mut self, error_impl: ErrorImpl, position: Position) -> TypeType {
        self.errors.push(Error::new(error_impl, position));
        TypeType::Error
    }

    fn declare(&mut self, name: &str, var_type: Literals, position: Position) {
        if let Err(error) = self.environment.declare_variable(name, var_type, position) {
            self.errors.push(error);
        }
    }

    fn lookup(&mut self, name: &str, position: Position) -> TypeType {
        match self.environment.get_variable(name) {
            Some(var_type) => TypeType::Literal(var_type),
            None => self.report(ErrorImpl::VariableNotDeclared { variable: name.to_string() }, position),
        }
    }

    /// Checks a `bool` condition. The construct is named in the diagnostic.
    fn check_condition(&mut self, construct: &str, condition: &ExprWrapper) {
        let condition_type = type_check_expr(self, condition);
        if !condition_type.is(Literals::Bool) && condition_type != TypeType::Error {
            self.report(
                ErrorImpl::NonBooleanCondition {
                    construct: construct.to_string(),
                    received: condition_type.to_string(),
                },
                condition.get_span().start.clone(),
            );
        }
    }
}

/// Walks the whole program and returns every semantic error found.
/// An empty list means the program may be compiled.
pub fn type_check(program: &ProgramStmt) -> Vec<Error> {
    let mut type_checker = TypeChecker::new();

    for stmt in program.iter() {
        type_check_stmt(&mut type_checker, stmt);
    }

    debug!(
        variables = type_checker.environment.variable_lookup.len(),
        errors = type_checker.errors.len(),
        "type check finished"
    );
    type_checker.errors
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &StmtWrapper) {
    if let Err(error) = check_stmt(type_checker, stmt) {
        type_checker.errors.push(error);
    }
}

fn check_stmt(type_checker: &mut TypeChecker, stmt: &StmtWrapper) -> Result<(), Error> {
    match stmt.get_stmt_type() {
        StmtType::Program => {
            for child in stmt.downcast::<ProgramStmt>()?.iter() {
                type_check_stmt(type_checker, child);
            }
        }
        StmtType::Block => {
            for child in stmt.downcast::<BlockStmt>()?.iter() {
                type_check_stmt(type_checker, child);
            }
        }
        StmtType::Declaration => {
            let declaration = stmt.downcast::<DeclarationStmt>()?;
            for (name, span) in &declaration.identifiers {
                type_checker.declare(name, declaration.var_type, span.start.clone());
            }
        }
        StmtType::Read => {
            for (name, span) in &stmt.downcast::<ReadStmt>()?.identifiers {
                type_checker.lookup(name, span.start.clone());
            }
        }
        StmtType::Write => {
            for expression in &stmt.downcast::<WriteStmt>()?.expressions {
                type_check_expr(type_checker, expression);
            }
        }
        StmtType::If => {
            let if_stmt = stmt.downcast::<IfStmt>()?;
            type_checker.check_condition("if", &if_stmt.condition);
            type_check_stmt(type_checker, &if_stmt.consequent);
            if let Some(alternate) = &if_stmt.alternate {
                type_check_stmt(type_checker, alternate);
            }
        }
        StmtType::While => {
            let while_stmt = stmt.downcast::<WhileStmt>()?;
            type_checker.check_condition("while", &while_stmt.condition);
            type_check_stmt(type_checker, &while_stmt.body);
        }
        StmtType::For => {
            let for_stmt = stmt.downcast::<ForStmt>()?;
            if let Some((var_type, name, span)) = &for_stmt.induction {
                type_checker.declare(name, *var_type, span.start.clone());
            }

            type_check_expr(type_checker, &for_stmt.init);
            type_checker.check_condition("for", &for_stmt.condition);
            type_check_expr(type_checker, &for_stmt.step);
            type_check_stmt(type_checker, &for_stmt.body);
        }
        StmtType::ExpressionStmt => {
            type_check_expr(type_checker, &stmt.downcast::<ExpressionStmt>()?.expression);
        }
    }

    Ok(())
}

/// Infers the type of an expression, reporting each violation once.
///
/// `TypeType::Error` is returned for an expression that is already
/// reported, so enclosing operators stay quiet about it.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &ExprWrapper) -> TypeType {
    match check_expr(type_checker, expr) {
        Ok(expr_type) => expr_type,
        Err(error) => {
            type_checker.errors.push(error);
            TypeType::Error
        }
    }
}

fn check_expr(type_checker: &mut TypeChecker, expr: &ExprWrapper) -> Result<TypeType, Error> {
    let position = expr.get_span().start.clone();

    let expr_type = match expr.get_expr_type() {
        ExprType::Int => TypeType::Literal(Literals::Int),
        ExprType::Float => TypeType::Literal(Literals::Float),
        ExprType::Bool => TypeType::Literal(Literals::Bool),
        ExprType::String => TypeType::Literal(Literals::String),
        ExprType::Symbol => {
            let symbol = expr.downcast::<SymbolExpr>()?;
            type_checker.lookup(&symbol.value, position)
        }
        ExprType::Assignment => {
            let assignment = expr.downcast::<AssignmentExpr>()?;
            let target = type_checker.environment.get_variable(&assignment.assignee.value);
            let value_type = type_check_expr(type_checker, &assignment.value);

            match (target, value_type) {
                (None, _) => type_checker.report(
                    ErrorImpl::VariableNotDeclared { variable: assignment.assignee.value.clone() },
                    position,
                ),
                (Some(target), TypeType::Error) => TypeType::Literal(target),
                (Some(target), TypeType::Literal(value)) => {
                    if value == target || (target == Literals::Float && value == Literals::Int) {
                        TypeType::Literal(target)
                    } else {
                        type_checker.report(
                            ErrorImpl::AssignmentTypeMismatch {
                                variable: assignment.assignee.value.clone(),
                                expected: target.to_string(),
                                received: value.to_string(),
                            },
                            position,
                        )
                    }
                }
            }
        }
        ExprType::Unary => {
            let prefix = expr.downcast::<PrefixExpr>()?;
            let operand = type_check_expr(type_checker, &prefix.right_expr);

            match (prefix.operator.kind, operand) {
                (_, TypeType::Error) => TypeType::Error,
                (TokenKind::Dash, operand) if operand.is_numeric() => operand,
                (TokenKind::Not, TypeType::Literal(Literals::Bool)) => operand,
                _ => type_checker.report(
                    ErrorImpl::UnaryTypeMismatch {
                        operator: prefix.operator.value.clone(),
                        operand: operand.to_string(),
                    },
                    position,
                ),
            }
        }
        ExprType::LogicOr
        | ExprType::LogicAnd
        | ExprType::Equality
        | ExprType::Comparison
        | ExprType::Addition
        | ExprType::Multiplication => {
            let binary = expr.downcast::<BinaryExpr>()?;
            let left = type_check_expr(type_checker, &binary.left);
            let right = type_check_expr(type_checker, &binary.right);

            if left == TypeType::Error || right == TypeType::Error {
                return Ok(TypeType::Error);
            }

            check_binary(type_checker, binary, left, right, position)
        }
    };

    Ok(expr_type)
}

/// Widened result of two numeric operands.
fn numeric_result(left: TypeType, right: TypeType) -> TypeType {
    if left.is(Literals::Float) || right.is(Literals::Float) {
        TypeType::Literal(Literals::Float)
    } else {
        TypeType::Literal(Literals::Int)
    }
}

fn check_binary(type_checker: &mut TypeChecker, binary: &BinaryExpr, left: TypeType, right: TypeType, position: Position) -> TypeType {
    let operator = binary.operator.value.clone();
    let both_numeric = left.is_numeric() && right.is_numeric();

    match binary.operator.kind {
        TokenKind::Dot if left.is(Literals::String) && right.is(Literals::String) => TypeType::Literal(Literals::String),
        TokenKind::Plus | TokenKind::Dash | TokenKind::Star | TokenKind::Slash if both_numeric => numeric_result(left, right),
        TokenKind::Percent if left.is(Literals::Int) && right.is(Literals::Int) => TypeType::Literal(Literals::Int),
        TokenKind::Percent => type_checker.report(
            ErrorImpl::ModuloRequiresIntegers { left: left.to_string(), right: right.to_string() },
            position,
        ),
        TokenKind::Less | TokenKind::Greater if both_numeric => TypeType::Literal(Literals::Bool),
        TokenKind::Less | TokenKind::Greater => type_checker.report(
            ErrorImpl::ComparisonTypeMismatch { operator, left: left.to_string(), right: right.to_string() },
            position,
        ),
        TokenKind::Equals | TokenKind::NotEquals
            if left == right && !left.is(Literals::Bool) => TypeType::Literal(Literals::Bool),
        TokenKind::Equals | TokenKind::NotEquals => type_checker.report(
            ErrorImpl::EqualityTypeMismatch { operator, left: left.to_string(), right: right.to_string() },
            position,
        ),
        TokenKind::And | TokenKind::Or if left.is(Literals::Bool) && right.is(Literals::Bool) => TypeType::Literal(Literals::Bool),
        TokenKind::And | TokenKind::Or => type_checker.report(
            ErrorImpl::LogicalOperandMismatch { operator, left: left.to_string(), right: right.to_string() },
            position,
        ),
        _ => type_checker.report(
            ErrorImpl::OperatorTypeMismatch { operator, left: left.to_string(), right: right.to_string() },
            position,
        ),
    }
}
