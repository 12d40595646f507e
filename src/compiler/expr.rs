use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper},
        expressions::{
            AssignmentExpr, BinaryExpr, BoolExpr, FloatExpr, IntExpr, PrefixExpr, StringExpr,
            SymbolExpr,
        },
        types::Literals,
    },
    bytecode::{instruction::Instruction, value::Value},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::compiler::Compiler;

/// Emits the code for an expression, leaving exactly one value on the
/// stack, and returns that value's type.
pub fn gen_expression(compiler: &mut Compiler, expression: &ExprWrapper) -> Result<Literals, Error> {
    match expression.get_expr_type() {
        ExprType::Int => {
            let int = expression.downcast::<IntExpr>()?;
            compiler.emit(Instruction::Push(Value::Int(int.value)));
            Ok(Literals::Int)
        }
        ExprType::Float => {
            let float = expression.downcast::<FloatExpr>()?;
            compiler.emit(Instruction::Push(Value::Float(float.value)));
            Ok(Literals::Float)
        }
        ExprType::Bool => {
            let boolean = expression.downcast::<BoolExpr>()?;
            compiler.emit(Instruction::Push(Value::Bool(boolean.value)));
            Ok(Literals::Bool)
        }
        ExprType::String => {
            let string = expression.downcast::<StringExpr>()?;
            compiler.emit(Instruction::Push(Value::Str(string.value.clone())));
            Ok(Literals::String)
        }
        ExprType::Symbol => {
            let symbol = expression.downcast::<SymbolExpr>()?;
            let var_type = compiler.variable_type(&symbol.value, &symbol.span.start)?;
            compiler.emit(Instruction::Load(symbol.value.clone()));
            Ok(var_type)
        }
        ExprType::Assignment => {
            let assignment = expression.downcast::<AssignmentExpr>()?;
            let name = &assignment.assignee.value;
            let target = compiler.variable_type(name, &assignment.assignee.span.start)?;

            let value_type = gen_expression(compiler, &assignment.value)?;
            if target == Literals::Float && value_type == Literals::Int {
                compiler.emit(Instruction::Itof);
            }

            // The reloaded value is the value of the assignment expression
            compiler.emit(Instruction::Save(name.clone()));
            compiler.emit(Instruction::Load(name.clone()));
            Ok(target)
        }
        ExprType::Unary => {
            let prefix = expression.downcast::<PrefixExpr>()?;
            let operand = gen_expression(compiler, &prefix.right_expr)?;

            match prefix.operator.kind {
                TokenKind::Not => compiler.emit(Instruction::Not),
                _ => compiler.emit(Instruction::UMinus(operand)),
            }
            Ok(operand)
        }
        ExprType::LogicOr
        | ExprType::LogicAnd
        | ExprType::Equality
        | ExprType::Comparison
        | ExprType::Addition
        | ExprType::Multiplication => gen_binary(compiler, expression.downcast::<BinaryExpr>()?),
    }
}

/// Emits both operands, converting whichever side is `int` when the other
/// is `float`. The conversion for the left side is inserted right at the
/// boundary between the operands, however long either sequence is.
fn gen_operands(compiler: &mut Compiler, binary: &BinaryExpr, widen: bool) -> Result<Literals, Error> {
    let left = gen_expression(compiler, &binary.left)?;
    let left_end = compiler.boundary();
    let right = gen_expression(compiler, &binary.right)?;

    if !widen {
        return Ok(left);
    }

    Ok(match (left, right) {
        (Literals::Int, Literals::Float) => {
            compiler.insert_at(left_end, Instruction::Itof);
            Literals::Float
        }
        (Literals::Float, Literals::Int) => {
            compiler.emit(Instruction::Itof);
            Literals::Float
        }
        (operand, _) => operand,
    })
}

fn gen_binary(compiler: &mut Compiler, binary: &BinaryExpr) -> Result<Literals, Error> {
    let widen = !matches!(
        binary.operator.kind,
        TokenKind::Dot | TokenKind::Percent | TokenKind::And | TokenKind::Or
    );
    let operand = gen_operands(compiler, binary, widen)?;

    let (instruction, result) = match binary.operator.kind {
        TokenKind::Plus => (Instruction::Add(operand), operand),
        TokenKind::Dash => (Instruction::Sub(operand), operand),
        TokenKind::Star => (Instruction::Mul(operand), operand),
        TokenKind::Slash => (Instruction::Div(operand), operand),
        TokenKind::Percent => (Instruction::Mod, Literals::Int),
        TokenKind::Dot => (Instruction::Concat, Literals::String),
        TokenKind::Less => (Instruction::Lt(operand), Literals::Bool),
        TokenKind::Greater => (Instruction::Gt(operand), Literals::Bool),
        TokenKind::Equals | TokenKind::NotEquals => (Instruction::Eq(operand), Literals::Bool),
        // Both operands are already evaluated, there is no short circuit
        TokenKind::And => (Instruction::And, Literals::Bool),
        TokenKind::Or => (Instruction::Or, Literals::Bool),
        _ => {
            return Err(Error::new(
                ErrorImpl::MalformedTree { expected: String::from("binary operator") },
                binary.operator.span.start.clone(),
            ))
        }
    };

    compiler.emit(instruction);
    if binary.operator.kind == TokenKind::NotEquals {
        compiler.emit(Instruction::Not);
    }

    Ok(result)
}
