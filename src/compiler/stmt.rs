use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper, Stmt, StmtType, StmtWrapper},
        statements::{
            BlockStmt, DeclarationStmt, ExpressionStmt, ForStmt, IfStmt, ProgramStmt, ReadStmt,
            WhileStmt, WriteStmt,
        },
    },
    bytecode::instruction::Instruction,
    errors::errors::Error,
};

use super::{compiler::Compiler, expr::gen_expression};

/// Emits an expression evaluated for its effect. An assignment's value is
/// popped, any other value is left on the stack.
fn gen_effect(compiler: &mut Compiler, expression: &ExprWrapper) -> Result<(), Error> {
    gen_expression(compiler, expression)?;
    if expression.get_expr_type() == ExprType::Assignment {
        compiler.emit(Instruction::Pop);
    }
    Ok(())
}

/// Emits a loop clause whose value is never used.
fn gen_discarded(compiler: &mut Compiler, expression: &ExprWrapper) -> Result<(), Error> {
    gen_expression(compiler, expression)?;
    compiler.emit(Instruction::Pop);
    Ok(())
}

pub fn gen_statement(compiler: &mut Compiler, statement: &StmtWrapper) -> Result<(), Error> {
    match statement.get_stmt_type() {
        StmtType::Program => {
            for stmt in statement.downcast::<ProgramStmt>()?.iter() {
                gen_statement(compiler, stmt)?;
            }
        }
        StmtType::Block => {
            for stmt in statement.downcast::<BlockStmt>()?.iter() {
                gen_statement(compiler, stmt)?;
            }
        }
        StmtType::Declaration => {
            let declaration = statement.downcast::<DeclarationStmt>()?;
            for (name, _) in &declaration.identifiers {
                compiler.declare(name, declaration.var_type);
            }
        }
        StmtType::Read => {
            for (name, span) in &statement.downcast::<ReadStmt>()?.identifiers {
                let var_type = compiler.variable_type(name, &span.start)?;
                compiler.emit(Instruction::Read(var_type));
                compiler.emit(Instruction::Save(name.clone()));
            }
        }
        StmtType::Write => {
            let write = statement.downcast::<WriteStmt>()?;
            for expression in &write.expressions {
                gen_expression(compiler, expression)?;
            }
            compiler.emit(Instruction::Print(write.expressions.len()));
        }
        StmtType::If => {
            let if_stmt = statement.downcast::<IfStmt>()?;
            let else_label = compiler.fresh_label();
            let end_label = compiler.fresh_label();

            gen_expression(compiler, &if_stmt.condition)?;
            compiler.emit(Instruction::Fjmp(else_label));
            gen_statement(compiler, &if_stmt.consequent)?;
            compiler.emit(Instruction::Jmp(end_label));

            compiler.emit(Instruction::Label(else_label));
            if let Some(alternate) = &if_stmt.alternate {
                gen_statement(compiler, alternate)?;
            }
            compiler.emit(Instruction::Label(end_label));
        }
        StmtType::While => {
            let while_stmt = statement.downcast::<WhileStmt>()?;
            let start_label = compiler.fresh_label();
            let end_label = compiler.fresh_label();

            compiler.emit(Instruction::Label(start_label));
            gen_expression(compiler, &while_stmt.condition)?;
            compiler.emit(Instruction::Fjmp(end_label));
            gen_statement(compiler, &while_stmt.body)?;
            compiler.emit(Instruction::Jmp(start_label));
            compiler.emit(Instruction::Label(end_label));
        }
        StmtType::For => {
            let for_stmt = statement.downcast::<ForStmt>()?;
            if let Some((var_type, name, _)) = &for_stmt.induction {
                compiler.declare(name, *var_type);
            }
            gen_discarded(compiler, &for_stmt.init)?;

            let start_label = compiler.fresh_label();
            let end_label = compiler.fresh_label();

            compiler.emit(Instruction::Label(start_label));
            gen_expression(compiler, &for_stmt.condition)?;
            compiler.emit(Instruction::Fjmp(end_label));
            gen_statement(compiler, &for_stmt.body)?;
            gen_discarded(compiler, &for_stmt.step)?;
            compiler.emit(Instruction::Jmp(start_label));
            compiler.emit(Instruction::Label(end_label));
        }
        StmtType::ExpressionStmt => {
            gen_effect(compiler, &statement.downcast::<ExpressionStmt>()?.expression)?;
        }
    }

    Ok(())
}
