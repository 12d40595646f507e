use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper, StmtWrapper},
        expressions::AssignmentExpr,
        statements::{
            BlockStmt, DeclarationStmt, ExpressionStmt, ForStmt, IfStmt, ReadStmt, WhileStmt,
            WriteStmt,
        },
        types::Literals,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(ExpressionStmt {
        span: Span {
            start: expr.get_span().start.clone(),
            end: parser.get_previous_end(),
        },
        expression: expr,
    }))
}

/// `id (, id)*`
fn parse_identifier_list(parser: &mut Parser) -> Result<Vec<(String, Span)>, Error> {
    let mut identifiers = vec![];

    loop {
        let error = parser.unexpected("expected identifier");
        let token = parser.expect_error(TokenKind::Identifier, Some(error))?;
        identifiers.push((token.value, token.span));

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    Ok(identifiers)
}

/// `(expr)` as used by `if` and `while`.
fn parse_condition(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let type_token = parser.advance().clone();
    let Some(var_type) = Literals::from_keyword(type_token.kind) else {
        return Err(parser.unexpected("expected a type"));
    };

    let identifiers = parse_identifier_list(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(DeclarationStmt {
        var_type,
        identifiers,
        span: Span {
            start: type_token.span.start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_read_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let identifiers = parse_identifier_list(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(ReadStmt {
        identifiers,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_write_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let mut expressions = vec![parse_expr(parser, BindingPower::Default)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        expressions.push(parse_expr(parser, BindingPower::Default)?);
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(WriteStmt {
        expressions,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_stmt(parser)?);
    }

    let error = parser.unexpected("expected '}' to close the block");
    parser.expect_error(TokenKind::CloseCurly, Some(error))?;

    Ok(StmtWrapper::new(BlockStmt {
        body,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

/// A lone `;` is an empty block.
pub fn parse_empty_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let span = parser.advance().span.clone();

    Ok(StmtWrapper::new(BlockStmt { body: vec![], span }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let consequent = parse_stmt(parser)?;

    let alternate = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_stmt(parser)?)
    } else {
        None
    };

    Ok(StmtWrapper::new(IfStmt {
        condition,
        consequent,
        alternate,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_stmt(parser)?;

    Ok(StmtWrapper::new(WhileStmt {
        condition,
        body,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

/// `for ([TYPE] init; condition; step) body`
///
/// With a type, the init expression has to assign the induction variable.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;

    let var_type = Literals::from_keyword(parser.current_token_kind());
    if var_type.is_some() {
        parser.advance();
    }

    let init_position = parser.get_position();
    let init = parse_expr(parser, BindingPower::Default)?;

    let induction = match var_type {
        Some(var_type) => {
            if init.get_expr_type() != ExprType::Assignment {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: var_type.to_string(),
                        message: String::from("a typed for loop must initialise its variable"),
                    },
                    init_position,
                ));
            }
            let assignee = &init.downcast::<AssignmentExpr>()?.assignee;
            Some((var_type, assignee.value.clone(), assignee.span.clone()))
        }
        None => None,
    };

    parser.expect(TokenKind::Semicolon)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;
    let step = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(StmtWrapper::new(ForStmt {
        induction,
        init,
        condition,
        step,
        body,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}
