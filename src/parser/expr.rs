use crate::{
    ast::{
        ast::{Expr, ExprWrapper},
        expressions::{
            AssignmentExpr, BinaryExpr, BoolExpr, FloatExpr, IntExpr, PrefixExpr, StringExpr,
            SymbolExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position()));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser.get_bp_lookup().get(&token_kind).copied().unwrap_or(BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position()));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Integer => {
            let value = token.value.parse::<i32>().map_err(|_| {
                Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
            })?;
            parser.advance();
            Ok(ExprWrapper::new(IntExpr { value, span: token.span }))
        },
        TokenKind::FloatLiteral => {
            let value = token.value.parse::<f64>().map_err(|_| {
                Error::new(ErrorImpl::NumberParseError { token: token.value.clone() }, token.span.start.clone())
            })?;
            parser.advance();
            Ok(ExprWrapper::new(FloatExpr { value, span: token.span }))
        },
        TokenKind::True | TokenKind::False => {
            parser.advance();
            Ok(ExprWrapper::new(BoolExpr { value: token.kind == TokenKind::True, span: token.span }))
        },
        TokenKind::Identifier => {
            parser.advance();
            Ok(ExprWrapper::new(SymbolExpr { value: token.value, span: token.span }))
        },
        TokenKind::String => {
            parser.advance();
            Ok(ExprWrapper::new(StringExpr { value: token.value, span: token.span }))
        }
        _ => {
            Err(Error::new(ErrorImpl::UnexpectedToken { token: token.value }, token.span.start))
        }
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: ExprWrapper, bp: BindingPower) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    let Some(kind) = BinaryExpr::kind_of(operator_token.kind) else {
        return Err(Error::new(ErrorImpl::UnexpectedToken { token: operator_token.value }, operator_token.span.start));
    };

    let right = parse_expr(parser, bp)?;

    Ok(ExprWrapper::new(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone()
        },
        left,
        operator: operator_token,
        right,
        kind,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    // The magnitude of the smallest int only fits once it is negated
    if operator_token.kind == TokenKind::Dash && parser.current_token_kind() == TokenKind::Integer {
        let literal = parser.current_token().clone();
        if literal.value.parse::<i32>().is_err() {
            if let Ok(value) = format!("-{}", literal.value).parse::<i32>() {
                parser.advance();
                return Ok(ExprWrapper::new(IntExpr {
                    value,
                    span: Span {
                        start: operator_token.span.start,
                        end: literal.span.end,
                    },
                }));
            }
        }
    }
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(ExprWrapper::new(PrefixExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: rhs.get_span().end.clone()
        },
        operator: operator_token,
        right_expr: rhs
    }))
}

/// `target = value`. Right associative, so the value is parsed at the
/// lowest binding power and may itself be an assignment.
pub fn parse_assignment_expr(parser: &mut Parser, left: ExprWrapper, _bp: BindingPower) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    let Some(assignee) = left.as_any().downcast_ref::<SymbolExpr>().cloned() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: operator_token.value,
                message: String::from("left side of an assignment must be a variable"),
            },
            operator_token.span.start,
        ));
    };

    let rhs = parse_expr(parser, BindingPower::Default)?;

    Ok(ExprWrapper::new(AssignmentExpr {
        span: Span {
            start: assignee.span.start.clone(),
            end: rhs.get_span().end.clone()
        },
        value: rhs,
        assignee,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}
