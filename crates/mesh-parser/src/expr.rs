//! Expression grammar: precedence climbing from `disjunction` down to
//! `atom`, then the left-folded trailers on `primary` (§4.2).
//!
//! The chain mirrors the dialect's actual precedence levels one function
//! per level, from loosest to tightest:
//! disjunction > conjunction > inversion > comparison > bitwise-or >
//! bitwise-xor > bitwise-and > shift > sum > term > factor > power >
//! await-primary > primary. There is no `await` keyword in this dialect,
//! so `await_primary` is a pass-through kept only so the level numbering
//! stays legible against the grammar it mirrors.

use mesh_common::{KeywordKind, TokenKind};

use crate::ast::{
    BoolOperator, CmpOperator, Comparator, Comprehension, Constant, DictElt, Expr, ExprKind,
    KeywordArgument, Operator, UnaryOperator,
};
use crate::error::Rejected;
use crate::stream::Parser;

type PResult<T> = Result<T, Rejected>;

pub fn expression(p: &mut Parser) -> PResult<Expr> {
    let test = disjunction(p)?;
    if p.at_keyword(KeywordKind::If) {
        p.advance();
        let cond = disjunction(p)?;
        p.expect_keyword(KeywordKind::Else)?;
        let orelse = expression(p)?;
        let span = test.span.merge(orelse.span);
        return Ok(Expr {
            span,
            kind: ExprKind::IfExp {
                test: Box::new(cond),
                body: Box::new(test),
                orelse: Box::new(orelse),
            },
        });
    }
    Ok(test)
}

pub fn disjunction(p: &mut Parser) -> PResult<Expr> {
    let first = conjunction(p)?;
    if !p.at_keyword(KeywordKind::Or) {
        return Ok(first);
    }
    let mut values = vec![first];
    while p.at_keyword(KeywordKind::Or) {
        p.advance();
        values.push(conjunction(p)?);
    }
    let span = values[0].span.merge(values.last().unwrap().span);
    Ok(Expr {
        span,
        kind: ExprKind::BoolOp {
            op: BoolOperator::Or,
            values,
        },
    })
}

pub fn conjunction(p: &mut Parser) -> PResult<Expr> {
    let first = inversion(p)?;
    if !p.at_keyword(KeywordKind::And) {
        return Ok(first);
    }
    let mut values = vec![first];
    while p.at_keyword(KeywordKind::And) {
        p.advance();
        values.push(inversion(p)?);
    }
    let span = values[0].span.merge(values.last().unwrap().span);
    Ok(Expr {
        span,
        kind: ExprKind::BoolOp {
            op: BoolOperator::And,
            values,
        },
    })
}

pub fn inversion(p: &mut Parser) -> PResult<Expr> {
    if p.at_keyword(KeywordKind::Not) {
        let start = p.advance().span;
        let operand = inversion(p)?;
        let span = start.merge(operand.span);
        return Ok(Expr {
            span,
            kind: ExprKind::UnaryOp {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            },
        });
    }
    comparison(p)
}

fn comparator_op(p: &mut Parser) -> Option<CmpOperator> {
    let kind = p.peek().kind;
    let op = match kind {
        TokenKind::EqEqual => Some(CmpOperator::Eq),
        TokenKind::NotEqual => Some(CmpOperator::NotEq),
        TokenKind::LthanEq => Some(CmpOperator::LtE),
        TokenKind::Lthan => Some(CmpOperator::Lt),
        TokenKind::GthanEq => Some(CmpOperator::GtE),
        TokenKind::Gthan => Some(CmpOperator::Gt),
        _ => None,
    };
    if let Some(op) = op {
        p.advance();
        return Some(op);
    }
    if p.at_keyword(KeywordKind::In) {
        p.advance();
        return Some(CmpOperator::In);
    }
    if p.at_keyword(KeywordKind::Not) && p.peek_at(1).is_keyword(KeywordKind::In) {
        p.advance();
        p.advance();
        return Some(CmpOperator::NotIn);
    }
    if p.at_keyword(KeywordKind::Is) {
        p.advance();
        if p.at_keyword(KeywordKind::Not) {
            p.advance();
            return Some(CmpOperator::IsNot);
        }
        return Some(CmpOperator::Is);
    }
    None
}

pub fn comparison(p: &mut Parser) -> PResult<Expr> {
    let left = bitwise_or(p)?;
    let mut comparators = Vec::new();
    while let Some(op) = comparator_op(p) {
        let value = bitwise_or(p)?;
        comparators.push(Comparator { op, value });
    }
    if comparators.is_empty() {
        return Ok(left);
    }
    let span = left.span.merge(comparators.last().unwrap().value.span);
    Ok(Expr {
        span,
        kind: ExprKind::Compare {
            left: Box::new(left),
            comparators,
        },
    })
}

/// Shared shape for every strictly left-associative binary level: parse
/// `next`, then keep folding in `next` again as long as the current token
/// matches one of `ops`.
fn left_assoc(
    p: &mut Parser,
    next: fn(&mut Parser) -> PResult<Expr>,
    ops: &[(TokenKind, Operator)],
) -> PResult<Expr> {
    let mut expr = next(p)?;
    loop {
        let kind = p.peek().kind;
        let Some(&(_, op)) = ops.iter().find(|(k, _)| *k == kind) else {
            return Ok(expr);
        };
        p.advance();
        let rhs = next(p)?;
        let span = expr.span.merge(rhs.span);
        expr = Expr {
            span,
            kind: ExprKind::BinaryOp {
                left: Box::new(expr),
                op,
                right: Box::new(rhs),
            },
        };
    }
}

pub fn bitwise_or(p: &mut Parser) -> PResult<Expr> {
    left_assoc(p, bitwise_xor, &[(TokenKind::VerticalBar, Operator::BitOr)])
}

pub fn bitwise_xor(p: &mut Parser) -> PResult<Expr> {
    left_assoc(p, bitwise_and, &[(TokenKind::Circumflex, Operator::BitXor)])
}

pub fn bitwise_and(p: &mut Parser) -> PResult<Expr> {
    left_assoc(p, shift, &[(TokenKind::Ampersand, Operator::BitAnd)])
}

pub fn shift(p: &mut Parser) -> PResult<Expr> {
    left_assoc(
        p,
        sum,
        &[
            (TokenKind::DoubleLthan, Operator::LShift),
            (TokenKind::DoubleGthan, Operator::RShift),
        ],
    )
}

pub fn sum(p: &mut Parser) -> PResult<Expr> {
    left_assoc(
        p,
        term,
        &[(TokenKind::Plus, Operator::Add), (TokenKind::Minus, Operator::Sub)],
    )
}

pub fn term(p: &mut Parser) -> PResult<Expr> {
    left_assoc(
        p,
        factor,
        &[
            (TokenKind::Star, Operator::Mult),
            (TokenKind::Slash, Operator::Div),
            (TokenKind::DoubleSlash, Operator::FloorDiv),
            (TokenKind::Percent, Operator::Mod),
            (TokenKind::At, Operator::MatMult),
        ],
    )
}

pub fn factor(p: &mut Parser) -> PResult<Expr> {
    let op = match p.peek().kind {
        TokenKind::Plus => UnaryOperator::UAdd,
        TokenKind::Minus => UnaryOperator::USub,
        TokenKind::Tilde => UnaryOperator::Invert,
        _ => return power(p),
    };
    let start = p.advance().span;
    let operand = factor(p)?;
    let span = start.merge(operand.span);
    Ok(Expr {
        span,
        kind: ExprKind::UnaryOp {
            op,
            operand: Box::new(operand),
        },
    })
}

pub fn power(p: &mut Parser) -> PResult<Expr> {
    let base = await_primary(p)?;
    if p.at_kind(TokenKind::DoubleStar) {
        p.advance();
        let exponent = factor(p)?;
        let span = base.span.merge(exponent.span);
        return Ok(Expr {
            span,
            kind: ExprKind::BinaryOp {
                left: Box::new(base),
                op: Operator::Pow,
                right: Box::new(exponent),
            },
        });
    }
    Ok(base)
}

fn await_primary(p: &mut Parser) -> PResult<Expr> {
    primary(p)
}

pub fn primary(p: &mut Parser) -> PResult<Expr> {
    let mut expr = atom(p)?;
    loop {
        if p.at_kind(TokenKind::Dot) {
            p.advance();
            let name = p.expect_kind(TokenKind::Identifier)?;
            let span = expr.span.merge(name.span);
            expr = Expr {
                span,
                kind: ExprKind::Attribute {
                    value: Box::new(expr),
                    attr: p.text(name.span).to_string(),
                },
            };
        } else if p.at_kind(TokenKind::OpenParen) {
            expr = call_tail(p, expr)?;
        } else if p.at_kind(TokenKind::OpenBracket) {
            p.advance();
            let slice = slices(p)?;
            let close = p.expect_kind(TokenKind::CloseBracket)?;
            let span = expr.span.merge(close.span);
            expr = Expr {
                span,
                kind: ExprKind::Subscript {
                    value: Box::new(expr),
                    slice: Box::new(slice),
                },
            };
        } else {
            return Ok(expr);
        }
    }
}

fn call_tail(p: &mut Parser, func: Expr) -> PResult<Expr> {
    p.advance();
    let mut args = Vec::new();
    let mut kwargs = Vec::new();
    if !p.at_kind(TokenKind::CloseParen) {
        loop {
            if let Some(name) = try_keyword_argument_name(p) {
                p.advance();
                p.advance();
                let value = expression(p)?;
                kwargs.push(KeywordArgument {
                    name: Some(name),
                    value,
                });
            } else if p.at_kind(TokenKind::Star) {
                p.advance();
                let value = expression(p)?;
                args.push(Expr {
                    span: value.span,
                    kind: ExprKind::Starred(Box::new(value)),
                });
            } else if p.at_kind(TokenKind::DoubleStar) {
                p.advance();
                let value = expression(p)?;
                kwargs.push(KeywordArgument { name: None, value });
            } else {
                args.push(expression(p)?);
            }
            if p.at_kind(TokenKind::Comma) {
                p.advance();
                if p.at_kind(TokenKind::CloseParen) {
                    break;
                }
                continue;
            }
            break;
        }
    }
    let close = p.expect_kind(TokenKind::CloseParen)?;
    let span = func.span.merge(close.span);
    Ok(Expr {
        span,
        kind: ExprKind::Call {
            func: Box::new(func),
            args,
            kwargs,
        },
    })
}

fn try_keyword_argument_name(p: &mut Parser) -> Option<String> {
    if p.at_kind(TokenKind::Identifier) && p.peek_at(1).kind == TokenKind::Equal {
        Some(p.text(p.peek().span).to_string())
    } else {
        None
    }
}

fn slices(p: &mut Parser) -> PResult<Expr> {
    let first = slice(p)?;
    if !p.at_kind(TokenKind::Comma) {
        return Ok(first);
    }
    let start = first.span;
    let mut elts = vec![first];
    let mut end = start;
    while p.at_kind(TokenKind::Comma) {
        let comma = p.advance();
        end = comma.span;
        if matches!(p.peek().kind, TokenKind::CloseBracket) {
            break;
        }
        let next = slice(p)?;
        end = next.span;
        elts.push(next);
    }
    Ok(Expr {
        span: start.merge(end),
        kind: ExprKind::Tuple(elts),
    })
}

fn slice(p: &mut Parser) -> PResult<Expr> {
    let lower = p.optional(expression);
    if !p.at_kind(TokenKind::Colon) {
        return lower.ok_or_else(|| Rejected::new("missing slice expression", p.current_span()));
    }
    let colon_span = p.advance().span;
    let upper = p.optional(expression);
    let mut span = lower
        .as_ref()
        .map(|e| e.span)
        .unwrap_or(colon_span)
        .merge(upper.as_ref().map(|e| e.span).unwrap_or(colon_span));
    let step = if p.at_kind(TokenKind::Colon) {
        p.advance();
        let step = p.optional(expression);
        if let Some(step) = &step {
            span = span.merge(step.span);
        }
        step
    } else {
        None
    };
    Ok(Expr {
        span,
        kind: ExprKind::Slice {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            step: step.map(Box::new),
        },
    })
}


fn comprehension_clauses(p: &mut Parser) -> PResult<Vec<Comprehension>> {
    let mut generators = Vec::new();
    loop {
        if !p.at_keyword(KeywordKind::For) {
            break;
        }
        p.advance();
        let target = disjunction(p)?;
        p.expect_keyword(KeywordKind::In)?;
        let iter = disjunction(p)?;
        let mut ifs = Vec::new();
        while p.at_keyword(KeywordKind::If) {
            p.advance();
            ifs.push(disjunction(p)?);
        }
        generators.push(Comprehension { target, iter, ifs });
    }
    Ok(generators)
}

fn paren_or_tuple_or_genexp(p: &mut Parser) -> PResult<Expr> {
    let open = p.expect_kind(TokenKind::OpenParen)?;
    if p.at_kind(TokenKind::CloseParen) {
        let close = p.advance();
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::Tuple(Vec::new()),
        });
    }
    let first = expression(p)?;
    let generators = comprehension_clauses(p)?;
    if !generators.is_empty() {
        let close = p.expect_kind(TokenKind::CloseParen)?;
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::GeneratorExp {
                element: Box::new(first),
                generators,
            },
        });
    }
    if p.at_kind(TokenKind::Comma) {
        let mut elts = vec![first];
        while p.at_kind(TokenKind::Comma) {
            p.advance();
            if p.at_kind(TokenKind::CloseParen) {
                break;
            }
            elts.push(expression(p)?);
        }
        let close = p.expect_kind(TokenKind::CloseParen)?;
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::Tuple(elts),
        });
    }
    let close = p.expect_kind(TokenKind::CloseParen)?;
    Ok(Expr {
        span: open.span.merge(close.span),
        kind: first.kind,
    })
}

fn bracket_list_or_comp(p: &mut Parser) -> PResult<Expr> {
    let open = p.expect_kind(TokenKind::OpenBracket)?;
    if p.at_kind(TokenKind::CloseBracket) {
        let close = p.advance();
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::List(Vec::new()),
        });
    }
    let first = expression(p)?;
    let generators = comprehension_clauses(p)?;
    if !generators.is_empty() {
        let close = p.expect_kind(TokenKind::CloseBracket)?;
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::ListComp {
                element: Box::new(first),
                generators,
            },
        });
    }
    let mut elts = vec![first];
    while p.at_kind(TokenKind::Comma) {
        p.advance();
        if p.at_kind(TokenKind::CloseBracket) {
            break;
        }
        elts.push(expression(p)?);
    }
    let close = p.expect_kind(TokenKind::CloseBracket)?;
    Ok(Expr {
        span: open.span.merge(close.span),
        kind: ExprKind::List(elts),
    })
}

fn brace_dict_or_set_or_comp(p: &mut Parser) -> PResult<Expr> {
    let open = p.expect_kind(TokenKind::OpenBrace)?;
    if p.at_kind(TokenKind::CloseBrace) {
        let close = p.advance();
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::Dict(Vec::new()),
        });
    }
    if p.at_kind(TokenKind::DoubleStar) {
        p.advance();
        let value = expression(p)?;
        let mut elts = vec![DictElt { key: None, value }];
        while p.at_kind(TokenKind::Comma) {
            p.advance();
            if p.at_kind(TokenKind::CloseBrace) {
                break;
            }
            elts.push(dict_elt(p)?);
        }
        let close = p.expect_kind(TokenKind::CloseBrace)?;
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::Dict(elts),
        });
    }

    let first = expression(p)?;
    if p.at_kind(TokenKind::Colon) {
        p.advance();
        let value = expression(p)?;
        let generators = comprehension_clauses(p)?;
        if !generators.is_empty() {
            let close = p.expect_kind(TokenKind::CloseBrace)?;
            return Ok(Expr {
                span: open.span.merge(close.span),
                kind: ExprKind::DictComp {
                    key: Box::new(first),
                    value: Box::new(value),
                    generators,
                },
            });
        }
        let mut elts = vec![DictElt {
            key: Some(first),
            value,
        }];
        while p.at_kind(TokenKind::Comma) {
            p.advance();
            if p.at_kind(TokenKind::CloseBrace) {
                break;
            }
            elts.push(dict_elt(p)?);
        }
        let close = p.expect_kind(TokenKind::CloseBrace)?;
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::Dict(elts),
        });
    }

    let generators = comprehension_clauses(p)?;
    if !generators.is_empty() {
        let close = p.expect_kind(TokenKind::CloseBrace)?;
        return Ok(Expr {
            span: open.span.merge(close.span),
            kind: ExprKind::SetComp {
                element: Box::new(first),
                generators,
            },
        });
    }
    let mut elts = vec![first];
    while p.at_kind(TokenKind::Comma) {
        p.advance();
        if p.at_kind(TokenKind::CloseBrace) {
            break;
        }
        elts.push(expression(p)?);
    }
    let close = p.expect_kind(TokenKind::CloseBrace)?;
    Ok(Expr {
        span: open.span.merge(close.span),
        kind: ExprKind::Set(elts),
    })
}

fn dict_elt(p: &mut Parser) -> PResult<DictElt> {
    if p.at_kind(TokenKind::DoubleStar) {
        p.advance();
        let value = expression(p)?;
        return Ok(DictElt { key: None, value });
    }
    let key = expression(p)?;
    p.expect_kind(TokenKind::Colon)?;
    let value = expression(p)?;
    Ok(DictElt {
        key: Some(key),
        value,
    })
}

pub fn atom(p: &mut Parser) -> PResult<Expr> {
    let token = p.peek().clone();
    match token.kind {
        TokenKind::Identifier => {
            p.advance();
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Name(p.text(token.span).to_string()),
            })
        }
        TokenKind::Number => {
            p.advance();
            let is_float = matches!(
                &token.payload,
                mesh_common::token::TokenPayload::Number(flags) if flags.float
            );
            let kind = if is_float {
                Constant::Float(p.text(token.span).to_string())
            } else {
                Constant::Int(p.text(token.span).to_string())
            };
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Constant(kind),
            })
        }
        TokenKind::String => {
            p.advance();
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Constant(Constant::Str(p.text(token.span).to_string())),
            })
        }
        TokenKind::Keyword if token.is_keyword(KeywordKind::True) => {
            p.advance();
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Constant(Constant::Bool(true)),
            })
        }
        TokenKind::Keyword if token.is_keyword(KeywordKind::False) => {
            p.advance();
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Constant(Constant::Bool(false)),
            })
        }
        TokenKind::Keyword if token.is_keyword(KeywordKind::None_) => {
            p.advance();
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Constant(Constant::None),
            })
        }
        TokenKind::Ellipsis => {
            p.advance();
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Constant(Constant::Ellipsis),
            })
        }
        TokenKind::Keyword if token.is_keyword(KeywordKind::SelfKw) => {
            p.advance();
            Ok(Expr {
                span: token.span,
                kind: ExprKind::Name("self".to_string()),
            })
        }
        TokenKind::OpenParen => paren_or_tuple_or_genexp(p),
        TokenKind::OpenBracket => bracket_list_or_comp(p),
        TokenKind::OpenBrace => brace_dict_or_set_or_comp(p),
        other => Err(Rejected::new(format!("unexpected token {other:?} in expression"), token.span)),
    }
}

