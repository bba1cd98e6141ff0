//! Statement grammar: module body, compound statements, and the simple
//! statements that make up a compound statement's indented block (§4.2).

use mesh_common::{KeywordKind, TokenKind};

use crate::ast::{Alias, Expr, Module, Operator, Param, ParameterKind, Stmt, StmtKind};
use crate::error::Rejected;
use crate::expr::expression;
use crate::stream::Parser;

type PResult<T> = Result<T, Rejected>;

pub fn module(p: &mut Parser) -> PResult<Module> {
    let mut body = Vec::new();
    skip_blank_newlines(p);
    while !p.at_kind(TokenKind::Eof) {
        body.push(statement(p)?);
        skip_blank_newlines(p);
    }
    Ok(Module { body })
}

fn skip_blank_newlines(p: &mut Parser) {
    while p.at_kind(TokenKind::Newline) {
        p.advance();
    }
}

fn block(p: &mut Parser) -> PResult<Vec<Stmt>> {
    p.expect_kind(TokenKind::Colon)?;
    p.expect_kind(TokenKind::Newline)?;
    p.expect_kind(TokenKind::Indent)?;
    let mut stmts = Vec::new();
    loop {
        skip_blank_newlines(p);
        if p.at_kind(TokenKind::Dedent) {
            p.advance();
            break;
        }
        stmts.push(statement(p)?);
    }
    Ok(stmts)
}

fn decorators(p: &mut Parser) -> PResult<Vec<Expr>> {
    let mut decos = Vec::new();
    while p.at_kind(TokenKind::At) {
        p.advance();
        decos.push(expression(p)?);
        p.expect_kind(TokenKind::Newline)?;
    }
    Ok(decos)
}

fn statement(p: &mut Parser) -> PResult<Stmt> {
    if p.at_kind(TokenKind::At) {
        let decos = decorators(p)?;
        return match p.peek().kind {
            TokenKind::Keyword if p.at_keyword(KeywordKind::Def) => function_def(p, decos),
            TokenKind::Keyword if p.at_keyword(KeywordKind::Class) => class_def(p, decos),
            _ => Err(Rejected::new(
                "decorator must be followed by a def or class statement",
                p.current_span(),
            )),
        };
    }

    if p.at_keyword(KeywordKind::Def) {
        return function_def(p, Vec::new());
    }
    if p.at_keyword(KeywordKind::Class) {
        return class_def(p, Vec::new());
    }
    if p.at_keyword(KeywordKind::If) {
        return if_stmt(p);
    }
    if p.at_keyword(KeywordKind::While) {
        return while_stmt(p);
    }
    if p.at_keyword(KeywordKind::For) {
        return for_stmt(p);
    }
    if p.at_keyword(KeywordKind::Import) {
        return import_stmt(p);
    }
    if p.at_keyword(KeywordKind::From) {
        return import_from_stmt(p);
    }
    simple_statement_line(p)
}

fn function_def(p: &mut Parser, decorators: Vec<Expr>) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::Def)?.span;
    let name_tok = p.expect_kind(TokenKind::Identifier)?;
    let name = p.text(name_tok.span).to_string();
    p.expect_kind(TokenKind::OpenParen)?;
    let params = param_list(p)?;
    p.expect_kind(TokenKind::CloseParen)?;
    let returns = if p.at_kind(TokenKind::Rarrow) {
        p.advance();
        Some(Box::new(expression(p)?))
    } else {
        None
    };
    let body = block(p)?;
    let end = body.last().map(|s| s.span).unwrap_or(start);
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::FunctionDef {
            name,
            params,
            returns,
            body,
            decorators,
        },
    })
}

fn param_list(p: &mut Parser) -> PResult<Vec<Param>> {
    let mut params = Vec::new();
    let mut seen_star = false;
    while !p.at_kind(TokenKind::CloseParen) {
        if p.at_kind(TokenKind::DoubleStar) {
            p.advance();
            params.push(simple_param(p, ParameterKind::VarKwArg)?);
        } else if p.at_kind(TokenKind::Star) {
            p.advance();
            seen_star = true;
            params.push(simple_param(p, ParameterKind::VarArg)?);
        } else {
            let kind = if seen_star {
                ParameterKind::KwOnly
            } else {
                ParameterKind::Arg
            };
            params.push(simple_param(p, kind)?);
        }
        if p.at_kind(TokenKind::Comma) {
            p.advance();
        } else {
            break;
        }
    }
    Ok(params)
}

fn simple_param(p: &mut Parser, kind: ParameterKind) -> PResult<Param> {
    let name_tok = if p.at_keyword(KeywordKind::SelfKw) {
        p.advance()
    } else {
        p.expect_kind(TokenKind::Identifier)?
    };
    let name = p.text(name_tok.span).to_string();
    let annotation = if p.at_kind(TokenKind::Colon) {
        p.advance();
        Some(Box::new(expression(p)?))
    } else {
        None
    };
    let default = if p.at_kind(TokenKind::Equal) {
        p.advance();
        Some(Box::new(expression(p)?))
    } else {
        None
    };
    let end = default
        .as_ref()
        .map(|e| e.span)
        .or_else(|| annotation.as_ref().map(|e| e.span))
        .unwrap_or(name_tok.span);
    Ok(Param {
        name,
        kind,
        annotation,
        default,
        span: name_tok.span.merge(end),
    })
}

fn class_def(p: &mut Parser, decorators: Vec<Expr>) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::Class)?.span;
    let name_tok = p.expect_kind(TokenKind::Identifier)?;
    let name = p.text(name_tok.span).to_string();
    let mut bases = Vec::new();
    if p.at_kind(TokenKind::OpenParen) {
        p.advance();
        while !p.at_kind(TokenKind::CloseParen) {
            bases.push(expression(p)?);
            if p.at_kind(TokenKind::Comma) {
                p.advance();
            } else {
                break;
            }
        }
        p.expect_kind(TokenKind::CloseParen)?;
    }
    let body = block(p)?;
    let end = body.last().map(|s| s.span).unwrap_or(start);
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::ClassDef {
            name,
            bases,
            body,
            decorators,
        },
    })
}

fn if_stmt(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::If)?.span;
    let test = expression(p)?;
    let body = block(p)?;
    let orelse = if p.at_keyword(KeywordKind::Elif) {
        vec![if_stmt_as_elif(p)?]
    } else if p.at_keyword(KeywordKind::Else) {
        p.advance();
        block(p)?
    } else {
        Vec::new()
    };
    let end = orelse
        .last()
        .or(body.last())
        .map(|s| s.span)
        .unwrap_or(start);
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::If {
            test: Box::new(test),
            body,
            orelse,
        },
    })
}

/// `elif` reuses `if`'s shape entirely; the only difference is the
/// keyword consumed, so the resulting single-statement body lets an
/// `elif` chain nest as `orelse = [If { .. }]` the way a hand-written
/// dangling-else resolution naturally falls out of it.
fn if_stmt_as_elif(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::Elif)?.span;
    let test = expression(p)?;
    let body = block(p)?;
    let orelse = if p.at_keyword(KeywordKind::Elif) {
        vec![if_stmt_as_elif(p)?]
    } else if p.at_keyword(KeywordKind::Else) {
        p.advance();
        block(p)?
    } else {
        Vec::new()
    };
    let end = orelse
        .last()
        .or(body.last())
        .map(|s| s.span)
        .unwrap_or(start);
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::If {
            test: Box::new(test),
            body,
            orelse,
        },
    })
}

fn while_stmt(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::While)?.span;
    let test = expression(p)?;
    let body = block(p)?;
    let orelse = if p.at_keyword(KeywordKind::Else) {
        p.advance();
        block(p)?
    } else {
        Vec::new()
    };
    let end = orelse
        .last()
        .or(body.last())
        .map(|s| s.span)
        .unwrap_or(start);
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::While {
            test: Box::new(test),
            body,
            orelse,
        },
    })
}

fn for_stmt(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::For)?.span;
    let target = crate::expr::disjunction(p)?;
    p.expect_keyword(KeywordKind::In)?;
    let iter = expression(p)?;
    let body = block(p)?;
    let orelse = if p.at_keyword(KeywordKind::Else) {
        p.advance();
        block(p)?
    } else {
        Vec::new()
    };
    let end = orelse
        .last()
        .or(body.last())
        .map(|s| s.span)
        .unwrap_or(start);
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::For {
            target: Box::new(target),
            iter: Box::new(iter),
            body,
            orelse,
        },
    })
}

fn dotted_name(p: &mut Parser) -> PResult<String> {
    let first = p.expect_kind(TokenKind::Identifier)?;
    let mut name = p.text(first.span).to_string();
    while p.at_kind(TokenKind::Dot) {
        p.advance();
        let part = p.expect_kind(TokenKind::Identifier)?;
        name.push('.');
        name.push_str(p.text(part.span));
    }
    Ok(name)
}

/// `as`-aliasing is not in this dialect's keyword set; every import name
/// binds under its own spelling (an open question recorded in DESIGN.md).
fn alias(p: &mut Parser) -> PResult<Alias> {
    let name = dotted_name(p)?;
    Ok(Alias { name, asname: None })
}

fn import_stmt(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::Import)?.span;
    let mut names = vec![alias(p)?];
    while p.at_kind(TokenKind::Comma) {
        p.advance();
        names.push(alias(p)?);
    }
    let end = p.expect_kind(TokenKind::Newline)?.span;
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::Import(names),
    })
}

fn import_from_stmt(p: &mut Parser) -> PResult<Stmt> {
    let start = p.expect_keyword(KeywordKind::From)?.span;
    let module = dotted_name(p)?;
    p.expect_keyword(KeywordKind::Import)?;
    let mut names = Vec::new();
    if p.at_kind(TokenKind::Star) {
        p.advance();
        names.push(Alias {
            name: "*".to_string(),
            asname: None,
        });
    } else {
        let first = p.expect_kind(TokenKind::Identifier)?;
        names.push(Alias {
            name: p.text(first.span).to_string(),
            asname: None,
        });
        while p.at_kind(TokenKind::Comma) {
            p.advance();
            let next = p.expect_kind(TokenKind::Identifier)?;
            names.push(Alias {
                name: p.text(next.span).to_string(),
                asname: None,
            });
        }
    }
    let end = p.expect_kind(TokenKind::Newline)?.span;
    Ok(Stmt {
        span: start.merge(end),
        kind: StmtKind::ImportFrom { module, names },
    })
}

/// A comma-separated run of plain identifiers, as used by `global`/`nonlocal`.
/// Returns the names together with the span of the last one, since callers
/// need it to build the statement's own span.
fn identifier_list(p: &mut Parser) -> PResult<(Vec<String>, mesh_common::Span)> {
    let first = p.expect_kind(TokenKind::Identifier)?;
    let mut end = first.span;
    let mut names = vec![p.text(first.span).to_string()];
    while p.at_kind(TokenKind::Comma) {
        p.advance();
        let next = p.expect_kind(TokenKind::Identifier)?;
        end = next.span;
        names.push(p.text(next.span).to_string());
    }
    Ok((names, end))
}

fn augmented_op(kind: TokenKind) -> Option<Operator> {
    Some(match kind {
        TokenKind::PlusEqual => Operator::Add,
        TokenKind::MinusEqual => Operator::Sub,
        TokenKind::StarEqual => Operator::Mult,
        TokenKind::SlashEqual => Operator::Div,
        TokenKind::DoubleSlashEqual => Operator::FloorDiv,
        TokenKind::PercentEqual => Operator::Mod,
        TokenKind::DoubleStarEqual => Operator::Pow,
        TokenKind::AmpersandEqual => Operator::BitAnd,
        TokenKind::VerticalBarEqual => Operator::BitOr,
        TokenKind::CircumflexEqual => Operator::BitXor,
        TokenKind::DoubleLthanEqual => Operator::LShift,
        TokenKind::DoubleGthanEqual => Operator::RShift,
        TokenKind::AtEqual => Operator::MatMult,
        _ => return None,
    })
}

/// One simple statement followed by its terminating `NEWLINE`, with
/// `;`-separated simple statements on the same logical line folded into
/// the enclosing block by the caller re-entering this function.
fn simple_statement_line(p: &mut Parser) -> PResult<Stmt> {
    let stmt = simple_statement(p)?;
    if p.at_kind(TokenKind::Semicolon) {
        p.advance();
    } else {
        p.expect_kind(TokenKind::Newline)?;
    }
    Ok(stmt)
}

fn simple_statement(p: &mut Parser) -> PResult<Stmt> {
    if p.at_keyword(KeywordKind::Pass) {
        let span = p.advance().span;
        return Ok(Stmt {
            span,
            kind: StmtKind::Pass,
        });
    }
    if p.at_keyword(KeywordKind::Break) {
        let span = p.advance().span;
        return Ok(Stmt {
            span,
            kind: StmtKind::Break,
        });
    }
    if p.at_keyword(KeywordKind::Continue) {
        let span = p.advance().span;
        return Ok(Stmt {
            span,
            kind: StmtKind::Continue,
        });
    }
    if p.at_keyword(KeywordKind::Return) {
        let start = p.advance().span;
        if p.at_kind(TokenKind::Newline) || p.at_kind(TokenKind::Semicolon) {
            return Ok(Stmt {
                span: start,
                kind: StmtKind::Return(None),
            });
        }
        let value = expression(p)?;
        let span = start.merge(value.span);
        return Ok(Stmt {
            span,
            kind: StmtKind::Return(Some(Box::new(value))),
        });
    }
    if p.at_keyword(KeywordKind::Assert) {
        let start = p.advance().span;
        let test = expression(p)?;
        let (msg, end) = if p.at_kind(TokenKind::Comma) {
            p.advance();
            let msg = expression(p)?;
            let end = msg.span;
            (Some(Box::new(msg)), end)
        } else {
            (None, test.span)
        };
        return Ok(Stmt {
            span: start.merge(end),
            kind: StmtKind::Assert { test: Box::new(test), msg },
        });
    }
    if p.at_keyword(KeywordKind::Global) {
        let start = p.advance().span;
        let (names, end) = identifier_list(p)?;
        return Ok(Stmt { span: start.merge(end), kind: StmtKind::Global(names) });
    }
    if p.at_keyword(KeywordKind::Nonlocal) {
        let start = p.advance().span;
        let (names, end) = identifier_list(p)?;
        return Ok(Stmt { span: start.merge(end), kind: StmtKind::Nonlocal(names) });
    }

    let first = expression(p)?;

    if let Some(op) = augmented_op(p.peek().kind) {
        p.advance();
        let value = expression(p)?;
        let span = first.span.merge(value.span);
        return Ok(Stmt {
            span,
            kind: StmtKind::AugAssign {
                target: Box::new(first),
                op,
                value: Box::new(value),
            },
        });
    }

    if p.at_kind(TokenKind::Colon) {
        p.advance();
        let annotation = expression(p)?;
        let value = if p.at_kind(TokenKind::Equal) {
            p.advance();
            Some(Box::new(expression(p)?))
        } else {
            None
        };
        let end = value
            .as_ref()
            .map(|e| e.span)
            .unwrap_or(annotation.span);
        return Ok(Stmt {
            span: first.span.merge(end),
            kind: StmtKind::AnnAssign {
                target: Box::new(first),
                annotation: Box::new(annotation),
                value,
            },
        });
    }

    if p.at_kind(TokenKind::Equal) {
        p.advance();
        let mut targets = vec![first];
        let mut value = expression(p)?;
        while p.at_kind(TokenKind::Equal) {
            p.advance();
            targets.push(value);
            value = expression(p)?;
        }
        let span = targets[0].span.merge(value.span);
        return Ok(Stmt {
            span,
            kind: StmtKind::Assign {
                targets,
                value: Box::new(value),
            },
        });
    }

    Ok(Stmt {
        span: first.span,
        kind: StmtKind::Expr(Box::new(first)),
    })
}
