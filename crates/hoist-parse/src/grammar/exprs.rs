use hoist_yellow::SyntaxKind::*;
use hoist_yellow::SyntaxSet;

use super::{delimited, items, name_ref, types};
use crate::parser::{CompletedMarker, Parser};

const EXPR_RECOVERY: SyntaxSet =
    SyntaxSet::new([SEMICOLON, RIGHT_BRACE, RIGHT_PAREN, COMMA, RIGHT_BRACKET]);

pub(crate) fn block(p: &mut Parser) {
    if !p.at(LEFT_BRACE) {
        p.error("expected a block");
        return;
    }

    let m = p.start();
    p.advance();

    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        let start = p.pos();
        stmt(p);
        if p.pos() == start {
            p.bump_error();
        }
    }

    p.expect(RIGHT_BRACE);
    m.complete(p, BLOCK);
}

fn stmt(p: &mut Parser) {
    match p.peek_kind() {
        LEFT_BRACE => block(p),
        SEMICOLON => {
            let m = p.start();
            p.advance();
            m.complete(p, EMPTY_STMT);
        }
        RETURN_KW => {
            let m = p.start();
            p.advance();
            if !p.at(SEMICOLON) {
                expr(p);
            }
            p.expect(SEMICOLON);
            m.complete(p, RETURN_STMT);
        }
        IF_KW => if_stmt(p),
        _ if types::at_local_decl(p) => {
            let m = p.start();
            let var = p.start();
            types::type_(p);
            items::variable_declarators(p);
            var.complete(p, VARIABLE_DECL);
            p.expect(SEMICOLON);
            m.complete(p, LOCAL_DECL_STMT);
        }
        _ => {
            if let Some(e) = expr(p) {
                let m = e.precede(p);
                p.expect(SEMICOLON);
                m.complete(p, EXPR_STMT);
            }
        }
    }
}

fn if_stmt(p: &mut Parser) {
    let m = p.start();
    p.advance();

    p.expect(LEFT_PAREN);
    expr(p);
    p.expect(RIGHT_PAREN);
    embedded_stmt(p);

    if p.at(ELSE_KW) {
        let else_clause = p.start();
        p.advance();
        embedded_stmt(p);
        else_clause.complete(p, ELSE_CLAUSE);
    }

    m.complete(p, IF_STMT);
}

fn embedded_stmt(p: &mut Parser) {
    if p.at(RIGHT_BRACE) || p.at(EOF) {
        p.error("expected a statement");
        return;
    }
    let start = p.pos();
    stmt(p);
    if p.pos() == start {
        p.bump_error();
    }
}

pub(crate) fn expr(p: &mut Parser) -> Option<CompletedMarker> {
    expr_bp(p, 0)
}

/// Binding power of the infix operator ahead and whether it associates to
/// the right.
fn infix_op(p: &Parser) -> Option<(u8, bool)> {
    let op = match p.peek_kind() {
        EQ => return Some((1, true)),
        QUESTION => return Some((2, true)),
        LEFT_ANGLE | RIGHT_ANGLE => return Some((10, false)),
        OPERATOR => p.nth_text(0),
        _ => return None,
    };

    let power = match op {
        "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | "??=" => return Some((1, true)),
        "??" => return Some((3, true)),
        "||" => 4,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" => 9,
        "<=" | ">=" => 10,
        "<<" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        _ => return None,
    };
    Some((power, false))
}

fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = prefix_expr(p)?;

    while let Some((power, right_assoc)) = infix_op(p) {
        if power < min_bp {
            break;
        }

        let m = lhs.precede(p);
        if p.at(QUESTION) {
            p.advance();
            expr(p);
            p.expect(COLON);
            expr_bp(p, power);
            lhs = m.complete(p, CONDITIONAL_EXPR);
            continue;
        }

        let kind = if power == 1 { ASSIGN_EXPR } else { BINARY_EXPR };
        p.advance();
        let rhs_bp = if right_assoc { power } else { power + 1 };
        let rhs = expr_bp(p, rhs_bp);
        lhs = m.complete(p, kind);
        if rhs.is_none() {
            break;
        }
    }

    Some(lhs)
}

fn at_prefix_op(p: &Parser) -> bool {
    p.at(OPERATOR) && matches!(p.nth_text(0), "-" | "+" | "!" | "~" | "++" | "--")
}

fn prefix_expr(p: &mut Parser) -> Option<CompletedMarker> {
    if at_prefix_op(p) {
        let m = p.start();
        p.advance();
        prefix_expr(p);
        return Some(m.complete(p, PREFIX_EXPR));
    }

    postfix_expr(p)
}

fn postfix_expr(p: &mut Parser) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;

    loop {
        match p.peek_kind() {
            DOT => {
                let m = lhs.precede(p);
                p.advance();
                name_ref(p);
                lhs = m.complete(p, MEMBER_ACCESS_EXPR);
            }
            LEFT_PAREN => {
                let m = lhs.precede(p);
                arg_list(p);
                lhs = m.complete(p, CALL_EXPR);
            }
            OPERATOR if matches!(p.nth_text(0), "++" | "--") => {
                let m = lhs.precede(p);
                p.advance();
                lhs = m.complete(p, POSTFIX_EXPR);
            }
            _ => break,
        }
    }

    Some(lhs)
}

fn primary_expr(p: &mut Parser) -> Option<CompletedMarker> {
    let kind = p.peek_kind();
    let m = p.start();

    let kind = match kind {
        _ if kind.is_literal() => {
            p.advance();
            LITERAL
        }
        IDENT => {
            p.advance();
            NAME_REF
        }
        THIS_KW => {
            p.advance();
            THIS_EXPR
        }
        BASE_KW => {
            p.advance();
            BASE_EXPR
        }
        NEW_KW => {
            p.advance();
            types::type_(p);
            if p.at(LEFT_PAREN) {
                arg_list(p);
            } else {
                p.error("expected arguments");
            }
            OBJECT_CREATION_EXPR
        }
        LEFT_PAREN => {
            p.advance();
            expr(p);
            p.expect(RIGHT_PAREN);
            PAREN_EXPR
        }
        UNKNOWN if p.nth_text(0).contains(['"', '\'']) => {
            p.error("unterminated literal");
            p.advance();
            m.complete(p, ERROR);
            return None;
        }
        _ => {
            if p.at_set(&EXPR_RECOVERY) || p.at(EOF) {
                m.abandon(p);
                p.error("expected an expression");
            } else {
                p.error("expected an expression");
                p.advance();
                m.complete(p, ERROR);
            }
            return None;
        }
    };

    Some(m.complete(p, kind))
}

pub(crate) fn arg_list(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LEFT_PAREN,
        RIGHT_PAREN,
        COMMA,
        "expected argument",
        &SyntaxSet::EMPTY,
        |p| !p.at(RIGHT_PAREN) && expr(p).is_some(),
    );
    m.complete(p, ARG_LIST);
}
