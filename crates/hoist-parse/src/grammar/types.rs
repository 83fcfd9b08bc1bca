use hoist_yellow::SyntaxKind::*;
use hoist_yellow::SyntaxSet;

use super::{delimited, name_ref};
use crate::parser::{CompletedMarker, Parser};

pub(crate) fn type_(p: &mut Parser) -> Option<CompletedMarker> {
    if !p.at(IDENT) {
        p.error("expected a type");
        return None;
    }

    let m = p.start();
    name_ref(p);
    while p.at(DOT) && p.nth(1) == IDENT {
        p.advance();
        name_ref(p);
    }
    if p.at(LEFT_ANGLE) {
        generic_arg_list(p);
    }
    let mut ty = m.complete(p, PATH_TYPE);

    loop {
        if p.at(QUESTION) {
            let m = ty.precede(p);
            p.advance();
            ty = m.complete(p, NULLABLE_TYPE);
        } else if p.at(LEFT_BRACKET) && p.nth(1) == RIGHT_BRACKET {
            let m = ty.precede(p);
            p.advance();
            p.advance();
            ty = m.complete(p, ARRAY_TYPE);
        } else {
            break;
        }
    }

    Some(ty)
}

fn generic_arg_list(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LEFT_ANGLE,
        RIGHT_ANGLE,
        COMMA,
        "expected type argument",
        &SyntaxSet::new([IDENT]),
        |p| type_(p).is_some(),
    );
    m.complete(p, GENERIC_ARG_LIST);
}

/// Whether the tokens ahead read as `Type name`, which starts a local
/// variable declaration rather than an expression statement.
pub(crate) fn at_local_decl(p: &Parser) -> bool {
    let mut n = 0;
    if p.nth(n) != IDENT {
        return false;
    }
    n += 1;

    let mut depth = 0usize;
    loop {
        match p.nth(n) {
            DOT if p.nth(n + 1) == IDENT => n += 2,
            LEFT_ANGLE => {
                depth += 1;
                n += 1;
            }
            RIGHT_ANGLE if depth > 0 => {
                depth -= 1;
                n += 1;
            }
            IDENT | COMMA if depth > 0 => n += 1,
            QUESTION => n += 1,
            LEFT_BRACKET if p.nth(n + 1) == RIGHT_BRACKET => n += 2,
            _ => break,
        }
    }

    depth == 0 && p.nth(n) == IDENT && matches!(p.nth(n + 1), EQ | SEMICOLON | COMMA)
}
