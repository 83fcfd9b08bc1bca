use hoist_yellow::SyntaxKind::{self, *};
use hoist_yellow::SyntaxSet;

use crate::parser::Parser;

pub(crate) mod exprs;
pub(crate) mod items;
pub(crate) mod types;

const MODIFIERS: SyntaxSet = SyntaxSet::new([
    ABSTRACT_KW,
    CONST_KW,
    INTERNAL_KW,
    NEW_KW,
    OVERRIDE_KW,
    PARTIAL_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    SEALED_KW,
    STATIC_KW,
    VIRTUAL_KW,
]);

pub(crate) fn compilation_unit(p: &mut Parser) {
    let m = p.start();
    items::items(p, false);
    p.advance_eof();
    m.complete(p, COMPILATION_UNIT);
}

pub(crate) fn name(p: &mut Parser, recovery: &SyntaxSet) {
    match p.peek_kind() {
        IDENT => {
            let m = p.start();
            p.advance();
            m.complete(p, NAME);
        }
        _ => p.error_recover("expected identifier", recovery),
    }
}

pub(crate) fn name_ref(p: &mut Parser) {
    match p.peek_kind() {
        IDENT => {
            let m = p.start();
            p.advance();
            m.complete(p, NAME_REF);
        }
        _ => p.error("expected identifier"),
    }
}

/// `A.B.C`
pub(crate) fn path(p: &mut Parser) {
    let m = p.start();
    name_ref(p);
    while p.at(DOT) && p.nth(1) == IDENT {
        p.advance();
        name_ref(p);
    }
    m.complete(p, PATH);
}

pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    unexpected_delim_message: &'static str,
    first_set: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            let m = p.start();
            p.error(unexpected_delim_message);
            p.advance();
            m.complete(p, ERROR);
            continue;
        }

        if !parser(p) {
            break;
        }

        if !p.eat(delim) {
            if first_set.contains(p.peek_kind()) {
                p.expect(delim);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}

/// Skips an unparseable declaration. Braced groups are consumed whole so that
/// one bad declaration produces one error.
pub(crate) fn skip_declaration(p: &mut Parser, stop: &SyntaxSet) {
    let mut depth = 0usize;
    while !p.at(EOF) {
        match p.peek_kind() {
            LEFT_BRACE => depth += 1,
            RIGHT_BRACE if depth == 0 => break,
            RIGHT_BRACE => {
                depth -= 1;
                if depth == 0 {
                    p.advance();
                    break;
                }
            }
            SEMICOLON if depth == 0 => {
                p.advance();
                break;
            }
            kind if depth == 0 && stop.contains(kind) => break,
            _ => {}
        }
        p.advance();
    }
}
