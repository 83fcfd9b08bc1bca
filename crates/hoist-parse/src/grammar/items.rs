use hoist_yellow::SyntaxKind::{self, *};
use hoist_yellow::SyntaxSet;

use super::{MODIFIERS, delimited, exprs, name, path, skip_declaration, types};
use crate::parser::{Marker, Parser};

const ITEM_RECOVERY: SyntaxSet =
    SyntaxSet::new([CLASS_KW, NAMESPACE_KW, USING_KW, LEFT_BRACKET]).union(&MODIFIERS);
const MEMBER_RECOVERY: SyntaxSet = SyntaxSet::new([CLASS_KW, LEFT_BRACKET]).union(&MODIFIERS);

/// Items until end of file, or until the closing brace of an enclosing
/// namespace when `in_braces` is set.
pub(crate) fn items(p: &mut Parser, in_braces: bool) {
    while !p.at(EOF) && !(in_braces && p.at(RIGHT_BRACE)) {
        item(p, in_braces);
    }
}

fn item(p: &mut Parser, in_braces: bool) {
    match p.peek_kind() {
        USING_KW => using_directive(p),
        NAMESPACE_KW => namespace_decl(p, in_braces),
        _ => {
            let start = p.pos();
            let m = p.start();
            attributes(p);
            modifiers(p);

            if p.at(CLASS_KW) {
                class_decl(p, m);
                return;
            }

            p.error("expected a class declaration");
            if p.pos() == start {
                p.advance();
            }
            skip_declaration(p, &ITEM_RECOVERY);
            m.complete(p, ERROR);
        }
    }
}

fn using_directive(p: &mut Parser) {
    let m = p.start();
    p.advance();
    path(p);
    p.expect(SEMICOLON);
    m.complete(p, USING_DIRECTIVE);
}

fn namespace_decl(p: &mut Parser, in_braces: bool) {
    let m = p.start();
    p.advance();
    path(p);

    match p.peek_kind() {
        LEFT_BRACE => {
            p.advance();
            items(p, true);
            p.expect(RIGHT_BRACE);
        }
        SEMICOLON => {
            p.advance();
            items(p, in_braces);
        }
        _ => p.error("expected `{` or `;`"),
    }

    m.complete(p, NAMESPACE_DECL);
}

pub(crate) fn attributes(p: &mut Parser) {
    while p.at(LEFT_BRACKET) {
        let m = p.start();
        delimited(
            p,
            LEFT_BRACKET,
            RIGHT_BRACKET,
            COMMA,
            "expected attribute",
            &SyntaxSet::new([IDENT]),
            attribute,
        );
        m.complete(p, ATTRIBUTE_LIST);
    }
}

fn attribute(p: &mut Parser) -> bool {
    if !p.at(IDENT) {
        return false;
    }

    let m = p.start();
    path(p);
    if p.at(LEFT_PAREN) {
        exprs::arg_list(p);
    }
    m.complete(p, ATTRIBUTE);
    true
}

/// Always produces a `MODIFIER_LIST`, possibly empty.
pub(crate) fn modifiers(p: &mut Parser) {
    let m = p.start();
    while p.at_set(&MODIFIERS) {
        p.advance();
    }
    m.complete(p, MODIFIER_LIST);
}

/// Parses a class declaration whose attributes and modifiers are already
/// inside `m`.
fn class_decl(p: &mut Parser, m: Marker) {
    p.advance();
    name(p, &SyntaxSet::new([LEFT_ANGLE, COLON, LEFT_BRACE]));

    if p.at(LEFT_ANGLE) {
        type_param_list(p);
    }

    if p.at(COLON) {
        base_list(p);
    }

    if p.at(LEFT_BRACE) {
        p.advance();
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            member(p);
        }
        p.expect(RIGHT_BRACE);
    } else {
        p.error("expected `{`");
    }

    p.eat(SEMICOLON);
    m.complete(p, CLASS_DECL);
}

fn type_param_list(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LEFT_ANGLE,
        RIGHT_ANGLE,
        COMMA,
        "expected type parameter",
        &SyntaxSet::new([IDENT]),
        type_param,
    );
    m.complete(p, TYPE_PARAM_LIST);
}

fn type_param(p: &mut Parser) -> bool {
    match p.peek_kind() {
        IDENT => {
            let m = p.start();
            name(p, &SyntaxSet::EMPTY);
            m.complete(p, TYPE_PARAM);
            true
        }
        _ => false,
    }
}

fn base_list(p: &mut Parser) {
    let m = p.start();
    p.advance();
    types::type_(p);
    while p.eat(COMMA) {
        types::type_(p);
    }
    m.complete(p, BASE_LIST);
}

fn member(p: &mut Parser) {
    let start = p.pos();
    let m = p.start();
    attributes(p);
    modifiers(p);

    match p.peek_kind() {
        CLASS_KW => class_decl(p, m),
        IDENT if p.nth(1) == LEFT_PAREN => constructor_decl(p, m),
        IDENT => {
            let var = p.start();
            types::type_(p);

            if !p.at(IDENT) {
                var.abandon(p);
                p.error("expected member name");
                skip_declaration(p, &MEMBER_RECOVERY);
                m.complete(p, ERROR);
                return;
            }

            match p.nth(1) {
                LEFT_PAREN | LEFT_ANGLE => {
                    var.abandon(p);
                    method_decl(p, m);
                }
                LEFT_BRACE | FAT_ARROW => {
                    var.abandon(p);
                    property_decl(p, m);
                }
                _ => {
                    variable_declarators(p);
                    var.complete(p, VARIABLE_DECL);
                    p.expect(SEMICOLON);
                    m.complete(p, FIELD_DECL);
                }
            }
        }
        _ => {
            p.error("expected a member declaration");
            if p.pos() == start {
                p.advance();
            }
            skip_declaration(p, &MEMBER_RECOVERY);
            m.complete(p, ERROR);
        }
    }
}

/// `x = 1, y` after the type of a field or local.
pub(crate) fn variable_declarators(p: &mut Parser) {
    variable_declarator(p);
    while p.eat(COMMA) {
        variable_declarator(p);
    }
}

fn variable_declarator(p: &mut Parser) {
    let m = p.start();
    name(p, &SyntaxSet::new([EQ, COMMA, SEMICOLON]));
    if p.at(EQ) {
        equals_value(p);
    }
    m.complete(p, VARIABLE_DECLARATOR);
}

fn equals_value(p: &mut Parser) {
    let m = p.start();
    p.advance();
    exprs::expr(p);
    m.complete(p, EQUALS_VALUE);
}

fn property_decl(p: &mut Parser, m: Marker) {
    name(p, &SyntaxSet::new([LEFT_BRACE, FAT_ARROW]));

    match p.peek_kind() {
        LEFT_BRACE => {
            accessor_list(p);
            if p.at(EQ) {
                equals_value(p);
                p.expect(SEMICOLON);
            }
        }
        FAT_ARROW => {
            arrow_expr_clause(p);
            p.expect(SEMICOLON);
        }
        _ => p.error("expected `{` or `=>`"),
    }

    m.complete(p, PROPERTY_DECL);
}

fn accessor_list(p: &mut Parser) {
    let m = p.start();
    p.advance();

    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        let at_accessor = p.at(LEFT_BRACKET)
            || p.at_set(&MODIFIERS)
            || (p.at(IDENT) && SyntaxKind::from_contextual_keyword(p.nth_text(0)).is_some());
        if at_accessor {
            accessor(p);
        } else {
            p.error_and_bump("expected `get`, `set` or `init`");
        }
    }

    p.expect(RIGHT_BRACE);
    m.complete(p, ACCESSOR_LIST);
}

fn accessor(p: &mut Parser) {
    let m = p.start();
    attributes(p);
    modifiers(p);

    match SyntaxKind::from_contextual_keyword(p.nth_text(0)).filter(|_| p.at(IDENT)) {
        Some(kind) => p.advance_remap(kind),
        None => p.error_recover("expected `get`, `set` or `init`", &SyntaxSet::new([RIGHT_BRACE])),
    }

    body(p);
    m.complete(p, ACCESSOR);
}

/// A block, an expression body followed by `;`, or a lone `;`.
fn body(p: &mut Parser) {
    match p.peek_kind() {
        LEFT_BRACE => exprs::block(p),
        FAT_ARROW => {
            arrow_expr_clause(p);
            p.expect(SEMICOLON);
        }
        _ => {
            p.expect(SEMICOLON);
        }
    }
}

fn arrow_expr_clause(p: &mut Parser) {
    let m = p.start();
    p.advance();
    exprs::expr(p);
    m.complete(p, ARROW_EXPR_CLAUSE);
}

fn method_decl(p: &mut Parser, m: Marker) {
    name(p, &SyntaxSet::new([LEFT_ANGLE, LEFT_PAREN]));

    if p.at(LEFT_ANGLE) {
        type_param_list(p);
    }

    if p.at(LEFT_PAREN) {
        param_list(p);
    } else {
        p.error("expected method parameters");
    }

    body(p);
    m.complete(p, METHOD_DECL);
}

fn constructor_decl(p: &mut Parser, m: Marker) {
    name(p, &SyntaxSet::EMPTY);
    param_list(p);

    if p.at(COLON) {
        let initializer = p.start();
        p.advance();
        if !p.eat(BASE_KW) && !p.eat(THIS_KW) {
            p.error("expected `base` or `this`");
        }
        if p.at(LEFT_PAREN) {
            exprs::arg_list(p);
        } else {
            p.error("expected arguments");
        }
        initializer.complete(p, CONSTRUCTOR_INITIALIZER);
    }

    body(p);
    m.complete(p, CONSTRUCTOR_DECL);
}

fn param_list(p: &mut Parser) {
    let m = p.start();
    delimited(
        p,
        LEFT_PAREN,
        RIGHT_PAREN,
        COMMA,
        "expected parameter",
        &SyntaxSet::new([IDENT, LEFT_BRACKET]),
        param,
    );
    m.complete(p, PARAM_LIST);
}

fn param(p: &mut Parser) -> bool {
    if !p.at(IDENT) && !p.at(LEFT_BRACKET) {
        return false;
    }

    let m = p.start();
    attributes(p);
    types::type_(p);
    name(p, &SyntaxSet::new([COMMA, RIGHT_PAREN, EQ]));
    if p.at(EQ) {
        equals_value(p);
    }
    m.complete(p, PARAM);
    true
}
