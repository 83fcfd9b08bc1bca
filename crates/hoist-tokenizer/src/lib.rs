mod cursor;

use cursor::{Cursor, EOF_CHAR};
pub use hoist_yellow::SyntaxKind;
use hoist_yellow::SyntaxKind::*;
use hoist_yellow::{GreenTrivia, TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

/// A token with the trivia attached to it.
///
/// Trailing trivia runs up to and including the first newline after the
/// token. Everything after that newline is leading trivia of the next token.
#[derive(Debug, Clone)]
pub struct Token {
    pub leading: GreenTrivia,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: GreenTrivia,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: GreenTrivia::empty(),
        trailing: GreenTrivia::empty(),
    };

    /// Range of the token including its trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(
            self.kind_range.start() - self.leading.len(),
            self.kind_range.end() + self.trailing.len(),
        )
    }
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            trivia_pieces: Vec::with_capacity(4),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    /// Returns the peeked token and advances to the next one.
    pub fn next_token(&mut self) -> Token {
        self.trivia(false);
        let trailing_start = self.trivia_pieces.len();
        let (kind, kind_range) = self.syntax_kind();
        if kind != EOF {
            self.trivia(true);
        }

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = GreenTrivia::new(leading);
        let trailing = GreenTrivia::new(trailing);

        self.trivia_pieces.clear();
        std::mem::replace(&mut self.current, Token { leading, kind, kind_range, trailing })
    }

    fn trivia(&mut self, trailing: bool) {
        loop {
            let kind = match self.cursor.peek() {
                '\n' => {
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '\r' if self.cursor.second() == '\n' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    TriviaPieceKind::Newline
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n' && c != '\r');
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_eof() {
                        if self.cursor.advance() == '*' && self.cursor.eat('/') {
                            break;
                        }
                    }
                    TriviaPieceKind::MultiLineComment
                }
                c if c.is_whitespace() && !self.cursor.is_eof() => {
                    self.cursor.advance_while(|c| {
                        c.is_whitespace() && c != '\n' && c != '\r'
                    });
                    if self.cursor.pos_within_token() == TextSize::new(0) {
                        // A lone `\r`.
                        self.cursor.advance();
                    }
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();

            if trailing && kind.is_newline() {
                break;
            }
        }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ';' => SEMICOLON,
            ',' => COMMA,
            ':' => COLON,
            '.' => DOT,
            '=' => {
                if self.cursor.eat('=') {
                    OPERATOR
                } else if self.cursor.eat('>') {
                    FAT_ARROW
                } else {
                    EQ
                }
            }
            '<' => {
                if self.cursor.eat('=') {
                    OPERATOR
                } else if self.cursor.eat('<') {
                    self.cursor.eat('=');
                    OPERATOR
                } else {
                    LEFT_ANGLE
                }
            }
            // `>>` stays two tokens so that nested generic argument lists close.
            '>' => {
                if self.cursor.eat('=') {
                    OPERATOR
                } else {
                    RIGHT_ANGLE
                }
            }
            '?' => {
                if self.cursor.eat('?') {
                    self.cursor.eat('=');
                    OPERATOR
                } else {
                    QUESTION
                }
            }
            c @ ('+' | '-' | '&' | '|') => {
                if !self.cursor.eat(c) {
                    self.cursor.eat('=');
                }
                OPERATOR
            }
            '*' | '/' | '%' | '^' | '!' => {
                self.cursor.eat('=');
                OPERATOR
            }
            '~' => OPERATOR,
            '"' => self.string('"', false),
            '\'' => self.string('\'', false),
            '@' if self.cursor.matches('"') => {
                self.cursor.advance();
                self.string('"', true)
            }
            '$' if self.cursor.matches('"') => {
                self.cursor.advance();
                self.string('"', false)
            }
            '@' if is_ident_start(self.cursor.peek()) => {
                self.cursor.advance_while(is_ident_continue);
                IDENT
            }
            first_char @ '0'..='9' => self.number(first_char),
            c if is_ident_start(c) => {
                self.cursor.advance_while(is_ident_continue);
                SyntaxKind::from_keyword(self.text()).unwrap_or(IDENT)
            }
            EOF_CHAR if self.cursor.pos_within_token() == TextSize::new(0) => EOF,
            _ => UNKNOWN,
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range)
    }

    /// Consumes a string or character literal after its opening quote. A
    /// literal missing its closing quote becomes `UNKNOWN`.
    fn string(&mut self, quote: char, verbatim: bool) -> SyntaxKind {
        let terminated = loop {
            match self.cursor.peek() {
                '\n' | '\r' if !verbatim => break false,
                '\\' if !verbatim => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                c if c == quote => {
                    self.cursor.advance();
                    if !(verbatim && self.cursor.eat(quote)) {
                        break true;
                    }
                }
                _ if self.cursor.is_eof() => break false,
                _ => {
                    self.cursor.advance();
                }
            }
        };

        match quote {
            _ if !terminated => UNKNOWN,
            '"' => STRING,
            _ => CHAR,
        }
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        let mut kind = INT_NUMBER;

        if c == '0' && matches!(self.cursor.peek(), 'x' | 'X' | 'b' | 'B') {
            let hex = matches!(self.cursor.advance(), 'x' | 'X');
            self.digits(hex);
        } else {
            self.digits(false);

            if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
                self.cursor.advance();
                self.digits(false);
                kind = FLOAT_NUMBER;
            }

            if matches!(self.cursor.peek(), 'e' | 'E') {
                self.float_exponent();
                kind = FLOAT_NUMBER;
            }
        }

        match self.cursor.peek() {
            'f' | 'F' | 'd' | 'D' | 'm' | 'M' => {
                self.cursor.advance();
                FLOAT_NUMBER
            }
            'u' | 'U' | 'l' | 'L' => {
                self.cursor.advance_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
                kind
            }
            _ => kind,
        }
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn float_exponent(&mut self) {
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;

    fn check(text: &str, expect: Expect) {
        let mut tokenizer = Tokenizer::new(text);
        let mut actual = String::new();
        loop {
            let token = tokenizer.next_token();
            let full = &text[token.full_range()];
            actual.push_str(&format!("{:?} {:?} {full:?}\n", token.kind, &text[token.kind_range]));
            if token.kind == EOF {
                break;
            }
        }
        expect.assert_eq(&actual);
    }

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let mut tokenizer = Tokenizer::new(text);
        std::iter::from_fn(|| {
            let token = tokenizer.next_token();
            (token.kind != EOF).then_some(token.kind)
        })
        .collect()
    }

    #[test]
    fn test_integer_literals() {
        let inputs = vec!["123", "0", "0x1f", "0b1010", "123_456", "10L", "7u"];

        for input in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, INT_NUMBER, "Input: '{input}'");
            assert!(tokenizer.cursor.is_eof(), "Tokenizer did not consume all input for '{input}'");
        }
    }

    #[test]
    fn test_float_literals() {
        let inputs = vec!["123.456", "0.0", "1e10", "1.0e-5", "1.5f", "2m", "3d"];

        for input in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, FLOAT_NUMBER, "Input: '{input}'");
            assert!(tokenizer.cursor.is_eof(), "Tokenizer did not consume all input for '{input}'");
        }
    }

    #[test]
    fn member_access_is_not_a_float() {
        assert_eq!(kinds("x.y"), vec![IDENT, DOT, IDENT]);
        assert_eq!(kinds("1.ToString"), vec![INT_NUMBER, DOT, IDENT]);
    }

    #[test]
    fn keywords_and_contextual_words() {
        assert_eq!(
            kinds("public class get set value"),
            vec![PUBLIC_KW, CLASS_KW, IDENT, IDENT, IDENT]
        );
        assert_eq!(kinds("@class"), vec![IDENT]);
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("a == b != c <= d => e ?? f ++ -- += && ||"),
            vec![
                IDENT, OPERATOR, IDENT, OPERATOR, IDENT, OPERATOR, IDENT, FAT_ARROW, IDENT,
                OPERATOR, IDENT, OPERATOR, OPERATOR, OPERATOR, OPERATOR, OPERATOR,
            ]
        );
        assert_eq!(kinds("List<List<int>>"), vec![
            IDENT, LEFT_ANGLE, IDENT, LEFT_ANGLE, IDENT, RIGHT_ANGLE, RIGHT_ANGLE
        ]);
        assert_eq!(kinds("x = c ? a : b;"), vec![
            IDENT, EQ, IDENT, QUESTION, IDENT, COLON, IDENT, SEMICOLON
        ]);
    }

    #[test]
    fn string_literals() {
        assert_eq!(kinds(r#""a \" b""#), vec![STRING]);
        assert_eq!(kinds(r#"@"a "" b""#), vec![STRING]);
        assert_eq!(kinds(r#"$"{x}""#), vec![STRING]);
        assert_eq!(kinds(r"'\n'"), vec![CHAR]);
    }

    #[test]
    fn unterminated_literals() {
        assert_eq!(kinds("x = \"\u{e9}"), vec![IDENT, EQ, UNKNOWN]);
        assert_eq!(kinds("'a\nb;"), vec![UNKNOWN, IDENT, SEMICOLON]);
        assert_eq!(kinds("\"a\\\""), vec![UNKNOWN]);
        assert_eq!(kinds("@\"a\nb\";"), vec![STRING, SEMICOLON]);
    }

    #[test]
    fn trailing_trivia_ends_at_newline() {
        check(
            "int x; // count\n    int y;\n",
            expect![[r#"
                IDENT "int" "int "
                IDENT "x" "x"
                SEMICOLON ";" "; // count\n"
                IDENT "int" "    int "
                IDENT "y" "y"
                SEMICOLON ";" ";\n"
                EOF "" ""
            "#]],
        );
    }

    #[test]
    fn blank_lines_lead_the_next_token() {
        check(
            "{\n\n  /* a\n b */ }",
            expect![[r#"
                LEFT_BRACE "{" "{\n"
                RIGHT_BRACE "}" "\n  /* a\n b */ }"
                EOF "" ""
            "#]],
        );
    }

    #[test]
    fn leftover_trivia_belongs_to_eof() {
        check(
            "x\n\n  // done",
            expect![[r#"
                IDENT "x" "x\n"
                EOF "" "\n  // done"
            "#]],
        );
    }

    #[test]
    fn null_character_is_not_eof() {
        assert_eq!(kinds("a\0b"), vec![IDENT, UNKNOWN, IDENT]);
    }
}
