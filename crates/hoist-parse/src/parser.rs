use drop_bomb::DropBomb;
use hoist_errors::Diagnostic;
use hoist_tokenizer::{Token, Tokenizer};
use hoist_yellow::{Builder, GreenNode, SyntaxKind, SyntaxSet};
use text_size::{TextRange, TextSize};

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut tokenizer = Tokenizer::new(text);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            let kind = token.kind;
            tokens.push(token);
            if kind == SyntaxKind::EOF {
                break;
            }
        }

        Self { text, tokens, pos: 0, events: Vec::new(), diagnostics: Vec::new() }
    }

    /// Index of the current token, used to check that a loop makes progress.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens.get(self.pos + n).map_or(SyntaxKind::EOF, |token| token.kind)
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Text of the `n`th token ahead, without trivia.
    pub(crate) fn nth_text(&self, n: usize) -> &'a str {
        self.tokens.get(self.pos + n).map_or("", |token| &self.text[token.kind_range])
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    pub(crate) fn advance(&mut self) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        self.events.push(Event::Token(token));
    }

    /// Advances, giving the token a different kind. Used for contextual
    /// keywords.
    pub(crate) fn advance_remap(&mut self, kind: SyntaxKind) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        let mut token = self.tokens[self.pos].clone();
        token.kind = kind;
        self.pos += 1;
        self.events.push(Event::Token(token));
    }

    /// Adds the end-of-file token, which carries the trailing trivia of the
    /// file.
    pub(crate) fn advance_eof(&mut self) {
        debug_assert!(self.at(SyntaxKind::EOF));
        if let Some(token) = self.tokens.get(self.pos).cloned() {
            self.pos += 1;
            self.events.push(Event::Token(token));
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }

        let range = TextRange::empty(self.prev_end());
        self.diagnostics.push(Diagnostic::error(format!("expected {}", describe(kind)), range));
        false
    }

    fn prev_end(&self) -> TextSize {
        match self.pos.checked_sub(1).and_then(|prev| self.tokens.get(prev)) {
            Some(token) => token.kind_range.end(),
            None => self.current_range().start(),
        }
    }

    fn current_range(&self) -> TextRange {
        self.tokens.get(self.pos).map_or_else(TextRange::default, |token| token.kind_range)
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    /// Reports `message` and wraps the current token in an `ERROR` node.
    pub(crate) fn error_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        self.bump_error();
    }

    /// Wraps the current token in an `ERROR` node without reporting.
    pub(crate) fn bump_error(&mut self) {
        let m = self.start();
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    pub(crate) fn error_recover(&mut self, message: &str, recovery: &SyntaxSet) {
        if self.at_set(recovery) || self.at(SyntaxKind::EOF) {
            self.error(message);
        } else {
            self.error_and_bump(message);
        }
    }

    pub(crate) fn finish(self) -> (GreenNode, Vec<Diagnostic>) {
        let Parser { text, tokens: _, pos: _, mut events, diagnostics } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token(Token { leading, kind, kind_range, trailing }) => {
                    builder.token(leading, kind, kind_range, trailing);
                }
            }
        }

        (builder.finish(), diagnostics)
    }
}

fn describe(kind: SyntaxKind) -> String {
    let text = match kind {
        SyntaxKind::LEFT_PAREN => "`(`",
        SyntaxKind::RIGHT_PAREN => "`)`",
        SyntaxKind::LEFT_BRACKET => "`[`",
        SyntaxKind::RIGHT_BRACKET => "`]`",
        SyntaxKind::LEFT_BRACE => "`{`",
        SyntaxKind::RIGHT_BRACE => "`}`",
        SyntaxKind::LEFT_ANGLE => "`<`",
        SyntaxKind::RIGHT_ANGLE => "`>`",
        SyntaxKind::SEMICOLON => "`;`",
        SyntaxKind::COMMA => "`,`",
        SyntaxKind::COLON => "`:`",
        SyntaxKind::IDENT => "identifier",
        SyntaxKind::EOF => "end of file",
        _ => return format!("{kind:?}"),
    };
    text.to_owned()
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker {
            position: pos,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }

    /// Drops the marker without creating a node.
    pub(crate) fn abandon(mut self, p: &mut Parser<'_>) {
        self.bomb.defuse();

        if self.position as usize == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None }) => {}
                _ => unreachable!(),
            }
        }
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        CompletedMarker { pos }
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
