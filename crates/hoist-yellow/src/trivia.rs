use text_size::TextSize;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Newline,
    SingleLineComment,
    MultiLineComment,
}

impl TriviaPieceKind {
    /// Trailing trivia of a token ends after its first newline.
    pub fn is_newline(self) -> bool {
        self == Self::Newline
    }
}

/// One run of trivia. Only the length is stored; the text lives in the token.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub len: TextSize,
}

impl TriviaPiece {
    pub fn new(kind: TriviaPieceKind, len: TextSize) -> Self {
        Self { kind, len }
    }

    pub fn whitespace(len: u32) -> Self {
        Self::new(TriviaPieceKind::Whitespace, len.into())
    }
}
