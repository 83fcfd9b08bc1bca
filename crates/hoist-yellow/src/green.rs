use std::fmt;
use std::ops::Range;

use text_size::TextSize;
use triomphe::{Arc, ThinArc};

use crate::{NodeOrToken, SyntaxKind, TriviaPiece};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_len(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.text_len(),
            NodeOrToken::Token(token) => token.text_len(),
        }
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        NodeOrToken::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        NodeOrToken::Token(token)
    }
}

#[derive(PartialEq, Eq, Hash)]
struct GreenNodeData {
    kind: SyntaxKind,
    text_len: TextSize,
    children: Box<[GreenElement]>,
}

/// Immutable, position independent interior node.
///
/// Cloning is a reference count bump. Edits return a new node that shares
/// every untouched child with `self`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenNode {
    data: Arc<GreenNodeData>,
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: impl IntoIterator<Item = GreenElement>) -> Self {
        let children: Box<[GreenElement]> = children.into_iter().collect();
        let text_len = children.iter().map(GreenElement::text_len).sum();
        Self { data: Arc::new(GreenNodeData { kind, text_len, children }) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }

    pub fn children(&self) -> &[GreenElement] {
        &self.data.children
    }

    /// Identity comparison, as opposed to the structural `==`.
    pub fn ptr_eq(&self, other: &GreenNode) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn replace_child(&self, index: usize, new_child: GreenElement) -> GreenNode {
        self.splice_children(index..index + 1, [new_child])
    }

    pub fn insert_child(&self, index: usize, new_child: GreenElement) -> GreenNode {
        self.splice_children(index..index, [new_child])
    }

    pub fn remove_child(&self, index: usize) -> GreenNode {
        self.splice_children(index..index + 1, [])
    }

    pub fn splice_children(
        &self,
        range: Range<usize>,
        replace_with: impl IntoIterator<Item = GreenElement>,
    ) -> GreenNode {
        let mut children = self.children().to_vec();
        children.splice(range, replace_with);
        GreenNode::new(self.kind(), children)
    }

    pub fn first_token(&self) -> Option<&GreenToken> {
        self.children().iter().find_map(|child| match child {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    /// Rebuilds the path down to the first token, replacing that token with
    /// `f(token)`. Returns `None` for a node without tokens.
    pub fn map_first_token(&self, f: impl FnOnce(&GreenToken) -> GreenToken) -> Option<GreenNode> {
        for (index, child) in self.children().iter().enumerate() {
            match child {
                NodeOrToken::Token(token) => {
                    return Some(self.replace_child(index, f(token).into()));
                }
                NodeOrToken::Node(node) => {
                    if node.first_token().is_some() {
                        let node = node.map_first_token(f)?;
                        return Some(self.replace_child(index, node.into()));
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in self.children() {
            match child {
                NodeOrToken::Node(node) => fmt::Display::fmt(node, f)?,
                NodeOrToken::Token(token) => fmt::Display::fmt(token, f)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind())
            .field("text_len", &self.text_len())
            .field("children", &self.children().len())
            .finish()
    }
}

#[derive(PartialEq, Eq, Hash)]
struct GreenTokenData {
    kind: SyntaxKind,
    leading: GreenTrivia,
    text: Box<str>,
    trailing: GreenTrivia,
}

/// Leaf of the tree. `text` holds the full text, trivia included.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GreenToken {
    data: Arc<GreenTokenData>,
}

impl GreenToken {
    pub fn new(kind: SyntaxKind, leading: GreenTrivia, text: &str, trailing: GreenTrivia) -> Self {
        debug_assert!(leading.len() + trailing.len() <= TextSize::of(text));
        Self { data: Arc::new(GreenTokenData { kind, leading, text: text.into(), trailing }) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn text(&self) -> &str {
        &self.data.text
    }

    pub fn text_len(&self) -> TextSize {
        TextSize::of(self.text())
    }

    pub fn leading(&self) -> &GreenTrivia {
        &self.data.leading
    }

    pub fn trailing(&self) -> &GreenTrivia {
        &self.data.trailing
    }

    fn trimmed_bounds(&self) -> (usize, usize) {
        let start: usize = self.leading().len().into();
        let end: usize = (self.text_len() - self.trailing().len()).into();
        (start, end)
    }

    pub fn text_trimmed(&self) -> &str {
        let (start, end) = self.trimmed_bounds();
        &self.text()[start..end]
    }

    pub fn leading_text(&self) -> &str {
        let (start, _) = self.trimmed_bounds();
        &self.text()[..start]
    }

    pub fn trailing_text(&self) -> &str {
        let (_, end) = self.trimmed_bounds();
        &self.text()[end..]
    }

    /// Same token with its leading trivia replaced by `trivia`, whose source
    /// text is `trivia_text`.
    pub fn with_leading_trivia(&self, trivia: GreenTrivia, trivia_text: &str) -> GreenToken {
        debug_assert_eq!(trivia.len(), TextSize::of(trivia_text));
        let text = format!("{trivia_text}{}{}", self.text_trimmed(), self.trailing_text());
        GreenToken::new(self.kind(), trivia, &text, self.trailing().clone())
    }

    /// Same token with its trailing trivia replaced by `trivia`, whose source
    /// text is `trivia_text`.
    pub fn with_trailing_trivia(&self, trivia: GreenTrivia, trivia_text: &str) -> GreenToken {
        debug_assert_eq!(trivia.len(), TextSize::of(trivia_text));
        let text = format!("{}{}{trivia_text}", self.leading_text(), self.text_trimmed());
        GreenToken::new(self.kind(), self.leading().clone(), &text, trivia)
    }

    /// Same trivia around a different token.
    pub fn with_kind_and_text(&self, kind: SyntaxKind, trimmed: &str) -> GreenToken {
        let text = format!("{}{trimmed}{}", self.leading_text(), self.trailing_text());
        GreenToken::new(kind, self.leading().clone(), &text, self.trailing().clone())
    }
}

impl fmt::Display for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenToken")
            .field("kind", &self.kind())
            .field("text", &self.text())
            .finish()
    }
}

#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GreenTrivia {
    ptr: Option<ThinArc<TextSize, TriviaPiece>>,
}

impl fmt::Debug for GreenTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenTrivia")
            .field("pieces", &self.pieces())
            .field("total_len", &self.len())
            .finish()
    }
}

impl GreenTrivia {
    pub fn new(pieces: &[TriviaPiece]) -> Self {
        if pieces.is_empty() {
            return Self::empty();
        }
        let total_len = pieces.iter().map(|piece| piece.len).sum();
        Self { ptr: Some(ThinArc::from_header_and_slice(total_len, pieces)) }
    }

    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    pub fn len(&self) -> TextSize {
        match self.ptr {
            None => TextSize::new(0),
            Some(ref ptr) => ptr.header.header,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitespace(len: u32) -> GreenTrivia {
        GreenTrivia::new(&[TriviaPiece::whitespace(len)])
    }

    fn token(kind: SyntaxKind, text: &str) -> GreenElement {
        GreenToken::new(kind, GreenTrivia::empty(), text, GreenTrivia::empty()).into()
    }

    #[test]
    fn token_text() {
        let token = GreenToken::new(SyntaxKind::CLASS_KW, whitespace(3), "\n\t class \t\t", whitespace(3));

        assert_eq!("\n\t class \t\t", token.text());
        assert_eq!("class", token.text_trimmed());
        assert_eq!("\n\t ", token.leading_text());
        assert_eq!(" \t\t", token.trailing_text());
    }

    #[test]
    fn token_rewrites_keep_trivia() {
        let token = GreenToken::new(SyntaxKind::PUBLIC_KW, whitespace(4), "    public ", whitespace(1));

        let protected = token.with_kind_and_text(SyntaxKind::PROTECTED_KW, "protected");
        assert_eq!("    protected ", protected.text());
        assert_eq!(SyntaxKind::PROTECTED_KW, protected.kind());

        let stripped = token.with_leading_trivia(GreenTrivia::empty(), "");
        assert_eq!("public ", stripped.text());
    }

    #[test]
    fn edits_share_untouched_children() {
        let inner = GreenNode::new(SyntaxKind::NAME, [token(SyntaxKind::IDENT, "x")]);
        let node = GreenNode::new(
            SyntaxKind::BLOCK,
            [token(SyntaxKind::LEFT_BRACE, "{"), inner.clone().into(), token(SyntaxKind::RIGHT_BRACE, "}")],
        );
        assert_eq!(node.to_string(), "{x}");
        assert_eq!(node.text_len(), TextSize::new(3));

        let removed = node.remove_child(0);
        assert_eq!(removed.to_string(), "x}");
        assert!(removed.children()[0].as_node().is_some_and(|it| it.ptr_eq(&inner)));

        let inserted = node.insert_child(3, token(SyntaxKind::SEMICOLON, ";"));
        assert_eq!(inserted.to_string(), "{x};");
        assert!(!inserted.ptr_eq(&node));
        assert_eq!(node.to_string(), "{x}");
    }

    #[test]
    fn map_first_token_descends() {
        let inner = GreenNode::new(SyntaxKind::NAME, [token(SyntaxKind::IDENT, "x")]);
        let node = GreenNode::new(SyntaxKind::EXPR_STMT, [inner.into(), token(SyntaxKind::SEMICOLON, ";")]);

        let mapped = node
            .map_first_token(|token| token.with_kind_and_text(SyntaxKind::IDENT, "renamed"))
            .unwrap();
        assert_eq!(mapped.to_string(), "renamed;");

        let empty = GreenNode::new(SyntaxKind::MODIFIER_LIST, []);
        assert!(empty.map_first_token(Clone::clone).is_none());
    }
}
