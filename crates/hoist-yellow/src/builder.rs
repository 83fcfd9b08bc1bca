//! Incremental builder for green trees.

use text_size::{TextRange, TextSize};

use crate::{GreenElement, GreenNode, GreenToken, GreenTrivia, SyntaxKind};

/// Builds a `GreenNode` from a stream of start/token/finish calls.
pub struct Builder<'a> {
    text: &'a str,
    parents: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
}

impl Drop for Builder<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.parents.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

impl<'a> Builder<'a> {
    /// Creates a new builder over the source `text` the tokens point into.
    pub fn new(text: &'a str) -> Self {
        Self { text, parents: Vec::with_capacity(32), children: Vec::with_capacity(256) }
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let (kind, first_child) = self.parents.pop().expect("no opened nodes?");
        let node = GreenNode::new(kind, self.children.drain(first_child..));
        self.children.push(node.into());
    }

    /// Adds a token whose trimmed text is `kind_range`, surrounded by the
    /// given trivia.
    pub fn token(
        &mut self,
        leading: GreenTrivia,
        kind: SyntaxKind,
        kind_range: TextRange,
        trailing: GreenTrivia,
    ) {
        let start = kind_range.start() - leading.len();
        let end = kind_range.end() + trailing.len();
        let text = &self.text[TextRange::new(start, end)];
        self.children.push(GreenToken::new(kind, leading, text, trailing).into());
    }

    /// Returns the single root node.
    #[track_caller]
    pub fn finish(mut self) -> GreenNode {
        assert!(self.parents.is_empty(), "unfinished nodes: {:?}", self.parents);
        let mut children = std::mem::take(&mut self.children);
        assert_eq!(children.len(), 1, "expected a single root node");
        match children.pop() {
            Some(GreenElement::Node(node)) => node,
            _ => panic!("root must be a node"),
        }
    }

    /// Total length of the text covered so far.
    pub fn text_len(&self) -> TextSize {
        self.children.iter().map(GreenElement::text_len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TriviaPiece, TriviaPieceKind};

    #[test]
    fn builds_nested_nodes() {
        let text = "x = 1;\n";
        let mut builder = Builder::new(text);
        let newline = GreenTrivia::new(&[TriviaPiece::new(TriviaPieceKind::Newline, 1.into())]);
        let space = GreenTrivia::new(&[TriviaPiece::new(TriviaPieceKind::Whitespace, 1.into())]);

        builder.start_node(SyntaxKind::EXPR_STMT);
        builder.start_node(SyntaxKind::ASSIGN_EXPR);
        builder.start_node(SyntaxKind::NAME_REF);
        builder.token(GreenTrivia::empty(), SyntaxKind::IDENT, TextRange::new(0.into(), 1.into()), space.clone());
        builder.finish_node();
        builder.token(GreenTrivia::empty(), SyntaxKind::EQ, TextRange::new(2.into(), 3.into()), space);
        builder.start_node(SyntaxKind::LITERAL);
        builder.token(GreenTrivia::empty(), SyntaxKind::INT_NUMBER, TextRange::new(4.into(), 5.into()), GreenTrivia::empty());
        builder.finish_node();
        builder.finish_node();
        builder.token(GreenTrivia::empty(), SyntaxKind::SEMICOLON, TextRange::new(5.into(), 6.into()), newline);
        assert_eq!(builder.text_len(), TextSize::of(text));
        builder.finish_node();

        let root = builder.finish();
        assert_eq!(root.kind(), SyntaxKind::EXPR_STMT);
        assert_eq!(root.to_string(), text);
        assert_eq!(root.children().len(), 2);
    }
}
