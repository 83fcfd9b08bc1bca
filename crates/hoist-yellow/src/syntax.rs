//! Positioned, parent-linked views over green trees.

use std::fmt;
use std::hash::{Hash, Hasher};

use text_size::{TextRange, TextSize};
use triomphe::Arc;

use crate::{GreenElement, GreenNode, GreenToken, SyntaxKind};

struct NodeData {
    green: GreenNode,
    parent: Option<SyntaxNode>,
    offset: TextSize,
    index: usize,
}

/// A green node together with its absolute offset and its parent.
///
/// Red nodes are created on demand while walking down from the root and are
/// cheap to clone.
#[derive(Clone)]
pub struct SyntaxNode {
    data: Arc<NodeData>,
}

impl SyntaxNode {
    pub fn new_root(green: GreenNode) -> Self {
        Self { data: Arc::new(NodeData { green, parent: None, offset: TextSize::new(0), index: 0 }) }
    }

    fn new_child(green: GreenNode, parent: Self, index: usize, offset: TextSize) -> Self {
        Self { data: Arc::new(NodeData { green, parent: Some(parent), offset, index }) }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.green.kind()
    }

    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.data.green
    }

    /// Position of this node among its parent's children, tokens included.
    #[inline]
    pub fn index(&self) -> usize {
        self.data.index
    }

    pub fn parent(&self) -> Option<Self> {
        self.data.parent.clone()
    }

    /// Iterates over `self` and all its ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = Self> + use<> {
        std::iter::successors(Some(self.clone()), Self::parent)
    }

    /// Range including leading and trailing trivia.
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.data.offset, self.green().text_len())
    }

    /// Range from the first token's text to the last token's text.
    pub fn trimmed_range(&self) -> TextRange {
        let range = self.text_range();
        let start = self.first_token().map_or(range.start(), |token| token.trimmed_range().start());
        let end = self.last_token().map_or(range.end(), |token| token.trimmed_range().end());
        TextRange::new(start, end.max(start))
    }

    pub fn text(&self) -> String {
        self.green().to_string()
    }

    pub fn children_with_tokens(&self) -> ChildrenWithTokens {
        ChildrenWithTokens { parent: self.clone(), next_index: 0, next_offset: self.data.offset }
    }

    pub fn children(&self) -> Children {
        Children { inner: self.children_with_tokens() }
    }

    pub fn first_token(&self) -> Option<SyntaxToken> {
        self.children_with_tokens().find_map(|child| match child {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    pub fn last_token(&self) -> Option<SyntaxToken> {
        let children: Vec<_> = self.children_with_tokens().collect();
        children.into_iter().rev().find_map(|child| match child {
            NodeOrToken::Node(node) => node.last_token(),
            NodeOrToken::Token(token) => Some(token),
        })
    }

    pub fn preorder(&self) -> Preorder {
        Preorder::new(self.clone())
    }

    /// All nodes of the subtree in preorder, `self` first.
    pub fn descendants(&self) -> impl Iterator<Item = Self> + use<> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    pub fn token_at_offset(&self, offset: TextSize) -> TokenAtOffset<SyntaxToken> {
        let range = self.text_range();
        if !(range.start() <= offset && offset <= range.end()) || range.is_empty() {
            return TokenAtOffset::None;
        }
        if offset == range.end() {
            return match self.last_token() {
                Some(token) => TokenAtOffset::Single(token),
                None => TokenAtOffset::None,
            };
        }

        let mut children = self.children_with_tokens().filter(|child| {
            let child_range = child.text_range();
            !child_range.is_empty()
                && child_range.start() <= offset
                && offset <= child_range.end()
        });

        let Some(left) = children.next() else {
            return TokenAtOffset::None;
        };
        let left = element_token_at_offset(left, offset);

        match children.next() {
            Some(right) => match (left, element_token_at_offset(right, offset)) {
                (TokenAtOffset::Single(left), TokenAtOffset::Single(right)) => {
                    TokenAtOffset::Between(left, right)
                }
                (left, _) => left,
            },
            None => left,
        }
    }

    /// Builds a new root by replacing this node's green with `green` and
    /// rebuilding every ancestor.
    pub fn replace_with(&self, green: GreenNode) -> GreenNode {
        match self.parent() {
            None => green,
            Some(parent) => {
                let new_parent = parent.green().replace_child(self.index(), green.into());
                parent.replace_with(new_parent)
            }
        }
    }
}

fn element_token_at_offset(element: SyntaxElement, offset: TextSize) -> TokenAtOffset<SyntaxToken> {
    match element {
        NodeOrToken::Node(node) => node.token_at_offset(offset),
        NodeOrToken::Token(token) => TokenAtOffset::Single(token),
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.data.offset == other.data.offset && self.data.green.ptr_eq(&other.data.green)
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.data.offset.hash(state);
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.green(), f)
    }
}

impl fmt::Debug for SyntaxNode {
    /// `{:?}` prints the kind and range, `{:#?}` dumps the whole subtree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(f, "{:?}@{:?}", self.kind(), self.text_range());
        }

        let mut level = 0;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    writeln!(f, "{:indent$}{:?}@{:?}", "", node.kind(), node.text_range(), indent = level * 2)?;
                    level += 1;
                }
                WalkEventWithTokens::LeaveNode(_) => level -= 1,
                WalkEventWithTokens::Token(token) => {
                    writeln!(f, "{:indent$}{token:?}", "", indent = level * 2)?;
                }
            }
        }
        Ok(())
    }
}

/// A green token positioned inside its parent node.
#[derive(Clone)]
pub struct SyntaxToken {
    parent: SyntaxNode,
    index: usize,
    offset: TextSize,
    green: GreenToken,
}

impl SyntaxToken {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    #[inline]
    pub fn green(&self) -> &GreenToken {
        &self.green
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parent(&self) -> &SyntaxNode {
        &self.parent
    }

    pub fn parent_ancestors(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.parent.ancestors()
    }

    /// Full text, trivia included.
    pub fn text(&self) -> &str {
        self.green.text()
    }

    pub fn text_trimmed(&self) -> &str {
        self.green.text_trimmed()
    }

    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    pub fn trimmed_range(&self) -> TextRange {
        let start = self.offset + self.green.leading().len();
        TextRange::at(start, TextSize::of(self.text_trimmed()))
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent && self.index == other.index
    }
}

impl Eq for SyntaxToken {}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

pub type SyntaxElement = NodeOrToken<SyntaxNode, SyntaxToken>;

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    pub fn parent(&self) -> Option<SyntaxNode> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent().clone()),
        }
    }
}

/// Child nodes and tokens of a node, in order.
#[derive(Clone)]
pub struct ChildrenWithTokens {
    parent: SyntaxNode,
    next_index: usize,
    next_offset: TextSize,
}

impl Iterator for ChildrenWithTokens {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.parent.green().children().get(self.next_index)?;
        let index = self.next_index;
        let offset = self.next_offset;

        self.next_index += 1;
        self.next_offset += child.text_len();

        Some(match child {
            GreenElement::Node(node) => {
                NodeOrToken::Node(SyntaxNode::new_child(node.clone(), self.parent.clone(), index, offset))
            }
            GreenElement::Token(token) => NodeOrToken::Token(SyntaxToken {
                parent: self.parent.clone(),
                index,
                offset,
                green: token.clone(),
            }),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.parent.green().children().len() - self.next_index;
        (len, Some(len))
    }
}

impl ExactSizeIterator for ChildrenWithTokens {}

/// Child nodes of a node, in order.
#[derive(Clone)]
pub struct Children {
    inner: ChildrenWithTokens,
}

impl Iterator for Children {
    type Item = SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(NodeOrToken::into_node)
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder {
    inner: PreorderWithTokens,
}

impl Preorder {
    #[inline]
    fn new(start: SyntaxNode) -> Self {
        Self { inner: PreorderWithTokens::new(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl Iterator for Preorder {
    type Item = WalkEvent;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Debug)]
pub enum WalkEvent {
    Enter(SyntaxNode),
    Leave(SyntaxNode),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct PreorderWithTokens {
    stack: Vec<ChildrenWithTokens>,
    root: Option<SyntaxNode>,
}

impl PreorderWithTokens {
    #[inline]
    fn new(start: SyntaxNode) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl Iterator for PreorderWithTokens {
    type Item = WalkEventWithTokens;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(active_node) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push(root.children_with_tokens());
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push(child.children_with_tokens());
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let exited = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited.parent))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Debug)]
pub enum WalkEventWithTokens {
    EnterNode(SyntaxNode),
    LeaveNode(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxNode {
    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(&self) -> PreorderWithTokens {
        PreorderWithTokens::new(self.clone())
    }
}

/// Stable identifier for a node by kind and trimmed text range.
///
/// Unlike a `SyntaxNode` it does not keep the tree alive and can be stored in
/// query results.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNodePtr {
    /// Node kind used for lookup.
    pub kind: SyntaxKind,
    /// Trimmed text range used for lookup.
    pub range: TextRange,
}

impl SyntaxNodePtr {
    /// Builds a pointer from a concrete node.
    pub fn new(node: &SyntaxNode) -> Self {
        Self { kind: node.kind(), range: node.trimmed_range() }
    }

    /// Attempts to resolve this pointer within the tree rooted at `root`.
    pub fn try_to_node(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        if root.parent().is_some() {
            return None;
        }

        let mut node = root.clone();
        loop {
            if node.kind() == self.kind && node.trimmed_range() == self.range {
                return Some(node);
            }
            node = node.children().find(|child| {
                let range = child.trimmed_range();
                range.contains_range(self.range) && (!range.is_empty() || child.kind() == self.kind)
            })?;
        }
    }

    pub fn text_range(&self) -> TextRange {
        self.range
    }
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    /// Returns a shared reference to the node, if any.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> TokenAtOffset<T> {
    /// Maps tokens to a different type.
    pub fn map<F: Fn(T) -> U, U>(self, f: F) -> TokenAtOffset<U> {
        match self {
            TokenAtOffset::None => TokenAtOffset::None,
            TokenAtOffset::Single(it) => TokenAtOffset::Single(f(it)),
            TokenAtOffset::Between(l, r) => TokenAtOffset::Between(f(l), f(r)),
        }
    }
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(node) => Some(node),
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::None => (0, Some(0)),
            Self::Single(_) => (1, Some(1)),
            Self::Between(_, _) => (2, Some(2)),
        }
    }
}

impl<T> ExactSizeIterator for TokenAtOffset<T> {}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::{GreenTrivia, TriviaPiece};

    fn space(len: u32) -> GreenTrivia {
        GreenTrivia::new(&[TriviaPiece::whitespace(len)])
    }

    fn token(kind: SyntaxKind, leading: u32, text: &str, trailing: u32) -> GreenElement {
        let full = format!("{}{text}{}", " ".repeat(leading as usize), " ".repeat(trailing as usize));
        GreenToken::new(kind, space(leading), &full, space(trailing)).into()
    }

    // `class A { }` with the name wrapped in a NAME node.
    fn class_a() -> SyntaxNode {
        let name = GreenNode::new(SyntaxKind::NAME, [token(SyntaxKind::IDENT, 0, "A", 1)]);
        let class = GreenNode::new(
            SyntaxKind::CLASS_DECL,
            [
                GreenNode::new(SyntaxKind::MODIFIER_LIST, []).into(),
                token(SyntaxKind::CLASS_KW, 0, "class", 1),
                name.into(),
                token(SyntaxKind::LEFT_BRACE, 0, "{", 1),
                token(SyntaxKind::RIGHT_BRACE, 0, "}", 0),
            ],
        );
        SyntaxNode::new_root(GreenNode::new(SyntaxKind::COMPILATION_UNIT, [class.into()]))
    }

    #[test]
    fn debug_dump() {
        let root = class_a();
        expect![[r#"
            COMPILATION_UNIT@0..11
              CLASS_DECL@0..11
                MODIFIER_LIST@0..0
                CLASS_KW@0..6 "class "
                NAME@6..8
                  IDENT@6..8 "A "
                LEFT_BRACE@8..10 "{ "
                RIGHT_BRACE@10..11 "}"
        "#]]
        .assert_eq(&format!("{root:#?}"));
    }

    #[test]
    fn ranges_and_text() {
        let root = class_a();
        let class = root.children().next().unwrap();

        assert_eq!(class.text(), "class A { }");
        assert_eq!(class.trimmed_range(), TextRange::new(0.into(), 11.into()));

        let name = class.children().find(|it| it.kind() == SyntaxKind::NAME).unwrap();
        assert_eq!(name.text_range(), TextRange::new(6.into(), 8.into()));
        assert_eq!(name.trimmed_range(), TextRange::new(6.into(), 7.into()));
        assert_eq!(name.parent(), Some(class.clone()));
        assert_eq!(name.ancestors().count(), 3);
    }

    #[test]
    fn token_at_offset() {
        let root = class_a();

        let single = root.token_at_offset(7.into());
        assert!(matches!(&single, TokenAtOffset::Single(token) if token.text_trimmed() == "A"));

        let between = root.token_at_offset(8.into());
        let tokens: Vec<_> = between.map(|token| token.kind()).collect();
        assert_eq!(tokens, vec![SyntaxKind::IDENT, SyntaxKind::LEFT_BRACE]);

        assert!(matches!(root.token_at_offset(40.into()), TokenAtOffset::None));
    }

    #[test]
    fn pointers_resolve_to_nodes() {
        let root = class_a();
        for node in root.descendants() {
            if node.kind() == SyntaxKind::MODIFIER_LIST {
                continue;
            }
            let ptr = SyntaxNodePtr::new(&node);
            assert_eq!(ptr.try_to_node(&root), Some(node));
        }

        let name = root.descendants().find(|it| it.kind() == SyntaxKind::NAME).unwrap();
        let ptr = SyntaxNodePtr::new(&name);
        assert_eq!(ptr.range, TextRange::new(6.into(), 7.into()));
        assert!(ptr.try_to_node(&name).is_none());
    }

    #[test]
    fn replace_with_rebuilds_ancestors() {
        let root = class_a();
        let name = root.descendants().find(|it| it.kind() == SyntaxKind::NAME).unwrap();

        let renamed = GreenNode::new(SyntaxKind::NAME, [token(SyntaxKind::IDENT, 0, "Base", 1)]);
        let new_root = name.replace_with(renamed);

        assert_eq!(new_root.to_string(), "class Base { }");
        assert_eq!(root.text(), "class A { }");
    }
}
