//! Lossless, immutable syntax tree with parent pointers and attached trivia.
//!
//! Green nodes are shared, position independent and never mutated; edits
//! build new green nodes that reuse every untouched subtree. Red handles add
//! absolute offsets and parent links on top of them.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod green;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Incremental builder for constructing a `GreenNode`.
pub use builder::Builder;
/// Shared, immutable tree storage.
pub use green::{GreenElement, GreenNode, GreenToken, GreenTrivia};
/// Primary syntax tree API types and adapters.
pub use syntax::{
    Children, ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement,
    SyntaxNode, SyntaxNodePtr, SyntaxToken, TokenAtOffset, WalkEvent, WalkEventWithTokens,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces attached to tokens.
pub use trivia::{TriviaPiece, TriviaPieceKind};
