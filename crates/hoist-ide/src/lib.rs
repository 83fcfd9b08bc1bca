mod analysis;
mod cancellation;
mod server;
mod source_change;

use hoist_inputs::File;
use hoist_yellow::{SyntaxKind, SyntaxToken, TokenAtOffset};
use text_size::TextRange;

pub use crate::analysis::Analysis;
pub use crate::analysis::move_field::RefactoringOffer;
pub use crate::cancellation::{Cancellable, CancellationToken, Cancelled};
pub use crate::server::Server;
pub use crate::source_change::{Indel, SourceChange, TextEdit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRange {
    pub file: File,
    pub range: TextRange,
}

/// Picks the token with the highest priority when the offset sits between
/// two tokens. Ties go to the right-hand token.
pub(crate) fn pick_best_token(
    tokens: TokenAtOffset<SyntaxToken>,
    priority: impl Fn(SyntaxKind) -> usize,
) -> Option<SyntaxToken> {
    tokens.max_by_key(|token| priority(token.kind()))
}
