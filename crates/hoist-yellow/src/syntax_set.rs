use crate::SyntaxKind;

/// A constant set of kinds, used by the parser for recovery and lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet(u128);

impl SyntaxSet {
    pub const EMPTY: Self = Self(0);

    const fn bit(kind: SyntaxKind) -> u128 {
        let index = kind as u16;
        assert!(index < u128::BITS as u16, "SyntaxKind does not fit in a SyntaxSet");
        1 << index
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut mask = 0;
        let mut i = 0;
        while i < N {
            mask |= Self::bit(kinds[i]);
            i += 1;
        }
        Self(mask)
    }

    pub const fn union(self, other: &Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_last_kinds() {
        let set = SyntaxSet::new([SyntaxKind::LEFT_PAREN, SyntaxKind::TOMBSTONE]);

        assert!(set.contains(SyntaxKind::LEFT_PAREN));
        assert!(set.contains(SyntaxKind::TOMBSTONE));
        assert!(!set.contains(SyntaxKind::CLASS_DECL));
        assert!(!SyntaxSet::EMPTY.contains(SyntaxKind::LEFT_PAREN));
    }

    #[test]
    fn union_keeps_both_sides() {
        let set = SyntaxSet::new([SyntaxKind::IDENT]).union(&SyntaxSet::new([SyntaxKind::COMMA]));

        assert!(set.contains(SyntaxKind::IDENT));
        assert!(set.contains(SyntaxKind::COMMA));
        assert!(!set.contains(SyntaxKind::SEMICOLON));
    }
}
