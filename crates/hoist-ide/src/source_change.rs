use hoist_inputs::File;
use text_size::{TextRange, TextSize};

/// An insertion and a deletion at the same place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indel {
    pub insert: String,
    /// Range in the text before the edit.
    pub delete: TextRange,
}

impl Indel {
    pub fn insert(offset: TextSize, text: String) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::replace(range, String::new())
    }

    pub fn replace(range: TextRange, replace_with: String) -> Self {
        Self { delete: range, insert: replace_with }
    }

    pub fn apply(&self, text: &mut String) {
        text.replace_range(std::ops::Range::<usize>::from(self.delete), &self.insert);
    }
}

/// Non-overlapping indels sorted by position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextEdit {
    indels: Vec<Indel>,
}

impl TextEdit {
    /// The smallest single replacement that turns `old` into `new`.
    pub fn diff(old: &str, new: &str) -> Self {
        let prefix = common_prefix(old, new);
        let suffix = common_suffix(&old[prefix..], &new[prefix..]);
        if prefix == old.len() && prefix == new.len() {
            return Self::default();
        }

        let delete = TextRange::new(to_size(prefix), to_size(old.len() - suffix));
        let insert = new[prefix..new.len() - suffix].to_owned();
        Self { indels: vec![Indel::replace(delete, insert)] }
    }

    pub fn indels(&self) -> &[Indel] {
        &self.indels
    }

    pub fn is_empty(&self) -> bool {
        self.indels.is_empty()
    }

    /// Applies the edit back to front so earlier ranges stay valid.
    pub fn apply(&self, text: &mut String) {
        for indel in self.indels.iter().rev() {
            indel.apply(text);
        }
    }
}

impl IntoIterator for TextEdit {
    type Item = Indel;
    type IntoIter = std::vec::IntoIter<Indel>;

    fn into_iter(self) -> Self::IntoIter {
        self.indels.into_iter()
    }
}

/// Result of a refactoring: an edit of one file plus the ranges of the new
/// text that a formatter should touch up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChange {
    pub file: File,
    pub edit: TextEdit,
    pub reformat_ranges: Vec<TextRange>,
}

fn common_prefix(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|&((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((index, _), _)| index)
}

fn common_suffix(a: &str, b: &str) -> usize {
    a.chars().rev().zip(b.chars().rev()).take_while(|(x, y)| x == y).map(|(x, _)| x.len_utf8()).sum()
}

fn to_size(offset: usize) -> TextSize {
    TextSize::new(offset as u32)
}
