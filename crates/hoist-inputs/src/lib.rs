pub use line_index::{LineCol, LineIndex, TextRange, TextSize, WideEncoding, WideLineCol};

/// A source document known to the database.
#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: camino::Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn salsa::Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }
}

#[cfg(test)]
mod tests {
    use salsa::{DatabaseImpl, Setter as _};

    use super::*;

    #[test]
    fn line_index_follows_text_changes() {
        let mut db = DatabaseImpl::default();
        let file = File::new(&db, "a.cs".into(), "class A\n{\n}\n".to_owned());

        let pos = file.line_index(&db).line_col(TextSize::new(8));
        assert_eq!((pos.line, pos.col), (1, 0));

        file.set_text(&mut db).to("\n\nclass A {}".to_owned());
        let pos = file.line_index(&db).line_col(TextSize::new(4));
        assert_eq!((pos.line, pos.col), (2, 2));
    }
}
