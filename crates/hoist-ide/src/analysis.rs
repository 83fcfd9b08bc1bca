pub(crate) mod move_field;

use hoist_db::{Diagnostic, RootDatabase, check_file};
use hoist_inputs::File;

/// Editor features over one database snapshot.
#[derive(Default)]
pub struct Analysis {
    db: RootDatabase,
}

impl Analysis {
    pub fn db(&self) -> &RootDatabase {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut RootDatabase {
        &mut self.db
    }

    pub fn diagnostics(&self, file: File) -> &[Diagnostic] {
        check_file(self.db(), file)
    }
}
