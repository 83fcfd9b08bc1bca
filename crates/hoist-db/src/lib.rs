pub use hoist_analysis::{check_file, semantic_model};
pub use hoist_errors::Diagnostic;
pub use hoist_inputs::File;

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}
