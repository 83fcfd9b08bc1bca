mod binder;
pub mod semantics;
#[cfg(test)]
mod tests;

use hoist_errors::Diagnostic;
use hoist_inputs::File;
use hoist_parse::FileParse as _;
use rustc_hash::FxHashMap;
pub use semantics::{SemanticModel, Symbol, SymbolId, SymbolKind};

#[salsa::tracked(returns(ref), no_eq)]
pub fn semantic_model(db: &dyn salsa::Database, file: File) -> SemanticModel {
    SemanticModel::new(&file.parse(db).syntax_node())
}

/// Syntax errors followed by declaration errors found by the binder.
#[salsa::tracked(returns(ref), no_eq)]
pub fn check_file(db: &dyn salsa::Database, file: File) -> Vec<Diagnostic> {
    let mut diagnostics = file.parse(db).diagnostics().to_owned();
    let model = semantic_model(db, file);

    for class in model.classes() {
        let symbol = model.symbol(class);

        if model.has_cyclic_base(class) {
            diagnostics.push(Diagnostic::error(
                format!("circular base class dependency involving `{}`", symbol.name()),
                symbol.name_range(),
            ));
        }

        let mut seen = FxHashMap::default();
        for &member in model.members(class) {
            let member = model.symbol(member);
            if member.name().is_empty() || member.kind() == SymbolKind::Constructor {
                continue;
            }

            match seen.get(member.name()) {
                Some(&SymbolKind::Method) if member.kind() == SymbolKind::Method => {}
                Some(_) => diagnostics.push(Diagnostic::error(
                    format!(
                        "`{}` already contains a definition for `{}`",
                        symbol.name(),
                        member.name()
                    ),
                    member.name_range(),
                )),
                None => {
                    seen.insert(member.name(), member.kind());
                }
            }
        }
    }

    diagnostics
}
