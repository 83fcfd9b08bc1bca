use hoist_errors::Diagnostic;
use hoist_inputs::File;
use hoist_yellow::ast::{self, Node as _};
use hoist_yellow::{GreenNode, SyntaxNode};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// A lossless syntax tree together with the errors found while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn tree(&self) -> ast::CompilationUnit {
        match ast::CompilationUnit::cast(self.syntax_node()) {
            Some(unit) => unit,
            None => unreachable!("the parser always produces a compilation unit"),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Parses a whole source file. Never fails: malformed input ends up in
/// `ERROR` nodes and diagnostics, and the tree text always equals `text`.
pub fn parse_text(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::compilation_unit(&mut parser);
    let (green, diagnostics) = parser.finish();
    Parse { green, diagnostics }
}

pub trait FileParse {
    fn parse(self, db: &dyn salsa::Database) -> &Parse;
}

#[salsa::tracked]
impl FileParse for File {
    #[salsa::tracked(returns(ref))]
    fn parse(self, db: &dyn salsa::Database) -> Parse {
        parse_text(self.text(db))
    }
}
