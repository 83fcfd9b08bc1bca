use hoist_yellow::ast::{self, Node as _};
use hoist_yellow::{SyntaxKind, SyntaxNode, SyntaxNodePtr};
use la_arena::{Arena, Idx};
use rustc_hash::{FxHashMap, FxHashSet};
use text_size::TextRange;

use crate::binder::Binder;

pub(crate) type FxIndexMap<K, V> =
    indexmap::IndexMap<K, V, std::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

pub type SymbolId = Idx<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    Class,
    Field,
    Property,
    Method,
    Constructor,
    Parameter,
    Local,
}

/// A declared entity. Two references denote the same entity exactly when they
/// resolve to the same [`SymbolId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub(crate) name: String,
    pub(crate) kind: SymbolKind,
    pub(crate) container: Option<SymbolId>,
    pub(crate) ptr: SyntaxNodePtr,
    pub(crate) name_range: TextRange,
}

impl Symbol {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// The enclosing class, namespace or member.
    pub fn container(&self) -> Option<SymbolId> {
        self.container
    }

    /// Pointer to the declaring node.
    pub fn ptr(&self) -> SyntaxNodePtr {
        self.ptr
    }

    pub fn name_range(&self) -> TextRange {
        self.name_range
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ClassData {
    /// Dotted name of the enclosing namespace, empty for the global one.
    pub(crate) namespace: String,
    pub(crate) base: Option<SymbolId>,
    /// Members in source order.
    pub(crate) members: Vec<SymbolId>,
    /// Members by name. The first declaration of a name wins.
    pub(crate) scope: FxHashMap<String, SymbolId>,
}

/// Name binding for a single file.
///
/// Declarations are keyed by the pointer of their declaring node: class,
/// namespace, property, method, constructor and parameter nodes, and the
/// variable declarator for fields and locals. References are keyed by the
/// pointer of the expression that names the entity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SemanticModel {
    pub(crate) symbols: Arena<Symbol>,
    pub(crate) declarations: FxHashMap<SyntaxNodePtr, SymbolId>,
    pub(crate) references: FxHashMap<SyntaxNodePtr, SymbolId>,
    pub(crate) classes: FxIndexMap<SymbolId, ClassData>,
}

impl SemanticModel {
    pub fn new(root: &SyntaxNode) -> Self {
        Binder::new().bind(root)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter()
    }

    /// The symbol declared by `node`.
    ///
    /// A field declaration denotes its variable when it declares exactly one.
    pub fn declared_symbol(&self, node: &SyntaxNode) -> Option<SymbolId> {
        if node.kind() == SyntaxKind::FIELD_DECL {
            let declarator = ast::FieldDecl::cast(node.clone())?.single_declarator()?;
            return self.declared_symbol(declarator.syntax());
        }

        self.declarations.get(&SyntaxNodePtr::new(node)).copied()
    }

    /// The symbol an expression names: a simple name, a member access with
    /// a resolvable receiver, or a parenthesised form of either.
    pub fn referenced_symbol(&self, expr: &SyntaxNode) -> Option<SymbolId> {
        self.references.get(&SyntaxNodePtr::new(expr)).copied()
    }

    pub fn base_class(&self, class: SymbolId) -> Option<SymbolId> {
        self.classes.get(&class)?.base
    }

    /// Members declared directly in `class`, in source order.
    pub fn members(&self, class: SymbolId) -> &[SymbolId] {
        self.classes.get(&class).map_or(&[], |data| &data.members)
    }

    /// All classes of the file in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.classes.keys().copied()
    }

    /// Looks `name` up in `class` and then along its base classes.
    pub fn lookup_member(&self, class: SymbolId, name: &str) -> Option<SymbolId> {
        let mut visited = FxHashSet::default();
        let mut current = Some(class);

        while let Some(class) = current {
            if !visited.insert(class) {
                return None;
            }
            let data = self.classes.get(&class)?;
            if let Some(&member) = data.scope.get(name) {
                return Some(member);
            }
            current = data.base;
        }

        None
    }

    /// Whether following base classes from `class` leads back to it.
    pub fn has_cyclic_base(&self, class: SymbolId) -> bool {
        let mut visited = FxHashSet::default();
        let mut current = self.base_class(class);

        while let Some(base) = current {
            if base == class {
                return true;
            }
            if !visited.insert(base) {
                return false;
            }
            current = self.base_class(base);
        }

        false
    }
}
