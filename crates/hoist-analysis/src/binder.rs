use hoist_yellow::ast::{self, HasName as _, Node as _};
use hoist_yellow::{SyntaxNode, SyntaxNodePtr};
use rustc_hash::FxHashMap;
use text_size::TextRange;

use crate::semantics::{ClassData, SemanticModel, Symbol, SymbolId, SymbolKind};

/// Builds a [`SemanticModel`] in two passes. The first declares namespaces,
/// classes and members so that bodies can refer to members declared later
/// in the file, the second binds parameters, locals and expressions.
pub(crate) struct Binder {
    model: SemanticModel,
    classes: Vec<(SymbolId, ast::ClassDecl)>,
    pending_bases: Vec<(SymbolId, String)>,
    scopes: Vec<FxHashMap<String, SymbolId>>,
    owner: Option<SymbolId>,
}

impl Binder {
    pub(crate) fn new() -> Self {
        Self {
            model: SemanticModel::default(),
            classes: Vec::new(),
            pending_bases: Vec::new(),
            scopes: Vec::new(),
            owner: None,
        }
    }

    pub(crate) fn bind(mut self, root: &SyntaxNode) -> SemanticModel {
        let Some(unit) = ast::CompilationUnit::cast(root.clone()) else {
            return self.model;
        };

        self.collect_items(unit.items(), None, "");
        self.resolve_bases();

        for (class, decl) in std::mem::take(&mut self.classes) {
            self.bind_members(class, &decl);
        }

        self.model
    }

    fn alloc(
        &mut self,
        node: &SyntaxNode,
        name: Option<ast::Name>,
        kind: SymbolKind,
        container: Option<SymbolId>,
    ) -> SymbolId {
        let (name, name_range) = match name {
            Some(name) => (name.text(), name.syntax().trimmed_range()),
            None => (String::new(), TextRange::empty(node.trimmed_range().start())),
        };
        self.alloc_named(node, name, name_range, kind, container)
    }

    fn alloc_named(
        &mut self,
        node: &SyntaxNode,
        name: String,
        name_range: TextRange,
        kind: SymbolKind,
        container: Option<SymbolId>,
    ) -> SymbolId {
        let ptr = SyntaxNodePtr::new(node);
        let id = self.model.symbols.alloc(Symbol { name, kind, container, ptr, name_range });
        self.model.declarations.insert(ptr, id);
        id
    }

    fn add_member(&mut self, class: SymbolId, member: SymbolId) {
        let name = self.model.symbols[member].name.clone();
        let Some(data) = self.model.classes.get_mut(&class) else { return };

        data.members.push(member);
        if !name.is_empty() && self.model.symbols[member].kind != SymbolKind::Constructor {
            data.scope.entry(name).or_insert(member);
        }
    }

    fn collect_items(
        &mut self,
        items: impl Iterator<Item = ast::Item>,
        container: Option<SymbolId>,
        namespace: &str,
    ) {
        for item in items {
            match item {
                ast::Item::Using(_) => {}
                ast::Item::Namespace(decl) => {
                    let Some(path) = decl.path() else { continue };
                    let name = path.text();
                    let full_name =
                        if namespace.is_empty() { name.clone() } else { format!("{namespace}.{name}") };

                    let id = self.alloc_named(
                        decl.syntax(),
                        name,
                        path.syntax().trimmed_range(),
                        SymbolKind::Namespace,
                        container,
                    );
                    self.collect_items(decl.items(), Some(id), &full_name);
                }
                ast::Item::Class(decl) => {
                    self.collect_class(&decl, container, namespace);
                }
            }
        }
    }

    fn collect_class(
        &mut self,
        decl: &ast::ClassDecl,
        container: Option<SymbolId>,
        namespace: &str,
    ) -> SymbolId {
        let id = self.alloc(decl.syntax(), decl.name(), SymbolKind::Class, container);
        self.model
            .classes
            .insert(id, ClassData { namespace: namespace.to_owned(), ..ClassData::default() });

        if let Some(container) = container.filter(|&it| self.model.classes.contains_key(&it)) {
            self.add_member(container, id);
        }

        let base_name = decl
            .base_list()
            .and_then(|list| list.types().next())
            .and_then(|ty| ty.path_type())
            .and_then(|path| path.simple_name());
        if let Some(base_name) = base_name {
            self.pending_bases.push((id, base_name));
        }

        for member in decl.members() {
            let member = match member {
                ast::Member::Field(field) => {
                    for declarator in field.declarators() {
                        let member = self.alloc(
                            declarator.syntax(),
                            declarator.name(),
                            SymbolKind::Field,
                            Some(id),
                        );
                        self.add_member(id, member);
                    }
                    continue;
                }
                ast::Member::Property(property) => {
                    self.alloc(property.syntax(), property.name(), SymbolKind::Property, Some(id))
                }
                ast::Member::Method(method) => {
                    self.alloc(method.syntax(), method.name(), SymbolKind::Method, Some(id))
                }
                ast::Member::Constructor(ctor) => {
                    self.alloc(ctor.syntax(), ctor.name(), SymbolKind::Constructor, Some(id))
                }
                ast::Member::Class(nested) => {
                    self.collect_class(&nested, Some(id), namespace);
                    continue;
                }
            };
            self.add_member(id, member);
        }

        self.classes.push((id, decl.clone()));
        id
    }

    /// Base types are matched by simple name, preferring a class from the
    /// same namespace. A class never becomes its own base.
    fn resolve_bases(&mut self) {
        for (class, name) in std::mem::take(&mut self.pending_bases) {
            let namespace = &self.model.classes[&class].namespace;
            let candidates = self
                .model
                .classes
                .iter()
                .filter(|&(&id, _)| id != class && self.model.symbols[id].name == name)
                .collect::<Vec<_>>();

            let base = candidates
                .iter()
                .find(|(_, data)| &data.namespace == namespace)
                .or_else(|| candidates.first())
                .map(|&(&id, _)| id);

            if let Some(data) = self.model.classes.get_mut(&class) {
                data.base = base;
            }
        }
    }

    fn bind_members(&mut self, class: SymbolId, decl: &ast::ClassDecl) {
        for member in decl.members() {
            self.owner = self.model.declarations.get(&SyntaxNodePtr::new(member.syntax())).copied();

            match member {
                ast::Member::Field(field) => {
                    for declarator in field.declarators() {
                        self.owner = self
                            .model
                            .declarations
                            .get(&SyntaxNodePtr::new(declarator.syntax()))
                            .copied();
                        if let Some(expr) = declarator.initializer().and_then(|it| it.expr()) {
                            self.bind_expr(class, &expr);
                        }
                    }
                }
                ast::Member::Property(property) => {
                    for accessor in property.accessor_list().into_iter().flat_map(|it| it.accessors())
                    {
                        self.bind_body(class, accessor.body(), accessor.expr_body());
                    }
                    self.bind_body(class, None, property.expr_body());
                    if let Some(expr) = property.initializer().and_then(|it| it.expr()) {
                        self.bind_expr(class, &expr);
                    }
                }
                ast::Member::Method(method) => {
                    self.scopes.push(FxHashMap::default());
                    self.bind_params(class, method.param_list());
                    self.bind_body(class, method.body(), method.expr_body());
                    self.scopes.pop();
                }
                ast::Member::Constructor(ctor) => {
                    self.scopes.push(FxHashMap::default());
                    self.bind_params(class, ctor.param_list());
                    let args = ctor.initializer().and_then(|it| it.arg_list());
                    for arg in args.into_iter().flat_map(|it| it.args()) {
                        self.bind_expr(class, &arg);
                    }
                    self.bind_body(class, ctor.body(), ctor.expr_body());
                    self.scopes.pop();
                }
                ast::Member::Class(_) => {}
            }
        }

        self.owner = None;
    }

    fn bind_params(&mut self, class: SymbolId, params: Option<ast::ParamList>) {
        for param in params.into_iter().flat_map(|it| it.params()) {
            if let Some(expr) = param.default_value().and_then(|it| it.expr()) {
                self.bind_expr(class, &expr);
            }
            let id = self.alloc(param.syntax(), param.name(), SymbolKind::Parameter, self.owner);
            self.declare_local(id);
        }
    }

    fn bind_body(
        &mut self,
        class: SymbolId,
        block: Option<ast::Block>,
        expr_body: Option<ast::ArrowExprClause>,
    ) {
        if let Some(block) = block {
            self.bind_block(class, &block);
        }
        if let Some(expr) = expr_body.and_then(|it| it.expr()) {
            self.bind_expr(class, &expr);
        }
    }

    fn declare_local(&mut self, id: SymbolId) {
        let name = &self.model.symbols[id].name;
        if name.is_empty() {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.clone(), id);
        }
    }

    fn bind_block(&mut self, class: SymbolId, block: &ast::Block) {
        self.scopes.push(FxHashMap::default());
        for stmt in block.stmts() {
            self.bind_stmt(class, &stmt);
        }
        self.scopes.pop();
    }

    fn bind_stmt(&mut self, class: SymbolId, stmt: &ast::Stmt) {
        match stmt {
            ast::Stmt::Block(block) => self.bind_block(class, block),
            ast::Stmt::Return(ret) => {
                if let Some(expr) = ret.expr() {
                    self.bind_expr(class, &expr);
                }
            }
            ast::Stmt::If(if_stmt) => {
                if let Some(condition) = if_stmt.condition() {
                    self.bind_expr(class, &condition);
                }
                if let Some(then_branch) = if_stmt.then_branch() {
                    self.bind_stmt(class, &then_branch);
                }
                if let Some(else_branch) = if_stmt.else_clause().and_then(|it| it.stmt()) {
                    self.bind_stmt(class, &else_branch);
                }
            }
            ast::Stmt::LocalDecl(local) => {
                let declarators = local.variable_decl().into_iter().flat_map(|it| it.declarators());
                for declarator in declarators {
                    if let Some(expr) = declarator.initializer().and_then(|it| it.expr()) {
                        self.bind_expr(class, &expr);
                    }
                    let id = self.alloc(
                        declarator.syntax(),
                        declarator.name(),
                        SymbolKind::Local,
                        self.owner,
                    );
                    self.declare_local(id);
                }
            }
            ast::Stmt::Expr(stmt) => {
                if let Some(expr) = stmt.expr() {
                    self.bind_expr(class, &expr);
                }
            }
            ast::Stmt::Empty(_) => {}
        }
    }

    fn bind_expr(&mut self, class: SymbolId, expr: &ast::Expr) -> Option<SymbolId> {
        let resolved = match expr {
            ast::Expr::NameRef(name_ref) => self.resolve_name(class, &name_ref.text()),
            ast::Expr::MemberAccess(access) => {
                let target = match access.receiver() {
                    Some(ast::Expr::This(_)) => Some(class),
                    Some(ast::Expr::Base(_)) => self.model.base_class(class),
                    Some(receiver) => self
                        .bind_expr(class, &receiver)
                        .filter(|&it| self.model.symbols[it].kind == SymbolKind::Class),
                    None => None,
                };

                let name_ref = access.name_ref()?;
                let member = target.and_then(|it| self.model.lookup_member(it, &name_ref.text()));
                if let Some(member) = member {
                    self.model.references.insert(SyntaxNodePtr::new(name_ref.syntax()), member);
                }
                member
            }
            ast::Expr::Paren(paren) => {
                let inner = paren.expr()?;
                self.bind_expr(class, &inner)
            }
            ast::Expr::Call(call) => {
                if let Some(callee) = call.callee() {
                    self.bind_expr(class, &callee);
                }
                self.bind_args(class, call.arg_list());
                None
            }
            ast::Expr::ObjectCreation(creation) => {
                self.bind_args(class, creation.arg_list());
                None
            }
            ast::Expr::Prefix(prefix) => {
                if let Some(operand) = prefix.expr() {
                    self.bind_expr(class, &operand);
                }
                None
            }
            ast::Expr::Postfix(postfix) => {
                if let Some(operand) = postfix.expr() {
                    self.bind_expr(class, &operand);
                }
                None
            }
            ast::Expr::Binary(binary) => {
                self.bind_operands(class, [binary.lhs(), binary.rhs()]);
                None
            }
            ast::Expr::Assign(assign) => {
                self.bind_operands(class, [assign.lhs(), assign.rhs()]);
                None
            }
            ast::Expr::Conditional(conditional) => {
                self.bind_operands(
                    class,
                    [conditional.condition(), conditional.then_expr(), conditional.else_expr()],
                );
                None
            }
            ast::Expr::Literal(_) | ast::Expr::This(_) | ast::Expr::Base(_) => None,
        };

        if let Some(symbol) = resolved {
            self.model.references.insert(SyntaxNodePtr::new(expr.syntax()), symbol);
        }
        resolved
    }

    fn bind_operands<const N: usize>(&mut self, class: SymbolId, operands: [Option<ast::Expr>; N]) {
        for operand in operands.into_iter().flatten() {
            self.bind_expr(class, &operand);
        }
    }

    fn bind_args(&mut self, class: SymbolId, args: Option<ast::ArgList>) {
        for arg in args.into_iter().flat_map(|it| it.args()) {
            self.bind_expr(class, &arg);
        }
    }

    /// Locals and parameters first, then members of the enclosing classes
    /// and their bases, then classes of the file by name.
    fn resolve_name(&self, class: SymbolId, name: &str) -> Option<SymbolId> {
        if let Some(&local) = self.scopes.iter().rev().find_map(|scope| scope.get(name)) {
            return Some(local);
        }

        let enclosing = std::iter::successors(Some(class), |&it| {
            self.model.symbols[it]
                .container
                .filter(|&container| self.model.symbols[container].kind == SymbolKind::Class)
        });
        for class in enclosing {
            if let Some(member) = self.model.lookup_member(class, name) {
                return Some(member);
            }
        }

        self.model.classes.keys().copied().find(|&it| self.model.symbols[it].name == name)
    }
}
