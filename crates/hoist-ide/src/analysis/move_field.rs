use hoist_analysis::{SemanticModel, SymbolId, semantic_model};
use hoist_inputs::File;
use hoist_parse::FileParse as _;
use hoist_yellow::SyntaxKind::*;
use hoist_yellow::ast::{self, HasModifiers as _, HasName as _, Node as _};
use hoist_yellow::{
    GreenElement, GreenNode, GreenToken, GreenTrivia, NodeOrToken, SyntaxNode, SyntaxNodePtr,
    TriviaPiece, TriviaPieceKind,
};
use text_size::{TextRange, TextSize};

use crate::{Cancellable, CancellationToken, FileRange, SourceChange, TextEdit, pick_best_token};

const ID: &str = "move_field_to_base_class";
const LABEL: &str = "Move member to parent class";
const KIND: &str = "refactor";

impl super::Analysis {
    /// Offers to move the field under the cursor into the base class of its
    /// class. Only well-formed fields declaring a single variable are
    /// offered, and only when the base class has a body to receive them.
    pub fn offer_refactoring(
        &self,
        FileRange { file, range }: FileRange,
    ) -> Option<RefactoringOffer<'_>> {
        let parse = file.parse(self.db());
        let root = parse.syntax_node();
        let target = detect(&root, range.start())?;

        target.field.single_declarator()?;
        target.field.semicolon_token()?;
        target.base.left_brace_token()?;
        target.base.right_brace_token()?;

        let field = target.field.syntax();
        let field_range = field.trimmed_range();
        let recovered = field.descendants().any(|node| node.kind() == ERROR)
            || parse.diagnostics().iter().any(|diagnostic| {
                let range = diagnostic.range();
                field_range.contains_range(range) && range.start() < field_range.end()
            });
        if recovered {
            tracing::debug!(field = ?field_range, "field has syntax errors");
            return None;
        }

        Some(RefactoringOffer { analysis: self, file, root, target })
    }
}

/// A refactoring that applies at the requested position. The edit is only
/// computed on demand.
pub struct RefactoringOffer<'a> {
    analysis: &'a super::Analysis,
    file: File,
    root: SyntaxNode,
    target: Target,
}

impl RefactoringOffer<'_> {
    pub fn id(&self) -> &'static str {
        ID
    }

    pub fn label(&self) -> &'static str {
        LABEL
    }

    pub fn kind(&self) -> &'static str {
        KIND
    }

    /// Trimmed range of the field declaration.
    pub fn target(&self) -> TextRange {
        self.target.field.syntax().trimmed_range()
    }

    pub fn compute_edit(&self, cancel: &CancellationToken) -> Cancellable<SourceChange> {
        let db = self.analysis.db();
        let _span = tracing::debug_span!(
            "move_field",
            path = %self.file.path(db),
            field = ?self.target()
        )
        .entered();

        cancel.check()?;
        let model = semantic_model(db, self.file);

        let symbol = model.declared_symbol(self.target.field.syntax());
        tracing::debug!(?symbol, "resolved field");

        let property =
            symbol.and_then(|symbol| pass_through_property(model, &self.target.class, symbol));
        tracing::debug!(
            property = ?property.as_ref().map(|it| it.syntax().trimmed_range()),
            "discovered property"
        );

        let Rewritten { root, base } = symbol
            .and_then(|symbol| FieldMover::new(model, symbol, &self.target, property.as_ref()))
            .map_or_else(|| Rewritten::unchanged(&self.root), |mover| mover.rewrite(&self.root));

        cancel.check()?;
        let root = SyntaxNode::new_root(root);
        let reformat_ranges = base
            .and_then(|base| root.descendants().find(|node| node.green().ptr_eq(&base)))
            .map(|node| node.trimmed_range())
            .into_iter()
            .collect();

        Ok(SourceChange {
            file: self.file,
            edit: TextEdit::diff(self.file.text(db), &root.text()),
            reformat_ranges,
        })
    }
}

/// A field declaration, the class declaring it and the class named as its
/// base type.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    pub(crate) field: ast::FieldDecl,
    pub(crate) class: ast::ClassDecl,
    pub(crate) base: ast::ClassDecl,
}

pub(crate) fn detect(root: &SyntaxNode, offset: TextSize) -> Option<Target> {
    let token = pick_best_token(root.token_at_offset(offset), |kind| match kind {
        IDENT => 2,
        _ => 1,
    })?;

    let field = token.parent_ancestors().find_map(ast::FieldDecl::cast)?;
    let class = field.syntax().parent().and_then(ast::ClassDecl::cast)?;

    let base_name = class.base_list()?.types().next()?.path_type()?.simple_name()?;
    let base = root
        .descendants()
        .filter_map(ast::ClassDecl::cast)
        .find(|it| it.name().is_some_and(|name| name.text() == base_name))?;

    if base == class {
        return None;
    }

    Some(Target { field, class, base })
}

/// The first property of `class` whose getter is a block holding exactly
/// `return <field>;`.
pub(crate) fn pass_through_property(
    model: &SemanticModel,
    class: &ast::ClassDecl,
    field: SymbolId,
) -> Option<ast::PropertyDecl> {
    class.properties().find(|property| {
        let Some(body) = property.getter().and_then(|getter| getter.body()) else {
            return false;
        };

        let mut stmts = body.stmts();
        let (Some(ast::Stmt::Return(stmt)), None) = (stmts.next(), stmts.next()) else {
            return false;
        };

        stmt.expr().is_some_and(|expr| model.referenced_symbol(expr.syntax()) == Some(field))
    })
}

pub(crate) struct Rewritten {
    pub(crate) root: GreenNode,
    /// The base class as it appears in `root`.
    pub(crate) base: Option<GreenNode>,
}

impl Rewritten {
    fn unchanged(root: &SyntaxNode) -> Self {
        Self { root: root.green().clone(), base: None }
    }
}

enum Rewrite {
    Unchanged,
    Replace(GreenNode),
    Remove,
}

/// Rebuilds a tree with one field, and optionally one property, moved into
/// the base class. Subtrees that do not change are shared with the input.
pub(crate) struct FieldMover<'a> {
    model: &'a SemanticModel,
    field: SymbolId,
    property: Option<SyntaxNodePtr>,
    base: SyntaxNodePtr,
    relocated_field: GreenNode,
    relocated_property: Option<GreenNode>,
}

impl<'a> FieldMover<'a> {
    /// Returns `None` when the field does not declare exactly one variable
    /// or the base class has no body to insert into.
    pub(crate) fn new(
        model: &'a SemanticModel,
        field: SymbolId,
        target: &Target,
        property: Option<&ast::PropertyDecl>,
    ) -> Option<Self> {
        target.field.single_declarator()?;
        target.base.left_brace_token()?;
        target.base.right_brace_token()?;

        Some(Self {
            model,
            field,
            property: property.map(|it| SyntaxNodePtr::new(it.syntax())),
            base: SyntaxNodePtr::new(target.base.syntax()),
            relocated_field: with_protected_visibility(&target.field),
            relocated_property: property.map(|it| it.syntax().green().clone()),
        })
    }

    pub(crate) fn rewrite(&self, root: &SyntaxNode) -> Rewritten {
        let mut base = None;
        let root = match self.visit(root, &mut base) {
            Rewrite::Replace(green) => green,
            Rewrite::Unchanged | Rewrite::Remove => root.green().clone(),
        };

        Rewritten { root, base }
    }

    fn visit(&self, node: &SyntaxNode, base: &mut Option<GreenNode>) -> Rewrite {
        match node.kind() {
            FIELD_DECL if self.model.declared_symbol(node) == Some(self.field) => Rewrite::Remove,
            PROPERTY_DECL if self.property == Some(SyntaxNodePtr::new(node)) => Rewrite::Remove,
            CLASS_DECL if self.base == SyntaxNodePtr::new(node) => {
                let (children, _) = self.visit_children(node, base);
                let green = self.insert_members(children);
                *base = Some(green.clone());
                Rewrite::Replace(green)
            }
            _ => match self.visit_children(node, base) {
                (children, true) => Rewrite::Replace(GreenNode::new(node.kind(), children)),
                (_, false) => Rewrite::Unchanged,
            },
        }
    }

    fn visit_children(
        &self,
        node: &SyntaxNode,
        base: &mut Option<GreenNode>,
    ) -> (Vec<GreenElement>, bool) {
        let mut changed = false;
        let mut children = Vec::with_capacity(node.green().children().len());

        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Token(token) => children.push(token.green().clone().into()),
                NodeOrToken::Node(child) => match self.visit(&child, base) {
                    Rewrite::Unchanged => children.push(child.green().clone().into()),
                    Rewrite::Replace(green) => {
                        changed = true;
                        children.push(green.into());
                    }
                    Rewrite::Remove => changed = true,
                },
            }
        }

        (children, changed)
    }

    /// Field first, then the original members, then the property.
    fn insert_members(&self, mut children: Vec<GreenElement>) -> GreenNode {
        let open = children.iter().position(|it| it.kind() == LEFT_BRACE);
        let close = children.iter().rposition(|it| it.kind() == RIGHT_BRACE);

        if let (Some(open), Some(close)) = (open, close) {
            if let Some(property) = &self.relocated_property {
                children.insert(close, property.clone().into());
            }

            // A field laid out over lines of its own starts on a new line.
            let broken = match &children[open] {
                NodeOrToken::Token(brace)
                    if !brace.trailing_text().contains('\n')
                        && self.relocated_field.to_string().contains('\n') =>
                {
                    Some(end_line_after(brace))
                }
                _ => None,
            };
            if let Some(brace) = broken {
                children[open] = brace.into();
            }

            children.insert(open + 1, self.relocated_field.clone().into());
        }

        GreenNode::new(CLASS_DECL, children)
    }
}

/// The token with a newline closing its trailing trivia. Whitespace after
/// the last comment is dropped.
fn end_line_after(token: &GreenToken) -> GreenToken {
    let mut pieces = token.trailing().pieces().to_vec();
    while pieces.last().is_some_and(|piece| piece.kind == TriviaPieceKind::Whitespace) {
        pieces.pop();
    }

    let kept: TextSize = pieces.iter().map(|piece| piece.len).sum();
    let text = format!("{}\n", &token.trailing_text()[..usize::from(kept)]);
    pieces.push(TriviaPiece::new(TriviaPieceKind::Newline, 1.into()));

    token.with_trailing_trivia(GreenTrivia::new(&pieces), &text)
}

/// The field with its visibility replaced by `protected`.
///
/// The first visibility keyword is replaced in place and any further ones are
/// dropped. Without one, `protected` is put in front and takes over the
/// leading trivia of the token that used to come first.
fn with_protected_visibility(field: &ast::FieldDecl) -> GreenNode {
    let green = field.syntax().green();
    let Some(list) = field.modifier_list() else {
        return green.clone();
    };
    let index = list.syntax().index();

    let mut replaced = false;
    let mut modifiers = Vec::new();
    for token in list.modifiers() {
        let token = token.green();
        if !token.kind().is_visibility() {
            modifiers.push(token.clone().into());
        } else if !replaced {
            modifiers.push(token.with_kind_and_text(PROTECTED_KW, "protected").into());
            replaced = true;
        }
    }

    if replaced {
        let list = GreenNode::new(MODIFIER_LIST, modifiers);
        return green.replace_child(index, list.into());
    }

    prepend_protected(green, index).unwrap_or_else(|| green.clone())
}

fn prepend_protected(field: &GreenNode, list_index: usize) -> Option<GreenNode> {
    let (position, first) =
        field.children().iter().enumerate().skip(list_index).find_map(|(index, child)| {
            let token = match child {
                NodeOrToken::Node(node) => node.first_token()?,
                NodeOrToken::Token(token) => token,
            };
            Some((index, token.clone()))
        })?;

    let keyword = GreenToken::new(
        PROTECTED_KW,
        first.leading().clone(),
        &format!("{}protected", first.leading_text()),
        GreenTrivia::empty(),
    );
    let space = GreenTrivia::new(&[TriviaPiece::whitespace(1)]);
    let first = first.with_leading_trivia(space, " ");

    let child = match &field.children()[position] {
        NodeOrToken::Node(node) => node.map_first_token(|_| first)?.into(),
        NodeOrToken::Token(_) => first.into(),
    };
    let field = field.replace_child(position, child);

    let list = field.children()[list_index].as_node()?.insert_child(0, keyword.into());
    Some(field.replace_child(list_index, list.into()))
}
