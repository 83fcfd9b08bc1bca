use expect_test::expect;
use hoist_inputs::File;
use hoist_parse::parse_text;
use hoist_yellow::ast::{self, HasName as _, Node as _};
use hoist_yellow::{SyntaxKind, SyntaxNode};
use salsa::DatabaseImpl;

use crate::{SemanticModel, SymbolId, SymbolKind, check_file, semantic_model};

fn model(text: &str) -> (SyntaxNode, SemanticModel) {
    let root = parse_text(text).syntax_node();
    let model = SemanticModel::new(&root);
    (root, model)
}

fn class(root: &SyntaxNode, name: &str) -> ast::ClassDecl {
    root.descendants()
        .filter_map(ast::ClassDecl::cast)
        .find(|class| class.name().is_some_and(|it| it.text() == name))
        .unwrap()
}

fn field(class: &ast::ClassDecl, name: &str) -> SyntaxNode {
    class
        .fields()
        .find(|field| field.declarators().any(|it| it.name().is_some_and(|it| it.text() == name)))
        .unwrap()
        .syntax()
        .clone()
}

/// Symbols referenced by every `return` expression under `node`, in order.
fn returned(model: &SemanticModel, node: &SyntaxNode) -> Vec<Option<SymbolId>> {
    node.descendants()
        .filter_map(ast::ReturnStmt::cast)
        .map(|ret| model.referenced_symbol(ret.expr().unwrap().syntax()))
        .collect()
}

#[test]
fn symbols() {
    let (_, model) = model("class A { int x; int X { get { return x; } } }");

    let actual = model
        .symbols()
        .map(|(_, symbol)| {
            let container =
                symbol.container().map(|it| format!(" ({})", model.symbol(it).name())).unwrap_or_default();
            format!("{:?} {} {:?}{container}\n", symbol.kind(), symbol.name(), symbol.name_range())
        })
        .collect::<String>();

    expect![[r#"
        Class A 6..7
        Field x 14..15 (A)
        Property X 21..22 (A)
    "#]]
    .assert_eq(&actual);
}

#[test]
fn symbol_pointers_resolve_to_declarations() {
    let (root, model) = model("class A { int x, y; int X { get { return x; } } }");

    let kinds = model
        .symbols()
        .map(|(_, symbol)| symbol.ptr().try_to_node(&root).unwrap().kind())
        .collect::<Vec<_>>();

    assert_eq!(
        kinds,
        [
            SyntaxKind::CLASS_DECL,
            SyntaxKind::VARIABLE_DECLARATOR,
            SyntaxKind::VARIABLE_DECLARATOR,
            SyntaxKind::PROPERTY_DECL
        ]
    );
}

#[test]
fn field_references() {
    let (root, model) = model(
        "class A { int x; int M() { return x; } int N() { return this.x; } int O() => (x); }
         class B { int x; int M() { return x; } }",
    );

    let a = class(&root, "A");
    let b = class(&root, "B");
    let a_x = model.declared_symbol(&field(&a, "x")).unwrap();
    let b_x = model.declared_symbol(&field(&b, "x")).unwrap();
    assert_ne!(a_x, b_x);
    assert_eq!(model.symbol(a_x).kind(), SymbolKind::Field);

    assert_eq!(returned(&model, a.syntax()), [Some(a_x), Some(a_x)]);
    assert_eq!(returned(&model, b.syntax()), [Some(b_x)]);

    let paren = root.descendants().find(|it| it.kind() == SyntaxKind::PAREN_EXPR).unwrap();
    assert_eq!(model.referenced_symbol(&paren), Some(a_x));
}

#[test]
fn locals_and_parameters_shadow_fields() {
    let (root, model) = model(
        "class A { int x; int y;
            int M(int x) { return x; }
            int N() { int y = 1; return y; }
            int O() { { int x = 2; } return x; } }",
    );

    let a = class(&root, "A");
    let fields = [field(&a, "x"), field(&a, "y")].map(|it| model.declared_symbol(&it).unwrap());
    let returns = returned(&model, a.syntax());

    let kinds = returns.iter().map(|it| model.symbol(it.unwrap()).kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [SymbolKind::Parameter, SymbolKind::Local, SymbolKind::Field]);
    assert_eq!(returns[2], Some(fields[0]));
}

#[test]
fn members_of_base_classes() {
    let (root, model) = model(
        "class Base { protected int x; }
         class Child : Base { int M() { return x; } int N() { return base.x; } }",
    );

    let base = class(&root, "Base");
    let child = class(&root, "Child");
    let x = model.declared_symbol(&field(&base, "x")).unwrap();

    let child_symbol = model.declared_symbol(child.syntax()).unwrap();
    let base_symbol = model.declared_symbol(base.syntax()).unwrap();
    assert_eq!(model.base_class(child_symbol), Some(base_symbol));
    assert_eq!(model.lookup_member(child_symbol, "x"), Some(x));
    assert_eq!(returned(&model, child.syntax()), [Some(x), Some(x)]);
}

#[test]
fn unresolved_names() {
    let (root, model) = model("class A { int M() { return y; } int N() { return other.y; } }");
    assert_eq!(returned(&model, &root), [None, None]);
}

#[test]
fn base_prefers_same_namespace() {
    let (root, model) = model(
        "namespace One { class Base { } }
         namespace Two { class Base { } class Child : Base { } }",
    );

    let child = model.declared_symbol(class(&root, "Child").syntax()).unwrap();
    let base = model.base_class(child).unwrap();
    let namespace = model.symbol(base).container().unwrap();
    assert_eq!(model.symbol(namespace).name(), "Two");
    assert_eq!(model.symbol(namespace).kind(), SymbolKind::Namespace);
}

#[test]
fn class_is_not_its_own_base() {
    let (root, model) = model("class A : A { }");
    let a = model.declared_symbol(class(&root, "A").syntax()).unwrap();
    assert_eq!(model.base_class(a), None);
    assert!(!model.has_cyclic_base(a));
}

#[test]
fn multi_declarator_field_has_no_single_symbol() {
    let (root, model) = model("class A { int x, y; }");
    let decl = root.descendants().find(|it| it.kind() == SyntaxKind::FIELD_DECL).unwrap();
    assert_eq!(model.declared_symbol(&decl), None);

    let a = model.declared_symbol(class(&root, "A").syntax()).unwrap();
    let names = model.members(a).iter().map(|&it| model.symbol(it).name()).collect::<Vec<_>>();
    assert_eq!(names, ["x", "y"]);
}

#[test]
fn check_file_reports_declaration_errors() {
    let db = DatabaseImpl::default();
    let file = File::new(
        &db,
        "a.cs".into(),
        "class A : B { int x; int x() { } void M() { } void M(int a) { } }
         class B : A { int y }"
            .to_owned(),
    );

    let messages = check_file(&db, file).iter().map(|it| it.message()).collect::<Vec<_>>();
    assert_eq!(
        messages,
        [
            "expected `;`",
            "circular base class dependency involving `A`",
            "`A` already contains a definition for `x`",
            "circular base class dependency involving `B`",
        ]
    );
    assert_eq!(semantic_model(&db, file).classes().count(), 2);
}
