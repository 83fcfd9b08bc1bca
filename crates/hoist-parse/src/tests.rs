use expect_test::{Expect, expect};
use hoist_inputs::File;
use hoist_yellow::SyntaxKind;
use hoist_yellow::ast::{self, HasName as _, HasModifiers as _, Node as _};
use salsa::DatabaseImpl;

use crate::{FileParse as _, parse_text};

fn check(text: &str, expect: Expect) {
    let parse = parse_text(text);
    let diagnostics = parse
        .diagnostics()
        .iter()
        .map(|d| format!("  {:?} {}\n", d.range(), d.message()))
        .collect::<String>();

    let actual = format!("{:#?}Errors:\n{diagnostics}", parse.syntax_node());
    expect.assert_eq(&actual);
}

fn count(parse: &crate::Parse, kind: SyntaxKind) -> usize {
    parse.syntax_node().descendants().filter(|node| node.kind() == kind).count()
}

fn first<N: ast::Node>(parse: &crate::Parse) -> N {
    parse.syntax_node().descendants().find_map(N::cast).unwrap()
}

#[test]
fn field_in_derived_class() {
    check(
        "class B : A { int x; }",
        expect![[r#"
            COMPILATION_UNIT@0..22
              CLASS_DECL@0..22
                MODIFIER_LIST@0..0
                CLASS_KW@0..6 "class "
                NAME@6..8
                  IDENT@6..8 "B "
                BASE_LIST@8..12
                  COLON@8..10 ": "
                  PATH_TYPE@10..12
                    NAME_REF@10..12
                      IDENT@10..12 "A "
                LEFT_BRACE@12..14 "{ "
                FIELD_DECL@14..21
                  MODIFIER_LIST@14..14
                  VARIABLE_DECL@14..19
                    PATH_TYPE@14..18
                      NAME_REF@14..18
                        IDENT@14..18 "int "
                    VARIABLE_DECLARATOR@18..19
                      NAME@18..19
                        IDENT@18..19 "x"
                  SEMICOLON@19..21 "; "
                RIGHT_BRACE@21..22 "}"
              EOF@22..22 ""
            Errors:
        "#]],
    );
}

#[test]
fn missing_semicolon() {
    check(
        "class A { int x }",
        expect![[r#"
            COMPILATION_UNIT@0..17
              CLASS_DECL@0..17
                MODIFIER_LIST@0..0
                CLASS_KW@0..6 "class "
                NAME@6..8
                  IDENT@6..8 "A "
                LEFT_BRACE@8..10 "{ "
                FIELD_DECL@10..16
                  MODIFIER_LIST@10..10
                  VARIABLE_DECL@10..16
                    PATH_TYPE@10..14
                      NAME_REF@10..14
                        IDENT@10..14 "int "
                    VARIABLE_DECLARATOR@14..16
                      NAME@14..16
                        IDENT@14..16 "x "
                RIGHT_BRACE@16..17 "}"
              EOF@17..17 ""
            Errors:
              15..15 expected `;`
        "#]],
    );
}

#[test]
fn text_is_preserved() {
    let text = r#"using System;
using System.Collections.Generic;

namespace Shapes
{
    // A shape.
    [Serializable]
    public abstract class Shape<T> : Base, IShape
    {
        /* the name */
        protected readonly string name = "shape";
        private List<List<int>> points, extra;
        public int? Count { get { return count; } private set { count = value; } } = 0;
        public string Name => name;

        public Shape(string name) : base(name) { this.name = name ?? @"none"; }

        public virtual double Area(int scale = 1)
        {
            if (scale > 0 && !Flag) return scale * 2.5 + count++;
            else { Run(x => x); }
            var y = new Point(1, 2).X;
            return -y;
        }

        int this[int i] { get { return i; } }
    }
}
"#;
    let parse = parse_text(text);
    assert_eq!(parse.syntax_node().text(), text);
    assert_eq!(parse.green().text_len(), text.len().try_into().unwrap());
}

#[test]
fn garbage_is_preserved() {
    for text in ["}}} class", "class { int", "class A : { ;;", "\0 class A {}", "@ # $", ""] {
        let parse = parse_text(text);
        assert_eq!(parse.syntax_node().text(), text, "{text:?}");
    }
}

#[test]
fn unsupported_member_is_one_error() {
    let parse = parse_text("class A { int this[int i] { get { return 0; } } int y; }");

    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["expected member name"]);

    let class: ast::ClassDecl = first(&parse);
    let fields = class.fields().collect::<Vec<_>>();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].single_declarator().and_then(|it| it.name()).unwrap().text(), "y");
    assert_eq!(count(&parse, SyntaxKind::ERROR), 1);
}

#[test]
fn stray_token_before_class() {
    let parse = parse_text("; public class A {}");
    assert_eq!(parse.diagnostics().len(), 1);
    assert_eq!(parse.diagnostics()[0].message(), "expected a class declaration");

    let class: ast::ClassDecl = first(&parse);
    assert_eq!(class.name().unwrap().text(), "A");
    assert!(class.has_modifier(SyntaxKind::PUBLIC_KW));
}

#[test]
fn properties() {
    let parse = parse_text(
        "class A { public int X { get { return x; } protected set { x = value; } } int Y => y; }",
    );
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());

    let class: ast::ClassDecl = first(&parse);
    let properties = class.properties().collect::<Vec<_>>();
    assert_eq!(properties.len(), 2);

    let x = &properties[0];
    let kinds = x.accessor_list().unwrap().accessors().map(|it| it.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [Some(ast::AccessorKind::Get), Some(ast::AccessorKind::Set)]);
    assert!(x.getter().unwrap().body().is_some());

    let y = &properties[1];
    assert!(y.accessor_list().is_none());
    assert_eq!(y.expr_body().unwrap().expr().unwrap().syntax().text(), "y");
}

#[test]
fn auto_property_with_initializer() {
    let parse = parse_text("class A { public string Name { get; init; } = \"a\"; }");
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());

    let property: ast::PropertyDecl = first(&parse);
    assert!(property.getter().unwrap().body().is_none());
    assert!(property.initializer().is_some());
}

#[test]
fn binary_precedence() {
    let parse = parse_text("class A { int M() => a = b + c * d == e ? f : g; }");
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());

    let assign: ast::AssignExpr = first(&parse);
    let ast::Expr::Conditional(conditional) = assign.rhs().unwrap() else { panic!() };
    let ast::Expr::Binary(eq) = conditional.condition().unwrap() else { panic!() };
    assert_eq!(eq.op().unwrap().text_trimmed(), "==");
    let ast::Expr::Binary(add) = eq.lhs().unwrap() else { panic!() };
    assert_eq!(add.op().unwrap().text_trimmed(), "+");
    let ast::Expr::Binary(mul) = add.rhs().unwrap() else { panic!() };
    assert_eq!(mul.syntax().text(), "c * d ");
}

#[test]
fn locals_and_comparisons() {
    let parse = parse_text(
        "class A { void M() { List<int> a = b; int c; a < b; x.y = new C(1); } }",
    );
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());
    assert_eq!(count(&parse, SyntaxKind::LOCAL_DECL_STMT), 2);
    assert_eq!(count(&parse, SyntaxKind::EXPR_STMT), 2);
    assert_eq!(count(&parse, SyntaxKind::OBJECT_CREATION_EXPR), 1);
}

#[test]
fn member_access_chain() {
    let parse = parse_text("class A { int M() => this.a.b(c); }");
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());

    let call: ast::CallExpr = first(&parse);
    let ast::Expr::MemberAccess(access) = call.callee().unwrap() else { panic!() };
    assert_eq!(access.name_ref().unwrap().text(), "b");
    let ast::Expr::MemberAccess(inner) = access.receiver().unwrap() else { panic!() };
    assert!(matches!(inner.receiver(), Some(ast::Expr::This(_))));
}

#[test]
fn namespaces() {
    let parse = parse_text("namespace N.M;\nusing X;\nclass A {}\nclass B : A {}\n");
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());

    let unit = parse.tree();
    let items = unit.items().collect::<Vec<_>>();
    assert_eq!(items.len(), 1);
    let ast::Item::Namespace(namespace) = &items[0] else { panic!() };
    assert_eq!(namespace.path().unwrap().text(), "N.M");
    assert_eq!(namespace.items().count(), 3);
}

#[test]
fn nested_generics_and_arrays() {
    let parse = parse_text("class A<T> : B<List<T>> { Dictionary<string, int[]>[] map; T? item; }");
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());

    let class: ast::ClassDecl = first(&parse);
    let base = class.base_list().unwrap().types().next().unwrap();
    assert_eq!(base.path_type().unwrap().simple_name().unwrap(), "B");

    let tys = class.fields().map(|it| it.ty().unwrap()).collect::<Vec<_>>();
    assert!(matches!(tys[0], ast::Type::Array(_)));
    assert!(matches!(tys[1], ast::Type::Nullable(_)));
    assert_eq!(tys[0].path_type().unwrap().simple_name().unwrap(), "Dictionary");
}

#[test]
fn constructors() {
    let parse = parse_text("class B : A { public B(int x) : base(x) { } }");
    assert!(parse.diagnostics().is_empty(), "{:?}", parse.diagnostics());

    let ctor: ast::ConstructorDecl = first(&parse);
    assert!(ctor.initializer().unwrap().is_base());
    assert_eq!(ctor.param_list().unwrap().params().count(), 1);
}

#[test]
fn parse_query() {
    let db = DatabaseImpl::default();
    let text = "class A { int x; }";
    let file = File::new(&db, "a.cs".into(), text.to_owned());

    assert_eq!(file.parse(&db), &parse_text(text));
    assert_eq!(file.parse(&db).syntax_node().text(), text);
}

#[test]
fn unterminated_literal_is_an_error() {
    let text = "class A { string s = \"abc;\n    int y; }";
    let parse = parse_text(text);

    assert_eq!(parse.syntax_node().text(), text);
    assert_eq!(count(&parse, SyntaxKind::ERROR), 1);
    assert_eq!(count(&parse, SyntaxKind::FIELD_DECL), 2);

    let messages = parse.diagnostics().iter().map(|d| d.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["unterminated literal", "expected `;`"]);
}
