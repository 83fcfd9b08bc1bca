use crate::SyntaxKind::{self, *};
use crate::{NodeOrToken, SyntaxNode, SyntaxToken};

pub trait Node: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(syntax: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($($(#[$meta:meta])* $name:ident => $kind:ident;)*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl Node for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then(|| Self(syntax))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    )*};
}

macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($node:ident)),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($node)),*
        }

        impl Node for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                $($node::can_cast(kind))||*
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                $(
                    if $node::can_cast(syntax.kind()) {
                        return Some(Self::$variant($node(syntax)));
                    }
                )*
                None
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(it) => &it.0),*
                }
            }
        }
    };
}

fn child<N: Node>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

fn children<N: Node>(parent: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    parent.children().filter_map(N::cast)
}

fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent.children_with_tokens().filter_map(NodeOrToken::into_token).find(|it| it.kind() == kind)
}

pub trait HasName: Node {
    fn name(&self) -> Option<Name> {
        child(self.syntax())
    }
}

pub trait HasModifiers: Node {
    fn modifier_list(&self) -> Option<ModifierList> {
        child(self.syntax())
    }

    fn has_modifier(&self, kind: SyntaxKind) -> bool {
        self.modifier_list().is_some_and(|list| list.modifiers().any(|it| it.kind() == kind))
    }
}

pub trait HasAttributes: Node {
    fn attribute_lists(&self) -> impl Iterator<Item = AttributeList> {
        children(self.syntax())
    }
}

ast_node! {
    CompilationUnit => COMPILATION_UNIT;
    UsingDirective => USING_DIRECTIVE;
    NamespaceDecl => NAMESPACE_DECL;
    Path => PATH;
    ClassDecl => CLASS_DECL;
    TypeParamList => TYPE_PARAM_LIST;
    TypeParam => TYPE_PARAM;
    BaseList => BASE_LIST;
    AttributeList => ATTRIBUTE_LIST;
    Attribute => ATTRIBUTE;
    ModifierList => MODIFIER_LIST;
    /// `int x = 1, y;`. Only single-declarator fields can be relocated.
    FieldDecl => FIELD_DECL;
    VariableDecl => VARIABLE_DECL;
    VariableDeclarator => VARIABLE_DECLARATOR;
    EqualsValue => EQUALS_VALUE;
    PropertyDecl => PROPERTY_DECL;
    AccessorList => ACCESSOR_LIST;
    Accessor => ACCESSOR;
    ArrowExprClause => ARROW_EXPR_CLAUSE;
    MethodDecl => METHOD_DECL;
    ConstructorDecl => CONSTRUCTOR_DECL;
    ConstructorInitializer => CONSTRUCTOR_INITIALIZER;
    ParamList => PARAM_LIST;
    Param => PARAM;
    PathType => PATH_TYPE;
    GenericArgList => GENERIC_ARG_LIST;
    ArrayType => ARRAY_TYPE;
    NullableType => NULLABLE_TYPE;
    Block => BLOCK;
    ReturnStmt => RETURN_STMT;
    IfStmt => IF_STMT;
    ElseClause => ELSE_CLAUSE;
    LocalDeclStmt => LOCAL_DECL_STMT;
    ExprStmt => EXPR_STMT;
    EmptyStmt => EMPTY_STMT;
    Name => NAME;
    NameRef => NAME_REF;
    Literal => LITERAL;
    ThisExpr => THIS_EXPR;
    BaseExpr => BASE_EXPR;
    MemberAccessExpr => MEMBER_ACCESS_EXPR;
    CallExpr => CALL_EXPR;
    ArgList => ARG_LIST;
    ObjectCreationExpr => OBJECT_CREATION_EXPR;
    ParenExpr => PAREN_EXPR;
    PrefixExpr => PREFIX_EXPR;
    PostfixExpr => POSTFIX_EXPR;
    BinaryExpr => BINARY_EXPR;
    AssignExpr => ASSIGN_EXPR;
    ConditionalExpr => CONDITIONAL_EXPR;
}

ast_enum! {
    Item {
        Using(UsingDirective),
        Namespace(NamespaceDecl),
        Class(ClassDecl),
    }
}

ast_enum! {
    /// Members declared directly inside a class body.
    Member {
        Field(FieldDecl),
        Property(PropertyDecl),
        Method(MethodDecl),
        Constructor(ConstructorDecl),
        Class(ClassDecl),
    }
}

ast_enum! {
    Type {
        Path(PathType),
        Array(ArrayType),
        Nullable(NullableType),
    }
}

ast_enum! {
    Stmt {
        Block(Block),
        Return(ReturnStmt),
        If(IfStmt),
        LocalDecl(LocalDeclStmt),
        Expr(ExprStmt),
        Empty(EmptyStmt),
    }
}

ast_enum! {
    Expr {
        Literal(Literal),
        NameRef(NameRef),
        This(ThisExpr),
        Base(BaseExpr),
        MemberAccess(MemberAccessExpr),
        Call(CallExpr),
        ObjectCreation(ObjectCreationExpr),
        Paren(ParenExpr),
        Prefix(PrefixExpr),
        Postfix(PostfixExpr),
        Binary(BinaryExpr),
        Assign(AssignExpr),
        Conditional(ConditionalExpr),
    }
}

impl CompilationUnit {
    pub fn items(&self) -> impl Iterator<Item = Item> + use<> {
        children(&self.0)
    }
}

impl UsingDirective {
    pub fn path(&self) -> Option<Path> {
        child(&self.0)
    }
}

impl NamespaceDecl {
    pub fn path(&self) -> Option<Path> {
        child(&self.0)
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + use<> {
        children(&self.0)
    }
}

impl Path {
    pub fn segments(&self) -> impl Iterator<Item = NameRef> + use<> {
        children(&self.0)
    }

    /// Dotted text of the path without trivia.
    pub fn text(&self) -> String {
        self.segments().map(|segment| segment.text()).collect::<Vec<_>>().join(".")
    }
}

impl HasAttributes for ClassDecl {}
impl HasModifiers for ClassDecl {}
impl HasName for ClassDecl {}

impl ClassDecl {
    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child(&self.0)
    }

    pub fn base_list(&self) -> Option<BaseList> {
        child(&self.0)
    }

    pub fn members(&self) -> impl Iterator<Item = Member> + use<> {
        children(&self.0)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + use<> {
        children(&self.0)
    }

    pub fn properties(&self) -> impl Iterator<Item = PropertyDecl> + use<> {
        children(&self.0)
    }

    pub fn left_brace_token(&self) -> Option<SyntaxToken> {
        token(&self.0, LEFT_BRACE)
    }

    pub fn right_brace_token(&self) -> Option<SyntaxToken> {
        token(&self.0, RIGHT_BRACE)
    }
}

impl TypeParamList {
    pub fn params(&self) -> impl Iterator<Item = TypeParam> + use<> {
        children(&self.0)
    }
}

impl HasName for TypeParam {}

impl BaseList {
    pub fn types(&self) -> impl Iterator<Item = Type> + use<> {
        children(&self.0)
    }
}

impl AttributeList {
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + use<> {
        children(&self.0)
    }
}

impl Attribute {
    pub fn path(&self) -> Option<Path> {
        child(&self.0)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.0)
    }
}

impl ModifierList {
    pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.0.children_with_tokens().filter_map(NodeOrToken::into_token)
    }
}

impl HasAttributes for FieldDecl {}
impl HasModifiers for FieldDecl {}

impl FieldDecl {
    pub fn variable_decl(&self) -> Option<VariableDecl> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        self.variable_decl()?.ty()
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + use<> {
        self.variable_decl().into_iter().flat_map(|decl| decl.declarators())
    }

    /// The declarator of a field that declares exactly one variable.
    pub fn single_declarator(&self) -> Option<VariableDeclarator> {
        let mut declarators = self.declarators();
        let first = declarators.next()?;
        declarators.next().is_none().then_some(first)
    }

    pub fn semicolon_token(&self) -> Option<SyntaxToken> {
        token(&self.0, SEMICOLON)
    }
}

impl VariableDecl {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + use<> {
        children(&self.0)
    }
}

impl HasName for VariableDeclarator {}

impl VariableDeclarator {
    pub fn initializer(&self) -> Option<EqualsValue> {
        child(&self.0)
    }
}

impl EqualsValue {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl HasAttributes for PropertyDecl {}
impl HasModifiers for PropertyDecl {}
impl HasName for PropertyDecl {}

impl PropertyDecl {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn accessor_list(&self) -> Option<AccessorList> {
        child(&self.0)
    }

    pub fn getter(&self) -> Option<Accessor> {
        self.accessor_list()?.accessors().find(|it| it.kind() == Some(AccessorKind::Get))
    }

    /// `int X => x;`
    pub fn expr_body(&self) -> Option<ArrowExprClause> {
        child(&self.0)
    }

    pub fn initializer(&self) -> Option<EqualsValue> {
        child(&self.0)
    }
}

impl AccessorList {
    pub fn accessors(&self) -> impl Iterator<Item = Accessor> + use<> {
        children(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

impl HasAttributes for Accessor {}
impl HasModifiers for Accessor {}

impl Accessor {
    pub fn kind(&self) -> Option<AccessorKind> {
        self.0.children_with_tokens().filter_map(NodeOrToken::into_token).find_map(|it| {
            match it.kind() {
                GET_KW => Some(AccessorKind::Get),
                SET_KW => Some(AccessorKind::Set),
                INIT_KW => Some(AccessorKind::Init),
                _ => None,
            }
        })
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }

    pub fn expr_body(&self) -> Option<ArrowExprClause> {
        child(&self.0)
    }
}

impl ArrowExprClause {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl HasAttributes for MethodDecl {}
impl HasModifiers for MethodDecl {}
impl HasName for MethodDecl {}

impl MethodDecl {
    pub fn type_param_list(&self) -> Option<TypeParamList> {
        child(&self.0)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }

    pub fn expr_body(&self) -> Option<ArrowExprClause> {
        child(&self.0)
    }
}

impl HasAttributes for ConstructorDecl {}
impl HasModifiers for ConstructorDecl {}
impl HasName for ConstructorDecl {}

impl ConstructorDecl {
    pub fn param_list(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn initializer(&self) -> Option<ConstructorInitializer> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }

    pub fn expr_body(&self) -> Option<ArrowExprClause> {
        child(&self.0)
    }
}

impl ConstructorInitializer {
    pub fn is_base(&self) -> bool {
        token(&self.0, BASE_KW).is_some()
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.0)
    }
}

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + use<> {
        children(&self.0)
    }
}

impl HasName for Param {}

impl Param {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn default_value(&self) -> Option<EqualsValue> {
        child(&self.0)
    }
}

impl PathType {
    pub fn segments(&self) -> impl Iterator<Item = NameRef> + use<> {
        children(&self.0)
    }

    /// Last segment of a qualified name. Generic arguments are not part of it.
    pub fn simple_name(&self) -> Option<String> {
        self.segments().last().map(|segment| segment.text())
    }

    pub fn generic_arg_list(&self) -> Option<GenericArgList> {
        child(&self.0)
    }
}

impl GenericArgList {
    pub fn types(&self) -> impl Iterator<Item = Type> + use<> {
        children(&self.0)
    }
}

impl ArrayType {
    pub fn element_ty(&self) -> Option<Type> {
        child(&self.0)
    }
}

impl NullableType {
    pub fn inner_ty(&self) -> Option<Type> {
        child(&self.0)
    }
}

impl Type {
    /// The named type at the core of arrays and nullables.
    pub fn path_type(&self) -> Option<PathType> {
        match self {
            Type::Path(path) => Some(path.clone()),
            Type::Array(array) => array.element_ty()?.path_type(),
            Type::Nullable(nullable) => nullable.inner_ty()?.path_type(),
        }
    }
}

impl Block {
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + use<> {
        children(&self.0)
    }
}

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        child(&self.0)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        child(&self.0)
    }
}

impl ElseClause {
    pub fn stmt(&self) -> Option<Stmt> {
        child(&self.0)
    }
}

impl LocalDeclStmt {
    pub fn variable_decl(&self) -> Option<VariableDecl> {
        child(&self.0)
    }
}

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl Name {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT)
    }

    pub fn text(&self) -> String {
        self.ident_token().map(|it| it.text_trimmed().to_owned()).unwrap_or_default()
    }
}

impl NameRef {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        token(&self.0, IDENT)
    }

    pub fn text(&self) -> String {
        self.ident_token().map(|it| it.text_trimmed().to_owned()).unwrap_or_default()
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.children_with_tokens().find_map(NodeOrToken::into_token)
    }
}

impl MemberAccessExpr {
    pub fn receiver(&self) -> Option<Expr> {
        self.0.children().next().and_then(Expr::cast)
    }

    pub fn name_ref(&self) -> Option<NameRef> {
        self.0.children().nth(1).and_then(NameRef::cast)
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.0)
    }
}

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + use<> {
        children(&self.0)
    }
}

impl ObjectCreationExpr {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child(&self.0)
    }
}

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl PrefixExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        self.0.children_with_tokens().find_map(NodeOrToken::into_token)
    }

    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

impl PostfixExpr {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        self.0.children_with_tokens().find_map(NodeOrToken::into_token)
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().next().and_then(Expr::cast)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        self.0.children_with_tokens().find_map(NodeOrToken::into_token)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().nth(1).and_then(Expr::cast)
    }
}

impl AssignExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().next().and_then(Expr::cast)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        self.0.children_with_tokens().find_map(NodeOrToken::into_token)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().nth(1).and_then(Expr::cast)
    }
}

impl ConditionalExpr {
    pub fn condition(&self) -> Option<Expr> {
        self.0.children().next().and_then(Expr::cast)
    }

    pub fn then_expr(&self) -> Option<Expr> {
        self.0.children().nth(1).and_then(Expr::cast)
    }

    pub fn else_expr(&self) -> Option<Expr> {
        self.0.children().nth(2).and_then(Expr::cast)
    }
}
