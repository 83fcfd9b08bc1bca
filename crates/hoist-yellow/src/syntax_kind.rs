#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    LEFT_ANGLE,
    RIGHT_ANGLE,
    SEMICOLON,
    COMMA,
    COLON,
    DOT,
    EQ,
    FAT_ARROW,
    QUESTION,
    OPERATOR,

    ABSTRACT_KW,
    BASE_KW,
    CLASS_KW,
    CONST_KW,
    ELSE_KW,
    FALSE_KW,
    IF_KW,
    INTERNAL_KW,
    NAMESPACE_KW,
    NEW_KW,
    NULL_KW,
    OVERRIDE_KW,
    PARTIAL_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    RETURN_KW,
    SEALED_KW,
    STATIC_KW,
    THIS_KW,
    TRUE_KW,
    USING_KW,
    VIRTUAL_KW,

    // Contextual keywords. The tokenizer produces `IDENT` and the parser
    // remaps the token where the keyword is meaningful.
    GET_KW,
    SET_KW,
    INIT_KW,

    IDENT,
    INT_NUMBER,
    FLOAT_NUMBER,
    STRING,
    CHAR,

    UNKNOWN,
    EOF,

    COMPILATION_UNIT,
    USING_DIRECTIVE,
    NAMESPACE_DECL,
    PATH,
    CLASS_DECL,
    TYPE_PARAM_LIST,
    TYPE_PARAM,
    BASE_LIST,
    ATTRIBUTE_LIST,
    ATTRIBUTE,
    MODIFIER_LIST,
    FIELD_DECL,
    VARIABLE_DECL,
    VARIABLE_DECLARATOR,
    EQUALS_VALUE,
    PROPERTY_DECL,
    ACCESSOR_LIST,
    ACCESSOR,
    ARROW_EXPR_CLAUSE,
    METHOD_DECL,
    CONSTRUCTOR_DECL,
    CONSTRUCTOR_INITIALIZER,
    PARAM_LIST,
    PARAM,

    PATH_TYPE,
    GENERIC_ARG_LIST,
    ARRAY_TYPE,
    NULLABLE_TYPE,

    BLOCK,
    RETURN_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    LOCAL_DECL_STMT,
    EXPR_STMT,
    EMPTY_STMT,

    NAME,
    NAME_REF,
    LITERAL,
    THIS_EXPR,
    BASE_EXPR,
    MEMBER_ACCESS_EXPR,
    CALL_EXPR,
    ARG_LIST,
    OBJECT_CREATION_EXPR,
    PAREN_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    BINARY_EXPR,
    ASSIGN_EXPR,
    CONDITIONAL_EXPR,

    ERROR,
    TOMBSTONE,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Maps reserved words to their keyword kind.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "abstract" => ABSTRACT_KW,
            "base" => BASE_KW,
            "class" => CLASS_KW,
            "const" => CONST_KW,
            "else" => ELSE_KW,
            "false" => FALSE_KW,
            "if" => IF_KW,
            "internal" => INTERNAL_KW,
            "namespace" => NAMESPACE_KW,
            "new" => NEW_KW,
            "null" => NULL_KW,
            "override" => OVERRIDE_KW,
            "partial" => PARTIAL_KW,
            "private" => PRIVATE_KW,
            "protected" => PROTECTED_KW,
            "public" => PUBLIC_KW,
            "readonly" => READONLY_KW,
            "return" => RETURN_KW,
            "sealed" => SEALED_KW,
            "static" => STATIC_KW,
            "this" => THIS_KW,
            "true" => TRUE_KW,
            "using" => USING_KW,
            "virtual" => VIRTUAL_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps words that are keywords only in some positions.
    pub fn from_contextual_keyword(text: &str) -> Option<Self> {
        match text {
            "get" => Some(GET_KW),
            "set" => Some(SET_KW),
            "init" => Some(INIT_KW),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        (ABSTRACT_KW as u16..=INIT_KW as u16).contains(&(self as u16))
    }

    /// Member and class modifiers.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            ABSTRACT_KW
                | CONST_KW
                | INTERNAL_KW
                | NEW_KW
                | OVERRIDE_KW
                | PARTIAL_KW
                | PRIVATE_KW
                | PROTECTED_KW
                | PUBLIC_KW
                | READONLY_KW
                | SEALED_KW
                | STATIC_KW
                | VIRTUAL_KW
        )
    }

    /// Modifiers that only control accessibility.
    pub fn is_visibility(self) -> bool {
        matches!(self, PRIVATE_KW | PROTECTED_KW | PUBLIC_KW | INTERNAL_KW)
    }

    pub fn is_literal(self) -> bool {
        matches!(self, INT_NUMBER | FLOAT_NUMBER | STRING | CHAR | TRUE_KW | FALSE_KW | NULL_KW)
    }
}
