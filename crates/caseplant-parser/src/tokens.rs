use std::fmt;

use caseplant_core::relation::RelationOperator;

use crate::span::Span;

/// Token types for the Caseplant language
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Module,
    Case,
    As,
    Actor,

    // Literals
    StringLiteral(String),
    Identifier(&'src str),

    // Relation operators
    Operator(RelationOperator),

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Comma,      // ,
    Semicolon,  // ;
}

/// The payload-free category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Module,
    Case,
    As,
    Actor,
    StringLiteral,
    Identifier,
    Operator,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
}

impl Token<'_> {
    /// Get the token's kind.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Module => TokenKind::Module,
            Token::Case => TokenKind::Case,
            Token::As => TokenKind::As,
            Token::Actor => TokenKind::Actor,
            Token::StringLiteral(_) => TokenKind::StringLiteral,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Operator(_) => TokenKind::Operator,
            Token::LeftParen => TokenKind::LeftParen,
            Token::RightParen => TokenKind::RightParen,
            Token::LeftBrace => TokenKind::LeftBrace,
            Token::RightBrace => TokenKind::RightBrace,
            Token::Comma => TokenKind::Comma,
            Token::Semicolon => TokenKind::Semicolon,
        }
    }

    /// Describe the token for diagnostics, e.g. ``identifier `PI` ``.
    pub fn describe(&self) -> String {
        match self {
            Token::Module | Token::Case | Token::As | Token::Actor => {
                format!("keyword `{self}`")
            }
            Token::StringLiteral(_) => format!("string literal {self}"),
            Token::Identifier(_) => format!("identifier `{self}`"),
            Token::Operator(_) => format!("operator `{self}`"),
            _ => format!("`{self}`"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Module => "`module`",
            TokenKind::Case => "`case`",
            TokenKind::As => "`as`",
            TokenKind::Actor => "`actor`",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "relation operator",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
        };
        f.write_str(text)
    }
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }

    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }

    /// Byte offset where the token starts.
    pub fn position(&self) -> usize {
        self.span.start()
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Module => write!(f, "module"),
            Token::Case => write!(f, "case"),
            Token::As => write!(f, "as"),
            Token::Actor => write!(f, "actor"),

            Token::StringLiteral(s) => write!(f, "'{s}'"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::Operator(op) => write!(f, "{op}"),

            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
        }
    }
}
