use logos::{Lexer, Logos};
use std::fmt;

use crate::error::{ParseError, ParseResult};

/// Token types for the script language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'src> {
    // Keywords
    #[token("const")]
    Const,

    #[token("let")]
    Let,

    #[token("var")]
    Var,

    #[token("function")]
    Function,

    #[token("return")]
    Return,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    // String literals, quotes included
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice())]
    Number(&'src str),

    // Comments are kept so they can be attached to nodes
    #[regex(r"//[^\n]*", |lex| lex.slice())]
    LineComment(&'src str),

    #[token("/*", block_comment)]
    BlockComment(&'src str),

    // Symbols
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(".")]
    Dot,

    #[token("=")]
    Assign,

    #[token("!")]
    Bang,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEqual,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEqual,

    #[token("==")]
    EqualEqual,

    #[token("!=")]
    BangEqual,

    #[token("===")]
    StrictEqual,

    #[token("!==")]
    StrictNotEqual,

    #[token("&&")]
    AndAnd,

    #[token("||")]
    OrOr,
}

/// Consume a block comment up to and including its closing `*/`
///
/// An unterminated comment fails the token, which surfaces as a lexer
/// error spanning the opening delimiter.
fn block_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let end = lex.remainder().find("*/")?;
    lex.bump(end + 2);
    Some(lex.slice())
}

impl<'src> Token<'src> {
    pub fn is_comment(&self) -> bool {
        matches!(self, Token::LineComment(_) | Token::BlockComment(_))
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Const => write!(f, "const"),
            Token::Let => write!(f, "let"),
            Token::Var => write!(f, "var"),
            Token::Function => write!(f, "function"),
            Token::Return => write!(f, "return"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LineComment(_) => write!(f, "line comment"),
            Token::BlockComment(_) => write!(f, "block comment"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Dot => write!(f, "."),
            Token::Assign => write!(f, "="),
            Token::Bang => write!(f, "!"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Less => write!(f, "<"),
            Token::LessEqual => write!(f, "<="),
            Token::Greater => write!(f, ">"),
            Token::GreaterEqual => write!(f, ">="),
            Token::EqualEqual => write!(f, "=="),
            Token::BangEqual => write!(f, "!="),
            Token::StrictEqual => write!(f, "==="),
            Token::StrictNotEqual => write!(f, "!=="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
        }
    }
}

/// Tokenize a source string
///
/// Unlike a formatter-only lexer this one refuses unknown input: every
/// byte that is not whitespace must belong to a token, otherwise the
/// original text could not be reproduced.
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, std::ops::Range<usize>)>> {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok((token, span)),
            Err(()) => Err(ParseError::lexer_error(span)),
        })
        .collect()
}
