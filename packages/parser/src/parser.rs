use std::ops::Range;
use std::sync::Arc;

use crate::ast::*;
use crate::comments::attach_comments;
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IDGenerator;
use crate::source::SourceFile;
use crate::tokenizer::{tokenize, Token};

/// Parser for the script language
///
/// Produces a `Program` whose every node carries a [`Loc`] into the
/// shared [`SourceFile`]. Once the tree is complete, comments are
/// attached and the source file records a snapshot of each node so the
/// printer can later tell untouched nodes from edited ones.
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    comments: Vec<Comment>,
    pos: usize,
    prev_end: usize,
    source: Arc<SourceFile>,
    id_generator: IDGenerator,
}

impl<'src> Parser<'src> {
    pub fn new(text: &'src str, source: Arc<SourceFile>, id_generator: IDGenerator) -> ParseResult<Self> {
        let mut parser = Self {
            tokens: Vec::new(),
            comments: Vec::new(),
            pos: 0,
            prev_end: 0,
            source,
            id_generator,
        };

        for (token, span) in tokenize(text)? {
            match token {
                Token::LineComment(raw) => {
                    let loc = parser.loc(span.start, span.end);
                    parser.comments.push(Comment {
                        loc: Some(loc),
                        ..Comment::line(&raw[2..])
                    });
                }
                Token::BlockComment(raw) => {
                    let loc = parser.loc(span.start, span.end);
                    parser.comments.push(Comment {
                        loc: Some(loc),
                        ..Comment::block(&raw[2..raw.len() - 2])
                    });
                }
                token => parser.tokens.push((token, span)),
            }
        }

        Ok(parser)
    }

    /// Parse a complete program
    pub fn parse_program(mut self) -> ParseResult<Node> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        let end = self.source.text().len();
        let mut program = self.node(0, end, NodeKind::Program { body });

        attach_comments(&mut program, std::mem::take(&mut self.comments));
        self.source.record(&program);

        Ok(program)
    }

    fn parse_statement(&mut self) -> ParseResult<Node> {
        match self.peek() {
            Some((Token::Const | Token::Let | Token::Var, _)) => self.parse_variable_declaration(),
            Some((Token::Function, _)) => self.parse_function(),
            Some((Token::Return, _)) => self.parse_return(),
            Some((Token::If, _)) => self.parse_if(),
            Some((Token::LBrace, _)) => self.parse_block(),
            Some(_) => self.parse_expression_statement(),
            None => Err(ParseError::unexpected_eof(self.prev_end, "statement")),
        }
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        let kind = match self.advance() {
            Some((Token::Const, _)) => DeclarationKind::Const,
            Some((Token::Let, _)) => DeclarationKind::Let,
            _ => DeclarationKind::Var,
        };

        let mut declarations = vec![self.parse_declarator()?];
        while self.match_token(Token::Comma) {
            declarations.push(self.parse_declarator()?);
        }
        self.expect(Token::Semicolon)?;

        Ok(self.node(start, self.prev_end, NodeKind::VariableDeclaration { kind, declarations }))
    }

    fn parse_declarator(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        let id = self.parse_identifier()?;

        let init = if self.match_token(Token::Assign) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(self.node(
            start,
            self.prev_end,
            NodeKind::VariableDeclarator {
                id: Box::new(id),
                init,
            },
        ))
    }

    fn parse_function(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        self.expect(Token::Function)?;
        let id = self.parse_identifier()?;

        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        while !self.check(Token::RParen) && !self.is_at_end() {
            params.push(self.parse_identifier()?);
            if !self.check(Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }
        self.expect(Token::RParen)?;

        let body = self.parse_block()?;

        Ok(self.node(
            start,
            self.prev_end,
            NodeKind::FunctionDeclaration {
                id: Box::new(id),
                params,
                body: Box::new(body),
            },
        ))
    }

    fn parse_return(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        self.expect(Token::Return)?;

        let argument = if self.check(Token::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };
        self.expect(Token::Semicolon)?;

        Ok(self.node(start, self.prev_end, NodeKind::ReturnStatement { argument }))
    }

    fn parse_if(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        self.expect(Token::If)?;

        self.expect(Token::LParen)?;
        let test = self.parse_expression()?;
        self.expect(Token::RParen)?;

        let consequent = self.parse_statement()?;
        let alternate = if self.match_token(Token::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(self.node(
            start,
            self.prev_end,
            NodeKind::IfStatement {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate,
            },
        ))
    }

    fn parse_block(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        self.expect(Token::LBrace)?;

        let mut body = Vec::new();
        while !self.check(Token::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.expect(Token::RBrace)?;

        Ok(self.node(start, self.prev_end, NodeKind::BlockStatement { body }))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        let expression = self.parse_expression()?;
        self.expect(Token::Semicolon)?;

        Ok(self.node(
            start,
            self.prev_end,
            NodeKind::ExpressionStatement {
                expression: Box::new(expression),
            },
        ))
    }

    fn parse_expression(&mut self) -> ParseResult<Node> {
        self.parse_binary(1)
    }

    /// Precedence climbing; every operator is left associative
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Node> {
        let start = self.peek_start();
        let mut left = self.parse_unary()?;

        while let Some(operator) = self.peek().and_then(|(token, _)| binary_operator(token)) {
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();

            let right = self.parse_binary(precedence + 1)?;
            left = self.node(
                start,
                self.prev_end,
                NodeKind::BinaryExpression {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        let operator = match self.peek() {
            Some((Token::Bang, _)) => UnaryOperator::Not,
            Some((Token::Minus, _)) => UnaryOperator::Minus,
            _ => return self.parse_postfix(),
        };
        self.advance();

        let argument = self.parse_unary()?;
        Ok(self.node(
            start,
            self.prev_end,
            NodeKind::UnaryExpression {
                operator,
                argument: Box::new(argument),
            },
        ))
    }

    fn parse_postfix(&mut self) -> ParseResult<Node> {
        let start = self.peek_start();
        let mut expression = self.parse_primary()?;

        loop {
            if self.match_token(Token::LParen) {
                let mut arguments = Vec::new();
                while !self.check(Token::RParen) && !self.is_at_end() {
                    arguments.push(self.parse_expression()?);
                    if !self.check(Token::RParen) {
                        self.expect(Token::Comma)?;
                    }
                }
                self.expect(Token::RParen)?;

                expression = self.node(
                    start,
                    self.prev_end,
                    NodeKind::CallExpression {
                        callee: Box::new(expression),
                        arguments,
                    },
                );
            } else if self.match_token(Token::Dot) {
                let property = self.parse_identifier()?;
                expression = self.node(
                    start,
                    self.prev_end,
                    NodeKind::MemberExpression {
                        object: Box::new(expression),
                        property: Box::new(property),
                    },
                );
            } else {
                return Ok(expression);
            }
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let span = self.peek_span();
        match self.peek().cloned() {
            Some((Token::Ident(name), _)) => {
                self.advance();
                Ok(self.node(span.start, span.end, NodeKind::Identifier { name: name.to_string() }))
            }
            Some((Token::Number(raw), _)) => {
                self.advance();
                Ok(self.node(span.start, span.end, NodeKind::NumericLiteral { raw: raw.to_string() }))
            }
            Some((Token::String(raw), _)) => {
                self.advance();
                let quote = if raw.starts_with('\'') { Quote::Single } else { Quote::Double };
                let value = raw[1..raw.len() - 1].to_string();
                Ok(self.node(span.start, span.end, NodeKind::StringLiteral { value, quote }))
            }
            Some((Token::LParen, _)) => {
                // Grouping parentheses are not part of the inner node's loc
                self.advance();
                let expression = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expression)
            }
            Some(_) => Err(ParseError::unexpected_token(span, "expression", Self::format_token(self.peek()))),
            None => Err(ParseError::unexpected_eof(self.prev_end, "expression")),
        }
    }

    fn parse_identifier(&mut self) -> ParseResult<Node> {
        match self.peek() {
            Some((Token::Ident(name), span)) => {
                let name = name.to_string();
                let span = span.clone();
                self.advance();
                Ok(self.node(span.start, span.end, NodeKind::Identifier { name }))
            }
            Some(_) => Err(ParseError::unexpected_token(
                self.peek_span(),
                "identifier",
                Self::format_token(self.peek()),
            )),
            None => Err(ParseError::unexpected_eof(self.prev_end, "identifier")),
        }
    }

    fn node(&mut self, start: usize, end: usize, kind: NodeKind) -> Node {
        Node {
            kind,
            comments: Vec::new(),
            loc: Some(self.loc(start, end)),
        }
    }

    fn loc(&mut self, start: usize, end: usize) -> Loc {
        Loc::new(start, end, self.id_generator.new_id(), Arc::clone(&self.source))
    }

    // Helper methods

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        if let Some((_, span)) = token {
            self.prev_end = span.end;
        }
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, token: Token) -> bool {
        if let Some((t, _)) = self.peek() {
            std::mem::discriminant(t) == std::mem::discriminant(&token)
        } else {
            false
        }
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult<()> {
        if self.check(token.clone()) {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Err(ParseError::unexpected_eof(self.prev_end, format!("'{}'", token)))
        } else {
            Err(ParseError::unexpected_token(
                self.peek_span(),
                format!("'{}'", token),
                Self::format_token(self.peek()),
            ))
        }
    }

    fn peek_start(&self) -> usize {
        self.peek_span().start
    }

    fn peek_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or(self.prev_end..self.prev_end)
    }

    fn format_token(token: Option<&(Token, Range<usize>)>) -> String {
        match token {
            None => "end of file".to_string(),
            Some((token @ (Token::Ident(_) | Token::String(_) | Token::Number(_)), _)) => token.to_string(),
            Some((token, _)) => format!("'{}'", token),
        }
    }
}

fn binary_operator(token: &Token) -> Option<BinaryOperator> {
    let operator = match token {
        Token::OrOr => BinaryOperator::Or,
        Token::AndAnd => BinaryOperator::And,
        Token::EqualEqual => BinaryOperator::Equals,
        Token::BangEqual => BinaryOperator::NotEquals,
        Token::StrictEqual => BinaryOperator::StrictEquals,
        Token::StrictNotEqual => BinaryOperator::StrictNotEquals,
        Token::Less => BinaryOperator::LessThan,
        Token::LessEqual => BinaryOperator::LessThanOrEqual,
        Token::Greater => BinaryOperator::GreaterThan,
        Token::GreaterEqual => BinaryOperator::GreaterThanOrEqual,
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Subtract,
        Token::Star => BinaryOperator::Multiply,
        Token::Slash => BinaryOperator::Divide,
        Token::Percent => BinaryOperator::Remainder,
        _ => return None,
    };
    Some(operator)
}

pub fn parse(source: &str) -> ParseResult<Node> {
    parse_source(Arc::new(SourceFile::new(None, source)), "<anonymous>")
}

pub fn parse_with_path(source: &str, path: &str) -> ParseResult<Node> {
    parse_source(Arc::new(SourceFile::new(Some(path.to_string()), source)), path)
}

fn parse_source(source: Arc<SourceFile>, path: &str) -> ParseResult<Node> {
    let text = Arc::clone(&source);
    let parser = Parser::new(text.text(), source, IDGenerator::new(path))?;
    parser.parse_program()
}
