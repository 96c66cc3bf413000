use std::ops::Range;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {span:?}: expected {expected}, found {found}")]
    UnexpectedToken {
        span: Range<usize>,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of file at {pos}: expected {expected}")]
    UnexpectedEof { pos: usize, expected: String },

    #[error("Invalid syntax at {span:?}: {message}")]
    InvalidSyntax { span: Range<usize>, message: String },

    #[error("Lexer error at {span:?}")]
    LexerError { span: Range<usize> },
}

impl ParseError {
    pub fn unexpected_token(span: Range<usize>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            span,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(span: Range<usize>, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            span,
            message: message.into(),
        }
    }

    pub fn lexer_error(span: Range<usize>) -> Self {
        Self::LexerError { span }
    }

    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            ParseError::UnexpectedToken { span, .. } => Some(span.clone()),
            ParseError::UnexpectedEof { pos, .. } => Some(*pos..*pos),
            ParseError::InvalidSyntax { span, .. } => Some(span.clone()),
            ParseError::LexerError { span } => Some(span.clone()),
        }
    }
}

/// Pretty-print an error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span().unwrap_or(source.len()..source.len());
    let mut output = Vec::new();

    let report = Report::build(ReportKind::Error, filename, span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, span.start..span.end))
                .with_color(Color::Red)
                .with_message(match error {
                    ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
                    ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
                    ParseError::InvalidSyntax { message, .. } => message.clone(),
                    ParseError::LexerError { .. } => "unrecognized input".to_string(),
                }),
        )
        .finish();

    if report.write((filename, Source::from(source)), &mut output).is_err() {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}
