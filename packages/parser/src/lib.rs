pub mod ast;
pub mod comments;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod source;
pub mod tokenizer;

pub use ast::{Comment, CommentKind, Loc, Node, NodeKind, Placement, Quote, Shallow};
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_with_path, Parser};
pub use source::{indentation_width, SourceFile};
pub use tokenizer::{tokenize, Token};

#[cfg(feature = "pretty-errors")]
pub use error::format_error;
