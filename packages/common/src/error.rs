use reprint_parser::ParseError;
use reprint_sourcemap::SourceMapError;
use thiserror::Error;

/// Error type shared by every reprint crate
///
/// Nothing inside the printer catches or retries these; a failure
/// aborts the render call that raised it.
#[derive(Error, Debug)]
pub enum ReprintError {
    /// A print result was built from a value of the wrong shape
    #[error("Type constraint violated: expected {expected}, found {found}")]
    TypeConstraintViolation { expected: &'static str, found: String },

    /// The dispatcher was handed a path that points at no node
    #[error("Render target is missing: the path does not point at a node")]
    MissingRenderTarget,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Source map error: {0}")]
    SourceMap(#[from] SourceMapError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReprintError {
    pub fn type_constraint(expected: &'static str, found: impl Into<String>) -> Self {
        ReprintError::TypeConstraintViolation {
            expected,
            found: found.into(),
        }
    }
}
