//! Source map utilities for the reprint printer
//!
//! This crate provides the position-mapping pieces the printer needs:
//! a line index for offset lookups, a builder that deduplicates sources,
//! composition of an input map with a freshly generated one, and
//! conversion between maps and plain JSON objects.

pub mod builder;
pub mod compose;
pub mod utils;

use thiserror::Error;

pub use builder::{from_json_object, from_json_value, to_json_object, SourceMapBuilder};
pub use compose::compose_source_maps;
pub use sourcemap::SourceMap;
pub use utils::{byte_offset_to_line_col, LineIndex};

#[derive(Error, Debug)]
pub enum SourceMapError {
    #[error("Source map encoding failed: {0}")]
    Encode(#[from] sourcemap::Error),

    #[error("Source map JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Source map is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Source map must be a JSON object")]
    NotAnObject,
}
