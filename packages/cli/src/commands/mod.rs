pub mod ast;
pub mod print;

pub use ast::{ast, AstArgs};
pub use print::{print, PrintArgs};

use anyhow::{anyhow, Result};
use reprint_parser::{format_error, parse_with_path, Node};
use std::fs;
use std::path::Path;

/// Read and parse `path`, reporting parse errors with source context
pub(crate) fn parse_file(path: &Path) -> Result<(String, Node)> {
    let source = fs::read_to_string(path).map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;
    let file_name = path.display().to_string();

    let program = parse_with_path(&source, &file_name).map_err(|e| anyhow!("\n{}", format_error(&source, &file_name, &e)))?;

    Ok((source, program))
}
