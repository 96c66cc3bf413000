use super::parse_file;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct AstArgs {
    /// File to parse
    pub path: PathBuf,

    /// Print the tree on a single line
    #[arg(long)]
    pub compact: bool,
}

pub fn ast(args: AstArgs, _cwd: &str) -> Result<()> {
    let (_, program) = parse_file(&args.path)?;

    let json = if args.compact {
        serde_json::to_string(&program)?
    } else {
        serde_json::to_string_pretty(&program)?
    };
    println!("{}", json);

    Ok(())
}
