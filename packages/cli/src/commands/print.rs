use super::parse_file;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use reprint_parser::Node;
use reprint_printer::{PartialOptions, Printer, QuoteStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum QuoteArg {
    Auto,
    Single,
    Double,
}

impl From<QuoteArg> for QuoteStyle {
    fn from(quote: QuoteArg) -> Self {
        match quote {
            QuoteArg::Auto => QuoteStyle::Auto,
            QuoteArg::Single => QuoteStyle::Single,
            QuoteArg::Double => QuoteStyle::Double,
        }
    }
}

#[derive(Debug, Args)]
pub struct PrintArgs {
    /// File to print
    pub path: PathBuf,

    /// Format everything instead of keeping the original layout
    #[arg(long)]
    pub generic: bool,

    /// Columns per indentation level (guessed from the file when omitted)
    #[arg(long)]
    pub tab_width: Option<usize>,

    /// Indent with tabs
    #[arg(long)]
    pub use_tabs: bool,

    /// Quote style for string literals
    #[arg(long, value_enum)]
    pub quote: Option<QuoteArg>,

    /// Write a source map to this path
    #[arg(long)]
    pub source_map: Option<PathBuf>,

    /// Read the input as a JSON syntax tree instead of source code
    #[arg(long)]
    pub from_json: bool,

    /// Write the output to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl PrintArgs {
    /// Options given on the command line; they override the config file
    fn options(&self) -> PartialOptions {
        PartialOptions {
            tab_width: self.tab_width,
            use_tabs: self.use_tabs.then_some(true),
            quote: self.quote.map(QuoteStyle::from),
            source_map_name: self.source_map.as_ref().map(|_| self.output_name()),
            ..Default::default()
        }
    }

    fn output_name(&self) -> String {
        self.out
            .as_deref()
            .unwrap_or(self.path.as_path())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.js".to_string())
    }
}

pub fn print(args: PrintArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let options = config.options.merge(args.options());
    debug!(path = %args.path.display(), generic = args.generic, "printing");

    let tree = if args.from_json {
        read_json_tree(&args.path)?
    } else {
        parse_file(&args.path)?.1
    };

    let printer = Printer::new(options)?;
    let result = if args.generic {
        printer.print_generically(Some(&tree))?
    } else {
        printer.print(Some(&tree))?
    };

    match &args.out {
        Some(out) => {
            fs::write(out, &result.code)?;
            eprintln!("  {} {} → {}", "✓".green(), args.path.display(), out.display());
        }
        None => print!("{}", result.code),
    }

    if let Some(map_path) = &args.source_map {
        match &result.map {
            Some(map) => {
                fs::write(map_path, serde_json::to_string_pretty(map)?)?;
                eprintln!("  {} source map → {}", "✓".green(), map_path.display());
            }
            None if args.generic => {
                eprintln!("{}", "⚠️  Generic printing does not produce a source map".yellow());
            }
            None => return Err(anyhow!("No source map was produced for {}", args.path.display())),
        }
    }

    Ok(())
}

fn read_json_tree(path: &Path) -> Result<Node> {
    let content = fs::read_to_string(path).map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| anyhow!("Invalid syntax tree in {}: {}", path.display(), e))
}
